use crate::error::{GindentError, Result};
use crate::model::{CommitChanges, CommitInfo, DateRange, FileChange};
use crate::util::format_rename;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use gix::object::tree::diff::ChangeDetached;
use gix::objs::tree::EntryMode;
use gix::{discover, ObjectId, Repository};
use indicatif::{ProgressBar, ProgressStyle};
use similar::{ChangeTag, TextDiff};
use std::borrow::Cow;
use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing::debug;

pub struct GitRepo {
    pub(super) repo: Repository,
    path: PathBuf,
}

impl GitRepo {
    /// Open a repository at `path`, or current dir if `None`
    pub fn open<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        let repo_path = match path {
            Some(p) => p.as_ref().to_path_buf(),
            None => std::env::current_dir()?,
        };

        let repo = discover(&repo_path)?;
        let path = repo.workdir().unwrap_or_else(|| repo.path()).to_path_buf();

        Ok(Self { repo, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn resolve_range(&self, since: Option<&str>, until: Option<&str>) -> Result<DateRange> {
        let mut range = DateRange::new();

        let since_dt = since.map(|s| self.parse_commit_or_date(s)).transpose()?;
        let until_dt = until.map(|u| self.parse_commit_or_date(u)).transpose()?;

        if let (Some(s), Some(u)) = (since_dt, until_dt) {
            if s > u {
                return Err(GindentError::InvalidDate(format!(
                    "Invalid range: since ({s}) is after until ({u})"
                )));
            }
        }

        if let Some(s) = since_dt {
            range = range.with_since(s);
        }
        if let Some(u) = until_dt {
            range = range.with_until(u);
        }

        Ok(range)
    }

    fn parse_commit_or_date(&self, input: &str) -> Result<DateTime<Utc>> {
        if let Some(dt) = parse_date(input) {
            return Ok(dt);
        }

        if let Some(duration) = parse_natural_duration(input) {
            let target = SystemTime::now()
                .checked_sub(duration)
                .ok_or_else(|| GindentError::InvalidDate(format!("Duration overflow for '{input}'")))?;
            return Ok(DateTime::<Utc>::from(target));
        }

        // Fallback to Git ref
        let id = self
            .repo
            .rev_parse_single(input)
            .map_err(|e| GindentError::Parse(format!("Invalid commit or date '{input}': {e}")))?;

        let commit = id
            .object()?
            .try_into_commit()
            .map_err(|_| GindentError::Parse(format!("Not a commit: {input}")))?;

        let secs = commit.time()?.seconds;
        DateTime::<Utc>::from_timestamp(secs, 0)
            .ok_or_else(|| GindentError::InvalidDate(format!("Invalid timestamp: {secs}")))
    }

    /// Walks history from HEAD and returns every commit inside `range`,
    /// newest first, with per-file line counts against the first parent.
    pub fn collect_commits(
        &self,
        range: &DateRange,
        include_merges: bool,
        show_progress: bool,
    ) -> Result<Vec<CommitChanges>> {
        let mut head = self.repo.head()?;
        let head_commit = head.peel_to_commit_in_place()?;

        let mut commits = Vec::new();
        let mut seen: HashSet<ObjectId> = HashSet::new();
        let mut stack: VecDeque<ObjectId> = VecDeque::from([head_commit.id]);

        let pb = if show_progress {
            ProgressBar::new_spinner()
        } else {
            ProgressBar::hidden()
        };
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg} {pos}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message("Importing repository...");

        while let Some(commit_id) = stack.pop_back() {
            if !seen.insert(commit_id) {
                continue;
            }

            let commit = self.repo.find_commit(commit_id)?;
            let secs = commit.time()?.seconds;
            let timestamp = DateTime::from_timestamp(secs, 0)
                .ok_or_else(|| GindentError::InvalidDate(format!("Invalid timestamp: {secs}")))?;

            let parents: Vec<ObjectId> = commit.parent_ids().map(|id| id.into()).collect();
            let skip_merge = !include_merges && parents.len() > 1;
            if skip_merge {
                debug!(commit = %commit_id, parents = parents.len(), "skipping merge commit");
            }

            if range.contains(&timestamp) && !skip_merge {
                let info = CommitInfo {
                    id: commit_id.to_string(),
                    timestamp,
                };
                let files = self.compute_changes(commit_id, parents.first().copied())?;
                commits.push(CommitChanges { info, files });
                pb.inc(1);
            }

            stack.extend(parents);
        }

        commits.sort_by(|a, b| b.info.timestamp.cmp(&a.info.timestamp));
        pb.finish_and_clear();
        debug!(commits = commits.len(), "collected commits");
        Ok(commits)
    }

    fn compute_changes(&self, commit_id: ObjectId, parent_id: Option<ObjectId>) -> Result<Vec<FileChange>> {
        let commit_tree = self.repo.find_commit(commit_id)?.tree()?;
        let changes: Vec<ChangeDetached> = match parent_id {
            Some(parent_id) => {
                let parent_tree = self.repo.find_commit(parent_id)?.tree()?;
                self.repo
                    .diff_tree_to_tree(Some(&parent_tree), Some(&commit_tree), None)?
            }
            None => self.repo.diff_tree_to_tree(None, Some(&commit_tree), None)?,
        };

        let mut files = Vec::new();
        for change in changes {
            if let Some(file) = self.handle_change(change)? {
                files.push(file);
            }
        }
        Ok(files)
    }

    fn handle_change(&self, change: ChangeDetached) -> Result<Option<FileChange>> {
        let file = match change {
            ChangeDetached::Addition { id, location, entry_mode, .. } => {
                if !is_file(entry_mode) {
                    return Ok(None);
                }
                let data = self.blob_data(id)?;
                FileChange::new(location.to_string(), count_lines(&data), 0)
            }
            ChangeDetached::Deletion { id, location, entry_mode, .. } => {
                if !is_file(entry_mode) {
                    return Ok(None);
                }
                let data = self.blob_data(id)?;
                FileChange::new(location.to_string(), 0, count_lines(&data))
            }
            ChangeDetached::Modification {
                previous_id,
                id,
                location,
                entry_mode,
                ..
            } => {
                if !is_file(entry_mode) {
                    return Ok(None);
                }
                let (added, deleted) = line_diff(&self.blob_data(previous_id)?, &self.blob_data(id)?);
                FileChange::new(location.to_string(), added, deleted)
            }
            ChangeDetached::Rewrite {
                source_id,
                id,
                source_location,
                location,
                entry_mode,
                copy,
                ..
            } => {
                if !is_file(entry_mode) {
                    return Ok(None);
                }
                let new_data = self.blob_data(id)?;
                if copy {
                    FileChange::new(location.to_string(), count_lines(&new_data), 0)
                } else {
                    let (added, deleted) = line_diff(&self.blob_data(source_id)?, &new_data);
                    let path = format_rename(&source_location.to_string(), &location.to_string());
                    FileChange::new(path, added, deleted)
                }
            }
        };
        Ok(Some(file))
    }

    pub(super) fn blob_data(&self, id: ObjectId) -> Result<Vec<u8>> {
        Ok(self.repo.find_object(id)?.detach().data)
    }
}

fn is_file(mode: EntryMode) -> bool {
    !(mode.is_tree() || mode.is_commit())
}

fn is_binary(data: &[u8]) -> bool {
    data.iter().take(8192).any(|&b| b == 0)
}

fn count_lines(data: &[u8]) -> u64 {
    if is_binary(data) {
        return 0;
    }
    String::from_utf8_lossy(data).lines().count() as u64
}

/// Inserted and deleted line counts; binary content counts as unchanged.
fn line_diff(old: &[u8], new: &[u8]) -> (u64, u64) {
    if is_binary(old) || is_binary(new) {
        return (0, 0);
    }
    let old_text: Cow<'_, str> = String::from_utf8_lossy(old);
    let new_text: Cow<'_, str> = String::from_utf8_lossy(new);
    let diff = TextDiff::from_lines(old_text.as_ref(), new_text.as_ref());

    let mut added = 0u64;
    let mut deleted = 0u64;
    for change in diff.iter_all_changes() {
        match change.tag() {
            ChangeTag::Insert => added += 1,
            ChangeTag::Delete => deleted += 1,
            ChangeTag::Equal => {}
        }
    }
    (added, deleted)
}

fn parse_date(input: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc));
    }

    let date = NaiveDate::parse_from_str(input, "%Y-%m-%d").ok()?;
    let datetime = date.and_hms_opt(0, 0, 0)?;
    Some(Utc.from_utc_datetime(&datetime))
}

fn parse_natural_duration(input: &str) -> Option<Duration> {
    let input = input.trim().to_lowercase();
    let input = input.strip_prefix('-').unwrap_or(&input);
    let input = input.strip_suffix(" ago").unwrap_or(input);
    humantime::parse_duration(&input.split_whitespace().collect::<String>()).ok()
}
