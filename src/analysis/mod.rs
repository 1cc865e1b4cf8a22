pub mod commits;
pub mod ledger;
pub mod tree;

pub use commits::commit_record;
pub use ledger::FileLedger;
pub use tree::collect_tree_complexity;

use crate::config::Settings;
use crate::error::Result;
use crate::git::{GitRepo, ObjectReader};
use crate::model::{CommitChanges, CommitRecord, FileRecord};
use anyhow::Context;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

/// Result of one walk over the history.
#[derive(Debug, Clone)]
pub struct Analysis {
    /// Sorted by file name.
    pub files: Vec<FileRecord>,
    /// In traversal order, newest first.
    pub commits: Vec<CommitRecord>,
}

/// Collects the commits of `repo` selected by `settings` and analyses them.
pub fn run(repo: &GitRepo, settings: &Settings, show_progress: bool) -> anyhow::Result<Analysis> {
    let range = repo
        .resolve_range(settings.since.as_deref(), settings.until.as_deref())
        .context("Failed to resolve date range")?;

    let history = repo
        .collect_commits(&range, settings.include_merges, show_progress)
        .context("Failed to collect commits from repository")?;
    info!("Repository imported, the number of commits is {}", history.len());

    let pb = if show_progress {
        ProgressBar::new(history.len() as u64)
    } else {
        ProgressBar::hidden()
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} {msg} {percent:>3}%")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    pb.set_message("Collecting complexity statistics...");

    let analysis = analyze_history(repo, &history, settings, &pb)
        .context("Failed to analyse repository history")?;
    pb.finish_and_clear();
    Ok(analysis)
}

/// Classifies each commit's tree once and feeds it to both the per-file
/// ledger and the per-commit series. `history` must be newest first.
pub fn analyze_history<R: ObjectReader>(
    reader: &R,
    history: &[CommitChanges],
    settings: &Settings,
    pb: &ProgressBar,
) -> Result<Analysis> {
    let mut ledger = FileLedger::new();
    let mut commits = Vec::with_capacity(history.len());

    for commit in history {
        let entries = reader.tree(&commit.info.id)?;
        let tree = collect_tree_complexity(reader, &entries, settings)?;

        ledger.record_commit(commit, &tree, &settings.ignore);
        commits.push(commit_record(&commit.info, &tree));
        pb.inc(1);
    }

    info!(files = ledger.len(), commits = commits.len(), "analysis complete");
    Ok(Analysis {
        files: ledger.into_records(),
        commits,
    })
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::cli::CommonArgs;
    use crate::config::Settings;
    use crate::error::{GindentError, Result};
    use crate::git::{BlobEntry, ObjectReader, TreeEntry, TreeNode};
    use crate::model::{CommitChanges, CommitInfo, FileChange, FileComplexity};
    use crate::stats::{ContentType, Histogram};
    use chrono::{TimeZone, Utc};
    use gix::ObjectId;
    use std::collections::HashMap;

    /// In-memory history: blobs by path, trees by commit id.
    #[derive(Default)]
    pub struct FakeRepo {
        blobs: HashMap<ObjectId, Vec<u8>>,
        ids: HashMap<String, ObjectId>,
        trees: HashMap<String, Vec<TreeEntry>>,
    }

    impl FakeRepo {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with(self, path: &str, content: &str) -> Self {
            self.with_bytes(path, content.as_bytes().to_vec())
        }

        pub fn with_bytes(mut self, path: &str, data: Vec<u8>) -> Self {
            let hex = format!("{:040x}", self.blobs.len() + 1);
            let id = ObjectId::from_hex(hex.as_bytes()).unwrap();
            self.blobs.insert(id, data);
            self.ids.insert(path.to_string(), id);
            self
        }

        pub fn with_tree(mut self, commit: &str, entries: Vec<TreeEntry>) -> Self {
            self.trees.insert(commit.to_string(), entries);
            self
        }
    }

    impl ObjectReader for FakeRepo {
        fn tree(&self, commit_id: &str) -> Result<Vec<TreeEntry>> {
            self.trees
                .get(commit_id)
                .cloned()
                .ok_or_else(|| GindentError::GitRepo(format!("no tree for {commit_id}")))
        }

        fn read_blob(&self, blob: &BlobEntry) -> Result<Vec<u8>> {
            self.blobs
                .get(&blob.id)
                .cloned()
                .ok_or_else(|| GindentError::GitRepo(format!("no blob {}", blob.id)))
        }
    }

    pub fn blob(repo: &FakeRepo, path: &str) -> TreeEntry {
        TreeEntry::Blob(BlobEntry {
            path: path.to_string(),
            id: repo.ids[path],
            content_type: ContentType::from_path(path),
        })
    }

    pub fn tree(path: &str, entries: Vec<TreeEntry>) -> TreeEntry {
        TreeEntry::Tree(TreeNode {
            path: path.to_string(),
            entries,
        })
    }

    /// Command line arguments with every flag left unset.
    pub fn args() -> CommonArgs {
        CommonArgs {
            config: None,
            repo: None,
            report: None,
            since: None,
            until: None,
            ignore: Vec::new(),
            min_line_length: None,
            show_deleted: false,
            no_merges: false,
            quiet: true,
        }
    }

    pub fn settings(ignored: &[&str]) -> Settings {
        let mut args = args();
        args.ignore = ignored.iter().map(|s| s.to_string()).collect();
        Settings::resolve(None, &args).unwrap()
    }

    pub fn changes(id: &str, files: &[(&str, u64, u64)]) -> CommitChanges {
        CommitChanges {
            info: CommitInfo {
                id: id.to_string(),
                timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap(),
            },
            files: files
                .iter()
                .map(|(path, ins, del)| FileChange::new(*path, *ins, *del))
                .collect(),
        }
    }

    pub fn complexity(path: &str, hist: &[u64]) -> FileComplexity {
        let stats = Histogram::from(hist.to_vec()).statistics();
        FileComplexity {
            path: path.to_string(),
            size: 0,
            content_type: ContentType::from_path(path),
            lines_total: stats.count as usize,
            lines_code: stats.count as usize,
            stats,
        }
    }
}
