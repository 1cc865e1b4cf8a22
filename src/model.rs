use crate::stats::{ContentType, DepthStatistics};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const SCHEMA_VERSION: u32 = 1;

pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitInfo {
    pub id: String,
    pub timestamp: DateTime<Utc>,
}

/// Line counts for one path touched by a commit. Renamed paths use git's
/// `old => new` / `dir/{old => new}` syntax.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChange {
    pub path: String,
    pub insertions: u64,
    pub deletions: u64,
    pub lines: u64,
}

impl FileChange {
    pub fn new(path: impl Into<String>, insertions: u64, deletions: u64) -> Self {
        Self {
            path: path.into(),
            insertions,
            deletions,
            lines: insertions + deletions,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitChanges {
    pub info: CommitInfo,
    pub files: Vec<FileChange>,
}

/// Complexity of one blob in a commit's tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileComplexity {
    pub path: String,
    pub size: u64,
    pub content_type: ContentType,
    pub lines_total: usize,
    pub lines_code: usize,
    pub stats: DepthStatistics,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(pub usize);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplexitySnapshot {
    pub commit: String,
    pub lines_total: usize,
    pub lines_code: usize,
    pub stats: DepthStatistics,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    pub id: FileId,
    /// Most recent path the file is known by.
    pub name: String,
    pub commits: u64,
    pub lines: u64,
    pub insertions: u64,
    pub deletions: u64,
    /// No complexity could be computed for at least one revision touching it.
    pub deleted: bool,
    /// Newest first.
    pub complexity: Vec<ComplexitySnapshot>,
}

impl FileRecord {
    pub fn new(id: FileId, name: String) -> Self {
        Self {
            id,
            name,
            commits: 0,
            lines: 0,
            insertions: 0,
            deletions: 0,
            deleted: false,
            complexity: Vec::new(),
        }
    }

    pub fn add_change(&mut self, change: &FileChange) {
        self.commits += 1;
        self.lines += change.lines;
        self.insertions += change.insertions;
        self.deletions += change.deletions;
    }

    pub fn latest(&self) -> Option<&ComplexitySnapshot> {
        self.complexity.first()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitRecord {
    pub commit: String,
    pub timestamp: DateTime<Utc>,
    pub date: String,
    pub stats: DepthStatistics,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilesOutput {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub repository_path: String,
    pub since: Option<String>,
    pub until: Option<String>,
    pub files: Vec<FileRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitsOutput {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub repository_path: String,
    pub since: Option<String>,
    pub until: Option<String>,
    pub commits: Vec<CommitRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRange {
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn new() -> Self {
        Self { since: None, until: None }
    }

    pub fn with_since(mut self, since: DateTime<Utc>) -> Self {
        self.since = Some(since);
        self
    }

    pub fn with_until(mut self, until: DateTime<Utc>) -> Self {
        self.until = Some(until);
        self
    }

    pub fn contains(&self, timestamp: &DateTime<Utc>) -> bool {
        if let Some(since) = self.since {
            if timestamp < &since {
                return false;
            }
        }
        if let Some(until) = self.until {
            if timestamp > &until {
                return false;
            }
        }
        true
    }
}

impl Default for DateRange {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn date_range_bounds_are_inclusive() {
        let since = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let until = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        let range = DateRange::new().with_since(since).with_until(until);

        assert!(range.contains(&since));
        assert!(range.contains(&until));
        assert!(!range.contains(&Utc.with_ymd_and_hms(2023, 12, 31, 23, 59, 59).unwrap()));
        assert!(!range.contains(&Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 1).unwrap()));
        assert!(DateRange::default().contains(&since));
    }

    #[test]
    fn file_record_accumulates_changes_as_given() {
        let mut record = FileRecord::new(FileId(0), "a.py".into());
        record.add_change(&FileChange::new("a.py", 10, 2));
        record.add_change(&FileChange {
            path: "a.py".into(),
            insertions: 1,
            deletions: 1,
            lines: 5,
        });
        assert_eq!(record.commits, 2);
        assert_eq!(record.insertions, 11);
        assert_eq!(record.deletions, 3);
        assert_eq!(record.lines, 17);
    }
}
