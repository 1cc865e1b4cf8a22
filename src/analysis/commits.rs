use crate::model::{CommitInfo, CommitRecord, FileComplexity, DATE_FORMAT};
use crate::stats::Histogram;

/// Merges the histograms of every file in a commit's tree and reduces the
/// result to one statistics snapshot.
pub fn commit_record(info: &CommitInfo, tree: &[FileComplexity]) -> CommitRecord {
    let merged: Histogram = tree.iter().map(|item| item.stats.hist.clone()).collect();

    CommitRecord {
        commit: info.id.clone(),
        timestamp: info.timestamp,
        date: info.timestamp.format(DATE_FORMAT).to_string(),
        stats: merged.statistics(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::testing::{changes, complexity};

    #[test]
    fn merges_all_files_of_the_tree() {
        let commit = changes("abc", &[]);
        let tree = vec![complexity("a.rs", &[1, 2, 3]), complexity("b.rs", &[1, 2])];

        let record = commit_record(&commit.info, &tree);
        assert_eq!(record.commit, "abc");
        assert_eq!(record.stats.hist.as_slice(), &[2, 4, 3]);
        assert_eq!(record.stats.count, 9);
        assert_eq!(record.stats.max_depth, 3);
        assert_eq!(record.date, "2024-03-01 12:30:00");
    }

    #[test]
    fn empty_tree_has_no_average() {
        let commit = changes("abc", &[]);
        let record = commit_record(&commit.info, &[]);
        assert_eq!(record.stats.count, 0);
        assert_eq!(record.stats.average, None);
        assert_eq!(record.stats.stddev, None);
    }
}
