use crate::model::{CommitChanges, ComplexitySnapshot, FileComplexity, FileId, FileRecord};
use crate::util::{split_rename, IgnoreList};
use std::collections::HashMap;

/// Per-file history across the commit walk.
///
/// Every file gets a stable [`FileId`] the first time it is seen. Paths are
/// aliases pointing at an id, so following a rename only moves an alias and
/// never copies or drops a record.
#[derive(Debug, Default)]
pub struct FileLedger {
    records: Vec<FileRecord>,
    aliases: HashMap<String, FileId>,
}

impl FileLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one commit into the ledger. Commits must arrive newest first, so
    /// a rename `old => new` is seen after the history recorded under `new`.
    pub fn record_commit(&mut self, commit: &CommitChanges, tree: &[FileComplexity], ignore: &IgnoreList) {
        for change in &commit.files {
            let (old_name, new_name) = split_rename(&change.path);
            if ignore.is_ignored(Some(&old_name)) || ignore.is_ignored(Some(&new_name)) {
                continue;
            }

            let id = self.resolve(&old_name, &new_name);
            let record = &mut self.records[id.0];
            record.add_change(change);

            match tree.iter().find(|item| item.path == new_name) {
                Some(item) => record.complexity.push(ComplexitySnapshot {
                    commit: commit.info.id.clone(),
                    lines_total: item.lines_total,
                    lines_code: item.lines_code,
                    stats: item.stats.clone(),
                }),
                None => record.deleted = true,
            }
        }
    }

    fn resolve(&mut self, old_name: &str, new_name: &str) -> FileId {
        let id = match self.aliases.get(new_name) {
            Some(&id) => id,
            None => self.insert(new_name),
        };

        if old_name != new_name {
            self.aliases.remove(new_name);
            self.aliases.insert(old_name.to_string(), id);
        }
        id
    }

    fn insert(&mut self, name: &str) -> FileId {
        let id = FileId(self.records.len());
        self.records.push(FileRecord::new(id, name.to_string()));
        self.aliases.insert(name.to_string(), id);
        id
    }

    pub fn get(&self, path: &str) -> Option<&FileRecord> {
        self.aliases.get(path).map(|id| &self.records[id.0])
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records sorted by name, then by id.
    pub fn into_records(self) -> Vec<FileRecord> {
        let mut records = self.records;
        records.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        records
    }
}
