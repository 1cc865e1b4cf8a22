use super::GitRepo;
use crate::error::{GindentError, Result};
use crate::stats::ContentType;
use gix::objs::tree::EntryKind;
use gix::ObjectId;

/// A file in a commit's tree. Content is read on demand through an
/// [`ObjectReader`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobEntry {
    pub path: String,
    pub id: ObjectId,
    pub content_type: ContentType,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub path: String,
    pub entries: Vec<TreeEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeEntry {
    Blob(BlobEntry),
    Tree(TreeNode),
}

/// Access to the trees and blobs of a history.
pub trait ObjectReader {
    fn tree(&self, commit_id: &str) -> Result<Vec<TreeEntry>>;

    fn read_blob(&self, blob: &BlobEntry) -> Result<Vec<u8>>;
}

impl ObjectReader for GitRepo {
    fn tree(&self, commit_id: &str) -> Result<Vec<TreeEntry>> {
        self.commit_tree(commit_id)
    }

    fn read_blob(&self, blob: &BlobEntry) -> Result<Vec<u8>> {
        self.blob_data(blob.id)
    }
}

impl GitRepo {
    /// Top-level entries of the tree of `commit_id`, subtrees expanded.
    /// Submodules and symlinks are left out.
    pub fn commit_tree(&self, commit_id: &str) -> Result<Vec<TreeEntry>> {
        let oid = ObjectId::from_hex(commit_id.as_bytes())
            .map_err(|e| GindentError::Parse(format!("Invalid commit ID: {e}")))?;
        let tree_id = self.repo.find_commit(oid)?.tree_id()?.detach();
        self.read_tree(tree_id, "")
    }

    fn read_tree(&self, tree_id: ObjectId, prefix: &str) -> Result<Vec<TreeEntry>> {
        let tree = self
            .repo
            .find_object(tree_id)?
            .try_into_tree()
            .map_err(|e| GindentError::GitRepo(format!("Expected tree {tree_id}: {e}")))?;

        let children: Vec<(EntryKind, String, ObjectId)> = tree
            .decode()?
            .entries
            .iter()
            .map(|entry| {
                let path = if prefix.is_empty() {
                    entry.filename.to_string()
                } else {
                    format!("{prefix}/{}", entry.filename)
                };
                (entry.mode.kind(), path, entry.oid.to_owned())
            })
            .collect();

        let mut entries = Vec::with_capacity(children.len());
        for (kind, path, id) in children {
            match kind {
                EntryKind::Tree => {
                    let nested = self.read_tree(id, &path)?;
                    entries.push(TreeEntry::Tree(TreeNode { path, entries: nested }));
                }
                EntryKind::Blob | EntryKind::BlobExecutable => {
                    let content_type = ContentType::from_path(&path);
                    entries.push(TreeEntry::Blob(BlobEntry { path, id, content_type }));
                }
                EntryKind::Link | EntryKind::Commit => {}
            }
        }
        Ok(entries)
    }
}
