pub mod repo;
pub mod tree;

pub use repo::GitRepo;
pub use tree::{BlobEntry, ObjectReader, TreeEntry, TreeNode};
