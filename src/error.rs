use thiserror::Error;

pub type Result<T> = std::result::Result<T, GindentError>;

#[derive(Error, Debug)]
pub enum GindentError {
    #[error("Git repository error: {0}")]
    GitRepo(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Report error: {0}")]
    Report(#[from] rust_xlsxwriter::XlsxError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Object find error: {0}")]
    ObjectFind(#[from] Box<gix::object::find::existing::Error>),
    #[error("Commit error: {0}")]
    Commit(#[from] Box<gix::object::commit::Error>),
    #[error("Reference find error: {0}")]
    RefFind(#[from] Box<gix::reference::find::existing::Error>),
    #[error("Head peel error: {0}")]
    HeadPeel(#[from] Box<gix::head::peel::to_commit::Error>),
    #[error("Object find with conversion error: {0}")]
    ObjectFindConv(#[from] Box<gix::object::find::existing::with_conversion::Error>),
    #[error("Object decode error: {0}")]
    ObjectDecode(#[from] Box<gix::objs::decode::Error>),
    #[error("Diff tree to tree error: {0}")]
    DiffTreeToTree(#[from] Box<gix::repository::diff_tree_to_tree::Error>),
    #[error("Git discover error: {0}")]
    GitDiscover(#[from] Box<gix::discover::Error>),
}

// gix errors are large; keep them boxed so `Result` stays small
impl From<gix::object::find::existing::Error> for GindentError {
    fn from(err: gix::object::find::existing::Error) -> Self {
        GindentError::ObjectFind(Box::new(err))
    }
}

impl From<gix::object::commit::Error> for GindentError {
    fn from(err: gix::object::commit::Error) -> Self {
        GindentError::Commit(Box::new(err))
    }
}

impl From<gix::reference::find::existing::Error> for GindentError {
    fn from(err: gix::reference::find::existing::Error) -> Self {
        GindentError::RefFind(Box::new(err))
    }
}

impl From<gix::head::peel::to_commit::Error> for GindentError {
    fn from(err: gix::head::peel::to_commit::Error) -> Self {
        GindentError::HeadPeel(Box::new(err))
    }
}

impl From<gix::object::find::existing::with_conversion::Error> for GindentError {
    fn from(err: gix::object::find::existing::with_conversion::Error) -> Self {
        GindentError::ObjectFindConv(Box::new(err))
    }
}

impl From<gix::objs::decode::Error> for GindentError {
    fn from(err: gix::objs::decode::Error) -> Self {
        GindentError::ObjectDecode(Box::new(err))
    }
}

impl From<gix::repository::diff_tree_to_tree::Error> for GindentError {
    fn from(err: gix::repository::diff_tree_to_tree::Error) -> Self {
        GindentError::DiffTreeToTree(Box::new(err))
    }
}

impl From<gix::discover::Error> for GindentError {
    fn from(err: gix::discover::Error) -> Self {
        GindentError::GitDiscover(Box::new(err))
    }
}

impl From<toml::de::Error> for GindentError {
    fn from(err: toml::de::Error) -> Self {
        GindentError::Config(err.to_string())
    }
}
