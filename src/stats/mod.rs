pub mod classify;
pub mod histogram;

pub use classify::{classify, classify_bytes, Classification, ContentType, DecodeError, LineFilter};
pub use histogram::{DepthStatistics, Histogram};
