//! Indentation-based complexity tracking over git history.
//!
//! Every commit's tree is classified once: each text blob is split into
//! lines, leading whitespace is measured, and the resulting depth histograms
//! are merged per file and per commit.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;
pub mod git;
pub mod model;
pub mod report;
pub mod stats;
pub mod util;
