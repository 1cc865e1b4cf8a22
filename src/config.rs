//! Settings for a run.
//!
//! Values come from a TOML settings file (`gindent.toml` by default) and are
//! then overridden by command line flags. The result is one immutable
//! [`Settings`] value handed to every stage by reference.

use crate::cli::CommonArgs;
use crate::error::{GindentError, Result};
use crate::stats::LineFilter;
use crate::util::IgnoreList;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const DEFAULT_CONFIG_FILE: &str = "gindent.toml";
pub const DEFAULT_REPORT_FILE: &str = "gindent.xlsx";

/// On-disk settings file. `path`, `ignored_files` and `report` are required.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SettingsFile {
    pub path: PathBuf,
    pub ignored_files: Vec<String>,
    pub report: PathBuf,
    pub since: Option<String>,
    pub until: Option<String>,
    #[serde(default)]
    pub show_deleted_files: bool,
    #[serde(default = "default_min_line_length")]
    pub min_line_length: usize,
    #[serde(default = "default_include_merges")]
    pub include_merges: bool,
}

fn default_min_line_length() -> usize {
    LineFilter::default().min_line_length
}

fn default_include_merges() -> bool {
    true
}

impl SettingsFile {
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            GindentError::Config(format!("Cannot read settings file {}: {e}", path.display()))
        })?;
        Self::parse(&content).map_err(|e| {
            GindentError::Config(format!("Cannot parse the settings file {}: {e}", path.display()))
        })
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub repository: PathBuf,
    pub report: PathBuf,
    pub ignore: IgnoreList,
    pub line_filter: LineFilter,
    pub since: Option<String>,
    pub until: Option<String>,
    pub show_deleted_files: bool,
    pub include_merges: bool,
}

impl Settings {
    /// Loads the settings file named by `--config` (or the default one when
    /// present) and applies command line overrides.
    pub fn from_args(args: &CommonArgs) -> Result<Self> {
        let file = match &args.config {
            Some(path) => Some(SettingsFile::load(path)?),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.is_file() {
                    info!("Loading settings from {}", default.display());
                    Some(SettingsFile::load(default)?)
                } else {
                    debug!("No settings file, using command line values only");
                    None
                }
            }
        };
        Self::resolve(file, args)
    }

    pub fn resolve(file: Option<SettingsFile>, args: &CommonArgs) -> Result<Self> {
        let file = file.unwrap_or_else(|| SettingsFile {
            path: PathBuf::from("."),
            ignored_files: Vec::new(),
            report: PathBuf::from(DEFAULT_REPORT_FILE),
            since: None,
            until: None,
            show_deleted_files: false,
            min_line_length: default_min_line_length(),
            include_merges: default_include_merges(),
        });

        let mut ignored_files = file.ignored_files;
        ignored_files.extend(args.ignore.iter().cloned());
        let ignore = IgnoreList::new(&ignored_files)?;

        Ok(Self {
            repository: args.repo.clone().unwrap_or(file.path),
            report: args.report.clone().unwrap_or(file.report),
            ignore,
            line_filter: LineFilter {
                min_line_length: args.min_line_length.unwrap_or(file.min_line_length),
            },
            since: args.since.clone().or(file.since),
            until: args.until.clone().or(file.until),
            show_deleted_files: args.show_deleted || file.show_deleted_files,
            include_merges: file.include_merges && !args.no_merges,
        })
    }
}

/// Content written by `gindent init`.
pub fn generate_default_config() -> String {
    r#"# gindent settings

# Repository to analyse
path = "."

# Regular expressions; a path matching any of them is left out everywhere
ignored_files = ["^docs/", "\\.lock$"]

# Spreadsheet written by `gindent report`
report = "gindent.xlsx"

# Only commits on or after this date / revision / duration ("90 days ago")
# since = "2024-01-01"
# until = "2024-12-31"

# List files whose complexity could not be computed for some revision
show_deleted_files = false

# Lines whose trimmed length is at most this many characters are not code
min_line_length = 1

# Include merge commits
include_merges = true
"#
    .to_string()
}
