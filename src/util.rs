use crate::error::{GindentError, Result};
use regex::Regex;
use std::sync::LazyLock;

static RENAME_MARKER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r".+ => .+").unwrap());
static RENAME_CURLY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<before>.*)\{(?P<old>.*) => (?P<new>.*)\}(?P<after>.*)$").unwrap()
});
static RENAME_SIMPLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?P<old>.+) => (?P<new>.+)$").unwrap());

/// Splits a git rename path (`a => b` or `dir/{a => b}/file`) into its old and
/// new names. Paths without a rename come back unchanged on both sides.
pub fn split_rename(path: &str) -> (String, String) {
    if !RENAME_MARKER.is_match(path) {
        return (path.to_string(), path.to_string());
    }

    if let Some(caps) = RENAME_CURLY.captures(path) {
        let before = &caps["before"];
        let after = &caps["after"];
        return (
            join_rename_part(before, &caps["old"], after),
            join_rename_part(before, &caps["new"], after),
        );
    }

    match RENAME_SIMPLE.captures(path) {
        Some(caps) => (caps["old"].to_string(), caps["new"].to_string()),
        None => (path.to_string(), path.to_string()),
    }
}

fn join_rename_part(before: &str, middle: &str, after: &str) -> String {
    // `src/{ => sub}/a.rs` leaves an empty middle and a doubled slash
    if middle.is_empty() && before.ends_with('/') && after.starts_with('/') {
        format!("{before}{}", &after[1..])
    } else {
        format!("{before}{middle}{after}")
    }
}

/// Formats a rename the way `git diff --stat` does, factoring out the common
/// leading directories and trailing path components.
pub fn format_rename(old: &str, new: &str) -> String {
    if old == new {
        return old.to_string();
    }

    let prefix = old
        .char_indices()
        .zip(new.chars())
        .take_while(|((_, a), b)| a == b)
        .filter(|((_, a), _)| *a == '/')
        .map(|((i, _), _)| i + 1)
        .last()
        .unwrap_or(0);

    let old_rest = &old[prefix..];
    let new_rest = &new[prefix..];
    let suffix = old_rest
        .char_indices()
        .rev()
        .zip(new_rest.chars().rev())
        .take_while(|((_, a), b)| a == b)
        .filter(|((_, a), _)| *a == '/')
        .map(|((i, _), _)| old_rest.len() - i)
        .last()
        .unwrap_or(0);

    if prefix == 0 && suffix == 0 {
        return format!("{old} => {new}");
    }

    let suffix = suffix.min(old_rest.len()).min(new_rest.len());
    format!(
        "{}{{{} => {}}}{}",
        &old[..prefix],
        &old_rest[..old_rest.len() - suffix],
        &new_rest[..new_rest.len() - suffix],
        &old_rest[old_rest.len() - suffix..]
    )
}

/// Regular expressions excluding paths from every statistic.
#[derive(Debug, Clone, Default)]
pub struct IgnoreList {
    patterns: Vec<Regex>,
}

impl IgnoreList {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|p| {
                Regex::new(p.as_ref()).map_err(|e| {
                    GindentError::Config(format!("Invalid ignore pattern '{}': {e}", p.as_ref()))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    /// True when any pattern matches somewhere in `path`. A missing path never
    /// matches.
    pub fn is_ignored(&self, path: Option<&str>) -> bool {
        match path {
            Some(p) => self.patterns.iter().any(|re| re.is_match(p)),
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
