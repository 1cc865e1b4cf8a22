use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

const DOC_DELIMITERS: [&str; 2] = ["\"\"\"", "'''"];

/// Content type of a blob, as far as the classifier cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Python,
    Other,
}

impl ContentType {
    pub fn from_path(path: &str) -> Self {
        match Path::new(path).extension().and_then(|e| e.to_str()) {
            Some(ext) if matches!(ext.to_ascii_lowercase().as_str(), "py" | "pyw" | "pyi") => {
                ContentType::Python
            }
            _ => ContentType::Other,
        }
    }
}

/// Which lines count as code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineFilter {
    /// Lines whose trimmed length is at most this value are dropped.
    pub min_line_length: usize,
}

impl Default for LineFilter {
    fn default() -> Self {
        Self { min_line_length: 1 }
    }
}

impl LineFilter {
    fn is_significant(&self, line: &str) -> bool {
        line.trim().chars().count() > self.min_line_length
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub depths: Vec<usize>,
    pub lines_total: usize,
    pub lines_code: usize,
}

#[derive(Error, Debug)]
#[error("content is not valid UTF-8: {0}")]
pub struct DecodeError(#[from] std::str::Utf8Error);

pub fn classify_bytes(
    data: &[u8],
    content_type: ContentType,
    filter: &LineFilter,
) -> Result<Classification, DecodeError> {
    let text = std::str::from_utf8(data)?;
    Ok(classify(text, content_type, filter))
}

pub fn classify(text: &str, content_type: ContentType, filter: &LineFilter) -> Classification {
    let lines: Vec<&str> = text.split('\n').collect();
    let lines_total = lines.len();

    let significant = lines.into_iter().filter(|l| filter.is_significant(l));
    let code: Vec<&str> = match content_type {
        ContentType::Python => strip_docstrings(significant),
        ContentType::Other => significant.collect(),
    };

    Classification {
        lines_total,
        lines_code: code.len(),
        depths: code.iter().map(|l| indent_depth(l)).collect(),
    }
}

/// Number of leading whitespace characters.
pub fn indent_depth(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

fn strip_docstrings<'a, I>(lines: I) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut kept = Vec::new();
    let mut expecting = true;
    let mut open: Option<&'static str> = None;

    for line in lines {
        let trimmed = line.trim();

        if let Some(delim) = open {
            if trimmed.ends_with(delim) {
                open = None;
            }
            continue;
        }

        if expecting && line.starts_with("#!") {
            continue;
        }

        if expecting {
            if let Some(delim) = DOC_DELIMITERS.iter().find(|d| trimmed.starts_with(**d)) {
                expecting = false;
                if trimmed == *delim || !trimmed.ends_with(delim) {
                    open = Some(*delim);
                }
                continue;
            }
        }

        kept.push(line);
        if trimmed.starts_with("def ") || trimmed.starts_with("class ") {
            expecting = true;
        }
    }

    kept
}
