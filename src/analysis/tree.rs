use crate::config::Settings;
use crate::error::Result;
use crate::git::{BlobEntry, ObjectReader, TreeEntry};
use crate::model::FileComplexity;
use crate::stats::{classify_bytes, Histogram};
use tracing::warn;

/// Classifies every blob of a tree that is not ignored. Blobs that are not
/// valid UTF-8 are skipped with a warning.
pub fn collect_tree_complexity<R: ObjectReader>(
    reader: &R,
    entries: &[TreeEntry],
    settings: &Settings,
) -> Result<Vec<FileComplexity>> {
    let mut result = Vec::new();
    walk(reader, entries, settings, &mut result)?;
    Ok(result)
}

fn walk<R: ObjectReader>(
    reader: &R,
    entries: &[TreeEntry],
    settings: &Settings,
    out: &mut Vec<FileComplexity>,
) -> Result<()> {
    for entry in entries {
        match entry {
            TreeEntry::Blob(blob) => {
                if settings.ignore.is_ignored(Some(&blob.path)) {
                    continue;
                }
                if let Some(complexity) = analyze_blob(reader, blob, settings)? {
                    out.push(complexity);
                }
            }
            TreeEntry::Tree(node) => walk(reader, &node.entries, settings, out)?,
        }
    }
    Ok(())
}

fn analyze_blob<R: ObjectReader>(
    reader: &R,
    blob: &BlobEntry,
    settings: &Settings,
) -> Result<Option<FileComplexity>> {
    let data = reader.read_blob(blob)?;
    let classification = match classify_bytes(&data, blob.content_type, &settings.line_filter) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to decode file {}, skipping: {e}", blob.path);
            return Ok(None);
        }
    };

    let stats = Histogram::from_depths(classification.depths.iter().copied()).statistics();
    Ok(Some(FileComplexity {
        path: blob.path.clone(),
        size: data.len() as u64,
        content_type: blob.content_type,
        lines_total: classification.lines_total,
        lines_code: classification.lines_code,
        stats,
    }))
}
