use super::{complexity_score, prepare};
use crate::cli::CommonArgs;
use crate::config::Settings;
use crate::git::GitRepo;
use crate::model::{FileRecord, FilesOutput, SCHEMA_VERSION};
use anyhow::Result;
use chrono::Utc;
use console::style;

const TABLE_ROWS: usize = 50;
const NAME_WIDTH: usize = 50;
const DELETED_MARKER: &str = " (deleted)";

pub fn exec(common: CommonArgs, json: bool, ndjson: bool) -> Result<()> {
    let (repo, settings, analysis) = prepare(&common, !(json || ndjson))?;
    let files: Vec<FileRecord> = analysis
        .files
        .into_iter()
        .filter(|f| settings.show_deleted_files || !f.deleted)
        .collect();

    if json {
        output_json(&files, &repo, &settings)?;
    } else if ndjson {
        output_ndjson(&files)?;
    } else {
        output_table(&files, settings.show_deleted_files)?;
    }
    Ok(())
}

fn output_json(files: &[FileRecord], repo: &GitRepo, settings: &Settings) -> Result<()> {
    let output = FilesOutput {
        version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        repository_path: repo.path().to_string_lossy().to_string(),
        since: settings.since.clone(),
        until: settings.until.clone(),
        files: files.to_vec(),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn output_ndjson(files: &[FileRecord]) -> Result<()> {
    for file in files {
        println!("{}", serde_json::to_string(file)?);
    }
    Ok(())
}

fn output_table(files: &[FileRecord], show_deleted: bool) -> Result<()> {
    let mut ranked: Vec<(&FileRecord, f64)> = files
        .iter()
        .map(|f| (f, f.latest().map_or(0.0, |s| complexity_score(&s.stats))))
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.name.cmp(&b.0.name)));

    println!(
        "{:<50} {:>9} {:>10} {:>10} {:>10} {:>6} {:>10}",
        style("File").bold(),
        style("Revisions").bold(),
        style("Code lines").bold(),
        style("Avg").bold(),
        style("Stddev").bold(),
        style("Max").bold(),
        style("Complexity").bold()
    );
    println!("{}", "─".repeat(111));

    for (file, score) in ranked.iter().take(TABLE_ROWS) {
        let latest = file.latest();
        println!(
            "{} {:>9} {:>10} {:>10} {:>10} {:>6} {:>10.3}",
            name_cell(&file.name, show_deleted && file.deleted),
            file.commits,
            latest.map_or(String::from("-"), |s| s.lines_code.to_string()),
            fmt_optional(latest.and_then(|s| s.stats.average)),
            fmt_optional(latest.and_then(|s| s.stats.stddev)),
            latest.map_or(String::from("-"), |s| s.stats.max_depth.to_string()),
            score
        );
    }
    if ranked.len() > TABLE_ROWS {
        println!("\n... and {} more files", ranked.len() - TABLE_ROWS);
    }
    Ok(())
}

/// File name padded to the column width. Padding is computed on the plain
/// text so the styled marker does not shift the following columns.
fn name_cell(name: &str, deleted: bool) -> String {
    if !deleted {
        return format!("{name:<NAME_WIDTH$}");
    }
    let used = name.chars().count() + DELETED_MARKER.len();
    let pad = NAME_WIDTH.saturating_sub(used);
    format!("{name}{}{}", style(DELETED_MARKER).dim(), " ".repeat(pad))
}

pub(crate) fn fmt_optional(value: Option<f64>) -> String {
    value.map_or_else(|| String::from("-"), |v| format!("{v:.3}"))
}
