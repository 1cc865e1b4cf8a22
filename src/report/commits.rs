use super::files::fmt_optional;
use super::{complexity_score, prepare};
use crate::cli::CommonArgs;
use crate::config::Settings;
use crate::git::GitRepo;
use crate::model::{CommitRecord, CommitsOutput, SCHEMA_VERSION};
use anyhow::Result;
use chrono::Utc;
use console::style;

pub fn exec(common: CommonArgs, json: bool, ndjson: bool) -> Result<()> {
    let (repo, settings, analysis) = prepare(&common, !(json || ndjson))?;

    if json {
        output_json(&analysis.commits, &repo, &settings)?;
    } else if ndjson {
        output_ndjson(&analysis.commits)?;
    } else {
        output_table(&analysis.commits)?;
    }
    Ok(())
}

fn output_json(commits: &[CommitRecord], repo: &GitRepo, settings: &Settings) -> Result<()> {
    let output = CommitsOutput {
        version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        repository_path: repo.path().to_string_lossy().to_string(),
        since: settings.since.clone(),
        until: settings.until.clone(),
        commits: commits.to_vec(),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn output_ndjson(commits: &[CommitRecord]) -> Result<()> {
    for commit in commits {
        println!("{}", serde_json::to_string(commit)?);
    }
    Ok(())
}

fn output_table(commits: &[CommitRecord]) -> Result<()> {
    if commits.is_empty() {
        println!("No commits to display");
        return Ok(());
    }

    println!(
        "{:<10} {:<19} {:>10} {:>8} {:>8} {:>5} {:>10}",
        style("Commit").bold(),
        style("Date").bold(),
        style("Code lines").bold(),
        style("Avg").bold(),
        style("Stddev").bold(),
        style("Max").bold(),
        style("Complexity").bold()
    );
    println!("{}", "─".repeat(76));

    for record in commits {
        let stats = &record.stats;
        let short: String = record.commit.chars().take(8).collect();
        println!(
            "{:<10} {:<19} {:>10} {:>8} {:>8} {:>5} {:>10.3}",
            style(short).yellow(),
            record.date,
            stats.count,
            fmt_optional(stats.average),
            fmt_optional(stats.stddev),
            stats.max_depth,
            complexity_score(stats)
        );
    }
    Ok(())
}
