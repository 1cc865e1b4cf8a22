pub mod commits;
pub mod files;
pub mod xlsx;

use crate::analysis::{self, Analysis};
use crate::cli::CommonArgs;
use crate::config::Settings;
use crate::git::GitRepo;
use crate::stats::DepthStatistics;
use anyhow::Context;
use console::style;
use tracing::error;

/// Composite ranking score: `max_depth + stddev * 10 + average * 5`, with
/// missing values counted as zero.
pub fn complexity_score(stats: &DepthStatistics) -> f64 {
    stats.max_depth as f64 + stats.stddev.unwrap_or(0.0) * 10.0 + stats.average.unwrap_or(0.0) * 5.0
}

pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Loads settings, opens the repository and runs the analysis.
pub(crate) fn prepare(common: &CommonArgs, show_progress: bool) -> anyhow::Result<(GitRepo, Settings, Analysis)> {
    let settings = Settings::from_args(common).context("Failed to load settings")?;
    let repo = GitRepo::open(Some(&settings.repository)).context("Failed to open git repository")?;
    let analysis = analysis::run(&repo, &settings, show_progress && !common.quiet)?;
    Ok((repo, settings, analysis))
}

pub fn exec(common: CommonArgs) -> anyhow::Result<()> {
    let (_repo, settings, analysis) = prepare(&common, true)?;

    if !common.quiet {
        println!("Writing Excel report...");
    }
    // The analysis is done at this point; a report that cannot be written is
    // reported but does not fail the run.
    match xlsx::write_report(&settings.report, &analysis, settings.show_deleted_files) {
        Ok(()) => {
            if !common.quiet {
                println!("{} {}", style("Report written to").green(), settings.report.display());
            }
        }
        Err(e) => {
            error!("Report not written: {e}");
            eprintln!("{} {e}", style("Report not written:").red().bold());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::Histogram;

    #[test]
    fn score_treats_missing_values_as_zero() {
        assert_eq!(complexity_score(&Histogram::new().statistics()), 0.0);
        assert_eq!(complexity_score(&Histogram::from(vec![0, 0]).statistics()), 2.0);
    }

    #[test]
    fn score_combines_depth_spread_and_mean() {
        let stats = Histogram::from(vec![1, 2, 3]).statistics();
        let expected = 3.0 + stats.stddev.unwrap() * 10.0 + stats.average.unwrap() * 5.0;
        assert_eq!(complexity_score(&stats), expected);
        assert_eq!(round3(complexity_score(&stats)), 22.12);
    }
}
