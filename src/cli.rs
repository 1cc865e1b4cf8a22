use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gindent")]
#[command(about = "Track indentation-based code complexity across git history")]
#[command(version)]
pub struct Cli {
    #[clap(flatten)]
    pub common: CommonArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Clone, Debug)]
pub struct CommonArgs {
    #[arg(long, global = true, help = "Path to settings file (default: ./gindent.toml when present)")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Path to git repository")]
    pub repo: Option<PathBuf>,

    #[arg(long, global = true, help = "Path of the generated spreadsheet")]
    pub report: Option<PathBuf>,

    #[arg(long, global = true, help = "Start from this commit or date (RFC3339, YYYY-MM-DD, or natural language)")]
    pub since: Option<String>,

    #[arg(long, global = true, help = "End at this commit or date (RFC3339, YYYY-MM-DD, or natural language)")]
    pub until: Option<String>,

    #[arg(long = "ignore", global = true, help = "Regular expression for paths to leave out (repeatable)")]
    pub ignore: Vec<String>,

    #[arg(long, global = true, help = "Lines whose trimmed length is at most this are not code")]
    pub min_line_length: Option<usize>,

    #[arg(long, global = true, help = "Also list files whose complexity could not be computed")]
    pub show_deleted: bool,

    #[arg(long, global = true, help = "Skip merge commits")]
    pub no_merges: bool,

    #[arg(long, short, global = true, help = "Hide progress output")]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write the xlsx report
    Report,
    /// Per-file complexity history
    Files {
        #[arg(long, help = "Output as JSON")]
        json: bool,

        #[arg(long, help = "Output as NDJSON")]
        ndjson: bool,
    },
    /// Aggregate complexity per commit
    Commits {
        #[arg(long, help = "Output as JSON")]
        json: bool,

        #[arg(long, help = "Output as NDJSON")]
        ndjson: bool,
    },
    /// Write a default settings file
    Init {
        #[arg(long, help = "Overwrite an existing settings file")]
        force: bool,
    },
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn execute(self) -> Result<()> {
        match self.command {
            Commands::Report => crate::report::exec(self.common),
            Commands::Files { json, ndjson } => crate::report::files::exec(self.common, json, ndjson),
            Commands::Commits { json, ndjson } => crate::report::commits::exec(self.common, json, ndjson),
            Commands::Init { force } => init(&self.common, force),
        }
    }
}

fn init(common: &CommonArgs, force: bool) -> Result<()> {
    let path = common
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(crate::config::DEFAULT_CONFIG_FILE));
    if path.exists() && !force {
        anyhow::bail!("{} already exists, use --force to overwrite", path.display());
    }
    std::fs::write(&path, crate::config::generate_default_config())?;
    println!("Wrote {}", path.display());
    Ok(())
}
