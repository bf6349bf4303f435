//! CLI command implementations

mod deps;
mod lang;

pub use deps::DepsArgs;
pub use lang::LangArgs;

use std::path::PathBuf;

use chrono::{DateTime, FixedOffset};
use clap::Args;
use strata_core::{CommitLog, Config, RepositorySource, ResultItem};

/// Arguments shared by every mining subcommand
#[derive(Args, Debug)]
pub struct MiningArgs {
    /// Origin URI recorded in every produced item
    pub uri: String,

    /// Path to the local bare (or mirrored) history
    pub git_path: PathBuf,

    /// Category to fetch (backend default when omitted)
    #[arg(short, long)]
    pub category: Option<String>,

    /// Sub-path scoping the analysis
    #[arg(short, long)]
    pub entrypoint: Option<PathBuf>,

    /// Produce the detailed breakdown (requires --entrypoint)
    #[arg(short, long)]
    pub details: bool,

    /// Only process commits from this date on (RFC 3339)
    #[arg(long)]
    pub since: Option<String>,
}

impl MiningArgs {
    pub fn source(&self) -> strata_core::Result<RepositorySource> {
        RepositorySource::new(&self.uri, &self.git_path)
    }

    pub fn commit_log(&self, config: &Config) -> anyhow::Result<CommitLog> {
        let source = self.source()?;
        let mut log = CommitLog::new(&source);
        if let Some(ref branch) = config.mining.branch {
            log = log.with_branch(branch);
        }
        if let Some(ref since) = self.since {
            let since: DateTime<FixedOffset> = DateTime::parse_from_rfc3339(since)
                .map_err(|e| anyhow::anyhow!("invalid --since '{}': {}", since, e))?;
            log = log.with_since(since);
        }
        Ok(log)
    }

    pub fn options(&self) -> strata_core::AnalyzerOptions {
        strata_core::AnalyzerOptions {
            entrypoint: self.entrypoint.clone(),
            details: self.details,
        }
    }
}

/// Print one item as a JSON line on stdout
pub fn emit(item: &ResultItem) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string(item)?);
    Ok(())
}
