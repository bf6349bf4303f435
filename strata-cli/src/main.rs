//! Strata CLI - Command line interface for per-commit repository analysis
//!
//! Mines a local git history commit by commit and prints one JSON item per
//! commit on stdout.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use strata_core::Config;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{DepsArgs, LangArgs};

/// Strata: per-commit repository snapshot analysis
#[derive(Parser, Debug)]
#[command(name = "strata")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Root directory for per-run worktrees (overrides config and env)
    #[arg(long, global = true, env = "STRATA_WORKTREE_ROOT")]
    worktree_root: Option<PathBuf>,

    /// Branch to walk instead of HEAD (overrides config and env)
    #[arg(long, global = true, env = "STRATA_BRANCH")]
    branch: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show version information
    Version,

    /// Extract an import/type graph per commit
    Deps(DepsArgs),

    /// Measure language composition or line metrics per commit
    Lang(LangArgs),

    /// Show current configuration
    Config,
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    // Load configuration with overrides
    let config = Config::load_with_overrides(cli.worktree_root.clone(), cli.branch.clone())?;

    if cli.verbose {
        tracing::info!(
            worktree_root = ?config.worktree.root,
            branch = ?config.mining.branch,
            "Configuration loaded"
        );
    }

    match cli.command {
        Some(Commands::Version) => {
            println!("strata {}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::Deps(args)) => {
            args.execute(&config)?;
        }
        Some(Commands::Lang(args)) => {
            args.execute(&config)?;
        }
        Some(Commands::Config) => {
            println!("Strata Configuration");
            println!("====================");
            println!();
            println!("Worktree Settings:");
            println!(
                "  root: {}",
                config
                    .worktree
                    .root
                    .as_deref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(temp dir)".to_string())
            );
            println!("Mining Settings:");
            println!(
                "  branch: {}",
                config.mining.branch.as_deref().unwrap_or("(HEAD)")
            );
            println!();
            if let Some(path) = Config::default_config_path() {
                println!("Config file: {}", path.display());
                if path.exists() {
                    println!("  (exists)");
                } else {
                    println!("  (not found - using defaults)");
                }
            }
        }
        None => {
            println!("Strata - per-commit repository snapshot analysis");
            println!();
            println!("Use --help for usage information");
        }
    }

    Ok(())
}
