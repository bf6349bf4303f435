//! Strata Core - Per-commit repository snapshot analysis
//!
//! This crate provides the machinery to mine a local git history commit by
//! commit: it enumerates the commit log, materializes each commit into a
//! disposable worktree, runs a pluggable analyzer over the snapshot and
//! yields one normalized result item per commit.

pub mod analyzer;
pub mod commit;
pub mod config;
pub mod error;
pub mod item;
pub mod pipeline;
pub mod repo;
pub mod worktree;

pub use analyzer::{resolve_category, AnalysisBackend, Analyzer, AnalyzerOptions};
pub use commit::{CommitDescriptor, CommitLog, CommitSource};
pub use config::Config;
pub use error::{Error, Result};
pub use item::ResultItem;
pub use pipeline::{Fetch, SnapshotPipeline};
pub use repo::RepositorySource;
pub use worktree::WorktreeManager;
