//! Error types for Strata

use thiserror::Error;

/// Result type alias for Strata operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for Strata operations
///
/// Callers are expected to branch on the variant: configuration problems are
/// caller mistakes, checkout and analysis failures are fatal for the run in
/// which they occur and are never retried internally.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid construction-time or fetch-time arguments: unknown category,
    /// illegal parameter combination, unusable worktree root. Raised before
    /// any worktree is created.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The requested commit could not be materialized into a worktree.
    #[error("checkout of commit '{commit}' failed: {reason}")]
    Checkout {
        /// Commit id that could not be checked out
        commit: String,
        /// What went wrong
        reason: String,
    },

    /// The selected analyzer failed on a snapshot. Terminates the run;
    /// failed commits are never silently skipped.
    #[error("analyzer '{analyzer}' failed: {reason}")]
    Analysis {
        /// Identity of the analyzer that failed
        analyzer: String,
        /// What went wrong
        reason: String,
    },
}

impl Error {
    /// Shorthand for a configuration error with a formatted message
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Configuration(msg.into())
    }
}
