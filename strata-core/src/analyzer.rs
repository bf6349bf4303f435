//! Analyzer and backend contracts, plus category resolution

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::{Error, Result};

/// Capability contract every pluggable analyzer satisfies.
///
/// Analyzers are stateless with respect to commit identity: the same instance
/// is reused for every commit of a run, and any internal caching must be
/// keyed by the input path. `analyze` must fail with a typed error, never a
/// sentinel value, when the snapshot cannot be read.
pub trait Analyzer {
    /// Stable identity recorded in every result item this analyzer produces
    fn name(&self) -> &'static str;

    /// Analyze the snapshot materialized at `path`.
    ///
    /// The payload shape is analyzer-specific and opaque to the pipeline.
    /// Implementations must not retain references to `path` after returning.
    fn analyze(&self, path: &Path) -> Result<Value>;
}

/// A backend pairs a set of categories with the analyzers serving them.
///
/// Every advertised category resolves to exactly one analyzer; analyzers are
/// constructed once, at backend construction.
pub trait AnalysisBackend {
    /// Backend identity recorded as `backend_name` in result items
    fn name(&self) -> &'static str;

    /// Category used when the caller does not request one
    fn default_category(&self) -> &'static str;

    /// All categories this backend advertises
    fn categories(&self) -> &[&'static str];

    /// The analyzer serving `category`, if advertised
    fn analyzer(&self, category: &str) -> Option<&dyn Analyzer>;
}

/// Resolve a requested category against a backend.
///
/// Runs at fetch entry, before any commit is touched: an unrecognized
/// category is a configuration error, never a lazy per-commit failure.
pub fn resolve_category<'a>(
    backend: &'a dyn AnalysisBackend,
    requested: Option<&str>,
) -> Result<(&'static str, &'a dyn Analyzer)> {
    let category = match requested {
        Some(requested) => backend
            .categories()
            .iter()
            .copied()
            .find(|c| *c == requested)
            .ok_or_else(|| {
                Error::config(format!(
                    "unknown category '{}' for backend '{}' (known: {})",
                    requested,
                    backend.name(),
                    backend.categories().join(", ")
                ))
            })?,
        None => backend.default_category(),
    };

    let analyzer = backend.analyzer(category).ok_or_else(|| {
        Error::config(format!(
            "backend '{}' advertises category '{}' but maps no analyzer to it",
            backend.name(),
            category
        ))
    })?;

    Ok((category, analyzer))
}

/// Parameters shared by the analyzer families.
///
/// `entrypoint` scopes an analysis to a sub-path of the checkout; `details`
/// requests the expensive per-item breakdown. The only confirmed combination
/// rule is that `details` is meaningless without a scoping entrypoint, so
/// that pair is rejected at construction time.
#[derive(Debug, Clone, Default)]
pub struct AnalyzerOptions {
    /// Sub-path the analysis is scoped to, relative to the checkout root
    pub entrypoint: Option<PathBuf>,
    /// Whether to produce the detailed breakdown
    pub details: bool,
}

impl AnalyzerOptions {
    /// Check the combination once, at backend construction. The rule never
    /// depends on commit content, so it must not wait for the first commit.
    pub fn validate(&self) -> Result<()> {
        if self.details && self.entrypoint.is_none() {
            return Err(Error::config(
                "'details' requires an 'entrypoint' to scope the analysis",
            ));
        }
        Ok(())
    }

    /// The directory to analyze for a checkout rooted at `worktree`.
    pub fn scope<'a>(&self, worktree: &'a Path) -> PathBuf {
        match self.entrypoint {
            Some(ref entrypoint) => worktree.join(entrypoint),
            None => worktree.to_path_buf(),
        }
    }
}
