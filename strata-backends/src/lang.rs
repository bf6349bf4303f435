//! Language composition and line-metrics backend

use std::path::PathBuf;

use strata_core::{
    AnalysisBackend, Analyzer, AnalyzerOptions, Fetch, RepositorySource, Result, SnapshotPipeline,
};

use crate::analyzers::{Composition, LineMetrics};

/// Category for language composition (the backend default)
pub const CATEGORY_CODE_LANGUAGE: &str = "code_language";
/// Category for per-file line metrics
pub const CATEGORY_CODE_METRICS: &str = "code_metrics";

/// Backend measuring language composition or per-file line metrics for every
/// commit, selected by category.
pub struct LangBackend {
    pipeline: SnapshotPipeline<LangRouter>,
}

/// Category table for [`LangBackend`]: both analyzers built once and reused
/// across all commits of a run.
struct LangRouter {
    composition: Composition,
    line_metrics: LineMetrics,
}

impl AnalysisBackend for LangRouter {
    fn name(&self) -> &'static str {
        "lang"
    }

    fn default_category(&self) -> &'static str {
        CATEGORY_CODE_LANGUAGE
    }

    fn categories(&self) -> &[&'static str] {
        &[CATEGORY_CODE_LANGUAGE, CATEGORY_CODE_METRICS]
    }

    fn analyzer(&self, category: &str) -> Option<&dyn Analyzer> {
        match category {
            CATEGORY_CODE_LANGUAGE => Some(&self.composition),
            CATEGORY_CODE_METRICS => Some(&self.line_metrics),
            _ => None,
        }
    }
}

impl LangBackend {
    /// Create the backend over `source` with the given analyzer parameters.
    pub fn new(source: RepositorySource, options: AnalyzerOptions) -> Result<Self> {
        options.validate()?;
        let router = LangRouter {
            composition: Composition::new(options.clone()),
            line_metrics: LineMetrics::new(options),
        };
        Ok(Self {
            pipeline: SnapshotPipeline::new(source, router),
        })
    }

    /// Place per-run worktrees under `root` instead of the temp directory.
    pub fn with_worktree_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.pipeline = self.pipeline.with_worktree_root(root);
        self
    }

    /// Replace the commit source (branch/since filters).
    pub fn with_commit_source(
        mut self,
        commit_source: Box<dyn strata_core::CommitSource>,
    ) -> Self {
        self.pipeline = self.pipeline.with_commit_source(commit_source);
        self
    }

    /// Process every commit, yielding one item each. `None` selects the
    /// default category.
    pub fn fetch(&self, category: Option<&str>) -> Result<Fetch<'_>> {
        self.pipeline.fetch(category)
    }
}
