//! Dependency-graph backend

use std::path::PathBuf;

use strata_core::{
    AnalysisBackend, Analyzer, AnalyzerOptions, Fetch, RepositorySource, Result, SnapshotPipeline,
};

use crate::analyzers::ImportGraph;

/// Category for dependency/structure analysis (the backend default)
pub const CATEGORY_CODE_DEPENDENCIES: &str = "code_dependencies";

/// Backend extracting an import/type graph from every commit.
///
/// Construction validates the analyzer parameters once: `details` without an
/// `entrypoint` is rejected here, never per commit.
pub struct DepsBackend {
    pipeline: SnapshotPipeline<DepsRouter>,
}

/// Category table for [`DepsBackend`]: one analyzer, built once.
struct DepsRouter {
    import_graph: ImportGraph,
}

impl AnalysisBackend for DepsRouter {
    fn name(&self) -> &'static str {
        "deps"
    }

    fn default_category(&self) -> &'static str {
        CATEGORY_CODE_DEPENDENCIES
    }

    fn categories(&self) -> &[&'static str] {
        &[CATEGORY_CODE_DEPENDENCIES]
    }

    fn analyzer(&self, category: &str) -> Option<&dyn Analyzer> {
        match category {
            CATEGORY_CODE_DEPENDENCIES => Some(&self.import_graph),
            _ => None,
        }
    }
}

impl DepsBackend {
    /// Create the backend over `source` with the given analyzer parameters.
    pub fn new(source: RepositorySource, options: AnalyzerOptions) -> Result<Self> {
        options.validate()?;
        let router = DepsRouter {
            import_graph: ImportGraph::new(options),
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

#[cfg(test)]
mod tests {
    use super::*;
    use git2::Repository;
    use tempfile::TempDir;

    fn source(tmp: &TempDir) -> RepositorySource {
        let repo_path = tmp.path().join("mined.git");
        Repository::init_bare(&repo_path).unwrap();
        RepositorySource::new("http://example.com", &repo_path).unwrap()
    }

    #[test]
    fn test_details_without_entrypoint_rejected() {
        let tmp = TempDir::new().unwrap();
        let options = AnalyzerOptions {
            entrypoint: None,
            details: true,
        };
        let result = DepsBackend::new(source(&tmp), options);
        assert!(matches!(
            result,
            Err(strata_core::Error::Configuration(_))
        ));
    }

    #[test]
    fn test_details_with_entrypoint_accepted() {
        let tmp = TempDir::new().unwrap();
        let options = AnalyzerOptions {
            entrypoint: Some(PathBuf::from("src")),
            details: true,
        };
        assert!(DepsBackend::new(source(&tmp), options).is_ok());
    }

    #[test]
    fn test_default_category() {
        let tmp = TempDir::new().unwrap();
        let backend = DepsBackend::new(source(&tmp), AnalyzerOptions::default()).unwrap();
        let fetch = backend.fetch(None).unwrap();
        assert_eq!(fetch.category(), CATEGORY_CODE_DEPENDENCIES);
    }
}
