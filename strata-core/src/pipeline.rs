//! The per-commit snapshot pipeline
//!
//! The single place a worktree is acquired, handed to an analyzer, and
//! released. Results are produced lazily, in commit-log order, through a
//! forward-only iterator whose drop guarantees worktree disposal.

use std::path::PathBuf;
use std::vec::IntoIter;

use crate::analyzer::{resolve_category, AnalysisBackend, Analyzer};
use crate::commit::{CommitDescriptor, CommitLog, CommitSource};
use crate::item::ResultItem;
use crate::repo::RepositorySource;
use crate::worktree::WorktreeManager;
use crate::Result;

/// Orchestrates one backend over the commits of one repository.
pub struct SnapshotPipeline<B: AnalysisBackend> {
    source: RepositorySource,
    backend: B,
    commit_source: Box<dyn CommitSource>,
    worktree_root: Option<PathBuf>,
}

impl<B: AnalysisBackend> SnapshotPipeline<B> {
    /// Create a pipeline reading the full history of `source` through the
    /// default commit log.
    pub fn new(source: RepositorySource, backend: B) -> Self {
        let commit_source = Box::new(CommitLog::new(&source));
        Self {
            source,
            backend,
            commit_source,
            worktree_root: None,
        }
    }

    /// Replace the commit source (branch/since filters, or a test stub).
    pub fn with_commit_source(mut self, commit_source: Box<dyn CommitSource>) -> Self {
        self.commit_source = commit_source;
        self
    }

    /// Place per-run worktrees under `root` instead of the temp directory.
    pub fn with_worktree_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.worktree_root = Some(root.into());
        self
    }

    /// The backend this pipeline drives
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Start a run: validate the category, enumerate the commit log, and
    /// return the lazy item sequence.
    ///
    /// Validation happens here, on entry — a bad category or an unreadable
    /// history fails the call itself, before the caller ever polls the
    /// iterator and before any worktree exists.
    pub fn fetch(&self, category: Option<&str>) -> Result<Fetch<'_>> {
        let (category, analyzer) = resolve_category(&self.backend, category)?;
        let commits = self.commit_source.commits()?;
        let worktree = WorktreeManager::prepare(&self.source, self.worktree_root.as_deref())?;

        tracing::debug!(
            backend = self.backend.name(),
            category,
            commits = commits.len(),
            "starting fetch"
        );

        Ok(Fetch {
            backend_name: self.backend.name(),
            category,
            analyzer,
            commits: commits.into_iter(),
            worktree,
            done: false,
        })
    }
}

/// Lazy, finite, single-pass sequence of result items for one fetch call.
///
/// Yields `Ok(item)` per commit in commit-log order. The first checkout or
/// analysis failure is yielded once as `Err` and fuses the iterator; the run
/// never skips a failing commit. The worktree is disposed when the sequence
/// ends, errors, or is dropped early — whichever comes first.
pub struct Fetch<'a> {
    backend_name: &'static str,
    category: &'static str,
    analyzer: &'a dyn Analyzer,
    commits: IntoIter<CommitDescriptor>,
    worktree: WorktreeManager,
    done: bool,
}

impl Fetch<'_> {
    /// Category this run resolved to
    pub fn category(&self) -> &'static str {
        self.category
    }

    fn finish(&mut self) {
        self.done = true;
        if let Err(e) = self.worktree.dispose() {
            tracing::warn!("failed to dispose worktree: {}", e);
        }
    }

    fn process(&mut self, commit: CommitDescriptor) -> Result<ResultItem> {
        let path = self.worktree.checkout(&commit.commit)?;
        let analysis = self.analyzer.analyze(path)?;
        Ok(ResultItem::build(
            self.backend_name,
            self.category,
            &commit,
            self.analyzer.name(),
            analysis,
        ))
    }
}

impl Iterator for Fetch<'_> {
    type Item = Result<ResultItem>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let commit = match self.commits.next() {
            Some(commit) => commit,
            None => {
                self.finish();
                return None;
            }
        };

        match self.process(commit) {
            Ok(item) => Some(Ok(item)),
            Err(e) => {
                // Cleanup must precede the error reaching the caller.
                self.finish();
                Some(Err(e))
            }
        }
    }
}

impl Drop for Fetch<'_> {
    fn drop(&mut self) {
        if !self.done {
            self.finish();
        }
    }
}
