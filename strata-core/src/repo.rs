//! Repository source identification and validation

use std::path::{Path, PathBuf};

use git2::Repository;

use crate::{Error, Result};

/// Identifies the history a pipeline mines: an origin URI and the path to a
/// local bare (or mirrored) clone of it.
///
/// The git path must already exist and hold a valid history; Strata never
/// creates or mutates it. The URI is carried through to result items as the
/// origin tag and is not dereferenced.
#[derive(Debug, Clone)]
pub struct RepositorySource {
    uri: String,
    git_path: PathBuf,
}

impl RepositorySource {
    /// Create a repository source, validating that `git_path` opens as a
    /// git history.
    pub fn new(uri: impl Into<String>, git_path: impl AsRef<Path>) -> Result<Self> {
        let git_path = git_path.as_ref().to_path_buf();

        if !git_path.exists() {
            return Err(Error::config(format!(
                "repository path does not exist: {}",
                git_path.display()
            )));
        }

        // Open once to validate; the handle is dropped, later components
        // open their own read-only handles.
        Repository::open(&git_path).map_err(|e| {
            Error::config(format!(
                "not a valid git history at {}: {}",
                git_path.display(),
                e.message()
            ))
        })?;

        Ok(Self {
            uri: uri.into(),
            git_path,
        })
    }

    /// The origin URI
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Path to the local bare history
    pub fn git_path(&self) -> &Path {
        &self.git_path
    }

    /// Last path component of the git path, used to derive per-repository
    /// worktree directories.
    pub fn repo_name(&self) -> &str {
        self.git_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("repository")
    }
}
