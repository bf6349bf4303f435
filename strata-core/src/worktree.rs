//! Worktree materialization and lifecycle management
//!
//! A worktree is a disposable, commit-pinned checkout of the shared bare
//! history. The manager owns exactly one checkout path, reuses it across the
//! commits of a run, and removes it when the run ends.

use std::fs;
use std::path::{Path, PathBuf};

use git2::{ObjectType, Repository};

use crate::repo::RepositorySource;
use crate::{Error, Result};

/// Directory name used when the caller supplies no worktree root.
const DEFAULT_ROOT_DIR: &str = "strata-worktrees";

/// Manages the single worktree of one pipeline run.
///
/// The bare repository is opened read-only and never written; all filesystem
/// effects are confined to the worktree path.
pub struct WorktreeManager {
    repo: Repository,
    worktree_path: PathBuf,
}

impl std::fmt::Debug for WorktreeManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorktreeManager")
            .field("worktree_path", &self.worktree_path)
            .finish_non_exhaustive()
    }
}

impl WorktreeManager {
    /// Prepare a manager for the given source.
    ///
    /// Validates the bare history, resolves the worktree root (a temp-dir
    /// location when absent) and derives the checkout path as
    /// `<root>/<basename of git path>`. No checkout happens yet; the
    /// directory is created lazily per commit.
    pub fn prepare(source: &RepositorySource, root: Option<&Path>) -> Result<Self> {
        let repo = Repository::open(source.git_path()).map_err(|e| {
            Error::config(format!(
                "cannot open history at {}: {}",
                source.git_path().display(),
                e.message()
            ))
        })?;

        let root = match root {
            Some(root) => root.to_path_buf(),
            None => std::env::temp_dir().join(DEFAULT_ROOT_DIR),
        };
        fs::create_dir_all(&root).map_err(|e| {
            Error::config(format!(
                "cannot create worktree root {}: {}",
                root.display(),
                e
            ))
        })?;

        let worktree_path = root.join(source.repo_name());
        tracing::debug!(path = %worktree_path.display(), "prepared worktree manager");

        Ok(Self {
            repo,
            worktree_path,
        })
    }

    /// Path the next checkout will materialize into.
    pub fn worktree_path(&self) -> &Path {
        &self.worktree_path
    }

    /// Materialize `commit_id` into the worktree and return its path.
    ///
    /// Safe to call repeatedly within a run: each call wipes the previous
    /// checkout first, so no stale files from an earlier commit remain
    /// visible to the analyzer.
    pub fn checkout(&mut self, commit_id: &str) -> Result<&Path> {
        let checkout_err = |reason: String| Error::Checkout {
            commit: commit_id.to_string(),
            reason,
        };

        let oid = git2::Oid::from_str(commit_id)
            .map_err(|e| checkout_err(format!("invalid commit id: {}", e.message())))?;
        let commit = self
            .repo
            .find_commit(oid)
            .map_err(|e| checkout_err(format!("commit not in history: {}", e.message())))?;
        let tree = commit
            .tree()
            .map_err(|e| checkout_err(format!("cannot read tree: {}", e.message())))?;

        if self.worktree_path.exists() {
            fs::remove_dir_all(&self.worktree_path)
                .map_err(|e| checkout_err(format!("cannot reset worktree: {}", e)))?;
        }
        fs::create_dir_all(&self.worktree_path)
            .map_err(|e| checkout_err(format!("cannot create worktree: {}", e)))?;

        write_tree(&self.repo, &tree, &self.worktree_path).map_err(|reason| {
            // A half-written checkout is useless; drop it before surfacing.
            let _ = fs::remove_dir_all(&self.worktree_path);
            checkout_err(reason)
        })?;

        tracing::debug!(commit = commit_id, path = %self.worktree_path.display(), "checked out commit");
        Ok(&self.worktree_path)
    }

    /// Remove the worktree directory.
    ///
    /// Idempotent: disposing twice, or disposing when no checkout ever
    /// happened, succeeds.
    pub fn dispose(&mut self) -> Result<()> {
        match fs::remove_dir_all(&self.worktree_path) {
            Ok(()) => {
                tracing::debug!(path = %self.worktree_path.display(), "disposed worktree");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::config(format!(
                "cannot remove worktree {}: {}",
                self.worktree_path.display(),
                e
            ))),
        }
    }
}

/// Write a commit tree under `dest` by reading blobs from the object
/// database. Works against bare repositories, honors the executable bit and
/// materializes symlinks on unix.
fn write_tree(repo: &Repository, tree: &git2::Tree<'_>, dest: &Path) -> std::result::Result<(), String> {
    for entry in tree.iter() {
        let name = match entry.name() {
            Some(name) => name,
            None => continue, // non-utf8 entry names are not materialized
        };
        let target = dest.join(name);

        match entry.kind() {
            Some(ObjectType::Tree) => {
                let object = entry
                    .to_object(repo)
                    .map_err(|e| format!("cannot read tree entry '{}': {}", name, e.message()))?;
                let subtree = object
                    .peel_to_tree()
                    .map_err(|e| format!("cannot peel tree '{}': {}", name, e.message()))?;
                fs::create_dir_all(&target)
                    .map_err(|e| format!("cannot create directory '{}': {}", name, e))?;
                write_tree(repo, &subtree, &target)?;
            }
            Some(ObjectType::Blob) => {
                let object = entry
                    .to_object(repo)
                    .map_err(|e| format!("cannot read blob '{}': {}", name, e.message()))?;
                let blob = object
                    .peel_to_blob()
                    .map_err(|e| format!("cannot peel blob '{}': {}", name, e.message()))?;
                write_blob(&blob, entry.filemode(), &target)
                    .map_err(|e| format!("cannot write '{}': {}", name, e))?;
            }
            // Submodule pointers have no content to materialize.
            _ => continue,
        }
    }
    Ok(())
}

fn write_blob(blob: &git2::Blob<'_>, filemode: i32, target: &Path) -> std::io::Result<()> {
    const MODE_SYMLINK: i32 = 0o120000;
    const MODE_EXECUTABLE: i32 = 0o100755;

    if filemode == MODE_SYMLINK {
        #[cfg(unix)]
        {
            let link = String::from_utf8_lossy(blob.content()).into_owned();
            return std::os::unix::fs::symlink(link, target);
        }
    }

    fs::write(target, blob.content())?;

    if filemode == MODE_EXECUTABLE {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(target, fs::Permissions::from_mode(0o755))?;
        }
    }

    Ok(())
}
