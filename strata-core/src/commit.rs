//! Commit metadata and the commit log source

use std::path::PathBuf;

use chrono::{DateTime, FixedOffset, Offset, Utc};
use git2::{Repository, Sort};
use serde::Serialize;

use crate::repo::RepositorySource;
use crate::{Error, Result};

/// Metadata for a single commit, produced by a [`CommitSource`] and consumed
/// read-only by the pipeline.
#[derive(Debug, Clone, Serialize)]
pub struct CommitDescriptor {
    /// Full commit hash
    pub commit: String,
    /// Author as `Name <email>`
    pub author: String,
    /// Author date
    pub author_date: DateTime<FixedOffset>,
    /// Committer as `Name <email>`
    pub committer: String,
    /// Commit date
    pub commit_date: DateTime<FixedOffset>,
    /// Full commit message
    pub message: String,
}

/// A finite, ordered source of commit metadata.
///
/// Implementations must return commits oldest first and must be restartable:
/// each call to `commits` produces the full sequence again.
pub trait CommitSource {
    /// Enumerate the commits to process, oldest first.
    fn commits(&self) -> Result<Vec<CommitDescriptor>>;
}

/// Default [`CommitSource`] reading a local git history with an optional
/// branch and from-date filter.
#[derive(Debug, Clone)]
pub struct CommitLog {
    git_path: PathBuf,
    branch: Option<String>,
    since: Option<DateTime<FixedOffset>>,
}

impl CommitLog {
    /// Create a commit log over the given repository source.
    pub fn new(source: &RepositorySource) -> Self {
        Self {
            git_path: source.git_path().to_path_buf(),
            branch: None,
            since: None,
        }
    }

    /// Restrict the walk to `refs/heads/<branch>` instead of HEAD.
    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    /// Drop commits whose commit date is older than `since`.
    pub fn with_since(mut self, since: DateTime<FixedOffset>) -> Self {
        self.since = Some(since);
        self
    }
}

impl CommitSource for CommitLog {
    fn commits(&self) -> Result<Vec<CommitDescriptor>> {
        let repo = Repository::open(&self.git_path).map_err(|e| {
            Error::config(format!(
                "cannot open history at {}: {}",
                self.git_path.display(),
                e.message()
            ))
        })?;

        let mut walk = repo
            .revwalk()
            .map_err(|e| Error::config(format!("cannot walk history: {}", e.message())))?;
        walk.set_sorting(Sort::TOPOLOGICAL | Sort::REVERSE)
            .map_err(|e| Error::config(format!("cannot order history: {}", e.message())))?;

        let pushed = match self.branch {
            Some(ref branch) => walk.push_ref(&format!("refs/heads/{}", branch)),
            None => walk.push_head(),
        };
        if let Err(e) = pushed {
            // An empty history has no HEAD to walk; that is zero commits,
            // not a failure. A missing named branch is a caller mistake.
            if self.branch.is_none()
                && matches!(
                    e.code(),
                    git2::ErrorCode::NotFound | git2::ErrorCode::UnbornBranch
                )
            {
                return Ok(Vec::new());
            }
            return Err(Error::config(format!(
                "cannot resolve starting point: {}",
                e.message()
            )));
        }

        let mut commits = Vec::new();
        for oid in walk {
            let oid =
                oid.map_err(|e| Error::config(format!("history walk failed: {}", e.message())))?;
            let commit = repo
                .find_commit(oid)
                .map_err(|e| Error::config(format!("cannot read commit {}: {}", oid, e.message())))?;

            let descriptor = describe(&commit);
            if let Some(since) = self.since {
                if descriptor.commit_date < since {
                    continue;
                }
            }
            commits.push(descriptor);
        }

        tracing::debug!(count = commits.len(), "enumerated commit log");
        Ok(commits)
    }
}

fn describe(commit: &git2::Commit<'_>) -> CommitDescriptor {
    CommitDescriptor {
        commit: commit.id().to_string(),
        author: render_signature(&commit.author()),
        author_date: signature_time(&commit.author().when()),
        committer: render_signature(&commit.committer()),
        commit_date: signature_time(&commit.committer().when()),
        message: String::from_utf8_lossy(commit.message_bytes()).into_owned(),
    }
}

fn render_signature(sig: &git2::Signature<'_>) -> String {
    format!(
        "{} <{}>",
        String::from_utf8_lossy(sig.name_bytes()),
        String::from_utf8_lossy(sig.email_bytes())
    )
}

fn signature_time(time: &git2::Time) -> DateTime<FixedOffset> {
    let offset =
        FixedOffset::east_opt(time.offset_minutes() * 60).unwrap_or_else(|| Utc.fix());
    DateTime::from_timestamp(time.seconds(), 0)
        .unwrap_or(DateTime::UNIX_EPOCH)
        .with_timezone(&offset)
}
