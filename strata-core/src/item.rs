//! Result item assembly

use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::commit::CommitDescriptor;

/// Normalized output record, one per processed commit.
///
/// `data` carries the commit metadata fields unchanged plus `analyzer` (the
/// identity of the analyzer that ran) and `analysis` (its raw payload, never
/// reshaped by the pipeline). Immutable once built; the pipeline yields it
/// and retains nothing.
#[derive(Debug, Clone, Serialize)]
pub struct ResultItem {
    /// Name of the backend that produced this item
    pub backend_name: String,
    /// Category the fetch resolved to
    pub category: String,
    /// Commit metadata plus `analyzer` and `analysis`
    pub data: Map<String, Value>,
}

impl ResultItem {
    /// Assemble the envelope around a commit and an analyzer payload.
    pub fn build(
        backend_name: &str,
        category: &str,
        commit: &CommitDescriptor,
        analyzer: &str,
        analysis: Value,
    ) -> Self {
        let mut data = Map::new();
        data.insert("commit".to_string(), json!(commit.commit));
        data.insert("author".to_string(), json!(commit.author));
        data.insert("author_date".to_string(), json!(commit.author_date));
        data.insert("committer".to_string(), json!(commit.committer));
        data.insert("commit_date".to_string(), json!(commit.commit_date));
        data.insert("message".to_string(), json!(commit.message));
        data.insert("analyzer".to_string(), json!(analyzer));
        data.insert("analysis".to_string(), analysis);

        Self {
            backend_name: backend_name.to_string(),
            category: category.to_string(),
            data,
        }
    }

    /// Commit hash this item was produced for
    pub fn commit(&self) -> Option<&str> {
        self.data.get("commit").and_then(Value::as_str)
    }

    /// The analyzer payload
    pub fn analysis(&self) -> Option<&Value> {
        self.data.get("analysis")
    }
}
