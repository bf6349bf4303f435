//! Per-file line metrics analyzer

use std::path::Path;

use serde_json::{json, Map, Value};
use strata_core::{Analyzer, AnalyzerOptions, Result};

use super::{comment_prefix, language_for_extension, read_text, scoped_root, walk_files};

const NAME: &str = "line_metrics";

/// Counts blank, comment and code lines for every text file in a snapshot.
///
/// Payload: a mapping from repository-relative path to
/// `{blanks, comments, loc, total_files}`. Binary files are skipped.
#[derive(Debug, Clone)]
pub struct LineMetrics {
    options: AnalyzerOptions,
}

impl LineMetrics {
    /// Create the analyzer; `options.entrypoint` scopes the walk.
    pub fn new(options: AnalyzerOptions) -> Self {
        Self { options }
    }
}

impl Analyzer for LineMetrics {
    fn name(&self) -> &'static str {
        NAME
    }

    fn analyze(&self, path: &Path) -> Result<Value> {
        let root = scoped_root(NAME, self.options.scope(path))?;

        let mut results = Map::new();
        for (file, rel) in walk_files(&root) {
            let text = match read_text(&file) {
                Some(text) => text,
                None => continue,
            };

            let prefix = rel
                .extension()
                .and_then(|e| e.to_str())
                .and_then(language_for_extension)
                .and_then(comment_prefix);

            let counts = count_lines(&text, prefix);
            results.insert(
                rel.to_string_lossy().into_owned(),
                json!({
                    "blanks": counts.blanks,
                    "comments": counts.comments,
                    "loc": counts.loc,
                    "total_files": 1,
                }),
            );
        }

        Ok(Value::Object(results))
    }
}

struct LineCounts {
    blanks: u64,
    comments: u64,
    loc: u64,
}

fn count_lines(text: &str, comment_prefix: Option<&str>) -> LineCounts {
    let mut counts = LineCounts {
        blanks: 0,
        comments: 0,
        loc: 0,
    };

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            counts.blanks += 1;
        } else if comment_prefix.is_some_and(|p| trimmed.starts_with(p)) {
            counts.comments += 1;
        } else {
            counts.loc += 1;
        }
    }

    counts
}
