//! Language composition analyzer

use std::collections::BTreeMap;
use std::path::Path;

use serde_json::{json, Map, Value};
use strata_core::{Analyzer, AnalyzerOptions, Result};

use super::{language_for_extension, scoped_root, walk_files};

const NAME: &str = "composition";

/// Measures the per-language share of a snapshot by bytes of source.
///
/// Payload: a mapping from language name to a percentage. With `details`
/// enabled (which requires an entrypoint) a `breakdown` object maps each
/// file to its language; without it the key is absent entirely.
#[derive(Debug, Clone)]
pub struct Composition {
    options: AnalyzerOptions,
}

impl Composition {
    /// Create the analyzer; `options` must already be validated.
    pub fn new(options: AnalyzerOptions) -> Self {
        Self { options }
    }
}

impl Analyzer for Composition {
    fn name(&self) -> &'static str {
        NAME
    }

    fn analyze(&self, path: &Path) -> Result<Value> {
        let root = scoped_root(NAME, self.options.scope(path))?;

        let mut bytes_per_language: BTreeMap<&'static str, u64> = BTreeMap::new();
        let mut breakdown = Map::new();
        let mut total: u64 = 0;

        for (file, rel) in walk_files(&root) {
            let language = match rel
                .extension()
                .and_then(|e| e.to_str())
                .and_then(language_for_extension)
            {
                Some(language) => language,
                None => continue,
            };
            let size = std::fs::metadata(&file).map(|m| m.len()).unwrap_or(0);
            if size == 0 {
                continue;
            }

            *bytes_per_language.entry(language).or_insert(0) += size;
            total += size;
            if self.options.details {
                breakdown.insert(rel.to_string_lossy().into_owned(), json!(language));
            }
        }

        let mut result = Map::new();
        for (language, bytes) in bytes_per_language {
            let share = (bytes as f64 / total as f64) * 100.0;
            result.insert(language.to_string(), json!((share * 100.0).round() / 100.0));
        }
        if self.options.details {
            result.insert("breakdown".to_string(), Value::Object(breakdown));
        }

        Ok(Value::Object(result))
    }
}
