//! Concrete analyzers implementing the `Analyzer` contract
//!
//! Each analyzer consumes a materialized snapshot path and produces its own
//! payload shape; the pipeline treats all of them as opaque.

mod composition;
mod imports;
mod metrics;

pub use composition::Composition;
pub use imports::ImportGraph;
pub use metrics::LineMetrics;

use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use strata_core::{Error, Result};

/// Collect the regular files under `root`, paired with their paths relative
/// to `root`. Hidden files and ignore rules inside the snapshot are honored.
pub(crate) fn walk_files(root: &Path) -> Vec<(PathBuf, PathBuf)> {
    let walker = WalkBuilder::new(root)
        .hidden(true)
        .git_ignore(true)
        .git_global(false)
        .require_git(false)
        .build();

    let mut files = Vec::new();
    for entry in walker.filter_map(|e| e.ok()) {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if let Ok(rel) = path.strip_prefix(root) {
            files.push((path.to_path_buf(), rel.to_path_buf()));
        }
    }
    files.sort_by(|a, b| a.1.cmp(&b.1));
    tracing::debug!(root = %root.display(), files = files.len(), "walked snapshot");
    files
}

/// Resolve the scoped analysis root, failing when the entrypoint does not
/// exist in this snapshot.
pub(crate) fn scoped_root(analyzer: &'static str, scope: PathBuf) -> Result<PathBuf> {
    if !scope.is_dir() {
        return Err(Error::Analysis {
            analyzer: analyzer.to_string(),
            reason: format!("entrypoint '{}' not found in snapshot", scope.display()),
        });
    }
    Ok(scope)
}

/// Language name for a file extension. Unknown extensions are not counted.
pub(crate) fn language_for_extension(ext: &str) -> Option<&'static str> {
    match ext {
        "py" | "pyi" => Some("Python"),
        "rs" => Some("Rust"),
        "js" | "mjs" | "cjs" => Some("JavaScript"),
        "ts" | "tsx" => Some("TypeScript"),
        "jsx" => Some("JavaScript"),
        "go" => Some("Go"),
        "java" => Some("Java"),
        "c" | "h" => Some("C"),
        "cpp" | "cc" | "cxx" | "hpp" | "hh" => Some("C++"),
        "cs" => Some("C#"),
        "rb" => Some("Ruby"),
        "php" => Some("PHP"),
        "swift" => Some("Swift"),
        "kt" | "kts" => Some("Kotlin"),
        "scala" => Some("Scala"),
        "sh" | "bash" => Some("Shell"),
        "pl" | "pm" => Some("Perl"),
        "lua" => Some("Lua"),
        "sql" => Some("SQL"),
        "html" | "htm" => Some("HTML"),
        "css" => Some("CSS"),
        "scss" => Some("SCSS"),
        "md" | "markdown" => Some("Markdown"),
        "json" => Some("JSON"),
        "yaml" | "yml" => Some("YAML"),
        "toml" => Some("TOML"),
        "xml" => Some("XML"),
        _ => None,
    }
}

/// Line-comment prefix for a language, where one exists.
pub(crate) fn comment_prefix(language: &str) -> Option<&'static str> {
    match language {
        "Python" | "Ruby" | "Shell" | "Perl" | "YAML" | "TOML" => Some("#"),
        "Rust" | "JavaScript" | "TypeScript" | "Go" | "Java" | "C" | "C++" | "C#" | "Swift"
        | "Kotlin" | "Scala" | "PHP" => Some("//"),
        "Lua" | "SQL" => Some("--"),
        _ => None,
    }
}

/// Read a file as text, skipping binaries. A NUL byte in the leading chunk
/// marks the file binary.
pub(crate) fn read_text(path: &Path) -> Option<String> {
    let bytes = std::fs::read(path).ok()?;
    if bytes.iter().take(8000).any(|b| *b == 0) {
        return None;
    }
    Some(String::from_utf8_lossy(&bytes).into_owned())
}
