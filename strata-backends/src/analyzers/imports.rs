//! Import and type-structure graph analyzer

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::{json, Map, Value};
use strata_core::{Analyzer, AnalyzerOptions, Result};

use super::{read_text, scoped_root, walk_files};

const NAME: &str = "import_graph";

static PY_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*class\s+(\w+)\s*(?:\(([^)]*)\))?\s*:").expect("hard-coded pattern")
});
static PY_IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*(?:from\s+([\w.]+)\s+import\s|import\s+([\w.]+))")
        .expect("hard-coded pattern")
});
static PY_DEF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*def\s+(\w+)").expect("hard-coded pattern"));
static RS_TYPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*(?:pub(?:\([^)]*\))?\s+)?(?:struct|enum|trait)\s+(\w+)")
        .expect("hard-coded pattern")
});
static RS_IMPL_FOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*impl(?:<[^>]*>)?\s+(\w+)(?:<[^>]*>)?\s+for\s+(\w+)")
        .expect("hard-coded pattern")
});
static RS_USE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*(?:pub\s+)?use\s+([A-Za-z_][A-Za-z0-9_]*)").expect("hard-coded pattern")
});
static RS_FN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*(?:pub(?:\([^)]*\))?\s+)?fn\s+(\w+)").expect("hard-coded pattern")
});

/// Extracts a dependency/structure graph from the source files of a snapshot.
///
/// Payload: `{classes: {nodes, links}, packages: {nodes, links}}`. Class
/// nodes come from type declarations, class links from inheritance (and, for
/// Rust, trait implementations); package nodes are modules, package links are
/// imports. With `details` the payload additionally maps each module to the
/// classes and functions it declares.
#[derive(Debug, Clone)]
pub struct ImportGraph {
    options: AnalyzerOptions,
}

/// What one source file contributes to the graph
#[derive(Debug, Default)]
struct FileFacts {
    classes: Vec<String>,
    class_links: Vec<(String, String)>,
    imports: Vec<String>,
    functions: Vec<String>,
}

impl ImportGraph {
    /// Create the analyzer; `options` must already be validated.
    pub fn new(options: AnalyzerOptions) -> Self {
        Self { options }
    }
}

impl Analyzer for ImportGraph {
    fn name(&self) -> &'static str {
        NAME
    }

    fn analyze(&self, path: &Path) -> Result<Value> {
        let root = scoped_root(NAME, self.options.scope(path))?;

        let mut class_nodes = BTreeSet::new();
        let mut class_links = BTreeSet::new();
        let mut package_nodes = BTreeSet::new();
        let mut package_links = BTreeSet::new();
        let mut modules: BTreeMap<String, FileFacts> = BTreeMap::new();

        for (file, rel) in walk_files(&root) {
            let ext = match rel.extension().and_then(|e| e.to_str()) {
                Some(ext) => ext,
                None => continue,
            };
            let text = match read_text(&file) {
                Some(text) => text,
                None => continue,
            };

            let facts = match ext {
                "py" | "pyi" => python_facts(&text),
                "rs" => rust_facts(&text),
                _ => continue,
            };

            let module = module_id(&rel);
            package_nodes.insert(module.clone());
            for class in &facts.classes {
                class_nodes.insert(class.clone());
            }
            for (source, target) in &facts.class_links {
                class_nodes.insert(target.clone());
                class_links.insert((source.clone(), target.clone()));
            }
            for import in &facts.imports {
                package_nodes.insert(import.clone());
                package_links.insert((module.clone(), import.clone()));
            }
            modules.insert(module, facts);
        }

        let mut result = Map::new();
        result.insert(
            "classes".to_string(),
            graph(&class_nodes, &class_links),
        );
        result.insert(
            "packages".to_string(),
            graph(&package_nodes, &package_links),
        );
        if self.options.details {
            let mut detail = Map::new();
            for (module, facts) in &modules {
                detail.insert(
                    module.clone(),
                    json!({
                        "classes": &facts.classes,
                        "functions": &facts.functions,
                    }),
                );
            }
            result.insert("modules".to_string(), Value::Object(detail));
        }

        Ok(Value::Object(result))
    }
}

fn graph(nodes: &BTreeSet<String>, links: &BTreeSet<(String, String)>) -> Value {
    let links: Vec<Value> = links
        .iter()
        .map(|(source, target)| json!({"source": source, "target": target}))
        .collect();
    json!({
        "nodes": nodes.iter().collect::<Vec<_>>(),
        "links": links,
    })
}

/// Module identity for a source file: the relative path without extension,
/// with separators rendered as dots (`pkg/util.py` -> `pkg.util`).
fn module_id(rel: &Path) -> String {
    rel.with_extension("")
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(".")
}

fn python_facts(text: &str) -> FileFacts {
    let mut facts = FileFacts::default();

    for capture in PY_CLASS.captures_iter(text) {
        let class = capture[1].to_string();
        if let Some(bases) = capture.get(2) {
            for base in bases.as_str().split(',') {
                let base = base.trim();
                if base.is_empty() || base == "object" || base.contains('=') {
                    continue;
                }
                facts
                    .class_links
                    .push((class.clone(), base.to_string()));
            }
        }
        facts.classes.push(class);
    }

    for capture in PY_IMPORT.captures_iter(text) {
        if let Some(m) = capture.get(1).or_else(|| capture.get(2)) {
            facts.imports.push(m.as_str().to_string());
        }
    }

    for capture in PY_DEF.captures_iter(text) {
        facts.functions.push(capture[1].to_string());
    }

    facts
}

fn rust_facts(text: &str) -> FileFacts {
    let mut facts = FileFacts::default();

    for capture in RS_TYPE.captures_iter(text) {
        facts.classes.push(capture[1].to_string());
    }

    for capture in RS_IMPL_FOR.captures_iter(text) {
        // The implementing type depends on the trait it implements.
        facts
            .class_links
            .push((capture[2].to_string(), capture[1].to_string()));
    }

    for capture in RS_USE.captures_iter(text) {
        let root = capture[1].to_string();
        if root == "crate" || root == "self" || root == "super" {
            continue;
        }
        facts.imports.push(root);
    }

    for capture in RS_FN.captures_iter(text) {
        facts.functions.push(capture[1].to_string());
    }

    facts
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_python_classes_and_bases() {
        let facts = python_facts("class Base:\n    pass\n\nclass Child(Base):\n    def run(self):\n        pass\n");
        assert_eq!(facts.classes, vec!["Base", "Child"]);
        assert_eq!(
            facts.class_links,
            vec![("Child".to_string(), "Base".to_string())]
        );
        assert_eq!(facts.functions, vec!["run"]);
    }

    #[test]
    fn test_python_imports() {
        let facts = python_facts("import os\nfrom collections import OrderedDict\n");
        assert_eq!(facts.imports, vec!["os", "collections"]);
    }

    #[test]
    fn test_rust_types_and_impls() {
        let facts = rust_facts("pub struct Engine;\n\ntrait Drive {}\n\nimpl Drive for Engine {}\n");
        assert_eq!(facts.classes, vec!["Engine", "Drive"]);
        assert_eq!(
            facts.class_links,
            vec![("Engine".to_string(), "Drive".to_string())]
        );
    }

    #[test]
    fn test_module_id() {
        assert_eq!(module_id(Path::new("pkg/util.py")), "pkg.util");
        assert_eq!(module_id(Path::new("main.rs")), "main");
    }

    #[test]
    fn test_analyze_shapes() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join("main.py"),
            "import os\n\nclass App:\n    pass\n",
        )
        .unwrap();

        let analyzer = ImportGraph::new(AnalyzerOptions::default());
        let result = analyzer.analyze(tmp.path()).unwrap();

        assert!(result["classes"]["nodes"]
            .as_array()
            .unwrap()
            .contains(&json!("App")));
        assert!(result["classes"]["links"].as_array().unwrap().is_empty());
        let package_nodes = result["packages"]["nodes"].as_array().unwrap();
        assert!(package_nodes.contains(&json!("main")));
        assert!(package_nodes.contains(&json!("os")));
        let links = result["packages"]["links"].as_array().unwrap();
        assert_eq!(links[0], json!({"source": "main", "target": "os"}));
        assert!(result.get("modules").is_none());
    }

    #[test]
    fn test_analyze_details() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir(tmp.path().join("pkg")).unwrap();
        std::fs::write(
            tmp.path().join("pkg/util.py"),
            "class Helper:\n    def assist(self):\n        pass\n",
        )
        .unwrap();

        let analyzer = ImportGraph::new(AnalyzerOptions {
            entrypoint: Some(PathBuf::from("pkg")),
            details: true,
        });
        let result = analyzer.analyze(tmp.path()).unwrap();
        let modules = result["modules"].as_object().unwrap();
        assert_eq!(modules["util"]["classes"], json!(["Helper"]));
        assert_eq!(modules["util"]["functions"], json!(["assist"]));
    }
}
