//! End-to-end tests driving the backends over a real bare history

mod common;

use std::path::PathBuf;

use strata_backends::{
    DepsBackend, LangBackend, CATEGORY_CODE_DEPENDENCIES, CATEGORY_CODE_LANGUAGE,
    CATEGORY_CODE_METRICS,
};
use strata_core::{AnalyzerOptions, CommitLog, CommitSource, Error, ResultItem};
use tempfile::TempDir;

use common::three_commit_repo;

fn collect(fetch: strata_core::Fetch<'_>) -> Vec<ResultItem> {
    fetch.map(|item| item.unwrap()).collect()
}

#[test]
fn deps_default_category_produces_one_item_per_commit() {
    let tmp = TempDir::new().unwrap();
    let source = three_commit_repo(&tmp);
    let root = tmp.path().join("worktrees");
    let backend = DepsBackend::new(source, AnalyzerOptions::default())
        .unwrap()
        .with_worktree_root(&root);

    let items = collect(backend.fetch(None).unwrap());

    assert_eq!(items.len(), 3);
    for item in &items {
        assert_eq!(item.backend_name, "deps");
        assert_eq!(item.category, CATEGORY_CODE_DEPENDENCIES);
        assert_eq!(item.data["analyzer"], serde_json::json!("import_graph"));

        let analysis = item.analysis().unwrap();
        assert!(analysis["classes"]["nodes"].is_array());
        assert!(analysis["classes"]["links"].is_array());
        assert!(analysis["packages"]["nodes"].is_array());
        assert!(analysis["packages"]["links"].is_array());
    }

    // The third commit links Helper to App through inheritance.
    let last = items.last().unwrap().analysis().unwrap().clone();
    let links = last["classes"]["links"].as_array().unwrap();
    assert!(links.contains(&serde_json::json!({"source": "Helper", "target": "App"})));

    assert!(!root.join("mined.git").exists());
}

#[test]
fn metrics_category_produces_per_file_counts() {
    let tmp = TempDir::new().unwrap();
    let source = three_commit_repo(&tmp);
    let root = tmp.path().join("worktrees");
    let backend = LangBackend::new(source, AnalyzerOptions::default())
        .unwrap()
        .with_worktree_root(&root);

    let items = collect(backend.fetch(Some(CATEGORY_CODE_METRICS)).unwrap());

    assert_eq!(items.len(), 3);
    for item in &items {
        assert_eq!(item.backend_name, "lang");
        assert_eq!(item.category, CATEGORY_CODE_METRICS);
        assert_eq!(item.data["analyzer"], serde_json::json!("line_metrics"));

        let analysis = item.analysis().unwrap().as_object().unwrap();
        assert!(!analysis.is_empty());
        for entry in analysis.values() {
            // u64 by construction, so non-negative by type.
            assert!(entry["blanks"].is_u64());
            assert!(entry["comments"].is_u64());
            assert!(entry["loc"].is_u64());
            assert_eq!(entry["total_files"], serde_json::json!(1));
        }
    }

    let first = items[0].analysis().unwrap().as_object().unwrap();
    assert!(first.contains_key("main.py"));
    assert!(first.contains_key("pkg/util.py"));

    assert!(!root.join("mined.git").exists());
}

#[test]
fn language_default_omits_breakdown() {
    let tmp = TempDir::new().unwrap();
    let source = three_commit_repo(&tmp);
    let backend = LangBackend::new(source, AnalyzerOptions::default())
        .unwrap()
        .with_worktree_root(tmp.path().join("worktrees"));

    let items = collect(backend.fetch(Some(CATEGORY_CODE_LANGUAGE)).unwrap());

    assert_eq!(items.len(), 3);
    for item in &items {
        let analysis = item.analysis().unwrap().as_object().unwrap();
        assert!(!analysis.contains_key("breakdown"));
        assert!(analysis.contains_key("Python"));
    }
    // Rust shows up from the second commit on.
    assert!(items[1]
        .analysis()
        .unwrap()
        .as_object()
        .unwrap()
        .contains_key("Rust"));
}

#[test]
fn language_details_with_entrypoint_adds_breakdown() {
    let tmp = TempDir::new().unwrap();
    let source = three_commit_repo(&tmp);
    let options = AnalyzerOptions {
        entrypoint: Some(PathBuf::from("pkg")),
        details: true,
    };
    let backend = LangBackend::new(source, options)
        .unwrap()
        .with_worktree_root(tmp.path().join("worktrees"));

    let items = collect(backend.fetch(None).unwrap());

    assert_eq!(items.len(), 3);
    for item in &items {
        let breakdown = item.analysis().unwrap()["breakdown"].as_object().unwrap();
        assert_eq!(breakdown["util.py"], serde_json::json!("Python"));
    }
}

#[test]
fn details_without_entrypoint_fails_before_any_worktree() {
    let tmp = TempDir::new().unwrap();
    let source = three_commit_repo(&tmp);
    let root = tmp.path().join("worktrees");

    let options = AnalyzerOptions {
        entrypoint: None,
        details: true,
    };
    let result = DepsBackend::new(source, options);
    assert!(matches!(result, Err(Error::Configuration(_))));
    assert!(!root.exists());
}

#[test]
fn unknown_category_fails_before_any_worktree() {
    let tmp = TempDir::new().unwrap();
    let source = three_commit_repo(&tmp);
    let root = tmp.path().join("worktrees");
    let backend = DepsBackend::new(source, AnalyzerOptions::default())
        .unwrap()
        .with_worktree_root(&root);

    let result = backend.fetch(Some("code_sentiment"));
    assert!(matches!(result, Err(Error::Configuration(_))));
    assert!(!root.join("mined.git").exists());
}

#[test]
fn items_follow_commit_log_order() {
    let tmp = TempDir::new().unwrap();
    let source = three_commit_repo(&tmp);
    let backend = DepsBackend::new(source.clone(), AnalyzerOptions::default())
        .unwrap()
        .with_worktree_root(tmp.path().join("worktrees"));

    let expected: Vec<String> = CommitLog::new(&source)
        .commits()
        .unwrap()
        .into_iter()
        .map(|c| c.commit)
        .collect();
    assert_eq!(expected.len(), 3);

    let produced: Vec<String> = collect(backend.fetch(None).unwrap())
        .iter()
        .map(|item| item.commit().unwrap().to_string())
        .collect();
    assert_eq!(produced, expected);
}

#[test]
fn abandoning_a_fetch_disposes_the_worktree() {
    let tmp = TempDir::new().unwrap();
    let source = three_commit_repo(&tmp);
    let root = tmp.path().join("worktrees");
    let backend = LangBackend::new(source, AnalyzerOptions::default())
        .unwrap()
        .with_worktree_root(&root);

    {
        let mut fetch = backend.fetch(None).unwrap();
        let first = fetch.next().unwrap().unwrap();
        assert_eq!(first.category, CATEGORY_CODE_LANGUAGE);
        assert!(root.join("mined.git").exists());
        // Stop iterating; dropping the fetch must clean up.
    }
    assert!(!root.join("mined.git").exists());
}

#[test]
fn commit_metadata_is_embedded_unchanged() {
    let tmp = TempDir::new().unwrap();
    let source = three_commit_repo(&tmp);
    let backend = LangBackend::new(source.clone(), AnalyzerOptions::default())
        .unwrap()
        .with_worktree_root(tmp.path().join("worktrees"));

    let commits = CommitLog::new(&source).commits().unwrap();
    let items = collect(backend.fetch(None).unwrap());

    for (commit, item) in commits.iter().zip(&items) {
        assert_eq!(item.data["commit"], serde_json::json!(commit.commit));
        assert_eq!(item.data["author"], serde_json::json!(commit.author));
        assert_eq!(item.data["message"], serde_json::json!(commit.message));
    }
}
