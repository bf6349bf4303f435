//! Shared git fixtures for backend integration tests
//!
//! Builds a small bare history programmatically through the object database,
//! so no worktree, subprocess or network is involved.

use std::collections::BTreeMap;

use git2::{Oid, Repository};
use strata_core::RepositorySource;
use tempfile::TempDir;

const FILEMODE_BLOB: i32 = 0o100644;
const FILEMODE_TREE: i32 = 0o040000;

/// Write a commit whose tree holds `files` (path -> content, one directory
/// level deep at most) and advance HEAD to it.
pub fn commit_files(
    repo: &Repository,
    message: &str,
    files: &[(&str, &str)],
) -> Oid {
    let mut root_entries: Vec<(String, Oid)> = Vec::new();
    let mut subdirs: BTreeMap<String, Vec<(String, Oid)>> = BTreeMap::new();

    for (path, content) in files {
        let blob = repo.blob(content.as_bytes()).unwrap();
        match path.split_once('/') {
            Some((dir, name)) => subdirs
                .entry(dir.to_string())
                .or_default()
                .push((name.to_string(), blob)),
            None => root_entries.push((path.to_string(), blob)),
        }
    }

    let mut builder = repo.treebuilder(None).unwrap();
    for (name, blob) in root_entries {
        builder.insert(&name, blob, FILEMODE_BLOB).unwrap();
    }
    for (dir, entries) in subdirs {
        let mut sub = repo.treebuilder(None).unwrap();
        for (name, blob) in entries {
            sub.insert(&name, blob, FILEMODE_BLOB).unwrap();
        }
        let sub_oid = sub.write().unwrap();
        builder.insert(&dir, sub_oid, FILEMODE_TREE).unwrap();
    }
    let tree = repo.find_tree(builder.write().unwrap()).unwrap();

    let sig = git2::Signature::now("Tester", "tester@example.com").unwrap();
    let parent = repo
        .head()
        .ok()
        .and_then(|h| h.target())
        .map(|oid| repo.find_commit(oid).unwrap());
    let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();

    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
        .unwrap()
}

/// A three-commit history mixing Python and Rust sources. Every commit
/// carries a `pkg/` directory so entrypoint-scoped runs succeed end to end.
pub fn three_commit_repo(tmp: &TempDir) -> RepositorySource {
    let repo_path = tmp.path().join("mined.git");
    let repo = Repository::init_bare(&repo_path).unwrap();

    commit_files(
        &repo,
        "add application skeleton",
        &[
            ("main.py", "import os\n\nclass App:\n    pass\n"),
            ("pkg/util.py", "# helpers\n\nclass Helper:\n    pass\n"),
            ("README.md", "# fixture\n"),
        ],
    );
    commit_files(
        &repo,
        "add engine and grow helpers",
        &[
            ("main.py", "import os\n\nclass App:\n    pass\n"),
            (
                "pkg/util.py",
                "from main import App\n\nclass Helper(App):\n    def assist(self):\n        pass\n",
            ),
            ("engine.rs", "pub struct Engine;\n\ntrait Drive {}\n\nimpl Drive for Engine {}\n"),
            ("README.md", "# fixture\n"),
        ],
    );
    commit_files(
        &repo,
        "wire helper into the app",
        &[
            (
                "main.py",
                "import os\nfrom pkg.util import Helper\n\nclass App:\n    def run(self):\n        return Helper()\n",
            ),
            (
                "pkg/util.py",
                "from main import App\n\nclass Helper(App):\n    def assist(self):\n        pass\n",
            ),
            ("engine.rs", "pub struct Engine;\n\ntrait Drive {}\n\nimpl Drive for Engine {}\n"),
            ("README.md", "# fixture\n"),
        ],
    );

    RepositorySource::new("http://example.com/fixture", &repo_path).unwrap()
}
