use std::path::{Path, PathBuf};
use std::process::Command;

use git2::{Repository, Signature, Time};

/// Write `files`, stage them, and commit as `email` at time `when`.
fn commit_files(repo: &Repository, email: &str, when: i64, files: &[(&str, &str)]) {
    let workdir = repo.workdir().unwrap();
    for (path, content) in files {
        let full = workdir.join(path);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(full, content).unwrap();
    }

    let mut index = repo.index().unwrap();
    for (path, _) in files {
        index.add_path(&PathBuf::from(path)).unwrap();
    }
    index.write().unwrap();
    let tree_id = index.write_tree().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();

    let sig = Signature::new("tester", email, &Time::new(when, 0)).unwrap();
    let parent = repo
        .head()
        .ok()
        .and_then(|h| h.target())
        .map(|oid| repo.find_commit(oid).unwrap());
    let parents: Vec<&git2::Commit> = parent.iter().collect();
    repo.commit(Some("HEAD"), &sig, &sig, "test commit", &tree, &parents)
        .unwrap();
}

/// A repo where alice touches {a.rs: 2, b.rs: 1} and bob {a.rs: 1, c.rs: 1}.
fn two_author_repo() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let repo = Repository::init(dir.path()).unwrap();
    commit_files(&repo, "alice@e.com", 1000, &[("a.rs", "a1"), ("b.rs", "b1")]);
    commit_files(&repo, "bob@e.com", 2000, &[("a.rs", "a2"), ("c.rs", "c1")]);
    commit_files(&repo, "alice@e.com", 3000, &[("a.rs", "a3")]);
    dir
}

fn devkin(dir: &Path, args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_devkin"))
        .args(args)
        .current_dir(dir)
        .output()
        .unwrap()
}

#[test]
fn json_report_over_local_repo() {
    let dir = two_author_repo();
    let output = devkin(
        dir.path(),
        &["--path", ".", "--format", "json", "-f", "intersection", "-c", "-1"],
    );
    assert!(
        output.status.success(),
        "devkin failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["commitsAnalyzed"], 3);
    assert_eq!(report["contributors"], 2);
    assert_eq!(report["function"], "intersection");

    let pairs = report["pairs"].as_array().unwrap();
    assert_eq!(pairs.len(), 1);
    assert_eq!(pairs[0]["first"], "alice@e.com");
    assert_eq!(pairs[0]["second"], "bob@e.com");
    // alice has a.rs twice, bob once: min(2, 1) = 1
    assert_eq!(pairs[0]["score"], 1.0);
}

#[test]
fn harmonic_is_the_default_function() {
    let dir = two_author_repo();
    let output = devkin(dir.path(), &["--path", ".", "--format", "json"]);
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["function"], "harmonic");

    // 2 * 2 * 1 / (2 + 1) over the shared a.rs
    let score = report["pairs"][0]["score"].as_f64().unwrap();
    assert!((score - 4.0 / 3.0).abs() < 1e-9);
}

#[test]
fn text_report_prints_aligned_rows() {
    let dir = two_author_repo();
    let output = devkin(dir.path(), &["--path", "."]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let row = stdout.lines().next().unwrap();
    assert!(row.contains("alice@e.com"));
    assert!(row.contains(" | "));
}

#[test]
fn markdown_report_renders_a_table() {
    let dir = two_author_repo();
    let output = devkin(dir.path(), &["--path", ".", "--format", "markdown"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("# Contributor Affinity"));
    assert!(stdout.contains("| Rank |"));
    assert!(stdout.contains("`alice@e.com`"));
}

#[test]
fn window_can_shrink_below_pairing_threshold() {
    let dir = two_author_repo();
    // Only the newest commit: a single contributor, nothing to pair
    let output = devkin(dir.path(), &["--path", ".", "--format", "json", "-c", "1"]);
    assert!(
        output.status.success(),
        "insufficient data must not be a failure"
    );

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["contributors"], 1);
    assert!(report["pairs"].as_array().unwrap().is_empty());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Fewer than 2 contributors"));
}

#[test]
fn rejects_nonpositive_result_count() {
    let dir = two_author_repo();
    let output = devkin(dir.path(), &["--path", ".", "-n", "0"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("must be positive"));
}

#[test]
fn rejects_zero_commit_window() {
    let dir = two_author_repo();
    let output = devkin(dir.path(), &["--path", ".", "-c", "0"]);
    assert!(!output.status.success());
}

#[test]
fn requires_a_repository_argument() {
    let dir = tempfile::tempdir().unwrap();
    let output = devkin(dir.path(), &[]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("No repository given"));
}

#[test]
fn config_file_supplies_defaults() {
    let dir = two_author_repo();
    std::fs::write(
        dir.path().join(".devkin.toml"),
        "[analysis]\nfunction = \"intersection\"\nresults = 1\n",
    )
    .unwrap();

    let output = devkin(dir.path(), &["--path", ".", "--format", "json"]);
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["function"], "intersection");
    assert_eq!(report["pairs"].as_array().unwrap().len(), 1);
}

#[test]
fn cli_flags_override_config_file() {
    let dir = two_author_repo();
    std::fs::write(
        dir.path().join(".devkin.toml"),
        "[analysis]\nfunction = \"intersection\"\n",
    )
    .unwrap();

    let output = devkin(
        dir.path(),
        &["--path", ".", "--format", "json", "-f", "geometric"],
    );
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["function"], "geometric");
}
