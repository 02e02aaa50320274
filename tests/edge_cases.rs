//! Edge case and error handling tests for snapcat


use assert_cmd::Command;
use harness::{TestDir, run_json, run_snapcat};
use predicates::prelude::*;

fn snapcat(dir: &TestDir) -> Command {
    let mut cmd = Command::cargo_bin("snapcat").expect("binary should build");
    cmd.current_dir(dir.path()).env_remove("SNAPCAT_LOG_LEVEL");
    cmd
}

// ============================================================================
// CLI surface
// ============================================================================

#[test]
fn test_no_arguments_prints_help() {
    let dir = TestDir::new();
    snapcat(&dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"))
        .stdout(predicate::str::contains("tree"));
}

#[test]
fn test_unknown_subcommand_lists_commands() {
    let dir = TestDir::new();
    snapcat(&dir)
        .arg("frobnicate")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Available commands"))
        .stderr(predicate::str::contains("cat"));
}

#[test]
fn test_version_flag() {
    let dir = TestDir::new();
    snapcat(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_docs_topics() {
    let dir = TestDir::new();
    snapcat(&dir)
        .args(["docs", "license"])
        .assert()
        .success()
        .stdout(predicate::str::contains("MIT License"));

    snapcat(&dir)
        .arg("docs")
        .assert()
        .success()
        .stdout(predicate::str::contains("Available documentation topics"));
}

#[test]
fn test_info() {
    let dir = TestDir::new();
    snapcat(&dir)
        .arg("info")
        .assert()
        .success()
        .stdout(predicate::str::contains("Quick Start"));
}

// ============================================================================
// Validation
// ============================================================================

#[test]
fn test_negative_depth_rejected() {
    let dir = TestDir::new();
    snapcat(&dir)
        .args(["tree", "--depth", "-1"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "Tree command failed: Depth must be a non-negative integer",
        ));
}

#[test]
fn test_depth_too_large_rejected() {
    let dir = TestDir::new();
    snapcat(&dir)
        .args(["tree", "--depth", "101"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Depth too large"));
}

#[test]
fn test_unknown_format_rejected() {
    let dir = TestDir::new();
    snapcat(&dir)
        .args(["tree", "--format", "yaml"])
        .assert()
        .code(1);
}

#[test]
fn test_missing_target_rejected() {
    let dir = TestDir::new();
    snapcat(&dir)
        .args(["tree", "nowhere"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Target path does not exist"));
}

#[test]
fn test_file_target_rejected() {
    let dir = TestDir::new();
    dir.add_file("plain.txt", "x");
    snapcat(&dir)
        .args(["tree", "plain.txt"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("not a directory"));
}

#[test]
fn test_cat_requires_patterns() {
    let dir = TestDir::new();
    snapcat(&dir).arg("cat").assert().code(1);
}

#[test]
fn test_control_characters_in_ignore_rejected() {
    let dir = TestDir::new();
    snapcat(&dir)
        .args(["tree", "--ignore", "bad\tpattern"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("control characters"));
}

#[test]
fn test_invalid_max_size_rejected() {
    let dir = TestDir::new();
    snapcat(&dir)
        .args(["cat", "*", "--max-size", "lots"])
        .assert()
        .code(1);
}

#[test]
fn test_output_to_missing_directory_fails() {
    let dir = TestDir::new();
    dir.add_file("a.txt", "hi");
    snapcat(&dir)
        .args(["cat", "a.txt", "--output", "missing/dir/out.json"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to write output"));
}

#[test]
fn test_debug_prints_cause_chain() {
    let dir = TestDir::new();
    snapcat(&dir)
        .args(["cat", "a.txt", "--debug", "--output", "missing/out.json"])
        .assert()
        .code(1);

    dir.add_file("a.txt", "hi");
    snapcat(&dir)
        .args(["cat", "a.txt", "--debug", "--output", "missing/out.json"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("caused by"));
}

// ============================================================================
// Filesystem edge cases
// ============================================================================

#[test]
fn test_empty_directory() {
    let dir = TestDir::new();
    let json = run_json(dir.path(), &["tree"]);
    assert_eq!(json, serde_json::json!({}));
}

#[test]
fn test_empty_subdirectory_is_empty_object() {
    let dir = TestDir::new();
    dir.add_dir("empty");
    let json = run_json(dir.path(), &["tree"]);
    assert_eq!(json["empty"], serde_json::json!({}));
}

#[test]
fn test_hidden_entries() {
    let dir = TestDir::new();
    dir.add_file(".env", "KEY=1");
    dir.add_file("visible.txt", "v");

    let json = run_json(dir.path(), &["tree"]);
    assert!(json.get(".env").is_none());

    let json = run_json(dir.path(), &["tree", "--show-hidden"]);
    assert!(json.get(".env").is_some());

    // cat includes dotfiles
    let json = run_json(dir.path(), &["cat", "*"]);
    let names: Vec<_> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["relativePath"].as_str().unwrap().to_string())
        .collect();
    assert!(names.contains(&".env".to_string()));
}

#[test]
fn test_cat_skips_ignored_ancestors() {
    let dir = TestDir::new();
    dir.add_file("node_modules/pkg/index.js", "module.exports = 1;");
    dir.add_file("src/app.js", "run();");

    let json = run_json(dir.path(), &["cat", "**/*.js"]);
    let list = json.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["relativePath"], "src/app.js");
}

#[test]
fn test_cat_all_ignored_is_empty_list() {
    let dir = TestDir::new();
    dir.add_file("trace.log", "x");
    let json = run_json(dir.path(), &["cat", "*.log"]);
    assert_eq!(json, serde_json::json!([]));
}

#[test]
fn test_cat_duplicate_patterns_deduplicated() {
    let dir = TestDir::new();
    dir.add_file("x.ts", "1");
    let json = run_json(dir.path(), &["cat", "x.ts", "*.ts", "./x.ts"]);
    assert_eq!(json.as_array().unwrap().len(), 1);
}

#[cfg(unix)]
#[test]
fn test_symlink_reported_not_followed() {
    use std::os::unix::fs::symlink;

    let dir = TestDir::new();
    dir.add_file("real/file.txt", "data");
    symlink(dir.path().join("real"), dir.path().join("link")).unwrap();

    let json = run_json(dir.path(), &["tree"]);
    assert_eq!(json["link"]["fileKind"], "symlink");
    assert!(json["link"].get("contentHash").is_none());
    assert_eq!(json["real"]["file.txt"]["fileKind"], "file");
}

#[cfg(unix)]
#[test]
fn test_unreadable_directory_skipped() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TestDir::new();
    dir.add_file("ok.txt", "fine");
    let locked = dir.add_dir("locked");
    dir.add_file("locked/secret.txt", "hidden");
    std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o000)).unwrap();

    let (stdout, _stderr, success) = run_snapcat(dir.path(), &["tree"]);
    std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).unwrap();

    assert!(success);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert!(json.get("ok.txt").is_some());
    // Root can still read the directory; otherwise it is omitted.
    if let Some(locked) = json.get("locked") {
        assert!(locked.is_object());
    }
}

#[cfg(unix)]
#[test]
fn test_permissions_string() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TestDir::new();
    let script = dir.add_file("run.sh", "#!/bin/sh\necho hi\n");
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o750)).unwrap();

    let json = run_json(dir.path(), &["cat", "run.sh"]);
    assert_eq!(json[0]["permissions"], "rwxr-x---");
}

#[test]
fn test_verbose_logs_summary_to_stderr() {
    let dir = TestDir::new();
    dir.add_file("a.txt", "hi");
    let (stdout, stderr, success) = run_snapcat(dir.path(), &["tree", "--verbose"]);
    assert!(success);
    assert!(stderr.contains("tree finished"), "{}", stderr);
    assert!(stderr.contains("cache:"), "{}", stderr);
    // stdout stays pure JSON
    serde_json::from_str::<serde_json::Value>(&stdout).unwrap();
}

#[test]
fn test_timeout_in_milliseconds_accepted() {
    let dir = TestDir::new();
    dir.add_file("a.txt", "hi");
    let json = run_json(dir.path(), &["cat", "a.txt", "--timeout", "30000"]);
    assert_eq!(json.as_array().unwrap().len(), 1);
}
