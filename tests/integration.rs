//! Integration tests for snapcat


use harness::{TestDir, run_json, run_snapcat};
use snapcat::TreeNode;

#[test]
fn test_tree_ignores_builtin_patterns() {
    let dir = TestDir::new();
    dir.add_file("a.txt", "hi");
    dir.add_file("b.log", "noise");

    let json = run_json(dir.path(), &["tree"]);
    assert_eq!(
        json["a.txt"]["contentHash"],
        "8f434346648f6b96df89dda901c5176b10a6d83961dd3c1ac88b59b2dc327aa4"
    );
    assert_eq!(json["a.txt"]["sizeFormatted"], "2.00B");
    assert!(json.get("b.log").is_none(), "b.log should be ignored: {}", json);
}

#[test]
fn test_tree_ignore_flag() {
    let dir = TestDir::new();
    dir.add_file("keep.rs", "fn keep() {}");
    dir.add_file("skip.tmpl", "template");
    dir.add_file("fixtures/data.json", "{}");

    let json = run_json(dir.path(), &["tree", "--ignore", "*.tmpl", "fixtures"]);
    assert!(json.get("keep.rs").is_some());
    assert!(json.get("skip.tmpl").is_none());
    assert!(json.get("fixtures").is_none());
}

#[test]
fn test_tree_reads_ignore_files() {
    let dir = TestDir::new();
    dir.add_file(".gitignore", "# generated\n*.gen\n");
    dir.add_file(".snapcatignore", "secrets/\n");
    dir.add_file("code.gen", "generated");
    dir.add_file("secrets/key.pem", "-----");
    dir.add_file("main.rs", "fn main() {}");

    let json = run_json(dir.path(), &["tree"]);
    assert!(json.get("main.rs").is_some());
    assert!(json.get("code.gen").is_none());
    assert!(json.get("secrets").is_none());
}

#[test]
fn test_tree_nested_directories() {
    let dir = TestDir::new();
    dir.add_file("src/lib.rs", "pub mod a;");
    dir.add_file("src/a/mod.rs", "pub fn a() {}");

    let json = run_json(dir.path(), &["tree"]);
    assert_eq!(json["src"]["a"]["mod.rs"]["fileKind"], "file");
    assert_eq!(json["src"]["lib.rs"]["relativePath"], "src/lib.rs");
}

#[test]
fn test_tree_depth_zero_keeps_directories_as_records() {
    let dir = TestDir::new();
    dir.add_file("top.txt", "top");
    dir.add_file("sub/inner.txt", "inner");

    let json = run_json(dir.path(), &["tree", "--depth", "0"]);
    assert_eq!(json["sub"]["fileKind"], "directory");
    assert!(json["sub"].get("contentHash").is_none());
    assert!(json["sub"].get("inner.txt").is_none());
}

#[test]
fn test_tree_no_recursive() {
    let dir = TestDir::new();
    dir.add_file("a/b/c.txt", "deep");

    let json = run_json(dir.path(), &["tree", "--no-recursive"]);
    assert_eq!(json["a"]["fileKind"], "directory");
}

#[test]
fn test_tree_target_argument() {
    let dir = TestDir::new();
    dir.add_file("project/src/main.rs", "fn main() {}");
    dir.add_file("other.txt", "outside");

    let json = run_json(dir.path(), &["tree", "project"]);
    assert!(json.get("other.txt").is_none());
    assert_eq!(json["src"]["main.rs"]["relativePath"], "project/src/main.rs");
}

#[test]
fn test_tree_json_round_trip() {
    let dir = TestDir::new();
    dir.add_file("a.txt", "alpha");
    dir.add_file("d/b.txt", "beta");

    let (stdout, stderr, success) = run_snapcat(dir.path(), &["tree"]);
    assert!(success, "{}", stderr);
    let tree: TreeNode = serde_json::from_str(&stdout).unwrap();

    let mut leaves: Vec<_> = tree
        .leaves()
        .iter()
        .map(|r| (r.relative_path.clone(), r.content_hash.clone()))
        .collect();
    leaves.sort();
    assert_eq!(leaves.len(), 2);
    assert_eq!(leaves[0].0, "a.txt");
    assert_eq!(leaves[1].0, "d/b.txt");
    assert!(leaves.iter().all(|(_, hash)| hash.is_some()));
}

#[test]
fn test_tree_markdown_output() {
    let dir = TestDir::new();
    dir.add_file("docs/guide.md", "# Guide\n\nRead me.");

    let (stdout, stderr, success) =
        run_snapcat(dir.path(), &["tree", "--format", "md", "--preview"]);
    assert!(success, "{}", stderr);
    assert!(stdout.contains("# docs/"), "{}", stdout);
    assert!(stdout.contains("## guide.md"));
    assert!(stdout.contains("```md\n# Guide\nRead me.\n```"));
    assert!(stdout.contains("### Metadata"));
    assert!(stdout.contains("---"));
}

#[test]
fn test_cat_matches_pattern_only() {
    let dir = TestDir::new();
    dir.add_file("x.ts", "export const x = 1;");
    dir.add_file("y.js", "module.exports = 2;");

    let json = run_json(dir.path(), &["cat", "*.ts", "x.*"]);
    let list = json.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["relativePath"], "x.ts");
    assert_eq!(list[0]["extension"], ".ts");
    assert_eq!(list[0]["baseName"], "x");
}

#[test]
fn test_cat_sorted_by_path() {
    let dir = TestDir::new();
    dir.add_file("b.md", "b");
    dir.add_file("a.json", "{}");
    dir.add_file("c/d.md", "d");

    let json = run_json(dir.path(), &["cat", "**/*.{md,json}"]);
    let paths: Vec<_> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["relativePath"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(paths, vec!["a.json", "b.md", "c/d.md"]);
}

#[test]
fn test_cat_sorted_as_strings() {
    let dir = TestDir::new();
    dir.add_file("a/x.ts", "1");
    dir.add_file("a-b/x.ts", "2");
    dir.add_file("a.ts", "3");

    let json = run_json(dir.path(), &["cat", "**/*.ts"]);
    let paths: Vec<_> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["relativePath"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(paths, vec!["a-b/x.ts", "a.ts", "a/x.ts"]);
}

#[test]
fn test_cat_preview_too_large() {
    let dir = TestDir::new();
    dir.add_file("big.txt", &"x".repeat(200_000));

    let json = run_json(dir.path(), &["cat", "big.txt", "--preview", "--max-size", "102400"]);
    assert_eq!(
        json[0]["previewLines"],
        serde_json::json!(["[File too large for preview]"])
    );
}

#[test]
fn test_cat_preview_binary() {
    let dir = TestDir::new();
    dir.add_bytes("logo.png", &[0x89, b'P', b'N', b'G', 0x00, 0x1A]);

    let json = run_json(dir.path(), &["cat", "logo.png", "--preview"]);
    assert_eq!(
        json[0]["previewLines"],
        serde_json::json!(["[Binary file or unsupported format]"])
    );
}

#[test]
fn test_cat_no_match_fails() {
    let dir = TestDir::new();
    dir.add_file("readme.md", "hi");

    let (stdout, stderr, success) = run_snapcat(dir.path(), &["cat", "*.nothing"]);
    assert!(!success);
    assert!(stdout.is_empty());
    assert!(
        stderr.contains("Cat command failed: No files were successfully processed"),
        "{}",
        stderr
    );
}

#[test]
fn test_output_file_written() {
    let dir = TestDir::new();
    dir.add_file("a.txt", "hi");

    let (stdout, stderr, success) =
        run_snapcat(dir.path(), &["cat", "a.txt", "--output", "snap.json"]);
    assert!(success, "{}", stderr);
    assert!(stdout.is_empty());

    let written = std::fs::read_to_string(dir.path().join("snap.json")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(json[0]["relativePath"], "a.txt");
}
