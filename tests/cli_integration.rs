//! CLI integration tests for the `docoutline` binary

#![allow(deprecated)] // cargo_bin deprecation

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

/// Helper: `docoutline` running inside `dir`, so no stray config file is picked up
fn docoutline(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("docoutline").expect("binary 'docoutline' should be built");
    cmd.current_dir(dir).env_remove("RUST_LOG");
    cmd
}

fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn convert_markdown_to_default_output() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("doc.md"), "# A\n## B\n# C\n").unwrap();

    docoutline(dir.path())
        .args(["convert", "doc.md"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(3 headings)"));

    let json = read_json(&dir.path().join("doc.json"));
    assert_eq!(json["title"], "A");
    assert_eq!(json["outline"].as_array().unwrap().len(), 3);
    assert_eq!(json["outline"][1]["level"], "H2");
}

#[test]
fn convert_to_stdout_with_lines_per_page() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("doc.md"), "#### Preface [L1-2]\n# Main Title [L3-4]\n").unwrap();

    docoutline(dir.path())
        .args(["convert", "doc.md", "--stdout", "--lines-per-page", "2"])
        .assert()
        .success()
        .stdout(predicate::str::diff(
            r#"{"title":"Main Title","outline":[{"level":"H4","text":"Preface","page":1},{"level":"H1","text":"Main Title","page":2}]}"#
                .to_owned()
                + "\n",
        ));

    assert!(!dir.path().join("doc.json").exists());
}

#[test]
fn convert_verbose_reports_every_stage() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("doc.md"), "# Title\n").unwrap();

    docoutline(dir.path())
        .args(["convert", "doc.md", "--stdout", "--validate", "-v"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Initializing: format markdown"))
        .stderr(predicate::str::contains("Validating: schema valid"))
        .stderr(predicate::str::contains("Writing: stdout"))
        .stderr(predicate::str::contains("Completed: 1 headings"));
}

#[test]
fn convert_pretty_output_file() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("in.md"), "# Title\n").unwrap();

    docoutline(dir.path())
        .args(["convert", "in.md", "custom/out.json", "--pretty", "-q"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let text = fs::read_to_string(dir.path().join("custom/out.json")).unwrap();
    assert!(text.starts_with("{\n  \"title\": \"Title\","));
}

#[test]
fn convert_empty_document() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("empty.md"), "").unwrap();

    docoutline(dir.path())
        .args(["convert", "empty.md", "--stdout"])
        .assert()
        .success()
        .stdout("{\"title\":\"\",\"outline\":[]}\n");
}

#[test]
fn convert_missing_input() {
    let dir = tempdir().unwrap();

    docoutline(dir.path())
        .args(["convert", "nope.md"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn convert_with_encoding() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("latin.md"), b"# Caf\xe9\n").unwrap();

    docoutline(dir.path())
        .args(["convert", "latin.md", "--stdout"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("latin.md"));

    docoutline(dir.path())
        .args(["convert", "latin.md", "--stdout", "--encoding", "latin1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"title\":\"Café\""));
}

#[test]
fn convert_spans_with_validation_failure() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("spans.json"),
        r#"[{"text":"Heading","font_size":20.0,"page_index":0},
            {"text":"body","font_size":10.0,"page_index":0},
            {"text":"body","font_size":10.0,"page_index":0}]"#,
    )
    .unwrap();

    docoutline(dir.path())
        .args(["convert", "spans.json", "--validate"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("outline[0].page"))
        .stderr(predicate::str::contains("minimum 1"));
    assert!(!dir.path().join("spans.outline.json").exists());

    docoutline(dir.path())
        .args(["convert", "spans.json"])
        .assert()
        .success();
    assert_eq!(read_json(&dir.path().join("spans.outline.json"))["outline"][0]["page"], 0);
}

#[test]
fn convert_directory_batch() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("docs");
    fs::create_dir(&input).unwrap();
    fs::write(input.join("one.md"), "# One\n").unwrap();
    fs::write(input.join("two.markdown"), "## Two\n").unwrap();
    fs::write(input.join("skip.png"), "").unwrap();

    docoutline(dir.path())
        .args(["convert", "docs", "out"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total files:  2"))
        .stdout(predicate::str::contains("Errors:       0"));

    assert_eq!(read_json(&dir.path().join("out/one.json"))["title"], "One");
    assert_eq!(read_json(&dir.path().join("out/two.json"))["title"], "Two");
}

#[test]
fn convert_directory_with_failure() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("good.md"), "# Good\n").unwrap();
    fs::write(dir.path().join("bad.md"), b"# \xff broken\n").unwrap();

    docoutline(dir.path())
        .args(["convert", "."])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Errors:       1"))
        .stderr(predicate::str::contains("bad.md"));

    assert!(dir.path().join("good.json").exists());
}

#[test]
fn convert_directory_rejects_stdout() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.md"), "# A\n").unwrap();

    docoutline(dir.path())
        .args(["convert", ".", "--stdout"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--stdout"));
}

#[test]
fn config_file_and_cli_override() {
    let dir = tempdir().unwrap();
    let mut text = String::new();
    for _ in 0..10 {
        text.push_str("body\n");
    }
    text.push_str("# Late\n");
    fs::write(dir.path().join("doc.md"), text).unwrap();
    fs::write(dir.path().join("docoutline.toml"), "lines_per_page = 5\n").unwrap();

    docoutline(dir.path())
        .args(["convert", "doc.md", "--stdout"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"page\":3"));

    docoutline(dir.path())
        .args(["convert", "doc.md", "--stdout", "-l", "100"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"page\":1"));
}

#[test]
fn invalid_explicit_config() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("doc.md"), "# A\n").unwrap();
    fs::write(dir.path().join("bad.toml"), "lines_per_page = 0\n").unwrap();

    docoutline(dir.path())
        .args(["convert", "doc.md", "--config", "bad.toml"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("lines_per_page"));
}

#[test]
fn validate_command() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("good.json"),
        r#"{"title":"A","outline":[{"level":"H1","text":"A","page":1}]}"#,
    )
    .unwrap();
    fs::write(
        dir.path().join("bad.json"),
        r#"{"title":"A","outline":[{"level":"H9","text":"","page":1}]}"#,
    )
    .unwrap();

    docoutline(dir.path())
        .args(["validate", "good.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("valid"));

    docoutline(dir.path())
        .args(["validate", "bad.json"])
        .assert()
        .code(3)
        .stdout(predicate::str::contains("outline[0].level"))
        .stdout(predicate::str::contains("minLength 1"));
}

#[test]
fn info_command() {
    let dir = tempdir().unwrap();

    docoutline(dir.path())
        .arg("info")
        .assert()
        .success()
        .stdout(predicate::str::contains("docoutline v"))
        .stdout(predicate::str::contains("Lines per page: 50"))
        .stdout(predicate::str::contains("docoutline.toml"));
}
