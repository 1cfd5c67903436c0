//! Integration tests for the bilara-check binary.
//!
//! These tests lay out a corpus and a config file in a temp directory and
//! check exit status and output.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get a command for running bilara-check.
fn bilara_check() -> Command {
    let mut cmd = Command::cargo_bin("bilara-check").unwrap();
    cmd.env_remove("BILARA_CHECK_LOG");
    cmd
}

fn write(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

/// A consistent corpus with every layer configured.
fn clean_corpus() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(
        root,
        "root/mn/mn1.json",
        r#"{"mn1:0.1": "Majjhima Nikāya 1", "mn1:1.1": "Evaṁ me sutaṁ", "mn1:1.2": "ekaṁ samayaṁ bhagavā"}"#,
    );
    write(
        root,
        "html/mn/mn1.json",
        r#"{"mn1:0.1": "<article id='mn1'><header><p>{}</p></header>", "mn1:1.0": "<h2>{}</h2>", "mn1:1.1": "<p>{}", "mn1:1.2": "{}</p>"}"#,
    );
    write(root, "comment/mn/mn1.json", r#"{"mn1:1.1": "See also mn2."}"#);
    write(root, "variant/mn/mn1.json", r#"{"mn1:1.2": "samayaṁ → samayam (bj)"}"#);
    write(
        root,
        "translation/en/sujato/mn/mn1.json",
        r#"{"mn1:1.1": "So I have heard.", "mn1:1.2": "At one time the Buddha"}"#,
    );
    write(root, "reference/mn/mn1.json", r#"{"mn1:1.1": "sc1, ms2M_1", "mn1:1.2": "ms2M_2"}"#);

    let config = root.join("config.toml");
    fs::write(
        &config,
        r#"
languages = ["en"]

[paths]
root = "root"
html = "html"
comment = "comment"
variant = "variant"
translation = "translation"
reference = "reference"
"#,
    )
    .unwrap();
    (dir, config)
}

#[test]
fn help_flag_works() {
    bilara_check()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("reconcile"));
}

#[test]
fn clean_corpus_passes_every_check() {
    let (_dir, config) = clean_corpus();
    bilara_check()
        .arg("--config")
        .arg(&config)
        .arg("all")
        .assert()
        .code(0)
        .stdout(predicate::str::contains("no problems found"));
}

#[test]
fn unordered_root_exits_one() {
    let (dir, config) = clean_corpus();
    write(
        dir.path(),
        "root/mn/mn2.json",
        r#"{"mn2:1.1": "a", "mn2:1.5": "b", "mn2:1.2": "c"}"#,
    );
    bilara_check()
        .arg("--config")
        .arg(&config)
        .arg("root")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("mn2:1.2"));
}

#[test]
fn skipped_segment_exits_one() {
    let (dir, config) = clean_corpus();
    write(dir.path(), "root/mn/mn2.json", r#"{"mn2:1.1": "a", "mn2:1.3": "b"}"#);
    bilara_check()
        .arg("--config")
        .arg(&config)
        .arg("root")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("errors reported"))
        .stderr(
            predicate::str::contains("Sequence error").and(predicate::str::contains("mn2:1.3")),
        );
}

#[test]
fn translation_surplus_counted_per_language() {
    let (dir, config) = clean_corpus();
    write(
        dir.path(),
        "translation/de/sabbamitta/mn/mn1.json",
        r#"{"mn1:1.1": "So habe ich es gehört.", "mn1:1.2": "Einmal", "mn1:1.3": "extra"}"#,
    );
    let contents = fs::read_to_string(&config)
        .unwrap()
        .replace(r#"languages = ["en"]"#, r#"languages = ["en", "de"]"#);
    fs::write(&config, contents).unwrap();

    bilara_check()
        .arg("--config")
        .arg(&config)
        .arg("translation")
        .assert()
        .code(1)
        .stderr(
            predicate::str::contains("'1' of '2' languages have surplus ids")
                .and(predicate::str::contains("mn1:1.3")),
        );
}

#[test]
fn quiet_hides_summary_but_keeps_status() {
    let (dir, config) = clean_corpus();
    write(dir.path(), "comment/mn/mn3.json", r#"{"mn3:1.1": "orphan"}"#);
    bilara_check()
        .args(["--quiet", "--config"])
        .arg(&config)
        .arg("comment")
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("mn3:1.1"));
}

#[test]
fn allow_list_silences_a_check() {
    let (dir, config) = clean_corpus();
    write(dir.path(), "comment/mn/mn3.json", r#"{"mn3:1.1": "orphan"}"#);
    let mut contents = fs::read_to_string(&config).unwrap();
    contents.push_str("\n[allow]\ncomment_surplus = [\"mn3:1.1\"]\n");
    fs::write(&config, contents).unwrap();

    bilara_check()
        .arg("--config")
        .arg(&config)
        .arg("comment")
        .assert()
        .code(0);
}

#[test]
fn variant_without_root_word_reported() {
    let (dir, config) = clean_corpus();
    write(dir.path(), "variant/mn/mn1.json", r#"{"mn1:1.2": "kālaṁ → kalam (pts1ed)"}"#);
    bilara_check()
        .arg("--config")
        .arg(&config)
        .arg("variant")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("kālaṁ"));
}

#[test]
fn reference_audit_flags_unknown_segment() {
    let (dir, config) = clean_corpus();
    write(dir.path(), "reference/mn/mn9.json", r#"{"mn9:1.1": "ms2M_9"}"#);
    bilara_check()
        .arg("--config")
        .arg(&config)
        .arg("reference")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("mn9:1.1"));
}

#[test]
fn reconcile_reports_unplaced_manuscripts() {
    let (dir, config) = clean_corpus();
    write(
        dir.path(),
        "ms/majjhima.json",
        r#"{"ms2M_1": "Evaṁ", "ms2M_2": "ekaṁ", "ms2M_3": "tatra"}"#,
    );
    bilara_check()
        .arg("--config")
        .arg(&config)
        .arg("reconcile")
        .arg("--manuscripts")
        .arg(dir.path().join("ms"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("ms2M_3"));
}

#[test]
fn unconfigured_layer_is_fatal() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.toml");
    fs::write(&config, "[paths]\n").unwrap();
    bilara_check()
        .arg("--config")
        .arg(&config)
        .arg("root")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("paths.root"));
}

#[test]
fn missing_root_directory_is_fatal() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.toml");
    fs::write(&config, "[paths]\nroot = \"nowhere\"\n").unwrap();
    bilara_check()
        .arg("--config")
        .arg(&config)
        .arg("root")
        .assert()
        .code(2);
}

#[test]
fn missing_config_file_is_fatal() {
    let dir = TempDir::new().unwrap();
    bilara_check()
        .arg("--config")
        .arg(dir.path().join("nope.toml"))
        .arg("all")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Failed to load config"));
}
