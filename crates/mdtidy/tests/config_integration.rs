//! End-to-end tests for settings loaded from config files and `MDTIDY_*`
//! variables.
//!
//! Each test builds a throwaway project, runs the binary inside it, and
//! checks what the analyzer or formatter actually did with the settings.

use assert_cmd::Command;
use assert_cmd::assert::Assert;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Four blank lines between two paragraphs; the default keeps two.
const GAPPY: &str = "a\n\n\n\n\nb\n";

#[allow(deprecated)]
fn cmd() -> Command {
    Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap()
}

/// A temporary project directory with helpers for running mdtidy in it.
struct Project {
    tmp: TempDir,
}

impl Project {
    fn new() -> Self {
        Self {
            tmp: TempDir::new().unwrap(),
        }
    }

    fn path(&self, rel: &str) -> PathBuf {
        self.tmp.path().join(rel)
    }

    fn write(&self, rel: &str, contents: &str) -> &Self {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
        self
    }

    fn mkdir(&self, rel: &str) -> &Self {
        fs::create_dir_all(self.path(rel)).unwrap();
        self
    }

    /// Run mdtidy with `-C <rel>` prepended.
    fn run_in(&self, rel: &str, args: &[&str]) -> Assert {
        let dir = self.path(rel);
        cmd().arg("-C").arg(dir).args(args).assert()
    }

    fn run(&self, args: &[&str]) -> Assert {
        self.run_in(".", args)
    }

    fn formatted_in(&self, rel: &str, doc: &str) -> String {
        let out = self.run_in(rel, &["format", doc]).success();
        String::from_utf8(out.get_output().stdout.clone()).unwrap()
    }

    fn formatted(&self, doc: &str) -> String {
        self.formatted_in(".", doc)
    }

    fn json(&self, args: &[&str]) -> Value {
        let out = self.run(args).success();
        serde_json::from_slice(&out.get_output().stdout).expect("valid JSON on stdout")
    }

    fn settings(&self) -> Value {
        self.json(&["info", "--json"])["config"].clone()
    }
}

fn ends_with(path: &Value, name: &str) -> bool {
    path.as_str()
        .is_some_and(|p| Path::new(p).file_name().is_some_and(|f| f == name))
}

// =============================================================================
// Discovered Files Drive the Engine
// =============================================================================

#[test]
fn defaults_apply_without_any_file() {
    let project = Project::new();
    project.write("doc.md", GAPPY);

    assert_eq!(project.formatted("doc.md"), "a\n\n\nb\n");

    let settings = project.settings();
    assert!(settings["config_file"].is_null());
    assert_eq!(settings["words_per_minute"]["Ok"], 200);
    assert_eq!(settings["max_blank_lines"]["Ok"], 2);
    assert_eq!(
        settings["max_input_bytes"],
        mdtidy_core::DEFAULT_MAX_INPUT_BYTES
    );
}

#[test]
fn toml_dotfile_caps_blank_lines() {
    let project = Project::new();
    project
        .write(".mdtidy.toml", "max_blank_lines = 1\n")
        .write("doc.md", GAPPY);

    assert_eq!(project.formatted("doc.md"), "a\n\nb\n");
    assert!(ends_with(&project.settings()["config_file"], ".mdtidy.toml"));
}

#[test]
fn yaml_file_sets_reading_speed() {
    let project = Project::new();
    let words = vec!["word"; 300].join(" ");
    project
        .write("mdtidy.yaml", "words_per_minute: 100\n")
        .write("doc.md", &words);

    let report = project.json(&["analyze", "doc.md", "--json"]);
    assert_eq!(report["counts"]["reading_time_minutes"], 3);
}

#[test]
fn json_file_found_from_nested_directory() {
    let project = Project::new();
    project
        .write("mdtidy.json", r#"{"max_blank_lines": 1}"#)
        .write("docs/guide/doc.md", GAPPY);

    assert_eq!(project.formatted_in("docs/guide", "doc.md"), "a\n\nb\n");
}

#[test]
fn regular_name_beats_dotfile_in_same_directory() {
    let project = Project::new();
    project
        .write(".mdtidy.toml", "max_blank_lines = 1\n")
        .write("mdtidy.toml", "max_blank_lines = 3\n")
        .write("doc.md", GAPPY);

    assert_eq!(project.formatted("doc.md"), "a\n\n\n\nb\n");
}

#[test]
fn nearest_directory_shadows_outer_file() {
    let project = Project::new();
    project
        .write(".mdtidy.toml", "max_blank_lines = 1\nwords_per_minute = 50\n")
        .write("sub/.mdtidy.toml", "max_blank_lines = 3\n")
        .write("sub/doc.md", GAPPY);

    assert_eq!(project.formatted_in("sub", "doc.md"), "a\n\n\n\nb\n");

    // Only the nearest directory is read, so the outer reading speed is unused.
    let out = project.run_in("sub", &["info", "--json"]).success();
    let info: Value = serde_json::from_slice(&out.get_output().stdout).unwrap();
    assert_eq!(info["config"]["words_per_minute"]["Ok"], 200);
}

#[test]
fn git_boundary_hides_outer_file() {
    let project = Project::new();
    project
        .write(".mdtidy.toml", "max_blank_lines = 1\n")
        .mkdir("repo/.git")
        .write("repo/docs/doc.md", GAPPY);

    assert_eq!(project.formatted_in("repo/docs", "doc.md"), "a\n\n\nb\n");
}

#[test]
fn file_beside_git_directory_is_used() {
    let project = Project::new();
    project
        .mkdir("repo/.git")
        .write("repo/.mdtidy.toml", "max_blank_lines = 1\n")
        .write("repo/docs/doc.md", GAPPY);

    assert_eq!(project.formatted_in("repo/docs", "doc.md"), "a\n\nb\n");
}

#[test]
fn explicit_config_beats_discovered_file() {
    let project = Project::new();
    project
        .write(".mdtidy.toml", "max_blank_lines = 3\n")
        .write("strict.toml", "max_blank_lines = 1\n")
        .write("doc.md", GAPPY);

    project
        .run(&["--config", "strict.toml", "format", "doc.md"])
        .success()
        .stdout(predicate::str::diff("a\n\nb\n"));
}

#[test]
fn unknown_keys_do_not_block_loading() {
    let project = Project::new();
    project
        .write(".mdtidy.toml", "max_blank_lines = 1\nline_width = 80\n")
        .write("doc.md", GAPPY);

    assert_eq!(project.formatted("doc.md"), "a\n\nb\n");
}

// =============================================================================
// Environment Overrides
// =============================================================================

#[test]
fn env_var_beats_config_file() {
    let project = Project::new();
    project
        .write(".mdtidy.toml", "max_blank_lines = 3\n")
        .write("doc.md", GAPPY);

    cmd()
        .env("MDTIDY_MAX_BLANK_LINES", "1")
        .arg("-C")
        .arg(project.path("."))
        .args(["format", "doc.md"])
        .assert()
        .success()
        .stdout(predicate::str::diff("a\n\nb\n"));
}

#[test]
fn env_var_nests_scoring_keys_with_double_underscore() {
    let project = Project::new();
    project.write("doc.md", "# Title\n\n- one\n- two\n");

    let out = cmd()
        .env("MDTIDY_SCORING__LISTS_BONUS", "0.0")
        .arg("-C")
        .arg(project.path("."))
        .args(["analyze", "doc.md", "--json"])
        .assert()
        .success();
    let report: Value = serde_json::from_slice(&out.get_output().stdout).unwrap();
    assert_eq!(report["scores"]["structure_quality"], 75.0);
}

#[test]
fn partial_scoring_table_changes_structure_score() {
    let doc = "# Title\n\n- one\n- two\n";
    let baseline = Project::new();
    baseline.write("doc.md", doc);
    let tuned = Project::new();
    tuned
        .write(".mdtidy.yaml", "scoring:\n  lists_bonus: 0.0\n")
        .write("doc.md", doc);

    let before = baseline.json(&["analyze", "doc.md", "--json"]);
    let after = tuned.json(&["analyze", "doc.md", "--json"]);
    assert_eq!(before["scores"]["structure_quality"], 90.0);
    assert_eq!(after["scores"]["structure_quality"], 75.0);
}

// =============================================================================
// Invalid Settings
// =============================================================================

#[test]
fn zero_words_per_minute_is_shown_then_rejected() {
    let project = Project::new();
    project
        .write(".mdtidy.toml", "words_per_minute = 0\n")
        .write("doc.md", "text\n");

    assert!(project.settings()["words_per_minute"]["Err"].is_string());
    project
        .run(&["analyze", "doc.md"])
        .failure()
        .stderr(predicate::str::contains("invalid analysis configuration"));

    // Formatting does not depend on the reading speed.
    assert_eq!(project.formatted("doc.md"), "text\n");
}

#[test]
fn negative_max_blank_lines_is_shown_then_rejected() {
    let project = Project::new();
    project
        .write(".mdtidy.json", r#"{"max_blank_lines": -2}"#)
        .write("doc.md", "text\n");

    let settings = project.settings();
    let err = settings["max_blank_lines"]["Err"].as_str().unwrap();
    assert!(err.contains("max_blank_lines"));
    project
        .run(&["format", "doc.md"])
        .failure()
        .stderr(predicate::str::contains("invalid format configuration"));
}

#[test]
fn negative_weight_is_rejected() {
    let project = Project::new();
    project
        .write(".mdtidy.toml", "[scoring]\nheadings_bonus = -5.0\n")
        .write("doc.md", "# Title\n");

    project
        .run(&["analyze", "doc.md"])
        .failure()
        .stderr(predicate::str::contains("headings_bonus"));
}

#[test]
fn mistyped_value_fails_to_load() {
    let project = Project::new();
    project
        .write(".mdtidy.toml", "words_per_minute = \"fast\"\n")
        .write("doc.md", "text\n");

    project
        .run(&["format", "doc.md"])
        .failure()
        .stderr(predicate::str::contains("failed to load configuration"));
}

#[test]
fn malformed_yaml_fails_to_load() {
    let project = Project::new();
    project.write(".mdtidy.yaml", "scoring:\n  lists_bonus: [broken\n");

    project
        .run(&["info"])
        .failure()
        .stderr(predicate::str::contains("failed to load configuration"));
}

// =============================================================================
// Input Limit
// =============================================================================

#[test]
fn configured_input_limit_is_enforced() {
    let project = Project::new();
    project
        .write(".mdtidy.toml", "max_input_bytes = 8\n")
        .write("doc.md", "longer than eight bytes\n");

    project
        .run(&["format", "doc.md"])
        .failure()
        .stderr(predicate::str::contains("input too large"));
}

#[test]
fn disabled_input_limit_ignores_max_bytes() {
    let project = Project::new();
    project
        .write(
            ".mdtidy.toml",
            "max_input_bytes = 8\ndisable_input_limit = true\n",
        )
        .write("doc.md", "longer than eight bytes\n");

    assert_eq!(project.formatted("doc.md"), "longer than eight bytes\n");
    assert!(project.settings()["max_input_bytes"].is_null());
}
