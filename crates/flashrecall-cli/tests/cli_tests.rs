//! CLI integration tests using assert_cmd.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const STORIES: &str = r#"{
  "simple": [
    {"title": "Fox", "sentences": ["The quick brown fox.", "It jumps high."]}
  ],
  "medium": [
    {"title": "Harbor", "sentences": ["Boats rest in the harbor.", "Gulls circle above.", "Night falls slowly."]}
  ]
}"#;

const CONFIG: &str = r#"# test settings
word_delay_ms = 1
display_mode = "word_by_word"
data_dir = "data"

[source]
type = "file"
path = "stories.json"
"#;

fn flashrecall() -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("flashrecall").unwrap();
    cmd.env_remove("FLASHRECALL_STORIES")
        .env_remove("FLASHRECALL_WORD_DELAY_MS")
        .env_remove("RUST_LOG");
    cmd
}

/// A working directory with a config file and a two-story catalog.
fn workspace() -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("flashrecall.toml"), CONFIG).unwrap();
    std::fs::write(dir.path().join("stories.json"), STORIES).unwrap();
    dir
}

fn in_dir(dir: &Path) -> Command {
    let mut cmd = flashrecall();
    cmd.current_dir(dir);
    cmd
}

#[test]
fn help_output() {
    flashrecall()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Story memorization trainer"));
}

#[test]
fn version_output() {
    flashrecall()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("flashrecall"));
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    in_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created flashrecall.toml"))
        .stdout(predicate::str::contains("Created stories.json"));

    assert!(dir.path().join("flashrecall.toml").exists());
    assert!(dir.path().join("stories.json").exists());

    in_dir(dir.path())
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Catalog: 4 stories (2 simple, 1 medium, 1 hard)",
        ))
        .stdout(predicate::str::contains("All stories valid."));
}

#[test]
fn init_skips_existing() {
    let dir = TempDir::new().unwrap();

    in_dir(dir.path()).arg("init").assert().success();

    in_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn validate_reports_warnings() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(
        &path,
        r#"{"simple": [
            {"title": "Twice", "sentences": ["One."]},
            {"title": "Twice", "sentences": ["Two."]},
            {"title": "Hollow", "sentences": []}
        ]}"#,
    )
    .unwrap();

    in_dir(dir.path())
        .arg("validate")
        .arg("--stories")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("duplicate story title: Twice"))
        .stdout(predicate::str::contains("[Hollow] WARNING"))
        .stdout(predicate::str::contains("2 warning(s) found."));
}

#[test]
fn validate_nonexistent_file() {
    let dir = TempDir::new().unwrap();
    in_dir(dir.path())
        .arg("validate")
        .arg("--stories")
        .arg("nonexistent.json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn score_perfect_recall() {
    let dir = workspace();
    in_dir(dir.path())
        .args(["score", "--story", "Fox"])
        .args(["--attempt", "the quick brown fox it jumps high"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Score: 6/6 (100.0%)"))
        .stdout(predicate::str::contains("Perfect recall!"))
        .stdout(predicate::str::contains(
            "Reference: The quick brown fox. It jumps high.",
        ));
}

#[test]
fn score_tolerates_typos_and_reports_missing_words() {
    let dir = workspace();
    in_dir(dir.path())
        .args(["score", "--story", "Fox"])
        .args(["--attempt", "The quick brwn fox. It jumps"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Score: 5/6"))
        .stdout(predicate::str::contains("missing 'high"));
}

#[test]
fn score_last_sentences_from_stdin() {
    let dir = workspace();
    in_dir(dir.path())
        .args(["score", "--story", "Harbor", "--last", "1"])
        .write_stdin("night falls slowly\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Score: 3/3"));
}

#[test]
fn score_json_output() {
    let dir = workspace();
    let output = in_dir(dir.path())
        .args(["score", "--story", "Fox", "--format", "json"])
        .args(["--attempt", "the quick red fox"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["mode"], "positional");
    assert_eq!(json["matched"], 3);
    assert_eq!(json["total"], 6);
    assert!(!json["discrepancies"].as_array().unwrap().is_empty());
}

#[test]
fn score_keywords_mode() {
    let dir = workspace();
    in_dir(dir.path())
        .args(["score", "--story", "Fox", "--mode", "keywords"])
        .args(["--attempt", "a fox jumps"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Keywords recalled: 2/6"));
}

#[test]
fn score_unknown_story() {
    let dir = workspace();
    in_dir(dir.path())
        .args(["score", "--story", "Nope", "--attempt", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("story not found: Nope"));
}

#[test]
fn list_shows_catalog() {
    let dir = workspace();
    in_dir(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Fox"))
        .stdout(predicate::str::contains("Harbor"))
        .stdout(predicate::str::contains("0 of 2 stories played."));

    in_dir(dir.path())
        .args(["list", "--difficulty", "medium"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Harbor"))
        .stdout(predicate::str::contains("Fox").not());
}

#[test]
fn play_runs_to_completion_without_input() {
    let dir = workspace();
    in_dir(dir.path())
        .args(["play", "--story", "Fox"])
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("Fox (simple, 2 sentences)"))
        .stdout(predicate::str::contains("The quick brown fox."))
        .stdout(predicate::str::contains("--- End of story ---"))
        .stdout(predicate::str::contains("No recall attempt given."));

    let progress = std::fs::read_to_string(dir.path().join("data/progress.json")).unwrap();
    assert!(progress.contains("\"Fox\""));
}

#[test]
fn play_quit_then_recall() {
    let dir = workspace();
    in_dir(dir.path())
        .args(["play", "--story", "Fox", "--delay", "60000"])
        .write_stdin("q\nThe quick brown fox. It jumps high.\n1\nit jumps high\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Playback stopped."))
        .stdout(predicate::str::contains("Score: 6/6 (100.0%)"))
        .stdout(predicate::str::contains("Type the last 1 sentence(s):"))
        .stdout(predicate::str::contains("Score: 3/3 (100.0%)"));
}

#[test]
fn play_shows_notes_in_full_sentence_mode() {
    let dir = workspace();
    in_dir(dir.path())
        .args(["notes", "add", "fox", "a red animal"])
        .assert()
        .success();

    in_dir(dir.path())
        .args(["play", "--story", "Fox", "--display", "full"])
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "The quick brown fox (a red animal).",
        ));

    in_dir(dir.path())
        .args(["play", "--story", "Fox", "--display", "full", "--no-notes"])
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("a red animal").not());
}

#[test]
fn play_exhausts_tier_then_reset() {
    let dir = workspace();
    in_dir(dir.path())
        .args(["play", "--difficulty", "simple"])
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("Fox (simple"));

    in_dir(dir.path())
        .args(["play", "--difficulty", "simple"])
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("No unread simple stories left"));

    in_dir(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("1 of 2 stories played."));

    in_dir(dir.path())
        .arg("reset")
        .assert()
        .success()
        .stdout(predicate::str::contains("Progress reset (1 stories cleared)."));

    in_dir(dir.path())
        .args(["play", "--difficulty", "simple"])
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("Fox (simple"));
}

#[test]
fn play_rejects_invalid_delay() {
    let dir = workspace();
    in_dir(dir.path())
        .args(["play", "--story", "Fox", "--delay=0"])
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("word delay must be positive"));
}

#[test]
fn invalid_delay_in_config_is_rejected() {
    let dir = workspace();
    std::fs::write(
        dir.path().join("flashrecall.toml"),
        "word_delay_ms = -5\n",
    )
    .unwrap();
    in_dir(dir.path())
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("word delay must be positive"));
}

#[test]
fn notes_lifecycle() {
    let dir = workspace();

    in_dir(dir.path())
        .args(["notes", "add", "fox", "orange"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added fox (orange)"));

    in_dir(dir.path())
        .args(["notes", "add", "Fox", "a red animal"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated Fox: 'orange' -> 'a red animal'"));

    in_dir(dir.path())
        .args(["notes", "category", "Places"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created category Places"));

    in_dir(dir.path())
        .args(["notes", "add", "harbor", "safe water", "--category", "Places"])
        .assert()
        .success();

    in_dir(dir.path())
        .args(["notes", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Descriptors (1)"))
        .stdout(predicate::str::contains("Places (1)"))
        .stdout(predicate::str::contains("harbor: safe water"));

    in_dir(dir.path())
        .args(["notes", "search", "HAR"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[Places] harbor (safe water)"));

    in_dir(dir.path())
        .args(["notes", "remove", "harbor", "--category", "Places"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed harbor (safe water)"));

    in_dir(dir.path())
        .args(["notes", "remove", "harbor", "--category", "Nowhere"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Nowhere"));
}

#[test]
fn notes_export_and_import() {
    let dir = workspace();
    in_dir(dir.path())
        .args(["notes", "add", "gull", "sea bird"])
        .assert()
        .success();

    let export = dir.path().join("export.json");
    in_dir(dir.path())
        .args(["notes", "export", "--output"])
        .arg(&export)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 1 note(s)"));
    assert!(std::fs::read_to_string(&export).unwrap().contains("sea bird"));

    let incoming = dir.path().join("incoming.json");
    std::fs::write(
        &incoming,
        r#"{"Animals": [{"word": "owl", "desc": "night watcher"}]}"#,
    )
    .unwrap();
    in_dir(dir.path())
        .args(["notes", "import"])
        .arg(&incoming)
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 1 note(s) in 2 categories."));

    in_dir(dir.path())
        .args(["notes", "export"])
        .assert()
        .success()
        .stdout(predicate::str::contains("night watcher"))
        .stdout(predicate::str::contains("sea bird").not());
}

#[test]
fn notes_import_rejects_bad_json() {
    let dir = workspace();
    let bad = dir.path().join("bad.json");
    std::fs::write(&bad, "[1, 2, 3]").unwrap();
    in_dir(dir.path())
        .args(["notes", "import"])
        .arg(&bad)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid notes file format"));
}

#[test]
fn config_set_edits_file_in_place() {
    let dir = workspace();
    in_dir(dir.path())
        .args(["config", "set", "word_delay_ms", "250"])
        .assert()
        .success();

    let content = std::fs::read_to_string(dir.path().join("flashrecall.toml")).unwrap();
    assert!(content.contains("# test settings"));
    assert!(content.contains("word_delay_ms = 250"));

    in_dir(dir.path())
        .args(["config", "set", "word_delay_ms", "0"])
        .assert()
        .failure();

    in_dir(dir.path())
        .args(["config", "set", "colour", "blue"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown config key 'colour'"));
}

#[test]
fn explicit_config_path() {
    let dir = workspace();
    let other = TempDir::new().unwrap();
    std::fs::write(
        other.path().join("stories.json"),
        r#"{"hard": [{"title": "Elsewhere", "sentences": ["Far away."]}]}"#,
    )
    .unwrap();
    let config = other.path().join("custom.toml");
    std::fs::write(
        &config,
        format!(
            "[source]\ntype = \"file\"\npath = \"{}\"\n",
            other.path().join("stories.json").display()
        ),
    )
    .unwrap();

    in_dir(dir.path())
        .arg("list")
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Elsewhere"))
        .stdout(predicate::str::contains("Fox").not());
}

#[test]
fn missing_config_path_fails() {
    let dir = workspace();
    in_dir(dir.path())
        .args(["list", "--config", "missing.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config file not found"));
}
