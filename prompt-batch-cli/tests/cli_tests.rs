//! Binary-level tests that need no data service

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn cli(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("prompt-batch").unwrap();
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"))
        .env_remove("PROMPT_BATCH_PROFILE")
        .env_remove("PROMPT_BATCH_API_URL")
        .env_remove("PROMPT_BATCH_API_KEY")
        .env_remove("RUST_LOG");
    cmd
}

// ===== Help Tests =====

#[test]
fn test_help_lists_commands() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("wizard"))
        .stdout(predicate::str::contains("templates"))
        .stdout(predicate::str::contains("records"))
        .stdout(predicate::str::contains("preview"));
}

#[test]
fn test_records_rejects_unknown_kind() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .args(["records", "list", "--kind", "email"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

// ===== Preview Tests =====

#[test]
fn test_preview_splits_speaker_turns() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .args(["preview", "--text", "Agent: hi Customer: bye"])
        .assert()
        .success()
        .stdout("Agent:hi\nCustomer:bye\n");
}

#[test]
fn test_preview_caps_utterances() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .args(["preview", "--utterances", "1", "--text", "Agent: hi Customer: bye"])
        .assert()
        .success()
        .stdout("Agent:hi\n...\n");
}

#[test]
fn test_preview_reads_file() {
    let home = TempDir::new().unwrap();
    let path = home.path().join("transcript.txt");
    std::fs::write(&path, "Customer: my order is late\nAgent: let me check\n").unwrap();

    cli(&home)
        .arg("preview")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Customer: my order is late"))
        .stdout(predicate::str::contains("Agent: let me check"));
}

#[test]
fn test_preview_json_output() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .args(["--output", "json", "preview", "--text", "One. Two. Three."])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"utterances\": 6"))
        .stdout(predicate::str::contains("One.\\nTwo.\\nThree."));
}

#[test]
fn test_preview_missing_file_fails() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .args(["preview", "does-not-exist.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read transcript"));
}

// ===== Config Tests =====

#[test]
fn test_env_overrides_wizard_settings() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .env("PROMPT_BATCH__WIZARD__TRANSCRIPT_PREVIEW_UTTERANCES", "1")
        .args(["preview", "--text", "Agent: hi Customer: bye"])
        .assert()
        .success()
        .stdout("Agent:hi\n...\n");
}

// Config directory layout is XDG only on Linux.
#[cfg(target_os = "linux")]
#[test]
fn test_invalid_config_file_is_reported() {
    let home = TempDir::new().unwrap();
    let config_dir = home.path().join(".config").join("prompt-batch-cli");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(config_dir.join("config.toml"), "[wizard]\ncase_page_size = 0\n").unwrap();

    cli(&home)
        .args(["preview", "--text", "hello"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid [wizard] settings"));
}
