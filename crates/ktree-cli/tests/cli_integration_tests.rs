//! CLI integration tests for ktree
//!
//! Runs the binary end-to-end with assert_cmd. Nothing here talks to an LLM:
//! every command either stops before building a client or is expected to fail
//! for lack of an API key.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Command isolated from the user's config and API keys
#[allow(deprecated)]
fn ktree_cmd(config_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("ktree").unwrap();
    cmd.env("KTREE_CONFIG_DIR", config_dir.path());
    cmd.env_remove("KTREE_API_KEY");
    cmd.env_remove("OPENROUTER_API_KEY");
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_lists_commands() {
    let dir = TempDir::new().unwrap();
    ktree_cmd(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("generate"))
        .stdout(predicate::str::contains("pass"))
        .stdout(predicate::str::contains("mvg"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_config_list_shows_defaults() {
    let dir = TempDir::new().unwrap();
    ktree_cmd(&dir)
        .args(["config", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("generator.pass_ratio = 0.1"))
        .stdout(predicate::str::contains("extractors.wikipedia = true"));
}

#[test]
fn test_config_set_then_get() {
    let dir = TempDir::new().unwrap();
    ktree_cmd(&dir)
        .args(["config", "set", "generator.max_iterations", "12"])
        .assert()
        .success();

    ktree_cmd(&dir)
        .args(["config", "get", "generator.max_iterations"])
        .assert()
        .success()
        .stdout(predicate::str::contains("12"));

    assert!(dir.path().join("config.toml").exists());
}

#[test]
fn test_config_path_uses_override_dir() {
    let dir = TempDir::new().unwrap();
    ktree_cmd(&dir)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_seed_only_dry_run() {
    let dir = TempDir::new().unwrap();
    ktree_cmd(&dir)
        .args(["generate", "--seed-only", "--dry-run", "--domains", "CS"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Loaded 3 seed definitions"))
        .stdout(predicate::str::contains("Axioms:"));
}

#[test]
fn test_seed_only_json_output() {
    let dir = TempDir::new().unwrap();
    ktree_cmd(&dir)
        .args(["generate", "--seed-only", "--dry-run", "--domains", "BIOLOGY", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"seeds_loaded\": 3"));
}

#[test]
fn test_seed_only_persists_to_database() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("graph.db");
    let db_arg = db.to_str().unwrap();

    ktree_cmd(&dir)
        .args(["generate", "--seed-only", "--domains", "PHYSICS", "--database", db_arg])
        .assert()
        .success()
        .stdout(predicate::str::contains("Loaded 3 seed definitions"));

    ktree_cmd(&dir)
        .args(["generate", "--seed-only", "--domains", "PHYSICS", "--database", db_arg])
        .assert()
        .success()
        .stdout(predicate::str::contains("Loaded 0 seed definitions"));
}

#[test]
fn test_generate_without_api_key_fails() {
    let dir = TempDir::new().unwrap();
    ktree_cmd(&dir)
        .args(["generate", "--dry-run", "--target", "2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No API key found"));
}

#[test]
fn test_invalid_pass_type() {
    let dir = TempDir::new().unwrap();
    ktree_cmd(&dir)
        .args(["pass", "sideways", "--dry-run"])
        .assert()
        .failure();
}
