//! Integration tests for flag catalog layering.
//!
//! These tests verify:
//! - System catalog provides defaults
//! - Project catalog overrides system defaults per flag
//! - `--config` replaces the project catalog
//! - `status` reports which layers were loaded
//! - `--reveal-on-load` outranks every catalog layer

mod common;

use common::TestEnv;
use std::fs;

#[test]
fn test_system_catalog_only() {
    let env = TestEnv::new();
    env.write_system_catalog("flag \"disableHome\" #true\n");

    let json = env.json(&["get", "disableHome"]);
    assert_eq!(json["value"], true);
    assert_eq!(json["known"], true);
}

#[test]
fn test_project_overrides_system_default() {
    let env = TestEnv::new();
    env.write_system_catalog("flag \"disableHome\" #true\nflag \"disableProjects\" #true\n");
    env.write_project_catalog("flag \"disableHome\" #false\n");

    let json = env.json(&["get", "disableHome"]);
    assert_eq!(json["value"], false);

    let json = env.json(&["get", "disableProjects"]);
    assert_eq!(json["value"], true);

    let json = env.json(&["status"]);
    let sources: Vec<&str> = json["config_layers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["source"].as_str().unwrap())
        .collect();
    assert_eq!(sources, vec!["system", "project"]);
}

#[test]
fn test_explicit_config_replaces_project_catalog() {
    let env = TestEnv::with_catalog("flag \"disableHome\" #false\n");
    let alt = env.path().join("alt.kdl");
    fs::write(&alt, "flag \"disableHome\" #true\ndev-flag \"altOnly\"\n").unwrap();

    let json = env.json(&["--config", alt.to_str().unwrap(), "get", "disableHome"]);
    assert_eq!(json["value"], true);

    let json = env.json(&["--config", alt.to_str().unwrap(), "list"]);
    assert_eq!(json["dev"][0]["id"], "altOnly");
}

#[test]
fn test_missing_explicit_config_fails() {
    let env = TestEnv::new();

    env.flagdeck()
        .args(["--config", "does-not-exist.kdl", "list"])
        .assert()
        .failure();
}

#[test]
fn test_no_catalog_lists_nothing() {
    let env = TestEnv::new();

    let json = env.json(&["list"]);
    assert!(json["defined"].as_array().unwrap().is_empty());
    assert!(json["dev"].as_array().unwrap().is_empty());

    let json = env.json(&["status"]);
    assert!(json["config_layers"].as_array().unwrap().is_empty());
}

#[test]
fn test_overrides_survive_catalog_edits() {
    let env = TestEnv::with_catalog("flag \"disableHome\" #false\n");
    env.json(&["set", "disableHome", "true"]);

    // Flag removed from the catalog: override is still reported
    env.write_project_catalog("flag \"disableProjects\" #true\n");
    let json = env.json(&["list"]);
    assert_eq!(json["unlisted"][0]["id"], "disableHome");
    assert_eq!(json["unlisted"][0]["value"], true);
}

// ============================================================================
// --reveal-on-load
// ============================================================================

#[test]
fn test_reveal_on_load_flag_opens_editor_for_seeded_session() {
    let env = TestEnv::with_catalog("flag \"disableHome\" #false\n");

    let json = env.json(&["--reveal-on-load", "true", "status"]);
    assert_eq!(json["reveal_on_load"], true);
    assert_eq!(json["reveal_on_load_source"], "cli_flag");

    env.json(&["--reveal-on-load", "true", "import", r#"{"disableHome": true}"#]);
    let json = env.json(&["status"]);
    assert_eq!(json["visible"], true);
}

#[test]
fn test_reveal_on_load_flag_overrides_catalog() {
    let env = TestEnv::with_catalog("flag \"disableHome\" #false\nreveal-on-load #true\n");

    let json = env.json(&["status"]);
    assert_eq!(json["reveal_on_load"], true);
    assert_eq!(json["reveal_on_load_source"], "project");

    env.json(&["import", r#"{"disableHome": true}"#, "--reveal-on-load", "false"]);
    let json = env.json(&["--reveal-on-load", "false", "status"]);
    assert_eq!(json["visible"], false);
    assert_eq!(json["has_overrides"], true);
}

#[test]
fn test_reveal_on_load_flag_rejects_non_bool() {
    let env = TestEnv::new();

    env.flagdeck()
        .args(["--reveal-on-load", "sometimes", "status"])
        .assert()
        .failure();
}
