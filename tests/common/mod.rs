//! Common test utilities for flagdeck integration tests.
//!
//! Provides `TestEnv` for isolated test environments that don't pollute
//! the user's `~/.local/share/flagdeck/` or `~/.config/flagdeck/` directories.

#![allow(dead_code)]

use assert_cmd::Command;
use serde_json::Value;
use std::fs;
pub use tempfile::TempDir;

/// A test environment with isolated project, data, and config directories.
///
/// The `flagdeck()` method returns a `Command` that sets `FLAGDECK_DATA_DIR`
/// and `FLAGDECK_CONFIG_DIR` per-invocation, making tests parallel-safe.
pub struct TestEnv {
    pub project_dir: TempDir,
    pub data_dir: TempDir,
    pub config_dir: TempDir,
}

impl TestEnv {
    /// Create a new test environment with isolated directories.
    pub fn new() -> Self {
        Self {
            project_dir: TempDir::new().unwrap(),
            data_dir: TempDir::new().unwrap(),
            config_dir: TempDir::new().unwrap(),
        }
    }

    /// Create a test environment with a project catalog.
    pub fn with_catalog(kdl: &str) -> Self {
        let env = Self::new();
        env.write_project_catalog(kdl);
        env
    }

    /// Get a Command for the flagdeck binary with isolated directories.
    pub fn flagdeck(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_flagdeck"));
        cmd.current_dir(self.project_dir.path());
        cmd.env("FLAGDECK_DATA_DIR", self.data_dir.path());
        cmd.env("FLAGDECK_CONFIG_DIR", self.config_dir.path());
        cmd.env_remove("FLAGDECK_PROJECT");
        cmd.env_remove("FLAGDECK_LOG");
        cmd
    }

    /// Run a command expecting success and parse its JSON output.
    pub fn json(&self, args: &[&str]) -> Value {
        let output = self
            .flagdeck()
            .args(args)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        parse_json(&output)
    }

    /// Write `<project>/flagdeck.kdl`.
    pub fn write_project_catalog(&self, kdl: &str) {
        fs::write(self.project_dir.path().join("flagdeck.kdl"), kdl)
            .expect("Failed to write project catalog");
    }

    /// Write `$FLAGDECK_CONFIG_DIR/flags.kdl`.
    pub fn write_system_catalog(&self, kdl: &str) {
        fs::write(self.config_dir.path().join("flags.kdl"), kdl)
            .expect("Failed to write system catalog");
    }

    pub fn path(&self) -> &std::path::Path {
        self.project_dir.path()
    }

    pub fn data_path(&self) -> &std::path::Path {
        self.data_dir.path()
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse JSON output from a command.
pub fn parse_json(output: &[u8]) -> Value {
    serde_json::from_slice(output).expect("Failed to parse JSON output")
}
