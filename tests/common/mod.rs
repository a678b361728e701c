//! Common test utilities for bgroups integration tests.
//!
//! Provides `TestEnv` for isolated test environments that don't touch the
//! user's `~/.local/share/breakout-groups/` directory.

#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
pub use tempfile::TempDir;

/// Default parameter file name used by the binary.
pub const CONFIG_FILE: &str = "breakout_groups.cfg";

/// A test environment with an isolated data directory.
///
/// The `bg()` method returns a `Command` that sets `BG_DATA_DIR`
/// per-invocation, making tests parallel-safe.
pub struct TestEnv {
    pub data_dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            data_dir: TempDir::new().unwrap(),
        }
    }

    /// Get a Command for the bgroups binary with isolated data directory.
    pub fn bg(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_bgroups"));
        cmd.env("BG_DATA_DIR", self.data_dir.path());
        cmd.env_remove("BG_CONFIG_FILE");
        cmd.env_remove("BG_LOG");
        cmd
    }

    pub fn data_path(&self) -> &Path {
        self.data_dir.path()
    }

    pub fn config_path(&self) -> PathBuf {
        self.data_path().join(CONFIG_FILE)
    }

    pub fn write_config(&self, text: &str) {
        fs::write(self.config_path(), text).expect("Failed to write parameter file");
    }

    pub fn read_config(&self) -> String {
        fs::read_to_string(self.config_path()).unwrap_or_default()
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a command's stdout as JSON.
pub fn parse_json(output: &[u8]) -> serde_json::Value {
    serde_json::from_slice(output).expect("stdout is not JSON")
}
