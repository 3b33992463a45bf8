//! Inspector configuration: timeout tiers and external tool names.

use crate::error::{InspectError, InspectResult};
use crate::valgrind::DEFAULT_VALGRIND_ERROR_CODE;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Configuration for the shell inspector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InspectConfig {
    /// Timeout for short probes: support checks and the `file` tool (seconds)
    pub probe_timeout_secs: u64,
    /// Timeout for build configuration queries and general test runs (seconds).
    /// Scripts under test can legitimately be slow.
    pub query_timeout_secs: u64,
    /// File-type inspection command
    pub file_command: String,
    /// Exit code valgrind uses to report errors
    pub valgrind_error_code: i32,
}

impl Default for InspectConfig {
    fn default() -> Self {
        Self {
            probe_timeout_secs: 99,
            query_timeout_secs: 999,
            file_command: "file".to_string(),
            valgrind_error_code: DEFAULT_VALGRIND_ERROR_CODE,
        }
    }
}

impl InspectConfig {
    /// Load from a TOML file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> InspectResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| InspectError::Config {
            message: format!("Failed to read {}: {e}", path.display()),
        })?;
        Self::from_toml_str(&content).map_err(|e| InspectError::Config {
            message: format!("{}: {e}", path.display()),
        })
    }

    /// Parse from TOML text.
    pub fn from_toml_str(content: &str) -> InspectResult<Self> {
        toml::from_str(content).map_err(|e| InspectError::Config {
            message: format!("Invalid inspector TOML: {e}"),
        })
    }

    /// Apply `SHELL_INSPECT_*` environment overrides.
    pub fn with_env_overrides(self) -> InspectResult<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> InspectResult<Self> {
        if let Some(v) = lookup("SHELL_INSPECT_PROBE_TIMEOUT_SECS") {
            self.probe_timeout_secs = parse_secs("SHELL_INSPECT_PROBE_TIMEOUT_SECS", &v)?;
        }
        if let Some(v) = lookup("SHELL_INSPECT_QUERY_TIMEOUT_SECS") {
            self.query_timeout_secs = parse_secs("SHELL_INSPECT_QUERY_TIMEOUT_SECS", &v)?;
        }
        if let Some(v) = lookup("SHELL_INSPECT_FILE_CMD") {
            if !v.trim().is_empty() {
                self.file_command = v;
            }
        }
        Ok(self)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout_secs)
    }
}

fn parse_secs(key: &str, value: &str) -> InspectResult<u64> {
    match value.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(InspectError::Config {
            message: format!("{key} must be a positive integer, got {value:?}"),
        }),
    }
}
