//! Verification Report: what a successful verification established

use crate::arch::Bitness;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;
use std::time::Duration;

/// One passed check: a field whose reported value matched the build options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigCheck {
    /// Check name (`architecture`, `debug`, `arm-simulator (arm32)`, ...)
    pub field: String,
    pub expected: Value,
    pub actual: Value,
}

/// Report for a binary that passed every check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationReport {
    pub binary: PathBuf,
    pub bitness: Bitness,
    /// Checks in the order they ran
    pub checks: Vec<ConfigCheck>,
    pub duration_ms: u64,
}

impl VerificationReport {
    pub fn new(binary: impl Into<PathBuf>, bitness: Bitness) -> Self {
        Self {
            binary: binary.into(),
            bitness,
            checks: Vec::new(),
            duration_ms: 0,
        }
    }

    pub fn add_check(&mut self, check: ConfigCheck) {
        self.checks.push(check);
    }

    pub fn finalize(&mut self, elapsed: Duration) {
        self.duration_ms = elapsed.as_millis() as u64;
    }

    /// One-line summary for logs and terminal output.
    pub fn summary(&self) -> String {
        format!(
            "{}: {}-bit, {} checks passed in {}ms",
            self.binary.display(),
            self.bitness,
            self.checks.len(),
            self.duration_ms
        )
    }
}
