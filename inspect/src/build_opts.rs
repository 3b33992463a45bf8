//! Expected build options for a shell binary.

use crate::error::{InspectError, InspectResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The build options a shell was supposedly compiled with.
///
/// Produced by whoever configured the build; the verifier only reads it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpectedConfig {
    /// 32-bit build
    pub enable32: bool,
    /// Debug build (`--enable-debug`)
    pub enable_dbg: bool,
    /// `--enable-more-deterministic`
    pub enable_more_deterministic: bool,
    /// AddressSanitizer build
    pub build_with_asan: bool,
    /// ARM32 simulator (only meaningful with `enable32`)
    pub enable_simulator_arm32: bool,
    /// ARM64 simulator (only meaningful without `enable32`)
    pub enable_simulator_arm64: bool,
}

impl ExpectedConfig {
    /// Load from a TOML file; omitted flags default to `false`.
    pub fn from_file(path: &Path) -> InspectResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| InspectError::Config {
            message: format!("Failed to read {}: {e}", path.display()),
        })?;
        toml::from_str(&content).map_err(|e| InspectError::Config {
            message: format!("Invalid build options in {}: {e}", path.display()),
        })
    }

    /// Simulator flags only make sense with the matching bitness.
    pub fn simulator_consistent(&self) -> bool {
        !(self.enable_simulator_arm32 && !self.enable32)
            && !(self.enable_simulator_arm64 && self.enable32)
    }
}
