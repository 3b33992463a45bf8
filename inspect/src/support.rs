//! Exit-code classification for feature support probes.

use crate::error::{InspectError, InspectResult};
use serde::{Deserialize, Serialize};

/// Map the exit code of a support probe to "supported" / "not supported".
///
/// Codes 1 through 3 all mean the shell rejected the probe:
/// - usage error is 1 in newer js shells, 2 in older js shells and xpcshell
/// - an uncaught script error is 3 in most shells, 1 in some versions
///
/// Anything else (crash, signal, valgrind error code) means the probe itself
/// is broken and is reported as [`InspectError::UnexpectedExitCode`].
pub fn classify_support(exit_code: i32) -> InspectResult<bool> {
    match exit_code {
        0 => Ok(true),
        1..=3 => Ok(false),
        code => Err(InspectError::UnexpectedExitCode { code }),
    }
}

/// Whether a binary is an embedded shell host or a standalone js shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShellKind {
    #[serde(rename = "xpcshell")]
    Xpcshell,
    #[serde(rename = "jsShell")]
    JsShell,
}

impl ShellKind {
    /// Script that only evaluates cleanly inside the embedded host.
    pub const PROBE_SCRIPT: &'static str = "Components";

    pub fn from_host_probe(supported: bool) -> Self {
        if supported {
            Self::Xpcshell
        } else {
            Self::JsShell
        }
    }
}

impl std::fmt::Display for ShellKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Xpcshell => write!(f, "xpcshell"),
            Self::JsShell => write!(f, "jsShell"),
        }
    }
}
