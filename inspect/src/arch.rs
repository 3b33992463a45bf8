//! Bitness detection from `file` output.

use crate::error::{InspectError, InspectResult};
use crate::platform::HostPlatform;
use serde::{Deserialize, Serialize};

/// Instruction-set width of a binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Bitness {
    #[serde(rename = "32")]
    Bits32,
    #[serde(rename = "64")]
    Bits64,
}

impl Bitness {
    /// Bitness a build is expected to have given its `enable32` option.
    pub fn expected(enable32: bool) -> Self {
        if enable32 {
            Self::Bits32
        } else {
            Self::Bits64
        }
    }
}

impl std::fmt::Display for Bitness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bits32 => write!(f, "32"),
            Self::Bits64 => write!(f, "64"),
        }
    }
}

const WINDOWS_MARKER: &str = "MS Windows";
const WINDOWS_32_MARKER: &str = "Intel 80386 32-bit";
const MARKERS_32: &[&str] = &["32-bit", "i386"];
const MARKER_64: &str = "64-bit";

/// Parse the output of `file <binary>` into a [`Bitness`].
///
/// Only the description after the first `:` is examined, so the binary's own
/// path cannot contribute markers.
pub fn parse_file_type(output: &str, platform: HostPlatform) -> InspectResult<Bitness> {
    let file_type = match output.split_once(':') {
        Some((_, description)) => description.trim(),
        None => return Err(assertion("file output has no ':' separator", output.trim())),
    };

    if platform == HostPlatform::Windows {
        if !file_type.contains(WINDOWS_MARKER) {
            return Err(assertion("not an MS Windows executable", file_type));
        }
        return Ok(if file_type.contains(WINDOWS_32_MARKER) {
            Bitness::Bits32
        } else {
            Bitness::Bits64
        });
    }

    let has_32 = MARKERS_32.iter().any(|m| file_type.contains(m));
    let has_64 = file_type.contains(MARKER_64);
    match (has_32, has_64) {
        (true, false) => Ok(Bitness::Bits32),
        (false, true) => Ok(Bitness::Bits64),
        (true, true) => Err(assertion("both 32-bit and 64-bit markers present", file_type)),
        (false, false) => Err(assertion("no 32-bit or 64-bit marker present", file_type)),
    }
}

fn assertion(reason: &str, file_type: &str) -> InspectError {
    InspectError::ArchitectureAssertionFailure {
        reason: reason.to_string(),
        file_type: file_type.to_string(),
    }
}
