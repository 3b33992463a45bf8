//! Inspection error types
//!
//! Every failure on the inspection path is fatal for the current call.
//! Nothing here is retried internally; the caller decides whether to discard
//! the binary, abort the fuzzing session or alert someone.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for inspection operations
pub type InspectResult<T> = Result<T, InspectError>;

/// Errors that can occur while probing or verifying a shell binary
#[derive(Error, Debug)]
pub enum InspectError {
    /// The process did not exit within its allotted window
    #[error("`{command}` timed out after {timeout_secs}s")]
    TimeoutExceeded { command: String, timeout_secs: u64 },

    /// The process could not be started, or its output could not be read
    #[error("Failed to execute `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// A support probe exited outside the recognized 0..=3 range
    #[error("Unexpected exit code in shell support probe: {code}")]
    UnexpectedExitCode { code: i32 },

    /// Build configuration output was not valid JSON after normalization
    #[error("Malformed output for build configuration field \"{field}\": {output:?}")]
    MalformedProbeOutput {
        field: String,
        output: String,
        #[source]
        source: serde_json::Error,
    },

    /// The file-type description had contradictory or missing bitness markers
    #[error("Architecture check failed: {reason} (file type: {file_type:?})")]
    ArchitectureAssertionFailure { reason: String, file_type: String },

    /// A verified field disagrees with the expected build options
    #[error(
        "Build configuration mismatch for \"{field}\" in {binary}: expected {expected}, got {actual}"
    )]
    ConfigurationMismatch {
        binary: PathBuf,
        field: String,
        expected: String,
        actual: String,
    },

    /// The blocking runtime used to enforce timeouts could not be created
    #[error("Failed to start probe runtime: {0}")]
    Runtime(#[source] std::io::Error),

    /// Configuration file unreadable or invalid
    #[error("Config error: {message}")]
    Config { message: String },
}

impl InspectError {
    /// Machine-readable code for the error kind.
    pub fn code(&self) -> &'static str {
        match self {
            Self::TimeoutExceeded { .. } => "TIMEOUT_EXCEEDED",
            Self::Spawn { .. } => "SPAWN_FAILED",
            Self::UnexpectedExitCode { .. } => "UNEXPECTED_EXIT_CODE",
            Self::MalformedProbeOutput { .. } => "MALFORMED_PROBE_OUTPUT",
            Self::ArchitectureAssertionFailure { .. } => "ARCHITECTURE_ASSERTION_FAILURE",
            Self::ConfigurationMismatch { .. } => "CONFIGURATION_MISMATCH",
            Self::Runtime(_) => "RUNTIME_ERROR",
            Self::Config { .. } => "CONFIG_ERROR",
        }
    }

    /// Whether the error means the binary itself was rejected, as opposed to
    /// the probe machinery failing around it.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::ConfigurationMismatch { .. } | Self::ArchitectureAssertionFailure { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mismatch_message_names_field_and_values() {
        let err = InspectError::ConfigurationMismatch {
            binary: PathBuf::from("/tmp/js"),
            field: "asan".to_string(),
            expected: "true".to_string(),
            actual: "false".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("\"asan\""));
        assert!(msg.contains("expected true"));
        assert!(msg.contains("got false"));
        assert!(msg.contains("/tmp/js"));
        assert_eq!(err.code(), "CONFIGURATION_MISMATCH");
        assert!(err.is_rejection());
    }

    #[test]
    fn test_unexpected_exit_code_carries_value() {
        let err = InspectError::UnexpectedExitCode { code: 139 };
        assert!(err.to_string().ends_with("139"));
        assert!(!err.is_rejection());
    }

    #[test]
    fn test_timeout_message() {
        let err = InspectError::TimeoutExceeded {
            command: "js -e 42".to_string(),
            timeout_secs: 99,
        };
        assert_eq!(err.to_string(), "`js -e 42` timed out after 99s");
        assert_eq!(err.code(), "TIMEOUT_EXCEEDED");
    }
}
