//! Build configuration queries against `getBuildConfiguration()`.
//!
//! The shell reports its own build record through the `getBuildConfiguration()`
//! builtin. We print one field per invocation and decode it as JSON, after
//! lower-casing so `True`/`False` spellings decode as booleans too.

use crate::error::{InspectError, InspectResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Field names the verifier reads.
pub mod fields {
    pub const DEBUG: &str = "debug";
    pub const MORE_DETERMINISTIC: &str = "more-deterministic";
    pub const ASAN: &str = "asan";
    pub const ARM_SIMULATOR: &str = "arm-simulator";
}

/// One decoded build configuration field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BuildConfigValue(pub Value);

impl BuildConfigValue {
    /// The value as a boolean, if it is one.
    pub fn as_bool(&self) -> Option<bool> {
        self.0.as_bool()
    }

    /// JS-style truthiness: `false`, `null`, `0` and `""` are falsy.
    pub fn is_truthy(&self) -> bool {
        match &self.0 {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
            Value::String(s) => !s.is_empty(),
            Value::Array(_) | Value::Object(_) => true,
        }
    }
}

impl std::fmt::Display for BuildConfigValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Script printing `field` from the shell's build configuration.
pub fn build_config_script(field: &str) -> String {
    format!(r#"print(getBuildConfiguration()["{field}"])"#)
}

/// Decode the stdout of a build configuration query.
///
/// Trailing whitespace is stripped and the text lower-cased before parsing.
/// Anything that is not valid JSON afterwards (including `undefined` for an
/// unknown field) is [`InspectError::MalformedProbeOutput`].
pub fn parse_build_config_output(field: &str, stdout: &str) -> InspectResult<BuildConfigValue> {
    let normalized = stdout.trim_end().to_lowercase();
    serde_json::from_str::<Value>(&normalized)
        .map(BuildConfigValue)
        .map_err(|source| InspectError::MalformedProbeOutput {
            field: field.to_string(),
            output: stdout.to_string(),
            source,
        })
}
