//! Verifier Pipeline: sequential build configuration checks
//!
//! Runs the architecture check and then each build configuration check in
//! order. The first mismatch aborts the pipeline; later checks never run.

use super::report::{ConfigCheck, VerificationReport};
use crate::arch::Bitness;
use crate::build_config::fields;
use crate::build_opts::ExpectedConfig;
use crate::config::InspectConfig;
use crate::error::{InspectError, InspectResult};
use crate::inspector::ShellInspector;
use crate::runner::{CommandRunner, ProcessRunner};
use serde_json::Value;
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

/// Check names for the two simulator checks, which both read `arm-simulator`.
pub const ARM32_SIMULATOR_CHECK: &str = "arm-simulator (arm32)";
pub const ARM64_SIMULATOR_CHECK: &str = "arm-simulator (arm64)";

/// The Verifier: decides whether a shell binary was built as declared
pub struct BinaryVerifier<R> {
    inspector: ShellInspector<R>,
}

impl BinaryVerifier<ProcessRunner> {
    /// Verifier that runs real processes on the current host.
    pub fn from_config(config: InspectConfig) -> InspectResult<Self> {
        Ok(Self::new(ShellInspector::new(ProcessRunner::new()?, config)))
    }
}

impl<R: CommandRunner> BinaryVerifier<R> {
    pub fn new(inspector: ShellInspector<R>) -> Self {
        Self { inspector }
    }

    pub fn inspector(&self) -> &ShellInspector<R> {
        &self.inspector
    }

    /// Verify that `binary` was compiled with `expected`.
    ///
    /// Check order: architecture, `debug`, `more-deterministic`, `asan`,
    /// then the ARM32 and ARM64 simulator checks. Returns the first
    /// mismatch as [`InspectError::ConfigurationMismatch`]; probe failures
    /// propagate unchanged.
    pub fn verify(
        &self,
        binary: &Path,
        expected: &ExpectedConfig,
    ) -> InspectResult<VerificationReport> {
        let start = Instant::now();
        info!(binary = %binary.display(), ?expected, "Verifying shell build");
        if !expected.simulator_consistent() {
            warn!(
                enable32 = expected.enable32,
                arm32 = expected.enable_simulator_arm32,
                arm64 = expected.enable_simulator_arm64,
                "Simulator options do not match the requested bitness; verification will fail"
            );
        }

        // Check 1: bitness
        let bitness = self.inspector.arch_of_binary(binary)?;
        let arch_check = check(
            binary,
            "architecture",
            bitness_value(Bitness::expected(expected.enable32)),
            bitness_value(bitness),
        )?;
        let mut report = VerificationReport::new(binary, bitness);
        report.add_check(arch_check);

        // Checks 2-4: plain boolean fields. Hybrid debug-opt builds exist, so
        // debug is read from the shell rather than inferred from anything else.
        for (field, want) in [
            (fields::DEBUG, expected.enable_dbg),
            (fields::MORE_DETERMINISTIC, expected.enable_more_deterministic),
            (fields::ASAN, expected.build_with_asan),
        ] {
            let actual = self.inspector.query_build_configuration(binary, field)?;
            report.add_check(check(binary, field, Value::Bool(want), actual.0)?);
        }

        // Checks 5-6: one simulator flag, attributed by bitness
        let simulator = self
            .inspector
            .query_build_configuration(binary, fields::ARM_SIMULATOR)?
            .is_truthy();
        report.add_check(check(
            binary,
            ARM32_SIMULATOR_CHECK,
            Value::Bool(expected.enable_simulator_arm32),
            Value::Bool(simulator && expected.enable32),
        )?);
        report.add_check(check(
            binary,
            ARM64_SIMULATOR_CHECK,
            Value::Bool(expected.enable_simulator_arm64),
            Value::Bool(simulator && !expected.enable32),
        )?);

        report.finalize(start.elapsed());
        info!(summary = %report.summary(), "Shell build verified");
        Ok(report)
    }
}

fn bitness_value(bitness: Bitness) -> Value {
    Value::String(bitness.to_string())
}

/// Equality check for one field; mismatch is fatal.
fn check(binary: &Path, field: &str, expected: Value, actual: Value) -> InspectResult<ConfigCheck> {
    if expected != actual {
        warn!(field, %expected, %actual, "Build configuration mismatch");
        return Err(InspectError::ConfigurationMismatch {
            binary: binary.to_path_buf(),
            field: field.to_string(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        });
    }
    info!(field, value = %actual, "Check passed");
    Ok(ConfigCheck {
        field: field.to_string(),
        expected,
        actual,
    })
}
