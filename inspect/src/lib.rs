//! JavaScript shell build inspector
//!
//! Checks that a compiled js shell (or xpcshell) was actually built the way
//! its build options say before it is handed to a fuzzer:
//!
//! - bitness from the `file` tool
//! - `debug`, `more-deterministic`, `asan` and `arm-simulator` from the
//!   shell's own `getBuildConfiguration()`
//! - feature support probes classified by exit code
//!
//! Every probe is a blocking process invocation with a hard timeout. All
//! failures are fatal for the call that hit them.

pub mod arch;
pub mod build_config;
pub mod build_opts;
pub mod config;
pub mod error;
pub mod inspector;
pub mod libs;
pub mod platform;
pub mod runner;
pub mod support;
pub mod valgrind;
pub mod verifier;

pub use arch::Bitness;
pub use build_config::BuildConfigValue;
pub use build_opts::ExpectedConfig;
pub use config::InspectConfig;
pub use error::{InspectError, InspectResult};
pub use inspector::ShellInspector;
pub use platform::HostPlatform;
pub use runner::{CommandRunner, ProbeCommand, ProbeOutput, ProcessRunner, StderrMode};
pub use support::{classify_support, ShellKind};
pub use verifier::{BinaryVerifier, ConfigCheck, VerificationReport};
