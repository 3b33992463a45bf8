//! Verifier Module: is this shell trustworthy as a fuzzing target?
//!
//! A binary passes only if every check agrees with its declared build
//! options. There are no partial passes and no retries.
//!
//! # Pipeline
//!
//! ```text
//! file → debug → more-deterministic → asan → arm-simulator (arm32) → arm-simulator (arm64)
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use shell_inspect::{BinaryVerifier, ExpectedConfig, InspectConfig};
//!
//! let verifier = BinaryVerifier::from_config(InspectConfig::default())?;
//! let report = verifier.verify(Path::new("dist/bin/js"), &ExpectedConfig::default())?;
//! println!("{}", report.summary());
//! ```

pub mod pipeline;
pub mod report;

pub use pipeline::{BinaryVerifier, ARM32_SIMULATOR_CHECK, ARM64_SIMULATOR_CHECK};
pub use report::{ConfigCheck, VerificationReport};
