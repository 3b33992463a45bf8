//! Shell Verifier
//!
//! Command-line front end over `shell_inspect`: verify a js shell build,
//! or run any single probe by hand.
//!
//! # Usage
//!
//! ```bash
//! # Plain 64-bit opt build
//! shell-verifier verify dist/bin/js
//!
//! # 32-bit debug build with the ARM32 simulator, JSON report
//! shell-verifier verify dist/bin/js --enable32 --enable-dbg --enable-simulator-arm32 --json
//!
//! # Build options from a file, longer probe timeout
//! SHELL_INSPECT_PROBE_TIMEOUT_SECS=300 shell-verifier verify dist/bin/js --expect opts.toml
//!
//! # Single probes
//! shell-verifier arch dist/bin/js
//! shell-verifier query dist/bin/js asan
//! shell-verifier supports dist/bin/js -- --no-ion -e 42
//! ```

pub mod cli;

pub use cli::{run, Args, BuildFlags, Command};
