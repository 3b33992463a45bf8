//! Command-line arguments and command dispatch.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use shell_inspect::libs::run_libs;
use shell_inspect::valgrind::valgrind_command;
use shell_inspect::{BinaryVerifier, ExpectedConfig, HostPlatform, InspectConfig};
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Inspector configuration TOML (timeouts, file tool); env overrides still apply
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Verify that a shell was built with the expected options
    Verify {
        binary: PathBuf,
        /// Build options TOML; flags below are OR-ed on top
        #[arg(long)]
        expect: Option<PathBuf>,
        #[command(flatten)]
        flags: BuildFlags,
        /// Print the verification report as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print the bitness of a binary (32 or 64)
    Arch { binary: PathBuf },
    /// Print one getBuildConfiguration() field as JSON
    Query { binary: PathBuf, field: String },
    /// Print whether a binary is an xpcshell or a js shell
    Kind { binary: PathBuf },
    /// Print whether a shell accepts the given arguments
    Supports {
        shell: PathBuf,
        #[arg(last = true, required = true)]
        args: Vec<String>,
    },
    /// Run a shell with arguments and print its output and exit code
    Test {
        shell: PathBuf,
        /// Run under valgrind
        #[arg(long, default_value_t = false)]
        valgrind: bool,
        #[arg(last = true)]
        args: Vec<String>,
    },
    /// List the shared libraries a shell needs next to it
    RunLibs {
        /// windows, darwin or linux (default: this host)
        #[arg(long)]
        platform: Option<HostPlatform>,
    },
    /// Print the valgrind command prefix
    ValgrindCmd {
        /// Overrides `valgrind_error_code` from the config
        #[arg(long)]
        error_code: Option<i32>,
        #[arg(long)]
        platform: Option<HostPlatform>,
    },
}

/// Expected build options as flags.
#[derive(clap::Args, Debug, Default, Clone, Copy)]
pub struct BuildFlags {
    #[arg(long, default_value_t = false)]
    pub enable32: bool,
    #[arg(long, default_value_t = false)]
    pub enable_dbg: bool,
    #[arg(long, default_value_t = false)]
    pub enable_more_deterministic: bool,
    #[arg(long, default_value_t = false)]
    pub build_with_asan: bool,
    #[arg(long, default_value_t = false)]
    pub enable_simulator_arm32: bool,
    #[arg(long, default_value_t = false)]
    pub enable_simulator_arm64: bool,
}

impl BuildFlags {
    /// Set every flag given on the command line in `base`.
    pub fn apply(&self, base: ExpectedConfig) -> ExpectedConfig {
        ExpectedConfig {
            enable32: base.enable32 || self.enable32,
            enable_dbg: base.enable_dbg || self.enable_dbg,
            enable_more_deterministic: base.enable_more_deterministic
                || self.enable_more_deterministic,
            build_with_asan: base.build_with_asan || self.build_with_asan,
            enable_simulator_arm32: base.enable_simulator_arm32 || self.enable_simulator_arm32,
            enable_simulator_arm64: base.enable_simulator_arm64 || self.enable_simulator_arm64,
        }
    }
}

/// Defaults, then the config file, then `SHELL_INSPECT_*` overrides.
pub fn load_config(path: Option<&PathBuf>) -> Result<InspectConfig> {
    let config = match path {
        Some(p) => InspectConfig::from_file(p)
            .with_context(|| format!("Failed to load config {}", p.display()))?,
        None => InspectConfig::default(),
    };
    config
        .with_env_overrides()
        .context("Invalid SHELL_INSPECT_* override")
}

/// Execute the parsed command, writing results to `out`.
pub fn run(args: Args, out: &mut impl Write) -> Result<()> {
    let config = load_config(args.config.as_ref())?;

    match args.command {
        Command::RunLibs { platform } => {
            for lib in run_libs(platform.unwrap_or_else(HostPlatform::current)) {
                writeln!(out, "{lib}")?;
            }
        }
        Command::ValgrindCmd {
            error_code,
            platform,
        } => {
            let cmd = valgrind_command(
                platform.unwrap_or_else(HostPlatform::current),
                error_code.unwrap_or(config.valgrind_error_code),
            );
            writeln!(out, "{}", cmd.join(" "))?;
        }
        Command::Verify {
            binary,
            expect,
            flags,
            json,
        } => {
            let base = match &expect {
                Some(p) => ExpectedConfig::from_file(p)
                    .with_context(|| format!("Failed to load build options {}", p.display()))?,
                None => ExpectedConfig::default(),
            };
            let expected = flags.apply(base);
            let verifier = BinaryVerifier::from_config(config)?;
            let report = verifier
                .verify(&binary, &expected)
                .with_context(|| format!("{} rejected", binary.display()))?;
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
            } else {
                writeln!(out, "{}", report.summary())?;
            }
        }
        Command::Arch { binary } => {
            let verifier = BinaryVerifier::from_config(config)?;
            writeln!(out, "{}", verifier.inspector().arch_of_binary(&binary)?)?;
        }
        Command::Query { binary, field } => {
            let verifier = BinaryVerifier::from_config(config)?;
            let value = verifier
                .inspector()
                .query_build_configuration(&binary, &field)?;
            writeln!(out, "{value}")?;
        }
        Command::Kind { binary } => {
            let verifier = BinaryVerifier::from_config(config)?;
            writeln!(out, "{}", verifier.inspector().shell_kind(&binary)?)?;
        }
        Command::Supports { shell, args } => {
            let verifier = BinaryVerifier::from_config(config)?;
            let supported = verifier.inspector().shell_supports(&shell, &args)?;
            writeln!(out, "{supported}")?;
        }
        Command::Test {
            shell,
            valgrind,
            args,
        } => {
            let verifier = BinaryVerifier::from_config(config)?;
            let output = verifier.inspector().test_binary(&shell, &args, valgrind)?;
            write!(out, "{}", output.stdout)?;
            info!(exit_code = output.exit_code, "Shell finished");
            writeln!(out, "exit code: {}", output.exit_code)?;
        }
    }
    Ok(())
}
