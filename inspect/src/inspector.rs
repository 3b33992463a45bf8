//! Shell Inspector: probes run against a single shell binary
//!
//! Builds every command the probes need (library search path, optional
//! valgrind prefix, stderr handling, timeout tier) and hands it to a
//! [`CommandRunner`]. Output interpretation lives in the leaf modules:
//! [`crate::support`], [`crate::arch`] and [`crate::build_config`].

use crate::arch::{parse_file_type, Bitness};
use crate::build_config::{build_config_script, parse_build_config_output, BuildConfigValue};
use crate::config::InspectConfig;
use crate::error::InspectResult;
use crate::platform::{env_with_library_path, HostPlatform};
use crate::runner::{CommandRunner, ProbeCommand, ProbeOutput, StderrMode};
use crate::support::{classify_support, ShellKind};
use crate::valgrind::valgrind_command;
use std::ffi::OsString;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

pub struct ShellInspector<R> {
    runner: R,
    config: InspectConfig,
    platform: HostPlatform,
}

impl<R: CommandRunner> ShellInspector<R> {
    /// Inspector for the current host platform.
    pub fn new(runner: R, config: InspectConfig) -> Self {
        Self::with_platform(runner, config, HostPlatform::current())
    }

    pub fn with_platform(runner: R, config: InspectConfig, platform: HostPlatform) -> Self {
        Self {
            runner,
            config,
            platform,
        }
    }

    pub fn config(&self) -> &InspectConfig {
        &self.config
    }

    pub fn platform(&self) -> HostPlatform {
        self.platform
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Command running `shell` with `args`, with the shell's directory on the
    /// library search path.
    fn shell_command(
        &self,
        shell: &Path,
        args: &[String],
        use_valgrind: bool,
        stderr: StderrMode,
        timeout: Duration,
    ) -> ProbeCommand {
        let mut argv: Vec<OsString> = if use_valgrind {
            valgrind_command(self.platform, self.config.valgrind_error_code)
                .into_iter()
                .map(OsString::from)
                .collect()
        } else {
            Vec::new()
        };
        argv.push(shell.as_os_str().to_os_string());
        argv.extend(args.iter().map(OsString::from));

        let mut argv = argv.into_iter();
        // argv always holds at least the shell path
        let program = argv.next().unwrap_or_default();

        ProbeCommand::new(program, timeout)
            .args(argv)
            .env(env_with_library_path(
                self.platform,
                shell_dir(shell),
                std::env::vars_os(),
            ))
            .stderr(stderr)
    }

    /// Run the shell with `args`, stderr merged into stdout.
    ///
    /// Uses the long timeout: scripts under test may be slow.
    pub fn test_binary(
        &self,
        shell: &Path,
        args: &[String],
        use_valgrind: bool,
    ) -> InspectResult<ProbeOutput> {
        let cmd = self.shell_command(
            shell,
            args,
            use_valgrind,
            StderrMode::Merge,
            self.config.query_timeout(),
        );
        self.runner.run(&cmd)
    }

    /// Whether the shell accepts `args`.
    ///
    /// Works for functions (`["-e", "foo()"]`) as well as flags
    /// (`["--no-ion", "-e", "42"]`).
    pub fn shell_supports(&self, shell: &Path, args: &[String]) -> InspectResult<bool> {
        let cmd = self.shell_command(
            shell,
            args,
            false,
            StderrMode::Merge,
            self.config.probe_timeout(),
        );
        let output = self.runner.run(&cmd)?;
        classify_support(output.exit_code)
    }

    /// xpcshell or standalone js shell.
    pub fn shell_kind(&self, shell: &Path) -> InspectResult<ShellKind> {
        let args = ["-e".to_string(), ShellKind::PROBE_SCRIPT.to_string()];
        let kind = ShellKind::from_host_probe(self.shell_supports(shell, &args)?);
        debug!(shell = %shell.display(), %kind, "Classified shell");
        Ok(kind)
    }

    /// 32-bit or 64-bit, according to the file-type tool.
    pub fn arch_of_binary(&self, binary: &Path) -> InspectResult<Bitness> {
        let cmd = ProbeCommand::new(&self.config.file_command, self.config.probe_timeout())
            .arg(binary)
            .stderr(StderrMode::Discard);
        let output = self.runner.run(&cmd)?;
        let bitness = parse_file_type(&output.stdout, self.platform)?;
        debug!(binary = %binary.display(), %bitness, "Detected bitness");
        Ok(bitness)
    }

    /// One field of the shell's `getBuildConfiguration()` record.
    ///
    /// stderr is discarded so diagnostics cannot pollute the JSON.
    pub fn query_build_configuration(
        &self,
        shell: &Path,
        field: &str,
    ) -> InspectResult<BuildConfigValue> {
        let args = ["-e".to_string(), build_config_script(field)];
        let cmd = self.shell_command(
            shell,
            &args,
            false,
            StderrMode::Discard,
            self.config.query_timeout(),
        );
        let output = self.runner.run(&cmd)?;
        let value = parse_build_config_output(field, &output.stdout)?;
        debug!(field, %value, "Queried build configuration");
        Ok(value)
    }
}

/// Directory holding `shell`; a bare file name lives in `.`.
fn shell_dir(shell: &Path) -> &Path {
    match shell.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    }
}
