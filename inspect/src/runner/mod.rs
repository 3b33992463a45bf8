//! Process Runner: the seam between probes and the operating system
//!
//! Probes describe what to run as a [`ProbeCommand`] and hand it to a
//! [`CommandRunner`]. [`ProcessRunner`] is the real implementation; tests
//! substitute scripted runners.

pub mod process;

pub use process::ProcessRunner;

use crate::error::InspectResult;
use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};
use std::path::PathBuf;
use std::time::Duration;

/// What happens to the child's standard error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StderrMode {
    /// Send stderr down the stdout pipe, interleaved in write order
    Merge,
    /// Redirect stderr to the null device
    Discard,
    /// Capture stderr into [`ProbeOutput::stderr`]
    Separate,
}

/// A single process invocation.
///
/// Program, arguments and environment are OS strings: shell paths and
/// inherited variables need not be valid UTF-8.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeCommand {
    pub program: OsString,
    pub args: Vec<OsString>,
    /// Working directory; `None` inherits the caller's
    pub working_dir: Option<PathBuf>,
    /// Full environment for the child; `None` inherits the caller's
    pub env: Option<BTreeMap<OsString, OsString>>,
    pub timeout: Duration,
    pub stderr: StderrMode,
}

impl ProbeCommand {
    pub fn new(program: impl Into<OsString>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: None,
            env: None,
            timeout,
            stderr: StderrMode::Merge,
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn env(mut self, env: BTreeMap<OsString, OsString>) -> Self {
        self.env = Some(env);
        self
    }

    pub fn stderr(mut self, mode: StderrMode) -> Self {
        self.stderr = mode;
        self
    }

    /// Program followed by its arguments.
    pub fn argv(&self) -> Vec<&OsStr> {
        std::iter::once(self.program.as_os_str())
            .chain(self.args.iter().map(OsString::as_os_str))
            .collect()
    }

    /// Shell-escaped command line, suitable for logs and copy-paste.
    ///
    /// Non-UTF-8 words are rendered lossily; the spawned argv is unaffected.
    pub fn display_line(&self) -> String {
        self.argv()
            .into_iter()
            .map(|word| {
                let word = word.to_string_lossy();
                match shlex::try_quote(&word) {
                    Ok(quoted) => quoted.into_owned(),
                    // Only NUL bytes fail to quote; fall back to a debug rendering
                    Err(_) => format!("{word:?}"),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Captured result of one invocation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProbeOutput {
    /// Decoded stdout (lossy UTF-8), interleaved with stderr under [`StderrMode::Merge`]
    pub stdout: String,
    /// Decoded stderr under [`StderrMode::Separate`], empty otherwise
    pub stderr: String,
    /// Exit code; negated signal number when the process was killed by a signal
    pub exit_code: i32,
}

impl ProbeOutput {
    pub fn new(stdout: impl Into<String>, exit_code: i32) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: String::new(),
            exit_code,
        }
    }
}

/// Runs a [`ProbeCommand`] to completion, blocking the caller.
///
/// Implementations must enforce `command.timeout` and report expiry as
/// [`crate::InspectError::TimeoutExceeded`].
pub trait CommandRunner: Send + Sync {
    fn run(&self, command: &ProbeCommand) -> InspectResult<ProbeOutput>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, command: &ProbeCommand) -> InspectResult<ProbeOutput> {
        (**self).run(command)
    }
}

impl<R: CommandRunner + ?Sized> CommandRunner for Box<R> {
    fn run(&self, command: &ProbeCommand) -> InspectResult<ProbeOutput> {
        (**self).run(command)
    }
}
