//! Real process runner.
//!
//! Each invocation is spawned with `tokio::process::Command` and bounded by
//! `tokio::time::timeout`, driven to completion on a private single-threaded
//! runtime so callers get an ordinary blocking call.

use super::{CommandRunner, ProbeCommand, ProbeOutput, StderrMode};
use crate::error::{InspectError, InspectResult};
use std::io;
use std::process::{ExitStatus, Output, Stdio};
use tokio::runtime::{Builder, Runtime};
use tracing::{debug, info};

/// Runs probes as real OS processes with a hard wall-clock timeout.
///
/// Must not be used from inside an async context: `run` blocks on the
/// runner's own runtime.
pub struct ProcessRunner {
    runtime: Runtime,
}

impl ProcessRunner {
    pub fn new() -> InspectResult<Self> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(InspectError::Runtime)?;
        Ok(Self { runtime })
    }

    /// Spawn the command and wait for it, killing it if the timeout expires.
    ///
    /// On Unix the child gets its own process group so a hung shell does not
    /// receive terminal signals meant for us.
    async fn run_with_timeout(command: &ProbeCommand, line: &str) -> InspectResult<Output> {
        let mut cmd = tokio::process::Command::new(&command.program);
        cmd.args(&command.args)
            .stdin(Stdio::null())
            .kill_on_drop(true);
        if let Some(dir) = &command.working_dir {
            cmd.current_dir(dir);
        }
        if let Some(env) = &command.env {
            cmd.env_clear().envs(env);
        }

        #[cfg(unix)]
        cmd.process_group(0);

        let finished = async move {
            match command.stderr {
                StderrMode::Merge => merged_output(cmd).await,
                StderrMode::Discard => {
                    cmd.stdout(Stdio::piped()).stderr(Stdio::null());
                    cmd.output().await
                }
                StderrMode::Separate => {
                    cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
                    cmd.output().await
                }
            }
        };

        match tokio::time::timeout(command.timeout, finished).await {
            Ok(Ok(output)) => Ok(output),
            Ok(Err(source)) => Err(InspectError::Spawn {
                command: line.to_string(),
                source,
            }),
            Err(_) => Err(InspectError::TimeoutExceeded {
                command: line.to_string(),
                timeout_secs: command.timeout.as_secs(),
            }),
        }
    }
}

/// Run `cmd` with stdout and stderr on one pipe, so the captured bytes keep
/// the order in which the child wrote them to either stream.
async fn merged_output(mut cmd: tokio::process::Command) -> io::Result<Output> {
    let (reader, writer) = io::pipe()?;
    cmd.stdout(writer.try_clone()?).stderr(writer);
    let mut child = cmd.spawn()?;
    // The command still owns our write ends; EOF only arrives once they close
    drop(cmd);

    let stdout = read_to_eof(reader).await?;
    let status = child.wait().await?;
    Ok(Output {
        status,
        stdout,
        stderr: Vec::new(),
    })
}

#[cfg(unix)]
async fn read_to_eof(reader: io::PipeReader) -> io::Result<Vec<u8>> {
    use tokio::io::AsyncReadExt;

    let mut receiver = tokio::net::unix::pipe::Receiver::from_owned_fd(reader.into())?;
    let mut bytes = Vec::new();
    receiver.read_to_end(&mut bytes).await?;
    Ok(bytes)
}

#[cfg(not(unix))]
async fn read_to_eof(mut reader: io::PipeReader) -> io::Result<Vec<u8>> {
    tokio::task::spawn_blocking(move || {
        use std::io::Read;

        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Ok(bytes)
    })
    .await
    .map_err(io::Error::other)?
}

impl CommandRunner for ProcessRunner {
    fn run(&self, command: &ProbeCommand) -> InspectResult<ProbeOutput> {
        let line = command.display_line();
        info!(command = %line, "The testing command is");

        let output = self
            .runtime
            .block_on(Self::run_with_timeout(command, &line))?;
        let exit_code = exit_code_of(output.status);
        info!(exit_code, "The exit code is");

        let probe = match command.stderr {
            StderrMode::Merge | StderrMode::Discard => {
                ProbeOutput::new(String::from_utf8_lossy(&output.stdout), exit_code)
            }
            StderrMode::Separate => ProbeOutput {
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                exit_code,
            },
        };
        debug!(bytes = probe.stdout.len(), "Captured probe output");
        Ok(probe)
    }
}

/// Exit code of a finished process, with signal deaths mapped to `-signal`.
fn exit_code_of(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return -signal;
        }
    }
    -1
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::process::ExitStatusExt;

    #[test]
    fn test_exit_code_of_normal_exit() {
        // Raw wait status: exit code lives in the second byte
        assert_eq!(exit_code_of(ExitStatus::from_raw(3 << 8)), 3);
        assert_eq!(exit_code_of(ExitStatus::from_raw(0)), 0);
    }

    #[test]
    fn test_exit_code_of_signal() {
        // SIGSEGV
        assert_eq!(exit_code_of(ExitStatus::from_raw(11)), -11);
    }
}
