//! Process runner tests against real `/bin/sh` processes.

#![cfg(unix)]

use shell_inspect::{CommandRunner, InspectError, ProbeCommand, ProcessRunner, StderrMode};
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::time::{Duration, Instant};

fn sh(script: &str) -> ProbeCommand {
    ProbeCommand::new("/bin/sh", Duration::from_secs(30)).args(["-c", script])
}

#[test]
fn test_captures_stdout_and_exit_code() {
    let runner = ProcessRunner::new().unwrap();
    let out = runner.run(&sh("echo hello; exit 3")).unwrap();
    assert_eq!(out.stdout, "hello\n");
    assert_eq!(out.exit_code, 3);
}

#[test]
fn test_merge_keeps_write_order() {
    let runner = ProcessRunner::new().unwrap();
    let out = runner
        .run(
            &sh("echo err1 >&2; sleep 0.1; echo out2; echo err3 >&2")
                .stderr(StderrMode::Merge),
        )
        .unwrap();
    assert_eq!(out.stdout, "err1\nout2\nerr3\n");
    assert!(out.stderr.is_empty());
}

#[test]
fn test_merge_times_out_while_reading() {
    let runner = ProcessRunner::new().unwrap();
    let cmd = ProbeCommand::new("/bin/sh", Duration::from_secs(1))
        .args(["-c", "echo started; exec sleep 30"])
        .stderr(StderrMode::Merge);

    let start = Instant::now();
    let err = runner.run(&cmd).unwrap_err();
    assert!(start.elapsed() < Duration::from_secs(20));
    assert_eq!(err.code(), "TIMEOUT_EXCEEDED");
}

#[test]
fn test_discard_drops_stderr() {
    let runner = ProcessRunner::new().unwrap();
    let out = runner
        .run(&sh("echo true; echo 'warning: noise' >&2").stderr(StderrMode::Discard))
        .unwrap();
    assert_eq!(out.stdout, "true\n");
    assert!(out.stderr.is_empty());
}

#[test]
fn test_separate_captures_stderr() {
    let runner = ProcessRunner::new().unwrap();
    let out = runner
        .run(&sh("echo out; echo err >&2").stderr(StderrMode::Separate))
        .unwrap();
    assert_eq!(out.stdout, "out\n");
    assert_eq!(out.stderr, "err\n");
}

#[test]
fn test_invalid_utf8_is_replaced() {
    let runner = ProcessRunner::new().unwrap();
    let out = runner.run(&sh(r"printf 'a\377b'")).unwrap();
    assert_eq!(out.stdout, "a\u{FFFD}b");
}

#[test]
fn test_signal_death_is_negative() {
    let runner = ProcessRunner::new().unwrap();
    let out = runner.run(&sh("kill -9 $$")).unwrap();
    assert_eq!(out.exit_code, -9);
}

#[test]
fn test_timeout_kills_and_errors() {
    let runner = ProcessRunner::new().unwrap();
    let cmd = ProbeCommand::new("/bin/sh", Duration::from_secs(1)).args(["-c", "sleep 30"]);

    let start = Instant::now();
    let err = runner.run(&cmd).unwrap_err();
    assert!(start.elapsed() < Duration::from_secs(20));
    match err {
        InspectError::TimeoutExceeded {
            command,
            timeout_secs,
        } => {
            assert_eq!(timeout_secs, 1);
            assert!(command.contains("sleep 30"), "{command}");
        }
        other => panic!("expected TimeoutExceeded, got {other:?}"),
    }
}

#[test]
fn test_missing_program_is_spawn_error() {
    let runner = ProcessRunner::new().unwrap();
    let cmd = ProbeCommand::new("/nonexistent/js-shell", Duration::from_secs(5));
    let err = runner.run(&cmd).unwrap_err();
    assert_eq!(err.code(), "SPAWN_FAILED");
}

#[test]
fn test_env_and_working_dir_are_applied() {
    let dir = tempfile::tempdir().unwrap();
    let mut env = BTreeMap::new();
    env.insert(OsString::from("SHELL_MARKER"), OsString::from("xyzzy"));

    let runner = ProcessRunner::new().unwrap();
    let out = runner
        .run(
            &sh("echo $SHELL_MARKER; pwd")
                .env(env)
                .current_dir(dir.path()),
        )
        .unwrap();
    let mut lines = out.stdout.lines();
    assert_eq!(lines.next(), Some("xyzzy"));
    let pwd = std::path::PathBuf::from(lines.next().unwrap());
    assert_eq!(
        pwd.canonicalize().unwrap(),
        dir.path().canonicalize().unwrap()
    );
}

#[test]
fn test_runner_is_reusable_across_threads() {
    let runner = std::sync::Arc::new(ProcessRunner::new().unwrap());
    let handles: Vec<_> = (0..3)
        .map(|i| {
            let runner = runner.clone();
            std::thread::spawn(move || runner.run(&sh(&format!("exit {i}"))).unwrap().exit_code)
        })
        .collect();
    let mut codes: Vec<i32> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    codes.sort();
    assert_eq!(codes, vec![0, 1, 2]);
}

#[test]
fn test_non_utf8_env_value_reaches_child() {
    use std::os::unix::ffi::OsStringExt;

    let mut env = BTreeMap::new();
    env.insert(
        OsString::from("SHELL_MARKER"),
        OsString::from_vec(vec![b'a', 0xff, b'b']),
    );
    let runner = ProcessRunner::new().unwrap();
    let out = runner
        .run(&sh("printf '%s' \"$SHELL_MARKER\"").env(env))
        .unwrap();
    assert_eq!(out.stdout, "a\u{FFFD}b");
}
