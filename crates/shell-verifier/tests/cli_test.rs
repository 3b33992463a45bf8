//! CLI parsing and dispatch tests.

use clap::Parser;
use shell_verifier::{run, Args, Command};
use std::path::PathBuf;

fn run_to_string(argv: &[&str]) -> anyhow::Result<String> {
    let args = Args::try_parse_from(argv)?;
    let mut out = Vec::new();
    run(args, &mut out)?;
    Ok(String::from_utf8(out)?)
}

#[test]
fn test_parse_verify_flags() {
    let args = Args::try_parse_from([
        "shell-verifier",
        "verify",
        "dist/bin/js",
        "--enable32",
        "--enable-simulator-arm32",
        "--json",
    ])
    .unwrap();
    match args.command {
        Command::Verify {
            binary,
            expect,
            flags,
            json,
        } => {
            assert_eq!(binary, PathBuf::from("dist/bin/js"));
            assert_eq!(expect, None);
            assert!(flags.enable32);
            assert!(flags.enable_simulator_arm32);
            assert!(!flags.enable_dbg);
            assert!(json);
        }
        other => panic!("expected verify, got {other:?}"),
    }
}

#[test]
fn test_flags_are_ored_onto_file_options() {
    let args = Args::try_parse_from(["shell-verifier", "verify", "js", "--enable-dbg"]).unwrap();
    let Command::Verify { flags, .. } = args.command else {
        panic!("expected verify");
    };
    let base = shell_inspect::ExpectedConfig {
        build_with_asan: true,
        ..Default::default()
    };
    let merged = flags.apply(base);
    assert!(merged.enable_dbg);
    assert!(merged.build_with_asan);
    assert!(!merged.enable32);
}

#[test]
fn test_supports_requires_trailing_args() {
    assert!(Args::try_parse_from(["shell-verifier", "supports", "js"]).is_err());
    let args =
        Args::try_parse_from(["shell-verifier", "supports", "js", "--", "--no-ion", "-e", "42"])
            .unwrap();
    match args.command {
        Command::Supports { args, .. } => assert_eq!(args, vec!["--no-ion", "-e", "42"]),
        other => panic!("expected supports, got {other:?}"),
    }
}

#[test]
fn test_unknown_platform_rejected() {
    assert!(Args::try_parse_from(["shell-verifier", "run-libs", "--platform", "plan9"]).is_err());
}

#[test]
fn test_run_libs_linux() {
    let out = run_to_string(&["shell-verifier", "run-libs", "--platform", "linux"]).unwrap();
    assert_eq!(out, "libmozglue.so\n");
}

#[test]
fn test_run_libs_windows_lists_icu() {
    let out = run_to_string(&["shell-verifier", "run-libs", "--platform", "windows"]).unwrap();
    assert!(out.starts_with("mozglue.dll\n"));
    assert!(out.contains("icuin61.dll\n"));
}

#[test]
fn test_valgrind_cmd_uses_config_error_code() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("inspect.toml");
    std::fs::write(&config, "valgrind_error_code = 42\n").unwrap();

    let out = run_to_string(&[
        "shell-verifier",
        "--config",
        config.to_str().unwrap(),
        "valgrind-cmd",
        "--platform",
        "linux",
    ])
    .unwrap();
    assert!(out.starts_with("valgrind --error-exitcode=42 "), "{out}");

    let out = run_to_string(&[
        "shell-verifier",
        "valgrind-cmd",
        "--platform",
        "darwin",
        "--error-code",
        "5",
    ])
    .unwrap();
    assert!(out.starts_with("valgrind --dsymutil=yes --error-exitcode=5 "), "{out}");
}

#[test]
fn test_missing_config_file_fails() {
    let err = run_to_string(&[
        "shell-verifier",
        "--config",
        "/nonexistent/inspect.toml",
        "run-libs",
    ])
    .unwrap_err();
    assert!(format!("{err:#}").contains("Failed to load config"));
}

#[cfg(unix)]
#[test]
fn test_verify_and_probe_fake_shell() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let write = |name: &str, body: &str| {
        let path = dir.path().join(name);
        std::fs::write(&path, body).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    };
    let shell = write(
        "js",
        "#!/bin/sh\ncase \"$2\" in\n  *asan*) echo true ;;\n  *) echo false ;;\nesac\n",
    );
    let file_tool = write(
        "fake-file",
        "#!/bin/sh\necho \"$1: ELF 64-bit LSB executable, x86-64\"\n",
    );
    let config = dir.path().join("inspect.toml");
    std::fs::write(
        &config,
        format!("file_command = \"{}\"\n", file_tool.display()),
    )
    .unwrap();
    let config = config.to_str().unwrap();
    let shell = shell.to_str().unwrap();

    let out = run_to_string(&["shell-verifier", "--config", config, "arch", shell]).unwrap();
    assert_eq!(out, "64\n");

    let out = run_to_string(&["shell-verifier", "--config", config, "query", shell, "asan"]).unwrap();
    assert_eq!(out, "true\n");

    let out = run_to_string(&[
        "shell-verifier",
        "--config",
        config,
        "verify",
        shell,
        "--build-with-asan",
        "--json",
    ])
    .unwrap();
    let report: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(report["bitness"], "64");
    assert_eq!(report["checks"].as_array().unwrap().len(), 6);

    let err = run_to_string(&["shell-verifier", "--config", config, "verify", shell]).unwrap_err();
    assert!(format!("{err:#}").contains("\"asan\""), "{err:#}");
}
