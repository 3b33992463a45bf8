//! Valgrind command prefix for running a shell under memcheck.

use crate::platform::HostPlatform;

/// Exit code valgrind reports when it finds errors, unless configured otherwise.
pub const DEFAULT_VALGRIND_ERROR_CODE: i32 = 77;

/// Build the valgrind argv prefix for `platform`.
pub fn valgrind_command(platform: HostPlatform, error_code: i32) -> Vec<String> {
    let mut cmd = vec!["valgrind".to_string()];
    if platform == HostPlatform::Darwin {
        cmd.push("--dsymutil=yes".to_string());
    }
    cmd.push(format!("--error-exitcode={error_code}"));
    // Precise memory state at every access; needed for JIT code (bug 913876)
    cmd.push("--vex-iropt-register-updates=allregs-at-mem-access".to_string());
    cmd.extend(
        [
            "--gen-suppressions=all",
            "--leak-check=full",
            "--errors-for-leak-kinds=definite",
            "--show-leak-kinds=definite",
            "--show-possibly-lost=no",
            "--num-callers=50",
        ]
        .iter()
        .map(|s| s.to_string()),
    );
    cmd
}
