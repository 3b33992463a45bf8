//! Host platform detection and the library search path environment.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};
use std::path::Path;

/// Operating system family the probes run on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostPlatform {
    Windows,
    Darwin,
    Linux,
    /// Any other Unix-like host (BSDs etc.)
    Other,
}

impl HostPlatform {
    /// Platform this process was compiled for.
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Self::Windows
        } else if cfg!(target_os = "macos") {
            Self::Darwin
        } else if cfg!(target_os = "linux") {
            Self::Linux
        } else {
            Self::Other
        }
    }

    /// Environment variable the dynamic loader searches for shared libraries.
    pub fn library_path_var(&self) -> &'static str {
        match self {
            Self::Windows => "PATH",
            Self::Darwin => "DYLD_LIBRARY_PATH",
            Self::Linux | Self::Other => "LD_LIBRARY_PATH",
        }
    }

    /// Separator between entries of the library search variable.
    pub fn path_separator(&self) -> char {
        match self {
            Self::Windows => ';',
            _ => ':',
        }
    }
}

impl std::fmt::Display for HostPlatform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Windows => write!(f, "windows"),
            Self::Darwin => write!(f, "darwin"),
            Self::Linux => write!(f, "linux"),
            Self::Other => write!(f, "other"),
        }
    }
}

impl std::str::FromStr for HostPlatform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "windows" | "win" => Ok(Self::Windows),
            "darwin" | "macos" | "mac" => Ok(Self::Darwin),
            "linux" => Ok(Self::Linux),
            "other" => Ok(Self::Other),
            other => Err(format!("unknown platform: {other}")),
        }
    }
}

/// Build the environment for running a shell that lives in `lib_dir`.
///
/// Starts from `base` and appends `lib_dir` to the platform's library search
/// variable so the shell finds the shared libraries shipped next to it. The
/// variable is left untouched if it already mentions `lib_dir`, and set to
/// `lib_dir` alone if it was absent. Names and values are carried as OS
/// strings, so a host environment that is not valid UTF-8 passes through.
pub fn env_with_library_path<I, K, V>(
    platform: HostPlatform,
    lib_dir: &Path,
    base: I,
) -> BTreeMap<OsString, OsString>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<OsString>,
    V: Into<OsString>,
{
    let mut env: BTreeMap<OsString, OsString> =
        base.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
    let dir = lib_dir.as_os_str();
    let var = OsStr::new(platform.library_path_var());

    match env.get_mut(var) {
        Some(existing) if existing.is_empty() => *existing = dir.to_os_string(),
        Some(existing) => {
            if !os_str_contains(existing, dir) {
                existing.push(platform.path_separator().to_string());
                existing.push(dir);
            }
        }
        None => {
            env.insert(var.to_os_string(), dir.to_os_string());
        }
    }
    env
}

/// Substring test on OS strings, matching `str::contains`.
fn os_str_contains(haystack: &OsStr, needle: &OsStr) -> bool {
    let needle = needle.as_encoded_bytes();
    needle.is_empty()
        || haystack
            .as_encoded_bytes()
            .windows(needle.len())
            .any(|window| window == needle)
}
