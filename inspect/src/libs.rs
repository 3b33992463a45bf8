//! Shared libraries a shell build needs next to it in `dist/bin` to run.

use crate::platform::HostPlatform;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// ICU versions shipped by Windows builds across the supported revision range.
pub const WIN_ICU_VERSIONS: &[u32] = &[59, 60, 61, 62];

/// ICU library stems; debug builds put their `d` before the version number.
const WIN_ICU_STEMS: &[&str] = &[
    "icuuc", "icuucd", "icuin", "icuind", "icuio", "icuiod", "icudt", "icudtd", "icutest",
    "icutestd", "icutu", "icutud",
];

static RUN_LIBS: Lazy<HashMap<HostPlatform, Vec<String>>> = Lazy::new(|| {
    let mut table = HashMap::new();

    let mut windows: Vec<String> = ["mozglue.dll", "nspr4.dll", "plds4.dll", "plc4.dll"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    windows.push("testplug.dll".to_string());
    for version in WIN_ICU_VERSIONS {
        for stem in WIN_ICU_STEMS {
            windows.push(format!("{stem}{version}.dll"));
        }
    }
    table.insert(HostPlatform::Windows, windows);
    table.insert(HostPlatform::Darwin, vec!["libmozglue.dylib".to_string()]);
    table.insert(HostPlatform::Linux, vec!["libmozglue.so".to_string()]);
    table.insert(HostPlatform::Other, Vec::new());
    table
});

/// Library file names required to run a shell on `platform`.
pub fn run_libs(platform: HostPlatform) -> &'static [String] {
    RUN_LIBS.get(&platform).map(Vec::as_slice).unwrap_or(&[])
}
