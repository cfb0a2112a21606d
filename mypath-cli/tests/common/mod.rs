//! Common test utilities for CLI integration tests.

use assert_cmd::Command;
use std::path::PathBuf;

/// A command for the `mypath` binary with a clean environment for the
/// variables the CLI reads.
#[allow(dead_code)]
pub fn mypath() -> Command {
    let mut cmd = Command::cargo_bin("mypath").expect("Failed to find mypath binary");
    cmd.env_remove("MYPATH_ALLOW_ROOT");
    cmd.env_remove("MYPATH_LOG_MODE");
    cmd
}

/// Canonical path of the `mypath` binary under test.
#[allow(dead_code)]
pub fn binary_path() -> PathBuf {
    let bin = assert_cmd::cargo::cargo_bin("mypath");
    std::fs::canonicalize(bin).expect("Failed to canonicalize mypath binary")
}

/// Check whether tests run with any superuser id, which the CLI refuses
/// without `--allow-root`.
#[allow(dead_code)]
pub fn running_as_superuser() -> bool {
    // SAFETY: these calls cannot fail and touch no memory.
    unsafe {
        libc::getuid() == 0 || libc::geteuid() == 0 || libc::getgid() == 0 || libc::getegid() == 0
    }
}
