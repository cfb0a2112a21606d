//! Common test utilities for integration tests.
//!
//! Fixture builders for the filesystem layouts the resolvers are expected
//! to handle, on top of [`FakeHost`].

use mypath::sys::FakeHost;

/// Pid every fixture host reports.
#[allow(dead_code)]
pub const PID: u32 = 4242;

/// A host with a genuine, root-owned Linux procfs whose `self/exe` points at
/// `exe`.
#[allow(dead_code)]
pub fn linux_procfs(exe: &str) -> FakeHost {
    FakeHost::new()
        .with_pid(PID)
        .with_dir("/proc", 0)
        .with_symlink("/proc/self", PID.to_string())
        .with_symlink(format!("/proc/{PID}/exe"), exe)
        .with_file(exe, 0)
}

/// A host with no procfs and no loader answer, holding `files` and a
/// `PATH` of `path`.
#[allow(dead_code)]
pub fn bare_host(files: &[&str], path: &str) -> FakeHost {
    files
        .iter()
        .fold(FakeHost::new(), |host, file| host.with_file(file, 0))
        .with_env("PATH", path)
}

/// Check whether the test process runs with any superuser id.
#[allow(dead_code)]
pub fn running_as_superuser() -> bool {
    use mypath::sys::{Host, OsHost};

    OsHost.credentials().is_superuser()
}
