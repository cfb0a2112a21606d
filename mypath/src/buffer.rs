//! Growing-buffer reads of kernel-provided strings.
//!
//! `readlink(2)` and `getcwd(3)` both write into caller-sized buffers. These
//! helpers own the retry loops around them.
//!
//! POSIX says an undersized `readlink` buffer receives the first `bufsize`
//! bytes of the target and the call reports success, so a single read can
//! never tell a complete answer from a truncated one. A link can also be
//! replaced between two reads. [`read_link_verified`] therefore reads every
//! link twice, into buffers of size `S` and `2S`, and only accepts an answer
//! both reads agree on.

use std::ffi::OsString;
use std::os::unix::ffi::OsStringExt;
use std::path::Path;

use crate::error::{Error, Result};
use crate::sys::Host;

/// Default size of the first buffer handed to `readlink` and `getcwd`.
pub const DEFAULT_INITIAL_SIZE: usize = 64;

/// Allocate a zeroed buffer, reporting allocation failure instead of aborting.
fn zeroed(size: usize) -> Option<Vec<u8>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(size).ok()?;
    buf.resize(size, 0);
    Some(buf)
}

/// One raw `readlink` into a fresh buffer of `size` bytes.
fn read_once<H: Host + ?Sized>(host: &H, path: &Path, size: usize) -> Result<Vec<u8>> {
    let mut buf = zeroed(size).ok_or_else(|| Error::BufferExhausted {
        path: path.to_path_buf(),
        size,
    })?;
    let n = host.read_link_into(path, &mut buf)?;
    if n == 0 {
        return Err(Error::EmptyRead {
            path: path.to_path_buf(),
        });
    }
    buf.truncate(n);
    Ok(buf)
}

/// Read a symbolic link's target, verified by two agreeing reads.
///
/// Starting from `initial_size`, the link is read into a buffer of `S`
/// bytes and then into one of `2S` bytes. When both reads return identical
/// bytes the answer is complete and stable. Otherwise the longer read
/// becomes the reference, `S` doubles, and the link is read again at the
/// new `2S`. The loop ends on agreement or on the first error.
///
/// # Errors
///
/// Returns an error if a read fails, returns no data, or the buffer size
/// would overflow or cannot be allocated.
///
/// # Examples
///
/// ```
/// use mypath::buffer::read_link_verified;
/// use mypath::sys::FakeHost;
/// use std::path::Path;
///
/// let host = FakeHost::new().with_symlink("/proc/self", "4242");
/// let target = read_link_verified(&host, Path::new("/proc/self"), 64).unwrap();
/// assert_eq!(target, "4242");
/// ```
pub fn read_link_verified<H: Host + ?Sized>(
    host: &H,
    path: &Path,
    initial_size: usize,
) -> Result<OsString> {
    let mut size = initial_size;
    let mut first = read_once(host, path, size)?;

    loop {
        let doubled = size.checked_mul(2).ok_or_else(|| Error::BufferExhausted {
            path: path.to_path_buf(),
            size,
        })?;
        let second = read_once(host, path, doubled)?;

        if first == second {
            return Ok(OsString::from_vec(first));
        }

        log::debug!(
            "readlink {} disagreed at {size}/{doubled} bytes, retrying",
            path.display()
        );
        first = second;
        size = doubled;
    }
}

/// Get the current working directory, however long it is.
///
/// The buffer starts at `initial_size` bytes and doubles every time
/// `getcwd` reports `ERANGE`. Any other error ends the attempt, as does an
/// empty result.
///
/// # Errors
///
/// Returns [`Error::NoCurrentDir`] for an empty directory name, the OS error
/// for a failed call, or [`Error::BufferExhausted`] if the buffer cannot grow.
///
/// # Examples
///
/// ```
/// use mypath::buffer::current_dir;
/// use mypath::sys::FakeHost;
///
/// let host = FakeHost::new().with_current_dir("/home/u");
/// assert_eq!(current_dir(&host, 2).unwrap(), "/home/u");
/// ```
pub fn current_dir<H: Host + ?Sized>(host: &H, initial_size: usize) -> Result<OsString> {
    let mut size = initial_size;

    loop {
        let mut buf = zeroed(size).ok_or_else(|| Error::BufferExhausted {
            path: ".".into(),
            size,
        })?;
        match host.current_dir_into(&mut buf) {
            Ok(0) => return Err(Error::NoCurrentDir),
            Ok(n) => {
                buf.truncate(n);
                return Ok(OsString::from_vec(buf));
            }
            Err(e) if e.raw_os_error() == Some(libc::ERANGE) => {
                size = size.checked_mul(2).ok_or_else(|| Error::BufferExhausted {
                    path: ".".into(),
                    size,
                })?;
            }
            Err(e) => return Err(Error::Io(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sys::{FakeHost, OsHost};

    #[test]
    fn test_short_target_needs_two_reads() {
        let host = FakeHost::new().with_symlink("/l", "/bin/app");
        let target = read_link_verified(&host, Path::new("/l"), 64).unwrap();
        assert_eq!(target, "/bin/app");
        assert_eq!(host.link_reads(), 2);
    }

    #[test]
    fn test_truncated_target_is_read_in_full() {
        let long = format!("/{}", "x".repeat(150));
        let host = FakeHost::new().with_symlink("/l", &long);

        let target = read_link_verified(&host, Path::new("/l"), 64).unwrap();
        assert_eq!(target, OsString::from(&long));
        // 64 (truncated), 128 (truncated), 256 (full), 512 (agrees)
        assert_eq!(host.link_reads(), 4);
    }

    #[test]
    fn test_changing_target_forces_retry() {
        let host = FakeHost::new().with_changing_symlink(
            "/l",
            ["/old/app"],
            "/new/location/of/app",
        );

        let target = read_link_verified(&host, Path::new("/l"), 64).unwrap();
        assert_eq!(target, "/new/location/of/app");
        assert_eq!(host.link_reads(), 3);
    }

    #[test]
    fn test_same_length_different_content_forces_retry() {
        let host = FakeHost::new().with_changing_symlink("/l", ["/bin/aaa"], "/bin/bbb");

        let target = read_link_verified(&host, Path::new("/l"), 64).unwrap();
        assert_eq!(target, "/bin/bbb");
        assert_eq!(host.link_reads(), 3);
    }

    #[test]
    fn test_repeated_changes_settle() {
        let host = FakeHost::new().with_changing_symlink("/l", ["/a", "/b", "/c", "/d"], "/e");

        let target = read_link_verified(&host, Path::new("/l"), 4).unwrap();
        assert_eq!(target, "/e");
        assert_eq!(host.link_reads(), 6);
    }

    #[test]
    fn test_empty_read_is_an_error() {
        let host = FakeHost::new().with_symlink("/l", "");
        let err = read_link_verified(&host, Path::new("/l"), 64).unwrap_err();
        assert!(matches!(err, Error::EmptyRead { .. }));
    }

    #[test]
    fn test_not_a_link_is_an_error() {
        let host = FakeHost::new().with_file("/f", 0);
        let err = read_link_verified(&host, Path::new("/f"), 64).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_size_overflow_stops_the_loop() {
        let host = FakeHost::new().with_changing_symlink("/l", ["/a"], "/b");
        let err = read_link_verified(&host, Path::new("/l"), usize::MAX / 2 + 1).unwrap_err();
        assert!(matches!(err, Error::BufferExhausted { .. }));
    }

    #[test]
    fn test_current_dir_grows_buffer() {
        let deep = format!("/{}", "d/".repeat(100));
        let host = FakeHost::new().with_current_dir(deep.trim_end_matches('/'));

        let cwd = current_dir(&host, 2).unwrap();
        assert_eq!(cwd, OsString::from(deep.trim_end_matches('/')));
    }

    #[test]
    fn test_current_dir_missing_is_io_error() {
        let host = FakeHost::new();
        let err = current_dir(&host, 64).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_current_dir_empty_is_rejected() {
        let host = FakeHost::new().with_current_dir("");
        let err = current_dir(&host, 64).unwrap_err();
        assert!(matches!(err, Error::NoCurrentDir));
    }

    #[test]
    fn test_current_dir_real_host() {
        let cwd = current_dir(&OsHost, 2).unwrap();
        assert_eq!(cwd, std::env::current_dir().unwrap().into_os_string());
    }

    #[test]
    fn test_read_link_verified_real_host() {
        let dir = tempfile::tempdir().unwrap();
        let link = dir.path().join("link");
        let target = format!("/{}", "t".repeat(300));
        std::os::unix::fs::symlink(&target, &link).unwrap();

        let read = read_link_verified(&OsHost, &link, 64).unwrap();
        assert_eq!(read, OsString::from(target));
    }
}
