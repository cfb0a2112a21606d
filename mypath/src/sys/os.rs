//! The production [`Host`] backed by `libc` and `std`.

#![allow(unsafe_code)] // readlink(), getcwd(), dladdr() and the id getters are FFI

use std::ffi::{CString, OsString};
use std::fs;
use std::io;
use std::os::unix::ffi::OsStrExt;
use std::os::unix::fs::MetadataExt;
use std::path::{Path, PathBuf};

use super::{Credentials, FileKind, FileStat, Host};

/// Host implementation that performs real system calls.
///
/// # Examples
///
/// ```
/// use mypath::sys::{Host, OsHost};
///
/// assert_eq!(OsHost.process_id(), std::process::id());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct OsHost;

fn file_stat(meta: &fs::Metadata) -> FileStat {
    let file_type = meta.file_type();
    let kind = if file_type.is_symlink() {
        FileKind::Symlink
    } else if file_type.is_dir() {
        FileKind::Directory
    } else if file_type.is_file() {
        FileKind::Regular
    } else {
        FileKind::Other
    };
    FileStat {
        kind,
        uid: meta.uid(),
    }
}

/// An address inside this crate's code for `dladdr` to look up.
#[cfg(feature = "dladdr")]
#[inline(never)]
fn loader_anchor() {}

fn c_path(path: &Path) -> io::Result<CString> {
    CString::new(path.as_os_str().as_bytes())
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))
}

impl Host for OsHost {
    fn metadata(&self, path: &Path) -> io::Result<FileStat> {
        fs::metadata(path).map(|m| file_stat(&m))
    }

    fn symlink_metadata(&self, path: &Path) -> io::Result<FileStat> {
        fs::symlink_metadata(path).map(|m| file_stat(&m))
    }

    fn read_link_into(&self, path: &Path, buf: &mut [u8]) -> io::Result<usize> {
        let c_path = c_path(path)?;
        // SAFETY: `c_path` is NUL-terminated and `buf` is valid for `buf.len()` bytes.
        let n = unsafe { libc::readlink(c_path.as_ptr(), buf.as_mut_ptr().cast(), buf.len()) };
        usize::try_from(n).map_err(|_| io::Error::last_os_error())
    }

    fn current_dir_into(&self, buf: &mut [u8]) -> io::Result<usize> {
        // SAFETY: `buf` is valid for `buf.len()` bytes; getcwd writes at most that many.
        let ret = unsafe { libc::getcwd(buf.as_mut_ptr().cast(), buf.len()) };
        if ret.is_null() {
            return Err(io::Error::last_os_error());
        }
        Ok(buf.iter().position(|&b| b == 0).unwrap_or(buf.len()))
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        fs::canonicalize(path)
    }

    fn process_id(&self) -> u32 {
        std::process::id()
    }

    fn credentials(&self) -> Credentials {
        // SAFETY: these calls cannot fail and touch no memory we own.
        unsafe {
            Credentials {
                uid: libc::getuid(),
                euid: libc::geteuid(),
                gid: libc::getgid(),
                egid: libc::getegid(),
            }
        }
    }

    fn var_os(&self, key: &str) -> Option<OsString> {
        std::env::var_os(key)
    }

    #[cfg(feature = "dladdr")]
    fn loader_module_name(&self) -> Option<OsString> {
        use std::ffi::{c_void, CStr};
        use std::os::unix::ffi::OsStringExt;

        // SAFETY: Dl_info is plain old data and valid when zeroed.
        let mut info = unsafe { std::mem::zeroed::<libc::Dl_info>() };
        let anchor = loader_anchor as *const c_void;

        // SAFETY: `anchor` points into our own text segment; the result is checked.
        if unsafe { libc::dladdr(anchor, &mut info) } == 0 || info.dli_fname.is_null() {
            return None;
        }

        // SAFETY: dli_fname is non-null and NUL-terminated when dladdr succeeds.
        let name = unsafe { CStr::from_ptr(info.dli_fname) };
        Some(OsString::from_vec(name.to_bytes().to_vec()))
    }

    #[cfg(not(feature = "dladdr"))]
    fn loader_module_name(&self) -> Option<OsString> {
        None
    }
}
