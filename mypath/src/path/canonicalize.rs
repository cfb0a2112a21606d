//! Canonicalization of executable candidates.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::sys::Host;

/// Canonicalize `path` through the host's `realpath`.
///
/// Every symbolic link is resolved and `.`/`..` components disappear. Any
/// failure, including a dangling link anywhere on the way, is reported as
/// [`Error::Canonicalize`]; no partially resolved path is ever returned.
///
/// # Errors
///
/// Returns [`Error::Canonicalize`] wrapping the OS error.
///
/// # Examples
///
/// ```
/// use mypath::path::canonicalize::canonicalize;
/// use mypath::sys::FakeHost;
/// use std::path::Path;
///
/// let host = FakeHost::new().with_file("/opt/app", 0).with_dir("/usr", 0);
/// let canonical = canonicalize(&host, Path::new("/usr/../opt/./app")).unwrap();
/// assert_eq!(canonical, Path::new("/opt/app"));
/// ```
pub fn canonicalize<H: Host + ?Sized>(host: &H, path: &Path) -> Result<PathBuf> {
    host.canonicalize(path).map_err(|source| Error::Canonicalize {
        path: path.to_path_buf(),
        source,
    })
}

/// Canonicalize `path` and require the result to be a regular file.
///
/// # Errors
///
/// Returns [`Error::Canonicalize`] if resolution fails, or
/// [`Error::NotAFile`] if the target is a directory or special file.
pub fn canonical_file<H: Host + ?Sized>(host: &H, path: &Path) -> Result<PathBuf> {
    let canonical = canonicalize(host, path)?;
    let stat = host.metadata(&canonical)?;
    if !stat.is_file() {
        return Err(Error::NotAFile { path: canonical });
    }
    Ok(canonical)
}
