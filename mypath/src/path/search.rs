//! Parsing of the executable search path.

use std::ffi::OsStr;
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};

/// Ordered directories taken from a colon-separated search path.
///
/// Empty segments are skipped. A shell treats them as "the current
/// directory"; here they are ignored, so a stray `::` or a leading or
/// trailing colon in `PATH` never makes the working directory a source
/// of executables.
///
/// # Examples
///
/// ```
/// use mypath::path::SearchPathList;
/// use std::ffi::OsStr;
/// use std::path::Path;
///
/// let list = SearchPathList::parse(OsStr::new("::/a:/b:"));
/// let dirs: Vec<&Path> = list.iter().collect();
/// assert_eq!(dirs, [Path::new("/a"), Path::new("/b")]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchPathList {
    dirs: Vec<PathBuf>,
}

impl SearchPathList {
    /// Split a search path value on `:`.
    #[must_use]
    pub fn parse(value: &OsStr) -> Self {
        let dirs = value
            .as_bytes()
            .split(|&b| b == b':')
            .filter(|segment| !segment.is_empty())
            .map(|segment| PathBuf::from(OsStr::from_bytes(segment)))
            .collect();
        Self { dirs }
    }

    /// Iterate over the directories in search order.
    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.dirs.iter().map(PathBuf::as_path)
    }

    /// Number of directories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.dirs.len()
    }

    /// Check whether there are no directories to search.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }
}
