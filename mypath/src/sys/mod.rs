//! Operating system access.
//!
//! Every resolver talks to the kernel through the [`Host`] trait. The
//! production implementation is [`OsHost`]; [`FakeHost`] is an in-memory
//! stand-in used to exercise each strategy against procfs layouts, search
//! paths and identities that cannot be arranged on a real machine.

mod fake;
mod os;

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

pub use fake::FakeHost;
pub use os::OsHost;

/// The type of a filesystem entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// A directory.
    Directory,
    /// A regular file.
    Regular,
    /// A symbolic link (only reported by [`Host::symlink_metadata`]).
    Symlink,
    /// Anything else: sockets, devices, fifos.
    Other,
}

/// The parts of `stat(2)` the resolvers care about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStat {
    /// The entry type.
    pub kind: FileKind,
    /// Owning user id.
    pub uid: u32,
}

impl FileStat {
    /// Check whether the entry is a directory.
    #[must_use]
    pub fn is_dir(&self) -> bool {
        self.kind == FileKind::Directory
    }

    /// Check whether the entry is a regular file.
    #[must_use]
    pub fn is_file(&self) -> bool {
        self.kind == FileKind::Regular
    }

    /// Check whether the entry is a symbolic link.
    #[must_use]
    pub fn is_symlink(&self) -> bool {
        self.kind == FileKind::Symlink
    }
}

/// Real and effective user and group ids of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Credentials {
    /// Real user id.
    pub uid: u32,
    /// Effective user id.
    pub euid: u32,
    /// Real group id.
    pub gid: u32,
    /// Effective group id.
    pub egid: u32,
}

impl Credentials {
    /// Credentials of an unprivileged user whose ids are all `id`.
    #[must_use]
    pub const fn user(id: u32) -> Self {
        Self {
            uid: id,
            euid: id,
            gid: id,
            egid: id,
        }
    }

    /// Check whether any real or effective id is the superuser's.
    ///
    /// # Examples
    ///
    /// ```
    /// use mypath::sys::Credentials;
    ///
    /// assert!(!Credentials::user(1000).is_superuser());
    /// assert!(Credentials { euid: 0, ..Credentials::user(1000) }.is_superuser());
    /// ```
    #[must_use]
    pub const fn is_superuser(&self) -> bool {
        self.uid == 0 || self.euid == 0 || self.gid == 0 || self.egid == 0
    }
}

/// Access to the kernel facilities the resolvers rely on.
///
/// The two `*_into` methods deliberately expose the raw, size-bounded
/// primitives: callers own the buffer growth and verification logic.
pub trait Host: Send + Sync {
    /// `stat(2)`: follows symbolic links.
    ///
    /// # Errors
    ///
    /// Returns the OS error if the path cannot be examined.
    fn metadata(&self, path: &Path) -> io::Result<FileStat>;

    /// `lstat(2)`: does not follow a final symbolic link.
    ///
    /// # Errors
    ///
    /// Returns the OS error if the path cannot be examined.
    fn symlink_metadata(&self, path: &Path) -> io::Result<FileStat>;

    /// `readlink(2)` into `buf`, returning the number of bytes placed.
    ///
    /// A target longer than `buf` is silently truncated.
    ///
    /// # Errors
    ///
    /// Returns the OS error if the link cannot be read.
    fn read_link_into(&self, path: &Path, buf: &mut [u8]) -> io::Result<usize>;

    /// `getcwd(3)` into `buf`, returning the length of the path written.
    ///
    /// # Errors
    ///
    /// Fails with `ERANGE` when `buf` is too small, or any other OS error.
    fn current_dir_into(&self, buf: &mut [u8]) -> io::Result<usize>;

    /// `realpath(3)` with POSIX.1-2008 allocation semantics.
    ///
    /// # Errors
    ///
    /// Returns the OS error if any component cannot be resolved.
    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf>;

    /// `getpid(2)`.
    fn process_id(&self) -> u32;

    /// Real and effective user and group ids.
    fn credentials(&self) -> Credentials;

    /// Reads an environment variable.
    fn var_os(&self, key: &str) -> Option<OsString>;

    /// File name the dynamic loader reports for the module holding this code.
    fn loader_module_name(&self) -> Option<OsString>;
}

impl<H: Host + ?Sized> Host for &H {
    fn metadata(&self, path: &Path) -> io::Result<FileStat> {
        (**self).metadata(path)
    }

    fn symlink_metadata(&self, path: &Path) -> io::Result<FileStat> {
        (**self).symlink_metadata(path)
    }

    fn read_link_into(&self, path: &Path, buf: &mut [u8]) -> io::Result<usize> {
        (**self).read_link_into(path, buf)
    }

    fn current_dir_into(&self, buf: &mut [u8]) -> io::Result<usize> {
        (**self).current_dir_into(buf)
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        (**self).canonicalize(path)
    }

    fn process_id(&self) -> u32 {
        (**self).process_id()
    }

    fn credentials(&self) -> Credentials {
        (**self).credentials()
    }

    fn var_os(&self, key: &str) -> Option<OsString> {
        (**self).var_os(key)
    }

    fn loader_module_name(&self) -> Option<OsString> {
        (**self).loader_module_name()
    }
}
