//! Error types for the mypath library.
//!
//! Every resolution step reports its failure through [`Error`]. The cached
//! top-level operation swallows these and moves on to the next strategy, but
//! the individual resolvers hand them back so diagnostics can tell which
//! step gave up.

use std::ffi::OsString;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for operations that may fail with a mypath error.
///
/// # Examples
///
/// ```
/// use mypath::{Error, Result};
///
/// fn example_operation() -> Result<u32> {
///     Ok(42)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the mypath library.
#[derive(Debug, Error)]
pub enum Error {
    /// The kernel interface a strategy needs is missing.
    #[error("kernel interface unavailable: {what}")]
    Unavailable {
        /// What was looked for.
        what: String,
    },

    /// A procfs entry is not owned by the superuser or is not a directory.
    #[error("untrusted procfs mount at {}: {reason}", path.display())]
    UntrustedMount {
        /// The mount point that failed verification.
        path: PathBuf,
        /// Why it was rejected.
        reason: String,
    },

    /// A self-link pointed at something other than what the variant expects.
    #[error("unexpected self-link target {target:?} at {}", path.display())]
    UnexpectedSelfLink {
        /// The self-link that was read.
        path: PathBuf,
        /// The target it reported.
        target: OsString,
    },

    /// A numeric self-link names a different process.
    #[error("self-link reports pid {reported}, but this process is {actual}")]
    IdentityMismatch {
        /// The pid read from procfs.
        reported: u64,
        /// The pid reported by the kernel.
        actual: u32,
    },

    /// A path that must be a symbolic link is something else.
    #[error("not a symbolic link: {}", path.display())]
    NotASymlink {
        /// The offending path.
        path: PathBuf,
    },

    /// A link read returned no data.
    #[error("empty read from {}", path.display())]
    EmptyRead {
        /// The link being read.
        path: PathBuf,
    },

    /// A growing buffer could not grow any further.
    #[error("buffer for {} cannot grow past {size} bytes", path.display())]
    BufferExhausted {
        /// The path being read.
        path: PathBuf,
        /// The last size that was attempted.
        size: usize,
    },

    /// A link target is not an absolute path.
    #[error("link {} points at relative target {}", link.display(), target.display())]
    RelativeTarget {
        /// The link that was read.
        link: PathBuf,
        /// The relative target.
        target: PathBuf,
    },

    /// The executable name was not found in any search directory.
    #[error("{name:?} not found in {variable}")]
    NotFoundInSearchPath {
        /// The name that was searched for.
        name: OsString,
        /// The environment variable that supplied the directories.
        variable: String,
    },

    /// A candidate resolved to something other than a regular file.
    #[error("not a regular file: {}", path.display())]
    NotAFile {
        /// The canonical path of the candidate.
        path: PathBuf,
    },

    /// An empty executable name was supplied.
    #[error("empty executable name")]
    EmptyCandidate,

    /// The working directory could not be determined.
    #[error("current directory unavailable")]
    NoCurrentDir,

    /// Canonicalization of a candidate failed.
    #[error("cannot canonicalize {}: {source}", path.display())]
    Canonicalize {
        /// The candidate path.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Every strategy failed; the path of the running executable is unknown.
    #[error("could not determine the application path")]
    Undetermined,

    /// Resolution was refused because the process runs as the superuser.
    #[error("refusing to resolve the application path for a privileged process")]
    PrivilegedProcess,

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Check if the error means the thing looked for does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use mypath::Error;
    ///
    /// let err = Error::NotFoundInSearchPath {
    ///     name: "tool".into(),
    ///     variable: "PATH".to_string(),
    /// };
    /// assert!(err.is_not_found());
    /// ```
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFoundInSearchPath { .. } | Self::Unavailable { .. } | Self::Undetermined => {
                true
            }
            Self::Canonicalize { source, .. } | Self::Io(source) => {
                source.kind() == std::io::ErrorKind::NotFound
            }
            _ => false,
        }
    }

    /// Check if the error is the privilege policy refusing to run.
    #[must_use]
    pub fn is_policy_rejection(&self) -> bool {
        matches!(self, Self::PrivilegedProcess)
    }
}
