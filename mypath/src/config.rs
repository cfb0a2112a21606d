//! Resolver configuration and caller flags.

use std::fmt;
use std::path::{Path, PathBuf};

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::buffer::DEFAULT_INITIAL_SIZE;

bitflags! {
    /// Caller flags for [`get_application_path`](crate::get_application_path).
    ///
    /// # Examples
    ///
    /// ```
    /// use mypath::Flags;
    ///
    /// assert!(!Flags::empty().allows_root());
    /// assert!(Flags::ALLOW_ROOT.allows_root());
    /// assert_eq!(Flags::from_bits(1), Some(Flags::ALLOW_ROOT));
    /// assert_eq!(Flags::from_bits(2), None);
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[repr(transparent)]
    pub struct Flags: u32 {
        /// Permit resolution while running with superuser ids.
        ///
        /// Off by default: a relocatable path trusted by a root process is a
        /// privilege-escalation vector.
        const ALLOW_ROOT = 1 << 0;
    }
}

impl Default for Flags {
    fn default() -> Self {
        Self::empty()
    }
}

impl Flags {
    /// Shorthand for `contains(Flags::ALLOW_ROOT)`.
    #[must_use]
    pub const fn allows_root(self) -> bool {
        self.contains(Self::ALLOW_ROOT)
    }
}

impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            f.write_str("(none)")
        } else {
            bitflags::parser::to_writer(self, f)
        }
    }
}

/// Settings shared by all resolvers.
///
/// # Examples
///
/// ```
/// use mypath::ResolverConfig;
/// use std::path::Path;
///
/// let config = ResolverConfig::new()
///     .with_procfs_root("/compat/linux/proc")
///     .with_initial_buffer_size(256);
/// assert_eq!(config.procfs_root(), Path::new("/compat/linux/proc"));
/// assert_eq!(config.initial_buffer_size(), 256);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    procfs_root: PathBuf,
    initial_buffer_size: usize,
    path_variable: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            procfs_root: PathBuf::from("/proc"),
            initial_buffer_size: DEFAULT_INITIAL_SIZE,
            path_variable: "PATH".to_string(),
        }
    }
}

impl ResolverConfig {
    /// Create a configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount point of the procfs tree.
    #[must_use]
    pub fn with_procfs_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.procfs_root = root.into();
        self
    }

    /// Size of the first buffer for `readlink` and `getcwd`. Values below 2
    /// are raised to 2 so doubling always makes progress.
    #[must_use]
    pub fn with_initial_buffer_size(mut self, size: usize) -> Self {
        self.initial_buffer_size = size.max(2);
        self
    }

    /// Environment variable holding the executable search path.
    #[must_use]
    pub fn with_path_variable(mut self, name: impl Into<String>) -> Self {
        self.path_variable = name.into();
        self
    }

    /// Mount point of the procfs tree.
    #[must_use]
    pub fn procfs_root(&self) -> &Path {
        &self.procfs_root
    }

    /// Size of the first `readlink`/`getcwd` buffer.
    #[must_use]
    pub fn initial_buffer_size(&self) -> usize {
        self.initial_buffer_size
    }

    /// Name of the search path environment variable.
    #[must_use]
    pub fn path_variable(&self) -> &str {
        &self.path_variable
    }

    /// Join `rel` onto the procfs root.
    pub(crate) fn procfs_path(&self, rel: impl AsRef<Path>) -> PathBuf {
        self.procfs_root.join(rel)
    }
}
