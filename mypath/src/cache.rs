//! One-shot memoization of the executable path.
//!
//! The first permitted call runs the strategy chain and stores the outcome,
//! success or failure, for the lifetime of the cache. Every later call
//! returns that outcome whatever its arguments. Callers running with
//! superuser ids are turned away before anything is resolved or stored,
//! unless they pass [`Flags::ALLOW_ROOT`].

use std::ffi::OsStr;
use std::path::Path;
use std::sync::{LazyLock, OnceLock};

use crate::config::{Flags, ResolverConfig};
use crate::error::{Error, Result};
use crate::path::ResolvedPath;
use crate::strategy::locate_first;
use crate::sys::{Host, OsHost};

static APPLICATION_PATH: LazyLock<ApplicationPathCache<OsHost>> =
    LazyLock::new(|| ApplicationPathCache::new(OsHost, ResolverConfig::default()));

/// Cached executable path over some [`Host`].
///
/// # Examples
///
/// ```
/// use mypath::sys::FakeHost;
/// use mypath::{ApplicationPathCache, Flags, ResolverConfig};
/// use std::ffi::OsStr;
/// use std::path::Path;
///
/// let host = FakeHost::new().with_file("/usr/bin/app", 0);
/// let cache = ApplicationPathCache::new(host, ResolverConfig::default());
///
/// let first = cache.resolve(OsStr::new("/usr/bin/app"), Flags::empty()).unwrap();
/// assert_eq!(first.path(), Path::new("/usr/bin/app"));
///
/// // Later arguments are ignored.
/// let again = cache.resolve(OsStr::new("other"), Flags::empty()).unwrap();
/// assert_eq!(again.path(), Path::new("/usr/bin/app"));
/// ```
#[derive(Debug)]
pub struct ApplicationPathCache<H: Host> {
    host: H,
    config: ResolverConfig,
    cell: OnceLock<Option<ResolvedPath>>,
}

impl<H: Host> ApplicationPathCache<H> {
    /// Create an empty cache.
    #[must_use]
    pub fn new(host: H, config: ResolverConfig) -> Self {
        Self {
            host,
            config,
            cell: OnceLock::new(),
        }
    }

    /// The executable path, resolving it on the first permitted call.
    ///
    /// Returns `None` when the privilege gate refuses the caller (nothing is
    /// cached in that case) or when every strategy failed (that failure is
    /// cached).
    pub fn resolve(&self, argv0: &OsStr, flags: Flags) -> Option<&ResolvedPath> {
        self.try_resolve(argv0, flags).ok()
    }

    /// Like [`resolve`](Self::resolve), but says why there is no answer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PrivilegedProcess`] if the gate refused the caller,
    /// or [`Error::Undetermined`] if resolution failed.
    pub fn try_resolve(&self, argv0: &OsStr, flags: Flags) -> Result<&ResolvedPath> {
        if !flags.allows_root() && self.host.credentials().is_superuser() {
            log::debug!("refusing to resolve with superuser ids");
            return Err(Error::PrivilegedProcess);
        }

        self.cell
            .get_or_init(|| {
                let found = locate_first(&self.host, &self.config, argv0);
                match &found {
                    Some(resolved) => log::debug!(
                        "application path {} (via {})",
                        resolved.path().display(),
                        resolved.method()
                    ),
                    None => log::debug!("application path could not be determined"),
                }
                found
            })
            .as_ref()
            .ok_or(Error::Undetermined)
    }

    /// Check whether an outcome has been stored.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }

    /// The host this cache resolves against.
    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    /// The configuration this cache resolves with.
    #[must_use]
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }
}

/// The process-wide cache over the real operating system.
#[must_use]
pub fn application_path_cache() -> &'static ApplicationPathCache<OsHost> {
    &APPLICATION_PATH
}

/// Canonical absolute path of the running executable.
///
/// Resolved once per process: procfs first, then the dynamic loader, then
/// `argv0`. The first permitted call decides the answer for the rest of the
/// process; `argv0` and `flags` of later calls only matter to the privilege
/// gate.
///
/// Returns `None` if the path cannot be determined, or if the process runs
/// with any superuser id and `flags` lacks [`Flags::ALLOW_ROOT`].
///
/// # Examples
///
/// ```no_run
/// use mypath::{get_application_path, Flags};
///
/// let argv0 = std::env::args_os().next().unwrap_or_default();
/// if let Some(exe) = get_application_path(&argv0, Flags::empty()) {
///     println!("running from {}", exe.display());
/// }
/// ```
pub fn get_application_path(argv0: &OsStr, flags: Flags) -> Option<&'static Path> {
    APPLICATION_PATH
        .resolve(argv0, flags)
        .map(ResolvedPath::path)
}
