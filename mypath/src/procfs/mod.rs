//! Executable discovery through a procfs self-link.
//!
//! The kernel's own answer is the most trustworthy one, but only if the
//! procfs tree really is the kernel's. Before reading anything the mount
//! point must be a root-owned directory, the self-link must name this very
//! process (compared against `getpid`), and the image entry must be a
//! symbolic link rather than a planted file. Links are read with the
//! double-read protocol from [`crate::buffer`], and the image target must
//! canonicalize to a regular file that still exists, so a deleted or
//! replaced image never makes it out of this module.
//!
//! Layouts are tried in the order of [`ProcfsVariant::ALL`]; a failure
//! abandons only the current layout.

mod variant;

use std::ffi::{OsStr, OsString};
use std::path::PathBuf;

use crate::buffer::read_link_verified;
use crate::config::ResolverConfig;
use crate::error::{Error, Result};
use crate::path::canonicalize::canonical_file;
use crate::path::{Method, ResolvedPath};
use crate::strategy::Strategy;
use crate::sys::Host;

pub use variant::ProcfsVariant;

/// Parse a self-link target that must consist of decimal digits only.
fn parse_pid(link: &std::path::Path, target: &OsStr) -> Result<u64> {
    let unexpected = || Error::UnexpectedSelfLink {
        path: link.to_path_buf(),
        target: target.to_os_string(),
    };
    let digits = target.to_str().ok_or_else(unexpected)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(unexpected());
    }
    digits.parse().map_err(|_| unexpected())
}

/// Finds the executable through procfs.
///
/// # Examples
///
/// ```
/// use mypath::procfs::ProcfsResolver;
/// use mypath::sys::FakeHost;
/// use mypath::ResolverConfig;
/// use std::path::Path;
///
/// let host = FakeHost::new()
///     .with_pid(4242)
///     .with_dir("/proc", 0)
///     .with_symlink("/proc/self", "4242")
///     .with_symlink("/proc/4242/exe", "/opt/app/bin/app")
///     .with_file("/opt/app/bin/app", 0);
/// let config = ResolverConfig::default();
///
/// let exe = ProcfsResolver::new(&host, &config).resolve().unwrap();
/// assert_eq!(exe, Path::new("/opt/app/bin/app"));
/// ```
#[derive(Debug)]
pub struct ProcfsResolver<'a, H: Host + ?Sized> {
    host: &'a H,
    config: &'a ResolverConfig,
}

impl<'a, H: Host + ?Sized> ProcfsResolver<'a, H> {
    /// Create a resolver over `host`.
    #[must_use]
    pub fn new(host: &'a H, config: &'a ResolverConfig) -> Self {
        Self { host, config }
    }

    /// Verify the mount, then try every layout in order.
    ///
    /// # Errors
    ///
    /// Returns an error if the procfs root is missing or untrusted, or if no
    /// layout yields a verified image link.
    pub fn resolve(&self) -> Result<PathBuf> {
        self.verify_mount()?;

        for variant in ProcfsVariant::ALL {
            match self.resolve_variant(variant) {
                Ok(path) => {
                    log::debug!("procfs ({variant}) found {}", path.display());
                    return Ok(path);
                }
                Err(e) => log::debug!("procfs ({variant}) abandoned: {e}"),
            }
        }

        Err(Error::Unavailable {
            what: format!(
                "procfs self-link under {}",
                self.config.procfs_root().display()
            ),
        })
    }

    /// Check that the procfs root is a directory owned by the superuser.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unavailable`] if the root cannot be examined, or
    /// [`Error::UntrustedMount`] if it is not a root-owned directory.
    pub fn verify_mount(&self) -> Result<()> {
        let root = self.config.procfs_root();
        let stat = self.host.metadata(root).map_err(|e| Error::Unavailable {
            what: format!("{}: {e}", root.display()),
        })?;

        if !stat.is_dir() {
            return Err(Error::UntrustedMount {
                path: root.to_path_buf(),
                reason: "not a directory".to_string(),
            });
        }
        if stat.uid != 0 {
            return Err(Error::UntrustedMount {
                path: root.to_path_buf(),
                reason: format!("owned by uid {}", stat.uid),
            });
        }
        Ok(())
    }

    /// Follow one layout through all of its checks.
    ///
    /// # Errors
    ///
    /// Returns the error of the first check that fails, including
    /// [`Error::Canonicalize`] when the image target no longer exists.
    pub fn resolve_variant(&self, variant: ProcfsVariant) -> Result<PathBuf> {
        let size = self.config.initial_buffer_size();

        if let Some((link, expected)) = variant.alias() {
            let link = self.config.procfs_path(link);
            let target = read_link_verified(self.host, &link, size)?;
            if target != expected {
                return Err(Error::UnexpectedSelfLink { path: link, target });
            }
        }

        let pid_link = self.config.procfs_path(variant.pid_link());
        let target = read_link_verified(self.host, &pid_link, size)?;
        let reported = parse_pid(&pid_link, &target)?;
        let actual = self.host.process_id();
        if reported != u64::from(actual) {
            return Err(Error::IdentityMismatch { reported, actual });
        }

        let image = self.config.procfs_path(variant.image_link());
        if !self.host.symlink_metadata(&image)?.is_symlink() {
            return Err(Error::NotASymlink { path: image });
        }

        let target = PathBuf::from(read_link_verified(self.host, &image, size)?);
        if !target.is_absolute() {
            return Err(Error::RelativeTarget {
                link: image,
                target,
            });
        }
        canonical_file(self.host, &target)
    }
}

impl<H: Host + ?Sized> Strategy for ProcfsResolver<'_, H> {
    fn method(&self) -> Method {
        Method::Procfs
    }

    fn locate(&self, _argv0: &OsStr) -> Result<ResolvedPath> {
        ResolvedPath::new(self.resolve()?, Method::Procfs)
    }
}

/// The self-link target currently reported for `variant`, unverified.
///
/// Useful for diagnostics only; resolution never trusts this alone.
///
/// # Errors
///
/// Returns an error if the link cannot be read.
pub fn self_link_target<H: Host + ?Sized>(
    host: &H,
    config: &ResolverConfig,
    variant: ProcfsVariant,
) -> Result<OsString> {
    read_link_verified(
        host,
        &config.procfs_path(variant.pid_link()),
        config.initial_buffer_size(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sys::FakeHost;
    use std::path::Path;

    const PID: u32 = 4242;

    fn linux_proc() -> FakeHost {
        FakeHost::new()
            .with_pid(PID)
            .with_dir("/proc", 0)
            .with_symlink("/proc/self", PID.to_string())
            .with_symlink(format!("/proc/{PID}/exe"), "/opt/app/bin/app")
            .with_file("/opt/app/bin/app", 0)
    }

    fn resolve(host: &FakeHost) -> Result<PathBuf> {
        let config = ResolverConfig::default();
        ProcfsResolver::new(host, &config).resolve()
    }

    fn resolve_variant(host: &FakeHost, variant: ProcfsVariant) -> Result<PathBuf> {
        let config = ResolverConfig::default();
        ProcfsResolver::new(host, &config).resolve_variant(variant)
    }

    #[test]
    fn test_parse_pid() {
        let link = Path::new("/proc/self");
        assert_eq!(parse_pid(link, OsStr::new("4242")).unwrap(), 4242);
        assert!(parse_pid(link, OsStr::new("")).is_err());
        assert!(parse_pid(link, OsStr::new("42a")).is_err());
        assert!(parse_pid(link, OsStr::new("-42")).is_err());
        assert!(parse_pid(link, OsStr::new("curproc")).is_err());
        assert!(parse_pid(link, OsStr::new("99999999999999999999999")).is_err());
    }

    #[test]
    fn test_linux_layout() {
        let host = linux_proc();
        assert_eq!(resolve(&host).unwrap(), PathBuf::from("/opt/app/bin/app"));
    }

    #[test]
    fn test_freebsd_layout() {
        let host = FakeHost::new()
            .with_pid(PID)
            .with_dir("/proc", 0)
            .with_symlink("/proc/curproc", PID.to_string())
            .with_symlink(format!("/proc/{PID}/file"), "/usr/local/bin/app")
            .with_file("/usr/local/bin/app", 0);

        assert!(resolve_variant(&host, ProcfsVariant::Linux).is_err());
        assert_eq!(resolve(&host).unwrap(), PathBuf::from("/usr/local/bin/app"));
    }

    #[test]
    fn test_netbsd_layout() {
        let host = FakeHost::new()
            .with_pid(PID)
            .with_dir("/proc", 0)
            .with_symlink("/proc/self", "curproc")
            .with_symlink("/proc/curproc", PID.to_string())
            .with_symlink(format!("/proc/{PID}/exe"), "/usr/pkg/bin/app")
            .with_file("/usr/pkg/bin/app", 0);

        assert!(matches!(
            resolve_variant(&host, ProcfsVariant::Linux),
            Err(Error::UnexpectedSelfLink { .. })
        ));
        assert!(resolve_variant(&host, ProcfsVariant::FreeBsd).is_err());
        assert_eq!(resolve(&host).unwrap(), PathBuf::from("/usr/pkg/bin/app"));
    }

    #[test]
    fn test_netbsd_alias_must_be_curproc() {
        let host = FakeHost::new()
            .with_pid(PID)
            .with_dir("/proc", 0)
            .with_symlink("/proc/self", "elsewhere")
            .with_symlink("/proc/curproc", PID.to_string())
            .with_symlink(format!("/proc/{PID}/exe"), "/usr/pkg/bin/app");

        let err = resolve_variant(&host, ProcfsVariant::NetBsd).unwrap_err();
        assert!(matches!(err, Error::UnexpectedSelfLink { .. }));
    }

    #[test]
    fn test_missing_procfs() {
        let host = FakeHost::new();
        let err = resolve(&host).unwrap_err();
        assert!(matches!(err, Error::Unavailable { .. }));
    }

    #[test]
    fn test_procfs_not_owned_by_root() {
        let host = FakeHost::new()
            .with_pid(PID)
            .with_dir("/proc", 1000)
            .with_symlink("/proc/self", PID.to_string())
            .with_symlink(format!("/proc/{PID}/exe"), "/opt/app/bin/app");

        let err = resolve(&host).unwrap_err();
        assert!(matches!(err, Error::UntrustedMount { .. }));
    }

    #[test]
    fn test_procfs_not_a_directory() {
        let host = FakeHost::new().with_file("/proc", 0);
        let err = resolve(&host).unwrap_err();
        assert!(matches!(err, Error::UntrustedMount { .. }));
    }

    #[test]
    fn test_non_numeric_self_link() {
        let host = FakeHost::new()
            .with_pid(PID)
            .with_dir("/proc", 0)
            .with_dir("/proc/me", 0)
            .with_symlink("/proc/self", "me")
            .with_symlink("/proc/me/exe", "/opt/app/bin/app");

        let err = resolve_variant(&host, ProcfsVariant::Linux).unwrap_err();
        assert!(matches!(err, Error::UnexpectedSelfLink { .. }));
        assert!(resolve(&host).is_err());
    }

    #[test]
    fn test_pid_mismatch() {
        let host = linux_proc().with_pid(7);
        let err = resolve_variant(&host, ProcfsVariant::Linux).unwrap_err();
        assert!(matches!(
            err,
            Error::IdentityMismatch {
                reported: 4242,
                actual: 7
            }
        ));
        assert!(resolve(&host).is_err());
    }

    #[test]
    fn test_pid_mismatch_falls_through_to_next_layout() {
        let host = FakeHost::new()
            .with_pid(PID)
            .with_dir("/proc", 0)
            .with_symlink("/proc/self", "1")
            .with_symlink("/proc/1/exe", "/sbin/init")
            .with_symlink("/proc/curproc", PID.to_string())
            .with_symlink(format!("/proc/{PID}/file"), "/opt/app/bin/app")
            .with_file("/opt/app/bin/app", 0);

        assert_eq!(resolve(&host).unwrap(), PathBuf::from("/opt/app/bin/app"));
    }

    #[test]
    fn test_planted_regular_file_is_rejected() {
        let host = FakeHost::new()
            .with_pid(PID)
            .with_dir("/proc", 0)
            .with_symlink("/proc/self", PID.to_string())
            .with_file(format!("/proc/{PID}/exe"), 0);

        let err = resolve_variant(&host, ProcfsVariant::Linux).unwrap_err();
        assert!(matches!(err, Error::NotASymlink { .. }));
    }

    #[test]
    fn test_relative_image_target_is_rejected() {
        let host = FakeHost::new()
            .with_pid(PID)
            .with_dir("/proc", 0)
            .with_symlink("/proc/self", PID.to_string())
            .with_symlink(format!("/proc/{PID}/exe"), "bin/app");

        let err = resolve_variant(&host, ProcfsVariant::Linux).unwrap_err();
        assert!(matches!(err, Error::RelativeTarget { .. }));
    }

    #[test]
    fn test_changing_image_link_is_reread() {
        let host = FakeHost::new()
            .with_pid(PID)
            .with_dir("/proc", 0)
            .with_symlink("/proc/self", PID.to_string())
            .with_changing_symlink(
                format!("/proc/{PID}/exe"),
                ["/opt/app/bin/app.old"],
                "/opt/app/bin/app",
            )
            .with_file("/opt/app/bin/app", 0);

        assert_eq!(resolve(&host).unwrap(), PathBuf::from("/opt/app/bin/app"));
    }

    #[test]
    fn test_deleted_image_is_rejected() {
        let host = FakeHost::new()
            .with_pid(PID)
            .with_dir("/proc", 0)
            .with_symlink("/proc/self", PID.to_string())
            .with_symlink(format!("/proc/{PID}/exe"), "/opt/app/bin/app (deleted)")
            .with_file("/opt/app/bin/app.new", 0);

        let err = resolve_variant(&host, ProcfsVariant::Linux).unwrap_err();
        assert!(matches!(err, Error::Canonicalize { .. }));
        assert!(resolve(&host).is_err());
    }

    #[test]
    fn test_image_target_is_canonicalized() {
        let host = FakeHost::new()
            .with_pid(PID)
            .with_dir("/proc", 0)
            .with_symlink("/proc/self", PID.to_string())
            .with_symlink(format!("/proc/{PID}/exe"), "/opt/../opt/./app/bin/app")
            .with_file("/opt/app/bin/app", 0);

        assert_eq!(resolve(&host).unwrap(), PathBuf::from("/opt/app/bin/app"));
    }

    #[test]
    fn test_image_target_must_be_regular_file() {
        let host = FakeHost::new()
            .with_pid(PID)
            .with_dir("/proc", 0)
            .with_symlink("/proc/self", PID.to_string())
            .with_symlink(format!("/proc/{PID}/exe"), "/opt/app")
            .with_dir("/opt/app", 0);

        let err = resolve_variant(&host, ProcfsVariant::Linux).unwrap_err();
        assert!(matches!(err, Error::NotAFile { .. }));
    }

    #[test]
    fn test_custom_root() {
        let host = FakeHost::new()
            .with_pid(PID)
            .with_dir("/compat/linux/proc", 0)
            .with_symlink("/compat/linux/proc/self", PID.to_string())
            .with_symlink(format!("/compat/linux/proc/{PID}/exe"), "/opt/app/bin/app")
            .with_file("/opt/app/bin/app", 0);
        let config = ResolverConfig::new().with_procfs_root("/compat/linux/proc");

        let exe = ProcfsResolver::new(&host, &config).resolve().unwrap();
        assert_eq!(exe, PathBuf::from("/opt/app/bin/app"));
    }

    #[test]
    fn test_locate_tags_procfs_method() {
        let host = linux_proc();
        let config = ResolverConfig::default();
        let resolver = ProcfsResolver::new(&host, &config);
        let resolved = resolver.locate(OsStr::new("ignored")).unwrap();
        assert_eq!(resolved.method(), Method::Procfs);
        assert_eq!(resolved.path(), Path::new("/opt/app/bin/app"));
    }

    #[test]
    fn test_self_link_target() {
        let host = linux_proc();
        let config = ResolverConfig::default();
        let target = self_link_target(&host, &config, ProcfsVariant::Linux).unwrap();
        assert_eq!(target, OsString::from(PID.to_string()));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_real_linux_procfs() {
        use crate::sys::OsHost;

        let config = ResolverConfig::default();
        if let Ok(exe) = ProcfsResolver::new(&OsHost, &config).resolve() {
            let expected = std::fs::canonicalize(std::env::current_exe().unwrap()).unwrap();
            assert_eq!(exe, expected);
        }
    }
}
