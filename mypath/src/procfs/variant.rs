//! Per-platform procfs layouts.

use std::fmt;

/// A procfs layout that exposes a link to the running executable.
///
/// Each layout names a self-link whose target is the caller's pid and an
/// image link pointing at the executable. NetBSD adds one indirection:
/// `self` must read literally `curproc`, and `curproc` then carries the pid.
///
/// # Examples
///
/// ```
/// use mypath::procfs::ProcfsVariant;
///
/// assert_eq!(ProcfsVariant::Linux.image_link(), "self/exe");
/// assert_eq!(ProcfsVariant::NetBsd.alias(), Some(("self", "curproc")));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProcfsVariant {
    /// `/proc/self -> <pid>`, `/proc/self/exe`.
    Linux,
    /// `/proc/curproc -> <pid>`, `/proc/curproc/file`.
    FreeBsd,
    /// `/proc/self -> curproc`, `/proc/curproc -> <pid>`, `/proc/curproc/exe`.
    NetBsd,
}

impl ProcfsVariant {
    /// All variants, in the order they are tried.
    pub const ALL: [Self; 3] = [Self::Linux, Self::FreeBsd, Self::NetBsd];

    /// Human-readable name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Linux => "linux",
            Self::FreeBsd => "freebsd",
            Self::NetBsd => "netbsd",
        }
    }

    /// A link that must read as a fixed token before the pid link is
    /// consulted, as `(link, expected target)`.
    #[must_use]
    pub const fn alias(self) -> Option<(&'static str, &'static str)> {
        match self {
            Self::NetBsd => Some(("self", "curproc")),
            Self::Linux | Self::FreeBsd => None,
        }
    }

    /// The link, relative to the procfs root, whose target is the pid.
    #[must_use]
    pub const fn pid_link(self) -> &'static str {
        match self {
            Self::Linux => "self",
            Self::FreeBsd | Self::NetBsd => "curproc",
        }
    }

    /// The link, relative to the procfs root, that points at the executable.
    #[must_use]
    pub const fn image_link(self) -> &'static str {
        match self {
            Self::Linux => "self/exe",
            Self::FreeBsd => "curproc/file",
            Self::NetBsd => "curproc/exe",
        }
    }
}

impl fmt::Display for ProcfsVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_order() {
        assert_eq!(
            ProcfsVariant::ALL,
            [
                ProcfsVariant::Linux,
                ProcfsVariant::FreeBsd,
                ProcfsVariant::NetBsd
            ]
        );
    }

    #[test]
    fn test_variant_layouts() {
        assert_eq!(ProcfsVariant::Linux.pid_link(), "self");
        assert_eq!(ProcfsVariant::FreeBsd.pid_link(), "curproc");
        assert_eq!(ProcfsVariant::FreeBsd.image_link(), "curproc/file");
        assert_eq!(ProcfsVariant::NetBsd.pid_link(), "curproc");
        assert_eq!(ProcfsVariant::NetBsd.image_link(), "curproc/exe");
        assert!(ProcfsVariant::Linux.alias().is_none());
        assert!(ProcfsVariant::FreeBsd.alias().is_none());
    }

    #[test]
    fn test_variant_display() {
        assert_eq!(ProcfsVariant::FreeBsd.to_string(), "freebsd");
    }
}
