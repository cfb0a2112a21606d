//! Core types for resolved application paths.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{Error, Result};

/// The strategy that produced a [`ResolvedPath`].
///
/// # Examples
///
/// ```
/// use mypath::Method;
///
/// assert_eq!(Method::Procfs.to_string(), "procfs");
/// assert_eq!(Method::ALL.len(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Method {
    /// A procfs self-link to the executable image.
    Procfs,
    /// The dynamic loader's idea of which module holds our code.
    DynamicLoader,
    /// `argv[0]`, completed against the working directory or `PATH`.
    Argv0,
}

impl Method {
    /// All methods in the order they are tried.
    pub const ALL: [Self; 3] = [Self::Procfs, Self::DynamicLoader, Self::Argv0];

    /// Short name used in logs and CLI output.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Procfs => "procfs",
            Self::DynamicLoader => "dladdr",
            Self::Argv0 => "argv[0]",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An absolute path to the running executable, and how it was found.
///
/// Never mutated once built.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ResolvedPath {
    path: PathBuf,
    method: Method,
}

impl ResolvedPath {
    /// Wrap a path found by `method`.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is not absolute.
    ///
    /// # Examples
    ///
    /// ```
    /// use mypath::{Method, ResolvedPath};
    ///
    /// let resolved = ResolvedPath::new("/opt/app/bin/app", Method::Procfs).unwrap();
    /// assert_eq!(resolved.method(), Method::Procfs);
    /// assert!(ResolvedPath::new("bin/app", Method::Argv0).is_err());
    /// ```
    pub fn new(path: impl Into<PathBuf>, method: Method) -> Result<Self> {
        let path = path.into();
        if !path.is_absolute() {
            return Err(Error::RelativeTarget {
                link: PathBuf::from(method.name()),
                target: path,
            });
        }
        Ok(Self { path, method })
    }

    /// The resolved path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The strategy that found it.
    #[must_use]
    pub fn method(&self) -> Method {
        self.method
    }

    /// Consume and return the inner path.
    #[must_use]
    pub fn into_path_buf(self) -> PathBuf {
        self.path
    }
}

impl AsRef<Path> for ResolvedPath {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}

impl fmt::Display for ResolvedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_order() {
        assert_eq!(
            Method::ALL,
            [Method::Procfs, Method::DynamicLoader, Method::Argv0]
        );
    }

    #[test]
    fn test_method_names() {
        assert_eq!(Method::Procfs.name(), "procfs");
        assert_eq!(Method::DynamicLoader.name(), "dladdr");
        assert_eq!(Method::Argv0.name(), "argv[0]");
    }

    #[test]
    fn test_resolved_path_rejects_relative() {
        let err = ResolvedPath::new("app", Method::Argv0).unwrap_err();
        assert!(matches!(err, Error::RelativeTarget { .. }));
    }

    #[test]
    fn test_resolved_path_accessors() {
        let resolved = ResolvedPath::new("/usr/bin/app", Method::DynamicLoader).unwrap();
        assert_eq!(resolved.path(), Path::new("/usr/bin/app"));
        assert_eq!(resolved.to_string(), "/usr/bin/app");
        assert_eq!(resolved.as_ref(), Path::new("/usr/bin/app"));
        assert_eq!(resolved.into_path_buf(), PathBuf::from("/usr/bin/app"));
    }

    #[test]
    fn test_resolved_path_serializes() {
        let resolved = ResolvedPath::new("/usr/bin/app", Method::DynamicLoader).unwrap();
        let json = serde_json::to_string(&resolved).unwrap();
        assert_eq!(json, r#"{"path":"/usr/bin/app","method":"dynamic-loader"}"#);
    }
}
