//! Reconstruction of an absolute path from an invocation name.

use std::ffi::OsStr;
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};

use crate::buffer;
use crate::config::ResolverConfig;
use crate::error::{Error, Result};
use crate::path::canonicalize::canonical_file;
use crate::path::search::SearchPathList;
use crate::path::types::{Method, ResolvedPath};
use crate::strategy::Strategy;
use crate::sys::Host;

/// Turns `argv[0]`-style names into canonical absolute paths.
///
/// | Candidate | Handling |
/// |---|---|
/// | starts with `/` | used as is |
/// | contains `/` | joined onto the working directory, minus one leading `./` |
/// | no `/` | looked up in each `PATH` directory; first regular file wins |
///
/// The result is then canonicalized and must be a regular file.
///
/// # Examples
///
/// ```
/// use mypath::path::PathResolver;
/// use mypath::sys::FakeHost;
/// use mypath::ResolverConfig;
/// use std::ffi::OsStr;
/// use std::path::Path;
///
/// let host = FakeHost::new()
///     .with_file("/usr/bin/tool", 0)
///     .with_env("PATH", "/bin:/usr/bin");
/// let config = ResolverConfig::default();
///
/// let resolver = PathResolver::new(&host, &config);
/// let path = resolver.resolve(OsStr::new("tool")).unwrap();
/// assert_eq!(path, Path::new("/usr/bin/tool"));
/// ```
#[derive(Debug)]
pub struct PathResolver<'a, H: Host + ?Sized> {
    host: &'a H,
    config: &'a ResolverConfig,
}

impl<'a, H: Host + ?Sized> PathResolver<'a, H> {
    /// Create a resolver over `host`.
    #[must_use]
    pub fn new(host: &'a H, config: &'a ResolverConfig) -> Self {
        Self { host, config }
    }

    /// Resolve `candidate` to a canonical absolute path.
    ///
    /// # Errors
    ///
    /// Returns an error if the candidate is empty, cannot be completed to an
    /// absolute path, or does not canonicalize to a regular file.
    pub fn resolve(&self, candidate: &OsStr) -> Result<PathBuf> {
        let absolute = self.absolute_candidate(candidate)?;
        canonical_file(self.host, &absolute)
    }

    /// Complete `candidate` to an absolute (not yet canonical) path.
    ///
    /// # Errors
    ///
    /// See [`resolve`](Self::resolve).
    pub fn absolute_candidate(&self, candidate: &OsStr) -> Result<PathBuf> {
        let bytes = candidate.as_bytes();
        match bytes {
            [] => Err(Error::EmptyCandidate),
            [b'/', ..] => Ok(PathBuf::from(candidate)),
            _ if bytes.contains(&b'/') => self.join_current_dir(bytes),
            _ => self.search(candidate),
        }
    }

    fn join_current_dir(&self, relative: &[u8]) -> Result<PathBuf> {
        let cwd = buffer::current_dir(self.host, self.config.initial_buffer_size())?;
        let relative = relative.strip_prefix(b"./").unwrap_or(relative);
        Ok(Path::new(&cwd).join(OsStr::from_bytes(relative)))
    }

    fn search(&self, name: &OsStr) -> Result<PathBuf> {
        let variable = self.config.path_variable();
        let value = self.host.var_os(variable).ok_or_else(|| Error::Unavailable {
            what: format!("${variable}"),
        })?;

        for dir in SearchPathList::parse(&value).iter() {
            let candidate = dir.join(name);
            match self.host.metadata(&candidate) {
                Ok(stat) if stat.is_file() => return Ok(candidate),
                Ok(_) => log::debug!("skipping non-file {}", candidate.display()),
                Err(_) => {}
            }
        }

        Err(Error::NotFoundInSearchPath {
            name: name.to_os_string(),
            variable: variable.to_string(),
        })
    }
}

impl<H: Host + ?Sized> Strategy for PathResolver<'_, H> {
    fn method(&self) -> Method {
        Method::Argv0
    }

    fn locate(&self, argv0: &OsStr) -> Result<ResolvedPath> {
        ResolvedPath::new(self.resolve(argv0)?, Method::Argv0)
    }
}
