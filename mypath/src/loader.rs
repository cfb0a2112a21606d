//! Executable discovery through the dynamic loader.
//!
//! `dladdr` reports the file name of the module containing a code address.
//! For the main executable that name is whatever the loader recorded at
//! startup, which on some platforms is the raw `argv[0]` rather than a real
//! path. The name is therefore never trusted as is: it goes through
//! [`PathResolver`] exactly like an invocation name would.

use std::ffi::OsStr;
use std::path::PathBuf;

use crate::config::ResolverConfig;
use crate::error::{Error, Result};
use crate::path::{Method, PathResolver, ResolvedPath};
use crate::strategy::Strategy;
use crate::sys::Host;

/// Finds the executable by asking the dynamic loader which module holds
/// this code.
///
/// Without the `dladdr` feature the host reports no module and this
/// resolver always fails with [`Error::Unavailable`].
///
/// # Examples
///
/// ```
/// use mypath::loader::DynamicLoaderResolver;
/// use mypath::sys::FakeHost;
/// use mypath::ResolverConfig;
/// use std::path::Path;
///
/// let host = FakeHost::new()
///     .with_file("/usr/bin/app", 0)
///     .with_loader_module("/usr/bin/app");
/// let config = ResolverConfig::default();
///
/// let exe = DynamicLoaderResolver::new(&host, &config).resolve().unwrap();
/// assert_eq!(exe, Path::new("/usr/bin/app"));
/// ```
#[derive(Debug)]
pub struct DynamicLoaderResolver<'a, H: Host + ?Sized> {
    host: &'a H,
    config: &'a ResolverConfig,
}

impl<'a, H: Host + ?Sized> DynamicLoaderResolver<'a, H> {
    /// Create a resolver over `host`.
    #[must_use]
    pub fn new(host: &'a H, config: &'a ResolverConfig) -> Self {
        Self { host, config }
    }

    /// Ask the loader for the module name and complete it to a canonical
    /// path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unavailable`] if the loader reports nothing, or any
    /// error [`PathResolver::resolve`] produces for the reported name.
    pub fn resolve(&self) -> Result<PathBuf> {
        let name = self
            .host
            .loader_module_name()
            .filter(|name| !name.is_empty())
            .ok_or_else(|| Error::Unavailable {
                what: "dladdr module name".to_string(),
            })?;

        log::debug!("dladdr reported {}", name.to_string_lossy());
        PathResolver::new(self.host, self.config).resolve(&name)
    }
}

impl<H: Host + ?Sized> Strategy for DynamicLoaderResolver<'_, H> {
    fn method(&self) -> Method {
        Method::DynamicLoader
    }

    fn locate(&self, _argv0: &OsStr) -> Result<ResolvedPath> {
        ResolvedPath::new(self.resolve()?, Method::DynamicLoader)
    }
}
