//! The common shape of the three detection methods, and the fixed order in
//! which they are chained.

use std::ffi::OsStr;

use crate::config::ResolverConfig;
use crate::error::Result;
use crate::loader::DynamicLoaderResolver;
use crate::path::{Method, PathResolver, ResolvedPath};
use crate::procfs::ProcfsResolver;
use crate::sys::Host;

/// One way of finding the running executable.
///
/// Implementations never panic and never return a partial answer: either a
/// complete [`ResolvedPath`] or an error describing the step that failed.
pub trait Strategy {
    /// Which method this is.
    fn method(&self) -> Method;

    /// Try to locate the executable. `argv0` is only consulted by
    /// strategies that reconstruct the path from the invocation name.
    ///
    /// # Errors
    ///
    /// Returns the first error that stopped the attempt.
    fn locate(&self, argv0: &OsStr) -> Result<ResolvedPath>;
}

fn with_chain<H, R>(
    host: &H,
    config: &ResolverConfig,
    f: impl FnOnce(&[&dyn Strategy]) -> R,
) -> R
where
    H: Host + ?Sized,
{
    let procfs = ProcfsResolver::new(host, config);
    let loader = DynamicLoaderResolver::new(host, config);
    let argv0 = PathResolver::new(host, config);
    let chain: [&dyn Strategy; 3] = [&procfs, &loader, &argv0];
    f(&chain)
}

/// Run the strategies in priority order and return the first success.
///
/// Each failure is logged at debug level and the next strategy is tried.
///
/// # Examples
///
/// ```
/// use mypath::strategy::locate_first;
/// use mypath::sys::FakeHost;
/// use mypath::{Method, ResolverConfig};
/// use std::ffi::OsStr;
///
/// let host = FakeHost::new().with_file("/usr/bin/app", 0);
/// let config = ResolverConfig::default();
///
/// let found = locate_first(&host, &config, OsStr::new("/usr/bin/app")).unwrap();
/// assert_eq!(found.method(), Method::Argv0);
/// ```
pub fn locate_first<H: Host + ?Sized>(
    host: &H,
    config: &ResolverConfig,
    argv0: &OsStr,
) -> Option<ResolvedPath> {
    with_chain(host, config, |chain| {
        chain.iter().find_map(|strategy| match strategy.locate(argv0) {
            Ok(found) => Some(found),
            Err(e) => {
                log::debug!("{} failed: {e}", strategy.method());
                None
            }
        })
    })
}

/// Run every strategy independently, in priority order, keeping each
/// outcome.
pub fn locate_each<H: Host + ?Sized>(
    host: &H,
    config: &ResolverConfig,
    argv0: &OsStr,
) -> Vec<(Method, Result<ResolvedPath>)> {
    with_chain(host, config, |chain| {
        chain
            .iter()
            .map(|strategy| (strategy.method(), strategy.locate(argv0)))
            .collect()
    })
}
