//! Reconstructing the executable path from an invocation name.
//!
//! When the kernel will not say where the executable lives, the name it was
//! started under is the next best source. This module turns such a name into
//! a trustworthy absolute path:
//!
//! - [`PathResolver`] decides how to complete the name (as is, against the
//!   working directory, or via the search path) and canonicalizes the result.
//! - [`SearchPathList`] parses `PATH`, skipping empty segments.
//! - [`canonicalize`] wraps `realpath` so any failure invalidates the whole
//!   attempt.
//!
//! [`ResolvedPath`] and [`Method`] describe the final answer of every
//! strategy, not just this one.
//!
//! # Examples
//!
//! ```
//! use mypath::path::{PathResolver, SearchPathList};
//! use mypath::sys::FakeHost;
//! use mypath::ResolverConfig;
//! use std::ffi::OsStr;
//! use std::path::Path;
//!
//! let host = FakeHost::new()
//!     .with_file("/b/foo", 0)
//!     .with_env("PATH", "::/a:/b");
//! let config = ResolverConfig::default();
//!
//! let found = PathResolver::new(&host, &config).resolve(OsStr::new("foo")).unwrap();
//! assert_eq!(found, Path::new("/b/foo"));
//! ```

pub mod canonicalize;
pub mod resolver;
pub mod search;
mod types;

#[cfg(all(test, feature = "property-tests"))]
mod proptests;

pub use resolver::PathResolver;
pub use search::SearchPathList;
pub use types::{Method, ResolvedPath};
