#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # mypath
//!
//! Find the canonical absolute path of the running executable on POSIX
//! systems, so an application can locate plugins and data files installed
//! next to it.
//!
//! Three strategies are tried in order, and the first success is cached for
//! the rest of the process:
//!
//! 1. [`ProcfsResolver`]: a verified procfs self-link (Linux, FreeBSD,
//!    NetBSD layouts).
//! 2. [`DynamicLoaderResolver`]: the module name `dladdr` reports for our
//!    own code.
//! 3. [`PathResolver`]: `argv[0]`, completed against the working directory
//!    or `PATH` and canonicalized.
//!
//! Processes running with any superuser id get no answer unless they pass
//! [`Flags::ALLOW_ROOT`].
//!
//! ## Core Types
//!
//! - [`get_application_path`]: the process-wide cached lookup
//! - [`ApplicationPathCache`]: the same over any [`sys::Host`]
//! - [`ResolvedPath`] and [`Method`]: the answer and who produced it
//! - [`Error`] and [`Result`]: why a single strategy failed
//! - [`Logger`] and [`LogLevel`]: a stderr `log` backend
//!
//! ## Examples
//!
//! ```
//! use mypath::sys::FakeHost;
//! use mypath::{ApplicationPathCache, Flags, Method, ResolverConfig};
//! use std::ffi::OsStr;
//! use std::path::Path;
//!
//! let host = FakeHost::new()
//!     .with_dir("/proc", 0)
//!     .with_symlink("/proc/self", "4242")
//!     .with_symlink("/proc/4242/exe", "/opt/app/bin/app")
//!     .with_file("/opt/app/bin/app", 0);
//! let cache = ApplicationPathCache::new(host, ResolverConfig::default());
//!
//! let exe = cache.resolve(OsStr::new("app"), Flags::empty()).unwrap();
//! assert_eq!(exe.path(), Path::new("/opt/app/bin/app"));
//! assert_eq!(exe.method(), Method::Procfs);
//! ```

pub mod buffer;
pub mod cache;
pub mod config;
pub mod error;
pub mod loader;
pub mod logging;
pub mod path;
pub mod procfs;
pub mod strategy;
pub mod sys;

pub use cache::{application_path_cache, get_application_path, ApplicationPathCache};
pub use config::{Flags, ResolverConfig};
pub use error::{Error, Result};
pub use loader::DynamicLoaderResolver;
pub use logging::{init_logger, LogLevel, Logger};
pub use path::{Method, PathResolver, ResolvedPath};
pub use procfs::ProcfsResolver;
pub use strategy::Strategy;
