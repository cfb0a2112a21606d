//! Utility functions for CLI operations.

use crate::error::CliError;
use mypath::Flags;
use std::env;
use std::ffi::OsString;

/// Global CLI options shared across all commands.
#[derive(Debug, Clone)]
#[allow(dead_code)] // not every command reads every field
pub struct GlobalOptions {
    /// Enable verbose output.
    pub verbose: bool,

    /// Suppress non-essential output.
    pub quiet: bool,

    /// Resolve even with superuser ids.
    pub allow_root: bool,
}

impl GlobalOptions {
    /// Library flags matching these options.
    pub fn flags(&self) -> Flags {
        if self.allow_root {
            Flags::ALLOW_ROOT
        } else {
            Flags::empty()
        }
    }
}

/// Pick the invocation name to fall back on.
///
/// An explicit `--argv0` wins; otherwise this program's own `argv[0]` is
/// used, exactly as an application embedding the library would pass it.
pub fn resolve_argv0(explicit: Option<OsString>) -> Result<OsString, CliError> {
    match explicit {
        Some(name) if name.is_empty() => Err(CliError::InvalidArguments(
            "--argv0 must not be empty".to_string(),
        )),
        Some(name) => Ok(name),
        None => Ok(env::args_os().next().unwrap_or_default()),
    }
}
