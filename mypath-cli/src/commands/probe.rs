//! Command to run every detection method independently.
//!
//! Unlike `show`, nothing is cached and a failing method does not stop the
//! others, so the output tells which methods work on this system.

use crate::error::CliError;
use crate::utils::{resolve_argv0, GlobalOptions};
use clap::{Args, ValueEnum};
use mypath::strategy::locate_each;
use mypath::sys::{Host, OsHost};
use mypath::{Error as LibError, Method, ResolverConfig};
use serde::Serialize;
use std::ffi::OsString;
use std::path::PathBuf;

/// Output format for probe results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ProbeFormat {
    /// One aligned line per method
    #[default]
    Human,
    /// A JSON array
    Json,
}

/// Outcome of a single method.
#[derive(Debug, Serialize)]
pub struct ProbeEntry {
    /// The method tried.
    pub method: Method,
    /// The path it found, if any.
    pub path: Option<PathBuf>,
    /// Why it found nothing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Run each detection method on its own and report every result.
#[derive(Args)]
pub struct ProbeCommand {
    /// Invocation name for the argv[0] method (defaults to this program's argv[0])
    #[arg(long, value_name = "NAME")]
    pub argv0: Option<OsString>,

    /// Output format
    #[arg(long, value_enum, default_value_t = ProbeFormat::Human)]
    pub format: ProbeFormat,
}

impl ProbeCommand {
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let argv0 = resolve_argv0(self.argv0)?;

        if !global.allow_root && OsHost.credentials().is_superuser() {
            return Err(LibError::PrivilegedProcess.into());
        }

        let entries: Vec<ProbeEntry> = locate_each(&OsHost, &ResolverConfig::default(), &argv0)
            .into_iter()
            .map(|(method, outcome)| match outcome {
                Ok(resolved) => ProbeEntry {
                    method,
                    path: Some(resolved.into_path_buf()),
                    error: None,
                },
                Err(e) => ProbeEntry {
                    method,
                    path: None,
                    error: Some(e.to_string()),
                },
            })
            .collect();

        match self.format {
            ProbeFormat::Human => print!("{}", format_human(&entries, global.verbose)),
            ProbeFormat::Json => println!("{}", serde_json::to_string_pretty(&entries)?),
        }
        Ok(())
    }
}

/// Render entries as `method: path` lines, `(none)` for failures.
///
/// With `verbose`, failures also carry their reason.
pub fn format_human(entries: &[ProbeEntry], verbose: bool) -> String {
    let width = entries
        .iter()
        .map(|entry| entry.method.name().len())
        .max()
        .unwrap_or(0)
        + 1;

    let mut out = String::new();
    for entry in entries {
        let label = format!("{}:", entry.method);
        let value = match (&entry.path, &entry.error) {
            (Some(path), _) => path.display().to_string(),
            (None, Some(error)) if verbose => format!("(none) {error}"),
            (None, _) => "(none)".to_string(),
        };
        out.push_str(&format!("{label:<width$} {value}\n"));
    }
    out
}
