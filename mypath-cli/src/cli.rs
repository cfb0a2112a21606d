//! CLI structure and command definitions.
//!
//! This module defines the main CLI structure using clap's derive macros,
//! including global options and subcommands.

use crate::commands::{CompletionsCommand, ProbeCommand, ShowCommand};
use clap::{Parser, Subcommand};

/// Command-line tool for locating the running executable.
#[derive(Parser)]
#[command(name = "mypath")]
#[command(version, about = "Locate the running executable", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Resolve even when running with superuser ids
    #[arg(long, global = true, env = "MYPATH_ALLOW_ROOT")]
    pub allow_root: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Command {
    /// Print the cached application path
    Show(ShowCommand),

    /// Run every detection method on its own and report each result
    Probe(ProbeCommand),

    /// Generate shell completion scripts
    Completions(CompletionsCommand),
}
