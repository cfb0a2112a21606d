//! Library exports for mypath-cli.
//!
//! This module exports the CLI structure so tooling can render man pages
//! and completions from the same definitions the binary uses.

pub mod cli;
pub mod commands;
pub mod error;
pub mod utils;

pub use cli::Cli;
