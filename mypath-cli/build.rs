//! Build script for mypath-cli.
//!
//! This script generates a man page at build time using clap_mangen.
//! The generated man page is placed in OUT_DIR for inclusion in release builds.
//!
//! Note: We build a minimal command structure here rather than importing from
//! the main crate, since build scripts cannot depend on the crate being built.

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::fs;
use std::io;
use std::path::PathBuf;

/// Build the CLI command structure for man page generation.
///
/// IMPORTANT: Keep this structure synchronized with src/cli.rs
fn build_cli() -> Command {
    let argv0 = || {
        Arg::new("argv0")
            .long("argv0")
            .value_name("NAME")
            .help("Invocation name to fall back on (defaults to this program's argv[0])")
    };

    Command::new("mypath")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Locate the running executable")
        .long_about(
            "Diagnostic tool for finding the canonical path of the running executable \
             through procfs, the dynamic loader, or argv[0]",
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .help("Enable verbose output")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .help("Suppress non-essential output")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("allow-root")
                .long("allow-root")
                .help("Resolve even when running with superuser ids")
                .global(true)
                .action(ArgAction::SetTrue)
                .env("MYPATH_ALLOW_ROOT"),
        )
        .subcommands(vec![
            Command::new("show")
                .about("Print the cached application path")
                .arg(argv0())
                .arg(
                    Arg::new("method")
                        .long("method")
                        .help("Also print which method found the path")
                        .action(ArgAction::SetTrue),
                ),
            Command::new("probe")
                .about("Run every detection method on its own and report each result")
                .arg(argv0())
                .arg(
                    Arg::new("format")
                        .long("format")
                        .value_parser(["human", "json"])
                        .default_value("human")
                        .help("Output format"),
                ),
            Command::new("completions")
                .about("Generate shell completion scripts")
                .long_about("Generate shell completion scripts for bash, zsh, fish, or PowerShell"),
        ])
}

fn main() -> io::Result<()> {
    let out_dir = PathBuf::from(std::env::var_os("OUT_DIR").ok_or_else(|| {
        io::Error::new(io::ErrorKind::NotFound, "OUT_DIR not set by cargo")
    })?);
    let man_dir = out_dir.join("man");
    fs::create_dir_all(&man_dir)?;

    let mut buffer = Vec::new();
    Man::new(build_cli()).render(&mut buffer)?;
    fs::write(man_dir.join("mypath.1"), buffer)?;

    println!("cargo:rerun-if-changed=src/cli.rs");
    println!("cargo:rerun-if-changed=src/commands/");
    Ok(())
}
