//! Command to show the cached application path.

use crate::error::CliError;
use crate::utils::{resolve_argv0, GlobalOptions};
use clap::Args;
use std::ffi::OsString;

/// Print the path `get_application_path` returns for this program.
#[derive(Args)]
pub struct ShowCommand {
    /// Invocation name to fall back on (defaults to this program's argv[0])
    #[arg(long, value_name = "NAME")]
    pub argv0: Option<OsString>,

    /// Also print which method found the path
    #[arg(long)]
    pub method: bool,
}

impl ShowCommand {
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let argv0 = resolve_argv0(self.argv0)?;

        let resolved = mypath::application_path_cache().try_resolve(&argv0, global.flags())?;

        if self.method {
            println!("{}\t{}", resolved.path().display(), resolved.method());
        } else {
            println!("{}", resolved.path().display());
        }
        Ok(())
    }
}
