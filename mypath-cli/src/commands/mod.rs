//! CLI command implementations.
//!
//! - `show`: Print the cached application path
//! - `probe`: Run every detection method on its own
//! - `completions`: Generate shell completion scripts

pub mod completions;
pub mod probe;
pub mod show;

pub use completions::CompletionsCommand;
pub use probe::ProbeCommand;
pub use show::ShowCommand;
