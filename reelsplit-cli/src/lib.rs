// reelsplit-cli/src/lib.rs
//
// Library portion of the reelsplit CLI application.
// Contains argument definitions and command logic.

pub mod cli;
pub mod commands;
pub mod config;
pub mod logging;
pub mod progress;

// Re-export items needed by the binary or integration tests
pub use cli::{Cli, Commands, FetchArgs, RunArgs};
pub use commands::fetch::fetch;
pub use commands::run::run;
