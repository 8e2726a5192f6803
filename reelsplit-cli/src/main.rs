// reelsplit-cli/src/main.rs
//
// Entry point of the `reelsplit` binary: parses arguments, initializes
// logging and dispatches to the selected command. Any error is printed to
// stderr with its full cause chain and turns into a non-zero exit code.

use clap::Parser;
use console::style;
use reelsplit_cli::{Cli, Commands, fetch, logging, run};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match logging::init_logging(&cli) {
        Ok(Some(log_file)) => log::debug!("Logging to {}", log_file.display()),
        Ok(None) => {}
        Err(e) => {
            eprintln!("{} {:#}", style("error:").red().bold(), e);
            return ExitCode::FAILURE;
        }
    }

    let result = match cli.command {
        Commands::Run(args) => run(args),
        Commands::Fetch(args) => fetch(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{:#}", e);
            eprintln!("{} {:#}", style("error:").red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
