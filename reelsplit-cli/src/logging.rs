// ============================================================================
// reelsplit-cli/src/logging.rs
// ============================================================================
//
// LOGGING SETUP: Console and file logging for the CLI
//
// By default the core log4rs setup is used: console output plus a timestamped
// file `reelsplit_<YYYYmmdd_HHMMSS>.log` in the log directory. With
// `--no-log-file` logging goes through env_logger instead:
// - RUST_LOG=info (default): Normal operation logs
// - RUST_LOG=debug: Detailed debugging information
//
// AI-ASSISTANT-INFO: CLI logging initialization

use crate::cli::Cli;

use anyhow::{Context, Result};
use log::LevelFilter;
use std::path::PathBuf;

/// Default log directory, relative to the working directory. Kept out of the
/// output root, which only holds per-title trees.
pub const DEFAULT_LOG_DIR: &str = "logs";

/// Log directory for this invocation: `--log-dir`, else `./logs`.
pub fn log_dir(cli: &Cli) -> PathBuf {
    cli.log_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_DIR))
}

/// Initializes the global logger. Returns the log file path, if any.
pub fn init_logging(cli: &Cli) -> Result<Option<PathBuf>> {
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    if cli.no_log_file {
        env_logger::Builder::from_env(
            env_logger::Env::default().default_filter_or(level.as_str().to_lowercase()),
        )
        .format_timestamp(None)
        .try_init()
        .context("Failed to initialize console logging")?;
        return Ok(None);
    }

    let log_file = reelsplit_core::logging::log_file_path(&log_dir(cli));
    reelsplit_core::logging::setup_logging(Some(&log_file), level)
        .with_context(|| format!("Failed to set up logging to {}", log_file.display()))?;
    Ok(Some(log_file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_default_log_dir_is_outside_output_root() {
        let cli = Cli::try_parse_from(["reelsplit", "fetch", "https://example.com/v", "--output", "/tmp/out"])
            .unwrap();
        let dir = log_dir(&cli);
        assert_eq!(dir, PathBuf::from("logs"));
        assert!(!dir.starts_with("/tmp/out"));
    }

    #[test]
    fn test_log_dir_flag_wins() {
        let cli = Cli::try_parse_from(["reelsplit", "--log-dir", "/var/log/rs", "fetch", "https://example.com/v"])
            .unwrap();
        assert_eq!(log_dir(&cli), PathBuf::from("/var/log/rs"));
    }
}
