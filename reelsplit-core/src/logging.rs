//! log4rs setup shared by the CLI and embedding applications.
//!
//! Console output is always configured; a file appender is added when a log
//! file is requested.

use anyhow::Result;
use log::LevelFilter;
use log4rs::{
    append::{console::ConsoleAppender, file::FileAppender},
    config::{Appender, Config, Root},
    encode::pattern::PatternEncoder,
};
use std::path::{Path, PathBuf};

const CONSOLE_PATTERN: &str = "{h([{l}])} {m}{n}";
const FILE_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S)} [{l}] {m}{n}";

/// Timestamped log file name, e.g. `reelsplit_20240101_120000.log`.
pub fn log_file_name() -> String {
    format!("reelsplit_{}.log", chrono::Local::now().format("%Y%m%d_%H%M%S"))
}

/// Full path of a fresh log file inside `log_dir`.
pub fn log_file_path(log_dir: &Path) -> PathBuf {
    log_dir.join(log_file_name())
}

/// Builds the log4rs configuration without installing it.
pub fn build_config(log_file: Option<&Path>, level: LevelFilter) -> Result<Config> {
    let console = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(CONSOLE_PATTERN)))
        .build();

    let mut config = Config::builder().appender(Appender::builder().build("console", Box::new(console)));
    let mut root = Root::builder().appender("console");

    if let Some(log_file) = log_file {
        // Create log directory if it doesn't exist
        if let Some(parent) = log_file.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file_appender = FileAppender::builder()
            .encoder(Box::new(PatternEncoder::new(FILE_PATTERN)))
            .build(log_file)?;
        config = config.appender(Appender::builder().build("file", Box::new(file_appender)));
        root = root.appender("file");
    }

    Ok(config.build(root.build(level))?)
}

/// Installs the global logger. Fails if one is already installed.
pub fn setup_logging(log_file: Option<&Path>, level: LevelFilter) -> Result<()> {
    let config = build_config(log_file, level)?;
    log4rs::init_config(config)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_file_name_format() {
        let name = log_file_name();
        assert!(name.starts_with("reelsplit_"));
        assert!(name.ends_with(".log"));
        // reelsplit_ + YYYYmmdd_HHMMSS + .log
        assert_eq!(name.len(), "reelsplit_".len() + 15 + ".log".len());
    }

    #[test]
    fn test_build_config_creates_log_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let log_file = tmp.path().join("logs").join(log_file_name());

        build_config(Some(&log_file), LevelFilter::Info).unwrap();

        assert!(tmp.path().join("logs").is_dir());
        assert!(log_file.exists());
    }
}
