// reelsplit-cli/src/cli.rs
//
// Defines the command-line argument structures using clap.

use clap::{Args, Parser, Subcommand};
use reelsplit_core::config::{
    DEFAULT_AUDIO_FILENAME, DEFAULT_FFMPEG_PATH, DEFAULT_FRAME_FORMAT, DEFAULT_FRAME_PREFIX,
    DEFAULT_OUTPUT_DIR, DEFAULT_SOCKET_TIMEOUT_SECS, DEFAULT_YTDLP_PATH,
};
use std::path::PathBuf;

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "reelsplit: download an online video and split it into audio and frames",
    long_about = "Downloads a video with yt-dlp, then extracts a PCM WAV audio track and every frame as a numbered image using ffmpeg."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug-level logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory for log files (defaults to ./logs)
    #[arg(long, global = true, value_name = "LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// Log to the console only, configured through RUST_LOG
    #[arg(long, global = true)]
    pub no_log_file: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Downloads a video and extracts its audio track and frames
    Run(RunArgs),
    /// Downloads a video without extracting anything
    Fetch(FetchArgs),
}

/// Arguments shared by every command that acquires a video.
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// URL of the video to download
    #[arg(required = true, value_name = "URL")]
    pub url: String,

    /// Base directory for the per-video output trees
    #[arg(
        short = 'o',
        long = "output",
        value_name = "OUTPUT_DIR",
        env = "REELSPLIT_OUTPUT_DIR",
        default_value = DEFAULT_OUTPUT_DIR
    )]
    pub output_dir: PathBuf,

    /// yt-dlp executable to use for resolving and downloading
    #[arg(long = "yt-dlp", value_name = "PATH", env = "REELSPLIT_YTDLP", default_value = DEFAULT_YTDLP_PATH)]
    pub ytdlp_path: PathBuf,

    /// Socket timeout for the download, in seconds
    #[arg(
        long,
        value_name = "SECONDS",
        default_value_t = DEFAULT_SOCKET_TIMEOUT_SECS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub socket_timeout: u64,

    /// Do not write metadata.json beside the video
    #[arg(long, default_value_t = false)]
    pub no_metadata: bool,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Only extract the audio track
    #[arg(long, conflicts_with = "frames_only")]
    pub audio_only: bool,

    /// Only extract frames
    #[arg(long)]
    pub frames_only: bool,

    /// Filename of the extracted audio inside audio/
    #[arg(long, value_name = "NAME", default_value = DEFAULT_AUDIO_FILENAME)]
    pub audio_filename: String,

    /// Prefix of every extracted frame image
    #[arg(long, value_name = "PREFIX", default_value = DEFAULT_FRAME_PREFIX)]
    pub frame_prefix: String,

    /// Image format of extracted frames (jpg, png, ...)
    #[arg(long, value_name = "EXT", default_value = DEFAULT_FRAME_FORMAT)]
    pub frame_format: String,

    /// Extract audio and frames concurrently
    #[arg(long)]
    pub parallel: bool,

    /// ffmpeg executable to use for extraction
    #[arg(long = "ffmpeg", value_name = "PATH", env = "REELSPLIT_FFMPEG", default_value = DEFAULT_FFMPEG_PATH)]
    pub ffmpeg_path: PathBuf,
}

#[derive(Args, Debug)]
pub struct FetchArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_run_defaults() {
        let cli = Cli::try_parse_from(["reelsplit", "run", "https://example.com/v"]).unwrap();
        let Commands::Run(args) = cli.command else {
            panic!("expected run command");
        };
        assert_eq!(args.source.url, "https://example.com/v");
        assert_eq!(args.audio_filename, "audio.wav");
        assert_eq!(args.frame_prefix, "frame_");
        assert_eq!(args.frame_format, "jpg");
        assert_eq!(args.source.socket_timeout, 30);
        assert!(!args.parallel);
        assert!(!cli.no_log_file);
    }

    #[test]
    fn test_audio_only_conflicts_with_frames_only() {
        let result = Cli::try_parse_from([
            "reelsplit",
            "run",
            "https://example.com/v",
            "--audio-only",
            "--frames-only",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_socket_timeout_is_rejected() {
        let result =
            Cli::try_parse_from(["reelsplit", "fetch", "https://example.com/v", "--socket-timeout", "0"]);
        assert!(result.is_err());
    }
}
