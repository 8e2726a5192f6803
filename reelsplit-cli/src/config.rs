// reelsplit-cli/src/config.rs
//
// Translates parsed arguments into a reelsplit-core pipeline configuration.

use crate::cli::{FetchArgs, RunArgs, SourceArgs};
use reelsplit_core::{PipelineConfig, PipelineConfigBuilder};
use std::time::Duration;

fn source_builder(source: &SourceArgs) -> PipelineConfigBuilder {
    PipelineConfigBuilder::new()
        .output_dir(&source.output_dir)
        .ytdlp_path(&source.ytdlp_path)
        .socket_timeout(Duration::from_secs(source.socket_timeout))
        .save_metadata(!source.no_metadata)
}

pub fn run_config(args: &RunArgs) -> PipelineConfig {
    source_builder(&args.source)
        .ffmpeg_path(&args.ffmpeg_path)
        .audio_filename(&args.audio_filename)
        .frame_prefix(&args.frame_prefix)
        .frame_format(&args.frame_format)
        .parallel_extraction(args.parallel)
        .build()
}

pub fn fetch_config(args: &FetchArgs) -> PipelineConfig {
    source_builder(&args.source).build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use std::path::PathBuf;

    #[test]
    fn test_run_config_maps_every_flag() {
        let cli = Cli::try_parse_from([
            "reelsplit",
            "run",
            "https://example.com/v",
            "--output",
            "/tmp/out",
            "--audio-filename",
            "track.wav",
            "--frame-prefix",
            "img_",
            "--frame-format",
            "png",
            "--parallel",
            "--no-metadata",
            "--socket-timeout",
            "5",
            "--ffmpeg",
            "/opt/ffmpeg",
            "--yt-dlp",
            "/opt/yt-dlp",
        ])
        .unwrap();
        let Commands::Run(args) = cli.command else {
            panic!("expected run command");
        };

        let config = run_config(&args);
        assert_eq!(config.output_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.audio_filename, "track.wav");
        assert_eq!(config.frame_prefix, "img_");
        assert_eq!(config.frame_format, "png");
        assert!(config.parallel_extraction);
        assert!(!config.save_metadata);
        assert_eq!(config.socket_timeout, Duration::from_secs(5));
        assert_eq!(config.ffmpeg_path, PathBuf::from("/opt/ffmpeg"));
        assert_eq!(config.ytdlp_path, PathBuf::from("/opt/yt-dlp"));
        assert!(config.validate().is_ok());
    }
}
