//! Implementation of the 'run' subcommand.
//!
//! Checks that the decoder is available, downloads the video, then extracts
//! the audio track, the frames, or both.

use super::{acquire_with_progress, print_file_line, print_video_summary};
use crate::cli::RunArgs;
use crate::config::run_config;
use crate::progress::{print_info, print_section, with_spinner};

use anyhow::{Context, Result};
use reelsplit_core::{FrameExtraction, Session, check_dependency, dir_size, format_bytes};

use std::path::PathBuf;
use std::time::Instant;

/// What to extract after the download.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionPlan {
    AudioOnly,
    FramesOnly,
    Both,
}

impl ExtractionPlan {
    pub fn from_args(args: &RunArgs) -> Self {
        match (args.audio_only, args.frames_only) {
            (true, _) => ExtractionPlan::AudioOnly,
            (false, true) => ExtractionPlan::FramesOnly,
            (false, false) => ExtractionPlan::Both,
        }
    }
}

pub fn run(args: RunArgs) -> Result<()> {
    let started = Instant::now();
    let config = run_config(&args);
    let plan = ExtractionPlan::from_args(&args);

    log::info!(
        "Run started at {} for {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        args.source.url
    );

    // Fail before downloading if extraction could never run.
    check_dependency(&config.ffmpeg_path, "-version")
        .with_context(|| format!("{} is required for extraction", config.ffmpeg_path.display()))?;

    let mut session = Session::from_config(args.source.url.clone(), config)?;
    acquire_with_progress(&mut session)?;
    print_video_summary(&session);

    let (audio, frames): (Option<PathBuf>, Option<FrameExtraction>) = match plan {
        ExtractionPlan::AudioOnly => {
            let audio = with_spinner("Extracting audio", || session.extract_audio(), |p| {
                p.display().to_string()
            })?;
            (Some(audio), None)
        }
        ExtractionPlan::FramesOnly => {
            let frames = with_spinner("Extracting frames", || session.extract_frames(), |f| {
                format!("{} frames", f.frame_count)
            })?;
            (None, Some(frames))
        }
        ExtractionPlan::Both => {
            let report = with_spinner("Extracting audio and frames", || session.extract_all(), |r| {
                format!("{} frames", r.frames.frame_count)
            })?;
            (Some(report.audio_path), Some(report.frames))
        }
    };

    print_section("Output");
    if let Some(audio) = &audio {
        print_file_line("Audio", audio);
    }
    if let Some(frames) = &frames {
        let size = dir_size(&frames.frames_dir).map(format_bytes).unwrap_or_default();
        let frame_format = &session.config().frame_format;
        print_info(
            "Frames",
            format!(
                "{} x {} in {} ({})",
                frames.frame_count,
                frame_format,
                frames.frames_dir.display(),
                size
            ),
        );
    }
    print_info("Elapsed", format!("{:.1}s", started.elapsed().as_secs_f64()));

    log::info!("Run finished for {}", args.source.url);
    Ok(())
}
