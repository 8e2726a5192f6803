//! Command implementations for the CLI.
//!
//! Each submodule contains the implementation of a specific command.

/// Module containing the implementation of the `run` command.
/// Downloads a video and extracts its audio track and frames.
pub mod run;

/// Module containing the implementation of the `fetch` command.
pub mod fetch;

use crate::progress::{print_info, print_section, with_spinner};

use reelsplit_core::external::{MediaDecoder, MediaSourceResolver};
use reelsplit_core::{CoreResult, Session, file_size, format_bytes, format_duration, probe_video};

use std::path::{Path, PathBuf};

/// Acquires the session's video behind a spinner.
pub(crate) fn acquire_with_progress<R, D>(session: &mut Session<R, D>) -> CoreResult<PathBuf>
where
    R: MediaSourceResolver,
    D: MediaDecoder,
{
    with_spinner("Downloading", || session.acquire(), |path| path.display().to_string())
}

/// Prints the title, location and probed properties of the acquired video.
pub(crate) fn print_video_summary<R, D>(session: &Session<R, D>)
where
    R: MediaSourceResolver,
    D: MediaDecoder,
{
    let Some(media) = session.acquired() else {
        return;
    };

    print_section("Video");
    print_info("Title", &media.title);
    print_info("Directory", media.layout.video_dir.display());
    print_file_line("File", &media.video_path);

    // ffprobe is optional here; the video is already on disk.
    match probe_video(&media.video_path) {
        Ok(summary) => {
            if let Some(duration) = summary.duration {
                print_info("Duration", format_duration(duration));
            }
            if let (Some(width), Some(height)) = (summary.width, summary.height) {
                print_info("Resolution", format!("{width}x{height}"));
            }
            if let Some(frames) = summary.total_frames {
                print_info("Frames", frames);
            }
        }
        Err(e) => log::warn!("Could not probe {}: {}", media.video_path.display(), e),
    }
}

pub(crate) fn print_file_line(label: &str, path: &Path) {
    match file_size(path) {
        Ok(size) => print_info(label, format!("{} ({})", path.display(), format_bytes(size))),
        Err(_) => print_info(label, path.display()),
    }
}
