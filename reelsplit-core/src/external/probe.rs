//! FFprobe summary of an acquired video.
//!
//! Used for reporting only: the pipeline never branches on probe results.

use crate::error::{CoreError, CoreResult, command_failed_error, command_start_error};
use ffprobe::{FfProbeError, ffprobe};
use std::path::Path;

/// Basic properties of the first video stream.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct VideoSummary {
    /// Duration of the media in seconds
    pub duration: Option<f64>,
    pub width: Option<i64>,
    pub height: Option<i64>,
    /// Frame count as reported by the container, if any
    pub total_frames: Option<u64>,
    pub has_audio: bool,
}

/// Runs ffprobe on `input_path` and summarizes it.
pub fn probe_video(input_path: &Path) -> CoreResult<VideoSummary> {
    log::debug!("Running ffprobe on: {}", input_path.display());
    let metadata = ffprobe(input_path).map_err(|err| {
        log::warn!("ffprobe failed for {}: {:?}", input_path.display(), err);
        map_ffprobe_error(err)
    })?;

    let mut summary = VideoSummary {
        duration: metadata
            .format
            .duration
            .as_deref()
            .and_then(|d| d.parse::<f64>().ok()),
        has_audio: metadata
            .streams
            .iter()
            .any(|s| s.codec_type.as_deref() == Some("audio")),
        ..Default::default()
    };

    let video_stream = metadata
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| {
            CoreError::Probe(format!("no video stream in {}", input_path.display()))
        })?;

    summary.width = video_stream.width;
    summary.height = video_stream.height;
    summary.total_frames = video_stream
        .nb_frames
        .as_deref()
        .and_then(|f| f.parse::<u64>().ok());

    Ok(summary)
}

fn map_ffprobe_error(err: FfProbeError) -> CoreError {
    match err {
        FfProbeError::Io(io_err) => command_start_error("ffprobe", io_err),
        FfProbeError::Status(output) => {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            command_failed_error("probe", "ffprobe", output.status, stderr)
        }
        FfProbeError::Deserialize(err) => {
            CoreError::Probe(format!("ffprobe output deserialization: {err}"))
        }
        _ => CoreError::Probe(format!("unknown ffprobe error: {err:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_probe_rejects_non_media_file() {
        let tmp = tempdir().unwrap();
        let fake = tmp.path().join("video.mp4");
        std::fs::write(&fake, b"definitely not a video").unwrap();

        // Either ffprobe is missing or it rejects the file; both are errors.
        assert!(probe_video(&fake).is_err());
    }
}
