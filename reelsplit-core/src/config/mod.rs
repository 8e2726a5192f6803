//! Configuration structures and constants for the reelsplit-core library.
//!
//! This module provides the configuration for one pipeline session: where the
//! output tree lives, which executables to invoke, and how the audio and frame
//! artifacts are named.

mod builder;

use std::path::{Path, PathBuf};
use std::time::Duration;

pub use builder::PipelineConfigBuilder;

use crate::error::{CoreError, CoreResult};
use crate::extraction::FrameOptions;

// Default constants

/// Default output base directory, relative to the working directory.
pub const DEFAULT_OUTPUT_DIR: &str = "output_videos";

/// Fixed filename of the persisted source video inside the video directory.
pub const VIDEO_FILENAME: &str = "video.mp4";

/// Filename of the provider metadata written beside the video.
pub const METADATA_FILENAME: &str = "metadata.json";

/// Default filename of the extracted audio track.
pub const DEFAULT_AUDIO_FILENAME: &str = "audio.wav";

/// Default prefix for extracted frame images.
pub const DEFAULT_FRAME_PREFIX: &str = "frame_";

/// Default image format (file extension) for extracted frames.
pub const DEFAULT_FRAME_FORMAT: &str = "jpg";

/// Default socket timeout for the acquisition network calls, in seconds.
pub const DEFAULT_SOCKET_TIMEOUT_SECS: u64 = 30;

/// Default decoder executable.
pub const DEFAULT_FFMPEG_PATH: &str = "ffmpeg";

/// Default resolver executable.
pub const DEFAULT_YTDLP_PATH: &str = "yt-dlp";

/// Main configuration structure for a reelsplit session.
///
/// All fields have sensible defaults; use [`PipelineConfigBuilder`] to
/// override the ones you need.
///
/// # Examples
///
/// ```rust
/// use reelsplit_core::config::PipelineConfigBuilder;
/// use std::path::PathBuf;
///
/// let config = PipelineConfigBuilder::new()
///     .output_dir(PathBuf::from("/tmp/videos"))
///     .frame_format("png")
///     .parallel_extraction(true)
///     .build();
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Base directory under which every per-video tree is created
    pub output_dir: PathBuf,

    /// Decoder executable (ffmpeg) path or name resolved through PATH
    pub ffmpeg_path: PathBuf,

    /// Resolver executable (yt-dlp) path or name resolved through PATH
    pub ytdlp_path: PathBuf,

    /// Timeout applied to the acquisition network calls only
    pub socket_timeout: Duration,

    /// Filename of the extracted audio inside `audio/`
    pub audio_filename: String,

    /// Prefix of every extracted frame image
    pub frame_prefix: String,

    /// Image format of extracted frames (jpg, png, ...)
    pub frame_format: String,

    /// Whether to write the provider metadata as `metadata.json`
    pub save_metadata: bool,

    /// Whether `extract_all` runs audio and frame extraction concurrently
    pub parallel_extraction: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfigBuilder::new().build()
    }
}

impl PipelineConfig {
    /// Creates a configuration rooted at `output_dir` with default settings.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        PipelineConfigBuilder::new().output_dir(output_dir.into()).build()
    }

    /// Frame naming options derived from this configuration.
    pub fn frame_options(&self) -> FrameOptions {
        FrameOptions::new(&self.frame_prefix, &self.frame_format)
    }

    /// Validates the configuration.
    ///
    /// Filenames must be non-empty single path components, the frame format
    /// must be a bare extension and the socket timeout must be non-zero.
    pub fn validate(&self) -> CoreResult<()> {
        if self.output_dir.as_os_str().is_empty() {
            return Err(CoreError::Config("output directory must not be empty".to_string()));
        }
        validate_file_component("audio filename", &self.audio_filename)?;
        self.frame_options().validate()?;
        if self.socket_timeout.is_zero() {
            return Err(CoreError::Config("socket timeout must be greater than zero".to_string()));
        }
        Ok(())
    }
}

/// Checks that `value` names a single file inside a directory.
pub(crate) fn validate_file_component(what: &str, value: &str) -> CoreResult<()> {
    if value.trim().is_empty() {
        return Err(CoreError::Config(format!("{what} must not be empty")));
    }
    let path = Path::new(value);
    if path.components().count() != 1
        || value.contains(['/', '\\'])
        || matches!(value, "." | "..")
    {
        return Err(CoreError::Config(format!(
            "{what} '{value}' must be a plain file name"
        )));
    }
    Ok(())
}
