// ============================================================================
// reelsplit-core/src/config/builder.rs
// ============================================================================
//
// CONFIGURATION BUILDER: Builder Pattern for PipelineConfig
//
// Provides a fluent API for creating PipelineConfig instances. Every field
// starts from the defaults in config/mod.rs; the CLI only overrides the
// values the user passed explicitly.
//
// AI-ASSISTANT-INFO: Builder pattern implementation for PipelineConfig

// ---- Standard library imports ----
use std::path::PathBuf;
use std::time::Duration;

// ---- Internal crate imports ----
use super::PipelineConfig;

/// Builder for creating PipelineConfig instances.
///
/// # Examples
///
/// ```rust
/// use reelsplit_core::config::PipelineConfigBuilder;
/// use std::time::Duration;
///
/// let config = PipelineConfigBuilder::new()
///     .output_dir("./my_videos")
///     .audio_filename("track.wav")
///     .socket_timeout(Duration::from_secs(10))
///     .save_metadata(false)
///     .build();
/// assert_eq!(config.audio_filename, "track.wav");
/// ```
#[derive(Debug, Clone)]
pub struct PipelineConfigBuilder {
    output_dir: PathBuf,
    ffmpeg_path: PathBuf,
    ytdlp_path: PathBuf,
    socket_timeout: Duration,
    audio_filename: String,
    frame_prefix: String,
    frame_format: String,
    save_metadata: bool,
    parallel_extraction: bool,
}

impl Default for PipelineConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineConfigBuilder {
    /// Creates a new PipelineConfigBuilder with default values.
    pub fn new() -> Self {
        Self {
            output_dir: PathBuf::from(super::DEFAULT_OUTPUT_DIR),
            ffmpeg_path: PathBuf::from(super::DEFAULT_FFMPEG_PATH),
            ytdlp_path: PathBuf::from(super::DEFAULT_YTDLP_PATH),
            socket_timeout: Duration::from_secs(super::DEFAULT_SOCKET_TIMEOUT_SECS),
            audio_filename: super::DEFAULT_AUDIO_FILENAME.to_string(),
            frame_prefix: super::DEFAULT_FRAME_PREFIX.to_string(),
            frame_format: super::DEFAULT_FRAME_FORMAT.to_string(),
            save_metadata: true,
            parallel_extraction: false,
        }
    }

    /// Sets the output base directory.
    pub fn output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    /// Sets the ffmpeg executable.
    pub fn ffmpeg_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.ffmpeg_path = path.into();
        self
    }

    /// Sets the yt-dlp executable.
    pub fn ytdlp_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.ytdlp_path = path.into();
        self
    }

    /// Sets the acquisition socket timeout.
    pub fn socket_timeout(mut self, timeout: Duration) -> Self {
        self.socket_timeout = timeout;
        self
    }

    /// Sets the audio filename.
    pub fn audio_filename(mut self, filename: impl Into<String>) -> Self {
        self.audio_filename = filename.into();
        self
    }

    /// Sets the frame filename prefix.
    pub fn frame_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.frame_prefix = prefix.into();
        self
    }

    /// Sets the frame image format.
    pub fn frame_format(mut self, format: impl Into<String>) -> Self {
        self.frame_format = format.into();
        self
    }

    pub fn save_metadata(mut self, enable: bool) -> Self {
        self.save_metadata = enable;
        self
    }

    pub fn parallel_extraction(mut self, enable: bool) -> Self {
        self.parallel_extraction = enable;
        self
    }

    /// Builds the PipelineConfig. Call `validate()` on the result before use.
    pub fn build(self) -> PipelineConfig {
        PipelineConfig {
            output_dir: self.output_dir,
            ffmpeg_path: self.ffmpeg_path,
            ytdlp_path: self.ytdlp_path,
            socket_timeout: self.socket_timeout,
            audio_filename: self.audio_filename,
            frame_prefix: self.frame_prefix,
            frame_format: self.frame_format,
            save_metadata: self.save_metadata,
            parallel_extraction: self.parallel_extraction,
        }
    }
}
