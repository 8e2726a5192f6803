// ============================================================================
// reelsplit-core/src/session.rs
// ============================================================================
//
// SESSION: Pipeline orchestration for one URL
//
// A Session owns the mutable path state of one acquire -> extract run. Its
// state is an explicit enum: extraction methods match on it and refuse to
// run (without touching the filesystem) until acquisition has succeeded.
//
// LIFECYCLE:
//   Created --acquire()--> Acquired --extract_*()--> Acquired (unchanged)
//
// Extraction may be repeated any number of times; each run overwrites its
// previous output. Nothing is retried and nothing is rolled back.
//
// AI-ASSISTANT-INFO: Orchestrator tying resolver, layout and extractors together

use crate::acquisition::acquire;
use crate::config::{METADATA_FILENAME, PipelineConfig, VIDEO_FILENAME};
use crate::error::{AcquisitionFailure, CoreError, CoreResult, filesystem_error};
use crate::external::{MediaDecoder, MediaSourceResolver, SidecarDecoder, YtDlpResolver};
use crate::extraction::{self, FrameExtraction, FrameOptions};
use crate::layout::{MediaLayout, OutputLayout, video_dir_name};

use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Prefix of the staging directory used while a download is in flight.
const STAGING_PREFIX: &str = ".reelsplit-staging-";

/// Everything known about a successfully acquired video.
#[derive(Debug, Clone)]
pub struct AcquiredMedia {
    /// Provider title (unsanitized)
    pub title: String,
    pub video_path: PathBuf,
    pub layout: MediaLayout,
    pub metadata: Value,
}

/// Session state. Paths only exist once a video has been acquired.
#[derive(Debug, Clone, Default)]
pub enum SessionState {
    #[default]
    Created,
    Acquired(AcquiredMedia),
}

/// Artifacts produced by [`Session::extract_all`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionReport {
    pub audio_path: PathBuf,
    pub frames: FrameExtraction,
}

/// One acquisition/extraction run for a single source URL.
pub struct Session<R, D> {
    source_url: String,
    root: OutputLayout,
    config: PipelineConfig,
    resolver: R,
    decoder: D,
    state: SessionState,
}

impl Session<YtDlpResolver, SidecarDecoder> {
    /// Creates a session using yt-dlp and ffmpeg as configured.
    pub fn from_config(source_url: impl Into<String>, config: PipelineConfig) -> CoreResult<Self> {
        let resolver = YtDlpResolver::new(&config.ytdlp_path, config.socket_timeout);
        let decoder = SidecarDecoder::new(&config.ffmpeg_path);
        Self::new(source_url, config, resolver, decoder)
    }
}

impl<R: MediaSourceResolver, D: MediaDecoder> Session<R, D> {
    /// Creates a session and eagerly creates the output root.
    pub fn new(
        source_url: impl Into<String>,
        config: PipelineConfig,
        resolver: R,
        decoder: D,
    ) -> CoreResult<Self> {
        config.validate()?;
        let root = std::path::absolute(&config.output_dir)
            .map_err(|e| filesystem_error(&config.output_dir, e))?;
        let root = OutputLayout::new(root);
        root.ensure_root()?;

        let source_url = source_url.into();
        log::info!(
            "Initialized session for {} with output directory: {}",
            source_url,
            root.root().display()
        );

        Ok(Self {
            source_url,
            root,
            config,
            resolver,
            decoder,
            state: SessionState::Created,
        })
    }

    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    /// Absolute output root.
    pub fn root_dir(&self) -> &Path {
        self.root.root()
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_acquired(&self) -> bool {
        matches!(self.state, SessionState::Acquired(_))
    }

    pub fn acquired(&self) -> Option<&AcquiredMedia> {
        match &self.state {
            SessionState::Acquired(media) => Some(media),
            SessionState::Created => None,
        }
    }

    pub fn video_path(&self) -> Option<&Path> {
        self.acquired().map(|m| m.video_path.as_path())
    }

    pub fn layout(&self) -> Option<&MediaLayout> {
        self.acquired().map(|m| &m.layout)
    }

    /// Downloads the source and materializes the per-video tree.
    ///
    /// The stream is first saved to a staging directory under the root; the
    /// video directory and its `audio/` and `frames/` children are created
    /// only once the download succeeded, then the video is moved into place.
    /// On failure the state is left untouched. Returns the local video path.
    pub fn acquire(&mut self) -> CoreResult<PathBuf> {
        let staging = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .tempdir_in(self.root.root())
            .map_err(|source| CoreError::Acquisition {
                url: self.source_url.clone(),
                cause: AcquisitionFailure::LocalWrite {
                    path: self.root.root().to_path_buf(),
                    source,
                },
            })?;

        let source = acquire(&self.resolver, &self.source_url, staging.path())?;

        let dir_name = video_dir_name(&source.title);
        log::info!("Sanitized video title: {}", dir_name);
        let layout = self.root.create(&dir_name)?;

        let video_path = layout.video_file(VIDEO_FILENAME);
        move_file(&source.video_path, &video_path)?;

        if self.config.save_metadata {
            write_metadata(&layout.video_file(METADATA_FILENAME), &source.metadata)?;
        }

        self.state = SessionState::Acquired(AcquiredMedia {
            title: source.title,
            video_path: video_path.clone(),
            layout,
            metadata: source.metadata,
        });
        Ok(video_path)
    }

    /// Extracts audio using the configured filename.
    pub fn extract_audio(&self) -> CoreResult<PathBuf> {
        self.extract_audio_as(&self.config.audio_filename)
    }

    /// Extracts audio into `audio/{filename}`.
    pub fn extract_audio_as(&self, filename: &str) -> CoreResult<PathBuf> {
        let media = self.require_acquired("audio extraction")?;
        extraction::extract_audio(&self.decoder, &media.video_path, &media.layout.audio_dir, filename)
    }

    /// Extracts frames using the configured prefix and format.
    pub fn extract_frames(&self) -> CoreResult<FrameExtraction> {
        self.extract_frames_with(&self.config.frame_options())
    }

    pub fn extract_frames_with(&self, options: &FrameOptions) -> CoreResult<FrameExtraction> {
        let media = self.require_acquired("frame extraction")?;
        extraction::extract_frames(&self.decoder, &media.video_path, &media.layout.frames_dir, options)
    }

    /// Runs both extractions, concurrently when `parallel_extraction` is set.
    ///
    /// They read the same finished video and write to disjoint directories.
    /// The audio error wins when both fail.
    pub fn extract_all(&self) -> CoreResult<ExtractionReport> {
        let media = self.require_acquired("extraction")?;
        let decoder = &self.decoder;
        let audio_filename = self.config.audio_filename.as_str();
        let frame_options = self.config.frame_options();

        let audio = || {
            extraction::extract_audio(decoder, &media.video_path, &media.layout.audio_dir, audio_filename)
        };
        let frames = || {
            extraction::extract_frames(decoder, &media.video_path, &media.layout.frames_dir, &frame_options)
        };

        let (audio_path, frames) = if self.config.parallel_extraction {
            log::debug!("Running audio and frame extraction concurrently");
            rayon::join(audio, frames)
        } else {
            let audio_path = audio()?;
            (Ok(audio_path), frames())
        };

        Ok(ExtractionReport {
            audio_path: audio_path?,
            frames: frames?,
        })
    }

    fn require_acquired(&self, operation: &'static str) -> CoreResult<&AcquiredMedia> {
        match &self.state {
            SessionState::Acquired(media) => Ok(media),
            SessionState::Created => {
                log::error!("{} requested before a video was acquired", operation);
                Err(CoreError::NoVideoAcquired { operation })
            }
        }
    }
}

fn move_file(from: &Path, to: &Path) -> CoreResult<()> {
    if fs::rename(from, to).is_ok() {
        return Ok(());
    }
    // Different filesystem (e.g. a mounted output root): copy instead.
    fs::copy(from, to).map_err(|e| filesystem_error(to, e))?;
    fs::remove_file(from).map_err(|e| filesystem_error(from, e))
}

fn write_metadata(path: &Path, metadata: &Value) -> CoreResult<()> {
    let json = serde_json::to_string_pretty(metadata)
        .map_err(|e| filesystem_error(path, std::io::Error::other(e)))?;
    fs::write(path, json).map_err(|e| filesystem_error(path, e))?;
    log::info!("Metadata saved: {}", path.display());
    Ok(())
}
