//! Core library for turning an online video into local audio and frame assets
//! using yt-dlp and ffmpeg.
//!
//! A [`Session`] downloads one video by URL into a per-title directory under
//! an output root, then extracts its audio track as PCM WAV and every frame as
//! a numbered image.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use reelsplit_core::{PipelineConfigBuilder, Session};
//! use std::path::PathBuf;
//!
//! let config = PipelineConfigBuilder::new()
//!     .output_dir(PathBuf::from("/path/to/output"))
//!     .frame_format("png")
//!     .build();
//!
//! let mut session = Session::from_config("https://example.com/watch?v=abc", config).unwrap();
//! let video_path = session.acquire().unwrap();
//! let audio_path = session.extract_audio().unwrap();
//! let frames = session.extract_frames().unwrap();
//! println!("{} -> {} + {} frames", video_path.display(), audio_path.display(), frames.frame_count);
//! ```

pub mod acquisition;
pub mod config;
pub mod error;
pub mod external;
pub mod extraction;
pub mod layout;
pub mod logging;
pub mod session;
pub mod utils;

// Re-exports for public API
pub use config::{PipelineConfig, PipelineConfigBuilder};
pub use error::{AcquisitionFailure, CoreError, CoreResult};
pub use external::{VideoSummary, check_dependency, probe_video};
pub use extraction::{FrameExtraction, FrameOptions};
pub use layout::{MediaLayout, OutputLayout, sanitize_filename};
pub use session::{AcquiredMedia, ExtractionReport, Session, SessionState};
pub use utils::{dir_size, file_size, format_bytes, format_duration};
