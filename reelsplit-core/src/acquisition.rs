//! Acquisition: resolve a URL and persist its stream locally.
//!
//! A single attempt is made. Every failure, whatever its cause, is reported
//! as [`CoreError::Acquisition`] carrying the URL and the underlying
//! [`AcquisitionFailure`].

use crate::config::VIDEO_FILENAME;
use crate::error::{AcquisitionFailure, CoreError, CoreResult};
use crate::external::MediaSourceResolver;

use serde_json::Value;
use std::path::{Path, PathBuf};

/// A video persisted to local disk, before layout placement.
#[derive(Debug, Clone)]
pub struct AcquiredSource {
    /// Title as reported by the provider (unsanitized)
    pub title: String,
    pub video_path: PathBuf,
    pub metadata: Value,
}

/// Resolves `url` and saves its selected stream as `destination_dir/video.mp4`.
pub fn acquire<R: MediaSourceResolver + ?Sized>(
    resolver: &R,
    url: &str,
    destination_dir: &Path,
) -> CoreResult<AcquiredSource> {
    let wrap = |cause: AcquisitionFailure| {
        log::error!("Acquisition of {} failed: {}", url, cause);
        CoreError::Acquisition {
            url: url.to_string(),
            cause,
        }
    };

    log::info!("Starting download for video: {}", url);
    let resolved = resolver.resolve(url).map_err(wrap)?;

    if !destination_dir.is_dir() {
        std::fs::create_dir_all(destination_dir).map_err(|source| {
            wrap(AcquisitionFailure::LocalWrite {
                path: destination_dir.to_path_buf(),
                source,
            })
        })?;
    }

    let video_path = destination_dir.join(VIDEO_FILENAME);
    resolver
        .save(url, &resolved.stream, &video_path)
        .map_err(wrap)?;
    log::info!("Video downloaded successfully to {}", video_path.display());

    Ok(AcquiredSource {
        title: resolved.title,
        video_path,
        metadata: resolved.metadata,
    })
}
