//! Frame extraction.
//!
//! Every decoded frame is written as `{prefix}{NNNNN}.{format}` (1-based,
//! five-digit zero padding). The decoder overwrites files it writes but never
//! removes extra ones, so frames left by a longer previous run are purged
//! before extraction starts.

use super::{path_arg, run_decoder};
use crate::config::{DEFAULT_FRAME_FORMAT, DEFAULT_FRAME_PREFIX};
use crate::error::{CoreError, CoreResult, filesystem_error};
use crate::external::MediaDecoder;

use std::fs;
use std::path::{Path, PathBuf};

/// Minimum width of the numeric frame index.
const INDEX_DIGITS: usize = 5;

/// Naming options for extracted frames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameOptions {
    pub prefix: String,
    pub format: String,
}

impl Default for FrameOptions {
    fn default() -> Self {
        Self::new(DEFAULT_FRAME_PREFIX, DEFAULT_FRAME_FORMAT)
    }
}

impl FrameOptions {
    pub fn new(prefix: impl Into<String>, format: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            format: format.into(),
        }
    }

    /// The prefix may be empty but must not escape the frames directory; the
    /// format must be a bare alphanumeric extension.
    pub fn validate(&self) -> CoreResult<()> {
        if self.prefix.contains(['/', '\\']) || self.prefix.starts_with("..") {
            return Err(CoreError::Config(format!(
                "frame prefix '{}' must not contain path separators",
                self.prefix
            )));
        }
        if self.format.is_empty() || !self.format.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(CoreError::Config(format!(
                "frame format '{}' must be a plain extension such as jpg or png",
                self.format
            )));
        }
        Ok(())
    }

    /// Filename of the frame with the given 1-based index.
    pub fn file_name(&self, index: u64) -> String {
        format!("{}{:0width$}.{}", self.prefix, index, self.format, width = INDEX_DIGITS)
    }

    /// Decoder output pattern inside `frames_dir`.
    pub fn pattern(&self, frames_dir: &Path) -> String {
        let escaped_dir = path_arg(frames_dir).replace('%', "%%");
        let escaped_prefix = self.prefix.replace('%', "%%");
        let separator = if escaped_dir.ends_with(std::path::MAIN_SEPARATOR) {
            ""
        } else {
            std::path::MAIN_SEPARATOR_STR
        };
        format!(
            "{escaped_dir}{separator}{escaped_prefix}%0{INDEX_DIGITS}d.{}",
            self.format
        )
    }

    /// True when `name` is a frame written with these options.
    pub fn matches(&self, name: &str) -> bool {
        let Some(rest) = name.strip_prefix(self.prefix.as_str()) else {
            return false;
        };
        let Some(index) = rest
            .strip_suffix(self.format.as_str())
            .and_then(|r| r.strip_suffix('.'))
        else {
            return false;
        };
        index.len() >= INDEX_DIGITS && index.chars().all(|c| c.is_ascii_digit())
    }
}

/// Result of a frame extraction run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameExtraction {
    pub frames_dir: PathBuf,
    /// Frames present on disk after the run.
    pub frame_count: usize,
}

/// Decoder arguments for dumping every frame of `video_path` into `frames_dir`.
pub fn frame_args(video_path: &Path, frames_dir: &Path, options: &FrameOptions) -> Vec<String> {
    vec![
        "-i".to_string(),
        path_arg(video_path),
        options.pattern(frames_dir),
        "-y".to_string(),
    ]
}

/// Extracts every frame of `video_path` into `frames_dir`.
pub fn extract_frames<D: MediaDecoder + ?Sized>(
    decoder: &D,
    video_path: &Path,
    frames_dir: &Path,
    options: &FrameOptions,
) -> CoreResult<FrameExtraction> {
    options.validate()?;

    let removed = remove_stale_frames(frames_dir, options)?;
    if removed > 0 {
        log::info!("Removed {} frames left by a previous run", removed);
    }

    log::info!("Extracting frames to: {}", frames_dir.display());
    run_decoder(decoder, "frame extraction", &frame_args(video_path, frames_dir, options))?;

    let frame_count = list_frames(frames_dir, options)?.len();
    log::info!("Frame extraction completed: {} frames", frame_count);

    Ok(FrameExtraction {
        frames_dir: frames_dir.to_path_buf(),
        frame_count,
    })
}

/// Lists frames matching `options` in `frames_dir`, sorted by name.
pub fn list_frames(frames_dir: &Path, options: &FrameOptions) -> CoreResult<Vec<PathBuf>> {
    let read_dir = fs::read_dir(frames_dir).map_err(|e| filesystem_error(frames_dir, e))?;
    let mut frames: Vec<PathBuf> = read_dir
        .filter_map(|entry| {
            let entry = entry.ok()?;
            let name = entry.file_name();
            let name = name.to_str()?;
            (options.matches(name) && entry.path().is_file()).then(|| entry.path())
        })
        .collect();
    frames.sort();
    Ok(frames)
}

fn remove_stale_frames(frames_dir: &Path, options: &FrameOptions) -> CoreResult<usize> {
    let stale = list_frames(frames_dir, options)?;
    for frame in &stale {
        fs::remove_file(frame).map_err(|e| filesystem_error(frame, e))?;
    }
    Ok(stale.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_frame_args_match_decoder_contract() {
        let args = frame_args(
            Path::new("/out/T/video.mp4"),
            Path::new("/out/T/frames"),
            &FrameOptions::default(),
        );
        assert_eq!(args, vec!["-i", "/out/T/video.mp4", "/out/T/frames/frame_%05d.jpg", "-y"]);
    }

    #[test]
    fn test_pattern_escapes_percent_signs() {
        let options = FrameOptions::new("100%_", "png");
        assert_eq!(options.pattern(Path::new("/a%b/frames")), "/a%%b/frames/100%%_%05d.png");
    }

    #[test]
    fn test_file_name_and_matches() {
        let options = FrameOptions::default();
        assert_eq!(options.file_name(1), "frame_00001.jpg");
        assert_eq!(options.file_name(123456), "frame_123456.jpg");

        assert!(options.matches("frame_00001.jpg"));
        assert!(options.matches("frame_123456.jpg"));
        assert!(!options.matches("frame_0001.jpg"));
        assert!(!options.matches("frame_00001.png"));
        assert!(!options.matches("thumb_00001.jpg"));
        assert!(!options.matches("frame_0000a.jpg"));
        assert!(!options.matches("frame_00001jpg"));
    }

    #[test]
    fn test_validate_options() {
        assert!(FrameOptions::default().validate().is_ok());
        assert!(FrameOptions::new("", "png").validate().is_ok());
        assert!(FrameOptions::new("../x", "jpg").validate().is_err());
        assert!(FrameOptions::new("a/b", "jpg").validate().is_err());
        assert!(FrameOptions::new("frame_", "").validate().is_err());
        assert!(FrameOptions::new("frame_", "j.pg").validate().is_err());
    }

    #[test]
    fn test_list_and_remove_stale_frames_only_touch_matching_files() {
        let tmp = tempdir().unwrap();
        let options = FrameOptions::default();
        for i in 1..=3 {
            fs::write(tmp.path().join(options.file_name(i)), b"x").unwrap();
        }
        fs::write(tmp.path().join("notes.txt"), b"keep").unwrap();
        fs::write(tmp.path().join("frame_00001.png"), b"keep").unwrap();

        assert_eq!(list_frames(tmp.path(), &options).unwrap().len(), 3);
        assert_eq!(remove_stale_frames(tmp.path(), &options).unwrap(), 3);
        assert!(list_frames(tmp.path(), &options).unwrap().is_empty());
        assert!(tmp.path().join("notes.txt").exists());
        assert!(tmp.path().join("frame_00001.png").exists());
    }
}
