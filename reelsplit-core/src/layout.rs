//! Output layout management.
//!
//! Every acquired video gets its own directory under the output root, named
//! after its sanitized title:
//!
//! ```text
//! {root}/{title}/video.mp4
//! {root}/{title}/audio/
//! {root}/{title}/frames/
//! ```
//!
//! All directory creation is idempotent; an existing tree is reused as-is.

use crate::error::{CoreResult, filesystem_error};

use std::path::{Path, PathBuf};

/// Directory name used when a title sanitizes to nothing.
pub const FALLBACK_DIR_NAME: &str = "video";

/// Per-component filename limit of common filesystems, in bytes.
pub const MAX_DIR_NAME_BYTES: usize = 255;

const AUDIO_DIR_NAME: &str = "audio";
const FRAMES_DIR_NAME: &str = "frames";

/// Maps an arbitrary title to a filesystem-safe name.
///
/// Keeps alphanumeric characters plus space, `.`, `_` and `-`, then trims
/// surrounding whitespace. Pure and total: the empty string maps to itself.
///
/// ```rust
/// use reelsplit_core::layout::sanitize_filename;
///
/// assert_eq!(sanitize_filename("My Clip: Test!"), "My Clip Test");
/// assert_eq!(sanitize_filename("  a/b\\c  "), "abc");
/// ```
#[must_use]
pub fn sanitize_filename(name: &str) -> String {
    let kept: String = name
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '.' | '_' | '-'))
        .collect();
    kept.trim().to_string()
}

/// Resolves the directory name for a title, falling back to
/// [`FALLBACK_DIR_NAME`] when nothing survives sanitization.
///
/// Titles made only of dots would otherwise name the root or its parent.
/// Names longer than [`MAX_DIR_NAME_BYTES`] are cut at a char boundary.
#[must_use]
pub fn video_dir_name(title: &str) -> String {
    let name = sanitize_filename(title);
    let name = truncate_at_char_boundary(&name, MAX_DIR_NAME_BYTES).trim_end();
    if name.is_empty() || name.chars().all(|c| c == '.') {
        FALLBACK_DIR_NAME.to_string()
    } else {
        name.to_string()
    }
}

fn truncate_at_char_boundary(name: &str, max_bytes: usize) -> &str {
    if name.len() <= max_bytes {
        return name;
    }
    let mut end = max_bytes;
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    &name[..end]
}

/// The per-video directory tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaLayout {
    pub video_dir: PathBuf,
    pub audio_dir: PathBuf,
    pub frames_dir: PathBuf,
}

impl MediaLayout {
    /// Path of a file directly inside the video directory.
    pub fn video_file(&self, filename: &str) -> PathBuf {
        self.video_dir.join(filename)
    }
}

/// Owns creation and addressing of the output tree beneath one root.
#[derive(Debug, Clone)]
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Creates the root directory if it does not exist yet.
    pub fn ensure_root(&self) -> CoreResult<()> {
        create_dir(&self.root)
    }

    /// Computes the tree for `dir_name` without touching the filesystem.
    pub fn plan(&self, dir_name: &str) -> MediaLayout {
        let video_dir = self.root.join(dir_name);
        MediaLayout {
            audio_dir: video_dir.join(AUDIO_DIR_NAME),
            frames_dir: video_dir.join(FRAMES_DIR_NAME),
            video_dir,
        }
    }

    /// Creates `root/dir_name/`, `root/dir_name/audio/` and
    /// `root/dir_name/frames/`. Calling it again for the same name is a no-op.
    pub fn create(&self, dir_name: &str) -> CoreResult<MediaLayout> {
        let layout = self.plan(dir_name);
        for dir in [&layout.video_dir, &layout.audio_dir, &layout.frames_dir] {
            create_dir(dir)?;
        }
        log::info!("Prepared output directories under {}", layout.video_dir.display());
        Ok(layout)
    }
}

fn create_dir(dir: &Path) -> CoreResult<()> {
    std::fs::create_dir_all(dir).map_err(|e| {
        log::error!("Failed to create directory {}: {}", dir.display(), e);
        filesystem_error(dir, e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use tempfile::tempdir;

    #[test]
    fn test_sanitize_strips_disallowed_characters() {
        assert_eq!(sanitize_filename("My Clip: Test!"), "My Clip Test");
        assert_eq!(sanitize_filename("a/b?c*d|e"), "abcde");
        assert_eq!(sanitize_filename("keep.these_chars-ok"), "keep.these_chars-ok");
        assert_eq!(sanitize_filename("  padded  "), "padded");
        assert_eq!(sanitize_filename(""), "");
        assert_eq!(sanitize_filename("!!!"), "");
    }

    #[test]
    fn test_sanitize_keeps_unicode_alphanumerics() {
        assert_eq!(sanitize_filename("Café № 5"), "Café  5");
        assert_eq!(sanitize_filename("日本語のタイトル!"), "日本語のタイトル");
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let samples = [
            "My Clip: Test!",
            " \t leading and trailing \n",
            "??? ...",
            "mixed/\\:*?\"<>| chars",
            "- dash - ",
            "",
        ];
        for sample in samples {
            let once = sanitize_filename(sample);
            assert_eq!(sanitize_filename(&once), once, "input: {sample:?}");
        }
    }

    #[test]
    fn test_sanitize_output_character_set() {
        let samples = ["My Clip: Test!", "\u{3000}wide space\u{3000}", "tab\there", "a\nb"];
        for sample in samples {
            let out = sanitize_filename(sample);
            assert!(
                out.chars()
                    .all(|c| c.is_alphanumeric() || matches!(c, ' ' | '.' | '_' | '-')),
                "unexpected character in {out:?}"
            );
            assert_eq!(out.trim(), out);
        }
    }

    #[test]
    fn test_video_dir_name_fallback() {
        assert_eq!(video_dir_name("???"), FALLBACK_DIR_NAME);
        assert_eq!(video_dir_name(".."), FALLBACK_DIR_NAME);
        assert_eq!(video_dir_name("Episode 1"), "Episode 1");
    }

    #[test]
    fn test_video_dir_name_is_truncated_to_component_limit() {
        // 3 bytes per char: 100 chars = 300 bytes.
        let long_title = "日".repeat(100);
        let name = video_dir_name(&long_title);
        assert!(name.len() <= MAX_DIR_NAME_BYTES);
        assert_eq!(name, "日".repeat(85));

        // Cutting must not leave trailing whitespace behind.
        let spaced = format!("{} tail", "a".repeat(254));
        assert_eq!(video_dir_name(&spaced), "a".repeat(254));

        let tmp = tempdir().unwrap();
        let layout = OutputLayout::new(tmp.path()).create(&name).unwrap();
        assert!(layout.frames_dir.is_dir());
    }

    #[test]
    fn test_create_layout_is_idempotent() {
        let tmp = tempdir().unwrap();
        let layout = OutputLayout::new(tmp.path());

        let first = layout.create("My Clip Test").unwrap();
        let second = layout.create("My Clip Test").unwrap();

        assert_eq!(first, second);
        assert!(first.video_dir.is_dir());
        assert!(first.audio_dir.is_dir());
        assert!(first.frames_dir.is_dir());
        assert_eq!(first.audio_dir, tmp.path().join("My Clip Test").join("audio"));
        assert_eq!(first.frames_dir, tmp.path().join("My Clip Test").join("frames"));

        let entries = std::fs::read_dir(&first.video_dir).unwrap().count();
        assert_eq!(entries, 2);
    }

    #[test]
    fn test_create_layout_reports_filesystem_error() {
        let tmp = tempdir().unwrap();
        let blocker = tmp.path().join("not_a_dir");
        std::fs::write(&blocker, b"file").unwrap();

        let layout = OutputLayout::new(&blocker);
        let err = layout.create("title").unwrap_err();
        assert!(matches!(err, CoreError::Filesystem { .. }));
    }
}
