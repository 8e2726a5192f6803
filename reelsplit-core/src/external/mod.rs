// ============================================================================
// reelsplit-core/src/external/mod.rs
// ============================================================================
//
// EXTERNAL TOOLS: Interactions with yt-dlp, ffmpeg and ffprobe
//
// The pipeline core never launches a process directly. It talks to two
// capability traits instead:
//
// - MediaSourceResolver: URL -> title + selected stream, and stream -> disk
// - MediaDecoder: run the decoder with an argument list, report exit + output
//
// Concrete implementations bind these to yt-dlp and ffmpeg-sidecar; tests
// substitute the mocks from `mocks` (behind the `test-mocks` feature).
//
// AI-ASSISTANT-INFO: External tool interactions and abstractions

// ---- Internal crate imports ----
use crate::error::{CoreResult, command_start_error};

// ---- Standard library imports ----
use std::ffi::OsStr;
use std::process::{Command, Stdio};

// ============================================================================
// SUBMODULES
// ============================================================================

/// Decoder capability and the ffmpeg-sidecar implementation
pub mod decoder;

/// Source resolver capability and the yt-dlp implementation
pub mod resolver;

/// ffprobe summary of a local video file
pub mod probe;

#[cfg(feature = "test-mocks")]
pub mod mocks;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use decoder::{DecoderOutput, MediaDecoder, SidecarDecoder};
pub use probe::{VideoSummary, probe_video};
pub use resolver::{MediaSourceResolver, ResolvedSource, StreamFormat, YtDlpResolver};

// ============================================================================
// DEPENDENCY CHECKING
// ============================================================================

/// Checks that an external command is available and executable.
///
/// Runs `cmd_name version_arg` with output discarded. Only the ability to
/// launch matters; the exit status is ignored.
///
/// * `Err(CoreError::ToolNotFound)` - the executable does not exist
/// * `Err(CoreError::CommandStart)` - it exists but could not be started
pub fn check_dependency(cmd_name: impl AsRef<OsStr>, version_arg: &str) -> CoreResult<()> {
    let cmd_name = cmd_name.as_ref();
    let result = Command::new(cmd_name)
        .arg(version_arg)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match result {
        Ok(_) => {
            log::debug!("Found dependency: {}", cmd_name.to_string_lossy());
            Ok(())
        }
        Err(e) => {
            log::warn!("Dependency '{}' unavailable: {}", cmd_name.to_string_lossy(), e);
            Err(command_start_error(cmd_name.to_string_lossy(), e))
        }
    }
}
