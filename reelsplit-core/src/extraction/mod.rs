//! Derivation of audio and frame artifacts from an acquired video.
//!
//! Both extractors build a decoder argument list and hand it to a
//! [`MediaDecoder`]. They share the exit-status handling in [`run_decoder`].

pub mod audio;
pub mod frames;

pub use audio::{AUDIO_CHANNELS, AUDIO_CODEC, AUDIO_SAMPLE_RATE, audio_args, extract_audio};
pub use frames::{FrameExtraction, FrameOptions, extract_frames, frame_args};

use crate::error::{CoreResult, command_failed_error};
use crate::external::{DecoderOutput, MediaDecoder};

use std::path::Path;

/// Runs the decoder and turns a non-zero exit into `CoreError::Extraction`.
pub(crate) fn run_decoder<D: MediaDecoder + ?Sized>(
    decoder: &D,
    operation: &str,
    args: &[String],
) -> CoreResult<DecoderOutput> {
    let output = decoder.run(args)?;
    if !output.status.success() {
        log::error!("{} failed: {} exited with {}", operation, decoder.tool_name(), output.status);
        return Err(command_failed_error(
            operation,
            decoder.tool_name(),
            output.status,
            output.diagnostics,
        ));
    }
    Ok(output)
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
