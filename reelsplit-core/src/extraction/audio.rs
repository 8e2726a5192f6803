//! Audio track extraction.
//!
//! Produces uncompressed PCM (signed 16-bit little endian, 44.1 kHz, stereo)
//! from the acquired video, overwriting any previous output.

use super::{path_arg, run_decoder};
use crate::config::validate_file_component;
use crate::error::CoreResult;
use crate::external::MediaDecoder;

use std::path::{Path, PathBuf};

pub const AUDIO_CODEC: &str = "pcm_s16le";
pub const AUDIO_SAMPLE_RATE: u32 = 44_100;
pub const AUDIO_CHANNELS: u32 = 2;

/// Decoder arguments for writing the audio track of `video_path` to `audio_path`.
pub fn audio_args(video_path: &Path, audio_path: &Path) -> Vec<String> {
    vec![
        "-i".to_string(),
        path_arg(video_path),
        "-vn".to_string(),
        "-acodec".to_string(),
        AUDIO_CODEC.to_string(),
        "-ar".to_string(),
        AUDIO_SAMPLE_RATE.to_string(),
        "-ac".to_string(),
        AUDIO_CHANNELS.to_string(),
        path_arg(audio_path),
        "-y".to_string(),
    ]
}

/// Extracts the audio of `video_path` into `audio_dir/filename`.
///
/// The decoder's success signal is trusted; the WAV is not inspected.
pub fn extract_audio<D: MediaDecoder + ?Sized>(
    decoder: &D,
    video_path: &Path,
    audio_dir: &Path,
    filename: &str,
) -> CoreResult<PathBuf> {
    validate_file_component("audio filename", filename)?;
    let audio_path = audio_dir.join(filename);

    log::info!("Extracting audio: {} -> {}", video_path.display(), audio_path.display());
    run_decoder(decoder, "audio extraction", &audio_args(video_path, &audio_path))?;
    log::info!("Audio written to {}", audio_path.display());

    Ok(audio_path)
}
