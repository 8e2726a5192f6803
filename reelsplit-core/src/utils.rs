//! Utility functions for formatting and file operations.
//!
//! General-purpose helpers used by the CLI summary and the core logging.

use crate::error::{CoreResult, filesystem_error};
use std::path::Path;

/// Formats seconds as HH:MM:SS (e.g., 3725.0 -> "01:02:05"). Returns "??:??:??" for invalid inputs.
#[must_use]
pub fn format_duration(seconds: f64) -> String {
    if seconds < 0.0 || !seconds.is_finite() {
        return "??:??:??".to_string();
    }

    let total_seconds = seconds as u64;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;
    format!("{hours:02}:{minutes:02}:{secs:02}")
}

/// Formats bytes with appropriate binary units (B, KiB, MiB, GiB).
#[must_use]
pub fn format_bytes(bytes: u64) -> String {
    const KIB: f64 = 1024.0;
    const MIB: f64 = KIB * 1024.0;
    const GIB: f64 = MIB * 1024.0;

    let bytes_f64 = bytes as f64;
    if bytes_f64 >= GIB {
        format!("{:.2} GiB", bytes_f64 / GIB)
    } else if bytes_f64 >= MIB {
        format!("{:.2} MiB", bytes_f64 / MIB)
    } else if bytes_f64 >= KIB {
        format!("{:.2} KiB", bytes_f64 / KIB)
    } else {
        format!("{bytes} B")
    }
}

/// Size of a single file in bytes.
pub fn file_size(path: &Path) -> CoreResult<u64> {
    std::fs::metadata(path)
        .map(|m| m.len())
        .map_err(|e| filesystem_error(path, e))
}

/// Total size of the regular files directly inside `dir` (not recursive).
pub fn dir_size(dir: &Path) -> CoreResult<u64> {
    let entries = std::fs::read_dir(dir).map_err(|e| filesystem_error(dir, e))?;
    let mut total = 0;
    for entry in entries {
        let entry = entry.map_err(|e| filesystem_error(dir, e))?;
        let metadata = entry.metadata().map_err(|e| filesystem_error(entry.path(), e))?;
        if metadata.is_file() {
            total += metadata.len();
        }
    }
    Ok(total)
}
