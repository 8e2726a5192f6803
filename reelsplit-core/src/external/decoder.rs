// ============================================================================
// reelsplit-core/src/external/decoder.rs
// ============================================================================
//
// DECODER: FFmpeg process abstraction
//
// The extractors describe *what* to run as a plain argument list; a
// MediaDecoder decides *how* to run it. The default implementation launches
// ffmpeg through ffmpeg-sidecar, drains its event stream into the log and
// keeps the tail of its diagnostics for error reporting.
//
// AI-ASSISTANT-INFO: Decoder process management and execution abstraction

use crate::error::{CoreError, CoreResult, command_start_error};

use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::{FfmpegEvent, LogLevel};

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;

/// Number of diagnostic lines kept for error messages.
const DIAGNOSTIC_TAIL_LINES: usize = 50;

/// Outcome of one decoder invocation.
#[derive(Debug, Clone)]
pub struct DecoderOutput {
    pub status: ExitStatus,
    /// Captured warnings/errors emitted by the process, newest last.
    pub diagnostics: String,
}

/// Capability to run the external decoder with an argument list.
///
/// Implementations block until the process exits. Launch failures are
/// errors (`ToolNotFound` / `CommandStart`); a non-zero exit is *not* an
/// error at this level and is reported through [`DecoderOutput::status`].
pub trait MediaDecoder: Send + Sync {
    /// Name used in diagnostics and errors.
    fn tool_name(&self) -> String;

    fn run(&self, args: &[String]) -> CoreResult<DecoderOutput>;
}

impl<T: MediaDecoder + ?Sized> MediaDecoder for &T {
    fn tool_name(&self) -> String {
        (**self).tool_name()
    }

    fn run(&self, args: &[String]) -> CoreResult<DecoderOutput> {
        (**self).run(args)
    }
}

/// [`MediaDecoder`] backed by an ffmpeg binary via `ffmpeg-sidecar`.
#[derive(Debug, Clone)]
pub struct SidecarDecoder {
    ffmpeg_path: PathBuf,
}

impl Default for SidecarDecoder {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_FFMPEG_PATH)
    }
}

impl SidecarDecoder {
    pub fn new(ffmpeg_path: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
        }
    }

    pub fn ffmpeg_path(&self) -> &Path {
        &self.ffmpeg_path
    }
}

impl MediaDecoder for SidecarDecoder {
    fn tool_name(&self) -> String {
        self.ffmpeg_path.to_string_lossy().into_owned()
    }

    fn run(&self, args: &[String]) -> CoreResult<DecoderOutput> {
        let mut cmd = FfmpegCommand::new_with_path(&self.ffmpeg_path);
        cmd.args(args);
        log::debug!("Running decoder command: {:?}", cmd);

        let mut child = cmd
            .spawn()
            .map_err(|e| command_start_error(self.tool_name(), e))?;

        let mut diagnostics = DiagnosticTail::default();
        let iterator = child.iter().map_err(|e| CoreError::CommandStart {
            tool: self.tool_name(),
            source: std::io::Error::other(e.to_string()),
        })?;
        for event in iterator {
            match event {
                FfmpegEvent::Log(LogLevel::Warning, line) => {
                    log::debug!(target: "ffmpeg_log", "{line}");
                    diagnostics.push(line);
                }
                FfmpegEvent::Log(LogLevel::Error | LogLevel::Fatal, line)
                | FfmpegEvent::Error(line) => {
                    log::warn!(target: "ffmpeg_log", "{line}");
                    diagnostics.push(line);
                }
                FfmpegEvent::Log(_, line) => log::trace!(target: "ffmpeg_log", "{line}"),
                FfmpegEvent::Progress(progress) => {
                    log::trace!("ffmpeg progress: frame={} time={}", progress.frame, progress.time);
                }
                _ => {}
            }
        }

        let status = child.wait().map_err(|e| CoreError::CommandStart {
            tool: self.tool_name(),
            source: e,
        })?;
        Ok(DecoderOutput {
            status,
            diagnostics: diagnostics.render(),
        })
    }
}

/// Bounded buffer of the most recent diagnostic lines.
#[derive(Debug, Default)]
pub(crate) struct DiagnosticTail {
    lines: VecDeque<String>,
}

impl DiagnosticTail {
    pub(crate) fn push(&mut self, line: impl Into<String>) {
        let line = line.into();
        let line = line.trim_end();
        if line.is_empty() {
            return;
        }
        if self.lines.len() >= DIAGNOSTIC_TAIL_LINES {
            self.lines.pop_front();
        }
        self.lines.push_back(line.to_string());
    }

    pub(crate) fn render(&self) -> String {
        if self.lines.is_empty() {
            return "no diagnostic output captured".to_string();
        }
        self.lines.iter().cloned().collect::<Vec<_>>().join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_tail_is_bounded() {
        let mut tail = DiagnosticTail::default();
        for i in 0..(DIAGNOSTIC_TAIL_LINES + 10) {
            tail.push(format!("line {i}"));
        }
        let rendered = tail.render();
        assert!(!rendered.contains("line 0\n"));
        assert!(rendered.ends_with(&format!("line {}", DIAGNOSTIC_TAIL_LINES + 9)));
        assert_eq!(rendered.lines().count(), DIAGNOSTIC_TAIL_LINES);
    }

    #[test]
    fn test_diagnostic_tail_skips_blank_lines() {
        let mut tail = DiagnosticTail::default();
        assert_eq!(tail.render(), "no diagnostic output captured");
        tail.push("   \n");
        tail.push("Invalid data found when processing input\n");
        assert_eq!(tail.render(), "Invalid data found when processing input");
    }

    #[cfg(unix)]
    #[test]
    fn test_non_zero_exit_keeps_status_and_diagnostics() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::tempdir().unwrap();
        let fake_ffmpeg = tmp.path().join("ffmpeg");
        std::fs::write(
            &fake_ffmpeg,
            "#!/bin/sh\necho '[error] Invalid data found when processing input' >&2\nexit 3\n",
        )
        .unwrap();
        std::fs::set_permissions(&fake_ffmpeg, std::fs::Permissions::from_mode(0o755)).unwrap();

        let decoder = SidecarDecoder::new(&fake_ffmpeg);
        let output = decoder
            .run(&["-i".to_string(), "in.mp4".to_string(), "out.wav".to_string(), "-y".to_string()])
            .unwrap();

        assert!(!output.status.success());
        assert_eq!(output.status.code(), Some(3));
        assert!(
            output.diagnostics.contains("Invalid data found when processing input"),
            "diagnostics were: {}",
            output.diagnostics
        );
    }

    #[test]
    fn test_missing_ffmpeg_is_tool_not_found() {
        let decoder = SidecarDecoder::new("/definitely/not/here/ffmpeg");
        let err = decoder.run(&["-version".to_string()]).unwrap_err();
        assert!(matches!(err, CoreError::ToolNotFound(_)));
    }
}
