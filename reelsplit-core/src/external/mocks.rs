// reelsplit-core/src/external/mocks.rs

// --- Mocking Infrastructure (for testing) ---

// This module is only compiled when the "test-mocks" feature is enabled.

use super::*;
use crate::error::{AcquisitionFailure, CoreError, CoreResult};
use std::collections::VecDeque;
use std::os::unix::process::ExitStatusExt; // For ExitStatus::from_raw
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use std::sync::Mutex;

/// Mock implementation of MediaSourceResolver.
///
/// Each `resolve` call consumes the next queued result. `save` writes
/// `video_bytes` to the destination unless a save failure is queued.
#[derive(Default)]
pub struct MockResolver {
    resolve_results: Mutex<VecDeque<Result<ResolvedSource, AcquisitionFailure>>>,
    save_failures: Mutex<VecDeque<AcquisitionFailure>>,
    video_bytes: Vec<u8>,
    received_saves: Mutex<Vec<(String, String, PathBuf)>>,
}

impl MockResolver {
    pub fn new() -> Self {
        Self {
            video_bytes: b"mock video payload".to_vec(),
            ..Default::default()
        }
    }

    /// A resolver whose next `resolve` yields `title` with one progressive
    /// mp4 stream.
    pub fn with_title(title: &str) -> Self {
        let resolver = Self::new();
        resolver.expect_title(title);
        resolver
    }

    pub fn expect_title(&self, title: &str) {
        self.expect_resolve(Ok(mock_source(title)));
    }

    pub fn expect_resolve(&self, result: Result<ResolvedSource, AcquisitionFailure>) {
        self.resolve_results.lock().unwrap().push_back(result);
    }

    pub fn fail_next_save(&self, failure: AcquisitionFailure) {
        self.save_failures.lock().unwrap().push_back(failure);
    }

    /// (url, format_id, destination) of every save call.
    pub fn received_saves(&self) -> Vec<(String, String, PathBuf)> {
        self.received_saves.lock().unwrap().clone()
    }
}

/// A resolved source with one 720p progressive mp4 stream.
pub fn mock_source(title: &str) -> ResolvedSource {
    ResolvedSource {
        title: title.to_string(),
        stream: StreamFormat {
            format_id: "22".to_string(),
            ext: Some("mp4".to_string()),
            vcodec: Some("avc1.64001F".to_string()),
            acodec: Some("mp4a.40.2".to_string()),
            width: Some(1280),
            height: Some(720),
            tbr: Some(1500.0),
        },
        metadata: serde_json::json!({ "title": title, "id": "mock" }),
    }
}

impl MediaSourceResolver for MockResolver {
    fn resolve(&self, url: &str) -> Result<ResolvedSource, AcquisitionFailure> {
        log::info!("MockResolver::resolve called for: {}", url);
        self.resolve_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(AcquisitionFailure::Resolution(format!(
                    "MockResolver: no expectation set for {url}"
                )))
            })
    }

    fn save(
        &self,
        url: &str,
        stream: &StreamFormat,
        destination: &Path,
    ) -> Result<(), AcquisitionFailure> {
        self.received_saves.lock().unwrap().push((
            url.to_string(),
            stream.format_id.clone(),
            destination.to_path_buf(),
        ));
        if let Some(failure) = self.save_failures.lock().unwrap().pop_front() {
            return Err(failure);
        }
        std::fs::write(destination, &self.video_bytes).map_err(|source| {
            AcquisitionFailure::LocalWrite {
                path: destination.to_path_buf(),
                source,
            }
        })
    }
}

/// What a mocked decoder run leaves on disk.
#[derive(Debug, Clone)]
pub enum MockOutput {
    Nothing,
    /// Creates the file named by the output argument (the one before `-y`).
    File,
    /// Expands the `%05d` output pattern into this many frame files.
    Frames(u64),
}

enum MockOutcome {
    Exit { code: i32, diagnostics: String, output: MockOutput },
    SpawnError(CoreError),
}

/// Represents an expected decoder call and its mock result.
struct MockDecoderExpectation {
    arg_pattern: String,
    outcome: MockOutcome,
}

/// Mock implementation of MediaDecoder supporting multiple expectations.
///
/// Calls are matched against expectations by substring on any argument; a
/// matched expectation is consumed. An unmatched call panics.
#[derive(Default)]
pub struct MockDecoder {
    expectations: Mutex<Vec<MockDecoderExpectation>>,
    received_calls: Mutex<Vec<Vec<String>>>,
}

impl MockDecoder {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn add_success_expectation(&self, arg_pattern: &str, output: MockOutput) {
        self.push(arg_pattern, MockOutcome::Exit {
            code: 0,
            diagnostics: String::new(),
            output,
        });
    }

    pub fn add_exit_error_expectation(&self, arg_pattern: &str, exit_code: i32, diagnostics: &str) {
        self.push(arg_pattern, MockOutcome::Exit {
            code: exit_code,
            diagnostics: diagnostics.to_string(),
            output: MockOutput::Nothing,
        });
    }

    pub fn add_spawn_error_expectation(&self, arg_pattern: &str, error: CoreError) {
        self.push(arg_pattern, MockOutcome::SpawnError(error));
    }

    pub fn get_received_calls(&self) -> Vec<Vec<String>> {
        self.received_calls.lock().unwrap().clone()
    }

    fn push(&self, arg_pattern: &str, outcome: MockOutcome) {
        self.expectations.lock().unwrap().push(MockDecoderExpectation {
            arg_pattern: arg_pattern.to_string(),
            outcome,
        });
    }
}

impl MediaDecoder for MockDecoder {
    fn tool_name(&self) -> String {
        "mock-ffmpeg".to_string()
    }

    fn run(&self, args: &[String]) -> CoreResult<DecoderOutput> {
        self.received_calls.lock().unwrap().push(args.to_vec());

        let expectation = {
            let mut expectations = self.expectations.lock().unwrap();
            let found = expectations
                .iter()
                .position(|exp| args.iter().any(|arg| arg.contains(&exp.arg_pattern)));
            match found {
                Some(index) => expectations.remove(index),
                None => panic!("MockDecoder: No expectation found for command args: {:?}", args),
            }
        };
        log::info!("MockDecoder: Matched expectation with pattern '{}'", expectation.arg_pattern);

        match expectation.outcome {
            MockOutcome::SpawnError(err) => Err(err),
            MockOutcome::Exit { code, diagnostics, output } => {
                if code == 0 {
                    create_outputs(args, &output);
                }
                Ok(DecoderOutput {
                    // Raw wait status: the exit code lives in the high byte.
                    status: ExitStatus::from_raw(code << 8),
                    diagnostics,
                })
            }
        }
    }
}

fn create_outputs(args: &[String], output: &MockOutput) {
    let Some(target) = args.len().checked_sub(2).and_then(|i| args.get(i)) else {
        log::warn!("MockDecoder couldn't find output path in args to create dummy output.");
        return;
    };
    match output {
        MockOutput::Nothing => {}
        MockOutput::File => {
            if let Err(e) = std::fs::write(target, b"mock output") {
                log::error!("MockDecoder failed to create dummy output {}: {}", target, e);
            }
        }
        MockOutput::Frames(count) => {
            let unescaped = target.replace("%%", "%");
            for index in 1..=*count {
                let path = unescaped.replace("%05d", &format!("{index:05}"));
                if let Err(e) = std::fs::write(&path, format!("frame {index}")) {
                    log::error!("MockDecoder failed to create dummy frame {}: {}", path, e);
                }
            }
        }
    }
}
