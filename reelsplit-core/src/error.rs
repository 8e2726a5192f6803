// ============================================================================
// reelsplit-core/src/error.rs
// ============================================================================
//
// ERROR HANDLING: Error types for the acquisition/extraction pipeline
//
// Every stage of the pipeline returns `CoreResult<T>`. Failures are never
// downgraded: each variant names the stage (or tool) that failed so the caller
// can report it, while control flow only cares that an error occurred.
//
// KEY COMPONENTS:
// - CoreError: the pipeline-wide error enum
// - AcquisitionFailure: the underlying cause of a failed acquisition
// - Helper constructors used by the external tool wrappers
//
// AI-ASSISTANT-INFO: Error types for reelsplit-core

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Errors produced by the reelsplit pipeline.
#[derive(Error, Debug)]
pub enum CoreError {
    /// An extraction was requested before a video was acquired.
    #[error("No video acquired: {operation} requires a successful acquire() first")]
    NoVideoAcquired { operation: &'static str },

    /// Resolving or downloading the source failed.
    #[error("Failed to acquire '{url}': {cause}")]
    Acquisition {
        url: String,
        #[source]
        cause: AcquisitionFailure,
    },

    /// Directory or file creation failed for a reason other than "already exists".
    #[error("Filesystem error at '{}': {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The external executable could not be found on this host.
    #[error("Required tool '{0}' not found")]
    ToolNotFound(String),

    /// The external executable exists but could not be launched.
    #[error("Failed to start '{tool}': {source}")]
    CommandStart {
        tool: String,
        #[source]
        source: io::Error,
    },

    /// The external executable ran and reported failure.
    #[error("{operation} failed: '{tool}' exited with {status}\n{diagnostics}")]
    Extraction {
        operation: String,
        tool: String,
        status: String,
        diagnostics: String,
    },

    /// Media probing failed to produce usable output.
    #[error("Probe error: {0}")]
    Probe(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Underlying cause carried by [`CoreError::Acquisition`].
#[derive(Error, Debug)]
pub enum AcquisitionFailure {
    /// Connection refused, timeout, DNS failure or a non-2xx response.
    #[error("network failure: {0}")]
    Network(String),

    /// The URL does not reference an available, accessible resource.
    #[error("resolution failure: {0}")]
    Resolution(String),

    /// The resource exists but offers no progressive mp4 stream.
    #[error("no compatible progressive stream found")]
    NoCompatibleStream,

    /// The stream could not be written to the local destination.
    #[error("could not write '{}': {source}", path.display())]
    LocalWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The resolver executable is missing.
    #[error("resolver tool '{0}' not found")]
    ToolNotFound(String),

    /// The provider returned metadata we could not parse.
    #[error("malformed provider metadata: {0}")]
    Metadata(#[from] serde_json::Error),
}

/// Result type for reelsplit operations
pub type CoreResult<T> = std::result::Result<T, CoreError>;

/// Builds a [`CoreError::Filesystem`] for the given path.
pub fn filesystem_error(path: impl Into<PathBuf>, source: io::Error) -> CoreError {
    CoreError::Filesystem {
        path: path.into(),
        source,
    }
}

/// Maps a failed process launch to `ToolNotFound` or `CommandStart`.
pub fn command_start_error(tool: impl Into<String>, source: io::Error) -> CoreError {
    let tool = tool.into();
    if source.kind() == io::ErrorKind::NotFound {
        CoreError::ToolNotFound(tool)
    } else {
        CoreError::CommandStart { tool, source }
    }
}

/// Builds a [`CoreError::Extraction`] from a non-zero exit.
pub fn command_failed_error(
    operation: impl Into<String>,
    tool: impl Into<String>,
    status: ExitStatus,
    diagnostics: impl Into<String>,
) -> CoreError {
    CoreError::Extraction {
        operation: operation.into(),
        tool: tool.into(),
        status: status.to_string(),
        diagnostics: diagnostics.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_start_error_classifies_not_found() {
        let err = command_start_error("ffmpeg", io::Error::from(io::ErrorKind::NotFound));
        assert!(matches!(err, CoreError::ToolNotFound(ref t) if t == "ffmpeg"));

        let err = command_start_error(
            "ffmpeg",
            io::Error::from(io::ErrorKind::PermissionDenied),
        );
        assert!(matches!(err, CoreError::CommandStart { .. }));
    }

    #[test]
    fn test_acquisition_error_keeps_cause() {
        let err = CoreError::Acquisition {
            url: "https://example.com/v".to_string(),
            cause: AcquisitionFailure::NoCompatibleStream,
        };
        let message = err.to_string();
        assert!(message.contains("https://example.com/v"));
        assert!(message.contains("no compatible progressive stream"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
