// ============================================================================
// moseas-core/src/error.rs
// ============================================================================
//
// ERROR HANDLING: Core Error Types
//
// This module defines the error type shared by every part of moseas-core.
// Errors fall in two groups: batch-fatal errors (missing source directory,
// invalid filenames, destination setup) which are returned from
// `run_batch`, and per-stage errors (tool launch, non-zero exit, copy)
// which the stage runner converts into a failed stage outcome.

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Errors produced by the MOSEAS core library.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Source directory does not exist: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("File {0} is not a valid YouTube video id .mp4 file")]
    InvalidFilename(String),

    #[error("Source entry {} is not a regular file", .0.display())]
    NotAFile(PathBuf),

    #[error("Invalid video identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Failed to prepare directory {}: {source}", path.display())]
    Layout {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to copy {} to {}: {source}", from.display(), to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to start {0}: {1}")]
    CommandStart(String, #[source] io::Error),

    #[error("{0} failed with {1}: {2}")]
    CommandFailed(String, ExitStatus, String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    OperationFailed(String),
}

/// Result type for moseas-core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Builds the error for a tool that could not be launched.
pub fn command_start_error(command: impl Into<String>, source: io::Error) -> CoreError {
    CoreError::CommandStart(command.into(), source)
}

/// Builds the error for a tool that ran but exited unsuccessfully.
pub fn command_failed_error(
    command: impl Into<String>,
    status: ExitStatus,
    detail: impl Into<String>,
) -> CoreError {
    CoreError::CommandFailed(command.into(), status, detail.into())
}

/// Builds a layout error for `path`.
pub fn layout_error(path: impl Into<PathBuf>, source: io::Error) -> CoreError {
    CoreError::Layout {
        path: path.into(),
        source,
    }
}
