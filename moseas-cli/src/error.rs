// ============================================================================
// moseas-cli/src/error.rs
// ============================================================================
//
// CLI ERROR HANDLING: Error types and utilities for the CLI
//
// This module provides error handling utilities for the CLI that integrate
// with the moseas-core error types while adding CLI-specific error contexts.
//
// KEY COMPONENTS:
// - CliResult: Type alias for CLI operations
// - CliErrorContext: context extension for fallible I/O results
// - suggestion_for: hints printed below fatal errors

use moseas_core::{CoreError, CoreResult};

use std::fmt;

// ============================================================================
// RESULT TYPE ALIAS
// ============================================================================

/// Type alias for CLI results using CoreError.
pub type CliResult<T> = CoreResult<T>;

// ============================================================================
// ERROR CONVERSION UTILITIES
// ============================================================================

/// Extension trait attaching a CLI-level description to a failed operation.
///
/// The wrapped error becomes a `CoreError::OperationFailed` whose message is
/// `"<context>: <original error>"`.
pub trait CliErrorContext<T> {
    /// Add context built lazily, only on the error path.
    fn cli_with_context<C, F>(self, f: F) -> CliResult<T>
    where
        C: fmt::Display,
        F: FnOnce() -> C;
}

impl<T, E> CliErrorContext<T> for Result<T, E>
where
    E: Into<CoreError>,
{
    fn cli_with_context<C, F>(self, f: F) -> CliResult<T>
    where
        C: fmt::Display,
        F: FnOnce() -> C,
    {
        self.map_err(|e| {
            let core_error: CoreError = e.into();
            CoreError::OperationFailed(format!("{}: {}", f(), core_error))
        })
    }
}

/// Suggestion shown below a fatal error, when one helps.
pub fn suggestion_for(error: &CoreError) -> Option<&'static str> {
    match error {
        CoreError::InvalidFilename(_) => Some(
            "Every file in the source directory must be named <11-character YouTube id>.mp4; \
             move other files elsewhere",
        ),
        CoreError::SourceNotFound(_) => Some("Check the SOURCE_DIR argument"),
        CoreError::Layout { .. } => Some("Check permissions on the destination directory"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::path::PathBuf;

    #[test]
    fn test_result_with_context() {
        let result: Result<(), io::Error> = Err(io::Error::new(io::ErrorKind::NotFound, "gone"));
        let err = result
            .cli_with_context(|| format!("Failed to write report '{}'", "report.json"))
            .unwrap_err();
        assert!(matches!(err, CoreError::OperationFailed(_)));
        assert!(err.to_string().starts_with("Failed to write report 'report.json': "));
        assert!(err.to_string().contains("gone"));
    }

    #[test]
    fn test_context_not_built_on_success() {
        let ok: Result<u8, io::Error> = Ok(3);
        let value = ok
            .cli_with_context(|| -> String { panic!("context must stay lazy") })
            .unwrap();
        assert_eq!(value, 3);
    }

    #[test]
    fn test_suggestions() {
        assert!(suggestion_for(&CoreError::InvalidFilename("x.mp4".into())).is_some());
        assert!(suggestion_for(&CoreError::SourceNotFound(PathBuf::from("raw"))).is_some());
        assert!(suggestion_for(&CoreError::Config("jobs".into())).is_none());
    }
}
