//! Error types and error code constants for tugsniff.
//!
//! This module provides a unified error type (`SniffError`) that bridges
//! domain-specific errors from different subsystems (file collection,
//! configuration, unit loading) into a common format suitable for JSON output.
//!
//! ## Error Code Mapping
//!
//! - `2`: Invalid arguments (bad input from caller)
//! - `3`: Resolution errors (file not found, unreadable target)
//! - `4`: Configuration errors (unreadable or malformed config file)
//! - `10`: Internal errors (bugs, unexpected state)
//!
//! Findings in the analyzed code are never errors. They are diagnostics,
//! see [`crate::diagnostic`].

use std::fmt;

use thiserror::Error;

// ============================================================================
// Output Error Codes
// ============================================================================

/// Error codes for JSON output.
///
/// These codes map to CLI exit codes and appear in JSON error responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OutputErrorCode {
    /// Invalid arguments from caller (bad input, malformed request).
    InvalidArguments = 2,
    /// Resolution errors (file not found, unreadable target).
    ResolutionError = 3,
    /// Configuration errors.
    ConfigError = 4,
    /// Internal errors (bugs, unexpected state).
    InternalError = 10,
}

impl OutputErrorCode {
    /// Get the numeric code value.
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for OutputErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ============================================================================
// Unified Error Type
// ============================================================================

/// Unified error type for CLI output.
///
/// This is the canonical error type that all subsystem errors are converted to
/// before being rendered as JSON output.
#[derive(Debug, Error)]
pub enum SniffError {
    /// Invalid arguments from caller.
    #[error("invalid arguments: {message}")]
    InvalidArguments { message: String },

    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound { path: String },

    /// A file that was explicitly requested could not be read or tokenized.
    #[error("cannot analyze {path}: {reason}")]
    Unanalyzable { path: String, reason: String },

    /// Configuration file could not be read or parsed.
    #[error("config error: {message}")]
    Config { message: String },

    /// Internal error (bug or unexpected state).
    #[error("internal error: {message}")]
    InternalError { message: String },
}

// ============================================================================
// Error Code Mapping
// ============================================================================

impl From<&SniffError> for OutputErrorCode {
    fn from(err: &SniffError) -> Self {
        match err {
            SniffError::InvalidArguments { .. } => OutputErrorCode::InvalidArguments,
            SniffError::FileNotFound { .. } => OutputErrorCode::ResolutionError,
            SniffError::Unanalyzable { .. } => OutputErrorCode::ResolutionError,
            SniffError::Config { .. } => OutputErrorCode::ConfigError,
            SniffError::InternalError { .. } => OutputErrorCode::InternalError,
        }
    }
}

impl From<SniffError> for OutputErrorCode {
    fn from(err: SniffError) -> Self {
        OutputErrorCode::from(&err)
    }
}

// ============================================================================
// Convenience Constructors
// ============================================================================

impl SniffError {
    /// Create an invalid arguments error.
    pub fn invalid_args(message: impl Into<String>) -> Self {
        SniffError::InvalidArguments {
            message: message.into(),
        }
    }

    /// Create a file not found error.
    pub fn file_not_found(path: impl Into<String>) -> Self {
        SniffError::FileNotFound { path: path.into() }
    }

    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        SniffError::Config {
            message: message.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        SniffError::InternalError {
            message: message.into(),
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> OutputErrorCode {
        OutputErrorCode::from(self)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    mod error_code_mapping {
        use super::*;

        #[test]
        fn file_not_found_maps_to_resolution_error() {
            let err = SniffError::file_not_found("src/Missing.php");
            assert_eq!(
                OutputErrorCode::from(&err),
                OutputErrorCode::ResolutionError
            );
            assert_eq!(err.error_code().code(), 3);
        }

        #[test]
        fn unanalyzable_maps_to_resolution_error() {
            let err = SniffError::Unanalyzable {
                path: "a.php".to_string(),
                reason: "unterminated string".to_string(),
            };
            assert_eq!(err.error_code(), OutputErrorCode::ResolutionError);
        }

        #[test]
        fn invalid_arguments_maps_to_invalid_arguments() {
            let err = SniffError::invalid_args("unknown format");
            assert_eq!(err.error_code().code(), 2);
        }

        #[test]
        fn config_maps_to_config_error() {
            let err = SniffError::config("bad toml");
            assert_eq!(err.error_code().code(), 4);
        }

        #[test]
        fn internal_error_maps_to_internal_error() {
            let err = SniffError::internal("unexpected state");
            assert_eq!(err.error_code().code(), 10);
        }
    }

    mod error_display {
        use super::*;

        #[test]
        fn file_not_found_display() {
            let err = SniffError::file_not_found("src/Foo.php");
            assert_eq!(err.to_string(), "file not found: src/Foo.php");
        }

        #[test]
        fn unanalyzable_display() {
            let err = SniffError::Unanalyzable {
                path: "a.php".to_string(),
                reason: "unterminated comment".to_string(),
            };
            assert_eq!(err.to_string(), "cannot analyze a.php: unterminated comment");
        }

        #[test]
        fn output_code_display_shows_number() {
            assert_eq!(format!("{}", OutputErrorCode::InvalidArguments), "2");
            assert_eq!(format!("{}", OutputErrorCode::InternalError), "10");
        }
    }
}
