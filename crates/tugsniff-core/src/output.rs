//! JSON and text output for CLI responses.
//!
//! ## Design Principles
//!
//! 1. **Status first:** Every JSON response has `status` as its first field
//! 2. **Deterministic:** Same input -> same output (diagnostics sorted by location)
//! 3. **Versioned:** Schema version in response enables forward compatibility

use std::io::{self, Write};

use serde::{Deserialize, Serialize};

use crate::diagnostic::{sort_diagnostics, Diagnostic};
use crate::error::{OutputErrorCode, SniffError};

/// Current schema version for all responses.
pub const SCHEMA_VERSION: &str = "1";

// ============================================================================
// Check Response
// ============================================================================

/// Response for the `check` command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResponse {
    /// Status: "ok".
    pub status: String,
    /// Schema version.
    pub schema_version: String,
    /// Number of files the rule ran on.
    pub files_checked: usize,
    /// All findings, sorted by location.
    pub diagnostics: Vec<Diagnostic>,
}

impl CheckResponse {
    /// Build a response, sorting diagnostics for deterministic output.
    pub fn new(files_checked: usize, mut diagnostics: Vec<Diagnostic>) -> Self {
        sort_diagnostics(&mut diagnostics);
        CheckResponse {
            status: "ok".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            files_checked,
            diagnostics,
        }
    }
}

// ============================================================================
// Error Response
// ============================================================================

/// Error information for error responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Numeric error code.
    pub code: u8,
    /// Human-readable message.
    pub message: String,
    /// Error-specific structured data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorInfo {
    /// Create from a SniffError.
    pub fn from_error(err: &SniffError) -> Self {
        let code = OutputErrorCode::from(err).code();
        let details = match err {
            SniffError::FileNotFound { path } | SniffError::Unanalyzable { path, .. } => {
                Some(serde_json::json!({ "path": path }))
            }
            _ => None,
        };
        ErrorInfo {
            code,
            message: err.to_string(),
            details,
        }
    }
}

/// Response emitted when a command fails.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Status: "error".
    pub status: String,
    /// Schema version.
    pub schema_version: String,
    /// Error details.
    pub error: ErrorInfo,
}

impl ErrorResponse {
    /// Build an error response from a SniffError.
    pub fn from_error(err: &SniffError) -> Self {
        ErrorResponse {
            status: "error".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            error: ErrorInfo::from_error(err),
        }
    }
}

// ============================================================================
// Emitters
// ============================================================================

/// Emit a response as pretty-printed JSON to a writer.
pub fn emit_response<T: Serialize>(response: &T, writer: &mut impl Write) -> io::Result<()> {
    let json = serde_json::to_string_pretty(response)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(writer, "{}", json)
}

/// Emit a check response as one compiler-style line per diagnostic.
pub fn emit_text(response: &CheckResponse, writer: &mut impl Write) -> io::Result<()> {
    for diagnostic in &response.diagnostics {
        writeln!(writer, "{}", diagnostic)?;
    }
    writeln!(
        writer,
        "{} file(s) checked, {} warning(s)",
        response.files_checked,
        response.diagnostics.len()
    )
}
