//! Error bridge implementations for language-specific errors.
//!
//! This module provides `impl From<X> for SniffError` conversions from the
//! PHP crate's error types to the unified `SniffError` type.
//!
//! These bridges live in this crate rather than `tugsniff-core` because
//! they depend on language-specific types that are not part of core (and the
//! orphan rule requires the impls to sit next to those types).

use tugsniff_core::error::SniffError;
use crate::cache::UnitLoadError;
use crate::files::FileError;

// ============================================================================
// Bridge: FileError -> SniffError
// ============================================================================

impl From<FileError> for SniffError {
    fn from(err: FileError) -> Self {
        match err {
            FileError::NotFound { path } => SniffError::FileNotFound { path },
            FileError::Io(e) => SniffError::internal(format!("IO error: {}", e)),
        }
    }
}

// ============================================================================
// Bridge: UnitLoadError -> SniffError
// ============================================================================

impl From<UnitLoadError> for SniffError {
    fn from(err: UnitLoadError) -> Self {
        match err {
            UnitLoadError::Io { path, source } if source.kind() == std::io::ErrorKind::NotFound => {
                SniffError::file_not_found(path.display().to_string())
            }
            UnitLoadError::Io { path, source } => SniffError::Unanalyzable {
                path: path.display().to_string(),
                reason: source.to_string(),
            },
            UnitLoadError::Tokenize { path, source } => SniffError::Unanalyzable {
                path: path.display().to_string(),
                reason: source.to_string(),
            },
            // only produced by ancestor walks, which never surface errors
            err @ (UnitLoadError::CircularInheritance(_) | UnitLoadError::DepthExceeded(_)) => {
                SniffError::internal(err.to_string())
            }
        }
    }
}
