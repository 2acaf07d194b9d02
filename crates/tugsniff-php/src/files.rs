//! PHP file collection utilities.
//!
//! Provides workspace file discovery for indexing and checking.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::warn;
use tugsniff_core::config::SniffConfig;
use walkdir::WalkDir;

// ============================================================================
// Error Types
// ============================================================================

/// Error type for file operations.
#[derive(Debug, Error)]
pub enum FileError {
    /// File not found.
    #[error("file not found: {path}")]
    NotFound { path: String },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for file operations.
pub type FileResult<T> = Result<T, FileError>;

// ============================================================================
// File Collection
// ============================================================================

/// Collect source files by walking `workspace_root`.
///
/// Hidden directories and directories named in `exclude_dirs` are skipped,
/// and only files with a configured extension are returned. Paths are
/// `workspace_root` joined with the relative path, sorted for deterministic
/// output.
pub fn collect_source_files(workspace_root: &Path, config: &SniffConfig) -> FileResult<Vec<PathBuf>> {
    if !workspace_root.is_dir() {
        return Err(FileError::NotFound {
            path: workspace_root.display().to_string(),
        });
    }

    let mut files = Vec::new();
    let walker = WalkDir::new(workspace_root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| {
            // never filter the root itself, it may be `.` or a temp dir
            entry.depth() == 0 || !entry.file_type().is_dir() || {
                let name = entry.file_name().to_string_lossy();
                !name.starts_with('.') && !config.is_excluded_dir(&name)
            }
        });

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if err.depth() == 0 => return Err(io::Error::from(err).into()),
            Err(err) => {
                warn!("skipping unreadable entry: {}", err);
                continue;
            }
        };
        if entry.file_type().is_file() && config.matches_extension(entry.path()) {
            files.push(entry.into_path());
        }
    }

    files.sort();
    Ok(files)
}

/// Whether the rule runs on `path`.
///
/// Files below a directory named in `unchecked_dirs` (such as `vendor`) are
/// indexed so their declarations resolve as ancestors, but are not checked
/// themselves.
pub fn is_checked(workspace_root: &Path, path: &Path, config: &SniffConfig) -> bool {
    let relative = path.strip_prefix(workspace_root).unwrap_or(path);
    let mut dirs = relative.parent().into_iter().flat_map(Path::components);
    !dirs.any(|c| config.is_unchecked_dir(&c.as_os_str().to_string_lossy()))
}

/// Workspace-relative display form of `path`, with `/` separators.
pub fn display_path(workspace_root: &Path, path: &Path) -> String {
    path.strip_prefix(workspace_root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace(std::path::MAIN_SEPARATOR, "/")
}
