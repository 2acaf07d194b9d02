//! CLI front door helpers.
//!
//! Provides the pieces `main.rs` wires together for `tugsniff check`:
//! configuration lookup and running the rule over the requested paths.
//!
//! All functions return `Result<T, SniffError>`, so failures carry stable
//! error codes for JSON output.

use std::path::{Path, PathBuf};

use tracing::warn;
use tugsniff_core::config::Config;
use tugsniff_core::error::SniffError;
use tugsniff_core::output::CheckResponse;

use crate::session::SniffSession;

/// Load configuration from an explicit file, or from the workspace default
/// location when none is given.
pub fn load_config(workspace_root: &Path, explicit: Option<&Path>) -> Result<Config, SniffError> {
    match explicit {
        Some(path) => {
            if !path.is_file() {
                return Err(SniffError::config(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            Config::load(path)
        }
        None => Config::load_from_workspace(workspace_root),
    }
}

/// Run the rule on `paths`, or on every checked file when `paths` is empty.
///
/// A path naming a directory checks the checked files under it; files among
/// those that cannot be loaded are skipped. A path naming a file is checked
/// even inside an unchecked directory, and must be loadable, otherwise the
/// whole command fails.
pub fn run_check(session: &mut SniffSession, paths: &[PathBuf]) -> Result<CheckResponse, SniffError> {
    if paths.is_empty() {
        let (diagnostics, checked) = session.check_all();
        return Ok(CheckResponse::new(checked, diagnostics));
    }

    let mut diagnostics = Vec::new();
    let mut checked = 0;
    for path in paths {
        let full = if path.is_absolute() {
            path.clone()
        } else {
            session.workspace_root().join(path)
        };
        if full.is_dir() {
            let under: Vec<PathBuf> = session
                .checked_files()
                .into_iter()
                .filter(|f| f.starts_with(&full))
                .collect();
            for file in under {
                match session.check_file(&file) {
                    Ok(found) => {
                        checked += 1;
                        diagnostics.extend(found);
                    }
                    Err(err) => warn!("skipping {}: {}", file.display(), err),
                }
            }
        } else {
            diagnostics.extend(session.check_file(path)?);
            checked += 1;
        }
    }
    Ok(CheckResponse::new(checked, diagnostics))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;
    use tugsniff_core::config::{CONFIG_DIR, CONFIG_FILE};

    fn workspace(files: &[(&str, &str)]) -> TempDir {
        let temp = TempDir::new().unwrap();
        for (rel, content) in files {
            let path = temp.path().join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
        temp
    }

    #[test]
    fn test_load_config_explicit_missing_is_config_error() {
        let temp = TempDir::new().unwrap();
        let err = load_config(temp.path(), Some(&temp.path().join("none.toml"))).unwrap_err();
        assert!(matches!(err, SniffError::Config { .. }));
    }

    #[test]
    fn test_load_config_from_workspace() {
        let rel = format!("{}/{}", CONFIG_DIR, CONFIG_FILE);
        let temp = workspace(&[(rel.as_str(), "[sniff]\ncompare_untyped_ancestors = true\n")]);
        let config = load_config(temp.path(), None).unwrap();
        assert!(config.sniff.compare_untyped_ancestors);
    }

    #[test]
    fn test_run_check_directory_and_file_paths() {
        let temp = workspace(&[
            ("lib/Base.php", "<?php class Base { function m(): int {} }"),
            ("app/One.php", "<?php class One extends Base { function m() {} }"),
            ("app/Two.php", "<?php class Two extends Base { function m(): int {} }"),
        ]);
        let config = load_config(temp.path(), None).unwrap();
        let mut session = SniffSession::open(temp.path(), config.sniff).unwrap();

        let response = run_check(&mut session, &[PathBuf::from("app")]).unwrap();
        assert_eq!(response.files_checked, 2);
        assert_eq!(response.diagnostics.len(), 1);
        assert_eq!(response.diagnostics[0].location.file, "app/One.php");

        let response = run_check(&mut session, &[PathBuf::from("app/Two.php")]).unwrap();
        assert_eq!(response.files_checked, 1);
        assert!(response.diagnostics.is_empty());
    }

    #[test]
    fn test_run_check_missing_file_fails() {
        let temp = workspace(&[("A.php", "<?php class A {}")]);
        let mut session = SniffSession::open(temp.path(), Default::default()).unwrap();
        let err = run_check(&mut session, &[PathBuf::from("Missing.php")]).unwrap_err();
        assert_eq!(err.error_code().code(), 3);
    }
}
