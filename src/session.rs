//! One analysis run over a workspace.
//!
//! A [`SniffSession`] walks the workspace once, builds the namespace index,
//! and owns the unit arena every check in the run shares. Each file is read
//! and tokenized at most once per session. Call [`SniffSession::clear`] (or
//! drop the session) at the end of the run; nothing is persisted.

use std::path::{Path, PathBuf};

use tracing::{info, warn};
use tugsniff_core::config::SniffConfig;
use tugsniff_core::diagnostic::Diagnostic;
use tugsniff_core::error::SniffError;
use tugsniff_php::cache::UnitCache;
use tugsniff_php::files::{collect_source_files, display_path, is_checked};
use tugsniff_php::resolver::NamespaceIndex;
use tugsniff_php::rule::ReturnTypeRule;

/// State for one analysis run.
#[derive(Debug)]
pub struct SniffSession {
    workspace_root: PathBuf,
    config: SniffConfig,
    files: Vec<PathBuf>,
    index: NamespaceIndex,
    cache: UnitCache,
}

impl SniffSession {
    /// Collect the workspace's source files and index their declarations.
    pub fn open(workspace_root: impl Into<PathBuf>, config: SniffConfig) -> Result<Self, SniffError> {
        let workspace_root = workspace_root.into();
        let files = collect_source_files(&workspace_root, &config)?;
        let mut cache = UnitCache::new();
        let index = NamespaceIndex::build(&files, &mut cache);
        info!(
            "indexed {} declarations from {} files under {}",
            index.len(),
            files.len(),
            workspace_root.display()
        );
        Ok(SniffSession {
            workspace_root,
            config,
            files,
            index,
            cache,
        })
    }

    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    pub fn config(&self) -> &SniffConfig {
        &self.config
    }

    /// Indexed source files, sorted.
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Indexed files the rule runs on, sorted. Excludes `unchecked_dirs`.
    pub fn checked_files(&self) -> Vec<PathBuf> {
        self.files
            .iter()
            .filter(|path| is_checked(&self.workspace_root, path, &self.config))
            .cloned()
            .collect()
    }

    pub fn index(&self) -> &NamespaceIndex {
        &self.index
    }

    pub fn cache(&self) -> &UnitCache {
        &self.cache
    }

    /// Resolve a user-supplied path against the workspace root.
    pub fn resolve_target(&self, path: &Path) -> Result<PathBuf, SniffError> {
        let full = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.workspace_root.join(path)
        };
        if !full.is_file() {
            return Err(SniffError::file_not_found(path.display().to_string()));
        }
        Ok(full)
    }

    /// Run the rule on one file.
    ///
    /// Fails only when the file itself cannot be read or tokenized; problems
    /// with its ancestors never fail the check.
    pub fn check_file(&mut self, path: &Path) -> Result<Vec<Diagnostic>, SniffError> {
        let path = self.resolve_target(path)?;
        let unit = self.cache.get_or_load(&path)?;
        let display = display_path(&self.workspace_root, &path);
        let mut rule = ReturnTypeRule::new(&self.index, &mut self.cache, &self.config);
        Ok(rule.check_unit(&unit, &display))
    }

    /// Run the rule on every checked file.
    ///
    /// Returns the diagnostics and the number of files checked. Files that
    /// cannot be loaded are skipped with a warning.
    pub fn check_all(&mut self) -> (Vec<Diagnostic>, usize) {
        let files = self.checked_files();
        let mut diagnostics = Vec::new();
        let mut checked = 0;
        for path in &files {
            match self.check_file(path) {
                Ok(found) => {
                    checked += 1;
                    diagnostics.extend(found);
                }
                Err(err) => warn!("skipping {}: {}", path.display(), err),
            }
        }
        (diagnostics, checked)
    }

    /// Drop every cached unit. Later checks reload files on demand.
    pub fn clear(&mut self) {
        self.cache.clear();
    }
}
