//! Configuration handling for tugsniff

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::SniffError;

/// Directory holding project-level tugsniff state.
pub const CONFIG_DIR: &str = ".tugsniff";

/// Config file name inside [`CONFIG_DIR`].
pub const CONFIG_FILE: &str = "config.toml";

/// Tugsniff configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Sniff settings
    #[serde(default)]
    pub sniff: SniffConfig,
}

/// Settings for indexing and the return type rule
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SniffConfig {
    /// File extensions that are indexed and checked
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Directory names skipped while walking the workspace
    #[serde(default = "default_exclude_dirs")]
    pub exclude_dirs: Vec<String>,

    /// Directory names whose files are indexed as ancestors but never checked
    #[serde(default = "default_unchecked_dirs")]
    pub unchecked_dirs: Vec<String>,

    /// Report a conflict when the ancestor method has no return type
    /// but the overriding method declares one (off by default)
    #[serde(default = "default_compare_untyped_ancestors")]
    pub compare_untyped_ancestors: bool,

    /// Maximum inheritance depth followed from the class under analysis
    #[serde(default = "default_max_ancestor_depth")]
    pub max_ancestor_depth: usize,
}

fn default_extensions() -> Vec<String> {
    vec!["php".to_string(), "inc".to_string()]
}

fn default_exclude_dirs() -> Vec<String> {
    vec!["node_modules".to_string(), ".git".to_string()]
}

fn default_unchecked_dirs() -> Vec<String> {
    vec!["vendor".to_string()]
}

fn default_compare_untyped_ancestors() -> bool {
    false
}

fn default_max_ancestor_depth() -> usize {
    32
}

impl Default for SniffConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            exclude_dirs: default_exclude_dirs(),
            unchecked_dirs: default_unchecked_dirs(),
            compare_untyped_ancestors: default_compare_untyped_ancestors(),
            max_ancestor_depth: default_max_ancestor_depth(),
        }
    }
}

impl SniffConfig {
    /// Whether a path has one of the configured extensions.
    pub fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
    }

    /// Whether a directory name is excluded from walking.
    pub fn is_excluded_dir(&self, name: &str) -> bool {
        self.exclude_dirs.iter().any(|d| d == name)
    }

    /// Whether files under a directory of this name are left unchecked.
    pub fn is_unchecked_dir(&self, name: &str) -> bool {
        self.unchecked_dirs.iter().any(|d| d == name)
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, SniffError> {
        let content = fs::read_to_string(path)
            .map_err(|e| SniffError::config(format!("failed to read config file: {}", e)))?;
        toml::from_str(&content)
            .map_err(|e| SniffError::config(format!("failed to parse config file: {}", e)))
    }

    /// Load configuration from .tugsniff/config.toml in the given workspace root
    pub fn load_from_workspace(workspace_root: &Path) -> Result<Self, SniffError> {
        let config_path = workspace_root.join(CONFIG_DIR).join(CONFIG_FILE);
        if config_path.exists() {
            Self::load(&config_path)
        } else {
            Ok(Config::default())
        }
    }
}
