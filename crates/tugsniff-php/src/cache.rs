//! Per-run unit arena.
//!
//! Every file the run touches (indexed, checked, or walked to as an ancestor)
//! is read and tokenized at most once and then shared as an `Rc<Unit>`.
//! The arena lives for one analysis run and is cleared explicitly at its end.
//!
//! Failed loads are not remembered; a file that could not be read is simply
//! absent from the arena.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use thiserror::Error;

use crate::tokenizer::TokenizeError;
use crate::unit::Unit;

// ============================================================================
// Error Types
// ============================================================================

/// Reasons a unit could not be produced for an ancestor walk.
#[derive(Debug, Error)]
pub enum UnitLoadError {
    /// The file could not be read.
    #[error("IO error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file could not be tokenized.
    #[error("cannot tokenize {}: {source}", .path.display())]
    Tokenize {
        path: PathBuf,
        #[source]
        source: TokenizeError,
    },

    /// The walk reached a declaration it had already visited.
    #[error("circular inheritance through {}", .0.display())]
    CircularInheritance(PathBuf),

    /// The walk followed more ancestors than allowed.
    #[error("maximum ancestor depth ({0}) exceeded")]
    DepthExceeded(usize),
}

/// Result type for unit loading.
pub type UnitLoadResult<T> = Result<T, UnitLoadError>;

// ============================================================================
// Unit Cache
// ============================================================================

/// Arena of parsed units keyed by file path.
#[derive(Debug, Default)]
pub struct UnitCache {
    units: HashMap<PathBuf, Rc<Unit>>,
}

impl UnitCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the unit for `path`, reading and tokenizing it on first use.
    pub fn get_or_load(&mut self, path: &Path) -> UnitLoadResult<Rc<Unit>> {
        if let Some(unit) = self.units.get(path) {
            return Ok(Rc::clone(unit));
        }

        let bytes = fs::read(path).map_err(|source| UnitLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        // non-UTF-8 bytes become U+FFFD
        let source = String::from_utf8(bytes)
            .unwrap_or_else(|err| String::from_utf8_lossy(err.as_bytes()).into_owned());
        let unit = Unit::parse(path, source).map_err(|source| UnitLoadError::Tokenize {
            path: path.to_path_buf(),
            source,
        })?;

        let unit = Rc::new(unit);
        self.units.insert(path.to_path_buf(), Rc::clone(&unit));
        Ok(unit)
    }

    /// Add an already parsed unit, replacing any unit cached for its path.
    pub fn insert(&mut self, unit: Unit) -> Rc<Unit> {
        let unit = Rc::new(unit);
        self.units
            .insert(unit.path().to_path_buf(), Rc::clone(&unit));
        unit
    }

    pub fn get(&self, path: &Path) -> Option<Rc<Unit>> {
        self.units.get(path).cloned()
    }

    /// Check if a file is currently cached.
    pub fn is_cached(&self, path: &Path) -> bool {
        self.units.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Drop every cached unit.
    pub fn clear(&mut self) {
        self.units.clear();
    }
}
