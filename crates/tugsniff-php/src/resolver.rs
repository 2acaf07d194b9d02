//! Name resolution: from a type name as written to the file declaring it.
//!
//! Resolution is speculative. A raw name such as `Base` could have reached
//! the file through any of its imports, so [`build_candidates`] produces every
//! plausible qualification and [`NameResolver::resolve`] asks a
//! [`DeclarationLoader`] about each in order. The first candidate that maps to
//! a declaration wins.
//!
//! Candidate order:
//!
//! 1. the raw name verbatim
//! 2. `<import path>\<raw>` for every distinct import path
//! 3. `<import target><rest>` when the first segment of `raw` is an imported
//!    name or alias
//! 4. `\<namespace>\<raw>` when the raw name is not fully qualified
//!
//! The workspace implementation of the loader is [`NamespaceIndex`], built
//! once per run from every declaration in the indexed files.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{trace, warn};

use crate::cache::UnitCache;
use crate::imports::ImportTable;
use crate::unit::Unit;

// ============================================================================
// Loader Seam
// ============================================================================

/// Locates the file declaring a fully-qualified type name.
pub trait DeclarationLoader {
    /// Path of the file declaring `fqn`, or `None` when it is unknown.
    ///
    /// Implementations must ignore a leading `\` and compare names
    /// case-insensitively.
    fn locate(&self, fqn: &str) -> Option<PathBuf>;
}

/// Canonical lookup key for a type name: no leading `\`, ASCII lowercase.
pub fn normalize_fqn(name: &str) -> String {
    name.trim_start_matches('\\').to_ascii_lowercase()
}

/// Last segment of a possibly qualified name.
pub fn simple_name(name: &str) -> &str {
    name.rsplit('\\').next().unwrap_or(name)
}

// ============================================================================
// Candidates
// ============================================================================

/// Build the ordered, de-duplicated candidate names for `raw`.
pub fn build_candidates(raw: &str, imports: &ImportTable, namespace: Option<&str>) -> Vec<String> {
    let raw = raw.trim();
    let bare = raw.trim_start_matches('\\');
    let fully_qualified = raw.starts_with('\\');

    let mut candidates = vec![raw.to_string()];
    for path in imports.paths() {
        candidates.push(format!("{}\\{}", path.trim_end_matches('\\'), bare));
    }
    if !fully_qualified {
        let (head, rest) = match bare.find('\\') {
            Some(at) => (&bare[..at], &bare[at..]),
            None => (bare, ""),
        };
        for entry in imports.entries() {
            if entry.name.eq_ignore_ascii_case(head) {
                candidates.push(format!("{}{}", entry.target, rest));
            }
        }
        if let Some(ns) = namespace.map(|ns| ns.trim_matches('\\')).filter(|ns| !ns.is_empty()) {
            candidates.push(format!("\\{}\\{}", ns, bare));
        }
    }

    let mut unique: Vec<String> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if !unique.contains(&candidate) {
            unique.push(candidate);
        }
    }
    unique
}

// ============================================================================
// Resolver
// ============================================================================

/// A candidate name that resolved, with its declaring file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedType {
    /// The candidate that hit, as built.
    pub name: String,
    /// File declaring it.
    pub path: PathBuf,
}

/// Resolves candidate names through a [`DeclarationLoader`].
pub struct NameResolver<'l, L: ?Sized> {
    loader: &'l L,
}

impl<'l, L: DeclarationLoader + ?Sized> NameResolver<'l, L> {
    pub fn new(loader: &'l L) -> Self {
        NameResolver { loader }
    }

    /// Resolve the first candidate the loader knows.
    pub fn resolve(&self, candidates: &[String]) -> Option<ResolvedType> {
        for candidate in candidates {
            match self.loader.locate(candidate) {
                Some(path) => {
                    trace!("resolved {} -> {}", candidate, path.display());
                    return Some(ResolvedType {
                        name: candidate.clone(),
                        path,
                    });
                }
                None => trace!("no declaration for {}", candidate),
            }
        }
        None
    }

    /// Resolve `raw` as written in a file with `imports`, inside `namespace`.
    pub fn resolve_name(
        &self,
        raw: &str,
        imports: &ImportTable,
        namespace: Option<&str>,
    ) -> Option<ResolvedType> {
        self.resolve(&build_candidates(raw, imports, namespace))
    }
}

// ============================================================================
// Namespace Index
// ============================================================================

/// Map from fully-qualified declaration names to the files declaring them.
#[derive(Debug, Clone, Default)]
pub struct NamespaceIndex {
    declarations: HashMap<String, PathBuf>,
}

impl NamespaceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index every file in `files`, loading each through `cache`.
    ///
    /// Files that cannot be read or tokenized are skipped with a warning.
    pub fn build(files: &[PathBuf], cache: &mut UnitCache) -> Self {
        let mut index = NamespaceIndex::new();
        for path in files {
            match cache.get_or_load(path) {
                Ok(unit) => index.index_unit(&unit),
                Err(err) => warn!("skipping {} while indexing: {}", path.display(), err),
            }
        }
        index
    }

    /// Record every class-like declared in `unit`.
    pub fn index_unit(&mut self, unit: &Unit) {
        for class_like in unit.class_likes() {
            let fqn = match &class_like.namespace {
                Some(ns) => format!("{}\\{}", ns, class_like.name),
                None => class_like.name.clone(),
            };
            self.insert(&fqn, unit.path());
        }
    }

    /// Record a declaration. The first declaration of a name wins; later
    /// duplicates are reported and ignored.
    pub fn insert(&mut self, fqn: &str, path: impl Into<PathBuf>) -> bool {
        let path = path.into();
        let key = normalize_fqn(fqn);
        if let Some(existing) = self.declarations.get(&key) {
            if *existing != path {
                warn!(
                    "{} declared in both {} and {}; keeping the first",
                    fqn,
                    existing.display(),
                    path.display()
                );
            }
            return false;
        }
        self.declarations.insert(key, path);
        true
    }

    pub fn get(&self, fqn: &str) -> Option<&Path> {
        self.declarations
            .get(&normalize_fqn(fqn))
            .map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}

impl DeclarationLoader for NamespaceIndex {
    fn locate(&self, fqn: &str) -> Option<PathBuf> {
        self.get(fqn).map(Path::to_path_buf)
    }
}
