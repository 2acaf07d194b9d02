//! The `MethodValidateReturnType` rule.
//!
//! For every method of a class-like (constructors excepted) the rule looks for
//! a same-named method in the declaration's ancestors and compares the two
//! declared return types as text. An ancestor without a return type only
//! conflicts when `compare_untyped_ancestors` is set.
//!
//! # Walk Order
//!
//! 1. **Extends**: follow the single superclass chain. The first ancestor that
//!    declares the method decides the outcome for this chain.
//! 2. **Implements**: check the direct members of every implemented interface
//!    first, then walk the `extends` list of each interface that did not
//!    declare the method, level by level.
//!
//! An interface has no superclass chain; its own `extends` list is walked as
//! an interface chain. Trait methods have no ancestors.
//!
//! The first conflict wins, so a method gets at most one diagnostic.
//!
//! # Insufficient Evidence
//!
//! Unresolvable names, unreadable or untokenizable ancestors, cycles and
//! walks deeper than `max_ancestor_depth` end the branch. They are logged
//! and never reported.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use tracing::{debug, trace};
use tugsniff_core::config::SniffConfig;
use tugsniff_core::diagnostic::Diagnostic;
use tugsniff_core::types::Location;

use crate::cache::{UnitCache, UnitLoadError, UnitLoadResult};
use crate::imports::ImportTable;
use crate::inheritance::{declaration_named, interface_names, superclass_names, RelationKind};
use crate::resolver::{simple_name, DeclarationLoader, NameResolver};
use crate::return_type::return_type;
use crate::unit::{ClassLikeKind, MethodDecl, Unit};

/// Rule code attached to every diagnostic.
pub const RULE_CODE: &str = "MethodValidateReturnType";

/// Message attached to every diagnostic.
pub const RULE_MESSAGE: &str = "The return method type must be compatible with parent return type.";

// ============================================================================
// Findings
// ============================================================================

/// An ancestor declaring the method with a different return type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    /// Method name.
    pub method: String,
    /// Return type declared by the method under analysis.
    pub own_type: String,
    /// Return type declared by the ancestor.
    pub ancestor_type: String,
    /// Resolved name of the ancestor.
    pub ancestor: String,
    /// File declaring the ancestor.
    pub ancestor_path: PathBuf,
    /// Chain the ancestor was found on.
    pub relation: RelationKind,
}

/// A loaded ancestor declaration.
struct Ancestor {
    unit: Rc<Unit>,
    owner: usize,
    name: String,
}

// ============================================================================
// Walk State
// ============================================================================

/// Declarations already visited by one walk, plus its depth bound.
///
/// Depth counts inheritance steps from the declaration under analysis, so
/// direct parents sit at depth 1 however many siblings they have.
struct AncestorWalk {
    visited: HashSet<(PathBuf, usize)>,
    max_depth: usize,
}

impl AncestorWalk {
    fn new(origin: &Unit, owner: usize, max_depth: usize) -> Self {
        let mut visited = HashSet::new();
        visited.insert((origin.path().to_path_buf(), owner));
        AncestorWalk { visited, max_depth }
    }

    fn enter(&mut self, path: &Path, owner: usize, depth: usize) -> UnitLoadResult<()> {
        let key = (path.to_path_buf(), owner);
        if self.visited.contains(&key) {
            return Err(UnitLoadError::CircularInheritance(key.0));
        }
        if depth > self.max_depth {
            return Err(UnitLoadError::DepthExceeded(self.max_depth));
        }
        self.visited.insert(key);
        Ok(())
    }
}

// ============================================================================
// Rule
// ============================================================================

/// Checks method return types against ancestor declarations.
pub struct ReturnTypeRule<'a, L: ?Sized> {
    resolver: NameResolver<'a, L>,
    cache: &'a mut UnitCache,
    config: &'a SniffConfig,
}

impl<'a, L: DeclarationLoader + ?Sized> ReturnTypeRule<'a, L> {
    pub fn new(loader: &'a L, cache: &'a mut UnitCache, config: &'a SniffConfig) -> Self {
        ReturnTypeRule {
            resolver: NameResolver::new(loader),
            cache,
            config,
        }
    }

    /// Check every method of `unit`, reporting under `display_path`.
    pub fn check_unit(&mut self, unit: &Unit, display_path: &str) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        for method in unit.methods() {
            let Some(conflict) = self.check_method(unit, method) else {
                continue;
            };
            debug!(
                "{}: {}() returns `{}` but {} {} declares `{}`",
                display_path,
                conflict.method,
                conflict.own_type,
                conflict.relation,
                conflict.ancestor,
                conflict.ancestor_type
            );
            let (line, col) = unit.position(method.function_token);
            let span = unit.span(method.function_token).unwrap_or_default();
            diagnostics.push(Diagnostic::warning(
                Location::with_span(display_path, line, col, span),
                RULE_CODE,
                RULE_MESSAGE,
            ));
        }
        diagnostics
    }

    /// Find the first conflicting ancestor declaration of `method`.
    pub fn check_method(&mut self, unit: &Unit, method: &MethodDecl) -> Option<Conflict> {
        if method.is_constructor() {
            return None;
        }
        let own = return_type(unit, method.function_token);
        let owner = method.owner;
        match unit.class_likes().get(owner)?.kind {
            ClassLikeKind::Class => {
                if let Some(conflict) = self.compare_extends(unit, owner, &method.name, &own) {
                    return Some(conflict);
                }
                let interfaces = interface_names(unit, owner);
                self.compare_interfaces(unit, owner, interfaces, &method.name, &own, RelationKind::Implements)
            }
            ClassLikeKind::Interface => {
                let parents = superclass_names(unit, owner);
                self.compare_interfaces(unit, owner, parents, &method.name, &own, RelationKind::Extends)
            }
            ClassLikeKind::Trait => None,
        }
    }

    fn compare_extends(
        &mut self,
        unit: &Unit,
        owner: usize,
        method: &str,
        own: &str,
    ) -> Option<Conflict> {
        let mut walk = AncestorWalk::new(unit, owner, self.config.max_ancestor_depth);
        let mut names = superclass_names(unit, owner);
        let mut current: Option<Ancestor> = None;
        for depth in 1.. {
            let raw = names.into_iter().next()?;
            let (scope, scope_owner) = match &current {
                Some(ancestor) => (&*ancestor.unit, ancestor.owner),
                None => (unit, owner),
            };
            let imports = ImportTable::extract(scope);
            let ancestor = self.load_ancestor(&raw, scope, scope_owner, &imports, &mut walk, depth)?;
            if let Some(found) = ancestor.unit.find_method_in(ancestor.owner, method) {
                return self.compare(own, method, &ancestor, found, RelationKind::Extends);
            }
            names = superclass_names(&ancestor.unit, ancestor.owner);
            current = Some(ancestor);
        }
        None
    }

    fn compare_interfaces(
        &mut self,
        unit: &Unit,
        owner: usize,
        names: Vec<String>,
        method: &str,
        own: &str,
        relation: RelationKind,
    ) -> Option<Conflict> {
        if names.is_empty() {
            return None;
        }
        let mut walk = AncestorWalk::new(unit, owner, self.config.max_ancestor_depth);
        let level = self.load_all(&names, unit, owner, &mut walk, 1);
        self.compare_interface_level(level, 1, method, own, relation, &mut walk)
    }

    fn compare_interface_level(
        &mut self,
        level: Vec<Ancestor>,
        depth: usize,
        method: &str,
        own: &str,
        relation: RelationKind,
        walk: &mut AncestorWalk,
    ) -> Option<Conflict> {
        let mut pending = Vec::new();
        for ancestor in level {
            match ancestor.unit.find_method_in(ancestor.owner, method) {
                Some(found) => {
                    if let Some(conflict) = self.compare(own, method, &ancestor, found, relation) {
                        return Some(conflict);
                    }
                }
                None => pending.push(ancestor),
            }
        }
        for ancestor in pending {
            let names = superclass_names(&ancestor.unit, ancestor.owner);
            if names.is_empty() {
                continue;
            }
            let parents = self.load_all(&names, &ancestor.unit, ancestor.owner, walk, depth + 1);
            if let Some(conflict) =
                self.compare_interface_level(parents, depth + 1, method, own, relation, walk)
            {
                return Some(conflict);
            }
        }
        None
    }

    fn compare(
        &self,
        own: &str,
        method: &str,
        ancestor: &Ancestor,
        found: &MethodDecl,
        relation: RelationKind,
    ) -> Option<Conflict> {
        let ancestor_type = return_type(&ancestor.unit, found.function_token);
        if ancestor_type == own {
            return None;
        }
        if ancestor_type.is_empty() && !self.config.compare_untyped_ancestors {
            trace!("{} declares {}() untyped; not compared", ancestor.name, method);
            return None;
        }
        Some(Conflict {
            method: method.to_string(),
            own_type: own.to_string(),
            ancestor_type,
            ancestor: ancestor.name.clone(),
            ancestor_path: ancestor.unit.path().to_path_buf(),
            relation,
        })
    }

    fn load_all(
        &mut self,
        names: &[String],
        scope: &Unit,
        scope_owner: usize,
        walk: &mut AncestorWalk,
        depth: usize,
    ) -> Vec<Ancestor> {
        let imports = ImportTable::extract(scope);
        names
            .iter()
            .filter_map(|raw| self.load_ancestor(raw, scope, scope_owner, &imports, &mut *walk, depth))
            .collect()
    }

    /// Resolve `raw` as written in `scope` and load its declaration.
    fn load_ancestor(
        &mut self,
        raw: &str,
        scope: &Unit,
        scope_owner: usize,
        imports: &ImportTable,
        walk: &mut AncestorWalk,
        depth: usize,
    ) -> Option<Ancestor> {
        let namespace = scope
            .class_likes()
            .get(scope_owner)
            .and_then(|c| c.namespace.as_deref());
        let Some(resolved) = self.resolver.resolve_name(raw, imports, namespace) else {
            trace!("{} does not resolve from {}", raw, scope.path().display());
            return None;
        };
        let unit = match self.cache.get_or_load(&resolved.path) {
            Ok(unit) => unit,
            Err(err) => {
                debug!("abandoning {}: {}", resolved.name, err);
                return None;
            }
        };
        let Some(owner) = declaration_named(&unit, simple_name(&resolved.name)) else {
            debug!(
                "abandoning {}: {} declares no class or interface",
                resolved.name,
                resolved.path.display()
            );
            return None;
        };
        if let Err(err) = walk.enter(&resolved.path, owner, depth) {
            debug!("abandoning {}: {}", resolved.name, err);
            return None;
        }
        Some(Ancestor {
            unit,
            owner,
            name: resolved.name,
        })
    }
}
