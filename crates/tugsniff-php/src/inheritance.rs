//! Inheritance edges of a class-like declaration.
//!
//! Names are sliced out of the declaration header as written:
//!
//! ```text
//! class Child extends Base implements Foo, \Bar\Baz {
//!             ^^^^^^^^^^^^ ^^^^^^^^^^^^^^^^^^^^^^^^^
//!             superclass   interfaces
//! ```
//!
//! An interface lists its parents after `extends` and has no `implements`
//! clause. Nothing here resolves names; see [`crate::resolver`].

use crate::tokenizer::TokenKind;
use crate::unit::{ClassLike, ClassLikeKind, Unit};

/// How a parent is reached from its child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationKind {
    Extends,
    Implements,
}

impl std::fmt::Display for RelationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RelationKind::Extends => write!(f, "extends"),
            RelationKind::Implements => write!(f, "implements"),
        }
    }
}

/// Index of the unit's primary declaration: the first class, or the first
/// interface when the unit declares no class.
pub fn declaration(unit: &Unit) -> Option<usize> {
    let class_likes = unit.class_likes();
    class_likes
        .iter()
        .position(|c| c.kind == ClassLikeKind::Class)
        .or_else(|| {
            class_likes
                .iter()
                .position(|c| c.kind == ClassLikeKind::Interface)
        })
}

/// Index of the class or interface named `simple` (case-insensitive),
/// falling back to the primary declaration.
pub fn declaration_named(unit: &Unit, simple: &str) -> Option<usize> {
    unit.class_likes()
        .iter()
        .position(|c| c.kind != ClassLikeKind::Trait && c.name.eq_ignore_ascii_case(simple))
        .or_else(|| declaration(unit))
}

/// Names after `extends`, up to `implements` or the body.
///
/// At most one for a class; an interface may list several.
pub fn superclass_names(unit: &Unit, owner: usize) -> Vec<String> {
    let Some(decl) = unit.class_likes().get(owner) else {
        return Vec::new();
    };
    let Some(bound) = header_end(unit, decl) else {
        return Vec::new();
    };
    let Some(extends) = unit.find_next(TokenKind::Extends, decl.name_token, Some(bound)) else {
        return Vec::new();
    };
    let end = unit
        .find_next(TokenKind::Implements, extends, Some(bound))
        .unwrap_or(bound);
    split_names(unit.text_between(extends, end))
}

/// Names after `implements`, up to the body.
pub fn interface_names(unit: &Unit, owner: usize) -> Vec<String> {
    let Some(decl) = unit.class_likes().get(owner) else {
        return Vec::new();
    };
    let Some(bound) = header_end(unit, decl) else {
        return Vec::new();
    };
    match unit.find_next(TokenKind::Implements, decl.name_token, Some(bound)) {
        Some(implements) => split_names(unit.text_between(implements, bound)),
        None => Vec::new(),
    }
}

fn header_end(unit: &Unit, decl: &ClassLike) -> Option<usize> {
    decl.body
        .map(|(open, _)| open)
        .or_else(|| unit.find_next(TokenKind::OpenBrace, decl.name_token, None))
}

fn split_names(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}
