// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Structural view of one PHP compilation unit.
//!
//! A [`Unit`] owns the source text of a file together with its token stream
//! and a small amount of structure recovered from it: the namespace context,
//! the class-like declarations (classes, interfaces, traits) and the methods
//! declared directly inside their bodies.
//!
//! Everything else is answered by positional queries over the token stream
//! (`find_next`, `text_between`, `matching_close`, ...), so callers never do
//! raw index arithmetic on tokens.
//!
//! A unit is immutable after [`Unit::parse`] returns.

use std::path::{Path, PathBuf};

use tugsniff_core::text::LineIndex;
use tugsniff_core::types::Span;

use crate::tokenizer::{tokenize, Token, TokenKind, TokenizeError};

// ============================================================================
// Declarations
// ============================================================================

/// Kind of a class-like declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassLikeKind {
    Class,
    Interface,
    Trait,
}

/// A named class, interface or trait declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassLike {
    pub kind: ClassLikeKind,
    /// Index of the `class` / `interface` / `trait` keyword token.
    pub keyword: usize,
    /// Declared simple name.
    pub name: String,
    /// Index of the name token.
    pub name_token: usize,
    /// Indices of the body's `{` and matching `}`, when both exist.
    pub body: Option<(usize, usize)>,
    /// Namespace in effect at the declaration, without a leading `\`.
    pub namespace: Option<String>,
}

/// A named method declared directly in a class-like body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDecl {
    /// Simple method name as written.
    pub name: String,
    /// Index of the `function` keyword token.
    pub function_token: usize,
    /// Index of the name token.
    pub name_token: usize,
    /// Index into [`Unit::class_likes`] of the enclosing declaration.
    pub owner: usize,
}

impl MethodDecl {
    /// Whether this is the constructor (matched case-insensitively).
    pub fn is_constructor(&self) -> bool {
        self.name.eq_ignore_ascii_case("__construct")
    }
}

// ============================================================================
// Unit
// ============================================================================

/// One tokenized PHP file with its recovered structure.
#[derive(Debug)]
pub struct Unit {
    path: PathBuf,
    source: String,
    tokens: Vec<Token>,
    namespaces: Vec<(usize, String)>,
    class_likes: Vec<ClassLike>,
    methods: Vec<MethodDecl>,
    line_index: LineIndex,
}

impl Unit {
    /// Tokenize `source` and recover its declarations.
    pub fn parse(
        path: impl Into<PathBuf>,
        source: impl Into<String>,
    ) -> Result<Self, TokenizeError> {
        let source = source.into();
        let tokens = tokenize(&source)?;
        let line_index = LineIndex::new(&source);
        let mut unit = Unit {
            path: path.into(),
            source,
            tokens,
            namespaces: Vec::new(),
            class_likes: Vec::new(),
            methods: Vec::new(),
            line_index,
        };
        unit.namespaces = unit.scan_namespaces();
        unit.class_likes = unit.scan_class_likes();
        unit.methods = unit.scan_methods();
        Ok(unit)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// The first namespace declared in the file, without a leading `\`.
    pub fn namespace(&self) -> Option<&str> {
        self.namespaces.first().map(|(_, name)| name.as_str())
    }

    /// The namespace in effect at token `index`.
    pub fn namespace_at(&self, index: usize) -> Option<&str> {
        self.namespaces
            .iter()
            .take_while(|(at, _)| *at < index)
            .last()
            .map(|(_, name)| name.as_str())
    }

    /// Class, interface and trait declarations in source order.
    pub fn class_likes(&self) -> &[ClassLike] {
        &self.class_likes
    }

    /// Methods of every class-like, in source order.
    pub fn methods(&self) -> &[MethodDecl] {
        &self.methods
    }

    /// Methods declared in the class-like at `owner`.
    pub fn methods_of(&self, owner: usize) -> impl Iterator<Item = &MethodDecl> {
        self.methods.iter().filter(move |m| m.owner == owner)
    }

    /// Find a method by exact name in the class-like at `owner`.
    pub fn find_method_in(&self, owner: usize, name: &str) -> Option<&MethodDecl> {
        self.methods_of(owner).find(|m| m.name == name)
    }

    // ------------------------------------------------------------------------
    // Token queries
    // ------------------------------------------------------------------------

    pub fn kind(&self, index: usize) -> Option<TokenKind> {
        self.tokens.get(index).map(|t| t.kind)
    }

    pub fn span(&self, index: usize) -> Option<Span> {
        self.tokens.get(index).map(|t| t.span)
    }

    /// Source text of one token (empty when out of range).
    pub fn text(&self, index: usize) -> &str {
        self.tokens
            .get(index)
            .map_or("", |t| &self.source[t.span.start..t.span.end])
    }

    /// Source text strictly between tokens `after` and `before`.
    ///
    /// Empty when `before` does not come after `after` or either is out of
    /// range.
    pub fn text_between(&self, after: usize, before: usize) -> &str {
        match (self.tokens.get(after), self.tokens.get(before)) {
            (Some(a), Some(b)) if after < before => &self.source[a.span.end..b.span.start],
            _ => "",
        }
    }

    /// 1-indexed `(line, col)` of the start of token `index`.
    pub fn position(&self, index: usize) -> (u32, u32) {
        let offset = self
            .tokens
            .get(index)
            .map_or(self.source.len(), |t| t.span.start);
        self.line_index.position(offset)
    }

    /// First non-trivia token strictly after `index`.
    pub fn next_significant(&self, index: usize) -> Option<usize> {
        (index + 1..self.tokens.len()).find(|&i| !self.tokens[i].kind.is_trivia())
    }

    /// First token of `kind` at or after `from` and before `bound`
    /// (end of file when `None`).
    pub fn find_next(&self, kind: TokenKind, from: usize, bound: Option<usize>) -> Option<usize> {
        self.find_next_of(&[kind], from, bound)
    }

    /// First token whose kind is one of `kinds`, at or after `from` and
    /// before `bound`.
    pub fn find_next_of(
        &self,
        kinds: &[TokenKind],
        from: usize,
        bound: Option<usize>,
    ) -> Option<usize> {
        let end = bound.unwrap_or(self.tokens.len()).min(self.tokens.len());
        (from..end).find(|&i| kinds.contains(&self.tokens[i].kind))
    }

    /// Index of the token closing the bracket opened at `open`.
    ///
    /// Works for `{`, `(` and `[`. Returns `None` when `open` is not an
    /// opening bracket or the bracket is never closed.
    pub fn matching_close(&self, open: usize) -> Option<usize> {
        let (open_kind, close_kind) = match self.kind(open)? {
            TokenKind::OpenBrace => (TokenKind::OpenBrace, TokenKind::CloseBrace),
            TokenKind::OpenParen => (TokenKind::OpenParen, TokenKind::CloseParen),
            TokenKind::OpenBracket => (TokenKind::OpenBracket, TokenKind::CloseBracket),
            _ => return None,
        };
        let mut depth = 0usize;
        for (i, token) in self.tokens.iter().enumerate().skip(open) {
            if token.kind == open_kind {
                depth += 1;
            } else if token.kind == close_kind {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
        }
        None
    }

    /// Read a possibly qualified name starting at the first significant token
    /// at or after `from`.
    ///
    /// Returns the name as written (without whitespace) and the index of the
    /// first token after it. `None` when no name starts there.
    pub fn read_name(&self, from: usize) -> Option<(String, usize)> {
        let mut i = from;
        while self.kind(i)?.is_trivia() {
            i += 1;
        }
        let mut name = String::new();
        while let Some(kind) = self.kind(i) {
            if kind.is_word() || kind == TokenKind::NsSeparator {
                name.push_str(self.text(i));
                i += 1;
            } else {
                break;
            }
        }
        if name.is_empty() || name.ends_with('\\') {
            return None;
        }
        Some((name, i))
    }

    // ------------------------------------------------------------------------
    // Structure recovery
    // ------------------------------------------------------------------------

    fn scan_namespaces(&self) -> Vec<(usize, String)> {
        let mut namespaces = Vec::new();
        for (i, token) in self.tokens.iter().enumerate() {
            if token.kind != TokenKind::Namespace {
                continue;
            }
            // `namespace\foo()` is a relative name, not a declaration
            let Some(next) = self.next_significant(i) else {
                continue;
            };
            if self.kind(next) != Some(TokenKind::Identifier) {
                continue;
            }
            if let Some((name, _)) = self.read_name(next) {
                namespaces.push((i, name));
            }
        }
        namespaces
    }

    fn scan_class_likes(&self) -> Vec<ClassLike> {
        let mut class_likes = Vec::new();
        for (i, token) in self.tokens.iter().enumerate() {
            let kind = match token.kind {
                TokenKind::Class => ClassLikeKind::Class,
                TokenKind::Interface => ClassLikeKind::Interface,
                TokenKind::Trait => ClassLikeKind::Trait,
                _ => continue,
            };
            let Some(name_token) = self.next_significant(i) else {
                continue;
            };
            if self.kind(name_token) != Some(TokenKind::Identifier) {
                continue;
            }
            let body = self
                .find_next_of(&[TokenKind::OpenBrace, TokenKind::Semicolon], name_token, None)
                .filter(|&open| self.kind(open) == Some(TokenKind::OpenBrace))
                .and_then(|open| self.matching_close(open).map(|close| (open, close)));
            class_likes.push(ClassLike {
                kind,
                keyword: i,
                name: self.text(name_token).to_string(),
                name_token,
                body,
                namespace: self.namespace_at(i).map(str::to_string),
            });
        }
        class_likes
    }

    fn scan_methods(&self) -> Vec<MethodDecl> {
        let mut methods = Vec::new();
        for (owner, class_like) in self.class_likes.iter().enumerate() {
            let Some((open, close)) = class_like.body else {
                continue;
            };
            let mut depth = 0usize;
            for (i, token) in self.tokens.iter().enumerate().take(close).skip(open + 1) {
                match token.kind {
                    TokenKind::OpenBrace => depth += 1,
                    TokenKind::CloseBrace => depth = depth.saturating_sub(1),
                    TokenKind::Function if depth == 0 => {
                        let mut name_token = self.next_significant(i);
                        // by-reference return: `function &name()`
                        if name_token.and_then(|n| self.kind(n)) == Some(TokenKind::Ampersand) {
                            name_token = name_token.and_then(|n| self.next_significant(n));
                        }
                        let Some(name_token) = name_token else {
                            continue;
                        };
                        if self.kind(name_token) == Some(TokenKind::Identifier) {
                            methods.push(MethodDecl {
                                name: self.text(name_token).to_string(),
                                function_token: i,
                                name_token,
                                owner,
                            });
                        }
                    }
                    _ => {}
                }
            }
        }
        methods
    }
}
