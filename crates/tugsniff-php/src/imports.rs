//! Import table: the top-level `use` declarations of a unit.
//!
//! Each imported name yields one [`ImportEntry`] pairing the name visible in
//! the file (the last segment, or the alias) with the rooted path of the
//! namespace it was imported from:
//!
//! ```text
//! use Vendor\Pkg\Thing;          Thing  -> \Vendor\Pkg
//! use Vendor\Pkg\Thing as T;     T      -> \Vendor\Pkg
//! use Vendor\Pkg\{A, Sub\B};     A      -> \Vendor\Pkg
//!                                B      -> \Vendor\Pkg\Sub
//! use Global;                    Global -> \
//! ```
//!
//! `use function` and `use const` import non-type symbols and are skipped.
//! Trait uses inside class bodies and closure `use (...)` clauses are not
//! imports.

use crate::tokenizer::TokenKind;
use crate::unit::Unit;

/// One imported name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportEntry {
    /// Name visible in the importing file.
    pub name: String,
    /// Rooted namespace path the name was imported from (`\Vendor\Pkg`).
    pub path: String,
    /// Rooted name of the imported symbol itself (`\Vendor\Pkg\Thing`).
    pub target: String,
}

/// All imports of a unit, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportTable {
    entries: Vec<ImportEntry>,
}

impl ImportTable {
    /// Extract the import table of `unit`.
    pub fn extract(unit: &Unit) -> Self {
        let mut entries = Vec::new();
        for (i, token) in unit.tokens().iter().enumerate() {
            if token.kind == TokenKind::Use && is_import(unit, i) {
                parse_use_statement(unit, i, &mut entries);
            }
        }
        ImportTable { entries }
    }

    pub fn entries(&self) -> &[ImportEntry] {
        &self.entries
    }

    /// Distinct import paths in declaration order.
    pub fn paths(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            if !paths.contains(&entry.path.as_str()) {
                paths.push(&entry.path);
            }
        }
        paths
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn is_import(unit: &Unit, use_token: usize) -> bool {
    let in_body = unit.class_likes().iter().any(|c| {
        c.body
            .is_some_and(|(open, close)| open < use_token && use_token < close)
    });
    if in_body {
        return false;
    }
    // closure: `function () use ($x)`
    let next = unit.next_significant(use_token).and_then(|i| unit.kind(i));
    next != Some(TokenKind::OpenParen)
}

#[derive(Default)]
struct Clause<'u> {
    segments: Vec<&'u str>,
    alias: Option<&'u str>,
}

impl<'u> Clause<'u> {
    fn flush(&mut self, group_prefix: &[&'u str], entries: &mut Vec<ImportEntry>) {
        let clause = std::mem::take(self);
        let Some((last, parents)) = clause.segments.split_last() else {
            return;
        };
        let path_segments: Vec<&str> = group_prefix.iter().chain(parents).copied().collect();
        let path = format!("\\{}", path_segments.join("\\"));
        let target = format!("{}\\{}", path.trim_end_matches('\\'), last);
        entries.push(ImportEntry {
            name: clause.alias.unwrap_or(*last).to_string(),
            path,
            target,
        });
    }
}

fn parse_use_statement(unit: &Unit, use_token: usize, entries: &mut Vec<ImportEntry>) {
    let Some(first) = unit.next_significant(use_token) else {
        return;
    };
    if matches!(
        unit.kind(first),
        Some(TokenKind::Function | TokenKind::Const)
    ) {
        return;
    }
    let end = unit
        .find_next(TokenKind::Semicolon, first, None)
        .unwrap_or(unit.len());

    let mut group_prefix: Vec<&str> = Vec::new();
    let mut clause = Clause::default();
    let mut i = first;
    while i < end {
        let Some(kind) = unit.kind(i) else {
            break;
        };
        match kind {
            TokenKind::As => {
                if let Some(alias) = unit.next_significant(i).filter(|&a| a < end) {
                    clause.alias = Some(unit.text(alias));
                    i = alias;
                }
            }
            TokenKind::OpenBrace => {
                group_prefix = std::mem::take(&mut clause.segments);
            }
            TokenKind::Comma | TokenKind::CloseBrace => {
                clause.flush(&group_prefix, entries);
            }
            kind if kind.is_word() && clause.alias.is_none() => {
                clause.segments.push(unit.text(i));
            }
            _ => {}
        }
        i += 1;
    }
    clause.flush(&group_prefix, entries);
}
