//! PHP language support for tugsniff.
//!
//! This crate provides the analysis engine behind the
//! `MethodValidateReturnType` rule:
//!
//! - [`tokenizer`]: lossless PHP token stream
//! - [`unit`]: structural view of one file (namespaces, class-likes, methods)
//! - [`imports`]: top-level `use` declarations
//! - [`resolver`]: candidate names, the [`resolver::DeclarationLoader`] seam
//!   and the workspace [`resolver::NamespaceIndex`]
//! - [`inheritance`]: `extends` / `implements` name lists
//! - [`return_type`]: declared return type text
//! - [`cache`]: per-run unit arena
//! - [`rule`]: the ancestor walk and comparison
//! - [`files`]: workspace file discovery

pub mod bridges;
pub mod cache;
pub mod files;
pub mod imports;
pub mod inheritance;
pub mod resolver;
pub mod return_type;
pub mod rule;
pub mod tokenizer;
pub mod unit;
