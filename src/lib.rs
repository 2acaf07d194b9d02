//! tugsniff: cross-file return type checks for PHP codebases
//!
//! Reports methods whose declared return type differs from the one declared
//! by the same method in an ancestor class or implemented interface, resolving
//! ancestors across files through the workspace's namespace declarations.

// Core infrastructure - re-exported from tugsniff-core
pub use tugsniff_core::config;
pub use tugsniff_core::diagnostic;
pub use tugsniff_core::error;
pub use tugsniff_core::output;
pub use tugsniff_core::text;
pub use tugsniff_core::types;

// Language adapter
pub use tugsniff_php as php;

// Analysis runs
pub mod session;

// Front door
pub mod cli;

// Error bridges (language-specific errors -> SniffError) live in
// `tugsniff_php::bridges` because of the orphan rule.
