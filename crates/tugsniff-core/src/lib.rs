//! Core infrastructure for tugsniff.
//!
//! This crate provides language-agnostic infrastructure:
//! - Error types and error codes
//! - Diagnostic records and severities
//! - Source locations and byte spans
//! - Configuration loading
//! - JSON and text output for CLI responses
//! - Text utilities for byte offset conversions

pub mod config;
pub mod diagnostic;
pub mod error;
pub mod output;
pub mod text;
pub mod types;
