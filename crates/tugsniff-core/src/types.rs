//! Common types shared between the diagnostic, error and output modules.
//!
//! This module contains types that are used by several modules,
//! avoiding circular dependencies.

use serde::{Deserialize, Serialize};

// ============================================================================
// Span Type
// ============================================================================

/// A half-open byte range `[start, end)` into a source file.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Byte offset of the first byte.
    pub start: usize,
    /// Byte offset one past the last byte.
    pub end: usize,
}

impl Span {
    /// Create a new span.
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "span start {} > end {}", start, end);
        Span { start, end }
    }

    /// Length of the span in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the span covers no bytes.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

// ============================================================================
// Location Type
// ============================================================================

/// Location in a source file.
///
/// - `file`: Workspace-relative path (required)
/// - `line`: 1-indexed line number (required)
/// - `col`: 1-indexed column, UTF-8 bytes (required)
/// - `byte_start`: Byte offset from file start (optional)
/// - `byte_end`: Byte offset end, exclusive (optional)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Location {
    /// File path (workspace-relative).
    pub file: String,
    /// Line number (1-indexed).
    pub line: u32,
    /// Column number (1-indexed, UTF-8 bytes).
    pub col: u32,
    /// Byte offset from file start (optional).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub byte_start: Option<u64>,
    /// Byte offset end, exclusive (optional).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub byte_end: Option<u64>,
}

impl Location {
    /// Create a new location without byte offsets.
    pub fn new(file: impl Into<String>, line: u32, col: u32) -> Self {
        Location {
            file: file.into(),
            line,
            col,
            byte_start: None,
            byte_end: None,
        }
    }

    /// Create a location carrying the full byte span.
    pub fn with_span(file: impl Into<String>, line: u32, col: u32, span: Span) -> Self {
        Location {
            file: file.into(),
            line,
            col,
            byte_start: Some(span.start as u64),
            byte_end: Some(span.end as u64),
        }
    }

    /// Comparison key for deterministic sorting: (file, line, col).
    fn sort_key(&self) -> (&str, u32, u32) {
        (&self.file, self.line, self.col)
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.col)
    }
}

impl PartialOrd for Location {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Location {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_new_serializes_without_byte_offsets() {
        let loc = Location::new("src/Foo.php", 42, 8);
        let json = serde_json::to_string(&loc).unwrap();
        assert!(!json.contains("byte_start"));
        assert!(!json.contains("byte_end"));
    }

    #[test]
    fn location_with_span_serializes_byte_offsets() {
        let loc = Location::with_span("src/Foo.php", 3, 5, Span::new(40, 48));
        let json = serde_json::to_string(&loc).unwrap();
        assert!(json.contains("\"byte_start\":40"));
        assert!(json.contains("\"byte_end\":48"));
    }

    #[test]
    fn location_display() {
        assert_eq!(Location::new("a.php", 2, 9).to_string(), "a.php:2:9");
    }

    #[test]
    fn location_ordering_is_file_then_line_then_col() {
        let mut locs = vec![
            Location::new("b.php", 1, 1),
            Location::new("a.php", 10, 1),
            Location::new("a.php", 2, 7),
            Location::new("a.php", 2, 3),
        ];
        locs.sort();
        let keys: Vec<String> = locs.iter().map(|l| l.to_string()).collect();
        assert_eq!(keys, vec!["a.php:2:3", "a.php:2:7", "a.php:10:1", "b.php:1:1"]);
    }

    #[test]
    fn span_len() {
        let span = Span::new(4, 10);
        assert_eq!(span.len(), 6);
        assert!(!span.is_empty());
        assert!(Span::new(3, 3).is_empty());
    }
}
