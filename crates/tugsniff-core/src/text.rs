//! Text position utilities for byte offset and line:column conversions.
//!
//! ## Coordinate Conventions
//!
//! - Lines and columns are **1-indexed** (matching editor conventions)
//! - Byte offsets are **0-indexed**
//! - Columns count bytes, matching the byte spans produced by the tokenizer

/// Convert a byte offset to 1-indexed line and column.
///
/// If `offset` exceeds content length, returns the position at end of content.
pub fn byte_offset_to_position(content: &[u8], offset: usize) -> (u32, u32) {
    let offset = offset.min(content.len());
    let mut line = 1u32;
    let mut col = 1u32;

    for &byte in &content[..offset] {
        if byte == b'\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
    }

    (line, col)
}

/// Precomputed line starts for repeated offset lookups in one file.
///
/// `byte_offset_to_position` rescans from the start of the file on every call;
/// a `LineIndex` answers each lookup with a binary search instead.
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<usize>,
    len: usize,
}

impl LineIndex {
    /// Build the index for `content`.
    pub fn new(content: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            content
                .bytes()
                .enumerate()
                .filter(|&(_, b)| b == b'\n')
                .map(|(i, _)| i + 1),
        );
        LineIndex {
            line_starts,
            len: content.len(),
        }
    }

    /// Convert a byte offset to a 1-indexed `(line, col)` pair.
    pub fn position(&self, offset: usize) -> (u32, u32) {
        let offset = offset.min(self.len);
        let line_idx = match self.line_starts.binary_search(&offset) {
            Ok(idx) => idx,
            Err(idx) => idx - 1,
        };
        let col = offset - self.line_starts[line_idx] + 1;
        ((line_idx + 1) as u32, col as u32)
    }

    /// Number of lines in the indexed content.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_to_position_simple() {
        let content = b"line1\nline2\nline3\n";
        assert_eq!(byte_offset_to_position(content, 0), (1, 1));
        assert_eq!(byte_offset_to_position(content, 3), (1, 4));
        assert_eq!(byte_offset_to_position(content, 6), (2, 1));
        assert_eq!(byte_offset_to_position(content, 14), (3, 3));
    }

    #[test]
    fn offset_beyond_content() {
        let content = b"short";
        assert_eq!(byte_offset_to_position(content, 100), (1, 6));
    }

    #[test]
    fn empty_content() {
        assert_eq!(byte_offset_to_position(b"", 0), (1, 1));
        let index = LineIndex::new("");
        assert_eq!(index.position(0), (1, 1));
        assert_eq!(index.line_count(), 1);
    }

    #[test]
    fn line_index_agrees_with_linear_scan() {
        let content = "<?php\n\nclass Foo\n{\n    public function bar(): int {}\n}\n";
        let index = LineIndex::new(content);
        for offset in 0..=content.len() {
            assert_eq!(
                index.position(offset),
                byte_offset_to_position(content.as_bytes(), offset),
                "mismatch at offset {}",
                offset
            );
        }
    }

    #[test]
    fn line_index_counts_lines() {
        let index = LineIndex::new("a\nb\nc");
        assert_eq!(index.line_count(), 3);
        assert_eq!(index.position(4), (3, 1));
    }
}
