//! Source location tracking for diagnostics.
//!
//! # Design
//!
//! - `Span` — byte range of a node in one source file
//! - `LineIndex` — line start offsets of one source text, used to turn a
//!   span into a 1-based `(line, column)` pair when rendering diagnostics
//!
//! # Examples
//!
//! ```
//! # use balsyn_ast::foundation::span::*;
//! let source = "var x = 1;\nx + 2;";
//! let span = Span::new(0, 11, 16);
//!
//! assert_eq!(span.snippet(source), Some("x + 2"));
//! assert_eq!(LineIndex::new(source).line_col(span.start), (2, 1));
//! ```

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Compact source location reference.
///
/// Points to a byte range in a source file. Parsers build node spans from
/// the first token's start to the last consumed token's end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    /// Caller-assigned source file identifier
    pub file_id: u16,
    /// Byte offset of start position
    pub start: u32,
    /// Byte offset of end position (exclusive)
    pub end: u32,
}

impl Span {
    /// Create a new span.
    pub fn new(file_id: u16, start: u32, end: u32) -> Self {
        Self {
            file_id,
            start,
            end,
        }
    }

    /// Create a zero-length span at the start of a file.
    pub fn zero(file_id: u16) -> Self {
        Self::new(file_id, 0, 0)
    }

    /// Create a span from a lexer byte range.
    ///
    /// Offsets beyond `u32::MAX` saturate.
    pub fn from_range(file_id: u16, range: &Range<usize>) -> Self {
        let clamp = |n: usize| u32::try_from(n).unwrap_or(u32::MAX);
        Self::new(file_id, clamp(range.start), clamp(range.end))
    }

    /// Check if this span is zero-length.
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Length of this span in bytes (zero for inverted spans).
    pub fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    /// Span covering both `self` and `other`.
    ///
    /// The file id of `self` is kept.
    pub fn merge(&self, other: &Span) -> Span {
        Span {
            file_id: self.file_id,
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Byte range of this span.
    pub fn range(&self) -> Range<usize> {
        self.start as usize..self.end as usize
    }

    /// Source text covered by this span, if it lies within `source`.
    pub fn snippet<'a>(&self, source: &'a str) -> Option<&'a str> {
        source.get(self.range())
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Line start offsets of a source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    /// line_starts[0] is always 0
    line_starts: Vec<u32>,
}

impl LineIndex {
    /// Index the line starts of `source`.
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        for (i, byte) in source.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(u32::try_from(i + 1).unwrap_or(u32::MAX));
            }
        }
        Self { line_starts }
    }

    /// 1-based `(line, column)` of a byte offset.
    ///
    /// Offsets past the end of the text land on the last line.
    pub fn line_col(&self, offset: u32) -> (u32, u32) {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next.saturating_sub(1),
        };
        let line_start = self.line_starts.get(line).copied().unwrap_or(0);
        (line as u32 + 1, offset - line_start + 1)
    }

    /// Number of lines in the indexed text.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_creation() {
        let span = Span::new(0, 10, 20);
        assert_eq!(span.len(), 10);
        assert!(!span.is_empty());
        assert!(Span::zero(3).is_empty());
        assert_eq!(Span::from_range(1, &(4..9)), Span::new(1, 4, 9));
    }

    #[test]
    fn test_span_merge() {
        let a = Span::new(0, 10, 20);
        let b = Span::new(0, 15, 30);
        assert_eq!(a.merge(&b), Span::new(0, 10, 30));
        assert_eq!(b.merge(&a), Span::new(0, 10, 30));
    }

    #[test]
    fn test_snippet_out_of_bounds() {
        assert_eq!(Span::new(0, 2, 50).snippet("short"), None);
        assert_eq!(Span::new(0, 0, 5).snippet("short"), Some("short"));
    }

    #[test]
    fn test_line_index() {
        let index = LineIndex::new("ab\ncd\n\nef");
        assert_eq!(index.line_count(), 4);
        assert_eq!(index.line_col(0), (1, 1));
        assert_eq!(index.line_col(1), (1, 2));
        assert_eq!(index.line_col(3), (2, 1));
        assert_eq!(index.line_col(6), (3, 1));
        assert_eq!(index.line_col(8), (4, 2));
    }
}
