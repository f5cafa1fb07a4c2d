//! Source location tracking for tokens, parse-tree nodes and AST nodes.

use serde::Serialize;

/// Represents a span in the source code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    /// Start byte offset (inclusive).
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
}

impl Span {
    /// Creates a new span.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Returns the length of the span in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns true if the span is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Merges two spans into one that covers both.
    #[must_use]
    pub const fn merge(self, other: Self) -> Self {
        let start = if self.start < other.start {
            self.start
        } else {
            other.start
        };
        let end = if self.end > other.end {
            self.end
        } else {
            other.end
        };
        Self { start, end }
    }

    /// Returns the 1-based line and column of the span start within `source`.
    ///
    /// Columns count characters, not bytes. Offsets past the end of the
    /// source clamp to the last position.
    #[must_use]
    pub fn line_col(&self, source: &str) -> LineCol {
        let offset = self.start.min(source.len());
        let mut line = 1;
        let mut column = 1;
        for (idx, c) in source.char_indices() {
            if idx >= offset {
                break;
            }
            if c == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        LineCol { line, column }
    }
}

impl Default for Span {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

/// A 1-based line/column position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LineCol {
    /// Line number.
    pub line: usize,
    /// Column number (in characters).
    pub column: usize,
}

impl core::fmt::Display for LineCol {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_new() {
        let span = Span::new(5, 10);
        assert_eq!(span.start, 5);
        assert_eq!(span.end, 10);
    }

    #[test]
    fn test_span_len() {
        let span = Span::new(5, 10);
        assert_eq!(span.len(), 5);
    }

    #[test]
    fn test_span_is_empty() {
        let empty = Span::new(5, 5);
        let non_empty = Span::new(5, 10);
        assert!(empty.is_empty());
        assert!(!non_empty.is_empty());
    }

    #[test]
    fn test_span_merge() {
        let span1 = Span::new(5, 10);
        let span2 = Span::new(8, 15);
        let merged = span1.merge(span2);
        assert_eq!(merged.start, 5);
        assert_eq!(merged.end, 15);
    }

    #[test]
    fn test_line_col() {
        let source = "select e\nfrom Employee e\n  where";
        assert_eq!(Span::new(0, 6).line_col(source), LineCol { line: 1, column: 1 });
        assert_eq!(Span::new(9, 13).line_col(source), LineCol { line: 2, column: 1 });
        assert_eq!(Span::new(27, 32).line_col(source), LineCol { line: 3, column: 3 });
    }

    #[test]
    fn test_line_col_past_end() {
        let source = "a\nb";
        assert_eq!(Span::new(99, 99).line_col(source), LineCol { line: 2, column: 2 });
    }
}
