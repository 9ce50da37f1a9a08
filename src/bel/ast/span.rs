//! Line/column positions
//!
//! The lexer and parser work in byte ranges; diagnostics report 1-based
//! lines and columns. [LineIndex] maps one to the other.

use serde::Serialize;
use std::fmt;

/// A 1-based line/column position in the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Byte offsets of every line start in one document
#[derive(Debug, Clone)]
pub struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(offset, _)| offset + 1))
            .collect();
        Self { starts }
    }

    /// Position of byte `offset`. Columns count bytes from the line start.
    pub fn position(&self, offset: usize) -> Position {
        let line = self.starts.partition_point(|start| *start <= offset).max(1);
        Position::new(line, offset - self.starts[line - 1] + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positions() {
        let index = LineIndex::new("SET A = 1\np(X:y)\n\nq");
        assert_eq!(index.position(0), Position::new(1, 1));
        assert_eq!(index.position(9), Position::new(1, 10));
        assert_eq!(index.position(10), Position::new(2, 1));
        assert_eq!(index.position(12), Position::new(2, 3));
        assert_eq!(index.position(17), Position::new(3, 1));
        assert_eq!(index.position(18), Position::new(4, 1));
    }

    #[test]
    fn test_offset_past_end_stays_on_last_line() {
        let index = LineIndex::new("ab\ncd");
        assert_eq!(index.position(5), Position::new(2, 3));
        assert_eq!(LineIndex::new("").position(0), Position::new(1, 1));
    }
}
