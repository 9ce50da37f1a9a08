//! Logical line grouping
//!
//!     BEL is line oriented: every directive and statement ends at an
//!     end-of-line that is not escaped by a trailing backslash. The parser
//!     works one logical line at a time, which is also the unit of error
//!     recovery: a lexical error poisons its own line and nothing else.

use super::base_tokenization::{LexErrorKind, RawToken};
use super::tokens::Token;
use std::ops::Range;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    pub kind: LexErrorKind,
    pub range: Range<usize>,
}

/// The tokens of one logical line, without the terminating end-of-line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexedLine {
    pub tokens: Vec<(Token, Range<usize>)>,
    /// Byte range from the first to the last token
    pub range: Range<usize>,
    /// First lexical error on the line, if any
    pub error: Option<LexError>,
}

impl LexedLine {
    fn new() -> Self {
        Self {
            tokens: Vec::new(),
            range: 0..0,
            error: None,
        }
    }

    fn is_empty(&self) -> bool {
        self.tokens.is_empty() && self.error.is_none()
    }

    fn extend_range(&mut self, range: &Range<usize>) {
        if self.tokens.is_empty() && self.error.is_none() {
            self.range = range.clone();
        } else {
            self.range.end = range.end;
        }
    }

    /// A line holding nothing but a comment
    pub fn is_comment(&self) -> bool {
        matches!(self.tokens.as_slice(), [(Token::Comment(_), _)])
    }
}

/// Split a raw token stream into non-empty logical lines
pub fn group_lines(tokens: Vec<RawToken>) -> Vec<LexedLine> {
    let mut lines = Vec::new();
    let mut current = LexedLine::new();

    for (entry, range) in tokens {
        match entry {
            Ok(Token::Eol) => {
                if !current.is_empty() {
                    lines.push(std::mem::replace(&mut current, LexedLine::new()));
                }
            }
            Ok(token) => {
                current.extend_range(&range);
                current.tokens.push((token, range));
            }
            Err(kind) => {
                current.extend_range(&range);
                if current.error.is_none() {
                    current.error = Some(LexError { kind, range });
                }
            }
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

/// Mark lines containing any of `offsets` as holding undecodable bytes
pub fn poison_offsets(lines: &mut [LexedLine], offsets: &[usize]) {
    for line in lines.iter_mut() {
        if line.error.is_some() {
            continue;
        }
        if let Some(offset) = offsets
            .iter()
            .find(|offset| line.range.start <= **offset && **offset < line.range.end)
        {
            line.error = Some(LexError {
                kind: LexErrorKind::InvalidBytes,
                range: *offset..*offset + 1,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::base_tokenization::tokenize;
    use super::*;

    #[test]
    fn test_groups_by_end_of_line() {
        let lines = group_lines(tokenize("SET A = b\n\n\np(HGNC:A)\n"));
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].tokens.len(), 4);
        assert_eq!(lines[1].range, 12..21);
    }

    #[test]
    fn test_continuation_joins_lines() {
        let lines = group_lines(tokenize("p(HGNC:A) \\\n  -> p(HGNC:B)\n"));
        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn test_error_stays_on_its_line() {
        let lines = group_lines(tokenize("SET Evidence = \"open\np(HGNC:A)\n"));
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0].error.as_ref().map(|e| &e.kind),
            Some(&LexErrorKind::UnterminatedString)
        );
        assert!(lines[1].error.is_none());
    }

    #[test]
    fn test_comment_lines() {
        let lines = group_lines(tokenize("# header\np(HGNC:A) // note\n"));
        assert!(lines[0].is_comment());
        assert!(!lines[1].is_comment());
    }

    #[test]
    fn test_poison_offsets() {
        let mut lines = group_lines(tokenize("a(X:y)\na(X:z)\n"));
        poison_offsets(&mut lines, &[9]);
        assert!(lines[0].error.is_none());
        assert_eq!(
            lines[1].error.as_ref().map(|e| &e.kind),
            Some(&LexErrorKind::InvalidBytes)
        );
    }
}
