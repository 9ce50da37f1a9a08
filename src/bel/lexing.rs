//! Lexer
//!
//! Turns script text into logical lines of tokens.
//!
//! Structure:
//!     1. Base tokenization with logos ([base_tokenization]), keeping lexical
//!        errors in the stream with their byte ranges.
//!     2. Line grouping ([line_grouping]): tokens are split at end-of-line
//!        tokens; continuation backslashes were already skipped by the lexer,
//!        so continued statements arrive as one line.
//!
//! Context Sensitivity
//!
//!     The token set itself is context free. Bare words are classified by
//!     the parser through [mode::classify] with an explicit [LexMode], so a
//!     modifier name like `pmod` is a keyword only inside a term's argument
//!     list and an ordinary word elsewhere.

pub mod base_tokenization;
pub mod line_grouping;
pub mod mode;
pub mod tokens;

pub use base_tokenization::{tokenize, LexErrorKind};
pub use line_grouping::{group_lines, poison_offsets, LexError, LexedLine};
pub use mode::{classify, ArgumentFunction, LexMode, WordClass};
pub use tokens::Token;

/// Tokenize and group into logical lines
pub fn lex(source: &str) -> Vec<LexedLine> {
    let lines = group_lines(tokenize(source));
    tracing::trace!(lines = lines.len(), "lexed source");
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lex_document() {
        let source = "SET DOCUMENT Name = \"test\"\n\
                      DEFINE NAMESPACE HGNC AS URL \"http://example.org/hgnc.belns\"\n\
                      \n\
                      p(HGNC:IFNG) -> p(HGNC:TNF)\n";
        let lines = lex(source);
        assert_eq!(lines.len(), 3);
        assert!(lines.iter().all(|line| line.error.is_none()));
        assert_eq!(lines[2].tokens[0].0, Token::Word("p".to_string()));
    }
}
