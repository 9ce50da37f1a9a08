//! Raw tokenization with logos
//!
//! Source text becomes a flat list of tokens with byte ranges. Bytes logos
//! cannot match and quotes left open at the end of a line are kept in the
//! stream as errors so line grouping can attribute them to their line.

use super::tokens::Token;
use logos::Logos;
use std::fmt;
use std::ops::Range;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexErrorKind {
    UnterminatedString,
    InvalidCharacter(String),
    InvalidBytes,
}

impl fmt::Display for LexErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexErrorKind::UnterminatedString => write!(f, "unterminated quoted string"),
            LexErrorKind::InvalidCharacter(text) => write!(f, "unexpected character '{}'", text),
            LexErrorKind::InvalidBytes => write!(f, "invalid UTF-8 byte sequence"),
        }
    }
}

pub type RawToken = (Result<Token, LexErrorKind>, Range<usize>);

/// Tokenize source text, keeping lexical errors in place
pub fn tokenize(source: &str) -> Vec<RawToken> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        let entry = match result {
            Ok(Token::UnterminatedQuote(_)) => Err(LexErrorKind::UnterminatedString),
            Ok(token) => Ok(token),
            Err(()) => Err(LexErrorKind::InvalidCharacter(lexer.slice().to_string())),
        };
        tokens.push((entry, lexer.span()));
    }

    tokens
}
