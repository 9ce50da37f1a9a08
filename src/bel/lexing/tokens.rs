//! Token definitions for BEL scripts
//!
//!     Keywords are exact, case-sensitive tokens. Everything else that is not
//!     punctuation, a relation operator, a quoted string or a comment lexes
//!     as a [Token::Word]; whether a word names a function, a modifier or a
//!     relation is decided later by [LexMode](super::mode::LexMode).
//!
//!     Whitespace and backslash-newline continuations are skipped, so a
//!     statement split over several physical lines reads as one logical line.

use logos::Logos;
use std::fmt;

#[derive(Logos, Debug, PartialEq, Eq, Hash, Clone)]
#[logos(skip r"([ \t\f]|\\\r?\n)+")]
pub enum Token {
    // Directive keywords
    #[token("DEFINE")]
    Define,
    #[token("NAMESPACE")]
    Namespace,
    #[token("ANNOTATION")]
    Annotation,
    #[token("SET")]
    Set,
    #[token("UNSET")]
    Unset,
    #[token("DOCUMENT")]
    Document,
    #[token("AS")]
    As,
    #[token("STATEMENT_GROUP")]
    StatementGroup,
    #[token("URL")]
    Url,
    #[token("PATTERN")]
    Pattern,
    #[token("LIST")]
    List,
    #[token("FILE")]
    File,

    // Relation operators
    #[token("->")]
    Increases,
    #[token("=>")]
    DirectlyIncreases,
    #[token("-|")]
    Decreases,
    #[token("=|")]
    DirectlyDecreases,
    #[token("--")]
    Association,
    #[token("-->")]
    PositiveCorrelation,
    #[token("--|")]
    NegativeCorrelation,
    #[token(":>")]
    TranscribedTo,
    #[token(">>")]
    TranslatedTo,

    // Punctuation
    #[token("(")]
    OpenParen,
    #[token(")")]
    CloseParen,
    #[token("{")]
    OpenBrace,
    #[token("}")]
    CloseBrace,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token("=")]
    Equals,

    /// Quoted string, quotes included
    #[regex(r#""([^"\\\r\n]|\\[^\r\n]|\\\r?\n)*""#, |lex| lex.slice().to_owned())]
    Quoted(String),

    /// A quote that is not closed before the end of the line
    #[regex(r#""([^"\\\r\n]|\\[^\r\n]|\\\r?\n)*"#, |lex| lex.slice().to_owned())]
    UnterminatedQuote(String),

    #[regex(r"(#|//)[^\r\n]*", |lex| lex.slice().to_owned())]
    Comment(String),

    #[regex(r#"[^\s:,()"={}#\-|<>/\\][^\s:,()"={}\\]*"#, |lex| lex.slice().to_owned())]
    Word(String),

    #[regex(r"(\r?\n)+")]
    Eol,
}

impl Token {
    /// The relation spelled by an operator token
    pub fn relation_symbol(&self) -> Option<&'static str> {
        let symbol = match self {
            Token::Increases => "->",
            Token::DirectlyIncreases => "=>",
            Token::Decreases => "-|",
            Token::DirectlyDecreases => "=|",
            Token::Association => "--",
            Token::PositiveCorrelation => "-->",
            Token::NegativeCorrelation => "--|",
            Token::TranscribedTo => ":>",
            Token::TranslatedTo => ">>",
            _ => return None,
        };
        Some(symbol)
    }

    /// Keyword tokens, returned with their spelling
    pub fn keyword(&self) -> Option<&'static str> {
        let keyword = match self {
            Token::Define => "DEFINE",
            Token::Namespace => "NAMESPACE",
            Token::Annotation => "ANNOTATION",
            Token::Set => "SET",
            Token::Unset => "UNSET",
            Token::Document => "DOCUMENT",
            Token::As => "AS",
            Token::StatementGroup => "STATEMENT_GROUP",
            Token::Url => "URL",
            Token::Pattern => "PATTERN",
            Token::List => "LIST",
            Token::File => "FILE",
            _ => return None,
        };
        Some(keyword)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(keyword) = self.keyword() {
            return write!(f, "{}", keyword);
        }
        if let Some(symbol) = self.relation_symbol() {
            return write!(f, "{}", symbol);
        }
        match self {
            Token::OpenParen => write!(f, "("),
            Token::CloseParen => write!(f, ")"),
            Token::OpenBrace => write!(f, "{{"),
            Token::CloseBrace => write!(f, "}}"),
            Token::Comma => write!(f, ","),
            Token::Colon => write!(f, ":"),
            Token::Equals => write!(f, "="),
            Token::Quoted(text)
            | Token::UnterminatedQuote(text)
            | Token::Comment(text)
            | Token::Word(text) => write!(f, "{}", text),
            _ => write!(f, "end of line"),
        }
    }
}
