//! Shared parser combinators over `(Token, Range<usize>)` streams.

use chumsky::prelude::*;
use std::ops::Range;

use super::ir::RawValue;
use crate::bel::lexing::Token;

/// Type alias for token with byte range
pub(crate) type TokenSpan = (Token, Range<usize>);

/// Type alias for parser error
pub(crate) type ParserError = Simple<TokenSpan>;

// Prefixes of custom parser messages, used to pick a diagnostic rule
pub(crate) const UNKNOWN_FUNCTION: &str = "unknown function";
pub(crate) const UNKNOWN_RELATION: &str = "unknown relation";
pub(crate) const CITATION_ARITY: &str = "citation";
pub(crate) const UNKNOWN_PROPERTY: &str = "unknown document property";

/// Match a specific token, yielding its byte range
pub(crate) fn token(t: Token) -> impl Parser<TokenSpan, Range<usize>, Error = ParserError> + Clone {
    filter(move |(tok, _): &TokenSpan| tok == &t).map(|(_, range)| range)
}

/// A bare word. Keywords are accepted too, spelled as written.
pub(crate) fn bare_word() -> impl Parser<TokenSpan, RawValue, Error = ParserError> + Clone {
    filter_map(|span, (tok, range): TokenSpan| {
        let text = match &tok {
            Token::Word(text) => Some(text.clone()),
            other => other.keyword().map(str::to_string),
        };
        match text {
            Some(text) => Ok(RawValue::bare(text, range)),
            None => Err(Simple::expected_input_found(
                span,
                Vec::new(),
                Some((tok, range)),
            )),
        }
    })
}

/// A bare word that is not a keyword
pub(crate) fn word() -> impl Parser<TokenSpan, RawValue, Error = ParserError> + Clone {
    filter_map(|span, (tok, range): TokenSpan| {
        if let Token::Word(text) = &tok {
            return Ok(RawValue::bare(text.clone(), range));
        }
        Err(Simple::expected_input_found(
            span,
            Vec::new(),
            Some((tok, range)),
        ))
    })
}

pub(crate) fn quoted() -> impl Parser<TokenSpan, RawValue, Error = ParserError> + Clone {
    filter_map(|span, (tok, range): TokenSpan| {
        if let Token::Quoted(text) = &tok {
            return Ok(RawValue::quoted(text, range));
        }
        Err(Simple::expected_input_found(
            span,
            Vec::new(),
            Some((tok, range)),
        ))
    })
}

/// A quoted or bare value
pub(crate) fn value() -> impl Parser<TokenSpan, RawValue, Error = ParserError> + Clone {
    quoted().or(bare_word())
}

/// `{ value, value, ... }`
pub(crate) fn value_set() -> impl Parser<TokenSpan, Vec<RawValue>, Error = ParserError> + Clone {
    value()
        .separated_by(token(Token::Comma))
        .delimited_by(token(Token::OpenBrace), token(Token::CloseBrace))
}

/// A trailing comment, marker and surrounding whitespace removed
pub(crate) fn comment() -> impl Parser<TokenSpan, String, Error = ParserError> + Clone {
    filter_map(|span, (tok, range): TokenSpan| {
        if let Token::Comment(text) = &tok {
            return Ok(strip_comment_marker(text));
        }
        Err(Simple::expected_input_found(
            span,
            Vec::new(),
            Some((tok, range)),
        ))
    })
}

pub(crate) fn strip_comment_marker(text: &str) -> String {
    text.strip_prefix("//")
        .or_else(|| text.strip_prefix('#'))
        .unwrap_or(text)
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bel::lexing::lex;

    fn tokens(source: &str) -> Vec<TokenSpan> {
        lex(source).remove(0).tokens
    }

    #[test]
    fn test_value_accepts_quoted_and_bare() {
        let parsed = value().parse(tokens("\"a b\"")).unwrap();
        assert_eq!(parsed.text, "a b");
        assert!(parsed.quoted);
        let parsed = value().parse(tokens("AKT1")).unwrap();
        assert_eq!(parsed.text, "AKT1");
        assert!(!parsed.quoted);
    }

    #[test]
    fn test_keywords_can_be_values() {
        let parsed = bare_word().parse(tokens("LIST")).unwrap();
        assert_eq!(parsed.text, "LIST");
    }

    #[test]
    fn test_value_set() {
        let parsed = value_set()
            .then_ignore(end())
            .parse(tokens("{\"a\", b, \"c d\"}"))
            .unwrap();
        let texts: Vec<&str> = parsed.iter().map(|v| v.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "b", "c d"]);
    }

    #[test]
    fn test_comment_marker_is_stripped() {
        assert_eq!(strip_comment_marker("// note "), "note");
        assert_eq!(strip_comment_marker("#note"), "note");
    }
}
