//! Directive grammar: DEFINE, SET and UNSET
//!
//! Grammar:
//!     define := DEFINE (NAMESPACE | ANNOTATION) WORD AS reference
//!     reference := (URL | PATTERN | FILE) value | LIST "{" values "}"
//!     set := SET DOCUMENT WORD "=" value
//!          | SET STATEMENT_GROUP "=" value
//!          | SET WORD "=" (value | "{" values "}")
//!     unset := UNSET (STATEMENT_GROUP | "{" values "}" | WORD)
//!
//! `SET Citation` is checked for arity here: two fields, or three to six.

use chumsky::prelude::*;

use super::combinators::{
    bare_word, token, value, value_set, word, ParserError, TokenSpan, CITATION_ARITY,
    UNKNOWN_PROPERTY,
};
use super::ir::{ParsedLine, RawDefinitionReference, SetValues, UnsetTarget};
use crate::bel::ast::{DefinitionKind, DocumentProperty};
use crate::bel::lexing::Token;

pub(crate) fn define() -> impl Parser<TokenSpan, ParsedLine, Error = ParserError> {
    let kind = token(Token::Namespace)
        .to(DefinitionKind::Namespace)
        .or(token(Token::Annotation).to(DefinitionKind::Annotation));

    let reference = choice((
        token(Token::Url)
            .ignore_then(value())
            .map(RawDefinitionReference::Url),
        token(Token::Pattern)
            .ignore_then(value())
            .map(RawDefinitionReference::Pattern),
        token(Token::File)
            .ignore_then(value())
            .map(RawDefinitionReference::File),
        token(Token::List)
            .ignore_then(value_set())
            .map(RawDefinitionReference::List),
    ));

    token(Token::Define)
        .ignore_then(kind)
        .then(bare_word())
        .then_ignore(token(Token::As))
        .then(reference)
        .then_ignore(end())
        .map(|((kind, keyword), reference)| ParsedLine::Define {
            kind,
            keyword,
            reference,
        })
}

pub(crate) fn set() -> impl Parser<TokenSpan, ParsedLine, Error = ParserError> {
    let document_property = token(Token::Document)
        .ignore_then(bare_word())
        .then_ignore(token(Token::Equals))
        .then(value())
        .try_map(|(key, value), span| match DocumentProperty::from_keyword(&key.text) {
            Some(property) => Ok(ParsedLine::DocumentProperty { property, value }),
            None => Err(Simple::custom(
                span,
                format!("{} '{}'", UNKNOWN_PROPERTY, key.text),
            )),
        });

    let statement_group = token(Token::StatementGroup)
        .ignore_then(token(Token::Equals))
        .ignore_then(value())
        .map(|value| ParsedLine::SetStatementGroup { value });

    let values = value_set()
        .map(SetValues::Many)
        .or(value().map(SetValues::One));

    let annotation = word()
        .then_ignore(token(Token::Equals))
        .then(values)
        .try_map(|(key, values), span| {
            if key.text != "Citation" {
                return Ok(ParsedLine::Set { key, values });
            }
            let fields = match values {
                SetValues::Many(fields) => fields,
                SetValues::One(field) => vec![field],
            };
            if matches!(fields.len(), 2..=6) {
                Ok(ParsedLine::SetCitation { fields })
            } else {
                Err(Simple::custom(
                    span,
                    format!(
                        "{} must have 2 or 3 to 6 fields, found {}",
                        CITATION_ARITY,
                        fields.len()
                    ),
                ))
            }
        });

    token(Token::Set)
        .ignore_then(choice((document_property, statement_group, annotation)))
        .then_ignore(end())
}

pub(crate) fn unset() -> impl Parser<TokenSpan, ParsedLine, Error = ParserError> {
    let target = choice((
        token(Token::StatementGroup).to(UnsetTarget::StatementGroup),
        value_set().map(UnsetTarget::Keys),
        bare_word().map(|key| {
            if key.text == "ALL" {
                UnsetTarget::All
            } else {
                UnsetTarget::Keys(vec![key])
            }
        }),
    ));

    token(Token::Unset)
        .ignore_then(target)
        .then_ignore(end())
        .map(|target| ParsedLine::Unset { target })
}
