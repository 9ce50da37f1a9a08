//! Term and statement grammar
//!
//! Grammar:
//!     statement := term (relation object)? comment?
//!     object    := term | "(" term relation term ")"
//!     term      := FUNCTION "(" arg ("," arg)* ")"
//!     arg       := WORD "(" arg ("," arg)* ")" | WORD ":" value | value
//!
//! Term heads are classified in [LexMode::Statement]; every head inside an
//! argument list is classified in [LexMode::Modifier]. A nested statement
//! only takes plain terms, so a second level of parentheses is a grammar
//! error.

use chumsky::prelude::*;
use std::ops::Range;

use super::combinators::{
    bare_word, comment, quoted, token, value, ParserError, TokenSpan, UNKNOWN_FUNCTION,
    UNKNOWN_RELATION,
};
use super::ir::{
    CallHead, RawArg, RawCall, RawNested, RawObject, RawReference, RawRelation, RawStatement,
    RawValue,
};
use crate::bel::ast::Relation;
use crate::bel::lexing::{classify, LexMode, Token, WordClass};

enum Tail {
    Call(Vec<RawArg>, Range<usize>),
    Reference(RawValue),
}

fn call_head(head: &RawValue, mode: LexMode) -> Option<CallHead> {
    match classify(&head.text, mode) {
        WordClass::Function(function) => Some(CallHead::Function(function)),
        WordClass::Modifier(kind) if mode == LexMode::Modifier => Some(CallHead::Modifier(kind)),
        WordClass::Argument(argument) if mode == LexMode::Modifier => {
            Some(CallHead::Argument(argument))
        }
        _ => None,
    }
}

fn unknown_function(span: Range<usize>, head: &RawValue) -> ParserError {
    Simple::custom(span, format!("{} '{}'", UNKNOWN_FUNCTION, head.text))
}

/// One argument inside a call
pub(crate) fn argument() -> impl Parser<TokenSpan, RawArg, Error = ParserError> + Clone {
    recursive(|arg| {
        let call_tail = token(Token::OpenParen)
            .ignore_then(arg.separated_by(token(Token::Comma)))
            .then(token(Token::CloseParen))
            .map(|(args, close)| Tail::Call(args, close));
        let reference_tail = token(Token::Colon)
            .ignore_then(value())
            .map(Tail::Reference);

        let headed = bare_word()
            .then(call_tail.or(reference_tail).or_not())
            .try_map(|(head, tail), span| match tail {
                None => Ok(RawArg::Value(head)),
                Some(Tail::Reference(name)) => Ok(RawArg::Reference(RawReference {
                    namespace: head,
                    name,
                })),
                Some(Tail::Call(args, close)) => match call_head(&head, LexMode::Modifier) {
                    Some(call) => Ok(RawArg::Call(RawCall {
                        head: call,
                        range: head.range.start..close.end,
                        head_text: head.text,
                        args,
                    })),
                    None => Err(unknown_function(span, &head)),
                },
            });

        headed.or(quoted().map(RawArg::Value))
    })
}

/// A statement-level term
pub(crate) fn term() -> impl Parser<TokenSpan, RawCall, Error = ParserError> + Clone {
    bare_word()
        .then_ignore(token(Token::OpenParen))
        .then(argument().separated_by(token(Token::Comma)))
        .then(token(Token::CloseParen))
        .try_map(|((head, args), close), span| match call_head(&head, LexMode::Statement) {
            Some(call) => Ok(RawCall {
                head: call,
                range: head.range.start..close.end,
                head_text: head.text,
                args,
            }),
            None => Err(unknown_function(span, &head)),
        })
}

/// A relation keyword or operator
pub(crate) fn relation() -> impl Parser<TokenSpan, RawRelation, Error = ParserError> + Clone {
    filter_map(|span, (tok, range): TokenSpan| {
        if let Some(symbol) = tok.relation_symbol() {
            if let Some(relation) = Relation::from_symbol(symbol) {
                return Ok(RawRelation {
                    relation,
                    deprecated: false,
                    text: symbol.to_string(),
                    range,
                });
            }
        }
        if let Token::Word(text) = &tok {
            return match classify(text, LexMode::Statement) {
                WordClass::Relation(resolved) => Ok(RawRelation {
                    relation: resolved.relation,
                    deprecated: resolved.deprecated,
                    text: text.clone(),
                    range,
                }),
                _ => Err(Simple::custom(
                    span,
                    format!("{} '{}'", UNKNOWN_RELATION, text),
                )),
            };
        }
        Err(Simple::expected_input_found(
            span,
            Vec::new(),
            Some((tok, range)),
        ))
    })
}

/// A full statement line
pub(crate) fn statement() -> impl Parser<TokenSpan, RawStatement, Error = ParserError> {
    let term = term().boxed();
    let nested = token(Token::OpenParen)
        .ignore_then(term.clone())
        .then(relation())
        .then(term.clone())
        .then_ignore(token(Token::CloseParen))
        .map(|((subject, relation), object)| {
            RawObject::Nested(Box::new(RawNested {
                subject,
                relation,
                object,
            }))
        });
    let object = term.clone().map(RawObject::Term).or(nested);

    // Tried first so an unknown relation keyword wins over "expected end"
    let related = relation()
        .then(object)
        .then(comment().or_not())
        .then_ignore(end())
        .map(|((relation, object), comment)| (Some(relation), Some(object), comment));
    let unrelated = comment()
        .or_not()
        .then_ignore(end())
        .map(|comment| (None, None, comment));

    term.then(related.or(unrelated))
        .map(|(subject, (relation, object, comment))| RawStatement {
            subject,
            relation,
            object,
            comment,
        })
}
