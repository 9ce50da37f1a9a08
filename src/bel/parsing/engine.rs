//! Line dispatch, error conversion and section ordering
//!
//!     Each logical line is parsed on its own. The first token picks the
//!     production (DEFINE, SET, UNSET, a lone comment, or a statement), so a
//!     broken directive is reported against the directive grammar rather
//!     than as a failed statement.
//!
//!     A document has three sections that must appear in order:
//!
//!         Properties   SET DOCUMENT ...
//!         Definitions  DEFINE NAMESPACE/ANNOTATION ...
//!         Statements   SET/UNSET directives interleaved with statements
//!
//!     [SectionTracker] enforces the order across lines.

use chumsky::error::SimpleReason;
use chumsky::prelude::*;
use std::ops::Range;

use super::combinators::{
    strip_comment_marker, ParserError, CITATION_ARITY, UNKNOWN_FUNCTION,
    UNKNOWN_PROPERTY, UNKNOWN_RELATION,
};
use super::directives::{define, set, unset};
use super::ir::ParsedLine;
use super::terms::statement;
use crate::bel::diagnostics::Rule;
use crate::bel::lexing::{LexedLine, Token};

/// A line that matches no production
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrammarError {
    pub rule: Rule,
    pub message: String,
    pub range: Range<usize>,
    pub hint: Option<String>,
}

/// Parse one lexed line. The line must not carry a lexical error.
pub fn parse_line(line: &LexedLine) -> Result<ParsedLine, GrammarError> {
    let tokens = line.tokens.clone();
    let result = match tokens.first() {
        Some((Token::Comment(text), _)) if tokens.len() == 1 => {
            return Ok(ParsedLine::Comment(strip_comment_marker(text)));
        }
        Some((Token::Define, _)) => define().parse(tokens),
        Some((Token::Set, _)) => set().parse(tokens),
        Some((Token::Unset, _)) => unset().parse(tokens),
        _ => statement().parse(tokens).map(ParsedLine::Statement),
    };
    result.map_err(|errors| convert_errors(line, errors))
}

fn convert_errors(line: &LexedLine, errors: Vec<ParserError>) -> GrammarError {
    let Some(error) = errors.into_iter().next() else {
        return GrammarError {
            rule: Rule::Syntax,
            message: "invalid line".to_string(),
            range: line.range.clone(),
            hint: None,
        };
    };

    let range = line
        .tokens
        .get(error.span().start)
        .map(|(_, range)| range.clone())
        .unwrap_or(line.range.end..line.range.end);

    let (rule, message) = match error.reason() {
        SimpleReason::Custom(message) => (rule_for_message(message), message.clone()),
        SimpleReason::Unclosed { delimiter, .. } => {
            (Rule::Syntax, format!("unclosed '{}'", delimiter.0))
        }
        SimpleReason::Unexpected => {
            let message = match error.found() {
                Some((token, _)) => format!("unexpected '{}'", token),
                None => "unexpected end of line".to_string(),
            };
            (Rule::Syntax, message)
        }
    };

    let mut expected: Vec<String> = error
        .expected()
        .filter_map(|expected| expected.as_ref().map(|(token, _)| token.to_string()))
        .collect();
    expected.sort();
    expected.dedup();
    let hint = if expected.is_empty() || rule != Rule::Syntax {
        None
    } else {
        Some(format!("expected {}", expected.join(" or ")))
    };

    GrammarError {
        rule,
        message,
        range,
        hint,
    }
}

fn rule_for_message(message: &str) -> Rule {
    if message.starts_with(UNKNOWN_FUNCTION) {
        Rule::UnknownFunction
    } else if message.starts_with(UNKNOWN_RELATION) {
        Rule::UnknownRelation
    } else if message.starts_with(UNKNOWN_PROPERTY) {
        Rule::UnknownDocumentProperty
    } else if message.starts_with(CITATION_ARITY) {
        Rule::CitationArity
    } else {
        Rule::Syntax
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Section {
    Properties,
    Definitions,
    Statements,
}

/// Tracks which document section the parser is in
#[derive(Debug, Clone)]
pub struct SectionTracker {
    current: Section,
}

impl SectionTracker {
    pub fn new() -> Self {
        Self {
            current: Section::Properties,
        }
    }

    pub fn current(&self) -> Section {
        self.current
    }

    /// Advance over `line`, rejecting it if its section is already closed
    pub fn admit(&mut self, line: &ParsedLine) -> Result<(), String> {
        let section = match line {
            ParsedLine::Comment(_) => return Ok(()),
            ParsedLine::DocumentProperty { .. } => Section::Properties,
            ParsedLine::Define { .. } => Section::Definitions,
            _ => Section::Statements,
        };
        if section < self.current {
            return Err(match section {
                Section::Properties => {
                    "document properties must come before definitions and statements"
                        .to_string()
                }
                _ => "definitions must come before statements".to_string(),
            });
        }
        self.current = section;
        Ok(())
    }
}

impl Default for SectionTracker {
    fn default() -> Self {
        Self::new()
    }
}
