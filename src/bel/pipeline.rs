//! Document pipeline
//!
//!     source ─▶ [repair] ─▶ lex ─▶ per logical line:
//!                                     parse ─▶ section order ─▶ directive | build ─▶ validate
//!
//!     One call owns all of its state (registries, annotation context,
//!     collector), so documents never influence each other and can be
//!     processed in parallel (see [batch]). Inside a document lines are
//!     handled strictly in order: a statement sees exactly the directives
//!     above it.
//!
//!     No error escapes [parse_document]. A line that fails at any stage
//!     yields diagnostics and processing continues with the next line,
//!     unless fail-fast mode stops the document at its first lexical error.

pub mod batch;

use crate::bel::ast::{ParseResult, Statement};
use crate::bel::building::build_statement;
use crate::bel::diagnostics::{Category, DiagnosticCollector, Rule};
use crate::bel::lexing::{lex, poison_offsets, LexError, LexErrorKind, LexedLine};
use crate::bel::parsing::{parse_line, ParsedLine, SectionTracker};
use crate::bel::repair::repair;
use crate::bel::validation::{AcceptAll, ExternalResolver, ValidationOptions, Validator};
use bel_config::BelConfig;

pub use batch::{collect_inputs, validate_paths, BatchError, DocumentOutcome};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Stop at the first lexical error, keeping only the diagnostics so far
    pub fail_fast: bool,
    /// Run the repair pass before lexing
    pub repair: bool,
    pub validation: ValidationOptions,
}

impl From<&BelConfig> for ParseOptions {
    fn from(config: &BelConfig) -> Self {
        Self {
            fail_fast: config.validation.fail_fast,
            repair: config.validation.repair,
            validation: ValidationOptions::from(&config.validation),
        }
    }
}

/// Parse and validate one document, accepting every URL/FILE value
pub fn parse_document(source: &str, options: &ParseOptions) -> ParseResult {
    parse_document_with(source, options, &AcceptAll)
}

/// Parse and validate one document, checking URL/FILE values with `resolver`
pub fn parse_document_with(
    source: &str,
    options: &ParseOptions,
    resolver: &dyn ExternalResolver,
) -> ParseResult {
    if options.repair {
        let report = repair(source);
        let mut result = run(&report.text, Vec::new(), options, resolver);
        result.repairs = report.changes;
        result
    } else {
        run(source, Vec::new(), options, resolver)
    }
}

/// Parse raw bytes. Undecodable sequences become U+FFFD and poison their
/// line with an `invalid-bytes` error; the rest of the document is handled
/// normally.
pub fn parse_bytes(bytes: &[u8], options: &ParseOptions) -> ParseResult {
    let (text, invalid) = decode_lossy(bytes);
    if invalid.is_empty() {
        return parse_document(&text, options);
    }
    tracing::debug!(sequences = invalid.len(), "input contains invalid UTF-8");
    // Repair is skipped here: it would shift the recorded offsets.
    run(&text, invalid, options, &AcceptAll)
}

/// Decode `bytes`, returning the offsets (in the decoded text) of every
/// replacement character inserted for an invalid sequence
fn decode_lossy(bytes: &[u8]) -> (String, Vec<usize>) {
    let mut text = String::with_capacity(bytes.len());
    let mut invalid = Vec::new();
    let mut rest = bytes;
    loop {
        match std::str::from_utf8(rest) {
            Ok(valid) => {
                text.push_str(valid);
                break;
            }
            Err(error) => {
                let (valid, after) = rest.split_at(error.valid_up_to());
                text.push_str(&String::from_utf8_lossy(valid));
                invalid.push(text.len());
                text.push(char::REPLACEMENT_CHARACTER);
                let skip = error.error_len().unwrap_or(after.len());
                rest = &after[skip..];
            }
        }
    }
    (text, invalid)
}

fn lexical_rule(kind: &LexErrorKind) -> Rule {
    match kind {
        LexErrorKind::UnterminatedString => Rule::UnterminatedString,
        LexErrorKind::InvalidCharacter(_) => Rule::InvalidCharacter,
        LexErrorKind::InvalidBytes => Rule::InvalidBytes,
    }
}

fn report_lexical(error: &LexError, diagnostics: &mut DiagnosticCollector<'_>) {
    let diagnostic = diagnostics.error_at(
        Category::Lexical,
        lexical_rule(&error.kind),
        &error.range,
        error.kind.to_string(),
    );
    if error.kind == LexErrorKind::UnterminatedString {
        diagnostic.hint = Some("close the quote, or run with --repair".to_string());
    }
}

fn run(
    source: &str,
    invalid_bytes: Vec<usize>,
    options: &ParseOptions,
    resolver: &dyn ExternalResolver,
) -> ParseResult {
    let mut diagnostics = DiagnosticCollector::new(source);
    let mut validator = Validator::new(options.validation, resolver);
    let mut sections = SectionTracker::new();
    let mut statements = Vec::new();

    let mut lines = lex(source);
    poison_offsets(&mut lines, &invalid_bytes);
    tracing::debug!(lines = lines.len(), "lexed document");

    for line in &lines {
        if let Some(error) = &line.error {
            report_lexical(error, &mut diagnostics);
            if options.fail_fast {
                let line = diagnostics.position(error.range.start).line;
                tracing::debug!(line, "aborting at lexical error");
                return ParseResult {
                    diagnostics: diagnostics.finish(),
                    aborted: true,
                    ..ParseResult::default()
                };
            }
            continue;
        }
        if let Some(statement) = process_line(line, &mut sections, &mut validator, &mut diagnostics)
        {
            statements.push(statement);
        }
    }

    let validated = validator.finish(&mut diagnostics);
    let diagnostics = diagnostics.finish();
    tracing::debug!(
        statements = statements.len(),
        diagnostics = diagnostics.len(),
        "parsed document"
    );

    ParseResult {
        document: validated.document,
        namespaces: validated.namespaces,
        annotations: validated.annotations,
        statements,
        diagnostics,
        repairs: Vec::new(),
        aborted: false,
    }
}

/// Handle one lexically clean line, returning the statement it contributes
fn process_line(
    line: &LexedLine,
    sections: &mut SectionTracker,
    validator: &mut Validator<'_>,
    diagnostics: &mut DiagnosticCollector<'_>,
) -> Option<Statement> {
    let parsed = match parse_line(line) {
        Ok(parsed) => parsed,
        Err(error) => {
            diagnostics
                .error_at(Category::Grammar, error.rule, &error.range, error.message)
                .hint = error.hint;
            return None;
        }
    };

    if let Err(message) = sections.admit(&parsed) {
        diagnostics
            .error_at(Category::Grammar, Rule::SectionOrder, &line.range, message)
            .hint = Some(format!("move this {} up", parsed.label()));
        return None;
    }

    match parsed {
        ParsedLine::Comment(_) => None,
        ParsedLine::DocumentProperty { property, value } => {
            validator.document_property(property, &value, diagnostics);
            None
        }
        ParsedLine::Define {
            kind,
            keyword,
            reference,
        } => {
            validator.define(kind, &keyword, &reference, diagnostics);
            None
        }
        ParsedLine::Set { key, values } => {
            validator.set(&key, &values, diagnostics);
            None
        }
        ParsedLine::SetCitation { fields } => {
            validator.set_citation(&fields, &line.range, diagnostics);
            None
        }
        ParsedLine::SetStatementGroup { value } => {
            validator.set_statement_group(&value);
            None
        }
        ParsedLine::Unset { target } => {
            validator.unset(&target, &line.range, diagnostics);
            None
        }
        ParsedLine::Statement(raw) => {
            let number = diagnostics.position(line.range.start).line;
            let built = match build_statement(&raw, validator.context().clone(), number) {
                Ok(built) => built,
                Err(error) => {
                    let rule = error.rule();
                    diagnostics.error_at(Category::Grammar, rule, &error.range, error.message);
                    return None;
                }
            };
            if validator.statement(&built, diagnostics) {
                tracing::trace!(line = number, "statement accepted");
                Some(built.statement)
            } else {
                None
            }
        }
    }
}
