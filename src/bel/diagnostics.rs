//! Diagnostics
//!
//!     Every stage reports problems as [Diagnostic] values; nothing is
//!     thrown across the document boundary. The [DiagnosticCollector] keeps
//!     them in document order and answers the one question callers need
//!     before exporting: does the document have any errors?
//!
//!     Rendering lives in [report].

pub mod report;

use crate::bel::ast::{LineIndex, Position};
use serde::Serialize;
use std::fmt;
use std::ops::Range;

pub use report::{render, ReportError, ReportFormat};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Lexical,
    Grammar,
    Semantic,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Lexical => write!(f, "lexical"),
            Category::Grammar => write!(f, "grammar"),
            Category::Semantic => write!(f, "semantic"),
        }
    }
}

/// The rule a diagnostic reports against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rule {
    // Lexical
    UnterminatedString,
    InvalidCharacter,
    InvalidBytes,
    // Grammar
    Syntax,
    UnknownFunction,
    UnknownRelation,
    UnknownDocumentProperty,
    CitationArity,
    SectionOrder,
    TermShape,
    // Semantic
    IncompatibleSubject,
    IncompatibleObject,
    NestedStatement,
    SelfReference,
    IllegalModifier,
    FusionHost,
    FusionRange,
    FragmentRange,
    AminoAcid,
    ModificationPosition,
    ModificationType,
    MolecularActivity,
    UndefinedNamespace,
    UndefinedAnnotation,
    NotInNamespaceList,
    NotInAnnotationList,
    NotInNamespacePattern,
    NotInAnnotationPattern,
    InvalidPattern,
    ExternalVocabulary,
    // Warnings
    InactiveUnset,
    DeprecatedRelation,
    InjectedRelation,
    DuplicateDefinition,
    DuplicateProperty,
    AmbiguousEntry,
}

impl Rule {
    pub fn name(&self) -> &'static str {
        match self {
            Rule::UnterminatedString => "unterminated-string",
            Rule::InvalidCharacter => "invalid-character",
            Rule::InvalidBytes => "invalid-bytes",
            Rule::Syntax => "syntax",
            Rule::UnknownFunction => "unknown-function",
            Rule::UnknownRelation => "unknown-relation",
            Rule::UnknownDocumentProperty => "unknown-document-property",
            Rule::CitationArity => "citation-arity",
            Rule::SectionOrder => "section-order",
            Rule::TermShape => "term-shape",
            Rule::IncompatibleSubject => "incompatible-subject",
            Rule::IncompatibleObject => "incompatible-object",
            Rule::NestedStatement => "nested-statement",
            Rule::SelfReference => "self-reference",
            Rule::IllegalModifier => "illegal-modifier",
            Rule::FusionHost => "fusion-host",
            Rule::FusionRange => "fusion-range",
            Rule::FragmentRange => "fragment-range",
            Rule::AminoAcid => "amino-acid",
            Rule::ModificationPosition => "modification-position",
            Rule::ModificationType => "modification-type",
            Rule::MolecularActivity => "molecular-activity",
            Rule::UndefinedNamespace => "undefined-namespace",
            Rule::UndefinedAnnotation => "undefined-annotation",
            Rule::NotInNamespaceList => "not-in-namespace-list",
            Rule::NotInAnnotationList => "not-in-annotation-list",
            Rule::NotInNamespacePattern => "not-in-namespace-pattern",
            Rule::NotInAnnotationPattern => "not-in-annotation-pattern",
            Rule::InvalidPattern => "invalid-pattern",
            Rule::ExternalVocabulary => "external-vocabulary",
            Rule::InactiveUnset => "inactive-unset",
            Rule::DeprecatedRelation => "deprecated-relation",
            Rule::InjectedRelation => "injected-relation",
            Rule::DuplicateDefinition => "duplicate-definition",
            Rule::DuplicateProperty => "duplicate-property",
            Rule::AmbiguousEntry => "ambiguous-entry",
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One reported problem
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub category: Category,
    pub line: usize,
    pub column: usize,
    pub rule: Rule,
    pub message: String,
    /// The offending source text
    pub entry: Option<String>,
    /// Suggested fix
    pub hint: Option<String>,
}

impl Diagnostic {
    pub fn new(
        severity: Severity,
        category: Category,
        rule: Rule,
        position: Position,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            category,
            line: position.line,
            column: position.column,
            rule,
            message: message.into(),
            entry: None,
            hint: None,
        }
    }

    pub fn error(
        category: Category,
        rule: Rule,
        position: Position,
        message: impl Into<String>,
    ) -> Self {
        Self::new(Severity::Error, category, rule, position, message)
    }

    /// Warnings are always semantic
    pub fn warning(rule: Rule, position: Position, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, Category::Semantic, rule, position, message)
    }

    pub fn with_entry(mut self, entry: impl Into<String>) -> Self {
        self.entry = Some(entry.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {} [{}/{}] {}",
            self.line, self.column, self.severity, self.category, self.rule, self.message
        )
    }
}

/// Collects diagnostics for one document
#[derive(Debug)]
pub struct DiagnosticCollector<'a> {
    source: &'a str,
    lines: LineIndex,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> DiagnosticCollector<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            lines: LineIndex::new(source),
            diagnostics: Vec::new(),
        }
    }

    pub fn position(&self, offset: usize) -> Position {
        self.lines.position(offset)
    }

    /// Source text covered by `range`, clamped to the source
    pub fn text(&self, range: &Range<usize>) -> &'a str {
        let end = range.end.min(self.source.len());
        let start = range.start.min(end);
        self.source.get(start..end).unwrap_or("")
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        tracing::trace!(%diagnostic, "diagnostic");
        self.diagnostics.push(diagnostic);
    }

    /// Report an error located at `range`, quoting the source there
    pub fn error_at(
        &mut self,
        category: Category,
        rule: Rule,
        range: &Range<usize>,
        message: impl Into<String>,
    ) -> &mut Diagnostic {
        let diagnostic = Diagnostic::error(category, rule, self.position(range.start), message);
        self.push_with_entry(diagnostic, range)
    }

    pub fn warning_at(
        &mut self,
        rule: Rule,
        range: &Range<usize>,
        message: impl Into<String>,
    ) -> &mut Diagnostic {
        let diagnostic = Diagnostic::warning(rule, self.position(range.start), message);
        self.push_with_entry(diagnostic, range)
    }

    fn push_with_entry(&mut self, diagnostic: Diagnostic, range: &Range<usize>) -> &mut Diagnostic {
        let text = self.text(range).trim();
        let diagnostic = if text.is_empty() {
            diagnostic
        } else {
            diagnostic.with_entry(text)
        };
        self.push(diagnostic);
        let last = self.diagnostics.len() - 1;
        &mut self.diagnostics[last]
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    /// Diagnostics in document order. Within a line, report order is kept.
    pub fn finish(mut self) -> Vec<Diagnostic> {
        self.diagnostics.sort_by_key(|d| d.line);
        self.diagnostics
    }
}
