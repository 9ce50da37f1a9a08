//! Importable JSON export
//!
//!     Shape:
//!
//!         {
//!           "document":    { name, description, ... },
//!           "namespaces":  [ definition, ... ],
//!           "annotations": [ definition, ... ],
//!           "statements":  [ record, ... ]
//!         }
//!
//!     Each record carries the subject term tree, the canonical relation
//!     name, the object term tree (or a nested statement, or null) and the
//!     provenance active for the statement.
//!
//!     Export is refused while the document has errors. `force` lifts the
//!     refusal for semantic errors only; a document with lexical or grammar
//!     errors is never exported.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::bel::ast::{
    Citation, Document, ParseResult, Registry, Statement, StatementObject, Term,
};
use crate::bel::diagnostics::Category;
use bel_config::ExportConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    pub pretty: bool,
    /// Export despite errors, as long as all of them are Semantic (any
    /// rule). Lexical and Grammar errors still refuse export.
    pub force: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            pretty: true,
            force: false,
        }
    }
}

impl From<&ExportConfig> for ExportOptions {
    fn from(config: &ExportConfig) -> Self {
        Self {
            pretty: config.pretty,
            force: config.force,
        }
    }
}

#[derive(Debug)]
pub enum ExportError {
    /// The document has errors and export was not forced
    Invalid { errors: usize },
    /// Lexical or grammar errors block export even when forced
    Unparsable { errors: usize },
    /// Fail-fast parsing stopped before the end of the document
    Aborted,
    Json(serde_json::Error),
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::Invalid { errors } => {
                write!(f, "Document has {} error(s); refusing to export", errors)
            }
            ExportError::Unparsable { errors } => write!(
                f,
                "Document has {} lexical or grammar error(s); cannot export",
                errors
            ),
            ExportError::Aborted => write!(f, "Parsing was aborted; cannot export"),
            ExportError::Json(e) => write!(f, "Failed to serialize document: {}", e),
        }
    }
}

impl std::error::Error for ExportError {}

impl From<serde_json::Error> for ExportError {
    fn from(err: serde_json::Error) -> Self {
        ExportError::Json(err)
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ObjectRecord<'a> {
    Term(&'a Term),
    Statement {
        subject: &'a Term,
        relation: &'static str,
        object: &'a Term,
    },
}

#[derive(Debug, Serialize)]
struct StatementRecord<'a> {
    line: usize,
    subject: &'a Term,
    relation: Option<&'static str>,
    object: Option<ObjectRecord<'a>>,
    citation: Option<&'a Citation>,
    evidence: Option<&'a str>,
    annotations: &'a BTreeMap<String, Vec<String>>,
    statement_group: Option<&'a str>,
    comment: Option<&'a str>,
}

impl<'a> From<&'a Statement> for StatementRecord<'a> {
    fn from(statement: &'a Statement) -> Self {
        let object = statement.object.as_ref().map(|object| match object {
            StatementObject::Term(term) => ObjectRecord::Term(term),
            StatementObject::Nested(nested) => ObjectRecord::Statement {
                subject: &nested.subject,
                relation: nested.relation.name(),
                object: &nested.object,
            },
        });
        StatementRecord {
            line: statement.line,
            subject: &statement.subject,
            relation: statement.relation.map(|r| r.name()),
            object,
            citation: statement.context.citation.as_ref(),
            evidence: statement.context.evidence.as_deref(),
            annotations: &statement.context.annotations,
            statement_group: statement.context.statement_group.as_deref(),
            comment: statement.comment.as_deref(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ExportRecord<'a> {
    document: &'a Document,
    namespaces: &'a Registry,
    annotations: &'a Registry,
    statements: Vec<StatementRecord<'a>>,
}

/// Check whether `result` may be exported under `options`
pub fn check_exportable(result: &ParseResult, options: &ExportOptions) -> Result<(), ExportError> {
    if result.aborted {
        return Err(ExportError::Aborted);
    }
    let errors = result.error_count();
    if errors == 0 {
        return Ok(());
    }
    let blocking = result
        .diagnostics
        .iter()
        .filter(|d| d.is_error() && d.category != Category::Semantic)
        .count();
    if blocking > 0 {
        return Err(ExportError::Unparsable { errors: blocking });
    }
    if options.force {
        tracing::warn!(errors, "exporting document with semantic errors");
        Ok(())
    } else {
        Err(ExportError::Invalid { errors })
    }
}

/// Serialize `result` to importable JSON
pub fn export(result: &ParseResult, options: &ExportOptions) -> Result<String, ExportError> {
    check_exportable(result, options)?;
    let record = ExportRecord {
        document: &result.document,
        namespaces: &result.namespaces,
        annotations: &result.annotations,
        statements: result.statements.iter().map(StatementRecord::from).collect(),
    };
    let mut json = if options.pretty {
        serde_json::to_string_pretty(&record)?
    } else {
        serde_json::to_string(&record)?
    };
    json.push('\n');
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bel::ast::{AnnotationContext, Function, Position, Relation};
    use crate::bel::diagnostics::{Diagnostic, Rule};

    fn result_with(diagnostics: Vec<Diagnostic>) -> ParseResult {
        let mut context = AnnotationContext::default();
        context.evidence = Some("seen in cells".to_string());
        ParseResult {
            statements: vec![Statement {
                subject: Term::reference(Function::Protein, "HGNC", "IFNG"),
                relation: Some(Relation::DirectlyIncreases),
                object: Some(StatementObject::Term(Term::reference(
                    Function::Protein,
                    "HGNC",
                    "TNF",
                ))),
                comment: None,
                context,
                line: 4,
            }],
            diagnostics,
            ..ParseResult::default()
        }
    }

    #[test]
    fn test_export_shape() {
        let json = export(&result_with(Vec::new()), &ExportOptions::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let record = &value["statements"][0];
        assert_eq!(record["relation"], "directlyIncreases");
        assert_eq!(record["subject"]["function"], "protein");
        assert_eq!(record["object"]["type"], "term");
        assert_eq!(record["evidence"], "seen in cells");
        assert_eq!(record["line"], 4);
        assert!(record["citation"].is_null());
    }

    #[test]
    fn test_warnings_do_not_block_export() {
        let warning = Diagnostic::warning(Rule::InactiveUnset, Position::new(1, 1), "x");
        assert!(export(&result_with(vec![warning]), &ExportOptions::default()).is_ok());
    }

    #[test]
    fn test_errors_block_export_unless_forced() {
        let semantic = Diagnostic::error(
            Category::Semantic,
            Rule::NotInAnnotationList,
            Position::new(2, 1),
            "x",
        );
        let result = result_with(vec![semantic]);
        assert!(matches!(
            export(&result, &ExportOptions::default()),
            Err(ExportError::Invalid { errors: 1 })
        ));
        let forced = ExportOptions {
            force: true,
            ..ExportOptions::default()
        };
        assert!(export(&result, &forced).is_ok());
    }

    #[test]
    fn test_force_covers_every_semantic_rule() {
        let rules = [Rule::SelfReference, Rule::IncompatibleObject, Rule::FragmentRange];
        let diagnostics = rules
            .iter()
            .map(|rule| Diagnostic::error(Category::Semantic, *rule, Position::new(3, 1), "x"))
            .collect();
        let forced = ExportOptions {
            force: true,
            ..ExportOptions::default()
        };
        assert!(export(&result_with(diagnostics), &forced).is_ok());
    }

    #[test]
    fn test_grammar_errors_always_block() {
        let grammar = Diagnostic::error(Category::Grammar, Rule::Syntax, Position::new(2, 1), "x");
        let forced = ExportOptions {
            force: true,
            pretty: false,
        };
        assert!(matches!(
            export(&result_with(vec![grammar]), &forced),
            Err(ExportError::Unparsable { errors: 1 })
        ));
    }
}
