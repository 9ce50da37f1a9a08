//! Statements
//!
//!     A statement is a subject term, optionally related to an object. The
//!     object is either a term or a single level of nested statement:
//!
//!         p(HGNC:A) -> (p(HGNC:B) -> bp(GO:c))
//!
//!     Each statement carries the annotation context that was active when it
//!     was read, so statements can be consumed in isolation.

use super::document::AnnotationContext;
use super::relation::Relation;
use super::term::Term;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statement {
    pub subject: Term,
    pub relation: Option<Relation>,
    pub object: Option<StatementObject>,
    /// Trailing `// ...` comment, without the marker
    pub comment: Option<String>,
    pub context: AnnotationContext,
    /// 1-based source line the statement starts on
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementObject {
    Term(Term),
    Nested(Box<NestedStatement>),
}

/// The parenthesized statement in object position. It cannot nest further.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NestedStatement {
    pub subject: Term,
    pub relation: Relation,
    pub object: Term,
}

impl Statement {
    pub fn object_term(&self) -> Option<&Term> {
        match &self.object {
            Some(StatementObject::Term(term)) => Some(term),
            _ => None,
        }
    }

    pub fn nested(&self) -> Option<&NestedStatement> {
        match &self.object {
            Some(StatementObject::Nested(nested)) => Some(nested),
            _ => None,
        }
    }

    /// Same assertion, ignoring provenance and source position
    pub fn same_assertion(&self, other: &Statement) -> bool {
        self.subject == other.subject
            && self.relation == other.relation
            && self.object == other.object
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bel::ast::term::Function;

    fn statement(line: usize) -> Statement {
        Statement {
            subject: Term::reference(Function::Protein, "HGNC", "IFNG"),
            relation: Some(Relation::Increases),
            object: Some(StatementObject::Term(Term::reference(
                Function::Protein,
                "HGNC",
                "TNF",
            ))),
            comment: None,
            context: AnnotationContext::default(),
            line,
        }
    }

    #[test]
    fn test_same_assertion_ignores_line() {
        let a = statement(3);
        let b = statement(9);
        assert_ne!(a, b);
        assert!(a.same_assertion(&b));
    }

    #[test]
    fn test_object_accessors() {
        let s = statement(1);
        assert!(s.object_term().is_some());
        assert!(s.nested().is_none());
    }
}
