//! Statement assembly

use super::terms::Sites;
use super::{BuildError, BuiltStatement, NestedSites};
use crate::bel::ast::{AnnotationContext, NestedStatement, Statement, StatementObject};
use crate::bel::parsing::{RawObject, RawStatement};

/// Build one statement, stamping it with the context active on `line`
pub fn build_statement(
    raw: &RawStatement,
    context: AnnotationContext,
    line: usize,
) -> Result<BuiltStatement, BuildError> {
    let mut sites = Sites::default();
    let subject = sites.term(&raw.subject)?;

    let mut object_range = None;
    let mut nested_sites = None;
    let object = match &raw.object {
        None => None,
        Some(RawObject::Term(call)) => {
            object_range = Some(call.range.clone());
            Some(StatementObject::Term(sites.term(call)?))
        }
        Some(RawObject::Nested(nested)) => {
            object_range = Some(nested.subject.range.start..nested.object.range.end);
            nested_sites = Some(NestedSites {
                subject: nested.subject.range.clone(),
                relation: nested.relation.clone(),
                object: nested.object.range.clone(),
            });
            Some(StatementObject::Nested(Box::new(NestedStatement {
                subject: sites.term(&nested.subject)?,
                relation: nested.relation.relation,
                object: sites.term(&nested.object)?,
            })))
        }
    };

    Ok(BuiltStatement {
        statement: Statement {
            subject,
            relation: raw.relation.as_ref().map(|relation| relation.relation),
            object,
            comment: raw.comment.clone(),
            context,
            line,
        },
        subject_range: raw.subject.range.clone(),
        relation: raw.relation.clone(),
        object_range,
        nested: nested_sites,
        sites,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bel::ast::{Function, Relation, Term};
    use crate::bel::lexing::lex;
    use crate::bel::parsing::{parse_line, ParsedLine};

    fn raw(source: &str) -> RawStatement {
        match parse_line(&lex(source)[0]).unwrap() {
            ParsedLine::Statement(statement) => statement,
            other => panic!("not a statement: {:?}", other),
        }
    }

    #[test]
    fn test_simple_statement() {
        let built = build_statement(
            &raw("p(HGNC:A) -> bp(GO:b) // note"),
            AnnotationContext::default(),
            3,
        )
        .unwrap();
        let statement = built.statement;
        assert_eq!(statement.subject, Term::reference(Function::Protein, "HGNC", "A"));
        assert_eq!(statement.relation, Some(Relation::Increases));
        assert_eq!(
            statement.object_term(),
            Some(&Term::reference(Function::BiologicalProcess, "GO", "b"))
        );
        assert_eq!(statement.comment.as_deref(), Some("note"));
        assert_eq!(statement.line, 3);
        assert_eq!(built.object_range, Some(13..21));
    }

    #[test]
    fn test_nested_statement() {
        let built = build_statement(
            &raw("p(HGNC:A) increases (p(HGNC:B) decreases bp(GO:c))"),
            AnnotationContext::default(),
            1,
        )
        .unwrap();
        let nested = built.statement.nested().unwrap();
        assert_eq!(nested.relation, Relation::Decreases);
        assert_eq!(built.nested.unwrap().relation.text, "decreases");
    }

    #[test]
    fn test_subject_only() {
        let built =
            build_statement(&raw("p(HGNC:A)"), AnnotationContext::default(), 1).unwrap();
        assert!(built.statement.relation.is_none());
        assert!(built.statement.object.is_none());
    }

    #[test]
    fn test_shape_error_in_object() {
        let error = build_statement(
            &raw("p(HGNC:A) -> p(pmod(Ph))"),
            AnnotationContext::default(),
            1,
        )
        .unwrap_err();
        assert_eq!(error.range.start, 15);
    }
}
