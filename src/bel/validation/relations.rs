//! Relation compatibility tables
//!
//!     Each relation with a constraint has one [Compatibility] row. A row
//!     lists the function kinds allowed on either side (empty means any)
//!     plus the structural checks no kind list can express: both sides of
//!     the same kind, a subject that contains an activity, a list object.
//!
//!     A violation reports the first failing side only, so a bad statement
//!     yields exactly one compatibility error.

use super::Finding;
use crate::bel::ast::{Function, Relation, RelationCategory, Term};
use crate::bel::diagnostics::Rule;

const ANY: &[Function] = &[];
const COMPLEX: &[Function] = &[Function::Complex, Function::ComplexList];
const PROCESS: &[Function] = &[Function::BiologicalProcess, Function::Pathology];
const ACTIVITY_OR_TRANSFORMATION: &[Function] = &[
    Function::Activity,
    Function::CellSecretion,
    Function::Degradation,
    Function::CellSurfaceExpression,
    Function::Translocation,
    Function::Reaction,
];
const LIST: &[Function] = &[Function::List];
const NOT_LIST: &[Function] = &[
    Function::Abundance,
    Function::Gene,
    Function::Rna,
    Function::MicroRna,
    Function::Protein,
    Function::Population,
    Function::Complex,
    Function::ComplexList,
    Function::Composite,
];

/// Structural constraint beyond the per-side kind lists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Free,
    /// Subject and object apply the same function, drawn from the list
    SameKind(&'static [Function]),
    /// The subject applies `act(...)` somewhere inside
    ContainsActivity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Compatibility {
    pub relation: Relation,
    pub subject: &'static [Function],
    pub object: &'static [Function],
    pub shape: Shape,
}

const fn row(
    relation: Relation,
    subject: &'static [Function],
    object: &'static [Function],
    shape: Shape,
) -> Compatibility {
    Compatibility {
        relation,
        subject,
        object,
        shape,
    }
}

pub static COMPATIBILITY: [Compatibility; 12] = [
    row(
        Relation::TranscribedTo,
        &[Function::Gene],
        &[Function::Rna, Function::MicroRna],
        Shape::Free,
    ),
    row(
        Relation::TranslatedTo,
        &[Function::Rna],
        &[Function::Protein],
        Shape::Free,
    ),
    row(
        Relation::Orthologous,
        ANY,
        ANY,
        Shape::SameKind(&[Function::Gene, Function::Rna]),
    ),
    row(Relation::AnalogousTo, ANY, ANY, Shape::SameKind(ANY)),
    row(Relation::HasComponent, COMPLEX, NOT_LIST, Shape::Free),
    row(Relation::HasComponents, COMPLEX, LIST, Shape::Free),
    row(Relation::HasMember, COMPLEX, NOT_LIST, Shape::Free),
    row(Relation::HasMembers, COMPLEX, LIST, Shape::Free),
    row(
        Relation::SubProcessOf,
        ACTIVITY_OR_TRANSFORMATION,
        PROCESS,
        Shape::Free,
    ),
    row(Relation::RateLimitingStepOf, ANY, ANY, Shape::ContainsActivity),
    row(Relation::BiomarkerFor, ANY, PROCESS, Shape::Free),
    row(Relation::PrognosticBiomarkerFor, ANY, PROCESS, Shape::Free),
];

pub fn compatibility(relation: Relation) -> Option<&'static Compatibility> {
    COMPATIBILITY.iter().find(|row| row.relation == relation)
}

fn names(functions: &[Function]) -> String {
    functions
        .iter()
        .map(|f| f.short_name())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Check one subject/relation/object triple against its table row
pub fn check(relation: Relation, subject: &Term, object: &Term) -> Option<Finding> {
    let row = compatibility(relation)?;

    if !row.subject.is_empty() && !row.subject.contains(&subject.function) {
        return Some(Finding {
            rule: Rule::IncompatibleSubject,
            message: format!(
                "{} does not accept a {} subject",
                relation,
                subject.function.short_name()
            ),
            hint: Some(format!("subject must be one of: {}", names(row.subject))),
        });
    }
    if !row.object.is_empty() && !row.object.contains(&object.function) {
        return Some(Finding {
            rule: Rule::IncompatibleObject,
            message: format!(
                "{} does not accept a {} object",
                relation,
                object.function.short_name()
            ),
            hint: Some(format!("object must be one of: {}", names(row.object))),
        });
    }

    match row.shape {
        Shape::Free => None,
        Shape::SameKind(kinds) => {
            if !kinds.is_empty() && !kinds.contains(&subject.function) {
                Some(Finding {
                    rule: Rule::IncompatibleSubject,
                    message: format!(
                        "{} does not accept a {} subject",
                        relation,
                        subject.function.short_name()
                    ),
                    hint: Some(format!("subject must be one of: {}", names(kinds))),
                })
            } else if subject.function != object.function {
                Some(Finding {
                    rule: Rule::IncompatibleObject,
                    message: format!(
                        "{} relates terms of the same kind, found {} and {}",
                        relation,
                        subject.function.short_name(),
                        object.function.short_name()
                    ),
                    hint: Some(format!(
                        "use a {}(...) object",
                        subject.function.short_name()
                    )),
                })
            } else {
                None
            }
        }
        Shape::ContainsActivity => {
            if subject.contains_function(Function::Activity) {
                None
            } else {
                Some(Finding {
                    rule: Rule::IncompatibleSubject,
                    message: format!("{} needs a subject containing an activity", relation),
                    hint: Some("wrap the subject in act(...)".to_string()),
                })
            }
        }
    }
}

/// Structural relations whose subject may not appear on the object side
pub fn bans_self_reference(relation: Relation) -> bool {
    matches!(
        relation,
        Relation::HasComponent
            | Relation::HasComponents
            | Relation::HasMember
            | Relation::HasMembers
    )
}

/// The subject equals the object or one of its list members
pub fn is_self_reference(subject: &Term, object: &Term) -> bool {
    if subject == object {
        return true;
    }
    object.function == Function::List && object.children().into_iter().any(|m| m == subject)
}

/// Only causal relations may take a nested statement as object
pub fn accepts_nested(relation: Relation) -> bool {
    relation.category() == RelationCategory::Causal
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bel::ast::TermBody;
    use rstest::rstest;

    fn term(function: Function) -> Term {
        match function {
            Function::List | Function::Composite | Function::ComplexList => Term::new(
                function,
                TermBody::Terms(vec![Term::reference(Function::Protein, "HGNC", "A")]),
            ),
            Function::Activity => Term::new(
                function,
                TermBody::Terms(vec![Term::reference(Function::Protein, "HGNC", "A")]),
            ),
            _ => Term::reference(function, "NS", "x"),
        }
    }

    #[rstest]
    #[case(Relation::TranscribedTo, Function::Gene, Function::Rna, None)]
    #[case(
        Relation::TranscribedTo,
        Function::Gene,
        Function::Protein,
        Some(Rule::IncompatibleObject)
    )]
    #[case(
        Relation::TranscribedTo,
        Function::Protein,
        Function::Rna,
        Some(Rule::IncompatibleSubject)
    )]
    #[case(Relation::TranslatedTo, Function::Rna, Function::Protein, None)]
    #[case(
        Relation::TranslatedTo,
        Function::Gene,
        Function::Protein,
        Some(Rule::IncompatibleSubject)
    )]
    #[case(Relation::Orthologous, Function::Gene, Function::Gene, None)]
    #[case(
        Relation::Orthologous,
        Function::Gene,
        Function::Rna,
        Some(Rule::IncompatibleObject)
    )]
    #[case(
        Relation::Orthologous,
        Function::Protein,
        Function::Protein,
        Some(Rule::IncompatibleSubject)
    )]
    #[case(Relation::HasComponents, Function::Complex, Function::List, None)]
    #[case(
        Relation::HasComponents,
        Function::Complex,
        Function::Protein,
        Some(Rule::IncompatibleObject)
    )]
    #[case(
        Relation::HasMember,
        Function::Protein,
        Function::Protein,
        Some(Rule::IncompatibleSubject)
    )]
    #[case(
        Relation::SubProcessOf,
        Function::Activity,
        Function::BiologicalProcess,
        None
    )]
    #[case(
        Relation::SubProcessOf,
        Function::Protein,
        Function::BiologicalProcess,
        Some(Rule::IncompatibleSubject)
    )]
    #[case(
        Relation::RateLimitingStepOf,
        Function::Protein,
        Function::BiologicalProcess,
        Some(Rule::IncompatibleSubject)
    )]
    #[case(
        Relation::BiomarkerFor,
        Function::Protein,
        Function::Pathology,
        None
    )]
    #[case(
        Relation::PrognosticBiomarkerFor,
        Function::Protein,
        Function::Protein,
        Some(Rule::IncompatibleObject)
    )]
    #[case(Relation::Increases, Function::Gene, Function::Pathology, None)]
    fn test_compatibility(
        #[case] relation: Relation,
        #[case] subject: Function,
        #[case] object: Function,
        #[case] expected: Option<Rule>,
    ) {
        let violation = check(relation, &term(subject), &term(object));
        assert_eq!(violation.map(|v| v.rule), expected);
    }

    #[test]
    fn test_every_row_is_unique() {
        for row in COMPATIBILITY.iter() {
            assert_eq!(
                COMPATIBILITY
                    .iter()
                    .filter(|other| other.relation == row.relation)
                    .count(),
                1
            );
        }
    }

    #[test]
    fn test_rate_limiting_finds_nested_activity() {
        let subject = Term::new(
            Function::Reaction,
            TermBody::Reaction {
                reactants: vec![term(Function::Activity)],
                products: Vec::new(),
            },
        );
        assert!(check(
            Relation::RateLimitingStepOf,
            &subject,
            &term(Function::BiologicalProcess)
        )
        .is_none());
    }

    #[test]
    fn test_self_reference() {
        let a = Term::reference(Function::Protein, "HGNC", "A");
        let b = Term::reference(Function::Protein, "HGNC", "B");
        let list = Term::new(Function::List, TermBody::Terms(vec![b.clone(), a.clone()]));
        assert!(is_self_reference(&a, &a));
        assert!(is_self_reference(&a, &list));
        assert!(!is_self_reference(&a, &b));
        assert!(bans_self_reference(Relation::HasMembers));
        assert!(!bans_self_reference(Relation::Increases));
    }

    #[test]
    fn test_nested_only_under_causal() {
        assert!(accepts_nested(Relation::DirectlyDecreases));
        assert!(!accepts_nested(Relation::Association));
    }
}
