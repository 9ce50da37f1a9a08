//! Property-based tests for the pipeline
//!
//! - arbitrary text and bytes never panic and every diagnostic points into the input
//! - canonical BEL text parses back to a structurally equal statement
//! - parallel batch parsing reports exactly what sequential parsing reports
//! - repairing a script with formatting defects never loses a statement

use bel::bel::ast::{
    AminoAcid, AminoAcidCode, Function, ModificationPosition, ModificationType, Modifier,
    PmodType, ProteinModification, Relation, Statement, StatementObject, Term, TermBody,
};
use bel::bel::formats::bel as canonical;
use bel::bel::pipeline::{parse_bytes, parse_document, ParseOptions};
use proptest::prelude::*;
use rayon::prelude::*;

const HEADER: &str = "DEFINE NAMESPACE HGNC AS URL \"https://example.org/hgnc.belns\"\n\
                      DEFINE NAMESPACE GO AS URL \"https://example.org/go.belns\"\n";

fn name() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9_]{0,6}( [A-Za-z0-9]{1,4})?"
}

fn pmod() -> impl Strategy<Value = Modifier> {
    (
        prop::sample::select(vec![
            PmodType::Phosphorylation,
            PmodType::Acetylation,
            PmodType::Ubiquitination,
        ]),
        prop::option::of(prop::sample::select(vec![
            AminoAcid::Ser,
            AminoAcid::Thr,
            AminoAcid::Tyr,
        ])),
        1u64..2000,
    )
        .prop_map(|(kind, amino_acid, position)| {
            Modifier::ProteinModification(ProteinModification {
                modification: ModificationType::Known(kind),
                position: amino_acid.map(|_| ModificationPosition::Known(position)),
                amino_acid: amino_acid.map(AminoAcidCode::Known),
            })
        })
}

fn variant() -> impl Strategy<Value = Modifier> {
    "p\\.[A-Z][a-z]{2}[0-9]{1,3}[A-Z][a-z]{2}".prop_map(|hgvs| Modifier::Variant { hgvs })
}

fn abundance() -> impl Strategy<Value = Term> {
    prop_oneof![
        (name(), prop::collection::vec(prop_oneof![pmod(), variant()], 0..3)).prop_map(
            |(name, modifiers)| {
                modifiers.into_iter().fold(
                    Term::reference(Function::Protein, "HGNC", &name),
                    Term::with_modifier,
                )
            }
        ),
        (name(), prop::option::of(variant())).prop_map(|(name, variant)| {
            let term = Term::reference(Function::Gene, "HGNC", &name);
            match variant {
                Some(variant) => term.with_modifier(variant),
                None => term,
            }
        }),
        name().prop_map(|name| Term::reference(Function::Rna, "HGNC", &name)),
        name().prop_map(|name| Term::reference(Function::BiologicalProcess, "GO", &name)),
    ]
}

fn term() -> impl Strategy<Value = Term> {
    prop_oneof![
        3 => abundance(),
        1 => abundance().prop_map(|inner| Term::new(
            Function::Activity,
            TermBody::Terms(vec![inner])
        )),
        1 => prop::collection::vec(abundance(), 1..3).prop_map(|members| Term::new(
            Function::ComplexList,
            TermBody::Terms(members)
        )),
    ]
}

fn statement() -> impl Strategy<Value = Statement> {
    (
        term(),
        prop::sample::select(vec![
            Relation::Increases,
            Relation::DirectlyDecreases,
            Relation::Association,
            Relation::PositiveCorrelation,
            Relation::Regulates,
        ]),
        term(),
    )
        .prop_map(|(subject, relation, object)| Statement {
            subject,
            relation: Some(relation),
            object: Some(StatementObject::Term(object)),
            comment: None,
            context: Default::default(),
            line: 1,
        })
}

/// One script item, already carrying its formatting defect
fn defective_line() -> impl Strategy<Value = String> {
    let item = prop_oneof![
        4 => statement().prop_map(|s| canonical::statement(&s)),
        1 => "[A-Za-z][A-Za-z ]{0,20}".prop_map(|text| format!("SET Evidence = \"{}\"", text)),
        1 => ("[a-z]{1,8}", "[a-z][a-z ]{0,12}")
            .prop_map(|(first, rest)| format!("SET Evidence = \"{}\n{}\"", first, rest)),
        1 => Just("SET Citation = {\"PubMed\", \"1\"}".to_string()),
    ];
    (item, 0u8..4).prop_map(|(line, defect)| match defect {
        1 => format!("{}\r", line),
        2 => format!("{}  ", line),
        3 if line.starts_with("SET Evidence") && line.ends_with('"') => {
            line[..line.len() - 1].to_string()
        }
        _ => line,
    })
}

proptest! {
    #[test]
    fn arbitrary_text_never_panics(source in "(\\PC|\n){0,200}") {
        let line_count = source.split('\n').count();
        let result = parse_document(&source, &ParseOptions::default());
        for diagnostic in &result.diagnostics {
            prop_assert!(diagnostic.line >= 1 && diagnostic.line <= line_count);
        }
    }

    #[test]
    fn arbitrary_bytes_never_panic(bytes in prop::collection::vec(any::<u8>(), 0..200)) {
        let result = parse_bytes(&bytes, &ParseOptions::default());
        prop_assert!(!result.aborted);
    }

    #[test]
    fn canonical_text_round_trips(original in statement()) {
        let text = canonical::statement(&original);
        let result = parse_document(&format!("{}{}\n", HEADER, text), &ParseOptions::default());
        prop_assert!(result.is_valid(), "{} -> {:?}", text, result.diagnostics);
        prop_assert_eq!(result.statements.len(), 1);
        prop_assert!(
            result.statements[0].same_assertion(&original),
            "{} parsed as {:?}",
            text,
            result.statements[0]
        );
    }

    #[test]
    fn repair_never_loses_statements(lines in prop::collection::vec(defective_line(), 1..12)) {
        let source = format!("{}{}\n", HEADER, lines.join("\n"));
        let plain = parse_document(&source, &ParseOptions::default());
        let repaired = parse_document(
            &source,
            &ParseOptions {
                repair: true,
                ..ParseOptions::default()
            },
        );
        prop_assert!(
            repaired.statements.len() >= plain.statements.len(),
            "{:?}: {} statements before repair, {} after",
            source,
            plain.statements.len(),
            repaired.statements.len()
        );
    }

    #[test]
    fn canonical_text_is_a_fixed_point(original in statement()) {
        let text = canonical::statement(&original);
        let result = parse_document(&format!("{}{}\n", HEADER, text), &ParseOptions::default());
        prop_assume!(result.statements.len() == 1);
        prop_assert_eq!(canonical::statement(&result.statements[0]), text);
    }
}

#[test]
fn parallel_parsing_matches_sequential() {
    let documents: Vec<String> = (0..24)
        .map(|i| {
            format!(
                "{}SET Citation = {{\"PubMed\", \"{}\"}}\n\
                 p(HGNC:A{}) -> p(HGNC:B)\n\
                 p(FOO:x) -> bp(GO:y)\n\
                 g(HGNC:C, pmod(Ph)) transcribedTo p(HGNC:C)\n\
                 p(HGNC:D, frag(\"?_?\"))\n\
                 UNSET Species\n",
                HEADER, i, i
            )
        })
        .collect();
    let options = ParseOptions::default();

    let sequential: Vec<_> = documents
        .iter()
        .map(|source| parse_document(source, &options).diagnostics)
        .collect();
    let parallel: Vec<_> = documents
        .par_iter()
        .map(|source| parse_document(source, &options).diagnostics)
        .collect();

    assert_eq!(sequential, parallel);
    assert!(sequential.iter().all(|diagnostics| diagnostics.len() == 5));
}
