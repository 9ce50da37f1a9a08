//! Whole-document tests over the sample scripts in docs/samples

use bel::bel::diagnostics::{render, ReportFormat, Rule};
use bel::bel::formats::{bel as canonical, json};
use bel::bel::pipeline::{parse_document, ParseOptions};
use bel::bel::repair::ChangeKind;
use std::fs;

fn read_sample(name: &str) -> String {
    fs::read_to_string(format!("docs/samples/{}", name)).expect("Failed to read sample document")
}

#[test]
fn test_corpus_is_valid() {
    let result = parse_document(&read_sample("corpus.bel"), &ParseOptions::default());
    assert!(result.is_valid(), "{:?}", result.diagnostics);
    assert_eq!(result.warning_count(), 0);
    assert_eq!(result.statements.len(), 3);
    assert_eq!(
        result.statements.iter().map(|s| s.line).collect::<Vec<_>>(),
        vec![12, 13, 15]
    );
}

#[test]
fn test_corpus_canonical_text() {
    let result = parse_document(&read_sample("corpus.bel"), &ParseOptions::default());
    insta::assert_snapshot!(canonical::document(&result), @r###"
    SET DOCUMENT Name = "Small corpus"
    SET DOCUMENT Version = "1.0"

    DEFINE NAMESPACE HGNC AS URL "https://example.org/hgnc.belns"
    DEFINE NAMESPACE GO AS URL "https://example.org/go.belns"
    DEFINE ANNOTATION Species AS LIST {"10090", "9606"}

    SET Citation = {"PubMed", "Interferon signalling", "12345"}
    SET Evidence = "IFNG raises TNF"
    SET Species = "9606"
    p(HGNC:IFNG) increases p(HGNC:TNF)
    p(HGNC:AKT1, pmod(Ph, Ser, 473)) directlyIncreases act(p(HGNC:MTOR), ma(kin))
    UNSET Species
    p(HGNC:TNF) decreases bp(GO:"cell death") // feedback
    "###);
}

#[test]
fn test_canonical_document_reparses_to_same_statements() {
    let options = ParseOptions::default();
    let first = parse_document(&read_sample("corpus.bel"), &options);
    let second = parse_document(&canonical::document(&first), &options);
    assert!(second.is_valid(), "{:?}", second.diagnostics);
    assert_eq!(first.document, second.document);
    assert_eq!(first.statements.len(), second.statements.len());
    for (a, b) in first.statements.iter().zip(&second.statements) {
        assert!(a.same_assertion(b));
        assert_eq!(a.context, b.context);
    }
}

#[test]
fn test_corpus_json_export() {
    let result = parse_document(&read_sample("corpus.bel"), &ParseOptions::default());
    let exported = json::export(&result, &json::ExportOptions::default()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&exported).unwrap();
    assert_eq!(value["document"]["name"], "Small corpus");
    assert_eq!(value["namespaces"][0]["keyword"], "HGNC");
    assert_eq!(value["statements"].as_array().map(Vec::len), Some(3));
    assert_eq!(value["statements"][2]["comment"], "feedback");
    assert_eq!(value["statements"][0]["annotations"]["Species"][0], "9606");
    assert_eq!(value["statements"][0]["citation"]["reference"], "12345");
}

#[test]
fn test_multiline_evidence_needs_repair() {
    let source = read_sample("needs-repair.bel");

    let plain = parse_document(&source, &ParseOptions::default());
    assert!(!plain.is_valid());
    assert!(plain
        .diagnostics
        .iter()
        .any(|d| d.rule == Rule::UnterminatedString));

    let options = ParseOptions {
        repair: true,
        ..ParseOptions::default()
    };
    let repaired = parse_document(&source, &options);
    assert!(repaired.is_valid(), "{:?}", repaired.diagnostics);
    let kinds: Vec<ChangeKind> = repaired.repairs.iter().map(|c| c.kind).collect();
    assert!(kinds.contains(&ChangeKind::EvidenceWrap));
    assert!(kinds.contains(&ChangeKind::TrailingWhitespace));
    assert_eq!(
        repaired.statements[0].context.evidence.as_deref(),
        Some("IFNG was found to increase TNF secretion in primary macrophages")
    );
}

#[test]
fn test_markdown_report() {
    let source = "DEFINE NAMESPACE HGNC AS URL \"h\"\n\
                  DEFINE ANNOTATION TimePoint AS LIST {\"4 days dpi\"}\n\
                  SET TimePoint = \"3 days dpi\"\n\
                  UNSET Species\n";
    let result = parse_document(source, &ParseOptions::default());
    let report = render(&result.diagnostics, ReportFormat::Markdown).unwrap();
    insta::assert_snapshot!(report, @r###"
    | severity | category | line | column | rule | entry | message | hint |
    |---|---|---|---|---|---|---|---|
    | error | semantic | 3 | 17 | not-in-annotation-list | "3 days dpi" | "3 days dpi" is not in the TimePoint list | use one of: 4 days dpi |
    | warning | semantic | 4 | 7 | inactive-unset | Species | Species is not set |  |
    "###);
}
