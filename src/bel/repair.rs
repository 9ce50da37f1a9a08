//! Textual repair pass
//!
//! Fixes mechanical defects in raw script text before lexing. The pass
//! never reorders or rewrites terms; every edit is recorded as a [Change]
//! so callers can show what happened.
//!
//! Steps, in order:
//!     1. strip carriage returns
//!     2. trim trailing whitespace, tightening `\ ` continuations to `\`
//!     3. close quotes left open at the end of a logical line
//!     4. rewrap multi-line evidence and description strings ([evidence])
//!
//! Steps 1 to 3 keep the line count, so every [Change::line] refers to a
//! line of the input text.

pub mod evidence;

use serde::Serialize;
use similar::{Algorithm, TextDiff};
use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChangeKind {
    CarriageReturn,
    TrailingWhitespace,
    Continuation,
    QuoteParity,
    EvidenceWrap,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChangeKind::CarriageReturn => "carriage return removed",
            ChangeKind::TrailingWhitespace => "trailing whitespace trimmed",
            ChangeKind::Continuation => "line continuation normalized",
            ChangeKind::QuoteParity => "unbalanced quote closed",
            ChangeKind::EvidenceWrap => "evidence text rewrapped",
        };
        write!(f, "{}", name)
    }
}

/// One edit made by the repair pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Change {
    /// 1-based input line the edit starts on
    pub line: usize,
    pub kind: ChangeKind,
    pub before: String,
    pub after: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepairReport {
    /// Text before repair
    pub source: String,
    pub text: String,
    pub changes: Vec<Change>,
}

impl RepairReport {
    pub fn is_unchanged(&self) -> bool {
        self.changes.is_empty()
    }

    /// Unified line diff of the input against the repaired text
    pub fn diff(&self) -> String {
        TextDiff::configure()
            .algorithm(Algorithm::Myers)
            .diff_lines(self.source.as_str(), self.text.as_str())
            .unified_diff()
            .context_radius(2)
            .header("original", "repaired")
            .to_string()
    }
}

/// Run every repair step over `source`
pub fn repair(source: &str) -> RepairReport {
    let mut changes = Vec::new();

    let text = repair_lines(source, &mut changes);
    let spans = evidence::multiline_spans(&text);
    let skip: BTreeSet<usize> = spans.iter().flat_map(|span| span.lines.clone()).collect();
    let text = close_quotes(&text, &skip, &mut changes);
    let text = evidence::rewrap(&text, &mut changes);

    changes.sort_by_key(|change| change.line);
    tracing::debug!(changes = changes.len(), "repair pass finished");
    RepairReport {
        source: source.to_string(),
        text,
        changes,
    }
}

/// Steps 1 and 2
fn repair_lines(source: &str, changes: &mut Vec<Change>) -> String {
    let mut lines = Vec::new();
    for (index, line) in source.split('\n').enumerate() {
        let number = index + 1;
        let mut current = line.to_string();

        if current.contains('\r') {
            let stripped = current.replace('\r', "");
            changes.push(Change {
                line: number,
                kind: ChangeKind::CarriageReturn,
                before: current,
                after: stripped.clone(),
            });
            current = stripped;
        }

        let trimmed = current.trim_end_matches([' ', '\t']);
        if trimmed.len() != current.len() {
            let kind = if trimmed.ends_with('\\') {
                ChangeKind::Continuation
            } else {
                ChangeKind::TrailingWhitespace
            };
            let trimmed = trimmed.to_string();
            changes.push(Change {
                line: number,
                kind,
                before: current,
                after: trimmed.clone(),
            });
            current = trimmed;
        }
        lines.push(current);
    }
    lines.join("\n")
}

/// Number of quotes not preceded by an escaping backslash
fn unescaped_quotes(line: &str) -> usize {
    let mut count = 0;
    let mut escaped = false;
    for ch in line.chars() {
        match ch {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '"' => count += 1,
            _ => {}
        }
    }
    count
}

/// Step 3, over logical lines (physical lines joined by `\` continuations)
fn close_quotes(text: &str, skip: &BTreeSet<usize>, changes: &mut Vec<Change>) -> String {
    let mut lines: Vec<String> = text.split('\n').map(str::to_string).collect();
    let mut start = 0;
    while start < lines.len() {
        let mut end = start;
        while end + 1 < lines.len() && lines[end].ends_with('\\') {
            end += 1;
        }
        let skipped = (start..=end).any(|index| skip.contains(&(index + 1)));
        let quotes: usize = lines[start..=end].iter().map(|l| unescaped_quotes(l)).sum();
        if !skipped && quotes % 2 == 1 {
            let before = lines[end].clone();
            lines[end].push('"');
            changes.push(Change {
                line: end + 1,
                kind: ChangeKind::QuoteParity,
                before,
                after: lines[end].clone(),
            });
        }
        start = end + 1;
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text_is_unchanged() {
        let source = "SET Citation = {\"PubMed\", \"123\"}\np(HGNC:A) -> p(HGNC:B)\n";
        let report = repair(source);
        assert!(report.is_unchanged());
        assert_eq!(report.text, source);
    }

    #[test]
    fn test_carriage_returns_and_trailing_whitespace() {
        let report = repair("p(HGNC:A) -> \\   \r\n  p(HGNC:B)  \r\n");
        assert_eq!(report.text, "p(HGNC:A) -> \\\n  p(HGNC:B)\n");
        let kinds: Vec<ChangeKind> = report.changes.iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ChangeKind::CarriageReturn,
                ChangeKind::Continuation,
                ChangeKind::CarriageReturn,
                ChangeKind::TrailingWhitespace,
            ]
        );
    }

    #[test]
    fn test_unbalanced_quote_is_closed() {
        let report = repair("p(HGNC:\"AKT1) -> p(HGNC:B)\np(HGNC:\"a\\\"b\")\n");
        assert_eq!(report.changes.len(), 1);
        assert_eq!(report.changes[0].line, 1);
        assert_eq!(report.changes[0].kind, ChangeKind::QuoteParity);
        assert!(report.text.starts_with("p(HGNC:\"AKT1) -> p(HGNC:B)\"\n"));
    }

    #[test]
    fn test_quotes_counted_across_continuations() {
        let source = "SET Evidence = \"first \\\nsecond\"\n";
        assert!(repair(source).is_unchanged());
    }

    fn changed_lines(diff: &str) -> (Vec<&str>, Vec<&str>) {
        let removed = diff
            .split('\n')
            .filter(|l| l.starts_with('-') && !l.starts_with("---"))
            .collect();
        let added = diff
            .split('\n')
            .filter(|l| l.starts_with('+') && !l.starts_with("+++"))
            .collect();
        (removed, added)
    }

    #[test]
    fn test_diff_compares_input_with_output() {
        let report = repair("p(HGNC:A)  \np(HGNC:B)\n");
        let diff = report.diff();
        assert!(diff.starts_with("--- original\n+++ repaired\n"));
        assert_eq!(
            changed_lines(&diff),
            (vec!["-p(HGNC:A)  "], vec!["+p(HGNC:A)"])
        );
    }

    #[test]
    fn test_line_touched_by_two_steps_diffs_once() {
        let report = repair("p(HGNC:A) -> p(HGNC:B) \r\n");
        assert_eq!(report.changes.len(), 2);
        let diff = report.diff();
        let (removed, added) = changed_lines(&diff);
        assert_eq!(removed, vec!["-p(HGNC:A) -> p(HGNC:B) \r"]);
        assert_eq!(added, vec!["+p(HGNC:A) -> p(HGNC:B)"]);
    }

    #[test]
    fn test_clean_text_has_empty_diff() {
        let report = repair("p(HGNC:A)\n");
        assert!(changed_lines(&report.diff()).0.is_empty());
    }
}
