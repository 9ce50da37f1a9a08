//! Value canonicalization
//!
//!     `HGNC:AKT1` and `HGNC:"AKT1"` name the same entity, so quoted values
//!     are unescaped to the same string a bare value would carry. Evidence
//!     text additionally loses line continuations and runs of whitespace.

use crate::bel::parsing::RawValue;

/// The canonical string of a bare or quoted value
pub fn canonical(value: &RawValue) -> String {
    if value.quoted {
        unescape(&value.text)
    } else {
        value.text.clone()
    }
}

/// Resolve `\"` and `\\`, and drop backslash-newline continuations
pub fn unescape(text: &str) -> String {
    let mut output = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            output.push(ch);
            continue;
        }
        match chars.peek().copied() {
            Some('"') | Some('\\') => {
                if let Some(escaped) = chars.next() {
                    output.push(escaped);
                }
            }
            Some('\r') | Some('\n') => {
                while matches!(chars.peek(), Some('\r') | Some('\n')) {
                    chars.next();
                }
                output.push(' ');
            }
            _ => output.push('\\'),
        }
    }
    output
}

/// Free text (evidence, descriptions) with whitespace collapsed
pub fn normalize_text(value: &RawValue) -> String {
    canonical(value)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quoted(text: &str) -> RawValue {
        RawValue {
            text: text.to_string(),
            quoted: true,
            range: 0..0,
        }
    }

    #[test]
    fn test_quoted_and_bare_agree() {
        assert_eq!(canonical(&quoted("AKT1")), canonical(&RawValue::bare("AKT1", 0..0)));
    }

    #[test]
    fn test_unescape() {
        assert_eq!(unescape(r#"a \"b\" c"#), r#"a "b" c"#);
        assert_eq!(unescape(r"back\\slash"), r"back\slash");
        assert_eq!(unescape(r"keep \d"), r"keep \d");
    }

    #[test]
    fn test_evidence_continuations_collapse() {
        let value = quoted("first line \\\n    second   line");
        assert_eq!(normalize_text(&value), "first line second line");
    }
}
