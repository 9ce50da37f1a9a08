//! Evidence rewrapping
//!
//!     `SET Evidence`, `SET Support`, `SET SupportingText` and
//!     `SET DOCUMENT Description` values are often pasted across several
//!     lines without continuations, which leaves the quote unterminated on
//!     the first line. Such values are collapsed to single-spaced text and
//!     refilled at [WRAP_WIDTH] columns with `\` continuations.
//!
//!     A value only absorbs the lines up to its closing quote. A blank line,
//!     a directive or a term start ends the search first; the value is then
//!     left to the quote-parity step and the following lines are untouched.

use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;

use super::{Change, ChangeKind};

pub const WRAP_WIDTH: usize = 70;

/// Keyword and opening quote of a rewrappable value
static EVIDENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^(SET[ \t]+(?:DOCUMENT[ \t]+Description|Evidence|SupportingText|Support))[ \t]*=[ \t]*""#,
    )
    .expect("evidence pattern")
});

/// Lines that can never continue a pasted value
static STOP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[ \t]*(?:$|(?:SET|UNSET|DEFINE)\b|[A-Za-z]+\()").expect("stop line pattern")
});

static BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\?\n|\\ ").expect("line break pattern"));

static STRAY_BACKSLASH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\(\w)").expect("stray backslash pattern"));

/// A quoted value spanning more than one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    /// Bytes of the covered lines, without the final newline
    pub range: Range<usize>,
    /// 1-based lines covered
    pub lines: Range<usize>,
    keyword: String,
    value: String,
    /// Text after the closing quote
    tail: String,
}

/// Byte offset of the first quote not escaped by a backslash
fn closing_quote(text: &str) -> Option<usize> {
    let mut escaped = false;
    for (index, ch) in text.char_indices() {
        match ch {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '"' => return Some(index),
            _ => {}
        }
    }
    None
}

/// The value opened on line `first`, if it closes on a later line after
/// at least one bare line break
fn open_value(lines: &[&str], starts: &[usize], first: usize) -> Option<Span> {
    let opening = EVIDENCE.captures(lines[first])?;
    let keyword = opening.get(1)?.as_str().to_string();
    let mut rest = &lines[first][opening.get(0)?.end()..];
    let mut value = String::new();
    let mut bare = false;
    let mut index = first;
    loop {
        if let Some(close) = closing_quote(rest) {
            if !bare {
                return None;
            }
            value.push_str(&rest[..close]);
            return Some(Span {
                range: starts[first]..starts[index] + lines[index].len(),
                lines: first + 1..index + 2,
                keyword,
                value,
                tail: rest[close + 1..].to_string(),
            });
        }
        value.push_str(rest);
        let continued = rest.ends_with('\\');
        index += 1;
        let next = *lines.get(index)?;
        if !continued {
            if STOP.is_match(next) {
                return None;
            }
            bare = true;
        }
        value.push('\n');
        rest = next;
    }
}

/// Evidence/description values in `text` broken over lines without continuations
pub fn multiline_spans(text: &str) -> Vec<Span> {
    let lines: Vec<&str> = text.split('\n').collect();
    let mut starts = Vec::with_capacity(lines.len());
    let mut offset = 0;
    for line in &lines {
        starts.push(offset);
        offset += line.len() + 1;
    }

    let mut spans = Vec::new();
    let mut index = 0;
    while index < lines.len() {
        match open_value(&lines, &starts, index) {
            Some(span) => {
                index = span.lines.end - 1;
                spans.push(span);
            }
            None => index += 1,
        }
    }
    spans
}

/// Collapse and refill one value
pub fn normalize(value: &str) -> String {
    let joined = BREAK.replace_all(value, " ");
    let collapsed = joined.split_whitespace().collect::<Vec<_>>().join(" ");
    STRAY_BACKSLASH.replace_all(&collapsed, "$1").into_owned()
}

/// Greedy fill; words longer than `width` get a line of their own
pub fn fill(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split(' ') {
        if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Rewrite every multi-line evidence value in `text`
pub fn rewrap(text: &str, changes: &mut Vec<Change>) -> String {
    let mut output = String::with_capacity(text.len());
    let mut last = 0;
    for span in multiline_spans(text) {
        let wrapped = fill(&normalize(&span.value), WRAP_WIDTH).join(" \\\n");
        let replacement = format!("{} = \"{}\"{}", span.keyword, wrapped, span.tail);

        output.push_str(&text[last..span.range.start]);
        output.push_str(&replacement);
        last = span.range.end;

        changes.push(Change {
            line: span.lines.start,
            kind: ChangeKind::EvidenceWrap,
            before: text[span.range.clone()].to_string(),
            after: replacement,
        });
    }
    output.push_str(&text[last..]);
    output
}
