//! Intermediate parse items
//!
//!     The parser recognizes the shape of a line and classifies words, but
//!     does not interpret arguments: a term is still a head plus a list of
//!     raw arguments, values are still unescaped source text. The builder
//!     turns these into the canonical model.

use crate::bel::ast::{DefinitionKind, DocumentProperty, Function, ModifierKind, Relation};
use crate::bel::lexing::ArgumentFunction;
use std::ops::Range;

/// A bare or quoted value as written (quotes removed, escapes kept)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawValue {
    pub text: String,
    pub quoted: bool,
    pub range: Range<usize>,
}

impl RawValue {
    pub fn bare(text: impl Into<String>, range: Range<usize>) -> Self {
        Self {
            text: text.into(),
            quoted: false,
            range,
        }
    }

    /// Strip the surrounding quotes of a quoted token
    pub fn quoted(token_text: &str, range: Range<usize>) -> Self {
        let inner = token_text
            .strip_prefix('"')
            .and_then(|rest| rest.strip_suffix('"'))
            .unwrap_or(token_text);
        Self {
            text: inner.to_string(),
            quoted: true,
            range,
        }
    }
}

/// `NAMESPACE:value`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawReference {
    pub namespace: RawValue,
    pub name: RawValue,
}

impl RawReference {
    pub fn range(&self) -> Range<usize> {
        self.namespace.range.start..self.name.range.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallHead {
    Function(Function),
    Modifier(ModifierKind),
    Argument(ArgumentFunction),
}

/// `head(arg, arg, ...)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCall {
    pub head: CallHead,
    pub head_text: String,
    pub args: Vec<RawArg>,
    pub range: Range<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawArg {
    Value(RawValue),
    Reference(RawReference),
    Call(RawCall),
}

impl RawArg {
    pub fn range(&self) -> Range<usize> {
        match self {
            RawArg::Value(value) => value.range.clone(),
            RawArg::Reference(reference) => reference.range(),
            RawArg::Call(call) => call.range.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRelation {
    pub relation: Relation,
    /// Written with an outdated spelling
    pub deprecated: bool,
    pub text: String,
    pub range: Range<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawNested {
    pub subject: RawCall,
    pub relation: RawRelation,
    pub object: RawCall,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawObject {
    Term(RawCall),
    Nested(Box<RawNested>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawStatement {
    pub subject: RawCall,
    pub relation: Option<RawRelation>,
    pub object: Option<RawObject>,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawDefinitionReference {
    Url(RawValue),
    Pattern(RawValue),
    List(Vec<RawValue>),
    File(RawValue),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetValues {
    One(RawValue),
    Many(Vec<RawValue>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnsetTarget {
    StatementGroup,
    All,
    Keys(Vec<RawValue>),
}

/// One parsed logical line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedLine {
    DocumentProperty {
        property: DocumentProperty,
        value: RawValue,
    },
    Define {
        kind: DefinitionKind,
        keyword: RawValue,
        reference: RawDefinitionReference,
    },
    Set {
        key: RawValue,
        values: SetValues,
    },
    SetCitation {
        fields: Vec<RawValue>,
    },
    SetStatementGroup {
        value: RawValue,
    },
    Unset {
        target: UnsetTarget,
    },
    Statement(RawStatement),
    Comment(String),
}

impl ParsedLine {
    pub fn label(&self) -> &'static str {
        match self {
            ParsedLine::DocumentProperty { .. } => "document property",
            ParsedLine::Define { .. } => "definition",
            ParsedLine::Set { .. }
            | ParsedLine::SetCitation { .. }
            | ParsedLine::SetStatementGroup { .. } => "SET",
            ParsedLine::Unset { .. } => "UNSET",
            ParsedLine::Statement(_) => "statement",
            ParsedLine::Comment(_) => "comment",
        }
    }
}
