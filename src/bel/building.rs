//! Model building
//!
//! Converts parser output into the canonical term and statement model.
//!
//! Structure:
//!     - [values]: unescaping and whitespace normalization of raw values
//!     - [terms]: per-function argument shapes, modifiers, fusions
//!     - [statements]: subject/relation/object assembly
//!
//! The builder only enforces shape. It never consults definitions or the
//! compatibility tables; a [BuiltStatement] carries the source sites the
//! validator needs to report against.

pub mod statements;
pub mod terms;
pub mod values;

use crate::bel::ast::Statement;
use crate::bel::diagnostics::Rule;
use crate::bel::parsing::RawRelation;
use std::fmt;
use std::ops::Range;

pub use statements::build_statement;
pub use terms::{FusionSite, ModifierSite, ReferenceUse, Sites};
pub use values::{canonical, normalize_text, unescape};

/// A term whose arguments do not fit its function
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildError {
    pub message: String,
    pub range: Range<usize>,
}

impl BuildError {
    pub fn rule(&self) -> Rule {
        Rule::TermShape
    }
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for BuildError {}

/// The nested statement's pieces and where they were written
#[derive(Debug, Clone, PartialEq)]
pub struct NestedSites {
    pub subject: Range<usize>,
    pub relation: RawRelation,
    pub object: Range<usize>,
}

/// A statement plus the source positions of its parts
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltStatement {
    pub statement: Statement,
    pub subject_range: Range<usize>,
    pub relation: Option<RawRelation>,
    pub object_range: Option<Range<usize>>,
    pub nested: Option<NestedSites>,
    pub sites: Sites,
}
