//! Grammar parser
//!
//! Turns logical token lines into [ParsedLine] items.
//!
//! Structure:
//!     - [combinators]: token-level helpers shared by all productions
//!     - [terms]: recursive term grammar and statement lines
//!     - [directives]: DEFINE, SET and UNSET
//!     - [engine]: per-line dispatch, chumsky error conversion, section order
//!     - [ir]: the parse items handed to the builder
//!
//! Error Recovery
//!
//!     Recovery is line based. A line that matches no production yields one
//!     [GrammarError] and the caller moves on to the next line; nothing a
//!     broken line would have changed (definitions, SET state) is applied.

pub mod combinators;
pub mod directives;
pub mod engine;
pub mod ir;
pub mod terms;

pub use engine::{parse_line, GrammarError, Section, SectionTracker};
pub use ir::{
    CallHead, ParsedLine, RawArg, RawCall, RawDefinitionReference, RawNested, RawObject,
    RawReference, RawRelation, RawStatement, RawValue, SetValues, UnsetTarget,
};
