//! Term, statement and document model
//!
//!     Everything downstream of the parser speaks in these types. Terms are
//!     immutable values owned by their statement; statements are appended to
//!     the [ParseResult] in document order and never revisited.
//!
//!     Structural equality of terms ignores modifier order (see
//!     [Term](term::Term)) while serialization keeps it, so two spellings of
//!     the same assertion compare equal but each prints the way it was
//!     written.

pub mod document;
pub mod modifier;
pub mod relation;
pub mod span;
pub mod statement;
pub mod term;

pub use document::{
    AnnotationContext, Citation, Definition, DefinitionKind, Document, DocumentProperty,
    ParseResult, ReferenceKind, Registry,
};
pub use modifier::{
    AminoAcid, AminoAcidCode, Fragment, GeneModification, ModificationPosition,
    ModificationType, Modifier, ModifierKind, MolecularActivity, PmodType,
    ProteinModification, DEFAULT_ACTIVITIES,
};
pub use relation::{Relation, RelationCategory, ResolvedRelation};
pub use span::{LineIndex, Position};
pub use statement::{NestedStatement, Statement, StatementObject};
pub use term::{Function, Fusion, NamespaceRef, Term, TermBody};
