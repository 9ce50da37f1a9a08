//! Output formats
//!
//!     - [bel]: canonical BEL text for terms, statements and documents
//!     - [json]: importable JSON export, gated on document validity
//!
//! Diagnostic reports are rendered by [crate::bel::diagnostics::report].

pub mod bel;
pub mod json;

pub use json::{export, ExportError, ExportOptions};
