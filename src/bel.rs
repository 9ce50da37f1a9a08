//! Main module for bel library functionality

pub mod ast;
pub mod building;
pub mod diagnostics;
pub mod formats;
pub mod lexing;
pub mod parsing;
pub mod pipeline;
pub mod repair;
pub mod validation;

pub use ast::{Document, ParseResult, Statement, Term};
pub use diagnostics::{Category, Diagnostic, Rule, Severity};
pub use pipeline::{parse_document, ParseOptions};
