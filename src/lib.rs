//! # bel
//!
//! A front end for BEL scripts: lexing, grammar parsing, term building and a
//! semantic rule pass that turns raw script text into a validated, structured
//! statement stream with precise diagnostics.
//!
//! File Layout
//!
//! src/bel
//!   ├── ast          Term, statement and document model
//!   ├── lexing       Source text to line-grouped tokens
//!   ├── parsing      Token lines to raw parse items
//!   ├── building     Raw items to canonical terms and statements
//!   ├── validation   Relation, modifier and vocabulary rules
//!   ├── repair       Optional textual clean-up before lexing
//!   ├── diagnostics  Diagnostic values and report rendering
//!   ├── formats      Canonical BEL text and importable JSON
//!   └── pipeline     Single document and batch orchestration
//!
//! The usual entry point is [`bel::pipeline::parse_document`].

#![allow(rustdoc::invalid_html_tags)]

pub mod bel;
