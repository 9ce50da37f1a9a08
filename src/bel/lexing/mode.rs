//! Context-sensitive word classification
//!
//!     The same bare word can be a keyword in one position and a plain value
//!     in another: `pmod` names a modifier inside `p(...)` but is just a word
//!     anywhere else, and `fromLoc` only means something inside `tloc(...)`.
//!     Rather than keeping a hidden lexer state, the parser passes the mode
//!     explicitly whenever it asks what a word is.

use crate::bel::ast::{Function, ModifierKind, Relation, ResolvedRelation};

/// Where a word appears
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexMode {
    /// Statement level: subject/object heads and relation keywords
    Statement,
    /// Inside a term's argument list
    Modifier,
}

/// Argument wrappers only valid inside specific term functions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgumentFunction {
    Fusion,
    FromLocation,
    ToLocation,
    Reactants,
    Products,
}

impl ArgumentFunction {
    pub fn from_name(name: &str) -> Option<ArgumentFunction> {
        let function = match name {
            "fus" | "fusion" => ArgumentFunction::Fusion,
            "fromLoc" | "fromLocation" => ArgumentFunction::FromLocation,
            "toLoc" | "toLocation" => ArgumentFunction::ToLocation,
            "reactants" => ArgumentFunction::Reactants,
            "products" => ArgumentFunction::Products,
            _ => return None,
        };
        Some(function)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ArgumentFunction::Fusion => "fus",
            ArgumentFunction::FromLocation => "fromLoc",
            ArgumentFunction::ToLocation => "toLoc",
            ArgumentFunction::Reactants => "reactants",
            ArgumentFunction::Products => "products",
        }
    }
}

/// What a bare word means in a given mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordClass {
    Function(Function),
    Modifier(ModifierKind),
    Argument(ArgumentFunction),
    Relation(ResolvedRelation),
    Plain,
}

/// Classify a word that heads a call (`word(`) or sits between two terms
pub fn classify(word: &str, mode: LexMode) -> WordClass {
    match mode {
        LexMode::Statement => {
            if let Some(function) = Function::from_name(word) {
                WordClass::Function(function)
            } else if let Some(relation) = Relation::from_keyword(word) {
                WordClass::Relation(relation)
            } else {
                WordClass::Plain
            }
        }
        LexMode::Modifier => {
            if let Some(function) = Function::from_name(word) {
                WordClass::Function(function)
            } else if let Some(kind) = ModifierKind::from_name(word) {
                WordClass::Modifier(kind)
            } else if let Some(argument) = ArgumentFunction::from_name(word) {
                WordClass::Argument(argument)
            } else {
                WordClass::Plain
            }
        }
    }
}
