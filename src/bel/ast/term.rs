//! Terms: typed function applications
//!
//!     A term is a function (protein abundance, biological process, ...) applied
//!     to a body (a namespace reference, child terms, a fusion, ...) plus an
//!     ordered list of modifiers.
//!
//!     Equality is structural and recursive over function, body and modifiers,
//!     except that modifier order does not matter: `p(HGNC:A, loc(GO:x), var("p.="))`
//!     and `p(HGNC:A, var("p.="), loc(GO:x))` are the same term. The modifier
//!     vector itself keeps source order so serialization can reproduce it.

use super::modifier::Modifier;
use serde::Serialize;
use std::fmt;

/// Canonical term functions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Function {
    Abundance,
    Gene,
    Rna,
    MicroRna,
    Protein,
    Population,
    /// Named complex: `complex(GO:"...")`
    Complex,
    /// Complex of member terms: `complex(p(A), p(B))`
    ComplexList,
    Composite,
    Activity,
    CellSecretion,
    Degradation,
    CellSurfaceExpression,
    Translocation,
    Reaction,
    BiologicalProcess,
    Pathology,
    List,
}

impl Function {
    pub const ALL: [Function; 18] = [
        Function::Abundance,
        Function::Gene,
        Function::Rna,
        Function::MicroRna,
        Function::Protein,
        Function::Population,
        Function::Complex,
        Function::ComplexList,
        Function::Composite,
        Function::Activity,
        Function::CellSecretion,
        Function::Degradation,
        Function::CellSurfaceExpression,
        Function::Translocation,
        Function::Reaction,
        Function::BiologicalProcess,
        Function::Pathology,
        Function::List,
    ];

    /// Resolve a verbose or short function name written in term position.
    ///
    /// `complex`/`complexAbundance` resolve to [Function::Complex]; the term
    /// builder switches to [Function::ComplexList] when the arguments are terms.
    pub fn from_name(name: &str) -> Option<Function> {
        let function = match name {
            "a" | "abundance" => Function::Abundance,
            "g" | "geneAbundance" => Function::Gene,
            "r" | "rnaAbundance" => Function::Rna,
            "m" | "microRNAAbundance" => Function::MicroRna,
            "p" | "proteinAbundance" => Function::Protein,
            "pop" | "populationAbundance" => Function::Population,
            "complex" | "complexAbundance" => Function::Complex,
            "composite" | "compositeAbundance" => Function::Composite,
            "act" | "activity" => Function::Activity,
            "sec" | "cellSecretion" => Function::CellSecretion,
            "deg" | "degradation" => Function::Degradation,
            "surf" | "cellSurfaceExpression" => Function::CellSurfaceExpression,
            "tloc" | "translocation" => Function::Translocation,
            "rxn" | "reaction" => Function::Reaction,
            "bp" | "biologicalProcess" => Function::BiologicalProcess,
            "path" | "pathology" => Function::Pathology,
            "list" => Function::List,
            _ => return None,
        };
        Some(function)
    }

    /// Short name used by canonical serialization
    pub fn short_name(&self) -> &'static str {
        match self {
            Function::Abundance => "a",
            Function::Gene => "g",
            Function::Rna => "r",
            Function::MicroRna => "m",
            Function::Protein => "p",
            Function::Population => "pop",
            Function::Complex | Function::ComplexList => "complex",
            Function::Composite => "composite",
            Function::Activity => "act",
            Function::CellSecretion => "sec",
            Function::Degradation => "deg",
            Function::CellSurfaceExpression => "surf",
            Function::Translocation => "tloc",
            Function::Reaction => "rxn",
            Function::BiologicalProcess => "bp",
            Function::Pathology => "path",
            Function::List => "list",
        }
    }

    /// Human readable name used in diagnostics
    pub fn display_name(&self) -> &'static str {
        match self {
            Function::Abundance => "abundance",
            Function::Gene => "geneAbundance",
            Function::Rna => "rnaAbundance",
            Function::MicroRna => "microRNAAbundance",
            Function::Protein => "proteinAbundance",
            Function::Population => "populationAbundance",
            Function::Complex => "complexAbundance",
            Function::ComplexList => "complexAbundance list",
            Function::Composite => "compositeAbundance",
            Function::Activity => "activity",
            Function::CellSecretion => "cellSecretion",
            Function::Degradation => "degradation",
            Function::CellSurfaceExpression => "cellSurfaceExpression",
            Function::Translocation => "translocation",
            Function::Reaction => "reaction",
            Function::BiologicalProcess => "biologicalProcess",
            Function::Pathology => "pathology",
            Function::List => "list",
        }
    }

    /// Molecules that may wrap a fusion
    pub fn is_fusion_host(&self) -> bool {
        matches!(self, Function::Gene | Function::Rna | Function::Protein)
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// A `NAMESPACE:value` pair
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NamespaceRef {
    pub namespace: String,
    pub name: String,
}

impl NamespaceRef {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for NamespaceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.name)
    }
}

/// Gene/RNA/protein breakpoint fusion: two range-qualified partners
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fusion {
    pub partner_5: NamespaceRef,
    pub range_5: String,
    pub partner_3: NamespaceRef,
    pub range_3: String,
}

/// What a function is applied to
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TermBody {
    Reference(NamespaceRef),
    Terms(Vec<Term>),
    Fusion(Fusion),
    Translocation {
        abundance: Box<Term>,
        from_location: NamespaceRef,
        to_location: NamespaceRef,
    },
    Reaction {
        reactants: Vec<Term>,
        products: Vec<Term>,
    },
}

/// A typed function application
#[derive(Debug, Clone, Serialize)]
pub struct Term {
    pub function: Function,
    pub body: TermBody,
    pub modifiers: Vec<Modifier>,
}

impl Term {
    pub fn new(function: Function, body: TermBody) -> Self {
        Self {
            function,
            body,
            modifiers: Vec::new(),
        }
    }

    /// Shorthand for `function(NS:name)`
    pub fn reference(function: Function, namespace: &str, name: &str) -> Self {
        Self::new(function, TermBody::Reference(NamespaceRef::new(namespace, name)))
    }

    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.push(modifier);
        self
    }

    pub fn is_fusion(&self) -> bool {
        matches!(self.body, TermBody::Fusion(_))
    }

    /// Direct child terms (members, wrapped abundances, reaction partners)
    pub fn children(&self) -> Vec<&Term> {
        match &self.body {
            TermBody::Reference(_) | TermBody::Fusion(_) => Vec::new(),
            TermBody::Terms(terms) => terms.iter().collect(),
            TermBody::Translocation { abundance, .. } => vec![abundance.as_ref()],
            TermBody::Reaction {
                reactants,
                products,
            } => reactants.iter().chain(products.iter()).collect(),
        }
    }

    /// True when this term or any nested term applies `function`
    pub fn contains_function(&self, function: Function) -> bool {
        self.function == function
            || self
                .children()
                .into_iter()
                .any(|child| child.contains_function(function))
    }
}

impl PartialEq for Term {
    fn eq(&self, other: &Self) -> bool {
        self.function == other.function
            && self.body == other.body
            && same_modifiers(&self.modifiers, &other.modifiers)
    }
}

/// Multiset comparison: order is irrelevant, multiplicity is not
fn same_modifiers(left: &[Modifier], right: &[Modifier]) -> bool {
    if left.len() != right.len() {
        return false;
    }
    let mut used = vec![false; right.len()];
    left.iter().all(|modifier| {
        let found = right
            .iter()
            .enumerate()
            .find(|(i, candidate)| !used[*i] && *candidate == modifier)
            .map(|(i, _)| i);
        match found {
            Some(i) => {
                used[i] = true;
                true
            }
            None => false,
        }
    })
}
