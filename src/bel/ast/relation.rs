//! Canonical relations
//!
//!     Relations are a closed, static enumeration. Verbose names, short names
//!     and symbolic operators all resolve to one variant, so `->` and
//!     `increases` are indistinguishable once parsed.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    // Causal
    Increases,
    DirectlyIncreases,
    Decreases,
    DirectlyDecreases,
    RateLimitingStepOf,
    CausesNoChange,
    Regulates,
    // Correlative
    PositiveCorrelation,
    NegativeCorrelation,
    Association,
    NoCorrelation,
    // Genomic
    Orthologous,
    TranscribedTo,
    TranslatedTo,
    AnalogousTo,
    // Other
    BiomarkerFor,
    PrognosticBiomarkerFor,
    SubProcessOf,
    IsA,
    EquivalentTo,
    Binds,
    // Structural
    HasComponent,
    HasComponents,
    HasMember,
    HasMembers,
    // Normally injected by a compiler
    HasVariant,
    HasReactant,
    HasProduct,
    HasModification,
    HasFragment,
    Includes,
    ActsIn,
    Translocates,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationCategory {
    Causal,
    Correlative,
    Genomic,
    Other,
    Structural,
    Injected,
}

/// Result of resolving a relation keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedRelation {
    pub relation: Relation,
    /// The keyword is an outdated spelling of `relation`
    pub deprecated: bool,
}

impl Relation {
    pub const ALL: [Relation; 33] = [
        Relation::Increases,
        Relation::DirectlyIncreases,
        Relation::Decreases,
        Relation::DirectlyDecreases,
        Relation::RateLimitingStepOf,
        Relation::CausesNoChange,
        Relation::Regulates,
        Relation::PositiveCorrelation,
        Relation::NegativeCorrelation,
        Relation::Association,
        Relation::NoCorrelation,
        Relation::Orthologous,
        Relation::TranscribedTo,
        Relation::TranslatedTo,
        Relation::AnalogousTo,
        Relation::BiomarkerFor,
        Relation::PrognosticBiomarkerFor,
        Relation::SubProcessOf,
        Relation::IsA,
        Relation::EquivalentTo,
        Relation::Binds,
        Relation::HasComponent,
        Relation::HasComponents,
        Relation::HasMember,
        Relation::HasMembers,
        Relation::HasVariant,
        Relation::HasReactant,
        Relation::HasProduct,
        Relation::HasModification,
        Relation::HasFragment,
        Relation::Includes,
        Relation::ActsIn,
        Relation::Translocates,
    ];

    /// Resolve a verbose or short relation keyword
    pub fn from_keyword(word: &str) -> Option<ResolvedRelation> {
        if word == "analogous" {
            return Some(ResolvedRelation {
                relation: Relation::AnalogousTo,
                deprecated: true,
            });
        }
        Relation::ALL
            .into_iter()
            .find(|relation| relation.name() == word || relation.short_name() == Some(word))
            .map(|relation| ResolvedRelation {
                relation,
                deprecated: false,
            })
    }

    /// Resolve a symbolic operator such as `->` or `:>`
    pub fn from_symbol(symbol: &str) -> Option<Relation> {
        Relation::ALL
            .into_iter()
            .find(|relation| relation.symbol() == Some(symbol))
    }

    /// Canonical (verbose) name
    pub fn name(&self) -> &'static str {
        match self {
            Relation::Increases => "increases",
            Relation::DirectlyIncreases => "directlyIncreases",
            Relation::Decreases => "decreases",
            Relation::DirectlyDecreases => "directlyDecreases",
            Relation::RateLimitingStepOf => "rateLimitingStepOf",
            Relation::CausesNoChange => "causesNoChange",
            Relation::Regulates => "regulates",
            Relation::PositiveCorrelation => "positiveCorrelation",
            Relation::NegativeCorrelation => "negativeCorrelation",
            Relation::Association => "association",
            Relation::NoCorrelation => "noCorrelation",
            Relation::Orthologous => "orthologous",
            Relation::TranscribedTo => "transcribedTo",
            Relation::TranslatedTo => "translatedTo",
            Relation::AnalogousTo => "analogousTo",
            Relation::BiomarkerFor => "biomarkerFor",
            Relation::PrognosticBiomarkerFor => "prognosticBiomarkerFor",
            Relation::SubProcessOf => "subProcessOf",
            Relation::IsA => "isA",
            Relation::EquivalentTo => "equivalentTo",
            Relation::Binds => "binds",
            Relation::HasComponent => "hasComponent",
            Relation::HasComponents => "hasComponents",
            Relation::HasMember => "hasMember",
            Relation::HasMembers => "hasMembers",
            Relation::HasVariant => "hasVariant",
            Relation::HasReactant => "hasReactant",
            Relation::HasProduct => "hasProduct",
            Relation::HasModification => "hasModification",
            Relation::HasFragment => "hasFragment",
            Relation::Includes => "includes",
            Relation::ActsIn => "actsIn",
            Relation::Translocates => "translocates",
        }
    }

    pub fn short_name(&self) -> Option<&'static str> {
        match self {
            Relation::Regulates => Some("reg"),
            Relation::PositiveCorrelation => Some("pos"),
            Relation::NegativeCorrelation => Some("neg"),
            Relation::CausesNoChange => Some("cnc"),
            Relation::NoCorrelation => Some("noCor"),
            _ => None,
        }
    }

    pub fn symbol(&self) -> Option<&'static str> {
        match self {
            Relation::Increases => Some("->"),
            Relation::DirectlyIncreases => Some("=>"),
            Relation::Decreases => Some("-|"),
            Relation::DirectlyDecreases => Some("=|"),
            Relation::Association => Some("--"),
            Relation::PositiveCorrelation => Some("-->"),
            Relation::NegativeCorrelation => Some("--|"),
            Relation::TranscribedTo => Some(":>"),
            Relation::TranslatedTo => Some(">>"),
            _ => None,
        }
    }

    pub fn category(&self) -> RelationCategory {
        match self {
            Relation::Increases
            | Relation::DirectlyIncreases
            | Relation::Decreases
            | Relation::DirectlyDecreases
            | Relation::RateLimitingStepOf
            | Relation::CausesNoChange
            | Relation::Regulates => RelationCategory::Causal,
            Relation::PositiveCorrelation
            | Relation::NegativeCorrelation
            | Relation::Association
            | Relation::NoCorrelation => RelationCategory::Correlative,
            Relation::Orthologous
            | Relation::TranscribedTo
            | Relation::TranslatedTo
            | Relation::AnalogousTo => RelationCategory::Genomic,
            Relation::BiomarkerFor
            | Relation::PrognosticBiomarkerFor
            | Relation::SubProcessOf
            | Relation::IsA
            | Relation::EquivalentTo
            | Relation::Binds => RelationCategory::Other,
            Relation::HasComponent
            | Relation::HasComponents
            | Relation::HasMember
            | Relation::HasMembers => RelationCategory::Structural,
            Relation::HasVariant
            | Relation::HasReactant
            | Relation::HasProduct
            | Relation::HasModification
            | Relation::HasFragment
            | Relation::Includes
            | Relation::ActsIn
            | Relation::Translocates => RelationCategory::Injected,
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
