//! Modifiers attached to terms
//!
//!     Modifiers are built with their owning term and are not checked on
//!     construction. Values the builder could not canonicalize (an unknown
//!     modification type, a non-numeric position) are kept verbatim in an
//!     `Unknown`/`Invalid` variant so the validator can report them.

use super::term::NamespaceRef;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModifierKind {
    Variant,
    Fragment,
    ProteinModification,
    Location,
    GeneModification,
    MolecularActivity,
}

impl ModifierKind {
    /// Function name as written in a script
    pub fn function_name(&self) -> &'static str {
        match self {
            ModifierKind::Variant => "var",
            ModifierKind::Fragment => "frag",
            ModifierKind::ProteinModification => "pmod",
            ModifierKind::Location => "loc",
            ModifierKind::GeneModification => "gmod",
            ModifierKind::MolecularActivity => "ma",
        }
    }

    /// Resolve a modifier function name (verbose or short)
    pub fn from_name(name: &str) -> Option<ModifierKind> {
        let kind = match name {
            "var" | "variant" => ModifierKind::Variant,
            "frag" | "fragment" => ModifierKind::Fragment,
            "pmod" | "proteinModification" => ModifierKind::ProteinModification,
            "loc" | "location" => ModifierKind::Location,
            "gmod" | "geneModification" => ModifierKind::GeneModification,
            "ma" | "molecularActivity" => ModifierKind::MolecularActivity,
            _ => return None,
        };
        Some(kind)
    }
}

impl fmt::Display for ModifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ModifierKind::Variant => "variant",
            ModifierKind::Fragment => "fragment",
            ModifierKind::ProteinModification => "proteinModification",
            ModifierKind::Location => "location",
            ModifierKind::GeneModification => "geneModification",
            ModifierKind::MolecularActivity => "molecularActivity",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Modifier {
    Variant { hgvs: String },
    Fragment(Fragment),
    ProteinModification(ProteinModification),
    Location(NamespaceRef),
    GeneModification(GeneModification),
    MolecularActivity { activity: MolecularActivity },
}

impl Modifier {
    pub fn kind(&self) -> ModifierKind {
        match self {
            Modifier::Variant { .. } => ModifierKind::Variant,
            Modifier::Fragment(_) => ModifierKind::Fragment,
            Modifier::ProteinModification(_) => ModifierKind::ProteinModification,
            Modifier::Location(_) => ModifierKind::Location,
            Modifier::GeneModification(_) => ModifierKind::GeneModification,
            Modifier::MolecularActivity { .. } => ModifierKind::MolecularActivity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fragment {
    pub range: String,
    pub descriptor: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProteinModification {
    pub modification: ModificationType,
    pub amino_acid: Option<AminoAcidCode>,
    pub position: Option<ModificationPosition>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneModification {
    pub modification: ModificationType,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModificationType {
    Known(PmodType),
    Reference(NamespaceRef),
    Unknown(String),
}

impl ModificationType {
    pub fn from_word(word: &str) -> Self {
        match PmodType::from_synonym(word) {
            Some(known) => ModificationType::Known(known),
            None => ModificationType::Unknown(word.to_string()),
        }
    }
}

/// Canonical protein modification types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PmodType {
    Acetylation,
    AdpRibosylation,
    Farnesylation,
    Geranylgeranylation,
    Glycosylation,
    Hydroxylation,
    Isgylation,
    Methylation,
    Monomethylation,
    Dimethylation,
    Trimethylation,
    Myristoylation,
    Neddylation,
    NGlycosylation,
    Nitrosylation,
    OGlycosylation,
    Palmitoylation,
    Phosphorylation,
    Sulfation,
    Sumoylation,
    Ubiquitination,
    UbiquitinationK48,
    UbiquitinationK63,
    Monoubiquitination,
    Polyubiquitination,
}

impl PmodType {
    /// Resolve a short code or one of the long spellings
    pub fn from_synonym(word: &str) -> Option<PmodType> {
        let pmod = match word {
            "Ac" | "acetylation" => PmodType::Acetylation,
            "ADPRib" | "ADP-rybosylation" | "ADP-ribosylation" | "adpribosylation" => {
                PmodType::AdpRibosylation
            }
            "Farn" | "farnesylation" => PmodType::Farnesylation,
            "Gerger" | "geranylgeranylation" => PmodType::Geranylgeranylation,
            "Glyco" | "glycosylation" => PmodType::Glycosylation,
            "Hy" | "hydroxylation" => PmodType::Hydroxylation,
            "ISG" | "ISGylation" | "isgylation" => PmodType::Isgylation,
            "Me" | "methylation" => PmodType::Methylation,
            "Me1" | "monomethylation" => PmodType::Monomethylation,
            "Me2" | "dimethylation" => PmodType::Dimethylation,
            "Me3" | "trimethylation" => PmodType::Trimethylation,
            "Myr" | "myristoylation" => PmodType::Myristoylation,
            "Nedd" | "neddylation" => PmodType::Neddylation,
            "NGlyco" | "N-linked glycosylation" => PmodType::NGlycosylation,
            "NO" | "nitrosylation" => PmodType::Nitrosylation,
            "OGlyco" | "O-linked glycosylation" => PmodType::OGlycosylation,
            "Palm" | "palmitoylation" => PmodType::Palmitoylation,
            "Ph" | "phosphorylation" => PmodType::Phosphorylation,
            "Sulf" | "sulfation" | "sulphation" | "sulfonation" => PmodType::Sulfation,
            "Sumo" | "sumoylation" => PmodType::Sumoylation,
            "Ub" | "ubiquitination" | "ubiquitinylation" | "ubiquitylation" => {
                PmodType::Ubiquitination
            }
            "UbK48" | "Lysine 48-linked polyubiquitination" => PmodType::UbiquitinationK48,
            "UbK63" | "Lysine 63-linked polyubiquitination" => PmodType::UbiquitinationK63,
            "UbMono" | "monoubiquitination" => PmodType::Monoubiquitination,
            "UbPoly" | "polyubiquitination" => PmodType::Polyubiquitination,
            _ => return None,
        };
        Some(pmod)
    }

    /// Canonical short code
    pub fn code(&self) -> &'static str {
        match self {
            PmodType::Acetylation => "Ac",
            PmodType::AdpRibosylation => "ADPRib",
            PmodType::Farnesylation => "Farn",
            PmodType::Geranylgeranylation => "Gerger",
            PmodType::Glycosylation => "Glyco",
            PmodType::Hydroxylation => "Hy",
            PmodType::Isgylation => "ISG",
            PmodType::Methylation => "Me",
            PmodType::Monomethylation => "Me1",
            PmodType::Dimethylation => "Me2",
            PmodType::Trimethylation => "Me3",
            PmodType::Myristoylation => "Myr",
            PmodType::Neddylation => "Nedd",
            PmodType::NGlycosylation => "NGlyco",
            PmodType::Nitrosylation => "NO",
            PmodType::OGlycosylation => "OGlyco",
            PmodType::Palmitoylation => "Palm",
            PmodType::Phosphorylation => "Ph",
            PmodType::Sulfation => "Sulf",
            PmodType::Sumoylation => "Sumo",
            PmodType::Ubiquitination => "Ub",
            PmodType::UbiquitinationK48 => "UbK48",
            PmodType::UbiquitinationK63 => "UbK63",
            PmodType::Monoubiquitination => "UbMono",
            PmodType::Polyubiquitination => "UbPoly",
        }
    }
}

/// The 20 standard amino acids
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AminoAcid {
    Ala,
    Arg,
    Asn,
    Asp,
    Cys,
    Gln,
    Glu,
    Gly,
    His,
    Ile,
    Leu,
    Lys,
    Met,
    Phe,
    Pro,
    Ser,
    Thr,
    Trp,
    Tyr,
    Val,
}

impl AminoAcid {
    pub const ALL: [AminoAcid; 20] = [
        AminoAcid::Ala,
        AminoAcid::Arg,
        AminoAcid::Asn,
        AminoAcid::Asp,
        AminoAcid::Cys,
        AminoAcid::Gln,
        AminoAcid::Glu,
        AminoAcid::Gly,
        AminoAcid::His,
        AminoAcid::Ile,
        AminoAcid::Leu,
        AminoAcid::Lys,
        AminoAcid::Met,
        AminoAcid::Phe,
        AminoAcid::Pro,
        AminoAcid::Ser,
        AminoAcid::Thr,
        AminoAcid::Trp,
        AminoAcid::Tyr,
        AminoAcid::Val,
    ];

    pub fn one_letter(&self) -> char {
        match self {
            AminoAcid::Ala => 'A',
            AminoAcid::Arg => 'R',
            AminoAcid::Asn => 'N',
            AminoAcid::Asp => 'D',
            AminoAcid::Cys => 'C',
            AminoAcid::Gln => 'Q',
            AminoAcid::Glu => 'E',
            AminoAcid::Gly => 'G',
            AminoAcid::His => 'H',
            AminoAcid::Ile => 'I',
            AminoAcid::Leu => 'L',
            AminoAcid::Lys => 'K',
            AminoAcid::Met => 'M',
            AminoAcid::Phe => 'F',
            AminoAcid::Pro => 'P',
            AminoAcid::Ser => 'S',
            AminoAcid::Thr => 'T',
            AminoAcid::Trp => 'W',
            AminoAcid::Tyr => 'Y',
            AminoAcid::Val => 'V',
        }
    }

    pub fn three_letter(&self) -> &'static str {
        match self {
            AminoAcid::Ala => "Ala",
            AminoAcid::Arg => "Arg",
            AminoAcid::Asn => "Asn",
            AminoAcid::Asp => "Asp",
            AminoAcid::Cys => "Cys",
            AminoAcid::Gln => "Gln",
            AminoAcid::Glu => "Glu",
            AminoAcid::Gly => "Gly",
            AminoAcid::His => "His",
            AminoAcid::Ile => "Ile",
            AminoAcid::Leu => "Leu",
            AminoAcid::Lys => "Lys",
            AminoAcid::Met => "Met",
            AminoAcid::Phe => "Phe",
            AminoAcid::Pro => "Pro",
            AminoAcid::Ser => "Ser",
            AminoAcid::Thr => "Thr",
            AminoAcid::Trp => "Trp",
            AminoAcid::Tyr => "Tyr",
            AminoAcid::Val => "Val",
        }
    }

    /// Accepts `S`, `Ser` or `SER`
    pub fn from_code(code: &str) -> Option<AminoAcid> {
        let mut chars = code.chars();
        if let (Some(single), None) = (chars.next(), chars.next()) {
            return AminoAcid::ALL
                .into_iter()
                .find(|aa| aa.one_letter() == single.to_ascii_uppercase());
        }
        AminoAcid::ALL
            .into_iter()
            .find(|aa| aa.three_letter().eq_ignore_ascii_case(code))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AminoAcidCode {
    Known(AminoAcid),
    Unknown(String),
}

impl AminoAcidCode {
    pub fn from_word(word: &str) -> Self {
        match AminoAcid::from_code(word) {
            Some(aa) => AminoAcidCode::Known(aa),
            None => AminoAcidCode::Unknown(word.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModificationPosition {
    Known(u64),
    Invalid(String),
}

impl ModificationPosition {
    pub fn from_word(word: &str) -> Self {
        match word.parse::<u64>() {
            Ok(n) => ModificationPosition::Known(n),
            Err(_) => ModificationPosition::Invalid(word.to_string()),
        }
    }
}

/// Molecular activity qualifier of an `act(...)` term
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MolecularActivity {
    Default(String),
    Reference(NamespaceRef),
}

/// Default activity names accepted without a namespace
pub const DEFAULT_ACTIVITIES: [&str; 9] = [
    "cat", "chap", "gtp", "kin", "pep", "phos", "ribo", "tscript", "tport",
];
