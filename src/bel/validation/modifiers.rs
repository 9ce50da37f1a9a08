//! Modifier legality and modifier value checks
//!
//!     Legality is a static table from function to the modifier kinds it may
//!     carry. Value checks cover what the builder leaves as free text:
//!     fusion and fragment ranges, pmod arguments and activity names.

use once_cell::sync::Lazy;
use regex::Regex;

use super::Finding;
use crate::bel::ast::{
    AminoAcidCode, Function, ModificationPosition, ModificationType, Modifier, ModifierKind,
    MolecularActivity, DEFAULT_ACTIVITIES,
};
use crate::bel::building::{FusionSite, ModifierSite};
use crate::bel::diagnostics::Rule;

/// Modifier kinds a function may carry
pub fn allowed(function: Function) -> &'static [ModifierKind] {
    match function {
        Function::Protein => &[
            ModifierKind::ProteinModification,
            ModifierKind::Variant,
            ModifierKind::Fragment,
            ModifierKind::Location,
        ],
        Function::Gene => &[
            ModifierKind::Variant,
            ModifierKind::Location,
            ModifierKind::GeneModification,
        ],
        Function::Rna | Function::MicroRna | Function::Abundance => {
            &[ModifierKind::Variant, ModifierKind::Location]
        }
        Function::Population | Function::Complex | Function::ComplexList => {
            &[ModifierKind::Location]
        }
        Function::Activity => &[ModifierKind::MolecularActivity],
        Function::Composite
        | Function::CellSecretion
        | Function::Degradation
        | Function::CellSurfaceExpression
        | Function::Translocation
        | Function::Reaction
        | Function::BiologicalProcess
        | Function::Pathology
        | Function::List => &[],
    }
}

/// `start_stop` with digits, `?` or `*` markers, or a bare `?`
static FRAGMENT_RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:\d+_(?:\d+|\?|\*)|\?_(?:\d+|\*)|\?)$").expect("fragment range pattern")
});

/// Breakpoint positions after the fusion prefix, e.g. `1_79` or `312_?`
static FUSION_POSITIONS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:\d+|\?)_(?:\d+|\?|\*)$").expect("fusion range pattern"));

/// Range prefixes a fusion partner may use inside each host
pub fn fusion_prefixes(host: Function) -> &'static [&'static str] {
    match host {
        Function::Gene => &["c.", "g.", "m.", "n.", "o."],
        Function::Rna => &["r."],
        Function::Protein => &["p."],
        _ => &[],
    }
}

pub fn is_fragment_range(range: &str) -> bool {
    FRAGMENT_RANGE.is_match(range)
}

/// All findings for one modifier occurrence
pub fn check_modifier(site: &ModifierSite) -> Vec<Finding> {
    let kind = site.modifier.kind();
    if !allowed(site.host).contains(&kind) {
        return vec![Finding::new(
            Rule::IllegalModifier,
            format!(
                "{}(...) is not allowed on {}",
                kind.function_name(),
                site.host.display_name()
            ),
        )
        .with_hint(legal_hint(site.host))];
    }

    let mut findings = Vec::new();
    match &site.modifier {
        Modifier::Fragment(fragment) => {
            if !is_fragment_range(&fragment.range) {
                findings.push(
                    Finding::new(
                        Rule::FragmentRange,
                        format!("invalid fragment range \"{}\"", fragment.range),
                    )
                    .with_hint("use start_stop, N_?, ?_* or ?"),
                );
            }
        }
        Modifier::ProteinModification(pmod) => {
            if let ModificationType::Unknown(word) = &pmod.modification {
                findings.push(
                    Finding::new(
                        Rule::ModificationType,
                        format!("unknown protein modification \"{}\"", word),
                    )
                    .with_hint("use a default modification such as Ph, Ac or Ub, or NS:value"),
                );
            }
            if let Some(AminoAcidCode::Unknown(code)) = &pmod.amino_acid {
                findings.push(
                    Finding::new(Rule::AminoAcid, format!("unknown amino acid \"{}\"", code))
                        .with_hint("use a one or three letter amino acid code"),
                );
            }
            match &pmod.position {
                Some(ModificationPosition::Invalid(text)) => findings.push(Finding::new(
                    Rule::ModificationPosition,
                    format!("position \"{}\" is not a positive integer", text),
                )),
                Some(ModificationPosition::Known(0)) => findings.push(Finding::new(
                    Rule::ModificationPosition,
                    "position 0 is not a positive integer",
                )),
                _ => {}
            }
        }
        Modifier::GeneModification(gmod) => {
            if let ModificationType::Unknown(word) = &gmod.modification {
                findings.push(Finding::new(
                    Rule::ModificationType,
                    format!("unknown gene modification \"{}\"", word),
                ));
            }
        }
        Modifier::MolecularActivity {
            activity: MolecularActivity::Default(name),
        } => {
            if !DEFAULT_ACTIVITIES.contains(&name.as_str()) {
                findings.push(
                    Finding::new(
                        Rule::MolecularActivity,
                        format!("\"{}\" is not a default molecular activity", name),
                    )
                    .with_hint(format!(
                        "use one of {} or a namespace reference",
                        DEFAULT_ACTIVITIES.join(", ")
                    )),
                );
            }
        }
        Modifier::Variant { .. }
        | Modifier::Location(_)
        | Modifier::MolecularActivity {
            activity: MolecularActivity::Reference(_),
        } => {}
    }
    findings
}

fn legal_hint(function: Function) -> String {
    let legal = allowed(function);
    if legal.is_empty() {
        format!("{} takes no modifiers", function.display_name())
    } else {
        let names: Vec<&str> = legal.iter().map(|k| k.function_name()).collect();
        format!("{} accepts: {}", function.display_name(), names.join(", "))
    }
}

fn check_fusion_range(host: Function, range: &str) -> Option<Finding> {
    if range == "?" {
        return None;
    }
    let prefixes = fusion_prefixes(host);
    if let Some(positions) = prefixes
        .iter()
        .find_map(|prefix| range.strip_prefix(prefix))
    {
        if FUSION_POSITIONS.is_match(positions) {
            return None;
        }
        return Some(
            Finding::new(
                Rule::FusionRange,
                format!("malformed fusion range \"{}\"", range),
            )
            .with_hint("write the breakpoints as start_stop, e.g. r.1_79"),
        );
    }
    Some(
        Finding::new(
            Rule::FusionRange,
            format!(
                "fusion range \"{}\" does not match a {} partner",
                range,
                host.display_name()
            ),
        )
        .with_hint(format!("start the range with {} or use \"?\"", prefixes.join(" "))),
    )
}

/// Host and both partner ranges of one fusion
pub fn check_fusion(site: &FusionSite) -> Vec<Finding> {
    if !site.host.is_fusion_host() {
        return vec![Finding::new(
            Rule::FusionHost,
            format!("{} cannot contain a fusion", site.host.display_name()),
        )
        .with_hint("fusions live in g(...), r(...) or p(...)")];
    }
    [&site.fusion.range_5, &site.fusion.range_3]
        .into_iter()
        .filter_map(|range| check_fusion_range(site.host, range))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bel::ast::{Fragment, Fusion, NamespaceRef, PmodType, ProteinModification};
    use rstest::rstest;

    fn site(host: Function, modifier: Modifier) -> ModifierSite {
        ModifierSite {
            host,
            modifier,
            range: 0..0,
        }
    }

    fn fragment(range: &str) -> Modifier {
        Modifier::Fragment(Fragment {
            range: range.to_string(),
            descriptor: None,
        })
    }

    #[rstest]
    #[case("5_20", true)]
    #[case("1_?", true)]
    #[case("?_*", true)]
    #[case("?", true)]
    #[case("?_20", true)]
    #[case("*_?", false)]
    #[case("?_?", false)]
    #[case("5-20", false)]
    fn test_fragment_ranges(#[case] range: &str, #[case] valid: bool) {
        assert_eq!(is_fragment_range(range), valid);
        let findings = check_modifier(&site(Function::Protein, fragment(range)));
        assert_eq!(findings.is_empty(), valid);
    }

    #[rstest]
    #[case(Function::Protein, ModifierKind::ProteinModification, true)]
    #[case(Function::Gene, ModifierKind::ProteinModification, false)]
    #[case(Function::Rna, ModifierKind::Variant, true)]
    #[case(Function::Activity, ModifierKind::Location, false)]
    #[case(Function::Composite, ModifierKind::Location, false)]
    #[case(Function::Complex, ModifierKind::Location, true)]
    fn test_legality_table(
        #[case] function: Function,
        #[case] kind: ModifierKind,
        #[case] legal: bool,
    ) {
        assert_eq!(allowed(function).contains(&kind), legal);
    }

    #[test]
    fn test_illegal_modifier_names_both_sides() {
        let findings = check_modifier(&site(
            Function::Gene,
            Modifier::ProteinModification(ProteinModification {
                modification: ModificationType::Known(PmodType::Phosphorylation),
                amino_acid: None,
                position: None,
            }),
        ));
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].rule, Rule::IllegalModifier);
        assert!(findings[0].message.contains("pmod"));
        assert!(findings[0].message.contains("geneAbundance"));
    }

    #[test]
    fn test_pmod_arguments() {
        let findings = check_modifier(&site(
            Function::Protein,
            Modifier::ProteinModification(ProteinModification {
                modification: ModificationType::Unknown("Phospho".to_string()),
                amino_acid: Some(AminoAcidCode::Unknown("X".to_string())),
                position: Some(ModificationPosition::Invalid("12a".to_string())),
            }),
        ));
        let rules: Vec<Rule> = findings.iter().map(|f| f.rule).collect();
        assert_eq!(
            rules,
            vec![
                Rule::ModificationType,
                Rule::AminoAcid,
                Rule::ModificationPosition
            ]
        );
    }

    #[test]
    fn test_molecular_activity_defaults() {
        let kin = Modifier::MolecularActivity {
            activity: MolecularActivity::Default("kin".to_string()),
        };
        let bogus = Modifier::MolecularActivity {
            activity: MolecularActivity::Default("kinase".to_string()),
        };
        assert!(check_modifier(&site(Function::Activity, kin)).is_empty());
        assert_eq!(
            check_modifier(&site(Function::Activity, bogus))[0].rule,
            Rule::MolecularActivity
        );
    }

    fn fusion(host: Function, range_5: &str, range_3: &str) -> FusionSite {
        FusionSite {
            host,
            fusion: Fusion {
                partner_5: NamespaceRef::new("HGNC", "TMPRSS2"),
                range_5: range_5.to_string(),
                partner_3: NamespaceRef::new("HGNC", "ERG"),
                range_3: range_3.to_string(),
            },
            range: 0..0,
        }
    }

    #[test]
    fn test_fusion_prefix_must_match_host() {
        assert!(check_fusion(&fusion(Function::Rna, "r.1_79", "r.312_5034")).is_empty());
        assert!(check_fusion(&fusion(Function::Gene, "c.1_79", "?")).is_empty());
        let mismatched = check_fusion(&fusion(Function::Protein, "r.1_79", "p.312_5034"));
        assert_eq!(mismatched.len(), 1);
        assert_eq!(mismatched[0].rule, Rule::FusionRange);
        assert_eq!(
            check_fusion(&fusion(Function::Abundance, "?", "?"))[0].rule,
            Rule::FusionHost
        );
    }

    #[rstest]
    #[case("p.1_79", true)]
    #[case("p.?_100", true)]
    #[case("p.312_*", true)]
    #[case("p.312_?", true)]
    #[case("p.garbage", false)]
    #[case("p.", false)]
    #[case("p.1-79", false)]
    #[case("p.1_79x", false)]
    fn test_fusion_breakpoints(#[case] range: &str, #[case] valid: bool) {
        let findings = check_fusion(&fusion(Function::Protein, range, "?"));
        assert_eq!(findings.is_empty(), valid, "{:?}", findings);
        if !valid {
            assert_eq!(findings[0].rule, Rule::FusionRange);
            assert!(findings[0].message.starts_with("malformed"));
        }
    }
}
