//! Namespace and annotation vocabularies
//!
//!     A defined keyword is checked by one of four independent strategies,
//!     chosen by how it was declared:
//!
//!         LIST     exact membership in the declared set
//!         PATTERN  full match of the declared regular expression
//!         URL      delegated to an [ExternalResolver]
//!         FILE     delegated to an [ExternalResolver]
//!
//!     The core does no I/O, so the default resolver ([AcceptAll]) accepts
//!     every URL and FILE value. Callers that have the content at hand can
//!     plug in their own.

use regex::Regex;
use std::collections::{BTreeSet, HashMap};
use std::ops::Range;

use super::Finding;
use crate::bel::ast::{Definition, DefinitionKind, NamespaceRef, ReferenceKind};
use crate::bel::diagnostics::Rule;

/// Answers membership questions for URL and FILE vocabularies
pub trait ExternalResolver: Send + Sync {
    fn contains(&self, definition: &Definition, value: &str) -> bool;
}

/// Resolver that accepts every value
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl ExternalResolver for AcceptAll {
    fn contains(&self, _definition: &Definition, _value: &str) -> bool {
        true
    }
}

/// Compiled PATTERN definitions of one document
#[derive(Debug)]
pub struct Vocabulary {
    patterns: HashMap<(DefinitionKind, String), Regex>,
    check_patterns: bool,
}

impl Vocabulary {
    pub fn new(check_patterns: bool) -> Self {
        Self {
            patterns: HashMap::new(),
            check_patterns,
        }
    }

    /// Compile a PATTERN definition; other kinds need no preparation
    pub fn prepare(&mut self, definition: &Definition) -> Result<(), regex::Error> {
        if let ReferenceKind::Pattern(pattern) = &definition.reference {
            let regex = Regex::new(&format!("^(?:{})$", pattern))?;
            self.patterns
                .insert((definition.kind, definition.keyword.clone()), regex);
        }
        Ok(())
    }

    /// Check `value` against the vocabulary of `definition`
    pub fn check(
        &self,
        definition: &Definition,
        value: &str,
        resolver: &dyn ExternalResolver,
    ) -> Option<Finding> {
        match &definition.reference {
            ReferenceKind::List(members) => check_list(definition, members, value),
            ReferenceKind::Pattern(pattern) => {
                if !self.check_patterns {
                    return None;
                }
                // An uncompiled pattern was already reported at its DEFINE
                let regex = self
                    .patterns
                    .get(&(definition.kind, definition.keyword.clone()))?;
                check_pattern(definition, regex, pattern, value)
            }
            ReferenceKind::Url(location) | ReferenceKind::File(location) => {
                check_external(definition, location, value, resolver)
            }
        }
    }
}

fn list_rule(kind: DefinitionKind) -> Rule {
    match kind {
        DefinitionKind::Namespace => Rule::NotInNamespaceList,
        DefinitionKind::Annotation => Rule::NotInAnnotationList,
    }
}

fn pattern_rule(kind: DefinitionKind) -> Rule {
    match kind {
        DefinitionKind::Namespace => Rule::NotInNamespacePattern,
        DefinitionKind::Annotation => Rule::NotInAnnotationPattern,
    }
}

pub fn check_list(
    definition: &Definition,
    members: &BTreeSet<String>,
    value: &str,
) -> Option<Finding> {
    if members.contains(value) {
        return None;
    }
    let mut finding = Finding::new(
        list_rule(definition.kind),
        format!(
            "\"{}\" is not in the {} list",
            value, definition.keyword
        ),
    );
    let case_match = members.iter().find(|m| m.eq_ignore_ascii_case(value));
    finding = match case_match {
        Some(member) => finding.with_hint(format!("did you mean \"{}\"?", member)),
        None => {
            let shown: Vec<&str> = members.iter().take(5).map(String::as_str).collect();
            let more = if members.len() > shown.len() { ", ..." } else { "" };
            finding.with_hint(format!("use one of: {}{}", shown.join(", "), more))
        }
    };
    Some(finding)
}

pub fn check_pattern(
    definition: &Definition,
    regex: &Regex,
    pattern: &str,
    value: &str,
) -> Option<Finding> {
    if regex.is_match(value) {
        return None;
    }
    Some(
        Finding::new(
            pattern_rule(definition.kind),
            format!(
                "\"{}\" does not match the {} pattern",
                value, definition.keyword
            ),
        )
        .with_hint(format!("values must match {}", pattern)),
    )
}

pub fn check_external(
    definition: &Definition,
    location: &str,
    value: &str,
    resolver: &dyn ExternalResolver,
) -> Option<Finding> {
    if resolver.contains(definition, value) {
        return None;
    }
    Some(
        Finding::new(
            Rule::ExternalVocabulary,
            format!(
                "\"{}\" is not in the {} vocabulary",
                value, definition.keyword
            ),
        )
        .with_hint(format!(
            "check the {} at {}",
            definition.reference.label(),
            location
        )),
    )
}

/// Namespace values seen under more than one keyword
#[derive(Debug, Default)]
pub struct EntryIndex {
    uses: Vec<(NamespaceRef, Range<usize>)>,
    keywords_by_value: HashMap<String, BTreeSet<String>>,
}

impl EntryIndex {
    pub fn record(&mut self, reference: &NamespaceRef, range: Range<usize>) {
        self.keywords_by_value
            .entry(reference.name.to_lowercase())
            .or_default()
            .insert(reference.namespace.clone());
        self.uses.push((reference.clone(), range));
    }

    /// Every use whose value also appears under another keyword, with those keywords
    pub fn ambiguous(&self) -> Vec<(&NamespaceRef, &Range<usize>, Vec<&str>)> {
        self.uses
            .iter()
            .filter_map(|(reference, range)| {
                let keywords = self.keywords_by_value.get(&reference.name.to_lowercase())?;
                let others: Vec<&str> = keywords
                    .iter()
                    .filter(|k| **k != reference.namespace)
                    .map(String::as_str)
                    .collect();
                if others.is_empty() {
                    None
                } else {
                    Some((reference, range, others))
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definition(kind: DefinitionKind, keyword: &str, reference: ReferenceKind) -> Definition {
        Definition {
            keyword: keyword.to_string(),
            kind,
            reference,
            line: 1,
        }
    }

    fn list(values: &[&str]) -> ReferenceKind {
        ReferenceKind::List(values.iter().map(|v| v.to_string()).collect())
    }

    struct RejectAll;

    impl ExternalResolver for RejectAll {
        fn contains(&self, _definition: &Definition, _value: &str) -> bool {
            false
        }
    }

    #[test]
    fn test_list_membership() {
        let vocabulary = Vocabulary::new(true);
        let def = definition(
            DefinitionKind::Annotation,
            "TimePoint",
            list(&["4 days dpi"]),
        );
        assert!(vocabulary.check(&def, "4 days dpi", &AcceptAll).is_none());
        let finding = vocabulary.check(&def, "3 days dpi", &AcceptAll).unwrap();
        assert_eq!(finding.rule, Rule::NotInAnnotationList);
        assert_eq!(finding.hint.as_deref(), Some("use one of: 4 days dpi"));
    }

    #[test]
    fn test_list_suggests_case_variant() {
        let def = definition(DefinitionKind::Namespace, "SPECIES", list(&["Human"]));
        let finding = Vocabulary::new(true).check(&def, "human", &AcceptAll).unwrap();
        assert_eq!(finding.rule, Rule::NotInNamespaceList);
        assert_eq!(finding.hint.as_deref(), Some("did you mean \"Human\"?"));
    }

    #[test]
    fn test_pattern_is_anchored() {
        let mut vocabulary = Vocabulary::new(true);
        let def = definition(
            DefinitionKind::Namespace,
            "CHEBIID",
            ReferenceKind::Pattern(r"\d+".to_string()),
        );
        vocabulary.prepare(&def).unwrap();
        assert!(vocabulary.check(&def, "15377", &AcceptAll).is_none());
        let finding = vocabulary.check(&def, "CHEBI:15377", &AcceptAll).unwrap();
        assert_eq!(finding.rule, Rule::NotInNamespacePattern);
        assert!(Vocabulary::new(false).check(&def, "x", &AcceptAll).is_none());
    }

    #[test]
    fn test_invalid_pattern_fails_to_prepare() {
        let def = definition(
            DefinitionKind::Annotation,
            "Broken",
            ReferenceKind::Pattern("(".to_string()),
        );
        let mut vocabulary = Vocabulary::new(true);
        assert!(vocabulary.prepare(&def).is_err());
        assert!(vocabulary.check(&def, "anything", &AcceptAll).is_none());
    }

    #[test]
    fn test_external_kinds_use_resolver() {
        let vocabulary = Vocabulary::new(true);
        let url = definition(
            DefinitionKind::Namespace,
            "HGNC",
            ReferenceKind::Url("https://example.org/hgnc.belns".to_string()),
        );
        let file = definition(
            DefinitionKind::Annotation,
            "Tissue",
            ReferenceKind::File("tissue.belanno".to_string()),
        );
        assert!(vocabulary.check(&url, "AKT1", &AcceptAll).is_none());
        assert!(vocabulary.check(&file, "liver", &AcceptAll).is_none());
        assert_eq!(
            vocabulary.check(&url, "AKT1", &RejectAll).unwrap().rule,
            Rule::ExternalVocabulary
        );
    }

    #[test]
    fn test_entry_index() {
        let mut index = EntryIndex::default();
        index.record(&NamespaceRef::new("HGNC", "AKT1"), 0..9);
        index.record(&NamespaceRef::new("MGI", "Akt1"), 10..18);
        index.record(&NamespaceRef::new("HGNC", "TNF"), 20..28);
        let ambiguous = index.ambiguous();
        assert_eq!(ambiguous.len(), 2);
        assert_eq!(ambiguous[0].2, vec!["MGI"]);
        assert_eq!(ambiguous[1].2, vec!["HGNC"]);
    }
}
