//! Document model
//!
//!     Per-document state threaded through parsing, building and validation:
//!
//!     - [Document]: metadata from the properties section (`SET DOCUMENT ...`)
//!     - [Registry]: namespace and annotation keywords, in definition order
//!     - [AnnotationContext]: the running SET/UNSET state, snapshotted into
//!       every statement
//!
//!     All of it is owned by a single parse call and dropped (or returned in
//!     the [ParseResult]) when the call ends.

use super::statement::Statement;
use crate::bel::diagnostics::{Diagnostic, Severity};
use crate::bel::repair::Change;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Script-level metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Document {
    pub name: Option<String>,
    pub description: Option<String>,
    pub version: Option<String>,
    pub authors: Option<String>,
    pub contact_info: Option<String>,
    pub copyright: Option<String>,
    pub licenses: Option<String>,
    pub keywords: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentProperty {
    Name,
    Description,
    Version,
    Authors,
    ContactInfo,
    Copyright,
    Licenses,
    Keywords,
}

impl DocumentProperty {
    pub fn from_keyword(keyword: &str) -> Option<DocumentProperty> {
        let property = match keyword {
            "Name" => DocumentProperty::Name,
            "Description" => DocumentProperty::Description,
            "Version" => DocumentProperty::Version,
            "Authors" => DocumentProperty::Authors,
            "ContactInfo" => DocumentProperty::ContactInfo,
            "Copyright" => DocumentProperty::Copyright,
            "Licenses" | "Licences" => DocumentProperty::Licenses,
            "Keywords" => DocumentProperty::Keywords,
            _ => return None,
        };
        Some(property)
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            DocumentProperty::Name => "Name",
            DocumentProperty::Description => "Description",
            DocumentProperty::Version => "Version",
            DocumentProperty::Authors => "Authors",
            DocumentProperty::ContactInfo => "ContactInfo",
            DocumentProperty::Copyright => "Copyright",
            DocumentProperty::Licenses => "Licenses",
            DocumentProperty::Keywords => "Keywords",
        }
    }
}

impl Document {
    /// Set a property, returning the previous value if it was already set
    pub fn set(&mut self, property: DocumentProperty, value: String) -> Option<String> {
        let slot = match property {
            DocumentProperty::Name => &mut self.name,
            DocumentProperty::Description => &mut self.description,
            DocumentProperty::Version => &mut self.version,
            DocumentProperty::Authors => &mut self.authors,
            DocumentProperty::ContactInfo => &mut self.contact_info,
            DocumentProperty::Copyright => &mut self.copyright,
            DocumentProperty::Licenses => &mut self.licenses,
            DocumentProperty::Keywords => &mut self.keywords,
        };
        slot.replace(value)
    }

    pub fn get(&self, property: DocumentProperty) -> Option<&str> {
        let slot = match property {
            DocumentProperty::Name => &self.name,
            DocumentProperty::Description => &self.description,
            DocumentProperty::Version => &self.version,
            DocumentProperty::Authors => &self.authors,
            DocumentProperty::ContactInfo => &self.contact_info,
            DocumentProperty::Copyright => &self.copyright,
            DocumentProperty::Licenses => &self.licenses,
            DocumentProperty::Keywords => &self.keywords,
        };
        slot.as_deref()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DefinitionKind {
    Namespace,
    Annotation,
}

impl DefinitionKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            DefinitionKind::Namespace => "NAMESPACE",
            DefinitionKind::Annotation => "ANNOTATION",
        }
    }
}

/// How the values of a defined keyword are to be checked
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ReferenceKind {
    Url(String),
    Pattern(String),
    List(BTreeSet<String>),
    File(String),
}

impl ReferenceKind {
    pub fn label(&self) -> &'static str {
        match self {
            ReferenceKind::Url(_) => "URL",
            ReferenceKind::Pattern(_) => "PATTERN",
            ReferenceKind::List(_) => "LIST",
            ReferenceKind::File(_) => "FILE",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Definition {
    pub keyword: String,
    pub kind: DefinitionKind,
    pub reference: ReferenceKind,
    pub line: usize,
}

/// Defined keywords of one kind, in definition order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Registry {
    definitions: Vec<Definition>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, keyword: &str) -> Option<&Definition> {
        self.definitions.iter().find(|d| d.keyword == keyword)
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.get(keyword).is_some()
    }

    /// Register a definition. An existing definition of the same keyword
    /// stays in force and is returned as the error.
    pub fn insert(&mut self, definition: Definition) -> Result<(), &Definition> {
        match self.definitions.iter().position(|d| d.keyword == definition.keyword) {
            Some(index) => Err(&self.definitions[index]),
            None => {
                self.definitions.push(definition);
                Ok(())
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Definition> {
        self.definitions.iter()
    }

    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.definitions.iter().map(|d| d.keyword.as_str())
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

/// `SET Citation = {...}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Citation {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: Option<String>,
    pub reference: String,
    pub date: Option<String>,
    pub authors: Option<String>,
    pub comment: Option<String>,
}

impl Citation {
    /// Build a citation from its positional fields.
    ///
    /// Two fields are (type, reference); three to six are
    /// (type, name, reference, date, authors, comment).
    pub fn from_fields(fields: &[String]) -> Option<Citation> {
        match fields.len() {
            2 => Some(Citation {
                kind: fields[0].clone(),
                name: None,
                reference: fields[1].clone(),
                date: None,
                authors: None,
                comment: None,
            }),
            3..=6 => Some(Citation {
                kind: fields[0].clone(),
                name: Some(fields[1].clone()),
                reference: fields[2].clone(),
                date: fields.get(3).cloned(),
                authors: fields.get(4).cloned(),
                comment: fields.get(5).cloned(),
            }),
            _ => None,
        }
    }
}

/// Active SET state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnnotationContext {
    pub annotations: BTreeMap<String, Vec<String>>,
    pub statement_group: Option<String>,
    pub citation: Option<Citation>,
    pub evidence: Option<String>,
}

impl AnnotationContext {
    /// True when `key` currently holds a value
    pub fn is_active(&self, key: &str) -> bool {
        match key {
            "Citation" => self.citation.is_some(),
            "Evidence" | "Support" | "SupportingText" => self.evidence.is_some(),
            "StatementGroup" | "STATEMENT_GROUP" => self.statement_group.is_some(),
            _ => self.annotations.contains_key(key),
        }
    }

    /// Remove `key`, returning whether it was active
    pub fn unset(&mut self, key: &str) -> bool {
        match key {
            "Citation" => self.citation.take().is_some(),
            "Evidence" | "Support" | "SupportingText" => self.evidence.take().is_some(),
            "StatementGroup" | "STATEMENT_GROUP" => self.statement_group.take().is_some(),
            _ => self.annotations.remove(key).is_some(),
        }
    }

    pub fn clear(&mut self) {
        *self = AnnotationContext::default();
    }
}

/// Everything one parse call produces
#[derive(Debug, Clone, Default, Serialize)]
pub struct ParseResult {
    pub document: Document,
    pub namespaces: Registry,
    pub annotations: Registry,
    pub statements: Vec<Statement>,
    pub diagnostics: Vec<Diagnostic>,
    /// Changes made by the repair pass, when it ran
    pub repairs: Vec<Change>,
    /// Set when fail-fast mode stopped at a lexical error
    pub aborted: bool,
}

impl ParseResult {
    /// A document is valid iff it has no Error diagnostics
    pub fn is_valid(&self) -> bool {
        self.error_count() == 0
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_two_field_citation_uses_second_as_reference() {
        let citation = Citation::from_fields(&fields(&["PubMed", "12345"])).unwrap();
        assert_eq!(citation.reference, "12345");
        assert_eq!(citation.name, None);
    }

    #[test]
    fn test_positional_citation_fields() {
        let citation =
            Citation::from_fields(&fields(&["PubMed", "Some title", "12345", "2001-01-01"]))
                .unwrap();
        assert_eq!(citation.name.as_deref(), Some("Some title"));
        assert_eq!(citation.reference, "12345");
        assert_eq!(citation.date.as_deref(), Some("2001-01-01"));
        assert_eq!(citation.authors, None);
    }

    #[test]
    fn test_citation_arity_limits() {
        assert!(Citation::from_fields(&fields(&["PubMed"])).is_none());
        assert!(Citation::from_fields(&fields(&["a", "b", "c", "d", "e", "f", "g"])).is_none());
    }

    #[test]
    fn test_registry_keeps_first_definition() {
        let mut registry = Registry::new();
        let first = Definition {
            keyword: "HGNC".to_string(),
            kind: DefinitionKind::Namespace,
            reference: ReferenceKind::Url("http://a".to_string()),
            line: 1,
        };
        let mut second = first.clone();
        second.line = 2;
        assert!(registry.insert(first).is_ok());
        assert_eq!(registry.insert(second).unwrap_err().line, 1);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("HGNC").unwrap().line, 1);
    }

    #[test]
    fn test_unset_reports_whether_key_was_active() {
        let mut context = AnnotationContext::default();
        context
            .annotations
            .insert("Species".to_string(), vec!["9606".to_string()]);
        assert!(context.unset("Species"));
        assert!(!context.unset("Species"));
        assert!(!context.unset("Evidence"));
    }
}
