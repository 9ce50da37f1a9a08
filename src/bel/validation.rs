//! Semantic validation
//!
//! Applies the rules a context-free grammar cannot express, in document
//! order, against per-document state owned by one [Validator].
//!
//! Structure:
//!     - [relations]: subject/object compatibility per relation, self-reference ban
//!     - [modifiers]: modifier legality per function, fusion/fragment/pmod/ma values
//!     - [vocabulary]: the LIST, PATTERN, URL and FILE strategies
//!     - [context]: SET/UNSET effects on the running annotation context
//!
//! State
//!
//!     Definitions, document properties and the annotation context change
//!     only as their lines are read. A statement sees exactly the DEFINEs and
//!     SETs above it; nothing is resolved forward. The validator is created
//!     per document and never shared, so documents validate independently.

pub mod context;
pub mod modifiers;
pub mod relations;
pub mod vocabulary;

use std::ops::Range;

use crate::bel::ast::{
    AnnotationContext, Citation, Definition, DefinitionKind, Document, DocumentProperty,
    NamespaceRef, ReferenceKind, Registry, Relation, RelationCategory, StatementObject, Term,
};
use crate::bel::building::{canonical, normalize_text, BuiltStatement};
use crate::bel::diagnostics::{Category, DiagnosticCollector, Rule};
use crate::bel::parsing::{RawDefinitionReference, RawRelation, RawValue, SetValues, UnsetTarget};
use bel_config::ValidationConfig;

pub use vocabulary::{AcceptAll, ExternalResolver, Vocabulary};

/// A rule violation before it is placed in the source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub rule: Rule,
    pub message: String,
    pub hint: Option<String>,
}

impl Finding {
    pub fn new(rule: Rule, message: impl Into<String>) -> Self {
        Self {
            rule,
            message: message.into(),
            hint: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationOptions {
    pub check_patterns: bool,
    pub warn_ambiguous_entries: bool,
    pub warn_injected_relations: bool,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            check_patterns: true,
            warn_ambiguous_entries: true,
            warn_injected_relations: true,
        }
    }
}

impl From<&ValidationConfig> for ValidationOptions {
    fn from(config: &ValidationConfig) -> Self {
        Self {
            check_patterns: config.check_patterns,
            warn_ambiguous_entries: config.warn_ambiguous_entries,
            warn_injected_relations: config.warn_injected_relations,
        }
    }
}

/// What remains once the last line has been validated
#[derive(Debug, Clone, Default)]
pub struct ValidatedDocument {
    pub document: Document,
    pub namespaces: Registry,
    pub annotations: Registry,
}

fn report(diagnostics: &mut DiagnosticCollector<'_>, finding: Finding, range: &Range<usize>) {
    let diagnostic = diagnostics.error_at(Category::Semantic, finding.rule, range, finding.message);
    diagnostic.hint = finding.hint;
}

/// Per-document semantic state
pub struct Validator<'r> {
    options: ValidationOptions,
    resolver: &'r dyn ExternalResolver,
    document: Document,
    namespaces: Registry,
    annotations: Registry,
    vocabulary: Vocabulary,
    context: AnnotationContext,
    entries: vocabulary::EntryIndex,
}

impl<'r> Validator<'r> {
    pub fn new(options: ValidationOptions, resolver: &'r dyn ExternalResolver) -> Self {
        Self {
            options,
            resolver,
            document: Document::default(),
            namespaces: Registry::new(),
            annotations: Registry::new(),
            vocabulary: Vocabulary::new(options.check_patterns),
            context: AnnotationContext::default(),
            entries: vocabulary::EntryIndex::default(),
        }
    }

    /// The context a statement read now would carry
    pub fn context(&self) -> &AnnotationContext {
        &self.context
    }

    pub fn namespaces(&self) -> &Registry {
        &self.namespaces
    }

    pub fn annotations(&self) -> &Registry {
        &self.annotations
    }

    /// `SET DOCUMENT property = value`
    pub fn document_property(
        &mut self,
        property: DocumentProperty,
        value: &RawValue,
        diagnostics: &mut DiagnosticCollector<'_>,
    ) {
        let text = match property {
            DocumentProperty::Description => normalize_text(value),
            _ => canonical(value),
        };
        if let Some(previous) = self.document.set(property, text) {
            diagnostics
                .warning_at(
                    Rule::DuplicateProperty,
                    &value.range,
                    format!("document {} is set more than once", property.keyword()),
                )
                .hint = Some(format!("previous value \"{}\" was replaced", previous));
        }
    }

    /// `DEFINE NAMESPACE|ANNOTATION keyword AS ...`
    pub fn define(
        &mut self,
        kind: DefinitionKind,
        keyword: &RawValue,
        reference: &RawDefinitionReference,
        diagnostics: &mut DiagnosticCollector<'_>,
    ) {
        let reference = match reference {
            RawDefinitionReference::Url(value) => ReferenceKind::Url(canonical(value)),
            RawDefinitionReference::Pattern(value) => ReferenceKind::Pattern(canonical(value)),
            RawDefinitionReference::File(value) => ReferenceKind::File(canonical(value)),
            RawDefinitionReference::List(values) => {
                ReferenceKind::List(values.iter().map(canonical).collect())
            }
        };
        let definition = Definition {
            keyword: canonical(keyword),
            kind,
            reference,
            line: diagnostics.position(keyword.range.start).line,
        };

        let registry = match kind {
            DefinitionKind::Namespace => &mut self.namespaces,
            DefinitionKind::Annotation => &mut self.annotations,
        };
        if let Err(first) = registry.insert(definition.clone()) {
            let first_line = first.line;
            diagnostics
                .warning_at(
                    Rule::DuplicateDefinition,
                    &keyword.range,
                    format!(
                        "{} {} is already defined",
                        kind.keyword(),
                        definition.keyword
                    ),
                )
                .hint = Some(format!("the definition on line {} stays in force", first_line));
            return;
        }

        if let Err(error) = self.vocabulary.prepare(&definition) {
            let message = format!("invalid pattern for {}: {}", definition.keyword, error);
            diagnostics.error_at(Category::Semantic, Rule::InvalidPattern, &keyword.range, message);
        }
        tracing::trace!(keyword = %definition.keyword, kind = definition.reference.label(), "defined");
    }

    /// `SET key = value` or `SET key = {values}`
    pub fn set(
        &mut self,
        key: &RawValue,
        values: &SetValues,
        diagnostics: &mut DiagnosticCollector<'_>,
    ) {
        let name = canonical(key);
        let raw: Vec<&RawValue> = match values {
            SetValues::One(value) => vec![value],
            SetValues::Many(values) => values.iter().collect(),
        };

        if context::is_builtin(&name) {
            let texts = if context::is_evidence_key(&name) {
                raw.iter().map(|v| normalize_text(v)).collect()
            } else {
                raw.iter().map(|v| canonical(v)).collect()
            };
            context::set_values(&mut self.context, &name, texts);
            return;
        }

        let Some(definition) = self.annotations.get(&name) else {
            let hint = defined_hint(&self.annotations, "ANNOTATION", &name);
            diagnostics
                .error_at(
                    Category::Semantic,
                    Rule::UndefinedAnnotation,
                    &key.range,
                    format!("annotation {} is not defined", name),
                )
                .hint = Some(hint);
            return;
        };

        let mut texts = Vec::with_capacity(raw.len());
        let mut rejected = false;
        for value in raw {
            let text = canonical(value);
            if let Some(finding) = self.vocabulary.check(definition, &text, self.resolver) {
                report(diagnostics, finding, &value.range);
                rejected = true;
            }
            texts.push(text);
        }
        if !rejected {
            context::set_values(&mut self.context, &name, texts);
        }
    }

    /// `SET Citation = {...}`
    pub fn set_citation(
        &mut self,
        fields: &[RawValue],
        line_range: &Range<usize>,
        diagnostics: &mut DiagnosticCollector<'_>,
    ) {
        let texts: Vec<String> = fields.iter().map(canonical).collect();
        match Citation::from_fields(&texts) {
            Some(citation) => context::set_citation(&mut self.context, citation),
            None => {
                diagnostics.error_at(
                    Category::Grammar,
                    Rule::CitationArity,
                    line_range,
                    format!("citation has {} fields, expected 2 to 6", texts.len()),
                );
            }
        }
    }

    pub fn set_statement_group(&mut self, value: &RawValue) {
        self.context.statement_group = Some(canonical(value));
    }

    /// `UNSET ...`; unsetting an inactive key is a warning
    pub fn unset(
        &mut self,
        target: &UnsetTarget,
        line_range: &Range<usize>,
        diagnostics: &mut DiagnosticCollector<'_>,
    ) {
        match target {
            UnsetTarget::All => context::unset_all(&mut self.context),
            UnsetTarget::StatementGroup => {
                if self.context.statement_group.take().is_none() {
                    diagnostics.warning_at(
                        Rule::InactiveUnset,
                        line_range,
                        "no statement group is active",
                    );
                }
            }
            UnsetTarget::Keys(keys) => {
                for key in keys {
                    let name = canonical(key);
                    if !self.context.unset(&name) {
                        diagnostics.warning_at(
                            Rule::InactiveUnset,
                            &key.range,
                            format!("{} is not set", name),
                        );
                    }
                }
            }
        }
    }

    /// Validate one built statement; true when it raised no errors
    pub fn statement(
        &mut self,
        built: &BuiltStatement,
        diagnostics: &mut DiagnosticCollector<'_>,
    ) -> bool {
        let errors_before = diagnostics.error_count();

        for usage in &built.sites.references {
            self.reference(&usage.reference, &usage.range, diagnostics);
        }
        for site in &built.sites.modifiers {
            for finding in modifiers::check_modifier(site) {
                report(diagnostics, finding, &site.range);
            }
        }
        for site in &built.sites.fusions {
            for finding in modifiers::check_fusion(site) {
                report(diagnostics, finding, &site.range);
            }
        }

        let statement = &built.statement;
        if let Some(relation) = &built.relation {
            self.relation_warnings(relation, diagnostics);
        }
        let object_range = built.object_range.clone().unwrap_or(built.subject_range.clone());

        match (statement.relation, &statement.object) {
            (Some(relation), Some(StatementObject::Term(object))) => {
                self.triple(
                    relation,
                    &statement.subject,
                    object,
                    &built.subject_range,
                    &object_range,
                    diagnostics,
                );
            }
            (Some(relation), Some(StatementObject::Nested(nested))) => {
                if !relations::accepts_nested(relation) {
                    diagnostics
                        .error_at(
                            Category::Semantic,
                            Rule::NestedStatement,
                            &object_range,
                            format!("{} cannot take a nested statement", relation),
                        )
                        .hint = Some("nest statements under a causal relation".to_string());
                }
                if let Some(sites) = &built.nested {
                    self.relation_warnings(&sites.relation, diagnostics);
                    self.triple(
                        nested.relation,
                        &nested.subject,
                        &nested.object,
                        &sites.subject,
                        &sites.object,
                        diagnostics,
                    );
                }
            }
            _ => {}
        }

        diagnostics.error_count() == errors_before
    }

    fn triple(
        &self,
        relation: Relation,
        subject: &Term,
        object: &Term,
        subject_range: &Range<usize>,
        object_range: &Range<usize>,
        diagnostics: &mut DiagnosticCollector<'_>,
    ) {
        if let Some(finding) = relations::check(relation, subject, object) {
            let range = if finding.rule == Rule::IncompatibleSubject {
                subject_range
            } else {
                object_range
            };
            report(diagnostics, finding, range);
        }
        if relations::bans_self_reference(relation) && relations::is_self_reference(subject, object)
        {
            report(
                diagnostics,
                Finding::new(
                    Rule::SelfReference,
                    format!("subject of {} refers to itself", relation),
                ),
                object_range,
            );
        }
    }

    fn relation_warnings(&self, relation: &RawRelation, diagnostics: &mut DiagnosticCollector<'_>) {
        if relation.deprecated {
            diagnostics
                .warning_at(
                    Rule::DeprecatedRelation,
                    &relation.range,
                    format!("'{}' is deprecated", relation.text),
                )
                .hint = Some(format!("use {}", relation.relation));
        }
        if self.options.warn_injected_relations
            && relation.relation.category() == RelationCategory::Injected
        {
            diagnostics.warning_at(
                Rule::InjectedRelation,
                &relation.range,
                format!("{} is normally added by a compiler", relation.relation),
            );
        }
    }

    fn reference(
        &mut self,
        reference: &NamespaceRef,
        range: &Range<usize>,
        diagnostics: &mut DiagnosticCollector<'_>,
    ) {
        let Some(definition) = self.namespaces.get(&reference.namespace) else {
            let hint = defined_hint(&self.namespaces, "NAMESPACE", &reference.namespace);
            diagnostics
                .error_at(
                    Category::Semantic,
                    Rule::UndefinedNamespace,
                    range,
                    format!("namespace {} is not defined", reference.namespace),
                )
                .hint = Some(hint);
            return;
        };
        if let Some(finding) = self
            .vocabulary
            .check(definition, &reference.name, self.resolver)
        {
            report(diagnostics, finding, range);
        }
        if self.options.warn_ambiguous_entries {
            self.entries.record(reference, range.clone());
        }
    }

    /// Run document-wide checks and hand back the accumulated state
    pub fn finish(self, diagnostics: &mut DiagnosticCollector<'_>) -> ValidatedDocument {
        if self.options.warn_ambiguous_entries {
            for (reference, range, others) in self.entries.ambiguous() {
                diagnostics
                    .warning_at(
                        Rule::AmbiguousEntry,
                        range,
                        format!(
                            "\"{}\" is also used in namespace {}",
                            reference.name,
                            others.join(", ")
                        ),
                    )
                    .hint = Some(format!("check that {} is the intended entity", reference));
            }
        }
        ValidatedDocument {
            document: self.document,
            namespaces: self.namespaces,
            annotations: self.annotations,
        }
    }
}

fn defined_hint(registry: &Registry, kind: &str, keyword: &str) -> String {
    if let Some(close) = registry
        .keywords()
        .find(|defined| defined.eq_ignore_ascii_case(keyword))
    {
        return format!("did you mean {}?", close);
    }
    let defined: Vec<&str> = registry.keywords().collect();
    if defined.is_empty() {
        format!("add DEFINE {} {} AS ... before its first use", kind, keyword)
    } else {
        format!("defined: {}", defined.join(", "))
    }
}
