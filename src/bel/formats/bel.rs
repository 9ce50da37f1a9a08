//! Canonical BEL text
//!
//!     Writes terms and statements back as BEL using short function names,
//!     verbose relation names, canonical pmod codes and three-letter amino
//!     acids. Modifiers keep the order they were written in. Parsing the
//!     output yields structurally equal values, though not the original
//!     spelling.

use crate::bel::ast::{
    AminoAcidCode, AnnotationContext, Definition, DocumentProperty, ModificationPosition,
    ModificationType, Modifier, MolecularActivity, NamespaceRef, ParseResult, ReferenceKind,
    Statement, StatementObject, Term, TermBody,
};

/// Values that survive unquoted: the lexer reads them back as one word
fn is_bare(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
}

/// Quote and escape a free-text value
pub fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

fn value(value: &str) -> String {
    if is_bare(value) {
        value.to_string()
    } else {
        quote(value)
    }
}

pub fn reference(reference: &NamespaceRef) -> String {
    format!("{}:{}", reference.namespace, value(&reference.name))
}

fn modification_type(modification: &ModificationType) -> String {
    match modification {
        ModificationType::Known(known) => known.code().to_string(),
        ModificationType::Reference(ns) => reference(ns),
        ModificationType::Unknown(word) => value(word),
    }
}

pub fn modifier(modifier: &Modifier) -> String {
    match modifier {
        Modifier::Variant { hgvs } => format!("var({})", quote(hgvs)),
        Modifier::Fragment(fragment) => match &fragment.descriptor {
            Some(descriptor) => format!("frag({}, {})", quote(&fragment.range), quote(descriptor)),
            None => format!("frag({})", quote(&fragment.range)),
        },
        Modifier::ProteinModification(pmod) => {
            let mut args = vec![modification_type(&pmod.modification)];
            if let Some(amino_acid) = &pmod.amino_acid {
                args.push(match amino_acid {
                    AminoAcidCode::Known(aa) => aa.three_letter().to_string(),
                    AminoAcidCode::Unknown(code) => value(code),
                });
            }
            if let Some(position) = &pmod.position {
                args.push(match position {
                    ModificationPosition::Known(n) => n.to_string(),
                    ModificationPosition::Invalid(text) => value(text),
                });
            }
            format!("pmod({})", args.join(", "))
        }
        Modifier::Location(location) => format!("loc({})", reference(location)),
        Modifier::GeneModification(gmod) => {
            format!("gmod({})", modification_type(&gmod.modification))
        }
        Modifier::MolecularActivity { activity } => match activity {
            MolecularActivity::Default(name) => format!("ma({})", value(name)),
            MolecularActivity::Reference(ns) => format!("ma({})", reference(ns)),
        },
    }
}

fn terms(terms: &[Term]) -> Vec<String> {
    terms.iter().map(term).collect()
}

pub fn term(term: &Term) -> String {
    let mut args = match &term.body {
        TermBody::Reference(ns) => vec![reference(ns)],
        TermBody::Terms(children) => terms(children),
        TermBody::Fusion(fusion) => vec![format!(
            "fus({}, {}, {}, {})",
            reference(&fusion.partner_5),
            quote(&fusion.range_5),
            reference(&fusion.partner_3),
            quote(&fusion.range_3)
        )],
        TermBody::Translocation {
            abundance,
            from_location,
            to_location,
        } => vec![
            self::term(abundance),
            format!("fromLoc({})", reference(from_location)),
            format!("toLoc({})", reference(to_location)),
        ],
        TermBody::Reaction {
            reactants,
            products,
        } => vec![
            format!("reactants({})", terms(reactants).join(", ")),
            format!("products({})", terms(products).join(", ")),
        ],
    };
    args.extend(term.modifiers.iter().map(modifier));
    format!("{}({})", term.function.short_name(), args.join(", "))
}

/// One statement on one line, without its context
pub fn statement(statement: &Statement) -> String {
    let mut line = term(&statement.subject);
    if let (Some(relation), Some(object)) = (statement.relation, &statement.object) {
        let object = match object {
            StatementObject::Term(object) => term(object),
            StatementObject::Nested(nested) => format!(
                "({} {} {})",
                term(&nested.subject),
                nested.relation,
                term(&nested.object)
            ),
        };
        line = format!("{} {} {}", line, relation, object);
    }
    if let Some(comment) = &statement.comment {
        line = format!("{} // {}", line, comment);
    }
    line
}

fn definition(definition: &Definition) -> String {
    let reference = match &definition.reference {
        ReferenceKind::Url(url) => format!("URL {}", quote(url)),
        ReferenceKind::Pattern(pattern) => format!("PATTERN {}", quote(pattern)),
        ReferenceKind::File(path) => format!("FILE {}", quote(path)),
        ReferenceKind::List(values) => {
            let values: Vec<String> = values.iter().map(|v| quote(v)).collect();
            format!("LIST {{{}}}", values.join(", "))
        }
    };
    format!(
        "DEFINE {} {} AS {}",
        definition.kind.keyword(),
        definition.keyword,
        reference
    )
}

const PROPERTIES: [DocumentProperty; 8] = [
    DocumentProperty::Name,
    DocumentProperty::Description,
    DocumentProperty::Version,
    DocumentProperty::Authors,
    DocumentProperty::ContactInfo,
    DocumentProperty::Copyright,
    DocumentProperty::Licenses,
    DocumentProperty::Keywords,
];

fn set_values(key: &str, values: &[String]) -> String {
    match values {
        [single] => format!("SET {} = {}", key, quote(single)),
        _ => {
            let quoted: Vec<String> = values.iter().map(|v| quote(v)).collect();
            format!("SET {} = {{{}}}", key, quoted.join(", "))
        }
    }
}

/// SET/UNSET lines that turn context `from` into context `to`
fn transition(from: &AnnotationContext, to: &AnnotationContext, lines: &mut Vec<String>) {
    let mut current = from.clone();

    if to.citation != current.citation {
        match &to.citation {
            Some(citation) => {
                let mut fields = vec![citation.kind.clone()];
                if let Some(name) = &citation.name {
                    fields.push(name.clone());
                }
                fields.push(citation.reference.clone());
                fields.extend(
                    [&citation.date, &citation.authors, &citation.comment]
                        .into_iter()
                        .flatten()
                        .cloned(),
                );
                let quoted: Vec<String> = fields.iter().map(|f| quote(f)).collect();
                lines.push(format!("SET Citation = {{{}}}", quoted.join(", ")));
                current.annotations.clear();
                current.evidence = None;
            }
            None => lines.push("UNSET Citation".to_string()),
        }
        current.citation = to.citation.clone();
    }

    if to.statement_group != current.statement_group {
        match &to.statement_group {
            Some(group) => lines.push(format!("SET STATEMENT_GROUP = {}", quote(group))),
            None => lines.push("UNSET STATEMENT_GROUP".to_string()),
        }
    }

    if to.evidence != current.evidence {
        match &to.evidence {
            Some(evidence) => lines.push(format!("SET Evidence = {}", quote(evidence))),
            None => lines.push("UNSET Evidence".to_string()),
        }
    }

    for key in current.annotations.keys() {
        if !to.annotations.contains_key(key) {
            lines.push(format!("UNSET {}", key));
        }
    }
    for (key, values) in &to.annotations {
        if current.annotations.get(key) != Some(values) {
            lines.push(set_values(key, values));
        }
    }
}

/// A whole document: properties, definitions, then statements with the
/// SET/UNSET lines needed to reproduce each statement's context
pub fn document(result: &ParseResult) -> String {
    let mut lines = Vec::new();
    for property in PROPERTIES {
        if let Some(value) = result.document.get(property) {
            lines.push(format!("SET DOCUMENT {} = {}", property.keyword(), quote(value)));
        }
    }
    if !lines.is_empty() {
        lines.push(String::new());
    }

    let definitions: Vec<&Definition> = result
        .namespaces
        .iter()
        .chain(result.annotations.iter())
        .collect();
    for def in &definitions {
        lines.push(definition(def));
    }
    if !definitions.is_empty() {
        lines.push(String::new());
    }

    let mut context = AnnotationContext::default();
    for item in &result.statements {
        transition(&context, &item.context, &mut lines);
        context = item.context.clone();
        lines.push(statement(item));
    }

    let mut text = lines.join("\n");
    text.push('\n');
    text
}
