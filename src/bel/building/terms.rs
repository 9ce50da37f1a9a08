//! Term and modifier construction
//!
//!     Walks a [RawCall] bottom-up. Every function has a fixed argument
//!     shape (a reference, child terms, a fusion, `fromLoc`/`toLoc`, ...);
//!     arguments that do not fit the shape are build errors. Whether a
//!     modifier is *legal* on its term is not decided here.
//!
//!     While building, the builder records where each modifier, fusion and
//!     namespace reference came from so later checks can point at them.

use std::ops::Range;

use super::values::canonical;
use super::BuildError;
use crate::bel::ast::{
    AminoAcidCode, Fragment, Function, Fusion, GeneModification, ModificationPosition,
    ModificationType, Modifier, ModifierKind, MolecularActivity, NamespaceRef,
    ProteinModification, Term, TermBody,
};
use crate::bel::lexing::ArgumentFunction;
use crate::bel::parsing::{CallHead, RawArg, RawCall, RawReference, RawValue};

/// A namespace reference and where it was written
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceUse {
    pub reference: NamespaceRef,
    pub range: Range<usize>,
}

/// A modifier together with the function it is attached to
#[derive(Debug, Clone, PartialEq)]
pub struct ModifierSite {
    pub host: Function,
    pub modifier: Modifier,
    pub range: Range<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FusionSite {
    pub host: Function,
    pub fusion: Fusion,
    pub range: Range<usize>,
}

/// Source sites collected while building one statement
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sites {
    pub references: Vec<ReferenceUse>,
    pub modifiers: Vec<ModifierSite>,
    pub fusions: Vec<FusionSite>,
}

fn shape_error(range: Range<usize>, message: impl Into<String>) -> BuildError {
    BuildError {
        message: message.into(),
        range,
    }
}

impl Sites {
    fn reference(&mut self, raw: &RawReference) -> NamespaceRef {
        let reference = NamespaceRef::new(canonical(&raw.namespace), canonical(&raw.name));
        self.references.push(ReferenceUse {
            reference: reference.clone(),
            range: raw.range(),
        });
        reference
    }

    /// Build a term from a call in term position
    pub fn term(&mut self, call: &RawCall) -> Result<Term, BuildError> {
        let function = match call.head {
            CallHead::Function(function) => function,
            _ => {
                return Err(shape_error(
                    call.range.clone(),
                    format!("'{}' is not a term function", call.head_text),
                ))
            }
        };

        let mut args = call.args.iter().peekable();
        let body = match function {
            Function::Composite | Function::List => {
                TermBody::Terms(self.leading_terms(call, &mut args, 1)?)
            }
            Function::Complex => {
                if matches!(args.peek(), Some(RawArg::Call(inner)) if matches!(inner.head, CallHead::Function(_)))
                {
                    let members = self.leading_terms(call, &mut args, 1)?;
                    let term = self.with_modifiers(
                        Term::new(Function::ComplexList, TermBody::Terms(members)),
                        call,
                        args,
                    )?;
                    return Ok(term);
                }
                self.reference_body(call, function, &mut args)?
            }
            Function::Activity
            | Function::CellSecretion
            | Function::CellSurfaceExpression
            | Function::Degradation => {
                let inner = self.single_term(call, &mut args)?;
                TermBody::Terms(vec![inner])
            }
            Function::Translocation => self.translocation(call, &mut args)?,
            Function::Reaction => self.reaction(call, &mut args)?,
            Function::ComplexList => {
                // Never produced by the parser
                return Err(shape_error(call.range.clone(), "invalid complex"));
            }
            Function::Abundance
            | Function::Gene
            | Function::Rna
            | Function::MicroRna
            | Function::Protein
            | Function::Population
            | Function::BiologicalProcess
            | Function::Pathology => self.reference_body(call, function, &mut args)?,
        };

        self.with_modifiers(Term::new(function, body), call, args)
    }

    fn reference_body<'a>(
        &mut self,
        call: &RawCall,
        function: Function,
        args: &mut std::iter::Peekable<std::slice::Iter<'a, RawArg>>,
    ) -> Result<TermBody, BuildError> {
        match args.next() {
            Some(RawArg::Reference(raw)) => Ok(TermBody::Reference(self.reference(raw))),
            Some(RawArg::Call(inner))
                if inner.head == CallHead::Argument(ArgumentFunction::Fusion) =>
            {
                let fusion = self.fusion(inner)?;
                self.fusions.push(FusionSite {
                    host: function,
                    fusion: fusion.clone(),
                    range: inner.range.clone(),
                });
                Ok(TermBody::Fusion(fusion))
            }
            Some(other) => Err(shape_error(
                other.range(),
                format!(
                    "{} expects a namespace reference such as NS:value",
                    call.head_text
                ),
            )),
            None => Err(shape_error(
                call.range.clone(),
                format!("{} is missing its namespace reference", call.head_text),
            )),
        }
    }

    /// Consume term arguments from the front, requiring at least `min`
    fn leading_terms<'a>(
        &mut self,
        call: &RawCall,
        args: &mut std::iter::Peekable<std::slice::Iter<'a, RawArg>>,
        min: usize,
    ) -> Result<Vec<Term>, BuildError> {
        let mut terms = Vec::new();
        while let Some(RawArg::Call(inner)) = args.peek().copied() {
            if !matches!(inner.head, CallHead::Function(_)) {
                break;
            }
            terms.push(self.term(inner)?);
            args.next();
        }
        if terms.len() < min {
            return Err(shape_error(
                call.range.clone(),
                format!("{} needs at least {} term argument(s)", call.head_text, min),
            ));
        }
        Ok(terms)
    }

    fn single_term<'a>(
        &mut self,
        call: &RawCall,
        args: &mut std::iter::Peekable<std::slice::Iter<'a, RawArg>>,
    ) -> Result<Term, BuildError> {
        match args.next() {
            Some(RawArg::Call(inner)) if matches!(inner.head, CallHead::Function(_)) => {
                self.term(inner)
            }
            Some(other) => Err(shape_error(
                other.range(),
                format!("{} expects a term argument", call.head_text),
            )),
            None => Err(shape_error(
                call.range.clone(),
                format!("{} expects a term argument", call.head_text),
            )),
        }
    }

    /// Remaining arguments must all be modifiers
    fn with_modifiers<'a>(
        &mut self,
        mut term: Term,
        call: &RawCall,
        args: impl Iterator<Item = &'a RawArg>,
    ) -> Result<Term, BuildError> {
        for arg in args {
            match arg {
                RawArg::Call(inner) => match inner.head {
                    CallHead::Modifier(kind) => {
                        let modifier = self.modifier(kind, inner)?;
                        self.modifiers.push(ModifierSite {
                            host: term.function,
                            modifier: modifier.clone(),
                            range: inner.range.clone(),
                        });
                        term.modifiers.push(modifier);
                    }
                    _ => {
                        return Err(shape_error(
                            inner.range.clone(),
                            format!(
                                "unexpected {}(...) inside {}",
                                inner.head_text, call.head_text
                            ),
                        ))
                    }
                },
                other => {
                    return Err(shape_error(
                        other.range(),
                        format!("unexpected argument inside {}", call.head_text),
                    ))
                }
            }
        }
        Ok(term)
    }

    fn translocation<'a>(
        &mut self,
        call: &RawCall,
        args: &mut std::iter::Peekable<std::slice::Iter<'a, RawArg>>,
    ) -> Result<TermBody, BuildError> {
        let abundance = self.single_term(call, args)?;
        let rest: Vec<&RawArg> = args.collect();
        let (from, to) = match rest.as_slice() {
            [RawArg::Call(from), RawArg::Call(to)]
                if from.head == CallHead::Argument(ArgumentFunction::FromLocation)
                    && to.head == CallHead::Argument(ArgumentFunction::ToLocation) =>
            {
                (self.location_argument(from)?, self.location_argument(to)?)
            }
            // BEL 1 positional form: tloc(term, NS:from, NS:to)
            [RawArg::Reference(from), RawArg::Reference(to)] => {
                (self.reference(from), self.reference(to))
            }
            _ => {
                return Err(shape_error(
                    call.range.clone(),
                    "tloc needs fromLoc(NS:value) and toLoc(NS:value)",
                ))
            }
        };
        Ok(TermBody::Translocation {
            abundance: Box::new(abundance),
            from_location: from,
            to_location: to,
        })
    }

    fn location_argument(&mut self, call: &RawCall) -> Result<NamespaceRef, BuildError> {
        match call.args.as_slice() {
            [RawArg::Reference(raw)] => Ok(self.reference(raw)),
            _ => Err(shape_error(
                call.range.clone(),
                format!("{} expects one namespace reference", call.head_text),
            )),
        }
    }

    fn reaction<'a>(
        &mut self,
        call: &RawCall,
        args: &mut std::iter::Peekable<std::slice::Iter<'a, RawArg>>,
    ) -> Result<TermBody, BuildError> {
        let rest: Vec<&RawArg> = args.collect();
        match rest.as_slice() {
            [RawArg::Call(reactants), RawArg::Call(products)]
                if reactants.head == CallHead::Argument(ArgumentFunction::Reactants)
                    && products.head == CallHead::Argument(ArgumentFunction::Products) =>
            {
                Ok(TermBody::Reaction {
                    reactants: self.term_list(reactants)?,
                    products: self.term_list(products)?,
                })
            }
            _ => Err(shape_error(
                call.range.clone(),
                "rxn needs reactants(...) followed by products(...)",
            )),
        }
    }

    fn term_list(&mut self, call: &RawCall) -> Result<Vec<Term>, BuildError> {
        call.args
            .iter()
            .map(|arg| match arg {
                RawArg::Call(inner) if matches!(inner.head, CallHead::Function(_)) => {
                    self.term(inner)
                }
                other => Err(shape_error(
                    other.range(),
                    format!("{} only takes terms", call.head_text),
                )),
            })
            .collect()
    }

    fn fusion(&mut self, call: &RawCall) -> Result<Fusion, BuildError> {
        match call.args.as_slice() {
            [RawArg::Reference(partner_5), RawArg::Value(range_5), RawArg::Reference(partner_3), RawArg::Value(range_3)] => {
                Ok(Fusion {
                    partner_5: self.reference(partner_5),
                    range_5: canonical(range_5),
                    partner_3: self.reference(partner_3),
                    range_3: canonical(range_3),
                })
            }
            [RawArg::Reference(partner_5), RawArg::Reference(partner_3)] => Ok(Fusion {
                partner_5: self.reference(partner_5),
                range_5: "?".to_string(),
                partner_3: self.reference(partner_3),
                range_3: "?".to_string(),
            }),
            _ => Err(shape_error(
                call.range.clone(),
                "fus expects (NS:5', \"range\", NS:3', \"range\")",
            )),
        }
    }

    fn modifier(&mut self, kind: ModifierKind, call: &RawCall) -> Result<Modifier, BuildError> {
        let arity_error = |expected: &str| {
            shape_error(
                call.range.clone(),
                format!("{} expects {}", call.head_text, expected),
            )
        };
        match kind {
            ModifierKind::Variant => match call.args.as_slice() {
                [RawArg::Value(hgvs)] => Ok(Modifier::Variant {
                    hgvs: canonical(hgvs),
                }),
                _ => Err(arity_error("one HGVS string")),
            },
            ModifierKind::Fragment => match call.args.as_slice() {
                [RawArg::Value(range)] => Ok(Modifier::Fragment(Fragment {
                    range: canonical(range),
                    descriptor: None,
                })),
                [RawArg::Value(range), RawArg::Value(descriptor)] => {
                    Ok(Modifier::Fragment(Fragment {
                        range: canonical(range),
                        descriptor: Some(canonical(descriptor)),
                    }))
                }
                _ => Err(arity_error("a range and an optional descriptor")),
            },
            ModifierKind::ProteinModification => {
                let (kind_arg, rest) = match call.args.split_first() {
                    Some(split) if call.args.len() <= 3 => split,
                    _ => return Err(arity_error("(type[, amino acid[, position]])")),
                };
                let modification = self.modification_type(kind_arg, call)?;
                let values: Vec<&RawValue> = rest
                    .iter()
                    .map(|arg| match arg {
                        RawArg::Value(value) => Ok(value),
                        other => Err(shape_error(
                            other.range(),
                            "amino acid and position must be plain values",
                        )),
                    })
                    .collect::<Result<_, _>>()?;
                Ok(Modifier::ProteinModification(ProteinModification {
                    modification,
                    amino_acid: values
                        .first()
                        .map(|value| AminoAcidCode::from_word(&canonical(value))),
                    position: values
                        .get(1)
                        .map(|value| ModificationPosition::from_word(&canonical(value))),
                }))
            }
            ModifierKind::Location => match call.args.as_slice() {
                [RawArg::Reference(raw)] => Ok(Modifier::Location(self.reference(raw))),
                _ => Err(arity_error("one namespace reference")),
            },
            ModifierKind::GeneModification => match call.args.as_slice() {
                [arg] => Ok(Modifier::GeneModification(GeneModification {
                    modification: self.modification_type(arg, call)?,
                })),
                _ => Err(arity_error("one modification type")),
            },
            ModifierKind::MolecularActivity => match call.args.as_slice() {
                [RawArg::Value(name)] => Ok(Modifier::MolecularActivity {
                    activity: MolecularActivity::Default(canonical(name)),
                }),
                [RawArg::Reference(raw)] => Ok(Modifier::MolecularActivity {
                    activity: MolecularActivity::Reference(self.reference(raw)),
                }),
                _ => Err(arity_error("one activity name or namespace reference")),
            },
        }
    }

    fn modification_type(
        &mut self,
        arg: &RawArg,
        call: &RawCall,
    ) -> Result<ModificationType, BuildError> {
        match arg {
            RawArg::Value(value) => Ok(ModificationType::from_word(&canonical(value))),
            RawArg::Reference(raw) => Ok(ModificationType::Reference(self.reference(raw))),
            RawArg::Call(inner) => Err(shape_error(
                inner.range.clone(),
                format!("{} expects a modification type", call.head_text),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bel::ast::{AminoAcid, PmodType};
    use crate::bel::lexing::lex;
    use crate::bel::parsing::{parse_line, ParsedLine};

    fn build(source: &str) -> (Result<Term, BuildError>, Sites) {
        let parsed = parse_line(&lex(source)[0]).unwrap();
        let ParsedLine::Statement(statement) = parsed else {
            panic!("not a statement");
        };
        let mut sites = Sites::default();
        let term = sites.term(&statement.subject);
        (term, sites)
    }

    #[test]
    fn test_reference_term() {
        let (term, sites) = build("p(HGNC:\"AKT1\")");
        assert_eq!(
            term.unwrap(),
            Term::reference(Function::Protein, "HGNC", "AKT1")
        );
        assert_eq!(sites.references.len(), 1);
        assert_eq!(sites.references[0].range, 2..13);
    }

    #[test]
    fn test_pmod_canonicalization() {
        let (term, sites) = build("p(HGNC:AKT1, pmod(phosphorylation, S, 473))");
        let term = term.unwrap();
        assert_eq!(
            term.modifiers,
            vec![Modifier::ProteinModification(ProteinModification {
                modification: ModificationType::Known(PmodType::Phosphorylation),
                amino_acid: Some(AminoAcidCode::Known(AminoAcid::Ser)),
                position: Some(ModificationPosition::Known(473)),
            })]
        );
        assert_eq!(sites.modifiers.len(), 1);
        assert_eq!(sites.modifiers[0].host, Function::Protein);
    }

    #[test]
    fn test_complex_of_terms_is_complex_list() {
        let (term, _) = build("complex(p(HGNC:A), p(HGNC:B))");
        let term = term.unwrap();
        assert_eq!(term.function, Function::ComplexList);
        assert_eq!(term.children().len(), 2);
        let (named, _) = build("complex(GO:\"AP-1 complex\")");
        assert_eq!(named.unwrap().function, Function::Complex);
    }

    #[test]
    fn test_translocation_forms() {
        let (verbose, _) = build("tloc(p(HGNC:A), fromLoc(GO:cytoplasm), toLoc(GO:nucleus))");
        let (positional, _) = build("tloc(p(HGNC:A), GO:cytoplasm, GO:nucleus)");
        assert_eq!(verbose.unwrap(), positional.unwrap());
        let (missing, _) = build("tloc(p(HGNC:A), fromLoc(GO:cytoplasm))");
        assert!(missing.is_err());
    }

    #[test]
    fn test_reaction_needs_both_sides() {
        let (ok, _) = build("rxn(reactants(a(CHEBI:x)), products(a(CHEBI:y), a(CHEBI:z)))");
        match ok.unwrap().body {
            TermBody::Reaction {
                reactants,
                products,
            } => {
                assert_eq!(reactants.len(), 1);
                assert_eq!(products.len(), 2);
            }
            other => panic!("unexpected body {:?}", other),
        }
        let (missing, _) = build("rxn(reactants(a(CHEBI:x)))");
        assert!(missing.is_err());
    }

    #[test]
    fn test_fusion_body() {
        let (term, sites) = build("r(fus(HGNC:TMPRSS2, \"r.1_79\", HGNC:ERG, \"r.312_5034\"))");
        assert!(term.unwrap().is_fusion());
        assert_eq!(sites.fusions.len(), 1);
        assert_eq!(sites.references.len(), 2);
    }

    #[test]
    fn test_misplaced_arguments() {
        assert!(build("p(HGNC:A, HGNC:B)").0.is_err());
        assert!(build("p(loc(GO:x))").0.is_err());
        assert!(build("act(HGNC:A)").0.is_err());
        assert!(build("p(HGNC:A, pmod())").0.is_err());
    }
}
