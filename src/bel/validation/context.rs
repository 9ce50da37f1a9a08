//! SET/UNSET bookkeeping on the running annotation context
//!
//!     Built-in keys need no ANNOTATION definition. `Evidence`, `Support`
//!     and `SupportingText` are one slot; a new citation starts a fresh
//!     evidence/annotation scope but keeps the statement group.

use crate::bel::ast::{AnnotationContext, Citation};

pub const BUILTIN_KEYS: [&str; 6] = [
    "Evidence",
    "Support",
    "SupportingText",
    "Citation",
    "StatementGroup",
    "STATEMENT_GROUP",
];

pub fn is_builtin(key: &str) -> bool {
    BUILTIN_KEYS.contains(&key)
}

pub fn is_evidence_key(key: &str) -> bool {
    matches!(key, "Evidence" | "Support" | "SupportingText")
}

/// Apply `SET key = value(s)` for a built-in or defined annotation key
pub fn set_values(context: &mut AnnotationContext, key: &str, values: Vec<String>) {
    if is_evidence_key(key) {
        context.evidence = Some(values.join(" "));
    } else if matches!(key, "StatementGroup" | "STATEMENT_GROUP") {
        context.statement_group = Some(values.join(" "));
    } else {
        context.annotations.insert(key.to_string(), values);
    }
}

pub fn set_citation(context: &mut AnnotationContext, citation: Citation) {
    let group = context.statement_group.take();
    context.clear();
    context.statement_group = group;
    context.citation = Some(citation);
}

/// `UNSET ALL` clears everything but the statement group
pub fn unset_all(context: &mut AnnotationContext) {
    let group = context.statement_group.take();
    context.clear();
    context.statement_group = group;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn citation() -> Citation {
        Citation::from_fields(&["PubMed".to_string(), "12345".to_string()]).unwrap()
    }

    #[test]
    fn test_evidence_synonyms_share_a_slot() {
        let mut context = AnnotationContext::default();
        set_values(&mut context, "Support", vec!["some text".to_string()]);
        assert!(context.is_active("Evidence"));
        assert!(context.unset("SupportingText"));
        assert!(context.evidence.is_none());
    }

    #[test]
    fn test_citation_resets_scope() {
        let mut context = AnnotationContext::default();
        context.statement_group = Some("group 1".to_string());
        set_values(&mut context, "Species", vec!["9606".to_string()]);
        set_values(&mut context, "Evidence", vec!["text".to_string()]);
        set_citation(&mut context, citation());
        assert!(context.annotations.is_empty());
        assert!(context.evidence.is_none());
        assert_eq!(context.statement_group.as_deref(), Some("group 1"));
        assert_eq!(context.citation.unwrap().reference, "12345");
    }

    #[test]
    fn test_unset_all_keeps_group() {
        let mut context = AnnotationContext::default();
        context.statement_group = Some("g".to_string());
        set_citation(&mut context, citation());
        set_values(&mut context, "Cell", vec!["a".to_string(), "b".to_string()]);
        unset_all(&mut context);
        assert_eq!(context, {
            let mut expected = AnnotationContext::default();
            expected.statement_group = Some("g".to_string());
            expected
        });
    }

    #[test]
    fn test_builtin_keys() {
        assert!(is_builtin("Citation"));
        assert!(is_builtin("SupportingText"));
        assert!(!is_builtin("Species"));
    }
}
