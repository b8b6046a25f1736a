//! Method matching.
//!
//! Method requirements are checked against the subject's *class* — mapping
//! subjects have no class, so every method spec fails against them. The
//! name comparison uses the same policy as field names (so case-insensitive
//! mode applies), with an empty alias set.

use duckdantic_types::{ClassDef, FieldAliasSet, MethodSpec, Subject, TypeCompatPolicy};

use crate::matching::Mismatch;

/// Check method specs against a class's declared callables.
pub(crate) fn check_methods(
    class: Option<&std::sync::Arc<ClassDef>>,
    specs: &[MethodSpec],
    policy: &TypeCompatPolicy,
) -> Vec<Mismatch> {
    let empty_aliases = FieldAliasSet::new();
    let mut mismatches = Vec::new();
    for spec in specs {
        let decl = class.and_then(|c| {
            c.methods
                .iter()
                .find(|m| policy.names_match(&spec.name, &empty_aliases, &m.name))
        });
        match decl {
            None => mismatches.push(Mismatch::MissingMethod {
                method: spec.name.clone(),
            }),
            Some(decl) => {
                if let Some(required_arity) = spec.arity {
                    if decl.arity != required_arity {
                        mismatches.push(Mismatch::SignatureMismatch {
                            method: spec.name.clone(),
                            required_arity,
                            candidate_arity: decl.arity,
                        });
                    }
                }
            }
        }
    }
    mismatches
}

/// Explain the method-only portion of a trait against a subject.
pub fn methods_explain(
    subject: &Subject,
    specs: &[MethodSpec],
    policy: &TypeCompatPolicy,
) -> Vec<Mismatch> {
    check_methods(subject.class_def(), specs, policy)
}

/// Does the subject's class expose every required callable?
pub fn methods_satisfy(
    subject: &Subject,
    specs: &[MethodSpec],
    policy: &TypeCompatPolicy,
) -> bool {
    methods_explain(subject, specs, policy).is_empty()
}
