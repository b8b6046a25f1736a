//! The matcher: satisfaction and explanation.
//!
//! Mismatch records are normal output, not errors: `explain` always returns
//! the full list (possibly empty) together with the normalized field
//! mapping so callers can audit partial matches. The matcher performs no
//! caching of its own; memoization is confined to the normalizer layer.

use serde::{Deserialize, Serialize};

use duckdantic_types::{
    short_type_token, DuckError, FieldMap, FieldSpec, FieldView, Subject, TraitSpec,
    TypeCompatPolicy,
};
use duckdantic_normalize::{normalize_fields, ProviderRegistry};

use crate::methods::check_methods;

/// One reason a subject failed (or partially failed) a trait.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mismatch {
    /// No candidate field matched the spec's name under the policy.
    MissingField { field: String },
    /// A candidate was found but its type is incompatible.
    TypeMismatch {
        field: String,
        /// Short token of the required type.
        required: String,
        /// Short token of the candidate's type.
        candidate: String,
    },
    /// A required trait field matched an optional candidate.
    OptionalityMismatch { field: String },
    /// No callable of the required name exists on the subject's class.
    MissingMethod { method: String },
    /// A callable exists but its arity differs from the requirement.
    SignatureMismatch {
        method: String,
        required_arity: usize,
        candidate_arity: usize,
    },
}

impl std::fmt::Display for Mismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mismatch::MissingField { field } => write!(f, "missing field '{field}'"),
            Mismatch::TypeMismatch {
                field,
                required,
                candidate,
            } => write!(f, "field '{field}': required {required}, found {candidate}"),
            Mismatch::OptionalityMismatch { field } => {
                write!(f, "field '{field}' is optional but the trait requires it")
            }
            Mismatch::MissingMethod { method } => write!(f, "missing method '{method}'"),
            Mismatch::SignatureMismatch {
                method,
                required_arity,
                candidate_arity,
            } => write!(
                f,
                "method '{method}': required arity {required_arity}, found {candidate_arity}"
            ),
        }
    }
}

/// Full matching result: verdict, mismatches, and the normalized fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explanation {
    pub satisfied: bool,
    /// All mismatches, in trait declaration order (fields first, then
    /// methods).
    pub mismatches: Vec<Mismatch>,
    /// The subject's normalized field mapping, for auditing partial matches.
    pub fields: FieldMap,
}

/// Locate a candidate field view for a field spec under the policy.
///
/// The spec's declared name and aliases are consulted first; a candidate's
/// own aliases may also carry the match (a class field aliased to the
/// spec's name).
fn find_candidate<'a>(
    fields: &'a FieldMap,
    spec: &FieldSpec,
    policy: &TypeCompatPolicy,
) -> Option<&'a FieldView> {
    // Exact name is accepted in every alias mode.
    if let Some(view) = fields.get(&spec.name) {
        return Some(view);
    }
    fields.values().find(|view| {
        policy.names_match(&spec.name, &spec.aliases, &view.name)
            || policy.names_match(&view.name, &view.aliases, &spec.name)
    })
}

/// Match pre-normalized fields (and the subject's class, for methods)
/// against a trait.
///
/// This is the core the cached and uncached entry points share.
pub fn explain_fields(
    fields: &FieldMap,
    subject: &Subject,
    spec: &TraitSpec,
    policy: &TypeCompatPolicy,
) -> Explanation {
    let mut mismatches = Vec::new();

    for field_spec in &spec.fields {
        match find_candidate(fields, field_spec, policy) {
            None => {
                if field_spec.required {
                    mismatches.push(Mismatch::MissingField {
                        field: field_spec.name.clone(),
                    });
                }
            }
            Some(view) => {
                if !policy.types_compatible(&field_spec.ty, &view.ty) {
                    mismatches.push(Mismatch::TypeMismatch {
                        field: field_spec.name.clone(),
                        required: short_type_token(&field_spec.ty),
                        candidate: short_type_token(&view.ty),
                    });
                }
                // A required trait field is satisfied by an optional
                // candidate only if the trait field is itself optional or
                // the policy widens.
                if field_spec.required && !view.required && !policy.allow_optional_widening {
                    mismatches.push(Mismatch::OptionalityMismatch {
                        field: field_spec.name.clone(),
                    });
                }
            }
        }
    }

    mismatches.extend(check_methods(subject.class_def(), &spec.methods, policy));

    let satisfied = mismatches.is_empty();
    tracing::trace!(
        satisfied,
        mismatches = mismatches.len(),
        subject = subject.kind(),
        "trait match evaluated"
    );
    Explanation {
        satisfied,
        mismatches,
        fields: fields.clone(),
    }
}

/// Normalize the subject and explain the match.
///
/// # Errors
///
/// Normalization errors ([`DuckError::UnsupportedSubject`]) propagate; use
/// the dynamic-interface adapter for a never-failing boolean check.
pub fn explain(
    registry: &ProviderRegistry,
    subject: &Subject,
    spec: &TraitSpec,
    policy: &TypeCompatPolicy,
) -> Result<Explanation, DuckError> {
    let fields = normalize_fields(registry, subject)?;
    Ok(explain_fields(&fields, subject, spec, policy))
}

/// Does the subject satisfy the trait? True iff `explain` records no
/// mismatches.
pub fn satisfies(
    registry: &ProviderRegistry,
    subject: &Subject,
    spec: &TraitSpec,
    policy: &TypeCompatPolicy,
) -> Result<bool, DuckError> {
    Ok(explain(registry, subject, spec, policy)?.satisfied)
}
