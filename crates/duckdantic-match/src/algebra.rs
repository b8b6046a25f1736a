//! Trait algebra: set operations over trait specs.
//!
//! All operations are pure and produce new specs; inputs are never
//! mutated. Merging two constraints with the same name keeps the narrower
//! one; when neither is narrower under the active policy the merge is a
//! configuration error ([`DuckError::AmbiguousTraitMerge`]), never a silent
//! guess.
//!
//! Result field order is deterministic: the first operand's declaration
//! order, then the second operand's novel members. `union` and `intersect`
//! are commutative and idempotent modulo that ordering; `minus` is neither.

use std::cmp::Ordering;

use duckdantic_types::{
    short_type_token, DuckError, FieldSpec, MethodSpec, TraitSpec, TypeCompatPolicy,
};

/// Policy-aware name match between two field specs (either side's aliases
/// may carry the match).
fn field_names_match(a: &FieldSpec, b: &FieldSpec, policy: &TypeCompatPolicy) -> bool {
    policy.names_match(&a.name, &a.aliases, &b.name)
        || policy.names_match(&b.name, &b.aliases, &a.name)
}

fn find_field(fields: &[FieldSpec], target: &FieldSpec, policy: &TypeCompatPolicy) -> Option<usize> {
    fields.iter().position(|f| field_names_match(f, target, policy))
}

fn find_method(methods: &[MethodSpec], name: &str, policy: &TypeCompatPolicy) -> Option<usize> {
    let no_aliases = duckdantic_types::FieldAliasSet::new();
    methods
        .iter()
        .position(|m| policy.names_match(&m.name, &no_aliases, name))
}

/// Narrower of two type constraints, or an ambiguity error.
fn narrower_type(
    name: &str,
    a: &duckdantic_types::TypeDesc,
    b: &duckdantic_types::TypeDesc,
    policy: &TypeCompatPolicy,
) -> Result<duckdantic_types::TypeDesc, DuckError> {
    match policy.specificity(a, b) {
        Some(Ordering::Greater) | Some(Ordering::Equal) => Ok(a.clone()),
        Some(Ordering::Less) => Ok(b.clone()),
        None => Err(DuckError::AmbiguousTraitMerge {
            name: name.to_string(),
            left: short_type_token(a),
            right: short_type_token(b),
        }),
    }
}

/// Wider of two type constraints, or an ambiguity error.
fn wider_type(
    name: &str,
    a: &duckdantic_types::TypeDesc,
    b: &duckdantic_types::TypeDesc,
    policy: &TypeCompatPolicy,
) -> Result<duckdantic_types::TypeDesc, DuckError> {
    match policy.specificity(a, b) {
        Some(Ordering::Less) | Some(Ordering::Equal) => Ok(a.clone()),
        Some(Ordering::Greater) => Ok(b.clone()),
        None => Err(DuckError::AmbiguousTraitMerge {
            name: name.to_string(),
            left: short_type_token(a),
            right: short_type_token(b),
        }),
    }
}

fn merged_aliases(a: &FieldSpec, b: &FieldSpec) -> duckdantic_types::FieldAliasSet {
    let mut aliases = a.aliases.merged(&b.aliases);
    // An alias-matched partner keeps its own name reachable.
    if b.name != a.name {
        aliases.insert(b.name.clone());
    }
    aliases
}

/// Narrower of two arity constraints (`None` = any arity, the widest).
fn narrower_arity(
    name: &str,
    a: Option<usize>,
    b: Option<usize>,
) -> Result<Option<usize>, DuckError> {
    match (a, b) {
        (None, other) | (other, None) => Ok(other),
        (Some(x), Some(y)) if x == y => Ok(Some(x)),
        (Some(x), Some(y)) => Err(DuckError::AmbiguousTraitMerge {
            name: name.to_string(),
            left: format!("arity {x}"),
            right: format!("arity {y}"),
        }),
    }
}

fn wider_arity(name: &str, a: Option<usize>, b: Option<usize>) -> Result<Option<usize>, DuckError> {
    match (a, b) {
        (None, _) | (_, None) => Ok(None),
        (Some(x), Some(y)) if x == y => Ok(Some(x)),
        (Some(x), Some(y)) => Err(DuckError::AmbiguousTraitMerge {
            name: name.to_string(),
            left: format!("arity {x}"),
            right: format!("arity {y}"),
        }),
    }
}

/// Union of two traits: every member of either input, required when either
/// input requires it, with the narrower type constraint winning.
///
/// # Errors
///
/// [`DuckError::AmbiguousTraitMerge`] when a shared member's constraints
/// are incomparable under the policy.
pub fn union(
    a: &TraitSpec,
    b: &TraitSpec,
    policy: &TypeCompatPolicy,
) -> Result<TraitSpec, DuckError> {
    let mut fields = Vec::with_capacity(a.fields.len() + b.fields.len());
    let mut consumed = vec![false; b.fields.len()];
    for fa in &a.fields {
        match find_field(&b.fields, fa, policy) {
            Some(idx) => {
                consumed[idx] = true;
                let fb = &b.fields[idx];
                fields.push(FieldSpec {
                    name: fa.name.clone(),
                    ty: narrower_type(&fa.name, &fa.ty, &fb.ty, policy)?,
                    required: fa.required || fb.required,
                    aliases: merged_aliases(fa, fb),
                });
            }
            None => fields.push(fa.clone()),
        }
    }
    for (idx, fb) in b.fields.iter().enumerate() {
        if !consumed[idx] {
            fields.push(fb.clone());
        }
    }

    let mut methods = Vec::with_capacity(a.methods.len() + b.methods.len());
    let mut consumed = vec![false; b.methods.len()];
    for ma in &a.methods {
        match find_method(&b.methods, &ma.name, policy) {
            Some(idx) => {
                consumed[idx] = true;
                methods.push(MethodSpec {
                    name: ma.name.clone(),
                    arity: narrower_arity(&ma.name, ma.arity, b.methods[idx].arity)?,
                });
            }
            None => methods.push(ma.clone()),
        }
    }
    for (idx, mb) in b.methods.iter().enumerate() {
        if !consumed[idx] {
            methods.push(mb.clone());
        }
    }

    Ok(TraitSpec::anonymous(fields, methods))
}

/// Intersection of two traits: members present in both inputs, required
/// only when both require them, with the wider type constraint winning.
///
/// # Errors
///
/// [`DuckError::AmbiguousTraitMerge`] when a shared member's constraints
/// are incomparable under the policy.
pub fn intersect(
    a: &TraitSpec,
    b: &TraitSpec,
    policy: &TypeCompatPolicy,
) -> Result<TraitSpec, DuckError> {
    let mut fields = Vec::new();
    for fa in &a.fields {
        if let Some(idx) = find_field(&b.fields, fa, policy) {
            let fb = &b.fields[idx];
            fields.push(FieldSpec {
                name: fa.name.clone(),
                ty: wider_type(&fa.name, &fa.ty, &fb.ty, policy)?,
                // Optional iff optional in either input.
                required: fa.required && fb.required,
                aliases: merged_aliases(fa, fb),
            });
        }
    }

    let mut methods = Vec::new();
    for ma in &a.methods {
        if let Some(idx) = find_method(&b.methods, &ma.name, policy) {
            methods.push(MethodSpec {
                name: ma.name.clone(),
                arity: wider_arity(&ma.name, ma.arity, b.methods[idx].arity)?,
            });
        }
    }

    Ok(TraitSpec::anonymous(fields, methods))
}

/// Difference: `a`'s members whose names do not appear (under name+alias
/// matching) in `b`. Pure and infallible; not commutative.
pub fn minus(a: &TraitSpec, b: &TraitSpec, policy: &TypeCompatPolicy) -> TraitSpec {
    let fields = a
        .fields
        .iter()
        .filter(|fa| find_field(&b.fields, fa, policy).is_none())
        .cloned()
        .collect();
    let methods = a
        .methods
        .iter()
        .filter(|ma| find_method(&b.methods, &ma.name, policy).is_none())
        .cloned()
        .collect();
    TraitSpec::anonymous(fields, methods)
}
