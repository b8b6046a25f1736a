//! Coarse trait-to-trait relations.
//!
//! `compare_traits` classifies how the member sets of two traits relate
//! under policy name matching. It looks at names only — use the algebra
//! when type constraints matter.

use serde::{Deserialize, Serialize};

use duckdantic_types::{FieldAliasSet, TraitSpec, TypeCompatPolicy};

/// Relation between the member sets of two traits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TraitRelation {
    /// Same members on both sides.
    Equivalent,
    /// Every member of the first trait appears in the second.
    Subset,
    /// Every member of the second trait appears in the first.
    Superset,
    /// Some members are shared, some are not.
    Overlapping,
    /// No shared members.
    Disjoint,
}

fn member_in(spec: &TraitSpec, name: &str, aliases: &FieldAliasSet, policy: &TypeCompatPolicy) -> bool {
    let no_aliases = FieldAliasSet::new();
    spec.fields.iter().any(|f| {
        policy.names_match(&f.name, &f.aliases, name) || policy.names_match(name, aliases, &f.name)
    }) || spec
        .methods
        .iter()
        .any(|m| policy.names_match(&m.name, &no_aliases, name))
}

fn coverage(of: &TraitSpec, by: &TraitSpec, policy: &TypeCompatPolicy) -> (usize, usize) {
    let no_aliases = FieldAliasSet::new();
    let mut covered = 0;
    let mut total = 0;
    for field in &of.fields {
        total += 1;
        if member_in(by, &field.name, &field.aliases, policy) {
            covered += 1;
        }
    }
    for method in &of.methods {
        total += 1;
        if member_in(by, &method.name, &no_aliases, policy) {
            covered += 1;
        }
    }
    (covered, total)
}

/// Classify how trait `a`'s members relate to trait `b`'s.
///
/// Two empty traits are `Equivalent`; an empty trait is a `Subset` of any
/// non-empty one.
pub fn compare_traits(a: &TraitSpec, b: &TraitSpec, policy: &TypeCompatPolicy) -> TraitRelation {
    let (a_covered, a_total) = coverage(a, b, policy);
    let (b_covered, b_total) = coverage(b, a, policy);
    let a_in_b = a_covered == a_total;
    let b_in_a = b_covered == b_total;
    match (a_in_b, b_in_a) {
        (true, true) => TraitRelation::Equivalent,
        (true, false) => TraitRelation::Subset,
        (false, true) => TraitRelation::Superset,
        (false, false) => {
            if a_covered > 0 || b_covered > 0 {
                TraitRelation::Overlapping
            } else {
                TraitRelation::Disjoint
            }
        }
    }
}
