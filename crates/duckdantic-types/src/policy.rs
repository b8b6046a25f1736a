//! Type-compatibility policy.
//!
//! A [`TypeCompatPolicy`] is a pure value object controlling how leniently
//! names and types are compared during matching. Policies are comparable
//! and hashable so they can serve as cache keys; the shared default is
//! [`TypeCompatPolicy::pragmatic`].

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::fields::FieldAliasSet;
use crate::typedesc::TypeDesc;

/// How field names are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AliasMode {
    /// Declared name only.
    Exact,
    /// Declared name or any name in the alias set.
    AliasAware,
    /// Alias-aware, with ASCII case folding applied to every comparison.
    CaseInsensitive,
}

/// How an `Unknown` candidate type is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strictness {
    /// `Unknown` candidates are rejected against concrete requirements.
    Strict,
    /// `Unknown` candidates are accepted against any requirement.
    Permissive,
}

/// Configuration governing name and type comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeCompatPolicy {
    pub alias_mode: AliasMode,
    /// Accept an `Int` candidate where a `Float` is required (never the
    /// reverse).
    pub numeric_tower: bool,
    /// Accept an optional candidate where a required field is demanded, and
    /// an `Optional(T)` candidate type where `T` is required.
    pub allow_optional_widening: bool,
    pub strictness: Strictness,
}

impl TypeCompatPolicy {
    /// The shared pragmatic default: alias-aware, numeric tower on,
    /// optional widening off, permissive towards unknown candidate types.
    pub const fn pragmatic() -> Self {
        Self {
            alias_mode: AliasMode::AliasAware,
            numeric_tower: true,
            allow_optional_widening: false,
            strictness: Strictness::Permissive,
        }
    }

    /// Strict variant: exact names, no numeric tower, unknowns rejected.
    pub const fn strict() -> Self {
        Self {
            alias_mode: AliasMode::Exact,
            numeric_tower: false,
            allow_optional_widening: false,
            strictness: Strictness::Strict,
        }
    }

    /// Does `candidate` satisfy a field declared as `declared` with the
    /// given alias set?
    ///
    /// Exact match is always accepted; alias-aware mode additionally
    /// accepts any name in the alias set; case-insensitive mode folds case
    /// before comparing either way.
    pub fn names_match(&self, declared: &str, aliases: &FieldAliasSet, candidate: &str) -> bool {
        match self.alias_mode {
            AliasMode::Exact => declared == candidate,
            AliasMode::AliasAware => declared == candidate || aliases.contains(candidate),
            AliasMode::CaseInsensitive => {
                declared.eq_ignore_ascii_case(candidate)
                    || aliases.iter().any(|a| a.eq_ignore_ascii_case(candidate))
            }
        }
    }

    /// Is a candidate type acceptable where `required` is demanded?
    pub fn types_compatible(&self, required: &TypeDesc, candidate: &TypeDesc) -> bool {
        if required == candidate {
            return true;
        }
        match (required, candidate) {
            // Unknown on the subject side is a policy decision; unknown on
            // the requirement side constrains nothing.
            (_, TypeDesc::Unknown) => self.strictness == Strictness::Permissive,
            (TypeDesc::Unknown, _) => true,
            (TypeDesc::Optional(r), TypeDesc::Optional(c)) => self.types_compatible(r, c),
            // An optional requirement accepts a non-optional candidate.
            (TypeDesc::Optional(r), c) => self.types_compatible(r, c),
            // The reverse direction narrows; only allowed when widening is on.
            (r, TypeDesc::Optional(c)) => {
                self.allow_optional_widening && self.types_compatible(r, c)
            }
            (TypeDesc::Union(arms), c) => arms.iter().any(|arm| self.types_compatible(arm, c)),
            (r, TypeDesc::Union(arms)) => arms.iter().all(|arm| self.types_compatible(r, arm)),
            (TypeDesc::Float, TypeDesc::Int) => self.numeric_tower,
            (TypeDesc::List(r), TypeDesc::List(c)) => self.types_compatible(r, c),
            (TypeDesc::Map(rk, rv), TypeDesc::Map(ck, cv)) => {
                self.types_compatible(rk, ck) && self.types_compatible(rv, cv)
            }
            _ => false,
        }
    }

    /// Partial specificity order between two type constraints.
    ///
    /// `Greater` means `a` is the narrower (more specific) constraint. Used
    /// by the trait algebra's narrowing rule; incomparable pairs return
    /// `None` and surface as `AmbiguousTraitMerge` there.
    pub fn specificity(&self, a: &TypeDesc, b: &TypeDesc) -> Option<Ordering> {
        if a == b {
            return Some(Ordering::Equal);
        }
        match (a, b) {
            (_, TypeDesc::Unknown) => Some(Ordering::Greater),
            (TypeDesc::Unknown, _) => Some(Ordering::Less),
            (TypeDesc::Int, TypeDesc::Float) if self.numeric_tower => Some(Ordering::Greater),
            (TypeDesc::Float, TypeDesc::Int) if self.numeric_tower => Some(Ordering::Less),
            (TypeDesc::Optional(inner), other) if inner.as_ref() == other => Some(Ordering::Less),
            (other, TypeDesc::Optional(inner)) if inner.as_ref() == other => {
                Some(Ordering::Greater)
            }
            (TypeDesc::Union(a_arms), TypeDesc::Union(b_arms)) => {
                let a_in_b = a_arms.iter().all(|arm| b_arms.contains(arm));
                let b_in_a = b_arms.iter().all(|arm| a_arms.contains(arm));
                match (a_in_b, b_in_a) {
                    (true, true) => Some(Ordering::Equal),
                    (true, false) => Some(Ordering::Greater),
                    (false, true) => Some(Ordering::Less),
                    (false, false) => None,
                }
            }
            (TypeDesc::Union(arms), other) if arms.contains(other) => Some(Ordering::Less),
            (other, TypeDesc::Union(arms)) if arms.contains(other) => Some(Ordering::Greater),
            _ => None,
        }
    }
}

impl Default for TypeCompatPolicy {
    fn default() -> Self {
        Self::pragmatic()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_name_always_matches() {
        let policy = TypeCompatPolicy::strict();
        assert!(policy.names_match("id", &FieldAliasSet::new(), "id"));
        assert!(!policy.names_match("id", &FieldAliasSet::new(), "ID"));
    }

    #[test]
    fn test_alias_aware_accepts_alias() {
        let policy = TypeCompatPolicy::pragmatic();
        let aliases = FieldAliasSet::from_iter(["identifier"]);
        assert!(policy.names_match("id", &aliases, "identifier"));
        assert!(!policy.names_match("id", &aliases, "ident"));
    }

    #[test]
    fn test_case_insensitive_folds_both_paths() {
        let policy = TypeCompatPolicy {
            alias_mode: AliasMode::CaseInsensitive,
            ..TypeCompatPolicy::pragmatic()
        };
        let aliases = FieldAliasSet::from_iter(["Identifier"]);
        assert!(policy.names_match("Id", &FieldAliasSet::new(), "id"));
        assert!(policy.names_match("id", &aliases, "IDENTIFIER"));
    }

    #[test]
    fn test_numeric_tower_is_one_directional() {
        let policy = TypeCompatPolicy::pragmatic();
        assert!(policy.types_compatible(&TypeDesc::Float, &TypeDesc::Int));
        assert!(!policy.types_compatible(&TypeDesc::Int, &TypeDesc::Float));
    }

    #[test]
    fn test_unknown_candidate_respects_strictness() {
        let pragmatic = TypeCompatPolicy::pragmatic();
        let strict = TypeCompatPolicy::strict();
        assert!(pragmatic.types_compatible(&TypeDesc::Int, &TypeDesc::Unknown));
        assert!(!strict.types_compatible(&TypeDesc::Int, &TypeDesc::Unknown));
    }

    #[test]
    fn test_union_requirement_accepts_any_arm() {
        let policy = TypeCompatPolicy::pragmatic();
        let required = TypeDesc::Union(vec![TypeDesc::Int, TypeDesc::Str]);
        assert!(policy.types_compatible(&required, &TypeDesc::Str));
        assert!(!policy.types_compatible(&required, &TypeDesc::Bool));
    }

    #[test]
    fn test_optional_candidate_needs_widening() {
        let mut policy = TypeCompatPolicy::pragmatic();
        let candidate = TypeDesc::Optional(Box::new(TypeDesc::Int));
        assert!(!policy.types_compatible(&TypeDesc::Int, &candidate));
        policy.allow_optional_widening = true;
        assert!(policy.types_compatible(&TypeDesc::Int, &candidate));
    }

    #[test]
    fn test_specificity_int_narrower_than_float() {
        let policy = TypeCompatPolicy::pragmatic();
        assert_eq!(
            policy.specificity(&TypeDesc::Int, &TypeDesc::Float),
            Some(Ordering::Greater)
        );
        assert_eq!(
            policy.specificity(&TypeDesc::Float, &TypeDesc::Int),
            Some(Ordering::Less)
        );
    }

    #[test]
    fn test_specificity_incomparable_pair() {
        let policy = TypeCompatPolicy::pragmatic();
        assert_eq!(policy.specificity(&TypeDesc::Str, &TypeDesc::Bool), None);
    }

    #[test]
    fn test_specificity_member_narrower_than_union() {
        let policy = TypeCompatPolicy::pragmatic();
        let union = TypeDesc::Union(vec![TypeDesc::Int, TypeDesc::Str]);
        assert_eq!(
            policy.specificity(&TypeDesc::Int, &union),
            Some(Ordering::Greater)
        );
    }
}
