//! Canonical field views.
//!
//! A [`FieldView`] is the normalizer's output unit: one field as seen on a
//! subject, with its resolved name, type descriptor, optionality, default,
//! provenance, and serialization aliases. Views are created fresh on every
//! normalization call (or returned from cache) and never mutated afterwards.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::typedesc::TypeDesc;

/// Where a field view came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldOrigin {
    /// Declared on a class-like definition.
    DeclaredOnClass,
    /// Obtained by normalizing an instance through its class.
    InferredFromInstance,
    /// Derived from a key/value mapping entry.
    DerivedFromMapping,
}

/// Set of acceptable alternate names for a field (serialization aliases).
///
/// Ordered so that equal sets compare and serialize deterministically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldAliasSet(BTreeSet<String>);

impl FieldAliasSet {
    pub fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// Build an alias set from any iterable of name-like values.
    pub fn from_iter<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(names.into_iter().map(Into::into).collect())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    pub fn insert(&mut self, name: impl Into<String>) {
        self.0.insert(name.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Union of two alias sets (used when merging traits).
    pub fn merged(&self, other: &FieldAliasSet) -> FieldAliasSet {
        Self(self.0.union(&other.0).cloned().collect())
    }
}

/// Canonical description of one field as seen on a subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldView {
    /// Canonical (resolved) field name; unique within one subject's mapping.
    pub name: String,
    /// Type descriptor; `Unknown` when no type information is available.
    pub ty: TypeDesc,
    /// True when the field has no default and is not optional.
    pub required: bool,
    /// Default value, when one is declared.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
    /// Provenance tag.
    pub origin: FieldOrigin,
    /// Acceptable alternate names.
    #[serde(skip_serializing_if = "FieldAliasSet::is_empty", default)]
    pub aliases: FieldAliasSet,
}

impl FieldView {
    /// Create a required field view with no default and no aliases.
    pub fn required(name: impl Into<String>, ty: TypeDesc, origin: FieldOrigin) -> Self {
        Self {
            name: name.into(),
            ty,
            required: true,
            default: None,
            origin,
            aliases: FieldAliasSet::new(),
        }
    }
}

/// Normalized field mapping for one subject: canonical name -> view.
///
/// A `BTreeMap` so iteration order (and therefore explanation output) is
/// deterministic, and so two normalizations of the same subject compare
/// value-equal.
pub type FieldMap = std::collections::BTreeMap<String, FieldView>;
