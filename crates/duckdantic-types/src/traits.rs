//! Declarative trait specs.
//!
//! A [`TraitSpec`] is an immutable structural contract: an ordered sequence
//! of field requirements and method requirements. Specs are constructed
//! once (typically at process start) and treated as read-only; the trait
//! algebra produces new specs rather than mutating inputs.

use serde::{Deserialize, Serialize};

use crate::fields::FieldAliasSet;
use crate::typedesc::TypeDesc;

/// One required (or optional) field in a trait.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    /// Required type constraint; `Unknown` constrains nothing.
    pub ty: TypeDesc,
    pub required: bool,
    #[serde(skip_serializing_if = "FieldAliasSet::is_empty", default)]
    pub aliases: FieldAliasSet,
}

impl FieldSpec {
    /// A required field with no aliases.
    pub fn required(name: impl Into<String>, ty: TypeDesc) -> Self {
        Self {
            name: name.into(),
            ty,
            required: true,
            aliases: FieldAliasSet::new(),
        }
    }

    /// An optional field with no aliases.
    pub fn optional(name: impl Into<String>, ty: TypeDesc) -> Self {
        Self {
            name: name.into(),
            ty,
            required: false,
            aliases: FieldAliasSet::new(),
        }
    }

    /// A required field with serialization aliases.
    pub fn with_aliases(name: impl Into<String>, ty: TypeDesc, aliases: FieldAliasSet) -> Self {
        Self {
            name: name.into(),
            ty,
            required: true,
            aliases,
        }
    }
}

/// One required callable in a trait.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodSpec {
    pub name: String,
    /// Required arity; `None` accepts any arity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arity: Option<usize>,
}

impl MethodSpec {
    /// A method requirement matched by name only.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arity: None,
        }
    }

    /// A method requirement with an exact arity.
    pub fn with_arity(name: impl Into<String>, arity: usize) -> Self {
        Self {
            name: name.into(),
            arity: Some(arity),
        }
    }
}

/// Declarative, immutable structural contract.
///
/// Field order is declaration order and drives the deterministic order of
/// mismatch records in explanations. Field names within one spec are
/// unique; [`TraitSpec::new`] debug-asserts this.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TraitSpec {
    /// Optional label; `auto_name` derives one when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub fields: Vec<FieldSpec>,
    #[serde(default)]
    pub methods: Vec<MethodSpec>,
}

impl TraitSpec {
    /// Build a labeled trait spec.
    pub fn new(
        name: impl Into<String>,
        fields: Vec<FieldSpec>,
        methods: Vec<MethodSpec>,
    ) -> Self {
        let spec = Self {
            name: Some(name.into()),
            fields,
            methods,
        };
        debug_assert!(spec.field_names_unique(), "duplicate field name in trait");
        spec
    }

    /// Build an unlabeled trait spec (algebra results use this).
    pub fn anonymous(fields: Vec<FieldSpec>, methods: Vec<MethodSpec>) -> Self {
        let spec = Self {
            name: None,
            fields,
            methods,
        };
        debug_assert!(spec.field_names_unique(), "duplicate field name in trait");
        spec
    }

    /// A trait with no requirements (satisfied by anything normalizable).
    pub fn empty() -> Self {
        Self {
            name: None,
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.methods.is_empty()
    }

    /// Look up a field spec by declared name.
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    fn field_names_unique(&self) -> bool {
        let mut seen = std::collections::HashSet::new();
        self.fields.iter().all(|f| seen.insert(f.name.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_lookup_by_name() {
        let spec = TraitSpec::new(
            "HasId",
            vec![FieldSpec::required("id", TypeDesc::Int)],
            vec![],
        );
        assert!(spec.field("id").is_some());
        assert!(spec.field("name").is_none());
    }

    #[test]
    fn test_empty_trait_has_no_requirements() {
        let spec = TraitSpec::empty();
        assert!(spec.is_empty());
        assert!(spec.name.is_none());
    }
}
