//! Named trait catalog.
//!
//! A simple name -> trait spec store, mutable only through explicit
//! register/unregister calls. Never implicitly populated.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use duckdantic_types::{DuckError, TraitSpec};

/// Named catalog of trait specs.
#[derive(Default)]
pub struct TraitRegistry {
    catalog: RwLock<HashMap<String, Arc<TraitSpec>>>,
}

impl TraitRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a trait under a name.
    ///
    /// # Errors
    ///
    /// [`DuckError::DuplicateRegistration`] when the name is taken; use
    /// [`TraitRegistry::register_with`] with `replace = true` to overwrite.
    pub fn register(&self, name: impl Into<String>, spec: Arc<TraitSpec>) -> Result<(), DuckError> {
        self.register_with(name, spec, false)
    }

    /// Register a trait, optionally replacing an existing registration.
    pub fn register_with(
        &self,
        name: impl Into<String>,
        spec: Arc<TraitSpec>,
        replace: bool,
    ) -> Result<(), DuckError> {
        let name = name.into();
        let mut catalog = self.catalog.write();
        if !replace && catalog.contains_key(&name) {
            return Err(DuckError::DuplicateRegistration { name });
        }
        tracing::debug!(name = %name, replace, "registering trait");
        catalog.insert(name, spec);
        Ok(())
    }

    /// Look up a trait by name.
    pub fn get(&self, name: &str) -> Option<Arc<TraitSpec>> {
        self.catalog.read().get(name).cloned()
    }

    /// Remove a registration; returns the spec if one was present.
    pub fn unregister(&self, name: &str) -> Option<Arc<TraitSpec>> {
        let removed = self.catalog.write().remove(name);
        if removed.is_some() {
            tracing::debug!(name = %name, "unregistered trait");
        }
        removed
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.catalog.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.catalog.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalog.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use duckdantic_types::{FieldSpec, TypeDesc};

    fn has_id() -> Arc<TraitSpec> {
        Arc::new(TraitSpec::new(
            "HasId",
            vec![FieldSpec::required("id", TypeDesc::Int)],
            vec![],
        ))
    }

    #[test]
    fn test_register_and_get() {
        let registry = TraitRegistry::new();
        registry.register("HasId", has_id()).unwrap();
        assert!(registry.get("HasId").is_some());
        assert!(registry.get("Other").is_none());
    }

    #[test]
    fn test_duplicate_registration_fails_fast() {
        let registry = TraitRegistry::new();
        registry.register("HasId", has_id()).unwrap();
        let err = registry.register("HasId", has_id()).unwrap_err();
        assert_eq!(
            err,
            DuckError::DuplicateRegistration {
                name: "HasId".to_string()
            }
        );
    }

    #[test]
    fn test_replace_flag_overwrites() {
        let registry = TraitRegistry::new();
        registry.register("HasId", has_id()).unwrap();
        let other = Arc::new(TraitSpec::empty());
        registry.register_with("HasId", other.clone(), true).unwrap();
        assert!(registry.get("HasId").unwrap().is_empty());
    }

    #[test]
    fn test_unregister_returns_spec() {
        let registry = TraitRegistry::new();
        registry.register("HasId", has_id()).unwrap();
        assert!(registry.unregister("HasId").is_some());
        assert!(registry.unregister("HasId").is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_names_are_sorted() {
        let registry = TraitRegistry::new();
        registry.register("B", has_id()).unwrap();
        registry.register("A", has_id()).unwrap();
        assert_eq!(registry.names(), vec!["A".to_string(), "B".to_string()]);
    }
}
