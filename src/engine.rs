//! The explicitly constructed service instance.
//!
//! All mutable state — the provider list, the normalize cache, the trait
//! catalog, and the interface cache — lives on a [`DuckEngine`] owned by
//! the caller. There is no process-wide ambient state: create an engine at
//! service start, share it (it is `Send + Sync`), and clear its cache
//! explicitly when needed.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use duckdantic_match::{explain_fields, trait_fingerprint, DuckInterface, Explanation, TraitRegistry};
use duckdantic_normalize::{
    normalize_fields, CacheStats, FieldProvider, NormalizeCache, ProviderRegistry,
};
use duckdantic_types::{DuckError, FieldMap, Subject, TraitSpec, TypeCompatPolicy};

/// Structural-typing service: providers, cache, trait catalog, and
/// interface construction in one explicitly owned object.
pub struct DuckEngine {
    providers: Arc<ProviderRegistry>,
    cache: Arc<NormalizeCache>,
    traits: TraitRegistry,
    interfaces: RwLock<HashMap<(String, TypeCompatPolicy), Arc<DuckInterface>>>,
}

impl DuckEngine {
    /// Engine with the built-in providers (mapping, class, instance).
    pub fn new() -> Self {
        Self {
            providers: Arc::new(ProviderRegistry::builtin()),
            cache: Arc::new(NormalizeCache::new()),
            traits: TraitRegistry::new(),
            interfaces: RwLock::new(HashMap::new()),
        }
    }

    /// Engine over a caller-supplied provider registry.
    pub fn with_providers(providers: Arc<ProviderRegistry>) -> Self {
        Self {
            providers,
            cache: Arc::new(NormalizeCache::new()),
            traits: TraitRegistry::new(),
            interfaces: RwLock::new(HashMap::new()),
        }
    }

    pub fn providers(&self) -> &Arc<ProviderRegistry> {
        &self.providers
    }

    /// Append a provider to the registry (consulted after the built-ins).
    pub fn register_provider(&self, provider: Arc<dyn FieldProvider>) {
        self.providers.register(provider);
    }

    /// Normalize a subject, bypassing the cache.
    pub fn normalize(&self, subject: &Subject) -> Result<FieldMap, DuckError> {
        normalize_fields(&self.providers, subject)
    }

    /// Normalize a subject through the cache.
    pub fn normalize_cached(
        &self,
        subject: &Subject,
        policy: &TypeCompatPolicy,
    ) -> Result<Arc<FieldMap>, DuckError> {
        self.cache.normalize_cached(&self.providers, subject, policy)
    }

    /// Does the subject satisfy the trait? Normalization goes through the
    /// cache; errors propagate.
    pub fn satisfies(
        &self,
        subject: &Subject,
        spec: &TraitSpec,
        policy: &TypeCompatPolicy,
    ) -> Result<bool, DuckError> {
        Ok(self.explain(subject, spec, policy)?.satisfied)
    }

    /// Full matching explanation (cache-backed normalization).
    pub fn explain(
        &self,
        subject: &Subject,
        spec: &TraitSpec,
        policy: &TypeCompatPolicy,
    ) -> Result<Explanation, DuckError> {
        let fields = self.normalize_cached(subject, policy)?;
        Ok(explain_fields(&fields, subject, spec, policy))
    }

    /// Register a trait in the engine's catalog.
    pub fn register_trait(
        &self,
        name: impl Into<String>,
        spec: Arc<TraitSpec>,
    ) -> Result<(), DuckError> {
        self.traits.register(name, spec)
    }

    /// Register a trait, replacing any existing registration.
    pub fn register_trait_replacing(&self, name: impl Into<String>, spec: Arc<TraitSpec>) {
        // Infallible with replace = true.
        let _ = self.traits.register_with(name, spec, true);
    }

    /// Look up a registered trait by name.
    pub fn trait_named(&self, name: &str) -> Option<Arc<TraitSpec>> {
        self.traits.get(name)
    }

    /// Remove a trait registration.
    pub fn unregister_trait(&self, name: &str) -> Option<Arc<TraitSpec>> {
        self.traits.unregister(name)
    }

    /// Names of all registered traits, sorted.
    pub fn trait_names(&self) -> Vec<String> {
        self.traits.names()
    }

    /// Interface object for a (trait, policy) pair.
    ///
    /// Construction is cached by trait identity and policy: repeated
    /// requests return the same `Arc`, so callers may key their own lookup
    /// tables on interface identity.
    pub fn interface_for(
        &self,
        spec: &Arc<TraitSpec>,
        policy: &TypeCompatPolicy,
    ) -> Arc<DuckInterface> {
        let key = (trait_fingerprint(spec), *policy);
        if let Some(existing) = self.interfaces.read().get(&key) {
            return existing.clone();
        }
        let mut interfaces = self.interfaces.write();
        interfaces
            .entry(key)
            .or_insert_with(|| {
                tracing::debug!(trait_name = %duckdantic_types::auto_name(spec), "constructing interface");
                Arc::new(DuckInterface::new(
                    spec.clone(),
                    *policy,
                    self.providers.clone(),
                    self.cache.clone(),
                ))
            })
            .clone()
    }

    /// Wholesale cache invalidation (test isolation, provider changes).
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Normalization cache statistics.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

impl Default for DuckEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use duckdantic_types::{FieldSpec, TypeDesc};
    use serde_json::json;

    #[test]
    fn test_engine_interface_identity_is_cached() {
        let engine = DuckEngine::new();
        let spec = Arc::new(TraitSpec::new(
            "HasId",
            vec![FieldSpec::required("id", TypeDesc::Int)],
            vec![],
        ));
        let policy = TypeCompatPolicy::pragmatic();
        let first = engine.interface_for(&spec, &policy);
        let second = engine.interface_for(&spec, &policy);
        assert!(Arc::ptr_eq(&first, &second));

        let strict = TypeCompatPolicy::strict();
        let third = engine.interface_for(&spec, &strict);
        assert!(!Arc::ptr_eq(&first, &third));
    }

    #[test]
    fn test_engine_satisfies_through_cache() {
        let engine = DuckEngine::new();
        let spec = TraitSpec::new(
            "HasId",
            vec![FieldSpec::required("id", TypeDesc::Unknown)],
            vec![],
        );
        let policy = TypeCompatPolicy::pragmatic();
        let subject = Subject::from_json(json!({"id": 1}));
        assert!(engine.satisfies(&subject, &spec, &policy).unwrap());
        assert!(engine.satisfies(&subject, &spec, &policy).unwrap());
        assert_eq!(engine.cache_stats().hits, 1);
    }
}
