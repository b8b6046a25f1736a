//! Memoizing normalization cache.
//!
//! Keyed by (subject shape token, policy); each entry records the provider
//! registry version it was built against, so a provider registration
//! invalidates prior entries without any explicit flush. Unbounded by
//! design: keys are bounded by the number of distinct shapes and policies a
//! process actually uses.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use duckdantic_types::{DuckError, FieldMap, Subject, TypeCompatPolicy};

use crate::normalize::normalize_fields;
use crate::provider::ProviderRegistry;
use crate::shapes::shape_id_token;

#[derive(Clone)]
struct CacheEntry {
    fields: Arc<FieldMap>,
    provider_version: u64,
}

/// Cache statistics snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub size: usize,
}

/// Memoizing wrapper around [`normalize_fields`].
///
/// Never changes the answer, only the cost: `normalize_cached(s, p)` equals
/// `normalize_fields(s)` for every subject and policy. Subjects without a
/// shape token (none exist today — every provider-accepted subject has
/// one) would bypass the store entirely.
#[derive(Default)]
pub struct NormalizeCache {
    store: RwLock<HashMap<(String, TypeCompatPolicy), CacheEntry>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl NormalizeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize through the cache.
    ///
    /// A stored entry is a hit only when its provider version matches the
    /// registry's current version; stale entries are re-normalized and
    /// overwritten. Cache lookups never fail on their own — a miss simply
    /// triggers normalization, whose errors propagate.
    pub fn normalize_cached(
        &self,
        registry: &ProviderRegistry,
        subject: &Subject,
        policy: &TypeCompatPolicy,
    ) -> Result<Arc<FieldMap>, DuckError> {
        let Some(token) = shape_id_token(subject) else {
            // No shape identity: normalize uncached (this still surfaces
            // UnsupportedSubject for scalars). Only a completed
            // normalization counts as a miss.
            let fields = normalize_fields(registry, subject).map(Arc::new)?;
            self.misses.fetch_add(1, Ordering::Relaxed);
            return Ok(fields);
        };
        let key = (token, *policy);
        let current_version = registry.version();

        if let Some(entry) = self.store.read().get(&key) {
            if entry.provider_version == current_version {
                self.hits.fetch_add(1, Ordering::Relaxed);
                tracing::trace!(token = %key.0, "normalize cache hit");
                return Ok(entry.fields.clone());
            }
        }

        let fields = Arc::new(normalize_fields(registry, subject)?);
        self.misses.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(token = %key.0, "normalize cache miss");
        self.store.write().insert(
            key,
            CacheEntry {
                fields: fields.clone(),
                provider_version: current_version,
            },
        );
        Ok(fields)
    }

    /// Wholesale invalidation; never partial.
    pub fn clear(&self) {
        self.store.write().clear();
        tracing::debug!("normalize cache cleared");
    }

    /// Hit/miss/size snapshot.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            size: self.store.read().len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ClassProvider;
    use duckdantic_types::{ClassDef, TypeDesc};
    use serde_json::json;

    #[test]
    fn test_cache_never_changes_the_answer() {
        let registry = ProviderRegistry::builtin();
        let cache = NormalizeCache::new();
        let policy = TypeCompatPolicy::pragmatic();
        let subject = Subject::from_json(json!({"id": 1, "name": "a"}));

        let direct = normalize_fields(&registry, &subject).unwrap();
        let cached = cache.normalize_cached(&registry, &subject, &policy).unwrap();
        assert_eq!(&direct, cached.as_ref());
    }

    #[test]
    fn test_second_lookup_is_a_hit() {
        let registry = ProviderRegistry::builtin();
        let cache = NormalizeCache::new();
        let policy = TypeCompatPolicy::pragmatic();
        let class = ClassDef::builder("User").field("id", TypeDesc::Int).build();
        let subject = Subject::Class(class);

        cache.normalize_cached(&registry, &subject, &policy).unwrap();
        cache.normalize_cached(&registry, &subject, &policy).unwrap();
        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.size, 1);
    }

    #[test]
    fn test_provider_registration_invalidates_entries() {
        let registry = ProviderRegistry::builtin();
        let cache = NormalizeCache::new();
        let policy = TypeCompatPolicy::pragmatic();
        let class = ClassDef::builder("User").field("id", TypeDesc::Int).build();
        let subject = Subject::Class(class);

        cache.normalize_cached(&registry, &subject, &policy).unwrap();
        registry.register(std::sync::Arc::new(ClassProvider));
        cache.normalize_cached(&registry, &subject, &policy).unwrap();
        let stats = cache.stats();
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 2);
    }

    #[test]
    fn test_distinct_policies_are_distinct_keys() {
        let registry = ProviderRegistry::builtin();
        let cache = NormalizeCache::new();
        let subject = Subject::from_json(json!({"id": 1}));

        cache
            .normalize_cached(&registry, &subject, &TypeCompatPolicy::pragmatic())
            .unwrap();
        cache
            .normalize_cached(&registry, &subject, &TypeCompatPolicy::strict())
            .unwrap();
        assert_eq!(cache.stats().size, 2);
    }

    #[test]
    fn test_clear_empties_the_store() {
        let registry = ProviderRegistry::builtin();
        let cache = NormalizeCache::new();
        let subject = Subject::from_json(json!({"id": 1}));
        cache
            .normalize_cached(&registry, &subject, &TypeCompatPolicy::pragmatic())
            .unwrap();
        cache.clear();
        assert_eq!(cache.stats().size, 0);
    }

    #[test]
    fn test_scalar_miss_propagates_error() {
        let registry = ProviderRegistry::builtin();
        let cache = NormalizeCache::new();
        let err = cache
            .normalize_cached(
                &registry,
                &Subject::from_json(json!("s")),
                &TypeCompatPolicy::pragmatic(),
            )
            .unwrap_err();
        assert!(matches!(err, DuckError::UnsupportedSubject { .. }));
    }

    #[test]
    fn test_failed_normalization_does_not_count_as_miss() {
        let registry = ProviderRegistry::builtin();
        let cache = NormalizeCache::new();
        let policy = TypeCompatPolicy::pragmatic();

        // Scalar path: no shape token, normalization fails.
        let _ = cache.normalize_cached(&registry, &Subject::from_json(json!("s")), &policy);
        // Keyed path: empty registry rejects a well-shaped subject.
        let bare = ProviderRegistry::empty();
        let _ = cache.normalize_cached(&bare, &Subject::from_json(json!({"id": 1})), &policy);

        let stats = cache.stats();
        assert_eq!(stats.misses, 0);
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.size, 0);
    }
}
