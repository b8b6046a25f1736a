//! Dynamic-interface adapter.
//!
//! A [`DuckInterface`] wraps a (trait, policy) pair as a named predicate
//! object for callers that want conventional instance/subclass semantics.
//! Its membership test is the one boundary in the workspace that never
//! fails: internal errors (unsupported subjects included) are downgraded to
//! `false` instead of propagating, because instance checks are expected to
//! return a boolean.

use std::sync::Arc;

use sha2::{Digest, Sha256};

use duckdantic_types::{auto_name, ClassDef, Subject, TraitSpec, TypeCompatPolicy};
use duckdantic_normalize::{NormalizeCache, ProviderRegistry};

use crate::matching::explain_fields;

/// Stable fingerprint of a trait spec, used as the interface-cache key
/// component for "trait identity".
pub fn trait_fingerprint(spec: &TraitSpec) -> String {
    // Serialization of the spec is canonical: field order is declaration
    // order and alias sets are sorted.
    let payload = serde_json::to_string(spec).unwrap_or_default();
    let mut hasher = Sha256::new();
    hasher.update(payload.as_bytes());
    format!("trait:{}", &hex::encode(hasher.finalize())[..16])
}

/// An opaque interface object whose membership test delegates to the
/// matcher.
pub struct DuckInterface {
    name: String,
    spec: Arc<TraitSpec>,
    policy: TypeCompatPolicy,
    providers: Arc<ProviderRegistry>,
    cache: Arc<NormalizeCache>,
}

impl DuckInterface {
    /// Build an interface bound to a provider registry and normalize cache.
    pub fn new(
        spec: Arc<TraitSpec>,
        policy: TypeCompatPolicy,
        providers: Arc<ProviderRegistry>,
        cache: Arc<NormalizeCache>,
    ) -> Self {
        let name = auto_name(&spec);
        Self {
            name,
            spec,
            policy,
            providers,
            cache,
        }
    }

    /// Display name (the trait's label, or a derived one).
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn spec(&self) -> &Arc<TraitSpec> {
        &self.spec
    }

    pub fn policy(&self) -> &TypeCompatPolicy {
        &self.policy
    }

    /// Instance-style membership test. Never fails: any internal error is
    /// `false`.
    pub fn is_instance(&self, subject: &Subject) -> bool {
        match self
            .cache
            .normalize_cached(&self.providers, subject, &self.policy)
        {
            Ok(fields) => explain_fields(&fields, subject, &self.spec, &self.policy).satisfied,
            Err(err) => {
                tracing::debug!(interface = %self.name, %err, "membership check degraded to false");
                false
            }
        }
    }

    /// Subclass-style check: does the class declaration itself satisfy the
    /// trait?
    pub fn admits_class(&self, class: &Arc<ClassDef>) -> bool {
        self.is_instance(&Subject::Class(class.clone()))
    }
}

impl std::fmt::Debug for DuckInterface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DuckInterface")
            .field("name", &self.name)
            .field("policy", &self.policy)
            .finish()
    }
}
