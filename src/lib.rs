//! Duckdantic — a structural-typing engine.
//!
//! Given an arbitrary subject (a class-like definition, an instance, or a
//! key/value mapping), duckdantic decides whether the subject's visible
//! fields satisfy a declared structural contract (a *trait*) under a
//! configurable notion of type compatibility — duck-typing checks without
//! nominal inheritance.
//!
//! The pipeline:
//! 1. **Normalization** — providers turn heterogeneous subjects into a
//!    canonical field mapping ([`normalize_fields`], [`ProviderRegistry`]).
//! 2. **Trait specs** — declarative, immutable contracts ([`TraitSpec`]).
//! 3. **Policy** — how leniently names and types compare
//!    ([`TypeCompatPolicy`]).
//! 4. **Matching** — satisfaction plus structured explanations
//!    ([`satisfies`], [`explain`]).
//!
//! Around the core: trait algebra ([`union`], [`intersect`], [`minus`]),
//! the memoizing [`NormalizeCache`], the named [`TraitRegistry`], and the
//! [`DuckInterface`] adapter for conventional instance-check semantics.
//! [`DuckEngine`] bundles all of it behind one explicitly owned service
//! object.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use duckdantic::{
//!     DuckEngine, FieldSpec, Subject, TraitSpec, TypeCompatPolicy, TypeDesc,
//! };
//!
//! let engine = DuckEngine::new();
//! let has_id = TraitSpec::new(
//!     "HasId",
//!     vec![FieldSpec::required("id", TypeDesc::Unknown)],
//!     vec![],
//! );
//! let policy = TypeCompatPolicy::pragmatic();
//!
//! let subject = Subject::from_json(serde_json::json!({"id": 1, "name": "a"}));
//! assert!(engine.satisfies(&subject, &has_id, &policy).unwrap());
//!
//! let iface = engine.interface_for(&Arc::new(has_id), &policy);
//! assert!(iface.is_instance(&subject));
//! ```

pub mod engine;

pub use engine::DuckEngine;

// Re-export the workspace surface at the crate root
pub use duckdantic_match::{
    compare_traits, explain, explain_fields, intersect, methods_explain, methods_satisfy, minus,
    satisfies, trait_fingerprint, union, DuckInterface, Explanation, Mismatch, TraitRegistry,
    TraitRelation,
};
pub use duckdantic_normalize::{
    normalize_fields, shape_id_token, CacheStats, ClassProvider, FieldProvider, InstanceProvider,
    MappingProvider, NormalizeCache, ProviderRegistry, ShapeOrigin,
};
pub use duckdantic_types::{
    auto_name, short_type_token, AliasMode, ClassDef, ClassDefBuilder, DuckError, FieldAliasSet,
    FieldDecl, FieldMap, FieldOrigin, FieldSpec, FieldView, MethodDecl, MethodSpec, Strictness,
    Subject, TraitSpec, TypeCompatPolicy, TypeDesc,
};
