//! Engine, cache, registry, and adapter behavior.

use std::sync::Arc;

use anyhow::Result;
use serde_json::json;

use duckdantic::{
    ClassDef, DuckEngine, DuckError, FieldMap, FieldOrigin, FieldProvider, FieldSpec, FieldView,
    Subject, TraitSpec, TypeCompatPolicy, TypeDesc,
};

fn has_id() -> Arc<TraitSpec> {
    Arc::new(TraitSpec::new(
        "HasId",
        vec![FieldSpec::required("id", TypeDesc::Unknown)],
        vec![],
    ))
}

#[test]
fn cached_normalization_matches_direct_normalization() -> Result<()> {
    let engine = DuckEngine::new();
    let policy = TypeCompatPolicy::pragmatic();
    let subject = Subject::from_json(json!({"id": 1, "name": "a"}));

    let direct = engine.normalize(&subject)?;
    let cached = engine.normalize_cached(&subject, &policy)?;
    assert_eq!(&direct, cached.as_ref());
    Ok(())
}

#[test]
fn repeated_checks_hit_the_cache() -> Result<()> {
    let engine = DuckEngine::new();
    let policy = TypeCompatPolicy::pragmatic();
    let class = ClassDef::builder("User").field("id", TypeDesc::Int).build();
    let subject = Subject::Class(class);

    for _ in 0..3 {
        engine.satisfies(&subject, &has_id(), &policy)?;
    }
    let stats = engine.cache_stats();
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hits, 2);
    assert_eq!(stats.size, 1);
    Ok(())
}

#[test]
fn clear_cache_resets_the_store() -> Result<()> {
    let engine = DuckEngine::new();
    let policy = TypeCompatPolicy::pragmatic();
    let subject = Subject::from_json(json!({"id": 1}));

    engine.normalize_cached(&subject, &policy)?;
    assert_eq!(engine.cache_stats().size, 1);
    engine.clear_cache();
    assert_eq!(engine.cache_stats().size, 0);
    Ok(())
}

/// Provider that claims every mapping and reports a single marker field.
struct MarkerProvider;

impl FieldProvider for MarkerProvider {
    fn name(&self) -> &'static str {
        "marker"
    }

    fn accepts(&self, subject: &Subject) -> bool {
        matches!(subject, Subject::Mapping(_))
    }

    fn fields(&self, _subject: &Subject) -> FieldMap {
        let mut out = FieldMap::new();
        out.insert(
            "marker".to_string(),
            FieldView::required("marker", TypeDesc::Bool, FieldOrigin::DerivedFromMapping),
        );
        out
    }
}

#[test]
fn provider_registration_order_is_observable() -> Result<()> {
    let engine = DuckEngine::new();
    let subject = Subject::from_json(json!({"id": 1}));

    // The built-in mapping provider registered first keeps winning even
    // after a competing provider is added.
    engine.register_provider(Arc::new(MarkerProvider));
    let fields = engine.normalize(&subject)?;
    assert!(fields.contains_key("id"));
    assert!(!fields.contains_key("marker"));
    Ok(())
}

#[test]
fn provider_registration_invalidates_cached_entries() -> Result<()> {
    let engine = DuckEngine::new();
    let policy = TypeCompatPolicy::pragmatic();
    let subject = Subject::from_json(json!({"id": 1}));

    engine.normalize_cached(&subject, &policy)?;
    engine.register_provider(Arc::new(MarkerProvider));
    engine.normalize_cached(&subject, &policy)?;

    let stats = engine.cache_stats();
    assert_eq!(stats.hits, 0);
    assert_eq!(stats.misses, 2);
    Ok(())
}

#[test]
fn trait_catalog_round_trip() -> Result<()> {
    let engine = DuckEngine::new();
    engine.register_trait("HasId", has_id())?;

    assert!(engine.trait_named("HasId").is_some());
    assert_eq!(engine.trait_names(), vec!["HasId".to_string()]);

    let err = engine.register_trait("HasId", has_id()).unwrap_err();
    assert!(matches!(err, DuckError::DuplicateRegistration { .. }));

    engine.register_trait_replacing("HasId", Arc::new(TraitSpec::empty()));
    assert!(engine.trait_named("HasId").unwrap().is_empty());

    assert!(engine.unregister_trait("HasId").is_some());
    assert!(engine.trait_named("HasId").is_none());
    Ok(())
}

#[test]
fn interface_identity_is_stable_per_trait_and_policy() {
    let engine = DuckEngine::new();
    let spec = has_id();
    let policy = TypeCompatPolicy::pragmatic();

    let a = engine.interface_for(&spec, &policy);
    let b = engine.interface_for(&spec, &policy);
    assert!(Arc::ptr_eq(&a, &b));

    let c = engine.interface_for(&spec, &TypeCompatPolicy::strict());
    assert!(!Arc::ptr_eq(&a, &c));
}

#[test]
fn interface_membership_never_fails() {
    let engine = DuckEngine::new();
    let iface = engine.interface_for(&has_id(), &TypeCompatPolicy::pragmatic());

    assert!(iface.is_instance(&Subject::from_json(json!({"id": 1}))));
    assert!(!iface.is_instance(&Subject::from_json(json!({"name": "a"}))));
    // Scalars make normalization fail; the adapter downgrades that to false.
    assert!(!iface.is_instance(&Subject::from_json(json!("opaque"))));
    assert!(!iface.is_instance(&Subject::from_json(json!(42))));
}

#[test]
fn interface_admits_class_checks_declarations() {
    let engine = DuckEngine::new();
    let spec = Arc::new(TraitSpec::new(
        "HasIntId",
        vec![FieldSpec::required("id", TypeDesc::Int)],
        vec![],
    ));
    let iface = engine.interface_for(&spec, &TypeCompatPolicy::pragmatic());

    let good = ClassDef::builder("User").field("id", TypeDesc::Int).build();
    let bad = ClassDef::builder("Tag").field("label", TypeDesc::Str).build();
    assert!(iface.admits_class(&good));
    assert!(!iface.admits_class(&bad));
}

#[test]
fn engine_errors_propagate_outside_the_adapter() {
    let engine = DuckEngine::new();
    let policy = TypeCompatPolicy::pragmatic();
    let err = engine
        .satisfies(&Subject::from_json(json!("opaque")), &has_id(), &policy)
        .unwrap_err();
    assert!(matches!(err, DuckError::UnsupportedSubject { .. }));
}
