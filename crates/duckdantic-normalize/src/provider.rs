//! Field providers.
//!
//! A provider knows how to turn one category of subject into field views.
//! Providers are consulted in registration order with a linear scan; the
//! first provider whose `accepts` returns true wins, and that order is part
//! of the observable contract (tests may rely on it).

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use duckdantic_types::{
    ClassDef, FieldMap, FieldOrigin, FieldView, Subject, TypeDesc,
};

/// Trait for field providers.
pub trait FieldProvider: Send + Sync {
    /// Short name, used in `UnsupportedSubject` messages and logging.
    fn name(&self) -> &'static str;

    /// Side-effect-free predicate: can this provider handle the subject?
    fn accepts(&self, subject: &Subject) -> bool;

    /// Produce a fresh field mapping for the subject.
    ///
    /// Must not fail for any subject for which `accepts` returned true.
    fn fields(&self, subject: &Subject) -> FieldMap;
}

/// Provider for key/value mapping subjects.
///
/// Every entry becomes a required field with `origin = DerivedFromMapping`.
/// Mappings carry no optionality metadata, so `required` is always true;
/// the field type is `Unknown` unless value-type inference is enabled.
#[derive(Debug, Default)]
pub struct MappingProvider {
    infer_value_types: bool,
}

impl MappingProvider {
    pub fn new() -> Self {
        Self {
            infer_value_types: false,
        }
    }

    /// Infer field types from the runtime JSON values instead of reporting
    /// `Unknown`.
    pub fn with_type_inference() -> Self {
        Self {
            infer_value_types: true,
        }
    }
}

impl FieldProvider for MappingProvider {
    fn name(&self) -> &'static str {
        "mapping"
    }

    fn accepts(&self, subject: &Subject) -> bool {
        matches!(subject, Subject::Mapping(_))
    }

    fn fields(&self, subject: &Subject) -> FieldMap {
        let mut out = FieldMap::new();
        if let Subject::Mapping(map) = subject {
            for (key, value) in map {
                let ty = if self.infer_value_types {
                    TypeDesc::of_value(value)
                } else {
                    TypeDesc::Unknown
                };
                out.insert(
                    key.clone(),
                    FieldView::required(key.clone(), ty, FieldOrigin::DerivedFromMapping),
                );
            }
        }
        out
    }
}

fn class_fields(class: &ClassDef, origin: FieldOrigin) -> FieldMap {
    let mut out = FieldMap::new();
    for decl in &class.fields {
        out.insert(
            decl.name.clone(),
            FieldView {
                name: decl.name.clone(),
                ty: decl.ty.clone(),
                required: decl.required,
                default: decl.default.clone(),
                origin,
                aliases: decl.aliases.clone(),
            },
        );
    }
    out
}

/// Provider for class-like definitions: normalizes the declared field
/// metadata, not any per-instance data.
#[derive(Debug, Default)]
pub struct ClassProvider;

impl FieldProvider for ClassProvider {
    fn name(&self) -> &'static str {
        "class"
    }

    fn accepts(&self, subject: &Subject) -> bool {
        matches!(subject, Subject::Class(_))
    }

    fn fields(&self, subject: &Subject) -> FieldMap {
        match subject {
            Subject::Class(class) => class_fields(class, FieldOrigin::DeclaredOnClass),
            _ => FieldMap::new(),
        }
    }
}

/// Provider for instances: normalizes the instance *by its class*, never by
/// a snapshot of instance state. The contract describes declared shape, not
/// momentary values.
#[derive(Debug, Default)]
pub struct InstanceProvider;

impl FieldProvider for InstanceProvider {
    fn name(&self) -> &'static str {
        "instance"
    }

    fn accepts(&self, subject: &Subject) -> bool {
        matches!(subject, Subject::Instance { .. })
    }

    fn fields(&self, subject: &Subject) -> FieldMap {
        match subject {
            Subject::Instance { class, .. } => {
                class_fields(class, FieldOrigin::InferredFromInstance)
            }
            _ => FieldMap::new(),
        }
    }
}

/// Ordered provider list with a monotonically increasing version stamp.
///
/// The version is bumped on every registration so cache entries recorded
/// against an older provider set can be detected as stale.
pub struct ProviderRegistry {
    providers: RwLock<Vec<Arc<dyn FieldProvider>>>,
    version: AtomicU64,
}

impl ProviderRegistry {
    /// Empty registry (tests and exotic hosts only).
    pub fn empty() -> Self {
        Self {
            providers: RwLock::new(Vec::new()),
            version: AtomicU64::new(1),
        }
    }

    /// Registry with the built-in providers, in the standard order:
    /// mapping, class, instance.
    pub fn builtin() -> Self {
        let registry = Self::empty();
        registry.register(Arc::new(MappingProvider::new()));
        registry.register(Arc::new(ClassProvider));
        registry.register(Arc::new(InstanceProvider));
        registry
    }

    /// Append a provider; later-registered providers are consulted after
    /// earlier ones.
    pub fn register(&self, provider: Arc<dyn FieldProvider>) {
        tracing::debug!(provider = provider.name(), "registering field provider");
        self.providers.write().push(provider);
        self.version.fetch_add(1, Ordering::SeqCst);
    }

    /// Prepend a provider so it wins the scan over everything registered so
    /// far (e.g. an inference-enabled mapping provider overriding the
    /// built-in one).
    pub fn register_front(&self, provider: Arc<dyn FieldProvider>) {
        tracing::debug!(provider = provider.name(), "registering field provider at front");
        self.providers.write().insert(0, provider);
        self.version.fetch_add(1, Ordering::SeqCst);
    }

    /// Current version stamp of the provider set.
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::SeqCst)
    }

    /// First registered provider accepting the subject, if any.
    pub fn provider_for(&self, subject: &Subject) -> Option<Arc<dyn FieldProvider>> {
        self.providers
            .read()
            .iter()
            .find(|p| p.accepts(subject))
            .cloned()
    }

    /// Names of all registered providers, in registration order.
    pub fn provider_names(&self) -> Vec<String> {
        self.providers
            .read()
            .iter()
            .map(|p| p.name().to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mapping_provider_defaults_to_unknown_types() {
        let provider = MappingProvider::new();
        let subject = Subject::from_json(json!({"id": 1, "name": "a"}));
        assert!(provider.accepts(&subject));
        let fields = provider.fields(&subject);
        assert_eq!(fields.len(), 2);
        assert_eq!(fields["id"].ty, TypeDesc::Unknown);
        assert!(fields["id"].required);
        assert_eq!(fields["id"].origin, FieldOrigin::DerivedFromMapping);
    }

    #[test]
    fn test_mapping_provider_inference_opt_in() {
        let provider = MappingProvider::with_type_inference();
        let subject = Subject::from_json(json!({"id": 1, "name": "a"}));
        let fields = provider.fields(&subject);
        assert_eq!(fields["id"].ty, TypeDesc::Int);
        assert_eq!(fields["name"].ty, TypeDesc::Str);
    }

    #[test]
    fn test_registration_order_decides() {
        // Two providers accepting the same subject: the first registered wins.
        let registry = ProviderRegistry::empty();
        registry.register(Arc::new(MappingProvider::new()));
        registry.register(Arc::new(MappingProvider::with_type_inference()));
        let subject = Subject::from_json(json!({"id": 1}));
        let provider = registry.provider_for(&subject).unwrap();
        let fields = provider.fields(&subject);
        assert_eq!(fields["id"].ty, TypeDesc::Unknown);
    }

    #[test]
    fn test_register_front_wins_the_scan() {
        let registry = ProviderRegistry::builtin();
        let subject = Subject::from_json(json!({"id": 1}));
        registry.register_front(Arc::new(MappingProvider::with_type_inference()));
        let provider = registry.provider_for(&subject).unwrap();
        let fields = provider.fields(&subject);
        assert_eq!(fields["id"].ty, TypeDesc::Int);
        assert_eq!(registry.provider_names()[0], "mapping");
    }

    #[test]
    fn test_version_bumps_on_register() {
        let registry = ProviderRegistry::empty();
        let before = registry.version();
        registry.register(Arc::new(ClassProvider));
        assert!(registry.version() > before);
    }

    #[test]
    fn test_no_provider_accepts_scalar() {
        let registry = ProviderRegistry::builtin();
        let subject = Subject::from_json(json!("opaque"));
        assert!(registry.provider_for(&subject).is_none());
    }
}
