//! The normalization entry point.

use duckdantic_types::{DuckError, FieldMap, Subject};

use crate::provider::ProviderRegistry;

/// A field's alias must not collide with another field's canonical name:
/// the collision would make name resolution ambiguous (an exact lookup and
/// an alias lookup claiming the same name).
fn check_alias_collisions(fields: &FieldMap) -> Result<(), DuckError> {
    for view in fields.values() {
        for alias in view.aliases.iter() {
            if alias != &view.name && fields.contains_key(alias.as_str()) {
                return Err(DuckError::AliasCollision {
                    field: view.name.clone(),
                    alias: alias.clone(),
                });
            }
        }
    }
    Ok(())
}

/// Normalize a subject into its canonical field mapping.
///
/// Dispatches to the first registered provider accepting the subject.
/// Referentially stable: normalizing the same subject twice with no
/// intervening provider registration yields value-equal mappings.
///
/// # Errors
///
/// Returns [`DuckError::UnsupportedSubject`] when no provider accepts the
/// subject (scalars, by design, are accepted by none), and
/// [`DuckError::AliasCollision`] when the provider's mapping declares an
/// alias equal to another field's canonical name.
pub fn normalize_fields(
    registry: &ProviderRegistry,
    subject: &Subject,
) -> Result<FieldMap, DuckError> {
    match registry.provider_for(subject) {
        Some(provider) => {
            tracing::trace!(
                provider = provider.name(),
                subject = subject.kind(),
                "normalizing subject"
            );
            let fields = provider.fields(subject);
            check_alias_collisions(&fields)?;
            Ok(fields)
        }
        None => Err(DuckError::UnsupportedSubject {
            subject_kind: subject.kind().to_string(),
            providers: registry.provider_names(),
        }),
    }
}
