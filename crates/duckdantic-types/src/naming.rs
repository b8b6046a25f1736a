//! Auto-naming helpers.
//!
//! Pure functions used for default labels and debug display. They have no
//! effect on matching semantics.

use crate::traits::TraitSpec;
use crate::typedesc::short_type_token;

/// Derive a display name for a trait spec.
///
/// Returns the explicit label when present, otherwise a name built from the
/// field and method names, e.g. `Trait[id, name, close()]`.
pub fn auto_name(spec: &TraitSpec) -> String {
    if let Some(name) = &spec.name {
        return name.clone();
    }
    if spec.is_empty() {
        return "Trait[]".to_string();
    }
    let mut parts: Vec<String> = spec
        .fields
        .iter()
        .map(|f| {
            if f.ty == crate::typedesc::TypeDesc::Unknown {
                f.name.clone()
            } else {
                format!("{}: {}", f.name, short_type_token(&f.ty))
            }
        })
        .collect();
    parts.extend(spec.methods.iter().map(|m| format!("{}()", m.name)));
    format!("Trait[{}]", parts.join(", "))
}
