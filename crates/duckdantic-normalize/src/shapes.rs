//! Subject shape fingerprints.
//!
//! A shape token identifies the *type identity* of a subject — the class
//! declaration for classes and instances, the key/value-type profile for
//! mappings — independent of any particular instance state. Tokens are the
//! subject component of normalization cache keys.

use sha2::{Digest, Sha256};

use duckdantic_types::{short_type_token, ClassDef, Subject, TypeDesc};

/// Subject category a shape token was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeOrigin {
    Mapping,
    Class,
    Instance,
}

fn digest_token(prefix: &str, payload: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(payload.as_bytes());
    let digest = hasher.finalize();
    // 16 hex chars is plenty for an in-process cache key.
    format!("{}:{}", prefix, &hex::encode(digest)[..16])
}

fn class_token(class: &ClassDef) -> String {
    let mut payload = String::from(&class.name);
    for field in &class.fields {
        payload.push('|');
        payload.push_str(&field.name);
        payload.push('=');
        payload.push_str(&short_type_token(&field.ty));
        payload.push(if field.required { '!' } else { '?' });
        for alias in field.aliases.iter() {
            payload.push('~');
            payload.push_str(alias);
        }
    }
    for method in &class.methods {
        payload.push('|');
        payload.push_str(&method.name);
        payload.push('/');
        payload.push_str(&method.arity.to_string());
    }
    digest_token("class", &payload)
}

/// Stable fingerprint of a subject's shape, or `None` for subjects that
/// have none (opaque scalars).
///
/// Two subjects with equal shape tokens normalize identically under an
/// unchanged provider set; the converse need not hold (mapping tokens
/// include value-type profiles, so two mappings with the same keys but
/// different value types get distinct tokens even when inference is off).
pub fn shape_id_token(subject: &Subject) -> Option<String> {
    match subject {
        Subject::Mapping(map) => {
            // BTree-sort keys so insertion order does not leak into the token.
            let mut entries: Vec<(&String, &serde_json::Value)> = map.iter().collect();
            entries.sort_by_key(|(k, _)| k.as_str());
            let payload = entries
                .iter()
                .map(|(k, v)| format!("{}={}", k, short_type_token(&TypeDesc::of_value(v))))
                .collect::<Vec<_>>()
                .join("|");
            Some(digest_token("mapping", &payload))
        }
        Subject::Class(class) => Some(class_token(class)),
        Subject::Instance { class, .. } => Some(class_token(class)),
        Subject::Scalar(_) => None,
    }
}

/// Shape category of a subject, if it has one.
pub fn shape_origin(subject: &Subject) -> Option<ShapeOrigin> {
    match subject {
        Subject::Mapping(_) => Some(ShapeOrigin::Mapping),
        Subject::Class(_) => Some(ShapeOrigin::Class),
        Subject::Instance { .. } => Some(ShapeOrigin::Instance),
        Subject::Scalar(_) => None,
    }
}
