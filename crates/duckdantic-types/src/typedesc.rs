//! Structural type descriptors.
//!
//! A [`TypeDesc`] describes the type of a field on either side of a
//! structural check: the requirement declared by a trait, or the candidate
//! observed on a subject. Descriptors are plain values (comparable,
//! hashable, serializable) so they can participate in cache keys.

use serde::{Deserialize, Serialize};

/// Structural type descriptor.
///
/// `Unknown` stands for "no type information available" — mappings carry no
/// declared types, and permissive policies may accept it against any
/// requirement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeDesc {
    /// No type information available.
    Unknown,
    Bool,
    /// Integer (narrower than `Float` under the numeric tower).
    Int,
    Float,
    Str,
    Bytes,
    /// Homogeneous sequence.
    List(Box<TypeDesc>),
    /// Key/value mapping.
    Map(Box<TypeDesc>, Box<TypeDesc>),
    /// A value that may be absent/null.
    Optional(Box<TypeDesc>),
    /// Any one of the listed alternatives.
    Union(Vec<TypeDesc>),
    /// A nominal type referenced by name (compared by name equality).
    Named(String),
}

impl TypeDesc {
    /// Infer a descriptor from a runtime JSON value.
    ///
    /// Used by the mapping provider when value-type inference is enabled.
    /// Arrays infer their element type only when every element agrees.
    pub fn of_value(value: &serde_json::Value) -> TypeDesc {
        use serde_json::Value;
        match value {
            Value::Null => TypeDesc::Optional(Box::new(TypeDesc::Unknown)),
            Value::Bool(_) => TypeDesc::Bool,
            Value::Number(n) => {
                if n.is_i64() || n.is_u64() {
                    TypeDesc::Int
                } else {
                    TypeDesc::Float
                }
            }
            Value::String(_) => TypeDesc::Str,
            Value::Array(items) => {
                let mut elem: Option<TypeDesc> = None;
                for item in items {
                    let t = TypeDesc::of_value(item);
                    match &elem {
                        None => elem = Some(t),
                        Some(prev) if *prev == t => {}
                        Some(_) => {
                            elem = Some(TypeDesc::Unknown);
                            break;
                        }
                    }
                }
                TypeDesc::List(Box::new(elem.unwrap_or(TypeDesc::Unknown)))
            }
            Value::Object(_) => TypeDesc::Map(Box::new(TypeDesc::Str), Box::new(TypeDesc::Unknown)),
        }
    }
}

/// Render a short display token for a type descriptor.
///
/// Tokens are used in explanations, error messages, and debug output; they
/// have no effect on matching semantics.
///
/// # Examples
///
/// ```ignore
/// use duckdantic_types::{short_type_token, TypeDesc};
///
/// assert_eq!(short_type_token(&TypeDesc::Int), "int");
/// assert_eq!(
///     short_type_token(&TypeDesc::List(Box::new(TypeDesc::Str))),
///     "list[str]"
/// );
/// ```
pub fn short_type_token(ty: &TypeDesc) -> String {
    match ty {
        TypeDesc::Unknown => "unknown".to_string(),
        TypeDesc::Bool => "bool".to_string(),
        TypeDesc::Int => "int".to_string(),
        TypeDesc::Float => "float".to_string(),
        TypeDesc::Str => "str".to_string(),
        TypeDesc::Bytes => "bytes".to_string(),
        TypeDesc::List(elem) => format!("list[{}]", short_type_token(elem)),
        TypeDesc::Map(k, v) => format!("map[{}, {}]", short_type_token(k), short_type_token(v)),
        TypeDesc::Optional(inner) => format!("{}?", short_type_token(inner)),
        TypeDesc::Union(arms) => arms
            .iter()
            .map(short_type_token)
            .collect::<Vec<_>>()
            .join(" | "),
        TypeDesc::Named(name) => name.clone(),
    }
}

impl std::fmt::Display for TypeDesc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&short_type_token(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_infer_scalars() {
        assert_eq!(TypeDesc::of_value(&json!(true)), TypeDesc::Bool);
        assert_eq!(TypeDesc::of_value(&json!(1)), TypeDesc::Int);
        assert_eq!(TypeDesc::of_value(&json!(1.5)), TypeDesc::Float);
        assert_eq!(TypeDesc::of_value(&json!("a")), TypeDesc::Str);
    }

    #[test]
    fn test_infer_homogeneous_array() {
        assert_eq!(
            TypeDesc::of_value(&json!([1, 2, 3])),
            TypeDesc::List(Box::new(TypeDesc::Int))
        );
    }

    #[test]
    fn test_infer_mixed_array_falls_back_to_unknown_element() {
        assert_eq!(
            TypeDesc::of_value(&json!([1, "a"])),
            TypeDesc::List(Box::new(TypeDesc::Unknown))
        );
    }

    #[test]
    fn test_short_tokens() {
        assert_eq!(short_type_token(&TypeDesc::Int), "int");
        assert_eq!(
            short_type_token(&TypeDesc::Optional(Box::new(TypeDesc::Str))),
            "str?"
        );
        assert_eq!(
            short_type_token(&TypeDesc::Union(vec![TypeDesc::Int, TypeDesc::Str])),
            "int | str"
        );
        assert_eq!(
            short_type_token(&TypeDesc::Map(
                Box::new(TypeDesc::Str),
                Box::new(TypeDesc::Unknown)
            )),
            "map[str, unknown]"
        );
    }
}
