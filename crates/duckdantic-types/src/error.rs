//! Workspace error taxonomy.
//!
//! Mismatch records produced during matching are *not* errors — they are
//! the normal output of `explain` and live in the matcher crate. The
//! variants here are genuine failures that propagate to the caller.

/// Errors surfaced by normalization, trait algebra, and registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DuckError {
    /// No registered provider accepts the given subject.
    UnsupportedSubject {
        /// Subject category tag (e.g. "scalar").
        subject_kind: String,
        /// Names of the providers that were consulted, in registration order.
        providers: Vec<String>,
    },
    /// Trait algebra met two constraints with the same name whose types (or
    /// arities) are incomparable under the active policy.
    AmbiguousTraitMerge {
        /// Field or method name the merge failed on.
        name: String,
        /// Short token of the first operand's constraint.
        left: String,
        /// Short token of the second operand's constraint.
        right: String,
    },
    /// Registry `register` called for an existing name without `replace`.
    DuplicateRegistration { name: String },
    /// A normalized field's alias collides with another field's canonical
    /// name in the same mapping, making name resolution ambiguous.
    AliasCollision {
        /// Field declaring the offending alias.
        field: String,
        /// The alias that equals another field's name.
        alias: String,
    },
}

impl std::fmt::Display for DuckError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DuckError::UnsupportedSubject {
                subject_kind,
                providers,
            } => write!(
                f,
                "no provider accepts subject of kind '{}' (expected a mapping, class, or instance; consulted: {})",
                subject_kind,
                providers.join(", ")
            ),
            DuckError::AmbiguousTraitMerge { name, left, right } => write!(
                f,
                "ambiguous trait merge on '{}': '{}' and '{}' are incomparable under the active policy",
                name, left, right
            ),
            DuckError::DuplicateRegistration { name } => {
                write!(f, "trait '{}' is already registered (pass replace to overwrite)", name)
            }
            DuckError::AliasCollision { field, alias } => write!(
                f,
                "field '{}' declares alias '{}', which collides with another field's name in the same mapping",
                field, alias
            ),
        }
    }
}

impl std::error::Error for DuckError {}
