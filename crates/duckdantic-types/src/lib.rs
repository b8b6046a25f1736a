//! Shared types for the duckdantic workspace.
//!
//! This crate provides the foundational data model used across the
//! workspace, breaking circular dependency chains:
//! - [`typedesc`]: structural type descriptors and the `short_type_token` helper
//! - [`fields`]: canonical field views produced by normalization
//! - [`subject`]: the subject categories a check can be run against
//! - [`traits`]: declarative trait specs (field + method contracts)
//! - [`policy`]: the type-compatibility policy and its comparison primitives
//! - [`error`]: the workspace error taxonomy
//! - [`naming`]: auto-naming helpers for unlabeled traits

pub mod error;
pub mod fields;
pub mod naming;
pub mod policy;
pub mod subject;
pub mod traits;
pub mod typedesc;

// Re-export commonly used types at crate root
pub use error::DuckError;
pub use fields::{FieldAliasSet, FieldMap, FieldOrigin, FieldView};
pub use naming::auto_name;
pub use policy::{AliasMode, Strictness, TypeCompatPolicy};
pub use subject::{ClassDef, ClassDefBuilder, FieldDecl, MethodDecl, Subject};
pub use traits::{FieldSpec, MethodSpec, TraitSpec};
pub use typedesc::{short_type_token, TypeDesc};
