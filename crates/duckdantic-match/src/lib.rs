//! Trait matching for the duckdantic workspace.
//!
//! This crate decides whether a normalized subject satisfies a trait spec
//! under a policy, and composes trait specs:
//! - [`matching`]: `satisfies` / `explain` and the mismatch taxonomy
//! - [`methods`]: the method-only sub-checks
//! - [`algebra`]: `union` / `intersect` / `minus` over trait specs
//! - [`compare`]: coarse trait-to-trait relations
//! - [`registry`]: the named trait catalog
//! - [`adapter`]: dynamic interface objects whose membership test never fails

pub mod adapter;
pub mod algebra;
pub mod compare;
pub mod matching;
pub mod methods;
pub mod registry;

pub use adapter::{trait_fingerprint, DuckInterface};
pub use algebra::{intersect, minus, union};
pub use compare::{compare_traits, TraitRelation};
pub use matching::{explain, explain_fields, satisfies, Explanation, Mismatch};
pub use methods::{methods_explain, methods_satisfy};
pub use registry::TraitRegistry;
