//! Subject normalization for the duckdantic workspace.
//!
//! This crate turns heterogeneous subjects (mappings, classes, instances)
//! into the canonical field representation the matcher consumes:
//! - [`provider`]: the `FieldProvider` boundary and the built-in providers
//! - [`normalize`]: the single normalization entry point
//! - [`shapes`]: stable subject-shape fingerprints used as cache keys
//! - [`cache`]: the memoizing normalization cache with hit/miss stats

pub mod cache;
pub mod normalize;
pub mod provider;
pub mod shapes;

pub use cache::{CacheStats, NormalizeCache};
pub use normalize::normalize_fields;
pub use provider::{
    ClassProvider, FieldProvider, InstanceProvider, MappingProvider, ProviderRegistry,
};
pub use shapes::{shape_id_token, ShapeOrigin};
