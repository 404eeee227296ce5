//! Data-driven stat content and loaders.
//!
//! This crate is the definition source for `stat-core`. It reads RON/TOML data
//! files and turns them into a ready [`stat_core::StatRegistry`]:
//! - Stat catalogs (definitions, aliases, conditional stats) via RON
//! - Engine configuration (id case policy, display precision) via TOML
//!
//! Loaders use stat-core types directly with serde for deserialization.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    CatalogLoader, ConditionalSpec, ConfigLoader, ContentFactory, StatCatalog, apply_catalog,
};
