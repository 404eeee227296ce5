//! Stat catalog loader.
//!
//! A catalog is one RON document holding every definition, alias and
//! conditional stat of a game:
//!
//! ```ron
//! StatCatalog(
//!     stats: [
//!         StatDefinition(
//!             id: "damage",
//!             display_name: "Damage",
//!             default_value: 10.0,
//!             min_value: 0.0,
//!             categories: "DAMAGE | OFFENSE",
//!             aliases: ["dmg"],
//!         ),
//!     ],
//!     aliases: [("atk", "damage")],
//!     conditional: [
//!         ConditionalSpec(base_id: "damage", conditions: "FIRE", suffix: "with Fire Skills"),
//!     ],
//! )
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use stat_core::{CategorySet, StatDefinition, StatRegistry};

use crate::loaders::{LoadResult, read_file};

/// A conditional stat declared outside its base definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionalSpec {
    pub base_id: String,
    pub conditions: CategorySet,
    pub suffix: String,
}

/// Stat catalog structure for RON files.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatCatalog {
    #[serde(default)]
    pub stats: Vec<StatDefinition>,
    /// `(alias, target)` pairs.
    #[serde(default)]
    pub aliases: Vec<(String, String)>,
    #[serde(default)]
    pub conditional: Vec<ConditionalSpec>,
}

impl StatCatalog {
    pub fn is_empty(&self) -> bool {
        self.stats.is_empty() && self.aliases.is_empty() && self.conditional.is_empty()
    }
}

/// Loader for stat catalogs from RON files.
pub struct CatalogLoader;

impl CatalogLoader {
    /// Load a stat catalog from a RON file.
    pub fn load(path: &Path) -> LoadResult<StatCatalog> {
        let content = read_file(path)?;
        let catalog: StatCatalog = ron::from_str(&content).map_err(|e| {
            anyhow::anyhow!("Failed to parse stat catalog RON at {:?}: {}", path, e)
        })?;

        Ok(catalog)
    }

    /// Parse a stat catalog from RON text.
    pub fn load_str(content: &str) -> LoadResult<StatCatalog> {
        let catalog: StatCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse stat catalog RON: {}", e))?;

        Ok(catalog)
    }
}

/// Registers a catalog into `registry`.
///
/// Definitions go first so that aliases and conditional stats can find their
/// targets. A definition that breaks an invariant aborts the load; alias and
/// conditional mistakes are only logged by the registry.
pub fn apply_catalog(registry: &mut StatRegistry, catalog: &StatCatalog) -> LoadResult<()> {
    for definition in &catalog.stats {
        registry
            .register(definition.clone())
            .map_err(|e| anyhow::anyhow!("Invalid stat definition in catalog: {}", e))?;
    }

    for (alias, target) in &catalog.aliases {
        registry.register_alias(alias, target);
    }

    for spec in &catalog.conditional {
        registry.register_conditional_stat(&spec.base_id, spec.conditions, &spec.suffix);
    }

    tracing::debug!(
        "Applied stat catalog: {} stats, {} aliases, {} conditional stats",
        catalog.stats.len(),
        catalog.aliases.len(),
        catalog.conditional.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"
        StatCatalog(
            stats: [
                StatDefinition(
                    id: "damage",
                    display_name: "Damage",
                    default_value: 10.0,
                    min_value: 0.0,
                    categories: "DAMAGE | OFFENSE",
                    aliases: ["dmg"],
                    extensions: [
                        StatExtension(required: "FIRE", suffix: "with Fire Skills"),
                    ],
                ),
                StatDefinition(
                    id: "armor",
                    display_name: "Armor",
                    max_value: 1000.0,
                    categories: "DEFENSE",
                    is_integer: true,
                ),
            ],
            aliases: [("atk", "damage")],
            conditional: [
                ConditionalSpec(base_id: "damage", conditions: "COLD | PROJECTILE", suffix: "with Cold Projectiles"),
            ],
        )
    "#;

    #[test]
    fn parses_definitions_with_defaults() {
        let catalog = CatalogLoader::load_str(CATALOG).unwrap();
        assert_eq!(catalog.stats.len(), 2);

        let armor = &catalog.stats[1];
        assert_eq!(armor.default_value, 0.0);
        assert_eq!(armor.min_value, f64::NEG_INFINITY);
        assert_eq!(armor.max_value, 1000.0);
        assert!(armor.is_integer);
        assert_eq!(armor.categories, CategorySet::DEFENSE);

        assert_eq!(
            catalog.conditional[0].conditions,
            CategorySet::COLD | CategorySet::PROJECTILE
        );
    }

    #[test]
    fn apply_registers_everything() {
        let catalog = CatalogLoader::load_str(CATALOG).unwrap();
        let mut registry = StatRegistry::new();
        apply_catalog(&mut registry, &catalog).unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.normalize_id("dmg"), "damage");
        assert_eq!(registry.normalize_id("atk"), "damage");
        assert_eq!(registry.get_conditional_stats("damage").len(), 2);
        assert_eq!(
            registry.conditions_for("damage_Cold_Projectile"),
            Some(CategorySet::COLD | CategorySet::PROJECTILE)
        );
    }

    #[test]
    fn invalid_definition_aborts_the_load() {
        let catalog = CatalogLoader::load_str(
            r#"StatCatalog(stats: [StatDefinition(id: "x", display_name: "X", min_value: 5.0, max_value: 1.0)])"#,
        )
        .unwrap();
        let mut registry = StatRegistry::new();

        assert!(apply_catalog(&mut registry, &catalog).is_err());
        assert!(registry.is_empty());
    }

    #[test]
    fn empty_catalog_is_allowed() {
        let catalog = CatalogLoader::load_str("StatCatalog()").unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn malformed_ron_is_an_error() {
        assert!(CatalogLoader::load_str("StatCatalog(stats: [").is_err());
    }
}
