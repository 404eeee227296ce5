//! Content factory for building a stat registry from data files.

use std::path::{Path, PathBuf};

use stat_core::{StatConfig, StatRegistry};

use crate::loaders::{CatalogLoader, ConfigLoader, LoadResult, StatCatalog, apply_catalog};

/// Content factory that loads all stat content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml   (optional)
/// └── stats.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load engine configuration from `config.toml`.
    ///
    /// A missing file yields the default configuration.
    pub fn load_config(&self) -> LoadResult<StatConfig> {
        let path = self.data_dir.join("config.toml");
        if !path.exists() {
            tracing::debug!("No {} found, using default stat config", path.display());
            return Ok(StatConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load the stat catalog from `stats.ron`.
    pub fn load_catalog(&self) -> LoadResult<StatCatalog> {
        let path = self.data_dir.join("stats.ron");
        CatalogLoader::load(&path)
    }

    /// Builds a registry from `config.toml` and `stats.ron`.
    pub fn build_registry(&self) -> LoadResult<StatRegistry> {
        let config = self.load_config()?;
        let catalog = self.load_catalog()?;

        let mut registry = StatRegistry::with_config(config);
        apply_catalog(&mut registry, &catalog)?;

        tracing::info!(
            "Loaded {} stats from {}",
            registry.len(),
            self.data_dir.display()
        );
        Ok(registry)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
