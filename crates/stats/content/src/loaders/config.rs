//! Engine configuration loader.

use std::path::Path;

use stat_core::StatConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for [`StatConfig`] from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Missing keys fall back to their defaults.
    pub fn load(path: &Path) -> LoadResult<StatConfig> {
        let content = read_file(path)?;
        Self::load_str(&content)
            .map_err(|e| anyhow::anyhow!("{} ({})", e, path.display()))
    }

    /// Parse config data from TOML text.
    pub fn load_str(content: &str) -> LoadResult<StatConfig> {
        let config: StatConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse stat config TOML: {}", e))?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stat_core::IdCasePolicy;

    #[test]
    fn empty_document_yields_defaults() {
        let config = ConfigLoader::load_str("").unwrap();
        assert_eq!(config, StatConfig::default());
    }

    #[test]
    fn fields_override_defaults() {
        let config = ConfigLoader::load_str(
            r#"
            id_case = "insensitive"
            display_precision = 1
            "#,
        )
        .unwrap();

        assert_eq!(config.id_case, IdCasePolicy::Insensitive);
        assert_eq!(config.display_precision, 1);
        assert!(config.warn_uncategorized);
    }

    #[test]
    fn unknown_policy_is_an_error() {
        assert!(ConfigLoader::load_str(r#"id_case = "shouting""#).is_err());
    }
}
