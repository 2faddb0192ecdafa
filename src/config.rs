//! Declarative configuration for named tables, loaded via `figment` (YAML
//! file, then environment overlay).

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use figment::Figment;
use figment::providers::{Env, Format, Yaml};
use serde::{Deserialize, Serialize};

/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The given config file path does not exist.
    #[error("config file not found: {0}")]
    NotFound(String),
    /// `figment` failed to merge or deserialize the configuration.
    #[error("failed to load configuration: {0}")]
    Load(#[from] figment::Error),
}

/// Per-table settings: everything needed to construct a [`crate::Table`]
/// without hardcoding it at the call site.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TableConfig {
    /// Whether this table is active. Disabled tables are skipped by
    /// callers that provision tables from config at startup.
    pub enabled: bool,
    /// Lifespan new entries get when a caller doesn't specify one
    /// explicitly.
    #[serde(with = "humantime_serde")]
    pub default_life_span: Duration,
    /// Janitor tick period. Zero disables timed sweeps.
    #[serde(with = "humantime_serde")]
    pub cleanup_interval: Duration,
    /// Whether a loader failure is cached as a null entry instead of
    /// propagating to the `get` caller.
    pub allow_null_on_load_error: bool,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            default_life_span: Duration::from_secs(60),
            cleanup_interval: Duration::from_secs(60),
            allow_null_on_load_error: false,
        }
    }
}

/// Top-level configuration: one [`TableConfig`] per named table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Table name → settings.
    pub tables: HashMap<String, TableConfig>,
}

impl CacheConfig {
    /// Load configuration from an optional YAML file, then overlay
    /// `CACHE_`-prefixed environment variables (`CACHE_TABLES__<NAME>__<FIELD>`).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] if `path` is given but does not
    /// exist, or [`ConfigError::Load`] if the merged configuration cannot
    /// be deserialized.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::new();

        if let Some(p) = path {
            if !p.exists() {
                return Err(ConfigError::NotFound(p.display().to_string()));
            }
            figment = figment.merge(Yaml::file(p));
        }

        figment = figment.merge(Env::prefixed("CACHE_").split("__"));
        Ok(figment.extract()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_path_defaults_to_empty_tables() {
        let config = CacheConfig::load(None).unwrap();
        assert!(config.tables.is_empty());
    }

    #[test]
    fn nonexistent_path_is_an_error() {
        let err = CacheConfig::load(Some(Path::new("/does/not/exist.yaml"))).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn loads_table_settings_from_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "tables:\n  sessions:\n    cleanup_interval: 5s\n    default_life_span: 30s\n    allow_null_on_load_error: true\n"
        )
        .unwrap();

        let config = CacheConfig::load(Some(file.path())).unwrap();
        let sessions = config.tables.get("sessions").unwrap();
        assert_eq!(sessions.cleanup_interval, Duration::from_secs(5));
        assert_eq!(sessions.default_life_span, Duration::from_secs(30));
        assert!(sessions.allow_null_on_load_error);
        assert!(sessions.enabled);
    }

    #[test]
    fn table_defaults_are_sensible_out_of_the_box() {
        let config = TableConfig::default();
        assert!(config.enabled);
        assert_eq!(config.default_life_span, Duration::from_secs(60));
        assert_eq!(config.cleanup_interval, Duration::from_secs(60));
        assert!(!config.allow_null_on_load_error);
    }
}
