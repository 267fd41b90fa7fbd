//! Configuration Loader
//!
//! Layers configuration sources with the `config` crate. Later layers win:
//!
//! 1. Serialized [`DeprovisionerConfig::default`]
//! 2. `config/deprovisioner.{toml,yaml,json}` when present, or an explicit file
//! 3. Environment variables such as `DEPROVISIONER__RETRY__INTERVAL_SECONDS`

use super::error::{ConfigResult, ConfigurationError};
use super::DeprovisionerConfig;
use config::{Config, Environment, File};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Default file looked up relative to the working directory, extension optional
const DEFAULT_CONFIG_BASENAME: &str = "config/deprovisioner";
const ENV_PREFIX: &str = "DEPROVISIONER";
const ENV_SEPARATOR: &str = "__";

#[derive(Debug)]
pub struct ConfigManager {
    config: DeprovisionerConfig,
    source_file: Option<PathBuf>,
}

impl ConfigManager {
    /// Load defaults, the optional default file and the process environment
    pub fn load() -> ConfigResult<Arc<ConfigManager>> {
        Self::build(None, None)
    }

    /// Load with an explicit configuration file, which must exist
    pub fn load_from_file(path: impl AsRef<Path>) -> ConfigResult<Arc<ConfigManager>> {
        Self::build(Some(path.as_ref()), None)
    }

    /// Load using `variables` in place of the process environment
    ///
    /// Keys use the same `DEPROVISIONER__SECTION__FIELD` form as real variables.
    pub fn load_with_overrides(
        path: Option<&Path>,
        variables: HashMap<String, String>,
    ) -> ConfigResult<Arc<ConfigManager>> {
        Self::build(path, Some(variables))
    }

    pub fn config(&self) -> &DeprovisionerConfig {
        &self.config
    }

    /// File the configuration was read from, when one was found
    pub fn source_file(&self) -> Option<&Path> {
        self.source_file.as_deref()
    }

    fn build(
        path: Option<&Path>,
        variables: Option<HashMap<String, String>>,
    ) -> ConfigResult<Arc<ConfigManager>> {
        let defaults = Config::try_from(&DeprovisionerConfig::default())?;
        let mut builder = Config::builder().add_source(defaults);

        let source_file = match path {
            Some(path) => {
                if !path.is_file() {
                    return Err(ConfigurationError::config_file_not_found(path));
                }
                builder = builder.add_source(File::from(path).required(true));
                Some(path.to_path_buf())
            }
            None => {
                builder = builder.add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false));
                Self::discover_default_file()
            }
        };

        let environment = Environment::with_prefix(ENV_PREFIX)
            .prefix_separator(ENV_SEPARATOR)
            .separator(ENV_SEPARATOR)
            .try_parsing(true)
            .source(variables);
        builder = builder.add_source(environment);

        let config: DeprovisionerConfig = builder.build()?.try_deserialize()?;
        config.validate()?;

        debug!(
            "Configuration loaded: {}",
            serde_json::to_string(&config).unwrap_or_else(|_| "[serialization error]".to_string())
        );
        info!(
            source_file = ?source_file,
            retry_interval_seconds = config.retry.interval_seconds,
            retry_max_window_seconds = config.retry.max_window_seconds,
            "Configuration loaded successfully"
        );

        Ok(Arc::new(ConfigManager {
            config,
            source_file,
        }))
    }

    fn discover_default_file() -> Option<PathBuf> {
        ["toml", "yaml", "yml", "json"]
            .iter()
            .map(|extension| PathBuf::from(format!("{DEFAULT_CONFIG_BASENAME}.{extension}")))
            .find(|candidate| candidate.is_file())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Duration;

    fn overrides(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_without_sources() {
        let manager = ConfigManager::load_with_overrides(None, HashMap::new()).unwrap();
        assert_eq!(manager.config().retry.interval(), Duration::from_secs(10));
        assert_eq!(manager.config().retry.max_window(), Duration::from_secs(600));
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[retry]\ninterval_seconds = 5\nmax_window_seconds = 120\n\n[avs]\ninternal_parent_id = 7\nexternal_parent_id = 8"
        )
        .unwrap();

        let manager =
            ConfigManager::load_with_overrides(Some(file.path()), HashMap::new()).unwrap();
        let config = manager.config();
        assert_eq!(config.retry.interval_seconds, 5);
        assert_eq!(config.retry.max_window_seconds, 120);
        assert_eq!(config.avs.internal_parent_id, 7);
        assert_eq!(config.avs.external_parent_id, 8);
        assert_eq!(config.logging.level, "info");
        assert_eq!(manager.source_file(), Some(file.path()));
    }

    #[test]
    fn test_environment_overrides_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[retry]\ninterval_seconds = 5").unwrap();

        let manager = ConfigManager::load_with_overrides(
            Some(file.path()),
            overrides(&[("DEPROVISIONER__RETRY__INTERVAL_SECONDS", "20")]),
        )
        .unwrap();
        assert_eq!(manager.config().retry.interval_seconds, 20);
    }

    #[test]
    fn test_missing_explicit_file() {
        let result = ConfigManager::load_from_file("/nonexistent/deprovisioner.toml");
        assert!(matches!(
            result,
            Err(ConfigurationError::ConfigFileNotFound { .. })
        ));
    }

    #[test]
    fn test_invalid_values_fail_validation() {
        let result = ConfigManager::load_with_overrides(
            None,
            overrides(&[("DEPROVISIONER__RETRY__INTERVAL_SECONDS", "0")]),
        );
        assert!(matches!(result, Err(ConfigurationError::InvalidValue { .. })));
    }
}
