// =============================================================================
// Exoviz Server - Configuration
// =============================================================================

use exoviz_logic::error::ConfigError;
use exoviz_logic::SkyConfig;

/// Dash-compatible default: the page lives on localhost:8050.
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8050";

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the dashboard listens on (e.g., "127.0.0.1:8050")
    pub bind_address: String,

    /// Sky tables configuration (catalog path, seeds, tick rate)
    pub sky: SkyConfig,
}

impl ServerConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// `EXOVIZ_CONFIG` names a JSON file with [`SkyConfig`] overrides;
    /// `EXOVIZ_DATA` replaces the catalog path on top of that.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut sky = match lookup("EXOVIZ_CONFIG") {
            Some(path) => SkyConfig::from_json_file(path)?,
            None => SkyConfig::default(),
        };
        if let Some(path) = lookup("EXOVIZ_DATA") {
            sky = sky.with_data_path(path);
        }

        Ok(Self {
            bind_address: lookup("BIND_ADDRESS").unwrap_or_else(|| DEFAULT_BIND_ADDRESS.into()),
            sky,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.bind_address, "127.0.0.1:8050");
        assert_eq!(config.sky, SkyConfig::default());
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("BIND_ADDRESS", "0.0.0.0:9000"),
            ("EXOVIZ_DATA", "/tmp/planets.csv"),
        ]))
        .unwrap();
        assert_eq!(config.bind_address, "0.0.0.0:9000");
        assert_eq!(config.sky.data_path, PathBuf::from("/tmp/planets.csv"));
    }

    #[test]
    fn test_missing_config_file() {
        let err = ServerConfig::from_lookup(lookup(&[("EXOVIZ_CONFIG", "/nope/exoviz.json")]));
        assert!(matches!(err, Err(ConfigError::Io { .. })));
    }
}
