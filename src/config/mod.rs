//! Configuration management
//!
//! Layered loading: compiled defaults, then an optional TOML file, then
//! `PARLEY_`-prefixed environment overrides.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub identity: IdentityConfig,
    pub store: StoreConfig,
    pub callkit: CallkitConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    /// Identifier the shell logs in with
    pub user_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// "memory" or "remote"
    pub backend: String,
    /// Fixed, pre-provisioned endpoint for the remote backend
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CallkitConfig {
    pub app_id: u64,
    /// 64 hex characters; the compiled default is a placeholder
    pub app_sign: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            identity: IdentityConfig::default(),
            store: StoreConfig::default(),
            callkit: CallkitConfig::default(),
        }
    }
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            user_id: "demo".to_string(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: "memory".to_string(),
            url: "wss://store.example.net/live".to_string(),
        }
    }
}

impl Default for CallkitConfig {
    fn default() -> Self {
        Self {
            app_id: 0,
            app_sign: "0".repeat(64),
        }
    }
}

/// Load configuration: defaults, then `parley.toml` if present (or the
/// given path), then `PARLEY_*` environment variables
pub fn load(path: Option<&str>) -> Result<Config, config::ConfigError> {
    let defaults = config::Config::try_from(&Config::default())?;
    let mut builder = config::Config::builder().add_source(defaults);

    builder = match path {
        Some(path) => builder.add_source(config::File::with_name(path)),
        None => builder.add_source(config::File::with_name("parley").required(false)),
    };
    builder = builder.add_source(config::Environment::with_prefix("PARLEY").separator("__"));

    builder.build()?.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.store.backend, "memory");
        assert_eq!(config.callkit.app_sign.len(), 64);
    }

    #[test]
    fn test_partial_toml_overrides_defaults() {
        let config: Config = toml::from_str(
            r#"
            [identity]
            user_id = "alice"

            [store]
            backend = "remote"
            url = "wss://store.eu-west.example.net/live"
            "#,
        )
        .expect("config did not parse");

        assert_eq!(config.identity.user_id, "alice");
        assert_eq!(config.store.backend, "remote");
        // Untouched section keeps its defaults.
        assert_eq!(config.callkit.app_id, 0);
    }
}
