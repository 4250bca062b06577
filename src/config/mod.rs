//! Configuration loading and management

use crate::core::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Path of the invoice listing view
pub const DEFAULT_LISTING_PATH: &str = "/dashboard/invoices";

/// Environment variables read by [`AppConfig::apply_env`]
pub const ENV_HOST: &str = "INVOICE_ACTIONS_HOST";
pub const ENV_PORT: &str = "INVOICE_ACTIONS_PORT";
pub const ENV_DATABASE_URL: &str = "DATABASE_URL";
pub const ENV_DELETE_MODE: &str = "INVOICE_ACTIONS_DELETE_MODE";

/// Whether deleting an invoice is allowed to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeleteMode {
    /// Delete runs and invalidates the listing
    #[default]
    Enabled,
    /// Every delete fails before touching the store
    Disabled,
}

impl fmt::Display for DeleteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeleteMode::Enabled => f.write_str("enabled"),
            DeleteMode::Disabled => f.write_str("disabled"),
        }
    }
}

impl FromStr for DeleteMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "enabled" => Ok(DeleteMode::Enabled),
            "disabled" => Ok(DeleteMode::Disabled),
            _ => Err(ConfigError::InvalidValue {
                field: "invoices.delete_mode".to_string(),
                value: s.to_string(),
                message: "expected 'enabled' or 'disabled'".to_string(),
            }),
        }
    }
}

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

/// Database connection settings
///
/// Without a `database` section the in-memory store is used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    5
}

/// Invoice action settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoicesConfig {
    /// Listing view that mutations invalidate and redirect to
    #[serde(default = "default_listing_path")]
    pub listing_path: String,

    #[serde(default)]
    pub delete_mode: DeleteMode,
}

impl Default for InvoicesConfig {
    fn default() -> Self {
        Self {
            listing_path: default_listing_path(),
            delete_mode: DeleteMode::default(),
        }
    }
}

fn default_listing_path() -> String {
    DEFAULT_LISTING_PATH.to_string()
}

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub database: Option<DatabaseConfig>,

    #[serde(default)]
    pub invoices: InvoicesConfig,
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => ConfigError::IoError {
                message: e.to_string(),
            },
        })?;

        Self::from_yaml_str(&content).map_err(|e| match e {
            ConfigError::ParseError { message, .. } => ConfigError::ParseError {
                file: Some(path.display().to_string()),
                message,
            },
            other => other,
        })
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from the process environment
    pub fn apply_env(self) -> Result<Self, ConfigError> {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from any variable source
    ///
    /// Unset or empty variables leave the loaded value alone.
    pub fn apply_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(host) = var(ENV_HOST) {
            self.server.host = host;
        }
        if let Some(port) = var(ENV_PORT) {
            self.server.port = port.trim().parse().map_err(|_| ConfigError::InvalidValue {
                field: "server.port".to_string(),
                value: port.clone(),
                message: "expected a port number".to_string(),
            })?;
        }
        if let Some(url) = var(ENV_DATABASE_URL) {
            match self.database.as_mut() {
                Some(database) => database.url = url,
                None => {
                    self.database = Some(DatabaseConfig {
                        url,
                        max_connections: default_max_connections(),
                    })
                }
            }
        }
        if let Some(mode) = var(ENV_DELETE_MODE) {
            self.invoices.delete_mode = mode.parse()?;
        }

        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let listing_path = &self.invoices.listing_path;
        if !listing_path.starts_with('/') || listing_path.trim_end_matches('/').is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "invoices.listing_path".to_string(),
                value: listing_path.clone(),
                message: "must be an absolute path below the root".to_string(),
            });
        }
        if let Some(database) = &self.database {
            if database.max_connections == 0 {
                return Err(ConfigError::InvalidValue {
                    field: "database.max_connections".to_string(),
                    value: "0".to_string(),
                    message: "must be at least 1".to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.bind_addr(), "127.0.0.1:3000");
        assert_eq!(config.invoices.listing_path, "/dashboard/invoices");
        assert_eq!(config.invoices.delete_mode, DeleteMode::Enabled);
        assert!(config.database.is_none());
    }

    #[test]
    fn test_empty_yaml_uses_defaults() {
        let config = AppConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_yaml_serialization() {
        let mut config = AppConfig::default();
        config.invoices.delete_mode = DeleteMode::Disabled;
        let yaml = serde_yaml::to_string(&config).unwrap();

        let parsed = AppConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_unknown_delete_mode_is_rejected() {
        let err = AppConfig::from_yaml_str("invoices:\n  delete_mode: sometimes\n").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn test_relative_listing_path_is_rejected() {
        let err =
            AppConfig::from_yaml_str("invoices:\n  listing_path: dashboard/invoices\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));

        let err = AppConfig::from_yaml_str("invoices:\n  listing_path: /\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_overrides_replace_loaded_values() {
        let config = AppConfig::default()
            .apply_overrides(env(&[
                (ENV_HOST, "0.0.0.0"),
                (ENV_PORT, "8080"),
                (ENV_DATABASE_URL, "postgres://localhost/dashboard"),
                (ENV_DELETE_MODE, "Disabled"),
            ]))
            .unwrap();

        assert_eq!(config.server.bind_addr(), "0.0.0.0:8080");
        assert_eq!(
            config.database.as_ref().map(|d| d.url.as_str()),
            Some("postgres://localhost/dashboard")
        );
        assert_eq!(config.database.unwrap().max_connections, 5);
        assert_eq!(config.invoices.delete_mode, DeleteMode::Disabled);
    }

    #[test]
    fn test_empty_override_is_ignored() {
        let config = AppConfig::default()
            .apply_overrides(env(&[(ENV_PORT, "  ")]))
            .unwrap();
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_bad_port_override_is_rejected() {
        let err = AppConfig::default()
            .apply_overrides(env(&[(ENV_PORT, "http")]))
            .unwrap_err();
        assert!(err.to_string().contains("server.port"));
    }
}
