//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and validated after merging.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error)]
pub enum ConfigValidationError {
    #[error("store.url is required when store.backend is \"rest\"")]
    MissingStoreUrl,

    #[error("unknown store backend '{0}' (expected \"memory\" or \"rest\")")]
    UnknownBackend(String),
}

/// Raw store configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStoreConfig {
    /// "memory" or "rest"
    pub backend: String,
    /// Base URL of the CRM API (rest backend only)
    pub url: Option<String>,
    /// Bearer token for the CRM API
    pub api_key: Option<String>,
}

impl Default for FileStoreConfig {
    fn default() -> Self {
        Self {
            backend: "memory".to_string(),
            url: None,
            api_key: None,
        }
    }
}

/// Raw tool-layer configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileToolsConfig {
    /// JSONL audit log of tool invocations; unset disables the log
    pub audit_log: Option<String>,
}

impl Default for FileToolsConfig {
    fn default() -> Self {
        Self { audit_log: None }
    }
}

/// Complete raw configuration from TOML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub store: FileStoreConfig,
    pub tools: FileToolsConfig,
}

impl FileConfig {
    /// Check invariants the type system cannot express
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        match self.store.backend.as_str() {
            "memory" => Ok(()),
            "rest" => {
                if self.store.url.is_none() {
                    return Err(ConfigValidationError::MissingStoreUrl);
                }
                Ok(())
            }
            other => Err(ConfigValidationError::UnknownBackend(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = FileConfig::default();
        assert_eq!(config.store.backend, "memory");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rest_backend_requires_url() {
        let mut config = FileConfig::default();
        config.store.backend = "rest".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::MissingStoreUrl)
        ));

        config.store.url = Some("https://crm.example/api".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unknown_backend_rejected() {
        let mut config = FileConfig::default();
        config.store.backend = "sqlite".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::UnknownBackend(_))
        ));
    }

    #[test]
    fn test_toml_roundtrip() {
        let toml = r#"
            [store]
            backend = "rest"
            url = "https://crm.example/api"

            [tools]
            audit_log = "/var/log/dealdesk/tools.jsonl"
        "#;
        let config: FileConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.store.backend, "rest");
        assert_eq!(
            config.tools.audit_log.as_deref(),
            Some("/var/log/dealdesk/tools.jsonl")
        );
    }
}
