use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;
use thiserror::Error;

use crate::version::criteria::Criteria;
use crate::version::error::CriteriaError;

/// Default log filter when neither the config nor `RUST_LOG` set one
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Gate table loaded from a JSON file
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CheckConfig {
    /// Criteria expressions per dispatch key, in registration order
    pub gates: IndexMap<String, Vec<String>>,
    pub log: LogConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct LogConfig {
    /// `tracing_subscriber::EnvFilter` directive
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid criteria for {key}: {source}")]
    Criteria { key: String, source: CriteriaError },
}

impl CheckConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Parsed criteria for `key`, empty when the key is not configured
    pub fn criteria_for(&self, key: &str) -> Result<Vec<Criteria>, ConfigError> {
        self.gates
            .get(key)
            .map(|exprs| {
                exprs
                    .iter()
                    .map(|expr| {
                        Criteria::parse(expr).map_err(|source| ConfigError::Criteria {
                            key: key.to_string(),
                            source,
                        })
                    })
                    .collect()
            })
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    /// Parse every configured expression so a bad one fails at load time
    fn validate(&self) -> Result<(), ConfigError> {
        for key in self.gates.keys() {
            self.criteria_for(key)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn check_config_from_empty_object_uses_defaults() {
        let result = serde_json::from_value::<CheckConfig>(json!({})).unwrap();

        assert!(result.gates.is_empty());
        assert_eq!(result.log.level, "warn");
    }

    #[test]
    fn check_config_from_full_object_parses_all_fields() {
        let result = CheckConfig::from_json_str(
            r#"{
                "gates": {
                    "storage::Volume::create": [">=2.0", "<2.0"],
                    "storage::Volume::delete": ["1.0<>3.0"]
                },
                "log": { "level": "debug" }
            }"#,
        )
        .unwrap();

        assert_eq!(
            result.gates.keys().collect::<Vec<_>>(),
            vec!["storage::Volume::create", "storage::Volume::delete"]
        );
        assert_eq!(result.log.level, "debug");
        assert_eq!(
            result.criteria_for("storage::Volume::create").unwrap(),
            vec![
                Criteria::parse(">=2.0").unwrap(),
                Criteria::parse("<2.0").unwrap()
            ]
        );
    }

    #[test]
    fn criteria_for_unknown_key_is_empty() {
        let config = CheckConfig::default();
        assert!(config.criteria_for("missing").unwrap().is_empty());
    }

    #[test]
    fn from_json_str_rejects_malformed_criteria() {
        let err = CheckConfig::from_json_str(r#"{"gates": {"a::b": [">1", "oops"]}}"#)
            .unwrap_err();

        assert!(matches!(
            err,
            ConfigError::Criteria { ref key, source: CriteriaError::InvalidVersionCriteria { .. } }
                if key == "a::b"
        ));
    }

    #[test]
    fn from_path_reports_missing_file() {
        let err = CheckConfig::from_path(Path::new("/nonexistent/versioncheck.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
