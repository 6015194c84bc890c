//! Dashboard configuration with TOML file support.

use lockvote_types::LockingParams;
use lockvote_utils::LogFormat;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::DashboardError;

/// Configuration for a lockvote dashboard.
///
/// Can be loaded from a TOML file via [`DashboardConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Ledger locking parameters used to validate actions.
    #[serde(default)]
    pub locking: LockingParams,
}

fn default_log_format() -> String {
    "human".into()
}

fn default_log_level() -> String {
    "info".into()
}

impl DashboardConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, DashboardError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| DashboardError::Config(format!("{}: {e}", path.as_ref().display())))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string. Locking parameters are validated.
    pub fn from_toml_str(s: &str) -> Result<Self, DashboardError> {
        let config: Self = toml::from_str(s).map_err(|e| DashboardError::Config(e.to_string()))?;
        config
            .locking
            .validate()
            .map_err(|e| DashboardError::Config(e.to_string()))?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, DashboardError> {
        toml::to_string_pretty(self).map_err(|e| DashboardError::Config(e.to_string()))
    }

    pub fn log_format(&self) -> LogFormat {
        LogFormat::from_name(&self.log_format)
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            log_format: default_log_format(),
            log_level: default_log_level(),
            locking: LockingParams::default(),
        }
    }
}
