//! `HetGraph` Configuration Module
//!
//! Provides configuration file support via `hetgraph.toml`, environment
//! variables, and runtime overrides.
//!
//! # Priority (highest to lowest)
//!
//! 1. Runtime overrides (builder API)
//! 2. Environment variables (`HETGRAPH_*`)
//! 3. Configuration file (`hetgraph.toml`)
//! 4. Default values

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to parse configuration file.
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Invalid configuration value.
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue {
        /// Configuration key that failed validation.
        key: String,
        /// Validation error message.
        message: String,
    },
}

/// Label configuration section.
///
/// Nodes and edges ingested without an explicit type attribute are assigned
/// these shared default labels. Mixing explicit and defaulted labels in the
/// same graph is permitted and yields a de-facto extra type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    /// Label assigned to nodes without an explicit type.
    pub default_node_type: String,
    /// Label assigned to edges without an explicit type.
    pub default_edge_type: String,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            default_node_type: "default".to_string(),
            default_edge_type: "default".to_string(),
        }
    }
}

/// Limits configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum feature vector width per node type.
    pub max_feature_width: usize,
    /// Maximum number of distinct node types.
    pub max_node_types: usize,
    /// Maximum number of distinct edge types.
    pub max_edge_types: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_feature_width: 65536,
            max_node_types: 4096,
            max_edge_types: 4096,
        }
    }
}

/// Logging configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace.
    pub level: String,
    /// Log format: text or json.
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

/// Main `HetGraph` configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EngineConfig {
    /// Default label configuration.
    pub labels: LabelConfig,
    /// Limits configuration.
    pub limits: LimitsConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
}

impl EngineConfig {
    /// Loads configuration from default sources.
    ///
    /// Priority: defaults < file < environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration parsing fails.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_path("hetgraph.toml")
    }

    /// Loads configuration from a specific file path.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration parsing fails.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let figment = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed("HETGRAPH_").split("_").lowercase(false));

        figment
            .extract()
            .map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Creates a configuration from a TOML string.
    ///
    /// # Arguments
    ///
    /// * `toml_str` - TOML configuration string.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let figment = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::string(toml_str));

        figment
            .extract()
            .map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.labels.default_node_type.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "labels.default_node_type".to_string(),
                message: "label must not be empty".to_string(),
            });
        }

        if self.labels.default_edge_type.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "labels.default_edge_type".to_string(),
                message: "label must not be empty".to_string(),
            });
        }

        if self.limits.max_feature_width == 0 {
            return Err(ConfigError::InvalidValue {
                key: "limits.max_feature_width".to_string(),
                message: "value must be >= 1".to_string(),
            });
        }

        if self.limits.max_node_types == 0 || self.limits.max_edge_types == 0 {
            return Err(ConfigError::InvalidValue {
                key: "limits.max_node_types".to_string(),
                message: "type limits must be >= 1".to_string(),
            });
        }

        let valid_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::InvalidValue {
                key: "logging.level".to_string(),
                message: format!(
                    "value '{}' is invalid, expected one of: {:?}",
                    self.logging.level, valid_levels
                ),
            });
        }

        Ok(())
    }

    /// Serializes the configuration to TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}
