//! Engine configuration.
//!
//! [`EngineConfig`] is plain data with serde support, loadable from YAML.
//! Every key is optional; missing keys take their defaults.
//!
//! # Example YAML
//!
//! ```yaml
//! default_name_key: json
//! max_depth: 32
//! strict_variants: false
//! ```

use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_MAX_DEPTH: usize = 32;

/// Errors that can occur while loading or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// A value is out of range.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Settings controlling schema derivation.
///
/// # Examples
///
/// ```
/// use openapi_schema_engine::EngineConfig;
///
/// let config = EngineConfig::from_yaml_str("strict_variants: true").unwrap();
/// assert!(config.strict_variants);
/// assert_eq!(config.default_name_key, "json");
/// assert_eq!(config.max_depth, 32);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Tag key supplying public names when the caller doesn't pick one.
    pub default_name_key: String,
    /// Maximum nesting of derivation calls before giving up.
    ///
    /// Each level uses stack. The default keeps a chain of nested structs
    /// within a 2 MiB thread stack in unoptimized builds.
    pub max_depth: usize,
    /// Reject structs declaring a single variant instead of warning.
    pub strict_variants: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_name_key: "json".to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
            strict_variants: false,
        }
    }
}

impl EngineConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](ConfigError::IoError) if the file cannot be read,
    /// [`YamlError`](ConfigError::YamlError) if parsing fails, or
    /// [`Invalid`](ConfigError::Invalid) if a value is out of range.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config: Self = serde_yaml::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Same as [`load`](Self::load), minus I/O.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](ConfigError::IoError) if the file cannot be
    /// written, or [`YamlError`](ConfigError::YamlError) if serialization
    /// fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.default_name_key.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "default_name_key cannot be empty".to_string(),
            ));
        }
        if self.max_depth == 0 {
            return Err(ConfigError::Invalid(
                "max_depth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
