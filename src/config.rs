//! Engine configuration
//!
//! A JSON file naming the composite index to build, the record type the index
//! serves and the log threshold:
//!
//! ```json
//! {
//!   "index": { "fields": [ {"name": "Country"}, {"name": "Age", "ascending": false} ] },
//!   "record_type": "Person",
//!   "log_level": "info"
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::index::{IndexDefinition, IndexError};
use crate::observability::Severity;

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Failed to read config: {0}")]
    Read(#[from] std::io::Error),

    /// Config file is not valid JSON for `EngineConfig`
    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// Index definition is invalid
    #[error("Invalid index definition: {0}")]
    Index(#[from] IndexError),

    /// Unknown log level
    #[error("Invalid log_level: '{0}'. Expected trace, info, warn or error.")]
    LogLevel(String),
}

/// Engine configuration file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Composite index definition (required)
    pub index: IndexDefinition,

    /// Record type served by the index; documents with another `_type` are
    /// kept but reported as type-incompatible
    #[serde(default)]
    pub record_type: Option<String>,

    /// Minimum log severity (default "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl EngineConfig {
    pub fn new(index: IndexDefinition) -> Self {
        Self {
            index,
            record_type: None,
            log_level: default_log_level(),
        }
    }

    /// Load and validate configuration from file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path)?;
        let config: EngineConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        self.index.validate()?;
        self.severity()?;
        Ok(())
    }

    /// Parsed log threshold
    pub fn severity(&self) -> ConfigResult<Severity> {
        Severity::parse(&self.log_level).ok_or_else(|| ConfigError::LogLevel(self.log_level.clone()))
    }
}
