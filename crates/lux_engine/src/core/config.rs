//! # Engine Configuration
//!
//! Settings that shape how scenes are opened and queried. Loaded from
//! `lux.toml` (or `.ron`) through the [`Config`] trait; every section falls
//! back to its defaults when absent.
//!
//! ```toml
//! [logging]
//! level = "debug"
//!
//! [query]
//! default_mode = "consult_model_hierarchy_cache"
//! default_root = "/World"
//!
//! [stage]
//! load = "none"
//! ```

use crate::lux::ComputeMode;
use crate::scene::{LoadPolicy, ScenePath};
use serde::{Deserialize, Serialize};

pub use crate::config::{Config, ConfigError};

const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

/// # Logging Configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// # Query Configuration
///
/// Defaults for light-list queries that do not name their own root or mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Cache mode used when none is given
    pub default_mode: ComputeMode,
    /// Light-list root used when none is given
    pub default_root: String,
}

impl QueryConfig {
    /// Parsed default root
    pub fn root(&self) -> Result<ScenePath, ConfigError> {
        ScenePath::parse(&self.default_root)
            .map_err(|e| ConfigError::Invalid(format!("query.default_root: {e}")))
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_mode: ComputeMode::default(),
            default_root: "/World".to_string(),
        }
    }
}

/// # Stage Configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageConfig {
    /// Which payloads are loaded when a scene is opened
    pub load: LoadPolicy,
}

/// # Complete Configuration
///
/// Top-level settings applications and tools should use.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LuxConfig {
    /// Logging settings
    pub logging: LoggingConfig,
    /// Query defaults
    pub query: QueryConfig,
    /// Stage opening settings
    pub stage: StageConfig,
}

impl LuxConfig {
    /// Default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.logging.level = level.into();
        self
    }

    /// Set the default compute mode
    pub fn with_mode(mut self, mode: ComputeMode) -> Self {
        self.query.default_mode = mode;
        self
    }

    /// Set the default light-list root
    pub fn with_root(mut self, root: impl Into<String>) -> Self {
        self.query.default_root = root.into();
        self
    }

    /// Set the payload load policy
    pub fn with_load_policy(mut self, load: LoadPolicy) -> Self {
        self.stage.load = load;
        self
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let level = self.logging.level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "logging.level must be one of {LOG_LEVELS:?}, got '{}'",
                self.logging.level
            )));
        }
        self.query.root()?;
        Ok(())
    }
}

impl Config for LuxConfig {}
