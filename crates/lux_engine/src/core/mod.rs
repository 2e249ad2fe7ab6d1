//! # Core Engine Module
//!
//! Shared settings used by the engine and the tools built on it.

pub mod config;

pub use config::{Config, ConfigError, LoggingConfig, LuxConfig, QueryConfig, StageConfig};
