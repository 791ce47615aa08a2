//! Configuration types for ConditionEngine

use crate::error::{Result, SdkError};
use anyhow::Context as _;
use chrono::FixedOffset;
use cxs_runtime::{DispatchOptions, DEFAULT_MAX_DEPTH};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main engine configuration
///
/// ```yaml
/// timezone_offset_seconds: 3600
/// max_condition_depth: 64
/// enable_metrics: true
/// definition_files:
///   - conditions/custom.yaml
/// log_level: debug
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Offset from UTC used for day boundaries and date rounding
    pub timezone_offset_seconds: i32,

    /// Maximum nesting depth of a condition tree, `None` for unbounded
    pub max_condition_depth: Option<usize>,

    /// Enable metrics collection
    pub enable_metrics: bool,

    /// Register the built-in condition type definitions
    pub use_builtin_definitions: bool,

    /// Extra condition type definition files (YAML or JSON)
    pub definition_files: Vec<PathBuf>,

    /// Log level for [`crate::init_tracing`], `RUST_LOG` takes precedence
    pub log_level: Option<String>,
}

impl EngineConfig {
    /// Create a new engine configuration
    pub fn new() -> Self {
        Self {
            timezone_offset_seconds: 0,
            max_condition_depth: Some(DEFAULT_MAX_DEPTH),
            enable_metrics: true,
            use_builtin_definitions: true,
            definition_files: Vec::new(),
            log_level: None,
        }
    }

    /// Load a configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))
            .map_err(|e| SdkError::ConfigError(format!("{:#}", e)))?;
        Self::from_yaml_str(&content)
            .map_err(|e| SdkError::ConfigError(format!("{} ({})", e, path.display())))
    }

    /// Parse a configuration from a YAML string
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: EngineConfig = serde_yaml::from_str(content)
            .map_err(|e| SdkError::ConfigError(format!("Invalid engine config: {}", e)))?;
        config.timezone()?;
        Ok(config)
    }

    /// Evaluation timezone
    pub fn timezone(&self) -> Result<FixedOffset> {
        FixedOffset::east_opt(self.timezone_offset_seconds).ok_or_else(|| {
            SdkError::ConfigError(format!(
                "timezone offset out of range: {} seconds",
                self.timezone_offset_seconds
            ))
        })
    }

    /// Dispatcher options derived from this configuration
    pub fn dispatch_options(&self) -> Result<DispatchOptions> {
        Ok(DispatchOptions::default()
            .with_timezone(self.timezone()?)
            .with_max_depth(self.max_condition_depth))
    }

    /// Set the timezone offset
    pub fn with_timezone_offset_seconds(mut self, seconds: i32) -> Self {
        self.timezone_offset_seconds = seconds;
        self
    }

    /// Set the maximum condition depth
    pub fn with_max_condition_depth(mut self, depth: Option<usize>) -> Self {
        self.max_condition_depth = depth;
        self
    }

    /// Enable metrics
    pub fn enable_metrics(mut self, enable: bool) -> Self {
        self.enable_metrics = enable;
        self
    }

    /// Register the built-in definitions
    pub fn use_builtin_definitions(mut self, enable: bool) -> Self {
        self.use_builtin_definitions = enable;
        self
    }

    /// Add a definition file
    pub fn with_definition_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.definition_files.push(path.into());
        self
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = Some(level.into());
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}
