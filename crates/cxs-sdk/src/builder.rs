//! Builder pattern for ConditionEngine

use crate::config::EngineConfig;
use crate::engine::ConditionEngine;
use crate::error::Result;
use crate::logging::init_tracing;
use cxs_runtime::HitCounter;
use std::path::PathBuf;
use std::sync::Arc;

/// Builder for ConditionEngine
///
/// # Example
///
/// ```rust,ignore
/// use cxs_sdk::ConditionEngineBuilder;
///
/// let engine = ConditionEngineBuilder::new()
///     .timezone_offset_seconds(3600)
///     .add_definition_file("conditions/custom.yaml")
///     .with_hit_counter(Arc::new(ElasticsearchCounter::new(client)))
///     .build()?;
/// ```
pub struct ConditionEngineBuilder {
    config: EngineConfig,
    definitions: Vec<(String, String)>,
    hit_counter: Option<Arc<dyn HitCounter>>,
}

impl ConditionEngineBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            config: EngineConfig::new(),
            definitions: Vec::new(),
            hit_counter: None,
        }
    }

    /// Replace the whole configuration, e.g. one loaded with
    /// [`EngineConfig::from_yaml_file`]
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn timezone_offset_seconds(mut self, seconds: i32) -> Self {
        self.config.timezone_offset_seconds = seconds;
        self
    }

    pub fn max_condition_depth(mut self, depth: Option<usize>) -> Self {
        self.config.max_condition_depth = depth;
        self
    }

    /// Enable metrics
    pub fn enable_metrics(mut self, enable: bool) -> Self {
        self.config.enable_metrics = enable;
        self
    }

    pub fn use_builtin_definitions(mut self, enable: bool) -> Self {
        self.config.use_builtin_definitions = enable;
        self
    }

    /// Add a condition type definition file
    pub fn add_definition_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.definition_files.push(path.into());
        self
    }

    /// Add condition type definitions directly (alternative to a file)
    ///
    /// # Arguments
    /// * `plugin` - Plugin id the types are registered under
    /// * `content` - YAML or JSON descriptors
    pub fn add_definitions(mut self, plugin: impl Into<String>, content: impl Into<String>) -> Self {
        self.definitions.push((plugin.into(), content.into()));
        self
    }

    /// Set the counter used by `count`
    pub fn with_hit_counter(mut self, hit_counter: Arc<dyn HitCounter>) -> Self {
        self.hit_counter = Some(hit_counter);
        self
    }

    /// Set the log level and install the tracing subscriber on build
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.config.log_level = Some(level.into());
        self
    }

    /// Build the condition engine
    pub fn build(self) -> Result<ConditionEngine> {
        if let Some(level) = &self.config.log_level {
            init_tracing(Some(level.as_str()));
        }

        let engine = ConditionEngine::with_hit_counter(self.config, self.hit_counter)?;
        for (plugin, content) in &self.definitions {
            let ids = engine.load_definitions(plugin, content)?;
            tracing::debug!(plugin = %plugin, count = ids.len(), "Loaded inline condition type definitions");
        }
        Ok(engine)
    }
}

impl Default for ConditionEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let engine = ConditionEngineBuilder::new().enable_metrics(true).build();
        assert!(engine.is_ok());
    }

    #[test]
    fn test_builder_with_multiple_options() {
        let builder = ConditionEngineBuilder::new()
            .add_definition_file("a.yaml")
            .add_definition_file("b.yaml")
            .timezone_offset_seconds(3600)
            .max_condition_depth(Some(16))
            .enable_metrics(false);

        assert_eq!(builder.config.definition_files.len(), 2);
        assert_eq!(builder.config.timezone_offset_seconds, 3600);
        assert_eq!(builder.config.max_condition_depth, Some(16));
        assert!(!builder.config.enable_metrics);
    }

    #[test]
    fn test_invalid_inline_definitions_fail_the_build() {
        let result = ConditionEngineBuilder::new()
            .add_definitions("broken", "conditionTypes:\n  - metadata:\n      id: lonelyCondition\n")
            .build();
        assert!(matches!(result, Err(crate::SdkError::ParseError(_))));
    }
}
