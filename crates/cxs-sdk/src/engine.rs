//! Core ConditionEngine implementation

use crate::builtin::register_builtin;
use crate::config::EngineConfig;
use crate::error::{Result, SdkError};
use anyhow::Context as _;
use cxs_core::{Condition, ConditionType, Item};
use cxs_parser::DefinitionParser;
use cxs_runtime::{
    ConditionEvaluator, ConditionEvaluatorDispatcher, ConditionQueryBuilder, ConditionQueryBuilderDispatcher,
    ConditionTypeRegistry, Context, HandlerRegistry, HitCounter, InMemoryConditionTypeRegistry, MetricsCollector,
    MetricsSnapshot, ParameterResolver, QueryFragment, ScriptExecutor,
};
use std::path::Path;
use std::sync::Arc;

/// What [`ConditionEngine::remove_plugin`] took out, ids sorted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemovedPlugin {
    pub condition_types: Vec<String>,
    pub evaluators: Vec<String>,
    pub query_builders: Vec<String>,
}

impl RemovedPlugin {
    pub fn is_empty(&self) -> bool {
        self.condition_types.is_empty() && self.evaluators.is_empty() && self.query_builders.is_empty()
    }
}

/// Condition evaluation and query building behind one handle.
///
/// Owns the condition type registry, both handler registries, the script
/// cache and the metrics collector. Plugins can be registered and removed
/// while evaluations run on other threads.
pub struct ConditionEngine {
    types: Arc<InMemoryConditionTypeRegistry>,
    evaluators: Arc<HandlerRegistry<dyn ConditionEvaluator>>,
    builders: Arc<HandlerRegistry<dyn ConditionQueryBuilder>>,
    scripts: Arc<ScriptExecutor>,
    metrics: Option<Arc<MetricsCollector>>,
    evaluator: ConditionEvaluatorDispatcher,
    query_builder: ConditionQueryBuilderDispatcher,
    config: EngineConfig,
}

impl ConditionEngine {
    /// Create an engine from configuration, without a hit counter
    pub fn new(config: EngineConfig) -> Result<Self> {
        Self::with_hit_counter(config, None)
    }

    pub(crate) fn with_hit_counter(config: EngineConfig, hit_counter: Option<Arc<dyn HitCounter>>) -> Result<Self> {
        let options = config.dispatch_options()?;
        let types = Arc::new(InMemoryConditionTypeRegistry::new());
        let evaluators: Arc<HandlerRegistry<dyn ConditionEvaluator>> = Arc::new(HandlerRegistry::new());
        let builders: Arc<HandlerRegistry<dyn ConditionQueryBuilder>> = Arc::new(HandlerRegistry::new());
        let scripts = Arc::new(ScriptExecutor::new());
        let metrics = config.enable_metrics.then(|| Arc::new(MetricsCollector::new()));

        let builtin_types = register_builtin(&types, &evaluators, &builders, config.use_builtin_definitions)?;
        for path in &config.definition_files {
            let ids = load_definition_file(&types, path)
                .map_err(|e| SdkError::InvalidDefinitionFile(format!("{:#}", e)))?;
            tracing::info!(file = %path.display(), count = ids.len(), "Loaded condition type definitions");
        }

        let resolver = ParameterResolver::new(scripts.clone());
        let mut evaluator = ConditionEvaluatorDispatcher::new(types.clone(), evaluators.clone(), resolver.clone())
            .with_options(options);
        let mut query_builder =
            ConditionQueryBuilderDispatcher::new(types.clone(), builders.clone(), resolver).with_options(options);
        if let Some(metrics) = &metrics {
            evaluator = evaluator.with_metrics(metrics.clone());
            query_builder = query_builder.with_metrics(metrics.clone());
        }
        if let Some(hit_counter) = hit_counter {
            query_builder = query_builder.with_hit_counter(hit_counter);
        }

        tracing::info!(
            condition_types = types.len(),
            builtin_types,
            evaluators = evaluators.len(),
            query_builders = builders.len(),
            "Condition engine ready"
        );

        Ok(Self {
            types,
            evaluators,
            builders,
            scripts,
            metrics,
            evaluator,
            query_builder,
            config,
        })
    }

    // ========== Evaluation ==========

    pub fn evaluate(&self, condition: &Condition, item: &Item) -> Result<bool> {
        Ok(self.evaluator.eval(condition, item)?)
    }

    pub fn evaluate_with_context(&self, condition: &Condition, item: &Item, context: &Context) -> Result<bool> {
        Ok(self.evaluator.eval_with_context(condition, item, context)?)
    }

    // ========== Query Building ==========

    pub fn build_filter(&self, condition: &Condition) -> Result<QueryFragment> {
        Ok(self.query_builder.build_filter(condition)?)
    }

    pub fn build_filter_with_context(&self, condition: &Condition, context: &Context) -> Result<QueryFragment> {
        Ok(self.query_builder.build_filter_with_context(condition, context)?)
    }

    /// Full search request body for a condition
    pub fn get_query(&self, condition: &Condition) -> Result<serde_json::Value> {
        Ok(self.query_builder.get_query(condition)?)
    }

    /// Count matching items; needs a hit counter set on the builder
    pub fn count(&self, condition: &Condition) -> Result<u64> {
        Ok(self.query_builder.count(condition)?)
    }

    pub fn count_with_context(&self, condition: &Condition, context: &Context) -> Result<u64> {
        Ok(self.query_builder.count_with_context(condition, context)?)
    }

    // ========== Plugins ==========

    /// Register condition type descriptors (YAML or JSON) under a plugin id.
    /// Returns the ids of the registered types.
    pub fn load_definitions(&self, plugin: &str, content: &str) -> Result<Vec<String>> {
        let condition_types = DefinitionParser::parse_condition_types(content)?;
        Ok(condition_types
            .into_iter()
            .map(|condition_type| self.types.register_for_plugin(plugin, condition_type).id.clone())
            .collect())
    }

    pub fn register_condition_type(&self, plugin: &str, condition_type: ConditionType) -> Arc<ConditionType> {
        self.types.register_for_plugin(plugin, condition_type)
    }

    pub fn register_evaluator(&self, plugin: &str, key: impl Into<String>, evaluator: Arc<dyn ConditionEvaluator>) {
        self.evaluators.add_for_plugin(plugin, key, evaluator);
    }

    pub fn register_query_builder(
        &self,
        plugin: &str,
        key: impl Into<String>,
        builder: Arc<dyn ConditionQueryBuilder>,
    ) {
        self.builders.add_for_plugin(plugin, key, builder);
    }

    /// Remove every condition type and handler a plugin registered.
    ///
    /// Conditions referencing the removed types or handlers stop matching
    /// (evaluation) or match everything (query building) from then on.
    ///
    /// Each registry drops the plugin's entries atomically, but the type,
    /// evaluator and query builder registries are emptied one after another.
    /// A dispatch running concurrently may see a type whose handlers are
    /// already gone and takes the missing-handler fallback for it.
    pub fn remove_plugin(&self, plugin: &str) -> RemovedPlugin {
        let removed = RemovedPlugin {
            condition_types: self.types.remove_plugin(plugin),
            evaluators: self.evaluators.remove_plugin(plugin),
            query_builders: self.builders.remove_plugin(plugin),
        };
        tracing::info!(
            plugin,
            condition_types = removed.condition_types.len(),
            evaluators = removed.evaluators.len(),
            query_builders = removed.query_builders.len(),
            "Removed plugin"
        );
        removed
    }

    pub fn condition_type(&self, id: &str) -> Option<Arc<ConditionType>> {
        self.types.lookup(id)
    }

    pub fn condition_type_ids(&self) -> Vec<String> {
        self.types.ids()
    }

    /// Deserialize a condition tree from its JSON form
    pub fn parse_condition(json: &str) -> Result<Condition> {
        serde_json::from_str(json).map_err(|e| SdkError::InvalidCondition(e.to_string()))
    }

    // ========== Introspection ==========

    /// Snapshot of the handler metrics, `None` when metrics are disabled
    pub fn metrics(&self) -> Option<MetricsSnapshot> {
        self.metrics.as_ref().map(|m| m.snapshot())
    }

    pub fn reset_metrics(&self) {
        if let Some(metrics) = &self.metrics {
            metrics.reset_all();
        }
    }

    pub fn script_cache_size(&self) -> usize {
        self.scripts.cache_size()
    }

    pub fn clear_script_cache(&self) {
        self.scripts.clear_cache();
    }

    pub fn evaluator_dispatcher(&self) -> &ConditionEvaluatorDispatcher {
        &self.evaluator
    }

    pub fn query_builder_dispatcher(&self) -> &ConditionQueryBuilderDispatcher {
        &self.query_builder
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

/// Register the definitions of one file under a plugin named after its path
fn load_definition_file(types: &InMemoryConditionTypeRegistry, path: &Path) -> anyhow::Result<Vec<String>> {
    let content = std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let condition_types = DefinitionParser::parse_condition_types(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    let plugin = path.display().to_string();
    Ok(condition_types
        .into_iter()
        .map(|condition_type| types.register_for_plugin(&plugin, condition_type).id.clone())
        .collect())
}
