//! Common test utilities for runtime integration tests

#![allow(dead_code)]

use cxs_core::{Condition, ConditionType, Value};
use cxs_runtime::{
    BooleanConditionEvaluator, BooleanConditionQueryBuilder, ConditionEvaluator,
    ConditionEvaluatorDispatcher, ConditionQueryBuilder, ConditionQueryBuilderDispatcher,
    Context, DispatchOptions, HandlerRegistry, HitCounter, IdsConditionEvaluator,
    IdsConditionQueryBuilder, InMemoryConditionTypeRegistry, MatchAllConditionEvaluator,
    MatchAllConditionQueryBuilder, MetricsCollector, NestedConditionEvaluator,
    NestedConditionQueryBuilder, NotConditionEvaluator, NotConditionQueryBuilder,
    ParameterResolver, PropertyConditionEvaluator, PropertyConditionQueryBuilder,
    QueryFragment, Result, ScriptExecutor,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Hit counter returning a fixed count and remembering the queries it saw
#[derive(Default)]
pub struct RecordingHitCounter {
    pub hits: u64,
    pub queries: Mutex<Vec<QueryFragment>>,
}

impl HitCounter for RecordingHitCounter {
    fn count_hits(&self, query: &QueryFragment) -> Result<u64> {
        self.queries.lock().unwrap().push(query.clone());
        Ok(self.hits)
    }
}

/// Registries and dispatchers wired with the standard handlers
pub struct Fixture {
    pub types: Arc<InMemoryConditionTypeRegistry>,
    pub evaluators: Arc<HandlerRegistry<dyn ConditionEvaluator>>,
    pub builders: Arc<HandlerRegistry<dyn ConditionQueryBuilder>>,
    pub scripts: Arc<ScriptExecutor>,
    pub metrics: Arc<MetricsCollector>,
    pub hit_counter: Arc<RecordingHitCounter>,
    pub options: DispatchOptions,
}

impl Fixture {
    pub fn new() -> Self {
        let fixture = Self {
            types: Arc::new(InMemoryConditionTypeRegistry::new()),
            evaluators: Arc::new(HandlerRegistry::new()),
            builders: Arc::new(HandlerRegistry::new()),
            scripts: Arc::new(ScriptExecutor::new()),
            metrics: Arc::new(MetricsCollector::new()),
            hit_counter: Arc::new(RecordingHitCounter {
                hits: 42,
                ..RecordingHitCounter::default()
            }),
            options: DispatchOptions::default(),
        };
        fixture.register_standard_types();
        fixture
    }

    pub fn with_options(mut self, options: DispatchOptions) -> Self {
        self.options = options;
        self
    }

    fn register_standard_types(&self) {
        for (id, family) in [
            ("propertyCondition", "propertyCondition"),
            ("booleanCondition", "booleanCondition"),
            ("notCondition", "notCondition"),
            ("matchAllCondition", "matchAllCondition"),
            ("nestedCondition", "nestedCondition"),
            ("idsCondition", "idsCondition"),
        ] {
            self.types.register(
                ConditionType::new(id)
                    .with_evaluator(format!("{}Evaluator", family))
                    .with_query_builder(format!("{}QueryBuilder", family)),
            );
        }

        self.types.register(
            ConditionType::new("ageAtLeastCondition").with_parent(
                Condition::new("propertyCondition")
                    .with_parameter("propertyName", "properties.age")
                    .with_parameter("comparisonOperator", "greaterThanOrEqualTo")
                    .with_parameter("propertyValueInteger", "parameter::minAge"),
            ),
        );
        self.types.register(
            ConditionType::new("profileSegmentCondition").with_parent(
                Condition::new("propertyCondition")
                    .with_parameter("propertyName", "segments")
                    .with_parameter("comparisonOperator", "parameter::matchType")
                    .with_parameter("propertyValues", "parameter::segments"),
            ),
        );
        self.types.register(
            ConditionType::new("eventTypeCondition").with_parent(
                Condition::new("propertyCondition")
                    .with_parameter("propertyName", "eventType")
                    .with_parameter("comparisonOperator", "equals")
                    .with_parameter("propertyValue", "parameter::eventTypeId"),
            ),
        );

        self.evaluators.add("propertyConditionEvaluator", Arc::new(PropertyConditionEvaluator));
        self.evaluators.add("booleanConditionEvaluator", Arc::new(BooleanConditionEvaluator));
        self.evaluators.add("notConditionEvaluator", Arc::new(NotConditionEvaluator));
        self.evaluators.add("matchAllConditionEvaluator", Arc::new(MatchAllConditionEvaluator));
        self.evaluators.add("nestedConditionEvaluator", Arc::new(NestedConditionEvaluator));
        self.evaluators.add("idsConditionEvaluator", Arc::new(IdsConditionEvaluator));

        self.builders.add("propertyConditionQueryBuilder", Arc::new(PropertyConditionQueryBuilder));
        self.builders.add("booleanConditionQueryBuilder", Arc::new(BooleanConditionQueryBuilder));
        self.builders.add("notConditionQueryBuilder", Arc::new(NotConditionQueryBuilder));
        self.builders.add("matchAllConditionQueryBuilder", Arc::new(MatchAllConditionQueryBuilder));
        self.builders.add("nestedConditionQueryBuilder", Arc::new(NestedConditionQueryBuilder));
        self.builders.add("idsConditionQueryBuilder", Arc::new(IdsConditionQueryBuilder));
    }

    pub fn resolver(&self) -> ParameterResolver {
        ParameterResolver::new(self.scripts.clone())
    }

    pub fn evaluator(&self) -> ConditionEvaluatorDispatcher {
        ConditionEvaluatorDispatcher::new(self.types.clone(), self.evaluators.clone(), self.resolver())
            .with_metrics(self.metrics.clone())
            .with_options(self.options)
    }

    pub fn query_builder(&self) -> ConditionQueryBuilderDispatcher {
        ConditionQueryBuilderDispatcher::new(self.types.clone(), self.builders.clone(), self.resolver())
            .with_hit_counter(self.hit_counter.clone())
            .with_metrics(self.metrics.clone())
            .with_options(self.options)
    }
}

/// A `propertyCondition`
pub fn property(name: &str, operator: &str) -> Condition {
    Condition::new("propertyCondition")
        .with_parameter("propertyName", name)
        .with_parameter("comparisonOperator", operator)
}

pub fn boolean(operator: &str, sub_conditions: Vec<Condition>) -> Condition {
    Condition::new("booleanCondition")
        .with_parameter("operator", operator)
        .with_parameter("subConditions", sub_conditions)
}

pub fn not(sub_condition: Condition) -> Condition {
    Condition::new("notCondition").with_parameter("subCondition", sub_condition)
}

pub fn context(entries: &[(&str, Value)]) -> Context {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect::<HashMap<_, _>>()
}
