//! Built-in condition types and handlers
//!
//! Everything here is registered under the [`BUILTIN_PLUGIN`] id, so it can
//! be removed as a whole like any other plugin.

use crate::error::Result;
use cxs_parser::DefinitionParser;
use cxs_runtime::{
    BooleanConditionEvaluator, BooleanConditionQueryBuilder, ConditionEvaluator, ConditionQueryBuilder,
    HandlerRegistry, IdsConditionEvaluator, IdsConditionQueryBuilder, InMemoryConditionTypeRegistry,
    MatchAllConditionEvaluator, MatchAllConditionQueryBuilder, NestedConditionEvaluator,
    NestedConditionQueryBuilder, NotConditionEvaluator, NotConditionQueryBuilder,
    PropertyConditionEvaluator, PropertyConditionQueryBuilder,
};
use std::sync::Arc;

pub const BUILTIN_PLUGIN: &str = "builtin";

/// Built-in condition type descriptors
pub const BUILTIN_DEFINITIONS: &str = r#"
conditionTypes:
  - metadata:
      id: booleanCondition
      name: Boolean
    conditionEvaluator: booleanConditionEvaluator
    queryBuilder: booleanConditionQueryBuilder
    parameters:
      - id: operator
        type: string
      - id: subConditions
        type: Condition
        multivalued: true

  - metadata:
      id: notCondition
      name: Not
    conditionEvaluator: notConditionEvaluator
    queryBuilder: notConditionQueryBuilder
    parameters:
      - id: subCondition
        type: Condition

  - metadata:
      id: matchAllCondition
      name: Match all
    conditionEvaluator: matchAllConditionEvaluator
    queryBuilder: matchAllConditionQueryBuilder

  - metadata:
      id: propertyCondition
      name: Property
    conditionEvaluator: propertyConditionEvaluator
    queryBuilder: propertyConditionQueryBuilder
    parameters: &propertyParameters
      - id: propertyName
        type: string
      - id: comparisonOperator
        type: comparisonOperator
      - id: propertyValue
        type: string
      - id: propertyValueInteger
        type: integer
      - id: propertyValueDouble
        type: float
      - id: propertyValueDate
        type: date
      - id: propertyValueDateExpr
        type: string
      - id: propertyValues
        type: string
        multivalued: true
      - id: propertyValuesInteger
        type: integer
        multivalued: true
      - id: propertyValuesDouble
        type: float
        multivalued: true
      - id: propertyValuesDate
        type: date
        multivalued: true
      - id: propertyValuesDateExpr
        type: string
        multivalued: true

  - metadata:
      id: profilePropertyCondition
      name: Profile property
      systemTags: [profileCondition]
    conditionEvaluator: propertyConditionEvaluator
    queryBuilder: propertyConditionQueryBuilder
    parameters: *propertyParameters

  - metadata:
      id: sessionPropertyCondition
      name: Session property
      systemTags: [sessionCondition]
    conditionEvaluator: propertyConditionEvaluator
    queryBuilder: propertyConditionQueryBuilder
    parameters: *propertyParameters

  - metadata:
      id: eventPropertyCondition
      name: Event property
      systemTags: [eventCondition]
    conditionEvaluator: propertyConditionEvaluator
    queryBuilder: propertyConditionQueryBuilder
    parameters: *propertyParameters

  - metadata:
      id: nestedCondition
      name: Nested
    conditionEvaluator: nestedConditionEvaluator
    queryBuilder: nestedConditionQueryBuilder
    parameters:
      - id: path
        type: string
      - id: subCondition
        type: Condition

  - metadata:
      id: idsCondition
      name: Identifiers
    conditionEvaluator: idsConditionEvaluator
    queryBuilder: idsConditionQueryBuilder
    parameters:
      - id: ids
        type: string
        multivalued: true
      - id: match
        type: boolean

  - metadata:
      id: eventTypeCondition
      name: Event type
      systemTags: [eventCondition]
    parameters:
      - id: eventTypeId
        type: string
    parentCondition:
      type: eventPropertyCondition
      parameterValues:
        propertyName: eventType
        comparisonOperator: equals
        propertyValue: "parameter::eventTypeId"

  - metadata:
      id: profileSegmentCondition
      name: Profile segment
      systemTags: [profileCondition]
    parameters:
      - id: segments
        type: string
        multivalued: true
      - id: matchType
        type: comparisonOperator
    parentCondition:
      type: profilePropertyCondition
      parameterValues:
        propertyName: segments
        comparisonOperator: "parameter::matchType"
        propertyValues: "parameter::segments"
"#;

/// Register the built-in handlers, and the built-in condition types when
/// `with_definitions` is set. Returns the number of condition types added.
pub fn register_builtin(
    types: &InMemoryConditionTypeRegistry,
    evaluators: &HandlerRegistry<dyn ConditionEvaluator>,
    builders: &HandlerRegistry<dyn ConditionQueryBuilder>,
    with_definitions: bool,
) -> Result<usize> {
    let handlers: [(&str, Arc<dyn ConditionEvaluator>, Arc<dyn ConditionQueryBuilder>); 6] = [
        ("booleanCondition", Arc::new(BooleanConditionEvaluator), Arc::new(BooleanConditionQueryBuilder)),
        ("notCondition", Arc::new(NotConditionEvaluator), Arc::new(NotConditionQueryBuilder)),
        ("matchAllCondition", Arc::new(MatchAllConditionEvaluator), Arc::new(MatchAllConditionQueryBuilder)),
        ("propertyCondition", Arc::new(PropertyConditionEvaluator), Arc::new(PropertyConditionQueryBuilder)),
        ("nestedCondition", Arc::new(NestedConditionEvaluator), Arc::new(NestedConditionQueryBuilder)),
        ("idsCondition", Arc::new(IdsConditionEvaluator), Arc::new(IdsConditionQueryBuilder)),
    ];
    for (family, evaluator, builder) in handlers {
        evaluators.add_for_plugin(BUILTIN_PLUGIN, format!("{}Evaluator", family), evaluator);
        builders.add_for_plugin(BUILTIN_PLUGIN, format!("{}QueryBuilder", family), builder);
    }

    if !with_definitions {
        return Ok(0);
    }

    let condition_types = DefinitionParser::parse_condition_types(BUILTIN_DEFINITIONS)?;
    let count = condition_types.len();
    for condition_type in condition_types {
        types.register_for_plugin(BUILTIN_PLUGIN, condition_type);
    }
    tracing::debug!(count, "Registered built-in condition types");
    Ok(count)
}
