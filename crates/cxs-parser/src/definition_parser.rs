//! Condition type definition parser
//!
//! Parses condition type descriptors from YAML or JSON documents. A document
//! holds a single descriptor, a list of descriptors, or a mapping with a
//! `conditionTypes` list:
//!
//! ```yaml
//! conditionTypes:
//!   - metadata:
//!       id: profilePropertyCondition
//!       name: Profile property
//!     parameters:
//!       - id: propertyName
//!         type: string
//!     parentCondition:
//!       type: propertyCondition
//!       parameterValues:
//!         propertyName: "parameter::propertyName"
//! ```
//!
//! The identifier may also be given as a top level `id`.

use crate::error::{ParseError, Result};
use cxs_core::{Condition, ConditionType};
use serde::{Deserialize, Serialize};

/// Descriptive metadata of a condition type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefinitionMetadata {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub system_tags: Vec<String>,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

/// Declared parameter of a condition type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterDefinition {
    pub id: String,
    #[serde(rename = "type", default)]
    pub parameter_type: Option<String>,
    #[serde(default)]
    pub multivalued: bool,
}

/// A parsed condition type descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionTypeDefinition {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub metadata: DefinitionMetadata,
    #[serde(default)]
    pub condition_evaluator: Option<String>,
    #[serde(default)]
    pub query_builder: Option<String>,
    #[serde(default)]
    pub parent_condition: Option<Condition>,
    #[serde(default)]
    pub parameters: Vec<ParameterDefinition>,
}

impl ConditionTypeDefinition {
    /// Identifier, from `metadata.id` or the top level `id`
    pub fn type_id(&self) -> Option<&str> {
        self.metadata
            .id
            .as_deref()
            .or(self.id.as_deref())
            .filter(|id| !id.trim().is_empty())
    }

    pub fn is_enabled(&self) -> bool {
        self.metadata.enabled
    }

    /// Build the runtime condition type
    pub fn to_condition_type(&self) -> Result<ConditionType> {
        let id = self.type_id().ok_or_else(|| ParseError::MissingField {
            field: "metadata.id".to_string(),
        })?;
        Ok(ConditionType {
            id: id.to_string(),
            condition_evaluator: self.condition_evaluator.clone(),
            query_builder: self.query_builder.clone(),
            parent_condition: self.parent_condition.clone(),
        })
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DefinitionDocument {
    Wrapped {
        #[serde(rename = "conditionTypes")]
        condition_types: Vec<ConditionTypeDefinition>,
    },
    List(Vec<ConditionTypeDefinition>),
    Single(Box<ConditionTypeDefinition>),
}

impl DefinitionDocument {
    fn into_definitions(self) -> Vec<ConditionTypeDefinition> {
        match self {
            DefinitionDocument::Wrapped { condition_types } => condition_types,
            DefinitionDocument::List(list) => list,
            DefinitionDocument::Single(single) => vec![*single],
        }
    }
}

/// Condition type definition parser
pub struct DefinitionParser;

impl DefinitionParser {
    /// Parse definitions from a YAML string (JSON is valid YAML too)
    pub fn parse(yaml_str: &str) -> Result<Vec<ConditionTypeDefinition>> {
        let document: DefinitionDocument = serde_yaml::from_str(yaml_str)?;
        Self::validate(document.into_definitions())
    }

    /// Parse definitions from a JSON string
    pub fn parse_json(json_str: &str) -> Result<Vec<ConditionTypeDefinition>> {
        let document: DefinitionDocument = serde_json::from_str(json_str)?;
        Self::validate(document.into_definitions())
    }

    /// Parse and convert to runtime condition types, skipping disabled ones
    pub fn parse_condition_types(yaml_str: &str) -> Result<Vec<ConditionType>> {
        Self::parse(yaml_str)?
            .iter()
            .filter(|definition| definition.is_enabled())
            .map(ConditionTypeDefinition::to_condition_type)
            .collect()
    }

    fn validate(definitions: Vec<ConditionTypeDefinition>) -> Result<Vec<ConditionTypeDefinition>> {
        for (index, definition) in definitions.iter().enumerate() {
            let id = definition.type_id().ok_or_else(|| ParseError::MissingField {
                field: format!("conditionTypes[{}].metadata.id", index),
            })?;

            if definition.condition_evaluator.is_none()
                && definition.query_builder.is_none()
                && definition.parent_condition.is_none()
            {
                return Err(ParseError::InvalidValue {
                    field: format!("conditionTypes[{}]", index),
                    message: format!(
                        "condition type '{}' needs a conditionEvaluator, a queryBuilder or a parentCondition",
                        id
                    ),
                });
            }

            for key in [&definition.condition_evaluator, &definition.query_builder]
                .into_iter()
                .flatten()
            {
                if key.trim().is_empty() {
                    return Err(ParseError::InvalidValue {
                        field: format!("conditionTypes[{}]", index),
                        message: format!("condition type '{}' has an empty handler key", id),
                    });
                }
            }
        }
        Ok(definitions)
    }
}
