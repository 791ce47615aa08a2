//! Items that conditions are evaluated against
//!
//! An item is a profile, a session, an event or any other stored object.
//! Its fields are addressed with dot-notation paths such as
//! `properties.age` or `systemProperties.goals.purchase`.

use crate::types::Value;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Target object of a condition evaluation
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub item_type: String,
    pub item_id: String,
    #[serde(default, flatten)]
    pub fields: HashMap<String, Value>,
}

impl Item {
    pub fn new(item_type: impl Into<String>, item_id: impl Into<String>) -> Self {
        Self {
            item_type: item_type.into(),
            item_id: item_id.into(),
            fields: HashMap::new(),
        }
    }

    pub fn profile(item_id: impl Into<String>) -> Self {
        Self::new("profile", item_id)
    }

    pub fn session(item_id: impl Into<String>) -> Self {
        Self::new("session", item_id)
    }

    /// An event item; the event type is stored in the `eventType` field
    pub fn event(item_id: impl Into<String>, event_type: impl Into<String>) -> Self {
        let event_type: String = event_type.into();
        Self::new("event", item_id).with_field("eventType", event_type)
    }

    /// Set a top level field
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Set an entry of the `properties` map
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        let properties = self
            .fields
            .entry("properties".to_string())
            .or_insert_with(|| Value::Object(HashMap::new()));
        if !matches!(properties, Value::Object(_)) {
            *properties = Value::Object(HashMap::new());
        }
        if let Value::Object(map) = properties {
            map.insert(name.into(), value.into());
        }
        self
    }

    /// Look a value up by dotted path. `itemId` and `itemType` address the
    /// item identity. Missing segments and non-object intermediates yield `None`.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        let mut current = self.fields.get(first)?;
        for segment in segments {
            current = match current {
                Value::Object(map) => map.get(segment)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Like [`Item::get`], with the identity pseudo fields resolved as values
    pub fn get_value(&self, path: &str) -> Option<Value> {
        match path {
            "itemId" => Some(Value::String(self.item_id.clone())),
            "itemType" => Some(Value::String(self.item_type.clone())),
            _ => self.get(path).filter(|v| !v.is_null()).cloned(),
        }
    }
}
