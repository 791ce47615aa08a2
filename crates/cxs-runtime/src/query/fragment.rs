//! Backend query fragments
//!
//! A small model of the search backend query DSL, rendered to JSON with
//! [`QueryFragment::to_json`]:
//!
//! ```text
//! Term { field: "properties.gender", value: "female" }
//!   => {"term": {"properties.gender": "female"}}
//! ```

use cxs_core::{GeoDistanceType, GeoPoint, Value};
use serde_json::{json, Map, Value as JsonValue};

/// Bounds of a range query; dates are carried in their ISO-8601 form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RangeBounds {
    pub gt: Option<Value>,
    pub gte: Option<Value>,
    pub lt: Option<Value>,
    pub lte: Option<Value>,
}

impl RangeBounds {
    pub fn gt(value: impl Into<Value>) -> Self {
        Self {
            gt: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn gte(value: impl Into<Value>) -> Self {
        Self {
            gte: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn lt(value: impl Into<Value>) -> Self {
        Self {
            lt: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn lte(value: impl Into<Value>) -> Self {
        Self {
            lte: Some(value.into()),
            ..Self::default()
        }
    }

    /// Inclusive lower and upper bound
    pub fn between(low: impl Into<Value>, high: impl Into<Value>) -> Self {
        Self {
            gte: Some(low.into()),
            lte: Some(high.into()),
            ..Self::default()
        }
    }

    fn to_json(&self) -> JsonValue {
        let mut bounds = Map::new();
        for (name, bound) in [("gt", &self.gt), ("gte", &self.gte), ("lt", &self.lt), ("lte", &self.lte)] {
            if let Some(value) = bound {
                bounds.insert(name.to_string(), value.to_json());
            }
        }
        JsonValue::Object(bounds)
    }
}

/// Boolean combination of fragments
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoolQuery {
    pub must: Vec<QueryFragment>,
    pub should: Vec<QueryFragment>,
    pub must_not: Vec<QueryFragment>,
    pub filter: Vec<QueryFragment>,
    pub minimum_should_match: Option<u32>,
}

impl BoolQuery {
    fn to_json(&self) -> JsonValue {
        let mut body = Map::new();
        for (name, clauses) in [
            ("must", &self.must),
            ("should", &self.should),
            ("must_not", &self.must_not),
            ("filter", &self.filter),
        ] {
            if !clauses.is_empty() {
                body.insert(
                    name.to_string(),
                    JsonValue::Array(clauses.iter().map(QueryFragment::to_json).collect()),
                );
            }
        }
        if let Some(minimum) = self.minimum_should_match {
            body.insert("minimum_should_match".to_string(), json!(minimum));
        }
        JsonValue::Object(body)
    }
}

/// One node of a backend query
#[derive(Debug, Clone, PartialEq)]
pub enum QueryFragment {
    MatchAll,
    MatchNone,
    Term { field: String, value: Value },
    Terms { field: String, values: Vec<Value> },
    Range { field: String, bounds: RangeBounds },
    Exists { field: String },
    Prefix { field: String, value: String },
    Regexp { field: String, pattern: String },
    Bool(Box<BoolQuery>),
    GeoDistance {
        field: String,
        center: GeoPoint,
        meters: f64,
        distance_type: GeoDistanceType,
    },
    Ids { values: Vec<String> },
    Nested { path: String, query: Box<QueryFragment> },
}

impl QueryFragment {
    pub fn term(field: impl Into<String>, value: impl Into<Value>) -> Self {
        QueryFragment::Term {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn terms(field: impl Into<String>, values: Vec<Value>) -> Self {
        QueryFragment::Terms {
            field: field.into(),
            values,
        }
    }

    pub fn range(field: impl Into<String>, bounds: RangeBounds) -> Self {
        QueryFragment::Range {
            field: field.into(),
            bounds,
        }
    }

    pub fn exists(field: impl Into<String>) -> Self {
        QueryFragment::Exists { field: field.into() }
    }

    pub fn prefix(field: impl Into<String>, value: impl Into<String>) -> Self {
        QueryFragment::Prefix {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn regexp(field: impl Into<String>, pattern: impl Into<String>) -> Self {
        QueryFragment::Regexp {
            field: field.into(),
            pattern: pattern.into(),
        }
    }

    pub fn bool(query: BoolQuery) -> Self {
        QueryFragment::Bool(Box::new(query))
    }

    /// Every clause must match
    pub fn must(clauses: Vec<QueryFragment>) -> Self {
        Self::bool(BoolQuery {
            must: clauses,
            ..BoolQuery::default()
        })
    }

    /// At least one clause must match
    pub fn should(clauses: Vec<QueryFragment>) -> Self {
        Self::bool(BoolQuery {
            should: clauses,
            minimum_should_match: Some(1),
            ..BoolQuery::default()
        })
    }

    /// No clause may match
    pub fn must_not(clauses: Vec<QueryFragment>) -> Self {
        Self::bool(BoolQuery {
            must_not: clauses,
            ..BoolQuery::default()
        })
    }

    pub fn not(query: QueryFragment) -> Self {
        Self::must_not(vec![query])
    }

    pub fn nested(path: impl Into<String>, query: QueryFragment) -> Self {
        QueryFragment::Nested {
            path: path.into(),
            query: Box::new(query),
        }
    }

    /// Render as backend query DSL
    pub fn to_json(&self) -> JsonValue {
        match self {
            QueryFragment::MatchAll => json!({ "match_all": {} }),
            QueryFragment::MatchNone => json!({ "match_none": {} }),
            QueryFragment::Term { field, value } => json!({ "term": { field: value.to_json() } }),
            QueryFragment::Terms { field, values } => json!({
                "terms": { field: values.iter().map(Value::to_json).collect::<Vec<_>>() }
            }),
            QueryFragment::Range { field, bounds } => json!({ "range": { field: bounds.to_json() } }),
            QueryFragment::Exists { field } => json!({ "exists": { "field": field } }),
            QueryFragment::Prefix { field, value } => json!({ "prefix": { field: value } }),
            QueryFragment::Regexp { field, pattern } => json!({ "regexp": { field: pattern } }),
            QueryFragment::Bool(query) => json!({ "bool": query.to_json() }),
            QueryFragment::GeoDistance {
                field,
                center,
                meters,
                distance_type,
            } => json!({
                "geo_distance": {
                    "distance": format!("{}m", meters),
                    "distance_type": distance_type.as_str(),
                    "ignore_unmapped": true,
                    field: center.as_string(),
                }
            }),
            QueryFragment::Ids { values } => json!({ "ids": { "values": values } }),
            QueryFragment::Nested { path, query } => json!({
                "nested": { "path": path, "query": query.to_json() }
            }),
        }
    }
}
