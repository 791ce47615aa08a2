//! Parameters of the property comparison condition
//!
//! Shared by the in-memory evaluator and the query builder so both read
//! `propertyName`, `comparisonOperator` and the typed comparison values the
//! same way and report the same errors.

use crate::error::{Result, RuntimeError};
use cxs_core::{
    ComparisonOperator, ComparisonValues, Condition, DistanceUnit, GeoDistanceType, GeoPoint,
    PropertyValue, Value,
};

/// A validated property comparison
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyComparison<'c> {
    pub property_name: &'c str,
    pub operator: ComparisonOperator,
    pub values: ComparisonValues,
}

impl<'c> PropertyComparison<'c> {
    pub fn from_condition(condition: &'c Condition) -> Result<Self> {
        let (Some(property_name), Some(operator)) = (
            condition.string_parameter("propertyName"),
            condition.string_parameter("comparisonOperator"),
        ) else {
            return Err(RuntimeError::illegal_argument(
                "condition is not valid, comparisonOperator and propertyName should be provided",
            ));
        };
        let operator = operator
            .parse::<ComparisonOperator>()
            .map_err(|e| RuntimeError::illegal_argument(e.to_string()))?;
        let values = ComparisonValues::from_condition(condition)
            .map_err(|e| RuntimeError::illegal_argument(e.to_string()))?;

        Ok(Self {
            property_name,
            operator,
            values,
        })
    }

    /// The singular comparison value, required by the operator
    pub fn required_value(&self) -> Result<&PropertyValue> {
        self.values.value.as_ref().ok_or_else(|| self.missing_values(false))
    }

    /// The singular string comparison value, required by string operators
    pub fn required_string(&self) -> Result<&str> {
        self.values.string_value().ok_or_else(|| self.missing_values(false))
    }

    /// The comparison value list, required by collection operators
    pub fn required_values(&self) -> Result<&[PropertyValue]> {
        self.values.values.as_deref().ok_or_else(|| self.missing_values(true))
    }

    /// The two bounds of `between`, in the order given
    pub fn required_bounds(&self) -> Result<(&PropertyValue, &PropertyValue)> {
        match self.values.values.as_deref() {
            Some([low, high]) => Ok((low, high)),
            _ => Err(RuntimeError::illegal_argument(format!(
                "missing 2 values for condition using operator: {} and property: {}",
                self.operator, self.property_name
            ))),
        }
    }

    fn missing_values(&self, multiple: bool) -> RuntimeError {
        RuntimeError::illegal_argument(format!(
            "missing value{} for condition using operator: {} and property: {}",
            if multiple { "s" } else { "" },
            self.operator,
            self.property_name
        ))
    }
}

/// Parameters of the `distance` operator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceParameters {
    pub center: GeoPoint,
    pub meters: f64,
    pub distance_type: GeoDistanceType,
}

impl DistanceParameters {
    /// Read `center`, `distance` and `unit`.
    ///
    /// `center` is a `"lat,lon"` string or a `{lat, lon}` object. `distance`
    /// is a number or a string carrying its own unit (`"10km"`). `unit` is
    /// either the unit of a numeric distance or the geo distance type
    /// (`plane`, the default, or `arc`).
    pub fn from_condition(condition: &Condition) -> Result<Self> {
        let center = condition
            .parameter("center")
            .ok_or_else(|| RuntimeError::illegal_argument("distance requires a center"))?;
        let center = GeoPoint::from_value(center).ok_or_else(|| {
            RuntimeError::illegal_argument(format!("invalid center: {}", center.to_display_string()))
        })?;

        let mut unit = DistanceUnit::default();
        let mut distance_type = GeoDistanceType::default();
        if let Some(raw) = condition.string_parameter("unit") {
            if let Ok(parsed) = raw.parse::<GeoDistanceType>() {
                distance_type = parsed;
            } else {
                unit = raw.parse().map_err(|e: cxs_core::CoreError| {
                    RuntimeError::illegal_argument(e.to_string())
                })?;
            }
        }

        let distance = condition
            .parameter("distance")
            .ok_or_else(|| RuntimeError::illegal_argument("distance requires a distance"))?;
        let meters = parse_distance(distance, unit)?;

        Ok(Self {
            center,
            meters,
            distance_type,
        })
    }
}

fn parse_distance(value: &Value, default_unit: DistanceUnit) -> Result<f64> {
    let invalid = || RuntimeError::illegal_argument(format!("invalid distance: {}", value.to_display_string()));
    match value {
        Value::Integer(_) | Value::Number(_) => value.as_f64().map(|d| default_unit.to_meters(d)).ok_or_else(invalid),
        Value::String(s) => {
            let s = s.trim();
            let split = s
                .find(|c: char| c.is_ascii_alphabetic())
                .unwrap_or(s.len());
            let amount: f64 = s[..split].trim().parse().map_err(|_| invalid())?;
            let unit = match s[split..].trim() {
                "" => default_unit,
                suffix => suffix.parse().map_err(|_| invalid())?,
            };
            Ok(unit.to_meters(amount))
        }
        _ => Err(invalid()),
    }
}
