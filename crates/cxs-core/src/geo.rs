//! Geo types used by the `distance` comparison operator

use crate::error::CoreError;
use crate::types::Value;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Mean earth radius in meters, as used by search engines for geo distances
const EARTH_MEAN_RADIUS_METERS: f64 = 6_371_008.771_4;

/// A latitude/longitude pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Read a point from a `"lat,lon"` string or a `{lat, lon}` object
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => s.parse().ok(),
            Value::Object(map) => {
                let lat = map.get("lat").and_then(|v| v.as_f64())?;
                let lon = map.get("lon").and_then(|v| v.as_f64())?;
                Some(Self::new(lat, lon))
            }
            _ => None,
        }
    }

    /// `"lat,lon"` form understood by the search backend
    pub fn as_string(&self) -> String {
        format!("{},{}", self.lat, self.lon)
    }

    /// Great-circle (haversine) distance in meters
    pub fn distance_to(&self, other: &GeoPoint) -> f64 {
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();
        let a = (d_lat / 2.0).sin().powi(2)
            + self.lat.to_radians().cos() * other.lat.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
        2.0 * EARTH_MEAN_RADIUS_METERS * a.sqrt().asin()
    }
}

impl FromStr for GeoPoint {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, lon) = s
            .split_once(',')
            .ok_or_else(|| CoreError::InvalidGeoPoint(s.to_string()))?;
        let lat = lat.trim().parse::<f64>().map_err(|_| CoreError::InvalidGeoPoint(s.to_string()))?;
        let lon = lon.trim().parse::<f64>().map_err(|_| CoreError::InvalidGeoPoint(s.to_string()))?;
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return Err(CoreError::InvalidGeoPoint(s.to_string()));
        }
        Ok(Self::new(lat, lon))
    }
}

/// Unit of the `distance` parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnit {
    #[default]
    Meters,
    Kilometers,
    Miles,
    Yards,
    Feet,
    Inches,
    Centimeters,
    Millimeters,
    NauticalMiles,
}

impl DistanceUnit {
    /// Suffix used in backend distance strings (`"10km"`)
    pub fn suffix(&self) -> &'static str {
        match self {
            DistanceUnit::Meters => "m",
            DistanceUnit::Kilometers => "km",
            DistanceUnit::Miles => "mi",
            DistanceUnit::Yards => "yd",
            DistanceUnit::Feet => "ft",
            DistanceUnit::Inches => "in",
            DistanceUnit::Centimeters => "cm",
            DistanceUnit::Millimeters => "mm",
            DistanceUnit::NauticalMiles => "nmi",
        }
    }

    pub fn to_meters(&self, distance: f64) -> f64 {
        let factor = match self {
            DistanceUnit::Meters => 1.0,
            DistanceUnit::Kilometers => 1000.0,
            DistanceUnit::Miles => 1609.344,
            DistanceUnit::Yards => 0.9144,
            DistanceUnit::Feet => 0.3048,
            DistanceUnit::Inches => 0.0254,
            DistanceUnit::Centimeters => 0.01,
            DistanceUnit::Millimeters => 0.001,
            DistanceUnit::NauticalMiles => 1852.0,
        };
        distance * factor
    }
}

impl FromStr for DistanceUnit {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "m" | "meter" | "meters" => Ok(DistanceUnit::Meters),
            "km" | "kilometer" | "kilometers" => Ok(DistanceUnit::Kilometers),
            "mi" | "mile" | "miles" => Ok(DistanceUnit::Miles),
            "yd" | "yard" | "yards" => Ok(DistanceUnit::Yards),
            "ft" | "foot" | "feet" => Ok(DistanceUnit::Feet),
            "in" | "inch" | "inches" => Ok(DistanceUnit::Inches),
            "cm" | "centimeter" | "centimeters" => Ok(DistanceUnit::Centimeters),
            "mm" | "millimeter" | "millimeters" => Ok(DistanceUnit::Millimeters),
            "nmi" | "NM" | "nauticalmiles" => Ok(DistanceUnit::NauticalMiles),
            other => Err(CoreError::InvalidValue(format!("unknown distance unit: {}", other))),
        }
    }
}

/// How the backend computes distances
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeoDistanceType {
    /// Faster, less accurate on long distances and near the poles
    #[default]
    Plane,
    Arc,
}

impl GeoDistanceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GeoDistanceType::Plane => "plane",
            GeoDistanceType::Arc => "arc",
        }
    }
}

impl FromStr for GeoDistanceType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "plane" => Ok(GeoDistanceType::Plane),
            "arc" => Ok(GeoDistanceType::Arc),
            other => Err(CoreError::InvalidValue(format!("unknown geo distance type: {}", other))),
        }
    }
}

impl fmt::Display for GeoDistanceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
