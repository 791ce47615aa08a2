//! CXS Core - Core types and definitions for the CXS condition engine
//!
//! This crate provides the fundamental types shared across the CXS workspace:
//! - Value types for condition parameters and item data
//! - Condition and condition type definitions
//! - Items (profiles, sessions, events) that conditions are evaluated against
//! - Comparison operators and typed comparison values
//! - Geo types used by the distance operator
//! - Error types

pub mod condition;
pub mod error;
pub mod geo;
pub mod item;
pub mod types;

// Re-export commonly used types
pub use condition::{
    ComparisonOperator, ComparisonValues, Condition, ConditionType, PropertyValue,
};
pub use error::CoreError;
pub use geo::{DistanceUnit, GeoDistanceType, GeoPoint};
pub use item::Item;
pub use types::Value;
