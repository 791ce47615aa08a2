//! Parser error types

use thiserror::Error;

/// Parser error
#[derive(Error, Debug)]
pub enum ParseError {
    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Missing required field
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// Invalid field value
    #[error("Invalid value for field '{field}': {message}")]
    InvalidValue { field: String, message: String },

    /// Invalid expression syntax
    #[error("Invalid expression syntax: {0}")]
    InvalidExpression(String),

    /// Expression nested past the parser's limit
    #[error("Expression nesting exceeds {limit} levels")]
    NestingTooDeep { limit: usize },

    /// Invalid operator
    #[error("Invalid operator: {0}")]
    InvalidOperator(String),
}

/// Result type for parser operations
pub type Result<T> = std::result::Result<T, ParseError>;
