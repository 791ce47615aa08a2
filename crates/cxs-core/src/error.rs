//! Error types for CXS Core

use thiserror::Error;

/// Core error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Type error: {0}")]
    TypeError(String),

    #[error("Invalid value for parameter '{parameter}': {message}")]
    InvalidParameter { parameter: String, message: String },

    #[error("Unknown comparison operator: {0}")]
    UnknownOperator(String),

    #[error("Invalid geo point: {0}")]
    InvalidGeoPoint(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

impl CoreError {
    pub(crate) fn invalid_parameter(parameter: &str, message: impl Into<String>) -> Self {
        CoreError::InvalidParameter {
            parameter: parameter.to_string(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
