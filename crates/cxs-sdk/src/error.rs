//! SDK error types

use thiserror::Error;

/// SDK error type
#[derive(Error, Debug)]
pub enum SdkError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Parser error
    #[error("Parser error: {0}")]
    ParseError(#[from] cxs_parser::ParseError),

    /// Runtime error
    #[error("Runtime error: {0}")]
    RuntimeError(#[from] cxs_runtime::RuntimeError),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Condition type definition file that cannot be loaded
    #[error("Invalid definition file: {0}")]
    InvalidDefinitionFile(String),

    /// Condition document that cannot be deserialized
    #[error("Invalid condition: {0}")]
    InvalidCondition(String),
}

impl SdkError {
    /// The runtime error behind this error, if any
    pub fn as_runtime_error(&self) -> Option<&cxs_runtime::RuntimeError> {
        match self {
            SdkError::RuntimeError(e) => Some(e),
            _ => None,
        }
    }
}

/// Result type for SDK operations
pub type Result<T> = std::result::Result<T, SdkError>;
