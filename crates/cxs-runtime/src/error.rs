//! Runtime error types

use thiserror::Error;

/// Runtime error
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// No evaluator or query builder anywhere in a condition type's ancestry
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// Malformed condition, or an operator used without its required values
    #[error("Illegal argument: {0}")]
    IllegalArgument(String),

    /// Contextual parameters could not be resolved where no fallback applies
    #[error("Unresolved condition: {0}")]
    UnresolvedCondition(String),

    /// Script evaluation failure
    #[error("Script error in '{expression}': {message}")]
    Script { expression: String, message: String },

    /// Condition tree nested deeper than allowed
    #[error("Maximum condition depth exceeded: {depth}")]
    MaxDepthExceeded { depth: usize },

    /// Type error
    #[error("Type error: {0}")]
    TypeError(String),

    /// Division by zero
    #[error("Division by zero")]
    DivisionByZero,

    /// Script parse error
    #[error(transparent)]
    Parse(#[from] cxs_parser::ParseError),

    /// Core type error
    #[error(transparent)]
    Core(#[from] cxs_core::CoreError),
}

impl RuntimeError {
    pub(crate) fn illegal_argument(message: impl Into<String>) -> Self {
        RuntimeError::IllegalArgument(message.into())
    }

    /// Errors caused by a misconfigured registry rather than by the caller
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, RuntimeError::UnsupportedOperation(_))
    }
}

/// Result type for runtime operations
pub type Result<T> = std::result::Result<T, RuntimeError>;
