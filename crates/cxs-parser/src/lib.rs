//! CXS Parser - parsers for the CXS condition engine
//!
//! This crate provides:
//! - the AST and parser of the script expression language used by
//!   `script::` parameter references
//! - the parser of condition type definition files (YAML or JSON)

pub mod ast;
pub mod definition_parser;
pub mod error;
pub mod expression_parser;

// Re-export main parser types
pub use ast::{Expression, Operator, UnaryOperator};
pub use definition_parser::{ConditionTypeDefinition, DefinitionParser, ParameterDefinition};
pub use error::{ParseError, Result};
pub use expression_parser::{ExpressionParser, MAX_EXPRESSION_DEPTH};
