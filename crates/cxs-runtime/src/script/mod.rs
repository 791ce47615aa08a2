//! Script expressions referenced by `script::` parameter values
//!
//! Expressions are parsed once and cached by their source text; evaluation
//! runs against the context map of the current dispatch call.

mod executor;
mod functions;
mod interpreter;
mod operators;

pub use executor::ScriptExecutor;
