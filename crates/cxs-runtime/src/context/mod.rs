//! Evaluation context and contextual parameter resolution

mod resolver;

pub use resolver::{ParameterResolver, PARAMETER_PREFIX, SCRIPT_PREFIX};

use cxs_core::Value;
use std::collections::HashMap;

/// Bindings available to `parameter::` and `script::` references.
///
/// Starts from the caller's bindings and grows with the parameter values of
/// each condition delegating to its parent type. Every dispatch call works on
/// its own copy.
pub type Context = HashMap<String, Value>;
