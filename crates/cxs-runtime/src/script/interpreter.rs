//! Tree-walking interpreter for parsed script expressions

use super::functions::call_function;
use super::operators::{execute_arithmetic, execute_compare, execute_unary, is_truthy};
use crate::context::Context;
use crate::error::Result;
use cxs_core::Value;
use cxs_parser::{Expression, Operator};

/// Evaluate an expression against the context map
pub(super) fn evaluate(expression: &Expression, context: &Context) -> Result<Value> {
    match expression {
        Expression::Literal(value) => Ok(value.clone()),

        Expression::FieldAccess(path) => Ok(lookup(context, path)),

        Expression::Binary { left, op, right } => match op {
            // Logical operators short-circuit
            Operator::And => {
                let l = evaluate(left, context)?;
                if !is_truthy(&l) {
                    return Ok(Value::Bool(false));
                }
                Ok(Value::Bool(is_truthy(&evaluate(right, context)?)))
            }
            Operator::Or => {
                let l = evaluate(left, context)?;
                if is_truthy(&l) {
                    return Ok(Value::Bool(true));
                }
                Ok(Value::Bool(is_truthy(&evaluate(right, context)?)))
            }
            op if op.is_comparison() => {
                let l = evaluate(left, context)?;
                let r = evaluate(right, context)?;
                Ok(Value::Bool(execute_compare(&l, *op, &r)?))
            }
            op => {
                let l = evaluate(left, context)?;
                let r = evaluate(right, context)?;
                execute_arithmetic(&l, *op, &r)
            }
        },

        Expression::Unary { op, operand } => execute_unary(&evaluate(operand, context)?, *op),

        Expression::FunctionCall { name, args } => {
            let args = args
                .iter()
                .map(|arg| evaluate(arg, context))
                .collect::<Result<Vec<_>>>()?;
            call_function(name, &args)
        }
    }
}

/// Follow a dotted path through the context; missing entries are Null
fn lookup(context: &Context, path: &[String]) -> Value {
    let Some((first, rest)) = path.split_first() else {
        return Value::Null;
    };
    let mut current = match context.get(first) {
        Some(v) => v,
        None => {
            tracing::debug!(field = %first, "Context entry not found, returning Null");
            return Value::Null;
        }
    };
    for key in rest {
        current = match current {
            Value::Object(map) => match map.get(key) {
                Some(v) => v,
                None => return Value::Null,
            },
            _ => {
                tracing::debug!(field = %key, "Cannot access nested field on non-object, returning Null");
                return Value::Null;
            }
        };
    }
    current.clone()
}
