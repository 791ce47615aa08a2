//! Operator execution for script expressions

use crate::error::{Result, RuntimeError};
use cxs_core::Value;
use cxs_parser::{Operator, UnaryOperator};
use std::cmp::Ordering;

/// Execute an arithmetic operation
pub(super) fn execute_arithmetic(left: &Value, op: Operator, right: &Value) -> Result<Value> {
    // Null in any operation returns Null, so a missing context entry
    // propagates to an absent result
    if left.is_null() || right.is_null() {
        tracing::debug!(?left, ?op, ?right, "Null in arithmetic operation, returning Null");
        return Ok(Value::Null);
    }

    match (left, op, right) {
        // String concatenation
        (Value::String(l), Operator::Add, r) => Ok(Value::String(format!("{}{}", l, r.to_display_string()))),
        (l, Operator::Add, Value::String(r)) => Ok(Value::String(format!("{}{}", l.to_display_string(), r))),

        // Integer arithmetic stays integral
        (Value::Integer(l), _, Value::Integer(r)) => match op {
            Operator::Add => checked(l.checked_add(*r)),
            Operator::Sub => checked(l.checked_sub(*r)),
            Operator::Mul => checked(l.checked_mul(*r)),
            Operator::Div if *r == 0 => Err(RuntimeError::DivisionByZero),
            Operator::Div => checked(l.checked_div(*r)),
            Operator::Mod if *r == 0 => Err(RuntimeError::DivisionByZero),
            Operator::Mod => checked(l.checked_rem(*r)),
            _ => Err(invalid(left, op, right)),
        },

        (l, _, r) => {
            let (l, r) = match (number(l), number(r)) {
                (Some(l), Some(r)) => (l, r),
                _ => return Err(invalid(left, op, right)),
            };
            match op {
                Operator::Add => Ok(Value::Number(l + r)),
                Operator::Sub => Ok(Value::Number(l - r)),
                Operator::Mul => Ok(Value::Number(l * r)),
                Operator::Div if r == 0.0 => Err(RuntimeError::DivisionByZero),
                Operator::Div => Ok(Value::Number(l / r)),
                Operator::Mod if r == 0.0 => Err(RuntimeError::DivisionByZero),
                Operator::Mod => Ok(Value::Number(l % r)),
                _ => Err(invalid(left, op, right)),
            }
        }
    }
}

/// Execute a comparison operation
pub(super) fn execute_compare(left: &Value, op: Operator, right: &Value) -> Result<bool> {
    match op {
        Operator::Eq => return Ok(values_equal(left, right)),
        Operator::Ne => return Ok(!values_equal(left, right)),
        _ => {}
    }

    // Ordering against Null is false, so rules on missing entries do not match
    if left.is_null() || right.is_null() {
        tracing::debug!(?left, ?op, ?right, "Null comparison, returning false");
        return Ok(false);
    }

    let ordering = match (left, right) {
        (Value::String(l), Value::String(r)) => Some(l.cmp(r)),
        (Value::Date(l), Value::Date(r)) => Some(l.cmp(r)),
        (l, r) => match (number(l), number(r)) {
            (Some(l), Some(r)) => l.partial_cmp(&r),
            _ => None,
        },
    };

    let ordering = ordering.ok_or_else(|| {
        RuntimeError::TypeError(format!(
            "Cannot compare {} and {} with {:?}",
            left.type_name(),
            right.type_name(),
            op
        ))
    })?;

    Ok(match op {
        Operator::Gt => ordering == Ordering::Greater,
        Operator::Ge => ordering != Ordering::Less,
        Operator::Lt => ordering == Ordering::Less,
        Operator::Le => ordering != Ordering::Greater,
        _ => false,
    })
}

/// Execute a unary operation
pub(super) fn execute_unary(operand: &Value, op: UnaryOperator) -> Result<Value> {
    match (op, operand) {
        (_, Value::Null) => Ok(Value::Null),
        (UnaryOperator::Not, v) => Ok(Value::Bool(!is_truthy(v))),
        (UnaryOperator::Negate, Value::Integer(i)) => checked(i.checked_neg()),
        (UnaryOperator::Negate, Value::Number(n)) => Ok(Value::Number(-n)),
        _ => Err(RuntimeError::TypeError(format!(
            "Cannot apply {:?} to {}",
            op,
            operand.type_name()
        ))),
    }
}

/// Check if a value is truthy
pub(super) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Null => false,
        Value::Integer(i) => *i != 0,
        Value::Number(n) => *n != 0.0,
        Value::String(s) => !s.is_empty(),
        Value::Date(_) | Value::Condition(_) => true,
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Integer(_), Value::Number(_)) | (Value::Number(_), Value::Integer(_)) => {
            number(left) == number(right)
        }
        _ => left == right,
    }
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Integer(i) => Some(*i as f64),
        Value::Number(n) => Some(*n),
        _ => None,
    }
}

fn checked(result: Option<i64>) -> Result<Value> {
    result
        .map(Value::Integer)
        .ok_or_else(|| RuntimeError::TypeError("Integer overflow".to_string()))
}

fn invalid(left: &Value, op: Operator, right: &Value) -> RuntimeError {
    RuntimeError::TypeError(format!(
        "Cannot apply {:?} to {} and {}",
        op,
        left.type_name(),
        right.type_name()
    ))
}
