//! Built-in functions of the script language

use crate::error::{Result, RuntimeError};
use chrono::Utc;
use cxs_core::Value;

/// Call a built-in function with already evaluated arguments
pub(super) fn call_function(name: &str, args: &[Value]) -> Result<Value> {
    match name {
        "now" => {
            expect_args(name, args, 0)?;
            Ok(Value::Date(Utc::now()))
        }
        "lower" => {
            expect_args(name, args, 1)?;
            Ok(map_string(&args[0], |s| s.to_lowercase()))
        }
        "upper" => {
            expect_args(name, args, 1)?;
            Ok(map_string(&args[0], |s| s.to_uppercase()))
        }
        "concat" => Ok(Value::String(
            args.iter()
                .filter(|v| !v.is_null())
                .map(Value::to_display_string)
                .collect(),
        )),
        "size" => {
            expect_args(name, args, 1)?;
            Ok(match &args[0] {
                Value::Null => Value::Integer(0),
                Value::String(s) => Value::Integer(s.chars().count() as i64),
                Value::Array(items) => Value::Integer(items.len() as i64),
                Value::Object(map) => Value::Integer(map.len() as i64),
                other => {
                    return Err(RuntimeError::TypeError(format!(
                        "size() does not apply to {}",
                        other.type_name()
                    )))
                }
            })
        }
        "contains" => {
            expect_args(name, args, 2)?;
            Ok(match (&args[0], &args[1]) {
                (Value::Null, _) => Value::Bool(false),
                (Value::String(haystack), needle) => {
                    Value::Bool(haystack.contains(&needle.to_display_string()))
                }
                (Value::Array(items), needle) => Value::Bool(items.contains(needle)),
                (Value::Object(map), Value::String(key)) => Value::Bool(map.contains_key(key)),
                (other, _) => {
                    return Err(RuntimeError::TypeError(format!(
                        "contains() does not apply to {}",
                        other.type_name()
                    )))
                }
            })
        }
        _ => Err(RuntimeError::TypeError(format!("Unknown function: {}", name))),
    }
}

fn expect_args(name: &str, args: &[Value], expected: usize) -> Result<()> {
    if args.len() != expected {
        return Err(RuntimeError::TypeError(format!(
            "{}() takes {} argument(s), {} given",
            name,
            expected,
            args.len()
        )));
    }
    Ok(())
}

fn map_string(value: &Value, f: impl Fn(&str) -> String) -> Value {
    match value {
        Value::String(s) => Value::String(f(s)),
        Value::Null => Value::Null,
        other => Value::String(f(&other.to_display_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_functions() {
        assert_eq!(call_function("lower", &[Value::from("ABC")]).unwrap(), Value::from("abc"));
        assert_eq!(call_function("upper", &[Value::Null]).unwrap(), Value::Null);
        assert_eq!(
            call_function("concat", &[Value::from("a"), Value::Null, Value::Integer(1)]).unwrap(),
            Value::from("a1")
        );
    }

    #[test]
    fn test_size_and_contains() {
        let list = Value::from(vec!["x", "y"]);
        assert_eq!(call_function("size", &[list.clone()]).unwrap(), Value::Integer(2));
        assert_eq!(
            call_function("contains", &[list, Value::from("y")]).unwrap(),
            Value::Bool(true)
        );
    }

    #[test]
    fn test_arity_and_unknown_function() {
        assert!(call_function("lower", &[]).is_err());
        assert!(call_function("eval", &[]).is_err());
    }
}
