//! Script expression parser
//!
//! Parses the text following a `script::` prefix into an [`Expression`].
//!
//! Supported syntax:
//! - Context access: `profileId`, `profile.properties.age`
//! - Literals: `42`, `3.14`, `"string"`, `'string'`, `true`, `false`, `null`
//! - Binary operators: `>`, `<`, `>=`, `<=`, `==`, `!=`, `+`, `-`, `*`, `/`, `%`, `&&`, `||`
//! - Unary operators: `!`, `-`
//! - Function calls: `lower(name)`, `concat(a, "-", b)`
//! - Parentheses for grouping: `(a + b) * c`

use crate::ast::{Expression, Operator, UnaryOperator};
use crate::error::{ParseError, Result};
use cxs_core::Value;

/// Deepest nesting of operators, parentheses and calls an expression may use
pub const MAX_EXPRESSION_DEPTH: usize = 128;

/// Expression parser
pub struct ExpressionParser;

impl ExpressionParser {
    /// Parse an expression from a string
    pub fn parse(input: &str) -> Result<Expression> {
        let input = input.trim();

        if input.is_empty() {
            return Err(ParseError::InvalidExpression("Empty expression".to_string()));
        }

        Self::parse_expression(input, 0)
    }

    /// Parse a complete expression, lowest precedence operators first
    fn parse_expression(input: &str, depth: usize) -> Result<Expression> {
        let depth = Self::descend(depth)?;
        const PRECEDENCE: [&[&str]; 5] = [
            &["||"],
            &["&&"],
            &["==", "!=", "<=", ">=", "<", ">"],
            &["+", "-"],
            &["*", "/", "%"],
        ];

        for operators in PRECEDENCE {
            if let Some((left, op, right)) = Self::split_by_operator(input, operators) {
                let op = Self::parse_operator(op)?;
                return Ok(Expression::binary(
                    Self::parse_expression(left, depth)?,
                    op,
                    Self::parse_expression(right, depth)?,
                ));
            }
        }

        Self::parse_primary(input, depth)
    }

    /// Parse a primary expression
    fn parse_primary(input: &str, depth: usize) -> Result<Expression> {
        let depth = Self::descend(depth)?;
        let input = input.trim();

        if input.is_empty() {
            return Err(ParseError::InvalidExpression("Missing operand".to_string()));
        }

        if let Some(rest) = input.strip_prefix('!') {
            return Ok(Expression::unary(UnaryOperator::Not, Self::parse_primary(rest, depth)?));
        }

        if let Some(rest) = input.strip_prefix('-') {
            if !rest.trim_start().starts_with(|c: char| c.is_ascii_digit()) {
                return Ok(Expression::unary(UnaryOperator::Negate, Self::parse_primary(rest, depth)?));
            }
        }

        if input.starts_with('(') && Self::closing_paren(input, 0) == Some(input.len() - 1) {
            return Self::parse_expression(&input[1..input.len() - 1], depth);
        }

        if let Some(s) = Self::string_literal(input) {
            return Ok(Expression::literal(Value::String(s.to_string())));
        }

        match input {
            "true" => return Ok(Expression::literal(Value::Bool(true))),
            "false" => return Ok(Expression::literal(Value::Bool(false))),
            "null" => return Ok(Expression::literal(Value::Null)),
            _ => {}
        }

        if input.starts_with(|c: char| c.is_ascii_digit() || c == '-' || c == '.') {
            if let Ok(num) = input.parse::<i64>() {
                return Ok(Expression::literal(Value::Integer(num)));
            }
            if let Ok(num) = input.parse::<f64>() {
                return Ok(Expression::literal(Value::Number(num)));
            }
        }

        // Function call
        if let Some(paren_pos) = input.find('(') {
            if input.ends_with(')') && Self::closing_paren(input, paren_pos) == Some(input.len() - 1) {
                let func_name = input[..paren_pos].trim();
                if !Self::is_identifier(func_name) {
                    return Err(ParseError::InvalidExpression(format!(
                        "Invalid function name: {}",
                        func_name
                    )));
                }
                let args = Self::parse_function_args(&input[paren_pos + 1..input.len() - 1], depth)?;
                return Ok(Expression::function_call(func_name.to_string(), args));
            }
        }

        // Context access, possibly dotted
        let parts: Vec<&str> = input.split('.').map(str::trim).collect();
        if parts.iter().all(|part| Self::is_identifier(part)) {
            return Ok(Expression::field_access(
                parts.into_iter().map(str::to_string).collect(),
            ));
        }

        Err(ParseError::InvalidExpression(format!("Cannot parse: {}", input)))
    }

    fn descend(depth: usize) -> Result<usize> {
        if depth >= MAX_EXPRESSION_DEPTH {
            return Err(ParseError::NestingTooDeep {
                limit: MAX_EXPRESSION_DEPTH,
            });
        }
        Ok(depth + 1)
    }

    /// Content of a quoted literal spanning the whole input
    fn string_literal(input: &str) -> Option<&str> {
        let quote = input.chars().next().filter(|c| *c == '"' || *c == '\'')?;
        if input.len() < 2 || !input.ends_with(quote) {
            return None;
        }
        let inner = &input[1..input.len() - 1];
        if inner.contains(quote) {
            return None;
        }
        Some(inner)
    }

    fn is_identifier(s: &str) -> bool {
        let mut chars = s.chars();
        match chars.next() {
            Some(c) if c.is_alphabetic() || c == '_' => {
                chars.all(|c| c.is_alphanumeric() || c == '_')
            }
            _ => false,
        }
    }

    /// Byte index of the parenthesis closing the one at `open`
    fn closing_paren(input: &str, open: usize) -> Option<usize> {
        let bytes = input.as_bytes();
        let mut depth = 0usize;
        let mut quote: Option<u8> = None;
        for (i, &b) in bytes.iter().enumerate().skip(open) {
            match (quote, b) {
                (Some(q), _) if b == q => quote = None,
                (Some(_), _) => {}
                (None, b'"') | (None, b'\'') => quote = Some(b),
                (None, b'(') => depth += 1,
                (None, b')') => {
                    depth = depth.checked_sub(1)?;
                    if depth == 0 {
                        return Some(i);
                    }
                }
                _ => {}
            }
        }
        None
    }

    /// Split input by binary operator, outside parentheses and string literals
    fn split_by_operator<'a>(input: &'a str, operators: &[&str]) -> Option<(&'a str, &'a str, &'a str)> {
        let bytes = input.as_bytes();
        let mut paren_depth = 0i32;
        let mut quote: Option<u8> = None;

        // Scan from right to left to handle left-to-right associativity
        for i in (0..bytes.len()).rev() {
            let b = bytes[i];

            if let Some(q) = quote {
                if b == q {
                    quote = None;
                }
                continue;
            }

            match b {
                b'"' | b'\'' => {
                    quote = Some(b);
                    continue;
                }
                b')' => paren_depth += 1,
                b'(' => paren_depth -= 1,
                _ => {}
            }

            if paren_depth != 0 {
                continue;
            }

            for &op in operators {
                if input.get(i..i + op.len()) != Some(op) {
                    continue;
                }
                // Make sure it's not part of another operator, and that a
                // leading `-` or `!` stays unary
                let is_valid = (i == 0 || !Self::is_operator_char(bytes[i - 1]))
                    && (i + op.len() >= bytes.len() || !Self::is_operator_char(bytes[i + op.len()]))
                    && Self::ends_with_operand(&input[..i]);

                if is_valid {
                    return Some((
                        input[..i].trim(),
                        &input[i..i + op.len()],
                        input[i + op.len()..].trim(),
                    ));
                }
            }
        }

        None
    }

    fn ends_with_operand(left: &str) -> bool {
        match left.trim_end().as_bytes().last() {
            None => false,
            Some(&b) => !Self::is_operator_char(b) && b != b'(' && b != b',',
        }
    }

    /// Check if a byte is part of an operator
    fn is_operator_char(b: u8) -> bool {
        matches!(b, b'=' | b'!' | b'<' | b'>' | b'&' | b'|' | b'+' | b'-' | b'*' | b'/' | b'%')
    }

    /// Parse function arguments
    fn parse_function_args(args_str: &str, depth: usize) -> Result<Vec<Expression>> {
        if args_str.trim().is_empty() {
            return Ok(Vec::new());
        }

        let mut args = Vec::new();
        let mut current_arg = String::new();
        let mut paren_depth = 0;
        let mut quote: Option<char> = None;

        for c in args_str.chars() {
            match (quote, c) {
                (Some(q), _) if c == q => quote = None,
                (Some(_), _) => {}
                (None, '"') | (None, '\'') => quote = Some(c),
                (None, '(') => paren_depth += 1,
                (None, ')') => paren_depth -= 1,
                (None, ',') if paren_depth == 0 => {
                    args.push(Self::parse_expression(current_arg.trim(), depth)?);
                    current_arg.clear();
                    continue;
                }
                _ => {}
            }
            current_arg.push(c);
        }

        args.push(Self::parse_expression(current_arg.trim(), depth)?);

        Ok(args)
    }

    /// Parse an operator string
    fn parse_operator(op: &str) -> Result<Operator> {
        match op {
            "==" => Ok(Operator::Eq),
            "!=" => Ok(Operator::Ne),
            "<" => Ok(Operator::Lt),
            ">" => Ok(Operator::Gt),
            "<=" => Ok(Operator::Le),
            ">=" => Ok(Operator::Ge),
            "+" => Ok(Operator::Add),
            "-" => Ok(Operator::Sub),
            "*" => Ok(Operator::Mul),
            "/" => Ok(Operator::Div),
            "%" => Ok(Operator::Mod),
            "&&" => Ok(Operator::And),
            "||" => Ok(Operator::Or),
            _ => Err(ParseError::InvalidOperator(op.to_string())),
        }
    }
}
