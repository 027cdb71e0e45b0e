use std::collections::HashMap;

use crate::{
    ast::Expr,
    error::RuntimeError,
    interpreter::{
        environment::EnvRef,
        evaluator::core::{EvalResult, eval_expr},
        lexer::Position,
        value::core::{RangeValue, Value},
    },
};

/// Evaluates an index access `left[index]`.
///
/// Valid targets:
/// - arrays: integer index, bounds-checked;
/// - maps: string key, missing keys yield `none`;
/// - ranges: integer index, bounds-checked, computes `start + i * step`;
/// - strings: integer index, bounds-checked, yields a one-character
///   string.
pub fn eval_index(left: &Expr, index: &Expr, pos: &Position, env: &EnvRef) -> EvalResult {
    let left = eval_expr(left, env)?;
    let index = eval_expr(index, env)?;

    match left {
        Value::Array(elements) => {
            let i = require_int_index(&index, pos)?;
            let elements = elements.borrow();
            let len = elements.len() as i64;
            if i < 0 || i >= len {
                return Err(RuntimeError::IndexOutOfBounds { index: i,
                                                            len,
                                                            pos: pos.clone() }.into());
            }
            Ok(elements[i as usize].clone())
        },
        Value::Map(pairs) => {
            let key = match index {
                Value::Str(key) => key,
                other => {
                    return Err(RuntimeError::NonStringKey { type_name: other.type_name(),
                                                            pos:       pos.clone(), }.into());
                },
            };
            Ok(pairs.borrow().get(&key).cloned().unwrap_or(Value::None))
        },
        Value::Range(range) => {
            let i = require_int_index(&index, pos)?;
            if i < 0 || i >= range.len() {
                return Err(RuntimeError::IndexOutOfBounds { index: i,
                                                            len: range.len(),
                                                            pos: pos.clone() }.into());
            }
            Ok(Value::Int(range.at(i)))
        },
        Value::Str(s) => {
            let i = require_int_index(&index, pos)?;
            let len = s.len() as i64;
            if i < 0 || i >= len {
                return Err(RuntimeError::IndexOutOfBounds { index: i,
                                                            len,
                                                            pos: pos.clone() }.into());
            }
            let byte = s.as_bytes()[i as usize];
            Ok(Value::Str((byte as char).to_string()))
        },
        other => Err(RuntimeError::TypeMismatch { details: format!("cannot index into '{}'",
                                                                   other.type_name()),
                                                  pos:     pos.clone(), }.into()),
    }
}

/// Evaluates a dot access `left.field`; only valid on maps. A missing
/// field yields `none`.
pub fn eval_dot(left: &Expr, field: &str, pos: &Position, env: &EnvRef) -> EvalResult {
    let left = eval_expr(left, env)?;

    match left {
        Value::Map(pairs) => Ok(pairs.borrow().get(field).cloned().unwrap_or(Value::None)),
        other => {
            Err(RuntimeError::TypeMismatch { details: format!("cannot access field '{field}' \
                                                               on type '{}'",
                                                              other.type_name()),
                                             pos:     pos.clone(), }.into())
        },
    }
}

/// Evaluates a safe access `left?.field`: yields `none` when `left` is
/// `none`, otherwise behaves like a dot access on a map.
pub fn eval_safe_access(left: &Expr, field: &str, pos: &Position, env: &EnvRef) -> EvalResult {
    let left = eval_expr(left, env)?;

    match left {
        Value::None => Ok(Value::None),
        Value::Map(pairs) => Ok(pairs.borrow().get(field).cloned().unwrap_or(Value::None)),
        other => {
            Err(RuntimeError::TypeMismatch { details: format!("cannot safe-access field \
                                                               '{field}' on type '{}'",
                                                              other.type_name()),
                                             pos:     pos.clone(), }.into())
        },
    }
}

/// Evaluates an array literal: elements in source order.
pub fn eval_array_literal(elements: &[Expr], env: &EnvRef) -> EvalResult {
    let mut values = Vec::with_capacity(elements.len());
    for element in elements {
        values.push(eval_expr(element, env)?);
    }
    Ok(Value::array(values))
}

/// Evaluates a map literal.
///
/// Keys and values interleave in source order — key₁, value₁, key₂,
/// value₂, … — so a value expression observes side effects of its own
/// key expression. Keys must evaluate to strings.
pub fn eval_map_literal(keys: &[Expr],
                        values: &[Expr],
                        pos: &Position,
                        env: &EnvRef)
                        -> EvalResult {
    let mut pairs = HashMap::with_capacity(keys.len());
    for (key, value) in keys.iter().zip(values) {
        let key = match eval_expr(key, env)? {
            Value::Str(key) => key,
            other => {
                return Err(RuntimeError::NonStringKey { type_name: other.type_name(),
                                                        pos:       pos.clone(), }.into());
            },
        };
        let value = eval_expr(value, env)?;
        pairs.insert(key, value);
    }
    Ok(Value::map(pairs))
}

/// Evaluates a range expression: both bounds and the optional step must
/// be integers; the step defaults to 1 and cannot be zero.
pub fn eval_range(start: &Expr,
                  end: &Expr,
                  step: Option<&Expr>,
                  pos: &Position,
                  env: &EnvRef)
                  -> EvalResult {
    let start = require_int(eval_expr(start, env)?, "range bounds must be integers", pos)?;
    let end = require_int(eval_expr(end, env)?, "range bounds must be integers", pos)?;

    let step = match step {
        Some(step) => require_int(eval_expr(step, env)?, "range step must be an integer", pos)?,
        None => 1,
    };
    if step == 0 {
        return Err(RuntimeError::InvalidArgument { details: "range step cannot be zero"
                                                       .to_string(),
                                                   pos:     pos.clone(), }.into());
    }

    Ok(Value::Range(RangeValue { start, end, step }))
}

/// Evaluates a coalesce `left ?? right`: the left value unless it is
/// `none`, in which case the right side is evaluated.
pub fn eval_coalesce(left: &Expr, right: &Expr, env: &EnvRef) -> EvalResult {
    let left = eval_expr(left, env)?;
    if !left.is_none() {
        return Ok(left);
    }
    eval_expr(right, env)
}

/// Evaluates a string interpolation by concatenating the string form of
/// each part left to right.
pub fn eval_interpolation(parts: &[Expr], env: &EnvRef) -> EvalResult {
    let mut result = String::new();
    for part in parts {
        let value = eval_expr(part, env)?;
        result.push_str(&value.to_string());
    }
    Ok(Value::Str(result))
}

fn require_int_index(index: &Value,
                     pos: &Position)
                     -> Result<i64, crate::interpreter::evaluator::core::Signal> {
    match index {
        Value::Int(i) => Ok(*i),
        other => Err(RuntimeError::NonIntegerIndex { type_name: other.type_name(),
                                                     pos:       pos.clone(), }.into()),
    }
}

fn require_int(value: Value,
               details: &str,
               pos: &Position)
               -> Result<i64, crate::interpreter::evaluator::core::Signal> {
    match value {
        Value::Int(i) => Ok(i),
        _ => Err(RuntimeError::TypeMismatch { details: details.to_string(),
                                              pos:     pos.clone(), }.into()),
    }
}
