use std::cmp::Ordering;

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::{
            call::call_function,
            core::{EvalResult, Signal},
        },
        lexer::Position,
        value::core::Value,
    },
};

/// `filter(array, fn)` — a new array with the elements for which
/// `fn(elem)` is truthy.
pub fn filter(args: &[Value], pos: &Position) -> EvalResult {
    let elements = require_array(&args[0], "filter", pos)?;
    let callback = require_callable(&args[1], "filter", pos)?;

    let mut result = Vec::new();
    for element in elements {
        if call_function(callback, &[element.clone()], pos)?.is_truthy() {
            result.push(element);
        }
    }
    Ok(Value::array(result))
}

/// `map(array, fn)` — a new array of `fn(elem)` for every element.
pub fn map_over(args: &[Value], pos: &Position) -> EvalResult {
    let elements = require_array(&args[0], "map", pos)?;
    let callback = require_callable(&args[1], "map", pos)?;

    let mut result = Vec::with_capacity(elements.len());
    for element in elements {
        result.push(call_function(callback, &[element], pos)?);
    }
    Ok(Value::array(result))
}

/// `reduce(array, initial, fn)` — folds the array with
/// `acc = fn(acc, elem)`.
pub fn reduce(args: &[Value], pos: &Position) -> EvalResult {
    let elements = require_array(&args[0], "reduce", pos)?;
    let callback = require_callable(&args[2], "reduce", pos)?;

    let mut acc = args[1].clone();
    for element in elements {
        acc = call_function(callback, &[acc, element], pos)?;
    }
    Ok(acc)
}

/// `sort(array[, fn])` — a stably sorted copy.
///
/// Without a comparator, ints, floats (mixed numerics included) and
/// strings order naturally; comparing anything else is an error. With a
/// comparator, `fn(a, b)` must return a number whose sign decides the
/// order.
pub fn sort(args: &[Value], pos: &Position) -> EvalResult {
    let mut copied = require_array(&args[0], "sort", pos)?;
    let mut sort_err: Option<Signal> = None;

    if let Some(comparator) = args.get(1) {
        let comparator = require_callable(comparator, "sort", pos)?;
        copied.sort_by(|a, b| {
                  if sort_err.is_some() {
                      return Ordering::Equal;
                  }
                  match call_function(comparator, &[a.clone(), b.clone()], pos) {
                      Ok(Value::Int(n)) => n.cmp(&0),
                      Ok(Value::Float(n)) => n.partial_cmp(&0.0).unwrap_or(Ordering::Equal),
                      Ok(other) => {
                          let details =
                              format!("sort comparator must return a number, got '{}'",
                                      other.type_name());
                          sort_err = Some(RuntimeError::TypeMismatch { details,
                                                                       pos: pos.clone() }.into());
                          Ordering::Equal
                      },
                      Err(signal) => {
                          sort_err = Some(signal);
                          Ordering::Equal
                      },
                  }
              });
    } else {
        copied.sort_by(|a, b| {
                  if sort_err.is_some() {
                      return Ordering::Equal;
                  }
                  compare_values(a, b).unwrap_or_else(|| {
                                          let details =
                                              format!("sort: cannot compare '{}' and '{}'",
                                                      a.type_name(),
                                                      b.type_name());
                                          sort_err =
                                              Some(RuntimeError::TypeMismatch { details,
                                                                                pos: pos.clone() }.into());
                                          Ordering::Equal
                                      })
              });
    }

    match sort_err {
        Some(signal) => Err(signal),
        None => Ok(Value::array(copied)),
    }
}

/// `keys(map)` — the map's keys, lexicographically sorted.
pub fn keys(args: &[Value], pos: &Position) -> EvalResult {
    let Value::Map(pairs) = &args[0] else {
        return Err(map_argument_error("keys", &args[0], pos));
    };
    let mut keys: Vec<String> = pairs.borrow().keys().cloned().collect();
    keys.sort();
    Ok(Value::array(keys.into_iter().map(Value::Str).collect()))
}

/// `values(map)` — the map's values, in lexicographic key order.
pub fn values(args: &[Value], pos: &Position) -> EvalResult {
    let Value::Map(pairs) = &args[0] else {
        return Err(map_argument_error("values", &args[0], pos));
    };
    let pairs = pairs.borrow();
    let mut keys: Vec<&String> = pairs.keys().collect();
    keys.sort();
    Ok(Value::array(keys.into_iter().map(|key| pairs[key].clone()).collect()))
}

/// `has(map, key)` — whether the map contains the string key.
pub fn has(args: &[Value], pos: &Position) -> EvalResult {
    let Value::Map(pairs) = &args[0] else {
        return Err(map_argument_error("has", &args[0], pos));
    };
    let Value::Str(key) = &args[1] else {
        return Err(RuntimeError::InvalidArgument { details: format!("has: second argument \
                                                                     must be a string key, \
                                                                     got '{}'",
                                                                    args[1].type_name()),
                                                   pos:     pos.clone(), }.into());
    };
    Ok(Value::Bool(pairs.borrow().contains_key(key)))
}

/// `reverse(array)` — a reversed copy.
pub fn reverse(args: &[Value], pos: &Position) -> EvalResult {
    let mut elements = require_array(&args[0], "reverse", pos)?;
    elements.reverse();
    Ok(Value::array(elements))
}

/// Orders two values naturally: int/int, float/float, mixed numerics,
/// and string/string. Returns `None` for anything else.
fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
        (Value::Int(a), Value::Float(b)) => (*a as f64).partial_cmp(b),
        (Value::Float(a), Value::Int(b)) => a.partial_cmp(&(*b as f64)),
        (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

/// Extracts a snapshot of an array argument's elements.
fn require_array(value: &Value, name: &str, pos: &Position) -> Result<Vec<Value>, Signal> {
    match value {
        Value::Array(elements) => Ok(elements.borrow().clone()),
        other => {
            Err(RuntimeError::InvalidArgument { details: format!("{name}: first argument must \
                                                                  be an array, got '{}'",
                                                                 other.type_name()),
                                                pos:     pos.clone(), }.into())
        },
    }
}

/// Checks that a callback argument is callable.
fn require_callable<'a>(value: &'a Value,
                        name: &str,
                        pos: &Position)
                        -> Result<&'a Value, Signal> {
    match value {
        Value::Fn(_) | Value::Builtin(_) => Ok(value),
        other => {
            Err(RuntimeError::InvalidArgument { details: format!("{name}: expected a function \
                                                                  argument, got '{}'",
                                                                 other.type_name()),
                                                pos:     pos.clone(), }.into())
        },
    }
}

fn map_argument_error(name: &str, value: &Value, pos: &Position) -> Signal {
    RuntimeError::InvalidArgument { details: format!("{name}: argument must be a map, got \
                                                      '{}'",
                                                     value.type_name()),
                                    pos:     pos.clone(), }.into()
}
