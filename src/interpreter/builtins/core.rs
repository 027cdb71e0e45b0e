use std::{
    io::{BufRead, Write},
    rc::Rc,
};

use crate::{
    error::RuntimeError,
    interpreter::{
        builtins::higher_order,
        environment::EnvRef,
        evaluator::core::EvalResult,
        lexer::Position,
        value::core::{Arity, Builtin, BuiltinFn, Value},
    },
};

/// Defines the built-in registry as a static lookup table.
///
/// Each entry provides a name, an arity specification checked by the
/// call path, and the native dispatcher. The macro also produces
/// `BUILTIN_NAMES`, the public list of registered names.
macro_rules! builtin_functions {
    (
        $(
            $name:literal => {
                arity: $arity:expr,
                func: $func:expr $(,)?
            }
        ),* $(,)?
    ) => {
        struct BuiltinDef {
            name:  &'static str,
            arity: Arity,
            func:  BuiltinFn,
        }
        static BUILTIN_TABLE: &[BuiltinDef] = &[
            $(
                BuiltinDef { name: $name, arity: $arity, func: $func },
            )*
        ];
        /// Names of every registered built-in function.
        pub const BUILTIN_NAMES: &[&str] = &[
            $($name,)*
        ];
    };
}

builtin_functions! {
    "print"   => { arity: Arity::AtLeast(0),      func: print },
    "len"     => { arity: Arity::Exact(1),        func: len },
    "push"    => { arity: Arity::Exact(2),        func: push },
    "pop"     => { arity: Arity::Exact(1),        func: pop },
    "type"    => { arity: Arity::Exact(1),        func: type_of },
    "str"     => { arity: Arity::Exact(1),        func: str_of },
    "int"     => { arity: Arity::Exact(1),        func: int_of },
    "float"   => { arity: Arity::Exact(1),        func: float_of },
    "input"   => { arity: Arity::OneOf(&[0, 1]),  func: input },
    "assert"  => { arity: Arity::OneOf(&[1, 2]),  func: assert },
    "array"   => { arity: Arity::Exact(1),        func: array_of },
    "filter"  => { arity: Arity::Exact(2),        func: higher_order::filter },
    "map"     => { arity: Arity::Exact(2),        func: higher_order::map_over },
    "reduce"  => { arity: Arity::Exact(3),        func: higher_order::reduce },
    "sort"    => { arity: Arity::OneOf(&[1, 2]),  func: higher_order::sort },
    "keys"    => { arity: Arity::Exact(1),        func: higher_order::keys },
    "values"  => { arity: Arity::Exact(1),        func: higher_order::values },
    "has"     => { arity: Arity::Exact(2),        func: higher_order::has },
    "reverse" => { arity: Arity::Exact(1),        func: higher_order::reverse },
}

/// Registers every built-in into the given environment as an immutable
/// binding. Called once on the root environment before evaluation
/// begins.
pub fn register(env: &EnvRef) {
    for def in BUILTIN_TABLE {
        let value = Value::Builtin(Rc::new(Builtin { name:  def.name,
                                                     arity: def.arity,
                                                     func:  def.func, }));
        // Registration happens on a fresh root scope; a collision would
        // mean the table itself lists a name twice.
        let _ = env.borrow_mut().define(def.name, value, false);
    }
}

/// `print(...)` — joins the string form of every argument with single
/// spaces and writes the line to stdout. Returns `none`.
fn print(args: &[Value], _pos: &Position) -> EvalResult {
    let parts: Vec<String> = args.iter().map(ToString::to_string).collect();
    println!("{}", parts.join(" "));
    Ok(Value::None)
}

/// `len(x)` — the length of a string (bytes), array, map, or range.
fn len(args: &[Value], pos: &Position) -> EvalResult {
    match &args[0] {
        Value::Str(s) => Ok(Value::Int(s.len() as i64)),
        Value::Array(elements) => Ok(Value::Int(elements.borrow().len() as i64)),
        Value::Map(pairs) => Ok(Value::Int(pairs.borrow().len() as i64)),
        Value::Range(range) => Ok(Value::Int(range.len())),
        other => {
            Err(RuntimeError::InvalidArgument { details: format!("len() not supported for \
                                                                  type '{}'",
                                                                 other.type_name()),
                                                pos:     pos.clone(), }.into())
        },
    }
}

/// `push(array, value)` — appends in place and returns the array.
fn push(args: &[Value], pos: &Position) -> EvalResult {
    let Value::Array(elements) = &args[0] else {
        return Err(RuntimeError::InvalidArgument { details: format!("push() first argument \
                                                                     must be an array, got \
                                                                     '{}'",
                                                                    args[0].type_name()),
                                                   pos:     pos.clone(), }.into());
    };
    elements.borrow_mut().push(args[1].clone());
    Ok(args[0].clone())
}

/// `pop(array)` — removes and returns the last element.
fn pop(args: &[Value], pos: &Position) -> EvalResult {
    let Value::Array(elements) = &args[0] else {
        return Err(RuntimeError::InvalidArgument { details: format!("pop() argument must be \
                                                                     an array, got '{}'",
                                                                    args[0].type_name()),
                                                   pos:     pos.clone(), }.into());
    };
    elements.borrow_mut().pop().map_or_else(|| {
                                                Err(RuntimeError::InvalidArgument {
                        details: "pop() on empty array".to_string(),
                        pos:     pos.clone(),
                    }.into())
                                            },
                                            Ok)
}

/// `type(x)` — the value's type name as a string.
fn type_of(args: &[Value], _pos: &Position) -> EvalResult {
    Ok(Value::Str(args[0].type_name().to_string()))
}

/// `str(x)` — the value's string representation.
fn str_of(args: &[Value], _pos: &Position) -> EvalResult {
    Ok(Value::Str(args[0].to_string()))
}

/// `int(x)` — converts floats (truncating), numeric strings, and bools
/// to an integer.
fn int_of(args: &[Value], pos: &Position) -> EvalResult {
    match &args[0] {
        Value::Int(n) => Ok(Value::Int(*n)),
        Value::Float(n) => Ok(Value::Int(*n as i64)),
        Value::Str(s) => s.trim().parse::<i64>().map(Value::Int).map_err(|_| {
                                                                     RuntimeError::InvalidArgument {
                    details: format!("cannot convert '{s}' to int"),
                    pos:     pos.clone(),
                }.into()
                                                                 }),
        Value::Bool(b) => Ok(Value::Int(i64::from(*b))),
        other => {
            Err(RuntimeError::InvalidArgument { details: format!("cannot convert '{}' to int",
                                                                 other.type_name()),
                                                pos:     pos.clone(), }.into())
        },
    }
}

/// `float(x)` — converts integers and numeric strings to a float.
fn float_of(args: &[Value], pos: &Position) -> EvalResult {
    match &args[0] {
        Value::Float(n) => Ok(Value::Float(*n)),
        Value::Int(n) => Ok(Value::Float(*n as f64)),
        Value::Str(s) => s.trim().parse::<f64>().map(Value::Float).map_err(|_| {
                                                                       RuntimeError::InvalidArgument {
                    details: format!("cannot convert '{s}' to float"),
                    pos:     pos.clone(),
                }.into()
                                                                   }),
        other => {
            Err(RuntimeError::InvalidArgument { details: format!("cannot convert '{}' to \
                                                                  float",
                                                                 other.type_name()),
                                                pos:     pos.clone(), }.into())
        },
    }
}

/// `input([prompt])` — writes the optional prompt, then blocks on one
/// line of stdin. The trailing newline is stripped.
fn input(args: &[Value], pos: &Position) -> EvalResult {
    if let Some(prompt) = args.first() {
        print!("{prompt}");
        let _ = std::io::stdout().flush();
    }

    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|error| RuntimeError::InvalidArgument { details: format!("failed to read \
                                                                           input: {error}"),
                                                         pos:     pos.clone(), })?;
    while line.ends_with('\n') || line.ends_with('\r') {
        line.pop();
    }
    Ok(Value::Str(line))
}

/// `assert(cond[, message])` — raises an assertion failure when the
/// condition is falsy.
fn assert(args: &[Value], pos: &Position) -> EvalResult {
    if args[0].is_truthy() {
        return Ok(Value::None);
    }
    let message = args.get(1)
                      .map_or_else(|| "assertion failed".to_string(), ToString::to_string);
    Err(RuntimeError::AssertionFailed { message,
                                        pos: pos.clone() }.into())
}

/// `array(range)` — materializes a range into an integer array.
fn array_of(args: &[Value], pos: &Position) -> EvalResult {
    let Value::Range(range) = &args[0] else {
        return Err(RuntimeError::InvalidArgument { details: format!("array() argument must \
                                                                     be a range, got '{}'",
                                                                    args[0].type_name()),
                                                   pos:     pos.clone(), }.into());
    };
    Ok(Value::array(range.iter().map(Value::Int).collect()))
}
