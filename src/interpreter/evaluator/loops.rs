use crate::{
    ast::{Block, Expr},
    error::RuntimeError,
    interpreter::{
        environment::{EnvRef, Environment},
        evaluator::core::{EvalResult, Signal, eval_expr, eval_stmt},
        lexer::Position,
        value::core::Value,
    },
};

/// Evaluates the unified loop statement.
///
/// All three shapes share one framework:
/// 1. A conditional loop re-evaluates its condition before every
///    iteration and exits when it turns falsy.
/// 2. A for-in loop evaluates its iterable once, then runs the body once
///    per element (array elements in order, or range values).
/// 3. Every iteration runs in a fresh child scope; for for-in loops the
///    iterator name is defined immutably in that scope.
///
/// `break` exits the loop with result `none`; `continue` proceeds to the
/// next iteration. Any other signal (including `return` and runtime
/// errors) propagates. The loop's own result is always `none`.
pub fn eval_loop(condition: Option<&Expr>,
                 iterator: Option<&str>,
                 iterable: Option<&Expr>,
                 body: &Block,
                 pos: &Position,
                 env: &EnvRef)
                 -> EvalResult {
    if let (Some(name), Some(iterable)) = (iterator, iterable) {
        let iterable = eval_expr(iterable, env)?;
        return eval_for_in(name, &iterable, body, pos, env);
    }

    loop {
        if let Some(condition) = condition
           && !eval_expr(condition, env)?.is_truthy()
        {
            break;
        }

        match run_iteration(body, None, env) {
            Ok(()) | Err(Signal::Continue { .. }) => {},
            Err(Signal::Break { .. }) => break,
            Err(other) => return Err(other),
        }
    }
    Ok(Value::None)
}

/// Runs a for-in loop over an array or a range.
fn eval_for_in(name: &str,
               iterable: &Value,
               body: &Block,
               pos: &Position,
               env: &EnvRef)
               -> EvalResult {
    match iterable {
        Value::Array(elements) => {
            // Snapshot the elements so the body may mutate the array
            // without invalidating the iteration.
            let snapshot: Vec<Value> = elements.borrow().clone();
            for element in snapshot {
                match run_iteration(body, Some((name, element)), env) {
                    Ok(()) | Err(Signal::Continue { .. }) => {},
                    Err(Signal::Break { .. }) => break,
                    Err(other) => return Err(other),
                }
            }
            Ok(Value::None)
        },
        Value::Range(range) => {
            for i in range.iter() {
                match run_iteration(body, Some((name, Value::Int(i))), env) {
                    Ok(()) | Err(Signal::Continue { .. }) => {},
                    Err(Signal::Break { .. }) => break,
                    Err(other) => return Err(other),
                }
            }
            Ok(Value::None)
        },
        other => Err(RuntimeError::TypeMismatch { details: format!("cannot iterate over '{}'",
                                                                   other.type_name()),
                                                  pos:     pos.clone(), }.into()),
    }
}

/// Runs one loop iteration in its own child scope, optionally defining
/// the iterator binding first.
fn run_iteration(body: &Block,
                 binding: Option<(&str, Value)>,
                 env: &EnvRef)
                 -> Result<(), Signal> {
    let scope = Environment::enclosed(env);
    if let Some((name, value)) = binding {
        // The scope is freshly created, so the define cannot collide.
        let _ = scope.borrow_mut().define(name, value, false);
    }
    for stmt in &body.statements {
        eval_stmt(stmt, &scope)?;
    }
    Ok(())
}
