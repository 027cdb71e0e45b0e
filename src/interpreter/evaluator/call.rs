use std::rc::Rc;

use crate::{
    ast::{Block, Expr},
    error::RuntimeError,
    interpreter::{
        environment::{EnvRef, Environment},
        evaluator::core::{EvalResult, Signal, eval_expr, eval_stmt},
        lexer::Position,
        value::core::{FnValue, Value},
    },
};

/// Builds a closure value over the current environment.
///
/// Used by function declarations (named) and function literals
/// (anonymous). The parameter list and body are shared with the AST
/// node; the environment reference is what the closure captures.
#[must_use]
pub fn make_closure(name: Option<String>,
                    params: &Rc<Vec<String>>,
                    body: &Rc<Block>,
                    env: &EnvRef)
                    -> Value {
    Value::Fn(Rc::new(FnValue { name,
                                params: Rc::clone(params),
                                body: Rc::clone(body),
                                env: Rc::clone(env) }))
}

/// Evaluates a call expression: the callee first, then the arguments in
/// source order, then the invocation.
pub fn eval_call(callee: &Expr, arguments: &[Expr], pos: &Position, env: &EnvRef) -> EvalResult {
    let callee = eval_expr(callee, env)?;

    let mut args = Vec::with_capacity(arguments.len());
    for argument in arguments {
        args.push(eval_expr(argument, env)?);
    }

    call_function(&callee, &args, pos)
}

/// Evaluates a pipeline: `left |> callee(args...)`.
///
/// The piped value is evaluated first, then the callee, then the
/// explicitly written arguments; the piped value is prepended to the
/// argument vector before invocation, so `x |> f(a, b)` is `f(x, a, b)`.
pub fn eval_pipeline(left: &Expr,
                     callee: &Expr,
                     arguments: &[Expr],
                     pos: &Position,
                     env: &EnvRef)
                     -> EvalResult {
    let piped = eval_expr(left, env)?;
    let callee = eval_expr(callee, env)?;

    let mut args = Vec::with_capacity(arguments.len() + 1);
    args.push(piped);
    for argument in arguments {
        args.push(eval_expr(argument, env)?);
    }

    call_function(&callee, &args, pos)
}

/// Invokes a callable value with already-evaluated arguments.
///
/// This is the single calling convention shared by call expressions,
/// pipelines, and the higher-order built-ins.
///
/// For a closure: the arity must match exactly; a child scope of the
/// *captured* environment is created and each parameter defined
/// immutably; the body then runs in that scope. A `Return` signal is
/// consumed here — zero values yield `none`, one value yields that
/// value, several yield an array. A body that ends without `return`
/// yields its natural block result.
///
/// For a built-in: the declared arity is checked, then the native
/// dispatcher is invoked with the evaluated arguments.
pub fn call_function(callee: &Value, args: &[Value], pos: &Position) -> EvalResult {
    match callee {
        Value::Fn(func) => {
            if args.len() != func.params.len() {
                let name = func.name.clone().unwrap_or_else(|| "<fn>".to_string());
                return Err(RuntimeError::ArityMismatch { name,
                                                         expected: format!("exactly {}",
                                                                           func.params.len()),
                                                         found: args.len(),
                                                         pos: pos.clone() }.into());
            }

            let scope = Environment::enclosed(&func.env);
            for (param, arg) in func.params.iter().zip(args) {
                scope.borrow_mut()
                     .define(param, arg.clone(), false)
                     .map_err(|_| RuntimeError::AlreadyDefined { name: param.clone(),
                                                                 pos:  pos.clone(), })?;
            }

            let mut result = Value::None;
            for stmt in &func.body.statements {
                match eval_stmt(stmt, &scope) {
                    Ok(value) => result = value,
                    Err(Signal::Return { values, .. }) => return Ok(collapse_returns(values)),
                    Err(other) => return Err(other),
                }
            }
            Ok(result)
        },
        Value::Builtin(builtin) => {
            if !builtin.arity.check(args.len()) {
                return Err(RuntimeError::ArityMismatch { name:     builtin.name.to_string(),
                                                         expected: builtin.arity.describe(),
                                                         found:    args.len(),
                                                         pos:      pos.clone(), }.into());
            }
            (builtin.func)(args, pos)
        },
        other => Err(RuntimeError::NotCallable { type_name: other.type_name(),
                                                 pos:       pos.clone(), }.into()),
    }
}

/// Collapses the value list of a consumed `Return` signal: zero values
/// become `none`, a single value is passed through unwrapped, and
/// multiple values become an array.
fn collapse_returns(mut values: Vec<Value>) -> Value {
    match values.len() {
        0 => Value::None,
        1 => values.pop().unwrap_or(Value::None),
        _ => Value::array(values),
    }
}
