use std::rc::Rc;

use crate::{
    ast::{Block, ElifClause, Expr},
    error::RuntimeError,
    interpreter::{
        environment::{EnvError, EnvRef},
        evaluator::{
            call::make_closure,
            core::{EvalResult, Signal, eval_block, eval_expr},
        },
        lexer::Position,
        value::core::Value,
    },
};

/// Evaluates `let` and `mut` statements: evaluate the initializer, then
/// define the name in the current scope with the requested mutability.
///
/// Re-definition in the same scope is a runtime error; shadowing an
/// outer scope is fine. The statement's own result is `none`.
pub fn eval_binding(name: &str,
                    value: &Expr,
                    mutable: bool,
                    pos: &Position,
                    env: &EnvRef)
                    -> EvalResult {
    let value = eval_expr(value, env)?;
    env.borrow_mut()
       .define(name, value, mutable)
       .map_err(|_| RuntimeError::AlreadyDefined { name: name.to_string(),
                                                   pos:  pos.clone(), })?;
    Ok(Value::None)
}

/// Evaluates `x = <expr>`: evaluate the value, then overwrite the
/// nearest binding of `x`, which must exist and be mutable.
pub fn eval_assign(name: &str, value: &Expr, pos: &Position, env: &EnvRef) -> EvalResult {
    let value = eval_expr(value, env)?;
    env.borrow_mut().assign(name, value).map_err(|error| match error {
                                            EnvError::Immutable => {
                                                RuntimeError::ImmutableAssignment {
                                                    name: name.to_string(),
                                                    pos:  pos.clone(),
                                                }
                                            },
                                            _ => RuntimeError::UndefinedVariable {
                                                name: name.to_string(),
                                                pos:  pos.clone(),
                                            },
                                        })?;
    Ok(Value::None)
}

/// Evaluates `target[index] = <expr>` for arrays (integer index,
/// bounds-checked overwrite) and maps (string key, overwrite-or-insert).
pub fn eval_index_assign(target: &Expr,
                         index: &Expr,
                         value: &Expr,
                         pos: &Position,
                         env: &EnvRef)
                         -> EvalResult {
    let target = eval_expr(target, env)?;
    let index = eval_expr(index, env)?;
    let value = eval_expr(value, env)?;

    match target {
        Value::Array(elements) => {
            let i = match index {
                Value::Int(i) => i,
                other => {
                    return Err(RuntimeError::NonIntegerIndex { type_name: other.type_name(),
                                                               pos:       pos.clone(), }.into());
                },
            };
            let mut elements = elements.borrow_mut();
            let len = elements.len() as i64;
            if i < 0 || i >= len {
                return Err(RuntimeError::IndexOutOfBounds { index: i,
                                                            len,
                                                            pos: pos.clone() }.into());
            }
            elements[i as usize] = value;
            Ok(Value::None)
        },
        Value::Map(pairs) => {
            let key = match index {
                Value::Str(key) => key,
                other => {
                    return Err(RuntimeError::NonStringKey { type_name: other.type_name(),
                                                            pos:       pos.clone(), }.into());
                },
            };
            pairs.borrow_mut().insert(key, value);
            Ok(Value::None)
        },
        other => Err(RuntimeError::TypeMismatch { details: format!("cannot index into '{}'",
                                                                   other.type_name()),
                                                  pos:     pos.clone(), }.into()),
    }
}

/// Evaluates `return`, raising a [`Signal::Return`] carrying every
/// evaluated value.
pub fn eval_return(values: &[Expr], pos: &Position, env: &EnvRef) -> EvalResult {
    let mut evaluated = Vec::with_capacity(values.len());
    for expr in values {
        evaluated.push(eval_expr(expr, env)?);
    }
    Err(Signal::Return { values: evaluated,
                         pos:    pos.clone(), })
}

/// Evaluates an `if` statement.
///
/// The first truthy condition selects its block; `else` supplies the
/// result when nothing matched; with no `else` the result is `none`.
pub fn eval_if(condition: &Expr,
               consequence: &Block,
               elif_clauses: &[ElifClause],
               alternative: Option<&Block>,
               env: &EnvRef)
               -> EvalResult {
    if eval_expr(condition, env)?.is_truthy() {
        return eval_block(consequence, env);
    }

    for clause in elif_clauses {
        if eval_expr(&clause.condition, env)?.is_truthy() {
            return eval_block(&clause.consequence, env);
        }
    }

    match alternative {
        Some(block) => eval_block(block, env),
        None => Ok(Value::None),
    }
}

/// Evaluates a function declaration: builds a closure over the current
/// environment and binds it immutably under the declared name.
pub fn eval_fn_decl(name: &str,
                    params: &Rc<Vec<String>>,
                    body: &Rc<Block>,
                    pos: &Position,
                    env: &EnvRef)
                    -> EvalResult {
    let closure = make_closure(Some(name.to_string()), params, body, env);
    env.borrow_mut()
       .define(name, closure, false)
       .map_err(|_| RuntimeError::AlreadyDefined { name: name.to_string(),
                                                   pos:  pos.clone(), })?;
    Ok(Value::None)
}
