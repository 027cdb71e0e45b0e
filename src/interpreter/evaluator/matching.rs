use crate::{
    ast::{Expr, MatchArm},
    interpreter::{
        environment::{EnvRef, Environment},
        evaluator::core::{EvalResult, eval_block, eval_expr},
        value::core::Value,
    },
};

/// Evaluates a `match` statement.
///
/// The subject is evaluated once, then arms are tried in order. Each arm
/// gets its own child scope: identifier patterns bind the subject there,
/// so bindings are visible to the arm's guard and body but never leak to
/// other arms or out of the match. The first arm whose pattern matches
/// and whose guard (if any) is truthy supplies the result; with no
/// matching arm the result is `none`.
pub fn eval_match(subject: &Expr, arms: &[MatchArm], env: &EnvRef) -> EvalResult {
    let subject = eval_expr(subject, env)?;

    for arm in arms {
        let arm_scope = Environment::enclosed(env);
        if !match_pattern(&arm.pattern, &subject, &arm_scope)? {
            continue;
        }

        if let Some(guard) = &arm.guard
           && !eval_expr(guard, &arm_scope)?.is_truthy()
        {
            continue;
        }

        return eval_block(&arm.body, &arm_scope);
    }

    Ok(Value::None)
}

/// Attempts to match one pattern against the subject.
///
/// Supported patterns:
/// - `_` matches anything.
/// - int, float, string, bool and `none` literals match structurally.
/// - A range pattern matches an integer subject within `[start, end)`.
/// - A plain identifier binds the subject into `arm_scope` and matches
///   unconditionally.
///
/// Anything else simply fails to match.
fn match_pattern(pattern: &Expr, subject: &Value, arm_scope: &EnvRef) -> EvalResult<bool> {
    match pattern {
        Expr::Wildcard { .. } => Ok(true),
        Expr::Int { value, .. } => Ok(matches!(subject, Value::Int(n) if n == value)),
        Expr::Float { value, .. } => Ok(matches!(subject, Value::Float(n) if n == value)),
        Expr::Str { value, .. } => Ok(matches!(subject, Value::Str(s) if s == value)),
        Expr::Bool { value, .. } => Ok(matches!(subject, Value::Bool(b) if b == value)),
        Expr::None { .. } => Ok(subject.is_none()),
        Expr::Range { start, end, .. } => {
            let Value::Int(n) = subject else { return Ok(false) };
            let start = eval_expr(start, arm_scope)?;
            let end = eval_expr(end, arm_scope)?;
            let (Value::Int(start), Value::Int(end)) = (start, end) else {
                return Ok(false);
            };
            Ok(*n >= start && *n < end)
        },
        Expr::Ident { name, .. } => {
            // The arm scope is freshly created, so the define cannot
            // collide.
            let _ = arm_scope.borrow_mut().define(name, subject.clone(), false);
            Ok(true)
        },
        _ => Ok(false),
    }
}
