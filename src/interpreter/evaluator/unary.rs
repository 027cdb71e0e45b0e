use crate::{
    ast::{Expr, UnaryOp},
    error::RuntimeError,
    interpreter::{
        environment::EnvRef,
        evaluator::core::{EvalResult, eval_expr},
        lexer::Position,
        value::core::Value,
    },
};

/// Evaluates a prefix unary expression.
///
/// `-` negates integers and floats; `!` yields the negated truthiness of
/// any operand.
pub fn eval_unary(op: UnaryOp, operand: &Expr, pos: &Position, env: &EnvRef) -> EvalResult {
    let operand = eval_expr(operand, env)?;

    match op {
        UnaryOp::Neg => match operand {
            Value::Int(n) => Ok(Value::Int(n.wrapping_neg())),
            Value::Float(n) => Ok(Value::Float(-n)),
            other => Err(RuntimeError::TypeMismatch { details: format!("cannot negate '{}'",
                                                                       other.type_name()),
                                                      pos:     pos.clone(), }.into()),
        },
        UnaryOp::Not => Ok(Value::Bool(!operand.is_truthy())),
    }
}
