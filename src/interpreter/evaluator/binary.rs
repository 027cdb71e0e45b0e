use crate::{
    ast::{BinaryOp, Expr},
    error::RuntimeError,
    interpreter::{
        environment::EnvRef,
        evaluator::core::{EvalResult, eval_expr},
        lexer::Position,
        value::core::Value,
    },
};

/// Evaluates a binary expression.
///
/// `&&` and `||` short-circuit: the right operand is evaluated only when
/// the left does not decide the outcome, and the deciding operand is the
/// expression's value. All other operators evaluate both sides and
/// dispatch through the numeric promotion table:
///
/// | left | right | result |
/// |---|---|---|
/// | int | int | integer `+ - * / %`, comparisons |
/// | int/float mixed | | float `+ - * /`, comparisons (int promoted) |
/// | string | string | `+` concatenation, lexicographic comparisons |
/// | any | any | `==` `!=` via structural equality |
pub fn eval_binary(op: BinaryOp,
                   left: &Expr,
                   right: &Expr,
                   pos: &Position,
                   env: &EnvRef)
                   -> EvalResult {
    let left = eval_expr(left, env)?;

    match op {
        BinaryOp::And => {
            if !left.is_truthy() {
                return Ok(left);
            }
            return eval_expr(right, env);
        },
        BinaryOp::Or => {
            if left.is_truthy() {
                return Ok(left);
            }
            return eval_expr(right, env);
        },
        _ => {},
    }

    let right = eval_expr(right, env)?;
    apply_binary(op, &left, &right, pos)
}

/// Applies a non-short-circuit binary operator to two evaluated values.
///
/// Exposed separately so compound operations (index assignment, the
/// `sort` comparator fallback) can reuse it.
pub fn apply_binary(op: BinaryOp, left: &Value, right: &Value, pos: &Position) -> EvalResult {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => eval_int_op(op, *a, *b, left, right, pos),
        (Value::Int(a), Value::Float(b)) => eval_float_op(op, *a as f64, *b, left, right, pos),
        (Value::Float(a), Value::Int(b)) => eval_float_op(op, *a, *b as f64, left, right, pos),
        (Value::Float(a), Value::Float(b)) => eval_float_op(op, *a, *b, left, right, pos),
        (Value::Str(a), Value::Str(b)) => eval_str_op(op, a, b, pos),
        _ => match op {
            BinaryOp::Eq => Ok(Value::Bool(left == right)),
            BinaryOp::NotEq => Ok(Value::Bool(left != right)),
            _ => Err(unsupported(op, left, right, pos)),
        },
    }
}

/// Integer/integer operations. Division truncates toward zero; division
/// and modulo by zero are runtime errors. Arithmetic wraps on overflow.
fn eval_int_op(op: BinaryOp,
               a: i64,
               b: i64,
               left: &Value,
               right: &Value,
               pos: &Position)
               -> EvalResult {
    match op {
        BinaryOp::Add => Ok(Value::Int(a.wrapping_add(b))),
        BinaryOp::Sub => Ok(Value::Int(a.wrapping_sub(b))),
        BinaryOp::Mul => Ok(Value::Int(a.wrapping_mul(b))),
        BinaryOp::Div => {
            if b == 0 {
                return Err(RuntimeError::DivisionByZero { pos: pos.clone() }.into());
            }
            Ok(Value::Int(a.wrapping_div(b)))
        },
        BinaryOp::Mod => {
            if b == 0 {
                return Err(RuntimeError::ModuloByZero { pos: pos.clone() }.into());
            }
            Ok(Value::Int(a.wrapping_rem(b)))
        },
        BinaryOp::Less => Ok(Value::Bool(a < b)),
        BinaryOp::Greater => Ok(Value::Bool(a > b)),
        BinaryOp::LessEq => Ok(Value::Bool(a <= b)),
        BinaryOp::GreaterEq => Ok(Value::Bool(a >= b)),
        BinaryOp::Eq => Ok(Value::Bool(a == b)),
        BinaryOp::NotEq => Ok(Value::Bool(a != b)),
        BinaryOp::And | BinaryOp::Or => Err(unsupported(op, left, right, pos)),
    }
}

/// Float operations, after promotion of any integer operand. There is no
/// float modulo.
fn eval_float_op(op: BinaryOp,
                 a: f64,
                 b: f64,
                 left: &Value,
                 right: &Value,
                 pos: &Position)
                 -> EvalResult {
    match op {
        BinaryOp::Add => Ok(Value::Float(a + b)),
        BinaryOp::Sub => Ok(Value::Float(a - b)),
        BinaryOp::Mul => Ok(Value::Float(a * b)),
        BinaryOp::Div => {
            if b == 0.0 {
                return Err(RuntimeError::DivisionByZero { pos: pos.clone() }.into());
            }
            Ok(Value::Float(a / b))
        },
        BinaryOp::Less => Ok(Value::Bool(a < b)),
        BinaryOp::Greater => Ok(Value::Bool(a > b)),
        BinaryOp::LessEq => Ok(Value::Bool(a <= b)),
        BinaryOp::GreaterEq => Ok(Value::Bool(a >= b)),
        BinaryOp::Eq => Ok(Value::Bool(a == b)),
        BinaryOp::NotEq => Ok(Value::Bool(a != b)),
        BinaryOp::Mod | BinaryOp::And | BinaryOp::Or => Err(unsupported(op, left, right, pos)),
    }
}

/// String operations: concatenation with `+`, lexicographic ordering for
/// the comparison operators, structural equality.
fn eval_str_op(op: BinaryOp, a: &str, b: &str, pos: &Position) -> EvalResult {
    match op {
        BinaryOp::Add => Ok(Value::Str(format!("{a}{b}"))),
        BinaryOp::Less => Ok(Value::Bool(a < b)),
        BinaryOp::Greater => Ok(Value::Bool(a > b)),
        BinaryOp::LessEq => Ok(Value::Bool(a <= b)),
        BinaryOp::GreaterEq => Ok(Value::Bool(a >= b)),
        BinaryOp::Eq => Ok(Value::Bool(a == b)),
        BinaryOp::NotEq => Ok(Value::Bool(a != b)),
        _ => Err(unsupported(op, &Value::Str(a.to_string()), &Value::Str(b.to_string()), pos)),
    }
}

fn unsupported(op: BinaryOp, left: &Value, right: &Value, pos: &Position)
               -> crate::interpreter::evaluator::core::Signal {
    RuntimeError::UnsupportedOperator { op:    op.to_string(),
                                        left:  left.type_name(),
                                        right: right.type_name(),
                                        pos:   pos.clone(), }.into()
}
