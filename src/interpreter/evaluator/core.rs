use crate::{
    ast::{Block, Expr, Program, Stmt},
    error::RuntimeError,
    interpreter::{
        environment::{EnvRef, Environment},
        evaluator::{access, binary, call, loops, matching, statement, unary},
        lexer::Position,
        value::core::Value,
    },
};

/// A typed interruption of evaluation.
///
/// Signals unwind the evaluator until a construct consumes them: loops
/// consume `Break` and `Continue`, function calls consume `Return`, and
/// `Error` propagates to the program boundary. Signals themselves are
/// never shown to users; one that escapes all of its consumers is
/// converted into a runtime error by [`Signal::into_runtime_error`].
#[derive(Debug, Clone, PartialEq)]
pub enum Signal {
    /// Raised by `return`; consumed by function calls.
    Return {
        /// The returned values; zero, one, or several.
        values: Vec<Value>,
        /// Position of the `return` statement.
        pos:    Position,
    },
    /// Raised by `break`; consumed by loops.
    Break {
        /// Position of the `break` statement.
        pos: Position,
    },
    /// Raised by `continue`; consumed by loops.
    Continue {
        /// Position of the `continue` statement.
        pos: Position,
    },
    /// A runtime error; never consumed, only propagated.
    Error(RuntimeError),
}

impl Signal {
    /// Converts an escaped signal into the runtime error shown to the
    /// user. Called at program boundaries: the top level, a test body,
    /// and each REPL line.
    #[must_use]
    pub fn into_runtime_error(self) -> RuntimeError {
        match self {
            Self::Return { pos, .. } => RuntimeError::ReturnOutsideFunction { pos },
            Self::Break { pos } => RuntimeError::BreakOutsideLoop { pos },
            Self::Continue { pos } => RuntimeError::ContinueOutsideLoop { pos },
            Self::Error(error) => error,
        }
    }
}

impl From<RuntimeError> for Signal {
    fn from(error: RuntimeError) -> Self {
        Self::Error(error)
    }
}

/// Result type used throughout the evaluator.
///
/// Evaluation either produces a value or raises a [`Signal`].
pub type EvalResult<T = Value> = Result<T, Signal>;

/// Evaluates a whole program against an environment.
///
/// Statements execute in source order; the program's result is the value
/// of its last statement. A signal escaping the top level is converted
/// into the corresponding runtime error.
pub fn eval_program(program: &Program, env: &EnvRef) -> Result<Value, RuntimeError> {
    let mut result = Value::None;
    for stmt in &program.statements {
        result = eval_stmt(stmt, env).map_err(Signal::into_runtime_error)?;
    }
    Ok(result)
}

/// Evaluates a single statement. This is one half of the evaluator's
/// recursive dispatch; [`eval_expr`] is the other.
pub fn eval_stmt(stmt: &Stmt, env: &EnvRef) -> EvalResult {
    match stmt {
        Stmt::Let { name, value, pos } => statement::eval_binding(name, value, false, pos, env),
        Stmt::Mut { name, value, pos } => statement::eval_binding(name, value, true, pos, env),
        Stmt::Assign { name, value, pos } => statement::eval_assign(name, value, pos, env),
        Stmt::IndexAssign { target,
                            index,
                            value,
                            pos, } => statement::eval_index_assign(target, index, value, pos, env),
        Stmt::Expression { expr, .. } => eval_expr(expr, env),
        Stmt::Return { values, pos } => statement::eval_return(values, pos, env),
        Stmt::If { condition,
                   consequence,
                   elif_clauses,
                   alternative,
                   .. } => statement::eval_if(condition, consequence, elif_clauses,
                                              alternative.as_ref(), env),
        Stmt::Loop { condition,
                     iterator,
                     iterable,
                     body,
                     pos, } => loops::eval_loop(condition.as_ref(),
                                                iterator.as_deref(),
                                                iterable.as_ref(),
                                                body,
                                                pos,
                                                env),
        Stmt::Break { pos } => Err(Signal::Break { pos: pos.clone() }),
        Stmt::Continue { pos } => Err(Signal::Continue { pos: pos.clone() }),
        Stmt::FnDecl { name, params, body, pos } => {
            statement::eval_fn_decl(name, params, body, pos, env)
        },
        Stmt::Match { subject, arms, .. } => matching::eval_match(subject, arms, env),
        // Test blocks are no-ops under normal execution; the test runner
        // collects them separately.
        Stmt::Test { .. } => Ok(Value::None),
    }
}

/// Evaluates a single expression.
pub fn eval_expr(expr: &Expr, env: &EnvRef) -> EvalResult {
    match expr {
        Expr::Int { value, .. } => Ok(Value::Int(*value)),
        Expr::Float { value, .. } => Ok(Value::Float(*value)),
        Expr::Str { value, .. } => Ok(Value::Str(value.clone())),
        Expr::Bool { value, .. } => Ok(Value::Bool(*value)),
        Expr::None { .. } => Ok(Value::None),
        Expr::Ident { name, pos } => {
            env.borrow().get(name).map_or_else(|| {
                                                   Err(RuntimeError::UndefinedVariable {
                        name: name.clone(),
                        pos:  pos.clone(),
                    }.into())
                                               },
                                               Ok)
        },
        Expr::Interpolation { parts, .. } => access::eval_interpolation(parts, env),
        Expr::Binary { op, left, right, pos } => binary::eval_binary(*op, left, right, pos, env),
        Expr::Unary { op, operand, pos } => unary::eval_unary(*op, operand, pos, env),
        Expr::Call { callee, arguments, pos } => call::eval_call(callee, arguments, pos, env),
        Expr::Index { left, index, pos } => access::eval_index(left, index, pos, env),
        Expr::Dot { left, field, pos } => access::eval_dot(left, field, pos, env),
        Expr::SafeAccess { left, field, pos } => access::eval_safe_access(left, field, pos, env),
        Expr::ArrayLit { elements, .. } => access::eval_array_literal(elements, env),
        Expr::MapLit { keys, values, pos } => access::eval_map_literal(keys, values, pos, env),
        Expr::FnLit { params, body, .. } => Ok(call::make_closure(None, params, body, env)),
        Expr::Range { start, end, step, pos } => {
            access::eval_range(start, end, step.as_deref(), pos, env)
        },
        Expr::Pipeline { left,
                         callee,
                         arguments,
                         pos, } => call::eval_pipeline(left, callee, arguments, pos, env),
        Expr::Coalesce { left, right, .. } => access::eval_coalesce(left, right, env),
        Expr::Wildcard { pos } => {
            // Wildcards only appear as match patterns; evaluating one
            // directly means it was used outside a match.
            Err(RuntimeError::TypeMismatch { details: "'_' is only valid as a match pattern"
                                                 .to_string(),
                                             pos:     pos.clone(), }.into())
        },
    }
}

/// Evaluates a block in a fresh child scope.
///
/// The block's result is the value of its last statement, or `none`
/// when the block is empty. Bindings created inside the block do not
/// escape it. Signals propagate out untouched.
pub fn eval_block(block: &Block, env: &EnvRef) -> EvalResult {
    let scope = Environment::enclosed(env);
    let mut result = Value::None;
    for stmt in &block.statements {
        result = eval_stmt(stmt, &scope)?;
    }
    Ok(result)
}
