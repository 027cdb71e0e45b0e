use crate::{
    ast::{Program, Stmt},
    error::RuntimeError,
    interpreter::{
        environment::{EnvRef, Environment},
        evaluator::core::{Signal, eval_block, eval_stmt},
    },
};

/// The outcome of one `test` block.
#[derive(Debug, Clone, PartialEq)]
pub struct TestOutcome {
    /// The test's description string.
    pub description: String,
    /// Whether the body completed without error.
    pub passed:      bool,
    /// The failure message, when the test failed.
    pub message:     Option<String>,
}

/// Evaluates a program's test blocks.
///
/// First every non-`test` statement is evaluated once against `env` to
/// populate the root environment (function declarations, shared
/// fixtures). Then each `test` block's body runs in a fresh child scope;
/// a body that completes without error passes, and any runtime error —
/// including a failed `assert` or a `return` escaping the body — fails
/// that test with its message captured.
///
/// # Errors
/// Returns the runtime error if one of the *non-test* statements fails;
/// no tests have run in that case.
pub fn run_tests(program: &Program, env: &EnvRef) -> Result<Vec<TestOutcome>, RuntimeError> {
    for stmt in &program.statements {
        if matches!(stmt, Stmt::Test { .. }) {
            continue;
        }
        eval_stmt(stmt, env).map_err(Signal::into_runtime_error)?;
    }

    let mut outcomes = Vec::new();
    for stmt in &program.statements {
        let Stmt::Test { description, body, .. } = stmt else { continue };

        let scope = Environment::enclosed(env);
        let outcome = match eval_block(body, &scope) {
            Ok(_) => TestOutcome { description: description.clone(),
                                   passed:      true,
                                   message:     None, },
            Err(signal) => {
                let error = signal.into_runtime_error();
                TestOutcome { description: description.clone(),
                              passed:      false,
                              message:     Some(error.message()), }
            },
        };
        outcomes.push(outcome);
    }

    Ok(outcomes)
}
