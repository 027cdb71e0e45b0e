//! # rill
//!
//! rill is an interpreter for a small imperative, expression-oriented
//! scripting language with immutable-by-default bindings, a unified
//! looping construct, pattern matching, pipelines, ranges, and string
//! interpolation.
//!
//! The crate is built around a three-stage core: a scanner producing
//! positioned tokens, a Pratt-style recursive-descent parser producing a
//! tagged AST, and a tree-walking evaluator with lexically scoped
//! environments and signal-based control flow.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
)]
#![allow(clippy::missing_errors_doc)]

use crate::{
    error::InterpreterError,
    interpreter::{
        environment::{EnvRef, Environment},
        evaluator::core::eval_program,
        lexer,
        parser,
        value::core::Value,
    },
};

/// Defines the structure of parsed code.
///
/// This module declares the statement and expression enums that
/// represent the syntactic structure of source code as a tree. The AST
/// is built by the parser and traversed by the evaluator.
///
/// # Responsibilities
/// - Defines statement and expression variants for all language
///   constructs.
/// - Attaches source positions to every node for error reporting.
/// - Shares function bodies behind `Rc` so closures reference them
///   cheaply.
pub mod ast;
/// Provides unified error types for parsing and evaluation.
///
/// This module defines all errors that can be raised while lexing,
/// parsing, or evaluating code: parser diagnostics with positions, and
/// runtime errors with kind, message and position.
///
/// # Responsibilities
/// - Defines error enums for parse-time and run-time failures.
/// - Attaches positions and detailed messages for user feedback.
/// - Supports integration with standard error handling traits.
pub mod error;
/// Orchestrates the entire process of code execution.
///
/// This module ties together lexing, parsing, evaluation, environments,
/// values and built-ins to provide a complete runtime for rill source
/// code.
///
/// # Responsibilities
/// - Coordinates all core components: lexer, parser, evaluator, values.
/// - Provides the entry points used by `run`, `test` and the REPL.
/// - Manages the flow of data and errors between phases.
pub mod interpreter;
/// The interactive line-oriented REPL.
///
/// Each line is lexed, parsed and evaluated against a persistent root
/// environment with built-ins pre-registered.
pub mod repl;

/// Executes a source string in a fresh environment.
///
/// A new root environment is created and the built-ins registered, then
/// the source is scanned, parsed, and evaluated. Parse diagnostics
/// abort before evaluation.
///
/// # Errors
/// [`InterpreterError::Parse`] when the parser recorded diagnostics,
/// [`InterpreterError::Runtime`] when evaluation failed.
///
/// # Examples
/// ```
/// use rill::{execute, interpreter::value::core::Value};
///
/// let result = execute("let x = 2\nx + 3", "demo.rill").unwrap();
/// assert_eq!(result, Value::Int(5));
///
/// // 'y' is not defined, so evaluation fails.
/// assert!(execute("y + 1", "demo.rill").is_err());
/// ```
pub fn execute(source: &str, file: &str) -> Result<Value, InterpreterError> {
    let env = Environment::new();
    interpreter::builtins::register(&env);
    execute_in(source, file, &env)
}

/// Executes a source string against an existing environment.
///
/// Used by the REPL, where bindings persist across lines. The caller is
/// responsible for registering built-ins into `env`.
///
/// # Errors
/// [`InterpreterError::Parse`] when the parser recorded diagnostics,
/// [`InterpreterError::Runtime`] when evaluation failed.
pub fn execute_in(source: &str, file: &str, env: &EnvRef) -> Result<Value, InterpreterError> {
    let tokens = lexer::scan(source, file);
    let (program, diagnostics) = parser::core::parse(tokens);
    if !diagnostics.is_empty() {
        return Err(InterpreterError::Parse(diagnostics));
    }
    eval_program(&program, env).map_err(InterpreterError::Runtime)
}
