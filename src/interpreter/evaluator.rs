/// Core evaluation: the [`Signal`](core::Signal) type, the recursive
/// statement/expression dispatch, program and block evaluation.
pub mod core;

/// Statement evaluation: bindings, assignment, conditionals, return, and
/// function declarations.
pub mod statement;

/// Loop evaluation.
///
/// Implements the three loop shapes, per-iteration scoping, and the
/// consumption of break/continue signals.
pub mod loops;

/// Match evaluation: pattern matching with guards, range patterns, and
/// arm-scoped identifier bindings.
pub mod matching;

/// Binary operator evaluation: short-circuit logic and the numeric
/// promotion table.
pub mod binary;

/// Unary operator evaluation.
pub mod unary;

/// Calls and closures.
///
/// Implements the calling convention shared by call expressions,
/// pipelines, and higher-order built-ins, including return-signal
/// interception.
pub mod call;

/// Value access: indexing, dot and safe access, literals, ranges,
/// coalescing, and string interpolation.
pub mod access;

/// The `test` block runner used by the `test` command.
pub mod test_runner;
