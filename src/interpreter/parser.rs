/// Core parser machinery: the `Parser` struct, the Pratt precedence
/// table, the top-level `parse` entry point, and error recovery.
pub mod core;

/// Statement parsing.
///
/// Dispatches on the leading token and handles bindings, function
/// declarations, control flow, match statements, test blocks, and the
/// expression-or-assignment fallback.
pub mod statement;

/// Block parsing.
///
/// Parses brace-delimited statement sequences shared by every construct
/// with a body.
pub mod block;

/// Prefix expression parsing.
///
/// Literals, identifiers, grouping, array and map literals, function
/// literals, unary operators, and the string-interpolation pass.
pub mod primary;

/// Infix expression parsing.
///
/// Binary operators, calls, indexing, field access, safe access,
/// pipelines, ranges, and coalescing.
pub mod infix;
