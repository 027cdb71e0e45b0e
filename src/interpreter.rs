/// The lexer module tokenizes source code for further parsing.
///
/// The scanner reads the raw source text and produces a flat, positioned
/// token sequence terminated by an end-of-input token. This is the first
/// stage of interpretation.
///
/// # Responsibilities
/// - Converts the input character stream into tokens with 1-indexed
///   source positions.
/// - Handles numeric and string literals (including escape processing),
///   identifiers, keywords, and operators with longest-match.
/// - Emits illegal tokens for unrecognized input and keeps scanning.
pub mod lexer;

/// The parser module builds the abstract syntax tree (AST) from tokens.
///
/// Recursive descent drives statements; Pratt precedence climbing drives
/// expressions. The parser always returns a (possibly partial) program
/// together with a list of diagnostics.
///
/// # Responsibilities
/// - Converts tokens into structured AST nodes.
/// - Records diagnostics with positions and synchronizes to the next
///   statement boundary on malformed input.
/// - Expands `${...}` string interpolation into dedicated AST nodes.
pub mod parser;

/// The environment module implements lexically scoped variable storage.
///
/// A scope maps names to (value, mutability) bindings and links to its
/// parent scope. Closures retain a reference to their defining scope.
///
/// # Responsibilities
/// - Defines bindings in the current scope, rejecting same-scope
///   re-definition.
/// - Resolves and assigns names by walking the parent chain.
/// - Tracks mutability so `let` bindings stay immutable.
pub mod environment;

/// The value module defines the runtime data types for evaluation.
///
/// Declares the closed set of value variants a rill expression can
/// produce, along with truthiness, structural equality, display
/// formatting, and the built-in function value shape.
///
/// # Responsibilities
/// - Defines the `Value` enum and all supported variants.
/// - Implements equality, truthiness, and string representation.
/// - Provides the shared, in-place-mutable array and map containers.
pub mod value;

/// The evaluator module executes AST nodes and computes results.
///
/// A single recursive walk over the AST against an environment. Control
/// flow (`return`, `break`, `continue`) travels as typed signals that
/// unwind evaluation until a loop or call consumes them.
///
/// # Responsibilities
/// - Evaluates statements and expressions, enforcing the numeric
///   promotion table and structural equality.
/// - Implements closures, pattern matching, pipelines, and the three
///   loop shapes.
/// - Converts escaped signals into runtime errors at program
///   boundaries.
pub mod evaluator;

/// The built-in function library registered into the root environment.
///
/// Built-ins are ordinary callable values; the evaluator invokes them
/// through the same calling convention as user functions and never
/// inspects their identities.
pub mod builtins;
