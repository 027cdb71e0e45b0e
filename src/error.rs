/// Parse diagnostics.
///
/// Defines the diagnostic type collected by the parser. Parse errors
/// cover syntax mistakes, unexpected tokens, invalid assignment targets,
/// and malformed pipelines or interpolations.
pub mod parse_error;
/// Runtime errors.
///
/// Contains all error types that can be raised during evaluation:
/// type mismatches, arity mismatches, undefined variables, immutable
/// assignment, out-of-bounds indexing, and control-flow signals that
/// escaped their consumers.
pub mod runtime_error;

pub use parse_error::ParseError;
pub use runtime_error::RuntimeError;

/// Either outcome of running a source string: a list of parse
/// diagnostics, or the runtime error that aborted evaluation.
#[derive(Debug)]
pub enum InterpreterError {
    /// Parsing recorded at least one diagnostic; evaluation never ran.
    Parse(Vec<ParseError>),
    /// Parsing succeeded but evaluation failed.
    Runtime(RuntimeError),
}

impl std::fmt::Display for InterpreterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(diagnostics) => {
                for (index, diagnostic) in diagnostics.iter().enumerate() {
                    if index > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "parse error: {diagnostic}")?;
                }
                Ok(())
            },
            Self::Runtime(error) => write!(f, "{error}"),
        }
    }
}

impl std::error::Error for InterpreterError {}

impl From<RuntimeError> for InterpreterError {
    fn from(error: RuntimeError) -> Self {
        Self::Runtime(error)
    }
}
