use crate::interpreter::lexer::Position;

/// Represents all errors that can occur during evaluation.
///
/// Every variant carries the source position of the construct whose
/// evaluation failed. A runtime error aborts the current top-level
/// statement (`run`), the current test (`test`), or the current line
/// (REPL).
#[derive(Debug, Clone, PartialEq)]
pub enum RuntimeError {
    /// Tried to read a name with no binding in scope.
    UndefinedVariable {
        /// The name that failed to resolve.
        name: String,
        /// Where the reference occurred.
        pos:  Position,
    },
    /// Tried to bind a name that already exists in the same scope.
    AlreadyDefined {
        /// The re-declared name.
        name: String,
        /// Where the declaration occurred.
        pos:  Position,
    },
    /// Tried to assign to a `let` binding.
    ImmutableAssignment {
        /// The immutable name.
        name: String,
        /// Where the assignment occurred.
        pos:  Position,
    },
    /// An index fell outside a collection's bounds.
    IndexOutOfBounds {
        /// The requested index.
        index: i64,
        /// The collection length.
        len:   i64,
        /// Where the access occurred.
        pos:   Position,
    },
    /// Integer or float division with a zero divisor.
    DivisionByZero {
        /// Where the division occurred.
        pos: Position,
    },
    /// Integer modulo with a zero divisor.
    ModuloByZero {
        /// Where the operation occurred.
        pos: Position,
    },
    /// Tried to call a value that is neither a function nor a built-in.
    NotCallable {
        /// Type name of the called value.
        type_name: &'static str,
        /// Where the call occurred.
        pos:       Position,
    },
    /// A binary operator applied to operand types it does not support.
    UnsupportedOperator {
        /// The operator lexeme.
        op:    String,
        /// Type name of the left operand.
        left:  &'static str,
        /// Type name of the right operand.
        right: &'static str,
        /// Where the operation occurred.
        pos:   Position,
    },
    /// A map was keyed with a non-string value.
    NonStringKey {
        /// Type name of the offending key.
        type_name: &'static str,
        /// Where the access occurred.
        pos:       Position,
    },
    /// An array, range, or string was indexed with a non-integer.
    NonIntegerIndex {
        /// Type name of the offending index.
        type_name: &'static str,
        /// Where the access occurred.
        pos:       Position,
    },
    /// A value had an unexpected type for the operation.
    TypeMismatch {
        /// Details about the mismatch.
        details: String,
        /// Where the operation occurred.
        pos:     Position,
    },
    /// A callable was invoked with the wrong number of arguments.
    ArityMismatch {
        /// Name of the callable.
        name:     String,
        /// Description of the accepted argument count.
        expected: String,
        /// The argument count actually supplied.
        found:    usize,
        /// Where the call occurred.
        pos:      Position,
    },
    /// An `assert` call received a falsy value.
    AssertionFailed {
        /// The assertion message.
        message: String,
        /// Where the assertion occurred.
        pos:     Position,
    },
    /// A built-in received an argument it cannot work with.
    InvalidArgument {
        /// Details about the argument.
        details: String,
        /// Where the call occurred.
        pos:     Position,
    },
    /// A `return` reached the top of the program without an enclosing
    /// function.
    ReturnOutsideFunction {
        /// Where the `return` occurred.
        pos: Position,
    },
    /// A `break` reached the top of the program without an enclosing
    /// loop.
    BreakOutsideLoop {
        /// Where the `break` occurred.
        pos: Position,
    },
    /// A `continue` reached the top of the program without an enclosing
    /// loop.
    ContinueOutsideLoop {
        /// Where the `continue` occurred.
        pos: Position,
    },
}

impl RuntimeError {
    /// Gets the source position of `self`.
    #[must_use]
    pub const fn pos(&self) -> &Position {
        match self {
            Self::UndefinedVariable { pos, .. }
            | Self::AlreadyDefined { pos, .. }
            | Self::ImmutableAssignment { pos, .. }
            | Self::IndexOutOfBounds { pos, .. }
            | Self::DivisionByZero { pos }
            | Self::ModuloByZero { pos }
            | Self::NotCallable { pos, .. }
            | Self::UnsupportedOperator { pos, .. }
            | Self::NonStringKey { pos, .. }
            | Self::NonIntegerIndex { pos, .. }
            | Self::TypeMismatch { pos, .. }
            | Self::ArityMismatch { pos, .. }
            | Self::AssertionFailed { pos, .. }
            | Self::InvalidArgument { pos, .. }
            | Self::ReturnOutsideFunction { pos }
            | Self::BreakOutsideLoop { pos }
            | Self::ContinueOutsideLoop { pos } => pos,
        }
    }

    /// Formats the message part of the error, without the position
    /// prefix.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::UndefinedVariable { name, .. } => format!("undefined variable '{name}'"),
            Self::AlreadyDefined { name, .. } => {
                format!("variable '{name}' is already defined in this scope")
            },
            Self::ImmutableAssignment { name, .. } => {
                format!("cannot assign to immutable variable '{name}'")
            },
            Self::IndexOutOfBounds { index, len, .. } => {
                format!("index {index} out of bounds (len {len})")
            },
            Self::DivisionByZero { .. } => "division by zero".to_string(),
            Self::ModuloByZero { .. } => "modulo by zero".to_string(),
            Self::NotCallable { type_name, .. } => format!("'{type_name}' is not callable"),
            Self::UnsupportedOperator { op, left, right, .. } => {
                format!("unsupported operator '{op}' for types '{left}' and '{right}'")
            },
            Self::NonStringKey { type_name, .. } => {
                format!("map key must be a string, got '{type_name}'")
            },
            Self::NonIntegerIndex { type_name, .. } => {
                format!("index must be an integer, got '{type_name}'")
            },
            Self::TypeMismatch { details, .. } => details.clone(),
            Self::ArityMismatch { name, expected, found, .. } => {
                format!("{name}() takes {expected} arguments, got {found}")
            },
            Self::AssertionFailed { message, .. } => message.clone(),
            Self::InvalidArgument { details, .. } => details.clone(),
            Self::ReturnOutsideFunction { .. } => "return outside function".to_string(),
            Self::BreakOutsideLoop { .. } => "break outside loop".to_string(),
            Self::ContinueOutsideLoop { .. } => "continue outside loop".to_string(),
        }
    }
}

impl std::fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "runtime error at {}: {}", self.pos(), self.message())
    }
}

impl std::error::Error for RuntimeError {}
