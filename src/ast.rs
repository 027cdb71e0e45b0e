use std::rc::Rc;

use crate::interpreter::lexer::Position;

/// The root of every parsed rill program: a flat list of statements.
///
/// A `Program` is produced by the parser even when diagnostics were
/// recorded; statements that failed to parse are simply absent.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    /// Top-level statements in source order.
    pub statements: Vec<Stmt>,
}

/// A brace-delimited sequence of statements.
///
/// Blocks appear as the bodies of functions, loops, conditionals, match
/// arms and test blocks. Evaluating a block yields the value of its last
/// statement, or `none` when the block is empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    /// Statements inside the block.
    pub statements: Vec<Stmt>,
    /// Position of the opening brace.
    pub pos:        Position,
}

/// One `elif` branch of an `if` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct ElifClause {
    /// The branch condition.
    pub condition:   Expr,
    /// The branch body.
    pub consequence: Block,
}

/// One arm of a `match` statement: a pattern, an optional guard, and a
/// body.
///
/// Single-expression arm bodies are wrapped by the parser into a
/// one-statement block, so every arm body is a [`Block`] producing a
/// value.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchArm {
    /// The pattern: a literal, a range, an identifier, or `_`.
    pub pattern: Expr,
    /// Optional `if` guard evaluated after the pattern matches.
    pub guard:   Option<Expr>,
    /// The arm body.
    pub body:    Block,
}

/// A statement: a syntactic construct evaluated for effect rather than
/// denoting a value of its own (although evaluating one may still produce
/// a value, e.g. an expression statement).
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `let x = <expr>` — immutable binding.
    Let {
        /// The bound name.
        name:  String,
        /// The initializer expression.
        value: Expr,
        /// Position of the `let` keyword.
        pos:   Position,
    },
    /// `mut x = <expr>` — mutable binding.
    Mut {
        /// The bound name.
        name:  String,
        /// The initializer expression.
        value: Expr,
        /// Position of the `mut` keyword.
        pos:   Position,
    },
    /// `x = <expr>` — assignment to an existing binding.
    Assign {
        /// The target name.
        name:  String,
        /// The assigned expression.
        value: Expr,
        /// Position of the target.
        pos:   Position,
    },
    /// `target[index] = <expr>` — in-place element assignment.
    IndexAssign {
        /// The indexed collection expression.
        target: Expr,
        /// The index expression.
        index:  Expr,
        /// The assigned expression.
        value:  Expr,
        /// Position of the target.
        pos:    Position,
    },
    /// An expression used in statement position.
    Expression {
        /// The wrapped expression.
        expr: Expr,
        /// Position of the expression.
        pos:  Position,
    },
    /// `return <expr>, <expr>, ...` with zero or more values.
    Return {
        /// The returned expressions; empty for a bare `return`.
        values: Vec<Expr>,
        /// Position of the `return` keyword.
        pos:    Position,
    },
    /// `if <cond> { ... } elif <cond> { ... } else { ... }`
    If {
        /// The primary condition.
        condition:    Expr,
        /// Body taken when the condition is truthy.
        consequence:  Block,
        /// Zero or more `elif` branches, tried in order.
        elif_clauses: Vec<ElifClause>,
        /// Optional `else` body.
        alternative:  Option<Block>,
        /// Position of the `if` keyword.
        pos:          Position,
    },
    /// The unified loop: `loop { }`, `loop <cond> { }`, or
    /// `loop x in <iterable> { }`.
    ///
    /// Exactly one shape holds: infinite (no condition, no iterator),
    /// conditional (condition present), or for-in (iterator and iterable
    /// present).
    Loop {
        /// Loop condition; `None` for infinite and for-in loops.
        condition: Option<Expr>,
        /// Iterator variable name for for-in loops.
        iterator:  Option<String>,
        /// Iterable expression for for-in loops.
        iterable:  Option<Expr>,
        /// The loop body.
        body:      Block,
        /// Position of the `loop` keyword.
        pos:       Position,
    },
    /// `break`
    Break {
        /// Position of the keyword.
        pos: Position,
    },
    /// `continue`
    Continue {
        /// Position of the keyword.
        pos: Position,
    },
    /// `fn name(params) { ... }` or `fn name(params) => <expr>`.
    ///
    /// The parameter list and body sit behind `Rc` so closure values can
    /// share them without cloning the subtree.
    FnDecl {
        /// The declared function name.
        name:   String,
        /// Parameter names.
        params: Rc<Vec<String>>,
        /// The function body; arrow bodies are desugared to
        /// `{ return <expr> }`.
        body:   Rc<Block>,
        /// Position of the `fn` keyword.
        pos:    Position,
    },
    /// `match <subject> { <arms> }`
    Match {
        /// The matched expression, evaluated once.
        subject: Expr,
        /// The arms, tried in order.
        arms:    Vec<MatchArm>,
        /// Position of the `match` keyword.
        pos:     Position,
    },
    /// `test "description" { ... }` — a no-op under normal execution,
    /// collected by the test runner.
    Test {
        /// Human-readable test description.
        description: String,
        /// The test body.
        body:        Block,
        /// Position of the `test` keyword.
        pos:         Position,
    },
}

impl Stmt {
    /// Gets the source position of `self`.
    #[must_use]
    pub const fn pos(&self) -> &Position {
        match self {
            Self::Let { pos, .. }
            | Self::Mut { pos, .. }
            | Self::Assign { pos, .. }
            | Self::IndexAssign { pos, .. }
            | Self::Expression { pos, .. }
            | Self::Return { pos, .. }
            | Self::If { pos, .. }
            | Self::Loop { pos, .. }
            | Self::Break { pos }
            | Self::Continue { pos }
            | Self::FnDecl { pos, .. }
            | Self::Match { pos, .. }
            | Self::Test { pos, .. } => pos,
        }
    }
}

/// An expression: a syntactic construct that produces a value.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// An integer literal such as `42`.
    Int {
        /// The literal value.
        value: i64,
        /// Source position.
        pos:   Position,
    },
    /// A floating-point literal such as `3.14`.
    Float {
        /// The literal value.
        value: f64,
        /// Source position.
        pos:   Position,
    },
    /// A string literal without interpolation.
    Str {
        /// The literal value with escapes already processed.
        value: String,
        /// Source position.
        pos:   Position,
    },
    /// An interpolated string such as `"hi ${name}"`, split into literal
    /// and expression parts. Evaluation concatenates the string form of
    /// each part left to right.
    Interpolation {
        /// Alternating literal and expression parts, in source order.
        parts: Vec<Expr>,
        /// Source position of the whole literal.
        pos:   Position,
    },
    /// `true` or `false`.
    Bool {
        /// The literal value.
        value: bool,
        /// Source position.
        pos:   Position,
    },
    /// The `none` literal.
    None {
        /// Source position.
        pos: Position,
    },
    /// A variable reference.
    Ident {
        /// The referenced name.
        name: String,
        /// Source position.
        pos:  Position,
    },
    /// A binary operation.
    Binary {
        /// The operator.
        op:    BinaryOp,
        /// Left operand.
        left:  Box<Expr>,
        /// Right operand.
        right: Box<Expr>,
        /// Position of the operator.
        pos:   Position,
    },
    /// A prefix unary operation (`-` or `!`).
    Unary {
        /// The operator.
        op:      UnaryOp,
        /// The operand.
        operand: Box<Expr>,
        /// Position of the operator.
        pos:     Position,
    },
    /// A call: `callee(args...)`.
    Call {
        /// The called expression.
        callee:    Box<Expr>,
        /// Arguments in source order.
        arguments: Vec<Expr>,
        /// Position of the opening parenthesis.
        pos:       Position,
    },
    /// An index access: `left[index]`.
    Index {
        /// The indexed expression.
        left:  Box<Expr>,
        /// The index expression.
        index: Box<Expr>,
        /// Position of the opening bracket.
        pos:   Position,
    },
    /// A field access on a map: `left.field`.
    Dot {
        /// The accessed expression.
        left:  Box<Expr>,
        /// The field name.
        field: String,
        /// Position of the field.
        pos:   Position,
    },
    /// A none-tolerant field access: `left?.field`.
    SafeAccess {
        /// The accessed expression.
        left:  Box<Expr>,
        /// The field name.
        field: String,
        /// Position of the field.
        pos:   Position,
    },
    /// An array literal: `[a, b, c]`.
    ArrayLit {
        /// Element expressions.
        elements: Vec<Expr>,
        /// Position of the opening bracket.
        pos:      Position,
    },
    /// A map literal: `{"k": v, ...}`.
    ///
    /// Keys and values are parallel vectors of equal length so that the
    /// source evaluation order key₁, value₁, key₂, value₂, … is preserved
    /// during evaluation.
    MapLit {
        /// Key expressions.
        keys:   Vec<Expr>,
        /// Value expressions, same length as `keys`.
        values: Vec<Expr>,
        /// Position of the opening brace.
        pos:    Position,
    },
    /// An anonymous function: `fn(params) { ... }` or
    /// `fn(params) => <expr>`.
    FnLit {
        /// Parameter names.
        params: Rc<Vec<String>>,
        /// The function body.
        body:   Rc<Block>,
        /// Position of the `fn` keyword.
        pos:    Position,
    },
    /// A range: `start..end` with an optional `step <expr>`.
    Range {
        /// Start bound (inclusive).
        start: Box<Expr>,
        /// End bound (exclusive).
        end:   Box<Expr>,
        /// Optional step; defaults to 1.
        step:  Option<Box<Expr>>,
        /// Position of the `..` operator.
        pos:   Position,
    },
    /// A pipeline: `left |> callee(args...)`.
    ///
    /// The right operand is required by the grammar to be a call; the
    /// parser destructures it into `callee` and `arguments` so the
    /// invariant holds by construction. The piped value becomes the
    /// call's first argument.
    Pipeline {
        /// The piped expression.
        left:      Box<Expr>,
        /// The called expression of the right-hand call.
        callee:    Box<Expr>,
        /// The explicitly written arguments of the right-hand call.
        arguments: Vec<Expr>,
        /// Position of the `|>` operator.
        pos:       Position,
    },
    /// A none-coalescing choice: `left ?? right`.
    Coalesce {
        /// Tried first; its value wins unless it is `none`.
        left:  Box<Expr>,
        /// Evaluated only when `left` is `none`.
        right: Box<Expr>,
        /// Position of the `??` operator.
        pos:   Position,
    },
    /// The `_` wildcard; valid only as a match pattern.
    Wildcard {
        /// Source position.
        pos: Position,
    },
}

impl Expr {
    /// Gets the source position of `self`.
    #[must_use]
    pub const fn pos(&self) -> &Position {
        match self {
            Self::Int { pos, .. }
            | Self::Float { pos, .. }
            | Self::Str { pos, .. }
            | Self::Interpolation { pos, .. }
            | Self::Bool { pos, .. }
            | Self::None { pos }
            | Self::Ident { pos, .. }
            | Self::Binary { pos, .. }
            | Self::Unary { pos, .. }
            | Self::Call { pos, .. }
            | Self::Index { pos, .. }
            | Self::Dot { pos, .. }
            | Self::SafeAccess { pos, .. }
            | Self::ArrayLit { pos, .. }
            | Self::MapLit { pos, .. }
            | Self::FnLit { pos, .. }
            | Self::Range { pos, .. }
            | Self::Pipeline { pos, .. }
            | Self::Coalesce { pos, .. }
            | Self::Wildcard { pos } => pos,
        }
    }
}

/// A binary operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BinaryOp {
    /// Addition (`+`); also string concatenation.
    Add,
    /// Subtraction (`-`)
    Sub,
    /// Multiplication (`*`)
    Mul,
    /// Division (`/`)
    Div,
    /// Modulo (`%`)
    Mod,
    /// Equal to (`==`)
    Eq,
    /// Not equal to (`!=`)
    NotEq,
    /// Less than (`<`)
    Less,
    /// Greater than (`>`)
    Greater,
    /// Less than or equal (`<=`)
    LessEq,
    /// Greater than or equal (`>=`)
    GreaterEq,
    /// Short-circuit logical and (`&&`)
    And,
    /// Short-circuit logical or (`||`)
    Or,
}

/// A prefix unary operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UnaryOp {
    /// Arithmetic negation (`-x`).
    Neg,
    /// Logical not (`!x`).
    Not,
}

impl std::fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let operator = match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::Less => "<",
            Self::Greater => ">",
            Self::LessEq => "<=",
            Self::GreaterEq => ">=",
            Self::And => "&&",
            Self::Or => "||",
        };
        write!(f, "{operator}")
    }
}

impl std::fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Neg => write!(f, "-"),
            Self::Not => write!(f, "!"),
        }
    }
}
