use crate::{
    ast::{Expr, Program},
    error::ParseError,
    interpreter::lexer::{Position, Token},
};

/// Precedence levels for Pratt parsing, from lowest to highest binding
/// strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    /// Sentinel: binds nothing.
    Lowest,
    /// `|>`
    Pipeline,
    /// `??`
    Coalesce,
    /// `||`
    Or,
    /// `&&`
    And,
    /// `==` `!=`
    Equality,
    /// `<` `>` `<=` `>=`
    Comparison,
    /// `..`
    Range,
    /// `+` `-`
    Addition,
    /// `*` `/` `%`
    Multiply,
    /// Prefix `!` and `-`
    Unary,
    /// Call, index, dot, and safe access: `(` `[` `.` `?.`
    Call,
}

/// Maps an infix token to its precedence level. Tokens that cannot start
/// an infix construct map to [`Precedence::Lowest`], which stops the
/// Pratt loop.
#[must_use]
pub const fn token_precedence(token: &Token) -> Precedence {
    match token {
        Token::PipeArrow => Precedence::Pipeline,
        Token::Coalesce => Precedence::Coalesce,
        Token::OrOr => Precedence::Or,
        Token::AndAnd => Precedence::And,
        Token::EqEq | Token::NotEq => Precedence::Equality,
        Token::Less | Token::Greater | Token::LessEq | Token::GreaterEq => Precedence::Comparison,
        Token::DotDot => Precedence::Range,
        Token::Plus | Token::Minus => Precedence::Addition,
        Token::Star | Token::Slash | Token::Percent => Precedence::Multiply,
        Token::LParen | Token::LBracket | Token::Dot | Token::SafeDot => Precedence::Call,
        _ => Precedence::Lowest,
    }
}

/// Converts a token stream into an AST via recursive descent with Pratt
/// precedence climbing for expressions.
///
/// The parser never fails outright: malformed constructs are recorded as
/// diagnostics and the parser synchronizes to the next statement
/// boundary, so the returned [`Program`] is as complete as the input
/// allows.
pub struct Parser {
    pub(in crate::interpreter::parser) tokens:      Vec<(Token, Position)>,
    pub(in crate::interpreter::parser) current:     usize,
    pub(in crate::interpreter::parser) diagnostics: Vec<ParseError>,
}

/// Parses a token sequence into a program plus its diagnostics.
///
/// This is the top-level entry point used by `run`, `test`, the REPL and
/// the test suite.
///
/// # Parameters
/// - `tokens`: The positioned token sequence produced by
///   [`scan`](crate::interpreter::lexer::scan).
///
/// # Returns
/// The root program node and every diagnostic recorded while parsing.
#[must_use]
pub fn parse(tokens: Vec<(Token, Position)>) -> (Program, Vec<ParseError>) {
    let mut parser = Parser::new(tokens);
    let program = parser.parse_program();
    (program, parser.diagnostics)
}

impl Parser {
    /// Creates a parser over a token sequence.
    #[must_use]
    pub fn new(tokens: Vec<(Token, Position)>) -> Self {
        Self { tokens,
               current: 0,
               diagnostics: Vec::new() }
    }

    /// Consumes the parser, returning its recorded diagnostics.
    #[must_use]
    pub fn into_diagnostics(self) -> Vec<ParseError> {
        self.diagnostics
    }

    /// Parses the whole token stream into a program.
    pub fn parse_program(&mut self) -> Program {
        let mut statements = Vec::new();
        while !self.at_end() {
            self.skip_newlines();
            if self.at_end() {
                break;
            }
            if let Some(stmt) = self.parse_statement() {
                statements.push(stmt);
            }
        }
        Program { statements }
    }

    /// Parses a full expression at the given minimum precedence.
    ///
    /// This is the heart of the Pratt parser: a prefix parse followed by
    /// a loop folding infix constructs while the next token binds more
    /// tightly than `prec`.
    ///
    /// Returns `None` when the expression was malformed; a diagnostic
    /// has been recorded in that case.
    pub fn parse_expression(&mut self, prec: Precedence) -> Option<Expr> {
        let mut left = self.parse_prefix()?;

        while !self.at_end() && prec < token_precedence(self.peek()) {
            left = self.parse_infix(left)?;
        }
        Some(left)
    }

    // ------------------------------------------------------------------
    // Token-stream helpers
    // ------------------------------------------------------------------

    /// Returns the current token without consuming it.
    pub(in crate::interpreter::parser) fn peek(&self) -> &Token {
        self.tokens
            .get(self.current)
            .map_or(&Token::Eof, |(token, _)| token)
    }

    /// Returns the token after the current one without consuming.
    pub(in crate::interpreter::parser) fn peek_next(&self) -> &Token {
        self.tokens
            .get(self.current + 1)
            .map_or(&Token::Eof, |(token, _)| token)
    }

    /// Returns the position of the current token.
    pub(in crate::interpreter::parser) fn peek_pos(&self) -> Position {
        let index = self.current.min(self.tokens.len() - 1);
        self.tokens[index].1.clone()
    }

    /// Consumes and returns the current token with its position.
    pub(in crate::interpreter::parser) fn advance(&mut self) -> (Token, Position) {
        let entry = self.tokens[self.current.min(self.tokens.len() - 1)].clone();
        if self.current < self.tokens.len() - 1 {
            self.current += 1;
        }
        entry
    }

    /// Consumes the current token if it equals `expected`; otherwise
    /// records a diagnostic and leaves the stream untouched.
    pub(in crate::interpreter::parser) fn expect(&mut self, expected: &Token) -> bool {
        if self.peek() == expected {
            self.advance();
            return true;
        }
        let found = self.peek().describe();
        let pos = self.peek_pos();
        self.diagnostics.push(ParseError::ExpectedToken { expected: expected.describe(),
                                                          found,
                                                          pos });
        false
    }

    /// Returns `true` when the stream is exhausted.
    pub(in crate::interpreter::parser) fn at_end(&self) -> bool {
        *self.peek() == Token::Eof
    }

    /// Skips statement separators (newlines and semicolons).
    pub(in crate::interpreter::parser) fn skip_newlines(&mut self) {
        while *self.peek() == Token::Newline {
            self.advance();
        }
    }

    /// Returns `true` if the current token terminates a statement.
    pub(in crate::interpreter::parser) fn at_statement_end(&self) -> bool {
        matches!(self.peek(), Token::Newline | Token::RBrace | Token::Eof)
    }

    /// Records a diagnostic.
    pub(in crate::interpreter::parser) fn report(&mut self, diagnostic: ParseError) {
        self.diagnostics.push(diagnostic);
    }

    /// Advances to the next statement boundary for error recovery.
    ///
    /// The first token is consumed unconditionally, so a
    /// synchronization always makes progress and recovery can never
    /// loop, whatever state the caller left the stream in. From the
    /// second token on, it stops just past a newline or just before a
    /// statement keyword.
    pub(in crate::interpreter::parser) fn synchronize(&mut self) {
        if self.at_end() {
            return;
        }
        let (first, _) = self.advance();
        if first == Token::Newline {
            return;
        }

        while !self.at_end() {
            if *self.peek() == Token::Newline {
                self.advance();
                return;
            }
            match self.peek() {
                Token::Let
                | Token::Mut
                | Token::Fn
                | Token::Return
                | Token::If
                | Token::Loop
                | Token::Match
                | Token::Test => return,
                _ => {},
            }
            self.advance();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::lexer::scan;

    fn parse_source(source: &str) -> (Program, Vec<ParseError>) {
        parse(scan(source, "test"))
    }

    #[test]
    fn empty_input_yields_empty_program() {
        let (program, diagnostics) = parse_source("\n\n");
        assert!(program.statements.is_empty());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn recovery_keeps_later_statements() {
        let (program, diagnostics) = parse_source("let = 3\nlet y = 4");
        assert!(!diagnostics.is_empty());
        assert_eq!(program.statements.len(), 1);
    }

    #[test]
    fn recovery_terminates_on_garbage() {
        let (_, diagnostics) = parse_source("@@ @@ @@");
        assert!(!diagnostics.is_empty());
    }
}
