use std::rc::Rc;

use crate::{
    ast::{Expr, UnaryOp},
    error::ParseError,
    interpreter::{
        lexer::{self, Position, Token},
        parser::core::{Parser, Precedence},
    },
};

impl Parser {
    /// Parses a prefix (atomic or unary) expression, dispatching on the
    /// leading token.
    ///
    /// Grammar (simplified):
    /// ```text
    ///     prefix := literal
    ///             | identifier
    ///             | "(" expression ")"
    ///             | "[" elements "]"
    ///             | "{" pairs "}"
    ///             | "fn" "(" params ")" body
    ///             | ("-" | "!") expression
    /// ```
    pub(in crate::interpreter::parser) fn parse_prefix(&mut self) -> Option<Expr> {
        match self.peek() {
            Token::Int(_) => {
                let (Token::Int(value), pos) = self.advance() else { unreachable!() };
                Some(Expr::Int { value, pos })
            },
            Token::Float(_) => {
                let (Token::Float(value), pos) = self.advance() else { unreachable!() };
                Some(Expr::Float { value, pos })
            },
            Token::Str(_) => self.parse_string_literal(),
            Token::Bool(_) => {
                let (Token::Bool(value), pos) = self.advance() else { unreachable!() };
                Some(Expr::Bool { value, pos })
            },
            Token::NoneLit => {
                let (_, pos) = self.advance();
                Some(Expr::None { pos })
            },
            Token::Ident(_) => {
                let (Token::Ident(name), pos) = self.advance() else { unreachable!() };
                Some(Expr::Ident { name, pos })
            },
            Token::LParen => self.parse_grouped_expression(),
            Token::LBracket => self.parse_array_literal(),
            Token::LBrace => self.parse_map_literal(),
            Token::Fn => self.parse_fn_literal(),
            Token::Minus | Token::Bang => self.parse_unary_expression(),
            Token::Illegal(_) => {
                let (Token::Illegal(lexeme), pos) = self.advance() else { unreachable!() };
                self.report(ParseError::IllegalToken { lexeme, pos });
                None
            },
            _ => {
                let found = self.peek().describe();
                let pos = self.peek_pos();
                self.report(ParseError::UnexpectedToken { found, pos });
                self.advance();
                None
            },
        }
    }

    /// Parses a parenthesized expression. The inner expression is
    /// returned as-is, without a wrapper node.
    fn parse_grouped_expression(&mut self) -> Option<Expr> {
        self.advance(); // consume '('
        let expr = self.parse_expression(Precedence::Lowest)?;
        if !self.expect(&Token::RParen) {
            return None;
        }
        Some(expr)
    }

    /// Parses an array literal `[expr, expr, ...]`.
    fn parse_array_literal(&mut self) -> Option<Expr> {
        let (_, pos) = self.advance(); // consume '['
        let elements = self.parse_expression_list(&Token::RBracket)?;
        Some(Expr::ArrayLit { elements, pos })
    }

    /// Parses a map literal `{key: value, ...}`.
    ///
    /// Keys and values land in two parallel vectors so evaluation can
    /// interleave them in source order.
    fn parse_map_literal(&mut self) -> Option<Expr> {
        let (_, pos) = self.advance(); // consume '{'
        let mut keys = Vec::new();
        let mut values = Vec::new();

        self.skip_newlines();
        while !self.at_end() && *self.peek() != Token::RBrace {
            keys.push(self.parse_expression(Precedence::Lowest)?);
            if !self.expect(&Token::Colon) {
                self.synchronize();
                return None;
            }
            values.push(self.parse_expression(Precedence::Lowest)?);

            self.skip_newlines();
            if *self.peek() != Token::RBrace && !self.expect(&Token::Comma) {
                self.synchronize();
                return None;
            }
            self.skip_newlines();
        }

        self.expect(&Token::RBrace);
        Some(Expr::MapLit { keys, values, pos })
    }

    /// Parses an anonymous function literal:
    /// `fn(<params>) <block>` or `fn(<params>) => <expr>`.
    fn parse_fn_literal(&mut self) -> Option<Expr> {
        let (_, pos) = self.advance(); // consume 'fn'
        let params = self.parse_params()?;
        let body = self.parse_fn_body()?;
        Some(Expr::FnLit { params: Rc::new(params),
                           body: Rc::new(body),
                           pos })
    }

    /// Parses a prefix unary expression: `-x` or `!x`.
    fn parse_unary_expression(&mut self) -> Option<Expr> {
        let (token, pos) = self.advance();
        let op = match token {
            Token::Minus => UnaryOp::Neg,
            _ => UnaryOp::Not,
        };
        let operand = self.parse_expression(Precedence::Unary)?;
        Some(Expr::Unary { op,
                           operand: Box::new(operand),
                           pos })
    }

    /// Parses comma-separated expressions until the closing token.
    ///
    /// Shared by array literals and call argument lists. Newlines are
    /// permitted around elements.
    pub(in crate::interpreter::parser) fn parse_expression_list(&mut self,
                                                                closing: &Token)
                                                                -> Option<Vec<Expr>> {
        let mut list = Vec::new();
        self.skip_newlines();

        if self.peek() == closing {
            self.advance();
            return Some(list);
        }

        list.push(self.parse_expression(Precedence::Lowest)?);
        while *self.peek() == Token::Comma {
            self.advance();
            self.skip_newlines();
            list.push(self.parse_expression(Precedence::Lowest)?);
        }

        self.skip_newlines();
        if !self.expect(closing) {
            return None;
        }
        Some(list)
    }

    /// Parses a string literal token, expanding `${...}` interpolation.
    ///
    /// The scanner produces one fused token per string literal; this
    /// pass splits the lexeme into literal and expression parts. Each
    /// expression part is re-scanned and parsed as a complete
    /// expression. A literal without `${` stays a plain string.
    fn parse_string_literal(&mut self) -> Option<Expr> {
        let (Token::Str(literal), pos) = self.advance() else { unreachable!() };

        if !literal.contains("${") {
            return Some(Expr::Str { value: literal, pos });
        }

        let mut parts = Vec::new();
        let mut rest = literal.as_str();
        while let Some(start) = rest.find("${") {
            if start > 0 {
                parts.push(Expr::Str { value: rest[..start].to_string(),
                                       pos:   pos.clone(), });
            }
            let after = &rest[start + 2..];
            let Some(end) = find_closing_brace(after) else {
                self.report(ParseError::UnterminatedInterpolation { pos });
                return None;
            };
            parts.push(self.parse_embedded_expression(&after[..end], &pos)?);
            rest = &after[end + 1..];
        }
        if !rest.is_empty() {
            parts.push(Expr::Str { value: rest.to_string(),
                                   pos:   pos.clone(), });
        }

        Some(Expr::Interpolation { parts, pos })
    }

    /// Scans and parses one `${...}` body as an expression. Diagnostics
    /// from the embedded parse are surfaced on the outer parser.
    fn parse_embedded_expression(&mut self, source: &str, pos: &Position) -> Option<Expr> {
        let tokens = lexer::scan(source, &pos.file);
        let mut embedded = Parser::new(tokens);
        let expr = embedded.parse_expression(Precedence::Lowest);

        let mut diagnostics = embedded.into_diagnostics();
        let failed = !diagnostics.is_empty();
        self.diagnostics.append(&mut diagnostics);
        if failed {
            return None;
        }
        expr
    }
}

/// Finds the `}` closing an interpolation body, counting nested braces
/// so map literals inside `${...}` survive.
fn find_closing_brace(s: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (index, ch) in s.char_indices() {
        match ch {
            '{' => depth += 1,
            '}' if depth == 0 => return Some(index),
            '}' => depth -= 1,
            _ => {},
        }
    }
    None
}
