use std::rc::Rc;

use crate::{
    ast::{Block, ElifClause, Expr, MatchArm, Stmt},
    error::ParseError,
    interpreter::{
        lexer::Token,
        parser::core::{Parser, Precedence},
    },
};

impl Parser {
    /// Parses a single statement, dispatching on the leading token.
    ///
    /// | leading token | statement |
    /// |---|---|
    /// | `let` / `mut` | binding |
    /// | `fn` + identifier | function declaration |
    /// | `return` | return |
    /// | `if` | conditional |
    /// | `loop` | loop (all three shapes) |
    /// | `break` / `continue` | loop control |
    /// | `match` | match |
    /// | `test` | test block |
    /// | otherwise | expression or assignment |
    ///
    /// Returns `None` when the statement was malformed; the parser has
    /// recorded a diagnostic and synchronized in that case.
    pub(in crate::interpreter::parser) fn parse_statement(&mut self) -> Option<Stmt> {
        match self.peek() {
            Token::Let => self.parse_binding(true),
            Token::Mut => self.parse_binding(false),
            Token::Fn if matches!(self.peek_next(), Token::Ident(_)) => self.parse_fn_declaration(),
            Token::Return => self.parse_return_statement(),
            Token::If => self.parse_if_statement(),
            Token::Loop => self.parse_loop_statement(),
            Token::Break => {
                let (_, pos) = self.advance();
                Some(Stmt::Break { pos })
            },
            Token::Continue => {
                let (_, pos) = self.advance();
                Some(Stmt::Continue { pos })
            },
            Token::Match => self.parse_match_statement(),
            Token::Test => self.parse_test_block(),
            _ => self.parse_expression_or_assignment(),
        }
    }

    /// Parses `let <ident> = <expr>` or `mut <ident> = <expr>`.
    ///
    /// `immutable` selects which of the two statements is built; the
    /// grammar is otherwise identical.
    fn parse_binding(&mut self, immutable: bool) -> Option<Stmt> {
        let (keyword, pos) = self.advance();

        let name = match self.advance() {
            (Token::Ident(name), _) => name,
            (other, other_pos) => {
                self.report(ParseError::ExpectedToken { expected: format!("identifier after {}",
                                                                          keyword.describe()),
                                                        found:    other.describe(),
                                                        pos:      other_pos, });
                self.synchronize();
                return None;
            },
        };

        if !self.expect(&Token::Assign) {
            self.synchronize();
            return None;
        }

        let value = match self.parse_expression(Precedence::Lowest) {
            Some(expr) => expr,
            None => {
                self.synchronize();
                return None;
            },
        };

        if immutable {
            Some(Stmt::Let { name, value, pos })
        } else {
            Some(Stmt::Mut { name, value, pos })
        }
    }

    /// Parses `fn <name>(<params>) <block>` or
    /// `fn <name>(<params>) => <expr>`.
    fn parse_fn_declaration(&mut self) -> Option<Stmt> {
        let (_, pos) = self.advance(); // consume 'fn'
        let name = match self.advance() {
            (Token::Ident(name), _) => name,
            // Unreachable via statement dispatch, but kept total.
            (other, other_pos) => {
                self.report(ParseError::ExpectedToken { expected: "function name".to_string(),
                                                        found:    other.describe(),
                                                        pos:      other_pos, });
                self.synchronize();
                return None;
            },
        };

        let params = self.parse_params()?;
        let body = self.parse_fn_body()?;

        Some(Stmt::FnDecl { name,
                            params: Rc::new(params),
                            body: Rc::new(body),
                            pos })
    }

    /// Parses a function body: either a block, or `=> <expr>` which
    /// desugars to `{ return <expr> }`.
    pub(in crate::interpreter::parser) fn parse_fn_body(&mut self) -> Option<Block> {
        if *self.peek() == Token::FatArrow {
            self.advance(); // consume '=>'
            let expr = self.parse_expression(Precedence::Lowest)?;
            let pos = expr.pos().clone();
            return Some(Block { statements: vec![Stmt::Return { values: vec![expr],
                                                                pos:    pos.clone(), }],
                                pos });
        }
        self.parse_block()
    }

    /// Parses a parenthesized, comma-separated parameter list.
    pub(in crate::interpreter::parser) fn parse_params(&mut self) -> Option<Vec<String>> {
        if !self.expect(&Token::LParen) {
            self.synchronize();
            return None;
        }

        let mut params = Vec::new();
        if *self.peek() == Token::RParen {
            self.advance();
            return Some(params);
        }

        loop {
            match self.advance() {
                (Token::Ident(name), _) => params.push(name),
                (other, pos) => {
                    self.report(ParseError::ExpectedToken { expected: "parameter name".to_string(),
                                                            found:    other.describe(),
                                                            pos });
                    self.synchronize();
                    return None;
                },
            }
            match self.peek() {
                Token::Comma => {
                    self.advance();
                },
                Token::RParen => {
                    self.advance();
                    return Some(params);
                },
                _ => {
                    let found = self.peek().describe();
                    let pos = self.peek_pos();
                    self.report(ParseError::ExpectedToken { expected: "',' or ')'".to_string(),
                                                            found,
                                                            pos });
                    self.synchronize();
                    return None;
                },
            }
        }
    }

    /// Parses `return` with zero or more comma-separated values.
    ///
    /// A `return` immediately followed by a newline, `}` or `EOF`
    /// carries no values.
    fn parse_return_statement(&mut self) -> Option<Stmt> {
        let (_, pos) = self.advance(); // consume 'return'
        let mut values = Vec::new();

        if self.at_statement_end() {
            return Some(Stmt::Return { values, pos });
        }

        values.push(self.parse_expression(Precedence::Lowest)?);
        while *self.peek() == Token::Comma {
            self.advance();
            values.push(self.parse_expression(Precedence::Lowest)?);
        }
        Some(Stmt::Return { values, pos })
    }

    /// Parses `if <cond> <block>` with any number of `elif` branches and
    /// an optional trailing `else <block>`.
    fn parse_if_statement(&mut self) -> Option<Stmt> {
        let (_, pos) = self.advance(); // consume 'if'
        let condition = self.parse_expression(Precedence::Lowest)?;
        let consequence = self.parse_block()?;

        let mut elif_clauses = Vec::new();
        let mut alternative = None;

        self.skip_newlines();
        while *self.peek() == Token::Elif {
            self.advance();
            let elif_condition = self.parse_expression(Precedence::Lowest)?;
            let elif_body = self.parse_block()?;
            elif_clauses.push(ElifClause { condition:   elif_condition,
                                           consequence: elif_body, });
            self.skip_newlines();
        }

        if *self.peek() == Token::Else {
            self.advance();
            alternative = Some(self.parse_block()?);
        }

        Some(Stmt::If { condition,
                        consequence,
                        elif_clauses,
                        alternative,
                        pos })
    }

    /// Parses the unified loop statement. Dispatch after `loop`:
    ///
    /// - `{` → infinite loop.
    /// - identifier followed by `in` → for-in loop.
    /// - anything else → conditional loop.
    fn parse_loop_statement(&mut self) -> Option<Stmt> {
        let (_, pos) = self.advance(); // consume 'loop'

        if *self.peek() == Token::LBrace {
            let body = self.parse_block()?;
            return Some(Stmt::Loop { condition: None,
                                     iterator: None,
                                     iterable: None,
                                     body,
                                     pos });
        }

        if matches!(self.peek(), Token::Ident(_)) && *self.peek_next() == Token::In {
            let (Token::Ident(iterator), _) = self.advance() else { unreachable!() };
            self.advance(); // consume 'in'
            let iterable = self.parse_expression(Precedence::Lowest)?;
            let body = self.parse_block()?;
            return Some(Stmt::Loop { condition: None,
                                     iterator: Some(iterator),
                                     iterable: Some(iterable),
                                     body,
                                     pos });
        }

        let condition = self.parse_expression(Precedence::Lowest)?;
        let body = self.parse_block()?;
        Some(Stmt::Loop { condition: Some(condition),
                          iterator: None,
                          iterable: None,
                          body,
                          pos })
    }

    /// Parses `match <subject> { <arms> }`.
    fn parse_match_statement(&mut self) -> Option<Stmt> {
        let (_, pos) = self.advance(); // consume 'match'
        let subject = self.parse_expression(Precedence::Lowest)?;

        if !self.expect(&Token::LBrace) {
            self.synchronize();
            return None;
        }

        let mut arms = Vec::new();
        self.skip_newlines();
        while !self.at_end() && *self.peek() != Token::RBrace {
            arms.push(self.parse_match_arm()?);
            self.skip_newlines();
        }

        self.expect(&Token::RBrace);
        Some(Stmt::Match { subject, arms, pos })
    }

    /// Parses one match arm: `<pattern> [if <guard>] => <block or expr>`.
    ///
    /// Single-expression bodies are wrapped into a one-statement block
    /// so the arm produces a value.
    fn parse_match_arm(&mut self) -> Option<MatchArm> {
        let pattern = if matches!(self.peek(), Token::Ident(name) if name == "_") {
            let (_, pos) = self.advance();
            Expr::Wildcard { pos }
        } else {
            self.parse_expression(Precedence::Lowest)?
        };

        let guard = if *self.peek() == Token::If {
            self.advance();
            Some(self.parse_expression(Precedence::Lowest)?)
        } else {
            None
        };

        if !self.expect(&Token::FatArrow) {
            self.synchronize();
            return None;
        }

        let body = if *self.peek() == Token::LBrace {
            self.parse_block()?
        } else {
            // A bare-expression arm becomes a one-statement block whose
            // result is the expression's value.
            let expr = self.parse_expression(Precedence::Lowest)?;
            let pos = expr.pos().clone();
            Block { statements: vec![Stmt::Expression { expr,
                                                        pos: pos.clone() }],
                    pos }
        };

        Some(MatchArm { pattern, guard, body })
    }

    /// Parses `test "<description>" <block>`.
    fn parse_test_block(&mut self) -> Option<Stmt> {
        let (_, pos) = self.advance(); // consume 'test'
        let description = match self.advance() {
            (Token::Str(description), _) => description,
            (other, other_pos) => {
                self.report(ParseError::ExpectedToken { expected: "string after 'test'"
                                                            .to_string(),
                                                        found:    other.describe(),
                                                        pos:      other_pos, });
                self.synchronize();
                return None;
            },
        };
        let body = self.parse_block()?;
        Some(Stmt::Test { description, body, pos })
    }

    /// Parses an expression statement, converting it to an assignment
    /// when followed by `=`.
    ///
    /// Legal assignment targets are identifiers (`x = v`) and index
    /// expressions (`xs[i] = v`); anything else is a diagnostic.
    fn parse_expression_or_assignment(&mut self) -> Option<Stmt> {
        let pos = self.peek_pos();
        let expr = match self.parse_expression(Precedence::Lowest) {
            Some(expr) => expr,
            None => {
                self.synchronize();
                return None;
            },
        };

        if *self.peek() == Token::Assign {
            self.advance(); // consume '='
            let value = match self.parse_expression(Precedence::Lowest) {
                Some(value) => value,
                None => {
                    self.synchronize();
                    return None;
                },
            };
            return match expr {
                Expr::Ident { name, .. } => Some(Stmt::Assign { name, value, pos }),
                Expr::Index { left, index, .. } => Some(Stmt::IndexAssign { target: *left,
                                                                            index: *index,
                                                                            value,
                                                                            pos }),
                _ => {
                    self.report(ParseError::InvalidAssignmentTarget { pos });
                    None
                },
            };
        }

        Some(Stmt::Expression { expr, pos })
    }
}
