use crate::{
    ast::{BinaryOp, Expr},
    error::ParseError,
    interpreter::{
        lexer::Token,
        parser::core::{Parser, Precedence, token_precedence},
    },
};

impl Parser {
    /// Parses one infix construct applied to `left`, dispatching on the
    /// current token: binary operators, calls, indexing, field access,
    /// pipelines, ranges and coalescing.
    pub(in crate::interpreter::parser) fn parse_infix(&mut self, left: Expr) -> Option<Expr> {
        match self.peek() {
            Token::Plus
            | Token::Minus
            | Token::Star
            | Token::Slash
            | Token::Percent
            | Token::EqEq
            | Token::NotEq
            | Token::Less
            | Token::Greater
            | Token::LessEq
            | Token::GreaterEq
            | Token::AndAnd
            | Token::OrOr => self.parse_binary_expression(left),
            Token::LParen => self.parse_call_expression(left),
            Token::LBracket => self.parse_index_expression(left),
            Token::Dot => self.parse_dot_expression(left, false),
            Token::SafeDot => self.parse_dot_expression(left, true),
            Token::PipeArrow => self.parse_pipeline_expression(left),
            Token::DotDot => self.parse_range_expression(left),
            Token::Coalesce => self.parse_coalesce_expression(left),
            // Unreachable: the Pratt loop only enters for infix tokens.
            _ => Some(left),
        }
    }

    /// Parses a left-associative binary operator expression.
    fn parse_binary_expression(&mut self, left: Expr) -> Option<Expr> {
        let (token, pos) = self.advance();
        let prec = token_precedence(&token);
        let op = match token {
            Token::Plus => BinaryOp::Add,
            Token::Minus => BinaryOp::Sub,
            Token::Star => BinaryOp::Mul,
            Token::Slash => BinaryOp::Div,
            Token::Percent => BinaryOp::Mod,
            Token::EqEq => BinaryOp::Eq,
            Token::NotEq => BinaryOp::NotEq,
            Token::Less => BinaryOp::Less,
            Token::Greater => BinaryOp::Greater,
            Token::LessEq => BinaryOp::LessEq,
            Token::GreaterEq => BinaryOp::GreaterEq,
            Token::AndAnd => BinaryOp::And,
            _ => BinaryOp::Or,
        };
        let right = self.parse_expression(prec)?;
        Some(Expr::Binary { op,
                            left: Box::new(left),
                            right: Box::new(right),
                            pos })
    }

    /// Parses a call: `<left>(<args>)`.
    fn parse_call_expression(&mut self, left: Expr) -> Option<Expr> {
        let (_, pos) = self.advance(); // consume '('
        let arguments = self.parse_expression_list(&Token::RParen)?;
        Some(Expr::Call { callee: Box::new(left),
                          arguments,
                          pos })
    }

    /// Parses an index access: `<left>[<index>]`.
    fn parse_index_expression(&mut self, left: Expr) -> Option<Expr> {
        let (_, pos) = self.advance(); // consume '['
        let index = self.parse_expression(Precedence::Lowest)?;
        if !self.expect(&Token::RBracket) {
            return None;
        }
        Some(Expr::Index { left: Box::new(left),
                           index: Box::new(index),
                           pos })
    }

    /// Parses `<left>.<field>` or `<left>?.<field>`.
    fn parse_dot_expression(&mut self, left: Expr, safe: bool) -> Option<Expr> {
        self.advance(); // consume '.' or '?.'
        let (field, pos) = match self.advance() {
            (Token::Ident(field), pos) => (field, pos),
            (other, pos) => {
                self.report(ParseError::ExpectedToken { expected: "field name".to_string(),
                                                        found:    other.describe(),
                                                        pos });
                return None;
            },
        };
        if safe {
            Some(Expr::SafeAccess { left: Box::new(left),
                                    field,
                                    pos })
        } else {
            Some(Expr::Dot { left: Box::new(left),
                             field,
                             pos })
        }
    }

    /// Parses a pipeline: `<left> |> <call>`.
    ///
    /// The right operand must be a call expression; anything else is a
    /// diagnostic at the `|>` position, and the pipeline is dropped in
    /// favor of its left operand.
    fn parse_pipeline_expression(&mut self, left: Expr) -> Option<Expr> {
        let (_, pos) = self.advance(); // consume '|>'
        let right = self.parse_expression(Precedence::Pipeline)?;

        match right {
            Expr::Call { callee, arguments, .. } => Some(Expr::Pipeline { left: Box::new(left),
                                                                          callee,
                                                                          arguments,
                                                                          pos }),
            _ => {
                self.report(ParseError::PipelineTarget { pos });
                Some(left)
            },
        }
    }

    /// Parses a range: `<left>..<end> [step <expr>]`.
    ///
    /// A second `..` at the same level is a diagnostic; ranges do not
    /// chain.
    fn parse_range_expression(&mut self, left: Expr) -> Option<Expr> {
        let (_, pos) = self.advance(); // consume '..'
        let end = self.parse_expression(Precedence::Range)?;

        let step = if *self.peek() == Token::Step {
            self.advance();
            Some(Box::new(self.parse_expression(Precedence::Range)?))
        } else {
            None
        };

        if *self.peek() == Token::DotDot {
            let chained_pos = self.peek_pos();
            self.advance();
            self.report(ParseError::ChainedRange { pos: chained_pos });
            return None;
        }

        Some(Expr::Range { start: Box::new(left),
                           end: Box::new(end),
                           step,
                           pos })
    }

    /// Parses a coalesce: `<left> ?? <right>`.
    fn parse_coalesce_expression(&mut self, left: Expr) -> Option<Expr> {
        let (_, pos) = self.advance(); // consume '??'
        let right = self.parse_expression(Precedence::Coalesce)?;
        Some(Expr::Coalesce { left: Box::new(left),
                              right: Box::new(right),
                              pos })
    }
}
