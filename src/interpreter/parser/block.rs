use crate::{
    ast::Block,
    interpreter::{lexer::Token, parser::core::Parser},
};

impl Parser {
    /// Parses a brace-delimited block of statements.
    ///
    /// Statements are separated by newlines (or `;`); leading and
    /// trailing separators are ignored. Parsing continues until the
    /// closing `}`.
    ///
    /// Grammar: `block := "{" statement* "}"`
    pub(in crate::interpreter::parser) fn parse_block(&mut self) -> Option<Block> {
        let pos = self.peek_pos();
        if !self.expect(&Token::LBrace) {
            self.synchronize();
            return None;
        }

        let mut statements = Vec::new();
        self.skip_newlines();
        while !self.at_end() && *self.peek() != Token::RBrace {
            if let Some(stmt) = self.parse_statement() {
                statements.push(stmt);
            }
            self.skip_newlines();
        }

        self.expect(&Token::RBrace);
        Some(Block { statements, pos })
    }
}
