//! Statement parsing

use crate::ast::*;
use crate::parser::{ParseResult, Parser};
use crate::token::TokenKind;

impl Parser {
    /// Parse a statement
    pub(super) fn parse_statement(&mut self) -> ParseResult<Stmt> {
        let kind = self.peek().kind;
        match kind {
            TokenKind::Let => self.parse_let(),
            TokenKind::Return => self.parse_return(),
            _ => self.parse_expression_statement(),
        }
    }

    /// `let <name> = <value>;`
    fn parse_let(&mut self) -> ParseResult<Stmt> {
        let start = self.advance().span;

        let name_token = self.consume(TokenKind::Identifier)?;
        let name = Identifier {
            name: name_token.lexeme.clone(),
            span: name_token.span,
        };

        self.consume(TokenKind::Assign)?;
        let value = self.parse_expression()?;
        self.match_token(TokenKind::Semicolon);

        Ok(Stmt::Let(LetStmt {
            name,
            value,
            span: self.span_from(start),
        }))
    }

    /// `return <value>;`, where the value may be omitted
    fn parse_return(&mut self) -> ParseResult<Stmt> {
        let start = self.advance().span;

        let value = if self.check(TokenKind::Semicolon)
            || self.check(TokenKind::RightBrace)
            || self.is_at_end()
        {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.match_token(TokenKind::Semicolon);

        Ok(Stmt::Return(ReturnStmt {
            value,
            span: self.span_from(start),
        }))
    }

    /// An expression with an optional trailing `;`
    fn parse_expression_statement(&mut self) -> ParseResult<Stmt> {
        let expr = self.parse_expression()?;
        let start = expr.span();
        self.match_token(TokenKind::Semicolon);

        Ok(Stmt::Expr(ExprStmt {
            expr,
            span: self.span_from(start),
        }))
    }

    /// Parse a brace-delimited block
    ///
    /// Failed statements inside the block are skipped the same way as at top
    /// level; only a missing `{` or `}` fails the block itself.
    pub(super) fn parse_block(&mut self) -> ParseResult<Block> {
        let start = self.consume(TokenKind::LeftBrace)?.span;
        let mut statements = Vec::new();

        while !self.check(TokenKind::RightBrace) && !self.is_at_end() {
            let start = self.current;
            match self.parse_statement() {
                Ok(stmt) => statements.push(stmt),
                Err(_) => self.synchronize(start, true),
            }
        }

        self.consume(TokenKind::RightBrace)?;

        Ok(Block {
            statements,
            span: self.span_from(start),
        })
    }
}
