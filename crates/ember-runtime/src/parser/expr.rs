//! Expression parsing (Pratt parser)

use crate::ast::*;
use crate::diagnostic::error_codes;
use crate::parser::{ParseResult, Parser, Precedence};
use crate::token::TokenKind;
use std::rc::Rc;

impl Parser {
    /// Parse an expression
    pub(super) fn parse_expression(&mut self) -> ParseResult<Expr> {
        self.parse_precedence(Precedence::Lowest)
    }

    /// Parse expression with given minimum precedence
    ///
    /// Infix operators are folded in while the next token binds tighter than
    /// `precedence`, so equal-precedence operators associate to the left.
    pub(super) fn parse_precedence(&mut self, precedence: Precedence) -> ParseResult<Expr> {
        let mut left = self.parse_prefix()?;

        while !self.check(TokenKind::Semicolon) && precedence < self.current_precedence() {
            left = self.parse_infix(left)?;
        }

        Ok(left)
    }

    /// Parse prefix expression
    fn parse_prefix(&mut self) -> ParseResult<Expr> {
        let kind = self.peek().kind;
        match kind {
            TokenKind::Int => self.parse_integer(),
            TokenKind::String => {
                let token = self.advance();
                Ok(Expr::Literal(
                    Literal::String(token.lexeme.clone()),
                    token.span,
                ))
            }
            TokenKind::True | TokenKind::False => {
                let token = self.advance();
                let value = token.kind == TokenKind::True;
                Ok(Expr::Literal(Literal::Boolean(value), token.span))
            }
            TokenKind::Identifier => {
                let token = self.advance();
                Ok(Expr::Identifier(Identifier {
                    name: token.lexeme.clone(),
                    span: token.span,
                }))
            }
            TokenKind::Bang | TokenKind::Minus => self.parse_prefix_op(),
            TokenKind::LeftParen => self.parse_group(),
            TokenKind::LeftBracket => self.parse_array_literal(),
            TokenKind::LeftBrace => self.parse_hash_literal(),
            TokenKind::If => self.parse_if(),
            TokenKind::Function => self.parse_function_literal(),
            _ => {
                self.error(
                    error_codes::NO_PREFIX_PARSE,
                    format!("No prefix parse function for {}", kind.name()),
                    "expected an expression",
                );
                Err(())
            }
        }
    }

    /// Parse infix expression; the current token is the operator
    fn parse_infix(&mut self, left: Expr) -> ParseResult<Expr> {
        let kind = self.peek().kind;
        match kind {
            TokenKind::LeftParen => self.parse_call(left),
            TokenKind::LeftBracket => self.parse_index(left),
            _ => self.parse_binary(left),
        }
    }

    /// Get precedence of the token about to be consumed
    fn current_precedence(&self) -> Precedence {
        token_precedence(self.peek().kind)
    }

    fn parse_integer(&mut self) -> ParseResult<Expr> {
        let token = self.peek().clone();
        match token.lexeme.parse::<i64>() {
            Ok(value) => {
                self.advance();
                Ok(Expr::Literal(Literal::Integer(value), token.span))
            }
            Err(_) => {
                self.error(
                    error_codes::INVALID_INTEGER,
                    format!("Could not parse {:?} as an integer", token.lexeme),
                    "integer literal out of range",
                );
                Err(())
            }
        }
    }

    /// `!x` and `-x`
    fn parse_prefix_op(&mut self) -> ParseResult<Expr> {
        let op_token = self.advance();
        let start = op_token.span;
        let op = match op_token.kind {
            TokenKind::Bang => PrefixOp::Not,
            _ => PrefixOp::Negate,
        };

        let right = self.parse_precedence(Precedence::Prefix)?;

        Ok(Expr::Prefix(PrefixExpr {
            op,
            span: start.merge(right.span()),
            right: Box::new(right),
        }))
    }

    fn parse_binary(&mut self, left: Expr) -> ParseResult<Expr> {
        let op_token = self.advance();
        let precedence = token_precedence(op_token.kind);
        let op = match op_token.kind {
            TokenKind::Plus => InfixOp::Add,
            TokenKind::Minus => InfixOp::Sub,
            TokenKind::Star => InfixOp::Mul,
            TokenKind::Slash => InfixOp::Div,
            TokenKind::Less => InfixOp::Lt,
            TokenKind::Greater => InfixOp::Gt,
            TokenKind::EqualEqual => InfixOp::Eq,
            TokenKind::BangEqual => InfixOp::Ne,
            // current_precedence only admits the kinds above here
            _ => return Err(()),
        };

        let right = self.parse_precedence(precedence)?;

        Ok(Expr::Infix(InfixExpr {
            op,
            span: left.span().merge(right.span()),
            left: Box::new(left),
            right: Box::new(right),
        }))
    }

    /// `callee(args...)`
    fn parse_call(&mut self, callee: Expr) -> ParseResult<Expr> {
        self.advance(); // (
        let args = self.parse_expression_list(TokenKind::RightParen)?;

        Ok(Expr::Call(CallExpr {
            span: self.span_from(callee.span()),
            callee: Box::new(callee),
            args,
        }))
    }

    /// `target[index]`
    fn parse_index(&mut self, target: Expr) -> ParseResult<Expr> {
        self.advance(); // [
        let index = self.parse_expression()?;
        self.consume(TokenKind::RightBracket)?;

        Ok(Expr::Index(IndexExpr {
            span: self.span_from(target.span()),
            target: Box::new(target),
            index: Box::new(index),
        }))
    }

    /// Parenthesized expression; grouping leaves no node behind
    fn parse_group(&mut self) -> ParseResult<Expr> {
        self.advance(); // (
        let expr = self.parse_expression()?;
        self.consume(TokenKind::RightParen)?;
        Ok(expr)
    }

    fn parse_array_literal(&mut self) -> ParseResult<Expr> {
        let start = self.advance().span;
        let elements = self.parse_expression_list(TokenKind::RightBracket)?;

        Ok(Expr::Array(ArrayLiteral {
            elements,
            span: self.span_from(start),
        }))
    }

    /// `{key: value, ...}`
    fn parse_hash_literal(&mut self) -> ParseResult<Expr> {
        let start = self.advance().span;
        let mut pairs = Vec::new();

        while !self.check(TokenKind::RightBrace) {
            let key = self.parse_expression()?;
            self.consume(TokenKind::Colon)?;
            let value = self.parse_expression()?;
            pairs.push((key, value));

            if !self.check(TokenKind::RightBrace) {
                self.consume(TokenKind::Comma)?;
            }
        }
        self.consume(TokenKind::RightBrace)?;

        Ok(Expr::Hash(HashLiteral {
            pairs,
            span: self.span_from(start),
        }))
    }

    /// `if (<condition>) { ... }` with an optional `else { ... }`
    fn parse_if(&mut self) -> ParseResult<Expr> {
        let start = self.advance().span;

        self.consume(TokenKind::LeftParen)?;
        let condition = self.parse_expression()?;
        self.consume(TokenKind::RightParen)?;

        let consequence = self.parse_block()?;
        let alternative = if self.match_token(TokenKind::Else) {
            Some(self.parse_block()?)
        } else {
            None
        };

        Ok(Expr::If(IfExpr {
            condition: Box::new(condition),
            consequence,
            alternative,
            span: self.span_from(start),
        }))
    }

    /// `fn(<params>) { <body> }`
    fn parse_function_literal(&mut self) -> ParseResult<Expr> {
        let start = self.advance().span;

        self.consume(TokenKind::LeftParen)?;
        let mut params = Vec::new();
        if !self.match_token(TokenKind::RightParen) {
            loop {
                let token = self.consume(TokenKind::Identifier)?;
                params.push(Identifier {
                    name: token.lexeme.clone(),
                    span: token.span,
                });
                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
            self.consume(TokenKind::RightParen)?;
        }

        let body = self.parse_block()?;

        Ok(Expr::Function(Rc::new(FunctionLiteral {
            params,
            body,
            span: self.span_from(start),
        })))
    }

    /// Comma-separated expressions up to and including `end`
    fn parse_expression_list(&mut self, end: TokenKind) -> ParseResult<Vec<Expr>> {
        let mut items = Vec::new();

        if self.match_token(end) {
            return Ok(items);
        }

        loop {
            items.push(self.parse_expression()?);
            if !self.match_token(TokenKind::Comma) {
                break;
            }
        }
        self.consume(end)?;

        Ok(items)
    }
}

/// Infix binding strength of a token; `Lowest` for tokens that continue nothing
fn token_precedence(kind: TokenKind) -> Precedence {
    match kind {
        TokenKind::EqualEqual | TokenKind::BangEqual => Precedence::Equals,
        TokenKind::Less | TokenKind::Greater => Precedence::LessGreater,
        TokenKind::Plus | TokenKind::Minus => Precedence::Sum,
        TokenKind::Star | TokenKind::Slash => Precedence::Product,
        TokenKind::LeftParen => Precedence::Call,
        TokenKind::LeftBracket => Precedence::Index,
        _ => Precedence::Lowest,
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::*;
    use crate::lexer::Lexer;
    use crate::parser::Parser;

    fn parse_ok(source: &str) -> Program {
        let mut lexer = Lexer::new(source);
        let (tokens, _) = lexer.tokenize();
        let mut parser = Parser::new(tokens);
        let (program, diagnostics) = parser.parse();
        assert!(diagnostics.is_empty(), "unexpected diagnostics: {:?}", diagnostics);
        program
    }

    fn single_expr(source: &str) -> Expr {
        let program = parse_ok(source);
        assert_eq!(program.statements.len(), 1);
        match &program.statements[0] {
            Stmt::Expr(stmt) => stmt.expr.clone(),
            other => panic!("expected expression statement, got {:?}", other),
        }
    }

    #[test]
    fn test_integer_literal() {
        assert!(matches!(
            single_expr("5;"),
            Expr::Literal(Literal::Integer(5), _)
        ));
    }

    #[test]
    fn test_integer_out_of_range() {
        let mut lexer = Lexer::new("99999999999999999999");
        let (tokens, _) = lexer.tokenize();
        let (_, diagnostics) = Parser::new(tokens).parse();
        assert_eq!(
            diagnostics[0].message,
            r#"Could not parse "99999999999999999999" as an integer"#
        );
    }

    #[test]
    fn test_prefix_expression() {
        match single_expr("!foo") {
            Expr::Prefix(p) => {
                assert_eq!(p.op, PrefixOp::Not);
                assert!(matches!(*p.right, Expr::Identifier(ref id) if id.name == "foo"));
            }
            other => panic!("expected prefix, got {:?}", other),
        }
    }

    #[test]
    fn test_infix_spans_cover_operands() {
        let expr = single_expr("a + bc");
        assert_eq!(expr.span().start, 0);
        assert_eq!(expr.span().end, 6);
    }

    #[test]
    fn test_if_else_expression() {
        match single_expr("if (x < y) { x } else { y }") {
            Expr::If(i) => {
                assert_eq!(i.condition.to_string(), "(x < y)");
                assert_eq!(i.consequence.statements.len(), 1);
                assert!(i.alternative.is_some());
            }
            other => panic!("expected if, got {:?}", other),
        }
    }

    #[test]
    fn test_function_parameters() {
        for (source, expected) in [
            ("fn() {};", vec![]),
            ("fn(x) {};", vec!["x"]),
            ("fn(x, y, z) {};", vec!["x", "y", "z"]),
        ] {
            match single_expr(source) {
                Expr::Function(f) => {
                    let names: Vec<_> = f.params.iter().map(|p| p.name.as_str()).collect();
                    assert_eq!(names, expected);
                }
                other => panic!("expected function, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_call_arguments() {
        match single_expr("add(1, 2 * 3, 4 + 5);") {
            Expr::Call(c) => {
                assert_eq!(c.callee.to_string(), "add");
                let args: Vec<_> = c.args.iter().map(|a| a.to_string()).collect();
                assert_eq!(args, vec!["1", "(2 * 3)", "(4 + 5)"]);
            }
            other => panic!("expected call, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_hash_literal() {
        match single_expr("{}") {
            Expr::Hash(h) => assert!(h.pairs.is_empty()),
            other => panic!("expected hash, got {:?}", other),
        }
    }

    #[test]
    fn test_hash_literal_keeps_source_order() {
        let expr = single_expr(r#"{"one": 1, "two": 2, 3: 4 * 5}"#);
        assert_eq!(expr.to_string(), r#"{"one": 1, "two": 2, 3: (4 * 5)}"#);
    }

    #[test]
    fn test_index_binds_tighter_than_call_and_prefix() {
        assert_eq!(single_expr("-a[0]").to_string(), "(-(a[0]))");
        assert_eq!(single_expr("f(x)[1]").to_string(), "(f(x)[1])");
    }
}
