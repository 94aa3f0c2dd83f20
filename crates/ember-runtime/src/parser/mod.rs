//! Parsing (tokens to AST)
//!
//! A recursive-descent parser with Pratt-style precedence climbing for
//! expressions. Parsing never stops at the first problem: a failed statement
//! records a diagnostic, is dropped from the tree, and the parser
//! resynchronizes at the next statement boundary.

mod expr;
mod stmt;

use crate::ast::Program;
use crate::diagnostic::{error_codes, Diagnostic};
use crate::span::Span;
use crate::token::{Token, TokenKind};

/// Failed construct; the diagnostic has already been recorded
pub(super) type ParseResult<T> = Result<T, ()>;

/// Binding strength, lowest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(super) enum Precedence {
    Lowest,
    /// `==` `!=`
    Equals,
    /// `<` `>`
    LessGreater,
    /// `+` `-`
    Sum,
    /// `*` `/`
    Product,
    /// `-x` `!x`
    Prefix,
    /// `f(x)`
    Call,
    /// `a[i]`
    Index,
}

/// Parser state for building AST from tokens
pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
    diagnostics: Vec<Diagnostic>,
}

impl Parser {
    /// Create a new parser for the given tokens
    ///
    /// A trailing `Eof` is appended when the stream does not already end
    /// with one.
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|t| t.kind) != Some(TokenKind::Eof) {
            let end = tokens.last().map(|t| t.span.end).unwrap_or(0);
            tokens.push(Token::new(TokenKind::Eof, "", Span::new(end, end)));
        }
        Self {
            tokens,
            current: 0,
            diagnostics: Vec::new(),
        }
    }

    /// Parse tokens into a program, returning every diagnostic found
    pub fn parse(&mut self) -> (Program, Vec<Diagnostic>) {
        let mut statements = Vec::new();

        while !self.is_at_end() {
            let start = self.current;
            match self.parse_statement() {
                Ok(stmt) => statements.push(stmt),
                Err(_) => self.synchronize(start, false),
            }
        }

        log::debug!(
            "parsed {} statements ({} diagnostics)",
            statements.len(),
            self.diagnostics.len()
        );
        (Program { statements }, std::mem::take(&mut self.diagnostics))
    }

    // === Helper methods ===

    /// Consume the current token and return it
    pub(super) fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }

    /// The token about to be consumed
    pub(super) fn peek(&self) -> &Token {
        &self.tokens[self.current.min(self.tokens.len() - 1)]
    }

    pub(super) fn previous(&self) -> &Token {
        &self.tokens[self.current.saturating_sub(1)]
    }

    pub(super) fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    /// Consume the current token if it has the given kind
    pub(super) fn match_token(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Require a token of the given kind
    pub(super) fn consume(&mut self, kind: TokenKind) -> ParseResult<&Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            let message = format!(
                "Expected next token to be {}, got {}",
                kind.name(),
                self.peek().kind.name()
            );
            self.error(error_codes::UNEXPECTED_TOKEN, message, "unexpected token");
            Err(())
        }
    }

    pub(super) fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    /// Span from `start` to the end of the last consumed token
    pub(super) fn span_from(&self, start: Span) -> Span {
        start.merge(self.previous().span)
    }

    /// Record a diagnostic at the current token
    pub(super) fn error(&mut self, code: &str, message: String, label: &str) {
        let span = self.peek().span;
        self.diagnostics
            .push(Diagnostic::error_with_code(code, message, span).with_label(label));
    }

    /// Skip tokens until a likely statement boundary
    ///
    /// Stops just past a `;`, or before `let` or `return`. Inside a block it
    /// also stops before the closing `}`. `start` is the cursor position where
    /// the failed statement began; at least one token is skipped only when the
    /// statement consumed nothing.
    pub(super) fn synchronize(&mut self, start: usize, in_block: bool) {
        if self.current == start {
            self.advance();
        }

        while !self.is_at_end() {
            if self.current > start && self.previous().kind == TokenKind::Semicolon {
                return;
            }

            match self.peek().kind {
                TokenKind::Let | TokenKind::Return => return,
                TokenKind::RightBrace if in_block => return,
                _ => {}
            }

            self.advance();
        }
    }
}
