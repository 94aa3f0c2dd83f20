//! Literal scanning for the lexer

use crate::diagnostic::error_codes;
use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};

impl Lexer {
    /// Scan a string literal; the lexeme is the text between the quotes
    pub(super) fn string(&mut self) -> Token {
        let mut value = String::new();

        while !self.is_at_end() && self.peek() != '"' {
            if self.peek() == '\n' {
                self.line += 1;
            }
            value.push(self.advance());
        }

        if self.is_at_end() {
            return self.error_eof(
                error_codes::UNTERMINATED_STRING,
                "Unterminated string literal",
                "add a closing '\"' to end the string",
            );
        }

        self.advance(); // Closing "

        self.make_token(TokenKind::String, &value)
    }

    /// Scan a maximal run of digits
    pub(super) fn number(&mut self) -> Token {
        while !self.is_at_end() && self.peek().is_ascii_digit() {
            self.advance();
        }

        let text: String = self.chars[self.start_pos..self.current].iter().collect();
        self.make_token(TokenKind::Int, &text)
    }
}
