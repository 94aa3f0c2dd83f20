//! Lexical analysis (tokenization)
//!
//! The lexer turns source text into tokens on demand. It keeps nothing
//! between calls except its cursor, and once the input is exhausted every
//! further call yields another `Eof` token.

use crate::diagnostic::Diagnostic;
use crate::span::Span;
use crate::token::{Token, TokenKind};

mod literals;

/// Lexer state for tokenizing source code
pub struct Lexer {
    /// Characters of source code
    pub(super) chars: Vec<char>,
    /// Current position in chars
    pub(super) current: usize,
    /// Current line number (1-indexed)
    pub(super) line: usize,
    /// Start position of current token
    pub(super) start_pos: usize,
    /// Start line of current token
    pub(super) start_line: usize,
    /// Collected diagnostics
    pub(super) diagnostics: Vec<Diagnostic>,
}

impl Lexer {
    /// Create a new lexer for the given source code
    pub fn new(source: impl AsRef<str>) -> Self {
        Self {
            chars: source.as_ref().chars().collect(),
            current: 0,
            line: 1,
            start_pos: 0,
            start_line: 1,
            diagnostics: Vec::new(),
        }
    }

    /// Tokenize the whole input, returning tokens (ending with `Eof`) and any diagnostics
    pub fn tokenize(&mut self) -> (Vec<Token>, Vec<Diagnostic>) {
        let mut tokens = Vec::new();

        loop {
            let token = self.next_token();
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }

        log::debug!(
            "lexed {} tokens ({} diagnostics)",
            tokens.len(),
            self.diagnostics.len()
        );
        (tokens, std::mem::take(&mut self.diagnostics))
    }

    /// Scan the next token
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        self.start_pos = self.current;
        self.start_line = self.line;

        if self.is_at_end() {
            return self.make_token(TokenKind::Eof, "");
        }

        let c = self.advance();

        match c {
            '(' => self.make_token(TokenKind::LeftParen, "("),
            ')' => self.make_token(TokenKind::RightParen, ")"),
            '{' => self.make_token(TokenKind::LeftBrace, "{"),
            '}' => self.make_token(TokenKind::RightBrace, "}"),
            '[' => self.make_token(TokenKind::LeftBracket, "["),
            ']' => self.make_token(TokenKind::RightBracket, "]"),
            ';' => self.make_token(TokenKind::Semicolon, ";"),
            ',' => self.make_token(TokenKind::Comma, ","),
            ':' => self.make_token(TokenKind::Colon, ":"),
            '+' => self.make_token(TokenKind::Plus, "+"),
            '-' => self.make_token(TokenKind::Minus, "-"),
            '*' => self.make_token(TokenKind::Star, "*"),
            '/' => self.make_token(TokenKind::Slash, "/"),
            '<' => self.make_token(TokenKind::Less, "<"),
            '>' => self.make_token(TokenKind::Greater, ">"),

            '=' => {
                if self.match_char('=') {
                    self.make_token(TokenKind::EqualEqual, "==")
                } else {
                    self.make_token(TokenKind::Assign, "=")
                }
            }
            '!' => {
                if self.match_char('=') {
                    self.make_token(TokenKind::BangEqual, "!=")
                } else {
                    self.make_token(TokenKind::Bang, "!")
                }
            }

            '"' => self.string(),
            c if c.is_ascii_digit() => self.number(),
            c if c.is_ascii_alphabetic() || c == '_' => self.identifier(),

            // Reported by the parser, which has no prefix rule for it
            other => self.make_token(TokenKind::Illegal, &other.to_string()),
        }
    }

    fn skip_whitespace(&mut self) {
        while !self.is_at_end() {
            match self.peek() {
                ' ' | '\r' | '\t' => {
                    self.advance();
                }
                '\n' => {
                    self.advance();
                    self.line += 1;
                }
                _ => return,
            }
        }
    }

    fn identifier(&mut self) -> Token {
        while !self.is_at_end() && (self.peek().is_ascii_alphanumeric() || self.peek() == '_') {
            self.advance();
        }

        let text: String = self.chars[self.start_pos..self.current].iter().collect();
        let kind = TokenKind::keyword(&text).unwrap_or(TokenKind::Identifier);
        self.make_token(kind, &text)
    }

    // === Character navigation ===

    /// Advance to next character and return it
    pub(super) fn advance(&mut self) -> char {
        let c = self.chars[self.current];
        self.current += 1;
        c
    }

    /// Peek at current character without advancing
    pub(super) fn peek(&self) -> char {
        if self.is_at_end() {
            '\0'
        } else {
            self.chars[self.current]
        }
    }

    /// Check if current character matches expected, and advance if so
    fn match_char(&mut self, expected: char) -> bool {
        if self.is_at_end() || self.chars[self.current] != expected {
            false
        } else {
            self.advance();
            true
        }
    }

    pub(super) fn is_at_end(&self) -> bool {
        self.current >= self.chars.len()
    }

    // === Token creation ===

    pub(super) fn make_token(&self, kind: TokenKind, lexeme: &str) -> Token {
        Token::new(kind, lexeme, Span::new(self.start_pos, self.current))
    }

    /// Record a diagnostic covering the current token and return `Eof`
    pub(super) fn error_eof(&mut self, code: &str, message: &str, help: &str) -> Token {
        let span = Span::new(self.start_pos, self.current.max(self.start_pos + 1));
        let snippet = self.line_snippet(self.start_line);

        self.diagnostics.push(
            Diagnostic::error_with_code(code, message, span)
                .with_line(self.start_line)
                .with_snippet(snippet)
                .with_label("lexer error")
                .with_help(help),
        );

        Token::new(TokenKind::Eof, "", Span::new(self.current, self.current))
    }

    fn line_snippet(&self, line: usize) -> String {
        let source: String = self.chars.iter().collect();
        source.lines().nth(line - 1).unwrap_or("").to_string()
    }
}
