//! Token types for lexical analysis
//!
//! Defines the closed vocabulary shared by the lexer and the parser.

use crate::span::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Token produced by the lexer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// The kind of token
    pub kind: TokenKind,
    /// The source text of this token
    pub lexeme: String,
    /// Source location
    pub span: Span,
}

impl Token {
    /// Create a new token
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            span,
        }
    }
}

/// Classification of token types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    // Special
    /// Character that starts no token
    Illegal,
    /// End of input
    Eof,

    // Literals
    /// Identifier
    Identifier,
    /// Integer literal (42)
    Int,
    /// String literal ("hello")
    String,

    // Operators
    /// `=`
    Assign,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `!`
    Bang,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `<`
    Less,
    /// `>`
    Greater,
    /// `==`
    EqualEqual,
    /// `!=`
    BangEqual,

    // Delimiters
    /// `,`
    Comma,
    /// `;`
    Semicolon,
    /// `:`
    Colon,
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,

    // Keywords
    /// `fn`
    Function,
    /// `let`
    Let,
    /// `true`
    True,
    /// `false`
    False,
    /// `if`
    If,
    /// `else`
    Else,
    /// `return`
    Return,
}

impl TokenKind {
    /// Look up a reserved word, returning its keyword kind
    pub fn keyword(ident: &str) -> Option<TokenKind> {
        match ident {
            "fn" => Some(TokenKind::Function),
            "let" => Some(TokenKind::Let),
            "true" => Some(TokenKind::True),
            "false" => Some(TokenKind::False),
            "if" => Some(TokenKind::If),
            "else" => Some(TokenKind::Else),
            "return" => Some(TokenKind::Return),
            _ => None,
        }
    }

    /// Name used in parser diagnostics ("Expected next token to be RPAREN")
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Illegal => "ILLEGAL",
            TokenKind::Eof => "EOF",
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::Int => "INT",
            TokenKind::String => "STRING",
            TokenKind::Assign => "ASSIGN",
            TokenKind::Plus => "PLUS",
            TokenKind::Minus => "MINUS",
            TokenKind::Bang => "BANG",
            TokenKind::Star => "ASTERISK",
            TokenKind::Slash => "SLASH",
            TokenKind::Less => "LT",
            TokenKind::Greater => "GT",
            TokenKind::EqualEqual => "EQ",
            TokenKind::BangEqual => "NOT_EQ",
            TokenKind::Comma => "COMMA",
            TokenKind::Semicolon => "SEMICOLON",
            TokenKind::Colon => "COLON",
            TokenKind::LeftParen => "LPAREN",
            TokenKind::RightParen => "RPAREN",
            TokenKind::LeftBrace => "LBRACE",
            TokenKind::RightBrace => "RBRACE",
            TokenKind::LeftBracket => "LBRACKET",
            TokenKind::RightBracket => "RBRACKET",
            TokenKind::Function => "FUNCTION",
            TokenKind::Let => "LET",
            TokenKind::True => "TRUE",
            TokenKind::False => "FALSE",
            TokenKind::If => "IF",
            TokenKind::Else => "ELSE",
            TokenKind::Return => "RETURN",
        }
    }

    /// Source text of fixed tokens, empty for literal kinds
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Illegal | TokenKind::Identifier | TokenKind::Int | TokenKind::String => "",
            TokenKind::Eof => "",
            TokenKind::Assign => "=",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Bang => "!",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Less => "<",
            TokenKind::Greater => ">",
            TokenKind::EqualEqual => "==",
            TokenKind::BangEqual => "!=",
            TokenKind::Comma => ",",
            TokenKind::Semicolon => ";",
            TokenKind::Colon => ":",
            TokenKind::LeftParen => "(",
            TokenKind::RightParen => ")",
            TokenKind::LeftBrace => "{",
            TokenKind::RightBrace => "}",
            TokenKind::LeftBracket => "[",
            TokenKind::RightBracket => "]",
            TokenKind::Function => "fn",
            TokenKind::Let => "let",
            TokenKind::True => "true",
            TokenKind::False => "false",
            TokenKind::If => "if",
            TokenKind::Else => "else",
            TokenKind::Return => "return",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
