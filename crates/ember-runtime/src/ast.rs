//! Abstract Syntax Tree (AST) definitions
//!
//! Nodes are plain data produced by the parser and walked by the interpreter.
//! `Display` on any node yields source text that parses back to the same
//! tree, which is what the REPL echo, closure inspection and `ember ast` use.

use crate::span::Span;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

/// AST schema version
///
/// Included in JSON dumps. Increment when making breaking changes to the
/// AST structure.
pub const AST_VERSION: u32 = 1;

/// Top-level program: the statements of one unit of input
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

/// Versioned AST wrapper for JSON serialization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionedProgram {
    /// AST schema version
    pub ast_version: u32,
    /// The actual program AST
    #[serde(flatten)]
    pub program: Program,
}

impl VersionedProgram {
    pub fn new(program: Program) -> Self {
        Self {
            ast_version: AST_VERSION,
            program,
        }
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl From<Program> for VersionedProgram {
    fn from(program: Program) -> Self {
        Self::new(program)
    }
}

/// Brace-delimited statement sequence (conditional arms, function bodies)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub statements: Vec<Stmt>,
    pub span: Span,
}

/// Statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Stmt {
    Let(LetStmt),
    Return(ReturnStmt),
    Expr(ExprStmt),
}

/// `let <name> = <value>;`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LetStmt {
    pub name: Identifier,
    pub value: Expr,
    pub span: Span,
}

/// `return <value>;` with the value optional
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnStmt {
    pub value: Option<Expr>,
    pub span: Span,
}

/// Expression evaluated for its value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExprStmt {
    pub expr: Expr,
    pub span: Span,
}

/// Expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    Literal(Literal, Span),
    Identifier(Identifier),
    Prefix(PrefixExpr),
    Infix(InfixExpr),
    If(IfExpr),
    Function(Rc<FunctionLiteral>),
    Call(CallExpr),
    Array(ArrayLiteral),
    Index(IndexExpr),
    Hash(HashLiteral),
}

/// Literal value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    Integer(i64),
    Boolean(bool),
    String(String),
}

/// Identifier reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identifier {
    pub name: String,
    pub span: Span,
}

/// Prefix operator expression (`-x`, `!ok`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrefixExpr {
    pub op: PrefixOp,
    pub right: Box<Expr>,
    pub span: Span,
}

/// Binary operator expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfixExpr {
    pub op: InfixOp,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
    pub span: Span,
}

/// `if (<condition>) { ... } else { ... }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IfExpr {
    pub condition: Box<Expr>,
    pub consequence: Block,
    pub alternative: Option<Block>,
    pub span: Span,
}

/// `fn(<params>) { <body> }`
///
/// Shared behind an `Rc` so every closure created from the literal reuses
/// the same parameter list and body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionLiteral {
    pub params: Vec<Identifier>,
    pub body: Block,
    pub span: Span,
}

/// Function application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallExpr {
    pub callee: Box<Expr>,
    pub args: Vec<Expr>,
    pub span: Span,
}

/// `[a, b, c]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrayLiteral {
    pub elements: Vec<Expr>,
    pub span: Span,
}

/// `target[index]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexExpr {
    pub target: Box<Expr>,
    pub index: Box<Expr>,
    pub span: Span,
}

/// `{key: value, ...}`, pairs in source order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HashLiteral {
    pub pairs: Vec<(Expr, Expr)>,
    pub span: Span,
}

/// Prefix operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrefixOp {
    /// `!`
    Not,
    /// `-`
    Negate,
}

/// Infix operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InfixOp {
    Add,
    Sub,
    Mul,
    Div,
    Lt,
    Gt,
    Eq,
    Ne,
}

impl PrefixOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrefixOp::Not => "!",
            PrefixOp::Negate => "-",
        }
    }
}

impl InfixOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            InfixOp::Add => "+",
            InfixOp::Sub => "-",
            InfixOp::Mul => "*",
            InfixOp::Div => "/",
            InfixOp::Lt => "<",
            InfixOp::Gt => ">",
            InfixOp::Eq => "==",
            InfixOp::Ne => "!=",
        }
    }
}

// Helper methods for getting spans from AST nodes

impl Expr {
    /// Get the span of this expression
    pub fn span(&self) -> Span {
        match self {
            Expr::Literal(_, span) => *span,
            Expr::Identifier(id) => id.span,
            Expr::Prefix(p) => p.span,
            Expr::Infix(i) => i.span,
            Expr::If(i) => i.span,
            Expr::Function(f) => f.span,
            Expr::Call(c) => c.span,
            Expr::Array(a) => a.span,
            Expr::Index(i) => i.span,
            Expr::Hash(h) => h.span,
        }
    }
}

impl Stmt {
    /// Get the span of this statement
    pub fn span(&self) -> Span {
        match self {
            Stmt::Let(l) => l.span,
            Stmt::Return(r) => r.span,
            Stmt::Expr(e) => e.span,
        }
    }
}

// Textual forms

/// Write `items` separated by `", "`
fn write_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, stmt) in self.statements.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", stmt)?;
        }
        Ok(())
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{ ")?;
        for stmt in &self.statements {
            write!(f, "{} ", stmt)?;
        }
        f.write_str("}")
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stmt::Let(l) => write!(f, "let {} = {};", l.name, l.value),
            Stmt::Return(r) => match &r.value {
                Some(value) => write!(f, "return {};", value),
                None => f.write_str("return;"),
            },
            Stmt::Expr(e) => write!(f, "{};", e.expr),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(lit, _) => write!(f, "{}", lit),
            Expr::Identifier(id) => write!(f, "{}", id),
            Expr::Prefix(p) => write!(f, "({}{})", p.op.as_str(), p.right),
            Expr::Infix(i) => write!(f, "({} {} {})", i.left, i.op.as_str(), i.right),
            Expr::If(i) => {
                write!(f, "if ({}) {}", i.condition, i.consequence)?;
                if let Some(alt) = &i.alternative {
                    write!(f, " else {}", alt)?;
                }
                Ok(())
            }
            Expr::Function(func) => write!(f, "{}", func),
            Expr::Call(c) => {
                write!(f, "{}(", c.callee)?;
                write_list(f, &c.args)?;
                f.write_str(")")
            }
            Expr::Array(a) => {
                f.write_str("[")?;
                write_list(f, &a.elements)?;
                f.write_str("]")
            }
            Expr::Index(i) => write!(f, "({}[{}])", i.target, i.index),
            Expr::Hash(h) => {
                f.write_str("{")?;
                for (i, (key, value)) in h.pairs.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                f.write_str("}")
            }
        }
    }
}

impl fmt::Display for FunctionLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("fn(")?;
        write_list(f, &self.params)?;
        write!(f, ") {}", self.body)
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Integer(n) => write!(f, "{}", n),
            Literal::Boolean(b) => write!(f, "{}", b),
            Literal::String(s) => write!(f, "\"{}\"", s),
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
