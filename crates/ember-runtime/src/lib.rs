//! Ember Runtime - tree-walking interpreter for the Ember language
//!
//! The pipeline is lexer -> parser -> interpreter:
//! - [`Lexer`] turns source text into [`Token`]s
//! - [`Parser`] builds an [`ast::Program`], collecting every syntax error
//! - [`Interpreter`] evaluates the program against a persistent top-level
//!   [`Env`], producing a [`Value`] (runtime failures are `Value::Error`)
//!
//! [`ReplCore`] and [`Ember`] wrap the whole pipeline for line-oriented
//! front ends and embedding hosts.

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod ast;
pub mod diagnostic;
pub mod environment;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod repl;
pub mod runtime;
pub mod span;
pub mod stdlib;
pub mod token;
pub mod value;

pub use ast::{Program, VersionedProgram};
pub use diagnostic::{Diagnostic, DiagnosticLevel};
pub use environment::Env;
pub use interpreter::Interpreter;
pub use lexer::Lexer;
pub use parser::Parser;
pub use repl::{ReplCore, ReplResult};
pub use runtime::{Ember, RuntimeResult};
pub use span::Span;
pub use token::{Token, TokenKind};
pub use value::{RuntimeError, Value, ValueKind};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_pipeline_smoke() {
        let runtime = Ember::new();
        assert_eq!(runtime.eval("(2 + 3) * 4"), Ok(Value::Integer(20)));
    }
}
