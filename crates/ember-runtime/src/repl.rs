//! REPL core logic (UI-agnostic)

use crate::diagnostic::Diagnostic;
use crate::interpreter::Interpreter;
use crate::lexer::Lexer;
use crate::parser::Parser;
use crate::value::Value;

/// Outcome of one line of input
#[derive(Debug, Clone, PartialEq)]
pub struct ReplResult {
    /// The value produced by evaluation (None for `let` or when diagnostics were reported)
    pub value: Option<Value>,
    /// Scanner and parser diagnostics; when non-empty nothing was evaluated
    pub diagnostics: Vec<Diagnostic>,
    /// Output written by `puts` during evaluation
    pub stdout: String,
}

impl ReplResult {
    /// Whether the line was rejected or evaluated to an error value
    pub fn is_error(&self) -> bool {
        !self.diagnostics.is_empty() || self.value.as_ref().is_some_and(Value::is_error)
    }
}

/// REPL core state
///
/// Maintains persistent state across multiple eval calls:
/// - `let` bindings stay in the top-level scope
/// - Errors do not reset state
pub struct ReplCore {
    interpreter: Interpreter,
}

impl ReplCore {
    /// Create a new REPL core
    pub fn new() -> Self {
        Self {
            interpreter: Interpreter::new(),
        }
    }

    /// Evaluate a line of input
    ///
    /// Runs lex -> parse -> eval against the persistent top-level scope. Any
    /// lexer or parser diagnostic means the line is not evaluated at all;
    /// every diagnostic found is returned, in source order.
    pub fn eval_line(&mut self, input: &str) -> ReplResult {
        let mut lexer = Lexer::new(input);
        let (tokens, lex_diags) = lexer.tokenize();

        let mut parser = Parser::new(tokens);
        let (program, parse_diags) = parser.parse();

        let mut diagnostics: Vec<Diagnostic> = lex_diags
            .into_iter()
            .chain(parse_diags)
            .map(|diag| diag.with_source(input))
            .collect();

        if !diagnostics.is_empty() {
            diagnostics.sort_by_key(|diag| diag.span.start);
            log::warn!("input rejected with {} diagnostics", diagnostics.len());
            return ReplResult {
                value: None,
                diagnostics,
                stdout: String::new(),
            };
        }

        let value = self.interpreter.eval(&program);
        ReplResult {
            value,
            diagnostics,
            stdout: self.interpreter.take_output(),
        }
    }

    /// Names bound at top level, sorted
    pub fn bindings(&self) -> Vec<String> {
        self.interpreter.globals().names()
    }

    /// Reset REPL state
    ///
    /// Clears all top-level bindings
    pub fn reset(&mut self) {
        self.interpreter.reset();
    }
}

impl Default for ReplCore {
    fn default() -> Self {
        Self::new()
    }
}
