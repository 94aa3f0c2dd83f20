//! Ember runtime API for embedding

use crate::ast::Program;
use crate::diagnostic::Diagnostic;
use crate::interpreter::Interpreter;
use crate::lexer::Lexer;
use crate::parser::Parser;
use crate::value::Value;
use std::cell::RefCell;

/// Result type for runtime operations
pub type RuntimeResult<T> = Result<T, Vec<Diagnostic>>;

/// Ember runtime instance
///
/// Provides a high-level API for embedding Ember in host applications.
/// Bindings persist between calls to [`Ember::eval`].
///
/// # Examples
///
/// ```
/// use ember_runtime::{Ember, Value};
///
/// let runtime = Ember::new();
/// runtime.eval("let double = fn(x) { x * 2 };").unwrap();
/// assert_eq!(runtime.eval("double(21)").unwrap(), Value::Integer(42));
/// ```
pub struct Ember {
    /// Interpreter for executing code (using interior mutability)
    interpreter: RefCell<Interpreter>,
}

impl Ember {
    /// Create a new Ember runtime instance
    pub fn new() -> Self {
        Self {
            interpreter: RefCell::new(Interpreter::new()),
        }
    }

    /// Parse source text without evaluating it
    ///
    /// # Examples
    ///
    /// ```
    /// use ember_runtime::Ember;
    ///
    /// let program = Ember::parse("-1 + 2 * 3").unwrap();
    /// assert_eq!(program.to_string(), "((-1) + (2 * 3));");
    ///
    /// let errors = Ember::parse("let = 5; let y 10;").unwrap_err();
    /// assert_eq!(errors.len(), 2);
    /// ```
    pub fn parse(source: &str) -> RuntimeResult<Program> {
        let mut lexer = Lexer::new(source);
        let (tokens, mut diagnostics) = lexer.tokenize();

        let mut parser = Parser::new(tokens);
        let (program, parse_diags) = parser.parse();
        diagnostics.extend(parse_diags);

        if diagnostics.is_empty() {
            Ok(program)
        } else {
            Err(diagnostics
                .into_iter()
                .map(|diag| diag.with_source(source))
                .collect())
        }
    }

    /// Evaluate Ember source code
    ///
    /// Syntax problems come back as `Err(diagnostics)`. Runtime failures are
    /// ordinary values: `Ok(Value::Error(..))`. Input ending in a `let`
    /// evaluates to `null`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ember_runtime::{Ember, Value};
    ///
    /// let runtime = Ember::new();
    /// match runtime.eval("1 + 2") {
    ///     Ok(Value::Integer(n)) => assert_eq!(n, 3),
    ///     Err(diagnostics) => panic!("Error: {:?}", diagnostics),
    ///     Ok(other) => panic!("Unexpected value {}", other),
    /// }
    /// ```
    pub fn eval(&self, source: &str) -> RuntimeResult<Value> {
        let program = Self::parse(source)?;
        let value = self.interpreter.borrow_mut().eval(&program);
        Ok(value.unwrap_or(Value::NULL))
    }

    /// Drain output written by `puts`
    pub fn take_output(&self) -> String {
        self.interpreter.borrow_mut().take_output()
    }
}

impl Default for Ember {
    fn default() -> Self {
        Self::new()
    }
}
