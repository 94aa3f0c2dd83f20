//! AST interpreter (tree-walking)
//!
//! Direct AST evaluation against chained environments.
//! - Errors short-circuit: the first failure stops every enclosing construct
//! - `return` unwinds to the nearest call, or ends the program
//! - Conditional blocks share the enclosing scope, calls get a fresh child
//!   of the closure's captured scope

mod expr;
mod stmt;

use crate::ast::Program;
use crate::environment::Env;
use crate::value::{RuntimeError, Value};

/// Why evaluation of a construct stopped early
#[derive(Debug, Clone, PartialEq)]
pub(super) enum Signal {
    /// A `return` travelling to the nearest function call or the program
    Return(Value),
    /// The first runtime error; nothing after it is evaluated
    Error(RuntimeError),
}

impl From<RuntimeError> for Signal {
    fn from(err: RuntimeError) -> Self {
        Signal::Error(err)
    }
}

pub(super) type EvalResult<T = Value> = Result<T, Signal>;

/// Interpreter state
pub struct Interpreter {
    /// Top-level scope, persistent across `eval` calls
    globals: Env,
    /// Text written by `puts` since the last `take_output`
    output: String,
}

impl Interpreter {
    /// Create an interpreter with an empty top-level scope
    pub fn new() -> Self {
        Self::with_env(Env::new())
    }

    /// Create an interpreter that evaluates against `globals`
    pub fn with_env(globals: Env) -> Self {
        Self {
            globals,
            output: String::new(),
        }
    }

    /// The top-level scope
    pub fn globals(&self) -> &Env {
        &self.globals
    }

    /// Evaluate a program in the top-level scope
    ///
    /// Returns the value of the last statement, `None` when that statement
    /// was a `let` (or the program is empty). A `return` at top level ends
    /// the program with its value; a runtime error ends it with
    /// `Value::Error`.
    pub fn eval(&mut self, program: &Program) -> Option<Value> {
        log::debug!("evaluating {} statements", program.statements.len());
        let env = self.globals.clone();
        let mut result = None;

        for stmt in &program.statements {
            match self.eval_statement(stmt, &env) {
                Ok(value) => result = value,
                Err(Signal::Return(value)) => return Some(value),
                Err(Signal::Error(err)) => {
                    log::debug!("runtime error: {}", err);
                    return Some(Value::Error(err));
                }
            }
        }

        result
    }

    /// Drain everything `puts` has written
    pub fn take_output(&mut self) -> String {
        std::mem::take(&mut self.output)
    }

    /// Drop every top-level binding
    pub fn reset(&mut self) {
        self.globals = Env::new();
        self.output.clear();
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}
