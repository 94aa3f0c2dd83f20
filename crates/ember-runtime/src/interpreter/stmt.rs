//! Statement evaluation

use crate::ast::{Block, Stmt};
use crate::environment::Env;
use crate::interpreter::{EvalResult, Interpreter, Signal};
use crate::value::Value;

impl Interpreter {
    /// Evaluate a statement; `let` yields no value
    pub(super) fn eval_statement(&mut self, stmt: &Stmt, env: &Env) -> EvalResult<Option<Value>> {
        match stmt {
            Stmt::Let(let_stmt) => {
                let value = self.eval_expr(&let_stmt.value, env)?;
                env.set(let_stmt.name.name.clone(), value);
                Ok(None)
            }
            Stmt::Return(ret) => {
                let value = match &ret.value {
                    Some(expr) => self.eval_expr(expr, env)?,
                    None => Value::NULL,
                };
                Err(Signal::Return(value))
            }
            Stmt::Expr(expr_stmt) => Ok(Some(self.eval_expr(&expr_stmt.expr, env)?)),
        }
    }

    /// Evaluate a block in `env` itself; blocks open no scope of their own
    ///
    /// A `return` inside the block propagates unchanged so the enclosing
    /// call can tell it apart from falling off the end.
    pub(super) fn eval_block(&mut self, block: &Block, env: &Env) -> EvalResult<Option<Value>> {
        let mut result = None;
        for stmt in &block.statements {
            result = self.eval_statement(stmt, env)?;
        }
        Ok(result)
    }
}
