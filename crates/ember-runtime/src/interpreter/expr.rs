//! Expression evaluation

use crate::ast::{Expr, InfixOp, Literal, PrefixOp};
use crate::environment::Env;
use crate::interpreter::{EvalResult, Interpreter, Signal};
use crate::stdlib;
use crate::value::{Function, HashPair, RuntimeError, Value, ValueHash};
use std::rc::Rc;

impl Interpreter {
    /// Evaluate an expression
    pub(super) fn eval_expr(&mut self, expr: &Expr, env: &Env) -> EvalResult {
        match expr {
            Expr::Literal(lit, _) => Ok(eval_literal(lit)),
            Expr::Identifier(id) => env
                .get(&id.name)
                .or_else(|| stdlib::lookup(&id.name))
                .ok_or_else(|| RuntimeError::IdentifierNotFound(id.name.clone()).into()),
            Expr::Prefix(prefix) => {
                let right = self.eval_expr(&prefix.right, env)?;
                Ok(eval_prefix(prefix.op, right)?)
            }
            Expr::Infix(infix) => {
                let left = self.eval_expr(&infix.left, env)?;
                let right = self.eval_expr(&infix.right, env)?;
                Ok(eval_infix(infix.op, &left, &right)?)
            }
            Expr::If(if_expr) => {
                let condition = self.eval_expr(&if_expr.condition, env)?;
                let branch = if condition.is_truthy() {
                    Some(&if_expr.consequence)
                } else {
                    if_expr.alternative.as_ref()
                };
                match branch {
                    Some(block) => Ok(self.eval_block(block, env)?.unwrap_or(Value::NULL)),
                    None => Ok(Value::NULL),
                }
            }
            Expr::Function(literal) => Ok(Value::Function(Rc::new(Function {
                literal: Rc::clone(literal),
                env: env.clone(),
            }))),
            Expr::Call(call) => {
                let callee = self.eval_expr(&call.callee, env)?;
                let args = self.eval_exprs(&call.args, env)?;
                self.apply_function(callee, args)
            }
            Expr::Array(array) => Ok(Value::array(self.eval_exprs(&array.elements, env)?)),
            Expr::Index(index) => {
                let target = self.eval_expr(&index.target, env)?;
                let key = self.eval_expr(&index.index, env)?;
                Ok(eval_index(&target, &key)?)
            }
            Expr::Hash(hash) => {
                let mut entries = ValueHash::new();
                for (key_expr, value_expr) in &hash.pairs {
                    let key = self.eval_expr(key_expr, env)?;
                    let hash_key = key.hash_key()?;
                    let value = self.eval_expr(value_expr, env)?;
                    entries.insert(hash_key, HashPair { key, value });
                }
                Ok(Value::Hash(entries))
            }
        }
    }

    /// Evaluate left to right, stopping at the first error
    fn eval_exprs(&mut self, exprs: &[Expr], env: &Env) -> EvalResult<Vec<Value>> {
        exprs.iter().map(|expr| self.eval_expr(expr, env)).collect()
    }

    /// Call a closure or builtin with already-evaluated arguments
    pub(super) fn apply_function(&mut self, callee: Value, args: Vec<Value>) -> EvalResult {
        match callee {
            Value::Function(func) => {
                if args.len() != func.arity() {
                    return Err(RuntimeError::ArityMismatch {
                        want: func.arity(),
                        got: args.len(),
                    }
                    .into());
                }

                log::trace!("calling fn/{}", func.arity());
                let call_env = Env::enclosed(&func.env);
                for (param, arg) in func.literal.params.iter().zip(args) {
                    call_env.set(param.name.clone(), arg);
                }

                match self.eval_block(&func.literal.body, &call_env) {
                    Ok(value) => Ok(value.unwrap_or(Value::NULL)),
                    Err(Signal::Return(value)) => Ok(value),
                    Err(err) => Err(err),
                }
            }
            Value::Builtin(builtin) => {
                log::trace!("calling builtin {}", builtin.name);
                Ok((builtin.func)(&args, &mut self.output)?)
            }
            other => Err(RuntimeError::NotAFunction(other.kind()).into()),
        }
    }
}

fn eval_literal(lit: &Literal) -> Value {
    match lit {
        Literal::Integer(n) => Value::Integer(*n),
        Literal::Boolean(b) => Value::from_bool(*b),
        Literal::String(s) => Value::string(s),
    }
}

fn eval_prefix(op: PrefixOp, right: Value) -> Result<Value, RuntimeError> {
    match op {
        PrefixOp::Not => Ok(Value::from_bool(!right.is_truthy())),
        PrefixOp::Negate => match right {
            Value::Integer(n) => Ok(Value::Integer(n.wrapping_neg())),
            other => Err(RuntimeError::UnknownPrefixOperator {
                op: op.as_str(),
                operand: other.kind(),
            }),
        },
    }
}

fn eval_infix(op: InfixOp, left: &Value, right: &Value) -> Result<Value, RuntimeError> {
    match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => eval_integer_infix(op, *a, *b),
        (Value::String(a), Value::String(b)) => match op {
            InfixOp::Add => Ok(Value::string(format!("{}{}", a, b))),
            InfixOp::Eq => Ok(Value::from_bool(a == b)),
            InfixOp::Ne => Ok(Value::from_bool(a != b)),
            _ => Err(unknown_infix(op, left, right)),
        },
        _ if left.kind() != right.kind() => Err(RuntimeError::TypeMismatch {
            left: left.kind(),
            op: op.as_str(),
            right: right.kind(),
        }),
        _ => match op {
            InfixOp::Eq => Ok(Value::from_bool(is_identical(left, right))),
            InfixOp::Ne => Ok(Value::from_bool(!is_identical(left, right))),
            _ => Err(unknown_infix(op, left, right)),
        },
    }
}

/// Integer arithmetic wraps on overflow
fn eval_integer_infix(op: InfixOp, a: i64, b: i64) -> Result<Value, RuntimeError> {
    let value = match op {
        InfixOp::Add => Value::Integer(a.wrapping_add(b)),
        InfixOp::Sub => Value::Integer(a.wrapping_sub(b)),
        InfixOp::Mul => Value::Integer(a.wrapping_mul(b)),
        InfixOp::Div => {
            if b == 0 {
                return Err(RuntimeError::DivisionByZero);
            }
            Value::Integer(a.wrapping_div(b))
        }
        InfixOp::Lt => Value::from_bool(a < b),
        InfixOp::Gt => Value::from_bool(a > b),
        InfixOp::Eq => Value::from_bool(a == b),
        InfixOp::Ne => Value::from_bool(a != b),
    };
    Ok(value)
}

/// Identity of two values of the same kind
///
/// Booleans and null are single instances per session, so comparing the
/// variant is comparing identity. Arrays, hashes and closures compare by
/// the storage they share.
fn is_identical(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Boolean(a), Value::Boolean(b)) => a == b,
        (Value::Null, Value::Null) => true,
        (Value::Array(a), Value::Array(b)) => a.ptr_eq(b),
        (Value::Hash(a), Value::Hash(b)) => a.ptr_eq(b),
        (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
        (Value::Builtin(a), Value::Builtin(b)) => a.name == b.name,
        _ => false,
    }
}

fn unknown_infix(op: InfixOp, left: &Value, right: &Value) -> RuntimeError {
    RuntimeError::UnknownInfixOperator {
        left: left.kind(),
        op: op.as_str(),
        right: right.kind(),
    }
}

fn eval_index(target: &Value, index: &Value) -> Result<Value, RuntimeError> {
    match (target, index) {
        (Value::Array(array), Value::Integer(i)) => Ok(usize::try_from(*i)
            .ok()
            .and_then(|i| array.get(i).cloned())
            .unwrap_or(Value::NULL)),
        (Value::Hash(hash), key) => {
            let hash_key = key.hash_key()?;
            Ok(hash
                .get(&hash_key)
                .map(|pair| pair.value.clone())
                .unwrap_or(Value::NULL))
        }
        _ => Err(RuntimeError::IndexNotSupported(target.kind())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ValueKind;

    #[test]
    fn test_integer_overflow_wraps() {
        let result = eval_integer_infix(InfixOp::Add, i64::MAX, 1).unwrap();
        assert_eq!(result, Value::Integer(i64::MIN));
        let result = eval_integer_infix(InfixOp::Div, i64::MIN, -1).unwrap();
        assert_eq!(result, Value::Integer(i64::MIN));
    }

    #[test]
    fn test_division_truncates() {
        assert_eq!(
            eval_integer_infix(InfixOp::Div, -7, 2).unwrap(),
            Value::Integer(-3)
        );
        assert_eq!(
            eval_integer_infix(InfixOp::Div, 1, 0),
            Err(RuntimeError::DivisionByZero)
        );
    }

    #[test]
    fn test_identity_for_arrays() {
        let a = Value::array(vec![Value::Integer(1)]);
        let b = Value::array(vec![Value::Integer(1)]);
        assert!(is_identical(&a, &a.clone()));
        assert!(!is_identical(&a, &b));
    }

    #[test]
    fn test_mismatch_before_unknown_operator() {
        let err = eval_infix(InfixOp::Sub, &Value::string("a"), &Value::Integer(1)).unwrap_err();
        assert_eq!(err.to_string(), "type mismatch: STRING - INTEGER");
        let err = eval_infix(InfixOp::Sub, &Value::string("a"), &Value::string("b")).unwrap_err();
        assert_eq!(err.to_string(), "unknown operator: STRING - STRING");
    }

    #[test]
    fn test_index_out_of_range_is_null() {
        let array = Value::array(vec![Value::Integer(1)]);
        assert_eq!(eval_index(&array, &Value::Integer(1)).unwrap(), Value::NULL);
        assert_eq!(eval_index(&array, &Value::Integer(-1)).unwrap(), Value::NULL);
        assert_eq!(
            eval_index(&Value::Integer(1), &Value::Integer(0)),
            Err(RuntimeError::IndexNotSupported(ValueKind::Integer))
        );
    }
}
