//! Builtin functions
//!
//! Builtins are resolved by name when no binding shadows them. Each one
//! checks its own arity and argument kinds.

use crate::value::{Builtin, RuntimeError, Value, ValueArray};

/// Every builtin, in registry order
pub const BUILTINS: &[Builtin] = &[
    Builtin { name: "len", func: len },
    Builtin { name: "first", func: first },
    Builtin { name: "last", func: last },
    Builtin { name: "tail", func: tail },
    Builtin { name: "push", func: push },
    Builtin { name: "puts", func: puts },
];

/// Look up a builtin by name
pub fn lookup(name: &str) -> Option<Value> {
    BUILTINS
        .iter()
        .find(|b| b.name == name)
        .map(|b| Value::Builtin(*b))
}

fn expect_arity(args: &[Value], want: usize) -> Result<(), RuntimeError> {
    if args.len() != want {
        return Err(RuntimeError::BuiltinArity {
            got: args.len(),
            want,
        });
    }
    Ok(())
}

/// The array argument of `first`, `last` and `tail`
fn array_arg<'a>(name: &str, args: &'a [Value]) -> Result<&'a ValueArray, RuntimeError> {
    expect_arity(args, 1)?;
    match &args[0] {
        Value::Array(array) => Ok(array),
        other => Err(RuntimeError::InvalidBuiltinArgument(format!(
            "argument to `{}` must be ARRAY, got {}",
            name,
            other.kind().name()
        ))),
    }
}

/// Length of a string (in characters) or an array
fn len(args: &[Value], _out: &mut String) -> Result<Value, RuntimeError> {
    expect_arity(args, 1)?;
    match &args[0] {
        Value::String(s) => Ok(Value::Integer(s.chars().count() as i64)),
        Value::Array(array) => Ok(Value::Integer(array.len() as i64)),
        other => Err(RuntimeError::InvalidBuiltinArgument(format!(
            "argument to `len` not supported, got {}",
            other.kind().name()
        ))),
    }
}

fn first(args: &[Value], _out: &mut String) -> Result<Value, RuntimeError> {
    let array = array_arg("first", args)?;
    Ok(array.get(0).cloned().unwrap_or(Value::NULL))
}

fn last(args: &[Value], _out: &mut String) -> Result<Value, RuntimeError> {
    let array = array_arg("last", args)?;
    Ok(array.as_slice().last().cloned().unwrap_or(Value::NULL))
}

/// Everything but the first element, as a new array
fn tail(args: &[Value], _out: &mut String) -> Result<Value, RuntimeError> {
    let array = array_arg("tail", args)?;
    match array.as_slice().split_first() {
        Some((_, rest)) => Ok(Value::array(rest.to_vec())),
        None => Ok(Value::NULL),
    }
}

/// A new array with the value appended; the argument is left untouched
fn push(args: &[Value], _out: &mut String) -> Result<Value, RuntimeError> {
    expect_arity(args, 2)?;
    match &args[0] {
        Value::Array(array) => {
            let mut pushed = array.clone();
            pushed.push(args[1].clone());
            Ok(Value::Array(pushed))
        }
        other => Err(RuntimeError::InvalidBuiltinArgument(format!(
            "first argument to `push` must be ARRAY, got {}",
            other.kind().name()
        ))),
    }
}

/// Write each argument on its own line; strings are written unquoted
fn puts(args: &[Value], out: &mut String) -> Result<Value, RuntimeError> {
    for arg in args {
        match arg {
            Value::String(s) => out.push_str(s),
            other => out.push_str(&other.to_string()),
        }
        out.push('\n');
    }
    Ok(Value::NULL)
}
