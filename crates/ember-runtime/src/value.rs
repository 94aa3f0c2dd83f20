//! Runtime value representation
//!
//! - Integers, booleans, null: immediate values
//! - Strings: reference-counted, immutable
//! - Arrays and hashes: copy-on-write over shared storage, cheap to clone
//! - Functions: closures sharing their defining environment
//! - Builtins: native function pointers from the registry
//! - Errors: first-class values produced when evaluation fails
//!
//! `true`, `false` and `null` have no identity beyond their variant, so
//! `Value::TRUE`, `Value::FALSE` and `Value::NULL` act as the one instance of
//! each for a whole session.

use crate::ast::FunctionLiteral;
use crate::environment::Env;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use thiserror::Error;

/// Copy-on-write array. Cheap to clone (refcount bump).
/// Mutations on a shared array clone the inner Vec first (Rc::make_mut).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ValueArray(Rc<Vec<Value>>);

impl ValueArray {
    pub fn from_vec(v: Vec<Value>) -> Self {
        ValueArray(Rc::new(v))
    }

    pub fn as_slice(&self) -> &[Value] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.0.get(index)
    }

    /// Mutating access, copies first if the storage is shared
    pub fn push(&mut self, value: Value) {
        Rc::make_mut(&mut self.0).push(value);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.0.iter()
    }

    /// Whether both handles point at the same storage
    pub fn ptr_eq(&self, other: &ValueArray) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/// Kind tag of a runtime value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Integer,
    Boolean,
    String,
    Array,
    Hash,
    Null,
    Function,
    Builtin,
    Error,
}

impl ValueKind {
    /// Upper-case name used in runtime error messages
    pub fn name(&self) -> &'static str {
        match self {
            ValueKind::Integer => "INTEGER",
            ValueKind::Boolean => "BOOLEAN",
            ValueKind::String => "STRING",
            ValueKind::Array => "ARRAY",
            ValueKind::Hash => "HASH",
            ValueKind::Null => "NULL",
            ValueKind::Function => "FUNCTION",
            ValueKind::Builtin => "BUILTIN",
            ValueKind::Error => "ERROR",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Key of a hash entry: the kind of the key value plus a 64-bit digest
///
/// Equal integers, booleans or strings always produce equal keys, and the
/// kind tag keeps `1` and `true` apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HashKey {
    pub kind: ValueKind,
    pub digest: u64,
}

/// A hash entry keeps the original key value for inspection
#[derive(Debug, Clone, PartialEq)]
pub struct HashPair {
    pub key: Value,
    pub value: Value,
}

/// Copy-on-write hash map. Cheap to clone (refcount bump).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ValueHash(Rc<HashMap<HashKey, HashPair>>);

impl ValueHash {
    pub fn new() -> Self {
        ValueHash(Rc::new(HashMap::new()))
    }

    pub fn get(&self, key: &HashKey) -> Option<&HashPair> {
        self.0.get(key)
    }

    /// Insert or replace an entry, copying first if the storage is shared
    pub fn insert(&mut self, key: HashKey, pair: HashPair) {
        Rc::make_mut(&mut self.0).insert(key, pair);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries in unspecified order
    pub fn pairs(&self) -> impl Iterator<Item = &HashPair> {
        self.0.values()
    }

    pub fn ptr_eq(&self, other: &ValueHash) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/// A closure: function literal plus the environment it was evaluated in
pub struct Function {
    pub literal: Rc<FunctionLiteral>,
    pub env: Env,
}

impl Function {
    pub fn arity(&self) -> usize {
        self.literal.params.len()
    }
}

// The captured environment may contain this very closure, so Debug stays shallow
impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params: Vec<&str> = self.literal.params.iter().map(|p| p.name.as_str()).collect();
        f.debug_struct("Function")
            .field("params", &params)
            .finish_non_exhaustive()
    }
}

/// Native implementation of a builtin
///
/// Receives the evaluated arguments and the interpreter's output buffer.
pub type BuiltinFn = fn(&[Value], &mut String) -> Result<Value, RuntimeError>;

/// Registry entry for a builtin function
#[derive(Clone, Copy)]
pub struct Builtin {
    pub name: &'static str,
    pub func: BuiltinFn,
}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Builtin({})", self.name)
    }
}

/// Runtime value
#[derive(Debug, Clone)]
pub enum Value {
    Integer(i64),
    Boolean(bool),
    String(Rc<str>),
    Array(ValueArray),
    Hash(ValueHash),
    Function(Rc<Function>),
    Builtin(Builtin),
    Null,
    /// Result of a failed evaluation
    Error(RuntimeError),
}

impl Value {
    pub const TRUE: Value = Value::Boolean(true);
    pub const FALSE: Value = Value::Boolean(false);
    pub const NULL: Value = Value::Null;

    /// The session-wide boolean for `b`
    pub fn from_bool(b: bool) -> Value {
        if b {
            Value::TRUE
        } else {
            Value::FALSE
        }
    }

    pub fn string(s: impl AsRef<str>) -> Value {
        Value::String(Rc::from(s.as_ref()))
    }

    pub fn array(values: Vec<Value>) -> Value {
        Value::Array(ValueArray::from_vec(values))
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Integer(_) => ValueKind::Integer,
            Value::Boolean(_) => ValueKind::Boolean,
            Value::String(_) => ValueKind::String,
            Value::Array(_) => ValueKind::Array,
            Value::Hash(_) => ValueKind::Hash,
            Value::Function(_) => ValueKind::Function,
            Value::Builtin(_) => ValueKind::Builtin,
            Value::Null => ValueKind::Null,
            Value::Error(_) => ValueKind::Error,
        }
    }

    /// `null` and `false` are falsy, everything else is truthy
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Null | Value::Boolean(false))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }

    /// Derive the key used to store this value in a hash
    pub fn hash_key(&self) -> Result<HashKey, RuntimeError> {
        let digest = match self {
            Value::Integer(n) => *n as u64,
            Value::Boolean(b) => u64::from(*b),
            Value::String(s) => fnv1a(s.as_bytes()),
            other => return Err(RuntimeError::UnusableHashKey(other.kind())),
        };

        Ok(HashKey {
            kind: self.kind(),
            digest,
        })
    }
}

/// 64-bit FNV-1a, stable across builds and platforms
fn fnv1a(bytes: &[u8]) -> u64 {
    const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;

    bytes.iter().fold(OFFSET_BASIS, |hash, &byte| {
        (hash ^ u64::from(byte)).wrapping_mul(PRIME)
    })
}

/// Structural equality for data, pointer identity for closures
///
/// This is host-side equality (tests, assertions). The language's own `==`
/// lives in the interpreter.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Hash(a), Value::Hash(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::Builtin(a), Value::Builtin(b)) => a.name == b.name,
            (Value::Null, Value::Null) => true,
            (Value::Error(a), Value::Error(b)) => a == b,
            _ => false,
        }
    }
}

/// Printable form of a value
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "{}", n),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::String(s) => write!(f, "\"{}\"", s),
            Value::Array(arr) => {
                let elements: Vec<String> = arr.iter().map(|v| v.to_string()).collect();
                write!(f, "[{}]", elements.join(", "))
            }
            Value::Hash(hash) => {
                let pairs: Vec<String> = hash
                    .pairs()
                    .map(|pair| format!("{}: {}", pair.key, pair.value))
                    .collect();
                write!(f, "{{{}}}", pairs.join(", "))
            }
            Value::Function(func) => write!(f, "{}", func.literal),
            Value::Builtin(_) => write!(f, "builtin function"),
            Value::Null => write!(f, "null"),
            Value::Error(err) => write!(f, "ERROR: {}", err),
        }
    }
}

/// Evaluation failure
///
/// `Display` is the exact message surfaced to users.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RuntimeError {
    #[error("identifier not found: {0}")]
    IdentifierNotFound(String),

    #[error("unknown operator: {op}{operand}")]
    UnknownPrefixOperator {
        op: &'static str,
        operand: ValueKind,
    },

    #[error("unknown operator: {left} {op} {right}")]
    UnknownInfixOperator {
        left: ValueKind,
        op: &'static str,
        right: ValueKind,
    },

    #[error("type mismatch: {left} {op} {right}")]
    TypeMismatch {
        left: ValueKind,
        op: &'static str,
        right: ValueKind,
    },

    #[error("division by zero")]
    DivisionByZero,

    #[error("not a function: {0}")]
    NotAFunction(ValueKind),

    /// Closure called with the wrong number of arguments
    #[error("wrong number of arguments: want={want}, got={got}")]
    ArityMismatch { want: usize, got: usize },

    /// Builtin called with the wrong number of arguments
    #[error("wrong number of arguments. got={got}, want={want}")]
    BuiltinArity { got: usize, want: usize },

    #[error("{0}")]
    InvalidBuiltinArgument(String),

    #[error("unusable as hash key: {0}")]
    UnusableHashKey(ValueKind),

    #[error("index operator not supported: {0}")]
    IndexNotSupported(ValueKind),
}
