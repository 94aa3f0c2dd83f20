//! Lexical environments
//!
//! An environment maps names to values and optionally points at the scope
//! that lexically encloses it. Outer scopes are shared: every call of the
//! same closure gets a fresh child of the closure's captured environment.
//!
//! A closure bound in the scope it captures forms a reference cycle through
//! `Rc`; such scopes live until the process ends.

use crate::value::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

#[derive(Default)]
struct Scope {
    store: HashMap<String, Value>,
    outer: Option<Env>,
}

/// Shared handle to a scope
#[derive(Clone, Default)]
pub struct Env(Rc<RefCell<Scope>>);

impl Env {
    /// A new top-level environment
    pub fn new() -> Self {
        Self::default()
    }

    /// A new child scope whose lookups fall back to `outer`
    pub fn enclosed(outer: &Env) -> Self {
        Env(Rc::new(RefCell::new(Scope {
            store: HashMap::new(),
            outer: Some(outer.clone()),
        })))
    }

    /// Look a name up, walking outward through enclosing scopes
    pub fn get(&self, name: &str) -> Option<Value> {
        let scope = self.0.borrow();
        match scope.store.get(name) {
            Some(value) => Some(value.clone()),
            None => scope.outer.as_ref().and_then(|outer| outer.get(name)),
        }
    }

    /// Bind a name in this scope, shadowing any outer binding
    pub fn set(&self, name: impl Into<String>, value: Value) {
        self.0.borrow_mut().store.insert(name.into(), value);
    }

    /// Names bound directly in this scope, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.0.borrow().store.keys().cloned().collect();
        names.sort();
        names
    }
}

impl fmt::Debug for Env {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scope = self.0.borrow();
        f.debug_struct("Env")
            .field("names", &self.names())
            .field("has_outer", &scope.outer.is_some())
            .finish()
    }
}
