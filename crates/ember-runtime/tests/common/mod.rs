//! Shared test utilities
//!
//! Helpers for evaluating snippets and asserting on the resulting value so the
//! individual test files stay short.

#![allow(dead_code)]

use ember_runtime::ast::Program;
use ember_runtime::diagnostic::Diagnostic;
use ember_runtime::lexer::Lexer;
use ember_runtime::parser::Parser;
use ember_runtime::{Ember, Value};

// Re-export testing utilities
pub use pretty_assertions::{assert_eq, assert_ne};

/// Evaluate source in a fresh runtime, panicking on syntax errors
pub fn eval(source: &str) -> Value {
    let runtime = Ember::new();
    match runtime.eval(source) {
        Ok(value) => value,
        Err(diags) => panic!("Unexpected diagnostics for {:?}: {:?}", source, diags),
    }
}

/// Assert that source code evaluates to an integer
///
/// # Example
/// ```
/// assert_eval_integer("1 + 2", 3);
/// ```
pub fn assert_eval_integer(source: &str, expected: i64) {
    match eval(source) {
        Value::Integer(n) => assert_eq!(n, expected, "Source: {}", source),
        other => panic!("Expected Integer({}), got {:?}", expected, other),
    }
}

/// Assert that source code evaluates to a boolean
pub fn assert_eval_bool(source: &str, expected: bool) {
    match eval(source) {
        Value::Boolean(b) => assert_eq!(b, expected, "Source: {}", source),
        other => panic!("Expected Boolean({}), got {:?}", expected, other),
    }
}

/// Assert that source code evaluates to a string
pub fn assert_eval_string(source: &str, expected: &str) {
    match eval(source) {
        Value::String(s) => assert_eq!(s.as_ref(), expected, "Source: {}", source),
        other => panic!("Expected String({:?}), got {:?}", expected, other),
    }
}

/// Assert that source code evaluates to null
pub fn assert_eval_null(source: &str) {
    match eval(source) {
        Value::Null => {}
        other => panic!("Expected Null, got {:?}", other),
    }
}

/// Assert that source code evaluates to an error value with this message
///
/// # Example
/// ```
/// assert_eval_error("5 + true;", "type mismatch: INTEGER + BOOLEAN");
/// ```
pub fn assert_eval_error(source: &str, expected_message: &str) {
    match eval(source) {
        Value::Error(err) => assert_eq!(err.to_string(), expected_message, "Source: {}", source),
        other => panic!("Expected error {:?}, got {:?}", expected_message, other),
    }
}

/// Lex and parse source, returning the program and every diagnostic
pub fn parse_source(source: &str) -> (Program, Vec<Diagnostic>) {
    let mut lexer = Lexer::new(source);
    let (tokens, mut diagnostics) = lexer.tokenize();
    let mut parser = Parser::new(tokens);
    let (program, parse_diags) = parser.parse();
    diagnostics.extend(parse_diags);
    (program, diagnostics)
}

/// Parse source that must be valid and return its printed form
pub fn print_program(source: &str) -> String {
    let (program, diagnostics) = parse_source(source);
    assert!(
        diagnostics.is_empty(),
        "Expected no errors for {:?}: {:?}",
        source,
        diagnostics
    );
    program.to_string()
}

/// Messages of every diagnostic reported for source
pub fn diagnostic_messages(source: &str) -> Vec<String> {
    let (_, diagnostics) = parse_source(source);
    diagnostics.into_iter().map(|d| d.message).collect()
}

/// Program as JSON with every source span erased
///
/// Two programs with the same shape compare equal even when their tokens sat
/// at different offsets.
pub fn program_shape(program: &Program) -> serde_json::Value {
    let mut json = serde_json::to_value(program).expect("AST serializes to JSON");
    erase_spans(&mut json);
    json
}

fn erase_spans(json: &mut serde_json::Value) {
    match json {
        serde_json::Value::Object(map) => {
            let is_span = map.len() == 2 && map.contains_key("start") && map.contains_key("end");
            if is_span {
                *json = serde_json::Value::Null;
                return;
            }
            for value in map.values_mut() {
                erase_spans(value);
            }
        }
        serde_json::Value::Array(items) => items.iter_mut().for_each(erase_spans),
        _ => {}
    }
}
