//! Eval and run commands - evaluate one input and print its value

use super::report_diagnostics;
use anyhow::{Context, Result};
use ember_runtime::{Ember, Value};
use std::fs;

/// Evaluate source text, printing captured output and the resulting value
///
/// Fails (exit status 1) on syntax errors or an error value.
pub fn run(source: &str, json: bool) -> Result<()> {
    let runtime = Ember::new();

    match runtime.eval(source) {
        Ok(value) => {
            let stdout = runtime.take_output();
            if json {
                println!("{}", result_json(&value, &stdout));
            } else {
                print!("{}", stdout);
                if value.is_error() {
                    eprintln!("{}", value);
                } else if !matches!(value, Value::Null) {
                    println!("{}", value);
                }
            }

            match value {
                Value::Error(err) => Err(anyhow::anyhow!("Evaluation failed: {}", err)),
                _ => Ok(()),
            }
        }
        Err(diagnostics) => {
            report_diagnostics(&diagnostics, json);
            Err(anyhow::anyhow!(
                "Input rejected with {} syntax error(s)",
                diagnostics.len()
            ))
        }
    }
}

/// Evaluate an Ember source file
pub fn run_file(file_path: &str, json: bool) -> Result<()> {
    let source = fs::read_to_string(file_path)
        .with_context(|| format!("Failed to read source file: {}", file_path))?;
    run(&source, json)
}

/// JSON summary of an evaluation
fn result_json(value: &Value, stdout: &str) -> serde_json::Value {
    match value {
        Value::Error(err) => serde_json::json!({
            "error": err.to_string(),
            "stdout": stdout,
        }),
        other => serde_json::json!({
            "value": other.to_string(),
            "kind": other.kind().name(),
            "stdout": stdout,
        }),
    }
}
