//! End-to-end tests for CLI commands
//!
//! These tests run the `ember` binary for:
//! - `ember eval` / `ember run` - evaluate input and print the value
//! - `ember ast` / `ember tokens` - front-end dumps
//! - `ember repl` - line loop fed through stdin
//!
//! Every command runs with HOME pointed at an empty temp directory so a
//! developer's own ~/.ember/config.toml never leaks into the results.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

// ============================================================================
// Test Helpers
// ============================================================================

/// The `ember` binary with an isolated home directory
fn ember(home: &TempDir) -> Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("ember");
    cmd.env("HOME", home.path())
        .env("NO_COLOR", "1")
        .env_remove("EMBER_JSON")
        .env_remove("EMBER_PROMPT")
        .env_remove("RUST_LOG");
    cmd
}

/// Create a temporary directory with a test file
fn create_test_file(filename: &str, content: &str) -> (TempDir, String) {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join(filename);
    fs::write(&file_path, content).unwrap();
    (temp_dir, file_path.to_str().unwrap().to_string())
}

// ============================================================================
// ember eval
// ============================================================================

#[test]
fn test_eval_arithmetic() {
    let home = TempDir::new().unwrap();
    ember(&home)
        .args(["eval", "1 + 2 * 3"])
        .assert()
        .success()
        .stdout("7\n");
}

#[test]
fn test_eval_closure() {
    let home = TempDir::new().unwrap();
    ember(&home)
        .args([
            "eval",
            "let newAdder = fn(x) { fn(y) { x + y } }; let addTwo = newAdder(2); addTwo(3);",
        ])
        .assert()
        .success()
        .stdout("5\n");
}

#[test]
fn test_eval_prints_puts_output_before_value() {
    let home = TempDir::new().unwrap();
    ember(&home)
        .args(["eval", r#"puts("hello"); len("four")"#])
        .assert()
        .success()
        .stdout("hello\n4\n");
}

#[test]
fn test_eval_let_prints_nothing() {
    let home = TempDir::new().unwrap();
    ember(&home)
        .args(["eval", "let x = 1;"])
        .assert()
        .success()
        .stdout("");
}

#[test]
fn test_eval_leading_minus() {
    let home = TempDir::new().unwrap();
    ember(&home)
        .args(["eval", "-5 + 10"])
        .assert()
        .success()
        .stdout("5\n");
}

#[test]
fn test_eval_error_value_exits_nonzero() {
    let home = TempDir::new().unwrap();
    ember(&home)
        .args(["eval", "5 + true;"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains(
            "ERROR: type mismatch: INTEGER + BOOLEAN",
        ));
}

#[test]
fn test_eval_syntax_error_reports_diagnostics() {
    let home = TempDir::new().unwrap();
    ember(&home)
        .args(["eval", "let = 5; let y 10;"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("error[EM2001]"))
        .stderr(predicate::str::contains(
            "Expected next token to be IDENTIFIER, got ASSIGN",
        ))
        .stderr(predicate::str::contains(
            "Expected next token to be ASSIGN, got INT",
        ));
}

#[test]
fn test_eval_json_value() {
    let home = TempDir::new().unwrap();
    let output = ember(&home)
        .args(["eval", "[1, 2]", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["value"], "[1, 2]");
    assert_eq!(json["kind"], "ARRAY");
}

#[test]
fn test_eval_json_from_env() {
    let home = TempDir::new().unwrap();
    ember(&home)
        .env("EMBER_JSON", "true")
        .args(["eval", "foobar"])
        .assert()
        .failure()
        .stdout(predicate::str::contains(
            r#""error":"identifier not found: foobar""#,
        ));
}

#[test]
fn test_eval_json_diagnostics() {
    let home = TempDir::new().unwrap();
    ember(&home)
        .args(["eval", "let x 5;", "--json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(r#""code":"EM2001""#));
}

#[test]
fn test_json_format_from_config_file() {
    let home = TempDir::new().unwrap();
    fs::create_dir(home.path().join(".ember")).unwrap();
    fs::write(
        home.path().join(".ember").join("config.toml"),
        "[output]\nformat = \"json\"\n",
    )
    .unwrap();

    ember(&home)
        .args(["eval", "true"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""kind":"BOOLEAN""#));
}

#[test]
fn test_malformed_config_is_an_error() {
    let home = TempDir::new().unwrap();
    fs::create_dir(home.path().join(".ember")).unwrap();
    fs::write(
        home.path().join(".ember").join("config.toml"),
        "[output]\nfromat = \"json\"\n",
    )
    .unwrap();

    ember(&home)
        .args(["eval", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config.toml"));
}

#[test]
fn test_verbose_enables_debug_logging() {
    let home = TempDir::new().unwrap();
    ember(&home)
        .args(["-v", "eval", "1"])
        .assert()
        .success()
        .stdout("1\n")
        .stderr(predicate::str::contains("evaluating 1 statements"));
}

#[test]
fn test_quiet_by_default() {
    let home = TempDir::new().unwrap();
    ember(&home)
        .args(["eval", "1"])
        .assert()
        .success()
        .stderr("");
}

// ============================================================================
// ember run
// ============================================================================

#[test]
fn test_run_file() {
    let (_dir, path) = create_test_file(
        "fib.em",
        "let fib = fn(n) { if (n < 2) { n } else { fib(n - 1) + fib(n - 2) } };\nfib(10);\n",
    );
    let home = TempDir::new().unwrap();

    ember(&home)
        .args(["run", &path])
        .assert()
        .success()
        .stdout("55\n");
}

#[test]
fn test_run_missing_file() {
    let home = TempDir::new().unwrap();
    ember(&home)
        .args(["run", "does-not-exist.em"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read source file"));
}

#[test]
fn test_run_reports_line_of_syntax_error() {
    let (_dir, path) = create_test_file("bad.em", "let a = 1;\nlet b 2;\n");
    let home = TempDir::new().unwrap();

    ember(&home)
        .args(["run", &path])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--> 2:7"))
        .stderr(predicate::str::contains("let b 2;"));
}

// ============================================================================
// ember ast / ember tokens
// ============================================================================

#[test]
fn test_ast_prints_parenthesized_form() {
    let home = TempDir::new().unwrap();
    ember(&home)
        .args(["ast", "-a * b + c"])
        .assert()
        .success()
        .stdout("(((-a) * b) + c);\n");
}

#[test]
fn test_ast_json() {
    let home = TempDir::new().unwrap();
    let output = ember(&home)
        .args(["ast", "let x = 1;", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["ast_version"], 1);
    assert!(json["statements"].is_array());
}

#[test]
fn test_tokens() {
    let home = TempDir::new().unwrap();
    ember(&home)
        .args(["tokens", "let x = 5;"])
        .assert()
        .success()
        .stdout("LET 'let'\nIDENTIFIER 'x'\nASSIGN '='\nINT '5'\nSEMICOLON ';'\nEOF ''\n");
}

// ============================================================================
// ember repl
// ============================================================================

#[test]
fn test_repl_evaluates_lines_with_shared_state() {
    let home = TempDir::new().unwrap();
    ember(&home)
        .args(["repl", "--no-history"])
        .write_stdin("let x = 20;\nx + 22\n:quit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("42"))
        .stdout(predicate::str::contains("Goodbye!"));
}

#[test]
fn test_repl_is_default_command() {
    let home = TempDir::new().unwrap();
    ember(&home)
        .env("EMBER_NO_HISTORY", "1")
        .write_stdin("len(\"four\")\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Ember v"))
        .stdout(predicate::str::contains("4"));
}

#[test]
fn test_repl_prints_parse_errors_and_continues() {
    let home = TempDir::new().unwrap();
    ember(&home)
        .args(["repl", "--no-history"])
        .write_stdin("let = 1;\n1 + 1\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "\tExpected next token to be IDENTIFIER, got ASSIGN",
        ))
        .stdout(predicate::str::contains("2"));
}

#[test]
fn test_repl_env_and_reset() {
    let home = TempDir::new().unwrap();
    ember(&home)
        .args(["repl", "--no-history"])
        .write_stdin("let answer = 42;\n:env\n:reset\nanswer\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("answer"))
        .stdout(predicate::str::contains("REPL state reset"))
        .stdout(predicate::str::contains("identifier not found: answer"));
}

#[test]
fn test_repl_saves_history() {
    let home = TempDir::new().unwrap();
    ember(&home)
        .arg("repl")
        .write_stdin("1 + 1\n:q\n")
        .assert()
        .success();

    let history = fs::read_to_string(home.path().join(".ember").join("history")).unwrap();
    assert!(history.contains("1 + 1"));
}
