//! CLI integration tests
//!
//! Tests the CLI surface including:
//! - Help messages and examples
//! - Shell completions
//! - Flag parsing and error handling

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

fn ember_cmd() -> Command {
    let mut cmd = Command::cargo_bin("ember").unwrap();
    cmd.env("NO_COLOR", "1").env_remove("EMBER_JSON");
    cmd
}

// ══════════════════════════════════════════════════════════════════════════════
// HELP MESSAGE TESTS
// ══════════════════════════════════════════════════════════════════════════════

mod help_messages {
    use super::*;

    #[test]
    fn test_main_help_shows_all_commands() {
        ember_cmd()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("repl"))
            .stdout(predicate::str::contains("eval"))
            .stdout(predicate::str::contains("run"))
            .stdout(predicate::str::contains("ast"))
            .stdout(predicate::str::contains("tokens"))
            .stdout(predicate::str::contains("completions"));
    }

    #[test]
    fn test_main_help_shows_environment_variables() {
        ember_cmd()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("ENVIRONMENT VARIABLES"))
            .stdout(predicate::str::contains("EMBER_NO_HISTORY"))
            .stdout(predicate::str::contains("NO_COLOR"));
    }

    #[test]
    fn test_repl_help_lists_meta_commands() {
        ember_cmd()
            .args(["repl", "--help"])
            .assert()
            .success()
            .stdout(predicate::str::contains(":reset"))
            .stdout(predicate::str::contains(":env"))
            .stdout(predicate::str::contains("--no-history"));
    }

    #[test]
    fn test_eval_help() {
        ember_cmd()
            .args(["eval", "--help"])
            .assert()
            .success()
            .stdout(predicate::str::contains("--json"));
    }

    #[test]
    fn test_version_flag() {
        ember_cmd()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("ember"));
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// SHELL COMPLETIONS
// ══════════════════════════════════════════════════════════════════════════════

mod completions {
    use super::*;

    #[test]
    fn test_bash_completions() {
        ember_cmd()
            .args(["completions", "bash"])
            .assert()
            .success()
            .stdout(predicate::str::contains("ember"));
    }

    #[test]
    fn test_zsh_completions() {
        ember_cmd()
            .args(["completions", "zsh"])
            .assert()
            .success()
            .stdout(predicate::str::contains("#compdef ember"));
    }

    #[test]
    fn test_unknown_shell_rejected() {
        ember_cmd()
            .args(["completions", "cmd.exe"])
            .assert()
            .failure();
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// ARGUMENT ERRORS
// ══════════════════════════════════════════════════════════════════════════════

mod argument_errors {
    use super::*;

    #[test]
    fn test_unknown_subcommand() {
        ember_cmd()
            .arg("frobnicate")
            .assert()
            .failure()
            .stderr(predicate::str::contains("unrecognized subcommand"));
    }

    #[test]
    fn test_eval_requires_source() {
        ember_cmd().arg("eval").assert().failure();
    }

    #[test]
    fn test_eval_alias() {
        ember_cmd()
            .args(["e", "6 * 7"])
            .assert()
            .success()
            .stdout("42\n");
    }
}
