//! REPL command implementation

use anyhow::Result;
use colored::*;
use ember_config::{ConfigLoader, OutputFormat, ReplConfig};
use ember_runtime::{ReplCore, ReplResult, Value};
use rustyline::error::ReadlineError;
use rustyline::{Config, DefaultEditor};
use std::io::{self, Write};

/// What the loop does after a line
#[derive(Debug, PartialEq, Eq)]
enum Action {
    Continue,
    Quit,
}

/// Run the interactive REPL
pub fn run(config: &ReplConfig) -> Result<()> {
    let editor_config = Config::builder()
        .max_history_size(config.max_history)?
        .auto_add_history(false)
        .build();
    let mut rl = DefaultEditor::with_config(editor_config)?;
    let mut repl = ReplCore::new();

    // Load history from file (unless disabled)
    let history_path = config.history_file.as_ref().filter(|_| config.history);
    if let Some(path) = history_path {
        let _ = rl.load_history(path); // Ignore errors if file doesn't exist
    }

    println!("Ember v{} REPL", ember_runtime::VERSION);
    println!("Type expressions or statements, or :quit to exit");
    println!("Commands: :quit (or :q), :reset, :env, :help");
    println!();

    let mut stdout = io::stdout();
    loop {
        match rl.readline(&config.prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = rl.add_history_entry(line.as_str());
                }
                if process_line(&mut repl, &line, config, &mut stdout)? == Action::Quit {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C
                println!("^C");
                println!("Use :quit or :q to exit");
            }
            Err(ReadlineError::Eof) => {
                // Ctrl+D
                println!("Goodbye!");
                break;
            }
            Err(err) => {
                eprintln!("Error: {:?}", err);
                break;
            }
        }
    }

    // Save history to file (unless disabled)
    if let Some(path) = history_path {
        if ConfigLoader::ensure_parent_dir(path).is_ok() {
            let _ = rl.save_history(path); // Ignore errors
        }
    }

    Ok(())
}

/// Handle one line of input: a meta command or Ember source
fn process_line(
    repl: &mut ReplCore,
    line: &str,
    config: &ReplConfig,
    out: &mut impl Write,
) -> io::Result<Action> {
    let trimmed = line.trim();

    match trimmed {
        "" => return Ok(Action::Continue),
        ":quit" | ":q" => {
            writeln!(out, "Goodbye!")?;
            return Ok(Action::Quit);
        }
        ":reset" => {
            repl.reset();
            writeln!(out, "REPL state reset")?;
            return Ok(Action::Continue);
        }
        ":help" | ":h" => {
            print_help(out)?;
            return Ok(Action::Continue);
        }
        ":env" => {
            print_bindings(repl, out)?;
            return Ok(Action::Continue);
        }
        _ => {}
    }

    if trimmed.starts_with(':') {
        writeln!(out, "Unknown command: {} (try :help)", trimmed)?;
        return Ok(Action::Continue);
    }

    let result = repl.eval_line(line);
    print_result(&result, config, out)?;
    Ok(Action::Continue)
}

/// Print diagnostics, captured output and the value of one line
fn print_result(result: &ReplResult, config: &ReplConfig, out: &mut impl Write) -> io::Result<()> {
    if !result.diagnostics.is_empty() {
        for diag in &result.diagnostics {
            match config.format {
                OutputFormat::Json => match diag.to_json_compact() {
                    Ok(json) => writeln!(out, "{}", json)?,
                    Err(_) => writeln!(out, "\t{}", diag.message)?,
                },
                OutputFormat::Human => writeln!(out, "\t{}", diag.message.red())?,
            }
        }
        return Ok(());
    }

    if !result.stdout.is_empty() {
        write!(out, "{}", result.stdout)?;
    }

    match &result.value {
        Some(Value::Error(err)) => writeln!(out, "{}", format!("ERROR: {}", err).red())?,
        Some(value) => writeln!(out, "{}", value)?,
        None => {}
    }

    Ok(())
}

fn print_bindings(repl: &ReplCore, out: &mut impl Write) -> io::Result<()> {
    let names = repl.bindings();
    if names.is_empty() {
        writeln!(out, "No bindings defined.")?;
    } else {
        for name in names {
            writeln!(out, "{}", name)?;
        }
    }
    Ok(())
}

/// Print help information
fn print_help(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "Ember REPL Commands:")?;
    writeln!(out, "  :quit, :q         Exit the REPL")?;
    writeln!(out, "  :reset            Clear all bindings")?;
    writeln!(out, "  :env              List top-level bindings")?;
    writeln!(out, "  :help, :h         Show this help message")?;
    writeln!(out)?;
    writeln!(out, "Type any Ember expression or statement to evaluate it.")?;
    writeln!(out, "Examples:")?;
    writeln!(out, "  > let add = fn(a, b) {{ a + b }};")?;
    writeln!(out, "  > add(1, 2)")?;
    writeln!(out, "  > puts(len(\"hello\"))")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain_config() -> ReplConfig {
        colored::control::set_override(false);
        ReplConfig {
            history: false,
            color: false,
            ..ReplConfig::default()
        }
    }

    fn feed(repl: &mut ReplCore, line: &str) -> (Action, String) {
        let mut out = Vec::new();
        let action = process_line(repl, line, &plain_config(), &mut out).unwrap();
        (action, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_value_is_printed() {
        let mut repl = ReplCore::new();
        assert_eq!(feed(&mut repl, "1 + 2"), (Action::Continue, "3\n".to_string()));
    }

    #[test]
    fn test_let_prints_nothing() {
        let mut repl = ReplCore::new();
        assert_eq!(feed(&mut repl, "let x = 1;").1, "");
        assert_eq!(feed(&mut repl, "x").1, "1\n");
    }

    #[test]
    fn test_diagnostics_are_tab_indented() {
        let mut repl = ReplCore::new();
        let (_, output) = feed(&mut repl, "let = 5; let y 10;");
        assert_eq!(
            output,
            "\tExpected next token to be IDENTIFIER, got ASSIGN\n\
             \tExpected next token to be ASSIGN, got INT\n"
        );
    }

    #[test]
    fn test_puts_output_precedes_value() {
        let mut repl = ReplCore::new();
        let (_, output) = feed(&mut repl, "puts(\"hi\"); 5");
        assert_eq!(output, "hi\n5\n");
    }

    #[test]
    fn test_error_value_is_printed() {
        let mut repl = ReplCore::new();
        let (_, output) = feed(&mut repl, "foobar");
        assert_eq!(output, "ERROR: identifier not found: foobar\n");
    }

    #[test]
    fn test_meta_commands() {
        let mut repl = ReplCore::new();
        feed(&mut repl, "let b = 1; let a = 2;");
        assert_eq!(feed(&mut repl, ":env").1, "a\nb\n");
        assert_eq!(feed(&mut repl, ":reset").1, "REPL state reset\n");
        assert_eq!(feed(&mut repl, ":env").1, "No bindings defined.\n");
        assert!(feed(&mut repl, ":help").1.contains(":quit"));
        assert!(feed(&mut repl, ":bogus").1.starts_with("Unknown command"));
        assert_eq!(feed(&mut repl, ":q").0, Action::Quit);
        assert_eq!(feed(&mut repl, "  :quit  ").0, Action::Quit);
    }

    #[test]
    fn test_blank_line_is_ignored() {
        let mut repl = ReplCore::new();
        assert_eq!(feed(&mut repl, "   "), (Action::Continue, String::new()));
    }

    #[test]
    fn test_json_diagnostics() {
        let mut repl = ReplCore::new();
        let config = ReplConfig {
            format: OutputFormat::Json,
            ..plain_config()
        };
        let mut out = Vec::new();
        process_line(&mut repl, "let x 5;", &config, &mut out).unwrap();
        let output = String::from_utf8(out).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(output.trim()).unwrap();
        assert_eq!(parsed["code"], "EM2001");
    }
}
