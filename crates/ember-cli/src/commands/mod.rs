pub mod ast;
pub mod eval;
pub mod repl;
pub mod tokens;

use colored::*;
use ember_runtime::Diagnostic;

/// Render a diagnostic with source context for a terminal
pub fn format_diagnostic(diag: &Diagnostic) -> String {
    let text = diag.to_human_string();
    let (header, rest) = text.split_once('\n').unwrap_or((text.as_str(), ""));
    format!("{}\n{}", header.red().bold(), rest.trim_end())
}

/// Print diagnostics to stderr, as JSON lines or rendered for humans
pub fn report_diagnostics(diagnostics: &[Diagnostic], json: bool) {
    for diag in diagnostics {
        if json {
            match diag.to_json_compact() {
                Ok(line) => eprintln!("{}", line),
                Err(_) => eprintln!("{}", diag.message),
            }
        } else {
            eprintln!("{}", format_diagnostic(diag));
        }
    }
}
