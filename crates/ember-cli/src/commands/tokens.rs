//! Tokens command - dump the scanner output

use super::report_diagnostics;
use anyhow::Result;
use ember_runtime::{Lexer, Token};

/// Print one token per line as `KIND 'lexeme'`, ending with EOF
pub fn run(source: &str) -> Result<()> {
    let mut lexer = Lexer::new(source);
    let (tokens, diagnostics) = lexer.tokenize();

    for token in &tokens {
        println!("{}", format_token(token));
    }

    if !diagnostics.is_empty() {
        let diagnostics: Vec<_> = diagnostics
            .into_iter()
            .map(|diag| diag.with_source(source))
            .collect();
        report_diagnostics(&diagnostics, false);
        return Err(anyhow::anyhow!("Lexer errors"));
    }

    Ok(())
}

fn format_token(token: &Token) -> String {
    format!("{} '{}'", token.kind, token.lexeme)
}
