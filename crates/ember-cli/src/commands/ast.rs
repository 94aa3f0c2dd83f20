//! AST command - show how an input parses

use super::report_diagnostics;
use anyhow::Result;
use ember_runtime::{Ember, VersionedProgram};

/// Print the parsed program
///
/// Human output is the fully parenthesized program text; `json` prints the
/// versioned AST instead.
pub fn run(source: &str, json: bool) -> Result<()> {
    let program = match Ember::parse(source) {
        Ok(program) => program,
        Err(diagnostics) => {
            report_diagnostics(&diagnostics, json);
            return Err(anyhow::anyhow!("Parse errors"));
        }
    };

    if json {
        let versioned = VersionedProgram::new(program);
        println!("{}", versioned.to_json()?);
    } else {
        println!("{}", program);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ast_dump_simple() {
        assert!(run("let x = 42;", false).is_ok());
        assert!(run("let x = 42;", true).is_ok());
    }

    #[test]
    fn test_ast_dump_invalid_syntax() {
        assert!(run("let x =", false).is_err());
    }
}
