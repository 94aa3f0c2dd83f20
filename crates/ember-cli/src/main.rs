use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;

mod commands;
mod config;

/// Ember programming language interpreter.
///
/// Ember is a small expression language with integers, strings, arrays,
/// hashes and first-class closures. Running `ember` with no subcommand
/// starts the interactive REPL.
///
/// EXAMPLES:
///     ember                            Start the REPL
///     ember eval "let x = 2; x * 21"   Evaluate one input
///     ember run script.em              Evaluate a file
///     ember ast "1 + 2 * 3"            Show how an input parses
///
/// ENVIRONMENT VARIABLES:
///     EMBER_JSON          Set to 'true' for JSON output by default
///     EMBER_PROMPT        REPL prompt
///     EMBER_NO_HISTORY    Set to '1' to disable REPL history
///     EMBER_HISTORY_FILE  REPL history location
///     NO_COLOR            Set to disable colored output
///     RUST_LOG            Log filter (e.g. 'ember_runtime=debug')
#[derive(Parser)]
#[command(name = "ember")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Log pipeline stages to stderr (same as RUST_LOG=debug)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive REPL
    ///
    /// Each line is scanned, parsed and evaluated against one persistent
    /// top-level scope. Lines with syntax errors are not evaluated.
    ///
    /// REPL COMMANDS:
    ///     :help, :h      Show help
    ///     :quit, :q      Exit REPL
    ///     :reset         Clear all bindings
    ///     :env           List top-level bindings
    ///
    /// EXAMPLES:
    ///     ember repl                    Start line editor REPL
    ///     ember repl --no-history       Disable history persistence
    Repl {
        /// Disable history persistence (for privacy)
        #[arg(long)]
        no_history: bool,
    },

    /// Evaluate a single input and print its value
    ///
    /// Exits with status 1 on syntax errors or when the result is an error.
    ///
    /// EXAMPLES:
    ///     ember eval "len(\"four\")"
    ///     ember eval "5 + true" --json
    #[command(visible_alias = "e")]
    Eval {
        /// Ember source text
        #[arg(allow_hyphen_values = true)]
        source: String,
        /// Output result and diagnostics as JSON
        #[arg(long, env = "EMBER_JSON")]
        json: bool,
    },

    /// Evaluate an Ember source file
    ///
    /// EXAMPLES:
    ///     ember run script.em
    ///     ember run script.em --json
    #[command(visible_alias = "r")]
    Run {
        /// Path to the Ember source file
        file: String,
        /// Output result and diagnostics as JSON
        #[arg(long, env = "EMBER_JSON")]
        json: bool,
    },

    /// Print the parsed form of an input
    ///
    /// Prints the fully parenthesized program text, or the versioned JSON
    /// AST with --json.
    ///
    /// EXAMPLES:
    ///     ember ast "-a * b"              Prints ((-a) * b);
    ///     ember ast "let x = 1;" --json
    Ast {
        /// Ember source text
        #[arg(allow_hyphen_values = true)]
        source: String,
        /// Output the AST as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the token stream of an input, one token per line
    Tokens {
        /// Ember source text
        #[arg(allow_hyphen_values = true)]
        source: String,
    },

    /// Generate shell completion scripts
    ///
    /// EXAMPLES:
    ///     ember completions bash > ~/.bash_completions/ember.bash
    ///     ember completions zsh > ~/.zfunc/_ember
    ///     ember completions fish > ~/.config/fish/completions/ember.fish
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command.unwrap_or(Commands::Repl { no_history: false }) {
        Commands::Repl { no_history } => {
            let repl_config = config::load(config::Flags { no_history })?;
            commands::repl::run(&repl_config)?;
        }
        Commands::Eval { source, json } => {
            let repl_config = config::load(config::Flags::default())?;
            let use_json = json || repl_config.format == ember_config::OutputFormat::Json;
            commands::eval::run(&source, use_json)?;
        }
        Commands::Run { file, json } => {
            let repl_config = config::load(config::Flags::default())?;
            let use_json = json || repl_config.format == ember_config::OutputFormat::Json;
            commands::eval::run_file(&file, use_json)?;
        }
        Commands::Ast { source, json } => {
            commands::ast::run(&source, json)?;
        }
        Commands::Tokens { source } => {
            commands::tokens::run(&source)?;
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(shell, &mut cmd, name, &mut io::stdout());
        }
    }

    Ok(())
}

/// Install the logger; `--verbose` raises the default filter to debug
fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    let env = env_logger::Env::default().default_filter_or(default_filter);
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .try_init();
}
