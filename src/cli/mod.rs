//! CLI module for the Sable frontend.
//!
//! ## Commands
//!
//! - `lex <file>` - Tokenize a source file and dump the token stream
//! - `parse <file>` - Parse an implementation or interface and dump the AST
//! - `repl` - Read toplevel phrases from stdin, one `;;`-terminated at a time
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use sable_syntax::ParseConfig;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    /// Create a new CLI error with a message and exit code.
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Clap CLI definition
// ============================================================================

/// The Sable language frontend
#[derive(Parser, Debug)]
#[command(name = "sable")]
#[command(version = VERSION)]
#[command(about = "The Sable language frontend", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Desugar builtin indexing to unchecked accessors
    #[arg(long = "unsafe-indexing", global = true)]
    pub unsafe_indexing: bool,

    /// Allow applicative functor paths F(X).t
    #[arg(long = "applicative", global = true)]
    pub applicative: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Tokenize a source file and dump the token stream
    Lex {
        /// Source file to tokenize
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Parse a source file and dump the AST
    Parse {
        /// Source file to parse
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Parse as an interface (signature) instead of an implementation
        #[arg(long)]
        interface: bool,
    },

    /// Read toplevel phrases from stdin, one `;;`-terminated at a time
    Repl,
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    let config = ParseConfig::default()
        .with_unsafe_indexing(cli.unsafe_indexing)
        .with_applicative_functors(cli.applicative);

    match cli.command {
        Command::Lex { file } => commands::lex_file(&file),
        Command::Parse { file, interface } => commands::parse_file(&file, interface, config),
        Command::Repl => commands::repl(config),
    }
}
