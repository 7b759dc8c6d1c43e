//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::fs;
use std::io::Read;
use std::path::Path;

use miette::NamedSource;

use sable_syntax::parser::Parser;
use sable_syntax::{lexer, parser, ParseConfig, SyntaxError};

use super::{CliError, CliResult, ExitCode};

// ============================================================================
// Shared helpers
// ============================================================================

/// Read a source file, mapping IO failures to a CLI error.
fn read_source(path: &Path) -> CliResult<String> {
    fs::read_to_string(path)
        .map_err(|e| CliError::failure(format!("Error reading {}: {}", path.display(), e)))
}

/// Render a syntax error as an annotated miette report over the source text.
fn render_syntax_error(err: SyntaxError, name: &str, source: &str) -> String {
    let report = miette::Report::new(err)
        .with_source_code(NamedSource::new(name, source.to_string()));
    format!("{:?}", report)
}

// ============================================================================
// lex
// ============================================================================

/// Tokenize a file and dump the token stream with byte spans.
pub fn lex_file(path: &Path) -> CliResult<ExitCode> {
    let source = read_source(path)?;
    let display = path.display().to_string();

    let (tokens, comments) = lexer::lex(&source)
        .map_err(|e| CliError::failure(render_syntax_error(e, &display, &source)))?;

    for token in &tokens {
        println!("{}..{}  {:?}", token.span.start, token.span.end, token.kind);
    }
    if !comments.is_empty() {
        println!();
        for comment in &comments {
            println!("{}..{}  doc {:?}", comment.span.start, comment.span.end, comment.text);
        }
    }

    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// parse
// ============================================================================

/// Parse a file and dump the AST.
///
/// Parses as an interface when `interface` is set, otherwise as an
/// implementation. A syntax error aborts the whole parse; the report carries
/// the annotated source location(s).
pub fn parse_file(path: &Path, interface: bool, config: ParseConfig) -> CliResult<ExitCode> {
    let source = read_source(path)?;
    let display = path.display().to_string();

    let (tokens, comments) = lexer::lex(&source)
        .map_err(|e| CliError::failure(render_syntax_error(e, &display, &source)))?;

    if interface {
        let items = parser::parse_interface(&tokens, comments, config)
            .map_err(|e| CliError::failure(render_syntax_error(e, &display, &source)))?;
        println!("{:#?}", items);
    } else {
        let items = parser::parse_implementation(&tokens, comments, config)
            .map_err(|e| CliError::failure(render_syntax_error(e, &display, &source)))?;
        println!("{:#?}", items);
    }

    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// repl
// ============================================================================

/// Read stdin and evaluate it phrase by phrase.
///
/// Each `;;`-terminated phrase parses independently. A malformed phrase
/// prints its diagnostic, the driver skips to the next `;;`, and parsing
/// continues. The exit code reports whether any phrase failed.
pub fn repl(config: ParseConfig) -> CliResult<ExitCode> {
    let mut source = String::new();
    std::io::stdin()
        .read_to_string(&mut source)
        .map_err(|e| CliError::failure(format!("Error reading stdin: {}", e)))?;

    let (tokens, comments) = lexer::lex(&source)
        .map_err(|e| CliError::failure(render_syntax_error(e, "<stdin>", &source)))?;

    let mut parser = Parser::new(&tokens, comments, config);
    let mut had_error = false;
    loop {
        match parser.toplevel_phrase() {
            Ok(Some(items)) => println!("{:#?}", items),
            Ok(None) => break,
            Err(e) => {
                had_error = true;
                eprintln!("{}", render_syntax_error(e, "<stdin>", &source));
                parser.skip_to_phrase_end();
            }
        }
    }

    if had_error {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
