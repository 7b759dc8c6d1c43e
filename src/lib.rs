#![forbid(unsafe_code)]
//! Sable Language Frontend
//!
//! Sable is an ML-flavored language; this crate wraps the `sable_syntax`
//! frontend (lexer, parser, AST, diagnostics) with a command-line driver and
//! a small backend addressing-mode module.
//!
//! ## Panic Policy
//!
//! This codebase follows explicit error handling:
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`.
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.

pub mod backend;
pub mod cli;

pub use sable_syntax::ast;
pub use sable_syntax::diagnostics;
pub use sable_syntax::lexer;
pub use sable_syntax::parser;
pub use sable_syntax::ParseConfig;
