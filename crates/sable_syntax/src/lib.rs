//! Shared syntax frontend for the Sable language: lexer, parser, AST, diagnostics.
//!
//! This crate is dependency-light and intended for reuse across the compiler,
//! interactive toplevel, and future tooling.
//!
//! ## Notes
//! - This crate is intentionally "syntax-only": it does not do name
//!   resolution, type checking, or IR lowering. Surface sugar (operators,
//!   list literals, indexing forms, local opens) is already rewritten in the
//!   AST it produces.
//! - Malformed input raises exactly one [`SyntaxError`]; there is no
//!   skip-and-continue recovery inside a parse.
//!
//! ## Examples
//! ```rust,no_run
//! use sable_syntax::{lexer, parser, ParseConfig};
//!
//! let (tokens, docs) = lexer::lex("let x = [1; 2; 3]\n").unwrap();
//! let items = parser::parse_implementation(&tokens, docs, ParseConfig::default()).unwrap();
//! assert_eq!(items.len(), 1);
//! ```

pub mod ast;
pub mod bindings;
pub mod builder;
pub mod config;
pub mod diagnostics;
pub mod docs;
pub mod lexer;
pub mod package;
pub mod parser;
pub mod sugar;

pub use config::ParseConfig;
pub use diagnostics::SyntaxError;
