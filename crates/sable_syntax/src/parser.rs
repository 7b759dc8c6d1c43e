//! Parser for the Sable language.
//!
//! A hand-written recursive-descent parser over the lexer's token stream. The
//! grammar automaton pulls tokens synchronously and consumes one stream to
//! completion or to the first fatal diagnostic; there is no error recovery
//! inside a parse. Desugaring (`crate::sugar`), let-binding aggregation
//! (`crate::bindings`), package types (`crate::package`), and doc attachment
//! (`crate::docs`) are invoked from the semantic actions here.
//!
//! ## Examples
//!
//! ```rust,no_run
//! use sable_syntax::{lexer, parser, ParseConfig};
//!
//! let (tokens, docs) = lexer::lex("let x = [1; 2; 3]\n").unwrap();
//! let items = parser::parse_implementation(&tokens, docs, ParseConfig::default()).unwrap();
//! assert_eq!(items.len(), 1);
//! ```

use std::rc::Rc;

use crate::ast::*;
use crate::bindings::LetBindingGroup;
use crate::builder::{attach_sig_attr, attach_str_attr};
use crate::config::ParseConfig;
use crate::diagnostics::SyntaxError;
use crate::docs::{self, DocBank, LazyDocs};
use crate::lexer::{DocComment, Keyword, Token, TokenKind};
use crate::package;
use crate::sugar::{self, BracketKind};

// NOTE: This module is split across multiple files using `include!` to keep all parser
// methods in the same Rust module (preserving privacy + call patterns) while avoiding
// a single large source file.

include!("parser/core.rs");
include!("parser/helpers.rs");
include!("parser/attrs.rs");
include!("parser/types.rs");
include!("parser/patterns.rs");
include!("parser/expr.rs");
include!("parser/modules.rs");
include!("parser/classes.rs");
include!("parser/api.rs");
include!("parser/tests.rs");
