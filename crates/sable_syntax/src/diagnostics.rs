//! Diagnostics for the Sable syntax frontend.
//!
//! Every malformed input raises exactly one [`SyntaxError`] and aborts the
//! parse: there is no skip-and-continue and no partial AST. The external
//! driver decides whether to stop or to resynchronize at the next toplevel
//! phrase (interactive use).
//!
//! Errors derive `miette::Diagnostic` so the CLI can render annotated source
//! reports; the `#[label]` spans carry the primary (and for unclosed
//! delimiters, secondary) locations.

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

use crate::ast::Span;

fn source_span(span: Span) -> SourceSpan {
    (span.start, span.end.saturating_sub(span.start)).into()
}

/// A fatal syntax diagnostic.
#[derive(Debug, Clone, Error, Diagnostic, PartialEq, Eq)]
pub enum SyntaxError {
    /// A paired delimiter was opened but never closed.
    #[error("syntax error: '{opening}' not closed, expected '{closing}'")]
    #[diagnostic(code(sable::syntax::unclosed))]
    Unclosed {
        opening: &'static str,
        closing: &'static str,
        #[label("'{opening}' opened here")]
        opening_loc: SourceSpan,
        #[label("expected '{closing}' before this")]
        loc: SourceSpan,
    },

    /// The grammar expected a particular token or nonterminal.
    #[error("syntax error: expecting {expected}")]
    #[diagnostic(code(sable::syntax::expecting))]
    Expecting {
        expected: String,
        #[label("here")]
        loc: SourceSpan,
    },

    /// A well-formed construct appeared where the grammar forbids it.
    #[error("syntax error: {construct} not expected")]
    #[diagnostic(code(sable::syntax::not_expecting))]
    NotExpecting {
        construct: String,
        #[label("not expected here")]
        loc: SourceSpan,
    },

    /// An illegal escape sequence in a char or string literal.
    #[error("illegal escape sequence: \\{sequence}")]
    #[diagnostic(code(sable::syntax::escape))]
    Escape {
        sequence: String,
        #[label("illegal escape")]
        loc: SourceSpan,
    },

    /// A module type too rich to embed as a package type.
    #[error("invalid package type: {reason}")]
    #[diagnostic(code(sable::syntax::invalid_package_type))]
    InvalidPackageType {
        reason: &'static str,
        #[label("in this package type")]
        loc: SourceSpan,
    },

    /// `F(X)` inside a path while applicative functor syntax is disabled.
    #[error("applicative paths of the form F(X).t are not supported by this parse session")]
    #[diagnostic(code(sable::syntax::applicative_path))]
    ApplicativePathDisabled {
        #[label("applicative path")]
        loc: SourceSpan,
    },

    /// `let%ext ... in` used at class level, where extension ids are illegal.
    #[error("extension id on a let binding is not allowed inside a class expression")]
    #[diagnostic(code(sable::syntax::class_let_extension))]
    ConflictingExtensionInClassBinding {
        #[label("extension id here")]
        loc: SourceSpan,
    },
}

impl SyntaxError {
    pub fn unclosed(opening: &'static str, opening_span: Span, closing: &'static str, at: Span) -> Self {
        SyntaxError::Unclosed {
            opening,
            closing,
            opening_loc: source_span(opening_span),
            loc: source_span(at),
        }
    }

    pub fn expecting(expected: impl Into<String>, at: Span) -> Self {
        SyntaxError::Expecting {
            expected: expected.into(),
            loc: source_span(at),
        }
    }

    pub fn not_expecting(construct: impl Into<String>, at: Span) -> Self {
        SyntaxError::NotExpecting {
            construct: construct.into(),
            loc: source_span(at),
        }
    }

    pub fn escape(sequence: impl Into<String>, at: Span) -> Self {
        SyntaxError::Escape {
            sequence: sequence.into(),
            loc: source_span(at),
        }
    }

    pub fn invalid_package_type(reason: &'static str, at: Span) -> Self {
        SyntaxError::InvalidPackageType {
            reason,
            loc: source_span(at),
        }
    }

    pub fn applicative_path_disabled(at: Span) -> Self {
        SyntaxError::ApplicativePathDisabled {
            loc: source_span(at),
        }
    }

    pub fn class_let_extension(at: Span) -> Self {
        SyntaxError::ConflictingExtensionInClassBinding {
            loc: source_span(at),
        }
    }

    /// The primary location, as a byte span. For unclosed delimiters this is
    /// the opener; the offending token is the secondary location.
    pub fn primary_span(&self) -> Span {
        let loc = match self {
            SyntaxError::Unclosed {
                opening_loc: loc, ..
            }
            | SyntaxError::Expecting { loc, .. }
            | SyntaxError::NotExpecting { loc, .. }
            | SyntaxError::Escape { loc, .. }
            | SyntaxError::InvalidPackageType { loc, .. }
            | SyntaxError::ApplicativePathDisabled { loc, .. }
            | SyntaxError::ConflictingExtensionInClassBinding { loc, .. } => loc,
        };
        Span::new(loc.offset(), loc.offset() + loc.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unclosed_carries_both_locations() {
        let err = SyntaxError::unclosed("(", Span::new(2, 3), ")", Span::new(10, 10));
        match &err {
            SyntaxError::Unclosed {
                opening_loc, loc, ..
            } => {
                assert_eq!(opening_loc.offset(), 2);
                assert_eq!(loc.offset(), 10);
            }
            _ => panic!("expected Unclosed"),
        }
        assert_eq!(err.primary_span(), Span::new(2, 3));
    }

    #[test]
    fn test_display_names_delimiters() {
        let err = SyntaxError::unclosed("[", Span::new(0, 1), "]", Span::new(5, 5));
        assert_eq!(err.to_string(), "syntax error: '[' not closed, expected ']'");
    }
}
