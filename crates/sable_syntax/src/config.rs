//! Parse-session configuration.
//!
//! These used to be natural candidates for process-wide flags; they are
//! instead threaded explicitly through every parse so concurrent parses with
//! different settings cannot observe each other. The value is an immutable
//! snapshot for the duration of one parse.

/// Immutable configuration of one parse session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParseConfig {
    /// Desugar builtin indexing to `unsafe_get`/`unsafe_set` accessors.
    pub unsafe_indexing: bool,
    /// Allow applicative functor paths `F(X).t` inside long identifiers.
    pub applicative_functors: bool,
}

impl ParseConfig {
    pub fn with_unsafe_indexing(mut self, value: bool) -> Self {
        self.unsafe_indexing = value;
        self
    }

    pub fn with_applicative_functors(mut self, value: bool) -> Self {
        self.applicative_functors = value;
        self
    }
}
