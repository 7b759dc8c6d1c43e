/// Parser core types.
///
/// This chunk defines the [`Parser`] type shared by the other parser chunks.
///
/// ## Notes
/// - This file is `include!`'d into `crate::parser` to keep all parser
///   methods in a single module while avoiding one giant source file.
/// - The configuration snapshot is immutable for the whole parse; concurrent
///   parses with different flags never observe each other.
type PResult<T> = Result<T, SyntaxError>;

/// Where an item-sequence production stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Terminator {
    /// Whole-file entry points.
    Eof,
    /// `struct`/`sig`-like bodies; the `end` keyword.
    End,
    /// Attribute and extension payloads; the closing `]`.
    Bracket,
}

/// Parser state over one token stream.
pub struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    config: ParseConfig,
    docs: Rc<DocBank>,
}

impl<'a> Parser<'a> {
    /// Create a parser for a token stream.
    ///
    /// ## Parameters
    /// - `tokens`: token stream produced by `sable_syntax::lexer`.
    /// - `comments`: the doc-comment side channel from the same lex.
    /// - `config`: immutable session configuration.
    pub fn new(tokens: &'a [Token], comments: Vec<DocComment>, config: ParseConfig) -> Self {
        Self {
            tokens,
            pos: 0,
            config,
            docs: DocBank::new(comments),
        }
    }
}
