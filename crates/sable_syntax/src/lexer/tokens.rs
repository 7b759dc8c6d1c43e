//! Token types for the Sable lexer.
//!
//! Symbolic operators are pre-classified by their leading character into
//! precedence families (`Infix0` lowest .. `Infix4` highest, `PrefixOp`), so
//! the parser's precedence ladder never inspects operator spellings. Tokens
//! with a grammar role of their own (`=`, `*`, `-`, `|`, `->`, ...) get
//! dedicated kinds.

use crate::ast::Span;

// ============================================================================
// TOKEN TYPES
// ============================================================================

/// Kind of token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // ========== Identifiers and literals ==========
    /// Lowercase-initial identifier.
    LIdent(String),
    /// Uppercase-initial identifier (module names, constructors).
    UIdent(String),
    /// Integer literal text plus optional one-letter suffix (`32l`, `7n`).
    Int { text: String, suffix: Option<char> },
    /// Float literal text plus optional one-letter suffix.
    Float { text: String, suffix: Option<char> },
    Char(char),
    /// String literal; `delim` is the tag of a `{tag|...|tag}` quoted string.
    String { text: String, delim: Option<String> },

    // ========== Operator families (classified by leading character) ==========
    /// `=`-like comparison level: leading `= < > | & $ !` (e.g. `>=`, `!=`).
    Infix0(String),
    /// Leading `@ ^`; right-associative.
    Infix1(String),
    /// Leading `+ -` (additive).
    Infix2(String),
    /// Leading `* / %` (multiplicative).
    Infix3(String),
    /// Leading `**`; right-associative.
    Infix4(String),
    /// Leading `! ~ ?`.
    PrefixOp(String),
    /// `.`-led indexing operator before `(`/`[`/`{`, e.g. the `%` of `a.%(i)`.
    /// Carries the operator characters without the dot.
    DotOp(String),

    // ========== Keywords ==========
    Keyword(Keyword),

    // ========== Punctuation ==========
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    /// `[|`
    LBracketBar,
    /// `|]`
    BarRBracket,
    /// `[@` attribute opener (postfix).
    LBracketAt,
    /// `[@@` item attribute opener.
    LBracketAtAt,
    /// `[@@@` floating attribute opener.
    LBracketAtAtAt,
    /// `[%` extension opener.
    LBracketPercent,
    /// `[%%` item extension opener.
    LBracketPercentPercent,
    Quote,
    Underscore,
    Equal,
    Bar,
    BarBar,
    AmpAmp,
    Arrow,
    LessMinus,
    Plus,
    PlusDot,
    Minus,
    MinusDot,
    Star,
    Dot,
    Comma,
    Colon,
    ColonColon,
    Semi,
    SemiSemi,
    Question,

    Eof,
}

/// Reserved words.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    And,
    As,
    Begin,
    Class,
    Constraint,
    Else,
    End,
    False,
    Fun,
    If,
    In,
    Initializer,
    Let,
    Match,
    Method,
    Module,
    Mutable,
    Object,
    Of,
    Open,
    Private,
    Rec,
    Sig,
    Struct,
    Then,
    True,
    Type,
    Val,
    When,
    With,
}

/// Resolve an identifier spelling to a keyword, if reserved.
pub fn keyword(name: &str) -> Option<Keyword> {
    use Keyword::*;
    Some(match name {
        "and" => And,
        "as" => As,
        "begin" => Begin,
        "class" => Class,
        "constraint" => Constraint,
        "else" => Else,
        "end" => End,
        "false" => False,
        "fun" => Fun,
        "if" => If,
        "in" => In,
        "initializer" => Initializer,
        "let" => Let,
        "match" => Match,
        "method" => Method,
        "module" => Module,
        "mutable" => Mutable,
        "object" => Object,
        "of" => Of,
        "open" => Open,
        "private" => Private,
        "rec" => Rec,
        "sig" => Sig,
        "struct" => Struct,
        "then" => Then,
        "true" => True,
        "type" => Type,
        "val" => Val,
        "when" => When,
        "with" => With,
        _ => return None,
    })
}

/// A token with its kind and source span.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// A documentation comment `(** ... *)` captured on the side channel.
#[derive(Debug, Clone, PartialEq)]
pub struct DocComment {
    /// Comment text without the `(**`/`*)` markers, trimmed.
    pub text: String,
    pub span: Span,
}
