//! Lexer for Sable source text.
//!
//! Produces a positioned token stream plus a side channel of documentation
//! comments. This is a deliberately small collaborator of the parser: it
//! covers exactly the surface the grammar consumes.
//!
//! ## Notes
//! - Symbolic operators are classified into precedence families here (see
//!   [`tokens::TokenKind`]), so the parser never looks at spellings.
//! - `(* ... *)` comments nest; `(** ... *)` doc comments are captured with
//!   their spans on the side channel instead of being discarded.

pub mod tokens;

pub use tokens::{DocComment, Keyword, Token, TokenKind};

use crate::ast::Span;
use crate::diagnostics::SyntaxError;

/// Characters that may appear in a symbolic operator.
fn is_op_char(c: u8) -> bool {
    matches!(
        c,
        b'!' | b'$' | b'%' | b'&' | b'*' | b'+' | b'-' | b'.' | b'/' | b'<' | b'=' | b'>' | b'?'
            | b'@' | b'^' | b'|' | b'~'
    )
}

fn is_ident_start(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_'
}

fn is_ident_char(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_' || c == b'\''
}

/// Lex `source` into tokens plus the doc-comment side channel.
///
/// ## Errors
/// Returns the first [`SyntaxError`] encountered: illegal characters and
/// escapes, or unterminated strings/comments.
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn lex(source: &str) -> Result<(Vec<Token>, Vec<DocComment>), SyntaxError> {
    Lexer::new(source).run()
}

struct Lexer<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
    tokens: Vec<Token>,
    docs: Vec<DocComment>,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            pos: 0,
            tokens: Vec::new(),
            docs: Vec::new(),
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn push(&mut self, kind: TokenKind, start: usize) {
        let span = Span::new(start, self.pos);
        self.tokens.push(Token::new(kind, span));
    }

    fn run(mut self) -> Result<(Vec<Token>, Vec<DocComment>), SyntaxError> {
        while let Some(c) = self.peek() {
            let start = self.pos;
            match c {
                b' ' | b'\t' | b'\r' | b'\n' => {
                    self.pos += 1;
                }
                b'(' => {
                    if self.peek_at(1) == Some(b'*') {
                        self.comment(start)?;
                    } else {
                        self.pos += 1;
                        self.push(TokenKind::LParen, start);
                    }
                }
                b')' => {
                    self.pos += 1;
                    self.push(TokenKind::RParen, start);
                }
                b'[' => self.lbracket(start),
                b']' => {
                    self.pos += 1;
                    self.push(TokenKind::RBracket, start);
                }
                b'{' => self.lbrace(start)?,
                b'}' => {
                    self.pos += 1;
                    self.push(TokenKind::RBrace, start);
                }
                b',' => {
                    self.pos += 1;
                    self.push(TokenKind::Comma, start);
                }
                b';' => {
                    self.pos += 1;
                    if self.peek() == Some(b';') {
                        self.pos += 1;
                        self.push(TokenKind::SemiSemi, start);
                    } else {
                        self.push(TokenKind::Semi, start);
                    }
                }
                b':' => {
                    self.pos += 1;
                    if self.peek() == Some(b':') {
                        self.pos += 1;
                        self.push(TokenKind::ColonColon, start);
                    } else {
                        self.push(TokenKind::Colon, start);
                    }
                }
                b'.' => self.dot(start),
                b'\'' => self.quote(start)?,
                b'"' => self.string(start)?,
                b'?' if self.peek_at(1).is_none_or(|c| !is_op_char(c)) => {
                    self.pos += 1;
                    self.push(TokenKind::Question, start);
                }
                b'|' if self.peek_at(1) == Some(b']') => {
                    self.pos += 2;
                    self.push(TokenKind::BarRBracket, start);
                }
                c if c.is_ascii_digit() => self.number(start),
                c if is_ident_start(c) => self.ident(start),
                c if is_op_char(c) => self.operator(start),
                other => {
                    return Err(SyntaxError::expecting(
                        format!("a token (found illegal character '{}')", other as char),
                        Span::new(start, start + 1),
                    ));
                }
            }
        }
        let at_end = Span::new(self.pos, self.pos);
        self.tokens.push(Token::new(TokenKind::Eof, at_end));
        Ok((self.tokens, self.docs))
    }

    fn ident(&mut self, start: usize) {
        while self.peek().is_some_and(is_ident_char) {
            self.pos += 1;
        }
        let text = &self.src[start..self.pos];
        let kind = if text == "_" {
            TokenKind::Underscore
        } else if let Some(kw) = tokens::keyword(text) {
            TokenKind::Keyword(kw)
        } else if text.as_bytes()[0].is_ascii_uppercase() {
            TokenKind::UIdent(text.to_string())
        } else {
            TokenKind::LIdent(text.to_string())
        };
        self.push(kind, start);
    }

    fn number(&mut self, start: usize) {
        let radix_prefix = self.peek() == Some(b'0')
            && matches!(self.peek_at(1), Some(b'x' | b'X' | b'o' | b'O' | b'b' | b'B'));
        if radix_prefix {
            self.pos += 2;
            while self.peek().is_some_and(|c| c.is_ascii_alphanumeric() || c == b'_') {
                self.pos += 1;
            }
            let text = self.src[start..self.pos].to_string();
            self.push(TokenKind::Int { text, suffix: None }, start);
            return;
        }

        while self.peek().is_some_and(|c| c.is_ascii_digit() || c == b'_') {
            self.pos += 1;
        }
        let mut is_float = false;
        if self.peek() == Some(b'.') && self.peek_at(1).is_none_or(|c| !is_op_char(c)) {
            is_float = true;
            self.pos += 1;
            while self.peek().is_some_and(|c| c.is_ascii_digit() || c == b'_') {
                self.pos += 1;
            }
        }
        if matches!(self.peek(), Some(b'e' | b'E'))
            && self
                .peek_at(1)
                .is_some_and(|c| c.is_ascii_digit() || c == b'+' || c == b'-')
        {
            is_float = true;
            self.pos += 2;
            while self.peek().is_some_and(|c| c.is_ascii_digit() || c == b'_') {
                self.pos += 1;
            }
        }
        let text = self.src[start..self.pos].to_string();
        // One trailing letter is a literal suffix, but only if it does not
        // start an identifier (`32l` yes, `32li` no).
        let suffix = match self.peek() {
            Some(c)
                if c.is_ascii_alphabetic() && self.peek_at(1).is_none_or(|n| !is_ident_char(n)) =>
            {
                self.pos += 1;
                Some(c as char)
            }
            _ => None,
        };
        let kind = if is_float {
            TokenKind::Float { text, suffix }
        } else {
            TokenKind::Int { text, suffix }
        };
        self.push(kind, start);
    }

    fn lbracket(&mut self, start: usize) {
        self.pos += 1;
        let kind = match (self.peek(), self.peek_at(1), self.peek_at(2)) {
            (Some(b'@'), Some(b'@'), Some(b'@')) => {
                self.pos += 3;
                TokenKind::LBracketAtAtAt
            }
            (Some(b'@'), Some(b'@'), _) => {
                self.pos += 2;
                TokenKind::LBracketAtAt
            }
            (Some(b'@'), _, _) => {
                self.pos += 1;
                TokenKind::LBracketAt
            }
            (Some(b'%'), Some(b'%'), _) => {
                self.pos += 2;
                TokenKind::LBracketPercentPercent
            }
            (Some(b'%'), _, _) => {
                self.pos += 1;
                TokenKind::LBracketPercent
            }
            (Some(b'|'), next, _) if next.is_none_or(|c| !is_op_char(c)) => {
                self.pos += 1;
                TokenKind::LBracketBar
            }
            _ => TokenKind::LBracket,
        };
        self.push(kind, start);
    }

    /// `{` opens either a record brace or a `{|`/`{tag|` quoted string.
    fn lbrace(&mut self, start: usize) -> Result<(), SyntaxError> {
        let mut probe = self.pos + 1;
        while self.bytes.get(probe).is_some_and(|c| c.is_ascii_lowercase() || *c == b'_') {
            probe += 1;
        }
        if self.bytes.get(probe) == Some(&b'|') {
            let delim = self.src[self.pos + 1..probe].to_string();
            self.pos = probe + 1;
            return self.quoted_string(start, delim);
        }
        self.pos += 1;
        self.push(TokenKind::LBrace, start);
        Ok(())
    }

    fn dot(&mut self, start: usize) {
        self.pos += 1;
        // `.` followed by operator characters introduces an indexing operator
        // like `.%`, used before `(`/`[`/`{`.
        if self.peek().is_some_and(|c| is_op_char(c) && c != b'.') {
            let op_start = self.pos;
            while self.peek().is_some_and(|c| is_op_char(c) && c != b'.') {
                self.pos += 1;
            }
            let op = self.src[op_start..self.pos].to_string();
            self.push(TokenKind::DotOp(op), start);
        } else {
            self.push(TokenKind::Dot, start);
        }
    }

    /// `'` starts a char literal or stands alone as a type-variable quote.
    fn quote(&mut self, start: usize) -> Result<(), SyntaxError> {
        match (self.peek_at(1), self.peek_at(2)) {
            (Some(b'\\'), _) => {
                self.pos += 2;
                let c = self.escape(start)?;
                if self.peek() == Some(b'\'') {
                    self.pos += 1;
                    self.push(TokenKind::Char(c), start);
                    Ok(())
                } else {
                    Err(SyntaxError::unclosed(
                        "'",
                        Span::new(start, start + 1),
                        "'",
                        Span::new(self.pos, self.pos + 1),
                    ))
                }
            }
            (Some(c), Some(b'\'')) if c != b'\'' => {
                self.pos += 3;
                self.push(TokenKind::Char(c as char), start);
                Ok(())
            }
            _ => {
                self.pos += 1;
                self.push(TokenKind::Quote, start);
                Ok(())
            }
        }
    }

    /// Decode the escape sequence after a backslash (already consumed).
    fn escape(&mut self, literal_start: usize) -> Result<char, SyntaxError> {
        let esc_start = self.pos - 1;
        let c = self.peek().ok_or_else(|| {
            SyntaxError::unclosed(
                "'",
                Span::new(literal_start, literal_start + 1),
                "'",
                Span::new(self.pos, self.pos),
            )
        })?;
        self.pos += 1;
        match c {
            b'\\' => Ok('\\'),
            b'\'' => Ok('\''),
            b'"' => Ok('"'),
            b'n' => Ok('\n'),
            b't' => Ok('\t'),
            b'r' => Ok('\r'),
            b'b' => Ok('\u{8}'),
            b' ' => Ok(' '),
            b'x' => {
                let hex_start = self.pos;
                while self.peek().is_some_and(|c| c.is_ascii_hexdigit()) && self.pos - hex_start < 2
                {
                    self.pos += 1;
                }
                let digits = &self.src[hex_start..self.pos];
                u8::from_str_radix(digits, 16)
                    .map(|b| b as char)
                    .map_err(|_| {
                        SyntaxError::escape(
                            format!("x{}", digits),
                            Span::new(esc_start, self.pos),
                        )
                    })
            }
            c if c.is_ascii_digit() => {
                let dec_start = self.pos - 1;
                while self.peek().is_some_and(|c| c.is_ascii_digit()) && self.pos - dec_start < 3 {
                    self.pos += 1;
                }
                let digits = &self.src[dec_start..self.pos];
                match digits.parse::<u16>() {
                    Ok(n) if n < 256 => Ok(n as u8 as char),
                    _ => Err(SyntaxError::escape(
                        digits.to_string(),
                        Span::new(esc_start, self.pos),
                    )),
                }
            }
            other => Err(SyntaxError::escape(
                (other as char).to_string(),
                Span::new(esc_start, self.pos),
            )),
        }
    }

    fn string(&mut self, start: usize) -> Result<(), SyntaxError> {
        self.pos += 1;
        let mut text = String::new();
        loop {
            match self.peek() {
                None => {
                    return Err(SyntaxError::unclosed(
                        "\"",
                        Span::new(start, start + 1),
                        "\"",
                        Span::new(self.pos, self.pos),
                    ));
                }
                Some(b'"') => {
                    self.pos += 1;
                    break;
                }
                Some(b'\\') => {
                    self.pos += 1;
                    text.push(self.escape(start)?);
                }
                Some(_) => {
                    // Copy one whole UTF-8 scalar.
                    let rest = &self.src[self.pos..];
                    let c = rest.chars().next().unwrap_or('\u{FFFD}');
                    text.push(c);
                    self.pos += c.len_utf8();
                }
            }
        }
        self.push(TokenKind::String { text, delim: None }, start);
        Ok(())
    }

    /// Body of a `{tag|...|tag}` quoted string; the opener is consumed.
    fn quoted_string(&mut self, start: usize, delim: String) -> Result<(), SyntaxError> {
        let closer = format!("|{}}}", delim);
        match self.src[self.pos..].find(&closer) {
            Some(offset) => {
                let text = self.src[self.pos..self.pos + offset].to_string();
                self.pos += offset + closer.len();
                self.push(
                    TokenKind::String {
                        text,
                        delim: Some(delim),
                    },
                    start,
                );
                Ok(())
            }
            None => Err(SyntaxError::unclosed(
                "{|",
                Span::new(start, start + 2),
                "|}",
                Span::new(self.src.len(), self.src.len()),
            )),
        }
    }

    /// Skip a `(* ... *)` comment (nesting); capture `(** ... *)` doc text.
    fn comment(&mut self, start: usize) -> Result<(), SyntaxError> {
        self.pos += 2;
        let is_doc = self.peek() == Some(b'*') && self.peek_at(1) != Some(b')');
        if is_doc {
            self.pos += 1;
        }
        let body_start = self.pos;
        let mut depth = 1usize;
        loop {
            match (self.peek(), self.peek_at(1)) {
                (Some(b'('), Some(b'*')) => {
                    depth += 1;
                    self.pos += 2;
                }
                (Some(b'*'), Some(b')')) => {
                    depth -= 1;
                    if depth == 0 {
                        let body_end = self.pos;
                        self.pos += 2;
                        if is_doc {
                            self.docs.push(DocComment {
                                text: self.src[body_start..body_end].trim().to_string(),
                                span: Span::new(start, self.pos),
                            });
                        }
                        return Ok(());
                    }
                    self.pos += 2;
                }
                (Some(_), _) => {
                    let c = self.src[self.pos..].chars().next().unwrap_or('\u{FFFD}');
                    self.pos += c.len_utf8();
                }
                (None, _) => {
                    return Err(SyntaxError::unclosed(
                        "(*",
                        Span::new(start, start + 2),
                        "*)",
                        Span::new(self.pos, self.pos),
                    ));
                }
            }
        }
    }

    fn operator(&mut self, start: usize) {
        while self.peek().is_some_and(is_op_char) {
            self.pos += 1;
        }
        let text = &self.src[start..self.pos];
        let kind = match text {
            "=" => TokenKind::Equal,
            "|" => TokenKind::Bar,
            "||" => TokenKind::BarBar,
            "&&" => TokenKind::AmpAmp,
            "->" => TokenKind::Arrow,
            "<-" => TokenKind::LessMinus,
            "+" => TokenKind::Plus,
            "+." => TokenKind::PlusDot,
            "-" => TokenKind::Minus,
            "-." => TokenKind::MinusDot,
            "*" => TokenKind::Star,
            "|]" => TokenKind::BarRBracket,
            "!=" => TokenKind::Infix0("!=".to_string()),
            _ => Self::classify(text),
        };
        self.push(kind, start);
    }

    /// Classify an unreserved operator by its leading character.
    fn classify(text: &str) -> TokenKind {
        let s = text.to_string();
        match text.as_bytes()[0] {
            b'!' | b'~' | b'?' => TokenKind::PrefixOp(s),
            b'=' | b'<' | b'>' | b'|' | b'&' | b'$' => TokenKind::Infix0(s),
            b'@' | b'^' => TokenKind::Infix1(s),
            b'+' | b'-' => TokenKind::Infix2(s),
            b'*' if text.starts_with("**") => TokenKind::Infix4(s),
            _ => TokenKind::Infix3(s),
        }
    }
}
