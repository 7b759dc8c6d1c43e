/// Token-stream primitives and the paired-delimiter checkpoint.
///
/// This chunk contains the low-level machinery used throughout parsing:
/// peeking/consuming tokens, matching and expecting kinds and keywords, and
/// `close_delim`, the single checkpoint every paired-delimiter production
/// goes through so unclosed delimiters always report both locations.
/// Stand-in handed out past the end of the slice, so entry points accept
/// arbitrary token slices, not just Eof-terminated ones.
static EOF_TOKEN: Token = Token {
    kind: TokenKind::Eof,
    span: Span { start: 0, end: 0 },
};

impl<'a> Parser<'a> {
    // ========================================================================
    // Helpers
    // ========================================================================

    /// Return `true` if the current token is [`TokenKind::Eof`].
    fn is_at_end(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Eof)
    }

    /// Return the current token without consuming it.
    fn peek(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&EOF_TOKEN)
    }

    /// Return the token after the current token without consuming it.
    fn peek_next(&self) -> &Token {
        self.tokens.get(self.pos + 1).unwrap_or(&EOF_TOKEN)
    }

    /// Advance to the next token and return the token we just consumed.
    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.pos += 1;
        }
        match self.pos.checked_sub(1) {
            Some(prev) => &self.tokens[prev],
            None => &EOF_TOKEN,
        }
    }

    /// Return `true` if the current token matches `kind`.
    ///
    /// For data-bearing tokens (identifiers/literals/operators) the variant
    /// is compared and the payload ignored; keywords compare exactly.
    fn check(&self, kind: &TokenKind) -> bool {
        match (kind, &self.peek().kind) {
            (TokenKind::Keyword(k1), TokenKind::Keyword(k2)) => k1 == k2,
            (lhs, rhs) => std::mem::discriminant(lhs) == std::mem::discriminant(rhs),
        }
    }

    fn check_kw(&self, kw: Keyword) -> bool {
        matches!(&self.peek().kind, TokenKind::Keyword(k) if *k == kw)
    }

    /// If the current token matches `kind`, consume it and return `true`.
    fn match_tok(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn match_kw(&mut self, kw: Keyword) -> bool {
        if self.check_kw(kw) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect_tok(&mut self, kind: &TokenKind, expected: &str) -> PResult<&Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(SyntaxError::expecting(expected, self.peek().span))
        }
    }

    fn expect_kw(&mut self, kw: Keyword, expected: &str) -> PResult<&Token> {
        if self.check_kw(kw) {
            Ok(self.advance())
        } else {
            Err(SyntaxError::expecting(expected, self.peek().span))
        }
    }

    /// Checkpoint for every paired-delimiter production.
    ///
    /// Consumes the expected closer, or raises an unclosed-delimiter
    /// diagnostic carrying the opener's location and the offending token's.
    fn close_delim(
        &mut self,
        opening: &'static str,
        opening_span: Span,
        closer: &TokenKind,
        closing: &'static str,
    ) -> PResult<Span> {
        if self.check(closer) {
            Ok(self.advance().span)
        } else {
            Err(SyntaxError::unclosed(
                opening,
                opening_span,
                closing,
                self.peek().span,
            ))
        }
    }

    /// Byte span of the current token.
    fn current_span(&self) -> Span {
        self.peek().span
    }

    /// End offset of the most recently consumed token.
    fn prev_end(&self) -> usize {
        if self.pos == 0 {
            0
        } else {
            self.tokens[self.pos - 1].span.end
        }
    }

    /// Span from `start` to the end of the last consumed token.
    fn span_from(&self, start: usize) -> Span {
        Span::new(start, self.prev_end())
    }

    // ========================================================================
    // Leaves
    // ========================================================================

    /// Expect a lowercase identifier.
    fn lident(&mut self, expected: &str) -> PResult<Loc<String>> {
        let span = self.current_span();
        match &self.peek().kind {
            TokenKind::LIdent(name) => {
                let name = name.clone();
                self.advance();
                Ok(Loc::new(name, Location::real(span)))
            }
            _ => Err(SyntaxError::expecting(expected, span)),
        }
    }

    /// Expect an uppercase identifier.
    fn uident(&mut self, expected: &str) -> PResult<Loc<String>> {
        let span = self.current_span();
        match &self.peek().kind {
            TokenKind::UIdent(name) => {
                let name = name.clone();
                self.advance();
                Ok(Loc::new(name, Location::real(span)))
            }
            _ => Err(SyntaxError::expecting(expected, span)),
        }
    }

    /// Expect a literal constant token.
    fn constant(&mut self) -> PResult<Constant> {
        let constant = match &self.peek().kind {
            TokenKind::Int { text, suffix } => Constant::Int {
                text: text.clone(),
                suffix: *suffix,
            },
            TokenKind::Float { text, suffix } => Constant::Float {
                text: text.clone(),
                suffix: *suffix,
            },
            TokenKind::Char(c) => Constant::Char(*c),
            TokenKind::String { text, delim } => Constant::String {
                text: text.clone(),
                delim: delim.clone(),
            },
            _ => return Err(SyntaxError::expecting("a constant", self.current_span())),
        };
        self.advance();
        Ok(constant)
    }

    // ========================================================================
    // Long identifiers
    // ========================================================================

    /// A module path `M`, `M.N`, `F(X)` (the latter gated by the session's
    /// applicative-functor flag).
    ///
    /// Stops before a `.` that is not followed by an uppercase identifier, so
    /// callers can pick up `.x`, `.(`, `.[`, `.{` continuations themselves.
    fn module_path(&mut self) -> PResult<Loc<Longident>> {
        let start = self.current_span().start;
        let head = self.uident("a module name")?;
        let mut path = Longident::Ident(head.txt);
        loop {
            if self.check(&TokenKind::LParen) && self.at_applicative_segment() {
                let opening_span = self.current_span();
                if !self.config.applicative_functors {
                    return Err(SyntaxError::applicative_path_disabled(
                        Span::new(start, opening_span.end),
                    ));
                }
                self.advance();
                let arg = self.module_path()?;
                self.close_delim("(", opening_span, &TokenKind::RParen, ")")?;
                path = Longident::Apply(Box::new(path), Box::new(arg.txt));
            } else if self.check(&TokenKind::Dot)
                && matches!(self.peek_next().kind, TokenKind::UIdent(_))
            {
                self.advance();
                let seg = self.uident("a module name")?;
                path = path.dot(seg.txt);
            } else {
                break;
            }
        }
        Ok(Loc::new(path, Location::real(self.span_from(start))))
    }

    /// Raw lookahead from an opening `(`: does the group hold only a module
    /// path, with a `.` right after the closer? That is the shape of an
    /// applicative path segment `F(X).`; anything else (say a constructor
    /// argument `Some (1)`) is left for the caller.
    fn at_applicative_segment(&self) -> bool {
        let mut depth = 0usize;
        let mut i = self.pos;
        while let Some(token) = self.tokens.get(i) {
            match &token.kind {
                TokenKind::LParen => depth += 1,
                TokenKind::RParen => {
                    depth -= 1;
                    if depth == 0 {
                        return matches!(
                            self.tokens.get(i + 1).map(|t| &t.kind),
                            Some(TokenKind::Dot)
                        );
                    }
                }
                TokenKind::UIdent(_) | TokenKind::Dot => {}
                _ => return false,
            }
            i += 1;
        }
        false
    }

    /// A lowercase-terminated path: `x`, `M.x`, `M.N.x`.
    fn value_path(&mut self) -> PResult<Loc<Longident>> {
        let start = self.current_span().start;
        if matches!(self.peek().kind, TokenKind::UIdent(_)) {
            let prefix = self.module_path()?;
            self.expect_tok(&TokenKind::Dot, "'.' in a qualified name")?;
            let name = self.lident("an identifier")?;
            let path = prefix.txt.dot(name.txt);
            Ok(Loc::new(path, Location::real(self.span_from(start))))
        } else {
            let name = self.lident("an identifier")?;
            Ok(Loc::new(Longident::Ident(name.txt), name.loc))
        }
    }
}
