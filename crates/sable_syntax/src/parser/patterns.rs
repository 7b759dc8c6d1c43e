/// Patterns.
///
/// Precedence, loosest first: `as` aliases, `|` alternatives, `,` tuples,
/// `::` cons (right-associative), constructor application, atoms.
impl<'a> Parser<'a> {
    fn pattern(&mut self) -> PResult<Pattern> {
        let start = self.current_span().start;
        let mut pat = self.or_pattern()?;
        while self.match_kw(Keyword::As) {
            let name = self.lident("an alias name")?;
            let loc = Location::real(self.span_from(start));
            pat = Pattern::mk(PatDesc::Alias(Box::new(pat), name), loc);
        }
        Ok(pat)
    }

    fn or_pattern(&mut self) -> PResult<Pattern> {
        let start = self.current_span().start;
        let mut pat = self.tuple_pattern()?;
        while self.match_tok(&TokenKind::Bar) {
            let rhs = self.tuple_pattern()?;
            let loc = Location::real(self.span_from(start));
            pat = Pattern::mk(PatDesc::Or(Box::new(pat), Box::new(rhs)), loc);
        }
        Ok(pat)
    }

    fn tuple_pattern(&mut self) -> PResult<Pattern> {
        let start = self.current_span().start;
        let first = self.cons_pattern()?;
        if !self.check(&TokenKind::Comma) {
            return Ok(first);
        }
        let mut parts = vec![first];
        while self.match_tok(&TokenKind::Comma) {
            parts.push(self.cons_pattern()?);
        }
        let loc = Location::real(self.span_from(start));
        Ok(Pattern::mk(PatDesc::Tuple(parts), loc))
    }

    /// `x :: xs` builds the same constructor shape list desugaring produces,
    /// except the cons cell here is user-written and real.
    fn cons_pattern(&mut self) -> PResult<Pattern> {
        let start = self.current_span().start;
        let head = self.constructor_pattern()?;
        if !self.check(&TokenKind::ColonColon) {
            return Ok(head);
        }
        let op_span = self.advance().span;
        let tail = self.cons_pattern()?;
        let whole = Location::real(self.span_from(start));
        let pair_span = head.loc.span().merge(tail.loc.span());
        let pair = Pattern::mk(
            PatDesc::Tuple(vec![head, tail]),
            Location::ghost(pair_span),
        );
        Ok(Pattern::mk(
            PatDesc::Construct(
                Loc::new(
                    Longident::ident(sugar::CONS),
                    Location::ghost(op_span),
                ),
                Some(Box::new(pair)),
            ),
            whole,
        ))
    }

    fn constructor_pattern(&mut self) -> PResult<Pattern> {
        let start = self.current_span().start;
        if matches!(self.peek().kind, TokenKind::UIdent(_)) {
            let path = self.constructor_path()?;
            if self.at_pattern_start() {
                let arg = self.atomic_pattern()?;
                let loc = Location::real(self.span_from(start));
                return Ok(Pattern::mk(
                    PatDesc::Construct(path, Some(Box::new(arg))),
                    loc,
                ));
            }
            let loc = path.loc;
            return Ok(Pattern::mk(PatDesc::Construct(path, None), loc));
        }
        self.atomic_pattern()
    }

    fn at_pattern_start(&self) -> bool {
        matches!(
            self.peek().kind,
            TokenKind::Underscore
                | TokenKind::LIdent(_)
                | TokenKind::UIdent(_)
                | TokenKind::LParen
                | TokenKind::LBracket
                | TokenKind::Int { .. }
                | TokenKind::Float { .. }
                | TokenKind::Char(_)
                | TokenKind::String { .. }
                | TokenKind::Minus
                | TokenKind::MinusDot
                | TokenKind::Keyword(Keyword::True | Keyword::False)
        )
    }

    fn atomic_pattern(&mut self) -> PResult<Pattern> {
        let start_span = self.current_span();
        let start = start_span.start;
        let pat = match &self.peek().kind {
            TokenKind::Underscore => {
                self.advance();
                Pattern::mk(PatDesc::Any, Location::real(start_span))
            }
            TokenKind::LIdent(name) => {
                let name = name.clone();
                self.advance();
                let loc = Location::real(start_span);
                Pattern::mk(PatDesc::Var(Loc::new(name, loc)), loc)
            }
            TokenKind::UIdent(_) => {
                let path = self.constructor_path()?;
                let loc = path.loc;
                Pattern::mk(PatDesc::Construct(path, None), loc)
            }
            TokenKind::Keyword(kw @ (Keyword::True | Keyword::False)) => {
                let name = if *kw == Keyword::True { "true" } else { "false" };
                self.advance();
                let loc = Location::real(start_span);
                Pattern::mk(
                    PatDesc::Construct(Loc::new(Longident::ident(name), loc), None),
                    loc,
                )
            }
            TokenKind::Int { .. }
            | TokenKind::Float { .. }
            | TokenKind::Char(_)
            | TokenKind::String { .. } => {
                let constant = self.constant()?;
                Pattern::mk(PatDesc::Constant(constant), Location::real(start_span))
            }
            TokenKind::Minus | TokenKind::MinusDot => {
                self.advance();
                let constant = match self.constant()? {
                    Constant::Int { text, suffix } => Constant::Int {
                        text: format!("-{}", text),
                        suffix,
                    },
                    Constant::Float { text, suffix } => Constant::Float {
                        text: format!("-{}", text),
                        suffix,
                    },
                    _ => {
                        return Err(SyntaxError::expecting(
                            "a numeric literal",
                            self.current_span(),
                        ));
                    }
                };
                Pattern::mk(
                    PatDesc::Constant(constant),
                    Location::real(self.span_from(start)),
                )
            }
            TokenKind::LParen => {
                let opening_span = self.advance().span;
                if self.check(&TokenKind::RParen) {
                    let close = self.advance().span;
                    let loc = Location::real(opening_span.merge(close));
                    Pattern::mk(
                        PatDesc::Construct(Loc::new(Longident::ident("()"), loc), None),
                        loc,
                    )
                } else {
                    let inner = self.pattern()?;
                    let constrained = if self.match_tok(&TokenKind::Colon) {
                        let ty = self.core_type()?;
                        Some(ty)
                    } else {
                        None
                    };
                    self.close_delim("(", opening_span, &TokenKind::RParen, ")")?;
                    match constrained {
                        Some(ty) => Pattern::mk(
                            PatDesc::Constraint(Box::new(inner), ty),
                            Location::real(self.span_from(start)),
                        ),
                        None => inner,
                    }
                }
            }
            TokenKind::LBracket => {
                let opening_span = self.advance().span;
                let mut elements = Vec::new();
                if !self.check(&TokenKind::RBracket) {
                    elements.push(self.cons_pattern()?);
                    while self.match_tok(&TokenKind::Semi) {
                        if self.check(&TokenKind::RBracket) {
                            break;
                        }
                        elements.push(self.cons_pattern()?);
                    }
                }
                let nil_span =
                    self.close_delim("[", opening_span, &TokenKind::RBracket, "]")?;
                sugar::list_pat(elements, nil_span, self.span_from(start))
            }
            TokenKind::LBracketPercent => {
                let (ext, span) = self.extension("[%")?;
                Pattern::mk(PatDesc::Extension(ext), Location::real(span))
            }
            _ => return Err(SyntaxError::expecting("a pattern", start_span)),
        };
        let attrs = self.postfix_attrs()?;
        Ok(pat.with_attrs(attrs))
    }

    /// A constructor path: `C`, `M.C`.
    fn constructor_path(&mut self) -> PResult<Loc<Longident>> {
        self.module_path()
    }
}
