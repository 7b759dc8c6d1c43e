/// Attributes and extension points.
///
/// `[@attr]` / `[@@attr]` / `[@@@attr]` and `[%ext]` / `[%%ext]` share one
/// payload grammar selected by the punctuation after the name: `:` introduces
/// a type or a signature, `?` a pattern with an optional guard, and the
/// default is a nested structure.
impl<'a> Parser<'a> {
    /// A dotted attribute or extension name, e.g. `sable.doc`.
    fn attr_name(&mut self) -> PResult<Loc<String>> {
        let start = self.current_span().start;
        let mut name = self.name_segment()?;
        while self.check(&TokenKind::Dot) {
            self.advance();
            let seg = self.name_segment()?;
            name.push('.');
            name.push_str(&seg);
        }
        Ok(Loc::new(name, Location::real(self.span_from(start))))
    }

    fn name_segment(&mut self) -> PResult<String> {
        match &self.peek().kind {
            TokenKind::LIdent(s) | TokenKind::UIdent(s) => {
                let s = s.clone();
                self.advance();
                Ok(s)
            }
            _ => Err(SyntaxError::expecting(
                "an attribute name",
                self.current_span(),
            )),
        }
    }

    /// The payload between an attribute/extension name and its closing `]`.
    fn payload(&mut self) -> PResult<Payload> {
        if self.match_tok(&TokenKind::Colon) {
            if self.at_signature_item_start() || self.check(&TokenKind::RBracket) {
                Ok(Payload::Sig(self.signature_items(Terminator::Bracket)?))
            } else {
                Ok(Payload::Type(self.core_type()?))
            }
        } else if self.match_tok(&TokenKind::Question) {
            let pat = self.pattern()?;
            let guard = if self.match_kw(Keyword::When) {
                Some(self.expr_nonseq()?)
            } else {
                None
            };
            Ok(Payload::Pat(pat, guard))
        } else {
            Ok(Payload::Str(self.structure_items(Terminator::Bracket)?))
        }
    }

    fn at_signature_item_start(&self) -> bool {
        matches!(
            self.peek().kind,
            TokenKind::Keyword(
                Keyword::Val
                    | Keyword::Type
                    | Keyword::Module
                    | Keyword::Open
                    | Keyword::Class
            )
        )
    }

    /// One attribute whose opener token is the current token.
    fn attribute(&mut self, opening: &'static str) -> PResult<Attribute> {
        let opening_span = self.advance().span;
        let name = self.attr_name()?;
        let payload = self.payload()?;
        let close = self.close_delim(opening, opening_span, &TokenKind::RBracket, "]")?;
        Ok(Attribute {
            name,
            payload,
            loc: Location::real(opening_span.merge(close)),
        })
    }

    /// One extension point whose opener token is the current token. Returns
    /// the extension and its source span; the caller builds the node.
    fn extension(&mut self, opening: &'static str) -> PResult<(Extension, Span)> {
        let opening_span = self.advance().span;
        let name = self.attr_name()?;
        let payload = self.payload()?;
        let close = self.close_delim(opening, opening_span, &TokenKind::RBracket, "]")?;
        Ok((
            Extension {
                name,
                payload: Box::new(payload),
            },
            opening_span.merge(close),
        ))
    }

    /// Zero or more postfix `[@attr]` attributes.
    fn postfix_attrs(&mut self) -> PResult<Vec<Attribute>> {
        let mut attrs = Vec::new();
        while self.check(&TokenKind::LBracketAt) {
            attrs.push(self.attribute("[@")?);
        }
        Ok(attrs)
    }

    /// Zero or more item-level `[@@attr]` attributes.
    fn item_attrs(&mut self) -> PResult<Vec<Attribute>> {
        let mut attrs = Vec::new();
        while self.check(&TokenKind::LBracketAtAt) {
            attrs.push(self.attribute("[@@")?);
        }
        Ok(attrs)
    }

    /// The `%ext` id of `let%ext` / `and%ext`, if present.
    fn binding_extension(&mut self) -> PResult<Option<Loc<String>>> {
        match &self.peek().kind {
            TokenKind::Infix3(op) if op == "%" => {
                self.advance();
                Ok(Some(self.attr_name()?))
            }
            _ => Ok(None),
        }
    }
}
