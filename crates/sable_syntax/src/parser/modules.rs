/// Structures, signatures, module expressions, and module types.
///
/// Item-sequence parsing also drives doc attachment: the comments trailing
/// each item are held in a [`LazyDocs`] thunk and classified once the next
/// item's start (or the terminator) is known.
impl<'a> Parser<'a> {
    fn at_terminator(&self, term: Terminator) -> bool {
        match term {
            Terminator::Eof => self.is_at_end(),
            Terminator::End => self.check_kw(Keyword::End) || self.is_at_end(),
            Terminator::Bracket => self.check(&TokenKind::RBracket) || self.is_at_end(),
        }
    }

    // ========================================================================
    // Structures
    // ========================================================================

    fn structure_items(&mut self, term: Terminator) -> PResult<Vec<StructureItem>> {
        let mut items: Vec<StructureItem> = Vec::new();
        let mut pending = LazyDocs::new(Rc::clone(&self.docs), self.prev_end());
        loop {
            while self.match_tok(&TokenKind::SemiSemi) {}
            if self.at_terminator(term) {
                let gap = pending.force(self.current_span().start, false);
                if let Some(post) = gap.post {
                    match items.last_mut() {
                        Some(last) => attach_str_attr(last, post),
                        None => items.push(docs::floating_str_item(post)),
                    }
                }
                items.extend(gap.floating.into_iter().map(docs::floating_str_item));
                break;
            }
            let gap = pending.force(self.current_span().start, true);
            items.extend(gap.floating.into_iter().map(docs::floating_str_item));
            let mut item = self.structure_item()?;
            if let Some(pre) = gap.pre {
                attach_str_attr(&mut item, pre);
            }
            for attr in self.item_attrs()? {
                attach_str_attr(&mut item, attr);
            }
            items.push(item);
            pending = LazyDocs::new(Rc::clone(&self.docs), self.prev_end());
        }
        Ok(items)
    }

    fn structure_item(&mut self) -> PResult<StructureItem> {
        let start = self.current_span().start;
        let desc = match &self.peek().kind {
            TokenKind::Keyword(Keyword::Let) => {
                let group = self.let_group()?;
                if self.match_kw(Keyword::In) {
                    // `let ... in e` at the top level is an evaluated
                    // expression, not a value item.
                    let body = self.expression()?;
                    let expr = group.into_expression(body, self.span_from(start));
                    StrDesc::Eval(expr, Vec::new())
                } else {
                    return Ok(group.into_structure_item());
                }
            }
            TokenKind::Keyword(Keyword::Type) => {
                self.advance();
                let mut decls = vec![self.type_declaration()?];
                while self.match_kw(Keyword::And) {
                    decls.push(self.type_declaration()?);
                }
                StrDesc::Type(decls)
            }
            TokenKind::Keyword(Keyword::Module) => {
                self.advance();
                if self.match_kw(Keyword::Type) {
                    StrDesc::ModType(self.module_type_decl(start)?)
                } else {
                    let name = self.uident("a module name")?;
                    self.expect_tok(&TokenKind::Equal, "'=' in a module binding")?;
                    let expr = self.module_expr()?;
                    StrDesc::Module(ModuleBinding {
                        name,
                        expr,
                        attrs: Vec::new(),
                        loc: Location::real(self.span_from(start)),
                    })
                }
            }
            TokenKind::Keyword(Keyword::Open) => {
                self.advance();
                let path = self.module_path()?;
                StrDesc::Open(path, Vec::new())
            }
            TokenKind::Keyword(Keyword::Class) => {
                self.advance();
                StrDesc::Class(self.class_declarations()?)
            }
            TokenKind::LBracketAtAtAt => StrDesc::Attribute(self.attribute("[@@@")?),
            TokenKind::LBracketPercentPercent => {
                let (ext, _) = self.extension("[%%")?;
                StrDesc::Extension(ext, Vec::new())
            }
            _ => StrDesc::Eval(self.expression()?, Vec::new()),
        };
        Ok(StructureItem::mk(
            desc,
            Location::real(self.span_from(start)),
        ))
    }

    /// `module type S` / `module type S = MT`, after `module type`.
    fn module_type_decl(&mut self, start: usize) -> PResult<ModTypeDecl> {
        let name = self.uident("a module type name")?;
        let mty = if self.match_tok(&TokenKind::Equal) {
            Some(self.module_type()?)
        } else {
            None
        };
        Ok(ModTypeDecl {
            name,
            mty,
            attrs: Vec::new(),
            loc: Location::real(self.span_from(start)),
        })
    }

    // ========================================================================
    // Module expressions
    // ========================================================================

    fn module_expr(&mut self) -> PResult<ModuleExpr> {
        let start_span = self.current_span();
        let start = start_span.start;
        let me = match &self.peek().kind {
            TokenKind::UIdent(_) => {
                let path = self.module_path()?;
                let loc = path.loc;
                ModuleExpr::mk(ModExprDesc::Ident(path), loc)
            }
            TokenKind::Keyword(Keyword::Struct) => {
                let opening_span = self.advance().span;
                let items = self.structure_items(Terminator::End)?;
                self.close_delim(
                    "struct",
                    opening_span,
                    &TokenKind::Keyword(Keyword::End),
                    "end",
                )?;
                ModuleExpr::mk(
                    ModExprDesc::Structure(items),
                    Location::real(self.span_from(start)),
                )
            }
            TokenKind::LParen => {
                let opening_span = self.advance().span;
                let inner = self.module_expr()?;
                let me = if self.match_tok(&TokenKind::Colon) {
                    let mty = self.module_type()?;
                    self.close_delim("(", opening_span, &TokenKind::RParen, ")")?;
                    ModuleExpr::mk(
                        ModExprDesc::Constraint(Box::new(inner), mty),
                        Location::real(self.span_from(start)),
                    )
                } else {
                    self.close_delim("(", opening_span, &TokenKind::RParen, ")")?;
                    inner
                };
                me
            }
            TokenKind::LBracketPercent => {
                let (ext, span) = self.extension("[%")?;
                ModuleExpr::mk(ModExprDesc::Extension(ext), Location::real(span))
            }
            _ => return Err(SyntaxError::expecting("a module expression", start_span)),
        };
        let attrs = self.postfix_attrs()?;
        Ok(me.with_attrs(attrs))
    }

    // ========================================================================
    // Module types
    // ========================================================================

    fn module_type(&mut self) -> PResult<ModuleType> {
        let start_span = self.current_span();
        let start = start_span.start;
        let mut mty = match &self.peek().kind {
            TokenKind::UIdent(_) => {
                let path = self.module_path()?;
                let loc = path.loc;
                ModuleType::mk(ModTypeDesc::Ident(path), loc)
            }
            TokenKind::Keyword(Keyword::Sig) => {
                let opening_span = self.advance().span;
                let items = self.signature_items(Terminator::End)?;
                self.close_delim(
                    "sig",
                    opening_span,
                    &TokenKind::Keyword(Keyword::End),
                    "end",
                )?;
                ModuleType::mk(
                    ModTypeDesc::Signature(items),
                    Location::real(self.span_from(start)),
                )
            }
            TokenKind::LParen => {
                let opening_span = self.advance().span;
                let inner = self.module_type()?;
                self.close_delim("(", opening_span, &TokenKind::RParen, ")")?;
                inner
            }
            TokenKind::LBracketPercent => {
                let (ext, span) = self.extension("[%")?;
                ModuleType::mk(ModTypeDesc::Extension(ext), Location::real(span))
            }
            _ => return Err(SyntaxError::expecting("a module type", start_span)),
        };
        while self.check_kw(Keyword::With) {
            self.advance();
            self.expect_kw(Keyword::Type, "'type' in a with constraint")?;
            let mut constraints = vec![self.with_constraint()?];
            while self.check_kw(Keyword::And)
                && self.peek_next().kind == TokenKind::Keyword(Keyword::Type)
            {
                self.advance();
                self.advance();
                constraints.push(self.with_constraint()?);
            }
            mty = ModuleType::mk(
                ModTypeDesc::With(Box::new(mty), constraints),
                Location::real(self.span_from(start)),
            );
        }
        let attrs = self.postfix_attrs()?;
        Ok(mty.with_attrs(attrs))
    }

    // ========================================================================
    // Signatures
    // ========================================================================

    fn signature_items(&mut self, term: Terminator) -> PResult<Vec<SignatureItem>> {
        let mut items: Vec<SignatureItem> = Vec::new();
        let mut pending = LazyDocs::new(Rc::clone(&self.docs), self.prev_end());
        loop {
            while self.match_tok(&TokenKind::SemiSemi) {}
            if self.at_terminator(term) {
                let gap = pending.force(self.current_span().start, false);
                if let Some(post) = gap.post {
                    match items.last_mut() {
                        Some(last) => attach_sig_attr(last, post),
                        None => items.push(docs::floating_sig_item(post)),
                    }
                }
                items.extend(gap.floating.into_iter().map(docs::floating_sig_item));
                break;
            }
            let gap = pending.force(self.current_span().start, true);
            items.extend(gap.floating.into_iter().map(docs::floating_sig_item));
            let mut item = self.signature_item()?;
            if let Some(pre) = gap.pre {
                attach_sig_attr(&mut item, pre);
            }
            for attr in self.item_attrs()? {
                attach_sig_attr(&mut item, attr);
            }
            items.push(item);
            pending = LazyDocs::new(Rc::clone(&self.docs), self.prev_end());
        }
        Ok(items)
    }

    fn signature_item(&mut self) -> PResult<SignatureItem> {
        let start_span = self.current_span();
        let start = start_span.start;
        let desc = match &self.peek().kind {
            TokenKind::Keyword(Keyword::Val) => {
                self.advance();
                let name = self.lident("a value name")?;
                self.expect_tok(&TokenKind::Colon, "':' in a value description")?;
                let ty = self.core_type()?;
                SigDesc::Value(ValueDesc {
                    name,
                    ty,
                    attrs: Vec::new(),
                    loc: Location::real(self.span_from(start)),
                })
            }
            TokenKind::Keyword(Keyword::Type) => {
                self.advance();
                let mut decls = vec![self.type_declaration()?];
                while self.match_kw(Keyword::And) {
                    decls.push(self.type_declaration()?);
                }
                SigDesc::Type(decls)
            }
            TokenKind::Keyword(Keyword::Module) => {
                self.advance();
                if self.match_kw(Keyword::Type) {
                    SigDesc::ModType(self.module_type_decl(start)?)
                } else {
                    let name = self.uident("a module name")?;
                    self.expect_tok(&TokenKind::Colon, "':' in a module declaration")?;
                    let mty = self.module_type()?;
                    SigDesc::Module(ModuleDecl {
                        name,
                        mty,
                        attrs: Vec::new(),
                        loc: Location::real(self.span_from(start)),
                    })
                }
            }
            TokenKind::Keyword(Keyword::Open) => {
                self.advance();
                let path = self.module_path()?;
                SigDesc::Open(path, Vec::new())
            }
            TokenKind::Keyword(Keyword::Class) => {
                self.advance();
                self.expect_kw(Keyword::Type, "'type' in a class type declaration")?;
                SigDesc::ClassType(self.class_type_declarations()?)
            }
            TokenKind::LBracketAtAtAt => SigDesc::Attribute(self.attribute("[@@@")?),
            TokenKind::LBracketPercentPercent => {
                let (ext, _) = self.extension("[%%")?;
                SigDesc::Extension(ext, Vec::new())
            }
            _ => return Err(SyntaxError::expecting("a signature item", start_span)),
        };
        Ok(SignatureItem::mk(
            desc,
            Location::real(self.span_from(start)),
        ))
    }
}
