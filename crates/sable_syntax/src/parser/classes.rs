/// Class expressions, class bodies, and class types.
impl<'a> Parser<'a> {
    /// `class c = CE and d = CE ...`, after `class`.
    fn class_declarations(&mut self) -> PResult<Vec<ClassDecl>> {
        let mut decls = vec![self.class_declaration()?];
        while self.match_kw(Keyword::And) {
            decls.push(self.class_declaration()?);
        }
        Ok(decls)
    }

    fn class_declaration(&mut self) -> PResult<ClassDecl> {
        let start = self.current_span().start;
        let name = self.lident("a class name")?;
        let mut params = Vec::new();
        while self.at_pattern_start() {
            params.push(self.atomic_pattern()?);
        }
        self.expect_tok(&TokenKind::Equal, "'=' in a class declaration")?;
        let mut expr = self.class_expr()?;
        for param in params.into_iter().rev() {
            let span = param.loc.span().merge(expr.loc.span());
            expr = ClassExpr::mk(
                ClassExprDesc::Fun(Box::new(param), Box::new(expr)),
                Location::ghost(span),
            );
        }
        Ok(ClassDecl {
            name,
            expr,
            attrs: Vec::new(),
            loc: Location::real(self.span_from(start)),
        })
    }

    fn class_expr(&mut self) -> PResult<ClassExpr> {
        let start_span = self.current_span();
        let start = start_span.start;
        let ce = match &self.peek().kind {
            TokenKind::Keyword(Keyword::Fun) => {
                self.advance();
                let mut params = vec![self.atomic_pattern()?];
                while self.at_pattern_start() {
                    params.push(self.atomic_pattern()?);
                }
                self.expect_tok(&TokenKind::Arrow, "'->' after fun parameters")?;
                let body = self.class_expr()?;
                let whole = self.span_from(start);
                let mut expr = body;
                for param in params.into_iter().rev() {
                    let span = param.loc.span().merge(expr.loc.span());
                    expr = ClassExpr::mk(
                        ClassExprDesc::Fun(Box::new(param), Box::new(expr)),
                        Location::ghost(span),
                    );
                }
                expr.loc = Location::real(whole);
                expr
            }
            TokenKind::Keyword(Keyword::Let) => {
                let group = self.let_group()?;
                self.expect_kw(Keyword::In, "'in' after let bindings")?;
                let body = self.class_expr()?;
                group.into_class_expr(body, self.span_from(start))?
            }
            TokenKind::Keyword(Keyword::Object) => self.class_structure()?,
            TokenKind::LBracket => {
                let opening_span = self.advance().span;
                let mut args = vec![self.core_type()?];
                while self.match_tok(&TokenKind::Comma) {
                    args.push(self.core_type()?);
                }
                self.close_delim("[", opening_span, &TokenKind::RBracket, "]")?;
                let path = self.value_path()?;
                ClassExpr::mk(
                    ClassExprDesc::Constr(path, args),
                    Location::real(self.span_from(start)),
                )
            }
            TokenKind::LIdent(_) | TokenKind::UIdent(_) => {
                let path = self.value_path()?;
                let loc = path.loc;
                ClassExpr::mk(ClassExprDesc::Constr(path, Vec::new()), loc)
            }
            TokenKind::LBracketPercent => {
                let (ext, span) = self.extension("[%")?;
                ClassExpr::mk(ClassExprDesc::Extension(ext), Location::real(span))
            }
            _ => return Err(SyntaxError::expecting("a class expression", start_span)),
        };
        let attrs = self.postfix_attrs()?;
        Ok(ce.with_attrs(attrs))
    }

    /// `object (self) fields end`, with the current token at `object`.
    fn class_structure(&mut self) -> PResult<ClassExpr> {
        let opening_span = self.advance().span;
        let self_pat = if self.check(&TokenKind::LParen) {
            let paren_span = self.advance().span;
            let pat = self.pattern()?;
            self.close_delim("(", paren_span, &TokenKind::RParen, ")")?;
            Some(pat)
        } else {
            None
        };
        let mut fields = Vec::new();
        while !self.check_kw(Keyword::End) && !self.is_at_end() {
            fields.push(self.class_field()?);
        }
        let close = self.close_delim(
            "object",
            opening_span,
            &TokenKind::Keyword(Keyword::End),
            "end",
        )?;
        Ok(ClassExpr::mk(
            ClassExprDesc::Structure(ClassStructure { self_pat, fields }),
            Location::real(opening_span.merge(close)),
        ))
    }

    fn class_field(&mut self) -> PResult<ClassField> {
        let start_span = self.current_span();
        let start = start_span.start;
        let desc = match &self.peek().kind {
            TokenKind::Keyword(Keyword::Val) => {
                self.advance();
                let mutable = if self.match_kw(Keyword::Mutable) {
                    MutableFlag::Mutable
                } else {
                    MutableFlag::Immutable
                };
                let name = self.lident("an instance variable name")?;
                self.expect_tok(&TokenKind::Equal, "'=' in a val field")?;
                let expr = self.expression()?;
                ClassFieldDesc::Val(name, mutable, expr)
            }
            TokenKind::Keyword(Keyword::Method) => {
                self.advance();
                let private = if self.match_kw(Keyword::Private) {
                    PrivateFlag::Private
                } else {
                    PrivateFlag::Public
                };
                let name = self.lident("a method name")?;
                let mut params = Vec::new();
                while self.at_pattern_start() {
                    params.push(self.atomic_pattern()?);
                }
                self.expect_tok(&TokenKind::Equal, "'=' in a method")?;
                let mut expr = self.expression()?;
                for param in params.into_iter().rev() {
                    let span = param.loc.span().merge(expr.loc.span());
                    expr = Expression::mk(
                        ExprDesc::Fun(Box::new(param), Box::new(expr)),
                        Location::ghost(span),
                    );
                }
                ClassFieldDesc::Method(name, private, expr)
            }
            TokenKind::Keyword(Keyword::Initializer) => {
                self.advance();
                ClassFieldDesc::Initializer(self.expression()?)
            }
            TokenKind::LBracketAtAtAt => ClassFieldDesc::Attribute(self.attribute("[@@@")?),
            TokenKind::LBracketPercentPercent => {
                let (ext, _) = self.extension("[%%")?;
                ClassFieldDesc::Extension(ext)
            }
            _ => return Err(SyntaxError::expecting("a class field", start_span)),
        };
        let attrs = self.item_attrs()?;
        Ok(ClassField::mk(desc, Location::real(self.span_from(start))).with_attrs(attrs))
    }

    // ========================================================================
    // Class types
    // ========================================================================

    /// `class type ct = CT and ...`, after `class type`.
    fn class_type_declarations(&mut self) -> PResult<Vec<ClassTypeDecl>> {
        let mut decls = vec![self.class_type_declaration()?];
        while self.match_kw(Keyword::And) {
            decls.push(self.class_type_declaration()?);
        }
        Ok(decls)
    }

    fn class_type_declaration(&mut self) -> PResult<ClassTypeDecl> {
        let start = self.current_span().start;
        let name = self.lident("a class type name")?;
        self.expect_tok(&TokenKind::Equal, "'=' in a class type declaration")?;
        let ty = self.class_type()?;
        Ok(ClassTypeDecl {
            name,
            ty,
            attrs: Vec::new(),
            loc: Location::real(self.span_from(start)),
        })
    }

    fn class_type(&mut self) -> PResult<ClassType> {
        let start_span = self.current_span();
        let start = start_span.start;
        match &self.peek().kind {
            TokenKind::Keyword(Keyword::Object) => self.class_signature(),
            TokenKind::LBracketPercent => {
                let (ext, span) = self.extension("[%")?;
                Ok(ClassType::mk(
                    ClassTypeDesc::Extension(ext),
                    Location::real(span),
                ))
            }
            TokenKind::LBracket => {
                let opening_span = self.advance().span;
                let mut args = vec![self.core_type()?];
                while self.match_tok(&TokenKind::Comma) {
                    args.push(self.core_type()?);
                }
                self.close_delim("[", opening_span, &TokenKind::RBracket, "]")?;
                let path = self.value_path()?;
                Ok(ClassType::mk(
                    ClassTypeDesc::Constr(path, args),
                    Location::real(self.span_from(start)),
                ))
            }
            _ => {
                // `t -> CT` or a class path; both start as a core type.
                let ty = self.tuple_type()?;
                if self.match_tok(&TokenKind::Arrow) {
                    let ct = self.class_type()?;
                    return Ok(ClassType::mk(
                        ClassTypeDesc::Arrow(Box::new(ty), Box::new(ct)),
                        Location::real(self.span_from(start)),
                    ));
                }
                match ty.desc {
                    TypeDesc::Constr(path, args) => Ok(ClassType::mk(
                        ClassTypeDesc::Constr(path, args),
                        ty.loc,
                    )),
                    _ => Err(SyntaxError::expecting("a class type", start_span)),
                }
            }
        }
    }

    /// `object ('self) fields end`, with the current token at `object`.
    fn class_signature(&mut self) -> PResult<ClassType> {
        let opening_span = self.advance().span;
        let self_ty = if self.check(&TokenKind::LParen) {
            let paren_span = self.advance().span;
            let ty = self.core_type()?;
            self.close_delim("(", paren_span, &TokenKind::RParen, ")")?;
            Some(ty)
        } else {
            None
        };
        let mut fields = Vec::new();
        while !self.check_kw(Keyword::End) && !self.is_at_end() {
            fields.push(self.class_type_field()?);
        }
        let close = self.close_delim(
            "object",
            opening_span,
            &TokenKind::Keyword(Keyword::End),
            "end",
        )?;
        Ok(ClassType::mk(
            ClassTypeDesc::Signature(ClassSignature { self_ty, fields }),
            Location::real(opening_span.merge(close)),
        ))
    }

    fn class_type_field(&mut self) -> PResult<ClassTypeField> {
        let start_span = self.current_span();
        let start = start_span.start;
        let desc = match &self.peek().kind {
            TokenKind::Keyword(Keyword::Val) => {
                self.advance();
                let mutable = if self.match_kw(Keyword::Mutable) {
                    MutableFlag::Mutable
                } else {
                    MutableFlag::Immutable
                };
                let name = self.lident("an instance variable name")?;
                self.expect_tok(&TokenKind::Colon, "':' in a val description")?;
                ClassTypeFieldDesc::Val(name, mutable, self.core_type()?)
            }
            TokenKind::Keyword(Keyword::Method) => {
                self.advance();
                let private = if self.match_kw(Keyword::Private) {
                    PrivateFlag::Private
                } else {
                    PrivateFlag::Public
                };
                let name = self.lident("a method name")?;
                self.expect_tok(&TokenKind::Colon, "':' in a method description")?;
                ClassTypeFieldDesc::Method(name, private, self.core_type()?)
            }
            TokenKind::Keyword(Keyword::Constraint) => {
                self.advance();
                let lhs = self.core_type()?;
                self.expect_tok(&TokenKind::Equal, "'=' in a constraint clause")?;
                let rhs = self.core_type()?;
                ClassTypeFieldDesc::Constraint(lhs, rhs)
            }
            TokenKind::LBracketAtAtAt => {
                ClassTypeFieldDesc::Attribute(self.attribute("[@@@")?)
            }
            TokenKind::LBracketPercentPercent => {
                let (ext, _) = self.extension("[%%")?;
                ClassTypeFieldDesc::Extension(ext)
            }
            _ => return Err(SyntaxError::expecting("a class type field", start_span)),
        };
        let attrs = self.item_attrs()?;
        Ok(ClassTypeField::mk(desc, Location::real(self.span_from(start))).with_attrs(attrs))
    }
}
