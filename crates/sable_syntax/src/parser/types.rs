/// Core types, type declarations, and `with type` constraints.
impl<'a> Parser<'a> {
    // ========================================================================
    // Core types
    // ========================================================================

    /// `t`, `t1 -> t2` (right-associative), `t1 * t2`, `'a list`, `(module S)`.
    fn core_type(&mut self) -> PResult<CoreType> {
        let start = self.current_span().start;
        let lhs = self.tuple_type()?;
        if self.match_tok(&TokenKind::Arrow) {
            let rhs = self.core_type()?;
            let loc = Location::real(self.span_from(start));
            Ok(CoreType::mk(
                TypeDesc::Arrow(Box::new(lhs), Box::new(rhs)),
                loc,
            ))
        } else {
            Ok(lhs)
        }
    }

    fn tuple_type(&mut self) -> PResult<CoreType> {
        let start = self.current_span().start;
        let first = self.applied_type()?;
        if !self.check(&TokenKind::Star) {
            return Ok(first);
        }
        let mut parts = vec![first];
        while self.match_tok(&TokenKind::Star) {
            parts.push(self.applied_type()?);
        }
        let loc = Location::real(self.span_from(start));
        Ok(CoreType::mk(TypeDesc::Tuple(parts), loc))
    }

    /// Postfix type application: `int list`, `'a option array`.
    fn applied_type(&mut self) -> PResult<CoreType> {
        let start = self.current_span().start;
        let mut ty = self.atomic_type()?;
        while matches!(self.peek().kind, TokenKind::LIdent(_) | TokenKind::UIdent(_)) {
            let path = self.type_path()?;
            let loc = Location::real(self.span_from(start));
            ty = CoreType::mk(TypeDesc::Constr(path, vec![ty]), loc);
        }
        Ok(ty)
    }

    fn atomic_type(&mut self) -> PResult<CoreType> {
        let start_span = self.current_span();
        let start = start_span.start;
        let ty = match &self.peek().kind {
            TokenKind::Underscore => {
                self.advance();
                CoreType::mk(TypeDesc::Any, Location::real(start_span))
            }
            TokenKind::Quote => {
                self.advance();
                let name = self.lident("a type variable name")?;
                CoreType::mk(
                    TypeDesc::Var(name.txt),
                    Location::real(self.span_from(start)),
                )
            }
            TokenKind::LIdent(_) | TokenKind::UIdent(_) => {
                let path = self.type_path()?;
                let loc = Location::real(self.span_from(start));
                CoreType::mk(TypeDesc::Constr(path, Vec::new()), loc)
            }
            TokenKind::LParen => {
                let opening_span = self.advance().span;
                if self.check_kw(Keyword::Module) {
                    self.advance();
                    let mty = self.module_type()?;
                    let pkg = package::package_type(&mty)?;
                    self.close_delim("(", opening_span, &TokenKind::RParen, ")")?;
                    let loc = Location::real(self.span_from(start));
                    CoreType::mk(TypeDesc::Package(pkg), loc)
                } else {
                    let first = self.core_type()?;
                    if self.check(&TokenKind::Comma) {
                        // `('a, 'b) t`: the parenthesized group is a
                        // parameter list for the constructor that follows.
                        let mut args = vec![first];
                        while self.match_tok(&TokenKind::Comma) {
                            args.push(self.core_type()?);
                        }
                        self.close_delim("(", opening_span, &TokenKind::RParen, ")")?;
                        let path = self.type_path()?;
                        let loc = Location::real(self.span_from(start));
                        CoreType::mk(TypeDesc::Constr(path, args), loc)
                    } else {
                        self.close_delim("(", opening_span, &TokenKind::RParen, ")")?;
                        first
                    }
                }
            }
            TokenKind::LBracketPercent => {
                let (ext, span) = self.extension("[%")?;
                CoreType::mk(TypeDesc::Extension(ext), Location::real(span))
            }
            _ => return Err(SyntaxError::expecting("a type", start_span)),
        };
        let attrs = self.postfix_attrs()?;
        Ok(ty.with_attrs(attrs))
    }

    /// A type constructor path: `t`, `M.t`, `M.N.t`.
    fn type_path(&mut self) -> PResult<Loc<Longident>> {
        self.value_path()
    }

    // ========================================================================
    // Type declarations
    // ========================================================================

    /// One declaration of a `type ... and ...` group, after `type`/`and`.
    fn type_declaration(&mut self) -> PResult<TypeDecl> {
        let start = self.current_span().start;
        let params = self.type_params()?;
        let name = self.lident("a type name")?;
        let mut decl = TypeDecl::abstract_(name, Location::default());
        decl.params = params;
        if self.match_tok(&TokenKind::Equal) {
            if self.match_kw(Keyword::Private) {
                decl.private_ = PrivateFlag::Private;
            }
            if self.check(&TokenKind::Bar) || self.at_constructor_decl_start() {
                decl.kind = TypeKind::Variant(self.constructor_decls()?);
            } else {
                decl.manifest = Some(self.core_type()?);
            }
        }
        while self.check_kw(Keyword::Constraint) {
            let cstr_start = self.advance().span.start;
            let lhs = self.core_type()?;
            self.expect_tok(&TokenKind::Equal, "'=' in a constraint clause")?;
            let rhs = self.core_type()?;
            decl.cstrs
                .push((lhs, rhs, Location::real(self.span_from(cstr_start))));
        }
        decl.attrs = self.item_attrs()?;
        decl.loc = Location::real(self.span_from(start));
        Ok(decl)
    }

    /// `'a` or `('a, 'b)` before a declared type name; empty when absent.
    fn type_params(&mut self) -> PResult<Vec<CoreType>> {
        if self.check(&TokenKind::Quote) {
            return Ok(vec![self.atomic_type()?]);
        }
        // `(` here is ambiguous with nothing else: a declaration name is a
        // lowercase identifier, so parens can only open a parameter list.
        if !self.check(&TokenKind::LParen) {
            return Ok(Vec::new());
        }
        let opening_span = self.advance().span;
        let mut params = vec![self.atomic_type()?];
        while self.match_tok(&TokenKind::Comma) {
            params.push(self.atomic_type()?);
        }
        self.close_delim("(", opening_span, &TokenKind::RParen, ")")?;
        Ok(params)
    }

    /// A bare uppercase name after `=` opens a variant; a dotted one is the
    /// start of a qualified manifest like `M.t`.
    fn at_constructor_decl_start(&self) -> bool {
        matches!(self.peek().kind, TokenKind::UIdent(_))
            && !matches!(self.peek_next().kind, TokenKind::Dot)
    }

    fn constructor_decls(&mut self) -> PResult<Vec<ConstructorDecl>> {
        self.match_tok(&TokenKind::Bar);
        let mut decls = vec![self.constructor_decl()?];
        while self.match_tok(&TokenKind::Bar) {
            decls.push(self.constructor_decl()?);
        }
        Ok(decls)
    }

    fn constructor_decl(&mut self) -> PResult<ConstructorDecl> {
        let start = self.current_span().start;
        let name = self.uident("a constructor name")?;
        let mut args = Vec::new();
        if self.match_kw(Keyword::Of) {
            args.push(self.applied_type()?);
            while self.match_tok(&TokenKind::Star) {
                args.push(self.applied_type()?);
            }
        }
        let attrs = self.postfix_attrs()?;
        Ok(ConstructorDecl {
            name,
            args,
            attrs,
            loc: Location::real(self.span_from(start)),
        })
    }

    /// One `type path = decl` clause of a `with` refinement, after `type`.
    fn with_constraint(&mut self) -> PResult<WithConstraint> {
        let start = self.current_span().start;
        let params = self.type_params()?;
        let path = self.value_path()?;
        let name = Loc::new(path.txt.last().to_string(), path.loc);
        self.expect_tok(&TokenKind::Equal, "'=' in a 'with type' constraint")?;
        let mut decl = TypeDecl::abstract_(name, Location::default());
        decl.params = params;
        if self.match_kw(Keyword::Private) {
            decl.private_ = PrivateFlag::Private;
        }
        decl.manifest = Some(self.core_type()?);
        decl.loc = Location::real(self.span_from(start));
        Ok(WithConstraint::Type(path, decl))
    }
}
