/// Expressions.
///
/// The precedence ladder, loosest first: `;` sequences; `let`/`fun`/`match`/
/// `if`; `,` tuples; `||`; `&&`; comparison operators; `@ ^` (right); `::`
/// (right); additive; multiplicative; `**` (right); unary; application;
/// postfix (field access, indexing sugar, attributes); atoms. Symbolic
/// operators desugar through `crate::sugar` into applications of identifiers
/// spelled like the operator.
impl<'a> Parser<'a> {
    /// `e1; e2; ...` (right-associative sequencing).
    fn expression(&mut self) -> PResult<Expression> {
        let start = self.current_span().start;
        let first = self.expr_nonseq()?;
        if self.check(&TokenKind::Semi) && self.at_expression_start_at(self.pos + 1) {
            self.advance();
            let rest = self.expression()?;
            let loc = Location::real(self.span_from(start));
            return Ok(Expression::mk(
                ExprDesc::Sequence(Box::new(first), Box::new(rest)),
                loc,
            ));
        }
        Ok(first)
    }

    fn expr_nonseq(&mut self) -> PResult<Expression> {
        match self.peek().kind {
            TokenKind::Keyword(Keyword::Let) => self.let_expression(),
            TokenKind::Keyword(Keyword::Fun) => self.fun_expression(),
            TokenKind::Keyword(Keyword::Match) => self.match_expression(),
            TokenKind::Keyword(Keyword::If) => self.if_expression(),
            _ => self.tuple_expr(),
        }
    }

    fn at_expression_start_at(&self, pos: usize) -> bool {
        let Some(token) = self.tokens.get(pos) else {
            return false;
        };
        matches!(
            token.kind,
            TokenKind::LIdent(_)
                | TokenKind::UIdent(_)
                | TokenKind::Int { .. }
                | TokenKind::Float { .. }
                | TokenKind::Char(_)
                | TokenKind::String { .. }
                | TokenKind::LParen
                | TokenKind::LBracket
                | TokenKind::LBracketBar
                | TokenKind::LBrace
                | TokenKind::LBracketPercent
                | TokenKind::PrefixOp(_)
                | TokenKind::Minus
                | TokenKind::MinusDot
                | TokenKind::Plus
                | TokenKind::PlusDot
                | TokenKind::Keyword(
                    Keyword::Let
                        | Keyword::Fun
                        | Keyword::Match
                        | Keyword::If
                        | Keyword::Begin
                        | Keyword::True
                        | Keyword::False
                )
        )
    }

    // ========================================================================
    // Binding forms
    // ========================================================================

    /// `let [rec] p = e and ... in body` or `let open M in body`.
    fn let_expression(&mut self) -> PResult<Expression> {
        let start = self.current_span().start;
        if self.peek_next().kind == TokenKind::Keyword(Keyword::Open) {
            self.advance();
            self.advance();
            let path = self.module_path()?;
            self.expect_kw(Keyword::In, "'in' after an open")?;
            let body = self.expression()?;
            let loc = Location::real(self.span_from(start));
            return Ok(Expression::mk(
                ExprDesc::Open(path, Box::new(body)),
                loc,
            ));
        }
        let group = self.let_group()?;
        self.expect_kw(Keyword::In, "'in' after let bindings")?;
        let body = self.expression()?;
        Ok(group.into_expression(body, self.span_from(start)))
    }

    /// Parse `let[%ext] [rec] binding (and binding)*`, leaving the token
    /// after the last binding (usually `in` or the next item) current.
    fn let_group(&mut self) -> PResult<LetBindingGroup> {
        let start = self.current_span().start;
        self.expect_kw(Keyword::Let, "'let'")?;
        let extension = self.binding_extension()?;
        let rec_flag = if self.match_kw(Keyword::Rec) {
            RecFlag::Recursive
        } else {
            RecFlag::Nonrecursive
        };
        let binding = self.value_binding()?;
        let mut group = LetBindingGroup::start(
            binding,
            rec_flag,
            extension,
            Location::real(self.span_from(start)),
        );
        while self.check_kw(Keyword::And) {
            self.advance();
            let extension = self.binding_extension()?;
            let binding = self.value_binding()?;
            group = group.and_then(binding, extension)?;
        }
        Ok(group)
    }

    /// One `p params = e` binding. Parameters fold into nested ghost `fun`
    /// nodes; a `: t` annotation wraps the right-hand side.
    fn value_binding(&mut self) -> PResult<ValueBinding> {
        let start = self.current_span().start;
        let pat = self.atomic_pattern()?;
        let mut params = Vec::new();
        while self.at_pattern_start() {
            params.push(self.atomic_pattern()?);
        }
        let annot = if self.match_tok(&TokenKind::Colon) {
            Some(self.core_type()?)
        } else {
            None
        };
        self.expect_tok(&TokenKind::Equal, "'=' in a binding")?;
        let mut expr = self.expr_nonseq()?;
        if let Some(ty) = annot {
            let span = ty.loc.span().merge(expr.loc.span());
            expr = Expression::mk(
                ExprDesc::Constraint(Box::new(expr), ty),
                Location::ghost(span),
            );
        }
        for param in params.into_iter().rev() {
            let span = param.loc.span().merge(expr.loc.span());
            expr = Expression::mk(
                ExprDesc::Fun(Box::new(param), Box::new(expr)),
                Location::ghost(span),
            );
        }
        let attrs = self.item_attrs()?;
        Ok(ValueBinding::mk(
            pat,
            expr,
            attrs,
            Location::real(self.span_from(start)),
        ))
    }

    fn fun_expression(&mut self) -> PResult<Expression> {
        let start = self.current_span().start;
        self.advance();
        let mut params = vec![self.atomic_pattern()?];
        while self.at_pattern_start() {
            params.push(self.atomic_pattern()?);
        }
        self.expect_tok(&TokenKind::Arrow, "'->' after fun parameters")?;
        let body = self.expression()?;
        let whole = self.span_from(start);
        let mut expr = body;
        for param in params.into_iter().rev() {
            let span = param.loc.span().merge(expr.loc.span());
            expr = Expression::mk(
                ExprDesc::Fun(Box::new(param), Box::new(expr)),
                Location::ghost(span),
            );
        }
        expr.loc = Location::real(whole);
        Ok(expr)
    }

    fn match_expression(&mut self) -> PResult<Expression> {
        let start = self.current_span().start;
        self.advance();
        let scrutinee = self.expression()?;
        self.expect_kw(Keyword::With, "'with' after a match scrutinee")?;
        let cases = self.match_cases()?;
        let loc = Location::real(self.span_from(start));
        Ok(Expression::mk(
            ExprDesc::Match(Box::new(scrutinee), cases),
            loc,
        ))
    }

    fn match_cases(&mut self) -> PResult<Vec<Case>> {
        self.match_tok(&TokenKind::Bar);
        let mut cases = vec![self.match_case()?];
        while self.match_tok(&TokenKind::Bar) {
            cases.push(self.match_case()?);
        }
        Ok(cases)
    }

    fn match_case(&mut self) -> PResult<Case> {
        let pat = self.pattern()?;
        let guard = if self.match_kw(Keyword::When) {
            Some(self.expr_nonseq()?)
        } else {
            None
        };
        self.expect_tok(&TokenKind::Arrow, "'->' in a match case")?;
        let body = self.expression()?;
        Ok(Case { pat, guard, body })
    }

    fn if_expression(&mut self) -> PResult<Expression> {
        let start = self.current_span().start;
        self.advance();
        let cond = self.expression()?;
        self.expect_kw(Keyword::Then, "'then' after a condition")?;
        let then_ = self.expr_nonseq()?;
        let else_ = if self.match_kw(Keyword::Else) {
            Some(Box::new(self.expr_nonseq()?))
        } else {
            None
        };
        let loc = Location::real(self.span_from(start));
        Ok(Expression::mk(
            ExprDesc::IfThenElse(Box::new(cond), Box::new(then_), else_),
            loc,
        ))
    }

    // ========================================================================
    // Operator ladder
    // ========================================================================

    fn tuple_expr(&mut self) -> PResult<Expression> {
        let start = self.current_span().start;
        let first = self.or_expr()?;
        if !self.check(&TokenKind::Comma) {
            return Ok(first);
        }
        let mut parts = vec![first];
        while self.match_tok(&TokenKind::Comma) {
            parts.push(self.or_expr()?);
        }
        let loc = Location::real(self.span_from(start));
        Ok(Expression::mk(ExprDesc::Tuple(parts), loc))
    }

    fn or_expr(&mut self) -> PResult<Expression> {
        let start = self.current_span().start;
        let lhs = self.and_expr()?;
        if self.check(&TokenKind::BarBar) {
            let op_span = self.advance().span;
            let rhs = self.or_expr()?;
            return Ok(sugar::infix(lhs, "||", op_span, rhs, self.span_from(start)));
        }
        Ok(lhs)
    }

    fn and_expr(&mut self) -> PResult<Expression> {
        let start = self.current_span().start;
        let lhs = self.cmp_expr()?;
        if self.check(&TokenKind::AmpAmp) {
            let op_span = self.advance().span;
            let rhs = self.and_expr()?;
            return Ok(sugar::infix(lhs, "&&", op_span, rhs, self.span_from(start)));
        }
        Ok(lhs)
    }

    fn cmp_expr(&mut self) -> PResult<Expression> {
        let start = self.current_span().start;
        let mut lhs = self.concat_expr()?;
        loop {
            let op = match &self.peek().kind {
                TokenKind::Infix0(op) => op.clone(),
                TokenKind::Equal => "=".to_string(),
                _ => break,
            };
            let op_span = self.advance().span;
            let rhs = self.concat_expr()?;
            lhs = sugar::infix(lhs, &op, op_span, rhs, self.span_from(start));
        }
        Ok(lhs)
    }

    fn concat_expr(&mut self) -> PResult<Expression> {
        let start = self.current_span().start;
        let lhs = self.cons_expr()?;
        if let TokenKind::Infix1(op) = &self.peek().kind {
            let op = op.clone();
            let op_span = self.advance().span;
            let rhs = self.concat_expr()?;
            return Ok(sugar::infix(lhs, &op, op_span, rhs, self.span_from(start)));
        }
        Ok(lhs)
    }

    /// `x :: xs` builds a cons constructor cell directly; the cell is real,
    /// its argument pair ghost, matching the shape of list-literal sugar.
    fn cons_expr(&mut self) -> PResult<Expression> {
        let start = self.current_span().start;
        let head = self.add_expr()?;
        if !self.check(&TokenKind::ColonColon) {
            return Ok(head);
        }
        let op_span = self.advance().span;
        let tail = self.cons_expr()?;
        let whole = Location::real(self.span_from(start));
        let pair_span = head.loc.span().merge(tail.loc.span());
        let pair = Expression::mk(
            ExprDesc::Tuple(vec![head, tail]),
            Location::ghost(pair_span),
        );
        Ok(Expression::mk(
            ExprDesc::Construct(
                Loc::new(Longident::ident(sugar::CONS), Location::ghost(op_span)),
                Some(Box::new(pair)),
            ),
            whole,
        ))
    }

    fn add_expr(&mut self) -> PResult<Expression> {
        let start = self.current_span().start;
        let mut lhs = self.mul_expr()?;
        loop {
            let op = match &self.peek().kind {
                TokenKind::Plus => "+".to_string(),
                TokenKind::PlusDot => "+.".to_string(),
                TokenKind::Minus => "-".to_string(),
                TokenKind::MinusDot => "-.".to_string(),
                TokenKind::Infix2(op) => op.clone(),
                _ => break,
            };
            let op_span = self.advance().span;
            let rhs = self.mul_expr()?;
            lhs = sugar::infix(lhs, &op, op_span, rhs, self.span_from(start));
        }
        Ok(lhs)
    }

    fn mul_expr(&mut self) -> PResult<Expression> {
        let start = self.current_span().start;
        let mut lhs = self.pow_expr()?;
        loop {
            let op = match &self.peek().kind {
                TokenKind::Star => "*".to_string(),
                TokenKind::Infix3(op) => op.clone(),
                _ => break,
            };
            let op_span = self.advance().span;
            let rhs = self.pow_expr()?;
            lhs = sugar::infix(lhs, &op, op_span, rhs, self.span_from(start));
        }
        Ok(lhs)
    }

    fn pow_expr(&mut self) -> PResult<Expression> {
        let start = self.current_span().start;
        let lhs = self.unary_expr()?;
        if let TokenKind::Infix4(op) = &self.peek().kind {
            let op = op.clone();
            let op_span = self.advance().span;
            let rhs = self.pow_expr()?;
            return Ok(sugar::infix(lhs, &op, op_span, rhs, self.span_from(start)));
        }
        Ok(lhs)
    }

    fn unary_expr(&mut self) -> PResult<Expression> {
        let start = self.current_span().start;
        let op = match &self.peek().kind {
            TokenKind::Minus => "-".to_string(),
            TokenKind::MinusDot => "-.".to_string(),
            TokenKind::Plus => "+".to_string(),
            TokenKind::PlusDot => "+.".to_string(),
            TokenKind::PrefixOp(op) => op.clone(),
            _ => return self.app_expr(),
        };
        let op_span = self.advance().span;
        let operand = self.unary_expr()?;
        Ok(sugar::prefix(&op, op_span, operand, self.span_from(start)))
    }

    // ========================================================================
    // Application and postfix forms
    // ========================================================================

    fn app_expr(&mut self) -> PResult<Expression> {
        let start = self.current_span().start;
        let head = self.postfix_expr()?;
        if !self.at_simple_expr_start() {
            return Ok(head);
        }
        // A bare constructor takes a single argument; everything else is a
        // plain application over the following atoms.
        if head.attrs.is_empty() {
            if let ExprDesc::Construct(path, None) = &head.desc {
                let path = path.clone();
                let arg = self.postfix_expr()?;
                let loc = Location::real(self.span_from(start));
                return Ok(Expression::mk(
                    ExprDesc::Construct(path, Some(Box::new(arg))),
                    loc,
                ));
            }
        }
        let mut args = Vec::new();
        while self.at_simple_expr_start() {
            args.push(self.postfix_expr()?);
        }
        let loc = Location::real(self.span_from(start));
        Ok(Expression::mk(
            ExprDesc::Apply(Box::new(head), args),
            loc,
        ))
    }

    fn at_simple_expr_start(&self) -> bool {
        matches!(
            self.peek().kind,
            TokenKind::LIdent(_)
                | TokenKind::UIdent(_)
                | TokenKind::Int { .. }
                | TokenKind::Float { .. }
                | TokenKind::Char(_)
                | TokenKind::String { .. }
                | TokenKind::LParen
                | TokenKind::LBracket
                | TokenKind::LBracketBar
                | TokenKind::LBrace
                | TokenKind::LBracketPercent
                | TokenKind::Keyword(Keyword::Begin | Keyword::True | Keyword::False)
        )
    }

    /// Field access, indexing sugar, and postfix attributes.
    fn postfix_expr(&mut self) -> PResult<Expression> {
        let start = self.current_span().start;
        let mut expr = self.atomic_expr()?;
        loop {
            match &self.peek().kind {
                TokenKind::Dot => match &self.peek_next().kind {
                    TokenKind::LIdent(_) | TokenKind::UIdent(_) => {
                        self.advance();
                        let label = self.value_path()?;
                        let loc = Location::real(self.span_from(start));
                        expr = Expression::mk(
                            ExprDesc::Field(Box::new(expr), label),
                            loc,
                        );
                    }
                    TokenKind::LParen => {
                        expr = self.builtin_index(expr, BracketKind::Paren, start)?;
                    }
                    TokenKind::LBracket => {
                        expr = self.builtin_index(expr, BracketKind::Bracket, start)?;
                    }
                    TokenKind::LBrace => {
                        expr = self.builtin_index(expr, BracketKind::Brace, start)?;
                    }
                    _ => break,
                },
                TokenKind::DotOp(_) => {
                    expr = self.dotop_index(expr, start)?;
                }
                TokenKind::LBracketAt => {
                    let attrs = self.postfix_attrs()?;
                    expr = expr.with_attrs(attrs);
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    /// `a.(i)`, `s.[i]`, `b.{i, j}`, each with an optional `<- v` suffix.
    /// The current token is the dot.
    fn builtin_index(
        &mut self,
        object: Expression,
        kind: BracketKind,
        start: usize,
    ) -> PResult<Expression> {
        let dot_span = self.advance().span;
        let opening_span = self.advance().span;
        let (closer, opening, closing): (&TokenKind, &'static str, &'static str) = match kind {
            BracketKind::Paren => (&TokenKind::RParen, "(", ")"),
            BracketKind::Bracket => (&TokenKind::RBracket, "[", "]"),
            BracketKind::Brace => (&TokenKind::RBrace, "{", "}"),
        };
        // Brace coordinates are comma-separated, so each one parses below
        // the tuple level; the comma stays a coordinate separator.
        let coords = if kind == BracketKind::Brace {
            let mut coords = vec![self.or_expr()?];
            while self.match_tok(&TokenKind::Comma) {
                coords.push(self.or_expr()?);
            }
            coords
        } else {
            vec![self.expr_nonseq()?]
        };
        self.close_delim(opening, opening_span, closer, closing)?;
        let assign = self.index_assign()?;
        Ok(sugar::builtin_index(
            &self.config,
            object,
            kind,
            coords,
            assign,
            dot_span.merge(opening_span),
            self.span_from(start),
        ))
    }

    /// `a.%(i)`, `a.%[i; j] <- v`, ... The current token is the dot-operator.
    fn dotop_index(&mut self, object: Expression, start: usize) -> PResult<Expression> {
        let (op, op_span) = match &self.peek().kind {
            TokenKind::DotOp(op) => (op.clone(), self.peek().span),
            _ => unreachable!("caller checked for a dot-operator"),
        };
        self.advance();
        let (kind, closer, opening, closing): (BracketKind, &TokenKind, &'static str, &'static str) =
            match &self.peek().kind {
                TokenKind::LParen => (BracketKind::Paren, &TokenKind::RParen, "(", ")"),
                TokenKind::LBracket => (BracketKind::Bracket, &TokenKind::RBracket, "[", "]"),
                TokenKind::LBrace => (BracketKind::Brace, &TokenKind::RBrace, "{", "}"),
                _ => {
                    return Err(SyntaxError::expecting(
                        "'(', '[' or '{' after an indexing operator",
                        self.current_span(),
                    ));
                }
            };
        let opening_span = self.advance().span;
        let mut coords = vec![self.expr_nonseq()?];
        while self.match_tok(&TokenKind::Semi) {
            coords.push(self.expr_nonseq()?);
        }
        self.close_delim(opening, opening_span, closer, closing)?;
        let assign = self.index_assign()?;
        Ok(sugar::dotop_index(
            object,
            &op,
            kind,
            coords,
            assign,
            op_span,
            self.span_from(start),
        ))
    }

    fn index_assign(&mut self) -> PResult<Option<Expression>> {
        if self.match_tok(&TokenKind::LessMinus) {
            Ok(Some(self.expr_nonseq()?))
        } else {
            Ok(None)
        }
    }

    // ========================================================================
    // Atoms
    // ========================================================================

    fn atomic_expr(&mut self) -> PResult<Expression> {
        let start_span = self.current_span();
        let start = start_span.start;
        match &self.peek().kind {
            TokenKind::Int { .. }
            | TokenKind::Float { .. }
            | TokenKind::Char(_)
            | TokenKind::String { .. } => {
                let constant = self.constant()?;
                Ok(Expression::mk(
                    ExprDesc::Constant(constant),
                    Location::real(start_span),
                ))
            }
            TokenKind::Keyword(kw @ (Keyword::True | Keyword::False)) => {
                let name = if *kw == Keyword::True { "true" } else { "false" };
                self.advance();
                let loc = Location::real(start_span);
                Ok(Expression::mk(
                    ExprDesc::Construct(Loc::new(Longident::ident(name), loc), None),
                    loc,
                ))
            }
            TokenKind::LIdent(name) => {
                let name = name.clone();
                self.advance();
                let loc = Location::real(start_span);
                Ok(Expression::mk(
                    ExprDesc::Ident(Loc::new(Longident::ident(name), loc)),
                    loc,
                ))
            }
            TokenKind::UIdent(_) => self.path_expr(),
            TokenKind::LParen => self.paren_expr(),
            TokenKind::Keyword(Keyword::Begin) => {
                let opening_span = self.advance().span;
                if self.check_kw(Keyword::End) {
                    let close = self.advance().span;
                    let loc = Location::real(opening_span.merge(close));
                    return Ok(Expression::mk(
                        ExprDesc::Construct(Loc::new(Longident::ident("()"), loc), None),
                        loc,
                    ));
                }
                let inner = self.expression()?;
                self.close_delim(
                    "begin",
                    opening_span,
                    &TokenKind::Keyword(Keyword::End),
                    "end",
                )?;
                Ok(Expression {
                    loc: Location::real(self.span_from(start)),
                    ..inner
                })
            }
            TokenKind::LBracket => self.list_literal(),
            TokenKind::LBracketBar => {
                let opening_span = self.advance().span;
                let mut elements = Vec::new();
                if !self.check(&TokenKind::BarRBracket) {
                    elements.push(self.expr_nonseq()?);
                    while self.match_tok(&TokenKind::Semi) {
                        if self.check(&TokenKind::BarRBracket) {
                            break;
                        }
                        elements.push(self.expr_nonseq()?);
                    }
                }
                self.close_delim("[|", opening_span, &TokenKind::BarRBracket, "|]")?;
                Ok(Expression::mk(
                    ExprDesc::Array(elements),
                    Location::real(self.span_from(start)),
                ))
            }
            TokenKind::LBrace => self.record_literal(),
            TokenKind::LBracketPercent => {
                let (ext, span) = self.extension("[%")?;
                let loc = Location::real(span);
                Ok(Expression::mk(ExprDesc::Extension(ext), loc))
            }
            _ => Err(SyntaxError::expecting("an expression", start_span)),
        }
    }

    /// A path-led atom: a qualified identifier, a constructor, or one of the
    /// local-open forms `M.(e)`, `M.[...]`, `M.{...}`.
    fn path_expr(&mut self) -> PResult<Expression> {
        let start = self.current_span().start;
        let path = self.module_path()?;
        if self.check(&TokenKind::Dot) {
            match &self.peek_next().kind {
                TokenKind::LIdent(_) => {
                    self.advance();
                    let name = self.lident("an identifier")?;
                    let loc = Location::real(self.span_from(start));
                    return Ok(Expression::mk(
                        ExprDesc::Ident(Loc::new(path.txt.dot(name.txt), loc)),
                        loc,
                    ));
                }
                TokenKind::LParen => {
                    self.advance();
                    let opening_span = self.advance().span;
                    let body = self.expression()?;
                    self.close_delim("(", opening_span, &TokenKind::RParen, ")")?;
                    return Ok(sugar::local_open(path, body, self.span_from(start)));
                }
                TokenKind::LBracket => {
                    self.advance();
                    let body = self.list_literal()?;
                    return Ok(sugar::local_open(path, body, self.span_from(start)));
                }
                TokenKind::LBrace => {
                    self.advance();
                    let body = self.record_literal()?;
                    return Ok(sugar::local_open(path, body, self.span_from(start)));
                }
                _ => {}
            }
        }
        let loc = path.loc;
        Ok(Expression::mk(ExprDesc::Construct(path, None), loc))
    }

    fn paren_expr(&mut self) -> PResult<Expression> {
        let start = self.current_span().start;
        let opening_span = self.advance().span;
        if self.check(&TokenKind::RParen) {
            let close = self.advance().span;
            let loc = Location::real(opening_span.merge(close));
            return Ok(Expression::mk(
                ExprDesc::Construct(Loc::new(Longident::ident("()"), loc), None),
                loc,
            ));
        }
        // `(+)`, `(^)`, ...: an operator used as an ordinary identifier.
        if let Some(name) = operator_image(&self.peek().kind) {
            if self.peek_next().kind == TokenKind::RParen {
                self.advance();
                self.advance();
                let loc = Location::real(self.span_from(start));
                return Ok(Expression::mk(
                    ExprDesc::Ident(Loc::new(Longident::ident(name), loc)),
                    loc,
                ));
            }
        }
        let inner = self.expression()?;
        if self.match_tok(&TokenKind::Colon) {
            let ty = self.core_type()?;
            self.close_delim("(", opening_span, &TokenKind::RParen, ")")?;
            let loc = Location::real(self.span_from(start));
            return Ok(Expression::mk(
                ExprDesc::Constraint(Box::new(inner), ty),
                loc,
            ));
        }
        self.close_delim("(", opening_span, &TokenKind::RParen, ")")?;
        Ok(inner)
    }

    /// `[e1; ...; en]`, desugared into a cons chain. The current token is the
    /// opening bracket.
    fn list_literal(&mut self) -> PResult<Expression> {
        let opening_span = self.advance().span;
        let mut elements = Vec::new();
        if !self.check(&TokenKind::RBracket) {
            elements.push(self.expr_nonseq()?);
            while self.match_tok(&TokenKind::Semi) {
                if self.check(&TokenKind::RBracket) {
                    break;
                }
                elements.push(self.expr_nonseq()?);
            }
        }
        let nil_span = self.close_delim("[", opening_span, &TokenKind::RBracket, "]")?;
        Ok(sugar::list_expr(
            elements,
            nil_span,
            opening_span.merge(nil_span),
        ))
    }

    /// `{ l = e; ... }`, `{ base with l = e; ... }`. The current token is the
    /// opening brace.
    fn record_literal(&mut self) -> PResult<Expression> {
        let opening_span = self.advance().span;
        let base = if self.record_starts_with_field() {
            None
        } else {
            let e = self.expr_nonseq()?;
            self.expect_kw(Keyword::With, "'with' in a record update")?;
            Some(Box::new(e))
        };
        let mut fields = vec![self.record_field()?];
        while self.match_tok(&TokenKind::Semi) {
            if self.check(&TokenKind::RBrace) {
                break;
            }
            fields.push(self.record_field()?);
        }
        let close = self.close_delim("{", opening_span, &TokenKind::RBrace, "}")?;
        Ok(Expression::mk(
            ExprDesc::Record(fields, base),
            Location::real(opening_span.merge(close)),
        ))
    }

    /// Whether the tokens at the cursor read as a (possibly qualified) field
    /// binding rather than the base of a `{ base with ... }` update.
    fn record_starts_with_field(&self) -> bool {
        let mut i = self.pos;
        loop {
            match self.tokens.get(i).map(|t| &t.kind) {
                Some(TokenKind::UIdent(_)) => {
                    if matches!(self.tokens.get(i + 1).map(|t| &t.kind), Some(TokenKind::Dot)) {
                        i += 2;
                    } else {
                        return false;
                    }
                }
                Some(TokenKind::LIdent(_)) => {
                    return matches!(
                        self.tokens.get(i + 1).map(|t| &t.kind),
                        Some(TokenKind::Equal | TokenKind::Semi | TokenKind::RBrace)
                    );
                }
                _ => return false,
            }
        }
    }

    fn record_field(&mut self) -> PResult<(Loc<Longident>, Expression)> {
        let label = self.value_path()?;
        if self.match_tok(&TokenKind::Equal) {
            let value = self.expr_nonseq()?;
            Ok((label, value))
        } else {
            // Punning: `{ x; y }` stands for `{ x = x; y = y }`.
            let value = Expression::mk(ExprDesc::Ident(label.clone()), label.loc.to_ghost());
            Ok((label, value))
        }
    }
}

/// The identifier spelling of an operator token, for `(+)`-style uses.
fn operator_image(kind: &TokenKind) -> Option<String> {
    match kind {
        TokenKind::Infix0(op)
        | TokenKind::Infix1(op)
        | TokenKind::Infix2(op)
        | TokenKind::Infix3(op)
        | TokenKind::Infix4(op)
        | TokenKind::PrefixOp(op) => Some(op.clone()),
        TokenKind::Equal => Some("=".to_string()),
        TokenKind::Plus => Some("+".to_string()),
        TokenKind::PlusDot => Some("+.".to_string()),
        TokenKind::Minus => Some("-".to_string()),
        TokenKind::MinusDot => Some("-.".to_string()),
        TokenKind::Star => Some("*".to_string()),
        TokenKind::BarBar => Some("||".to_string()),
        TokenKind::AmpAmp => Some("&&".to_string()),
        _ => None,
    }
}
