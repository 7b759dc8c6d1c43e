// ============================================================================
// Entry points
// ============================================================================

impl<'a> Parser<'a> {
    fn expect_eof(&self) -> PResult<()> {
        if self.is_at_end() {
            Ok(())
        } else {
            Err(SyntaxError::expecting("end of input", self.current_span()))
        }
    }

    /// Parse one toplevel phrase: the structure items up to the next `;;` or
    /// end of input. Returns `None` once the stream is exhausted. Intended
    /// for interactive drivers feeding one phrase at a time.
    pub fn toplevel_phrase(&mut self) -> PResult<Option<Vec<StructureItem>>> {
        while self.match_tok(&TokenKind::SemiSemi) {}
        if self.is_at_end() {
            return Ok(None);
        }
        let mut items = Vec::new();
        loop {
            let mut item = self.structure_item()?;
            for attr in self.item_attrs()? {
                attach_str_attr(&mut item, attr);
            }
            items.push(item);
            if self.match_tok(&TokenKind::SemiSemi) || self.is_at_end() {
                break;
            }
        }
        Ok(Some(items))
    }

    /// Skip past the next `;;`, discarding the remainder of a phrase that
    /// failed to parse. Interactive drivers call this before asking for the
    /// next phrase.
    pub fn skip_to_phrase_end(&mut self) {
        while !self.is_at_end() && !self.match_tok(&TokenKind::SemiSemi) {
            self.advance();
        }
    }
}

/// Parse a whole implementation file into its structure items.
#[tracing::instrument(skip_all, fields(tokens = tokens.len()))]
pub fn parse_implementation(
    tokens: &[Token],
    comments: Vec<DocComment>,
    config: ParseConfig,
) -> Result<Vec<StructureItem>, SyntaxError> {
    let mut parser = Parser::new(tokens, comments, config);
    let items = parser.structure_items(Terminator::Eof)?;
    parser.expect_eof()?;
    Ok(items)
}

/// Parse a whole interface file into its signature items.
#[tracing::instrument(skip_all, fields(tokens = tokens.len()))]
pub fn parse_interface(
    tokens: &[Token],
    comments: Vec<DocComment>,
    config: ParseConfig,
) -> Result<Vec<SignatureItem>, SyntaxError> {
    let mut parser = Parser::new(tokens, comments, config);
    let items = parser.signature_items(Terminator::Eof)?;
    parser.expect_eof()?;
    Ok(items)
}

/// Parse a standalone expression; the token stream must hold nothing else.
pub fn parse_expression(
    tokens: &[Token],
    config: ParseConfig,
) -> Result<Expression, SyntaxError> {
    let mut parser = Parser::new(tokens, Vec::new(), config);
    let expr = parser.expression()?;
    parser.expect_eof()?;
    Ok(expr)
}

/// Parse a standalone core type; the token stream must hold nothing else.
pub fn parse_core_type(
    tokens: &[Token],
    config: ParseConfig,
) -> Result<CoreType, SyntaxError> {
    let mut parser = Parser::new(tokens, Vec::new(), config);
    let ty = parser.core_type()?;
    parser.expect_eof()?;
    Ok(ty)
}

/// Parse a standalone pattern; the token stream must hold nothing else.
pub fn parse_pattern(tokens: &[Token], config: ParseConfig) -> Result<Pattern, SyntaxError> {
    let mut parser = Parser::new(tokens, Vec::new(), config);
    let pat = parser.pattern()?;
    parser.expect_eof()?;
    Ok(pat)
}
