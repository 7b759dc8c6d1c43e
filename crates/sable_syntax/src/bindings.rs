//! Let-binding aggregation.
//!
//! A `let` group is created on its first binding, extended by each `and`, and
//! consumed exactly once by one of three sites: a structure-level value item,
//! a nested `let ... in` expression, or a class-level let. Only the first
//! binding may carry an extension id (`let%ext`); class-level consumption
//! rejects a present id.

use crate::ast::*;
use crate::diagnostics::SyntaxError;

/// An accumulating group of `let ... and ...` bindings.
///
/// Bindings are accumulated in reverse and put back in source order by the
/// consumers. The rec-flag and extension id are fixed by the first binding.
#[derive(Debug, Clone, PartialEq)]
pub struct LetBindingGroup {
    bindings: Vec<ValueBinding>,
    rec_flag: RecFlag,
    extension: Option<Loc<String>>,
    loc: Location,
}

impl LetBindingGroup {
    /// Start a group from the first binding of a `let`.
    pub fn start(
        binding: ValueBinding,
        rec_flag: RecFlag,
        extension: Option<Loc<String>>,
        loc: Location,
    ) -> Self {
        Self {
            bindings: vec![binding],
            rec_flag,
            extension,
            loc,
        }
    }

    /// Extend the group with an `and` binding.
    ///
    /// ## Errors
    /// An extension id on an `and` binding is rejected: the id belongs to the
    /// group and only the introducing `let` may carry it.
    pub fn and_then(
        mut self,
        binding: ValueBinding,
        extension: Option<Loc<String>>,
    ) -> Result<Self, SyntaxError> {
        if let Some(ext) = extension {
            return Err(SyntaxError::not_expecting(
                "extension id on an 'and' binding",
                ext.loc.span(),
            ));
        }
        self.loc = Location {
            end: binding.loc.end.max(self.loc.end),
            ..self.loc
        };
        self.bindings.push(binding);
        self.bindings.rotate_right(1);
        Ok(self)
    }

    pub fn rec_flag(&self) -> RecFlag {
        self.rec_flag
    }

    pub fn loc(&self) -> Location {
        self.loc
    }

    fn in_source_order(self) -> (Vec<ValueBinding>, RecFlag, Option<Loc<String>>, Location) {
        let Self {
            mut bindings,
            rec_flag,
            extension,
            loc,
        } = self;
        bindings.reverse();
        (bindings, rec_flag, extension, loc)
    }

    /// Consume as a structure-level value item, extension-wrapped when the
    /// group carries an id.
    pub fn into_structure_item(self) -> StructureItem {
        let (bindings, rec_flag, extension, loc) = self.in_source_order();
        let item = StructureItem::mk(StrDesc::Value(rec_flag, bindings), loc);
        match extension {
            None => item,
            Some(name) => StructureItem::mk(
                StrDesc::Extension(
                    Extension {
                        name,
                        payload: Box::new(Payload::Str(vec![item])),
                    },
                    Vec::new(),
                ),
                loc,
            ),
        }
    }

    /// Consume as a `let ... in body` expression, preserving the rec-flag.
    pub fn into_expression(self, body: Expression, whole: Span) -> Expression {
        let (bindings, rec_flag, extension, loc) = self.in_source_order();
        let let_loc = Location::real(whole);
        let expr = Expression::mk(
            ExprDesc::Let(rec_flag, bindings, Box::new(body)),
            let_loc,
        );
        match extension {
            None => expr,
            Some(name) => {
                let inner = StructureItem::mk(StrDesc::Eval(expr, Vec::new()), loc.to_ghost());
                Expression::mk(
                    ExprDesc::Extension(Extension {
                        name,
                        payload: Box::new(Payload::Str(vec![inner])),
                    }),
                    let_loc,
                )
            }
        }
    }

    /// Consume as a class-level `let ... in body`.
    ///
    /// ## Errors
    /// A present extension id raises
    /// [`SyntaxError::ConflictingExtensionInClassBinding`].
    pub fn into_class_expr(self, body: ClassExpr, whole: Span) -> Result<ClassExpr, SyntaxError> {
        let (bindings, rec_flag, extension, _) = self.in_source_order();
        if let Some(ext) = extension {
            return Err(SyntaxError::class_let_extension(ext.loc.span()));
        }
        Ok(ClassExpr::mk(
            ClassExprDesc::Let(rec_flag, bindings, Box::new(body)),
            Location::real(whole),
        ))
    }
}
