//! Surface-sugar desugaring.
//!
//! Rewrites operator occurrences, list literals, indexing notations, and
//! local-open forms into canonical applications and constructor chains. Every
//! helper here takes the whole production's span from the caller and marks
//! exactly that one node non-ghost; all synthesized nodes are ghost.

use crate::ast::*;
use crate::config::ParseConfig;

/// Cons constructor name used by list desugaring.
pub const CONS: &str = "::";
/// Nil constructor name used by list desugaring.
pub const NIL: &str = "[]";

// ============================================================================
// Operators
// ============================================================================

/// `a OP b` becomes an application of an identifier spelled exactly like the
/// operator, with positional arguments.
pub fn infix(lhs: Expression, op: &str, op_span: Span, rhs: Expression, whole: Span) -> Expression {
    let callee = Expression::ghost_ident(Longident::ident(op), op_span);
    Expression::mk(
        ExprDesc::Apply(Box::new(callee), vec![lhs, rhs]),
        Location::real(whole),
    )
}

/// Whether unary sign folding applies: an unsigned numeric literal with no
/// attributes. Parenthesized or attribute-bearing operands do not fold.
fn foldable_literal(operand: &Expression) -> bool {
    operand.attrs.is_empty()
        && matches!(
            operand.desc,
            ExprDesc::Constant(Constant::Int { .. }) | ExprDesc::Constant(Constant::Float { .. })
        )
}

/// Toggle the textual sign of a numeric literal. Folding an already-negated
/// literal (`- -5`) strips the sign instead of stacking a second one.
fn toggle_sign(text: String) -> String {
    match text.strip_prefix('-') {
        Some(rest) => rest.to_string(),
        None => format!("-{}", text),
    }
}

/// Prefix operator application.
///
/// `-`/`-.` (and `+`/`+.`) on an integer or float literal fold into the
/// literal by textual sign manipulation; no application node is produced.
/// On any other operand the sugar applies the identifier `~` ++ op. Other
/// prefix operators (`!x`) apply verbatim.
pub fn prefix(op: &str, op_span: Span, operand: Expression, whole: Span) -> Expression {
    let signish = matches!(op, "-" | "-." | "+" | "+.");
    if signish && foldable_literal(&operand) {
        let negate = op.starts_with('-');
        let desc = match operand.desc {
            ExprDesc::Constant(Constant::Int { text, suffix }) => {
                ExprDesc::Constant(Constant::Int {
                    text: if negate { toggle_sign(text) } else { text },
                    suffix,
                })
            }
            ExprDesc::Constant(Constant::Float { text, suffix }) => {
                ExprDesc::Constant(Constant::Float {
                    text: if negate { toggle_sign(text) } else { text },
                    suffix,
                })
            }
            other => other,
        };
        return Expression::mk(desc, Location::real(whole));
    }
    let name = if signish { format!("~{}", op) } else { op.to_string() };
    let callee = Expression::ghost_ident(Longident::ident(name), op_span);
    Expression::mk(
        ExprDesc::Apply(Box::new(callee), vec![operand]),
        Location::real(whole),
    )
}

// ============================================================================
// List literals
// ============================================================================

/// `[e1; ...; en]` desugars right-to-left into nested 2-ary `::` applications
/// terminated by a nil constructor. The nil node is ghost, anchored at the
/// closing bracket; each cons cell is ghost spanning head to tail end; only
/// the outermost node carries the real span.
pub fn list_expr(elements: Vec<Expression>, nil_span: Span, whole: Span) -> Expression {
    let nil_loc = Location::ghost(nil_span);
    let nil = Expression::mk(
        ExprDesc::Construct(Loc::new(Longident::ident(NIL), nil_loc), None),
        nil_loc,
    );
    let chain = elements.into_iter().rev().fold(nil, |tail, head| {
        let cell_span = head.loc.span().merge(tail.loc.span());
        let cell_loc = Location::ghost(cell_span);
        let pair = Expression::mk(ExprDesc::Tuple(vec![head, tail]), cell_loc);
        Expression::mk(
            ExprDesc::Construct(
                Loc::new(Longident::ident(CONS), cell_loc),
                Some(Box::new(pair)),
            ),
            cell_loc,
        )
    });
    Expression {
        loc: Location::real(whole),
        ..chain
    }
}

/// Pattern counterpart of [`list_expr`]; same ghost discipline.
pub fn list_pat(elements: Vec<Pattern>, nil_span: Span, whole: Span) -> Pattern {
    let nil_loc = Location::ghost(nil_span);
    let nil = Pattern::mk(
        PatDesc::Construct(Loc::new(Longident::ident(NIL), nil_loc), None),
        nil_loc,
    );
    let chain = elements.into_iter().rev().fold(nil, |tail, head| {
        let cell_span = head.loc.span().merge(tail.loc.span());
        let cell_loc = Location::ghost(cell_span);
        let pair = Pattern::mk(PatDesc::Tuple(vec![head, tail]), cell_loc);
        Pattern::mk(
            PatDesc::Construct(
                Loc::new(Longident::ident(CONS), cell_loc),
                Some(Box::new(pair)),
            ),
            cell_loc,
        )
    });
    Pattern {
        loc: Location::real(whole),
        ..chain
    }
}

// ============================================================================
// Indexing sugar
// ============================================================================

/// The bracket kind of an indexing form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BracketKind {
    /// `.( )` — arrays
    Paren,
    /// `.[ ]` — strings
    Bracket,
    /// `.{ }` — bigarrays
    Brace,
}

impl BracketKind {
    fn images(self) -> (&'static str, &'static str) {
        match self {
            BracketKind::Paren => ("(", ")"),
            BracketKind::Bracket => ("[", "]"),
            BracketKind::Brace => ("{", "}"),
        }
    }
}

fn accessor(config: &ParseConfig, assign: bool) -> &'static str {
    match (assign, config.unsafe_indexing) {
        (false, false) => "get",
        (false, true) => "unsafe_get",
        (true, false) => "set",
        (true, true) => "unsafe_set",
    }
}

/// Builtin indexing `a.(i)`, `s.[i]`, `b.{i,j}` with an optional `<- v`
/// assignment suffix.
///
/// The accessor path is selected by bracket kind, assignment suffix, and
/// coordinate arity; safe or unchecked variants by the session's
/// `unsafe_indexing` flag. Arity above three goes through `Genarray` with a
/// ghost coordinate array.
pub fn builtin_index(
    config: &ParseConfig,
    object: Expression,
    kind: BracketKind,
    mut coords: Vec<Expression>,
    assign: Option<Expression>,
    sugar_span: Span,
    whole: Span,
) -> Expression {
    let accessor = accessor(config, assign.is_some());
    let path: Vec<&str> = match kind {
        BracketKind::Paren => vec!["Array", accessor],
        BracketKind::Bracket => vec!["String", accessor],
        BracketKind::Brace => match coords.len() {
            1 => vec!["Bigarray", "Array1", accessor],
            2 => vec!["Bigarray", "Array2", accessor],
            3 => vec!["Bigarray", "Array3", accessor],
            _ => vec!["Bigarray", "Genarray", accessor],
        },
    };
    if kind == BracketKind::Brace && coords.len() > 3 {
        let block_span = coords
            .iter()
            .map(|c| c.loc.span())
            .reduce(Span::merge)
            .unwrap_or(sugar_span);
        coords = vec![Expression::mk(
            ExprDesc::Array(coords),
            Location::ghost(block_span),
        )];
    }
    let callee = Expression::ghost_ident(Longident::from_segments(&path), sugar_span);
    let mut args = vec![object];
    args.append(&mut coords);
    args.extend(assign);
    Expression::mk(
        ExprDesc::Apply(Box::new(callee), args),
        Location::real(whole),
    )
}

/// Generalized dotted-operator indexing `a.%(i)`, `a.%[i;j] <- v`, ...
///
/// Desugars to an application of the identifier spelled from the operator and
/// the bracket images, with `;..` marking arity above one and a `<-` suffix
/// marking assignment: `a.%(i;j) <- v` applies `.%(;..)<-`.
pub fn dotop_index(
    object: Expression,
    op: &str,
    kind: BracketKind,
    coords: Vec<Expression>,
    assign: Option<Expression>,
    op_span: Span,
    whole: Span,
) -> Expression {
    let (open, close) = kind.images();
    let multi = if coords.len() > 1 { ";.." } else { "" };
    let suffix = if assign.is_some() { "<-" } else { "" };
    let name = format!(".{}{}{}{}{}", op, open, multi, close, suffix);
    let callee = Expression::ghost_ident(Longident::ident(name), op_span);
    let mut args = vec![object];
    args.extend(coords);
    args.extend(assign);
    Expression::mk(
        ExprDesc::Apply(Box::new(callee), args),
        Location::real(whole),
    )
}

// ============================================================================
// Local open
// ============================================================================

/// `M.(e)`, `M.[...]`, `M.{...}` wrap the bracketed content's own desugared
/// form in an open of `M`.
pub fn local_open(path: Loc<Longident>, body: Expression, whole: Span) -> Expression {
    Expression::mk(
        ExprDesc::Open(path, Box::new(body)),
        Location::real(whole),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sp(start: usize, end: usize) -> Span {
        Span::new(start, end)
    }

    fn int(text: &str, span: Span) -> Expression {
        Expression::mk(ExprDesc::Constant(Constant::int(text)), Location::real(span))
    }

    fn ident(name: &str, span: Span) -> Expression {
        Expression::mk(
            ExprDesc::Ident(Loc::new(Longident::ident(name), Location::real(span))),
            Location::real(span),
        )
    }

    #[test]
    fn test_infix_applies_operator_ident() {
        let e = infix(ident("a", sp(0, 1)), "+", sp(2, 3), ident("b", sp(4, 5)), sp(0, 5));
        match &e.desc {
            ExprDesc::Apply(callee, args) => {
                assert!(callee.loc.ghost);
                match &callee.desc {
                    ExprDesc::Ident(id) => assert_eq!(id.txt, Longident::ident("+")),
                    other => panic!("expected operator ident, got {:?}", other),
                }
                assert_eq!(args.len(), 2);
            }
            other => panic!("expected application, got {:?}", other),
        }
        assert!(!e.loc.ghost);
    }

    #[test]
    fn test_unary_minus_folds_literal() {
        let e = prefix("-", sp(0, 1), int("5", sp(1, 2)), sp(0, 2));
        match &e.desc {
            ExprDesc::Constant(Constant::Int { text, .. }) => assert_eq!(text, "-5"),
            other => panic!("expected folded literal, got {:?}", other),
        }
    }

    #[test]
    fn test_double_negation_toggles_sign() {
        let inner = prefix("-", sp(2, 3), int("5", sp(3, 4)), sp(2, 4));
        let e = prefix("-", sp(0, 1), inner, sp(0, 4));
        match &e.desc {
            ExprDesc::Constant(Constant::Int { text, .. }) => assert_eq!(text, "5"),
            other => panic!("expected folded literal, got {:?}", other),
        }
    }

    #[test]
    fn test_unary_plus_keeps_literal_text() {
        let e = prefix("+.", sp(0, 2), Expression::mk(
            ExprDesc::Constant(Constant::float("1.5")),
            Location::real(sp(2, 5)),
        ), sp(0, 5));
        match &e.desc {
            ExprDesc::Constant(Constant::Float { text, .. }) => assert_eq!(text, "1.5"),
            other => panic!("expected literal, got {:?}", other),
        }
    }

    #[test]
    fn test_unary_minus_on_ident_applies_tilde() {
        let e = prefix("-", sp(0, 1), ident("x", sp(1, 2)), sp(0, 2));
        match &e.desc {
            ExprDesc::Apply(callee, args) => {
                match &callee.desc {
                    ExprDesc::Ident(id) => assert_eq!(id.txt, Longident::ident("~-")),
                    other => panic!("expected ~- ident, got {:?}", other),
                }
                assert_eq!(args.len(), 1);
            }
            other => panic!("expected application, got {:?}", other),
        }
    }

    #[test]
    fn test_attribute_bearing_literal_does_not_fold() {
        let loc = Location::real(sp(1, 2));
        let lit = Expression::mk(ExprDesc::Constant(Constant::int("5")), loc).with_attrs(vec![
            Attribute {
                name: Loc::new("a".to_string(), loc),
                payload: Payload::Str(Vec::new()),
                loc,
            },
        ]);
        let e = prefix("-", sp(0, 1), lit, sp(0, 2));
        assert!(matches!(e.desc, ExprDesc::Apply(..)));
    }

    /// Walk a desugared list and collect element texts plus ghost counts.
    fn walk_cons(expr: &Expression, non_ghost: &mut usize, out: &mut Vec<String>) {
        if !expr.loc.ghost {
            *non_ghost += 1;
        }
        match &expr.desc {
            ExprDesc::Construct(id, Some(pair)) if id.txt == Longident::ident(CONS) => {
                if !pair.loc.ghost {
                    *non_ghost += 1;
                }
                match &pair.desc {
                    ExprDesc::Tuple(parts) => {
                        match &parts[0].desc {
                            ExprDesc::Constant(Constant::Int { text, .. }) => {
                                out.push(text.clone())
                            }
                            other => panic!("unexpected head {:?}", other),
                        }
                        walk_cons(&parts[1], non_ghost, out);
                    }
                    other => panic!("cons argument should be a pair, got {:?}", other),
                }
            }
            ExprDesc::Construct(id, None) if id.txt == Longident::ident(NIL) => {}
            other => panic!("unexpected desugared shape {:?}", other),
        }
    }

    #[test]
    fn test_list_desugars_in_order_with_one_real_node() {
        let elems = vec![int("1", sp(1, 2)), int("2", sp(4, 5)), int("3", sp(7, 8))];
        // Element literals are real; count only nodes the desugarer makes.
        let list = list_expr(
            elems.into_iter().map(|e| Expression { loc: e.loc.to_ghost(), ..e }).collect(),
            sp(9, 10),
            sp(0, 10),
        );
        let mut non_ghost = 0;
        let mut out = Vec::new();
        walk_cons(&list, &mut non_ghost, &mut out);
        assert_eq!(out, ["1", "2", "3"]);
        assert_eq!(non_ghost, 1, "exactly one node of the sugar is real");
    }

    #[test]
    fn test_empty_list_is_real_nil() {
        let list = list_expr(Vec::new(), sp(1, 2), sp(0, 2));
        assert!(!list.loc.ghost);
        assert!(matches!(&list.desc, ExprDesc::Construct(id, None) if id.txt == Longident::ident(NIL)));
    }

    #[test]
    fn test_array_index_respects_unsafe_flag() {
        let safe = ParseConfig::default();
        let unsafe_ = ParseConfig::default().with_unsafe_indexing(true);
        for (config, expected) in [(safe, "Array.get"), (unsafe_, "Array.unsafe_get")] {
            let e = builtin_index(
                &config,
                ident("a", sp(0, 1)),
                BracketKind::Paren,
                vec![ident("i", sp(3, 4))],
                None,
                sp(1, 2),
                sp(0, 5),
            );
            match &e.desc {
                ExprDesc::Apply(callee, args) => {
                    match &callee.desc {
                        ExprDesc::Ident(id) => assert_eq!(id.txt.to_string(), expected),
                        other => panic!("expected accessor ident, got {:?}", other),
                    }
                    assert_eq!(args.len(), 2);
                }
                other => panic!("expected application, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_bigarray_arity_selects_module() {
        let config = ParseConfig::default();
        let cases: [(usize, &str); 4] = [
            (1, "Bigarray.Array1.set"),
            (2, "Bigarray.Array2.set"),
            (3, "Bigarray.Array3.set"),
            (4, "Bigarray.Genarray.set"),
        ];
        for (arity, expected) in cases {
            let coords = (0..arity).map(|i| ident("i", sp(10 + i, 11 + i))).collect();
            let e = builtin_index(
                &config,
                ident("b", sp(0, 1)),
                BracketKind::Brace,
                coords,
                Some(int("0", sp(20, 21))),
                sp(1, 2),
                sp(0, 21),
            );
            match &e.desc {
                ExprDesc::Apply(callee, args) => {
                    match &callee.desc {
                        ExprDesc::Ident(id) => assert_eq!(id.txt.to_string(), expected),
                        other => panic!("expected accessor, got {:?}", other),
                    }
                    if arity > 3 {
                        // object, coordinate block, value
                        assert_eq!(args.len(), 3);
                        assert!(matches!(args[1].desc, ExprDesc::Array(_)));
                        assert!(args[1].loc.ghost);
                    } else {
                        assert_eq!(args.len(), 2 + arity);
                    }
                }
                other => panic!("expected application, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_dotop_name_encodes_arity_and_assignment() {
        let e = dotop_index(
            ident("a", sp(0, 1)),
            "%",
            BracketKind::Paren,
            vec![ident("i", sp(4, 5)), ident("j", sp(6, 7))],
            Some(int("0", sp(12, 13))),
            sp(1, 3),
            sp(0, 13),
        );
        match &e.desc {
            ExprDesc::Apply(callee, args) => {
                match &callee.desc {
                    ExprDesc::Ident(id) => assert_eq!(id.txt.to_string(), ".%(;..)<-"),
                    other => panic!("expected dotop ident, got {:?}", other),
                }
                assert_eq!(args.len(), 4);
            }
            other => panic!("expected application, got {:?}", other),
        }
    }
}
