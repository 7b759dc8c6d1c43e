//! Property-based tests for the syntax frontend.
//!
//! These use proptest to verify parser invariants across many randomly
//! generated inputs, catching edge cases that hand-written tests might miss.

use proptest::prelude::*;

use sable_syntax::ast::{Constant, ExprDesc, Expression, Longident};
use sable_syntax::lexer::tokens::keyword;
use sable_syntax::{lexer, parser, ParseConfig};

fn parse_expr(source: &str, config: ParseConfig) -> Expression {
    let (tokens, _) = lexer::lex(source).expect("lex failed");
    parser::parse_expression(&tokens, config).expect("parse failed")
}

/// Walk a desugared cons chain, collecting integer element texts and counting
/// non-ghost nodes along the spine.
fn collect_list(expr: &Expression) -> (Vec<String>, usize) {
    let mut texts = Vec::new();
    let mut non_ghost = 0;
    let mut cursor = expr;
    loop {
        if !cursor.loc.ghost {
            non_ghost += 1;
        }
        match &cursor.desc {
            ExprDesc::Construct(id, Some(pair)) if id.txt == Longident::ident("::") => {
                match &pair.desc {
                    ExprDesc::Tuple(parts) => {
                        match &parts[0].desc {
                            ExprDesc::Constant(Constant::Int { text, .. }) => {
                                texts.push(text.clone())
                            }
                            other => panic!("unexpected list head: {:?}", other),
                        }
                        cursor = &parts[1];
                    }
                    other => panic!("cons argument should be a pair: {:?}", other),
                }
            }
            ExprDesc::Construct(id, None) if id.txt == Longident::ident("[]") => {
                return (texts, non_ghost);
            }
            other => panic!("unexpected desugared shape: {:?}", other),
        }
    }
}

fn lident_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,8}".prop_filter("not a keyword", |s| keyword(s).is_none())
}

proptest! {
    /// Property: list literals desugar into a cons chain holding the elements
    /// in source order, with exactly one non-ghost node along the spine.
    #[test]
    fn list_literals_desugar_in_order(elements in prop::collection::vec(0u32..10_000, 0..12)) {
        let body: Vec<String> = elements.iter().map(|n| n.to_string()).collect();
        let source = format!("[{}]", body.join("; "));
        let expr = parse_expr(&source, ParseConfig::default());
        let (texts, non_ghost) = collect_list(&expr);
        prop_assert_eq!(texts, body);
        prop_assert_eq!(non_ghost, 1);
    }

    /// Property: unary minus folds any unsigned integer literal textually.
    #[test]
    fn unary_minus_folds_integers(n in 0u64..1_000_000) {
        let expr = parse_expr(&format!("-{}", n), ParseConfig::default());
        match &expr.desc {
            ExprDesc::Constant(Constant::Int { text, .. }) => {
                prop_assert_eq!(text.clone(), format!("-{}", n));
            }
            other => prop_assert!(false, "expected folded literal, got {:?}", other),
        }
    }

    /// Property: generated identifiers survive lexing and parse as idents.
    #[test]
    fn identifiers_parse_as_idents(name in lident_strategy()) {
        let expr = parse_expr(&name, ParseConfig::default());
        match &expr.desc {
            ExprDesc::Ident(id) => prop_assert_eq!(&id.txt, &Longident::ident(name)),
            other => prop_assert!(false, "expected ident, got {:?}", other),
        }
    }

    /// Property: `let ... and ...` groups of any width preserve source order.
    #[test]
    fn let_groups_preserve_order(names in prop::collection::vec(lident_strategy(), 1..8)) {
        use sable_syntax::ast::{PatDesc, StrDesc};

        let bindings: Vec<String> = names
            .iter()
            .enumerate()
            .map(|(i, name)| format!("{} = {}", name, i))
            .collect();
        let source = format!("let {}", bindings.join(" and "));
        let (tokens, comments) = lexer::lex(&source).expect("lex failed");
        let items =
            parser::parse_implementation(&tokens, comments, ParseConfig::default())
                .expect("parse failed");
        match &items[0].desc {
            StrDesc::Value(_, parsed) => {
                let parsed_names: Vec<String> = parsed
                    .iter()
                    .map(|b| match &b.pat.desc {
                        PatDesc::Var(v) => v.txt.clone(),
                        other => panic!("expected var pattern: {:?}", other),
                    })
                    .collect();
                prop_assert_eq!(parsed_names, names);
            }
            other => prop_assert!(false, "expected value item, got {:?}", other),
        }
    }

    /// Property: the unsafe-indexing flag selects the accessor for every
    /// bracket kind, without leaking between sessions.
    #[test]
    fn indexing_accessor_follows_config(unsafe_indexing in any::<bool>()) {
        let config = ParseConfig::default().with_unsafe_indexing(unsafe_indexing);
        let expr = parse_expr("a.(i)", config);
        let expected = if unsafe_indexing { "Array.unsafe_get" } else { "Array.get" };
        match &expr.desc {
            ExprDesc::Apply(callee, _) => match &callee.desc {
                ExprDesc::Ident(id) => prop_assert_eq!(id.txt.to_string(), expected),
                other => prop_assert!(false, "expected accessor ident, got {:?}", other),
            },
            other => prop_assert!(false, "expected application, got {:?}", other),
        }
    }
}
