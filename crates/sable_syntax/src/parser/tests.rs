#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer;

    fn parse_str(source: &str) -> Result<Vec<StructureItem>, SyntaxError> {
        let (tokens, comments) = lexer::lex(source)?;
        parse_implementation(&tokens, comments, ParseConfig::default())
    }

    fn parse_expr_with(source: &str, config: ParseConfig) -> Result<Expression, SyntaxError> {
        let (tokens, _) = lexer::lex(source)?;
        parse_expression(&tokens, config)
    }

    fn parse_expr_str(source: &str) -> Expression {
        parse_expr_with(source, ParseConfig::default()).expect("expression should parse")
    }

    fn callee_name(expr: &Expression) -> String {
        match &expr.desc {
            ExprDesc::Apply(callee, _) => match &callee.desc {
                ExprDesc::Ident(id) => id.txt.to_string(),
                other => panic!("expected identifier callee, got {:?}", other),
            },
            other => panic!("expected application, got {:?}", other),
        }
    }

    // ========================================================================
    // Let bindings
    // ========================================================================

    #[test]
    fn test_let_binding_structure_item() {
        let items = parse_str("let x = 1").unwrap();
        assert_eq!(items.len(), 1);
        match &items[0].desc {
            StrDesc::Value(rec_flag, bindings) => {
                assert_eq!(*rec_flag, RecFlag::Nonrecursive);
                assert_eq!(bindings.len(), 1);
                assert!(matches!(&bindings[0].pat.desc, PatDesc::Var(v) if v.txt == "x"));
            }
            other => panic!("expected value item, got {:?}", other),
        }
    }

    #[test]
    fn test_and_group_stays_in_source_order() {
        let items = parse_str("let a = 1 and b = 2 and c = 3").unwrap();
        match &items[0].desc {
            StrDesc::Value(_, bindings) => {
                let names: Vec<_> = bindings
                    .iter()
                    .map(|b| match &b.pat.desc {
                        PatDesc::Var(v) => v.txt.clone(),
                        other => panic!("expected var pattern, got {:?}", other),
                    })
                    .collect();
                assert_eq!(names, ["a", "b", "c"]);
            }
            other => panic!("expected value item, got {:?}", other),
        }
    }

    #[test]
    fn test_toplevel_let_in_is_an_evaluation() {
        let items = parse_str("let rec f x = f x in f").unwrap();
        match &items[0].desc {
            StrDesc::Eval(expr, _) => {
                assert!(matches!(expr.desc, ExprDesc::Let(RecFlag::Recursive, ..)));
            }
            other => panic!("expected eval item, got {:?}", other),
        }
    }

    #[test]
    fn test_binding_params_fold_into_ghost_funs() {
        let items = parse_str("let f x y = x").unwrap();
        match &items[0].desc {
            StrDesc::Value(_, bindings) => match &bindings[0].expr.desc {
                ExprDesc::Fun(_, inner) => {
                    assert!(bindings[0].expr.loc.ghost);
                    assert!(matches!(inner.desc, ExprDesc::Fun(..)));
                }
                other => panic!("expected fun chain, got {:?}", other),
            },
            other => panic!("expected value item, got {:?}", other),
        }
    }

    #[test]
    fn test_let_extension_wraps_structure_item() {
        let items = parse_str("let%lwt x = 1").unwrap();
        match &items[0].desc {
            StrDesc::Extension(ext, _) => {
                assert_eq!(ext.name.txt, "lwt");
                match &*ext.payload {
                    Payload::Str(inner) => {
                        assert!(matches!(inner[0].desc, StrDesc::Value(..)))
                    }
                    other => panic!("expected structure payload, got {:?}", other),
                }
            }
            other => panic!("expected extension item, got {:?}", other),
        }
    }

    #[test]
    fn test_extension_id_on_and_binding_rejected() {
        let err = parse_str("let%a x = 1 and%b y = 2").unwrap_err();
        assert!(matches!(err, SyntaxError::NotExpecting { .. }));
    }

    #[test]
    fn test_class_let_extension_conflict() {
        let err = parse_str("class c = let%e x = 1 in object end").unwrap_err();
        assert!(matches!(
            err,
            SyntaxError::ConflictingExtensionInClassBinding { .. }
        ));
    }

    // ========================================================================
    // Operators and sugar
    // ========================================================================

    #[test]
    fn test_infix_desugars_to_ghost_callee() {
        let expr = parse_expr_str("x + y");
        assert_eq!(callee_name(&expr), "+");
        assert!(!expr.loc.ghost);
        match &expr.desc {
            ExprDesc::Apply(callee, args) => {
                assert!(callee.loc.ghost);
                assert_eq!(args.len(), 2);
            }
            other => panic!("expected application, got {:?}", other),
        }
    }

    #[test]
    fn test_unary_minus_folds_into_literal() {
        let expr = parse_expr_str("-3");
        match &expr.desc {
            ExprDesc::Constant(Constant::Int { text, .. }) => assert_eq!(text, "-3"),
            other => panic!("expected folded literal, got {:?}", other),
        }
    }

    #[test]
    fn test_precedence_mul_binds_tighter_than_add() {
        let expr = parse_expr_str("a + b * c");
        assert_eq!(callee_name(&expr), "+");
        match &expr.desc {
            ExprDesc::Apply(_, args) => assert_eq!(callee_name(&args[1]), "*"),
            other => panic!("expected application, got {:?}", other),
        }
    }

    #[test]
    fn test_list_literal_desugars_in_order() {
        let expr = parse_expr_str("[1; 2; 3]");
        assert!(!expr.loc.ghost);
        let mut texts = Vec::new();
        let mut cursor = &expr;
        loop {
            match &cursor.desc {
                ExprDesc::Construct(id, Some(pair))
                    if id.txt == Longident::ident(sugar::CONS) =>
                {
                    match &pair.desc {
                        ExprDesc::Tuple(parts) => {
                            match &parts[0].desc {
                                ExprDesc::Constant(Constant::Int { text, .. }) => {
                                    texts.push(text.clone())
                                }
                                other => panic!("unexpected head {:?}", other),
                            }
                            cursor = &parts[1];
                        }
                        other => panic!("expected pair, got {:?}", other),
                    }
                }
                ExprDesc::Construct(id, None) if id.txt == Longident::ident(sugar::NIL) => {
                    assert!(cursor.loc.ghost);
                    break;
                }
                other => panic!("unexpected desugared shape {:?}", other),
            }
        }
        assert_eq!(texts, ["1", "2", "3"]);
    }

    #[test]
    fn test_cons_operator_matches_list_shape() {
        let expr = parse_expr_str("1 :: [2]");
        match &expr.desc {
            ExprDesc::Construct(id, Some(pair)) => {
                assert_eq!(id.txt, Longident::ident(sugar::CONS));
                assert!(matches!(pair.desc, ExprDesc::Tuple(_)));
            }
            other => panic!("expected cons cell, got {:?}", other),
        }
    }

    // ========================================================================
    // Indexing sugar
    // ========================================================================

    #[test]
    fn test_array_indexing_accessor_selection() {
        let safe = parse_expr_str("a.(i)");
        assert_eq!(callee_name(&safe), "Array.get");
        let unsafe_ = parse_expr_with("a.(i)", ParseConfig::default().with_unsafe_indexing(true))
            .unwrap();
        assert_eq!(callee_name(&unsafe_), "Array.unsafe_get");
    }

    #[test]
    fn test_string_index_assignment() {
        let expr = parse_expr_str("s.[i] <- c");
        assert_eq!(callee_name(&expr), "String.set");
        match &expr.desc {
            ExprDesc::Apply(_, args) => assert_eq!(args.len(), 3),
            other => panic!("expected application, got {:?}", other),
        }
    }

    #[test]
    fn test_bigarray_arity_two() {
        let expr = parse_expr_str("b.{i, j}");
        assert_eq!(callee_name(&expr), "Bigarray.Array2.get");
    }

    #[test]
    fn test_bigarray_coordinates_stay_separate() {
        // The commas separate coordinates; they must not collapse into one
        // tuple coordinate, which would always select Array1.
        let expr = parse_expr_str("b.{i, j, k}");
        assert_eq!(callee_name(&expr), "Bigarray.Array3.get");
        let expr = parse_expr_str("b.{i, j, k, l}");
        assert_eq!(callee_name(&expr), "Bigarray.Genarray.get");
    }

    #[test]
    fn test_dotop_index_name_encoding() {
        let expr = parse_expr_str("m.%{k1; k2} <- v");
        assert_eq!(callee_name(&expr), ".%{;..}<-");
        match &expr.desc {
            ExprDesc::Apply(_, args) => assert_eq!(args.len(), 4),
            other => panic!("expected application, got {:?}", other),
        }
    }

    // ========================================================================
    // Local opens and paths
    // ========================================================================

    #[test]
    fn test_local_open_paren() {
        let expr = parse_expr_str("M.(x + 1)");
        match &expr.desc {
            ExprDesc::Open(path, body) => {
                assert_eq!(path.txt, Longident::ident("M"));
                assert!(matches!(body.desc, ExprDesc::Apply(..)));
            }
            other => panic!("expected open, got {:?}", other),
        }
    }

    #[test]
    fn test_local_open_record() {
        let expr = parse_expr_str("M.{x = 1; y}");
        match &expr.desc {
            ExprDesc::Open(_, body) => match &body.desc {
                ExprDesc::Record(fields, base) => {
                    assert_eq!(fields.len(), 2);
                    assert!(base.is_none());
                    // The second field is punned.
                    assert!(matches!(&fields[1].1.desc, ExprDesc::Ident(id) if id.txt == Longident::ident("y")));
                }
                other => panic!("expected record, got {:?}", other),
            },
            other => panic!("expected open, got {:?}", other),
        }
    }

    #[test]
    fn test_parenthesized_constructor_argument() {
        // `Some (1)` is constructor application, never a functor path.
        let expr = parse_expr_str("Some (1)");
        match &expr.desc {
            ExprDesc::Construct(id, Some(arg)) => {
                assert_eq!(id.txt, Longident::ident("Some"));
                assert!(matches!(
                    arg.desc,
                    ExprDesc::Constant(Constant::Int { .. })
                ));
            }
            other => panic!("expected constructor application, got {:?}", other),
        }
    }

    #[test]
    fn test_applicative_path_gated_by_config() {
        let err = parse_expr_with("F(X).t", ParseConfig::default()).unwrap_err();
        assert!(matches!(err, SyntaxError::ApplicativePathDisabled { .. }));

        let expr = parse_expr_with(
            "F(X).t",
            ParseConfig::default().with_applicative_functors(true),
        )
        .unwrap();
        match &expr.desc {
            ExprDesc::Ident(id) => {
                assert!(matches!(&id.txt, Longident::Dot(lhs, name)
                    if name == "t" && matches!(**lhs, Longident::Apply(..))));
            }
            other => panic!("expected qualified ident, got {:?}", other),
        }
    }

    // ========================================================================
    // Delimiters and diagnostics
    // ========================================================================

    #[test]
    fn test_unclosed_paren_names_both_sides() {
        let err = parse_str("( 1").unwrap_err();
        match err {
            SyntaxError::Unclosed {
                opening, closing, ..
            } => {
                assert_eq!(opening, "(");
                assert_eq!(closing, ")");
            }
            other => panic!("expected unclosed diagnostic, got {:?}", other),
        }
    }

    #[test]
    fn test_unclosed_struct() {
        let err = parse_str("module M = struct let x = 1").unwrap_err();
        match err {
            SyntaxError::Unclosed { opening, .. } => assert_eq!(opening, "struct"),
            other => panic!("expected unclosed diagnostic, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_pattern_is_expecting() {
        let err = parse_str("let = 1").unwrap_err();
        assert!(matches!(err, SyntaxError::Expecting { .. }));
    }

    #[test]
    fn test_empty_token_slice_is_rejected() {
        // Entry points accept arbitrary slices, not just Eof-terminated
        // lexer output.
        let err = parse_expression(&[], ParseConfig::default()).unwrap_err();
        assert!(matches!(err, SyntaxError::Expecting { .. }));
    }

    // ========================================================================
    // Control flow
    // ========================================================================

    #[test]
    fn test_match_cases_and_guard() {
        let expr = parse_expr_str("match x with | 0 -> a | n when n > 0 -> b | _ -> c");
        match &expr.desc {
            ExprDesc::Match(_, cases) => {
                assert_eq!(cases.len(), 3);
                assert!(cases[0].guard.is_none());
                assert!(cases[1].guard.is_some());
                assert!(matches!(cases[2].pat.desc, PatDesc::Any));
            }
            other => panic!("expected match, got {:?}", other),
        }
    }

    #[test]
    fn test_sequence_binds_looser_than_if() {
        let expr = parse_expr_str("if p then a else b; c");
        match &expr.desc {
            ExprDesc::Sequence(first, _) => {
                assert!(matches!(first.desc, ExprDesc::IfThenElse(..)))
            }
            other => panic!("expected sequence, got {:?}", other),
        }
    }

    // ========================================================================
    // Types and modules
    // ========================================================================

    #[test]
    fn test_variant_type_declaration() {
        let items = parse_str("type t = A | B of int * string").unwrap();
        match &items[0].desc {
            StrDesc::Type(decls) => match &decls[0].kind {
                TypeKind::Variant(ctors) => {
                    assert_eq!(ctors.len(), 2);
                    assert_eq!(ctors[0].name.txt, "A");
                    assert_eq!(ctors[1].args.len(), 2);
                }
                other => panic!("expected variant kind, got {:?}", other),
            },
            other => panic!("expected type item, got {:?}", other),
        }
    }

    #[test]
    fn test_module_binding_and_module_type() {
        let items = parse_str(
            "module M = struct let x = 1 end\nmodule type S = sig val x : int end",
        )
        .unwrap();
        assert_eq!(items.len(), 2);
        match &items[0].desc {
            StrDesc::Module(mb) => {
                assert_eq!(mb.name.txt, "M");
                assert!(matches!(&mb.expr.desc, ModExprDesc::Structure(body) if body.len() == 1));
            }
            other => panic!("expected module item, got {:?}", other),
        }
        match &items[1].desc {
            StrDesc::ModType(mtd) => {
                let mty = mtd.mty.as_ref().expect("module type body");
                assert!(matches!(&mty.desc, ModTypeDesc::Signature(body) if body.len() == 1));
            }
            other => panic!("expected module type item, got {:?}", other),
        }
    }

    #[test]
    fn test_interface_value_description() {
        let (tokens, comments) = lexer::lex("val f : int -> int").unwrap();
        let items = parse_interface(&tokens, comments, ParseConfig::default()).unwrap();
        match &items[0].desc {
            SigDesc::Value(vd) => {
                assert_eq!(vd.name.txt, "f");
                assert!(matches!(vd.ty.desc, TypeDesc::Arrow(..)));
            }
            other => panic!("expected value description, got {:?}", other),
        }
    }

    #[test]
    fn test_package_type_with_equation() {
        let (tokens, _) = lexer::lex("(module S with type t = int)").unwrap();
        let ty = parse_core_type(&tokens, ParseConfig::default()).unwrap();
        match &ty.desc {
            TypeDesc::Package(pkg) => {
                assert_eq!(pkg.path.txt, Longident::ident("S"));
                assert_eq!(pkg.constraints.len(), 1);
            }
            other => panic!("expected package type, got {:?}", other),
        }
    }

    #[test]
    fn test_parametrized_package_equation_rejected() {
        let (tokens, _) = lexer::lex("(module S with type 'a t = int)").unwrap();
        let err = parse_core_type(&tokens, ParseConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            SyntaxError::InvalidPackageType {
                reason: "parametrized types are not supported",
                ..
            }
        ));
    }

    // ========================================================================
    // Attributes, extensions, docs
    // ========================================================================

    #[test]
    fn test_item_attribute_attaches_to_binding() {
        let items = parse_str("let x = 1 [@@deprecated]").unwrap();
        match &items[0].desc {
            StrDesc::Value(_, bindings) => {
                assert!(bindings[0].attrs.iter().any(|a| a.name.txt == "deprecated"));
            }
            other => panic!("expected value item, got {:?}", other),
        }
    }

    #[test]
    fn test_postfix_attribute_on_expression() {
        let expr = parse_expr_str("(x [@a])");
        assert!(matches!(expr.desc, ExprDesc::Ident(_)));
        assert_eq!(expr.attrs.len(), 1);
        assert_eq!(expr.attrs[0].name.txt, "a");
    }

    #[test]
    fn test_extension_expression_payload() {
        let expr = parse_expr_str("[%ext 1 + 1]");
        match &expr.desc {
            ExprDesc::Extension(ext) => {
                assert_eq!(ext.name.txt, "ext");
                match &*ext.payload {
                    Payload::Str(inner) => {
                        assert!(matches!(inner[0].desc, StrDesc::Eval(..)))
                    }
                    other => panic!("expected structure payload, got {:?}", other),
                }
            }
            other => panic!("expected extension, got {:?}", other),
        }
    }

    #[test]
    fn test_doc_comment_becomes_pre_doc() {
        let items = parse_str("(** doc for x *)\nlet x = 1").unwrap();
        assert_eq!(items.len(), 1);
        match &items[0].desc {
            StrDesc::Value(_, bindings) => {
                assert!(bindings[0].attrs.iter().any(|a| a.name.txt == docs::DOC_ATTR));
            }
            other => panic!("expected value item, got {:?}", other),
        }
    }

    #[test]
    fn test_floating_doc_becomes_text_item() {
        let items =
            parse_str("let x = 1\n(** floating *)\n(** doc y *)\nlet y = 2").unwrap();
        assert_eq!(items.len(), 3);
        match &items[1].desc {
            StrDesc::Attribute(attr) => assert_eq!(attr.name.txt, docs::TEXT_ATTR),
            other => panic!("expected floating text item, got {:?}", other),
        }
        match &items[2].desc {
            StrDesc::Value(_, bindings) => {
                assert!(bindings[0].attrs.iter().any(|a| a.name.txt == docs::DOC_ATTR));
            }
            other => panic!("expected value item, got {:?}", other),
        }
    }

    #[test]
    fn test_trailing_doc_becomes_post_doc() {
        let items = parse_str("let x = 1\n(** trailing *)").unwrap();
        assert_eq!(items.len(), 1);
        match &items[0].desc {
            StrDesc::Value(_, bindings) => {
                assert!(bindings[0].attrs.iter().any(|a| a.name.txt == docs::DOC_ATTR));
            }
            other => panic!("expected value item, got {:?}", other),
        }
    }

    // ========================================================================
    // Toplevel phrases
    // ========================================================================

    #[test]
    fn test_toplevel_phrases_split_on_double_semi() {
        let (tokens, comments) = lexer::lex("let x = 1;; let y = 2").unwrap();
        let mut parser = Parser::new(&tokens, comments, ParseConfig::default());
        let first = parser.toplevel_phrase().unwrap().expect("first phrase");
        assert_eq!(first.len(), 1);
        let second = parser.toplevel_phrase().unwrap().expect("second phrase");
        assert_eq!(second.len(), 1);
        assert!(parser.toplevel_phrase().unwrap().is_none());
    }
}
