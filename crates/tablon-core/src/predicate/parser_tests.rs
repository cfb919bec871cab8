use super::*;

fn column(name: &str) -> Expr {
    Expr::Index {
        target: Box::new(Expr::Frame),
        index: Box::new(Expr::Literal(Literal::Str(name.to_string()))),
    }
}

fn string(value: &str) -> Expr {
    Expr::Literal(Literal::Str(value.to_string()))
}

#[test]
fn test_parse_filtered_frame() {
    let expr = parse("df[df['MARCA'] == 'TOYOTA']").unwrap();
    assert_eq!(
        expr,
        Expr::Index {
            target: Box::new(Expr::Frame),
            index: Box::new(Expr::Compare {
                left: Box::new(column("MARCA")),
                op: CompareOp::Eq,
                right: Box::new(string("TOYOTA")),
            }),
        }
    );
}

#[test]
fn test_or_binds_looser_than_and() {
    let expr = parse("(df.A == 1) | (df.B == 2) & (df.C == 3)").unwrap();
    let Expr::Or(_, right) = expr else {
        panic!("expected a disjunction at the root");
    };
    assert!(matches!(*right, Expr::And(_, _)));
}

#[test]
fn test_comparison_binds_tighter_than_ampersand() {
    let expr = parse("df['A'] > 1 & df['B'] < 2").unwrap();
    let Expr::And(left, right) = expr else {
        panic!("expected a conjunction at the root");
    };
    assert!(matches!(*left, Expr::Compare { op: CompareOp::Gt, .. }));
    assert!(matches!(*right, Expr::Compare { op: CompareOp::Lt, .. }));
}

#[test]
fn test_negation_keywords() {
    let tilde = parse("~df['A'].isna()").unwrap();
    let keyword = parse("not df['A'].isna()").unwrap();
    assert_eq!(tilde, keyword);
    assert!(matches!(tilde, Expr::Not(_)));
}

#[test]
fn test_method_call_with_keyword_arguments() {
    let expr = parse("df['MODELO'].str.contains('hilux', case=False, na=False)").unwrap();
    let Expr::Call { target, args } = expr else {
        panic!("expected a call");
    };
    assert!(matches!(*target, Expr::Attribute { ref name, .. } if name == "contains"));
    assert_eq!(args.len(), 3);
    assert_eq!(args[0].name, None);
    assert_eq!(args[1].name.as_deref(), Some("case"));
    assert_eq!(args[1].value, Expr::Literal(Literal::Bool(false)));
    assert_eq!(args[2].name.as_deref(), Some("na"));
}

#[test]
fn test_lists_and_tuples() {
    let list = parse("df['MARCA'].isin(['TOYOTA', 'NISSAN'])").unwrap();
    let tuple = parse("df['MARCA'].isin(('TOYOTA', 'NISSAN'))").unwrap();
    assert_eq!(list, tuple);

    let single = parse("df['MARCA'].isin(['TOYOTA'])").unwrap();
    let Expr::Call { args, .. } = single else {
        panic!("expected a call");
    };
    assert_eq!(args[0].value, Expr::List(vec![string("TOYOTA")]));
}

#[test]
fn test_projection_parses_as_list_index() {
    let expr = parse("df[['MARCA', 'MODELO']]").unwrap();
    assert_eq!(
        expr,
        Expr::Index {
            target: Box::new(Expr::Frame),
            index: Box::new(Expr::List(vec![string("MARCA"), string("MODELO")])),
        }
    );
}

#[test]
fn test_loc_with_row_and_column_parts() {
    let expr = parse("df.loc[df['A'] == 1, 'B']").unwrap();
    let Expr::Index { index, .. } = expr else {
        panic!("expected a subscript");
    };
    assert!(matches!(*index, Expr::List(ref items) if items.len() == 2));
}

#[test]
fn test_negative_numbers() {
    let expr = parse("df['GAP_IMP'] > -1.5").unwrap();
    let Expr::Compare { right, .. } = expr else {
        panic!("expected a comparison");
    };
    assert_eq!(*right, Expr::Literal(Literal::Number(-1.5)));
}

#[test]
fn test_empty_expression_is_syntax_fault() {
    assert_eq!(parse("   ").unwrap_err(), PredicateFault::syntax("empty expression", 0));
}

#[test]
fn test_trailing_tokens_are_syntax_fault() {
    let err = parse("df['A'] == 1 2").unwrap_err();
    assert!(matches!(err, PredicateFault::Syntax { position: 13, .. }));
}

#[test]
fn test_chained_comparison_is_rejected() {
    assert!(matches!(
        parse("1 < df['A'] < 3"),
        Err(PredicateFault::Syntax { .. })
    ));
}

#[test]
fn test_statements_are_rejected() {
    assert!(matches!(
        parse("import os"),
        Err(PredicateFault::Syntax { .. })
    ));
    assert!(matches!(
        parse("df = df[df['A'] == 1]"),
        Err(PredicateFault::Syntax { .. })
    ));
}

#[test]
fn test_unbalanced_brackets() {
    assert!(matches!(
        parse("df[df['A'] == 1"),
        Err(PredicateFault::Syntax { .. })
    ));
}

#[test]
fn test_deep_nesting_is_rejected() {
    let source = format!("{}df{}", "(".repeat(200), ")".repeat(200));
    let err = parse(&source).unwrap_err();
    assert!(err.to_string().contains("nested too deeply"));
}

#[test]
fn test_long_condition_chains_are_rejected() {
    for joiner in [" & ", " | ", " and "] {
        let terms = vec!["(df['MARCA'] != 'X')"; 1000].join(joiner);
        let err = parse(&format!("df[{}]", terms)).unwrap_err();
        assert!(matches!(err, PredicateFault::Syntax { .. }));
        assert!(err.to_string().contains("nested too deeply"));
    }
}

#[test]
fn test_long_postfix_chains_are_rejected() {
    for source in [
        format!("df{}", ".MARCA".repeat(1000)),
        format!("df{}", "[0]".repeat(1000)),
        format!("df.str{}", ".lower()".repeat(1000)),
    ] {
        let err = parse(&source).unwrap_err();
        assert!(err.to_string().contains("nested too deeply"));
    }
}

#[test]
fn test_short_condition_chains_are_accepted() {
    let terms = vec!["(df['MARCA'] != 'X')"; 30].join(" & ");
    assert!(parse(&format!("df[{}]", terms)).is_ok());
}

#[test]
fn test_keyword_before_positional_is_rejected() {
    assert!(matches!(
        parse("df['A'].str.contains(case=False, 'x')"),
        Err(PredicateFault::Syntax { .. })
    ));
}
