//! Tests for operator precedence and the predicate/expression layers.

mod common;
use common::*;

use oxide_hql_core::ast::{
    BinaryOp, ComparisonOp, DatetimeField, Expr, Literal, Predicate, SelectItem, UnaryOp,
};

fn selected(hql: &str) -> Expr {
    let query = parse_query(hql);
    let select = query.select.expect("select clause");
    match select.selections.into_iter().next().map(|s| s.item) {
        Some(SelectItem::Expression(expr)) => expr,
        other => panic!("Expected an expression selection, got {other:?}"),
    }
}

#[test]
fn and_binds_tighter_than_or() {
    let predicate = parse_where("from E e where e.a = 1 or e.b = 2 and e.c = 3");
    let Predicate::Or { left, right, .. } = predicate else {
        panic!("Expected OR at the root");
    };
    assert!(matches!(*left, Predicate::Comparison { .. }));
    assert!(matches!(*right, Predicate::And { .. }));
}

#[test]
fn not_applies_to_the_next_predicate() {
    let predicate = parse_where("from E e where not e.a = 1 and e.b = 2");
    let Predicate::And { left, .. } = predicate else {
        panic!("Expected AND at the root");
    };
    assert!(matches!(*left, Predicate::Not { .. }));
}

#[test]
fn multiplication_binds_tighter_than_addition() {
    let Expr::Binary { op, right, .. } = selected("select 1 + 2 * 3 from E e") else {
        panic!("Expected a binary expression");
    };
    assert_eq!(op, BinaryOp::Add);
    assert!(matches!(
        *right,
        Expr::Binary {
            op: BinaryOp::Mul,
            ..
        }
    ));
}

#[test]
fn addition_is_left_associative() {
    let Expr::Binary { op, left, .. } = selected("select e.a - e.b + e.c from E e") else {
        panic!("Expected a binary expression");
    };
    assert_eq!(op, BinaryOp::Add);
    assert!(matches!(
        *left,
        Expr::Binary {
            op: BinaryOp::Sub,
            ..
        }
    ));
}

#[test]
fn concatenation_binds_loosest() {
    let Expr::Binary { op, .. } = selected("select e.a || e.b + 1 from E e") else {
        panic!("Expected a binary expression");
    };
    assert_eq!(op, BinaryOp::Concat);
}

#[test]
fn negative_number_is_a_literal() {
    let Expr::Literal {
        value: Literal::Numeric(number),
        ..
    } = selected("select -42 from E e")
    else {
        panic!("Expected a numeric literal");
    };
    assert!(number.negative);
    assert_eq!(number.as_i64(), Some(-42));
}

#[test]
fn sign_before_path_is_unary() {
    let Expr::Unary { op, .. } = selected("select -e.amount from E e") else {
        panic!("Expected a unary expression");
    };
    assert_eq!(op, UnaryOp::Neg);
}

#[test]
fn duration_postfix() {
    let Expr::ToDuration { unit, expr, .. } = selected("select (e.end - e.start) day from E e")
    else {
        panic!("Expected a duration");
    };
    assert_eq!(unit, DatetimeField::Day);
    assert!(matches!(*expr, Expr::Grouped { .. }));

    let Expr::FromDuration { unit, .. } = selected("select e.elapsed by second from E e") else {
        panic!("Expected a duration conversion");
    };
    assert_eq!(unit, DatetimeField::Second);
}

#[test]
fn grouped_predicate_and_grouped_expression() {
    let predicate = parse_where("from E e where (e.a = 1 or e.b = 2) and e.c = 3");
    let Predicate::And { left, .. } = predicate else {
        panic!("Expected AND at the root");
    };
    assert!(matches!(*left, Predicate::Grouped { .. }));

    let predicate = parse_where("from E e where (e.a + 1) * 2 > 10");
    let Predicate::Comparison { left, op, .. } = predicate else {
        panic!("Expected a comparison");
    };
    assert_eq!(op, ComparisonOp::Gt);
    assert!(matches!(
        left,
        Expr::Binary {
            op: BinaryOp::Mul,
            ..
        }
    ));
}

#[test]
fn chained_comparison_is_rejected() {
    let diagnostic = parse_err("from E e where e.a < e.b < e.c");
    assert!(diagnostic.message.contains("cannot be chained"));
}

#[test]
fn predicate_in_select_list() {
    let expr = selected("select e.a = 1 from E e");
    assert!(matches!(expr, Expr::Predicate(_)));
}

#[test]
fn case_expressions() {
    let expr = selected(
        "select case when e.a > 0 then 'pos' when e.a < 0 then 'neg' else 'zero' end from E e",
    );
    assert!(matches!(expr, Expr::Case(_)));

    let expr = selected("select case e.kind when 1 then 'one' end from E e");
    assert!(matches!(expr, Expr::Case(_)));
}

#[test]
fn duration_applies_to_the_whole_sum() {
    let Expr::ToDuration { unit, expr, .. } = selected("select e.d + 1 day from E e") else {
        panic!("Expected a duration at the root");
    };
    assert_eq!(unit, DatetimeField::Day);
    assert!(matches!(
        *expr,
        Expr::Binary {
            op: BinaryOp::Add,
            ..
        }
    ));

    let Expr::ToDuration { expr, .. } = selected("select e.d * 2 hour from E e") else {
        panic!("Expected a duration at the root");
    };
    assert!(matches!(
        *expr,
        Expr::Binary {
            op: BinaryOp::Mul,
            ..
        }
    ));
}
