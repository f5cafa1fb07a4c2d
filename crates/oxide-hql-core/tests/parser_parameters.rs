//! Tests for parameters, literals and paths.

mod common;
use common::*;

use oxide_hql_core::ast::{
    CollectionPart, DateTimeLiteral, Expr, Function, InList, Literal, ParameterKind,
    ParameterMarker, Predicate, SelectItem, TemporalUnit,
};
use oxide_hql_core::lexer::NumberKind;
use oxide_hql_core::{DiagnosticKind, Severity};

fn compared(hql: &str) -> Expr {
    match parse_where(hql) {
        Predicate::Comparison { right, .. } => right,
        other => panic!("Expected a comparison, got {other:?}"),
    }
}

#[test]
fn named_and_positional_parameters() {
    let Expr::Parameter(parameter) = compared("from E e where e.id = :id") else {
        panic!("Expected a parameter");
    };
    assert_eq!(parameter.kind, ParameterKind::Named(String::from("id")));

    let Expr::Parameter(parameter) = compared("from E e where e.id = ?1") else {
        panic!("Expected a parameter");
    };
    assert_eq!(parameter.kind, ParameterKind::Positional(Some(1)));
}

#[test]
fn legacy_positional_parameter_warns() {
    let result = parse_result("from E e where e.id = ?");
    assert!(result.statement.is_some());
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].kind, DiagnosticKind::LegacyParameter);
    assert_eq!(result.diagnostics[0].severity, Severity::Warning);
    assert!(!result.has_errors());
}

#[test]
fn spel_templates() {
    let Expr::Parameter(parameter) = compared("from E e where e.owner = :#{#user.name}") else {
        panic!("Expected a parameter");
    };
    assert_eq!(
        parameter.kind,
        ParameterKind::Template {
            marker: ParameterMarker::Colon,
            expression: String::from("#user.name"),
        }
    );

    let Expr::Parameter(parameter) = compared("from E e where e.id = ?#{[0]}") else {
        panic!("Expected a parameter");
    };
    assert!(matches!(
        parameter.kind,
        ParameterKind::Template {
            marker: ParameterMarker::Question,
            ..
        }
    ));
}

#[test]
fn like_wildcards_around_parameter() {
    let Predicate::Like { pattern, .. } = parse_where("from E e where e.name like %:name%")
    else {
        panic!("Expected LIKE");
    };
    let Expr::Parameter(parameter) = pattern else {
        panic!("Expected a parameter pattern");
    };
    assert!(parameter.wildcards.leading);
    assert!(parameter.wildcards.trailing);
}

#[test]
fn in_list_parameter() {
    let Predicate::In { list, negated, .. } = parse_where("from E e where e.id not in :ids")
    else {
        panic!("Expected IN");
    };
    assert!(negated);
    assert!(matches!(list, InList::Parameter(_)));
}

#[test]
fn temporal_literals() {
    let Expr::Literal { value, .. } = compared("from E e where e.day = {d '2024-01-31'}") else {
        panic!("Expected a literal");
    };
    assert_eq!(
        value,
        Literal::DateTime(DateTimeLiteral::JdbcEscape {
            unit: TemporalUnit::Date,
            value: String::from("2024-01-31"),
        })
    );

    let Expr::Literal { value, .. } = compared("from E e where e.at < current timestamp") else {
        panic!("Expected a literal");
    };
    assert_eq!(
        value,
        Literal::DateTime(DateTimeLiteral::Current(TemporalUnit::DateTime))
    );

    let Expr::Literal { value, .. } = compared("from E e where e.day = date '2024-01-31'") else {
        panic!("Expected a literal");
    };
    assert!(matches!(
        value,
        Literal::DateTime(DateTimeLiteral::Typed {
            unit: TemporalUnit::Date,
            ..
        })
    ));
}

#[test]
fn treat_and_index_paths() {
    let Predicate::Comparison {
        left: Expr::Path(path),
        ..
    } = parse_where("from Animal a where treat(a as Dog).breed = 'lab'")
    else {
        panic!("Expected a path comparison");
    };
    let treat = path.treat.as_ref().expect("treated path");
    assert_eq!(treat.target.dotted(), "Dog");
    assert_eq!(path.dotted(), "breed");

    let Predicate::Comparison {
        left: Expr::Path(path),
        ..
    } = parse_where("from Book b where b.chapters[0].title = 'intro'")
    else {
        panic!("Expected a path comparison");
    };
    assert!(path.elements[1].index.is_some());
    assert_eq!(path.dotted(), "b.chapters.title");
}

#[test]
fn collection_continuation() {
    let Predicate::Comparison {
        right: Expr::Path(path),
        ..
    } = parse_where("from Order o where 1 = o.lines.elements")
    else {
        panic!("Expected a path comparison");
    };
    assert_eq!(path.continuation, Some(CollectionPart::Elements));
    assert_eq!(path.dotted(), "o.lines");
}

#[test]
fn invalid_ordinal_is_a_syntax_error() {
    let diagnostic = parse_err("from E e where e.id = ?1.5");
    assert_eq!(diagnostic.kind, DiagnosticKind::Syntax);
    assert!(diagnostic.message.contains("ordinal"));
}

#[test]
fn trailing_dot_decimal_literal() {
    let Expr::Literal {
        value: Literal::Numeric(number),
        ..
    } = compared("from E e where e.n = 1.")
    else {
        panic!("Expected a numeric literal");
    };
    assert_eq!(number.kind, NumberKind::Double);
    assert_eq!(number.text, "1.");
}

fn cast_selection(hql: &str) -> (Option<u32>, Option<u32>) {
    let query = parse_query(hql);
    let select = query.select.expect("select clause");
    match select.selections.into_iter().next().map(|s| s.item) {
        Some(SelectItem::Expression(Expr::Function(function))) => match *function {
            Function::Cast { target, .. } => (target.precision, target.scale),
            other => panic!("Expected a cast, got {other:?}"),
        },
        other => panic!("Expected a function selection, got {other:?}"),
    }
}

#[test]
fn cast_lengths() {
    assert_eq!(
        cast_selection("select cast(e.x as decimal(10, 2)) from E e"),
        (Some(10), Some(2))
    );
    assert_eq!(
        cast_selection("select cast(e.x as varchar(255)) from E e"),
        (Some(255), None)
    );
}

#[test]
fn cast_lengths_must_be_small_integers() {
    let diagnostic = parse_err("select cast(e.x as decimal(1.5, 2)) from E e");
    assert_eq!(diagnostic.kind, DiagnosticKind::Syntax);
    assert!(diagnostic.message.contains("'1.5'"), "{}", diagnostic.message);

    let diagnostic = parse_err("select cast(e.x as decimal(99999999999, 2)) from E e");
    assert!(diagnostic.message.contains("'99999999999'"), "{}", diagnostic.message);
}
