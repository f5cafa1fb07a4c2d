//! Tests for common table expressions and window functions.

mod common;
use common::*;

use oxide_hql_core::ast::{
    Expr, FrameBound, FrameExclusion, FrameUnit, Function, Materialization, QueryBody,
    SelectItem,
};
use oxide_hql_core::DiagnosticKind;

#[test]
fn simple_cte() {
    let select = parse_select("with cte(x) as (select 1) select x from cte");
    let with = select.query.with.expect("with clause");
    assert_eq!(with.ctes.len(), 1);
    let cte = &with.ctes[0];
    assert_eq!(cte.name.name, "cte");
    assert_eq!(cte.attributes.len(), 1);
    assert_eq!(cte.attributes[0].name, "x");
    assert!(cte.materialization.is_none());
    assert!(matches!(cte.query.body, QueryBody::Query(_)));
    assert!(matches!(select.query.body, QueryBody::Query(_)));
}

#[test]
fn several_ctes() {
    let select = parse_select(
        "with a as not materialized (from A a), b as (select a.id from a) select b from b",
    );
    let ctes = select.query.with.expect("with clause").ctes;
    assert_eq!(ctes.len(), 2);
    assert_eq!(
        ctes[0].materialization,
        Some(Materialization::NotMaterialized)
    );
    assert!(ctes[1].attributes.is_empty());
}

#[test]
fn cycle_column_colliding_with_attribute() {
    let result = parse_result(
        "with t(id, mark) as (select n.id, n.mark from Node n) \
         cycle id set mark select t from t",
    );
    assert!(result.statement.is_some());
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(
        result.diagnostics[0].kind,
        DiagnosticKind::SemanticInvalidCycle
    );
    assert!(result.diagnostics[0].message.contains("mark"));
}

#[test]
fn search_column_colliding_with_attribute() {
    let result = parse_result(
        "with t(id, depth) as (select n.id, 0 from Node n) \
         search depth first by id set DEPTH select t from t",
    );
    assert!(result.statement.is_some());
    assert_eq!(
        result.diagnostics[0].kind,
        DiagnosticKind::SemanticInvalidCycle
    );
}

#[test]
fn cycle_clause_requires_a_column() {
    let diagnostic =
        parse_err("with c(x) as (select 1) cycle set m to 1 default 0 select x from c");
    assert_eq!(diagnostic.kind, DiagnosticKind::Syntax);
    assert!(diagnostic.message.contains("'m'"), "{}", diagnostic.message);
}

fn window_function(hql: &str) -> oxide_hql_core::ast::GenericFunction {
    let query = parse_query(hql);
    let select = query.select.expect("select clause");
    match select.selections.into_iter().next().map(|s| s.item) {
        Some(SelectItem::Expression(Expr::Function(function))) => match *function {
            Function::Generic(function) => function,
            other => panic!("Expected a generic function, got {other:?}"),
        },
        other => panic!("Expected a function selection, got {other:?}"),
    }
}

#[test]
fn window_with_frame() {
    let function = window_function(
        "select sum(e.salary) over (partition by e.dept order by e.hired \
         rows between 1 preceding and unbounded following exclude no others) from Employee e",
    );
    let over = function.over.expect("over clause");
    assert_eq!(over.partition_by.len(), 1);
    assert_eq!(over.order_by.len(), 1);
    let frame = over.frame.expect("frame clause");
    assert_eq!(frame.unit, FrameUnit::Rows);
    assert!(matches!(frame.start, FrameBound::Preceding(_)));
    assert_eq!(frame.end, Some(FrameBound::UnboundedFollowing));
    assert_eq!(frame.exclusion, Some(FrameExclusion::NoOthers));
}

#[test]
fn frame_end_unbounded_preceding_is_reported() {
    let result = parse_result(
        "select sum(e.x) over (order by e.x rows between current row and unbounded preceding) \
         from E e",
    );
    assert!(result.statement.is_some());
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(
        result.diagnostics[0].kind,
        DiagnosticKind::SemanticInvalidFrame
    );
    assert!(result.has_errors());
}

#[test]
fn aggregate_clauses() {
    let function = window_function(
        "select count(distinct e.id) filter (where e.active = true) from Employee e",
    );
    assert!(function.distinct);
    assert!(function.filter.is_some());

    let function = window_function(
        "select percentile_cont(0.5) within group (order by e.salary desc) from Employee e",
    );
    assert_eq!(function.within_group.len(), 1);
}

#[test]
fn count_star() {
    let function = window_function("select count(*) from Employee e");
    assert!(function.star);
    assert!(function.args.is_empty());
}
