#![allow(dead_code)]

use oxide_hql_core::ast::{
    DeleteStatement, InsertStatement, Predicate, Query, QueryBody, SelectStatement, Statement,
    UpdateStatement,
};
use oxide_hql_core::{Diagnostic, DocumentResult, ParseResult};

pub fn parse_result(hql: &str) -> ParseResult {
    oxide_hql_core::parse(hql)
}

pub fn parse(hql: &str) -> Statement {
    let result = oxide_hql_core::parse(hql);
    assert!(
        result.diagnostics.is_empty(),
        "Unexpected diagnostics for: {hql}\n{:?}",
        result.diagnostics
    );
    result
        .statement
        .unwrap_or_else(|| panic!("Failed to parse: {hql}"))
}

pub fn parse_err(hql: &str) -> Diagnostic {
    let result = oxide_hql_core::parse(hql);
    assert!(
        result.statement.is_none(),
        "Expected parse error for: {hql}"
    );
    result
        .diagnostics
        .into_iter()
        .next()
        .unwrap_or_else(|| panic!("No diagnostic for: {hql}"))
}

pub fn parse_document(hql: &str) -> DocumentResult {
    oxide_hql_core::parse_document(hql)
}

pub fn parse_select(hql: &str) -> SelectStatement {
    match parse(hql) {
        Statement::Select(s) => s,
        other => panic!("Expected SELECT, got {other:?}"),
    }
}

pub fn parse_insert(hql: &str) -> InsertStatement {
    match parse(hql) {
        Statement::Insert(i) => i,
        other => panic!("Expected INSERT, got {other:?}"),
    }
}

pub fn parse_update(hql: &str) -> UpdateStatement {
    match parse(hql) {
        Statement::Update(u) => u,
        other => panic!("Expected UPDATE, got {other:?}"),
    }
}

pub fn parse_delete(hql: &str) -> DeleteStatement {
    match parse(hql) {
        Statement::Delete(d) => d,
        other => panic!("Expected DELETE, got {other:?}"),
    }
}

/// Returns the single query of a SELECT statement without set operations.
pub fn parse_query(hql: &str) -> Query {
    match parse_select(hql).query.body {
        QueryBody::Query(query) => *query,
        other => panic!("Expected a single query, got {other:?}"),
    }
}

/// Returns the WHERE predicate of a single query.
pub fn parse_where(hql: &str) -> Predicate {
    parse_query(hql)
        .where_clause
        .unwrap_or_else(|| panic!("No WHERE clause in: {hql}"))
}
