//! Tests for words that act as keywords only in some positions.

mod common;
use common::*;

use oxide_hql_core::ast::{Expr, FromSource, Predicate, SelectItem};

#[test]
fn keyword_as_alias_and_path_root() {
    let query = parse_query("select order.id from Order order");
    let from = query.from.expect("from clause");
    let root = &from.roots[0];
    assert_eq!(root.alias.as_ref().unwrap().name, "order");
    let FromSource::Entity(entity) = &root.source else {
        panic!("Expected an entity root");
    };
    assert_eq!(entity.dotted(), "Order");

    let select = query.select.expect("select clause");
    let SelectItem::Expression(Expr::Path(path)) = &select.selections[0].item else {
        panic!("Expected a path selection");
    };
    assert_eq!(path.dotted(), "order.id");
}

#[test]
fn keywords_as_attribute_names() {
    let predicate = parse_where("from Event e where e.from = 1 and e.group.select = 'x'");
    let Predicate::And { left, right, .. } = predicate else {
        panic!("Expected AND");
    };
    let Predicate::Comparison {
        left: Expr::Path(path),
        ..
    } = *left
    else {
        panic!("Expected a path comparison");
    };
    assert_eq!(path.dotted(), "e.from");
    let Predicate::Comparison {
        left: Expr::Path(path),
        ..
    } = *right
    else {
        panic!("Expected a path comparison");
    };
    assert_eq!(path.dotted(), "e.group.select");
}

#[test]
fn keyword_entity_names() {
    let query = parse_query("from Member m where m.id = 1");
    let from = query.from.expect("from clause");
    let FromSource::Entity(entity) = &from.roots[0].source else {
        panic!("Expected an entity root");
    };
    assert_eq!(entity.dotted(), "Member");
}

#[test]
fn alias_stops_at_clause_keywords() {
    let query = parse_query("from Employee where id = 1");
    let from = query.from.expect("from clause");
    assert!(from.roots[0].alias.is_none());
    assert!(query.where_clause.is_some());
}

#[test]
fn limit_without_count_is_an_alias() {
    let query = parse_query("select limit.id from Limit limit");
    let from = query.from.expect("from clause");
    assert_eq!(from.roots[0].alias.as_ref().unwrap().name, "limit");
}

#[test]
fn quoted_identifier() {
    let query = parse_query("select `select`.name from Keyword `select`");
    let from = query.from.expect("from clause");
    let alias = from.roots[0].alias.as_ref().unwrap();
    assert_eq!(alias.name, "select");
    assert!(alias.quoted);
}

#[test]
fn function_named_like_a_keyword() {
    let query = parse_query("select left(e.name, 2), count(e) from E e");
    assert_eq!(query.select.expect("select clause").selections.len(), 2);
}
