//! Query expression builders: CTEs, set operations, clauses and joins.

use super::expression::{expression, instantiation, literal, parameter, path};
use super::predicate::where_clause;
use super::{alias, ident, mismatch, qualified_name, BuildError, BuildResult, Children};
use crate::ast::{
    Cte, CycleClause, FetchClause, FromClause, FromRoot, FromSource, Join, JoinRestriction,
    JoinTarget, JoinType, Literal, Materialization, NullOrdering, OrderDirection, Query, QueryBody,
    QueryExpression, QueryForm, QueryOrder, RestrictionKind, RowCount, SearchClause, SearchOrder,
    SearchSpecification, SelectClause, SelectItem, Selection, SetOperator, SetOperatorKind,
    SortedItem, WithClause,
};
use crate::lexer::{Keyword, TokenKind};
use crate::tree::{Node, NodeKind};

/// Builds a `QueryExpression` node. Set operations fold left to right.
pub(crate) fn query_expression(node: &Node) -> BuildResult<QueryExpression> {
    if node.kind != NodeKind::QueryExpression {
        return Err(mismatch("query expression", node));
    }
    let mut children = Children::new(node);
    let with = children
        .next_if(NodeKind::WithClause)
        .map(with_clause)
        .transpose()?;

    let mut body = query_term(children.next("query term")?)?;
    while let Some(operator) = children.next_if(NodeKind::SetOperator) {
        let op = set_operator(operator)?;
        let right = query_term(children.next("right query term")?)?;
        body = QueryBody::SetOperation {
            left: Box::new(body),
            op,
            right: Box::new(right),
        };
    }

    let order = children
        .next_if(NodeKind::QueryOrder)
        .map(query_order)
        .transpose()?;
    children.finish()?;

    Ok(QueryExpression {
        with,
        body,
        order,
        span: node.span,
    })
}

/// Builds the query of a `Subquery` node.
pub(crate) fn subquery(node: &Node) -> BuildResult<QueryExpression> {
    if node.kind != NodeKind::Subquery {
        return Err(mismatch("subquery", node));
    }
    query_expression(Children::new(node).expect(NodeKind::QueryExpression, "query")?)
}

fn set_operator(node: &Node) -> BuildResult<SetOperator> {
    let kind = match node.first_keyword() {
        Some(Keyword::Union) => SetOperatorKind::Union,
        Some(Keyword::Intersect) => SetOperatorKind::Intersect,
        Some(Keyword::Except) => SetOperatorKind::Except,
        _ => return Err(mismatch("set operator", node)),
    };
    Ok(SetOperator {
        kind,
        all: node.has_keyword(Keyword::All),
    })
}

fn query_term(node: &Node) -> BuildResult<QueryBody> {
    let form = match node.kind {
        NodeKind::ParenthesizedQuery => {
            let inner = Children::new(node).expect(NodeKind::QueryExpression, "query")?;
            return Ok(QueryBody::Nested(Box::new(query_expression(inner)?)));
        }
        NodeKind::SelectQuery => QueryForm::Select,
        NodeKind::FromQuery => QueryForm::From,
        _ => return Err(mismatch("query term", node)),
    };

    let mut query = Query {
        form,
        select: None,
        from: None,
        where_clause: None,
        group_by: Vec::new(),
        having: None,
        span: node.span,
    };
    for child in node.nodes() {
        match child.kind {
            NodeKind::SelectClause => query.select = Some(select_clause(child)?),
            NodeKind::FromClause => query.from = Some(from_clause(child)?),
            NodeKind::WhereClause => query.where_clause = Some(where_clause(child)?),
            NodeKind::GroupByClause => {
                query.group_by = child.nodes().map(expression).collect::<BuildResult<_>>()?;
            }
            NodeKind::HavingClause => query.having = Some(where_clause(child)?),
            _ => return Err(mismatch("query clause", child)),
        }
    }
    Ok(QueryBody::Query(Box::new(query)))
}

fn with_clause(node: &Node) -> BuildResult<WithClause> {
    Ok(WithClause {
        ctes: node.nodes().map(cte).collect::<BuildResult<_>>()?,
        span: node.span,
    })
}

fn cte(node: &Node) -> BuildResult<Cte> {
    if node.kind != NodeKind::Cte {
        return Err(mismatch("common table expression", node));
    }
    let mut children = Children::new(node);
    let name = ident(children.expect(NodeKind::Identifier, "name")?)?;
    let attributes = children
        .next_if(NodeKind::CteAttributes)
        .map(identifiers)
        .transpose()?
        .unwrap_or_default();
    let materialization = if node.has_keyword(Keyword::Not) {
        Some(Materialization::NotMaterialized)
    } else if node.has_keyword(Keyword::Materialized) {
        Some(Materialization::Materialized)
    } else {
        None
    };
    let query = query_expression(children.expect(NodeKind::QueryExpression, "query")?)?;
    let search = children
        .next_if(NodeKind::SearchClause)
        .map(search_clause)
        .transpose()?;
    let cycle = children
        .next_if(NodeKind::CycleClause)
        .map(cycle_clause)
        .transpose()?;
    children.finish()?;

    Ok(Cte {
        name,
        attributes,
        materialization,
        query: Box::new(query),
        search,
        cycle,
        span: node.span,
    })
}

fn identifiers(node: &Node) -> BuildResult<Vec<crate::ast::Ident>> {
    node.nodes().map(ident).collect()
}

fn search_clause(node: &Node) -> BuildResult<SearchClause> {
    let order = if node.has_keyword(Keyword::Breadth) {
        SearchOrder::BreadthFirst
    } else {
        SearchOrder::DepthFirst
    };
    let mut children = Children::new(node);
    let mut specifications = Vec::new();
    while let Some(specification) = children.next_if(NodeKind::SearchSpecification) {
        let attribute = ident(
            Children::new(specification).expect(NodeKind::Identifier, "search attribute")?,
        )?;
        specifications.push(SearchSpecification {
            attribute,
            direction: direction(specification),
            nulls: nulls(specification),
        });
    }
    let set_column = ident(children.expect(NodeKind::Identifier, "sequence column")?)?;
    children.finish()?;
    Ok(SearchClause {
        order,
        specifications,
        set_column,
        span: node.span,
    })
}

fn cycle_clause(node: &Node) -> BuildResult<CycleClause> {
    let mut children = Children::new(node);
    let columns = identifiers(children.expect(NodeKind::CteAttributes, "cycle columns")?)?;
    let mark_column = ident(children.expect(NodeKind::Identifier, "mark column")?)?;
    let mark_value = children.next_if(NodeKind::Literal).map(literal).transpose()?;
    let default_value: Option<Literal> =
        children.next_if(NodeKind::Literal).map(literal).transpose()?;
    let path_column = children.next_if(NodeKind::Identifier).map(ident).transpose()?;
    children.finish()?;
    Ok(CycleClause {
        columns,
        mark_column,
        mark_value,
        default_value,
        path_column,
        span: node.span,
    })
}

fn select_clause(node: &Node) -> BuildResult<SelectClause> {
    let list = Children::new(node).expect(NodeKind::SelectionList, "selection list")?;
    Ok(SelectClause {
        distinct: node.has_keyword(Keyword::Distinct),
        selections: list.nodes().map(selection).collect::<BuildResult<_>>()?,
        span: node.span,
    })
}

fn selection(node: &Node) -> BuildResult<Selection> {
    if node.kind != NodeKind::Selection {
        return Err(mismatch("selection", node));
    }
    let mut children = Children::new(node);
    let item_node = children.next("selected item")?;
    let item = match item_node.kind {
        NodeKind::Instantiation => SelectItem::Instantiation(instantiation(item_node)?),
        NodeKind::MapEntrySelection => SelectItem::MapEntry(path(
            Children::new(item_node).expect(NodeKind::Path, "map path")?,
        )?),
        NodeKind::ObjectSelection => SelectItem::Object(ident(
            Children::new(item_node).expect(NodeKind::Identifier, "alias")?,
        )?),
        _ => SelectItem::Expression(expression(item_node)?),
    };
    let alias = alias(children.next_if(NodeKind::Alias))?;
    children.finish()?;
    Ok(Selection {
        item,
        alias,
        span: node.span,
    })
}

fn from_clause(node: &Node) -> BuildResult<FromClause> {
    Ok(FromClause {
        roots: node.nodes().map(from_root).collect::<BuildResult<_>>()?,
        span: node.span,
    })
}

fn from_root(node: &Node) -> BuildResult<FromRoot> {
    if node.kind != NodeKind::EntityWithJoins {
        return Err(mismatch("from root", node));
    }
    let mut children = Children::new(node);
    let root = children.next("root")?;
    let mut parts = Children::new(root);
    let source = match root.kind {
        NodeKind::EntityRoot => {
            FromSource::Entity(qualified_name(parts.expect(NodeKind::EntityName, "entity")?)?)
        }
        NodeKind::SubqueryRoot => FromSource::Subquery {
            query: Box::new(subquery(parts.expect(NodeKind::Subquery, "subquery")?)?),
            lateral: root.has_keyword(Keyword::Lateral),
        },
        _ => return Err(mismatch("from root", root)),
    };
    let alias = alias(parts.next_if(NodeKind::Alias))?;
    parts.finish()?;

    Ok(FromRoot {
        source,
        alias,
        joins: children.rest().map(join).collect::<BuildResult<_>>()?,
        span: node.span,
    })
}

fn join(node: &Node) -> BuildResult<Join> {
    let span = node.span;
    let mut children = Children::new(node);
    let join = match node.kind {
        NodeKind::CrossJoin => Join::Cross {
            entity: qualified_name(children.expect(NodeKind::EntityName, "entity")?)?,
            alias: alias(children.next_if(NodeKind::Alias))?,
            span,
        },
        NodeKind::CollectionJoin => Join::Collection {
            path: path(children.expect(NodeKind::Path, "collection path")?)?,
            alias: alias(children.next_if(NodeKind::Alias))?,
            span,
        },
        NodeKind::Join => {
            let join_type = match node.first_keyword() {
                Some(Keyword::Left) => JoinType::Left,
                Some(Keyword::Right) => JoinType::Right,
                Some(Keyword::Full) => JoinType::Full,
                _ => JoinType::Inner,
            };
            let target_node = children.next("join target")?;
            let mut parts = Children::new(target_node);
            let target = match target_node.kind {
                NodeKind::JoinPath => JoinTarget::Path(path(parts.expect(NodeKind::Path, "path")?)?),
                NodeKind::JoinSubquery => JoinTarget::Subquery {
                    query: Box::new(subquery(parts.expect(NodeKind::Subquery, "subquery")?)?),
                    lateral: target_node.has_keyword(Keyword::Lateral),
                },
                _ => return Err(mismatch("join target", target_node)),
            };
            let alias = alias(parts.next_if(NodeKind::Alias))?;
            let restriction = children
                .next_if(NodeKind::JoinRestriction)
                .map(join_restriction)
                .transpose()?;
            Join::Qualified {
                join_type,
                fetch: node.has_keyword(Keyword::Fetch),
                target,
                alias,
                restriction,
                span,
            }
        }
        _ => return Err(mismatch("join", node)),
    };
    children.finish()?;
    Ok(join)
}

fn join_restriction(node: &Node) -> BuildResult<JoinRestriction> {
    let kind = if node.first_keyword() == Some(Keyword::With) {
        RestrictionKind::With
    } else {
        RestrictionKind::On
    };
    Ok(JoinRestriction {
        kind,
        predicate: super::predicate::predicate(Children::new(node).next("join condition")?)?,
    })
}

fn query_order(node: &Node) -> BuildResult<QueryOrder> {
    let mut order = QueryOrder {
        order_by: Vec::new(),
        limit: None,
        offset: None,
        fetch: None,
        span: node.span,
    };
    for child in node.nodes() {
        match child.kind {
            NodeKind::OrderByClause => order.order_by = order_by_clause(child)?,
            NodeKind::LimitClause => order.limit = Some(row_count(child)?),
            NodeKind::OffsetClause => order.offset = Some(row_count(child)?),
            NodeKind::FetchClause => {
                order.fetch = Some(FetchClause {
                    count: row_count(child)?,
                    percent: child.has_token(&TokenKind::Percent),
                    with_ties: child.has_keyword(Keyword::Ties),
                });
            }
            _ => return Err(mismatch("order clause", child)),
        }
    }
    Ok(order)
}

/// Builds the items of an `OrderByClause` node.
pub(crate) fn order_by_clause(node: &Node) -> BuildResult<Vec<SortedItem>> {
    if node.kind != NodeKind::OrderByClause {
        return Err(mismatch("order by clause", node));
    }
    node.nodes()
        .map(|item| {
            Ok(SortedItem {
                expr: expression(Children::new(item).next("sort expression")?)?,
                direction: direction(item),
                nulls: nulls(item),
            })
        })
        .collect()
}

fn direction(node: &Node) -> OrderDirection {
    if node.has_keyword(Keyword::Desc) {
        OrderDirection::Desc
    } else {
        OrderDirection::Asc
    }
}

fn nulls(node: &Node) -> Option<NullOrdering> {
    if !node.has_keyword(Keyword::Nulls) {
        None
    } else if node.has_keyword(Keyword::First) {
        Some(NullOrdering::First)
    } else {
        Some(NullOrdering::Last)
    }
}

fn row_count(node: &Node) -> BuildResult<RowCount> {
    let count = Children::new(node).next("row count")?;
    match count.kind {
        NodeKind::Parameter => Ok(RowCount::Parameter(parameter(count)?)),
        NodeKind::Literal => match literal(count)? {
            Literal::Numeric(number) => Ok(RowCount::Literal(number)),
            _ => Err(mismatch("numeric row count", count)),
        },
        _ => Err(BuildError::GrammarMismatch {
            expected: "row count",
            found: count.kind,
            span: count.span,
        }),
    }
}
