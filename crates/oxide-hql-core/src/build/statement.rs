//! Statement builders.

use super::expression::expression;
use super::predicate::where_clause;
use super::query::query_expression;
use super::{alias, mismatch, qualified_name, BuildError, BuildResult, Children};
use crate::ast::{
    Assignment, DeleteStatement, InsertSource, InsertStatement, SelectStatement, Statement,
    TargetEntity, UpdateStatement,
};
use crate::lexer::Keyword;
use crate::tree::{Node, NodeKind};

/// Builds the AST of one statement from its parse tree.
///
/// # Errors
///
/// Returns a [`BuildError`] if the tree does not have the shape the grammar
/// produces for a statement.
pub fn build_statement(node: &Node) -> Result<Statement, BuildError> {
    let span = node.span;
    let mut children = Children::new(node);
    let statement = match node.kind {
        NodeKind::SelectStatement => Statement::Select(SelectStatement {
            query: query_expression(children.expect(NodeKind::QueryExpression, "query")?)?,
            span,
        }),
        NodeKind::UpdateStatement => {
            let target = target_entity(children.expect(NodeKind::TargetEntity, "target entity")?)?;
            let set = children.expect(NodeKind::SetClause, "SET clause")?;
            let assignments = set
                .nodes()
                .map(assignment)
                .collect::<BuildResult<Vec<_>>>()?;
            Statement::Update(UpdateStatement {
                versioned: node.has_keyword(Keyword::Versioned),
                target,
                assignments,
                where_clause: optional_where(&mut children)?,
                span,
            })
        }
        NodeKind::DeleteStatement => Statement::Delete(DeleteStatement {
            target: target_entity(children.expect(NodeKind::TargetEntity, "target entity")?)?,
            where_clause: optional_where(&mut children)?,
            span,
        }),
        NodeKind::InsertStatement => {
            let target = target_entity(children.expect(NodeKind::TargetEntity, "target entity")?)?;
            let fields = children
                .expect(NodeKind::TargetFields, "target fields")?
                .nodes()
                .map(qualified_name)
                .collect::<BuildResult<Vec<_>>>()?;
            let source_node = children.next("insert source")?;
            let source = match source_node.kind {
                NodeKind::ValuesList => InsertSource::Values(
                    source_node
                        .nodes()
                        .map(|values| {
                            values.nodes().map(expression).collect::<BuildResult<Vec<_>>>()
                        })
                        .collect::<BuildResult<_>>()?,
                ),
                NodeKind::QueryExpression => {
                    InsertSource::Query(Box::new(query_expression(source_node)?))
                }
                _ => return Err(mismatch("VALUES or query", source_node)),
            };
            Statement::Insert(InsertStatement {
                target,
                fields,
                source,
                span,
            })
        }
        _ => return Err(mismatch("statement", node)),
    };
    children.finish()?;
    Ok(statement)
}

fn optional_where(children: &mut Children<'_>) -> BuildResult<Option<crate::ast::Predicate>> {
    children
        .next_if(NodeKind::WhereClause)
        .map(where_clause)
        .transpose()
}

fn target_entity(node: &Node) -> BuildResult<TargetEntity> {
    let mut children = Children::new(node);
    let entity = qualified_name(children.expect(NodeKind::EntityName, "entity name")?)?;
    let alias = alias(children.next_if(NodeKind::Alias))?;
    children.finish()?;
    Ok(TargetEntity { entity, alias })
}

fn assignment(node: &Node) -> BuildResult<Assignment> {
    let mut children = Children::new(node);
    let target = qualified_name(children.expect(NodeKind::SimplePath, "assigned path")?)?;
    let value = expression(children.next("assigned value")?)?;
    children.finish()?;
    Ok(Assignment { target, value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Expr, Literal};
    use crate::lexer::{Span, Token};
    use crate::parser::Parser;
    use crate::tree::Element;

    fn statement(source: &str) -> Statement {
        let (trees, diagnostics) = Parser::new(source).parse_trees();
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        build_statement(&trees[0]).unwrap()
    }

    #[test]
    fn test_update() {
        let Statement::Update(update) =
            statement("update versioned Person p set p.name = 'x', p.age = p.age + 1 where p.id = 1")
        else {
            panic!("expected update");
        };
        assert!(update.versioned);
        assert_eq!(update.target.alias.unwrap().name, "p");
        assert_eq!(update.assignments.len(), 2);
        assert_eq!(update.assignments[0].target.dotted(), "p.name");
        assert!(matches!(
            update.assignments[0].value,
            Expr::Literal {
                value: Literal::String(_),
                ..
            }
        ));
        assert!(update.where_clause.is_some());
    }

    #[test]
    fn test_delete() {
        let Statement::Delete(delete) = statement("delete from Person") else {
            panic!("expected delete");
        };
        assert_eq!(delete.target.entity.dotted(), "Person");
        assert!(delete.target.alias.is_none());
        assert!(delete.where_clause.is_none());
    }

    #[test]
    fn test_insert_values() {
        let Statement::Insert(insert) =
            statement("insert into Person (id, name) values (1, 'a'), (2, 'b')")
        else {
            panic!("expected insert");
        };
        assert_eq!(insert.fields.len(), 2);
        let InsertSource::Values(rows) = insert.source else {
            panic!("expected values");
        };
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].len(), 2);
    }

    #[test]
    fn test_insert_query() {
        let Statement::Insert(insert) =
            statement("insert Person (id) select o.id from Other o")
        else {
            panic!("expected insert");
        };
        assert!(matches!(insert.source, InsertSource::Query(_)));
    }

    #[test]
    fn test_unknown_root_is_mismatch() {
        let node = Node::new(
            NodeKind::Literal,
            vec![Element::Token(Token::word("null", Span::new(0, 4)))],
        );
        let err = build_statement(&node).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Internal grammar mismatch: expected statement, found Literal node"
        );
    }
}
