//! Predicate builders.

use super::expression::{expression, is_predicate_kind, literal, parameter, path};
use super::query::subquery;
use super::{mismatch, qualified_name, BuildError, BuildResult, Children};
use crate::ast::{ExistsTarget, InList, Literal, Predicate};
use crate::lexer::Keyword;
use crate::parser::token_to_comparison_op;
use crate::tree::{Node, NodeKind};

/// Builds a predicate. Expression nodes in predicate position become
/// [`Predicate::Expression`].
pub(crate) fn predicate(node: &Node) -> BuildResult<Predicate> {
    let span = node.span;
    let negated = node.has_keyword(Keyword::Not);
    let mut children = Children::new(node);

    let predicate = match node.kind {
        NodeKind::OrPredicate | NodeKind::AndPredicate => {
            let left = Box::new(predicate(children.next("left operand")?)?);
            let right = Box::new(predicate(children.next("right operand")?)?);
            if node.kind == NodeKind::OrPredicate {
                Predicate::Or { left, right, span }
            } else {
                Predicate::And { left, right, span }
            }
        }
        NodeKind::NotPredicate => Predicate::Not {
            predicate: Box::new(predicate(children.next("negated predicate")?)?),
            span,
        },
        NodeKind::GroupedPredicate => Predicate::Grouped {
            predicate: Box::new(predicate(children.next("grouped predicate")?)?),
            span,
        },
        NodeKind::RelationalPredicate => {
            let op = node
                .tokens()
                .find_map(|token| token_to_comparison_op(&token.kind))
                .ok_or(BuildError::MissingChild {
                    parent: node.kind,
                    missing: "comparison operator",
                    span,
                })?;
            Predicate::Comparison {
                left: expression(children.next("left operand")?)?,
                op,
                right: expression(children.next("right operand")?)?,
                span,
            }
        }
        NodeKind::BetweenPredicate => Predicate::Between {
            expr: expression(children.next("operand")?)?,
            low: expression(children.next("lower bound")?)?,
            high: expression(children.next("upper bound")?)?,
            negated,
            span,
        },
        NodeKind::LikePredicate => {
            let expr = expression(children.next("operand")?)?;
            let pattern = expression(children.next("pattern")?)?;
            let escape = match children.next_if(NodeKind::Literal) {
                Some(escape) => match literal(escape)? {
                    Literal::String(value) => Some(value),
                    _ => return Err(mismatch("escape character", escape)),
                },
                None => None,
            };
            Predicate::Like {
                expr,
                pattern,
                escape,
                case_insensitive: node.has_keyword(Keyword::Ilike),
                negated,
                span,
            }
        }
        NodeKind::InPredicate => Predicate::In {
            expr: expression(children.next("operand")?)?,
            list: in_list(children.next("in list")?)?,
            negated,
            span,
        },
        NodeKind::ExistsPredicate => {
            let target = children.next("exists target")?;
            let target = if target.kind == NodeKind::SimplePath {
                if node.has_keyword(Keyword::Indices) {
                    ExistsTarget::Indices(qualified_name(target)?)
                } else {
                    ExistsTarget::Elements(qualified_name(target)?)
                }
            } else {
                ExistsTarget::Expression(expression(target)?)
            };
            Predicate::Exists { target, span }
        }
        NodeKind::IsNullPredicate => Predicate::IsNull {
            expr: expression(children.next("operand")?)?,
            negated,
            span,
        },
        NodeKind::IsEmptyPredicate => Predicate::IsEmpty {
            expr: expression(children.next("operand")?)?,
            negated,
            span,
        },
        NodeKind::IsDistinctFromPredicate => Predicate::IsDistinctFrom {
            left: expression(children.next("left operand")?)?,
            right: expression(children.next("right operand")?)?,
            negated,
            span,
        },
        NodeKind::MemberOfPredicate => Predicate::MemberOf {
            expr: expression(children.next("member")?)?,
            collection: path(children.expect(NodeKind::Path, "collection path")?)?,
            negated,
            span,
        },
        NodeKind::ExpressionPredicate => {
            Predicate::Expression(expression(children.next("expression")?)?)
        }
        kind if is_predicate_kind(kind) => return Err(mismatch("predicate", node)),
        _ => Predicate::Expression(expression(node)?),
    };
    Ok(predicate)
}

fn in_list(node: &Node) -> BuildResult<InList> {
    let mut children = Children::new(node);
    let list = match node.kind {
        NodeKind::ExplicitInList => {
            InList::Values(children.rest().map(expression).collect::<BuildResult<_>>()?)
        }
        NodeKind::SubqueryInList => InList::Subquery(Box::new(subquery(
            children.expect(NodeKind::Subquery, "subquery")?,
        )?)),
        NodeKind::ParameterInList => {
            InList::Parameter(parameter(children.expect(NodeKind::Parameter, "parameter")?)?)
        }
        NodeKind::CollectionInList => {
            let collection = qualified_name(children.expect(NodeKind::SimplePath, "collection")?)?;
            if node.has_keyword(Keyword::Indices) {
                InList::Indices(collection)
            } else {
                InList::Elements(collection)
            }
        }
        _ => return Err(mismatch("in list", node)),
    };
    Ok(list)
}

/// Builds a `WHERE` or `HAVING` clause. Comma separated predicates are
/// combined with AND.
pub(crate) fn where_clause(node: &Node) -> BuildResult<Predicate> {
    if !matches!(node.kind, NodeKind::WhereClause | NodeKind::HavingClause) {
        return Err(mismatch("where clause", node));
    }
    let mut predicates = node.nodes().map(predicate);
    let first = predicates.next().ok_or(BuildError::MissingChild {
        parent: node.kind,
        missing: "predicate",
        span: node.span,
    })??;
    predicates.try_fold(first, |left, right| {
        let right = right?;
        let span = left.span().merge(right.span());
        Ok(Predicate::And {
            left: Box::new(left),
            right: Box::new(right),
            span,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ComparisonOp, Expr};
    use crate::parser::Parser;

    fn where_predicate(condition: &str) -> Predicate {
        let source = format!("from Employee e where {condition}");
        let (trees, diagnostics) = Parser::new(&source).parse_trees();
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        let clause = trees[0].descendant(NodeKind::WhereClause).unwrap();
        where_clause(clause).unwrap()
    }

    #[test]
    fn test_comparison() {
        let Predicate::Comparison { op, right, .. } = where_predicate("e.salary >= 1000") else {
            panic!("expected comparison");
        };
        assert_eq!(op, ComparisonOp::GtEq);
        assert!(matches!(right, Expr::Literal { .. }));
    }

    #[test]
    fn test_comma_list_folds_into_and() {
        let predicate = where_predicate("e.a = 1, e.b = 2");
        assert!(matches!(predicate, Predicate::And { .. }));
    }

    #[test]
    fn test_negated_like_with_escape() {
        let Predicate::Like {
            escape,
            negated,
            case_insensitive,
            ..
        } = where_predicate("e.name not ilike 'a!%' escape '!'")
        else {
            panic!("expected like");
        };
        assert_eq!(escape.as_deref(), Some("!"));
        assert!(negated);
        assert!(case_insensitive);
    }

    #[test]
    fn test_in_lists() {
        let Predicate::In { list, .. } = where_predicate("e.id in ()") else {
            panic!("expected in");
        };
        assert_eq!(list, InList::Values(Vec::new()));

        let Predicate::In { list, .. } = where_predicate("e.id in indices(e.items)") else {
            panic!("expected in");
        };
        assert!(matches!(list, InList::Indices(name) if name.dotted() == "e.items"));

        let Predicate::In { list, .. } = where_predicate("e.id in (select f.id from F f)") else {
            panic!("expected in");
        };
        assert!(matches!(list, InList::Subquery(_)));
    }

    #[test]
    fn test_boolean_path_is_expression_predicate() {
        let predicate = where_predicate("e.active");
        assert!(matches!(predicate, Predicate::Expression(Expr::Path(_))));
    }

    #[test]
    fn test_member_of() {
        let Predicate::MemberOf {
            collection, negated, ..
        } = where_predicate(":item not member of e.items")
        else {
            panic!("expected member of");
        };
        assert_eq!(collection.dotted(), "e.items");
        assert!(negated);
    }
}
