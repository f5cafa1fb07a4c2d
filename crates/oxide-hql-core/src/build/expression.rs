//! Expression, literal, parameter, path and function builders.

use super::predicate::{predicate, where_clause};
use super::query::{order_by_clause, subquery};
use super::{alias, ident, mismatch, qualified_name, BuildError, BuildResult, Children};
use crate::ast::{
    CalendarField, CaseExpression, CastTarget, CollectionPart, DateTimeLiteral, DatetimeField,
    Expr, FrameBound, FrameClause, FrameExclusion, FrameUnit, Function, GenericFunction,
    Instantiation, InstantiationArgument, InstantiationTarget, InstantiationValue, LikeWildcards,
    Literal, NumericLiteral, OverClause, Parameter, ParameterKind, ParameterMarker, Path,
    PathElement, QuantifiedArgument, TemporalUnit, TreatedPath, TrimSpecification,
};
use crate::lexer::{Keyword, Token, TokenKind};
use crate::parser::{token_to_binary_op, token_to_unary_op};
use crate::tree::{Node, NodeKind};

/// Returns true for node kinds that build into a [`crate::ast::Predicate`].
pub(super) const fn is_predicate_kind(kind: NodeKind) -> bool {
    matches!(
        kind,
        NodeKind::GroupedPredicate
            | NodeKind::OrPredicate
            | NodeKind::AndPredicate
            | NodeKind::NotPredicate
            | NodeKind::RelationalPredicate
            | NodeKind::BetweenPredicate
            | NodeKind::LikePredicate
            | NodeKind::InPredicate
            | NodeKind::ExistsPredicate
            | NodeKind::IsNullPredicate
            | NodeKind::IsDistinctFromPredicate
            | NodeKind::IsEmptyPredicate
            | NodeKind::MemberOfPredicate
    )
}

/// Builds an expression. Predicates in expression position become
/// [`Expr::Predicate`]; a bare `ExpressionPredicate` is unwrapped.
pub(crate) fn expression(node: &Node) -> BuildResult<Expr> {
    let span = node.span;
    let expr = match node.kind {
        NodeKind::ExpressionPredicate => {
            return expression(Children::new(node).next("expression")?);
        }
        kind if is_predicate_kind(kind) => Expr::Predicate(Box::new(predicate(node)?)),
        NodeKind::Literal => Expr::Literal {
            value: literal(node)?,
            span,
        },
        NodeKind::SignedNumericLiteral => Expr::Literal {
            value: Literal::Numeric(signed_number(node)?),
            span,
        },
        NodeKind::Parameter => Expr::Parameter(parameter(node)?),
        NodeKind::Path => Expr::Path(path(node)?),
        NodeKind::GroupedExpression => Expr::Grouped {
            expr: Box::new(expression(Children::new(node).next("grouped expression")?)?),
            span,
        },
        NodeKind::TupleExpression => Expr::Tuple {
            items: node.nodes().map(expression).collect::<BuildResult<_>>()?,
            span,
        },
        NodeKind::SubqueryExpression => {
            let mut children = Children::new(node);
            Expr::Subquery {
                query: Box::new(subquery(children.expect(NodeKind::Subquery, "subquery")?)?),
                span,
            }
        }
        NodeKind::SignedExpression => {
            let op = first_token(node)
                .and_then(|token| token_to_unary_op(&token.kind))
                .ok_or_else(|| missing(node, "sign"))?;
            Expr::Unary {
                op,
                operand: Box::new(expression(Children::new(node).next("operand")?)?),
                span,
            }
        }
        NodeKind::AdditionExpression
        | NodeKind::MultiplicationExpression
        | NodeKind::ConcatenationExpression => {
            let mut children = Children::new(node);
            let left = expression(children.next("left operand")?)?;
            let op = first_token(node)
                .and_then(|token| token_to_binary_op(&token.kind))
                .ok_or_else(|| missing(node, "operator"))?;
            let right = expression(children.next("right operand")?)?;
            Expr::Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
                span,
            }
        }
        NodeKind::ToDurationExpression | NodeKind::FromDurationExpression => {
            let inner = Box::new(expression(Children::new(node).next("operand")?)?);
            let unit = node
                .tokens()
                .last()
                .and_then(Token::keyword)
                .and_then(DatetimeField::from_keyword)
                .ok_or_else(|| missing(node, "datetime field"))?;
            if node.kind == NodeKind::ToDurationExpression {
                Expr::ToDuration {
                    expr: inner,
                    unit,
                    span,
                }
            } else {
                Expr::FromDuration {
                    expr: inner,
                    unit,
                    span,
                }
            }
        }
        NodeKind::DayOfWeekExpression => Expr::Calendar {
            field: CalendarField::DayOfWeek,
            span,
        },
        NodeKind::DayOfMonthExpression => Expr::Calendar {
            field: CalendarField::DayOfMonth,
            span,
        },
        NodeKind::WeekOfYearExpression => Expr::Calendar {
            field: CalendarField::WeekOfYear,
            span,
        },
        NodeKind::SimpleCaseExpression | NodeKind::SearchedCaseExpression => {
            Expr::Case(Box::new(case_expression(node)?))
        }
        NodeKind::GenericFunction
        | NodeKind::FunctionWithSubquery
        | NodeKind::CastFunction
        | NodeKind::ExtractFunction
        | NodeKind::TrimFunction
        | NodeKind::EveryFunction
        | NodeKind::AnyFunction => Expr::Function(Box::new(function(node)?)),
        _ => return Err(mismatch("expression", node)),
    };
    Ok(expr)
}

fn first_token(node: &Node) -> Option<&Token> {
    node.tokens().next()
}

fn missing(node: &Node, what: &'static str) -> BuildError {
    BuildError::MissingChild {
        parent: node.kind,
        missing: what,
        span: node.span,
    }
}

/// Builds the value of a `Literal` node.
pub(crate) fn literal(node: &Node) -> BuildResult<Literal> {
    if node.kind != NodeKind::Literal {
        return Err(mismatch("literal", node));
    }
    let tokens: Vec<&Token> = node.tokens().collect();
    let Some(first) = tokens.first() else {
        return Err(missing(node, "literal token"));
    };
    let second = tokens.get(1).copied();

    let value = match &first.kind {
        TokenKind::Number { lexeme, kind } => Literal::Numeric(NumericLiteral {
            text: lexeme.clone(),
            kind: *kind,
            negative: false,
        }),
        TokenKind::String(value) => Literal::String(value.clone()),
        TokenKind::Binary(bytes) => Literal::Binary(bytes.clone()),
        TokenKind::LeftBrace => {
            let unit = match second.map(|token| &token.kind) {
                Some(TokenKind::Word { text, .. }) if text.eq_ignore_ascii_case("d") => {
                    TemporalUnit::Date
                }
                Some(TokenKind::Word { text, .. }) if text.eq_ignore_ascii_case("t") => {
                    TemporalUnit::Time
                }
                Some(TokenKind::Word { .. }) => TemporalUnit::DateTime,
                _ => return Err(missing(node, "escape unit")),
            };
            Literal::DateTime(DateTimeLiteral::JdbcEscape {
                unit,
                value: string_token(tokens.get(2).copied()).ok_or_else(|| missing(node, "string"))?,
            })
        }
        TokenKind::Word { keyword: Some(keyword), .. } => {
            keyword_literal(*keyword, second).ok_or_else(|| mismatch("literal", node))?
        }
        _ => return Err(mismatch("literal", node)),
    };
    Ok(value)
}

fn string_token(token: Option<&Token>) -> Option<String> {
    match &token?.kind {
        TokenKind::String(value) => Some(value.clone()),
        _ => None,
    }
}

fn temporal_unit(keyword: Keyword) -> Option<TemporalUnit> {
    match keyword {
        Keyword::Date => Some(TemporalUnit::Date),
        Keyword::Time => Some(TemporalUnit::Time),
        Keyword::Datetime | Keyword::Timestamp => Some(TemporalUnit::DateTime),
        _ => None,
    }
}

fn keyword_literal(keyword: Keyword, second: Option<&Token>) -> Option<Literal> {
    let second_unit = || second.and_then(Token::keyword).and_then(temporal_unit);
    let date_time = match keyword {
        Keyword::Null => return Some(Literal::Null),
        Keyword::True => return Some(Literal::Boolean(true)),
        Keyword::False => return Some(Literal::Boolean(false)),
        Keyword::CurrentDate => DateTimeLiteral::Current(TemporalUnit::Date),
        Keyword::CurrentTime => DateTimeLiteral::Current(TemporalUnit::Time),
        Keyword::CurrentTimestamp => DateTimeLiteral::Current(TemporalUnit::DateTime),
        Keyword::LocalDate => DateTimeLiteral::Local(TemporalUnit::Date),
        Keyword::LocalTime => DateTimeLiteral::Local(TemporalUnit::Time),
        Keyword::LocalDatetime => DateTimeLiteral::Local(TemporalUnit::DateTime),
        Keyword::OffsetDatetime | Keyword::Offset => DateTimeLiteral::OffsetDateTime,
        Keyword::Instant => DateTimeLiteral::Instant,
        Keyword::Current => DateTimeLiteral::Current(second_unit()?),
        Keyword::Local => DateTimeLiteral::Local(second_unit()?),
        _ => DateTimeLiteral::Typed {
            unit: temporal_unit(keyword)?,
            value: string_token(second)?,
        },
    };
    Some(Literal::DateTime(date_time))
}

fn signed_number(node: &Node) -> BuildResult<NumericLiteral> {
    let mut tokens = node.tokens();
    let negative = matches!(tokens.next().map(|token| &token.kind), Some(TokenKind::Minus));
    match tokens.next().map(|token| &token.kind) {
        Some(TokenKind::Number { lexeme, kind }) => Ok(NumericLiteral {
            text: lexeme.clone(),
            kind: *kind,
            negative,
        }),
        _ => Err(missing(node, "number")),
    }
}

/// Builds a `Parameter` node.
pub(crate) fn parameter(node: &Node) -> BuildResult<Parameter> {
    if node.kind != NodeKind::Parameter {
        return Err(mismatch("parameter", node));
    }
    let tokens: Vec<&Token> = node.tokens().collect();
    let leading = matches!(tokens.first().map(|token| &token.kind), Some(TokenKind::Percent));
    let trailing = tokens.len() > 1
        && matches!(tokens.last().map(|token| &token.kind), Some(TokenKind::Percent));
    let body: Vec<&Token> = tokens
        .into_iter()
        .filter(|token| token.kind != TokenKind::Percent)
        .collect();

    let marker = match body.first().map(|token| &token.kind) {
        Some(TokenKind::Colon) => ParameterMarker::Colon,
        Some(TokenKind::Question) => ParameterMarker::Question,
        _ => return Err(missing(node, "parameter marker")),
    };
    let kind = match (marker, body.get(1).map(|token| &token.kind)) {
        (_, Some(TokenKind::Spel(expression))) => ParameterKind::Template {
            marker,
            expression: expression.clone(),
        },
        (ParameterMarker::Question, Some(TokenKind::Number { lexeme, .. })) => {
            let ordinal = lexeme
                .parse::<u32>()
                .map_err(|_| mismatch("positional parameter ordinal", node))?;
            ParameterKind::Positional(Some(ordinal))
        }
        (ParameterMarker::Question, None) => ParameterKind::Positional(None),
        (ParameterMarker::Colon, None) => {
            let name = ident(Children::new(node).next("parameter name")?)?;
            ParameterKind::Named(name.name)
        }
        _ => return Err(mismatch("parameter", node)),
    };

    Ok(Parameter {
        kind,
        wildcards: LikeWildcards { leading, trailing },
        span: node.span,
    })
}

/// Builds a `Path` node.
pub(crate) fn path(node: &Node) -> BuildResult<Path> {
    if node.kind != NodeKind::Path {
        return Err(mismatch("path", node));
    }
    let mut treat = None;
    let mut elements: Vec<PathElement> = Vec::new();
    for child in node.nodes() {
        match child.kind {
            NodeKind::TreatedPath => treat = Some(Box::new(treated_path(child)?)),
            NodeKind::Identifier => elements.push(PathElement {
                name: ident(child)?,
                index: None,
            }),
            NodeKind::IndexAccess => {
                let element = elements
                    .last_mut()
                    .ok_or_else(|| missing(node, "indexed element"))?;
                let index = Children::new(child).next("index")?;
                element.index = Some(Box::new(expression(index)?));
            }
            _ => return Err(mismatch("path element", child)),
        }
    }

    let qualified = elements.len() >= 2 || (treat.is_some() && !elements.is_empty());
    let continuation = match elements.last() {
        Some(last) if qualified && !last.name.quoted && last.index.is_none() => {
            if last.name.name.eq_ignore_ascii_case("elements") {
                Some(CollectionPart::Elements)
            } else if last.name.name.eq_ignore_ascii_case("indices") {
                Some(CollectionPart::Indices)
            } else {
                None
            }
        }
        _ => None,
    };
    if continuation.is_some() {
        elements.pop();
    }

    Ok(Path {
        treat,
        elements,
        continuation,
        span: node.span,
    })
}

fn treated_path(node: &Node) -> BuildResult<TreatedPath> {
    let mut children = Children::new(node);
    let treated = path(children.expect(NodeKind::Path, "treated path")?)?;
    let target = qualified_name(children.expect(NodeKind::SimplePath, "treat target")?)?;
    children.finish()?;
    Ok(TreatedPath {
        path: treated,
        target,
        span: node.span,
    })
}

fn case_expression(node: &Node) -> BuildResult<CaseExpression> {
    let span = node.span;
    let mut children = Children::new(node);
    if node.kind == NodeKind::SimpleCaseExpression {
        let operand = expression(children.next("case operand")?)?;
        let mut when_clauses = Vec::new();
        while let Some(clause) = children.next_if(NodeKind::CaseWhenExpressionClause) {
            let mut parts = Children::new(clause);
            let when = expression(parts.next("when expression")?)?;
            let then = expression(parts.next("then result")?)?;
            when_clauses.push((when, then));
        }
        let else_result = children.rest().next().map(expression).transpose()?;
        return Ok(CaseExpression::Simple {
            operand,
            when_clauses,
            else_result,
            span,
        });
    }

    let mut when_clauses = Vec::new();
    while let Some(clause) = children.next_if(NodeKind::CaseWhenPredicateClause) {
        let mut parts = Children::new(clause);
        let when = predicate(parts.next("when predicate")?)?;
        let then = expression(parts.next("then result")?)?;
        when_clauses.push((when, then));
    }
    let else_result = children.rest().next().map(expression).transpose()?;
    Ok(CaseExpression::Searched {
        when_clauses,
        else_result,
        span,
    })
}

fn function(node: &Node) -> BuildResult<Function> {
    let span = node.span;
    let mut children = Children::new(node);
    let function = match node.kind {
        NodeKind::GenericFunction => Function::Generic(generic_function(node)?),
        NodeKind::FunctionWithSubquery => Function::WithSubquery {
            name: ident(children.expect(NodeKind::Identifier, "function name")?)?,
            query: subquery(children.expect(NodeKind::Subquery, "subquery")?)?,
            span,
        },
        NodeKind::CastFunction => {
            let expr = expression(children.next("cast operand")?)?;
            let target = cast_target(children.expect(NodeKind::CastTarget, "cast target")?)?;
            Function::Cast { expr, target, span }
        }
        NodeKind::ExtractFunction => Function::Extract {
            field: expression(children.next("extracted field")?)?,
            source: expression(children.next("extract source")?)?,
            span,
        },
        NodeKind::TrimFunction => {
            let specification = node.tokens().find_map(|token| match token.keyword() {
                Some(Keyword::Leading) => Some(TrimSpecification::Leading),
                Some(Keyword::Trailing) => Some(TrimSpecification::Trailing),
                Some(Keyword::Both) => Some(TrimSpecification::Both),
                _ => None,
            });
            let nodes: Vec<&Node> = children.rest().collect();
            let (character, source) = match nodes.as_slice() {
                [source] => (None, *source),
                [character, source] => match literal(character)? {
                    Literal::String(value) => (Some(value), *source),
                    _ => return Err(mismatch("trim character", character)),
                },
                _ => return Err(missing(node, "trim source")),
            };
            Function::Trim {
                specification,
                character,
                source: expression(source)?,
                span,
            }
        }
        NodeKind::EveryFunction | NodeKind::AnyFunction => {
            let argument = quantified_argument(node, children.next("argument")?)?;
            if node.kind == NodeKind::EveryFunction {
                Function::Every { argument, span }
            } else {
                Function::Any { argument, span }
            }
        }
        _ => return Err(mismatch("function", node)),
    };
    Ok(function)
}

fn quantified_argument(node: &Node, argument: &Node) -> BuildResult<QuantifiedArgument> {
    Ok(match argument.kind {
        NodeKind::SimplePath if node.has_keyword(Keyword::Indices) => {
            QuantifiedArgument::Indices(qualified_name(argument)?)
        }
        NodeKind::SimplePath => QuantifiedArgument::Elements(qualified_name(argument)?),
        NodeKind::Subquery => QuantifiedArgument::Subquery(Box::new(subquery(argument)?)),
        _ => QuantifiedArgument::Predicate(Box::new(predicate(argument)?)),
    })
}

fn cast_target(node: &Node) -> BuildResult<CastTarget> {
    let mut children = Children::new(node);
    let name = qualified_name(children.expect(NodeKind::SimplePath, "type name")?)?;
    let lengths = node
        .tokens()
        .filter_map(|token| match &token.kind {
            TokenKind::Number { lexeme, .. } => Some(lexeme),
            _ => None,
        })
        .map(|lexeme| {
            lexeme
                .parse::<u32>()
                .map_err(|_| mismatch("type length", node))
        })
        .collect::<BuildResult<Vec<_>>>()?;
    if lengths.len() > 2 {
        return Err(mismatch("at most two type lengths", node));
    }
    Ok(CastTarget {
        name,
        precision: lengths.first().copied(),
        scale: lengths.get(1).copied(),
    })
}

fn generic_function(node: &Node) -> BuildResult<GenericFunction> {
    let mut children = Children::new(node);
    let name = ident(children.expect(NodeKind::Identifier, "function name")?)?;
    let mut function = GenericFunction {
        name,
        distinct: false,
        star: node.has_token(&TokenKind::Star),
        args: Vec::new(),
        continuation: Vec::new(),
        filter: None,
        within_group: Vec::new(),
        over: None,
        span: node.span,
    };

    for child in children.rest() {
        match child.kind {
            NodeKind::FunctionArguments => {
                function.distinct = child.has_keyword(Keyword::Distinct);
                function.args = child.nodes().map(expression).collect::<BuildResult<_>>()?;
            }
            NodeKind::PathContinuation => {
                function.continuation = child.nodes().map(ident).collect::<BuildResult<_>>()?;
            }
            NodeKind::FilterClause => {
                let clause = Children::new(child).next("where clause")?;
                function.filter = Some(where_clause(clause)?);
            }
            NodeKind::WithinGroup => {
                let clause = Children::new(child).next("order by clause")?;
                function.within_group = order_by_clause(clause)?;
            }
            NodeKind::OverClause => function.over = Some(over_clause(child)?),
            _ => return Err(mismatch("function clause", child)),
        }
    }
    Ok(function)
}

fn over_clause(node: &Node) -> BuildResult<OverClause> {
    let mut over = OverClause {
        partition_by: Vec::new(),
        order_by: Vec::new(),
        frame: None,
        span: node.span,
    };
    for child in node.nodes() {
        match child.kind {
            NodeKind::PartitionClause => {
                over.partition_by = child.nodes().map(expression).collect::<BuildResult<_>>()?;
            }
            NodeKind::OrderByClause => over.order_by = order_by_clause(child)?,
            NodeKind::FrameClause => over.frame = Some(frame_clause(child)?),
            _ => return Err(mismatch("window clause", child)),
        }
    }
    Ok(over)
}

fn frame_clause(node: &Node) -> BuildResult<FrameClause> {
    let unit = match node.first_keyword() {
        Some(Keyword::Rows) => FrameUnit::Rows,
        Some(Keyword::Range) => FrameUnit::Range,
        Some(Keyword::Groups) => FrameUnit::Groups,
        _ => return Err(missing(node, "frame unit")),
    };
    let mut children = Children::new(node);
    let start = frame_bound(children.next("frame start")?)?;
    let end = match children.peek() {
        Some(child) if child.kind != NodeKind::FrameExclusion => {
            children.next("frame end")?;
            Some(frame_bound(child)?)
        }
        _ => None,
    };
    let exclusion = children
        .next_if(NodeKind::FrameExclusion)
        .map(frame_exclusion)
        .transpose()?;
    children.finish()?;
    Ok(FrameClause {
        unit,
        start,
        end,
        exclusion,
        span: node.span,
    })
}

fn frame_bound(node: &Node) -> BuildResult<FrameBound> {
    Ok(match node.kind {
        NodeKind::UnboundedPreceding => FrameBound::UnboundedPreceding,
        NodeKind::UnboundedFollowing => FrameBound::UnboundedFollowing,
        NodeKind::CurrentRow => FrameBound::CurrentRow,
        NodeKind::ExpressionPreceding => {
            FrameBound::Preceding(Box::new(expression(Children::new(node).next("offset")?)?))
        }
        NodeKind::ExpressionFollowing => {
            FrameBound::Following(Box::new(expression(Children::new(node).next("offset")?)?))
        }
        _ => return Err(mismatch("frame bound", node)),
    })
}

fn frame_exclusion(node: &Node) -> BuildResult<FrameExclusion> {
    let keywords: Vec<Keyword> = node.tokens().filter_map(Token::keyword).collect();
    match keywords.get(1) {
        Some(Keyword::Current) => Ok(FrameExclusion::CurrentRow),
        Some(Keyword::Group) => Ok(FrameExclusion::Group),
        Some(Keyword::Ties) => Ok(FrameExclusion::Ties),
        Some(Keyword::No) => Ok(FrameExclusion::NoOthers),
        _ => Err(missing(node, "exclusion")),
    }
}

/// Builds a `NEW ...(...)` instantiation.
pub(crate) fn instantiation(node: &Node) -> BuildResult<Instantiation> {
    let mut children = Children::new(node);
    let target_node = children.expect(NodeKind::InstantiationTarget, "instantiation target")?;
    let target = match target_node.first_keyword() {
        Some(Keyword::List) => InstantiationTarget::List,
        Some(Keyword::Map) => InstantiationTarget::Map,
        _ => InstantiationTarget::Class(qualified_name(
            Children::new(target_node).expect(NodeKind::SimplePath, "class name")?,
        )?),
    };

    let arguments = children
        .rest()
        .map(|argument| {
            if argument.kind != NodeKind::InstantiationArgument {
                return Err(mismatch("instantiation argument", argument));
            }
            let mut parts = Children::new(argument);
            let value_node = parts.next("argument value")?;
            let value = if value_node.kind == NodeKind::Instantiation {
                InstantiationValue::Instantiation(instantiation(value_node)?)
            } else {
                InstantiationValue::Expression(expression(value_node)?)
            };
            Ok(InstantiationArgument {
                value,
                alias: alias(parts.next_if(NodeKind::Alias))?,
            })
        })
        .collect::<BuildResult<Vec<_>>>()?;

    Ok(Instantiation {
        target,
        arguments,
        span: node.span,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::{NumberKind, Span};
    use crate::tree::Element;

    fn token(kind: TokenKind, start: usize, end: usize) -> Element {
        Element::Token(Token::new(kind, Span::new(start, end)))
    }

    #[test]
    fn test_signed_literal() {
        let node = Node::new(
            NodeKind::SignedNumericLiteral,
            vec![
                token(TokenKind::Minus, 0, 1),
                token(
                    TokenKind::Number {
                        lexeme: String::from("5"),
                        kind: NumberKind::Integer,
                    },
                    1,
                    2,
                ),
            ],
        );
        let Expr::Literal {
            value: Literal::Numeric(number),
            ..
        } = expression(&node).unwrap()
        else {
            panic!("expected numeric literal");
        };
        assert!(number.negative);
        assert_eq!(number.as_i64(), Some(-5));
    }

    #[test]
    fn test_parameter_with_wildcards() {
        let name = Node::new(
            NodeKind::Identifier,
            vec![Element::Token(Token::word("name", Span::new(2, 6)))],
        );
        let node = Node::new(
            NodeKind::Parameter,
            vec![
                token(TokenKind::Percent, 0, 1),
                token(TokenKind::Colon, 1, 2),
                Element::Node(name),
                token(TokenKind::Percent, 6, 7),
            ],
        );
        let parameter = parameter(&node).unwrap();
        assert_eq!(parameter.kind, ParameterKind::Named(String::from("name")));
        assert!(parameter.wildcards.leading && parameter.wildcards.trailing);
    }

    #[test]
    fn test_unknown_node_is_mismatch() {
        let node = Node::new(NodeKind::FromClause, vec![token(TokenKind::Comma, 0, 1)]);
        assert!(matches!(
            expression(&node),
            Err(BuildError::GrammarMismatch {
                found: NodeKind::FromClause,
                ..
            })
        ));
    }

    #[test]
    fn test_cast_length_out_of_range_is_mismatch() {
        let word = Element::Token(Token::word("decimal", Span::new(0, 7)));
        let name = Node::new(
            NodeKind::SimplePath,
            vec![Element::Node(Node::new(NodeKind::Identifier, vec![word]))],
        );
        let number = |lexeme: &str, start: usize| {
            token(
                TokenKind::Number {
                    lexeme: String::from(lexeme),
                    kind: NumberKind::Integer,
                },
                start,
                start + lexeme.len(),
            )
        };
        let node = Node::new(
            NodeKind::CastTarget,
            vec![
                Element::Node(name),
                token(TokenKind::LeftParen, 7, 8),
                number("99999999999", 8),
                token(TokenKind::Comma, 19, 20),
                number("2", 20),
                token(TokenKind::RightParen, 21, 22),
            ],
        );
        assert!(matches!(
            cast_target(&node),
            Err(BuildError::GrammarMismatch {
                expected: "type length",
                ..
            })
        ));
    }
}
