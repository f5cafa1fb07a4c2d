//! Function calls and window specifications.

use super::error::ParseError;
use super::expression::ParenContent;
use super::parser::{PResult, Parser};
use crate::diagnostics::DiagnosticKind;
use crate::lexer::{Keyword, NumberKind, Span, TokenKind};
use crate::tree::NodeKind;

impl Parser {
    /// `name(args) [FILTER (...)] [WITHIN GROUP (...)] [OVER (...)]`, or
    /// `name(subquery)`.
    pub(super) fn generic_function(&mut self) -> PResult<()> {
        if self.paren_content(1) == ParenContent::Query {
            return self.node(NodeKind::FunctionWithSubquery, |p| {
                p.identifier()?;
                p.advance();
                p.subquery()?;
                p.expect(&TokenKind::RightParen)
            });
        }

        self.node(NodeKind::GenericFunction, |p| {
            p.identifier()?;
            p.expect(&TokenKind::LeftParen)?;
            if !p.eat(&TokenKind::Star) && !p.check(&TokenKind::RightParen) {
                p.function_arguments()?;
            }
            p.expect(&TokenKind::RightParen)?;

            if p.check(&TokenKind::Dot) && p.peek_identifier_nth(1) {
                p.node(NodeKind::PathContinuation, |p| {
                    while p.check(&TokenKind::Dot) && p.peek_identifier_nth(1) {
                        p.advance();
                        p.identifier()?;
                    }
                    Ok(())
                })?;
            }
            if p.check_keyword(Keyword::Filter) && p.check_nth(1, &TokenKind::LeftParen) {
                p.node(NodeKind::FilterClause, |p| {
                    p.advance();
                    p.advance();
                    p.where_clause()?;
                    p.expect(&TokenKind::RightParen)
                })?;
            }
            if p.check_keyword(Keyword::Within) && p.check_keyword_nth(1, Keyword::Group) {
                p.node(NodeKind::WithinGroup, |p| {
                    p.advance();
                    p.advance();
                    p.expect(&TokenKind::LeftParen)?;
                    p.order_by_clause()?;
                    p.expect(&TokenKind::RightParen)
                })?;
            }
            if p.check_keyword(Keyword::Over) && p.check_nth(1, &TokenKind::LeftParen) {
                p.over_clause()?;
            }
            Ok(())
        })
    }

    fn function_arguments(&mut self) -> PResult<()> {
        self.node(NodeKind::FunctionArguments, |p| {
            let distinct = p.check_keyword(Keyword::Distinct)
                && !p.check_nth(1, &TokenKind::Dot)
                && !p.check_nth(1, &TokenKind::Comma)
                && !p.check_nth(1, &TokenKind::RightParen);
            if distinct {
                p.advance();
            }
            p.expression_or_predicate()?;
            while p.eat(&TokenKind::Comma) {
                p.expression_or_predicate()?;
            }
            Ok(())
        })
    }

    /// `CAST(expr AS type)`.
    pub(super) fn cast_function(&mut self) -> PResult<()> {
        self.node(NodeKind::CastFunction, |p| {
            p.advance();
            p.advance();
            p.expression()?;
            p.expect_keyword(Keyword::As)?;
            p.node(NodeKind::CastTarget, |p| {
                p.simple_path()?;
                if p.eat(&TokenKind::LeftParen) {
                    p.integer()?;
                    if p.eat(&TokenKind::Comma) {
                        p.integer()?;
                    }
                    p.expect(&TokenKind::RightParen)?;
                }
                Ok(())
            })?;
            p.expect(&TokenKind::RightParen)
        })
    }

    /// A precision or scale: an unsuffixed integer that fits in `u32`.
    fn integer(&mut self) -> PResult<()> {
        match &self.peek().kind {
            TokenKind::Number {
                lexeme,
                kind: NumberKind::Integer,
            } if lexeme.parse::<u32>().is_ok() => {
                self.advance();
                Ok(())
            }
            TokenKind::Number { lexeme, .. } => Err(ParseError::new(
                format!("Invalid type length '{lexeme}': expected an unsigned integer"),
                self.peek().span,
            )),
            _ => Err(self.error("integer")),
        }
    }

    /// `EXTRACT(field FROM expr)`.
    pub(super) fn extract_function(&mut self) -> PResult<()> {
        self.node(NodeKind::ExtractFunction, |p| {
            p.advance();
            p.advance();
            p.expression()?;
            p.expect_keyword(Keyword::From)?;
            p.expression()?;
            p.expect(&TokenKind::RightParen)
        })
    }

    /// `TRIM([LEADING|TRAILING|BOTH] ['c'] [FROM] expr)`.
    pub(super) fn trim_function(&mut self) -> PResult<()> {
        self.node(NodeKind::TrimFunction, |p| {
            p.advance();
            p.advance();
            let specification = [Keyword::Leading, Keyword::Trailing, Keyword::Both]
                .into_iter()
                .any(|keyword| p.check_keyword(keyword))
                && !p.check_nth(1, &TokenKind::Dot)
                && !p.check_nth(1, &TokenKind::RightParen);
            if specification {
                p.advance();
            }
            if matches!(p.peek().kind, TokenKind::String(_)) && p.check_keyword_nth(1, Keyword::From)
            {
                p.literal()?;
            }
            if p.check_keyword(Keyword::From) && !p.check_nth(1, &TokenKind::RightParen) {
                p.advance();
            }
            p.expression()?;
            p.expect(&TokenKind::RightParen)
        })
    }

    /// Returns true if an EVERY/ALL/ANY/SOME word is followed by its
    /// argument.
    pub(super) fn at_quantified_argument(&self) -> bool {
        self.check_nth(1, &TokenKind::LeftParen)
            || ((self.check_keyword_nth(1, Keyword::Elements)
                || self.check_keyword_nth(1, Keyword::Indices))
                && self.check_nth(2, &TokenKind::LeftParen))
    }

    /// `EVERY(...)`, `ANY(...)` and their ELEMENTS/INDICES forms.
    pub(super) fn quantified_function(&mut self, kind: NodeKind) -> PResult<()> {
        self.node(kind, |p| {
            p.advance();
            if p.at_collection_function() {
                return p.collection_function();
            }
            let query = p.paren_content(0) == ParenContent::Query;
            p.expect(&TokenKind::LeftParen)?;
            if query {
                p.subquery()?;
            } else {
                p.predicate()?;
            }
            p.expect(&TokenKind::RightParen)
        })
    }

    /// Returns true at `ELEMENTS(` or `INDICES(`.
    pub(super) fn at_collection_function(&self) -> bool {
        (self.check_keyword(Keyword::Elements) || self.check_keyword(Keyword::Indices))
            && self.check_nth(1, &TokenKind::LeftParen)
    }

    /// `ELEMENTS(path)` or `INDICES(path)`, recorded into the open node.
    pub(super) fn collection_function(&mut self) -> PResult<()> {
        self.advance();
        self.advance();
        self.simple_path()?;
        self.expect(&TokenKind::RightParen)
    }

    fn over_clause(&mut self) -> PResult<()> {
        self.node(NodeKind::OverClause, |p| {
            p.advance();
            p.advance();
            if p.check_keyword(Keyword::Partition) && p.check_keyword_nth(1, Keyword::By) {
                p.node(NodeKind::PartitionClause, |p| {
                    p.advance();
                    p.advance();
                    p.expression()?;
                    while p.eat(&TokenKind::Comma) {
                        p.expression()?;
                    }
                    Ok(())
                })?;
            }
            if p.at_order_by() {
                p.order_by_clause()?;
            }
            if [Keyword::Rows, Keyword::Range, Keyword::Groups]
                .into_iter()
                .any(|keyword| p.check_keyword(keyword))
            {
                p.frame_clause()?;
            }
            p.expect(&TokenKind::RightParen)
        })
    }

    /// `unit bound` or `unit BETWEEN bound AND bound`, then an optional
    /// exclusion. Impossible bounds are reported without failing the parse.
    fn frame_clause(&mut self) -> PResult<()> {
        self.node(NodeKind::FrameClause, |p| {
            p.advance();
            if p.eat_keyword(Keyword::Between) {
                let (start, start_span) = p.frame_bound()?;
                p.expect_keyword(Keyword::And)?;
                let (end, end_span) = p.frame_bound()?;
                p.check_frame_start(start, start_span);
                if end == NodeKind::UnboundedPreceding {
                    p.report(
                        DiagnosticKind::SemanticInvalidFrame,
                        "Frame end cannot be UNBOUNDED PRECEDING",
                        end_span,
                    );
                }
            } else {
                let (start, start_span) = p.frame_bound()?;
                p.check_frame_start(start, start_span);
            }

            if p.check_keyword(Keyword::Exclude) {
                p.node(NodeKind::FrameExclusion, |p| {
                    p.advance();
                    if p.check_keyword(Keyword::Current) && p.check_keyword_nth(1, Keyword::Row) {
                        p.advance();
                        p.advance();
                    } else if p.check_keyword(Keyword::No) && p.check_keyword_nth(1, Keyword::Others)
                    {
                        p.advance();
                        p.advance();
                    } else if !p.eat_keyword(Keyword::Group) && !p.eat_keyword(Keyword::Ties) {
                        return Err(p.error("CURRENT ROW, GROUP, TIES or NO OTHERS"));
                    }
                    Ok(())
                })?;
            }
            Ok(())
        })
    }

    fn check_frame_start(&mut self, start: NodeKind, span: Span) {
        if start == NodeKind::UnboundedFollowing {
            self.report(
                DiagnosticKind::SemanticInvalidFrame,
                "Frame start cannot be UNBOUNDED FOLLOWING",
                span,
            );
        }
    }

    fn frame_bound(&mut self) -> PResult<(NodeKind, Span)> {
        let start = self.peek().span;
        let keyword_bound = if self.check_keyword(Keyword::Unbounded) {
            if self.check_keyword_nth(1, Keyword::Preceding) {
                Some(NodeKind::UnboundedPreceding)
            } else if self.check_keyword_nth(1, Keyword::Following) {
                Some(NodeKind::UnboundedFollowing)
            } else {
                None
            }
        } else if self.check_keyword(Keyword::Current) && self.check_keyword_nth(1, Keyword::Row) {
            Some(NodeKind::CurrentRow)
        } else {
            None
        };

        let kind = if let Some(kind) = keyword_bound {
            self.node(kind, |p| {
                p.advance();
                p.advance();
                Ok(())
            })?;
            kind
        } else {
            let checkpoint = self.tree.checkpoint();
            self.expression()?;
            let kind = if self.check_keyword(Keyword::Preceding) {
                NodeKind::ExpressionPreceding
            } else if self.check_keyword(Keyword::Following) {
                NodeKind::ExpressionFollowing
            } else {
                return Err(self.error("PRECEDING or FOLLOWING"));
            };
            self.advance();
            self.wrap(checkpoint, kind);
            kind
        };
        Ok((kind, start.merge(self.previous_span())))
    }
}

#[cfg(test)]
mod tests {
    use crate::diagnostics::DiagnosticKind;
    use crate::parser::Parser;
    use crate::tree::NodeKind;

    #[test]
    fn test_window_function() {
        let (trees, diagnostics) = Parser::new(
            "select rank() over (partition by e.dept order by e.salary desc \
             rows between unbounded preceding and current row) from Employee e",
        )
        .parse_trees();
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        let frame = trees[0].descendant(NodeKind::FrameClause).unwrap();
        let bounds: Vec<_> = frame.nodes().map(|node| node.kind).collect();
        assert_eq!(
            bounds,
            vec![NodeKind::UnboundedPreceding, NodeKind::CurrentRow]
        );
    }

    #[test]
    fn test_invalid_frame_end_is_reported() {
        let (trees, diagnostics) = Parser::new(
            "select sum(e.x) over (rows between current row and unbounded preceding) from E e",
        )
        .parse_trees();
        assert_eq!(trees.len(), 1);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind, DiagnosticKind::SemanticInvalidFrame);
    }

    #[test]
    fn test_invalid_frame_start_is_reported() {
        let (_, diagnostics) =
            Parser::new("select sum(e.x) over (rows unbounded following) from E e").parse_trees();
        assert_eq!(diagnostics[0].kind, DiagnosticKind::SemanticInvalidFrame);
    }

    #[test]
    fn test_expression_bound() {
        let (trees, diagnostics) = Parser::new(
            "select avg(e.x) over (order by e.d range between 2 preceding and 1 following \
             exclude ties) from E e",
        )
        .parse_trees();
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        assert!(trees[0].descendant(NodeKind::ExpressionPreceding).is_some());
        assert!(trees[0].descendant(NodeKind::ExpressionFollowing).is_some());
        assert!(trees[0].descendant(NodeKind::FrameExclusion).is_some());
    }

    #[test]
    fn test_function_with_subquery() {
        let (trees, diagnostics) =
            Parser::new("select e from E e where e.x > max(select f.x from F f)").parse_trees();
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        assert!(trees[0].descendant(NodeKind::FunctionWithSubquery).is_some());
    }

    #[test]
    fn test_filter_and_within_group() {
        let (trees, diagnostics) = Parser::new(
            "select count(*) filter (where e.active = true), \
             listagg(e.name, ',') within group (order by e.name) from E e",
        )
        .parse_trees();
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        assert!(trees[0].descendant(NodeKind::FilterClause).is_some());
        assert!(trees[0].descendant(NodeKind::WithinGroup).is_some());
    }

    #[test]
    fn test_cast_and_trim() {
        let (trees, diagnostics) = Parser::new(
            "select cast(e.x as BigDecimal(10, 2)), trim(leading '0' from e.code) from E e",
        )
        .parse_trees();
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        assert!(trees[0].descendant(NodeKind::CastTarget).is_some());
        assert!(trees[0].descendant(NodeKind::TrimFunction).is_some());
    }
}
