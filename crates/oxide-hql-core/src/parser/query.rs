//! Query rules: query expressions, CTEs, SELECT and FROM clauses, joins
//! and the ordering/limit tail.

use super::parser::{PResult, Parser};
use crate::diagnostics::DiagnosticKind;
use crate::lexer::{Keyword, Span, TokenKind};
use crate::tree::NodeKind;

impl Parser {
    /// Returns true if the current token starts a query expression, possibly
    /// parenthesized.
    pub(super) fn at_query_start(&self) -> bool {
        let mut n = 0;
        while self.check_nth(n, &TokenKind::LeftParen) {
            n += 1;
        }
        self.query_keyword_at(n)
    }

    /// `[WITH ...] term (set-operator term)* [order/limit/offset/fetch]`.
    pub(super) fn query_expression(&mut self) -> PResult<()> {
        self.nested(|p| {
            p.node(NodeKind::QueryExpression, |p| {
                if p.check_keyword(Keyword::With) && p.peek_identifier_nth(1) {
                    p.with_clause()?;
                }
                p.query_term()?;
                while [Keyword::Union, Keyword::Intersect, Keyword::Except]
                    .into_iter()
                    .any(|keyword| p.check_keyword(keyword))
                {
                    p.node(NodeKind::SetOperator, |p| {
                        p.advance();
                        p.eat_keyword(Keyword::All);
                        Ok(())
                    })?;
                    p.query_term()?;
                }
                if p.at_query_order() {
                    p.query_order()?;
                }
                Ok(())
            })
        })
    }

    /// A subquery: a full query expression.
    pub(super) fn subquery(&mut self) -> PResult<()> {
        self.node(NodeKind::Subquery, Self::query_expression)
    }

    fn query_term(&mut self) -> PResult<()> {
        if self.check(&TokenKind::LeftParen) {
            return self.node(NodeKind::ParenthesizedQuery, |p| {
                p.advance();
                p.query_expression()?;
                p.expect(&TokenKind::RightParen)
            });
        }
        if self.check_keyword(Keyword::Select) {
            return self.node(NodeKind::SelectQuery, |p| {
                p.select_clause()?;
                if p.check_keyword(Keyword::From) {
                    p.from_clause()?;
                }
                p.query_conditions()
            });
        }
        if self.check_keyword(Keyword::From) {
            return self.node(NodeKind::FromQuery, |p| {
                p.from_clause()?;
                p.query_conditions()?;
                if p.check_keyword(Keyword::Select) {
                    p.select_clause()?;
                }
                Ok(())
            });
        }
        Err(self.error("SELECT, FROM or '('"))
    }

    /// WHERE, GROUP BY and HAVING, each optional.
    fn query_conditions(&mut self) -> PResult<()> {
        if self.check_keyword(Keyword::Where) {
            self.where_clause()?;
        }
        if self.check_keyword(Keyword::Group) && self.check_keyword_nth(1, Keyword::By) {
            self.node(NodeKind::GroupByClause, |p| {
                p.advance();
                p.advance();
                p.expression()?;
                while p.eat(&TokenKind::Comma) {
                    p.expression()?;
                }
                Ok(())
            })?;
        }
        if self.check_keyword(Keyword::Having) {
            self.node(NodeKind::HavingClause, |p| {
                p.advance();
                p.predicate_list()
            })?;
        }
        Ok(())
    }

    /// `WHERE predicate (, predicate)*`.
    pub(super) fn where_clause(&mut self) -> PResult<()> {
        self.node(NodeKind::WhereClause, |p| {
            p.expect_keyword(Keyword::Where)?;
            p.predicate_list()
        })
    }

    fn predicate_list(&mut self) -> PResult<()> {
        self.predicate()?;
        while self.eat(&TokenKind::Comma) {
            self.predicate()?;
        }
        Ok(())
    }

    // --- WITH ---

    fn with_clause(&mut self) -> PResult<()> {
        self.node(NodeKind::WithClause, |p| {
            p.advance();
            p.cte()?;
            while p.eat(&TokenKind::Comma) {
                p.cte()?;
            }
            Ok(())
        })
    }

    fn cte(&mut self) -> PResult<()> {
        self.node(NodeKind::Cte, |p| {
            p.identifier()?;
            let mut attributes = Vec::new();
            if p.eat(&TokenKind::LeftParen) {
                attributes = p.cte_attributes()?;
                p.expect(&TokenKind::RightParen)?;
            }
            p.expect_keyword(Keyword::As)?;
            if p.check_keyword(Keyword::Not) && p.check_keyword_nth(1, Keyword::Materialized) {
                p.advance();
                p.advance();
            } else {
                p.eat_keyword(Keyword::Materialized);
            }
            p.expect(&TokenKind::LeftParen)?;
            p.query_expression()?;
            p.expect(&TokenKind::RightParen)?;

            if p.check_keyword(Keyword::Search) {
                p.search_clause(&attributes)?;
            }
            if p.check_keyword(Keyword::Cycle) {
                p.cycle_clause(&attributes)?;
            }
            Ok(())
        })
    }

    /// Parses an identifier and returns its text and span.
    fn named_identifier(&mut self) -> PResult<(String, Span)> {
        let token = self.peek();
        let name = token.identifier().map(str::to_owned);
        let span = token.span;
        self.identifier()?;
        Ok((name.unwrap_or_default(), span))
    }

    fn cte_attributes(&mut self) -> PResult<Vec<String>> {
        self.node(NodeKind::CteAttributes, |p| {
            let mut names = vec![p.named_identifier()?.0];
            while p.eat(&TokenKind::Comma) {
                names.push(p.named_identifier()?.0);
            }
            Ok(names)
        })
    }

    /// Reports a generated column that reuses a CTE attribute name.
    fn check_generated_column(&mut self, attributes: &[String], name: &str, span: Span) {
        if attributes
            .iter()
            .any(|attribute| attribute.eq_ignore_ascii_case(name))
        {
            self.report(
                DiagnosticKind::SemanticInvalidCycle,
                format!("Column '{name}' collides with a CTE attribute of the same name"),
                span,
            );
        }
    }

    fn search_clause(&mut self, attributes: &[String]) -> PResult<()> {
        self.node(NodeKind::SearchClause, |p| {
            p.advance();
            if !p.eat_keyword(Keyword::Breadth) && !p.eat_keyword(Keyword::Depth) {
                return Err(p.error("BREADTH or DEPTH"));
            }
            p.expect_keyword(Keyword::First)?;
            p.expect_keyword(Keyword::By)?;
            loop {
                p.node(NodeKind::SearchSpecification, |p| {
                    p.identifier()?;
                    p.sort_direction();
                    p.nulls_precedence()
                })?;
                if !p.eat(&TokenKind::Comma) {
                    break;
                }
            }
            p.expect_keyword(Keyword::Set)?;
            let (name, span) = p.named_identifier()?;
            p.check_generated_column(attributes, &name, span);
            Ok(())
        })
    }

    fn cycle_clause(&mut self, attributes: &[String]) -> PResult<()> {
        self.node(NodeKind::CycleClause, |p| {
            p.advance();
            p.cte_attributes()?;
            p.expect_keyword(Keyword::Set)?;
            let (mark, span) = p.named_identifier()?;
            p.check_generated_column(attributes, &mark, span);
            if p.eat_keyword(Keyword::To) {
                p.literal()?;
                p.expect_keyword(Keyword::Default)?;
                p.literal()?;
            }
            if p.eat_keyword(Keyword::Using) {
                let (path, span) = p.named_identifier()?;
                p.check_generated_column(attributes, &path, span);
            }
            Ok(())
        })
    }

    // --- SELECT ---

    fn select_clause(&mut self) -> PResult<()> {
        self.node(NodeKind::SelectClause, |p| {
            p.advance();
            let distinct = p.check_keyword(Keyword::Distinct)
                && !p.check_nth(1, &TokenKind::Dot)
                && !p.check_nth(1, &TokenKind::Comma)
                && !p.check_keyword_nth(1, Keyword::From);
            if distinct {
                p.advance();
            }
            p.node(NodeKind::SelectionList, |p| {
                p.selection()?;
                while p.eat(&TokenKind::Comma) {
                    p.selection()?;
                }
                Ok(())
            })
        })
    }

    // --- FROM ---

    fn from_clause(&mut self) -> PResult<()> {
        self.node(NodeKind::FromClause, |p| {
            p.advance();
            p.entity_with_joins()?;
            while p.check(&TokenKind::Comma) {
                p.advance();
                p.entity_with_joins()?;
            }
            Ok(())
        })
    }

    fn entity_with_joins(&mut self) -> PResult<()> {
        self.node(NodeKind::EntityWithJoins, |p| {
            p.from_root()?;
            loop {
                if p.at_join() {
                    p.join()?;
                } else if p.check_keyword(Keyword::Cross) && p.check_keyword_nth(1, Keyword::Join) {
                    p.node(NodeKind::CrossJoin, |p| {
                        p.advance();
                        p.advance();
                        p.entity_name()?;
                        p.optional_alias()
                    })?;
                } else if p.check(&TokenKind::Comma)
                    && p.check_keyword_nth(1, Keyword::In)
                    && p.check_nth(2, &TokenKind::LeftParen)
                {
                    p.node(NodeKind::CollectionJoin, |p| {
                        p.advance();
                        p.advance();
                        p.advance();
                        p.path()?;
                        p.expect(&TokenKind::RightParen)?;
                        p.optional_alias()
                    })?;
                } else {
                    return Ok(());
                }
            }
        })
    }

    fn from_root(&mut self) -> PResult<()> {
        let lateral =
            self.check_keyword(Keyword::Lateral) && self.check_nth(1, &TokenKind::LeftParen);
        if lateral || self.check(&TokenKind::LeftParen) {
            return self.node(NodeKind::SubqueryRoot, |p| {
                p.parenthesized_subquery()?;
                p.optional_alias()
            });
        }
        self.node(NodeKind::EntityRoot, |p| {
            p.entity_name()?;
            p.optional_alias()
        })
    }

    /// `[LATERAL] ( subquery )`.
    fn parenthesized_subquery(&mut self) -> PResult<()> {
        self.eat_keyword(Keyword::Lateral);
        self.expect(&TokenKind::LeftParen)?;
        self.subquery()?;
        self.expect(&TokenKind::RightParen)
    }

    fn at_join(&self) -> bool {
        let mut n = 0;
        match self.peek().keyword() {
            Some(Keyword::Inner | Keyword::Left | Keyword::Right | Keyword::Full) => {
                n += 1;
                if self.check_keyword_nth(n, Keyword::Outer) {
                    n += 1;
                }
            }
            Some(Keyword::Outer) => n += 1,
            _ => {}
        }
        self.check_keyword_nth(n, Keyword::Join)
    }

    fn join(&mut self) -> PResult<()> {
        self.node(NodeKind::Join, |p| {
            while !p.check_keyword(Keyword::Join) {
                p.advance();
            }
            p.advance();

            let fetch = p.check_keyword(Keyword::Fetch)
                && (p.peek_identifier_nth(1) || p.check_nth(1, &TokenKind::LeftParen));
            if fetch {
                p.advance();
            }

            let lateral =
                p.check_keyword(Keyword::Lateral) && p.check_nth(1, &TokenKind::LeftParen);
            if lateral || p.check(&TokenKind::LeftParen) {
                p.node(NodeKind::JoinSubquery, |p| {
                    p.parenthesized_subquery()?;
                    p.optional_alias()
                })?;
            } else {
                p.node(NodeKind::JoinPath, |p| {
                    p.path()?;
                    p.optional_alias()
                })?;
            }

            if p.check_keyword(Keyword::On) || p.check_keyword(Keyword::With) {
                p.node(NodeKind::JoinRestriction, |p| {
                    p.advance();
                    p.predicate().map(|_| ())
                })?;
            }
            Ok(())
        })
    }

    // --- ORDER BY / LIMIT / OFFSET / FETCH ---

    pub(super) fn at_order_by(&self) -> bool {
        self.check_keyword(Keyword::Order) && self.check_keyword_nth(1, Keyword::By)
    }

    fn at_query_order(&self) -> bool {
        self.at_order_by()
            || ([Keyword::Limit, Keyword::Offset, Keyword::Fetch]
                .into_iter()
                .any(|keyword| self.check_keyword(keyword))
                && self.at_clause_keyword())
    }

    fn query_order(&mut self) -> PResult<()> {
        self.node(NodeKind::QueryOrder, |p| {
            if p.at_order_by() {
                p.order_by_clause()?;
            }
            if p.check_keyword(Keyword::Limit) && p.at_clause_keyword() {
                p.node(NodeKind::LimitClause, |p| {
                    p.advance();
                    p.row_count()
                })?;
            }
            if p.check_keyword(Keyword::Offset) && p.at_clause_keyword() {
                p.node(NodeKind::OffsetClause, |p| {
                    p.advance();
                    p.row_count()?;
                    if !p.eat_keyword(Keyword::Rows) {
                        p.eat_keyword(Keyword::Row);
                    }
                    Ok(())
                })?;
            }
            if p.check_keyword(Keyword::Fetch) && p.at_clause_keyword() {
                p.fetch_clause()?;
            }
            Ok(())
        })
    }

    /// `ORDER BY item (, item)*`.
    pub(super) fn order_by_clause(&mut self) -> PResult<()> {
        self.node(NodeKind::OrderByClause, |p| {
            p.expect_keyword(Keyword::Order)?;
            p.expect_keyword(Keyword::By)?;
            p.sorted_item()?;
            while p.eat(&TokenKind::Comma) {
                p.sorted_item()?;
            }
            Ok(())
        })
    }

    fn sorted_item(&mut self) -> PResult<()> {
        self.node(NodeKind::SortedItem, |p| {
            p.expression()?;
            p.sort_direction();
            p.nulls_precedence()
        })
    }

    fn sort_direction(&mut self) {
        if !self.eat_keyword(Keyword::Asc) {
            self.eat_keyword(Keyword::Desc);
        }
    }

    fn nulls_precedence(&mut self) -> PResult<()> {
        if self.eat_keyword(Keyword::Nulls) && !self.eat_keyword(Keyword::First) {
            self.expect_keyword(Keyword::Last)?;
        }
        Ok(())
    }

    /// An integer literal or a parameter.
    fn row_count(&mut self) -> PResult<()> {
        if self.check(&TokenKind::Colon) || self.check(&TokenKind::Question) {
            return self.parameter();
        }
        if matches!(self.peek().kind, TokenKind::Number { .. }) {
            return self.literal();
        }
        Err(self.error("integer or parameter"))
    }

    fn fetch_clause(&mut self) -> PResult<()> {
        self.node(NodeKind::FetchClause, |p| {
            p.advance();
            p.advance();
            p.row_count()?;
            p.eat(&TokenKind::Percent);
            if !p.eat_keyword(Keyword::Rows) {
                p.expect_keyword(Keyword::Row)?;
            }
            if p.check_keyword(Keyword::With) {
                p.advance();
                p.expect_keyword(Keyword::Ties)
            } else {
                p.expect_keyword(Keyword::Only)
            }
        })
    }
}
