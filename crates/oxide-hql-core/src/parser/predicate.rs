//! Predicate rules: boolean connectives and the predicate forms that
//! follow an expression.

use super::expression::ParenContent;
use super::parser::{PResult, Parser, Shape};
use super::pratt::{infix_binding_power, token_to_comparison_op};
use super::ParseError;
use crate::lexer::{Keyword, TokenKind};
use crate::tree::{Checkpoint, NodeKind};

impl Parser {
    /// Parses a predicate. The result says whether it is a real predicate
    /// or a bare expression wrapped in `ExpressionPredicate`.
    pub(super) fn predicate(&mut self) -> PResult<Shape> {
        self.nested(Self::or_predicate)
    }

    fn or_predicate(&mut self) -> PResult<Shape> {
        let checkpoint = self.tree.checkpoint();
        let mut shape = self.and_predicate()?;
        while self.check_keyword(Keyword::Or) {
            self.tree.start_node_at(checkpoint, NodeKind::OrPredicate);
            self.advance();
            self.and_predicate()?;
            self.tree.finish_node();
            shape = Shape::Predicate;
        }
        Ok(shape)
    }

    fn and_predicate(&mut self) -> PResult<Shape> {
        let checkpoint = self.tree.checkpoint();
        let mut shape = self.not_predicate()?;
        while self.check_keyword(Keyword::And) {
            self.tree.start_node_at(checkpoint, NodeKind::AndPredicate);
            self.advance();
            self.not_predicate()?;
            self.tree.finish_node();
            shape = Shape::Predicate;
        }
        Ok(shape)
    }

    fn not_predicate(&mut self) -> PResult<Shape> {
        if self.check_keyword(Keyword::Not) && !self.check_nth(1, &TokenKind::Dot) {
            return self.nested(|p| {
                p.node(NodeKind::NotPredicate, |p| {
                    p.advance();
                    p.not_predicate()
                })?;
                Ok(Shape::Predicate)
            });
        }
        self.atomic_predicate()
    }

    fn atomic_predicate(&mut self) -> PResult<Shape> {
        if self.check_keyword(Keyword::Exists) && self.at_exists_argument() {
            self.node(NodeKind::ExistsPredicate, |p| {
                p.advance();
                if p.at_collection_function() {
                    p.collection_function()
                } else {
                    p.expression()
                }
            })?;
            return Ok(Shape::Predicate);
        }

        let checkpoint = self.tree.checkpoint();
        if self.check(&TokenKind::LeftParen) && self.paren_content(0) == ParenContent::Other {
            return self.parenthesized_predicate(checkpoint);
        }
        self.expression()?;
        self.predicate_suffix(checkpoint)
    }

    fn at_exists_argument(&self) -> bool {
        !self.check_nth(1, &TokenKind::Dot)
            && (self.check_nth(1, &TokenKind::LeftParen)
                || self.check_nth(1, &TokenKind::Colon)
                || self.peek_identifier_nth(1))
    }

    /// `( ... )` in predicate position: a grouped predicate, or the start of
    /// an expression that continues after the parenthesis.
    fn parenthesized_predicate(&mut self, checkpoint: Checkpoint) -> PResult<Shape> {
        self.advance();
        let inner = self.predicate()?;
        if self.check(&TokenKind::Comma) {
            while self.eat(&TokenKind::Comma) {
                self.expression_or_predicate()?;
            }
            self.expect(&TokenKind::RightParen)?;
            self.wrap(checkpoint, NodeKind::TupleExpression);
        } else {
            self.expect(&TokenKind::RightParen)?;
            if inner == Shape::Predicate && !self.at_predicate_continuation() {
                self.wrap(checkpoint, NodeKind::GroupedPredicate);
                return Ok(Shape::Predicate);
            }
            self.wrap(checkpoint, NodeKind::GroupedExpression);
        }
        self.infix_loop(checkpoint, 0)?;
        self.predicate_suffix(checkpoint)
    }

    /// Returns true if the current token continues an expression or starts
    /// a predicate suffix.
    fn at_predicate_continuation(&self) -> bool {
        let kind = &self.peek().kind;
        if infix_binding_power(kind).is_some() || token_to_comparison_op(kind).is_some() {
            return true;
        }
        let suffix = |keyword: Option<Keyword>| {
            matches!(
                keyword,
                Some(
                    Keyword::Between
                        | Keyword::Like
                        | Keyword::Ilike
                        | Keyword::In
                        | Keyword::Member
                )
            )
        };
        match self.peek().keyword() {
            Some(Keyword::Is) => true,
            Some(Keyword::Not) => suffix(self.peek_nth(1).keyword()),
            keyword => suffix(keyword),
        }
    }

    /// Parses what follows an expression: a comparison, BETWEEN, LIKE, IN,
    /// IS ..., MEMBER OF, or nothing.
    fn predicate_suffix(&mut self, checkpoint: Checkpoint) -> PResult<Shape> {
        if token_to_comparison_op(&self.peek().kind).is_some() {
            self.tree.start_node_at(checkpoint, NodeKind::RelationalPredicate);
            self.advance();
            self.expression()?;
            self.tree.finish_node();
            if token_to_comparison_op(&self.peek().kind).is_some() {
                return Err(ParseError::new(
                    "Comparison operators cannot be chained",
                    self.peek().span,
                ));
            }
            return Ok(Shape::Predicate);
        }

        if self.check_keyword(Keyword::Is) {
            return self.is_predicate(checkpoint);
        }

        let offset = usize::from(self.check_keyword(Keyword::Not));
        let kind = match self.peek_nth(offset).keyword() {
            Some(Keyword::Between) => NodeKind::BetweenPredicate,
            Some(Keyword::Like | Keyword::Ilike) => NodeKind::LikePredicate,
            Some(Keyword::In) => NodeKind::InPredicate,
            Some(Keyword::Member) => NodeKind::MemberOfPredicate,
            _ => {
                self.wrap(checkpoint, NodeKind::ExpressionPredicate);
                return Ok(Shape::Expression);
            }
        };

        self.tree.start_node_at(checkpoint, kind);
        if offset == 1 {
            self.advance();
        }
        self.advance();
        match kind {
            NodeKind::BetweenPredicate => {
                self.expression()?;
                self.expect_keyword(Keyword::And)?;
                self.expression()?;
            }
            NodeKind::LikePredicate => {
                let in_like_pattern = self.in_like_pattern;
                self.in_like_pattern = true;
                let pattern = self.expression();
                self.in_like_pattern = in_like_pattern;
                pattern?;
                if self.eat_keyword(Keyword::Escape) {
                    self.literal()?;
                }
            }
            NodeKind::InPredicate => self.in_list()?,
            _ => {
                self.eat_keyword(Keyword::Of);
                self.path()?;
            }
        }
        self.tree.finish_node();
        Ok(Shape::Predicate)
    }

    /// `IS [NOT] NULL`, `IS [NOT] EMPTY`, `IS [NOT] DISTINCT FROM expr`.
    fn is_predicate(&mut self, checkpoint: Checkpoint) -> PResult<Shape> {
        let offset = 1 + usize::from(self.check_keyword_nth(1, Keyword::Not));
        let kind = match self.peek_nth(offset).keyword() {
            Some(Keyword::Null) => NodeKind::IsNullPredicate,
            Some(Keyword::Empty) => NodeKind::IsEmptyPredicate,
            Some(Keyword::Distinct) => NodeKind::IsDistinctFromPredicate,
            _ => {
                let token = self.peek_nth(offset);
                return Err(ParseError::unexpected(
                    "NULL, EMPTY or DISTINCT FROM",
                    token.kind.clone(),
                    token.span,
                ));
            }
        };

        self.tree.start_node_at(checkpoint, kind);
        for _ in 0..=offset {
            self.advance();
        }
        if kind == NodeKind::IsDistinctFromPredicate {
            self.expect_keyword(Keyword::From)?;
            self.expression()?;
        }
        self.tree.finish_node();
        Ok(Shape::Predicate)
    }

    fn in_list(&mut self) -> PResult<()> {
        if self.at_collection_function() {
            return self.node(NodeKind::CollectionInList, Self::collection_function);
        }
        if self.check(&TokenKind::Colon) || self.check(&TokenKind::Question) {
            return self.node(NodeKind::ParameterInList, Self::parameter);
        }
        if !self.check(&TokenKind::LeftParen) {
            return Err(self.error("'(' or parameter"));
        }

        let subquery = |p: &mut Self| {
            p.node(NodeKind::SubqueryInList, |p| {
                p.advance();
                p.subquery()?;
                p.expect(&TokenKind::RightParen)
            })
        };
        match self.paren_content(0) {
            ParenContent::Query => return subquery(self),
            ParenContent::MaybeQuery => {
                if self.speculate(subquery).is_some() {
                    return Ok(());
                }
            }
            ParenContent::Other => {}
        }

        self.node(NodeKind::ExplicitInList, |p| {
            p.advance();
            if !p.check(&TokenKind::RightParen) {
                p.expression_or_predicate()?;
                while p.eat(&TokenKind::Comma) {
                    p.expression_or_predicate()?;
                }
            }
            p.expect(&TokenKind::RightParen)
        })
    }
}
