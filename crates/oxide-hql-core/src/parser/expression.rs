//! Expression rules: Pratt operators, primaries, literals, parameters,
//! paths, CASE and selections.

use super::parser::{PResult, Parser};
use super::pratt::{
    infix_binding_power, infix_node_kind, prefix_binding_power, DURATION_BINDING_POWER,
};
use crate::diagnostics::DiagnosticKind;
use crate::lexer::{Keyword, NumberKind, TokenKind};
use crate::tree::{Checkpoint, NodeKind};

/// What a parenthesis at some lookahead position opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ParenContent {
    /// `(` directly followed by SELECT, FROM or WITH.
    Query,
    /// A run of `(` ending in a query keyword: a query or a grouped one.
    MaybeQuery,
    /// Anything else.
    Other,
}

impl Parser {
    /// Parses an expression.
    pub(super) fn expression(&mut self) -> PResult<()> {
        self.expression_bp(0)
    }

    /// Parses an expression or a predicate.
    pub(super) fn expression_or_predicate(&mut self) -> PResult<()> {
        self.predicate().map(|_| ())
    }

    /// Pratt loop: a prefix followed by operators binding at least `min_bp`.
    fn expression_bp(&mut self, min_bp: u8) -> PResult<()> {
        self.nested(|p| {
            let checkpoint = p.tree.checkpoint();
            p.prefix()?;
            p.infix_loop(checkpoint, min_bp)
        })
    }

    /// Continues an expression whose left operand starts at `checkpoint`.
    pub(super) fn infix_loop(&mut self, checkpoint: Checkpoint, min_bp: u8) -> PResult<()> {
        loop {
            let kind = &self.peek().kind;
            if let (Some((l_bp, r_bp)), Some(node)) =
                (infix_binding_power(kind), infix_node_kind(kind))
            {
                if l_bp < min_bp {
                    break;
                }
                self.tree.start_node_at(checkpoint, node);
                self.advance();
                self.expression_bp(r_bp)?;
                self.tree.finish_node();
                continue;
            }

            if let Some(node) = self.at_duration() {
                if DURATION_BINDING_POWER < min_bp {
                    break;
                }
                self.tree.start_node_at(checkpoint, node);
                if node == NodeKind::FromDurationExpression {
                    self.advance();
                }
                self.advance();
                self.tree.finish_node();
                continue;
            }

            break;
        }
        Ok(())
    }

    /// Detects `field` or `BY field` after an operand.
    fn at_duration(&self) -> Option<NodeKind> {
        let field_at = |n: usize| {
            self.peek_nth(n)
                .keyword()
                .is_some_and(|keyword| keyword.is_datetime_field())
                && !self.check_nth(n + 1, &TokenKind::Dot)
                && !self.check_nth(n + 1, &TokenKind::LeftParen)
        };
        if field_at(0) {
            Some(NodeKind::ToDurationExpression)
        } else if self.check_keyword(Keyword::By) && field_at(1) {
            Some(NodeKind::FromDurationExpression)
        } else {
            None
        }
    }

    fn prefix(&mut self) -> PResult<()> {
        if self.in_like_pattern
            && self.check(&TokenKind::Percent)
            && (self.check_nth(1, &TokenKind::Colon) || self.check_nth(1, &TokenKind::Question))
            && self.adjacent(1)
        {
            return self.parameter();
        }

        if let Some(bp) = prefix_binding_power(&self.peek().kind) {
            if matches!(self.peek_nth(1).kind, TokenKind::Number { .. }) {
                return self.node(NodeKind::SignedNumericLiteral, |p| {
                    p.advance();
                    p.advance();
                    Ok(())
                });
            }
            return self.node(NodeKind::SignedExpression, |p| {
                p.advance();
                p.expression_bp(bp)
            });
        }

        self.primary()
    }

    fn primary(&mut self) -> PResult<()> {
        match &self.peek().kind {
            TokenKind::LeftParen => self.parenthesized_expression(),
            TokenKind::Number { .. }
            | TokenKind::String(_)
            | TokenKind::Binary(_)
            | TokenKind::LeftBrace => self.literal(),
            TokenKind::Colon | TokenKind::Question => self.parameter(),
            TokenKind::QuotedIdentifier(_) => self.path(),
            TokenKind::Word { .. } => self.word_primary(),
            _ => Err(self.error("expression")),
        }
    }

    /// Primaries introduced by a word: literals, special forms, functions
    /// and paths.
    fn word_primary(&mut self) -> PResult<()> {
        if self.check_nth(1, &TokenKind::Dot) || self.check_nth(1, &TokenKind::LeftBracket) {
            return self.path();
        }
        if self.at_keyword_literal() {
            return self.literal();
        }

        let call = self.check_nth(1, &TokenKind::LeftParen);
        match self.peek().keyword() {
            Some(Keyword::Day)
                if self.check_keyword_nth(1, Keyword::Of)
                    && self.check_keyword_nth(2, Keyword::Week) =>
            {
                self.calendar(NodeKind::DayOfWeekExpression)
            }
            Some(Keyword::Day)
                if self.check_keyword_nth(1, Keyword::Of)
                    && self.check_keyword_nth(2, Keyword::Month) =>
            {
                self.calendar(NodeKind::DayOfMonthExpression)
            }
            Some(Keyword::Week)
                if self.check_keyword_nth(1, Keyword::Of)
                    && self.check_keyword_nth(2, Keyword::Year) =>
            {
                self.calendar(NodeKind::WeekOfYearExpression)
            }
            Some(Keyword::Case) => self.case_expression(),
            Some(Keyword::Cast) if call => self.cast_function(),
            Some(Keyword::Extract) if call => self.extract_function(),
            Some(Keyword::Trim) if call => self.trim_function(),
            Some(Keyword::Every | Keyword::All) if self.at_quantified_argument() => {
                self.quantified_function(NodeKind::EveryFunction)
            }
            Some(Keyword::Any | Keyword::Some) if self.at_quantified_argument() => {
                self.quantified_function(NodeKind::AnyFunction)
            }
            Some(Keyword::Treat) if call => self.path(),
            _ if call => self.generic_function(),
            _ if self.at_clause_keyword() => Err(self.error("expression")),
            _ => self.path(),
        }
    }

    fn calendar(&mut self, kind: NodeKind) -> PResult<()> {
        self.node(kind, |p| {
            p.advance();
            p.advance();
            p.advance();
            Ok(())
        })
    }

    /// Returns true if the current word starts a keyword literal.
    fn at_keyword_literal(&self) -> bool {
        let Some(keyword) = self.peek().keyword() else {
            return false;
        };
        match keyword {
            Keyword::Null
            | Keyword::True
            | Keyword::False
            | Keyword::CurrentDate
            | Keyword::CurrentTime
            | Keyword::CurrentTimestamp
            | Keyword::LocalDate
            | Keyword::LocalTime
            | Keyword::LocalDatetime
            | Keyword::OffsetDatetime
            | Keyword::Instant => true,
            Keyword::Current => [
                Keyword::Date,
                Keyword::Time,
                Keyword::Datetime,
                Keyword::Timestamp,
            ]
            .into_iter()
            .any(|unit| self.check_keyword_nth(1, unit)),
            Keyword::Local => [Keyword::Date, Keyword::Time, Keyword::Datetime]
                .into_iter()
                .any(|unit| self.check_keyword_nth(1, unit)),
            Keyword::Offset => self.check_keyword_nth(1, Keyword::Datetime),
            Keyword::Date | Keyword::Time | Keyword::Timestamp | Keyword::Datetime => {
                matches!(self.peek_nth(1).kind, TokenKind::String(_))
            }
            _ => false,
        }
    }

    /// Parses a literal.
    pub(super) fn literal(&mut self) -> PResult<()> {
        self.node(NodeKind::Literal, |p| {
            if p.peek().keyword().is_some() {
                if !p.at_keyword_literal() {
                    return Err(p.error("literal"));
                }
                let two_words = matches!(
                    p.peek().keyword(),
                    Some(
                        Keyword::Current
                            | Keyword::Local
                            | Keyword::Offset
                            | Keyword::Date
                            | Keyword::Time
                            | Keyword::Timestamp
                            | Keyword::Datetime
                    )
                );
                p.advance();
                if two_words {
                    p.advance();
                }
                return Ok(());
            }

            match &p.peek().kind {
                TokenKind::Number { .. } | TokenKind::String(_) | TokenKind::Binary(_) => {
                    p.advance();
                    Ok(())
                }
                TokenKind::LeftBrace => p.jdbc_escape(),
                _ => Err(p.error("literal")),
            }
        })
    }

    /// `{d '...'}`, `{t '...'}` or `{ts '...'}`.
    fn jdbc_escape(&mut self) -> PResult<()> {
        self.advance();
        let unit_ok = matches!(
            &self.peek().kind,
            TokenKind::Word { text, .. }
                if ["d", "t", "ts"].iter().any(|unit| text.eq_ignore_ascii_case(unit))
        );
        if !unit_ok {
            return Err(self.error("d, t or ts"));
        }
        self.advance();
        if !matches!(self.peek().kind, TokenKind::String(_)) {
            return Err(self.error("string literal"));
        }
        self.advance();
        self.expect(&TokenKind::RightBrace)
    }

    /// Parses a parameter: `:name`, `?`, `?1`, `:#{...}` or `?#{...}`,
    /// with `%` wildcards glued to it inside a LIKE pattern.
    pub(super) fn parameter(&mut self) -> PResult<()> {
        self.node(NodeKind::Parameter, |p| {
            if p.in_like_pattern && p.check(&TokenKind::Percent) {
                p.advance();
            }

            if p.check(&TokenKind::Colon) {
                p.advance();
                if matches!(p.peek().kind, TokenKind::Spel(_)) && p.glued_to_previous() {
                    p.advance();
                } else {
                    p.identifier()?;
                }
            } else if p.check(&TokenKind::Question) {
                let marker = p.peek().span;
                p.advance();
                let glued = p.glued_to_previous();
                match &p.peek().kind {
                    TokenKind::Spel(_) if glued => p.advance(),
                    TokenKind::Number { lexeme, kind } if glued => {
                        if *kind != NumberKind::Integer || lexeme.parse::<u32>().is_err() {
                            return Err(super::ParseError::new(
                                format!("Invalid positional parameter ordinal '{lexeme}'"),
                                p.peek().span,
                            ));
                        }
                        p.advance();
                    }
                    _ => p.report(
                        DiagnosticKind::LegacyParameter,
                        "Legacy-style positional parameter '?' has no ordinal",
                        marker,
                    ),
                }
            } else {
                return Err(p.error("parameter"));
            }

            if p.in_like_pattern && p.check(&TokenKind::Percent) && p.glued_to_previous() {
                p.advance();
            }
            Ok(())
        })
    }

    /// Parses a path: `a.b[i].c` or `treat(a as B).c`.
    pub(super) fn path(&mut self) -> PResult<()> {
        self.node(NodeKind::Path, |p| {
            if p.check_keyword(Keyword::Treat) && p.check_nth(1, &TokenKind::LeftParen) {
                p.treated_path()?;
            } else {
                p.identifier()?;
                p.index_access()?;
            }
            while p.check(&TokenKind::Dot) && p.peek_identifier_nth(1) {
                p.advance();
                p.identifier()?;
                p.index_access()?;
            }
            Ok(())
        })
    }

    fn index_access(&mut self) -> PResult<()> {
        if self.check(&TokenKind::LeftBracket) {
            self.node(NodeKind::IndexAccess, |p| {
                p.advance();
                p.expression()?;
                p.expect(&TokenKind::RightBracket)
            })?;
        }
        Ok(())
    }

    fn treated_path(&mut self) -> PResult<()> {
        self.node(NodeKind::TreatedPath, |p| {
            p.advance();
            p.expect(&TokenKind::LeftParen)?;
            p.path()?;
            p.expect_keyword(Keyword::As)?;
            p.simple_path()?;
            p.expect(&TokenKind::RightParen)
        })
    }

    /// Classifies the parenthesis at lookahead position `n`.
    pub(super) fn paren_content(&self, n: usize) -> ParenContent {
        if !self.check_nth(n, &TokenKind::LeftParen) {
            return ParenContent::Other;
        }
        if self.query_keyword_at(n + 1) {
            return ParenContent::Query;
        }
        let mut idx = n + 1;
        while self.check_nth(idx, &TokenKind::LeftParen) {
            idx += 1;
        }
        if idx > n + 1 && self.query_keyword_at(idx) {
            ParenContent::MaybeQuery
        } else {
            ParenContent::Other
        }
    }

    /// Returns true if the token at `n` begins a query.
    pub(super) fn query_keyword_at(&self, n: usize) -> bool {
        match self.peek_nth(n).keyword() {
            Some(Keyword::Select | Keyword::From) => true,
            Some(Keyword::With) => self.peek_identifier_nth(n + 1),
            _ => false,
        }
    }

    /// `( subquery )`, a tuple, or a grouped expression.
    fn parenthesized_expression(&mut self) -> PResult<()> {
        match self.paren_content(0) {
            ParenContent::Query => return self.subquery_expression(),
            ParenContent::MaybeQuery => {
                if self.speculate(Self::subquery_expression).is_some() {
                    return Ok(());
                }
            }
            ParenContent::Other => {}
        }

        let checkpoint = self.tree.checkpoint();
        self.advance();
        self.expression_or_predicate()?;
        let kind = if self.check(&TokenKind::Comma) {
            while self.eat(&TokenKind::Comma) {
                self.expression_or_predicate()?;
            }
            NodeKind::TupleExpression
        } else {
            NodeKind::GroupedExpression
        };
        self.expect(&TokenKind::RightParen)?;
        self.wrap(checkpoint, kind);
        Ok(())
    }

    fn subquery_expression(&mut self) -> PResult<()> {
        self.node(NodeKind::SubqueryExpression, |p| {
            p.expect(&TokenKind::LeftParen)?;
            p.subquery()?;
            p.expect(&TokenKind::RightParen)
        })
    }

    fn case_expression(&mut self) -> PResult<()> {
        if self.check_keyword_nth(1, Keyword::When) {
            return self.node(NodeKind::SearchedCaseExpression, |p| {
                p.advance();
                while p.check_keyword(Keyword::When) {
                    p.node(NodeKind::CaseWhenPredicateClause, |p| {
                        p.advance();
                        p.predicate()?;
                        p.expect_keyword(Keyword::Then)?;
                        p.expression_or_predicate()
                    })?;
                }
                p.case_tail()
            });
        }

        self.node(NodeKind::SimpleCaseExpression, |p| {
            p.advance();
            p.expression_or_predicate()?;
            if !p.check_keyword(Keyword::When) {
                return Err(p.error("WHEN"));
            }
            while p.check_keyword(Keyword::When) {
                p.node(NodeKind::CaseWhenExpressionClause, |p| {
                    p.advance();
                    p.expression()?;
                    p.expect_keyword(Keyword::Then)?;
                    p.expression_or_predicate()
                })?;
            }
            p.case_tail()
        })
    }

    fn case_tail(&mut self) -> PResult<()> {
        if self.eat_keyword(Keyword::Else) {
            self.expression_or_predicate()?;
        }
        self.expect_keyword(Keyword::End)
    }

    /// Parses one selection of a SELECT list, with its alias.
    pub(super) fn selection(&mut self) -> PResult<()> {
        self.node(NodeKind::Selection, |p| {
            if p.at_instantiation() {
                p.instantiation()?;
            } else if p.check_keyword(Keyword::Entry) && p.check_nth(1, &TokenKind::LeftParen) {
                p.node(NodeKind::MapEntrySelection, |p| {
                    p.advance();
                    p.advance();
                    p.path()?;
                    p.expect(&TokenKind::RightParen)
                })?;
            } else if p.check_keyword(Keyword::Object) && p.check_nth(1, &TokenKind::LeftParen) {
                p.node(NodeKind::ObjectSelection, |p| {
                    p.advance();
                    p.advance();
                    p.identifier()?;
                    p.expect(&TokenKind::RightParen)
                })?;
            } else {
                p.expression_or_predicate()?;
            }
            p.optional_alias()
        })
    }

    fn at_instantiation(&self) -> bool {
        self.check_keyword(Keyword::New)
            && self.peek_identifier_nth(1)
            && !self.check_nth(1, &TokenKind::Dot)
    }

    fn instantiation(&mut self) -> PResult<()> {
        self.node(NodeKind::Instantiation, |p| {
            p.advance();
            p.node(NodeKind::InstantiationTarget, |p| {
                let collection = (p.check_keyword(Keyword::List) || p.check_keyword(Keyword::Map))
                    && p.check_nth(1, &TokenKind::LeftParen);
                if collection {
                    p.advance();
                    Ok(())
                } else {
                    p.simple_path()
                }
            })?;
            p.expect(&TokenKind::LeftParen)?;
            loop {
                p.node(NodeKind::InstantiationArgument, |p| {
                    if p.at_instantiation() {
                        p.instantiation()?;
                    } else {
                        p.expression_or_predicate()?;
                    }
                    p.optional_alias()
                })?;
                if !p.eat(&TokenKind::Comma) {
                    break;
                }
            }
            p.expect(&TokenKind::RightParen)
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::lexer::TokenKind;
    use crate::parser::Parser;
    use crate::tree::{Node, NodeKind};

    fn tree(source: &str) -> Node {
        let (mut trees, diagnostics) = Parser::new(source).parse_trees();
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        trees.remove(0)
    }

    fn selection(source: &str) -> Node {
        let tree = tree(&format!("select {source}"));
        tree.descendant(NodeKind::Selection).cloned().unwrap()
    }

    fn first_child(node: &Node) -> &Node {
        node.nodes().next().unwrap()
    }

    #[test]
    fn test_multiplication_binds_tighter() {
        let selection = selection("1 + 2 * 3");
        let predicate = first_child(&selection);
        let add = first_child(predicate);
        assert_eq!(add.kind, NodeKind::AdditionExpression);
        let operands: Vec<_> = add.nodes().map(|node| node.kind).collect();
        assert_eq!(
            operands,
            vec![NodeKind::Literal, NodeKind::MultiplicationExpression]
        );
    }

    #[test]
    fn test_signed_number_is_literal() {
        let selection = selection("-1");
        let predicate = first_child(&selection);
        assert_eq!(first_child(predicate).kind, NodeKind::SignedNumericLiteral);
    }

    #[test]
    fn test_duration_postfix() {
        let selection = selection("e.duration by day");
        let predicate = first_child(&selection);
        assert_eq!(first_child(predicate).kind, NodeKind::FromDurationExpression);
    }

    #[test]
    fn test_like_wildcards_stay_with_parameter() {
        let tree = tree("from Person p where p.name like %:name%");
        let parameter = tree.descendant(NodeKind::Parameter).unwrap();
        let wildcards = parameter
            .tokens()
            .filter(|token| token.kind == TokenKind::Percent)
            .count();
        assert_eq!(wildcards, 2);
    }

    #[test]
    fn test_percent_outside_like_is_modulo() {
        let selection = selection(":a % 2");
        let predicate = first_child(&selection);
        assert_eq!(first_child(predicate).kind, NodeKind::MultiplicationExpression);
    }

    #[test]
    fn test_legacy_parameter_warns() {
        let (_, diagnostics) = Parser::new("from Person p where p.id = ?").parse_trees();
        assert_eq!(diagnostics.len(), 1);
        assert!(!diagnostics[0].is_error());
    }

    #[test]
    fn test_ordinal_out_of_range() {
        let (trees, diagnostics) = Parser::new("from Person p where p.id = ?99999999999").parse_trees();
        assert!(trees.is_empty());
        assert!(diagnostics[0].message.contains("99999999999"));
    }

    #[test]
    fn test_jdbc_escape_literal() {
        let selection = selection("{d '2024-01-31'}");
        assert!(selection.descendant(NodeKind::Literal).is_some());
    }

    #[test]
    fn test_tuple_and_grouped() {
        assert!(selection("(1, 2)").descendant(NodeKind::TupleExpression).is_some());
        assert!(selection("(1 + 2) * 3").descendant(NodeKind::GroupedExpression).is_some());
    }

    #[test]
    fn test_nested_parens_around_subquery() {
        let selection = selection("((select max(e.id) from Employee e))");
        assert!(selection.descendant(NodeKind::SubqueryExpression).is_some());
    }

    #[test]
    fn test_instantiation() {
        let selection = selection("new com.acme.Dto(e.id, e.name as name)");
        let instantiation = selection.descendant(NodeKind::Instantiation).unwrap();
        assert_eq!(
            instantiation
                .nodes()
                .filter(|node| node.kind == NodeKind::InstantiationArgument)
                .count(),
            2
        );
    }

    #[test]
    fn test_case_requires_when() {
        let (trees, diagnostics) = Parser::new("select case e.x end from E e").parse_trees();
        assert!(trees.is_empty());
        assert!(diagnostics[0].message.contains("WHEN"));
    }
}
