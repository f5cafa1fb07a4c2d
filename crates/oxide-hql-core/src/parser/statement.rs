//! UPDATE, DELETE and INSERT statements, and the dotted names they share
//! with the rest of the grammar.

use super::parser::{PResult, Parser};
use crate::lexer::{Keyword, TokenKind};
use crate::tree::NodeKind;

impl Parser {
    /// `UPDATE [VERSIONED] Entity [alias] SET assignments [WHERE ...]`.
    pub(super) fn update_statement(&mut self) -> PResult<()> {
        self.node(NodeKind::UpdateStatement, |p| {
            p.advance();
            let versioned = p.check_keyword(Keyword::Versioned)
                && p.peek_identifier_nth(1)
                && !p.check_keyword_nth(1, Keyword::Set);
            if versioned {
                p.advance();
            }
            p.target_entity()?;
            p.node(NodeKind::SetClause, |p| {
                p.expect_keyword(Keyword::Set)?;
                p.assignment()?;
                while p.eat(&TokenKind::Comma) {
                    p.assignment()?;
                }
                Ok(())
            })?;
            if p.check_keyword(Keyword::Where) {
                p.where_clause()?;
            }
            Ok(())
        })
    }

    fn assignment(&mut self) -> PResult<()> {
        self.node(NodeKind::Assignment, |p| {
            p.simple_path()?;
            p.expect(&TokenKind::Eq)?;
            p.expression_or_predicate()
        })
    }

    /// `DELETE [FROM] Entity [alias] [WHERE ...]`.
    pub(super) fn delete_statement(&mut self) -> PResult<()> {
        self.node(NodeKind::DeleteStatement, |p| {
            p.advance();
            if p.check_keyword(Keyword::From) && p.peek_identifier_nth(1) {
                p.advance();
            }
            p.target_entity()?;
            if p.check_keyword(Keyword::Where) {
                p.where_clause()?;
            }
            Ok(())
        })
    }

    /// `INSERT [INTO] Entity (fields) (query | VALUES ...)`.
    pub(super) fn insert_statement(&mut self) -> PResult<()> {
        self.node(NodeKind::InsertStatement, |p| {
            p.advance();
            if p.check_keyword(Keyword::Into) && p.peek_identifier_nth(1) {
                p.advance();
            }
            p.target_entity()?;
            p.node(NodeKind::TargetFields, |p| {
                p.expect(&TokenKind::LeftParen)?;
                p.simple_path()?;
                while p.eat(&TokenKind::Comma) {
                    p.simple_path()?;
                }
                p.expect(&TokenKind::RightParen)
            })?;

            if p.check_keyword(Keyword::Values) && p.check_nth(1, &TokenKind::LeftParen) {
                p.node(NodeKind::ValuesList, |p| {
                    p.advance();
                    p.values()?;
                    while p.eat(&TokenKind::Comma) {
                        p.values()?;
                    }
                    Ok(())
                })
            } else if p.at_query_start() {
                p.query_expression()
            } else {
                Err(p.error("VALUES or query"))
            }
        })
    }

    fn values(&mut self) -> PResult<()> {
        self.node(NodeKind::Values, |p| {
            p.expect(&TokenKind::LeftParen)?;
            p.expression()?;
            while p.eat(&TokenKind::Comma) {
                p.expression()?;
            }
            p.expect(&TokenKind::RightParen)
        })
    }

    fn target_entity(&mut self) -> PResult<()> {
        self.node(NodeKind::TargetEntity, |p| {
            p.entity_name()?;
            p.optional_alias()
        })
    }

    /// A dotted entity name.
    pub(super) fn entity_name(&mut self) -> PResult<()> {
        self.node(NodeKind::EntityName, Self::dotted_identifiers)
    }

    /// A dotted name with no indexes or TREAT.
    pub(super) fn simple_path(&mut self) -> PResult<()> {
        self.node(NodeKind::SimplePath, Self::dotted_identifiers)
    }

    fn dotted_identifiers(&mut self) -> PResult<()> {
        self.identifier()?;
        while self.check(&TokenKind::Dot) && self.peek_identifier_nth(1) {
            self.advance();
            self.identifier()?;
        }
        Ok(())
    }
}
