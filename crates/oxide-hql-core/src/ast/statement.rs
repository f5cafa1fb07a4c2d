//! HQL statement AST types.

use serde::Serialize;

use super::expression::{Expr, Ident, QualifiedName};
use super::predicate::Predicate;
use super::query::QueryExpression;
use crate::lexer::Span;

/// The entity an UPDATE, DELETE or INSERT targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetEntity {
    /// Entity name.
    pub entity: QualifiedName,
    /// Alias.
    pub alias: Option<Ident>,
}

/// A SELECT statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectStatement {
    /// The query.
    pub query: QueryExpression,
    /// Source span.
    pub span: Span,
}

/// An assignment in UPDATE SET.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assignment {
    /// The assigned attribute path.
    pub target: QualifiedName,
    /// Value expression or predicate.
    pub value: Expr,
}

/// An UPDATE statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateStatement {
    /// Whether VERSIONED was specified.
    pub versioned: bool,
    /// The updated entity.
    pub target: TargetEntity,
    /// SET assignments.
    pub assignments: Vec<Assignment>,
    /// WHERE clause.
    pub where_clause: Option<Predicate>,
    /// Source span.
    pub span: Span,
}

/// A DELETE statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeleteStatement {
    /// The deleted entity.
    pub target: TargetEntity,
    /// WHERE clause.
    pub where_clause: Option<Predicate>,
    /// Source span.
    pub span: Span,
}

/// Source of data for INSERT.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum InsertSource {
    /// VALUES (...), (...), ...
    Values(Vec<Vec<Expr>>),
    /// A query expression.
    Query(Box<QueryExpression>),
}

/// An INSERT statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsertStatement {
    /// The entity inserted into.
    pub target: TargetEntity,
    /// The attribute paths being set.
    pub fields: Vec<QualifiedName>,
    /// Values to insert.
    pub source: InsertSource,
    /// Source span.
    pub span: Span,
}

/// An HQL statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Statement {
    /// SELECT statement (also FROM-first queries).
    Select(SelectStatement),
    /// UPDATE statement.
    Update(UpdateStatement),
    /// DELETE statement.
    Delete(DeleteStatement),
    /// INSERT statement.
    Insert(InsertStatement),
}

impl Statement {
    /// Returns the source span of the statement.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::Select(stmt) => stmt.span,
            Self::Update(stmt) => stmt.span,
            Self::Delete(stmt) => stmt.span,
            Self::Insert(stmt) => stmt.span,
        }
    }
}
