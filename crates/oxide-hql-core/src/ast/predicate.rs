//! Predicate AST types.
//!
//! Predicates form their own layer over expressions: they appear in WHERE,
//! HAVING, ON/WITH join restrictions, CASE WHEN and FILTER clauses, and
//! re-enter the expression layer only through [`Expr::Predicate`].

use serde::Serialize;

use super::expression::{Expr, Parameter, Path, QualifiedName};
use super::query::QueryExpression;
use crate::lexer::Span;

/// Relational comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ComparisonOp {
    /// `=`
    Eq,
    /// `<>`, `!=` or `^=`
    NotEq,
    /// `<`
    Lt,
    /// `<=`
    LtEq,
    /// `>`
    Gt,
    /// `>=`
    GtEq,
}

impl ComparisonOp {
    /// Returns the HQL representation of the operator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::NotEq => "<>",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
        }
    }
}

/// The right-hand side of an IN predicate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum InList {
    /// `(a, b, c)`, possibly empty.
    Values(Vec<Expr>),
    /// `(select ...)`
    Subquery(Box<QueryExpression>),
    /// `:ids`
    Parameter(Parameter),
    /// `elements(e.tags)`
    Elements(QualifiedName),
    /// `indices(e.list)`
    Indices(QualifiedName),
}

/// The operand of an EXISTS predicate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ExistsTarget {
    /// An expression, typically a subquery.
    Expression(Expr),
    /// `exists elements(e.tags)`
    Elements(QualifiedName),
    /// `exists indices(e.list)`
    Indices(QualifiedName),
}

/// An HQL predicate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Predicate {
    /// `left OR right`
    Or {
        /// Left operand.
        left: Box<Predicate>,
        /// Right operand.
        right: Box<Predicate>,
        /// Source span.
        span: Span,
    },
    /// `left AND right`
    And {
        /// Left operand.
        left: Box<Predicate>,
        /// Right operand.
        right: Box<Predicate>,
        /// Source span.
        span: Span,
    },
    /// `NOT predicate`
    Not {
        /// The negated predicate.
        predicate: Box<Predicate>,
        /// Source span.
        span: Span,
    },
    /// `(predicate)`
    Grouped {
        /// The inner predicate.
        predicate: Box<Predicate>,
        /// Source span.
        span: Span,
    },
    /// `left op right`
    Comparison {
        /// Left operand.
        left: Expr,
        /// Operator.
        op: ComparisonOp,
        /// Right operand.
        right: Expr,
        /// Source span.
        span: Span,
    },
    /// `expr [NOT] BETWEEN low AND high`
    Between {
        /// The tested expression.
        expr: Expr,
        /// Lower bound.
        low: Expr,
        /// Upper bound.
        high: Expr,
        /// Whether this is NOT BETWEEN.
        negated: bool,
        /// Source span.
        span: Span,
    },
    /// `expr [NOT] LIKE|ILIKE pattern [ESCAPE 'c']`
    Like {
        /// The tested expression.
        expr: Expr,
        /// The pattern.
        pattern: Expr,
        /// The escape character.
        escape: Option<String>,
        /// Whether this is ILIKE.
        case_insensitive: bool,
        /// Whether this is NOT LIKE.
        negated: bool,
        /// Source span.
        span: Span,
    },
    /// `expr [NOT] IN list`
    In {
        /// The tested expression.
        expr: Expr,
        /// The candidates.
        list: InList,
        /// Whether this is NOT IN.
        negated: bool,
        /// Source span.
        span: Span,
    },
    /// `EXISTS target`
    Exists {
        /// The operand.
        target: ExistsTarget,
        /// Source span.
        span: Span,
    },
    /// `expr IS [NOT] NULL`
    IsNull {
        /// The tested expression.
        expr: Expr,
        /// Whether this is IS NOT NULL.
        negated: bool,
        /// Source span.
        span: Span,
    },
    /// `left IS [NOT] DISTINCT FROM right`
    IsDistinctFrom {
        /// Left operand.
        left: Expr,
        /// Right operand.
        right: Expr,
        /// Whether this is IS NOT DISTINCT FROM.
        negated: bool,
        /// Source span.
        span: Span,
    },
    /// `expr IS [NOT] EMPTY`
    IsEmpty {
        /// The collection expression.
        expr: Expr,
        /// Whether this is IS NOT EMPTY.
        negated: bool,
        /// Source span.
        span: Span,
    },
    /// `expr [NOT] MEMBER [OF] path`
    MemberOf {
        /// The candidate member.
        expr: Expr,
        /// The collection path.
        collection: Path,
        /// Whether this is NOT MEMBER OF.
        negated: bool,
        /// Source span.
        span: Span,
    },
    /// A bare expression used as a predicate.
    Expression(Expr),
}

impl Predicate {
    /// Returns the source span of the predicate.
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::Or { span, .. }
            | Self::And { span, .. }
            | Self::Not { span, .. }
            | Self::Grouped { span, .. }
            | Self::Comparison { span, .. }
            | Self::Between { span, .. }
            | Self::Like { span, .. }
            | Self::In { span, .. }
            | Self::Exists { span, .. }
            | Self::IsNull { span, .. }
            | Self::IsDistinctFrom { span, .. }
            | Self::IsEmpty { span, .. }
            | Self::MemberOf { span, .. } => *span,
            Self::Expression(expr) => expr.span(),
        }
    }
}
