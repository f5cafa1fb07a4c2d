//! Query expression AST types: CTEs, set operations, clauses and joins.

use serde::Serialize;

use super::expression::{Expr, Ident, Parameter, Path, QualifiedName};
use super::literal::{Literal, NumericLiteral};
use super::predicate::Predicate;
use crate::lexer::Span;

/// Order direction for ORDER BY.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum OrderDirection {
    /// Ascending order (default).
    #[default]
    Asc,
    /// Descending order.
    Desc,
}

impl OrderDirection {
    /// Returns the HQL representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Null ordering for ORDER BY.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NullOrdering {
    /// NULLs come first.
    First,
    /// NULLs come last.
    Last,
}

impl NullOrdering {
    /// Returns the HQL representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::First => "NULLS FIRST",
            Self::Last => "NULLS LAST",
        }
    }
}

/// An ORDER BY entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SortedItem {
    /// The expression to order by; an alias or position is a path or literal.
    pub expr: Expr,
    /// The direction (ASC or DESC).
    pub direction: OrderDirection,
    /// Null ordering (optional).
    pub nulls: Option<NullOrdering>,
}

/// A row count in LIMIT, OFFSET or FETCH.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum RowCount {
    /// A numeric literal.
    Literal(NumericLiteral),
    /// A parameter.
    Parameter(Parameter),
}

/// `FETCH FIRST|NEXT n [%] ROW|ROWS ONLY|WITH TIES`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchClause {
    /// The number of rows, or percentage.
    pub count: RowCount,
    /// Whether the count is a percentage.
    pub percent: bool,
    /// WITH TIES rather than ONLY.
    pub with_ties: bool,
}

/// Ordering and row limits applying to a whole query expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryOrder {
    /// ORDER BY items.
    pub order_by: Vec<SortedItem>,
    /// LIMIT clause.
    pub limit: Option<RowCount>,
    /// OFFSET clause.
    pub offset: Option<RowCount>,
    /// FETCH clause.
    pub fetch: Option<FetchClause>,
    /// Source span.
    pub span: Span,
}

/// `MATERIALIZED` hint on a CTE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Materialization {
    Materialized,
    NotMaterialized,
}

/// The traversal order of a SEARCH clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SearchOrder {
    BreadthFirst,
    DepthFirst,
}

/// An attribute the SEARCH clause orders by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchSpecification {
    /// The CTE attribute.
    pub attribute: Ident,
    /// The direction (ASC or DESC).
    pub direction: OrderDirection,
    /// Null ordering (optional).
    pub nulls: Option<NullOrdering>,
}

/// `SEARCH BREADTH|DEPTH FIRST BY ... SET column`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchClause {
    /// Traversal order.
    pub order: SearchOrder,
    /// Ordering attributes.
    pub specifications: Vec<SearchSpecification>,
    /// The generated sequence column.
    pub set_column: Ident,
    /// Source span.
    pub span: Span,
}

/// `CYCLE columns SET mark [TO value DEFAULT value] [USING path]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CycleClause {
    /// The monitored columns.
    pub columns: Vec<Ident>,
    /// The generated cycle mark column.
    pub mark_column: Ident,
    /// The mark value for cyclic rows.
    pub mark_value: Option<Literal>,
    /// The mark value for other rows.
    pub default_value: Option<Literal>,
    /// The generated path column.
    pub path_column: Option<Ident>,
    /// Source span.
    pub span: Span,
}

/// A common table expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cte {
    /// The CTE name.
    pub name: Ident,
    /// The declared attribute names.
    pub attributes: Vec<Ident>,
    /// The materialization hint.
    pub materialization: Option<Materialization>,
    /// The body.
    pub query: Box<QueryExpression>,
    /// The SEARCH clause.
    pub search: Option<SearchClause>,
    /// The CYCLE clause.
    pub cycle: Option<CycleClause>,
    /// Source span.
    pub span: Span,
}

/// `WITH cte, ...`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WithClause {
    /// The CTEs in declaration order.
    pub ctes: Vec<Cte>,
    /// Source span.
    pub span: Span,
}

/// Set operation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SetOperatorKind {
    Union,
    Intersect,
    Except,
}

/// A set operator, optionally with ALL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SetOperator {
    /// UNION, INTERSECT or EXCEPT.
    pub kind: SetOperatorKind,
    /// Whether ALL was specified.
    pub all: bool,
}

impl SetOperator {
    /// Returns the HQL representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match (self.kind, self.all) {
            (SetOperatorKind::Union, false) => "UNION",
            (SetOperatorKind::Union, true) => "UNION ALL",
            (SetOperatorKind::Intersect, false) => "INTERSECT",
            (SetOperatorKind::Intersect, true) => "INTERSECT ALL",
            (SetOperatorKind::Except, false) => "EXCEPT",
            (SetOperatorKind::Except, true) => "EXCEPT ALL",
        }
    }
}

/// The body of a query expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum QueryBody {
    /// A single query.
    Query(Box<Query>),
    /// A parenthesized query expression.
    Nested(Box<QueryExpression>),
    /// A set operation; chains are left-associative.
    SetOperation {
        /// Left operand.
        left: Box<QueryBody>,
        /// Operator.
        op: SetOperator,
        /// Right operand.
        right: Box<QueryBody>,
    },
}

/// A query expression: CTEs, a set-operation body and a trailing order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryExpression {
    /// The WITH clause.
    pub with: Option<WithClause>,
    /// The body.
    pub body: QueryBody,
    /// ORDER BY / LIMIT / OFFSET / FETCH for the whole body.
    pub order: Option<QueryOrder>,
    /// Source span.
    pub span: Span,
}

/// Which clause a query starts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum QueryForm {
    /// `SELECT ... [FROM ...]`
    Select,
    /// `FROM ... [SELECT ...]`
    From,
}

/// A single SELECT or FROM-first query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Query {
    /// Which clause the query starts with.
    pub form: QueryForm,
    /// The SELECT clause.
    pub select: Option<SelectClause>,
    /// The FROM clause.
    pub from: Option<FromClause>,
    /// The WHERE clause.
    pub where_clause: Option<Predicate>,
    /// GROUP BY expressions.
    pub group_by: Vec<Expr>,
    /// HAVING clause.
    pub having: Option<Predicate>,
    /// Source span.
    pub span: Span,
}

/// The SELECT clause.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectClause {
    /// Whether to select DISTINCT values.
    pub distinct: bool,
    /// The selections.
    pub selections: Vec<Selection>,
    /// Source span.
    pub span: Span,
}

/// One item of the SELECT clause.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Selection {
    /// The selected item.
    pub item: SelectItem,
    /// Alias.
    pub alias: Option<Ident>,
    /// Source span.
    pub span: Span,
}

/// The forms a selection can take.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SelectItem {
    /// An expression or predicate.
    Expression(Expr),
    /// `ENTRY(path)`
    MapEntry(Path),
    /// `OBJECT(alias)`
    Object(Ident),
    /// `NEW target(args...)`
    Instantiation(Instantiation),
}

/// What a dynamic instantiation builds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum InstantiationTarget {
    /// `NEW LIST(...)`
    List,
    /// `NEW MAP(...)`
    Map,
    /// `NEW com.acme.Dto(...)`
    Class(QualifiedName),
}

/// An argument of a dynamic instantiation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum InstantiationValue {
    /// An expression or predicate.
    Expression(Expr),
    /// A nested instantiation.
    Instantiation(Instantiation),
}

/// An argument of a dynamic instantiation, with optional alias.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstantiationArgument {
    /// The value.
    pub value: InstantiationValue,
    /// Alias.
    pub alias: Option<Ident>,
}

/// `NEW target(args...)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Instantiation {
    /// What is built.
    pub target: InstantiationTarget,
    /// The constructor arguments.
    pub arguments: Vec<InstantiationArgument>,
    /// Source span.
    pub span: Span,
}

/// The FROM clause.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FromClause {
    /// Comma-separated roots, each with its joins.
    pub roots: Vec<FromRoot>,
    /// Source span.
    pub span: Span,
}

/// The source of a from-clause root.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum FromSource {
    /// An entity name or CTE reference.
    Entity(QualifiedName),
    /// A subquery.
    Subquery {
        /// The query.
        query: Box<QueryExpression>,
        /// Whether LATERAL was specified.
        lateral: bool,
    },
}

/// A from-clause root with its joins.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FromRoot {
    /// The source.
    pub source: FromSource,
    /// Alias.
    pub alias: Option<Ident>,
    /// Joins in source order.
    pub joins: Vec<Join>,
    /// Source span.
    pub span: Span,
}

/// Qualified join type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum JoinType {
    /// INNER JOIN (default).
    #[default]
    Inner,
    /// LEFT [OUTER] JOIN.
    Left,
    /// RIGHT [OUTER] JOIN.
    Right,
    /// FULL [OUTER] JOIN.
    Full,
}

impl JoinType {
    /// Returns the HQL representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Inner => "INNER JOIN",
            Self::Left => "LEFT JOIN",
            Self::Right => "RIGHT JOIN",
            Self::Full => "FULL JOIN",
        }
    }
}

/// What a qualified join joins.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum JoinTarget {
    /// An association path, or an entity name.
    Path(Path),
    /// A subquery.
    Subquery {
        /// The query.
        query: Box<QueryExpression>,
        /// Whether LATERAL was specified.
        lateral: bool,
    },
}

/// Whether a join restriction was written with ON or WITH.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RestrictionKind {
    On,
    With,
}

/// `ON predicate` or `WITH predicate`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JoinRestriction {
    /// ON or WITH.
    pub kind: RestrictionKind,
    /// The predicate.
    pub predicate: Predicate,
}

/// A join.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Join {
    /// `[INNER|LEFT|RIGHT|FULL] [OUTER] JOIN [FETCH] target [alias] [ON|WITH ...]`
    Qualified {
        /// The join type.
        join_type: JoinType,
        /// Whether FETCH was specified.
        fetch: bool,
        /// The joined path or subquery.
        target: JoinTarget,
        /// Alias.
        alias: Option<Ident>,
        /// The restriction.
        restriction: Option<JoinRestriction>,
        /// Source span.
        span: Span,
    },
    /// `CROSS JOIN entity [alias]`
    Cross {
        /// The entity.
        entity: QualifiedName,
        /// Alias.
        alias: Option<Ident>,
        /// Source span.
        span: Span,
    },
    /// `, IN (path) alias`
    Collection {
        /// The collection path.
        path: Path,
        /// Alias.
        alias: Option<Ident>,
        /// Source span.
        span: Span,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_direction() {
        assert_eq!(OrderDirection::Asc.as_str(), "ASC");
        assert_eq!(OrderDirection::Desc.as_str(), "DESC");
        assert_eq!(OrderDirection::default(), OrderDirection::Asc);
    }

    #[test]
    fn test_join_type() {
        assert_eq!(JoinType::Inner.as_str(), "INNER JOIN");
        assert_eq!(JoinType::Left.as_str(), "LEFT JOIN");
    }

    #[test]
    fn test_set_operator() {
        let op = SetOperator {
            kind: SetOperatorKind::Union,
            all: true,
        };
        assert_eq!(op.as_str(), "UNION ALL");
    }
}
