//! Abstract Syntax Tree (AST) types for HQL statements.

mod expression;
mod literal;
mod predicate;
mod query;
mod statement;
mod window;

pub use expression::{
    BinaryOp, CalendarField, CaseExpression, CastTarget, CollectionPart, DatetimeField, Expr,
    Function, GenericFunction, Ident, LikeWildcards, Parameter, ParameterKind, ParameterMarker,
    Path, PathElement, QualifiedName, QuantifiedArgument, TreatedPath, TrimSpecification, UnaryOp,
};
pub use literal::{DateTimeLiteral, Literal, NumericLiteral, TemporalUnit};
pub use predicate::{ComparisonOp, ExistsTarget, InList, Predicate};
pub use query::{
    Cte, CycleClause, FetchClause, FromClause, FromRoot, FromSource, Instantiation,
    InstantiationArgument, InstantiationTarget, InstantiationValue, Join, JoinRestriction,
    JoinTarget, JoinType, Materialization, NullOrdering, OrderDirection, Query, QueryBody,
    QueryExpression, QueryForm, QueryOrder, RestrictionKind, RowCount, SearchClause, SearchOrder,
    SearchSpecification, SelectClause, SelectItem, Selection, SetOperator, SetOperatorKind,
    SortedItem, WithClause,
};
pub use statement::{
    Assignment, DeleteStatement, InsertSource, InsertStatement, SelectStatement, Statement,
    TargetEntity, UpdateStatement,
};
pub use window::{FrameBound, FrameClause, FrameExclusion, FrameUnit, OverClause};
