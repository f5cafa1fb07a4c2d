//! Expression AST types.

use serde::Serialize;

use super::literal::Literal;
use super::predicate::Predicate;
use super::query::{QueryExpression, SortedItem};
use super::window::OverClause;
use crate::lexer::{Keyword, Span};

/// An identifier as written, with backticks removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ident {
    /// The identifier text.
    pub name: String,
    /// Whether the identifier was backtick-quoted.
    pub quoted: bool,
    /// Source span.
    pub span: Span,
}

impl Ident {
    /// Creates an unquoted identifier.
    #[must_use]
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            quoted: false,
            span,
        }
    }
}

/// A dotted name such as an entity name, a simple path or a cast type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QualifiedName {
    /// The dot-separated parts.
    pub parts: Vec<Ident>,
    /// Source span.
    pub span: Span,
}

impl QualifiedName {
    /// Returns the name with its parts joined by `.`.
    #[must_use]
    pub fn dotted(&self) -> String {
        self.parts
            .iter()
            .map(|part| part.name.as_str())
            .collect::<Vec<_>>()
            .join(".")
    }
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,

    // String
    Concat,
}

impl BinaryOp {
    /// Returns the HQL representation of the operator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Concat => "||",
        }
    }

    /// Returns the precedence of the operator (higher = binds tighter).
    #[must_use]
    pub const fn precedence(&self) -> u8 {
        match self {
            Self::Concat => 1,
            Self::Add | Self::Sub => 2,
            Self::Mul | Self::Div | Self::Mod => 3,
        }
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UnaryOp {
    /// `+`
    Plus,
    /// `-`
    Neg,
}

impl UnaryOp {
    /// Returns the HQL representation of the operator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Plus => "+",
            Self::Neg => "-",
        }
    }
}

/// A temporal unit used by duration arithmetic and `EXTRACT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DatetimeField {
    Year,
    Quarter,
    Month,
    Week,
    Day,
    Hour,
    Minute,
    Second,
    Nanosecond,
    Epoch,
}

impl DatetimeField {
    /// Converts a keyword to a datetime field.
    #[must_use]
    pub const fn from_keyword(keyword: Keyword) -> Option<Self> {
        match keyword {
            Keyword::Year => Some(Self::Year),
            Keyword::Quarter => Some(Self::Quarter),
            Keyword::Month => Some(Self::Month),
            Keyword::Week => Some(Self::Week),
            Keyword::Day => Some(Self::Day),
            Keyword::Hour => Some(Self::Hour),
            Keyword::Minute => Some(Self::Minute),
            Keyword::Second => Some(Self::Second),
            Keyword::Nanosecond => Some(Self::Nanosecond),
            Keyword::Epoch => Some(Self::Epoch),
            _ => None,
        }
    }
}

/// The `DAY OF WEEK` style calendar expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CalendarField {
    DayOfWeek,
    DayOfMonth,
    WeekOfYear,
}

/// The marker that introduced a parameter template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParameterMarker {
    /// `:#{...}`
    Colon,
    /// `?#{...}`
    Question,
}

/// How a parameter is referenced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ParameterKind {
    /// `:name`
    Named(String),
    /// `?1`, or `?` when no ordinal is given.
    Positional(Option<u32>),
    /// A SpEL template such as `:#{#entity.id}`.
    Template {
        /// The marker before the template.
        marker: ParameterMarker,
        /// The template body without `#{` and `}`.
        expression: String,
    },
}

/// `%` wildcards glued to a parameter in a LIKE pattern (`%:name%`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LikeWildcards {
    /// A `%` directly before the parameter.
    pub leading: bool,
    /// A `%` directly after the parameter.
    pub trailing: bool,
}

/// A query parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Parameter {
    /// The reference form.
    pub kind: ParameterKind,
    /// LIKE wildcards attached to the parameter.
    pub wildcards: LikeWildcards,
    /// Source span.
    pub span: Span,
}

/// A terminal collection continuation on a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CollectionPart {
    /// `.elements`
    Elements,
    /// `.indices`
    Indices,
}

/// One navigation step of a path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathElement {
    /// The attribute or alias name.
    pub name: Ident,
    /// An index access such as `[0]`.
    pub index: Option<Box<Expr>>,
}

/// A path rooted in `TREAT(path AS Type)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreatedPath {
    /// The path being downcast.
    pub path: Path,
    /// The asserted subtype.
    pub target: QualifiedName,
    /// Source span.
    pub span: Span,
}

/// A navigation path such as `e.address.city` or `treat(p as Dog).name`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Path {
    /// A `TREAT(...)` root the elements navigate from.
    pub treat: Option<Box<TreatedPath>>,
    /// Navigation steps in order. Empty only for a bare treated path.
    pub elements: Vec<PathElement>,
    /// A trailing `.elements` or `.indices`.
    pub continuation: Option<CollectionPart>,
    /// Source span.
    pub span: Span,
}

impl Path {
    /// Returns the path elements joined by `.`, ignoring indexes.
    #[must_use]
    pub fn dotted(&self) -> String {
        self.elements
            .iter()
            .map(|element| element.name.name.as_str())
            .collect::<Vec<_>>()
            .join(".")
    }
}

/// `TRIM` specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TrimSpecification {
    Leading,
    Trailing,
    Both,
}

/// The operand of `EVERY`/`ANY`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum QuantifiedArgument {
    /// `every(e.active = true)`
    Predicate(Box<Predicate>),
    /// `any(select ...)`
    Subquery(Box<QueryExpression>),
    /// `every elements(e.scores)`
    Elements(QualifiedName),
    /// `any indices(e.list)`
    Indices(QualifiedName),
}

/// The target type of a `CAST`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CastTarget {
    /// The type name.
    pub name: QualifiedName,
    /// Length or precision.
    pub precision: Option<u32>,
    /// Scale.
    pub scale: Option<u32>,
}

/// A generic function call, possibly an aggregate or window function.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenericFunction {
    /// The function name.
    pub name: Ident,
    /// Whether DISTINCT was specified.
    pub distinct: bool,
    /// Whether the argument list was `*`.
    pub star: bool,
    /// The arguments.
    pub args: Vec<Expr>,
    /// Attribute navigation after the call, as in `key(m).name`.
    pub continuation: Vec<Ident>,
    /// `FILTER (WHERE ...)`.
    pub filter: Option<Predicate>,
    /// `WITHIN GROUP (ORDER BY ...)`.
    pub within_group: Vec<SortedItem>,
    /// `OVER (...)`.
    pub over: Option<OverClause>,
    /// Source span.
    pub span: Span,
}

/// A function call expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Function {
    /// `name(args...)` with optional aggregate and window clauses.
    Generic(GenericFunction),
    /// `name(select ...)`.
    WithSubquery {
        /// The function name.
        name: Ident,
        /// The subquery argument.
        query: QueryExpression,
        /// Source span.
        span: Span,
    },
    /// `CAST(expr AS type)`.
    Cast {
        /// The operand.
        expr: Expr,
        /// The target type.
        target: CastTarget,
        /// Source span.
        span: Span,
    },
    /// `EXTRACT(field FROM expr)`.
    Extract {
        /// The extracted field, usually a datetime field name.
        field: Expr,
        /// The operand.
        source: Expr,
        /// Source span.
        span: Span,
    },
    /// `TRIM([LEADING|TRAILING|BOTH] ['c'] [FROM] expr)`.
    Trim {
        /// Which end to trim.
        specification: Option<TrimSpecification>,
        /// The character to trim.
        character: Option<String>,
        /// The operand.
        source: Expr,
        /// Source span.
        span: Span,
    },
    /// `EVERY(...)` or `ALL(...)`.
    Every {
        /// The operand.
        argument: QuantifiedArgument,
        /// Source span.
        span: Span,
    },
    /// `ANY(...)` or `SOME(...)`.
    Any {
        /// The operand.
        argument: QuantifiedArgument,
        /// Source span.
        span: Span,
    },
}

impl Function {
    /// Returns the source span of the call.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::Generic(function) => function.span,
            Self::WithSubquery { span, .. }
            | Self::Cast { span, .. }
            | Self::Extract { span, .. }
            | Self::Trim { span, .. }
            | Self::Every { span, .. }
            | Self::Any { span, .. } => *span,
        }
    }
}

/// A CASE expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum CaseExpression {
    /// `CASE operand WHEN value THEN result ... END`
    Simple {
        /// The operand compared against each WHEN value.
        operand: Expr,
        /// WHEN value THEN result pairs.
        when_clauses: Vec<(Expr, Expr)>,
        /// ELSE result.
        else_result: Option<Expr>,
        /// Source span.
        span: Span,
    },
    /// `CASE WHEN predicate THEN result ... END`
    Searched {
        /// WHEN predicate THEN result pairs.
        when_clauses: Vec<(Predicate, Expr)>,
        /// ELSE result.
        else_result: Option<Expr>,
        /// Source span.
        span: Span,
    },
}

/// An HQL expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Expr {
    /// A literal value.
    Literal {
        /// The value.
        value: Literal,
        /// Source span.
        span: Span,
    },

    /// A query parameter.
    Parameter(Parameter),

    /// A navigation path.
    Path(Path),

    /// A function call.
    Function(Box<Function>),

    /// A CASE expression.
    Case(Box<CaseExpression>),

    /// A parenthesized list `(a, b)`.
    Tuple {
        /// The members.
        items: Vec<Expr>,
        /// Source span.
        span: Span,
    },

    /// A parenthesized expression.
    Grouped {
        /// The inner expression.
        expr: Box<Expr>,
        /// Source span.
        span: Span,
    },

    /// A signed expression.
    Unary {
        /// Operator.
        op: UnaryOp,
        /// Operand.
        operand: Box<Expr>,
        /// Source span.
        span: Span,
    },

    /// A binary arithmetic or concatenation expression.
    Binary {
        /// Left operand.
        left: Box<Expr>,
        /// Operator.
        op: BinaryOp,
        /// Right operand.
        right: Box<Expr>,
        /// Source span.
        span: Span,
    },

    /// `expr field`: a number of temporal units as a duration.
    ToDuration {
        /// The magnitude.
        expr: Box<Expr>,
        /// The unit.
        unit: DatetimeField,
        /// Source span.
        span: Span,
    },

    /// `expr BY field`: a duration expressed in temporal units.
    FromDuration {
        /// The duration.
        expr: Box<Expr>,
        /// The unit.
        unit: DatetimeField,
        /// Source span.
        span: Span,
    },

    /// `DAY OF WEEK`, `DAY OF MONTH` or `WEEK OF YEAR`.
    Calendar {
        /// Which field.
        field: CalendarField,
        /// Source span.
        span: Span,
    },

    /// A parenthesized subquery.
    Subquery {
        /// The query.
        query: Box<QueryExpression>,
        /// Source span.
        span: Span,
    },

    /// A predicate used in an expression-or-predicate position.
    Predicate(Box<Predicate>),
}

impl Expr {
    /// Returns the source span of the expression.
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::Literal { span, .. }
            | Self::Tuple { span, .. }
            | Self::Grouped { span, .. }
            | Self::Unary { span, .. }
            | Self::Binary { span, .. }
            | Self::ToDuration { span, .. }
            | Self::FromDuration { span, .. }
            | Self::Calendar { span, .. }
            | Self::Subquery { span, .. } => *span,
            Self::Parameter(parameter) => parameter.span,
            Self::Path(path) => path.span,
            Self::Function(function) => function.span(),
            Self::Case(case) => match case.as_ref() {
                CaseExpression::Simple { span, .. } | CaseExpression::Searched { span, .. } => {
                    *span
                }
            },
            Self::Predicate(predicate) => predicate.span(),
        }
    }

    /// Returns the path if this expression is a plain path.
    #[must_use]
    pub const fn as_path(&self) -> Option<&Path> {
        match self {
            Self::Path(path) => Some(path),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_op_as_str() {
        assert_eq!(BinaryOp::Add.as_str(), "+");
        assert_eq!(BinaryOp::Concat.as_str(), "||");
    }

    #[test]
    fn test_precedence_ordering() {
        assert!(BinaryOp::Mul.precedence() > BinaryOp::Add.precedence());
        assert!(BinaryOp::Add.precedence() > BinaryOp::Concat.precedence());
    }

    #[test]
    fn test_datetime_field_from_keyword() {
        assert_eq!(
            DatetimeField::from_keyword(Keyword::Day),
            Some(DatetimeField::Day)
        );
        assert_eq!(DatetimeField::from_keyword(Keyword::Date), None);
    }

    #[test]
    fn test_qualified_name_dotted() {
        let name = QualifiedName {
            parts: vec![
                Ident::new("com", Span::new(0, 3)),
                Ident::new("acme", Span::new(4, 8)),
                Ident::new("Order", Span::new(9, 14)),
            ],
            span: Span::new(0, 14),
        };
        assert_eq!(name.dotted(), "com.acme.Order");
    }
}
