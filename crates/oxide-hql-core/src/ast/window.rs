//! Window clause AST types.

use serde::Serialize;

use super::expression::Expr;
use super::query::SortedItem;
use crate::lexer::Span;

/// The unit a window frame is measured in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FrameUnit {
    Rows,
    Range,
    Groups,
}

impl FrameUnit {
    /// Returns the HQL representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Rows => "ROWS",
            Self::Range => "RANGE",
            Self::Groups => "GROUPS",
        }
    }
}

/// One end of a window frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum FrameBound {
    /// `UNBOUNDED PRECEDING`
    UnboundedPreceding,
    /// `expr PRECEDING`
    Preceding(Box<Expr>),
    /// `CURRENT ROW`
    CurrentRow,
    /// `expr FOLLOWING`
    Following(Box<Expr>),
    /// `UNBOUNDED FOLLOWING`
    UnboundedFollowing,
}

/// `EXCLUDE ...` in a window frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FrameExclusion {
    /// `EXCLUDE CURRENT ROW`
    CurrentRow,
    /// `EXCLUDE GROUP`
    Group,
    /// `EXCLUDE TIES`
    Ties,
    /// `EXCLUDE NO OTHERS`
    NoOthers,
}

/// The frame of a window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameClause {
    /// ROWS, RANGE or GROUPS.
    pub unit: FrameUnit,
    /// The frame start.
    pub start: FrameBound,
    /// The frame end, when written as `BETWEEN start AND end`.
    pub end: Option<FrameBound>,
    /// The exclusion option.
    pub exclusion: Option<FrameExclusion>,
    /// Source span.
    pub span: Span,
}

/// `OVER (PARTITION BY ... ORDER BY ... frame)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverClause {
    /// PARTITION BY expressions.
    pub partition_by: Vec<Expr>,
    /// ORDER BY items.
    pub order_by: Vec<SortedItem>,
    /// The frame.
    pub frame: Option<FrameClause>,
    /// Source span.
    pub span: Span,
}
