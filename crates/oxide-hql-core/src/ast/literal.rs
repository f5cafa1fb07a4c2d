//! Literal AST types.

use serde::Serialize;

use crate::lexer::NumberKind;

/// A literal value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Literal {
    /// NULL literal.
    Null,
    /// Boolean literal.
    Boolean(bool),
    /// String literal, unescaped.
    String(String),
    /// Numeric literal.
    Numeric(NumericLiteral),
    /// Binary literal (`X'CAFE'`).
    Binary(Vec<u8>),
    /// Date/time literal.
    DateTime(DateTimeLiteral),
}

/// A numeric literal, kept as written so no precision is lost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NumericLiteral {
    /// The literal text without sign, including any suffix.
    pub text: String,
    /// The literal flavour.
    pub kind: NumberKind,
    /// Whether a leading `-` was applied.
    pub negative: bool,
}

impl NumericLiteral {
    /// Returns the value of an integral literal, if it fits in `i64`.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        let magnitude = match self.kind {
            NumberKind::Integer => self.text.parse::<i64>().ok()?,
            NumberKind::Long => self
                .text
                .trim_end_matches(['l', 'L'])
                .parse::<i64>()
                .ok()?,
            NumberKind::Hex => {
                let digits = self.text.trim_start_matches("0x").trim_start_matches("0X");
                i64::from_str_radix(digits.trim_end_matches(['l', 'L']), 16).ok()?
            }
            _ => return None,
        };
        Some(if self.negative { -magnitude } else { magnitude })
    }
}

/// The temporal type a date/time literal denotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TemporalUnit {
    /// A calendar date.
    Date,
    /// A time of day.
    Time,
    /// A date with a time of day (`DATETIME`, `TIMESTAMP`).
    DateTime,
}

/// A date/time literal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum DateTimeLiteral {
    /// `CURRENT_DATE`, `CURRENT TIME`, `CURRENT_TIMESTAMP`, ...
    Current(TemporalUnit),
    /// `LOCAL DATE`, `LOCAL_DATETIME`, ...
    Local(TemporalUnit),
    /// `OFFSET DATETIME` or `OFFSET_DATETIME`.
    OffsetDateTime,
    /// `INSTANT`.
    Instant,
    /// A typed string such as `DATE '2024-01-31'`.
    Typed {
        /// The type named before the string.
        unit: TemporalUnit,
        /// The string contents.
        value: String,
    },
    /// A JDBC escape such as `{d '2024-01-31'}`.
    JdbcEscape {
        /// `d`, `t` or `ts`.
        unit: TemporalUnit,
        /// The string contents.
        value: String,
    },
}
