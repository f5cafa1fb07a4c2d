//! Token types for the HQL lexer.
//!
//! HQL keywords are soft: the lexer never produces a dedicated keyword
//! token. A bare word is emitted as [`TokenKind::Word`] together with the
//! [`Keyword`] it *could* be, and the grammar decides in context whether the
//! word acts as that keyword or as a plain identifier.

use core::fmt;

use serde::Serialize;

use super::Span;

/// Words that some grammar rule treats as a keyword.
///
/// None of these are reserved: every one of them is also a legal
/// identifier wherever the grammar does not expect the keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Keyword {
    // Statements and clauses
    Select,
    From,
    Where,
    Group,
    Order,
    By,
    Having,
    Limit,
    Offset,
    Fetch,
    First,
    Next,
    Only,
    Ties,
    Distinct,
    All,
    Update,
    Versioned,
    Set,
    Delete,
    Insert,
    Into,
    Values,
    New,
    List,
    Map,
    Entry,
    Object,
    As,

    // Set operations
    Union,
    Intersect,
    Except,

    // CTEs
    With,
    Materialized,
    Search,
    Breadth,
    Depth,
    Cycle,
    To,
    Default,
    Using,

    // Joins
    Join,
    Inner,
    Left,
    Right,
    Full,
    Outer,
    Cross,
    On,
    Lateral,

    // Predicates
    And,
    Or,
    Not,
    In,
    Between,
    Like,
    Ilike,
    Escape,
    Is,
    Null,
    Empty,
    Member,
    Of,
    Exists,
    Elements,
    Indices,
    True,
    False,

    // Ordering
    Asc,
    Desc,
    Nulls,
    Last,

    // Expressions and functions
    Case,
    When,
    Then,
    Else,
    End,
    Cast,
    Extract,
    Trim,
    Leading,
    Trailing,
    Both,
    Every,
    Any,
    Some,
    Treat,
    Filter,
    Within,

    // Windows
    Over,
    Partition,
    Rows,
    Range,
    Groups,
    Unbounded,
    Preceding,
    Following,
    Current,
    Row,
    Exclude,
    No,
    Others,

    // Date/time literals and fields
    CurrentDate,
    CurrentTime,
    CurrentTimestamp,
    Local,
    LocalDate,
    LocalTime,
    LocalDatetime,
    OffsetDatetime,
    Instant,
    Date,
    Time,
    Datetime,
    Timestamp,
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

impl Keyword {
    /// Attempts to parse a keyword from a string (case-insensitive).
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "SELECT" => Some(Self::Select),
            "FROM" => Some(Self::From),
            "WHERE" => Some(Self::Where),
            "GROUP" => Some(Self::Group),
            "ORDER" => Some(Self::Order),
            "BY" => Some(Self::By),
            "HAVING" => Some(Self::Having),
            "LIMIT" => Some(Self::Limit),
            "OFFSET" => Some(Self::Offset),
            "FETCH" => Some(Self::Fetch),
            "FIRST" => Some(Self::First),
            "NEXT" => Some(Self::Next),
            "ONLY" => Some(Self::Only),
            "TIES" => Some(Self::Ties),
            "DISTINCT" => Some(Self::Distinct),
            "ALL" => Some(Self::All),
            "UPDATE" => Some(Self::Update),
            "VERSIONED" => Some(Self::Versioned),
            "SET" => Some(Self::Set),
            "DELETE" => Some(Self::Delete),
            "INSERT" => Some(Self::Insert),
            "INTO" => Some(Self::Into),
            "VALUES" => Some(Self::Values),
            "NEW" => Some(Self::New),
            "LIST" => Some(Self::List),
            "MAP" => Some(Self::Map),
            "ENTRY" => Some(Self::Entry),
            "OBJECT" => Some(Self::Object),
            "AS" => Some(Self::As),
            "UNION" => Some(Self::Union),
            "INTERSECT" => Some(Self::Intersect),
            "EXCEPT" => Some(Self::Except),
            "WITH" => Some(Self::With),
            "MATERIALIZED" => Some(Self::Materialized),
            "SEARCH" => Some(Self::Search),
            "BREADTH" => Some(Self::Breadth),
            "DEPTH" => Some(Self::Depth),
            "CYCLE" => Some(Self::Cycle),
            "TO" => Some(Self::To),
            "DEFAULT" => Some(Self::Default),
            "USING" => Some(Self::Using),
            "JOIN" => Some(Self::Join),
            "INNER" => Some(Self::Inner),
            "LEFT" => Some(Self::Left),
            "RIGHT" => Some(Self::Right),
            "FULL" => Some(Self::Full),
            "OUTER" => Some(Self::Outer),
            "CROSS" => Some(Self::Cross),
            "ON" => Some(Self::On),
            "LATERAL" => Some(Self::Lateral),
            "AND" => Some(Self::And),
            "OR" => Some(Self::Or),
            "NOT" => Some(Self::Not),
            "IN" => Some(Self::In),
            "BETWEEN" => Some(Self::Between),
            "LIKE" => Some(Self::Like),
            "ILIKE" => Some(Self::Ilike),
            "ESCAPE" => Some(Self::Escape),
            "IS" => Some(Self::Is),
            "NULL" => Some(Self::Null),
            "EMPTY" => Some(Self::Empty),
            "MEMBER" => Some(Self::Member),
            "OF" => Some(Self::Of),
            "EXISTS" => Some(Self::Exists),
            "ELEMENTS" => Some(Self::Elements),
            "INDICES" => Some(Self::Indices),
            "TRUE" => Some(Self::True),
            "FALSE" => Some(Self::False),
            "ASC" | "ASCENDING" => Some(Self::Asc),
            "DESC" | "DESCENDING" => Some(Self::Desc),
            "NULLS" => Some(Self::Nulls),
            "LAST" => Some(Self::Last),
            "CASE" => Some(Self::Case),
            "WHEN" => Some(Self::When),
            "THEN" => Some(Self::Then),
            "ELSE" => Some(Self::Else),
            "END" => Some(Self::End),
            "CAST" => Some(Self::Cast),
            "EXTRACT" => Some(Self::Extract),
            "TRIM" => Some(Self::Trim),
            "LEADING" => Some(Self::Leading),
            "TRAILING" => Some(Self::Trailing),
            "BOTH" => Some(Self::Both),
            "EVERY" => Some(Self::Every),
            "ANY" => Some(Self::Any),
            "SOME" => Some(Self::Some),
            "TREAT" => Some(Self::Treat),
            "FILTER" => Some(Self::Filter),
            "WITHIN" => Some(Self::Within),
            "OVER" => Some(Self::Over),
            "PARTITION" => Some(Self::Partition),
            "ROWS" => Some(Self::Rows),
            "RANGE" => Some(Self::Range),
            "GROUPS" => Some(Self::Groups),
            "UNBOUNDED" => Some(Self::Unbounded),
            "PRECEDING" => Some(Self::Preceding),
            "FOLLOWING" => Some(Self::Following),
            "CURRENT" => Some(Self::Current),
            "ROW" => Some(Self::Row),
            "EXCLUDE" => Some(Self::Exclude),
            "NO" => Some(Self::No),
            "OTHERS" => Some(Self::Others),
            "CURRENT_DATE" => Some(Self::CurrentDate),
            "CURRENT_TIME" => Some(Self::CurrentTime),
            "CURRENT_TIMESTAMP" => Some(Self::CurrentTimestamp),
            "LOCAL" => Some(Self::Local),
            "LOCAL_DATE" => Some(Self::LocalDate),
            "LOCAL_TIME" => Some(Self::LocalTime),
            "LOCAL_DATETIME" => Some(Self::LocalDatetime),
            "OFFSET_DATETIME" => Some(Self::OffsetDatetime),
            "INSTANT" => Some(Self::Instant),
            "DATE" => Some(Self::Date),
            "TIME" => Some(Self::Time),
            "DATETIME" => Some(Self::Datetime),
            "TIMESTAMP" => Some(Self::Timestamp),
            "YEAR" => Some(Self::Year),
            "QUARTER" => Some(Self::Quarter),
            "MONTH" => Some(Self::Month),
            "WEEK" => Some(Self::Week),
            "DAY" => Some(Self::Day),
            "HOUR" => Some(Self::Hour),
            "MINUTE" => Some(Self::Minute),
            "SECOND" => Some(Self::Second),
            "NANOSECOND" => Some(Self::Nanosecond),
            "EPOCH" => Some(Self::Epoch),
            _ => None,
        }
    }

    /// Returns the keyword as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Select => "SELECT",
            Self::From => "FROM",
            Self::Where => "WHERE",
            Self::Group => "GROUP",
            Self::Order => "ORDER",
            Self::By => "BY",
            Self::Having => "HAVING",
            Self::Limit => "LIMIT",
            Self::Offset => "OFFSET",
            Self::Fetch => "FETCH",
            Self::First => "FIRST",
            Self::Next => "NEXT",
            Self::Only => "ONLY",
            Self::Ties => "TIES",
            Self::Distinct => "DISTINCT",
            Self::All => "ALL",
            Self::Update => "UPDATE",
            Self::Versioned => "VERSIONED",
            Self::Set => "SET",
            Self::Delete => "DELETE",
            Self::Insert => "INSERT",
            Self::Into => "INTO",
            Self::Values => "VALUES",
            Self::New => "NEW",
            Self::List => "LIST",
            Self::Map => "MAP",
            Self::Entry => "ENTRY",
            Self::Object => "OBJECT",
            Self::As => "AS",
            Self::Union => "UNION",
            Self::Intersect => "INTERSECT",
            Self::Except => "EXCEPT",
            Self::With => "WITH",
            Self::Materialized => "MATERIALIZED",
            Self::Search => "SEARCH",
            Self::Breadth => "BREADTH",
            Self::Depth => "DEPTH",
            Self::Cycle => "CYCLE",
            Self::To => "TO",
            Self::Default => "DEFAULT",
            Self::Using => "USING",
            Self::Join => "JOIN",
            Self::Inner => "INNER",
            Self::Left => "LEFT",
            Self::Right => "RIGHT",
            Self::Full => "FULL",
            Self::Outer => "OUTER",
            Self::Cross => "CROSS",
            Self::On => "ON",
            Self::Lateral => "LATERAL",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Not => "NOT",
            Self::In => "IN",
            Self::Between => "BETWEEN",
            Self::Like => "LIKE",
            Self::Ilike => "ILIKE",
            Self::Escape => "ESCAPE",
            Self::Is => "IS",
            Self::Null => "NULL",
            Self::Empty => "EMPTY",
            Self::Member => "MEMBER",
            Self::Of => "OF",
            Self::Exists => "EXISTS",
            Self::Elements => "ELEMENTS",
            Self::Indices => "INDICES",
            Self::True => "TRUE",
            Self::False => "FALSE",
            Self::Asc => "ASC",
            Self::Desc => "DESC",
            Self::Nulls => "NULLS",
            Self::Last => "LAST",
            Self::Case => "CASE",
            Self::When => "WHEN",
            Self::Then => "THEN",
            Self::Else => "ELSE",
            Self::End => "END",
            Self::Cast => "CAST",
            Self::Extract => "EXTRACT",
            Self::Trim => "TRIM",
            Self::Leading => "LEADING",
            Self::Trailing => "TRAILING",
            Self::Both => "BOTH",
            Self::Every => "EVERY",
            Self::Any => "ANY",
            Self::Some => "SOME",
            Self::Treat => "TREAT",
            Self::Filter => "FILTER",
            Self::Within => "WITHIN",
            Self::Over => "OVER",
            Self::Partition => "PARTITION",
            Self::Rows => "ROWS",
            Self::Range => "RANGE",
            Self::Groups => "GROUPS",
            Self::Unbounded => "UNBOUNDED",
            Self::Preceding => "PRECEDING",
            Self::Following => "FOLLOWING",
            Self::Current => "CURRENT",
            Self::Row => "ROW",
            Self::Exclude => "EXCLUDE",
            Self::No => "NO",
            Self::Others => "OTHERS",
            Self::CurrentDate => "CURRENT_DATE",
            Self::CurrentTime => "CURRENT_TIME",
            Self::CurrentTimestamp => "CURRENT_TIMESTAMP",
            Self::Local => "LOCAL",
            Self::LocalDate => "LOCAL_DATE",
            Self::LocalTime => "LOCAL_TIME",
            Self::LocalDatetime => "LOCAL_DATETIME",
            Self::OffsetDatetime => "OFFSET_DATETIME",
            Self::Instant => "INSTANT",
            Self::Date => "DATE",
            Self::Time => "TIME",
            Self::Datetime => "DATETIME",
            Self::Timestamp => "TIMESTAMP",
            Self::Year => "YEAR",
            Self::Quarter => "QUARTER",
            Self::Month => "MONTH",
            Self::Week => "WEEK",
            Self::Day => "DAY",
            Self::Hour => "HOUR",
            Self::Minute => "MINUTE",
            Self::Second => "SECOND",
            Self::Nanosecond => "NANOSECOND",
            Self::Epoch => "EPOCH",
        }
    }

    /// Returns true for the temporal units usable in `EXTRACT` and duration
    /// conversions.
    #[must_use]
    pub const fn is_datetime_field(&self) -> bool {
        matches!(
            self,
            Self::Year
                | Self::Quarter
                | Self::Month
                | Self::Week
                | Self::Day
                | Self::Hour
                | Self::Minute
                | Self::Second
                | Self::Nanosecond
                | Self::Epoch
        )
    }
}

/// The flavour of a numeric literal, taken from its suffix or prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NumberKind {
    /// `42`
    Integer,
    /// `42L`
    Long,
    /// `42BI`
    BigInteger,
    /// `4.2F`
    Float,
    /// `4.2`, `4.2D`, `4e2`
    Double,
    /// `4.2BD`
    BigDecimal,
    /// `0x2A`
    Hex,
}

/// The kind of token.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TokenKind {
    // Literals
    /// Numeric literal, kept as written so no precision is lost.
    Number {
        /// The literal text, including any suffix.
        lexeme: String,
        /// The literal flavour.
        kind: NumberKind,
    },
    /// String literal (e.g., 'hello' or "hello"), with quotes unescaped.
    String(String),
    /// Binary literal (e.g., X'CAFE')
    Binary(Vec<u8>),

    // Identifiers
    /// A bare word: an identifier that may also be a keyword candidate.
    Word {
        /// The word as written.
        text: String,
        /// The keyword this word spells, if any.
        keyword: Option<Keyword>,
    },
    /// Backtick-quoted identifier; never a keyword.
    QuotedIdentifier(String),
    /// Spring expression template `#{...}`, without the delimiters.
    Spel(String),

    // Operators
    /// +
    Plus,
    /// -
    Minus,
    /// *
    Star,
    /// /
    Slash,
    /// %
    Percent,
    /// ||
    Concat,
    /// =
    Eq,
    /// <>, != or ^=
    NotEq,
    /// <
    Lt,
    /// <=
    LtEq,
    /// >
    Gt,
    /// >=
    GtEq,

    // Delimiters
    /// (
    LeftParen,
    /// )
    RightParen,
    /// [
    LeftBracket,
    /// ]
    RightBracket,
    /// {
    LeftBrace,
    /// }
    RightBrace,
    /// ,
    Comma,
    /// .
    Dot,
    /// ;
    Semicolon,

    // Parameter markers
    /// :
    Colon,
    /// ?
    Question,

    // Special
    /// End of input
    Eof,
    /// Invalid/unknown token
    Error(String),
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number { lexeme, .. } => write!(f, "number {lexeme}"),
            Self::String(s) => write!(f, "string '{s}'"),
            Self::Binary(_) => f.write_str("binary literal"),
            Self::Word { text, .. } => write!(f, "'{text}'"),
            Self::QuotedIdentifier(name) => write!(f, "`{name}`"),
            Self::Spel(expr) => write!(f, "#{{{expr}}}"),
            Self::Plus => f.write_str("'+'"),
            Self::Minus => f.write_str("'-'"),
            Self::Star => f.write_str("'*'"),
            Self::Slash => f.write_str("'/'"),
            Self::Percent => f.write_str("'%'"),
            Self::Concat => f.write_str("'||'"),
            Self::Eq => f.write_str("'='"),
            Self::NotEq => f.write_str("'<>'"),
            Self::Lt => f.write_str("'<'"),
            Self::LtEq => f.write_str("'<='"),
            Self::Gt => f.write_str("'>'"),
            Self::GtEq => f.write_str("'>='"),
            Self::LeftParen => f.write_str("'('"),
            Self::RightParen => f.write_str("')'"),
            Self::LeftBracket => f.write_str("'['"),
            Self::RightBracket => f.write_str("']'"),
            Self::LeftBrace => f.write_str("'{'"),
            Self::RightBrace => f.write_str("'}'"),
            Self::Comma => f.write_str("','"),
            Self::Dot => f.write_str("'.'"),
            Self::Semicolon => f.write_str("';'"),
            Self::Colon => f.write_str("':'"),
            Self::Question => f.write_str("'?'"),
            Self::Eof => f.write_str("end of input"),
            Self::Error(message) => f.write_str(message),
        }
    }
}

/// A token with its span in the source code.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    /// The kind of token.
    pub kind: TokenKind,
    /// The location in the source code.
    pub span: Span,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Creates a bare word token, classifying it as a keyword candidate.
    #[must_use]
    pub fn word(text: impl Into<String>, span: Span) -> Self {
        let text = text.into();
        let keyword = Keyword::from_str(&text);
        Self::new(TokenKind::Word { text, keyword }, span)
    }

    /// Returns true if this is an EOF token.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }

    /// Returns the keyword this token could act as.
    #[must_use]
    pub const fn keyword(&self) -> Option<Keyword> {
        match &self.kind {
            TokenKind::Word { keyword, .. } => *keyword,
            _ => None,
        }
    }

    /// Returns true if this token is a word spelling `keyword`.
    #[must_use]
    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        self.keyword() == Some(keyword)
    }

    /// Returns the identifier text if the token can serve as an identifier.
    #[must_use]
    pub fn identifier(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::Word { text, .. } | TokenKind::QuotedIdentifier(text) => Some(text),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_from_str() {
        assert_eq!(Keyword::from_str("SELECT"), Some(Keyword::Select));
        assert_eq!(Keyword::from_str("select"), Some(Keyword::Select));
        assert_eq!(Keyword::from_str("SeLeCt"), Some(Keyword::Select));
        assert_eq!(Keyword::from_str("descending"), Some(Keyword::Desc));
        assert_eq!(Keyword::from_str("not_a_keyword"), None);
    }

    #[test]
    fn test_keyword_as_str() {
        assert_eq!(Keyword::Select.as_str(), "SELECT");
        assert_eq!(Keyword::CurrentDate.as_str(), "CURRENT_DATE");
        assert_eq!(Keyword::Ilike.as_str(), "ILIKE");
    }

    #[test]
    fn test_datetime_fields() {
        assert!(Keyword::Day.is_datetime_field());
        assert!(Keyword::Epoch.is_datetime_field());
        assert!(!Keyword::Date.is_datetime_field());
    }

    #[test]
    fn test_word_is_keyword_candidate() {
        let order = Token::word("order", Span::new(0, 5));
        assert!(order.is_keyword(Keyword::Order));
        assert_eq!(order.identifier(), Some("order"));

        let name = Token::word("lastName", Span::new(0, 8));
        assert_eq!(name.keyword(), None);
    }

    #[test]
    fn test_quoted_identifier_is_never_keyword() {
        let token = Token::new(
            TokenKind::QuotedIdentifier(String::from("select")),
            Span::new(0, 8),
        );
        assert_eq!(token.keyword(), None);
        assert_eq!(token.identifier(), Some("select"));
    }

    #[test]
    fn test_token_is_eof() {
        let eof = Token::new(TokenKind::Eof, Span::new(0, 0));
        assert!(eof.is_eof());
        assert!(!Token::word("select", Span::new(0, 6)).is_eof());
    }
}
