//! Intermediate parse tree produced by the grammar engine.
//!
//! Every node is labelled with the grammar rule alternative that produced
//! it and owns its children in source order: nested rule nodes and the
//! tokens consumed directly by the rule. Identifiers are always wrapped in
//! [`NodeKind::Identifier`] nodes, so a bare word token among a node's
//! children is always a keyword of that rule.

mod builder;

use core::fmt;

use serde::Serialize;

pub use builder::{Checkpoint, Snapshot, TreeBuilder};

use crate::lexer::{Keyword, Span, Token, TokenKind};

/// The rule alternative a parse-tree node was produced by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NodeKind {
    // Statements
    SelectStatement,
    UpdateStatement,
    DeleteStatement,
    InsertStatement,

    // Query structure
    QueryExpression,
    WithClause,
    Cte,
    CteAttributes,
    SearchClause,
    SearchSpecification,
    CycleClause,
    ParenthesizedQuery,
    SelectQuery,
    FromQuery,
    SetOperator,
    QueryOrder,
    Subquery,

    // Selection
    SelectClause,
    SelectionList,
    Selection,
    Alias,
    Instantiation,
    InstantiationTarget,
    InstantiationArgument,
    MapEntrySelection,
    ObjectSelection,

    // From clause
    FromClause,
    EntityWithJoins,
    EntityRoot,
    SubqueryRoot,
    Join,
    JoinPath,
    JoinSubquery,
    JoinRestriction,
    CrossJoin,
    CollectionJoin,
    EntityName,

    // Clauses
    WhereClause,
    GroupByClause,
    HavingClause,
    OrderByClause,
    SortedItem,
    LimitClause,
    OffsetClause,
    FetchClause,

    // Data manipulation
    TargetEntity,
    SetClause,
    Assignment,
    TargetFields,
    ValuesList,
    Values,

    // Names
    Identifier,
    SimplePath,

    // Expressions
    Literal,
    SignedNumericLiteral,
    Parameter,
    Path,
    IndexAccess,
    TreatedPath,
    PathContinuation,
    GroupedExpression,
    TupleExpression,
    SubqueryExpression,
    SignedExpression,
    AdditionExpression,
    MultiplicationExpression,
    ConcatenationExpression,
    ToDurationExpression,
    FromDurationExpression,
    DayOfWeekExpression,
    DayOfMonthExpression,
    WeekOfYearExpression,
    SimpleCaseExpression,
    SearchedCaseExpression,
    CaseWhenExpressionClause,
    CaseWhenPredicateClause,

    // Functions
    GenericFunction,
    FunctionArguments,
    FunctionWithSubquery,
    FilterClause,
    WithinGroup,
    OverClause,
    PartitionClause,
    FrameClause,
    UnboundedPreceding,
    ExpressionPreceding,
    CurrentRow,
    ExpressionFollowing,
    UnboundedFollowing,
    FrameExclusion,
    CastFunction,
    CastTarget,
    ExtractFunction,
    TrimFunction,
    EveryFunction,
    AnyFunction,

    // Predicates
    GroupedPredicate,
    OrPredicate,
    AndPredicate,
    NotPredicate,
    RelationalPredicate,
    BetweenPredicate,
    LikePredicate,
    InPredicate,
    ExplicitInList,
    SubqueryInList,
    ParameterInList,
    CollectionInList,
    ExistsPredicate,
    IsNullPredicate,
    IsDistinctFromPredicate,
    IsEmptyPredicate,
    MemberOfPredicate,
    ExpressionPredicate,
}

/// A child of a parse-tree node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Element {
    /// A nested rule node.
    Node(Node),
    /// A token consumed directly by the parent rule.
    Token(Token),
}

impl Element {
    /// Returns the source span of this element.
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::Node(node) => node.span,
            Self::Token(token) => token.span,
        }
    }
}

/// A parse-tree node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    /// The rule alternative this node was produced by.
    pub kind: NodeKind,
    /// The source span covered by the node.
    pub span: Span,
    /// Children in source order.
    pub children: Vec<Element>,
}

impl Node {
    /// Creates a node, deriving its span from its children.
    #[must_use]
    pub fn new(kind: NodeKind, children: Vec<Element>) -> Self {
        let span = match (children.first(), children.last()) {
            (Some(first), Some(last)) => first.span().merge(last.span()),
            _ => Span::default(),
        };
        Self {
            kind,
            span,
            children,
        }
    }

    /// Iterates over the child nodes, skipping tokens.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.children.iter().filter_map(|child| match child {
            Element::Node(node) => Some(node),
            Element::Token(_) => None,
        })
    }

    /// Iterates over the tokens consumed directly by this node.
    pub fn tokens(&self) -> impl Iterator<Item = &Token> {
        self.children.iter().filter_map(|child| match child {
            Element::Token(token) => Some(token),
            Element::Node(_) => None,
        })
    }

    /// Returns true if this node directly consumed the given keyword.
    #[must_use]
    pub fn has_keyword(&self, keyword: Keyword) -> bool {
        self.tokens().any(|token| token.is_keyword(keyword))
    }

    /// Returns true if this node directly consumed a token of this kind.
    #[must_use]
    pub fn has_token(&self, kind: &TokenKind) -> bool {
        self.tokens()
            .any(|token| core::mem::discriminant(&token.kind) == core::mem::discriminant(kind))
    }

    /// Returns the first keyword consumed directly by this node.
    #[must_use]
    pub fn first_keyword(&self) -> Option<Keyword> {
        self.tokens().find_map(Token::keyword)
    }

    /// Returns the first child node of the given kind.
    #[must_use]
    pub fn find(&self, kind: NodeKind) -> Option<&Node> {
        self.nodes().find(|node| node.kind == kind)
    }

    /// Returns the first node of the given kind below this one, searching
    /// depth-first in source order.
    #[must_use]
    pub fn descendant(&self, kind: NodeKind) -> Option<&Node> {
        self.nodes()
            .find_map(|node| (node.kind == kind).then_some(node).or_else(|| node.descendant(kind)))
    }

    fn write_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        writeln!(
            f,
            "{:indent$}{:?}@{}..{}",
            "",
            self.kind,
            self.span.start,
            self.span.end,
            indent = depth * 2
        )?;
        for child in &self.children {
            match child {
                Element::Node(node) => node.write_indented(f, depth + 1)?,
                Element::Token(token) => writeln!(
                    f,
                    "{:indent$}{}@{}..{}",
                    "",
                    token.kind,
                    token.span.start,
                    token.span.end,
                    indent = (depth + 1) * 2
                )?,
            }
        }
        Ok(())
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_indented(f, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(text: &str, start: usize) -> Element {
        Element::Token(Token::word(text, Span::new(start, start + text.len())))
    }

    #[test]
    fn test_node_span_covers_children() {
        let ident = Node::new(NodeKind::Identifier, vec![word("e", 10)]);
        let node = Node::new(
            NodeKind::Alias,
            vec![word("as", 7), Element::Node(ident)],
        );
        assert_eq!(node.span, Span::new(7, 11));
    }

    #[test]
    fn test_keyword_lookup_ignores_nested_nodes() {
        let ident = Node::new(NodeKind::Identifier, vec![word("not", 4)]);
        let node = Node::new(
            NodeKind::Alias,
            vec![word("as", 0), Element::Node(ident)],
        );
        assert!(node.has_keyword(Keyword::As));
        assert!(!node.has_keyword(Keyword::Not));
        assert_eq!(node.first_keyword(), Some(Keyword::As));
    }

    #[test]
    fn test_descendant_searches_depth_first() {
        let ident = Node::new(NodeKind::Identifier, vec![word("e", 3)]);
        let alias = Node::new(NodeKind::Alias, vec![word("as", 0), Element::Node(ident)]);
        let root = Node::new(NodeKind::EntityRoot, vec![Element::Node(alias)]);
        assert!(root.find(NodeKind::Identifier).is_none());
        assert_eq!(
            root.descendant(NodeKind::Identifier).map(|node| node.span),
            Some(Span::new(3, 4))
        );
    }

    #[test]
    fn test_display_dumps_tree() {
        let ident = Node::new(NodeKind::Identifier, vec![word("e", 3)]);
        let node = Node::new(NodeKind::Alias, vec![word("as", 0), Element::Node(ident)]);
        let dump = node.to_string();
        assert_eq!(dump, "Alias@0..4\n  'as'@0..2\n  Identifier@3..4\n    'e'@3..4\n");
    }
}
