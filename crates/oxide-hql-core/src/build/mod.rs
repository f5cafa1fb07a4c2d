//! AST builder.
//!
//! Walks a parse tree produced by the grammar engine once, top-down, and
//! maps every rule alternative onto its AST variant. The builder never sees
//! user errors: a tree it cannot map means the grammar and the builder have
//! drifted apart, reported as [`BuildError`].

mod expression;
mod predicate;
mod query;
mod statement;

use thiserror::Error;

use crate::ast::{Ident, QualifiedName};
use crate::lexer::{Span, TokenKind};
use crate::tree::{Node, NodeKind};

pub use statement::build_statement;

/// A parse tree the builder has no mapping for.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// A node of an unexpected kind.
    #[error("Internal grammar mismatch: expected {expected}, found {found:?} node")]
    GrammarMismatch {
        /// What the builder expected.
        expected: &'static str,
        /// The node kind actually found.
        found: NodeKind,
        /// Span of the offending node.
        span: Span,
    },
    /// A node lacking a child its rule always produces.
    #[error("Internal grammar mismatch: {parent:?} node has no {missing}")]
    MissingChild {
        /// The incomplete node.
        parent: NodeKind,
        /// Description of the missing child.
        missing: &'static str,
        /// Span of the incomplete node.
        span: Span,
    },
}

impl BuildError {
    /// Returns the span the error points at.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::GrammarMismatch { span, .. } | Self::MissingChild { span, .. } => *span,
        }
    }
}

pub(crate) type BuildResult<T> = Result<T, BuildError>;

pub(crate) fn mismatch(expected: &'static str, node: &Node) -> BuildError {
    BuildError::GrammarMismatch {
        expected,
        found: node.kind,
        span: node.span,
    }
}

/// Cursor over the child nodes of one parse-tree node.
pub(crate) struct Children<'a> {
    parent: &'a Node,
    nodes: Vec<&'a Node>,
    pos: usize,
}

impl<'a> Children<'a> {
    pub(crate) fn new(parent: &'a Node) -> Self {
        Self {
            parent,
            nodes: parent.nodes().collect(),
            pos: 0,
        }
    }

    /// Returns the next child without consuming it.
    pub(crate) fn peek(&self) -> Option<&'a Node> {
        self.nodes.get(self.pos).copied()
    }

    /// Consumes the next child, which must exist.
    pub(crate) fn next(&mut self, missing: &'static str) -> BuildResult<&'a Node> {
        let node = self.peek().ok_or(BuildError::MissingChild {
            parent: self.parent.kind,
            missing,
            span: self.parent.span,
        })?;
        self.pos += 1;
        Ok(node)
    }

    /// Consumes the next child, which must be of the given kind.
    pub(crate) fn expect(&mut self, kind: NodeKind, missing: &'static str) -> BuildResult<&'a Node> {
        let node = self.next(missing)?;
        if node.kind == kind {
            Ok(node)
        } else {
            Err(mismatch(missing, node))
        }
    }

    /// Consumes the next child if it is of the given kind.
    pub(crate) fn next_if(&mut self, kind: NodeKind) -> Option<&'a Node> {
        let node = self.peek().filter(|node| node.kind == kind)?;
        self.pos += 1;
        Some(node)
    }

    /// Consumes every remaining child.
    pub(crate) fn rest(&mut self) -> impl Iterator<Item = &'a Node> + '_ {
        let start = self.pos;
        self.pos = self.nodes.len();
        self.nodes[start..].iter().copied()
    }

    /// Fails if any child was left unconsumed.
    pub(crate) fn finish(&self) -> BuildResult<()> {
        match self.peek() {
            Some(node) => Err(mismatch("end of node", node)),
            None => Ok(()),
        }
    }
}

/// Builds an identifier from an `Identifier` node.
pub(crate) fn ident(node: &Node) -> BuildResult<Ident> {
    if node.kind != NodeKind::Identifier {
        return Err(mismatch("identifier", node));
    }
    match node.tokens().next().map(|token| &token.kind) {
        Some(TokenKind::Word { text, .. }) => Ok(Ident::new(text.clone(), node.span)),
        Some(TokenKind::QuotedIdentifier(text)) => Ok(Ident {
            name: text.clone(),
            quoted: true,
            span: node.span,
        }),
        _ => Err(BuildError::MissingChild {
            parent: node.kind,
            missing: "name token",
            span: node.span,
        }),
    }
}

/// Builds a dotted name from a node whose children are identifiers.
pub(crate) fn qualified_name(node: &Node) -> BuildResult<QualifiedName> {
    let parts = node.nodes().map(ident).collect::<BuildResult<Vec<_>>>()?;
    if parts.is_empty() {
        return Err(BuildError::MissingChild {
            parent: node.kind,
            missing: "identifier",
            span: node.span,
        });
    }
    Ok(QualifiedName {
        parts,
        span: node.span,
    })
}

/// Builds the alias of an `Alias` node, if present.
pub(crate) fn alias(node: Option<&Node>) -> BuildResult<Option<Ident>> {
    node.map(|alias| {
        if alias.kind != NodeKind::Alias {
            return Err(mismatch("alias", alias));
        }
        let mut children = Children::new(alias);
        ident(children.expect(NodeKind::Identifier, "identifier")?)
    })
    .transpose()
}
