//! Incremental construction of the parse tree.
//!
//! Rules open a node before consuming their tokens and close it afterwards.
//! When a rule only learns its alternative after parsing a prefix (binary
//! operators, predicate suffixes), it takes a [`Checkpoint`] first and wraps
//! the already-built children with [`TreeBuilder::start_node_at`].

use super::{Element, Node, NodeKind};
use crate::lexer::Token;

/// A position in the child list a node can later be opened at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint(usize);

/// Complete builder state, used to undo a speculative parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    children: usize,
    parents: usize,
}

/// Builds a [`Node`] tree from start/token/finish events.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    parents: Vec<(NodeKind, usize)>,
    children: Vec<Element>,
}

impl TreeBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a node; subsequent elements become its children.
    pub fn start_node(&mut self, kind: NodeKind) {
        self.parents.push((kind, self.children.len()));
    }

    /// Opens a node that adopts every element produced since `checkpoint`.
    pub fn start_node_at(&mut self, checkpoint: Checkpoint, kind: NodeKind) {
        let floor = self.parents.last().map_or(0, |&(_, first)| first);
        debug_assert!(checkpoint.0 >= floor, "checkpoint escapes the open node");
        self.parents.push((kind, checkpoint.0.max(floor)));
    }

    /// Appends a token to the innermost open node.
    pub fn token(&mut self, token: Token) {
        self.children.push(Element::Token(token));
    }

    /// Closes the innermost open node.
    pub fn finish_node(&mut self) {
        if let Some((kind, first)) = self.parents.pop() {
            let children = self.children.split_off(first);
            self.children.push(Element::Node(Node::new(kind, children)));
        }
    }

    /// Returns a checkpoint at the current position.
    #[must_use]
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.children.len())
    }

    /// Captures the builder state so a failed speculation can be undone.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            children: self.children.len(),
            parents: self.parents.len(),
        }
    }

    /// Discards everything produced since `snapshot`.
    ///
    /// Only valid while every node opened before the snapshot is still open,
    /// which holds for any rule that speculates on its own sub-rules.
    pub fn rewind(&mut self, snapshot: Snapshot) {
        self.parents.truncate(snapshot.parents);
        self.children.truncate(snapshot.children);
    }

    /// Consumes the builder and returns the single root node, if the events
    /// were balanced and produced exactly one.
    #[must_use]
    pub fn finish(mut self) -> Option<Node> {
        if !self.parents.is_empty() || self.children.len() != 1 {
            return None;
        }
        match self.children.pop() {
            Some(Element::Node(node)) => Some(node),
            _ => None,
        }
    }
}
