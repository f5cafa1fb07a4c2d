//! # oxide-hql-core
//!
//! A parsing front end for HQL/JPQL, the object query language of JPA
//! providers.
//!
//! This crate provides:
//! - A hand-written lexer that classifies soft keywords without reserving them
//! - A recursive descent grammar engine with Pratt expression parsing that
//!   records a concrete parse tree
//! - An AST builder that turns the parse tree into typed statements
//! - Span-carrying diagnostics with statement-level error recovery
//!
//! ## Parsing a statement
//!
//! ```rust
//! use oxide_hql_core::ast::{QueryBody, Statement};
//!
//! let result = oxide_hql_core::parse("select o from Order o where o.total > :min");
//! assert!(result.is_ok());
//!
//! let Some(Statement::Select(select)) = result.statement else {
//!     panic!("expected a select statement");
//! };
//! assert!(matches!(select.query.body, QueryBody::Query(_)));
//! ```
//!
//! ## Parsing a document
//!
//! Statements are separated by `;`. A broken statement is reported and
//! skipped; the others still produce an AST.
//!
//! ```rust
//! let result = oxide_hql_core::parse_document("from Order o; select from; delete Order");
//! assert_eq!(result.statements.len(), 2);
//! assert_eq!(result.diagnostics.len(), 1);
//! ```

pub mod ast;
pub mod build;
pub mod diagnostics;
pub mod lexer;
pub mod options;
pub mod parser;
pub mod tree;

pub use ast::{Expr, Predicate, Statement};
pub use build::{build_statement, BuildError};
pub use diagnostics::{Diagnostic, DiagnosticKind, DocumentResult, ParseResult, Severity};
pub use lexer::{Lexer, Span, Token, TokenKind};
pub use options::ParseOptions;
pub use parser::{ParseError, Parser};
pub use tree::{Node, NodeKind};

/// Parses a single statement with the default options.
#[must_use]
pub fn parse(source: &str) -> ParseResult {
    Parser::new(source).parse_statement()
}

/// Parses a `;`-separated document with the default options.
#[must_use]
pub fn parse_document(source: &str) -> DocumentResult {
    Parser::new(source).parse_document()
}
