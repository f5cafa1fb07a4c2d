//! HQL Lexer/Tokenizer
//!
//! This module provides a hand-written lexer for HQL that produces a stream
//! of tokens. Callers that already own a tokenizer can skip it and hand a
//! token vector straight to [`crate::Parser::from_tokens`].

mod span;
mod token;
mod tokenizer;

pub use span::{LineCol, Span};
pub use token::{Keyword, NumberKind, Token, TokenKind};
pub use tokenizer::Lexer;
