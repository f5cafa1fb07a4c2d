//! HQL Parser
//!
//! A hand-written recursive descent parser with Pratt expression parsing.
//! The grammar engine records every rule it matches into a concrete parse
//! tree ([`crate::tree::Node`]); the AST builder then turns that tree into
//! typed statements.

mod error;
mod expression;
mod function;
#[allow(clippy::module_inception)]
mod parser;
mod pratt;
mod predicate;
mod query;
mod statement;

pub use error::ParseError;
pub use parser::Parser;
pub use pratt::{
    infix_binding_power, prefix_binding_power, token_to_binary_op, token_to_comparison_op,
    token_to_unary_op,
};
