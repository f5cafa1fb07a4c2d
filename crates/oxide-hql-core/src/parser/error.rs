//! Parser error types.

use thiserror::Error;

use crate::lexer::{Span, TokenKind};

/// A syntax error raised by the grammar engine.
///
/// Syntax errors are fatal for the statement they occur in: the parser
/// records one diagnostic and resumes at the next statement.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message} at position {}..{}", span.start, span.end)]
pub struct ParseError {
    /// The error message.
    pub message: String,
    /// The location of the error.
    pub span: Span,
    /// Expected tokens (if applicable).
    pub expected: Option<String>,
    /// The actual token found.
    pub found: Option<TokenKind>,
}

impl ParseError {
    /// Creates a new parse error.
    #[must_use]
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
            expected: None,
            found: None,
        }
    }

    /// Creates an "unexpected token" error.
    ///
    /// A lexer error token is reported with the lexer's own message.
    #[must_use]
    pub fn unexpected(expected: impl Into<String>, found: TokenKind, span: Span) -> Self {
        let expected: String = expected.into();
        let message = match &found {
            TokenKind::Eof => format!("Unexpected end of input: expected {expected}"),
            TokenKind::Error(message) => message.clone(),
            other => format!("Unexpected token: expected {expected}, found {other}"),
        };
        Self {
            message,
            span,
            expected: Some(expected),
            found: Some(found),
        }
    }

    /// Creates an "unexpected end of input" error.
    #[must_use]
    pub fn unexpected_eof(expected: impl Into<String>, span: Span) -> Self {
        Self::unexpected(expected, TokenKind::Eof, span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Token;

    #[test]
    fn test_unexpected_message() {
        let found = Token::word("SELECTX", Span::new(0, 7)).kind;
        let err = ParseError::unexpected("statement", found, Span::new(0, 7));
        assert_eq!(
            err.message,
            "Unexpected token: expected statement, found 'SELECTX'"
        );
        assert_eq!(err.expected.as_deref(), Some("statement"));
    }

    #[test]
    fn test_unexpected_eof_message() {
        let err = ParseError::unexpected_eof("')'", Span::new(12, 12));
        assert_eq!(err.message, "Unexpected end of input: expected ')'");
        assert_eq!(err.found, Some(TokenKind::Eof));
    }

    #[test]
    fn test_lexer_error_keeps_lexer_message() {
        let found = TokenKind::Error(String::from("Unterminated string literal"));
        let err = ParseError::unexpected("expression", found, Span::new(3, 9));
        assert_eq!(err.message, "Unterminated string literal");
        assert_eq!(err.to_string(), "Unterminated string literal at position 3..9");
    }
}
