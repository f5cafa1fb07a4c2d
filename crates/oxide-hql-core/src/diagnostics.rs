//! Diagnostics collected while parsing, and the parse results carrying them.

use core::fmt;

use serde::Serialize;

use crate::ast::Statement;
use crate::build::BuildError;
use crate::lexer::Span;
use crate::parser::ParseError;

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The input is invalid.
    Error,
    /// The input is accepted but likely wrong or deprecated.
    Warning,
}

impl Severity {
    /// Returns the severity as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }
}

/// The category of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DiagnosticKind {
    /// Unexpected token, unterminated literal, unbalanced grouping, or a
    /// resource limit hit. Fatal for the statement it occurs in.
    Syntax,
    /// A window frame whose bounds can never be satisfied.
    SemanticInvalidFrame,
    /// A CTE cycle or search column that collides with the CTE attributes.
    SemanticInvalidCycle,
    /// A JDBC-style `?` parameter without an ordinal.
    LegacyParameter,
    /// The parse tree did not have the shape the AST builder expects.
    InternalGrammarMismatch,
}

impl DiagnosticKind {
    /// Returns true if a diagnostic of this kind prevents an AST from being
    /// produced for its statement.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Syntax | Self::InternalGrammarMismatch)
    }

    /// Returns the severity diagnostics of this kind are reported with.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        match self {
            Self::LegacyParameter => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// Returns the kind as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Syntax => "syntax",
            Self::SemanticInvalidFrame => "invalid-frame",
            Self::SemanticInvalidCycle => "invalid-cycle",
            Self::LegacyParameter => "legacy-parameter",
            Self::InternalGrammarMismatch => "internal",
        }
    }
}

/// A problem found in the input, attached to a source span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// The category.
    pub kind: DiagnosticKind,
    /// Human-readable message.
    pub message: String,
    /// Location in the source.
    pub span: Span,
    /// Error or warning.
    pub severity: Severity,
}

impl Diagnostic {
    /// Creates a diagnostic with the default severity for its kind.
    #[must_use]
    pub fn new(kind: DiagnosticKind, message: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            message: message.into(),
            span,
            severity: kind.severity(),
        }
    }

    /// Creates a syntax diagnostic.
    #[must_use]
    pub fn syntax(message: impl Into<String>, span: Span) -> Self {
        Self::new(DiagnosticKind::Syntax, message, span)
    }

    /// Returns true if this diagnostic prevents an AST for its statement.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        self.kind.is_fatal()
    }

    /// Returns true if this diagnostic is an error rather than a warning.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}]: {}",
            self.severity.as_str(),
            self.kind.as_str(),
            self.message
        )
    }
}

impl From<ParseError> for Diagnostic {
    fn from(err: ParseError) -> Self {
        Self::syntax(err.message, err.span)
    }
}

impl From<BuildError> for Diagnostic {
    fn from(err: BuildError) -> Self {
        let span = err.span();
        Self::new(DiagnosticKind::InternalGrammarMismatch, err.to_string(), span)
    }
}

/// The outcome of parsing a single statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseResult {
    /// The statement, absent when a fatal diagnostic was recorded.
    pub statement: Option<Statement>,
    /// Everything reported while parsing, in source order.
    pub diagnostics: Vec<Diagnostic>,
}

impl ParseResult {
    /// Returns true if a statement was produced and nothing is an error.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.statement.is_some() && !self.has_errors()
    }

    /// Returns true if any diagnostic is an error.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

/// The outcome of parsing a `;`-separated document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentResult {
    /// The statements that parsed without fatal diagnostics, in order.
    pub statements: Vec<Statement>,
    /// Everything reported while parsing, in source order.
    pub diagnostics: Vec<Diagnostic>,
}

impl DocumentResult {
    /// Returns true if any diagnostic is an error.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_kinds() {
        assert!(DiagnosticKind::Syntax.is_fatal());
        assert!(DiagnosticKind::InternalGrammarMismatch.is_fatal());
        assert!(!DiagnosticKind::SemanticInvalidFrame.is_fatal());
        assert!(!DiagnosticKind::SemanticInvalidCycle.is_fatal());
        assert!(!DiagnosticKind::LegacyParameter.is_fatal());
    }

    #[test]
    fn test_severity_follows_kind() {
        let warning = Diagnostic::new(DiagnosticKind::LegacyParameter, "x", Span::new(0, 1));
        assert_eq!(warning.severity, Severity::Warning);
        assert!(!warning.is_error());

        let error = Diagnostic::syntax("bad", Span::new(0, 1));
        assert!(error.is_error());
    }

    #[test]
    fn test_display() {
        let diag = Diagnostic::new(
            DiagnosticKind::SemanticInvalidFrame,
            "frame end cannot be UNBOUNDED PRECEDING",
            Span::new(4, 23),
        );
        assert_eq!(
            diag.to_string(),
            "error[invalid-frame]: frame end cannot be UNBOUNDED PRECEDING"
        );
    }

    #[test]
    fn test_from_parse_error() {
        let err = ParseError::new("Unterminated string literal", Span::new(7, 12));
        let diag = Diagnostic::from(err);
        assert_eq!(diag.kind, DiagnosticKind::Syntax);
        assert_eq!(diag.span, Span::new(7, 12));
        assert_eq!(diag.message, "Unterminated string literal");
    }
}
