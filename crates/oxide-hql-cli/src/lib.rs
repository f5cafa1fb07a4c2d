//! Checker and AST dumper for HQL/JPQL query files.
//!
//! The `oxide-hql` binary reads a `;`-separated document of HQL statements
//! from a file or standard input and either reports its diagnostics
//! (`check`), prints the statement ASTs as JSON (`ast`) or dumps the
//! concrete parse trees (`tree`). The rendering helpers live here so they
//! can be tested without spawning the binary.
//!
//! # CLI Usage
//!
//! ```bash
//! # Report problems with file:line:column positions
//! oxide-hql check queries.hql
//!
//! # Print the AST of every statement
//! echo "from Order o where o.total > :min" | oxide-hql ast --pretty
//!
//! # Dump parse trees with a tighter nesting limit
//! oxide-hql --max-depth 32 tree queries.hql
//! ```

pub mod error;

use std::io::Read;
use std::path::Path;

use serde::Serialize;

use oxide_hql_core::{Diagnostic, DocumentResult, Node, ParseOptions};

pub use error::{CliError, Result};

/// Name shown for input read from standard input.
pub const STDIN_NAME: &str = "<stdin>";

/// Reads the source text from `path`, or from standard input when `path`
/// is absent or `-`.
///
/// # Errors
///
/// Returns an error if the input cannot be read.
pub fn read_source(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => {
            std::fs::read_to_string(path).map_err(|source| CliError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
        _ => {
            let mut source = String::new();
            std::io::stdin()
                .read_to_string(&mut source)
                .map_err(CliError::Stdin)?;
            Ok(source)
        }
    }
}

/// Returns the display name of an input path.
#[must_use]
pub fn source_name(path: Option<&Path>) -> String {
    match path {
        Some(path) if path != Path::new("-") => path.display().to_string(),
        _ => String::from(STDIN_NAME),
    }
}

/// Builds parse options from the command-line limits.
#[must_use]
pub fn parse_options(max_input_bytes: Option<usize>, max_depth: Option<usize>) -> ParseOptions {
    let options = ParseOptions::new().max_input_bytes(max_input_bytes);
    match max_depth {
        Some(depth) => options.max_depth(depth),
        None => options,
    }
}

/// Error and warning counts of a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub errors: usize,
    pub warnings: usize,
}

impl Summary {
    /// Counts the diagnostics by severity.
    #[must_use]
    pub fn of(diagnostics: &[Diagnostic]) -> Self {
        let errors = diagnostics.iter().filter(|d| d.is_error()).count();
        Self {
            errors,
            warnings: diagnostics.len() - errors,
        }
    }
}

/// Renders one diagnostic as `name:line:column: severity[kind]: message`.
#[must_use]
pub fn render_diagnostic(name: &str, source: &str, diagnostic: &Diagnostic) -> String {
    format!("{name}:{}: {diagnostic}", diagnostic.span.line_col(source))
}

/// Renders every diagnostic, one per line.
#[must_use]
pub fn render_diagnostics(name: &str, source: &str, diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .iter()
        .map(|diagnostic| render_diagnostic(name, source, diagnostic))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Serializes a value as JSON.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}

/// Renders the statements of a parsed document as a JSON array.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn render_ast(result: &DocumentResult, pretty: bool) -> Result<String> {
    to_json(&result.statements, pretty)
}

/// Renders parse trees as indented text, separated by blank lines.
#[must_use]
pub fn render_trees(trees: &[Node]) -> String {
    trees
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxide_hql_core::Parser;

    #[test]
    fn test_render_diagnostic_position() {
        let source = "from Order o;\nselect from Order o";
        let result = oxide_hql_core::parse_document(source);
        let rendered = render_diagnostics("q.hql", source, &result.diagnostics);
        assert!(rendered.starts_with("q.hql:2:8: error[syntax]: "), "{rendered}");
    }

    #[test]
    fn test_summary_counts_severities() {
        let result = oxide_hql_core::parse_document("from E e where e.id = ?; select");
        let summary = Summary::of(&result.diagnostics);
        assert_eq!(
            summary,
            Summary {
                errors: 1,
                warnings: 1
            }
        );
    }

    #[test]
    fn test_render_ast_is_a_json_array() {
        let result = oxide_hql_core::parse_document("from A a; delete B");
        let json: serde_json::Value = serde_json::from_str(&render_ast(&result, false).unwrap()).unwrap();
        assert_eq!(json.as_array().map(Vec::len), Some(2));
        assert!(json[1]["Delete"].is_object());
    }

    #[test]
    fn test_render_trees() {
        let (trees, _) = Parser::new("from A a").parse_trees();
        let text = render_trees(&trees);
        assert!(text.starts_with("SelectStatement"), "{text}");
        assert!(text.contains("Identifier"));
    }

    #[test]
    fn test_parse_options() {
        let options = parse_options(Some(64), None);
        assert_eq!(options.max_input_bytes, Some(64));
        assert_eq!(options.max_depth, oxide_hql_core::options::DEFAULT_MAX_DEPTH);
        assert_eq!(parse_options(None, Some(4)).max_depth, 4);
    }

    #[test]
    fn test_read_source_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("q.hql");
        std::fs::write(&path, "from A a").unwrap();
        assert_eq!(read_source(Some(&path)).unwrap(), "from A a");
        assert_eq!(source_name(Some(&path)), path.display().to_string());
        assert_eq!(source_name(None), STDIN_NAME);
    }

    #[test]
    fn test_read_source_missing_file() {
        let err = read_source(Some(Path::new("/nonexistent/q.hql"))).unwrap_err();
        assert!(err.to_string().starts_with("Failed to read '/nonexistent/q.hql'"));
    }
}
