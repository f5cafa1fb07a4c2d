//! HQL grammar engine: token navigation, statements and recovery.

use tracing::{debug, trace, warn};

use super::error::ParseError;
use crate::ast::Statement;
use crate::build::build_statement;
use crate::diagnostics::{Diagnostic, DiagnosticKind, DocumentResult, ParseResult};
use crate::lexer::{Keyword, Lexer, Span, Token, TokenKind};
use crate::options::ParseOptions;
use crate::tree::{Checkpoint, Node, NodeKind, TreeBuilder};

pub(super) type PResult<T> = Result<T, ParseError>;

/// Whether a predicate rule produced a real predicate or only a bare
/// expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Shape {
    Expression,
    Predicate,
}

/// HQL Parser.
///
/// Parses one statement ([`Parser::parse_statement`]) or a `;`-separated
/// document ([`Parser::parse_document`]). Syntax errors never abort a
/// document: the broken statement is reported and skipped.
pub struct Parser {
    pub(super) tokens: Vec<Token>,
    pub(super) pos: usize,
    pub(super) tree: TreeBuilder,
    pub(super) diagnostics: Vec<Diagnostic>,
    pub(super) options: ParseOptions,
    pub(super) depth: usize,
    /// Set while parsing the pattern of a LIKE predicate, where parameters
    /// may carry `%` wildcards.
    pub(super) in_like_pattern: bool,
}

impl Parser {
    /// Creates a new parser for the given input.
    #[must_use]
    pub fn new(source: &str) -> Self {
        Self::from_tokens(Lexer::new(source).tokenize())
    }

    /// Creates a parser over an existing token sequence.
    ///
    /// A trailing end-of-input token is added when missing.
    #[must_use]
    pub fn from_tokens(mut tokens: Vec<Token>) -> Self {
        if !tokens.last().is_some_and(Token::is_eof) {
            let end = tokens.last().map_or(0, |token| token.span.end);
            tokens.push(Token::new(TokenKind::Eof, Span::new(end, end)));
        }
        Self {
            tokens,
            pos: 0,
            tree: TreeBuilder::new(),
            diagnostics: Vec::new(),
            options: ParseOptions::default(),
            depth: 0,
            in_like_pattern: false,
        }
    }

    /// Replaces the parse options.
    #[must_use]
    pub const fn with_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    /// Parses exactly one statement, optionally followed by `;`.
    ///
    /// Trailing tokens after the statement are a syntax error.
    #[must_use]
    pub fn parse_statement(mut self) -> ParseResult {
        if let Some(diagnostic) = self.check_input_size() {
            return ParseResult {
                statement: None,
                diagnostics: vec![diagnostic],
            };
        }

        let statement = self.single_tree().and_then(|tree| self.build(&tree));
        debug!(
            parsed = statement.is_some(),
            diagnostics = self.diagnostics.len(),
            "parsed statement"
        );
        ParseResult {
            statement,
            diagnostics: self.diagnostics,
        }
    }

    /// Parses a `;`-separated document, recovering after broken statements.
    #[must_use]
    pub fn parse_document(mut self) -> DocumentResult {
        if let Some(diagnostic) = self.check_input_size() {
            return DocumentResult {
                statements: Vec::new(),
                diagnostics: vec![diagnostic],
            };
        }

        let trees = self.document_trees();
        let statements: Vec<Statement> = trees.iter().filter_map(|tree| self.build(tree)).collect();
        self.diagnostics.sort_by_key(|diagnostic| diagnostic.span.start);
        debug!(
            statements = statements.len(),
            diagnostics = self.diagnostics.len(),
            "parsed document"
        );
        DocumentResult {
            statements,
            diagnostics: self.diagnostics,
        }
    }

    /// Runs only the grammar engine over a document and returns the parse
    /// tree of every statement that parsed, together with the diagnostics.
    #[must_use]
    pub fn parse_trees(mut self) -> (Vec<Node>, Vec<Diagnostic>) {
        if let Some(diagnostic) = self.check_input_size() {
            return (Vec::new(), vec![diagnostic]);
        }
        let trees = self.document_trees();
        (trees, self.diagnostics)
    }

    fn check_input_size(&self) -> Option<Diagnostic> {
        let limit = self.options.max_input_bytes?;
        let len = self.tokens.last().map_or(0, |token| token.span.end);
        (len > limit).then(|| {
            Diagnostic::syntax(
                format!("Input of {len} bytes exceeds the limit of {limit} bytes"),
                Span::new(limit, len),
            )
        })
    }

    fn build(&mut self, tree: &Node) -> Option<Statement> {
        match build_statement(tree) {
            Ok(statement) => Some(statement),
            Err(err) => {
                warn!(error = %err, "parse tree rejected by the AST builder");
                self.diagnostics.push(err.into());
                None
            }
        }
    }

    fn single_tree(&mut self) -> Option<Node> {
        let result = self.statement().and_then(|()| {
            if self.check(&TokenKind::Semicolon) {
                self.pos += 1;
            }
            if self.at_eof() {
                Ok(())
            } else {
                Err(self.error("end of input"))
            }
        });
        self.finish_statement(result, 0)
    }

    fn document_trees(&mut self) -> Vec<Node> {
        let mut trees = Vec::new();
        loop {
            while self.check(&TokenKind::Semicolon) {
                self.pos += 1;
            }
            if self.at_eof() {
                break;
            }

            let diagnostics_before = self.diagnostics.len();
            let result = self.statement().and_then(|()| {
                if self.check(&TokenKind::Semicolon) || self.at_eof() {
                    Ok(())
                } else {
                    Err(self.error("';' or end of input"))
                }
            });
            let failed = result.is_err();
            if let Some(tree) = self.finish_statement(result, diagnostics_before) {
                trees.push(tree);
            }
            if failed {
                self.synchronize();
            }
        }
        trees
    }

    /// Takes the tree of the statement just parsed. On a syntax error the
    /// statement's other diagnostics are replaced by the error.
    fn finish_statement(&mut self, result: PResult<()>, diagnostics_before: usize) -> Option<Node> {
        let tree = core::mem::take(&mut self.tree);
        self.depth = 0;
        self.in_like_pattern = false;
        match result {
            Ok(()) => {
                let node = tree.finish();
                if node.is_none() {
                    self.diagnostics.push(Diagnostic::new(
                        DiagnosticKind::InternalGrammarMismatch,
                        "unbalanced parse tree",
                        self.peek().span,
                    ));
                }
                node
            }
            Err(err) => {
                debug!(error = %err, "statement rejected");
                self.diagnostics.truncate(diagnostics_before);
                self.diagnostics.push(err.into());
                None
            }
        }
    }

    /// Skips past the next `;`, or to the end of input.
    fn synchronize(&mut self) {
        let mut skipped = 0usize;
        while !self.at_eof() {
            let terminator = self.check(&TokenKind::Semicolon);
            self.pos += 1;
            skipped += 1;
            if terminator {
                break;
            }
        }
        trace!(skipped, "skipped to the next statement");
    }

    /// Parses one statement.
    fn statement(&mut self) -> PResult<()> {
        if self.at_query_start() {
            return self.node(NodeKind::SelectStatement, Self::query_expression);
        }
        match self.peek().keyword() {
            Some(Keyword::Update) => self.update_statement(),
            Some(Keyword::Delete) => self.delete_statement(),
            Some(Keyword::Insert) => self.insert_statement(),
            _ => Err(self.error("SELECT, FROM, WITH, UPDATE, DELETE or INSERT")),
        }
    }

    // --- Helper methods ---

    /// Returns the current token.
    pub(super) fn peek(&self) -> &Token {
        self.peek_nth(0)
    }

    /// Returns the token `n` positions ahead, or end of input.
    pub(super) fn peek_nth(&self, n: usize) -> &Token {
        let idx = (self.pos + n).min(self.tokens.len() - 1);
        &self.tokens[idx]
    }

    /// Returns true at end of input.
    pub(super) fn at_eof(&self) -> bool {
        self.peek().is_eof()
    }

    /// Checks if the current token matches the given kind.
    pub(super) fn check(&self, kind: &TokenKind) -> bool {
        self.check_nth(0, kind)
    }

    /// Checks if the token `n` positions ahead matches the given kind.
    pub(super) fn check_nth(&self, n: usize, kind: &TokenKind) -> bool {
        core::mem::discriminant(&self.peek_nth(n).kind) == core::mem::discriminant(kind)
    }

    /// Checks if the current token is a word spelling the given keyword.
    pub(super) fn check_keyword(&self, keyword: Keyword) -> bool {
        self.peek().is_keyword(keyword)
    }

    /// Checks if the token `n` positions ahead spells the given keyword.
    pub(super) fn check_keyword_nth(&self, n: usize, keyword: Keyword) -> bool {
        self.peek_nth(n).is_keyword(keyword)
    }

    /// Returns true if token `n` starts exactly where token `n - 1` ends.
    pub(super) fn adjacent(&self, n: usize) -> bool {
        n > 0 && self.peek_nth(n - 1).span.end == self.peek_nth(n).span.start
    }

    /// Returns the span of the last consumed token.
    pub(super) fn previous_span(&self) -> Span {
        self.pos
            .checked_sub(1)
            .and_then(|idx| self.tokens.get(idx))
            .map_or(self.peek().span, |token| token.span)
    }

    /// Returns true if the current token starts where the last consumed
    /// token ends.
    pub(super) fn glued_to_previous(&self) -> bool {
        self.pos > 0 && self.previous_span().end == self.peek().span.start
    }

    /// Consumes the current token into the open node.
    pub(super) fn advance(&mut self) {
        if !self.at_eof() {
            let token = self.peek().clone();
            self.tree.token(token);
            self.pos += 1;
        }
    }

    /// Consumes the current token if it matches the given kind.
    pub(super) fn eat(&mut self, kind: &TokenKind) -> bool {
        let matched = self.check(kind);
        if matched {
            self.advance();
        }
        matched
    }

    /// Consumes the current token if it spells the given keyword.
    pub(super) fn eat_keyword(&mut self, keyword: Keyword) -> bool {
        let matched = self.check_keyword(keyword);
        if matched {
            self.advance();
        }
        matched
    }

    /// Expects the current token to be the given kind.
    pub(super) fn expect(&mut self, kind: &TokenKind) -> PResult<()> {
        if self.eat(kind) {
            Ok(())
        } else {
            Err(self.error(kind.to_string()))
        }
    }

    /// Expects the current token to be the given keyword.
    pub(super) fn expect_keyword(&mut self, keyword: Keyword) -> PResult<()> {
        if self.eat_keyword(keyword) {
            Ok(())
        } else {
            Err(self.error(keyword.as_str()))
        }
    }

    /// Builds an "unexpected token" error at the current token.
    pub(super) fn error(&self, expected: impl Into<String>) -> ParseError {
        let token = self.peek();
        ParseError::unexpected(expected, token.kind.clone(), token.span)
    }

    /// Records a non-fatal diagnostic.
    pub(super) fn report(&mut self, kind: DiagnosticKind, message: impl Into<String>, span: Span) {
        self.diagnostics.push(Diagnostic::new(kind, message, span));
    }

    /// Returns true if the current token can serve as an identifier.
    pub(super) fn at_identifier(&self) -> bool {
        self.peek_identifier_nth(0)
    }

    pub(super) fn peek_identifier_nth(&self, n: usize) -> bool {
        self.peek_nth(n).identifier().is_some()
    }

    /// Parses an identifier: any word or quoted identifier.
    pub(super) fn identifier(&mut self) -> PResult<()> {
        if !self.at_identifier() {
            return Err(self.error("identifier"));
        }
        self.tree.start_node(NodeKind::Identifier);
        self.advance();
        self.tree.finish_node();
        Ok(())
    }

    /// Wraps `f` in a node of the given kind.
    pub(super) fn node<T>(
        &mut self,
        kind: NodeKind,
        f: impl FnOnce(&mut Self) -> PResult<T>,
    ) -> PResult<T> {
        self.tree.start_node(kind);
        let value = f(self)?;
        self.tree.finish_node();
        Ok(value)
    }

    /// Wraps everything recorded since `checkpoint` in a node.
    pub(super) fn wrap(&mut self, checkpoint: Checkpoint, kind: NodeKind) {
        self.tree.start_node_at(checkpoint, kind);
        self.tree.finish_node();
    }

    /// Runs `f` one nesting level deeper, failing past the depth limit.
    pub(super) fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> PResult<T>) -> PResult<T> {
        if self.depth >= self.options.max_depth {
            return Err(ParseError::new(
                format!("Nesting exceeds the limit of {}", self.options.max_depth),
                self.peek().span,
            ));
        }
        self.depth += 1;
        let value = f(self);
        self.depth -= 1;
        value
    }

    /// Runs `f`, undoing all its effects if it fails.
    pub(super) fn speculate<T>(&mut self, f: impl FnOnce(&mut Self) -> PResult<T>) -> Option<T> {
        let pos = self.pos;
        let snapshot = self.tree.snapshot();
        let diagnostics = self.diagnostics.len();
        let depth = self.depth;
        let in_like_pattern = self.in_like_pattern;
        match f(self) {
            Ok(value) => Some(value),
            Err(err) => {
                trace!(error = %err, "speculative parse rewound");
                self.pos = pos;
                self.tree.rewind(snapshot);
                self.diagnostics.truncate(diagnostics);
                self.depth = depth;
                self.in_like_pattern = in_like_pattern;
                None
            }
        }
    }

    /// Returns true if the current word introduces a clause or an operator
    /// that can follow an expression, so it cannot be an alias or start a
    /// path here.
    pub(super) fn at_clause_keyword(&self) -> bool {
        let Some(keyword) = self.peek().keyword() else {
            return false;
        };
        match keyword {
            Keyword::Select
            | Keyword::From
            | Keyword::Where
            | Keyword::Having
            | Keyword::Union
            | Keyword::Intersect
            | Keyword::Except
            | Keyword::Join
            | Keyword::On
            | Keyword::With
            | Keyword::Set
            | Keyword::When
            | Keyword::Then
            | Keyword::Else
            | Keyword::End
            | Keyword::And
            | Keyword::Or
            | Keyword::Is
            | Keyword::In
            | Keyword::Between
            | Keyword::Like
            | Keyword::Ilike
            | Keyword::Escape
            | Keyword::Member
            | Keyword::Not
            | Keyword::As
            | Keyword::Asc
            | Keyword::Desc
            | Keyword::Search
            | Keyword::Cycle
            | Keyword::Using => true,
            Keyword::Group | Keyword::Order | Keyword::Partition => {
                self.check_keyword_nth(1, Keyword::By)
            }
            Keyword::Left | Keyword::Right | Keyword::Full | Keyword::Inner | Keyword::Outer => {
                self.check_keyword_nth(1, Keyword::Join) || self.check_keyword_nth(1, Keyword::Outer)
            }
            Keyword::Cross => self.check_keyword_nth(1, Keyword::Join),
            Keyword::Limit | Keyword::Offset => {
                self.check_nth(1, &TokenKind::Colon)
                    || self.check_nth(1, &TokenKind::Question)
                    || matches!(self.peek_nth(1).kind, TokenKind::Number { .. })
            }
            Keyword::Fetch => {
                self.check_keyword_nth(1, Keyword::First) || self.check_keyword_nth(1, Keyword::Next)
            }
            Keyword::Nulls => {
                self.check_keyword_nth(1, Keyword::First) || self.check_keyword_nth(1, Keyword::Last)
            }
            Keyword::Over | Keyword::Filter => self.check_nth(1, &TokenKind::LeftParen),
            Keyword::Within => self.check_keyword_nth(1, Keyword::Group),
            _ => false,
        }
    }

    /// Parses an optional alias: `AS name`, or a bare name that is not
    /// acting as a keyword.
    pub(super) fn optional_alias(&mut self) -> PResult<()> {
        if self.check_keyword(Keyword::As) {
            return self.node(NodeKind::Alias, |p| {
                p.advance();
                p.identifier()
            });
        }
        if self.at_identifier() && !self.at_clause_keyword() {
            return self.node(NodeKind::Alias, Self::identifier);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Expr, QueryBody, SelectItem};

    fn parse(source: &str) -> ParseResult {
        Parser::new(source).parse_statement()
    }

    #[test]
    fn test_simple_select() {
        let result = parse("select e from Employee e");
        assert!(result.is_ok(), "{:?}", result.diagnostics);
        assert!(matches!(result.statement, Some(Statement::Select(_))));
    }

    #[test]
    fn test_trailing_semicolon_is_allowed() {
        assert!(parse("delete from Employee;").is_ok());
    }

    #[test]
    fn test_trailing_tokens_are_rejected() {
        let result = parse("select e from Employee e )");
        assert!(result.statement.is_none());
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].kind, DiagnosticKind::Syntax);
    }

    #[test]
    fn test_unknown_statement() {
        let result = parse("SELECTX ptype FROM Employee");
        assert!(result.statement.is_none());
        assert!(result.diagnostics[0].message.contains("'SELECTX'"));
        assert_eq!(result.diagnostics[0].span, Span::new(0, 7));
    }

    #[test]
    fn test_empty_input() {
        let result = parse("");
        assert!(result.statement.is_none());
        assert!(result.diagnostics[0].message.starts_with("Unexpected end of input"));
    }

    #[test]
    fn test_document_recovers_after_error() {
        let result = Parser::new("select e from E e where; delete from E; update").parse_document();
        assert_eq!(result.statements.len(), 1);
        assert!(matches!(result.statements[0], Statement::Delete(_)));
        assert_eq!(result.diagnostics.len(), 2);
    }

    #[test]
    fn test_input_size_limit() {
        let options = ParseOptions::new().max_input_bytes(Some(10));
        let result = Parser::new("select e from Employee e")
            .with_options(options)
            .parse_statement();
        assert!(result.statement.is_none());
        assert!(result.diagnostics[0].message.contains("exceeds the limit"));
    }

    #[test]
    fn test_depth_limit() {
        let source = format!("select {}1{} from E", "(".repeat(200), ")".repeat(200));
        let result = parse(&source);
        assert!(result.statement.is_none());
        assert!(result.diagnostics[0].message.starts_with("Nesting exceeds"));
    }

    #[test]
    fn test_from_tokens_appends_eof() {
        let mut tokens = Lexer::new("from Employee").tokenize();
        tokens.pop();
        let result = Parser::from_tokens(tokens).parse_statement();
        assert!(result.is_ok(), "{:?}", result.diagnostics);
    }

    #[test]
    fn test_alias_stops_at_clause_keyword() {
        let result = parse("select e.name from Employee where e.id = 1");
        let Some(Statement::Select(select)) = result.statement else {
            panic!("expected select, got {:?}", result.diagnostics);
        };
        let QueryBody::Query(query) = &select.query.body else {
            panic!("expected simple query");
        };
        assert!(query.from.as_ref().unwrap().roots[0].alias.is_none());
        assert!(query.where_clause.is_some());
        let selection = &query.select.as_ref().unwrap().selections[0];
        assert!(matches!(selection.item, SelectItem::Expression(Expr::Path(_))));
    }
}
