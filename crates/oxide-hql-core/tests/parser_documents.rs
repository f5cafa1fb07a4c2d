//! Tests for documents, recovery, limits and the public surface.

mod common;
use common::*;

use oxide_hql_core::ast::Statement;
use oxide_hql_core::tree::Element;
use oxide_hql_core::{
    build_statement, Diagnostic, DiagnosticKind, Node, NodeKind, ParseOptions, Parser, Span,
    Token,
};

#[test]
fn document_keeps_good_statements() {
    let source = "from Order o;\nselect o from Order o where;\nupdate Order o set o.paid = true";
    let result = parse_document(source);
    assert_eq!(result.statements.len(), 2);
    assert!(matches!(result.statements[0], Statement::Select(_)));
    assert!(matches!(result.statements[1], Statement::Update(_)));

    assert_eq!(result.diagnostics.len(), 1);
    let diagnostic = &result.diagnostics[0];
    assert_eq!(diagnostic.kind, DiagnosticKind::Syntax);
    assert_eq!(diagnostic.span.line_col(source).line, 2);
}

#[test]
fn document_diagnostics_are_in_source_order() {
    let result = parse_document("from E e where e.x = ?; select; from F f where f.y = ?");
    let starts: Vec<usize> = result.diagnostics.iter().map(|d| d.span.start).collect();
    let mut sorted = starts.clone();
    sorted.sort_unstable();
    assert_eq!(starts, sorted);
    assert_eq!(result.statements.len(), 2);
    assert!(result.has_errors());
}

#[test]
fn empty_statements_are_skipped() {
    let result = parse_document(";; from E e ;;");
    assert_eq!(result.statements.len(), 1);
    assert!(result.diagnostics.is_empty());
}

#[test]
fn trailing_tokens_are_an_error() {
    let diagnostic = parse_err("from E e e2");
    assert!(diagnostic.message.contains("end of input"));
}

#[test]
fn lexer_errors_surface_as_syntax_errors() {
    let diagnostic = parse_err("from E e where e.name = 'unterminated");
    assert_eq!(diagnostic.kind, DiagnosticKind::Syntax);
    assert!(diagnostic.message.contains("Unterminated"));
}

#[test]
fn unterminated_block_comment_is_reported() {
    let result = parse_document("select e from E e; /* note\n delete from E e where e.id = 1");
    assert_eq!(result.statements.len(), 1);
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].kind, DiagnosticKind::Syntax);
    assert_eq!(result.diagnostics[0].message, "Unterminated block comment");
    assert_eq!(result.diagnostics[0].span.start, 19);
}

#[test]
fn input_size_limit() {
    let options = ParseOptions::new().max_input_bytes(Some(8));
    let result = Parser::new("from Employee e")
        .with_options(options)
        .parse_document();
    assert!(result.statements.is_empty());
    assert_eq!(result.diagnostics.len(), 1);
    assert!(result.diagnostics[0].message.contains("exceeds the limit"));
}

#[test]
fn depth_limit() {
    let source = format!("from E e where {}e.x = 1{}", "(".repeat(20), ")".repeat(20));
    let result = Parser::new(&source)
        .with_options(ParseOptions::new().max_depth(8))
        .parse_statement();
    assert!(result.statement.is_none());
    assert!(result.diagnostics[0].message.contains("Nesting exceeds"));

    let result = Parser::new(&source).parse_statement();
    assert!(result.is_ok(), "{:?}", result.diagnostics);
}

#[test]
fn parsing_is_deterministic() {
    let source = "with t as (from T t) select t.id, count(*) over (partition by t.g) from t \
                  where t.id in (1, 2) order by 1 desc nulls last";
    assert_eq!(parse(source), parse(source));
}

#[test]
fn trees_and_statements_agree() {
    let (trees, diagnostics) = Parser::new("from A a; delete B b").parse_trees();
    assert!(diagnostics.is_empty());
    assert_eq!(trees.len(), 2);
    assert_eq!(trees[0].kind, NodeKind::SelectStatement);
    assert_eq!(trees[1].kind, NodeKind::DeleteStatement);
    for tree in &trees {
        assert!(build_statement(tree).is_ok());
    }
}

#[test]
fn mismatched_tree_is_an_internal_diagnostic() {
    let node = Node::new(
        NodeKind::DeleteStatement,
        vec![Element::Token(Token::word("delete", Span::new(0, 6)))],
    );
    let err = build_statement(&node).unwrap_err();
    let diagnostic = Diagnostic::from(err);
    assert_eq!(diagnostic.kind, DiagnosticKind::InternalGrammarMismatch);
    assert!(diagnostic.is_fatal());
    assert!(diagnostic.message.starts_with("Internal grammar mismatch"));
}

#[test]
fn ast_serializes_to_json() {
    let statement = parse("select e.name from Employee e where e.id = :id");
    let json = serde_json::to_value(&statement).unwrap();
    let select = &json["Select"];
    assert!(select.is_object());
    assert!(select["span"]["start"].is_number());

    let result = oxide_hql_core::parse("from E e where e.id = ?");
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["diagnostics"][0]["severity"], "warning");
}

#[test]
fn results_can_cross_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<oxide_hql_core::ParseResult>();
    assert_send_sync::<oxide_hql_core::DocumentResult>();
    assert_send_sync::<Node>();

    let handle = std::thread::spawn(|| oxide_hql_core::parse("from E e").statement);
    assert!(handle.join().unwrap().is_some());
}
