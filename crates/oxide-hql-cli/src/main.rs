//! oxide-hql CLI
//!
//! Command-line tool for checking HQL/JPQL documents.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

use oxide_hql_cli::{
    parse_options, read_source, render_ast, render_diagnostics, render_trees, source_name,
    to_json, Summary,
};

/// Checks HQL/JPQL queries and dumps their syntax trees.
#[derive(Parser)]
#[command(name = "oxide-hql")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Reject inputs larger than this many bytes.
    #[arg(long, env = "OXIDE_HQL_MAX_INPUT_BYTES")]
    max_input_bytes: Option<usize>,

    /// Maximum nesting of expressions, predicates and subqueries.
    #[arg(long, env = "OXIDE_HQL_MAX_DEPTH")]
    max_depth: Option<usize>,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report diagnostics; exits non-zero if any is an error.
    Check {
        /// Input file (standard input if absent or `-`).
        input: Option<PathBuf>,

        /// Treat warnings as errors.
        #[arg(long)]
        deny_warnings: bool,
    },

    /// Print the AST of every statement as JSON.
    Ast {
        /// Input file (standard input if absent or `-`).
        input: Option<PathBuf>,

        /// Pretty-print the JSON.
        #[arg(short, long)]
        pretty: bool,
    },

    /// Dump the concrete parse tree of every statement.
    Tree {
        /// Input file (standard input if absent or `-`).
        input: Option<PathBuf>,

        /// Print the trees as JSON instead of indented text.
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let options = parse_options(cli.max_input_bytes, cli.max_depth);
    debug!(?options, "parse options");

    match cli.command {
        Commands::Check {
            input,
            deny_warnings,
        } => {
            let name = source_name(input.as_deref());
            let source = read_source(input.as_deref())?;
            let result = oxide_hql_core::Parser::new(&source)
                .with_options(options)
                .parse_document();
            let summary = Summary::of(&result.diagnostics);

            if !result.diagnostics.is_empty() {
                eprintln!("{}", render_diagnostics(&name, &source, &result.diagnostics));
            }
            info!(
                statements = result.statements.len(),
                errors = summary.errors,
                warnings = summary.warnings,
                "checked {name}"
            );

            if summary.errors > 0 || (deny_warnings && summary.warnings > 0) {
                return Ok(ExitCode::FAILURE);
            }
        }

        Commands::Ast { input, pretty } => {
            let name = source_name(input.as_deref());
            let source = read_source(input.as_deref())?;
            let result = oxide_hql_core::Parser::new(&source)
                .with_options(options)
                .parse_document();

            println!("{}", render_ast(&result, pretty)?);
            if !result.diagnostics.is_empty() {
                eprintln!("{}", render_diagnostics(&name, &source, &result.diagnostics));
            }
            if result.has_errors() {
                return Ok(ExitCode::FAILURE);
            }
        }

        Commands::Tree { input, json } => {
            let name = source_name(input.as_deref());
            let source = read_source(input.as_deref())?;
            let (trees, diagnostics) = oxide_hql_core::Parser::new(&source)
                .with_options(options)
                .parse_trees();

            if json {
                println!("{}", to_json(&trees, true)?);
            } else {
                print!("{}", render_trees(&trees));
            }
            if !diagnostics.is_empty() {
                eprintln!("{}", render_diagnostics(&name, &source, &diagnostics));
            }
            if Summary::of(&diagnostics).errors > 0 {
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
