//! Scanner, parser and tree-walking evaluator for a small Lox-style language.
//!
//! Source text flows through three stages, each finishing before the next
//! begins: [`scan`] turns it into tokens, [`parse`] into statements, and
//! [`interpret`] executes them.

mod ast_display;
pub mod error;
pub mod expr;
pub mod interpreter;
pub mod parser;
pub mod scanner;
pub mod stmt;
pub mod token;
pub mod token_type;
pub mod value;

use std::io::Write;
use std::sync::Once;

pub use ast_display::TreeDump;
pub use error::{LoxError, ParseError, RuntimeError, ScanError};
pub use expr::Expr;
pub use interpreter::{evaluate, interpret};
pub use parser::{parse, parse_expression};
pub use stmt::Stmt;
pub use token::{Literal, Token};
pub use token_type::TokenType;
pub use value::Value;

/// Scans `source` into tokens, always ending with an EOF token.
pub fn scan(source: &str) -> (Vec<Token>, Vec<ScanError>) {
    scanner::Scanner::new(source).scan_tokens()
}

/// Runs source text through every stage, writing printed output to `out`.
///
/// Scan errors stop the run before parsing, parse errors before execution.
pub fn run<W: Write>(source: &str, out: W) -> Result<(), LoxError> {
    let statements = compile(source)?;
    interpret(&statements, out)?;
    Ok(())
}

/// Scans and parses `source`, failing with the whole batch of errors from
/// the first stage that had any.
pub fn compile(source: &str) -> Result<Vec<Stmt>, LoxError> {
    let (tokens, scan_errors) = scan(source);
    if !scan_errors.is_empty() {
        return Err(LoxError::Scan(scan_errors));
    }

    let (statements, parse_errors) = parse(&tokens);
    if !parse_errors.is_empty() {
        return Err(LoxError::Parse(parse_errors));
    }

    Ok(statements)
}

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Enable with `RUST_LOG=rlox=debug` or
/// `RUST_LOG=rlox=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_level(true),
                )
                .with(filter)
                .init();
        }
    });
}
