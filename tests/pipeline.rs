//! End-to-end tests driving scan, parse and interpret together.

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rlox::{Expr, LoxError, TokenType, TreeDump};

fn output(source: &str) -> String {
    let mut out = Vec::new();
    rlox::run(source, &mut out).expect("program should run");
    String::from_utf8(out).unwrap()
}

fn expression(source: &str) -> Expr {
    let (tokens, errors) = rlox::scan(source);
    assert!(errors.is_empty());
    rlox::parse_expression(&tokens).unwrap()
}

#[test]
fn prints_values() {
    assert_eq!(output("print 1 + 2;"), "3\n");
    assert_eq!(output("print \"a\" + \"b\";"), "ab\n");
    assert_eq!(output("print nil == nil;"), "true\n");
    assert_eq!(output("print 1 == \"1\";"), "false\n");
    assert_eq!(output("print 7 / 2;\nprint -(2 * 3) >= -6;"), "3.5\ntrue\n");
}

#[test]
fn multiline_program_with_comments() {
    let source = "\
// greeting
print \"hello, \" + \"world\"; // inline
1 + 1;
print !(1 < 2);
";
    assert_eq!(output(source), "hello, world\nfalse\n");
}

#[test]
fn scan_errors_stop_before_parsing() {
    let error = rlox::run("print 1;\nprint @;", Vec::new()).unwrap_err();
    assert!(matches!(error, LoxError::Scan(ref errors) if errors.len() == 1));
    assert_eq!(error.to_string(), "[line 2] Error: Unexpected character '@'.");
    assert_eq!(error.exit_code(), 65);
}

#[test]
fn parse_errors_are_batched() {
    let mut out = Vec::new();
    let error = rlox::run("print (1;\nprint 2;\nprint 3", &mut out).unwrap_err();
    assert_eq!(
        error.to_string(),
        "[line 1] Error at ';': Expect ')' after expression.\n\
         [line 3] Error at end: Expect ';' after value."
    );
    assert!(out.is_empty(), "nothing runs when parsing fails");
}

#[test]
fn runtime_fault_keeps_earlier_output() {
    let mut out = Vec::new();
    let error = rlox::run("print \"before\";\nprint 1 * nil;\nprint \"after\";", &mut out)
        .unwrap_err();
    assert_eq!(String::from_utf8(out).unwrap(), "before\n");
    assert_eq!(error.to_string(), "Operands must be numbers.\n[line 2]");
    assert_eq!(error.exit_code(), 70);
}

#[test]
fn token_dump_matches_diagnostic_format() {
    let (tokens, _) = rlox::scan("print \"hi\" 12.");
    let rendered: Vec<_> = tokens.iter().map(ToString::to_string).collect();
    assert_eq!(
        rendered,
        vec![
            "PRINT print ",
            "STRING \"hi\" hi",
            "NUMBER 12 12.0",
            "DOT . ",
            "EOF  ",
        ]
    );
}

#[test]
fn printers_agree_on_structure() {
    let statements = rlox::compile("print -1 + 2;").unwrap();
    assert_eq!(statements[0].to_string(), "(print (+ (- 1) 2))");
    assert_eq!(
        statements[0].dump(),
        "\
PrintStmt
└── BinaryExpr
    └── PLUS
        ├── UnaryExpr
        │   └── MINUS
        │       └── LiteralExpr
        │           └── 1
        └── LiteralExpr
            └── 2
"
    );
}

fn operator() -> impl Strategy<Value = (&'static str, TokenType)> {
    prop_oneof![
        Just(("+", TokenType::Plus)),
        Just(("-", TokenType::Minus)),
        Just(("*", TokenType::Star)),
        Just(("/", TokenType::Slash)),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn binary_root_carries_the_operator(
        left in 0u32..=1000,
        (lexeme, typ) in operator(),
        right in 0u32..=1000,
    ) {
        let source = format!("{left} {lexeme} {right}");
        match expression(&source) {
            Expr::Binary { operator, .. } => {
                prop_assert_eq!(operator.typ, typ);
                prop_assert_eq!(operator.lexeme.as_str(), lexeme);
            }
            other => prop_assert!(false, "expected a binary root, got {other:?}"),
        }
    }

    #[test]
    fn integer_arithmetic_prints_without_fraction(left in 0i64..10_000, right in 0i64..10_000) {
        let printed = output(&format!("print {left} + {right};"));
        prop_assert_eq!(printed, format!("{}\n", left + right));
    }
}
