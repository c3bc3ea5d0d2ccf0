use std::io::Write;

use crate::error::RuntimeError;
use crate::expr::Expr;
use crate::stmt::Stmt;
use crate::token::Token;
use crate::token_type::TokenType;
use crate::value::Value::{self, *};

type EvalResult<T> = Result<T, RuntimeError>;

/// Executes `statements` in order, writing printed values to `out`.
///
/// The first runtime error stops the run; statements after it are not executed.
#[tracing::instrument(level = "debug", skip_all, fields(statements = statements.len()))]
pub fn interpret<W: Write>(statements: &[Stmt], mut out: W) -> EvalResult<()> {
    for statement in statements {
        tracing::trace!(%statement, "executing");
        if let Err(error) = statement.execute(&mut out) {
            tracing::debug!(line = error.line(), %error, "runtime error");
            return Err(error);
        }
    }
    out.flush()?;
    Ok(())
}

/// Evaluates a single expression to a value.
pub fn evaluate(expr: &Expr) -> EvalResult<Value> {
    expr.evaluate()
}

trait Execute {
    fn execute(&self, out: &mut dyn Write) -> EvalResult<()>;
}

trait Evaluate {
    fn evaluate(&self) -> EvalResult<Value>;
}

impl Execute for Stmt {
    fn execute(&self, out: &mut dyn Write) -> EvalResult<()> {
        match self {
            Stmt::Print { expression } => {
                let value = expression.evaluate()?;
                writeln!(out, "{value}")?;
            }
            Stmt::Expression { expression } => {
                expression.evaluate()?;
            }
        };
        Ok(())
    }
}

impl Evaluate for Expr {
    fn evaluate(&self) -> EvalResult<Value> {
        match self {
            Expr::Binary {
                left,
                operator,
                right,
            } => {
                let left = left.evaluate()?;
                let right = right.evaluate()?;
                binary(operator, left, right)
            }
            Expr::Grouping { expression } => expression.evaluate(),
            Expr::LiteralExpr { value } => Ok(value.clone()),
            Expr::Unary { operator, right } => {
                let right = right.evaluate()?;
                match operator.typ {
                    TokenType::Bang => Ok(Bool(!right.is_truthy())),
                    TokenType::Minus => match right {
                        Number(value) => Ok(Number(-value)),
                        _ => Err(RuntimeError::operand(operator, "Operand must be a number.")),
                    },
                    _ => Err(RuntimeError::operand(operator, "Expected a unary operator.")),
                }
            }
        }
    }
}

fn binary(operator: &Token, left: Value, right: Value) -> EvalResult<Value> {
    match operator.typ {
        TokenType::Plus => match (left, right) {
            (Number(n1), Number(n2)) => Ok(Number(n1 + n2)),
            (Str(s1), Str(s2)) => Ok(Str(s1 + &s2)),
            _ => Err(RuntimeError::operand(
                operator,
                "Operands must be two numbers or two strings.",
            )),
        },
        TokenType::Minus => {
            let (left, right) = numeric_operands(operator, left, right)?;
            Ok(Number(left - right))
        }
        TokenType::Slash => {
            let (left, right) = numeric_operands(operator, left, right)?;
            Ok(Number(left / right))
        }
        TokenType::Star => {
            let (left, right) = numeric_operands(operator, left, right)?;
            Ok(Number(left * right))
        }
        TokenType::Greater => {
            let (left, right) = numeric_operands(operator, left, right)?;
            Ok(Bool(left > right))
        }
        TokenType::GreaterEqual => {
            let (left, right) = numeric_operands(operator, left, right)?;
            Ok(Bool(left >= right))
        }
        TokenType::Less => {
            let (left, right) = numeric_operands(operator, left, right)?;
            Ok(Bool(left < right))
        }
        TokenType::LessEqual => {
            let (left, right) = numeric_operands(operator, left, right)?;
            Ok(Bool(left <= right))
        }
        TokenType::BangEqual => Ok(Bool(!is_equal(&left, &right))),
        TokenType::EqualEqual => Ok(Bool(is_equal(&left, &right))),
        _ => Err(RuntimeError::operand(operator, "Expected a binary operator.")),
    }
}

fn numeric_operands(operator: &Token, left: Value, right: Value) -> EvalResult<(f64, f64)> {
    match (left, right) {
        (Number(left), Number(right)) => Ok((left, right)),
        (left, right) => {
            tracing::trace!(
                left = left.type_name(),
                right = right.type_name(),
                "non-numeric operands"
            );
            Err(RuntimeError::operand(operator, "Operands must be numbers."))
        }
    }
}

/// Values of different types are never equal; nil only equals nil.
fn is_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Nil, Nil) => true,
        (Bool(b1), Bool(b2)) => b1 == b2,
        (Number(n1), Number(n2)) => n1 == n2,
        (Str(s1), Str(s2)) => s1 == s2,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::parser::{parse, parse_expression};
    use crate::scanner::Scanner;

    fn eval(source: &str) -> EvalResult<Value> {
        let (tokens, _) = Scanner::new(source).scan_tokens();
        let expr = parse_expression(&tokens).expect("expression should parse");
        evaluate(&expr)
    }

    fn run(source: &str) -> (String, EvalResult<()>) {
        let (tokens, _) = Scanner::new(source).scan_tokens();
        let (statements, errors) = parse(&tokens);
        assert!(errors.is_empty(), "{errors:?}");

        let mut out = Vec::new();
        let result = interpret(&statements, &mut out);
        (String::from_utf8(out).expect("output is utf-8"), result)
    }

    #[test]
    fn arithmetic() {
        assert_eq!(eval("1 + 2 * 3").unwrap(), Number(7.0));
        assert_eq!(eval("(1 + 2) * 3").unwrap(), Number(9.0));
        assert_eq!(eval("10 / 4 - 1").unwrap(), Number(1.5));
        assert_eq!(eval("-(3)").unwrap(), Number(-3.0));
        assert_eq!(eval("1 / 0").unwrap(), Number(f64::INFINITY));
    }

    #[test]
    fn concatenation() {
        assert_eq!(eval("\"a\" + \"b\"").unwrap(), Str("ab".into()));
    }

    #[test]
    fn comparison() {
        assert_eq!(eval("1 < 2").unwrap(), Bool(true));
        assert_eq!(eval("2 <= 2").unwrap(), Bool(true));
        assert_eq!(eval("1 > 2").unwrap(), Bool(false));
        assert_eq!(eval("3 >= 4").unwrap(), Bool(false));
    }

    #[test]
    fn truthiness() {
        assert_eq!(eval("!nil").unwrap(), Bool(true));
        assert_eq!(eval("!0").unwrap(), Bool(false));
        assert_eq!(eval("!\"\"").unwrap(), Bool(false));
        assert_eq!(eval("!false").unwrap(), Bool(true));
        assert_eq!(eval("!!true").unwrap(), Bool(true));
    }

    #[test]
    fn equality() {
        assert_eq!(eval("nil == nil").unwrap(), Bool(true));
        assert_eq!(eval("nil == false").unwrap(), Bool(false));
        assert_eq!(eval("1 == \"1\"").unwrap(), Bool(false));
        assert_eq!(eval("\"x\" == \"x\"").unwrap(), Bool(true));
        assert_eq!(eval("1 != 2").unwrap(), Bool(true));
        assert_eq!(eval("true != true").unwrap(), Bool(false));
    }

    #[test]
    fn operand_type_mismatch_is_a_runtime_error() {
        let error = eval("-\"a\"").unwrap_err();
        assert_eq!(error.to_string(), "Operand must be a number.\n[line 1]");

        let error = eval("1 + \"a\"").unwrap_err();
        assert_eq!(
            error.to_string(),
            "Operands must be two numbers or two strings.\n[line 1]"
        );

        let error = eval("\n\ntrue < 1").unwrap_err();
        assert_eq!(error.line(), Some(3));
        assert_eq!(error.to_string(), "Operands must be numbers.\n[line 3]");
    }

    #[test]
    fn print_writes_rendered_values() {
        let (out, result) = run("print 1 + 2; print \"a\" + \"b\"; print nil == nil; print 1 == \"1\"; print 2.5; print nil;");
        assert!(result.is_ok());
        assert_eq!(out, "3\nab\ntrue\nfalse\n2.5\nnil\n");
    }

    #[test]
    fn expression_statement_prints_nothing() {
        let (out, result) = run("1 + 2;");
        assert!(result.is_ok());
        assert_eq!(out, "");
    }

    #[test]
    fn runtime_error_stops_remaining_statements() {
        let (out, result) = run("print 1;\nprint -nil;\nprint 2;");
        assert_eq!(out, "1\n");
        assert_eq!(result.unwrap_err().line(), Some(2));
    }
}
