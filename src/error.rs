use std::io;

use thiserror::Error;

use crate::token::Token;
use crate::token_type::TokenType;

/// A lexical error. Recorded by the scanner, which keeps going.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("[line {line}] Error: {message}")]
pub struct ScanError {
    pub line: usize,
    pub message: String,
}

impl ScanError {
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        ScanError {
            line,
            message: message.into(),
        }
    }
}

/// A syntax error, reported at the token where parsing went wrong.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("[line {line}] Error{location}: {message}")]
pub struct ParseError {
    pub line: usize,
    /// Either ` at 'lexeme'` or ` at end`.
    pub location: String,
    pub message: String,
}

impl ParseError {
    pub fn at(token: &Token, message: impl Into<String>) -> Self {
        let location = match token.typ {
            TokenType::Eof => " at end".to_owned(),
            _ => format!(" at '{}'", token.lexeme),
        };

        ParseError {
            line: token.line,
            location,
            message: message.into(),
        }
    }
}

/// Aborts the statement sequence being interpreted.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("{message}\n[line {line}]")]
    Operand { line: usize, message: &'static str },
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
}

impl RuntimeError {
    pub fn operand(operator: &Token, message: &'static str) -> Self {
        RuntimeError::Operand {
            line: operator.line,
            message,
        }
    }

    pub fn line(&self) -> Option<usize> {
        match self {
            RuntimeError::Operand { line, .. } => Some(*line),
            RuntimeError::Output(_) => None,
        }
    }
}

/// Everything that can stop one run of source text through the pipeline.
#[derive(Debug, Error)]
pub enum LoxError {
    #[error("{}", join_lines(.0))]
    Scan(Vec<ScanError>),
    #[error("{}", join_lines(.0))]
    Parse(Vec<ParseError>),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl LoxError {
    pub fn exit_code(&self) -> i32 {
        match self {
            LoxError::Scan(_) | LoxError::Parse(_) => 65,
            LoxError::Runtime(_) => 70,
        }
    }
}

fn join_lines<E: ToString>(errors: &[E]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::token::Literal;

    #[test]
    fn parse_error_location() {
        let semicolon = Token::new(TokenType::Semicolon, ";", Literal::None, 2);
        let error = ParseError::at(&semicolon, "Expect expression.");
        assert_eq!(error.to_string(), "[line 2] Error at ';': Expect expression.");

        let error = ParseError::at(&Token::eof(4), "Expect ';' after value.");
        assert_eq!(error.to_string(), "[line 4] Error at end: Expect ';' after value.");
    }

    #[test]
    fn batches_render_one_per_line() {
        let error = LoxError::Scan(vec![
            ScanError::new(1, "Unexpected character '#'."),
            ScanError::new(3, "Unterminated string."),
        ]);
        assert_eq!(
            error.to_string(),
            "[line 1] Error: Unexpected character '#'.\n[line 3] Error: Unterminated string."
        );
        assert_eq!(error.exit_code(), 65);
    }

    #[test]
    fn runtime_error_names_its_line() {
        let minus = Token::new(TokenType::Minus, "-", Literal::None, 7);
        let error = RuntimeError::operand(&minus, "Operand must be a number.");
        assert_eq!(error.line(), Some(7));
        assert_eq!(error.to_string(), "Operand must be a number.\n[line 7]");
        assert_eq!(LoxError::from(error).exit_code(), 70);
    }
}
