use std::fmt;

use crate::token_type::TokenType;

/// Literal payload attached by the scanner to string and number tokens.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    StringLiteral(String),
    F64(f64),
    None,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub typ: TokenType,
    pub lexeme: String,
    pub literal: Literal,
    pub line: usize,
}

impl Token {
    pub fn new(typ: TokenType, lexeme: impl Into<String>, literal: Literal, line: usize) -> Self {
        Token {
            typ,
            lexeme: lexeme.into(),
            literal,
            line,
        }
    }

    pub fn eof(line: usize) -> Self {
        Token::new(TokenType::Eof, "", Literal::None, line)
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::StringLiteral(s) => write!(f, "{s}"),
            // keep the fractional part so numbers read as floats in token dumps
            Literal::F64(float) => write!(f, "{float:?}"),
            Literal::None => Ok(()),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.typ, self.lexeme, self.literal)
    }
}
