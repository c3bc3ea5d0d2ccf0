use lazy_static::lazy_static;
use std::collections::HashMap;
use std::iter::Peekable;
use std::mem;
use std::str::Chars;

use crate::error::ScanError;
use crate::token::{Literal, Token};
use crate::token_type::TokenType::{self, *};

lazy_static! {
    static ref KEYWORDS: HashMap<&'static str, TokenType> = HashMap::from([
        ("and", And),
        ("class", Class),
        ("else", Else),
        ("false", False),
        ("for", For),
        ("fun", Fun),
        ("if", If),
        ("nil", Nil),
        ("or", Or),
        ("print", Print),
        ("return", Return),
        ("super", Super),
        ("this", This),
        ("true", True),
        ("var", Var),
        ("while", While),
    ]);
}

pub struct Scanner<'a> {
    source: Peekable<Chars<'a>>,
    tokens: Vec<Token>,
    errors: Vec<ScanError>,
    // lexeme of the token being scanned
    text: String,
    line: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Scanner {
            source: source.chars().peekable(),
            tokens: Vec::new(),
            errors: Vec::new(),
            text: String::new(),
            line: 1,
        }
    }

    /// Scans the whole source. The token list always ends with an EOF token,
    /// even when errors were recorded along the way.
    pub fn scan_tokens(mut self) -> (Vec<Token>, Vec<ScanError>) {
        while let Some(c) = self.source.next() {
            self.text.clear();
            self.text.push(c);
            self.scan_token(c);
        }

        self.tokens.push(Token::eof(self.line));

        tracing::debug!(
            tokens = self.tokens.len(),
            errors = self.errors.len(),
            lines = self.line,
            "scanned source"
        );
        (self.tokens, self.errors)
    }

    fn scan_token(&mut self, c: char) {
        match c {
            '(' => self.add_token(LeftParen),
            ')' => self.add_token(RightParen),
            '{' => self.add_token(LeftBrace),
            '}' => self.add_token(RightBrace),
            ',' => self.add_token(Comma),
            '.' => self.add_token(Dot),
            '-' => self.add_token(Minus),
            '+' => self.add_token(Plus),
            ';' => self.add_token(Semicolon),
            '*' => self.add_token(Star),
            '!' => {
                let matched = self.match_next('=');
                self.add_token(if matched { BangEqual } else { Bang })
            }
            '=' => {
                let matched = self.match_next('=');
                self.add_token(if matched { EqualEqual } else { Equal })
            }
            '<' => {
                let matched = self.match_next('=');
                self.add_token(if matched { LessEqual } else { Less })
            }
            '>' => {
                let matched = self.match_next('=');
                self.add_token(if matched { GreaterEqual } else { Greater })
            }
            '/' => {
                if self.match_next('/') {
                    // the newline itself is left for the next iteration
                    while self.source.next_if(|&c| c != '\n').is_some() {}
                } else {
                    self.add_token(Slash);
                }
            }
            ' ' | '\r' | '\t' => {}
            '\n' => self.line += 1,
            '"' => self.scan_string(),
            _ => {
                if is_digit(c) {
                    self.scan_number();
                } else if is_alpha(c) {
                    self.scan_identifier();
                } else {
                    self.error(format!("Unexpected character '{c}'."));
                }
            }
        }
    }

    fn scan_string(&mut self) {
        while let Some(c) = self.source.next_if(|&c| c != '"') {
            if c == '\n' {
                self.line += 1;
            }
            self.text.push(c);
        }

        // closing "
        if !self.match_next('"') {
            self.error("Unterminated string.".to_owned());
            return;
        }

        let value = self.text[1..self.text.len() - 1].to_owned();
        self.add_literal_token(StringToken, Literal::StringLiteral(value));
    }

    fn scan_number(&mut self) {
        self.advance_digits();

        // a '.' only belongs to the number when a digit follows it
        if self.source.peek() == Some(&'.') {
            // clone the source iterator so that we can peek 2 characters ahead
            let mut cloned = self.source.clone();
            cloned.next();
            if cloned.peek().copied().is_some_and(is_digit) {
                self.match_next('.');
                self.advance_digits();
            }
        }

        match self.text.parse() {
            Ok(value) => self.add_literal_token(Number, Literal::F64(value)),
            Err(_) => self.error(format!("Invalid number '{}'.", self.text)),
        }
    }

    fn advance_digits(&mut self) {
        while let Some(c) = self.source.next_if(|&c| is_digit(c)) {
            self.text.push(c);
        }
    }

    fn scan_identifier(&mut self) {
        while let Some(c) = self.source.next_if(|&c| is_alpha_num(c)) {
            self.text.push(c);
        }

        let typ = *KEYWORDS.get(self.text.as_str()).unwrap_or(&Identifier);

        self.add_token(typ);
    }

    fn match_next(&mut self, expected: char) -> bool {
        match self.source.next_if_eq(&expected) {
            Some(c) => {
                self.text.push(c);
                true
            }
            None => false,
        }
    }

    fn add_token(&mut self, typ: TokenType) {
        self.add_literal_token(typ, Literal::None);
    }

    fn add_literal_token(&mut self, typ: TokenType, literal: Literal) {
        let lexeme = mem::take(&mut self.text);

        self.tokens.push(Token {
            typ,
            lexeme,
            literal,
            line: self.line,
        });
    }

    fn error(&mut self, message: String) {
        tracing::trace!(line = self.line, %message, "scan error");
        self.errors.push(ScanError::new(self.line, message));
    }
}

fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

fn is_alpha(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_alpha_num(c: char) -> bool {
    is_alpha(c) || is_digit(c)
}
