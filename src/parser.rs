use std::iter::Peekable;
use std::slice::Iter;

use crate::error::ParseError;
use crate::expr::Expr;
use crate::stmt::Stmt;
use crate::token::Token;
use crate::token_type::TokenType::{self, *};
use crate::value::Value;

// parameters: parser, and a series of TokenType variants separated by |
// return option of next token
macro_rules! match_types {
    ($parser:ident, $( $variant:pat_param )|* ) => {
        $parser
            .tokens
            .next_if(|token| matches!(token.typ, $( $variant )|*))
    };
}

type ParseResult<T> = Result<T, ParseError>;

// deepest unary/grouping nesting accepted before reporting an error
const MAX_DEPTH: usize = 256;

/// Parses a token stream into statements.
///
/// Returns every statement that parsed cleanly together with all errors met
/// along the way; after an error the parser skips to the next statement
/// boundary and carries on.
#[tracing::instrument(level = "debug", skip_all, fields(tokens = tokens.len()))]
pub fn parse(tokens: &[Token]) -> (Vec<Stmt>, Vec<ParseError>) {
    let mut parser = Parser::new(tokens);
    let mut statements = Vec::new();
    let mut errors = Vec::new();

    while !parser.is_at_end() {
        let remaining = parser.tokens.len();
        match parser.statement() {
            Ok(stmt) => statements.push(stmt),
            Err(error) => {
                tracing::trace!(%error, "synchronizing");
                errors.push(error);
                parser.synchronize(parser.tokens.len() < remaining);
            }
        }
    }

    tracing::debug!(
        statements = statements.len(),
        errors = errors.len(),
        "parsed tokens"
    );
    (statements, errors)
}

/// Parses a single expression, ignoring anything after it. Used by tools and
/// tests that work on bare expressions rather than programs.
pub fn parse_expression(tokens: &[Token]) -> ParseResult<Expr> {
    Parser::new(tokens).expression()
}

struct Parser<'a> {
    tokens: Peekable<Iter<'a, Token>>,
    // synthesized EOF used when the token stream ends without one
    eof: Token,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        let line_count = match tokens.last() {
            Some(token) => token.line,
            None => 1,
        };

        Parser {
            tokens: tokens.iter().peekable(),
            eof: Token::eof(line_count),
            depth: 0,
        }
    }

    fn peek(&mut self) -> Option<&'a Token> {
        self.tokens.peek().copied()
    }

    fn is_at_end(&mut self) -> bool {
        self.peek().map_or(true, |token| token.typ == Eof)
    }

    /// Consumes the next token, never stepping past EOF.
    fn advance(&mut self) -> Option<&'a Token> {
        if self.is_at_end() {
            None
        } else {
            self.tokens.next()
        }
    }

    fn consume(&mut self, typ: TokenType, message: &str) -> ParseResult<&'a Token> {
        match self.tokens.next_if(|token| token.typ == typ) {
            Some(token) => Ok(token),
            None => Err(self.error(message)),
        }
    }

    /// Builds an error pointing at the upcoming token without consuming it.
    fn error(&mut self, message: &str) -> ParseError {
        let token = self.peek().unwrap_or(&self.eof);
        ParseError::at(token, message)
    }

    /// Discards tokens up to the next likely statement boundary: just past a
    /// semicolon, or before a keyword that starts a statement.
    ///
    /// When the failed statement consumed nothing, the offending token is
    /// always skipped so the parser makes progress.
    fn synchronize(&mut self, consumed: bool) {
        if consumed && self.peek().is_some_and(|next| next.typ.begins_statement()) {
            return;
        }

        while let Some(token) = self.advance() {
            if token.typ == Semicolon {
                return;
            }
            if self.peek().is_some_and(|next| next.typ.begins_statement()) {
                return;
            }
        }
    }

    /// Runs `parse` one nesting level deeper, failing once `MAX_DEPTH` is hit.
    fn nested<T>(&mut self, parse: impl FnOnce(&mut Self) -> ParseResult<T>) -> ParseResult<T> {
        if self.depth >= MAX_DEPTH {
            return Err(self.error("Expression nests too deeply."));
        }

        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn statement(&mut self) -> ParseResult<Stmt> {
        if match_types!(self, Print).is_some() {
            self.print_statement()
        } else {
            self.expression_statement()
        }
    }

    fn print_statement(&mut self) -> ParseResult<Stmt> {
        let value = self.expression()?;
        self.consume(Semicolon, "Expect ';' after value.")?;

        Ok(Stmt::Print {
            expression: Box::new(value),
        })
    }

    fn expression_statement(&mut self) -> ParseResult<Stmt> {
        let expression = self.expression()?;
        self.consume(Semicolon, "Expect ';' after expression.")?;

        Ok(Stmt::Expression {
            expression: Box::new(expression),
        })
    }

    fn expression(&mut self) -> ParseResult<Expr> {
        self.equality()
    }

    fn equality(&mut self) -> ParseResult<Expr> {
        let mut expr = self.comparison()?;

        while let Some(operator) = match_types!(self, BangEqual | EqualEqual) {
            let right = self.comparison()?;
            expr = Expr::binary(expr, operator.clone(), right);
        }

        Ok(expr)
    }

    fn comparison(&mut self) -> ParseResult<Expr> {
        let mut expr = self.term()?;

        while let Some(operator) = match_types!(self, Greater | GreaterEqual | Less | LessEqual) {
            let right = self.term()?;
            expr = Expr::binary(expr, operator.clone(), right);
        }

        Ok(expr)
    }

    fn term(&mut self) -> ParseResult<Expr> {
        let mut expr = self.factor()?;

        while let Some(operator) = match_types!(self, Minus | Plus) {
            let right = self.factor()?;
            expr = Expr::binary(expr, operator.clone(), right);
        }

        Ok(expr)
    }

    fn factor(&mut self) -> ParseResult<Expr> {
        let mut expr = self.unary()?;

        while let Some(operator) = match_types!(self, Slash | Star) {
            let right = self.unary()?;
            expr = Expr::binary(expr, operator.clone(), right);
        }

        Ok(expr)
    }

    fn unary(&mut self) -> ParseResult<Expr> {
        if let Some(operator) = match_types!(self, Bang | Minus) {
            let right = self.nested(Self::unary)?;
            Ok(Expr::unary(operator.clone(), right))
        } else {
            self.primary()
        }
    }

    fn primary(&mut self) -> ParseResult<Expr> {
        let Some(token) = match_types!(self, False | True | Nil | Number | StringToken | LeftParen)
        else {
            return Err(self.error("Expect expression."));
        };

        match token.typ {
            False => Ok(Expr::literal(false)),
            True => Ok(Expr::literal(true)),
            Nil => Ok(Expr::literal(Value::Nil)),
            Number | StringToken => Ok(Expr::literal(&token.literal)),
            _ => {
                let expr = self.nested(Self::expression)?;
                self.consume(RightParen, "Expect ')' after expression.")?;
                Ok(Expr::grouping(expr))
            }
        }
    }
}
