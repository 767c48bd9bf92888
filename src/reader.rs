// ABOUTME: Recursive-descent reader producing cons-cell values from tokens

use crate::error::Error;
use crate::token::{SpannedToken, Token};
use crate::value::Value;
use std::collections::VecDeque;

/// Consumes tokens front-to-back and produces Values. There is no separate
/// AST: the reader builds the same pair/atom structure the evaluator walks,
/// which is what keeps `quote` and `eval` symmetric.
pub struct Reader {
    tokens: VecDeque<SpannedToken>,
    span: (usize, usize),
}

impl Reader {
    pub fn new(tokens: Vec<SpannedToken>) -> Self {
        Reader {
            tokens: tokens.into(),
            span: (1, 1),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Line range of the most recently read top-level datum
    pub fn line_span(&self) -> (usize, usize) {
        self.span
    }

    /// Reads one datum from the front of the token queue
    pub fn parse(&mut self) -> Result<Value, Error> {
        match self.tokens.front() {
            Some(front) => self.span = (front.line, front.line),
            None => return Err(Error::syntax("Empty tokens")),
        }
        self.parse_value()
    }

    fn next(&mut self) -> Result<Token, Error> {
        match self.tokens.pop_front() {
            Some(spanned) => {
                self.span.1 = spanned.line;
                Ok(spanned.token)
            }
            None => Err(Error::syntax("Unmatched parens")),
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.front().map(|spanned| &spanned.token)
    }

    fn parse_value(&mut self) -> Result<Value, Error> {
        match self.next()? {
            Token::Bool(b) => Ok(Value::Bool(b)),
            Token::Number(n) => Ok(Value::Number(n)),
            Token::String(s) => Ok(Value::String(s)),
            Token::Identifier(name) => Ok(Value::Symbol(name)),
            Token::LeftParen => self.parse_tail(),
            Token::Quote => self.wrap("quote"),
            Token::Quasiquote => self.wrap("quasiquote"),
            Token::Unquote => self.wrap("unquote"),
            Token::RightParen => Err(Error::syntax("Unmatched parens")),
            Token::Dot => Err(Error::syntax("Unexpected dot")),
        }
    }

    /// 'x becomes (quote x), and likewise for quasiquote and unquote
    fn wrap(&mut self, symbol: &str) -> Result<Value, Error> {
        let datum = self.parse_value()?;
        Ok(Value::cons(
            Value::symbol(symbol),
            Value::cons(datum, Value::Nil),
        ))
    }

    /// List body after the opening paren has been consumed
    fn parse_tail(&mut self) -> Result<Value, Error> {
        match self.peek() {
            None => Err(Error::syntax("Unmatched parens")),
            Some(Token::RightParen) => {
                self.next()?;
                Ok(Value::Nil)
            }
            Some(_) => {
                let car = self.parse_value()?;
                if let Some(Token::Dot) = self.peek() {
                    self.next()?;
                    let cdr = self.parse_value()?;
                    match self.peek() {
                        Some(Token::RightParen) => {
                            self.next()?;
                            Ok(Value::cons(car, cdr))
                        }
                        _ => Err(Error::syntax("Unmatched parens")),
                    }
                } else {
                    let cdr = self.parse_tail()?;
                    Ok(Value::cons(car, cdr))
                }
            }
        }
    }
}
