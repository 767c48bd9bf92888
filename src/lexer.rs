// ABOUTME: Lexer scanning source text into a flat token sequence using nom

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{char, multispace1},
    combinator::{recognize, value},
    multi::many0,
    IResult, Parser,
};

use crate::error::Error;
use crate::token::{SpannedToken, Token};

/// Characters that terminate a bare word (identifier or number)
fn is_delimiter(c: char) -> bool {
    c.is_whitespace() || matches!(c, '(' | ')' | '\'' | '`' | ',' | '"')
}

/// Parse a line comment: `;` through end-of-line
fn line_comment(input: &str) -> IResult<&str, ()> {
    let (input, _) = char(';')(input)?;
    let (input, _) = take_while(|c| c != '\n')(input)?;
    Ok((input, ()))
}

/// Skip whitespace and comments, keeping the consumed text for line counting
fn trivia(input: &str) -> IResult<&str, &str> {
    recognize(many0(alt((value((), multispace1), line_comment)))).parse(input)
}

fn punctuation(input: &str) -> IResult<&str, Token> {
    alt((
        value(Token::LeftParen, char('(')),
        value(Token::RightParen, char(')')),
        value(Token::Quote, char('\'')),
        value(Token::Quasiquote, char('`')),
        value(Token::Unquote, char(',')),
    ))
    .parse(input)
}

fn boolean(input: &str) -> IResult<&str, Token> {
    alt((
        value(Token::Bool(true), tag("#t")),
        value(Token::Bool(false), tag("#f")),
    ))
    .parse(input)
}

/// A maximal run of non-delimiter characters
fn word(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| !is_delimiter(c))(input)
}

/// Scan a string literal body; `rest` starts just after the opening quote.
/// `\n` escapes to a newline, any other escaped character stands for itself.
fn lex_string(rest: &str) -> Result<(&str, Token), Error> {
    let mut text = String::new();
    let mut chars = rest.char_indices();

    while let Some((i, c)) = chars.next() {
        match c {
            '"' => return Ok((&rest[i + 1..], Token::String(text))),
            '\\' => match chars.next() {
                Some((_, 'n')) => text.push('\n'),
                Some((_, escaped)) => text.push(escaped),
                None => return Err(Error::syntax("Unexpected end of string literal")),
            },
            other => text.push(other),
        }
    }

    Err(Error::syntax("Unexpected end of string literal"))
}

/// True when a numeric parse should be attempted: the word starts with a
/// digit, `.`, `+` or `-`, and the remainder is a plain decimal literal.
fn looks_numeric(text: &str) -> bool {
    let first = match text.chars().next() {
        Some(c) => c,
        None => return false,
    };
    if !first.is_ascii_digit() && !matches!(first, '.' | '+' | '-') {
        return false;
    }

    let digits = match first {
        '+' | '-' => &text[1..],
        _ => text,
    };

    let mut seen_dot = false;
    let mut seen_digit = false;
    for c in digits.chars() {
        match c {
            '0'..='9' => seen_digit = true,
            '.' if !seen_dot => seen_dot = true,
            _ => return false,
        }
    }
    seen_digit
}

fn classify_word(text: &str) -> Token {
    if text == "." {
        return Token::Dot;
    }
    if looks_numeric(text) {
        if let Ok(n) = text.parse::<f64>() {
            return Token::Number(n);
        }
    }
    Token::Identifier(text.to_string())
}

/// Transform source text into tokens, tracking 1-based line numbers
pub fn tokenize(source: &str) -> Result<Vec<SpannedToken>, Error> {
    let mut tokens = Vec::new();
    let mut rest = source;
    let mut line = 1;

    loop {
        let (after, skipped) = trivia(rest).unwrap_or((rest, ""));
        line += skipped.matches('\n').count();
        rest = after;

        if rest.is_empty() {
            return Ok(tokens);
        }

        if let Ok((after, token)) = punctuation(rest) {
            tokens.push(SpannedToken { token, line });
            rest = after;
            continue;
        }

        if rest.starts_with('#') {
            let (after, token) =
                boolean(rest).map_err(|_| Error::syntax("Unexpected character after #"))?;
            tokens.push(SpannedToken { token, line });
            rest = after;
            continue;
        }

        if let Some(body) = rest.strip_prefix('"') {
            let (after, token) = lex_string(body)?;
            let consumed = &rest[..rest.len() - after.len()];
            tokens.push(SpannedToken { token, line });
            line += consumed.matches('\n').count();
            rest = after;
            continue;
        }

        let (after, text) =
            word(rest).map_err(|_| Error::syntax(format!("Unexpected character {:?}", rest)))?;
        tokens.push(SpannedToken {
            token: classify_word(text),
            line,
        });
        rest = after;
    }
}
