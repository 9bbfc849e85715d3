use std::fmt::Display;

use itertools::Itertools;

use crate::{
    error::Error,
    operator,
    token::{Number, Operator, Symbol, Token, TokenKind},
};

/// Turns source text into tokens and hands them out front to back.
///
/// Tokens are kept as a stack with the first token on top, so [`Lexer::next`]
/// is a pop and [`Lexer::roll_back`] a push.
#[derive(Clone, Debug)]
pub struct Lexer {
    stack: Vec<Token>,
    end: usize,
}

impl Lexer {
    pub fn new(source: &str) -> Result<Self, Error> {
        let scanned = scan(source)?;
        let end = source.chars().count();
        let mut tokens = merge_adjacent_numbers(scanned)?;
        tokens = merge_decimal_points(tokens)?;
        tokens = merge_adjacent_symbols(tokens);
        tokens = symbols_to_operators(tokens);
        tokens.push(Token::eof(end));
        log::trace!("tokens: {}", tokens.iter().join(" "));
        tokens.reverse();
        Ok(Lexer { stack: tokens, end })
    }

    /// Pops the next token. Past the end this keeps returning end markers.
    pub fn next(&mut self) -> Token {
        self.stack.pop().unwrap_or_else(|| Token::eof(self.end))
    }

    pub fn peek(&self) -> &TokenKind {
        self.stack.last().map(|t| &t.kind).unwrap_or(&TokenKind::Eof)
    }

    /// Pushes `token` back so the next call to [`Lexer::next`] returns it.
    pub fn roll_back(&mut self, token: Token) {
        self.stack.push(token);
    }

    /// Remaining tokens in reading order.
    pub fn tokens(&self) -> Vec<Token> {
        self.stack.iter().rev().cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }
}

impl Display for Lexer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.stack.iter().rev().join("\n"))
    }
}

/// One token per non-whitespace character: operator characters become
/// operators, digits one-digit numbers, anything else a one-letter symbol.
fn scan(source: &str) -> Result<Vec<Token>, Error> {
    let mut tokens = Vec::with_capacity(source.len());
    for (pos, c) in source.chars().enumerate() {
        if c.is_whitespace() {
            continue;
        }
        let span = pos..pos + 1;
        let text = c.to_string();
        let kind = if operator::is_operator_char(c) {
            TokenKind::from(Operator::new(&text).map_err(|e| e.at(span.clone()))?)
        } else if c.is_ascii_digit() {
            TokenKind::from(Number::new(text).map_err(|e| e.at(span.clone()))?)
        } else {
            TokenKind::from(Symbol::new(text))
        };
        tokens.push(Token::new(kind, span));
    }
    Ok(tokens)
}

/// Collapses runs of numbers into one: `1 2 3` becomes `123`.
fn merge_adjacent_numbers(mut tokens: Vec<Token>) -> Result<Vec<Token>, Error> {
    let mut merged: Vec<Token> = Vec::with_capacity(tokens.len());
    while let Some(mut tail) = tokens.pop() {
        if let Some(head) = merged.pop() {
            match (&mut tail.kind, &head.kind) {
                (TokenKind::Number(lhs), TokenKind::Number(rhs)) => {
                    lhs.merge_with(rhs).map_err(|e| e.at(head.span.clone()))?;
                    tail.cover(&head.span);
                }
                _ => merged.push(head),
            }
        }
        merged.push(tail);
    }
    merged.reverse();
    log::trace!("merged numbers: {}", merged.iter().join(" "));
    Ok(merged)
}

/// Rewrites `number . number` into one decimal number. Scans from the back
/// and never reuses a number it already produced, so `1.2.3` leaves
/// `1 . 2.3`.
fn merge_decimal_points(mut tokens: Vec<Token>) -> Result<Vec<Token>, Error> {
    let mut merged: Vec<Token> = Vec::with_capacity(tokens.len());
    while let Some(tail) = tokens.pop() {
        if let TokenKind::Number(frac) = &tail.kind {
            let n = tokens.len();
            if n >= 2
                && tokens[n - 1].is_operator(".")
                && matches!(tokens[n - 2].kind, TokenKind::Number(_))
            {
                tokens.pop();
                if let Some(mut head) = tokens.pop() {
                    if let TokenKind::Number(int) = &mut head.kind {
                        int.dot_point(frac).map_err(|e| e.at(tail.span.clone()))?;
                    }
                    head.cover(&tail.span);
                    merged.push(head);
                    continue;
                }
            }
        }
        merged.push(tail);
    }
    merged.reverse();
    log::trace!("merged decimal points: {}", merged.iter().join(" "));
    Ok(merged)
}

/// Collapses runs of symbols into one name: `s i n` becomes `sin`.
fn merge_adjacent_symbols(mut tokens: Vec<Token>) -> Vec<Token> {
    let mut merged: Vec<Token> = Vec::with_capacity(tokens.len());
    while let Some(mut tail) = tokens.pop() {
        if let Some(head) = merged.pop() {
            match (&mut tail.kind, &head.kind) {
                (TokenKind::Symbol(lhs), TokenKind::Symbol(rhs)) => {
                    lhs.merge_with(rhs);
                    tail.cover(&head.span);
                }
                _ => merged.push(head),
            }
        }
        merged.push(tail);
    }
    merged.reverse();
    log::trace!("merged symbols: {}", merged.iter().join(" "));
    merged
}

/// Symbols spelling an operator name become that operator.
fn symbols_to_operators(tokens: Vec<Token>) -> Vec<Token> {
    tokens
        .into_iter()
        .map(|token| match &token.kind {
            TokenKind::Symbol(sym) => match Operator::new(sym.name()) {
                Ok(op) => Token::new(op, token.span),
                Err(_) => token,
            },
            _ => token,
        })
        .collect()
}
