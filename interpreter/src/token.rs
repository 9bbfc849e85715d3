use std::{
    fmt::Display,
    ops::{Deref, DerefMut, Range},
};

use num::Zero;

use crate::{
    error::{Error, ErrorKind},
    operator,
};

/// A numeric literal. The text always parses as an `f64`.
#[derive(Clone, Debug, PartialEq)]
pub struct Number {
    text: String,
    value: f64,
}

impl Number {
    pub fn new(text: impl Into<String>) -> Result<Self, ErrorKind> {
        let text = text.into();
        let value = Self::check(&text)?;
        Ok(Number { text, value })
    }

    fn check(text: &str) -> Result<f64, ErrorKind> {
        text.parse::<f64>()
            .map_err(|_| ErrorKind::InvalidToken(text.to_string()))
    }

    pub fn check_valid(&self) -> Result<(), ErrorKind> {
        Self::check(&self.text).map(|_| ())
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Appends the digits of `other`. Fails and leaves `self` untouched if
    /// the result is not a number.
    pub fn merge_with(&mut self, other: &Number) -> Result<(), ErrorKind> {
        let text = format!("{}{}", self.text, other.text);
        self.value = Self::check(&text)?;
        self.text = text;
        Ok(())
    }

    /// Joins `self` and `other` around a decimal point: `12` and `34` become
    /// `12.34`.
    pub fn dot_point(&mut self, other: &Number) -> Result<(), ErrorKind> {
        let text = format!("{}.{}", self.text, other.text);
        self.value = Self::check(&text)?;
        self.text = text;
        Ok(())
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Number {
            text: value.to_string(),
            value,
        }
    }
}

impl Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// A free variable. Any name is allowed; the value stays unset until
/// [`Symbol::assign`] is called.
#[derive(Clone, Debug, PartialEq)]
pub struct Symbol {
    name: String,
    value: Option<f64>,
}

impl Symbol {
    pub fn new(name: impl Into<String>) -> Self {
        Symbol {
            name: name.into(),
            value: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn merge_with(&mut self, other: &Symbol) {
        self.name.push_str(&other.name);
    }

    /// Last assignment wins.
    pub fn assign(&mut self, value: f64) {
        self.value = Some(value);
    }

    pub fn bound(&self) -> Option<f64> {
        self.value
    }

    pub fn is_bound(&self) -> bool {
        self.value.is_some()
    }

    /// Unbound symbols evaluate to 0.
    pub fn value(&self) -> f64 {
        match self.value {
            Some(v) => v,
            None => {
                log::debug!("unbound symbol {:?} evaluated as 0", self.name);
                f64::zero()
            }
        }
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Operator {
    symbol: &'static str,
}

impl Operator {
    pub fn new(text: &str) -> Result<Self, ErrorKind> {
        operator::lookup(text)
            .map(|symbol| Operator { symbol })
            .ok_or_else(|| ErrorKind::InvalidOperator(text.to_string()))
    }

    pub fn as_str(&self) -> &'static str {
        self.symbol
    }

    pub fn is(&self, symbol: &str) -> bool {
        self.symbol == symbol
    }

    pub fn is_prefix(&self) -> bool {
        operator::is_prefix(self.symbol)
    }

    pub fn is_postfix(&self) -> bool {
        operator::is_postfix(self.symbol)
    }

    pub fn fixity(&self) -> operator::Fixity {
        operator::fixity(self.symbol)
    }

    pub fn semantic_function(&self, arity: usize) -> Result<operator::SemanticFn, ErrorKind> {
        operator::semantic_function(self.symbol, arity).ok_or_else(|| {
            ErrorKind::UnsupportedArity {
                symbol: self.symbol.to_string(),
                arity,
            }
        })
    }

    pub fn apply(&self, operands: &[f64]) -> Result<f64, ErrorKind> {
        Ok(self.semantic_function(operands.len())?(operands))
    }

    pub fn eval(&self, operands: &[Atom]) -> Result<f64, ErrorKind> {
        let values: Vec<f64> = operands.iter().map(Atom::value).collect();
        self.apply(&values)
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol)
    }
}

/// The leaf payload of an expression: a number or a symbol.
#[derive(Clone, Debug, PartialEq)]
pub enum Atom {
    Number(Number),
    Symbol(Symbol),
}

impl Atom {
    pub fn value(&self) -> f64 {
        match self {
            Atom::Number(num) => num.value(),
            Atom::Symbol(sym) => sym.value(),
        }
    }

    /// Like [`Atom::value`] but refuses unbound symbols.
    pub fn value_strict(&self) -> Result<f64, ErrorKind> {
        match self {
            Atom::Number(num) => Ok(num.value()),
            Atom::Symbol(sym) => sym
                .bound()
                .ok_or_else(|| ErrorKind::UnboundVariable(sym.name().to_string())),
        }
    }

    /// Numbers and bound symbols.
    pub fn is_resolved(&self) -> bool {
        match self {
            Atom::Number(_) => true,
            Atom::Symbol(sym) => sym.is_bound(),
        }
    }
}

impl From<Number> for Atom {
    fn from(num: Number) -> Self {
        Atom::Number(num)
    }
}

impl From<Symbol> for Atom {
    fn from(sym: Symbol) -> Self {
        Atom::Symbol(sym)
    }
}

impl From<f64> for Atom {
    fn from(value: f64) -> Self {
        Atom::Number(value.into())
    }
}

impl Display for Atom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Atom::Number(num) => num.fmt(f),
            Atom::Symbol(sym) => sym.fmt(f),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    Number(Number),
    Operator(Operator),
    Symbol(Symbol),
    Eof,
}

impl TokenKind {
    pub fn check_valid(&self) -> Result<(), ErrorKind> {
        match self {
            TokenKind::Number(num) => num.check_valid(),
            TokenKind::Operator(op) => Operator::new(op.as_str()).map(|_| ()),
            TokenKind::Symbol(_) | TokenKind::Eof => Ok(()),
        }
    }

    pub fn value(&self) -> Result<f64, ErrorKind> {
        match self {
            TokenKind::Number(num) => Ok(num.value()),
            TokenKind::Symbol(sym) => Ok(sym.value()),
            _ => Err(self.unsupported("take the value of")),
        }
    }

    pub fn eval(&self, operands: &[Atom]) -> Result<f64, ErrorKind> {
        match self {
            TokenKind::Operator(op) => op.eval(operands),
            _ => Err(self.unsupported("evaluate")),
        }
    }

    /// Atoms give their value, operators apply themselves to `operands`.
    pub fn invoke(&self, operands: &[Atom]) -> Result<f64, ErrorKind> {
        match self {
            TokenKind::Number(_) | TokenKind::Symbol(_) => self.value(),
            TokenKind::Operator(_) => self.eval(operands),
            TokenKind::Eof => Err(ErrorKind::InvalidOperation(self.to_string())),
        }
    }

    pub fn as_operator(&self) -> Option<&Operator> {
        match self {
            TokenKind::Operator(op) => Some(op),
            _ => None,
        }
    }

    pub fn is_operator(&self, symbol: &str) -> bool {
        self.as_operator().map(|op| op.is(symbol)).unwrap_or(false)
    }

    pub fn is_eof(&self) -> bool {
        matches!(self, TokenKind::Eof)
    }

    fn unsupported(&self, operation: &'static str) -> ErrorKind {
        ErrorKind::UnsupportedOperation {
            operation,
            token: self.to_string(),
        }
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Number(num) => num.fmt(f),
            TokenKind::Operator(op) => op.fmt(f),
            TokenKind::Symbol(sym) => sym.fmt(f),
            TokenKind::Eof => write!(f, "<Eof>"),
        }
    }
}

impl From<Number> for TokenKind {
    fn from(num: Number) -> Self {
        TokenKind::Number(num)
    }
}

impl From<Operator> for TokenKind {
    fn from(op: Operator) -> Self {
        TokenKind::Operator(op)
    }
}

impl From<Symbol> for TokenKind {
    fn from(sym: Symbol) -> Self {
        TokenKind::Symbol(sym)
    }
}

impl From<Atom> for TokenKind {
    fn from(atom: Atom) -> Self {
        match atom {
            Atom::Number(num) => TokenKind::Number(num),
            Atom::Symbol(sym) => TokenKind::Symbol(sym),
        }
    }
}

/// A token and the characters of the source it covers.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Range<usize>,
}

impl Deref for Token {
    type Target = TokenKind;

    fn deref(&self) -> &Self::Target {
        &self.kind
    }
}

impl DerefMut for Token {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.kind
    }
}

impl Token {
    pub fn new(kind: impl Into<TokenKind>, span: Range<usize>) -> Self {
        Token {
            kind: kind.into(),
            span,
        }
    }

    pub fn eof(at: usize) -> Self {
        Token::new(TokenKind::Eof, at..at)
    }

    /// Widens the span to also cover `other`.
    pub fn cover(&mut self, other: &Range<usize>) {
        self.span = self.span.start.min(other.start)..self.span.end.max(other.end);
    }

    pub fn error(&self, kind: ErrorKind) -> Error {
        kind.at(self.span.clone())
    }

    pub fn unexpected(&self) -> Error {
        self.error(ErrorKind::UnexpectedToken(self.kind.to_string()))
    }

    pub fn check_valid(&self) -> Result<(), Error> {
        self.kind.check_valid().map_err(|kind| self.error(kind))
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.kind.fmt(f)
    }
}

impl TryFrom<Token> for Atom {
    type Error = Error;

    fn try_from(token: Token) -> Result<Self, Self::Error> {
        match token.kind {
            TokenKind::Number(num) => Ok(Atom::Number(num)),
            TokenKind::Symbol(sym) => Ok(Atom::Symbol(sym)),
            _ => Err(token.unexpected()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_construction() {
        assert_eq!(Number::new("123").unwrap().value(), 123.0);
        assert_eq!(Number::new("45.67").unwrap().value(), 45.67);
        assert_eq!(Number::from(123.45).value(), 123.45);
        assert_eq!(Number::from(123.45).as_str(), "123.45");
        assert_eq!(
            Number::new("abc"),
            Err(ErrorKind::InvalidToken("abc".into()))
        );
    }

    #[test]
    fn number_merging() {
        let mut num = Number::new("1").unwrap();
        num.merge_with(&Number::new("2").unwrap()).unwrap();
        num.merge_with(&Number::new("3").unwrap()).unwrap();
        assert_eq!(num.as_str(), "123");
        assert_eq!(num.value(), 123.0);

        let mut dec = Number::new("12").unwrap();
        dec.dot_point(&Number::new("34").unwrap()).unwrap();
        assert_eq!(dec.to_string(), "12.34");
        assert_eq!(dec.value(), 12.34);

        let mut bad = Number::new("1.5").unwrap();
        assert!(bad.merge_with(&Number::new("0.5").unwrap()).is_err());
        assert_eq!(bad.as_str(), "1.5");
    }

    #[test]
    fn operator_construction() {
        assert_eq!(Operator::new("+").unwrap().as_str(), "+");
        assert_eq!(Operator::new("sin").unwrap().to_string(), "sin");
        assert_eq!(
            Operator::new("invalid"),
            Err(ErrorKind::InvalidOperator("invalid".into()))
        );
        assert!(Operator::new("-").unwrap().is_prefix());
        assert!(Operator::new("!").unwrap().is_postfix());
    }

    #[test]
    fn symbol_assignment() {
        let mut sym = Symbol::new("x");
        sym.merge_with(&Symbol::new("y"));
        assert_eq!(sym.name(), "xy");
        assert_eq!(sym.value(), 0.0);
        assert!(!sym.is_bound());
        sym.assign(2.0);
        sym.assign(3.0);
        assert_eq!(sym.value(), 3.0);
        assert_eq!(Atom::from(sym).value_strict(), Ok(3.0));
        assert_eq!(
            Atom::from(Symbol::new("z")).value_strict(),
            Err(ErrorKind::UnboundVariable("z".into()))
        );
    }

    #[test]
    fn invoke_dispatch() {
        let two = Atom::from(2.0);
        let three = Atom::from(3.0);
        let plus = TokenKind::from(Operator::new("+").unwrap());
        assert_eq!(plus.invoke(&[two.clone(), three.clone()]), Ok(5.0));
        assert_eq!(TokenKind::from(two.clone()).invoke(&[]), Ok(2.0));
        assert!(matches!(
            TokenKind::Eof.invoke(&[]),
            Err(ErrorKind::InvalidOperation(_))
        ));
        assert!(matches!(
            TokenKind::from(three).eval(&[two.clone()]),
            Err(ErrorKind::UnsupportedOperation { .. })
        ));
        assert!(matches!(
            plus.value(),
            Err(ErrorKind::UnsupportedOperation { .. })
        ));
        assert_eq!(
            plus.eval(&[two]),
            Err(ErrorKind::UnsupportedArity {
                symbol: "+".into(),
                arity: 1
            })
        );
    }

    #[test]
    fn token_spans() {
        let mut tok = Token::new(Number::new("1").unwrap(), 0..1);
        tok.cover(&(3..4));
        assert_eq!(tok.span, 0..4);
        assert_eq!(Token::eof(5).to_string(), "<Eof>");
        assert_eq!(Token::eof(5).unexpected().span, 5..5);
        assert!(tok.check_valid().is_ok());
    }
}
