//! The operator table: which symbols are operators, where they may appear,
//! how tightly they bind and what they compute for a given operand count.

use num::Zero;

pub const OPERATORS: [&str; 13] = [
    "+", "-", "*", "/", "(", ")", "sin", "cos", "tan", "^", "sqrt", ".", "!",
];

pub const PREFIX: [&str; 5] = ["-", "sin", "cos", "tan", "sqrt"];

pub const POSTFIX: [&str; 1] = ["!"];

/// Prefix and postfix binding strength. Large enough to bind tighter than
/// any infix operator.
const UNARY_POWER: f64 = 100.0;

pub type SemanticFn = fn(&[f64]) -> f64;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Fixity {
    Prefix,
    Infix,
    Postfix,
}

/// Left and right binding power of an operator.
///
/// A left power above the right one makes the operator right-associative,
/// the other way round left-associative.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct BindingPower {
    pub left: f64,
    pub right: f64,
}

impl BindingPower {
    pub const fn new(left: f64, right: f64) -> Self {
        BindingPower { left, right }
    }
}

/// Looks `text` up in the operator set and returns the table's own copy of
/// the symbol.
pub fn lookup(text: &str) -> Option<&'static str> {
    OPERATORS.iter().copied().find(|&op| op == text)
}

pub fn is_operator(text: &str) -> bool {
    lookup(text).is_some()
}

pub fn is_operator_char(c: char) -> bool {
    let mut buf = [0; 4];
    is_operator(c.encode_utf8(&mut buf))
}

pub fn is_prefix(symbol: &str) -> bool {
    PREFIX.contains(&symbol)
}

pub fn is_postfix(symbol: &str) -> bool {
    POSTFIX.contains(&symbol)
}

/// Prefix wins over postfix; everything else is infix.
pub fn fixity(symbol: &str) -> Fixity {
    if is_prefix(symbol) {
        Fixity::Prefix
    } else if is_postfix(symbol) {
        Fixity::Postfix
    } else {
        Fixity::Infix
    }
}

/// Binding power of `symbol` when it shows up after an operand.
///
/// `-` and `sqrt` are both prefix and infix and get their infix powers here.
/// The remaining prefix operators fall back to their prefix powers. Brackets
/// and `.` have none.
pub fn binding_power(symbol: &str) -> Option<BindingPower> {
    match symbol {
        "+" | "-" => Some(BindingPower::new(1.0, 1.1)),
        "*" | "/" => Some(BindingPower::new(2.0, 2.1)),
        "^" | "sqrt" => Some(BindingPower::new(3.1, 3.0)),
        _ if is_postfix(symbol) => postfix_binding_power(symbol),
        _ if is_prefix(symbol) => prefix_binding_power(symbol),
        _ => None,
    }
}

pub fn prefix_binding_power(symbol: &str) -> Option<BindingPower> {
    is_prefix(symbol).then(|| BindingPower::new(0.0, UNARY_POWER))
}

pub fn postfix_binding_power(symbol: &str) -> Option<BindingPower> {
    is_postfix(symbol).then(|| BindingPower::new(UNARY_POWER, 0.0))
}

/// The function `symbol` computes when applied to `arity` operands.
pub fn semantic_function(symbol: &str, arity: usize) -> Option<SemanticFn> {
    let f: SemanticFn = match (symbol, arity) {
        ("+", 2) => |x| x[0] + x[1],
        ("-", 1) => |x| -x[0],
        ("-", 2) => |x| x[0] - x[1],
        ("*", 2) => |x| x[0] * x[1],
        ("/", 2) => |x| x[0] / x[1],
        ("^", 2) => |x| x[0].powf(x[1]),
        ("sqrt", 1) => |x| x[0].sqrt(),
        ("sqrt", 2) => |x| x[0].powf(1.0 / x[1]),
        ("sin", 1) => |x| x[0].sin(),
        ("cos", 1) => |x| x[0].cos(),
        ("tan", 1) => |x| x[0].tan(),
        ("!", 1) => |x| factorial(x[0]),
        _ => return None,
    };
    Some(f)
}

/// Factorial with the base cases `0! = 0` and `1! = 1`.
///
/// Operands that never reach a base case by repeated decrement (negative or
/// fractional) give NaN.
pub fn factorial(n: f64) -> f64 {
    if n.is_zero() {
        return f64::zero();
    }
    if n < 1.0 || !n.fract().is_zero() {
        return f64::NAN;
    }
    let mut acc: f64 = 1.0;
    let mut k = 2.0;
    while k <= n && acc.is_finite() {
        acc *= k;
        k += 1.0;
    }
    acc
}
