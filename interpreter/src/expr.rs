use std::{collections::HashMap, fmt::Display, str::FromStr};

use itertools::Itertools;

use crate::{
    error::{Error, ErrorKind},
    token::{Atom, Number, Operator, Symbol},
};

/// A parsed expression: a leaf atom or an operator applied to its operands.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Atom(Atom),
    Operation(Operation),
}

/// An operator with one or two operands. The operator always has a semantic
/// function for exactly that many operands.
#[derive(Clone, Debug, PartialEq)]
pub struct Operation {
    op: Operator,
    operands: Vec<Expr>,
}

impl Operation {
    pub fn new(op: Operator, operands: Vec<Expr>) -> Result<Self, ErrorKind> {
        op.semantic_function(operands.len())?;
        Ok(Operation { op, operands })
    }

    pub fn op(&self) -> Operator {
        self.op
    }

    pub fn operands(&self) -> &[Expr] {
        &self.operands
    }

    /// Operands that are all leaves whose value is known.
    fn resolved_atoms(&self) -> Option<Vec<&Atom>> {
        self.operands
            .iter()
            .map(|operand| operand.as_atom().filter(|atom| atom.is_resolved()))
            .collect()
    }

    fn apply(&self, values: &[f64]) -> Result<f64, ErrorKind> {
        self.op.apply(values)
    }
}

impl Expr {
    pub fn atom(atom: impl Into<Atom>) -> Self {
        Expr::Atom(atom.into())
    }

    pub fn symbol(name: &str) -> Self {
        Expr::Atom(Symbol::new(name).into())
    }

    pub fn operation(op: Operator, operands: Vec<Expr>) -> Result<Self, ErrorKind> {
        Operation::new(op, operands).map(Expr::Operation)
    }

    pub fn as_atom(&self) -> Option<&Atom> {
        match self {
            Expr::Atom(atom) => Some(atom),
            Expr::Operation(_) => None,
        }
    }

    pub fn is_atom(&self) -> bool {
        matches!(self, Expr::Atom(_))
    }

    /// The canonical prefix form, e.g. `(+ 1 (* 2 3))`.
    pub fn render(&self) -> String {
        self.to_string()
    }

    /// Evaluates the whole tree. Unbound symbols count as 0.
    pub fn value(&self) -> Result<f64, ErrorKind> {
        #[cfg(feature = "tracy")]
        profiling::scope!("Expr::value");
        match self {
            Expr::Atom(atom) => Ok(atom.value()),
            Expr::Operation(operation) => operation.apply(
                &operation
                    .operands
                    .iter()
                    .map(Expr::value)
                    .collect::<Result<Vec<_>, _>>()?,
            ),
        }
    }

    /// Evaluates the whole tree, failing on the first unbound symbol.
    pub fn value_strict(&self) -> Result<f64, ErrorKind> {
        match self {
            Expr::Atom(atom) => atom.value_strict(),
            Expr::Operation(operation) => operation.apply(
                &operation
                    .operands
                    .iter()
                    .map(Expr::value_strict)
                    .collect::<Result<Vec<_>, _>>()?,
            ),
        }
    }

    /// Folds one level: an operation over resolved atoms becomes a number,
    /// any other operation is rebuilt from its stepped operands.
    pub fn step(&self) -> Result<Expr, ErrorKind> {
        match self {
            Expr::Atom(_) => Ok(self.clone()),
            Expr::Operation(operation) => match operation.resolved_atoms() {
                Some(atoms) => {
                    let values = atoms.iter().map(|atom| atom.value()).collect_vec();
                    Ok(Expr::atom(operation.apply(&values)?))
                }
                None => Ok(Expr::Operation(Operation {
                    op: operation.op,
                    operands: operation
                        .operands
                        .iter()
                        .map(Expr::step)
                        .collect::<Result<_, _>>()?,
                })),
            },
        }
    }

    /// Folds bottom-up until nothing changes. Subtrees over unbound symbols
    /// keep their shape.
    pub fn fold(&self) -> Result<Expr, ErrorKind> {
        #[cfg(feature = "tracy")]
        profiling::scope!("Expr::fold");
        match self {
            Expr::Atom(_) => Ok(self.clone()),
            Expr::Operation(operation) => {
                let folded = Operation {
                    op: operation.op,
                    operands: operation
                        .operands
                        .iter()
                        .map(Expr::fold)
                        .collect::<Result<_, _>>()?,
                };
                match folded.resolved_atoms() {
                    Some(atoms) => {
                        let values = atoms.iter().map(|atom| atom.value()).collect_vec();
                        Ok(Expr::atom(folded.apply(&values)?))
                    }
                    None => Ok(Expr::Operation(folded)),
                }
            }
        }
    }

    /// Assigns values to the symbols named in `bindings`.
    ///
    /// Returns whether every symbol in the tree got a value. Symbols that
    /// were found are assigned either way.
    pub fn bind(&mut self, bindings: &HashMap<String, f64>) -> bool {
        match self {
            Expr::Atom(Atom::Symbol(sym)) => match bindings.get(sym.name()) {
                Some(&value) => {
                    sym.assign(value);
                    true
                }
                None => {
                    log::trace!("no binding for {:?}", sym.name());
                    false
                }
            },
            Expr::Atom(Atom::Number(_)) => true,
            Expr::Operation(operation) => operation
                .operands
                .iter_mut()
                .fold(true, |all, operand| operand.bind(bindings) && all),
        }
    }

    /// Distinct symbol names in order of first appearance.
    pub fn symbols(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_symbols(&mut names);
        names.into_iter().unique().collect()
    }

    fn collect_symbols<'a>(&'a self, names: &mut Vec<&'a str>) {
        match self {
            Expr::Atom(Atom::Symbol(sym)) => names.push(sym.name()),
            Expr::Atom(Atom::Number(_)) => {}
            Expr::Operation(operation) => operation
                .operands
                .iter()
                .for_each(|operand| operand.collect_symbols(names)),
        }
    }

    pub fn depth(&self) -> usize {
        match self {
            Expr::Atom(_) => 1,
            Expr::Operation(operation) => {
                1 + operation
                    .operands
                    .iter()
                    .map(Expr::depth)
                    .max()
                    .unwrap_or(0)
            }
        }
    }
}

impl Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({} {})", self.op, self.operands.iter().join(" "))
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Atom(atom) => write!(f, "{}", atom),
            Expr::Operation(operation) => write!(f, "{}", operation),
        }
    }
}

impl From<Atom> for Expr {
    fn from(atom: Atom) -> Self {
        Expr::Atom(atom)
    }
}

impl From<Number> for Expr {
    fn from(num: Number) -> Self {
        Expr::Atom(num.into())
    }
}

impl From<f64> for Expr {
    fn from(value: f64) -> Self {
        Expr::Atom(value.into())
    }
}

impl FromStr for Expr {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::parse(s)
    }
}

impl TryFrom<&str> for Expr {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        crate::parse(value)
    }
}
