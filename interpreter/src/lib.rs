//! Arithmetic expressions parsed by precedence climbing into an evaluable
//! tree.
//!
//! ```
//! use pratt::IntoBindings;
//!
//! let mut expr = pratt::parse("2 * x + 3!").unwrap();
//! assert_eq!(expr.render(), "(+ (* 2 x) (! 3))");
//! assert!(expr.bind(&[("x", 1.5)].as_slice().bindings()));
//! assert_eq!(expr.value(), Ok(9.0));
//! ```

use rayon::iter::{IntoParallelIterator, ParallelIterator};

mod bind;
mod error;
mod expr;
pub mod lexer;
pub mod operator;
mod parser;
pub mod token;

pub use bind::{parse_binding, Bindings, IntoBindings};
pub use error::{Error, ErrorKind};
pub use expr::{Expr, Operation};
pub use lexer::Lexer;
pub use parser::Parser;
pub use token::{Atom, Number, Operator, Symbol, Token, TokenKind};

/// Parses `source` into an expression tree.
pub fn parse(source: &str) -> Result<Expr, Error> {
    #[cfg(feature = "tracy")]
    profiling::scope!("parse");
    Parser::new(source)?.parse()
}

/// Parses independent sources in parallel. Results keep the input order.
pub fn parse_many<'a, I>(sources: I) -> Vec<Result<Expr, Error>>
where
    I: IntoParallelIterator<Item = &'a str>,
{
    sources.into_par_iter().map(parse).collect()
}
