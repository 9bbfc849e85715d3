use crate::{
    error::{Error, ErrorKind},
    expr::Expr,
    lexer::Lexer,
    operator,
    token::{Atom, Operator, Token, TokenKind},
};

/// Precedence climbing over a [`Lexer`].
pub struct Parser {
    lexer: Lexer,
}

impl Parser {
    pub fn new(source: &str) -> Result<Self, Error> {
        Ok(Parser {
            lexer: Lexer::new(source)?,
        })
    }

    pub fn from_lexer(lexer: Lexer) -> Self {
        Parser { lexer }
    }

    /// Parses the whole input.
    pub fn parse(mut self) -> Result<Expr, Error> {
        let expr = self.parse_expr(0.0)?;
        let rest = self.lexer.next();
        if !rest.is_eof() {
            return Err(rest.unexpected());
        }
        Ok(expr)
    }

    /// Parses an operand followed by every operator binding at least as
    /// tightly as `min_power`.
    pub fn parse_expr(&mut self, min_power: f64) -> Result<Expr, Error> {
        let seed = self.lexer.next();
        log::trace!("seed {} at power {}", seed, min_power);
        let mut lhs = match seed.kind {
            TokenKind::Number(_) | TokenKind::Symbol(_) => Expr::Atom(Atom::try_from(seed)?),
            TokenKind::Operator(op) if op.is("(") => {
                let inner = self.parse_expr(0.0)?;
                let close = self.lexer.next();
                if !close.is_operator(")") {
                    return Err(ErrorKind::UnmatchedParenthesis.at(seed.span.start..close.span.end));
                }
                if self.lexer.peek().is_eof() {
                    return Ok(inner);
                }
                inner
            }
            TokenKind::Operator(op) if op.is_prefix() => {
                let power = operator::prefix_binding_power(op.as_str())
                    .ok_or_else(|| seed.unexpected())?;
                let operand = self.parse_expr(power.right)?;
                operation(op, vec![operand], &seed)?
            }
            _ => return Err(seed.unexpected()),
        };

        loop {
            let token = self.lexer.next();
            if token.is_eof() || token.is_operator(")") {
                self.lexer.roll_back(token);
                break;
            }
            let op = match token.as_operator() {
                Some(op) => *op,
                None => return Err(token.unexpected()),
            };

            if op.is_postfix() {
                log::trace!("postfix {}", op);
                lhs = operation(op, vec![lhs], &token)?;
                continue;
            }

            let power = operator::binding_power(op.as_str()).ok_or_else(|| token.unexpected())?;
            if power.left < min_power {
                log::trace!("stop before {} ({} < {})", op, power.left, min_power);
                self.lexer.roll_back(token);
                break;
            }

            log::trace!("infix {} at power {}", op, power.right);
            let rhs = self.parse_expr(power.right)?;
            lhs = operation(op, vec![lhs, rhs], &token)?;
        }

        Ok(lhs)
    }
}

/// Builds an operation, reporting a missing semantic function as an
/// unexpected `token`.
fn operation(op: Operator, operands: Vec<Expr>, token: &Token) -> Result<Expr, Error> {
    Expr::operation(op, operands).map_err(|_| token.unexpected())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(source: &str) -> String {
        Parser::new(source).unwrap().parse().unwrap().render()
    }

    fn error(source: &str) -> Error {
        Parser::new(source).and_then(Parser::parse).unwrap_err()
    }

    #[test]
    fn tree_shapes() {
        assert_eq!(render("1"), "1");
        assert_eq!(render("1+2*3"), "(+ 1 (* 2 3))");
        assert_eq!(render("10-3-2"), "(- (- 10 3) 2)");
        assert_eq!(render("2^3^2"), "(^ 2 (^ 3 2))");
        assert_eq!(render("(2+3)*4"), "(* (+ 2 3) 4)");
        assert_eq!(render("((1))"), "1");
        assert_eq!(render("-5"), "(- 5)");
        assert_eq!(render("10+-5"), "(+ 10 (- 5))");
        assert_eq!(render("-2^2"), "(^ (- 2) 2)");
        assert_eq!(render("sin(0)+1"), "(+ (sin 0) 1)");
        assert_eq!(render("sqrt(16)"), "(sqrt 16)");
        assert_eq!(render("8sqrt3"), "(sqrt 8 3)");
        assert_eq!(render("a*b+c"), "(+ (* a b) c)");
    }

    #[test]
    fn postfix_operators() {
        assert_eq!(render("3!"), "(! 3)");
        assert_eq!(render("5!!"), "(! (! 5))");
        assert_eq!(render("2+3!"), "(+ 2 (! 3))");
        assert_eq!(render("-3!"), "(- (! 3))");
        assert_eq!(render("(1+2)!"), "(! (+ 1 2))");
    }

    #[test]
    fn parenthesis_errors() {
        let err = error("(2+3");
        assert_eq!(err.kind, ErrorKind::UnmatchedParenthesis);
        assert_eq!(err.span, 0..4);
        assert_eq!(error("((1)").kind, ErrorKind::UnmatchedParenthesis);
        assert_eq!(error("2)").kind, ErrorKind::UnexpectedToken(")".into()));
        assert_eq!(error("()").kind, ErrorKind::UnexpectedToken(")".into()));
    }

    #[test]
    fn unexpected_tokens() {
        let err = error("2++3");
        assert_eq!(err.kind, ErrorKind::UnexpectedToken("+".into()));
        assert_eq!(err.span, 2..3);
        assert_eq!(error("").kind, ErrorKind::UnexpectedToken("<Eof>".into()));
        assert_eq!(error("2+").kind, ErrorKind::UnexpectedToken("<Eof>".into()));
        assert_eq!(error("2 x").kind, ErrorKind::UnexpectedToken("x".into()));
        assert_eq!(error("*2").kind, ErrorKind::UnexpectedToken("*".into()));
        assert_eq!(error("2(3)").kind, ErrorKind::UnexpectedToken("(".into()));
        assert_eq!(error("1.").kind, ErrorKind::UnexpectedToken(".".into()));
        assert_eq!(error("!").kind, ErrorKind::UnexpectedToken("!".into()));
        // sin has no two-operand form
        assert_eq!(error("2 sin 3").kind, ErrorKind::UnexpectedToken("sin".into()));
    }

    #[test]
    fn parse_from_lexer() {
        let lexer = Lexer::new("1 + x").unwrap();
        let expr = Parser::from_lexer(lexer).parse().unwrap();
        assert_eq!(expr.symbols(), ["x"]);
    }
}
