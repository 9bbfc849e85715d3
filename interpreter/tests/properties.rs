use pratt::{parse, ErrorKind, IntoBindings};

fn value(source: &str) -> f64 {
    parse(source)
        .unwrap_or_else(|e| panic!("{source:?}: {e}"))
        .value()
        .unwrap()
}

fn assert_close(source: &str, expected: f64) {
    let actual = value(source);
    assert!(
        (actual - expected).abs() < 1e-10,
        "{source:?} = {actual}, expected {expected}"
    );
}

#[test]
fn decimal_literals() {
    for literal in ["0", "7", "42", "007", "3.14", "12.5", "0.001", "1000000"] {
        assert_eq!(value(literal), literal.parse::<f64>().unwrap(), "{literal}");
    }
}

#[test]
fn associativity() {
    assert_close("10-3-2", 5.0);
    assert_close("2^3^2", 512.0);
    assert_close("100/10/5", 2.0);
    assert_close("64 sqrt 3 sqrt 2", 64f64.powf(1.0 / 3f64.powf(0.5)));
}

#[test]
fn precedence() {
    assert_close("2+3*4", 14.0);
    assert_close("(2+3)*4", 20.0);
    assert_close("2*3^2", 18.0);
    assert_close("1+2*3-4/2", 5.0);
}

#[test]
fn prefix_and_postfix() {
    assert_close("10+-5", 5.0);
    assert_close("-5", -5.0);
    assert_close("3!", 6.0);
    assert_close("5!", 120.0);
    assert_close("3!!", 720.0);
    assert_close("0!", 0.0);
    assert_close("sin(0)", 0.0);
    assert_close("cos(0)", 1.0);
    assert_close("tan(0)", 0.0);
    assert_close("sqrt(16)", 4.0);
    assert_close("2^3", 8.0);
    assert_close("-2^2", 4.0);
}

#[test]
fn fold_render_is_idempotent() {
    for source in ["1+2*3", "(2+3)*4", "2^3^2", "-5", "10+-5", "3!", "sqrt(16)/2"] {
        let once = parse(source).unwrap().fold().unwrap().render();
        let twice = parse(&once).unwrap().fold().unwrap().render();
        assert_eq!(once, twice, "{source:?}");
        assert!(parse(source).unwrap().fold().unwrap().is_atom());
    }
}

#[test]
fn malformed_input() {
    assert_eq!(
        parse("(2+3)").map(|e| e.render()),
        Ok("(+ 2 3)".to_string())
    );
    assert_eq!(
        parse("(2+3").unwrap_err().kind,
        ErrorKind::UnmatchedParenthesis
    );
    assert!(matches!(
        parse("2++3").unwrap_err().kind,
        ErrorKind::UnexpectedToken(_)
    ));
}

#[test]
fn algebra_binding() {
    let mut expr = parse("a+b").unwrap();
    assert!(expr.bind(&[("a", 3.0), ("b", 2.0)].as_slice().bindings()));
    assert_eq!(expr.value(), Ok(5.0));

    let mut partial = parse("a+b").unwrap();
    assert!(!partial.bind(&("a", 3.0).bindings()));
    assert_eq!(partial.value(), Ok(3.0));
    assert_eq!(partial.fold().unwrap().render(), "(+ a b)");
    assert_eq!(
        partial.value_strict(),
        Err(ErrorKind::UnboundVariable("b".into()))
    );
}

#[test]
fn symbols_stay_symbolic_when_folding() {
    let expr = parse("x*(2+3)").unwrap();
    assert_eq!(expr.fold().unwrap().render(), "(* x 5)");
    assert_eq!(expr.symbols(), ["x"]);
}
