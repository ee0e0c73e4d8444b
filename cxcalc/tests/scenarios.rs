//! End-to-end evaluation through `evaluate_line`.

use cxcalc::{evaluate_line, Bindings, CalcError, Complex, SemanticError};

const EPS: f64 = 1e-9;

fn eval(env: &mut Bindings, line: &str) -> String {
    match evaluate_line(env, line) {
        Ok(z) => z.to_string(),
        Err(e) => format!("[{}] {}", e.kind(), e),
    }
}

fn close(a: Complex, b: Complex) -> bool {
    (a.real - b.real).abs() < EPS && (a.imag - b.imag).abs() < EPS
}

#[test]
fn sum_of_real_and_imaginary() {
    let mut env = Bindings::new();
    assert_eq!(evaluate_line(&mut env, "1 + 2i"), Ok(Complex::new(1.0, 2.0)));
    assert_eq!(eval(&mut env, "1 + 2i"), "1 + 2i");
}

#[test]
fn bound_imaginary_squared() {
    let mut env = Bindings::new();
    assert_eq!(eval(&mut env, "x = 3i"), "3i");
    assert_eq!(eval(&mut env, "x * x"), "-9");
}

#[test]
fn magnitude() {
    let mut env = Bindings::new();
    assert_eq!(eval(&mut env, "abs(3 + 4i)"), "5");
}

#[test]
fn unbound_identifier() {
    let mut env = Bindings::new();
    let err = evaluate_line(&mut env, "y").unwrap_err();
    assert_eq!(
        err,
        CalcError::Semantic(SemanticError::Unbound { name: "y".into() })
    );
    assert!(env.is_empty());
    assert_eq!(eval(&mut env, "y"), "[semantic error] unbound identifier \"y\"");
}

#[test]
fn division_by_zero_is_nan() {
    let mut env = Bindings::new();
    let out = eval(&mut env, "1 / 0");
    assert!(out.contains("NaN"), "{out}");
}

#[test]
fn scaled_parenthesised_sum() {
    let mut env = Bindings::new();
    assert_eq!(evaluate_line(&mut env, "2 * (1 + i)"), Ok(Complex::new(2.0, 2.0)));
    assert_eq!(eval(&mut env, "2 * (1 + i)"), "2 + 2i");
}

#[test]
fn negative_imaginary_keeps_plus_joiner() {
    let mut env = Bindings::new();
    assert_eq!(eval(&mut env, "1 - 2i"), "1 + -2i");
    assert_eq!(eval(&mut env, "conj(i)"), "-1i");
    assert_eq!(eval(&mut env, "i - i"), "0");
}

#[test]
fn rebinding_overwrites() {
    let mut env = Bindings::new();
    eval(&mut env, "a = 1");
    eval(&mut env, "a = a + 1");
    assert_eq!(eval(&mut env, "a"), "2");
    assert_eq!(env.len(), 1);
}

#[test]
fn error_classes() {
    let mut env = Bindings::new();
    assert_eq!(
        eval(&mut env, "2 $ 3"),
        "[lexical error] unexpected \"$\" at offset 2"
    );
    assert_eq!(eval(&mut env, "2 +"), "[syntax error] unexpected end at offset 3");
    assert_eq!(eval(&mut env, ")"), "[syntax error] unexpected rparen at offset 0");
}

#[test]
fn keywords_are_reserved() {
    let mut env = Bindings::new();
    assert!(matches!(
        evaluate_line(&mut env, "abs = 1"),
        Err(CalcError::Syntax { found: "equals", .. })
    ));
    assert_eq!(eval(&mut env, "absolute = 1"), "1");
}

#[test]
fn canonical_text_reparses_to_equal_value() {
    let mut env = Bindings::new();
    for (line, text) in [
        ("3 + 4i", "3 + 4i"),
        ("(1 + i) * (1 - i)", "2"),
        ("-5i", "-5i"),
        ("7 * i * i", "-7"),
        ("0", "0"),
        ("1 - 2i", "1 + -2i"),
        ("-3 - 4i", "-3 + -4i"),
        ("conj(5 + i)", "5 + -1i"),
    ] {
        let z = evaluate_line(&mut env, line).unwrap();
        assert_eq!(z.to_string(), text, "{line}");
        let again = evaluate_line(&mut env, text).unwrap();
        assert_eq!(z, again, "{line}");
    }
}

#[test]
fn algebraic_properties() {
    let mut env = Bindings::new();
    evaluate_line(&mut env, "x = 1.5 - 2i").unwrap();
    evaluate_line(&mut env, "y = -0.5 + 3i").unwrap();
    evaluate_line(&mut env, "w = 2 + 0.25i").unwrap();
    let x = env.get("x").unwrap();
    let y = env.get("y").unwrap();

    let z = evaluate_line(&mut env, "(x + y) - y").unwrap();
    assert!(close(z, x));
    let z = evaluate_line(&mut env, "(x * y) / y").unwrap();
    assert!(close(z, x));
    assert!(close(
        evaluate_line(&mut env, "x * y").unwrap(),
        evaluate_line(&mut env, "y * x").unwrap()
    ));
    assert!(close(
        evaluate_line(&mut env, "x * (y + w)").unwrap(),
        evaluate_line(&mut env, "x * y + x * w").unwrap()
    ));
    assert_eq!(evaluate_line(&mut env, "conj(conj(x))").unwrap(), x);
    assert!(close(
        evaluate_line(&mut env, "x * conj(x)").unwrap(),
        evaluate_line(&mut env, "norm(x)").unwrap()
    ));
    let a = evaluate_line(&mut env, "abs(x)").unwrap();
    assert_eq!(a.real, x.real.hypot(x.imag));
    assert_eq!(a.imag, 0.0);
}
