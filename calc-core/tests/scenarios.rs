use calc_core::{CalcError, Calculator, CompileOptions, ErrorKind};

fn close(actual: f64, expected: f64) -> bool {
    (actual - expected).abs() <= 1e-9 * expected.abs().max(1.0)
}

fn eval(source: &str) -> f64 {
    let mut calc = Calculator::default();
    calc.set_expression(source).expect("expression should compile");
    calc.execute().expect("expression should execute")
}

fn compile_error(source: &str) -> ErrorKind {
    let calc = Calculator::default();
    calc.compile(source).expect_err("compile should fail").kind()
}

#[test]
fn basic_functions() {
    assert!(close(
        eval("atan2(0.5, 0.2) + sin(0.2) / 2"),
        0.5f64.atan2(0.2) + 0.2f64.sin() / 2.0
    ));
}

#[test]
fn unary_minus() {
    assert_eq!(eval("-21 - -2"), -19.0);
}

#[test]
fn unary_plus() {
    assert_eq!(eval("12 + +2"), 14.0);
}

#[test]
fn nested_fractions() {
    let expected = 1.0 / (12.0 + 1.0) + 2.0 / (13.0 + 2.0) + 3.0 / (14.0 + 3.0);
    assert!(close(eval("(1/(12+1)+2/(13+2)+3/(14+3))"), expected));
}

#[test]
fn factorial_and_gamma() {
    assert!(close(eval("5!"), 120.0));
    assert!(close(eval("5.2!"), 169.406_099_461_723_07));
    assert!(close(eval("3! + 2"), 8.0));
}

#[test]
fn large_factorials_stay_finite() {
    for n in [150u32, 170] {
        let exact: f64 = (1..=n).map(f64::from).product();
        let actual = eval(&format!("{n}!"));
        assert!(((actual - exact) / exact).abs() < 1e-10, "{n}! gave {actual}");
    }
}

#[test]
fn constants_and_comparisons() {
    assert!(close(eval("cos(pi)"), -1.0));
    assert!(close(eval("ln(e)"), 1.0));
    assert_eq!(eval("1 + 1 == 2"), 1.0);
    assert_eq!(eval("2 < 1 | 3 >= 3 & 1"), 1.0);
}

#[test]
fn unbalanced_braces() {
    assert_eq!(compile_error("12 + 2 - (22 + 2"), ErrorKind::Structural);
    assert_eq!(compile_error(")  + 12 * 22 * sin(12)"), ErrorKind::Structural);
    assert_eq!(compile_error("(1 + 2]"), ErrorKind::Structural);
}

#[test]
fn adjacent_literals() {
    assert_eq!(compile_error("22 33 + 2"), ErrorKind::Lexical);
}

#[test]
fn arity_mismatch() {
    assert_eq!(compile_error("sin(22, 11)"), ErrorKind::Structural);
    assert_eq!(compile_error("atan2(11)"), ErrorKind::Structural);
}

#[test]
fn literal_after_value_is_lexical() {
    assert_eq!(compile_error("x 2y"), ErrorKind::Lexical);
    assert_eq!(compile_error("(1 + 2) 3"), ErrorKind::Lexical);
}

#[test]
fn variables_rebind_without_recompiling() {
    let mut calc = Calculator::default();
    calc.set_expression("12 + 2 -x + y * z").expect("compile");

    for x in 0..10 {
        calc.set_variable("x", x as f64);
        for y in 0..10 {
            calc.set_variable("y", y as f64);
            for z in 0..10 {
                calc.set_variable("z", z as f64);
                let expected = (12 + 2 - x + y * z) as f64;
                assert_eq!(calc.execute(), Ok(expected));
            }
        }
    }
}

#[test]
fn removed_variable_fails_at_runtime() {
    let mut calc = Calculator::default();
    calc.set_expression("x * 2").expect("compile");
    calc.set_variable("x", 4.0);
    assert_eq!(calc.execute(), Ok(8.0));

    calc.delete_variable("x").expect("x was bound");
    assert_eq!(
        calc.execute(),
        Err(CalcError::Runtime("no variable \"x\" defined".to_string()))
    );
    assert_eq!(
        calc.delete_variable("x").unwrap_err().kind(),
        ErrorKind::NotFound
    );
}

#[test]
fn optimized_and_plain_programs_agree() {
    let mut calc = Calculator::default();
    let source = "2 * (3 + x) ^ 2 / max(y, 1 + 1) - sin(pi / 2) * x";
    let folded = calc.compile(source).expect("compile");
    let plain = calc
        .compile_with(source, CompileOptions::unoptimized())
        .expect("compile");
    assert!(folded.len() < plain.len());

    for (x, y) in [(0.0, 0.0), (1.5, -2.0), (-3.0, 7.25), (10.0, 0.5)] {
        calc.set_variable("x", x);
        calc.set_variable("y", y);
        let a = calc.execute_program(&folded).expect("execute");
        let b = calc.execute_program(&plain).expect("execute");
        assert!(close(a, b), "{a} != {b} for x={x}, y={y}");
    }
}

#[test]
fn postfix_dump() {
    let calc = Calculator::default();
    let program = calc
        .compile_with("12 * sin(x) + x", CompileOptions::unoptimized())
        .expect("compile");
    assert_eq!(program.dump_postfix(), vec!["12", "x", "sin", "*", "x", "+"]);
}
