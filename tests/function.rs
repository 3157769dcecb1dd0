mod common;

use common::run_source;

#[test]
fn function_call_and_return() {
    let (stdout, stderr, ok) = run_source(
        r#"
        fun add(a, b) {
            return a + b;
        }
        print add(1, 2);
        "#,
    );
    assert!(ok, "{stderr}");
    assert_eq!(stdout, "3\n");
}

#[test]
fn missing_return_yields_nil() {
    let (stdout, stderr, ok) = run_source("fun f() {} print f();");
    assert!(ok, "{stderr}");
    assert_eq!(stdout, "nil\n");
}

#[test]
fn recursion() {
    let (stdout, stderr, ok) = run_source(
        r#"
        fun fib(n) {
            if (n < 2) return n;
            return fib(n - 1) + fib(n - 2);
        }
        print fib(8);
        "#,
    );
    assert!(ok, "{stderr}");
    assert_eq!(stdout, "21\n");
}

#[test]
fn closures_capture_their_defining_scope() {
    let (stdout, stderr, ok) = run_source(
        r#"
        fun makeCounter() {
            var count = 0;
            fun counter() {
                count = count + 1;
                return count;
            }
            return counter;
        }
        var counter = makeCounter();
        print counter();
        print counter();
        "#,
    );
    assert!(ok, "{stderr}");
    assert_eq!(stdout, "1\n2\n");
}

#[test]
fn lambda_expression() {
    let (stdout, stderr, ok) = run_source(
        r#"
        var square = fun (x) { return x * x; };
        print square(5);
        "#,
    );
    assert!(ok, "{stderr}");
    assert_eq!(stdout, "25\n");
}

#[test]
fn wrong_arity_is_a_runtime_error() {
    let (_, stderr, ok) = run_source("fun f(a, b) { return a + b; } f(1);");
    assert!(!ok);
    assert!(stderr.contains("Expected 2 arguments but got 1."), "{stderr}");
}

#[test]
fn calling_a_non_callable_is_a_runtime_error() {
    let (_, stderr, ok) = run_source("var a = 1; a();");
    assert!(!ok);
    assert!(stderr.contains("Can only call functions and classes."), "{stderr}");
}

#[test]
fn clock_returns_a_number() {
    let (stdout, stderr, ok) = run_source("print clock() >= 0;");
    assert!(ok, "{stderr}");
    assert_eq!(stdout, "true\n");
}

#[test]
fn more_than_255_parameters_is_reported_but_still_parses() {
    let params = (0..256).map(|i| format!("p{i}")).collect::<Vec<_>>().join(", ");
    let source = format!("fun f({params}) {{ return p0; }} print f({});", (0..256).map(|i| i.to_string()).collect::<Vec<_>>().join(", "));
    let (_, stderr, ok) = run_source(&source);
    assert!(!ok);
    assert!(stderr.contains("Cannot have more than 255 parameters."), "{stderr}");
}

#[test]
fn more_than_255_arguments_is_reported_but_still_parses() {
    let args = (0..256).map(|i| i.to_string()).collect::<Vec<_>>().join(", ");
    let source = format!("fun f() {{ return 1; }} print f({args});");
    let (_, stderr, ok) = run_source(&source);
    assert!(!ok);
    assert!(stderr.contains("Cannot have more than 255 arguments."), "{stderr}");
}
