mod common;

use common::run_source;

#[test]
fn global_and_local_scoping() {
    let (stdout, stderr, ok) = run_source(
        r#"
        var a = "global";
        {
            var a = "local";
            print a;
        }
        print a;
        "#,
    );
    assert!(ok, "{stderr}");
    assert_eq!(stdout, "local\nglobal\n");
}

#[test]
fn assignment_returns_the_assigned_value() {
    let (stdout, stderr, ok) = run_source("var a = 1; print a = 2;");
    assert!(ok, "{stderr}");
    assert_eq!(stdout, "2\n");
}

#[test]
fn undefined_variable_is_a_runtime_error() {
    let (_, stderr, ok) = run_source("print unknown;");
    assert!(!ok);
    assert!(stderr.contains("Undefined variable 'unknown'."), "{stderr}");
}

#[test]
fn reading_own_initializer_is_a_resolve_error() {
    let (_, stderr, ok) = run_source("var a = 1; { var a = a; }");
    assert!(!ok);
    assert!(stderr.contains("Cannot read local variable in its own initializer."), "{stderr}");
}

#[test]
fn duplicate_binding_in_same_scope_is_a_resolve_error() {
    let (_, stderr, ok) = run_source("{ var a = 1; var a = 2; }");
    assert!(!ok);
    assert!(stderr.contains("already defined with name 'a'"), "{stderr}");
}

#[test]
fn unused_local_is_reported() {
    let (_, stderr, ok) = run_source("fun f() { var unused = 1; } f();");
    assert!(!ok);
    assert!(stderr.contains("Local variable 'unused' is never used."), "{stderr}");
}

#[test]
fn unused_parameter_is_reported() {
    let (_, stderr, ok) = run_source("fun f(x) {} f(1);");
    assert!(!ok);
    assert!(stderr.contains("Local variable 'x' is never used."), "{stderr}");
}
