mod common;

use common::run_source;

#[test]
fn if_else_branches() {
    let (stdout, stderr, ok) = run_source(
        r#"
        if (true) print "then"; else print "else";
        if (false) print "then"; else print "else";
        "#,
    );
    assert!(ok, "{stderr}");
    assert_eq!(stdout, "then\nelse\n");
}

#[test]
fn while_loop() {
    let (stdout, stderr, ok) = run_source(
        r#"
        var i = 0;
        while (i < 3) {
            print i;
            i = i + 1;
        }
        "#,
    );
    assert!(ok, "{stderr}");
    assert_eq!(stdout, "0\n1\n2\n");
}

#[test]
fn for_loop_desugars_to_while() {
    let (stdout, stderr, ok) = run_source("for (var i = 0; i < 3; i = i + 1) print i;");
    assert!(ok, "{stderr}");
    assert_eq!(stdout, "0\n1\n2\n");
}

#[test]
fn break_exits_innermost_loop_only() {
    let (stdout, stderr, ok) = run_source(
        r#"
        var i = 0;
        while (i < 5) {
            if (i == 3) break;
            print i;
            i = i + 1;
        }
        print "after";
        "#,
    );
    assert!(ok, "{stderr}");
    assert_eq!(stdout, "0\n1\n2\nafter\n");
}

#[test]
fn break_outside_loop_is_a_resolve_error() {
    let (_, stderr, ok) = run_source("break;");
    assert!(!ok);
    assert!(stderr.contains("Cannot use 'break' outside of a loop."), "{stderr}");
}

#[test]
fn unreachable_code_after_return_is_reported() {
    let (_, stderr, ok) = run_source("fun f() { return 1; print \"dead\"; } f();");
    assert!(!ok);
    assert!(stderr.contains("Unreachable code."), "{stderr}");
}

#[test]
fn unreachable_code_after_break_is_reported() {
    let (_, stderr, ok) = run_source("while (true) { break; print \"dead\"; }");
    assert!(!ok);
    assert!(stderr.contains("Unreachable code."), "{stderr}");
}

#[test]
fn return_outside_function_is_a_resolve_error() {
    let (_, stderr, ok) = run_source("return 1;");
    assert!(!ok);
    assert!(stderr.contains("Cannot return from top-level code."), "{stderr}");
}
