mod common;

use common::run_source;

#[test]
fn super_outside_a_class_is_a_resolve_error() {
    let (_, stderr, ok) = run_source("super.foo();");
    assert!(!ok);
    assert!(stderr.contains("Cannot use 'super' outside of a class."), "{stderr}");
}

#[test]
fn super_in_a_class_with_no_superclass_is_a_resolve_error() {
    let (_, stderr, ok) = run_source(
        r#"
        class Foo {
            bar() {
                super.bar();
            }
        }
        "#,
    );
    assert!(!ok);
    assert!(stderr.contains("Cannot use 'super' in a class with no superclass."), "{stderr}");
}

#[test]
fn invalid_assignment_target_is_a_parse_error() {
    let (_, stderr, ok) = run_source("1 + 2 = 3;");
    assert!(!ok);
    assert!(stderr.contains("Invalid assignment target."), "{stderr}");
}

#[test]
fn a_reported_error_prevents_interpretation() {
    let (stdout, _, ok) = run_source("print \"before\"; var a = a;");
    assert!(!ok);
    assert_eq!(stdout, "", "program must not run once a resolve error was reported");
}

#[test]
fn unreachable_code_does_not_stop_the_resolver_from_finding_later_errors() {
    let (_, stderr, ok) = run_source("fun f() { return 1; print this; } f();");
    assert!(!ok);
    assert!(stderr.contains("Unreachable code."), "{stderr}");
    assert!(stderr.contains("Cannot use 'this' outside of a class."), "{stderr}");
}
