mod common;

use common::run_source;

#[test]
fn arithmetic_precedence() {
    let (stdout, stderr, ok) = run_source("print 2 + 3 * 4;");
    assert!(ok, "{stderr}");
    assert_eq!(stdout, "14\n");
}

#[test]
fn string_concatenation() {
    let (stdout, stderr, ok) = run_source(r#"print "foo" + "bar";"#);
    assert!(ok, "{stderr}");
    assert_eq!(stdout, "foobar\n");
}

#[test]
fn comma_keeps_rightmost_value() {
    let (stdout, stderr, ok) = run_source("print (1, 2, 3);");
    assert!(ok, "{stderr}");
    assert_eq!(stdout, "3\n");
}

#[test]
fn ternary_picks_branch() {
    let (stdout, stderr, ok) = run_source(r#"print true ? "yes" : "no"; print false ? "yes" : "no";"#);
    assert!(ok, "{stderr}");
    assert_eq!(stdout, "yes\nno\n");
}

#[test]
fn ternary_branches_are_full_expressions() {
    let (stdout, stderr, ok) = run_source("print true ? 1 + 1 : 2 + 2;");
    assert!(ok, "{stderr}");
    assert_eq!(stdout, "2\n");
}

#[test]
fn division_by_zero_is_a_runtime_error() {
    let (stdout, stderr, ok) = run_source("print 1 / 0;");
    assert!(!ok);
    assert_eq!(stdout, "");
    assert!(stderr.contains("Division by zero."), "{stderr}");
}

#[test]
fn adding_a_number_to_a_string_reports_the_string_operand_rule() {
    let (_, stderr, ok) = run_source(r#"print "x" + 1;"#);
    assert!(!ok);
    assert!(stderr.contains("Expecting string as right hand operand."), "{stderr}");
}

#[test]
fn adding_a_string_to_a_number_reports_the_number_operand_rule() {
    let (_, stderr, ok) = run_source(r#"print 1 + "x";"#);
    assert!(!ok);
    assert!(stderr.contains("Operand must be a number."), "{stderr}");
}

#[test]
fn equality_across_types_is_a_runtime_error() {
    let (_, stderr, ok) = run_source(r#"print 1 == "1";"#);
    assert!(!ok);
    assert!(stderr.contains("Expecting number as right hand operand."), "{stderr}");
}

#[test]
fn nil_equality_never_throws() {
    let (stdout, stderr, ok) = run_source(r#"print nil == 1; print nil == nil;"#);
    assert!(ok, "{stderr}");
    assert_eq!(stdout, "false\ntrue\n");
}

#[test]
fn leading_binary_operator_is_a_parse_error() {
    let (_, stderr, ok) = run_source("print * 5;");
    assert!(!ok);
    assert!(stderr.contains("Binary operator appearing at the beginning of an expression."), "{stderr}");
}
