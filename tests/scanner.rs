mod common;

use common::run_source;
use gekko::error::ErrorReporter;
use gekko::scanner::Scanner;
use gekko::token::Type;

fn scan(source: &str) -> Vec<gekko::token::Token> {
    let mut stderr = Vec::new();
    let mut reporter = ErrorReporter::new(&mut stderr);
    Scanner::new(source).scan_tokens(&mut reporter)
}

#[test]
fn every_token_stream_ends_in_exactly_one_eof() {
    for source in ["", "print 1;", "var a = \"x\" + 1; // trailing comment", "/* only a comment */"] {
        let tokens = scan(source);
        assert_eq!(tokens.last().unwrap().r#type, Type::EOF, "source: {source:?}");
        assert_eq!(tokens.iter().filter(|t| t.r#type == Type::EOF).count(), 1, "source: {source:?}");
    }
}

#[test]
fn scanning_identical_input_twice_yields_identical_token_types_and_lexemes() {
    let source = "var a = 1; while (a < 3) { a = a + 1; } print a;";
    let first = scan(source);
    let second = scan(source);

    assert_eq!(first.len(), second.len());
    for (a, b) in first.iter().zip(second.iter()) {
        assert_eq!(a.r#type, b.r#type);
        assert_eq!(a.lexeme, b.lexeme);
    }
}

#[test]
fn line_comment_is_ignored() {
    let (stdout, stderr, ok) = run_source("print 1; // this is ignored\nprint 2;");
    assert!(ok, "{stderr}");
    assert_eq!(stdout, "1\n2\n");
}

#[test]
fn block_comment_is_ignored() {
    let (stdout, stderr, ok) = run_source("print 1; /* this\nspans several\nlines */ print 2;");
    assert!(ok, "{stderr}");
    assert_eq!(stdout, "1\n2\n");
}

#[test]
fn block_comment_does_not_nest() {
    // The inner "/*" is just more comment text; the first "*/" closes the whole comment.
    // If nesting were (incorrectly) supported this would need a second closer and report
    // "Unterminated comment block" instead of running `print 1;`.
    let (stdout, stderr, ok) = run_source("/* /* */print 1;");
    assert!(ok, "{stderr}");
    assert_eq!(stdout, "1\n");
}

#[test]
fn block_comment_advances_line_counter_for_later_errors() {
    let (_, stderr, ok) = run_source("/* line one\nline two\nline three */ print 1 / 0;");
    assert!(!ok);
    assert!(stderr.contains("[line 3]"), "{stderr}");
}

#[test]
fn unterminated_block_comment_is_a_scan_error() {
    let (_, stderr, ok) = run_source("print 1; /* never closed");
    assert!(!ok);
    assert!(stderr.contains("Unterminated comment block"), "{stderr}");
}

#[test]
fn unterminated_string_is_a_scan_error() {
    let (_, stderr, ok) = run_source(r#"print "never closed;"#);
    assert!(!ok);
    assert!(stderr.contains("Unterminated string"), "{stderr}");
}

#[test]
fn string_literal_can_span_multiple_lines() {
    let (stdout, stderr, ok) = run_source("print \"a\nb\";");
    assert!(ok, "{stderr}");
    assert_eq!(stdout, "a\nb\n");
}

#[test]
fn unexpected_character_is_a_scan_error_but_scanning_continues() {
    let (_, stderr, ok) = run_source("print 1; @ print 2;");
    assert!(!ok);
    assert!(stderr.contains("Unexpected character '@'"), "{stderr}");
}

#[test]
fn empty_source_is_a_no_op() {
    let (stdout, stderr, ok) = run_source("");
    assert!(ok, "{stderr}");
    assert_eq!(stdout, "");
}

#[test]
fn identifier_allows_leading_underscore_and_digits_after_first_char() {
    let (stdout, stderr, ok) = run_source("var _a1 = 42; print _a1;");
    assert!(ok, "{stderr}");
    assert_eq!(stdout, "42\n");
}
