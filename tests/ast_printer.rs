use gekko::ast_printer::AstPrinter;
use gekko::error::ErrorReporter;
use gekko::parser::Parser;
use gekko::scanner::Scanner;

fn parse(source: &str) -> Vec<gekko::stmt::Stmt> {
    let mut stderr = Vec::new();
    let mut reporter = ErrorReporter::new(&mut stderr);
    let tokens = Scanner::new(source).scan_tokens(&mut reporter);
    Parser::new(tokens, &mut reporter).parse()
}

#[test]
fn prints_a_binary_expression() {
    let statements = parse("1 + 2 * 3;");
    let printer = AstPrinter;
    let gekko::stmt::Stmt::Expression(expr) = &statements[0] else { panic!("expected an expression statement") };
    assert_eq!(printer.print_expr(expr), "(+ 1 (* 2 3))");
}

#[test]
fn prints_an_if_statement() {
    let statements = parse("if (true) print 1; else print 2;");
    let printer = AstPrinter;
    assert_eq!(printer.print_stmt(&statements[0]), "(if true (print 1) else (print 2))");
}
