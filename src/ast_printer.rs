use std::rc::Rc;

use crate::expr::Expr;
use crate::stmt::Stmt;

/// Builds a parenthesized s-expression for a (sub)expression, recursing through
/// `AstPrinter::print_expr`. Only ever fed `&Expr` arguments.
macro_rules! parenthesize {
    ( $self:ident, $name:expr, $( $x:expr ),+ ) => {
        {
            let mut string = String::new();
            string += "(";
            string += $name;
            $(
                string += " ";
                string += &$self.print_expr($x);
            )*
            string += ")";
            string
        }
    };
}

/// Debug-only AST-to-string printer, for tooling and test assertions rather than anything
/// a Gekko program can observe.
pub struct AstPrinter;

impl AstPrinter {
    pub fn print_expr(&self, expr: &Expr) -> String {
        match expr {
            Expr::Literal(value) => value.to_string(),
            Expr::Unary(data) => parenthesize!(self, &data.operator.lexeme, &data.expr),
            Expr::Binary(data) => parenthesize!(self, &data.operator.lexeme, &data.left, &data.right),
            Expr::Ternary(data) => {
                parenthesize!(self, "?:", &data.condition, &data.then_branch, &data.else_branch)
            }
            Expr::Grouping(data) => parenthesize!(self, "group", &data.expr),
            Expr::Variable(data) => data.name.lexeme.clone(),
            Expr::Assign(data) => {
                parenthesize!(self, format!("= {}", data.name.lexeme).as_str(), &data.value)
            }
            Expr::Logical(data) => parenthesize!(self, &data.operator.lexeme, &data.left, &data.right),
            Expr::Call(data) => {
                let args = data.arguments.iter().map(|arg| self.print_expr(arg)).collect::<Vec<_>>().join(" ");
                format!("({}{}{})", self.print_expr(&data.callee), if args.is_empty() { "" } else { " " }, args)
            }
            Expr::Get(data) => format!("(. {} {})", self.print_expr(&data.object), data.name.lexeme),
            Expr::Set(data) => format!(
                "(set {} {} {})",
                self.print_expr(&data.object),
                data.name.lexeme,
                self.print_expr(&data.value)
            ),
            Expr::Lambda(data) => {
                let params = data.params.iter().map(|p| p.lexeme.clone()).collect::<Vec<_>>().join(" ");
                let body = self.print_block(&data.body);
                format!("(fun ({params}) {body})")
            }
            Expr::This(_) => "this".to_string(),
            Expr::Super(data) => format!("(super.{})", data.method.lexeme),
        }
    }

    pub fn print_stmt(&self, stmt: &Stmt) -> String {
        match stmt {
            Stmt::Expression(expr) => parenthesize!(self, "expr", expr),
            Stmt::Print(expr) => parenthesize!(self, "print", expr),
            Stmt::VarDecl(data) => match &data.initializer {
                Some(init) => format!("(var {} = {})", data.name.lexeme, self.print_expr(init)),
                None => format!("(var {})", data.name.lexeme),
            },
            Stmt::FunctionDecl(decl) => {
                let params = decl.params.iter().map(|p| p.lexeme.clone()).collect::<Vec<_>>().join(" ");
                format!("(fun {}({}) {})", decl.name.lexeme, params, self.print_block(&decl.body))
            }
            Stmt::ClassDecl(decl) => {
                let methods = decl
                    .methods
                    .iter()
                    .map(|m| self.print_stmt(&Stmt::FunctionDecl(Rc::clone(m))))
                    .collect::<Vec<_>>()
                    .join(" ");
                match &decl.superclass {
                    Some(sup) => format!("(class {} < {} {{ {} }})", decl.name.lexeme, sup.name.lexeme, methods),
                    None => format!("(class {} {{ {} }})", decl.name.lexeme, methods),
                }
            }
            Stmt::Block(statements) => self.print_block(statements),
            Stmt::If(data) => {
                let mut string = format!("(if {} {}", self.print_expr(&data.condition), self.print_stmt(&data.then_branch));
                if let Some(else_branch) = &data.else_branch {
                    string += &format!(" else {}", self.print_stmt(else_branch));
                }
                string += ")";
                string
            }
            Stmt::While(data) => {
                format!("(while {} {})", self.print_expr(&data.condition), self.print_stmt(&data.body))
            }
            Stmt::Break(_) => "(break)".to_string(),
            Stmt::Return(data) => match &data.value {
                Some(value) => format!("(return {})", self.print_expr(value)),
                None => "(return)".to_string(),
            },
        }
    }

    fn print_block(&self, statements: &[Stmt]) -> String {
        let body = statements.iter().map(|stmt| self.print_stmt(stmt)).collect::<Vec<_>>().join(" ");
        format!("{{ {body} }}")
    }
}
