use std::collections::HashMap;
use std::mem;

use crate::error::ErrorReporter;
use crate::expr::*;
use crate::interpreter::Interpreter;
use crate::stmt::*;
use crate::token::Token;

#[derive(Clone, Copy, PartialEq, Eq)]
enum FunctionType {
    None,
    Function,
    Constructor,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum ClassType {
    None,
    Class,
    Subclass,
}

/// One open lexical scope. `bindings` maps a declared name to whether its initializer has
/// finished resolving yet (`false` while resolving the initializer itself, catching
/// `var a = a;`); `unused` tracks which of those names have not yet been read, for the
/// unused-local diagnostic.
struct Scope {
    bindings: HashMap<String, bool>,
    unused: HashMap<String, Token>,
}

impl Scope {
    fn new() -> Self {
        Scope { bindings: HashMap::new(), unused: HashMap::new() }
    }
}

/// Static pre-pass between parsing and evaluation: computes, for every variable/`this`/
/// `super` reference, how many enclosing scopes separate it from its declaration (so the
/// interpreter can jump straight there instead of searching by name), and reports a family
/// of diagnostics that only make sense with full lexical information in hand (duplicate
/// bindings, `this`/`super`/`break`/`return` misuse, unused locals, unreachable code).
pub struct Resolver<'i, 'r, 'e> {
    interpreter: &'i mut Interpreter,
    reporter: &'r mut ErrorReporter<'e>,
    scopes: Vec<Scope>,
    current_function: FunctionType,
    current_class: ClassType,
    inside_static_method: bool,
    inside_loop: bool,
}

impl<'i, 'r, 'e> Resolver<'i, 'r, 'e> {
    pub fn new(interpreter: &'i mut Interpreter, reporter: &'r mut ErrorReporter<'e>) -> Self {
        Resolver {
            interpreter,
            reporter,
            scopes: vec![],
            current_function: FunctionType::None,
            current_class: ClassType::None,
            inside_static_method: false,
            inside_loop: false,
        }
    }

    /// Resolves one statement list. Tracks the most recently seen `break`/`return` in
    /// this exact list so the statement right after it can be flagged unreachable; the
    /// tracking is naturally scoped to this call (a nested block resolves via its own
    /// recursive call, with its own fresh tracking).
    pub fn resolve(&mut self, statements: &[Stmt]) {
        let mut terminated_by: Option<Token> = None;

        for stmt in statements {
            if let Some(token) = terminated_by.take() {
                self.reporter.resolve_error(&token, "Unreachable code.");
            }

            self.resolve_stmt(stmt);

            terminated_by = match stmt {
                Stmt::Break(token) => Some(token.clone()),
                Stmt::Return(data) => Some(data.keyword.clone()),
                _ => None,
            };
        }
    }

    fn resolve_function(&mut self, params: &[Token], body: &[Stmt], kind: FunctionType) {
        let enclosing_function = mem::replace(&mut self.current_function, kind);

        self.begin_scope();
        for param in params {
            self.declare(param);
            self.define(param);
        }
        self.resolve(body);
        self.end_scope();

        self.current_function = enclosing_function;
    }

    fn begin_scope(&mut self) {
        self.scopes.push(Scope::new());
    }

    fn end_scope(&mut self) {
        let Some(scope) = self.scopes.pop() else { return };

        for (name, token) in scope.unused {
            self.reporter.resolve_error(&token, &format!("Local variable '{name}' is never used."));
        }
    }

    fn declare(&mut self, name: &Token) {
        let Some(scope) = self.scopes.last_mut() else { return };

        if scope.bindings.contains_key(&name.lexeme) {
            self.reporter.resolve_error(
                name,
                &format!("A variable is already defined with name '{}' in this scope.", name.lexeme),
            );
        }

        scope.bindings.insert(name.lexeme.clone(), false);
        scope.unused.insert(name.lexeme.clone(), name.clone());
    }

    fn define(&mut self, name: &Token) {
        let Some(scope) = self.scopes.last_mut() else { return };
        scope.bindings.insert(name.lexeme.clone(), true);
    }

    /// Defines a name the resolver itself introduces (`this`, `super`) — never tracked
    /// for the unused-local diagnostic, since the user didn't write the declaration.
    fn define_builtin(&mut self, name: &str) {
        let Some(scope) = self.scopes.last_mut() else { return };
        scope.bindings.insert(name.to_string(), true);
    }

    fn resolve_local(&mut self, name: &Token, id: NodeId) {
        for (i, scope) in self.scopes.iter_mut().rev().enumerate() {
            if scope.bindings.contains_key(&name.lexeme) {
                scope.unused.remove(&name.lexeme);
                self.interpreter.resolve(id, i);
                return;
            }
        }
        // Not found in any enclosing scope: treated as a global, resolved by name at
        // runtime instead of by distance.
    }

    fn resolve_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Expression(expr) => self.resolve_expr(expr),
            Stmt::Print(expr) => self.resolve_expr(expr),
            Stmt::VarDecl(data) => {
                self.declare(&data.name);
                if let Some(initializer) = &data.initializer {
                    self.resolve_expr(initializer);
                }
                self.define(&data.name);
            }
            Stmt::FunctionDecl(decl) => {
                self.declare(&decl.name);
                self.define(&decl.name);
                self.resolve_function(&decl.params, &decl.body, FunctionType::Function);
            }
            Stmt::ClassDecl(decl) => self.resolve_class(decl),
            Stmt::Block(statements) => {
                self.begin_scope();
                self.resolve(statements);
                self.end_scope();
            }
            Stmt::If(data) => {
                self.resolve_expr(&data.condition);
                self.resolve_stmt(&data.then_branch);
                if let Some(else_branch) = &data.else_branch {
                    self.resolve_stmt(else_branch);
                }
            }
            Stmt::While(data) => {
                self.resolve_expr(&data.condition);
                let enclosing_loop = mem::replace(&mut self.inside_loop, true);
                self.resolve_stmt(&data.body);
                self.inside_loop = enclosing_loop;
            }
            Stmt::Break(token) => {
                if !self.inside_loop {
                    self.reporter.resolve_error(token, "Cannot use 'break' outside of a loop.");
                }
            }
            Stmt::Return(data) => {
                if self.current_function == FunctionType::None {
                    self.reporter.resolve_error(&data.keyword, "Cannot return from top-level code.");
                }

                if let Some(value) = &data.value {
                    if self.current_function == FunctionType::Constructor {
                        self.reporter
                            .resolve_error(&data.keyword, "Cannot return a value from a constructor.");
                    }
                    self.resolve_expr(value);
                }
            }
        }
    }

    fn resolve_class(&mut self, decl: &ClassData) {
        let enclosing_class = mem::replace(&mut self.current_class, ClassType::Class);

        self.declare(&decl.name);
        self.define(&decl.name);

        if let Some(superclass) = &decl.superclass {
            if superclass.name.lexeme == decl.name.lexeme {
                self.reporter.resolve_error(&superclass.name, "A class cannot inherit from itself.");
            }

            self.current_class = ClassType::Subclass;
            self.resolve_local(&superclass.name, superclass.id);

            self.begin_scope();
            self.define_builtin("super");
        }

        self.begin_scope();
        self.define_builtin("this");

        for method in &decl.methods {
            if method.kind == FunctionKind::StaticMethod {
                let enclosing_static = mem::replace(&mut self.inside_static_method, true);
                self.resolve_function(&method.params, &method.body, FunctionType::Function);
                self.inside_static_method = enclosing_static;
                continue;
            }

            let kind = if method.name.lexeme == decl.name.lexeme {
                FunctionType::Constructor
            } else {
                FunctionType::Function
            };
            self.resolve_function(&method.params, &method.body, kind);
        }

        self.end_scope();

        if decl.superclass.is_some() {
            self.end_scope();
        }

        self.current_class = enclosing_class;
    }

    fn resolve_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Literal(_) => {}
            Expr::Unary(data) => self.resolve_expr(&data.expr),
            Expr::Binary(data) => {
                self.resolve_expr(&data.left);
                self.resolve_expr(&data.right);
            }
            Expr::Ternary(data) => {
                self.resolve_expr(&data.condition);
                self.resolve_expr(&data.then_branch);
                self.resolve_expr(&data.else_branch);
            }
            Expr::Grouping(data) => self.resolve_expr(&data.expr),
            Expr::Variable(data) => {
                if let Some(scope) = self.scopes.last() {
                    if scope.bindings.get(&data.name.lexeme) == Some(&false) {
                        self.reporter.resolve_error(
                            &data.name,
                            "Cannot read local variable in its own initializer.",
                        );
                    }
                }
                self.resolve_local(&data.name, data.id);
            }
            Expr::Assign(data) => {
                self.resolve_expr(&data.value);
                self.resolve_local(&data.name, data.id);
            }
            Expr::Logical(data) => {
                self.resolve_expr(&data.left);
                self.resolve_expr(&data.right);
            }
            Expr::Call(data) => {
                self.resolve_expr(&data.callee);
                for argument in &data.arguments {
                    self.resolve_expr(argument);
                }
            }
            Expr::Get(data) => self.resolve_expr(&data.object),
            Expr::Set(data) => {
                self.resolve_expr(&data.value);
                self.resolve_expr(&data.object);
            }
            Expr::Lambda(data) => {
                self.resolve_function(&data.params, &data.body, FunctionType::Function);
            }
            Expr::This(data) => {
                if self.current_class == ClassType::None {
                    self.reporter.resolve_error(&data.keyword, "Cannot use 'this' outside of a class.");
                    return;
                }
                if self.inside_static_method {
                    self.reporter.resolve_error(&data.keyword, "Cannot use 'this' in a static method.");
                    return;
                }
                self.resolve_local(&data.keyword, data.id);
            }
            Expr::Super(data) => {
                match self.current_class {
                    ClassType::Subclass => {}
                    ClassType::None => {
                        self.reporter.resolve_error(&data.keyword, "Cannot use 'super' outside of a class.")
                    }
                    ClassType::Class => self
                        .reporter
                        .resolve_error(&data.keyword, "Cannot use 'super' in a class with no superclass."),
                }
                self.resolve_local(&data.keyword, data.id);
            }
        }
    }
}
