use std::rc::Rc;

use crate::expr::{Expr, VariableData};
use crate::token::Token;

#[derive(Debug, Clone)]
pub enum Stmt {
    Expression(Box<Expr>),
    Print(Box<Expr>),
    VarDecl(VarDeclData),
    FunctionDecl(Rc<FunctionDeclData>),
    ClassDecl(Rc<ClassData>),
    Block(Vec<Stmt>),
    If(IfData),
    While(WhileData),
    Break(Token),
    Return(ReturnData),
}

#[derive(Debug, Clone)]
pub struct VarDeclData {
    pub name: Token,
    pub initializer: Option<Box<Expr>>,
}

/// Distinguishes a plain function from a method/static-method/getter so the resolver can
/// track `this`/`inside_static_method` correctly and the interpreter can skip arity checks
/// for getters (called with zero arguments implicitly, on property access).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionKind {
    Function,
    Method,
    StaticMethod,
    Getter,
}

#[derive(Debug, Clone)]
pub struct FunctionDeclData {
    pub name: Token,
    pub params: Vec<Token>,
    pub body: Rc<Vec<Stmt>>,
    pub kind: FunctionKind,
}

#[derive(Debug, Clone)]
pub struct ClassData {
    pub name: Token,
    pub superclass: Option<VariableData>,
    pub methods: Vec<Rc<FunctionDeclData>>,
}

#[derive(Debug, Clone)]
pub struct IfData {
    pub condition: Box<Expr>,
    pub then_branch: Box<Stmt>,
    pub else_branch: Option<Box<Stmt>>,
}

#[derive(Debug, Clone)]
pub struct WhileData {
    pub condition: Box<Expr>,
    pub body: Box<Stmt>,
}

#[derive(Debug, Clone)]
pub struct ReturnData {
    pub keyword: Token,
    pub value: Option<Box<Expr>>,
}
