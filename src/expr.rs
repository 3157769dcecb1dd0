use std::rc::Rc;

use crate::stmt::Stmt;
use crate::token::Token;
use crate::value::Value;

/// Identifies one `Variable`/`Assign`/`This`/`Super` node for the resolver's distance
/// table. Assigned at parse time by a monotonic counter rather than keying on the node's
/// address or structural equality, since the AST is plain owned data (no arena, no stable
/// pointers) and two syntactically identical references must still resolve independently.
pub type NodeId = u32;

#[derive(Debug, Clone)]
pub enum Expr {
    Unary(UnaryData),
    Binary(BinaryData),
    Ternary(TernaryData),
    Grouping(GroupingData),
    Literal(Value),
    Variable(VariableData),
    Assign(AssignData),
    Logical(LogicalData),
    Call(CallData),
    Get(GetData),
    Set(SetData),
    Lambda(LambdaData),
    This(ThisData),
    Super(SuperData),
}

#[derive(Debug, Clone)]
pub struct UnaryData {
    pub operator: Token,
    pub expr: Box<Expr>,
}

/// Also carries the comma operator (`operator.type == Type::Comma`), matching the
/// original parser which produces a plain binary node for it rather than a dedicated
/// variant.
#[derive(Debug, Clone)]
pub struct BinaryData {
    pub left: Box<Expr>,
    pub operator: Token,
    pub right: Box<Expr>,
}

#[derive(Debug, Clone)]
pub struct TernaryData {
    pub condition: Box<Expr>,
    pub then_branch: Box<Expr>,
    pub else_branch: Box<Expr>,
}

#[derive(Debug, Clone)]
pub struct GroupingData {
    pub expr: Box<Expr>,
}

#[derive(Debug, Clone)]
pub struct VariableData {
    pub name: Token,
    pub id: NodeId,
}

#[derive(Debug, Clone)]
pub struct AssignData {
    pub name: Token,
    pub value: Box<Expr>,
    pub id: NodeId,
}

#[derive(Debug, Clone)]
pub struct LogicalData {
    pub left: Box<Expr>,
    pub operator: Token,
    pub right: Box<Expr>,
}

#[derive(Debug, Clone)]
pub struct CallData {
    pub callee: Box<Expr>,
    pub paren: Token,
    pub arguments: Vec<Expr>,
}

#[derive(Debug, Clone)]
pub struct GetData {
    pub object: Box<Expr>,
    pub name: Token,
}

#[derive(Debug, Clone)]
pub struct SetData {
    pub object: Box<Expr>,
    pub name: Token,
    pub value: Box<Expr>,
}

#[derive(Debug, Clone)]
pub struct LambdaData {
    pub params: Vec<Token>,
    pub body: Rc<Vec<Stmt>>,
}

#[derive(Debug, Clone)]
pub struct ThisData {
    pub keyword: Token,
    pub id: NodeId,
}

#[derive(Debug, Clone)]
pub struct SuperData {
    pub keyword: Token,
    pub method: Token,
    pub id: NodeId,
}
