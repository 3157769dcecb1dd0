use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::callable::Callable;
use crate::class::{Class, Instance};
use crate::error::RuntimeError;
use crate::token::Token;

/// Every runtime value a Gekko expression can produce: one tagged union rather than
/// a split between a literal type and a boxed-object type.
#[derive(Clone)]
pub enum Value {
    Nil,
    Boolean(bool),
    Number(f64),
    String(String),
    Callable(Rc<dyn Callable>),
    Class(Rc<RefCell<Class>>),
    Instance(Rc<RefCell<Instance>>),
}

impl Value {
    /// Everything is truthy except `nil` and `false`.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Nil => false,
            Value::Boolean(b) => *b,
            _ => true,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Boolean(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Callable(_) => "function",
            Value::Class(_) => "class",
            Value::Instance(_) => "instance",
        }
    }
}

/// Cross-type equality is a runtime error, not `false`; this mirrors the original
/// interpreter's `AreEqual`, which special-cases `nil` on the left (any `nil`
/// comparison answers rather than throws) but rejects any other type mismatch.
pub fn values_equal(token: &Token, lhs: &Value, rhs: &Value) -> Result<bool, RuntimeError> {
    match lhs {
        Value::Nil => Ok(matches!(rhs, Value::Nil)),
        Value::Boolean(l) => match rhs {
            Value::Boolean(r) => Ok(l == r),
            _ => Err(expecting("boolean", token)),
        },
        Value::Number(l) => match rhs {
            Value::Number(r) => Ok(l == r),
            _ => Err(expecting("number", token)),
        },
        Value::String(l) => match rhs {
            Value::String(r) => Ok(l == r),
            _ => Err(expecting("string", token)),
        },
        _ => Err(RuntimeError {
            token: token.clone(),
            message: "Unsupported left operand type.".to_string(),
        }),
    }
}

fn expecting(type_name: &str, token: &Token) -> RuntimeError {
    RuntimeError {
        token: token.clone(),
        message: format!("Expecting {type_name} as right hand operand."),
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::String(s) => write!(f, "{s}"),
            Value::Callable(c) => write!(f, "{}", c.display()),
            Value::Class(c) => write!(f, "{}", c.borrow()),
            Value::Instance(i) => write!(f, "{}", i.borrow()),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}
