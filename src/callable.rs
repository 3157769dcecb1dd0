use std::fmt;
use std::rc::Rc;

use crate::environment::{EnvRef, Environment};
use crate::error::RuntimeError;
use crate::interpreter::Interpreter;
use crate::stmt::{FunctionDeclData, FunctionKind, Stmt};
use crate::token::Token;
use crate::value::Value;

/// Anything invokable with `(...)`. Implemented by every user-defined function/method/
/// lambda (unified under `Function`) and by native functions such as `clock`.
pub trait Callable: fmt::Debug {
    fn call(&self, interpreter: &mut Interpreter, arguments: Vec<Value>) -> Result<Value, RuntimeError>;
    fn arity(&self) -> usize;
    fn display(&self) -> String;
}

/// A user-defined callable: a named function, a method/static-method/getter on a class, or
/// an anonymous lambda. `closure` is the scope the function literal was evaluated in —
/// calling it always opens one fresh child scope on top of `closure`, never on top of the
/// caller's scope, which is what gives Gekko lexical rather than dynamic scoping.
#[derive(Clone)]
pub struct Function {
    pub name: Option<Token>,
    pub params: Vec<Token>,
    pub body: Rc<Vec<Stmt>>,
    pub closure: EnvRef,
    pub kind: FunctionKind,
}

impl Function {
    pub fn new(decl: &FunctionDeclData, closure: &EnvRef) -> Self {
        Function {
            name: Some(decl.name.clone()),
            params: decl.params.clone(),
            body: Rc::clone(&decl.body),
            closure: Rc::clone(closure),
            kind: decl.kind,
        }
    }

    pub fn lambda(params: Vec<Token>, body: Rc<Vec<Stmt>>, closure: &EnvRef) -> Self {
        Function { name: None, params, body, closure: Rc::clone(closure), kind: FunctionKind::Function }
    }

    /// Layers a new scope defining `this` on top of this method's closure. When the
    /// method was inherited unchanged from a superclass, that closure was already layered
    /// on top of the scope defining `super`, so `this` lands exactly one resolver-distance
    /// hop nearer than `super` inside the method body.
    pub fn bind(&self, instance: Value) -> Function {
        let env = Environment::with_enclosing(&self.closure);
        env.borrow_mut().define("this", instance);
        Function { closure: env, ..self.clone() }
    }

}

impl Callable for Function {
    fn call(&self, interpreter: &mut Interpreter, arguments: Vec<Value>) -> Result<Value, RuntimeError> {
        let call_env = Environment::with_enclosing(&self.closure);

        for (param, arg) in self.params.iter().zip(arguments.into_iter()) {
            call_env.borrow_mut().define(&param.lexeme, arg);
        }

        interpreter.execute_statements(&self.body, &call_env)?;

        Ok(call_env.borrow_mut().take_return_value().unwrap_or(Value::Nil))
    }

    fn arity(&self) -> usize {
        self.params.len()
    }

    fn display(&self) -> String {
        match &self.name {
            Some(name) => format!("<fn {}>", name.lexeme),
            None => "<lambda>".to_string(),
        }
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// A Rust-implemented callable exposed to Gekko programs, e.g. `clock`.
pub struct NativeFunction {
    pub name: &'static str,
    pub arity: usize,
    pub function: fn(&mut Interpreter, Vec<Value>) -> Result<Value, RuntimeError>,
}

impl Callable for NativeFunction {
    fn call(&self, interpreter: &mut Interpreter, arguments: Vec<Value>) -> Result<Value, RuntimeError> {
        (self.function)(interpreter, arguments)
    }

    fn arity(&self) -> usize {
        self.arity
    }

    fn display(&self) -> String {
        format!("<native fn {}>", self.name)
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Wall-clock seconds elapsed since [`Interpreter::new`] was called.
pub fn clock() -> NativeFunction {
    NativeFunction {
        name: "clock",
        arity: 0,
        function: |interpreter, _arguments| Ok(Value::Number(interpreter.elapsed_seconds())),
    }
}
