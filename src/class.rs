use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::callable::{Callable, Function};
use crate::error::RuntimeError;
use crate::interpreter::Interpreter;
use crate::token::Token;
use crate::value::Value;

pub struct Class {
    pub name: String,
    pub superclass: Option<Rc<RefCell<Class>>>,
    pub methods: HashMap<String, Function>,
    pub static_methods: HashMap<String, Function>,
    pub getters: HashMap<String, Function>,
}

impl Class {
    pub fn new(
        name: String,
        superclass: Option<Rc<RefCell<Class>>>,
        methods: HashMap<String, Function>,
        static_methods: HashMap<String, Function>,
        getters: HashMap<String, Function>,
    ) -> Self {
        Class { name, superclass, methods, static_methods, getters }
    }

    /// Instance methods and getters walk the superclass chain; static methods
    /// deliberately do not — non-inheritance is the simpler and more common convention
    /// for class-side methods, and keeps static dispatch a pure name lookup.
    pub fn find_method(&self, name: &str) -> Option<Function> {
        self.methods
            .get(name)
            .cloned()
            .or_else(|| self.superclass.as_ref().and_then(|sup| sup.borrow().find_method(name)))
    }

    pub fn find_getter(&self, name: &str) -> Option<Function> {
        self.getters
            .get(name)
            .cloned()
            .or_else(|| self.superclass.as_ref().and_then(|sup| sup.borrow().find_getter(name)))
    }

    pub fn find_static_method(&self, name: &str) -> Option<Function> {
        self.static_methods.get(name).cloned()
    }

    /// The constructor is the method whose name equals the class's own name.
    pub fn constructor(&self) -> Option<Function> {
        self.methods.get(&self.name).cloned()
    }
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "<class {}>", self.name)
    }
}

/// Arity of `class`'s constructor, or 0 if it declares none — used by the interpreter to
/// validate a `Call` expression's argument count before [`instantiate`] runs.
pub fn arity(class: &Rc<RefCell<Class>>) -> usize {
    class.borrow().constructor().map_or(0, |c| c.arity())
}

/// Constructs a new instance of `class`, binding and invoking its constructor (if any)
/// with `arguments`. A free function rather than a `Callable` impl on `Class`, since
/// building the instance needs the `Rc<RefCell<Class>>` itself, not just a borrowed
/// `&Class`.
pub fn instantiate(
    class: &Rc<RefCell<Class>>,
    interpreter: &mut Interpreter,
    arguments: Vec<Value>,
) -> Result<Value, RuntimeError> {
    let instance = Rc::new(RefCell::new(Instance::new(Rc::clone(class))));

    if let Some(constructor) = class.borrow().constructor() {
        let bound = constructor.bind(Value::Instance(Rc::clone(&instance)));
        bound.call(interpreter, arguments)?;
    }

    Ok(Value::Instance(instance))
}

pub struct Instance {
    pub class: Rc<RefCell<Class>>,
    pub fields: HashMap<String, Value>,
}

impl Instance {
    pub fn new(class: Rc<RefCell<Class>>) -> Self {
        Instance { class, fields: HashMap::new() }
    }

    /// Resolves a property access: a field wins over a getter, which wins over a bound
    /// method. Getters are invoked immediately (they never take an explicit call); methods
    /// are returned as a bound but uninvoked callable.
    pub fn get(
        instance: &Rc<RefCell<Instance>>,
        name: &Token,
        interpreter: &mut Interpreter,
    ) -> Result<Value, RuntimeError> {
        let class = {
            let this = instance.borrow();
            if let Some(field) = this.fields.get(&name.lexeme) {
                return Ok(field.clone());
            }
            Rc::clone(&this.class)
        };

        if let Some(getter) = class.borrow().find_getter(&name.lexeme) {
            let bound = getter.bind(Value::Instance(Rc::clone(instance)));
            return bound.call(interpreter, vec![]);
        }

        if let Some(method) = class.borrow().find_method(&name.lexeme) {
            let bound = method.bind(Value::Instance(Rc::clone(instance)));
            return Ok(Value::Callable(Rc::new(bound)));
        }

        Err(RuntimeError {
            token: name.clone(),
            message: format!("Undefined property '{}'.", name.lexeme),
        })
    }

    pub fn set(&mut self, name: &Token, value: Value) {
        self.fields.insert(name.lexeme.clone(), value);
    }
}

impl fmt::Display for Instance {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "<instance {}>", self.class.borrow().name)
    }
}
