use std::cell::RefCell;
use std::collections::HashMap;
use std::io::Write;
use std::rc::Rc;

use crate::error::RuntimeError;
use crate::token::Token;
use crate::value::Value;

/// A scope frame shared by every reference to it. `Rc<RefCell<_>>` stands in for the
/// garbage-collected heap a managed-language interpreter would use: closures and bound
/// methods each hold a clone of the `EnvRef` their defining scope produced, so the frame
/// outlives the block that created it for exactly as long as something still points to it.
pub type EnvRef = Rc<RefCell<Environment>>;

/// One lexical scope. Besides variable bindings, carries the output sink (inherited from
/// the global frame down through every child, so `print` always reaches the stream the
/// driver configured) and the break/return signal flags that stand in for exception-based
/// control flow.
pub struct Environment {
    enclosing: Option<EnvRef>,
    values: HashMap<String, Value>,
    output: Rc<RefCell<dyn Write>>,
    break_requested: bool,
    return_value: Option<Value>,
}

impl Environment {
    /// Creates the outermost (global) scope.
    pub fn new_global(output: Rc<RefCell<dyn Write>>) -> EnvRef {
        Rc::new(RefCell::new(Environment {
            enclosing: None,
            values: HashMap::new(),
            output,
            break_requested: false,
            return_value: None,
        }))
    }

    /// Creates a child scope nested directly inside `enclosing`, inheriting its output
    /// sink.
    pub fn with_enclosing(enclosing: &EnvRef) -> EnvRef {
        let output = Rc::clone(&enclosing.borrow().output);
        Rc::new(RefCell::new(Environment {
            enclosing: Some(Rc::clone(enclosing)),
            values: HashMap::new(),
            output,
            break_requested: false,
            return_value: None,
        }))
    }

    pub fn define(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_string(), value);
    }

    pub fn output(&self) -> Rc<RefCell<dyn Write>> {
        Rc::clone(&self.output)
    }

    pub fn print_line(&self, text: &str) {
        let mut out = self.output.borrow_mut();
        let _ = writeln!(out, "{text}");
    }

    pub fn request_break(&mut self) {
        self.break_requested = true;
    }

    pub fn break_requested(&self) -> bool {
        self.break_requested
    }

    pub fn clear_break(&mut self) {
        self.break_requested = false;
    }

    pub fn request_return(&mut self, value: Value) {
        self.return_value = Some(value);
    }

    pub fn return_requested(&self) -> bool {
        self.return_value.is_some()
    }

    pub fn take_return_value(&mut self) -> Option<Value> {
        self.return_value.take()
    }
}

/// Walks `distance` enclosing links up from `env`. The resolver guarantees `distance` never
/// overruns the chain for a program that passed resolution.
fn ancestor(env: &EnvRef, distance: usize) -> EnvRef {
    let mut current = Rc::clone(env);

    for _ in 0..distance {
        let parent = current
            .borrow()
            .enclosing
            .clone()
            .unwrap_or_else(|| panic!("enclosing environment to exist at depth {distance}"));
        current = parent;
    }

    current
}

/// Reads a variable known (via the resolver) to live exactly `distance` scopes up.
pub fn get_at(env: &EnvRef, distance: usize, name: &Token) -> Result<Value, RuntimeError> {
    let target = ancestor(env, distance);
    let value = target.borrow().values.get(&name.lexeme).cloned();
    value.ok_or_else(|| undefined(name))
}

/// Assigns a variable known (via the resolver) to live exactly `distance` scopes up.
pub fn assign_at(env: &EnvRef, distance: usize, name: &Token, value: Value) {
    let target = ancestor(env, distance);
    target.borrow_mut().values.insert(name.lexeme.clone(), value);
}

/// Reads a global by name directly, bypassing distance resolution entirely — globals are
/// late-bound so a forward reference inside a function body can resolve once the program
/// finishes loading.
pub fn get_global(globals: &EnvRef, name: &Token) -> Result<Value, RuntimeError> {
    globals.borrow().values.get(&name.lexeme).cloned().ok_or_else(|| undefined(name))
}

/// Assigns a global by name, failing if it was never declared.
pub fn assign_global(globals: &EnvRef, name: &Token, value: Value) -> Result<(), RuntimeError> {
    let mut scope = globals.borrow_mut();
    if scope.values.contains_key(&name.lexeme) {
        scope.values.insert(name.lexeme.clone(), value);
        Ok(())
    } else {
        Err(undefined(name))
    }
}

/// Propagates a break/return signal raised in `child` out to `parent` on block exit. This
/// is the Rust-ownership analogue of the original interpreter's destructor-time signal
/// propagation: there is no destructor hook to rely on, so the block statement calls this
/// explicitly right after executing its body.
pub fn propagate_signal(child: &EnvRef, parent: &EnvRef) {
    let mut child_scope = child.borrow_mut();

    if child_scope.break_requested {
        parent.borrow_mut().request_break();
    }

    if let Some(value) = child_scope.return_value.take() {
        parent.borrow_mut().request_return(value);
    }
}

fn undefined(name: &Token) -> RuntimeError {
    RuntimeError { token: name.clone(), message: format!("Undefined variable '{}'.", name.lexeme) }
}
