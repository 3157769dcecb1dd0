use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Instant;

use crate::callable::{clock, Callable, Function};
use crate::class::{self, Class, Instance};
use crate::environment::{self, EnvRef, Environment};
use crate::error::{ErrorReporter, RuntimeError};
use crate::expr::{BinaryData, CallData, Expr, NodeId};
use crate::stmt::{ClassData, FunctionKind, Stmt};
use crate::token::{Token, Type};
use crate::value::{values_equal, Value};

/// Walks a resolved AST, evaluating expressions and executing statements directly (no
/// bytecode, no separate compile step). Carries the global scope and the resolver's
/// node-id -> scope-distance table for the lifetime of one program.
pub struct Interpreter {
    pub globals: EnvRef,
    locals: HashMap<NodeId, usize>,
    start_time: Instant,
}

impl Interpreter {
    pub fn new(output: Rc<RefCell<dyn std::io::Write>>) -> Self {
        let globals = Environment::new_global(output);
        globals.borrow_mut().define("clock", Value::Callable(Rc::new(clock())));

        Interpreter { globals, locals: HashMap::new(), start_time: Instant::now() }
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64()
    }

    /// Records the scope distance the resolver computed for one `Variable`/`Assign`/
    /// `This`/`Super` node.
    pub fn resolve(&mut self, id: NodeId, depth: usize) {
        self.locals.insert(id, depth);
    }

    /// Executes a full program against the global scope, reporting the first runtime
    /// error (if any) through `reporter` and stopping there (fail-fast: there is no
    /// recovery from a runtime error).
    pub fn interpret(&mut self, statements: &[Stmt], reporter: &mut ErrorReporter) {
        let globals = Rc::clone(&self.globals);

        for stmt in statements {
            if let Err(error) = self.execute(stmt, &globals) {
                reporter.runtime_error(&error);
                return;
            }
        }
    }

    fn execute(&mut self, stmt: &Stmt, env: &EnvRef) -> Result<(), RuntimeError> {
        match stmt {
            Stmt::Expression(expr) => {
                self.evaluate(expr, env)?;
                Ok(())
            }
            Stmt::Print(expr) => {
                let value = self.evaluate(expr, env)?;
                env.borrow().print_line(&value.to_string());
                Ok(())
            }
            Stmt::VarDecl(data) => {
                let value = match &data.initializer {
                    Some(initializer) => self.evaluate(initializer, env)?,
                    None => Value::Nil,
                };
                env.borrow_mut().define(&data.name.lexeme, value);
                Ok(())
            }
            Stmt::FunctionDecl(decl) => {
                let function = Function::new(decl, env);
                env.borrow_mut().define(&decl.name.lexeme, Value::Callable(Rc::new(function)));
                Ok(())
            }
            Stmt::ClassDecl(decl) => self.execute_class_decl(decl, env),
            Stmt::Block(statements) => {
                let block_env = Environment::with_enclosing(env);
                self.execute_statements(statements, &block_env)?;
                environment::propagate_signal(&block_env, env);
                Ok(())
            }
            Stmt::If(data) => {
                if self.evaluate(&data.condition, env)?.is_truthy() {
                    self.execute(&data.then_branch, env)?;
                } else if let Some(else_branch) = &data.else_branch {
                    self.execute(else_branch, env)?;
                }
                Ok(())
            }
            Stmt::While(data) => {
                while self.evaluate(&data.condition, env)?.is_truthy() {
                    self.execute(&data.body, env)?;

                    if env.borrow().break_requested() {
                        env.borrow_mut().clear_break();
                        break;
                    }

                    if env.borrow().return_requested() {
                        break;
                    }
                }
                Ok(())
            }
            Stmt::Break(_) => {
                env.borrow_mut().request_break();
                Ok(())
            }
            Stmt::Return(data) => {
                let value = match &data.value {
                    Some(expr) => self.evaluate(expr, env)?,
                    None => Value::Nil,
                };
                env.borrow_mut().request_return(value);
                Ok(())
            }
        }
    }

    /// Executes a statement list in `env`, stopping early once a break or return signal
    /// is pending. Shared by `Block` and by a function call's body.
    pub fn execute_statements(&mut self, statements: &[Stmt], env: &EnvRef) -> Result<(), RuntimeError> {
        for stmt in statements {
            self.execute(stmt, env)?;

            if env.borrow().break_requested() || env.borrow().return_requested() {
                break;
            }
        }

        Ok(())
    }

    fn execute_class_decl(&mut self, decl: &ClassData, env: &EnvRef) -> Result<(), RuntimeError> {
        let superclass = match &decl.superclass {
            Some(var) => match self.look_up_variable(&var.name, var.id, env)? {
                Value::Class(class) => Some(class),
                _ => {
                    return Err(RuntimeError {
                        token: var.name.clone(),
                        message: "Superclass must be a class.".to_string(),
                    })
                }
            },
            None => None,
        };

        // Methods close over a scope defining 'super' when there is one, so that scope
        // sits directly beneath the one each bound method layers 'this' on top of.
        let method_closure = match &superclass {
            Some(superclass) => {
                let super_env = Environment::with_enclosing(env);
                super_env.borrow_mut().define("super", Value::Class(Rc::clone(superclass)));
                super_env
            }
            None => Rc::clone(env),
        };

        let mut methods = HashMap::new();
        let mut static_methods = HashMap::new();
        let mut getters = HashMap::new();

        for method_decl in &decl.methods {
            let function = Function::new(method_decl, &method_closure);
            match method_decl.kind {
                FunctionKind::Method => {
                    methods.insert(method_decl.name.lexeme.clone(), function);
                }
                FunctionKind::StaticMethod => {
                    static_methods.insert(method_decl.name.lexeme.clone(), function);
                }
                FunctionKind::Getter => {
                    getters.insert(method_decl.name.lexeme.clone(), function);
                }
                FunctionKind::Function => {
                    unreachable!("class bodies only ever parse Method/StaticMethod/Getter")
                }
            }
        }

        let class = Class::new(decl.name.lexeme.clone(), superclass, methods, static_methods, getters);
        env.borrow_mut().define(&decl.name.lexeme, Value::Class(Rc::new(RefCell::new(class))));
        Ok(())
    }

    fn evaluate(&mut self, expr: &Expr, env: &EnvRef) -> Result<Value, RuntimeError> {
        match expr {
            Expr::Literal(value) => Ok(value.clone()),
            Expr::Grouping(data) => self.evaluate(&data.expr, env),
            Expr::Variable(data) => self.look_up_variable(&data.name, data.id, env),
            Expr::Assign(data) => {
                let value = self.evaluate(&data.value, env)?;
                match self.locals.get(&data.id) {
                    Some(&distance) => environment::assign_at(env, distance, &data.name, value.clone()),
                    None => environment::assign_global(&self.globals, &data.name, value.clone())?,
                }
                Ok(value)
            }
            Expr::Unary(data) => {
                let right = self.evaluate(&data.expr, env)?;
                match data.operator.r#type {
                    Type::Minus => Ok(Value::Number(-as_number(&right, &data.operator)?)),
                    Type::Bang => Ok(Value::Boolean(!right.is_truthy())),
                    _ => unreachable!("scanner/parser only ever produce Minus/Bang unary operators"),
                }
            }
            Expr::Binary(data) => self.evaluate_binary(data, env),
            Expr::Ternary(data) => {
                if self.evaluate(&data.condition, env)?.is_truthy() {
                    self.evaluate(&data.then_branch, env)
                } else {
                    self.evaluate(&data.else_branch, env)
                }
            }
            Expr::Logical(data) => {
                let left = self.evaluate(&data.left, env)?;
                match data.operator.r#type {
                    Type::Or if left.is_truthy() => Ok(left),
                    Type::And if !left.is_truthy() => Ok(left),
                    Type::Or | Type::And => self.evaluate(&data.right, env),
                    _ => unreachable!("parser only ever produces Or/And logical operators"),
                }
            }
            Expr::Call(data) => self.evaluate_call(data, env),
            Expr::Get(data) => {
                let object = self.evaluate(&data.object, env)?;
                match object {
                    Value::Instance(instance) => Instance::get(&instance, &data.name, self),
                    Value::Class(class) => match class.borrow().find_static_method(&data.name.lexeme) {
                        Some(method) => Ok(Value::Callable(Rc::new(method))),
                        None => Err(RuntimeError {
                            token: data.name.clone(),
                            message: format!("Undefined property '{}'.", data.name.lexeme),
                        }),
                    },
                    _ => Err(RuntimeError {
                        token: data.name.clone(),
                        message: "Only instances and classes have properties.".to_string(),
                    }),
                }
            }
            Expr::Set(data) => {
                let object = self.evaluate(&data.object, env)?;
                match object {
                    Value::Instance(instance) => {
                        let value = self.evaluate(&data.value, env)?;
                        instance.borrow_mut().set(&data.name, value.clone());
                        Ok(value)
                    }
                    _ => Err(RuntimeError {
                        token: data.name.clone(),
                        message: "Only instances have fields.".to_string(),
                    }),
                }
            }
            Expr::Lambda(data) => {
                Ok(Value::Callable(Rc::new(Function::lambda(data.params.clone(), Rc::clone(&data.body), env))))
            }
            Expr::This(data) => self.look_up_variable(&data.keyword, data.id, env),
            Expr::Super(data) => self.evaluate_super(data, env),
        }
    }

    fn evaluate_super(&mut self, data: &crate::expr::SuperData, env: &EnvRef) -> Result<Value, RuntimeError> {
        let distance =
            *self.locals.get(&data.id).expect("resolver to have resolved every 'super' reference");

        let superclass = match environment::get_at(env, distance, &data.keyword)? {
            Value::Class(class) => class,
            _ => unreachable!("'super' always resolves to a class value"),
        };

        // 'this' always sits exactly one scope nearer than 'super' in a method's closure
        // chain (see Function::bind).
        let this_token = Token::synthetic(Type::This, "this", data.keyword.line);
        let instance = match environment::get_at(env, distance - 1, &this_token)? {
            Value::Instance(instance) => instance,
            _ => unreachable!("'this' always resolves to an instance value"),
        };

        match superclass.borrow().find_method(&data.method.lexeme) {
            Some(method) => Ok(Value::Callable(Rc::new(method.bind(Value::Instance(instance))))),
            None => Err(RuntimeError {
                token: data.method.clone(),
                message: format!("Undefined property '{}'.", data.method.lexeme),
            }),
        }
    }

    fn look_up_variable(&self, name: &Token, id: NodeId, env: &EnvRef) -> Result<Value, RuntimeError> {
        match self.locals.get(&id) {
            Some(&distance) => environment::get_at(env, distance, name),
            None => environment::get_global(&self.globals, name),
        }
    }

    fn evaluate_binary(&mut self, data: &BinaryData, env: &EnvRef) -> Result<Value, RuntimeError> {
        let left = self.evaluate(&data.left, env)?;
        let right = self.evaluate(&data.right, env)?;
        let op = &data.operator;

        match op.r#type {
            // The comma operator evaluates both operands and keeps the right one.
            Type::Comma => Ok(right),

            Type::Greater => Ok(Value::Boolean(as_number(&left, op)? > as_number(&right, op)?)),
            Type::GreaterEqual => Ok(Value::Boolean(as_number(&left, op)? >= as_number(&right, op)?)),
            Type::Less => Ok(Value::Boolean(as_number(&left, op)? < as_number(&right, op)?)),
            Type::LessEqual => Ok(Value::Boolean(as_number(&left, op)? <= as_number(&right, op)?)),

            Type::BangEqual => Ok(Value::Boolean(!values_equal(op, &left, &right)?)),
            Type::EqualEqual => Ok(Value::Boolean(values_equal(op, &left, &right)?)),

            Type::Minus => Ok(Value::Number(as_number(&left, op)? - as_number(&right, op)?)),
            Type::Star => Ok(Value::Number(as_number(&left, op)? * as_number(&right, op)?)),
            Type::Slash => {
                let (l, r) = (as_number(&left, op)?, as_number(&right, op)?);
                if r == 0.0 {
                    return Err(RuntimeError { token: op.clone(), message: "Division by zero.".to_string() });
                }
                Ok(Value::Number(l / r))
            }

            Type::Plus => match (&left, &right) {
                (Value::Number(l), Value::Number(r)) => Ok(Value::Number(l + r)),
                (Value::String(l), Value::String(r)) => Ok(Value::String(l.clone() + r)),
                (Value::String(_), _) => Err(RuntimeError {
                    token: op.clone(),
                    message: "Expecting string as right hand operand.".to_string(),
                }),
                _ => Ok(Value::Number(as_number(&left, op)? + as_number(&right, op)?)),
            },

            _ => unreachable!("parser only ever produces comparison/equality/arithmetic binary operators"),
        }
    }

    fn evaluate_call(&mut self, data: &CallData, env: &EnvRef) -> Result<Value, RuntimeError> {
        let callee = self.evaluate(&data.callee, env)?;

        let mut arguments = Vec::with_capacity(data.arguments.len());
        for argument in &data.arguments {
            arguments.push(self.evaluate(argument, env)?);
        }

        match callee {
            Value::Callable(callable) => {
                check_arity(&data.paren, callable.arity(), arguments.len())?;
                callable.call(self, arguments)
            }
            Value::Class(ref class) => {
                check_arity(&data.paren, class::arity(class), arguments.len())?;
                class::instantiate(class, self, arguments)
            }
            _ => Err(RuntimeError {
                token: data.paren.clone(),
                message: "Can only call functions and classes.".to_string(),
            }),
        }
    }
}

fn check_arity(paren: &Token, expected: usize, got: usize) -> Result<(), RuntimeError> {
    if expected != got {
        return Err(RuntimeError {
            token: paren.clone(),
            message: format!("Expected {expected} arguments but got {got}."),
        });
    }
    Ok(())
}

fn as_number(value: &Value, token: &Token) -> Result<f64, RuntimeError> {
    match value {
        Value::Number(n) => Ok(*n),
        _ => Err(RuntimeError { token: token.clone(), message: "Operand must be a number.".to_string() }),
    }
}
