#![allow(clippy::needless_return)]

//! Gekko is a dynamically typed, lexically scoped scripting language with first-class
//! functions, closures, and single-inheritance classes. Gekko is a tree-walk interpreter
//! with a hand-written recursive descent parser, in the tradition of the
//! [Crafting Interpreters](https://craftinginterpreters.com/) book.
//!
//! ## Scanning
//! The first step is scanning: turning the source text into a flat list of [`Token`](token::Token)s.
//! The scanner is implemented in [`scanner`](scanner) as a state machine over the source
//! characters. Lexical errors (an unterminated string, an unexpected character) are
//! reported as they are found and do not stop the scan — later tokens are still produced,
//! so a user can see every lexical problem in one pass.
//!
//! ## Parsing
//! The second step is parsing: turning the token list into an abstract syntax tree. The
//! parser is implemented in [`parser`](parser) as a recursive descent parser following a
//! single precedence chain from the comma operator down through assignment, the ternary
//! conditional, the logical and equality/comparison/arithmetic operators, to unary, call,
//! and primary expressions. [`Expr`](expr::Expr) nodes produce a [`Value`](value::Value);
//! [`Stmt`](stmt::Stmt) nodes perform an action. Syntax errors are reported as
//! [`ParseError`](error::ParseError)s; the parser synchronizes to the next likely statement
//! boundary and keeps parsing, so multiple syntax errors surface in one run.
//!
//! ## Resolving
//! The third step, [`resolver`](resolver), is a static pass between parsing and evaluation.
//! It computes, for every variable/`this`/`super` reference, how many enclosing scopes
//! separate it from its declaration, so the interpreter can jump straight there at runtime
//! instead of searching by name. It also reports everything that is syntactically valid
//! but semantically wrong: a variable read before its initializer finishes, `this`/`super`
//! outside a class, `break` outside a loop, returning a value from a constructor, an
//! unused local, unreachable code after `break`/`return`. A program with any resolver error
//! is never handed to the interpreter.
//!
//! ## Interpreting
//! The final step, [`interpreter`](interpreter), walks the resolved tree directly — no
//! bytecode, no separate compile step. It owns the global scope and the resolver's
//! node-id-to-distance table for the lifetime of one program, and reports the first
//! [`RuntimeError`](error::RuntimeError) it hits, stopping there.

use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

pub mod ast_printer;
pub mod callable;
pub mod class;
pub mod environment;
pub mod error;
pub mod expr;
pub mod interpreter;
pub mod parser;
pub mod resolver;
pub mod scanner;
pub mod stmt;
pub mod token;
pub mod value;

use error::ErrorReporter;
use interpreter::Interpreter;
use parser::Parser;
use resolver::Resolver;
use scanner::Scanner;

/// One running Gekko program. Owns the interpreter (and through it, the global
/// environment), so that successive calls to [`Gekko::run`] — one per REPL line, or one
/// for a whole file — share the same global scope and persist across top-level
/// statements.
pub struct Gekko {
    interpreter: Interpreter,
}

impl Gekko {
    pub fn new(output: Rc<RefCell<dyn Write>>) -> Self {
        Gekko { interpreter: Interpreter::new(output) }
    }

    /// Scans, parses, resolves and (if nothing above failed) interprets `source` against
    /// the persistent global environment, writing diagnostics to `err_out`. Returns `true`
    /// if the whole pipeline ran without a scan, parse, resolve or runtime error.
    pub fn run(&mut self, source: &str, err_out: &mut dyn Write) -> bool {
        let mut reporter = ErrorReporter::new(err_out);

        let tokens = Scanner::new(source).scan_tokens(&mut reporter);
        if reporter.had_error() {
            return false;
        }

        let statements = Parser::new(tokens, &mut reporter).parse();
        if reporter.had_error() {
            return false;
        }

        Resolver::new(&mut self.interpreter, &mut reporter).resolve(&statements);
        if reporter.had_error() {
            return false;
        }

        self.interpreter.interpret(&statements, &mut reporter);
        !reporter.had_runtime_error()
    }
}
