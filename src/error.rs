use std::io::Write;

use crate::token::{Token, Type};

/// Threads the diagnostic sink and had-error/had-runtime-error flags through a single
/// `run()` call, rather than a pair of process-global flags: the REPL, the file driver,
/// and the test harness each need their own injectable output stream, which a process
/// global can't give us.
pub struct ErrorReporter<'a> {
    err_out: &'a mut dyn Write,
    had_error: bool,
    had_runtime_error: bool,
}

impl<'a> ErrorReporter<'a> {
    pub fn new(err_out: &'a mut dyn Write) -> Self {
        ErrorReporter { err_out, had_error: false, had_runtime_error: false }
    }

    pub fn had_error(&self) -> bool {
        self.had_error
    }

    pub fn had_runtime_error(&self) -> bool {
        self.had_runtime_error
    }

    pub fn scan_error(&mut self, line: usize, message: &str) {
        ScanError { line, message: message.to_string() }.throw(self.err_out);
        self.had_error = true;
    }

    pub fn token_error(&mut self, token: &Token, message: &str) {
        ParseError { token: token.clone(), message: message.to_string() }.throw(self.err_out);
        self.had_error = true;
    }

    pub fn resolve_error(&mut self, token: &Token, message: &str) {
        ResolveError { token: token.clone(), message: message.to_string() }.throw(self.err_out);
        self.had_error = true;
    }

    pub fn runtime_error(&mut self, err: &RuntimeError) {
        err.throw(self.err_out);
        self.had_runtime_error = true;
    }
}

/// Every diagnostic struct implements this so the four error kinds share one formatting
/// seam even though `ErrorReporter` (not the struct itself) owns the output sink and the
/// had-error flags.
pub trait Error {
    /// Writes this diagnostic's one-line message to `out`.
    fn throw(&self, out: &mut dyn Write);
}

/// A scan-time diagnostic: source text that doesn't tokenize. Carries only a line, since
/// there is no token to anchor to yet.
#[derive(Debug)]
pub struct ScanError {
    pub line: usize,
    pub message: String,
}

impl Error for ScanError {
    fn throw(&self, out: &mut dyn Write) {
        let _ = writeln!(out, "[line {}] Error: {}", self.line, self.message);
    }
}

/// A parse-time diagnostic: a token stream that doesn't match the grammar.
#[derive(Debug)]
pub struct ParseError {
    pub token: Token,
    pub message: String,
}

impl Error for ParseError {
    fn throw(&self, out: &mut dyn Write) {
        throw_at_token(out, &self.token, &self.message);
    }
}

/// A resolve-time diagnostic: a syntactically valid program that violates a static rule
/// (duplicate binding, `this` outside a class, unreachable code, an unused local, ...).
#[derive(Debug)]
pub struct ResolveError {
    pub token: Token,
    pub message: String,
}

impl Error for ResolveError {
    fn throw(&self, out: &mut dyn Write) {
        throw_at_token(out, &self.token, &self.message);
    }
}

/// A runtime diagnostic raised while evaluating an already-resolved program.
#[derive(Debug)]
pub struct RuntimeError {
    pub token: Token,
    pub message: String,
}

impl Error for RuntimeError {
    fn throw(&self, out: &mut dyn Write) {
        let _ = writeln!(out, "[line {}]: {}", self.token.line, self.message);
    }
}

/// Shared by `ParseError` and `ResolveError`, which both anchor to a token and format
/// identically.
fn throw_at_token(out: &mut dyn Write, token: &Token, message: &str) {
    if token.r#type == Type::EOF {
        let _ = writeln!(out, "[line {}] Error at end: {message}", token.line);
    } else {
        let _ = writeln!(out, "[line {}] Error at '{}': {message}", token.line, token.lexeme);
    }
}
