use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;
use std::{env, fs, process};

use gekko::Gekko;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

fn main() {
    let args: Vec<String> = env::args().collect();

    match args.len() {
        1 => run_prompt(),
        2 => run_file(&args[1]),
        _ => {
            println!("Usage: gekko [script]");
            process::exit(64);
        }
    }
}

/// Reads `path` and runs it once. A reported scan/parse/resolve/runtime error still
/// exits 0 — only a failure of the process itself (here, not being able to read the
/// file) is a non-zero exit.
fn run_file(path: &str) {
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("Could not read '{path}': {err}");
            process::exit(74);
        }
    };

    let stdout: Rc<RefCell<dyn Write>> = Rc::new(RefCell::new(io::stdout()));
    let mut gekko = Gekko::new(stdout);
    let mut stderr = io::stderr();

    gekko.run(&source, &mut stderr);
}

/// Interactive prompt: each line is run against the same persistent global environment.
fn run_prompt() {
    let stdout: Rc<RefCell<dyn Write>> = Rc::new(RefCell::new(io::stdout()));
    let mut gekko = Gekko::new(stdout);
    let mut stderr = io::stderr();

    let mut editor = DefaultEditor::new().expect("should be able to start the line editor");

    loop {
        match editor.readline("> ") {
            Ok(line) => {
                let _ = editor.add_history_entry(line.as_str());
                gekko.run(&line, &mut stderr);
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("Error: {err:?}");
                break;
            }
        }
    }
}
