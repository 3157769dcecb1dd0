use std::cell::RefCell;
use std::rc::Rc;

use gekko::Gekko;

/// Runs one Gekko program against a fresh interpreter and captures both streams.
/// `ok` mirrors `Gekko::run`'s return value: `false` means a scan, parse, resolve or
/// runtime error was reported on `stderr`.
pub fn run_source(source: &str) -> (String, String, bool) {
    let stdout: Rc<RefCell<dyn std::io::Write>> = Rc::new(RefCell::new(Vec::new()));
    let mut stderr = Vec::new();

    let mut gekko = Gekko::new(Rc::clone(&stdout));
    let ok = gekko.run(source, &mut stderr);
    drop(gekko);

    let stdout = Rc::try_unwrap(stdout)
        .unwrap_or_else(|_| panic!("interpreter output sink still has other owners"))
        .into_inner();

    (
        String::from_utf8(stdout).expect("program output to be valid utf-8"),
        String::from_utf8(stderr).expect("diagnostics to be valid utf-8"),
        ok,
    )
}
