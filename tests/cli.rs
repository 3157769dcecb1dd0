use std::io::Write;
use std::time::{SystemTime, UNIX_EPOCH};
use std::{env, fs};

use assert_cmd::Command;

/// A throwaway `.gekko` script under the OS temp dir, removed on drop.
struct ScriptFile {
    path: std::path::PathBuf,
}

impl ScriptFile {
    fn new(source: &str) -> Self {
        let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
        let path = env::temp_dir().join(format!("gekko_cli_test_{nanos}.gekko"));
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(source.as_bytes()).unwrap();
        ScriptFile { path }
    }
}

impl Drop for ScriptFile {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

/// A reported scan/parse/resolve/runtime error still exits 0 — only a failure of the
/// process itself (unreadable script, bad invocation) is non-zero.
#[test]
fn running_a_script_with_a_runtime_error_still_exits_zero() {
    let script = ScriptFile::new("print 1 / 0;");

    Command::cargo_bin("gekko")
        .unwrap()
        .arg(&script.path)
        .assert()
        .success()
        .stderr("[line 1]: Division by zero.\n");
}

#[test]
fn running_a_valid_script_prints_to_stdout_and_exits_zero() {
    let script = ScriptFile::new(r#"print "hello";"#);

    Command::cargo_bin("gekko")
        .unwrap()
        .arg(&script.path)
        .assert()
        .success()
        .stdout("hello\n");
}

#[test]
fn too_many_arguments_prints_usage_and_exits_nonzero() {
    Command::cargo_bin("gekko")
        .unwrap()
        .arg("one")
        .arg("two")
        .assert()
        .failure()
        .code(64)
        .stdout("Usage: gekko [script]\n");
}

#[test]
fn unreadable_script_path_exits_nonzero() {
    Command::cargo_bin("gekko").unwrap().arg("/no/such/file.gekko").assert().failure().code(74);
}
