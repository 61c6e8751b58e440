use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs::File;
use std::io::Write;
use std::process::Command;
use tempfile::tempdir;

fn write_file(dir: &tempfile::TempDir, name: &str, content: &str) -> String {
    let path = dir.path().join(name);
    let mut f = File::create(&path).unwrap();
    write!(f, "{content}").unwrap();
    path.to_string_lossy().into_owned()
}

#[test]
fn transpile_prints_all_four_targets() {
    let dir = tempdir().unwrap();
    let path = write_file(&dir, "prog.py", "x = 10\nprint(x)\n");

    let mut cmd = Command::cargo_bin("xlate").unwrap();
    cmd.args(["transpile", &path]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("==== Python ===="))
        .stdout(predicate::str::contains("==== C ===="))
        .stdout(predicate::str::contains("==== C++ ===="))
        .stdout(predicate::str::contains("==== Java ===="))
        .stdout(predicate::str::contains("int x = 10;"))
        .stdout(predicate::str::contains("System.out.println(x);"));
}

#[test]
fn emit_prints_one_target() {
    let dir = tempdir().unwrap();
    let path = write_file(&dir, "prog.c", "int main() { for (int i = 0; i < 5; i++) { printf(\"%d\\n\", i); } return 0; }");

    let mut cmd = Command::cargo_bin("xlate").unwrap();
    cmd.args(["emit", &path, "--to", "scripting"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("for i in range(5):"))
        .stdout(predicate::str::contains("    print(i)"))
        .stdout(predicate::str::contains("==== ").not());
}

#[test]
fn json_output_carries_the_result_record() {
    let dir = tempdir().unwrap();
    let path = write_file(&dir, "prog.py", "print('hi')\n");

    let mut cmd = Command::cargo_bin("xlate").unwrap();
    let output = cmd
        .args(["transpile", &path, "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["success"], serde_json::Value::Bool(true));
    assert!(value["c"].as_str().unwrap().contains("printf(\"hi\\n\");"));
    assert!(value["errors"].as_array().unwrap().is_empty());
}

#[test]
fn class_sentinel_reaches_the_c_output() {
    let dir = tempdir().unwrap();
    let path = write_file(
        &dir,
        "prog.py",
        "class P:\n    def __init__(self):\n        self.n = 0\n",
    );

    let mut cmd = Command::cargo_bin("xlate").unwrap();
    cmd.args(["emit", &path, "--to", "c-family"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("// C does not support classes"));
}
