use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs::File;
use std::io::Write;
use std::process::Command;
use tempfile::tempdir;

#[test]
fn help_shows_usage() {
    let mut cmd = Command::cargo_bin("xlate").unwrap();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Four-way source-to-source translator"));
}

#[test]
fn tokens_lists_lexed_tokens() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("prog.c");
    let mut f = File::create(&path).unwrap();
    writeln!(f, "int x = 42;").unwrap();

    let mut cmd = Command::cargo_bin("xlate").unwrap();
    cmd.args(["tokens", path.to_string_lossy().as_ref()]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Keyword \"int\""))
        .stdout(predicate::str::contains("Number \"42\""));
}

#[test]
fn ast_prints_the_ir() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("prog.py");
    let mut f = File::create(&path).unwrap();
    writeln!(f, "x = 10").unwrap();

    let mut cmd = Command::cargo_bin("xlate").unwrap();
    cmd.args(["ast", path.to_string_lossy().as_ref()]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Decl"))
        .stdout(predicate::str::contains("\"x\""));
}

#[test]
fn language_inference_from_extension_can_be_overridden() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("prog.txt");
    let mut f = File::create(&path).unwrap();
    writeln!(f, "x = 1").unwrap();

    // no extension mapping, no tag: refuse
    let mut cmd = Command::cargo_bin("xlate").unwrap();
    cmd.args(["ast", path.to_string_lossy().as_ref()]);
    cmd.assert().failure();

    // explicit tag works
    let mut cmd = Command::cargo_bin("xlate").unwrap();
    cmd.args(["ast", path.to_string_lossy().as_ref(), "--lang", "scripting"]);
    cmd.assert().success();
}

#[test]
fn missing_file_is_a_clean_error() {
    let mut cmd = Command::cargo_bin("xlate").unwrap();
    cmd.args(["ast", "no_such_file.py"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("no_such_file.py"));
}
