//! CLI-level integration tests against the built `avec` binary, grounded
//! on the teacher's own `assert_cmd`/`predicates`/`tempfile` dev-dependency
//! set (`faxc-drv/tests/e2e/cli_tests.rs`).

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn avec() -> Command {
    Command::cargo_bin("avec").unwrap()
}

#[test]
fn help_flag_prints_usage() {
    avec().arg("--help").assert().success().stdout(predicate::str::contains("Usage"));
}

#[test]
fn version_flag_prints_version() {
    avec().arg("--version").assert().success().stdout(predicate::str::contains("avec"));
}

#[test]
fn nonexistent_path_exits_one_without_panicking() {
    avec().arg("/no/such/file.ave").assert().failure().code(1);
}

#[test]
fn missing_required_arg_exits_three() {
    avec().assert().failure().code(3);
}

#[test]
fn clean_file_compiles_successfully() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("clean.ave");
    fs::write(&path, "let a = 1\nlet b = a + 2\n").unwrap();

    avec().arg(&path).assert().success();
}

#[test]
fn type_error_exits_one_and_reports_the_mismatch() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.ave");
    fs::write(&path, "mynum: num = 10\nmynum = \"aa\"\n").unwrap();

    avec()
        .arg(&path)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("TypeError"));
}

#[test]
fn emit_tokens_prints_a_token_dump() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tok.ave");
    fs::write(&path, "let a = 1\n").unwrap();

    avec()
        .arg(&path)
        .arg("--emit")
        .arg("tokens")
        .assert()
        .success()
        .stdout(predicate::str::contains("Let"));
}

#[test]
fn emit_ast_prints_a_structurally_stable_program_dump() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ast.ave");
    fs::write(&path, "let a = 1\n").unwrap();

    avec()
        .arg(&path)
        .arg("--emit")
        .arg("ast")
        .assert()
        .success()
        .stdout(predicate::str::contains("VarDeclaration").or(predicate::str::contains("Body")));
}

#[test]
fn verbose_mode_traces_pipeline_stages() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("verbose.ave");
    fs::write(&path, "let a = 1\n").unwrap();

    avec()
        .arg(&path)
        .arg("--verbose")
        .assert()
        .success()
        .stderr(predicate::str::contains("lexing").or(predicate::str::contains("checking")));
}
