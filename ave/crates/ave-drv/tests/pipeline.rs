//! Library-level pipeline tests exercising `Session` directly, without
//! shelling out to the built binary (`cli.rs` covers the process
//! boundary). Grounded on the teacher's own
//! `faxc-drv/tests/integration_test.rs`.

use ave_drv::{Config, EmitKind, FileOutcome, Session};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn config(path: PathBuf, emit: EmitKind) -> Config {
    Config { input_files: vec![path], emit, verbose: false, warnings_as_errors: false }
}

#[test]
fn indexed_member_access_parses_to_the_expected_shape() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("idx.ave");
    fs::write(&path, "array[index]\n").unwrap();

    let mut session = Session::new(config(path, EmitKind::Ast));
    let (outcomes, has_error) = session.compile().unwrap();
    assert!(!has_error);
    match &outcomes[0] {
        FileOutcome::Ast(program) => {
            assert_eq!(program.body.stmts.len(), 1);
        }
        _ => panic!("expected an Ast outcome"),
    }
}

#[test]
fn missing_property_reports_a_reference_suggestion() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("doggy.ave");
    fs::write(&path, "record Doggy:\n  age: num\nd: Doggy = { age: 3 }\nd.ages\n").unwrap();

    let mut session = Session::new(config(path, EmitKind::Diagnostics));
    let (_, has_error) = session.compile().unwrap();
    assert!(has_error);
    let diags = session.diagnostics.take();
    assert!(diags.iter().any(|d| d.message.contains("ages") && d.notes.iter().any(|n| n.contains("age"))));
}

#[test]
fn unterminated_string_sets_has_error_but_keeps_going() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("unterminated.ave");
    fs::write(&path, "x = \"hello\n").unwrap();

    let mut session = Session::new(config(path, EmitKind::Diagnostics));
    let (_, has_error) = session.compile().unwrap();
    assert!(has_error);
}

#[test]
fn multiple_files_all_run_even_if_one_fails() {
    let dir = TempDir::new().unwrap();
    let good = dir.path().join("good.ave");
    let bad = dir.path().join("bad.ave");
    fs::write(&good, "let a = 1\n").unwrap();
    fs::write(&bad, "mynum: num = 10\nmynum = \"aa\"\n").unwrap();

    let mut session = Session::new(Config {
        input_files: vec![good, bad],
        emit: EmitKind::Diagnostics,
        verbose: false,
        warnings_as_errors: false,
    });
    let (outcomes, has_error) = session.compile().unwrap();
    assert_eq!(outcomes.len(), 2);
    assert!(has_error);
}
