//! Exit-code and output contract of the `zvelte-grammar` binary.
#![cfg(feature = "cli")]

use assert_cmd::Command;
use predicates::prelude::*;

fn cli() -> Command {
    let mut cmd = Command::cargo_bin("zvelte-grammar").unwrap();
    cmd.env_remove("ZVELTE_GRAMMAR_PATH").env_remove("ZVELTE_LOG");
    cmd
}

#[test]
fn bundled_grammar_passes_silently() {
    cli()
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::is_empty());
}

#[test]
fn grammar_flag_reads_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("grammar.json");
    std::fs::write(&path, zvelte_grammar::GRAMMAR_JSON).unwrap();

    cli()
        .arg("--grammar")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn empty_grammar_file_fails_with_message() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("grammar.json");
    std::fs::write(&path, "").unwrap();

    cli()
        .arg("-g")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("error loading zvelte grammar"));
}

#[test]
fn binary_grammar_file_fails_to_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("grammar.json");
    std::fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();

    cli()
        .arg("--grammar")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("error loading zvelte grammar"))
        .stderr(predicate::str::contains("unavailable").not());
}

#[test]
fn missing_grammar_file_reports_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.json");

    cli()
        .env("ZVELTE_GRAMMAR_PATH", &path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("zvelte grammar is unavailable"))
        .stderr(predicate::str::contains("grammar not found"));
}
