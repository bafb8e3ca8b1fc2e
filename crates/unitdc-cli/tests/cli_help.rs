use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn test_help_shows_all_commands() {
    cargo_bin_cmd!("unitdc")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("repl"))
        .stdout(predicate::str::contains("eval"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_eval_help_shows_json_flag() {
    cargo_bin_cmd!("unitdc")
        .args(["eval", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--json"));
}

#[test]
fn test_eval_requires_expression() {
    cargo_bin_cmd!("unitdc").arg("eval").assert().failure();
}

#[test]
fn test_version_flag() {
    cargo_bin_cmd!("unitdc")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("unitdc"));
}
