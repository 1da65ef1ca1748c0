use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

#[test]
fn demo_processes_all_messages() {
    Command::cargo_bin("workpool-demo")
        .unwrap()
        .args(&["--threads", "2", "--tasks", "5"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Message - 5' has finished")
                .from_utf8(),
        );
}

#[test]
fn demo_rejects_zero_threads() {
    Command::cargo_bin("workpool-demo")
        .unwrap()
        .args(&["--threads", "0", "--tasks", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be positive").from_utf8());
}
