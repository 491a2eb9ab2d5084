//! Binary-level integration tests, in the style of `pueue`'s `tests/client` split: these
//! drive the built `paracmd` executable end to end against fixture manifests.
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;

#[test]
fn parallel_success_both_exit_zero() {
    Command::cargo_bin("paracmd")
        .unwrap()
        .args(["true", "true"])
        .assert()
        .success();
}

#[test]
fn any_nonzero_fails_under_all() {
    Command::cargo_bin("paracmd")
        .unwrap()
        .args(["true", "false"])
        .assert()
        .failure();
}

#[test]
fn first_success_condition_ignores_later_failures() {
    Command::cargo_bin("paracmd")
        .unwrap()
        .args(["--success-condition", "first", "true", "false"])
        .assert()
        .success();
}

#[test]
fn unterminated_quote_exits_with_usage_complaint() {
    Command::cargo_bin("paracmd")
        .unwrap()
        .args(["echo 'unterminated"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Usage"))
        .stderr(predicate::str::contains("running commands"));
}

#[test]
fn missing_required_argument_reprints_usage_on_stdout() {
    Command::cargo_bin("paracmd")
        .unwrap()
        .assert()
        .failure()
        .stdout(predicate::str::contains("Usage"))
        .stderr(predicate::str::contains("required"));
}

#[test]
fn shell_flag_consumes_a_known_shell_name_not_the_next_command() {
    Command::cargo_bin("paracmd")
        .unwrap()
        .args(["--shell", "bash", "echo hi"])
        .assert()
        .success();
}

#[test]
fn kill_others_on_failure_does_not_wait_out_the_sleeper() {
    let start = std::time::Instant::now();
    Command::cargo_bin("paracmd")
        .unwrap()
        .args(["--kill-others-on", "failure", "false", "sleep 10"])
        .assert()
        .failure();
    assert!(start.elapsed().as_secs() < 9, "kill-others should short-circuit the 10s sleeper");
}

#[test]
fn raw_mode_forwards_a_plain_failure() {
    Command::cargo_bin("paracmd")
        .unwrap()
        .args(["--raw", "false"])
        .assert()
        .failure();
}

#[test]
fn ignore_missing_skips_unavailable_commands() {
    Command::cargo_bin("paracmd")
        .unwrap()
        .args(["--ignore-missing", "definitely-not-a-real-binary-xyz"])
        .assert()
        .success()
        .stderr(predicate::str::contains("[skip]"));
}

#[test]
fn help_exits_zero() {
    Command::cargo_bin("paracmd").unwrap().arg("--help").assert().success();
}
