// Verifies that --debug traces each instruction to stderr and leaves stdout alone.
use predicates::prelude::*;

fn cargo_bin() -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::cargo_bin("bf").expect("failed to locate bf binary");
    cmd.env("BF_CONFIG", "/nonexistent/bf.toml").env_remove("BF_MAX_STEPS");
    cmd
}

#[test]
fn debug_flag_prints_trace_table() {
    cargo_bin()
        .args(["run", "--debug", ">+"])
        .assert()
        .success()
        .stdout("\n")
        .stderr(
            predicates::str::contains("STEP | IP")
                .and(predicates::str::contains("[0 0]"))
        );
}

#[test]
fn debug_output_stays_on_stdout() {
    cargo_bin()
        .args(["run", "-d", "+++."])
        .assert()
        .success()
        .stdout("\u{3}\n")
        .stderr(predicates::str::contains("\u{3}").not());
}

#[test]
fn debug_warns_about_left_underflow() {
    cargo_bin()
        .args(["run", "--debug", "<"])
        .assert()
        .success()
        .stderr(predicates::str::contains("warning: tried to move pointer below 0"));
}

#[test]
fn underflow_is_silent_without_debug() {
    cargo_bin()
        .args(["run", "<<+."])
        .assert()
        .success()
        .stdout("\u{1}\n")
        .stderr(predicates::str::is_empty());
}

#[test]
fn debug_warns_about_multi_character_input() {
    cargo_bin()
        .args(["run", "--debug", ","])
        .write_stdin("abc\n")
        .assert()
        .success()
        .stderr(predicates::str::contains("warning: multiple characters"));
}
