use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use std::time::Duration;

// Point config lookup at a missing file so a developer's bf.toml can't leak in.
fn cargo_bin() -> Command {
    let mut cmd = Command::cargo_bin("bf").unwrap();
    cmd.env("BF_CONFIG", "/nonexistent/bf.toml")
        .env_remove("BF_MAX_STEPS")
        .env_remove("BF_SHELL_MODE")
        .timeout(Duration::from_secs(5));
    cmd
}

fn small_valid_bf() -> &'static str { "+++." }

fn write_tempfile(content: &str) -> tempfile::NamedTempFile {
    let mut tf = tempfile::NamedTempFile::new().expect("tempfile");
    write!(tf, "{}", content).unwrap();
    tf
}

#[test]
fn positional_code_prints_raw_cell_value() {
    cargo_bin()
        .arg("run").arg(small_valid_bf())
        .assert()
        .success()
        .stdout("\u{3}\n")
        .stderr(predicate::str::is_empty());
}

#[test]
fn file_code_runs() {
    let tf = write_tempfile("++++++++[>++++++++<-]>+.  prints A");
    cargo_bin()
        .arg("run").arg("--file").arg(tf.path())
        .assert()
        .success()
        .stdout("A\n");
}

#[test]
fn comments_are_ignored() {
    cargo_bin()
        .arg("run").arg("add three: +++ then print: .")
        .assert()
        .success()
        .stdout("\u{3}\n");
}

#[test]
fn input_reads_first_byte_of_a_line() {
    cargo_bin()
        .arg("run").arg(",.")
        .write_stdin("Zebra\n")
        .assert()
        .success()
        .stdout("Z\n");
}

#[test]
fn input_lines_are_consumed_one_per_read() {
    cargo_bin()
        .arg("run").arg(",.,.")
        .write_stdin("h\ni\n")
        .assert()
        .success()
        .stdout("hi\n");
}

#[test]
fn input_accepts_bytes_that_are_not_utf8() {
    cargo_bin()
        .arg("run").arg(",.")
        .write_stdin(vec![0xFF, b'\n'])
        .assert()
        .success()
        .stdout(vec![0xFF, b'\n']);
}

#[test]
fn exhausted_input_fails() {
    cargo_bin()
        .arg("run").arg(",.")
        .write_stdin("")
        .assert()
        .failure()
        .stderr(
            predicate::str::contains("failed to read input")
                .and(predicate::str::contains("at instruction 0")),
        );
}

#[test]
fn max_steps_flag_stops_infinite_loop() {
    cargo_bin()
        .arg("run").arg("--max-steps").arg("50").arg("+[]")
        .assert()
        .failure()
        .stderr(predicate::str::contains("step limit exceeded (50)"))
        .stdout(predicate::str::contains("Execution aborted").not());
}

#[test]
fn max_steps_env_fallback() {
    cargo_bin()
        .env("BF_MAX_STEPS", "20")
        .arg("run").arg("+[]")
        .assert()
        .failure()
        .stderr(predicate::str::contains("step limit exceeded (20)"));
}

#[test]
fn max_steps_from_config_file() {
    let cfg = write_tempfile("[run]\nmax_steps = 30\n");
    cargo_bin()
        .env("BF_CONFIG", cfg.path())
        .arg("run").arg("+[]")
        .assert()
        .failure()
        .stderr(predicate::str::contains("step limit exceeded (30)"));
}

#[test]
fn interactive_keeps_tape_for_the_shell() {
    cargo_bin()
        .arg("run").arg("--interactive").arg("+++")
        .write_stdin(".\nexit\n")
        .assert()
        .success()
        .stdout("\u{3}\n")
        .stderr(predicate::str::contains("Bye"));
}

#[test]
fn code_and_file_together_is_usage_error() {
    let tf = write_tempfile("+");
    cargo_bin()
        .arg("run").arg("--file").arg(tf.path()).arg("+")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("cannot use positional code together with --file"));
}
