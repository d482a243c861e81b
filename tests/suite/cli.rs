//! End-to-end tests of the `switchyard` binary

use std::process::{Command, Output};

use crate::common::{SAMPLE_MANUAL, write_file};

fn switchyard(args: &[&str]) -> Output {
    switchyard_with_seed_env(args, None)
}

fn switchyard_with_seed_env(args: &[&str], seed: Option<&str>) -> Output {
    let mut command = Command::new(env!("CARGO_BIN_EXE_switchyard"));
    command.args(args).env_remove("RUST_LOG");
    match seed {
        Some(seed) => command.env("SWITCHYARD_SEED", seed),
        None => command.env_remove("SWITCHYARD_SEED"),
    };
    command.output().expect("failed to run switchyard")
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

#[test]
fn toggle_prints_per_machine_counts_and_sum() {
    let manual = write_file(SAMPLE_MANUAL);
    let output = switchyard(&["toggle", manual.path().to_str().unwrap()]);
    assert!(output.status.success());
    assert_eq!(
        stdout(&output),
        "== toggle ==\n\
         machine 1: 2 presses\n\
         machine 2: 3 presses\n\
         machine 3: 2 presses\n\
         sum: 7 (3 solved)\n"
    );
}

#[test]
fn solve_runs_both_modes() {
    let manual = write_file(SAMPLE_MANUAL);
    let output = switchyard(&["solve", "--seed", "3", manual.path().to_str().unwrap()]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.starts_with("== toggle ==\n"));
    assert!(text.contains("== counter ==\n"));
    assert_eq!(text.matches("presses\n").count(), 6);
}

#[test]
fn seed_flag_makes_counter_output_reproducible() {
    let manual = write_file(SAMPLE_MANUAL);
    let path = manual.path().to_str().unwrap();
    let first = switchyard(&["counter", "--seed", "8", path]);
    let second = switchyard(&["counter", "--seed", "8", path]);
    assert_eq!(stdout(&first), stdout(&second));
}

#[test]
fn seed_env_matches_seed_flag() {
    let manual = write_file(SAMPLE_MANUAL);
    let path = manual.path().to_str().unwrap();
    let from_flag = switchyard(&["counter", "--seed", "8", path]);
    let from_env = switchyard_with_seed_env(&["counter", path], Some(" 8 "));
    assert!(from_env.status.success());
    assert_eq!(stdout(&from_env), stdout(&from_flag));
}

#[test]
fn seed_flag_overrides_seed_env() {
    let manual = write_file(SAMPLE_MANUAL);
    let path = manual.path().to_str().unwrap();
    let from_flag = switchyard(&["counter", "--seed", "8", path]);
    let both = switchyard_with_seed_env(&["counter", "--seed", "8", path], Some("not-a-seed"));
    assert!(both.status.success());
    assert_eq!(stdout(&both), stdout(&from_flag));
    let stderr = String::from_utf8_lossy(&both.stderr);
    assert!(stderr.contains("Ignoring SWITCHYARD_SEED"), "{stderr}");
}

#[test]
fn unsolved_machines_do_not_fail_the_run() {
    let manual = write_file("[#] () {1}\n[#] (0) {2}\n");
    let output = switchyard(&["counter", manual.path().to_str().unwrap()]);
    assert!(output.status.success());
    assert_eq!(
        stdout(&output),
        "== counter ==\n\
         machine 1: unsolved\n\
         machine 2: 2 presses\n\
         sum: 2 (1 solved, 1 unsolved)\n"
    );
}

#[test]
fn missing_manual_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.txt");
    let output = switchyard(&["toggle", missing.to_str().unwrap()]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to read manual"), "{stderr}");
}

#[test]
fn parse_errors_name_the_line() {
    let manual = write_file("[.#] (0)\n[.#] (0) junk\n");
    let output = switchyard(&["toggle", manual.path().to_str().unwrap()]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("line 2"), "{stderr}");
}

#[test]
fn explicit_config_must_parse() {
    let manual = write_file(SAMPLE_MANUAL);
    let config = write_file("seed = \"nope\"\n");
    let output = switchyard(&[
        "counter",
        "--config",
        config.path().to_str().unwrap(),
        manual.path().to_str().unwrap(),
    ]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to load config"), "{stderr}");
}

#[test]
fn verbose_logs_go_to_the_log_file() {
    let manual = write_file("[.#] (1) {0,1}\n");
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("logs").join("switchyard.log");
    let output = switchyard(&[
        "solve",
        "--verbose",
        "--log-file",
        log.to_str().unwrap(),
        manual.path().to_str().unwrap(),
    ]);
    assert!(output.status.success());
    let logged = std::fs::read_to_string(&log).unwrap();
    assert!(logged.contains("manual parsed"), "{logged}");
    assert!(output.stderr.is_empty());
}
