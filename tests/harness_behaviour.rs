//! Harness self-tests.
//!
//! These drive `tests/support/fake_parser.sh`, a canned stand-in for the
//! real parser, so they run anywhere a POSIX `sh` is available.

#![cfg(unix)]

use std::path::PathBuf;
use std::time::{Duration, Instant};

use tempfile::TempDir;

use logic_harness::logging::init_test_logging;
use logic_harness::{Error, Harness, HarnessConfig, ProcessRunner, Suite};

fn fake_parser_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("support")
        .join("fake_parser.sh")
}

/// Harness running the fake parser through a path relative to the crate
/// root, which only resolves if the default working directory is used.
fn fake_harness() -> Harness {
    init_test_logging();
    let config = HarnessConfig::default().with_command(["sh", "tests/support/fake_parser.sh"]);
    Harness::new(config).expect("failed to build harness")
}

fn sh_runner(script: &str, timeout: Duration) -> ProcessRunner {
    init_test_logging();
    let config = HarnessConfig::default()
        .with_command(["sh", "-c", script])
        .with_timeout(timeout);
    ProcessRunner::new(config).expect("failed to build runner")
}

#[test]
fn parse_dump_is_compared_line_by_line() {
    let harness = fake_harness();

    let result = harness.run("1&k+!n").expect("run failed");

    harness.asserter().assert_succeeded_with(
        &result,
        [
            "LogicalOperatorExpression(",
            "LogicalOperatorExpression(",
            "LogicValueExpression(TRUE),",
            "AND,",
            "Variable(K)",
            "),",
            "OR,",
            "NotExpression(",
            "Variable(N)",
            ")",
            ")",
        ],
    );
    harness
        .asserter()
        .assert_succeeded_containing(&result, "NotExpression(");
}

#[test]
fn write_statements_print_a_single_token() {
    let harness = fake_harness();

    for (programme, expected) in [
        ("write 1 & ?", "?"),
        ("write 1->0", "0"),
        ("k = 0; write k", "0"),
    ] {
        let result = harness.run(programme).expect("run failed");
        harness.asserter().assert_succeeded_with(&result, expected);
    }
}

#[test]
fn crlf_output_is_split_into_lines() {
    let harness = fake_harness();

    let result = harness
        .run("k = 1; n = k;write k; write n")
        .expect("run failed");

    harness.asserter().assert_succeeded_with(&result, ["1", "1"]);
}

#[test]
fn empty_programme_fails_with_syntax_error() {
    let harness = fake_harness();

    let result = harness.run("").expect("run failed");

    harness
        .asserter()
        .assert_failed_containing(&result, "Syntax error");
}

#[test]
fn invalid_character_is_found_on_either_stream() {
    let harness = fake_harness();

    for programme in ["k&z", "zz&z"] {
        let result = harness.run(programme).expect("run failed");
        harness
            .asserter()
            .assert_failed_containing(&result, "Invalid character");
    }
}

#[test]
fn undefined_variable_fails() {
    let harness = fake_harness();

    let result = harness.run("write k").expect("run failed");

    harness.asserter().assert_failed(&result);
    assert_eq!(result.exit_code(), 2);
}

#[test]
fn unexpected_failure_message_embeds_stderr() {
    let harness = fake_harness();
    let result = harness.run("write k").expect("run failed");

    let err = harness
        .asserter()
        .check_succeeded_with(&result, "0")
        .unwrap_err();

    assert!(err.is_assertion());
    let msg = err.to_string();
    assert!(msg.contains("Programme returned status code 2."), "{msg}");
    assert!(msg.contains("\t\tVariable k is not defined"), "{msg}");
}

#[test]
fn failed_containing_reports_stderr_when_text_is_missing() {
    let harness = fake_harness();
    let result = harness.run("write k").expect("run failed");

    let err = harness
        .asserter()
        .check_failed_containing(&result, "Invalid character")
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        r#"Expected: Invalid character, Actual output: ["Variable k is not defined"]"#
    );
}

#[test]
fn parser_runs_from_configured_working_dir() {
    init_test_logging();
    let temp = TempDir::new().expect("failed to create temp dir");
    let config = HarnessConfig::default()
        .with_command(["sh".into(), fake_parser_path().display().to_string()])
        .with_working_dir(temp.path());
    let harness = Harness::new(config).expect("failed to build harness");

    let result = harness.run("pwd").expect("run failed");
    harness.asserter().assert_succeeded(&result);

    let printed = String::from_utf8(result.stdout().to_vec()).expect("pwd output");
    assert_eq!(
        PathBuf::from(printed.trim()).canonicalize().unwrap(),
        temp.path().canonicalize().unwrap()
    );
}

#[test]
fn text_reaches_the_parser_byte_for_byte() {
    let runner = sh_runner("cat", Duration::from_secs(5));

    for programme in ["1&k+!n", "0\n&\n\t\r1\r", "", "k=!!(!0); n = k&0&?; write k; write n"] {
        let result = runner.run(programme).expect("run failed");
        assert_eq!(result.stdout(), programme.as_bytes());
    }
}

#[test]
fn raw_bytes_pass_through_unchanged() {
    let runner = sh_runner("cat", Duration::from_secs(5));
    let payload: Vec<u8> = (0u8..=255).collect();

    let result = runner.run(payload.clone()).expect("run failed");

    assert_eq!(result.stdout(), payload.as_slice());
}

#[test]
fn non_ascii_text_fails_before_spawning() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let config = HarnessConfig::default()
        .with_command(["sh", "-c", "touch spawned"])
        .with_working_dir(temp.path());
    let runner = ProcessRunner::new(config).expect("failed to build runner");

    let err = runner.run("write \u{22a4}").unwrap_err();

    assert!(err.is_configuration(), "{err:?}");
    assert!(!temp.path().join("spawned").exists());
}

#[test]
fn missing_executable_is_a_spawn_error() {
    let config = HarnessConfig::default().with_command(["./no-such-parser-binary"]);
    let runner = ProcessRunner::new(config).expect("failed to build runner");

    let err = runner.run("write 1").unwrap_err();

    assert!(matches!(err, Error::Spawn { .. }), "{err:?}");
}

#[test]
fn hung_parser_times_out_at_the_bound() {
    init_test_logging();
    let config = HarnessConfig::default()
        .with_command(["sh", "tests/support/fake_parser.sh"])
        .with_timeout(Duration::from_millis(300));
    let harness = Harness::new(config).expect("failed to build harness");

    let started = Instant::now();
    let err = harness.run("hang").unwrap_err();
    let elapsed = started.elapsed();

    assert!(matches!(err, Error::Timeout { .. }), "{err:?}");
    assert!(elapsed >= Duration::from_millis(300), "{elapsed:?}");
    assert!(elapsed < Duration::from_secs(5), "{elapsed:?}");
}

#[test]
fn parser_finishing_under_the_bound_succeeds() {
    let runner = sh_runner("sleep 0.2; echo 1", Duration::from_secs(2));

    let result = runner.run("write 1").expect("run failed");

    assert!(result.success());
    assert_eq!(result.stdout(), b"1\n");
}

#[test]
fn suite_runs_through_the_harness() {
    let harness = fake_harness();
    let suite = Suite::parse(
        r#"
name: fake-parser
description: "scenarios the canned parser knows"
cases:
  - programme: "write 1 & ?"
    expect:
      succeeds_with: "?"
  - programme: "k = 0; write k"
    expect:
      succeeds_with: ["0"]
  - programme: "k&z"
    expect:
      fails_containing: "Invalid character"
  - programme: ""
    expect:
      fails_containing: "Syntax error"
  - programme: "write k"
    expect: fails
"#,
    )
    .expect("failed to parse suite");

    let report = harness.run_suite(&suite).expect("suite aborted");

    assert_eq!(report.outcomes.len(), 5);
    report.assert_passed();
}

#[test]
fn suite_timeout_is_a_hard_failure() {
    init_test_logging();
    let config = HarnessConfig::default()
        .with_command(["sh", "tests/support/fake_parser.sh"])
        .with_timeout(Duration::from_millis(200));
    let harness = Harness::new(config).expect("failed to build harness");
    let suite = Suite::parse(
        r#"
name: hangs
cases:
  - programme: "hang"
    expect: succeeds
"#,
    )
    .expect("failed to parse suite");

    let err = harness.run_suite(&suite).unwrap_err();

    assert!(matches!(err, Error::Timeout { .. }));
}
