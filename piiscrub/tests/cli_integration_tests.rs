// piiscrub/tests/cli_integration_tests.rs
//! Command-line integration tests for the `piiscrub` binary.
//!
//! Each test runs the real executable with `assert_cmd`, feeding JSON through stdin or
//! temporary files, and checks stdout, stderr, and the exit code. The secret key is
//! always passed explicitly (or explicitly removed) so results never depend on the
//! developer's environment.

use anyhow::Result;
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::io::Write;
use tempfile::{Builder, NamedTempFile};

const KEY: &str = "cli-test-key";

fn piiscrub() -> Command {
    let mut cmd = Command::cargo_bin("piiscrub").unwrap();
    cmd.env_remove("PII_HMAC_KEY");
    cmd.env("RUST_LOG", "warn");
    cmd
}

fn run_sanitize(input: &str, args: &[&str]) -> assert_cmd::assert::Assert {
    let mut cmd = piiscrub();
    cmd.args(["--secret", KEY, "sanitize"]).args(args);
    cmd.write_stdin(input.as_bytes());
    cmd.assert()
}

fn stdout_json(assert: &assert_cmd::assert::Assert) -> Value {
    let out = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    serde_json::from_str(&out).expect("stdout should be JSON")
}

#[test]
fn test_sanitize_rows_from_stdin() {
    let assert = run_sanitize(
        r#"[{"email": "alice@example.com", "ssn": "123-45-6789", "note": "call (212) 555-7890"}]"#,
        &[],
    )
    .success();
    let out = stdout_json(&assert);
    assert!(out[0]["email"].as_str().unwrap().starts_with("EMAIL_"));
    assert_eq!(out[0]["ssn"], "[REDACTED]");
    assert_eq!(out[0]["note"], "call ***-***-7890");
}

#[test]
fn test_same_key_gives_same_tokens_across_runs() {
    let input = r#"[{"email": "alice@example.com"}]"#;
    let first = stdout_json(&run_sanitize(input, &[]).success());

    let mut cmd = piiscrub();
    cmd.env("PII_HMAC_KEY", KEY).args(["sanitize"]).write_stdin(input);
    let second = stdout_json(&cmd.assert().success());
    assert_eq!(first, second);

    let mut cmd = piiscrub();
    cmd.args(["--secret", "different-key", "sanitize"]).write_stdin(input);
    let third = stdout_json(&cmd.assert().success());
    assert_ne!(first, third);
}

#[test]
fn test_development_key_warns_on_stderr() {
    let mut cmd = piiscrub();
    cmd.args(["sanitize"]).write_stdin(r#"[{"email": "alice@example.com"}]"#);
    cmd.assert()
        .success()
        .stderr(predicate::str::contains("PREDICTABLE"));
}

#[test]
fn test_method_override_and_audit() {
    let assert = run_sanitize(
        r#"[{"email": "alice@example.com", "note": "card 4111 1111 1111 1111"}]"#,
        &["--method", "redact", "--audit"],
    )
    .success();
    let out = stdout_json(&assert);
    assert_eq!(out["data"][0]["email"], "[REDACTED]");
    assert_eq!(out["data"][0]["note"], "card [REDACTED]");
    let events = out["audit"][0].as_array().unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[1]["type"], "credit_card");
    assert_eq!(events[1]["original_preview"], "4111 111…");
}

#[test]
fn test_request_document_mode() {
    let request = r#"{"input_data": [{"phone": "+1 415-555-2671"}],
        "query_params": {"method": "mask", "return_audit": true}}"#;
    let assert = run_sanitize(request, &["--request"]).success();
    let out = stdout_json(&assert);
    assert_eq!(out["data"][0]["phone"], "+1 ***-***-2671");
    assert_eq!(out["audit"][0][0]["action"], "mask");
}

#[test]
fn test_malformed_input_exits_with_client_error() {
    run_sanitize("[{\"a\": 1}, 42]", &[])
        .code(2)
        .stderr(predicate::str::contains("row 1 is a number"));
    run_sanitize("not json", &[]).code(2);
    run_sanitize("[]", &["--method", "shred"])
        .code(2)
        .stderr(predicate::str::contains("Unknown action 'shred'"));
    run_sanitize(r#"{"input_data": [], "query_params": []}"#, &["--request"]).code(2);
}

#[test]
fn test_malformed_request_writes_error_document() {
    let assert = run_sanitize(r#"{"input_data": [1, 2]}"#, &["--request"])
        .code(2)
        .stderr(predicate::str::contains("row 0 is a number"));
    let out = stdout_json(&assert);
    assert!(out["error"].as_str().unwrap().contains("row 0 is a number"));

    run_sanitize("[1]", &[])
        .code(2)
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_input_and_output_files() -> Result<()> {
    let mut input = Builder::new().suffix(".json").tempfile()?;
    input.write_all(br#"[{"full_name": "Jane Doe", "age": 40}]"#)?;
    let output = NamedTempFile::new()?;

    let mut cmd = piiscrub();
    cmd.args(["--secret", KEY, "sanitize", "--input"])
        .arg(input.path())
        .arg("--output")
        .arg(output.path());
    cmd.assert().success().stdout(predicate::str::is_empty());

    let written: Value = serde_json::from_str(&fs::read_to_string(output.path())?)?;
    assert!(written[0]["full_name"].as_str().unwrap().starts_with("PERSON_"));
    assert_eq!(written[0]["age"], 40);
    Ok(())
}

#[test]
fn test_custom_policy_file() -> Result<()> {
    let mut policy = Builder::new().suffix(".yaml").tempfile()?;
    policy.write_all(
        br#"
default_action: redact
per_type:
  email: mask
column_hints:
  customer: name
denylist:
  - "bob@example.com"
"#,
    )?;
    let path = policy.path().to_string_lossy().to_string();
    let assert = run_sanitize(
        r#"[{"customer": "Ada Lovelace", "note": "alice@example.com, bob@example.com"}]"#,
        &["--policy", &path],
    )
    .success();
    let out = stdout_json(&assert);
    assert_eq!(out[0]["customer"], "[REDACTED]");
    assert_eq!(out[0]["note"], "a***@example.com, [REDACTED]");
    Ok(())
}

#[test]
fn test_invalid_policy_exits_with_failure() -> Result<()> {
    let mut policy = Builder::new().suffix(".yaml").tempfile()?;
    policy.write_all(b"default_action: obliterate\n")?;
    let path = policy.path().to_string_lossy().to_string();
    run_sanitize("[]", &["--policy", &path])
        .code(1)
        .stderr(predicate::str::contains("obliterate"));
    Ok(())
}

#[test]
fn test_check_policy_summary() -> Result<()> {
    let mut policy = Builder::new().suffix(".yaml").tempfile()?;
    policy.write_all(b"column_hints:\n  contact: email\ndetect_names_in_free_text: true\n")?;

    let mut cmd = piiscrub();
    cmd.arg("check-policy").arg(policy.path());
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Policy is valid."))
        .stdout(predicate::str::contains("contact -> email"))
        .stdout(predicate::str::contains("Free-text name detection: on"));

    let mut cmd = piiscrub();
    cmd.args(["check-policy", "--json"]).arg(policy.path());
    let assert = cmd.assert().success();
    let summary = stdout_json(&assert);
    assert_eq!(summary["per_type"]["ssn"], "redact");
    Ok(())
}

#[test]
fn test_check_policy_rejects_unknown_type() -> Result<()> {
    let mut policy = Builder::new().suffix(".yaml").tempfile()?;
    policy.write_all(b"per_type:\n  passport: mask\n")?;
    let mut cmd = piiscrub();
    cmd.arg("check-policy").arg(policy.path());
    cmd.assert()
        .code(1)
        .stderr(predicate::str::contains("unknown PII type 'passport'"));
    Ok(())
}
