use assert_cmd::Command;
use predicates::prelude::*;

fn unreachable_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

fn statusprobe() -> Command {
    let mut cmd = Command::cargo_bin("statusprobe").unwrap();
    cmd.env_clear().env("STATUSPROBE_TIMEOUT", "2s");
    cmd
}

#[test]
fn test_missing_secret_exits_before_checks() {
    statusprobe()
        .env("REACT_APP_BACKEND_URL", unreachable_url())
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("--secret"));
}

#[test]
fn test_empty_secret_rejected() {
    statusprobe()
        .env("REACT_APP_BACKEND_URL", unreachable_url())
        .env("JWT_SECRET", "")
        .assert()
        .failure()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_missing_base_url() {
    statusprobe()
        .env("JWT_SECRET", "s3cr3t")
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("--base-url"));
}

#[test]
fn test_unsupported_scheme_exits_before_checks() {
    statusprobe()
        .env("REACT_APP_BACKEND_URL", "ftp://localhost/")
        .env("JWT_SECRET", "s3cr3t")
        .assert()
        .failure()
        .stdout(predicate::str::contains("Overall Result").not())
        .stderr(predicate::str::contains("Unsupported URL scheme"));
}

#[test]
fn test_failed_checks_still_exit_zero() {
    statusprobe()
        .env("REACT_APP_BACKEND_URL", unreachable_url())
        .env("JWT_SECRET", "s3cr3t")
        .assert()
        .success()
        .stdout(predicate::str::contains("Secret is configured"))
        .stdout(predicate::str::contains("Root Endpoint: FAILED"))
        .stdout(predicate::str::contains("Overall Result: SOME CHECKS FAILED"))
        .stdout(predicate::str::contains("s3cr3t").not());
}

#[test]
fn test_strict_exits_non_zero_on_failure() {
    statusprobe()
        .env("REACT_APP_BACKEND_URL", unreachable_url())
        .env("JWT_SECRET", "s3cr3t")
        .arg("--strict")
        .assert()
        .code(1);
}

#[test]
fn test_json_report() {
    let output = statusprobe()
        .env("REACT_APP_BACKEND_URL", unreachable_url())
        .env("JWT_SECRET", "s3cr3t")
        .args(["--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["passed"], false);
    let checks = report["checks"].as_array().unwrap();
    let names: Vec<_> = checks.iter().map(|c| c["name"].as_str().unwrap()).collect();
    assert_eq!(
        names,
        [
            "Root Endpoint",
            "Create Status Check",
            "Get Status Checks",
            "CORS Configuration",
            "Persistence Round-trip"
        ]
    );
}
