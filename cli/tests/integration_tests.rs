use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

use serde_json::Value;

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_curl2req"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run curl2req")
}

fn run_json(args: &[&str]) -> Value {
    let output = run(args);
    assert!(
        output.status.success(),
        "curl2req failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

fn write_file(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).expect("failed to write fixture");
    path
}

#[test]
fn translate_prints_request_as_json() {
    let json = run_json(&[
        "translate",
        "--",
        "curl",
        "-X",
        "POST",
        "-H",
        "X-Trace: 1",
        "-d",
        "a=b",
        "-d",
        "c=d",
        "https://www.example.com/post",
    ]);

    assert_eq!(json["method"], "POST");
    assert_eq!(json["url"], "https://www.example.com/post");
    assert_eq!(json["host"], Value::Null);
    assert_eq!(json["body"], "a=b&c=d");
    assert_eq!(json["headers"][0]["name"], "Content-Type");
    assert_eq!(
        json["headers"][0]["value"],
        "application/x-www-form-urlencoded"
    );
    assert_eq!(json["headers"][1]["name"], "X-Trace");
    assert_eq!(json["headers"][1]["value"], "1");
    assert_eq!(json["client"]["insecure_transport"], false);
    assert_eq!(json["client"]["follow_redirects"], false);
}

#[test]
fn translate_without_separator_keeps_curl_flags() {
    let json = run_json(&["translate", "curl", "-k", "-L", "-I", "example.com"]);

    assert_eq!(json["method"], "HEAD");
    assert_eq!(json["url"], "http://example.com/");
    assert_eq!(json["body"], Value::Null);
    assert_eq!(json["client"]["insecure_transport"], true);
    assert_eq!(json["client"]["follow_redirects"], true);
}

#[test]
fn translate_yaml_output() {
    let output = run(&[
        "translate",
        "--format",
        "yaml",
        "--",
        "curl",
        "-H",
        "Host: internal.example",
        "example.com",
    ]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("method: GET"), "got: {stdout}");
    assert!(stdout.contains("host: internal.example"), "got: {stdout}");
}

#[test]
fn translate_form_with_fixed_boundary() {
    let dir = tempfile::tempdir().unwrap();
    let upload = write_file(&dir, "upload.txt", "hello");
    let field = format!("file=@{}", upload.display());

    let json = run_json(&[
        "translate",
        "--boundary",
        "fixed",
        "--",
        "curl",
        "-F",
        "name=alice",
        "-F",
        field.as_str(),
        "example.com/upload",
    ]);

    assert_eq!(json["method"], "POST");
    assert_eq!(json["headers"][0]["value"], "multipart/form-data; boundary=fixed");
    let body = json["body"].as_str().unwrap();
    assert!(body.starts_with("--fixed\r\n"));
    assert!(body.contains("Content-Disposition: form-data; name=\"name\"\r\n\r\nalice"));
    assert!(body.contains("filename=\"upload.txt\""));
    assert!(body.contains("\r\n\r\nhello\r\n--fixed--\r\n"));
}

#[test]
fn translate_reads_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_file(
        &dir,
        "config.yaml",
        "program_name: curl.exe\ndefault_scheme: https\n",
    );

    let json = run_json(&[
        "translate",
        "--config",
        config.to_str().unwrap(),
        "--",
        "curl.exe",
        "example.com/path",
    ]);

    assert_eq!(json["url"], "https://example.com/path");
}

#[test]
fn translate_reports_unsupported_flag() {
    let output = run(&["translate", "--", "curl", "--http2", "example.com"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error:"), "got: {stderr}");
    assert!(stderr.contains("--http2"), "got: {stderr}");
    assert!(output.stdout.is_empty());
}

#[test]
fn translate_reports_unknown_flag() {
    let output = run(&["translate", "--", "curl", "--no-such-flag", "example.com"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--no-such-flag"), "got: {stderr}");
}

#[test]
fn translate_reports_missing_config() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.yaml");

    let output = run(&[
        "translate",
        "--config",
        missing.to_str().unwrap(),
        "--",
        "curl",
        "example.com",
    ]);

    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn flags_lists_embedded_grammar() {
    let json = run_json(&["flags"]);
    let flags = json.as_array().unwrap();

    let data = flags
        .iter()
        .find(|flag| flag["long"] == "data")
        .expect("--data should be listed");
    assert_eq!(data["short"], "d");
    assert_eq!(data["parameter"], "data");
    assert_eq!(data["supported"], true);

    let http2 = flags
        .iter()
        .find(|flag| flag["long"] == "http2")
        .expect("--http2 should be listed");
    assert_eq!(http2["supported"], false);
}

#[test]
fn flags_supported_filter() {
    let json = run_json(&["flags", "--supported"]);
    let flags = json.as_array().unwrap();

    assert!(!flags.is_empty());
    assert!(flags.iter().all(|flag| flag["supported"] == true));
    assert!(flags.iter().any(|flag| flag["long"] == "form"));
}
