//! Binary tests: run `pain` and `lint_pain` on temporary files.

use std::fs;
use std::io::Write;
use std::process::{Command, Output, Stdio};

const DOC: &str = "§1 name\n§2 Alice\n§\n§1 = §2\n";

fn pain(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_pain"))
        .args(args)
        .output()
        .expect("run pain")
}

fn pain_stdin(args: &[&str], input: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_pain"))
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn pain");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(input.as_bytes())
        .expect("write stdin");
    child.wait_with_output().expect("wait")
}

#[test]
fn decode_file_to_stdout() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("doc.pain");
    fs::write(&input, DOC).expect("write");
    let out = pain(&["decode", input.to_str().expect("path"), "--compact"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(String::from_utf8_lossy(&out.stdout), "{\"name\":\"Alice\"}\n");
}

#[test]
fn encode_then_decode_through_files() {
    let dir = tempfile::tempdir().expect("tempdir");
    let json = dir.path().join("in.json");
    let pain_file = dir.path().join("out.pain");
    let back = dir.path().join("back.json");
    fs::write(&json, r#"{"a": ["x", {"b": "y"}], "c": "x"}"#).expect("write");

    let out = pain(&["encode", json.to_str().expect("path"), "-o", pain_file.to_str().expect("path")]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let out = pain(&["decode", pain_file.to_str().expect("path"), "-o", back.to_str().expect("path")]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let original: serde_json::Value =
        serde_json::from_str(r#"{"a": ["x", {"b": "y"}], "c": "x"}"#).expect("json");
    let decoded: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&back).expect("read")).expect("json");
    assert_eq!(decoded, original);
}

#[test]
fn decode_error_exits_nonzero() {
    let out = pain_stdin(&["decode"], "§1 x\n§\n.§1 = §1\n");
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("relative path without a previous path"));
}

#[test]
fn strict_flag_rejects_legacy_lines() {
    let doc = "§1 a\n§2 b\n§\n§1:\n§1 = §2\n";
    assert!(pain_stdin(&["decode"], doc).status.success());
    assert!(!pain_stdin(&["decode", "--strict"], doc).status.success());
}

#[test]
fn strings_only_flag_rejects_numbers() {
    assert!(pain_stdin(&["encode"], r#"{"n": 1}"#).status.success());
    assert!(!pain_stdin(&["encode", "--strings-only"], r#"{"n": 1}"#).status.success());
}

#[test]
fn explain_prints_resolved_paths() {
    let out = pain_stdin(&["explain"], "§1 u\n§2 n\n§3 v\n§\n§1.§2 = §3\n");
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("5: u.n = \"v\""), "{}", stdout);
}

#[test]
fn lint_fixes_file_and_reports() {
    let dir = tempfile::tempdir().expect("tempdir");
    let file = dir.path().join("doc.pain");
    fs::write(&file, "   §1 a  \n§2 b\n§\n§1 = §3\n").expect("write");
    let out = Command::new(env!("CARGO_BIN_EXE_lint_pain"))
        .arg(&file)
        .output()
        .expect("run lint_pain");
    assert!(!out.status.success(), "unresolved reference is an error");
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("[unresolved-reference]"), "{}", stdout);
    assert!(stdout.contains("[unused-declaration]"), "{}", stdout);
    assert_eq!(fs::read_to_string(&file).expect("read"), "§1 a\n§2 b\n§\n§1 = §3\n");
}

#[test]
fn lint_clean_file_succeeds() {
    let dir = tempfile::tempdir().expect("tempdir");
    let file = dir.path().join("doc.pain");
    fs::write(&file, DOC).expect("write");
    let out = Command::new(env!("CARGO_BIN_EXE_lint_pain"))
        .arg(&file)
        .output()
        .expect("run lint_pain");
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stdout));
    assert!(out.stdout.is_empty());
}

#[test]
fn lint_reports_unreadable_file_and_human_style() {
    let dir = tempfile::tempdir().expect("tempdir");
    let file = dir.path().join("doc.pain");
    fs::write(&file, "§1 a\n§\n§1 = §1\n§1 = §9\n").expect("write");
    let missing = dir.path().join("missing.pain");
    let out = Command::new(env!("CARGO_BIN_EXE_lint_pain"))
        .arg("-H")
        .arg(&file)
        .arg(&missing)
        .output()
        .expect("run lint_pain");
    assert!(!out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("error at "), "{}", stdout);
    assert!(stdout.contains("rule: unresolved-reference"), "{}", stdout);
    assert!(String::from_utf8_lossy(&out.stderr).contains("missing.pain: read failed"));
}
