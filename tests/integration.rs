use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn kqa_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("kqa");
    path
}

fn setup_test_env() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();

    let config_dir = root.join("config");
    fs::create_dir_all(&config_dir).unwrap();

    let config_content = format!(
        r#"[store]
backend = "sqlite"

[store.sqlite]
path = "{}/data/kqa.sqlite"

[server]
bind = "127.0.0.1:0"

[limits]
max_content_chars = 2000
max_question_chars = 500
"#,
        root.display()
    );

    let config_path = config_dir.join("kqa.toml");
    fs::write(&config_path, config_content).unwrap();

    (tmp, config_path)
}

fn run_kqa(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = kqa_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .unwrap_or_else(|e| panic!("Failed to run kqa binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

fn parse_json(text: &str) -> Value {
    serde_json::from_str(text).unwrap_or_else(|e| panic!("not JSON ({}): {}", e, text))
}

/// Extracts the pretty-printed JSON error body from stderr, skipping log lines.
fn error_json(stderr: &str) -> Value {
    let start = stderr.find('{').expect("no JSON object on stderr");
    parse_json(&stderr[start..])
}

fn upload(config_path: &Path, title: &str, content: &str) -> Value {
    let (stdout, stderr, success) = run_kqa(
        config_path,
        &["upload", "--title", title, "--content", content],
    );
    assert!(success, "upload failed: stdout={}, stderr={}", stdout, stderr);
    parse_json(&stdout)
}

fn ask(config_path: &Path, question: &str) -> Value {
    let (stdout, stderr, success) = run_kqa(config_path, &["ask", question]);
    assert!(success, "ask failed: stdout={}, stderr={}", stdout, stderr);
    parse_json(&stdout)
}

#[test]
fn test_init_creates_database() {
    let (tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) = run_kqa(&config_path, &["init"]);
    assert!(success, "init failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("initialized"));
    assert!(tmp.path().join("data/kqa.sqlite").exists());
}

#[test]
fn test_init_idempotent() {
    let (_tmp, config_path) = setup_test_env();

    let (_, _, success1) = run_kqa(&config_path, &["init"]);
    assert!(success1, "First init failed");

    let (_, _, success2) = run_kqa(&config_path, &["init"]);
    assert!(success2, "Second init failed (not idempotent)");
}

#[test]
fn test_upload_trims_and_reports_length() {
    let (_tmp, config_path) = setup_test_env();
    run_kqa(&config_path, &["init"]);

    let body = upload(&config_path, "  Rust Guide  ", "  Ownership rules.  ");
    assert_eq!(body["status"], "success");
    assert_eq!(body["document"]["title"], "Rust Guide");
    assert_eq!(body["document"]["content_length"], 16);
    assert!(!body["document"]["id"].as_str().unwrap().is_empty());
    assert!(body["document"]["created_at"].as_str().is_some());
}

#[test]
fn test_upload_blank_title_fails() {
    let (_tmp, config_path) = setup_test_env();
    run_kqa(&config_path, &["init"]);

    let (_, stderr, success) = run_kqa(
        &config_path,
        &["upload", "--title", "   ", "--content", "body"],
    );
    assert!(!success, "blank title should fail");
    let err = error_json(&stderr);
    assert_eq!(err["status"], "failed");
    assert_eq!(err["error"], "文档标题不能为空");

    let (stdout, _, _) = run_kqa(&config_path, &["status"]);
    assert_eq!(parse_json(&stdout)["documents_count"], 0);
}

#[test]
fn test_upload_oversized_content_fails() {
    let (_tmp, config_path) = setup_test_env();
    run_kqa(&config_path, &["init"]);

    let content = "x".repeat(2001);
    let (_, stderr, success) = run_kqa(
        &config_path,
        &["upload", "--title", "big", "--content", &content],
    );
    assert!(!success);
    assert_eq!(error_json(&stderr)["status"], "failed");
}

#[test]
fn test_ask_returns_snippet_from_latest_match() {
    let (_tmp, config_path) = setup_test_env();
    run_kqa(&config_path, &["init"]);

    upload(&config_path, "Old Deploy", "deploy with scripts");
    let content = format!("{}Deploy with Docker{}", "a".repeat(150), "b".repeat(300));
    upload(&config_path, "New Deploy", &content);
    upload(&config_path, "Cooking", "pasta");

    let body = ask(&config_path, "  DEPLOY ");
    assert_eq!(body["matched_count"], 2);
    assert_eq!(body["total_documents"], 3);
    assert_eq!(body["suggestions"].as_array().unwrap().len(), 3);

    let answer = body["answer"].as_str().unwrap();
    assert!(answer.contains("「New Deploy」"), "answer: {}", answer);
    assert!(answer.contains("Deploy with Docker"));
    assert!(answer.contains("..."));
    assert!(body["response_time"].as_str().is_some());
}

#[test]
fn test_ask_matches_non_ascii_case_insensitively() {
    let (_tmp, config_path) = setup_test_env();
    run_kqa(&config_path, &["init"]);

    upload(&config_path, "Obst", "Äpfel sind gesund");

    let body = ask(&config_path, "ÄPFEL");
    assert_eq!(body["matched_count"], 1);
    assert!(body["answer"].as_str().unwrap().contains("Äpfel sind gesund"));
}

#[test]
fn test_ask_no_match_reports_total() {
    let (_tmp, config_path) = setup_test_env();
    run_kqa(&config_path, &["init"]);

    upload(&config_path, "Rust", "ownership");
    upload(&config_path, "Go", "goroutines");

    let body = ask(&config_path, "haskell");
    assert_eq!(body["matched_count"], 0);
    assert_eq!(body["total_documents"], 2);
    assert!(body["answer"].as_str().unwrap().contains('2'));
    assert_eq!(body["suggestions"].as_array().unwrap().len(), 2);
}

#[test]
fn test_ask_empty_knowledge_base() {
    let (_tmp, config_path) = setup_test_env();
    run_kqa(&config_path, &["init"]);

    let body = ask(&config_path, "anything");
    assert_eq!(body["answer"], "知识库为空，请先上传文档。");
    assert_eq!(body["matched_count"], 0);
    assert_eq!(body["total_documents"], 0);
}

#[test]
fn test_ask_blank_question_fails() {
    let (_tmp, config_path) = setup_test_env();
    run_kqa(&config_path, &["init"]);

    let (_, stderr, success) = run_kqa(&config_path, &["ask", "   "]);
    assert!(!success);
    assert_eq!(error_json(&stderr)["error"], "问题不能为空");
}

#[test]
fn test_ask_without_init_is_storage_failure() {
    let (_tmp, config_path) = setup_test_env();

    // No schema: the count degrades to 0 but the search itself fails.
    let (_, stderr, success) = run_kqa(&config_path, &["ask", "anything"]);
    assert!(!success);
    let err = error_json(&stderr);
    assert_eq!(err["status"], "failed");
    assert!(err["error"].as_str().unwrap().starts_with("文档检索失败"));
}

#[test]
fn test_documents_lists_newest_first() {
    let (_tmp, config_path) = setup_test_env();
    run_kqa(&config_path, &["init"]);

    upload(&config_path, "first", "one");
    upload(&config_path, "second", &"y".repeat(150));

    let (stdout, stderr, success) = run_kqa(&config_path, &["documents"]);
    assert!(success, "documents failed: {}", stderr);
    let body = parse_json(&stdout);
    assert_eq!(body["count"], 2);
    assert_eq!(body["documents"][0]["title"], "second");
    assert_eq!(body["documents"][0]["length"], 150);
    assert!(body["documents"][0]["content_preview"]
        .as_str()
        .unwrap()
        .ends_with("..."));
    assert_eq!(body["documents"][1]["content_preview"], "one");
}

#[test]
fn test_unknown_backend_rejected() {
    let tmp = TempDir::new().unwrap();
    let config_path = tmp.path().join("bad.toml");
    fs::write(&config_path, "[store]\nbackend = \"mongo\"\n").unwrap();

    let (_, stderr, success) = run_kqa(&config_path, &["status"]);
    assert!(!success);
    assert!(stderr.contains("Unknown store backend"));
}
