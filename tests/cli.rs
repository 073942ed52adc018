use pretty_assertions::assert_eq;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

fn fixture_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/oas.json")
}

fn oas_guard(spec: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_oas-guard"))
        .arg("--spec")
        .arg(spec)
        .args(args)
        .env_remove("OAS_FILE")
        .env_remove("OAS_COERCE_QUERY")
        .output()
        .expect("failed to run oas-guard")
}

fn write_json(dir: &TempDir, name: &str, value: serde_json::Value) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, value.to_string()).unwrap();
    path
}

#[test]
fn check_exits_zero_on_valid_request() {
    let dir = TempDir::new().unwrap();
    let body = write_json(&dir, "book.json", json!({"title": "Dune", "author": "Frank Herbert"}));

    let output = oas_guard(
        &fixture_path(),
        &["check", "-X", "POST", "--route", "/books/<isbn>", "--body", body.to_str().unwrap()],
    );

    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stdout).contains("passed validation"));
}

#[test]
fn check_exits_one_on_rejected_request() {
    let dir = TempDir::new().unwrap();
    let body = write_json(&dir, "book.json", json!({"title": "Infinite Jest"}));

    let output = oas_guard(
        &fixture_path(),
        &["check", "-X", "POST", "--route", "/books/<isbn>", "--body", body.to_str().unwrap()],
    );

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("BODY_MISSING_REQUIRED"), "{stdout}");
}

#[test]
fn check_query_by_uri() {
    let ok = oas_guard(
        &fixture_path(),
        &["check", "--uri", "/books/by-title", "--query", "title=1234"],
    );
    assert_eq!(ok.status.code(), Some(0));

    let missing = oas_guard(&fixture_path(), &["check", "--uri", "/books/by-title"]);
    assert_eq!(missing.status.code(), Some(1));

    let unknown = oas_guard(&fixture_path(), &["check", "--uri", "/authors/1"]);
    assert_eq!(unknown.status.code(), Some(1));
}

#[test]
fn check_uri_strips_base_path_once() {
    let dir = TempDir::new().unwrap();
    let spec = write_json(
        &dir,
        "oas.json",
        json!({"basePath": "/api", "paths": {"/api/items": {"get": {}}}}),
    );

    let output = oas_guard(&spec, &["check", "--uri", "/api/api/items"]);

    assert_eq!(output.status.code(), Some(0), "{}", String::from_utf8_lossy(&output.stdout));
}

#[test]
fn missing_document_exits_two() {
    let dir = TempDir::new().unwrap();
    let output = oas_guard(&dir.path().join("absent.json"), &["check", "--route", "/health"]);

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("absent.json"));
}

#[test]
fn uncompilable_document_exits_two() {
    let dir = TempDir::new().unwrap();
    let spec = write_json(
        &dir,
        "oas.json",
        json!({
            "paths": {"/books": {"post": {"parameters": [
                {"name": "book", "in": "body", "schema": {"$ref": "#/definitions/Book"}}
            ]}}},
            "definitions": {"Book": {"type": "object"}, "Legacy": {"type": "object", "required": []}}
        }),
    );

    let output = oas_guard(&spec, &["check", "-X", "POST", "--route", "/books"]);

    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn routes_lists_operations_and_locations() {
    let output = oas_guard(&fixture_path(), &["routes"]);

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let by_title = stdout
        .lines()
        .find(|line| line.contains("/books/by-title"))
        .expect("by-title route listed");
    assert!(by_title.starts_with("GET"));
    assert!(by_title.ends_with("[query]"));
    assert!(stdout.lines().any(|line| line.starts_with("POST") && line.contains("[path, body]")));
}
