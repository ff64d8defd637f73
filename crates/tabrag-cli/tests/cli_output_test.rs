//! Integration tests for CLI output
//!
//! These run the built binary and check human and JSON output.

use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn tabrag(args: &[&str], cwd: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_tabrag"))
        .args(args)
        .current_dir(cwd)
        .env_remove("TABRAG_PROVIDER")
        .env_remove("TABRAG_API_KEY")
        .env_remove("GEMINI_API_KEY")
        .output()
        .expect("Failed to execute command")
}

fn write_names_csv(dir: &Path) -> String {
    let path = dir.join("names.csv");
    std::fs::write(&path, "name;rank;note\nAnna;1;\nBo;2;twin\nMaximilian;3;NA\n").unwrap();
    path.display().to_string()
}

#[test]
fn test_inspect_json_output_is_valid() {
    let temp = TempDir::new().unwrap();
    let csv = write_names_csv(temp.path());

    let output = tabrag(&["inspect", &csv, "--json"], temp.path());
    assert!(output.status.success());

    let parsed: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("Output should be valid JSON");
    assert_eq!(parsed["status"], "success");

    let data = &parsed["data"];
    assert_eq!(data["rows"], 3);
    assert_eq!(data["columns"].as_array().unwrap().len(), 3);
    assert_eq!(data["columns"][1]["kind"], "Numeric");
    assert_eq!(data["columns"][2]["missing"], 2);

    let summary = data["summary"].as_str().unwrap();
    assert!(summary.starts_with("The dataset contains 3 rows and 3 columns"));
    assert!(summary.contains("Missing data exists in the following columns: note"));
}

#[test]
fn test_inspect_human_output() {
    let temp = TempDir::new().unwrap();
    let csv = write_names_csv(temp.path());

    let output = tabrag(&["inspect", &csv], temp.path());
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Maximilian"));
    assert!(stdout.contains("Sample Data:"));
}

#[test]
fn test_inspect_missing_file_fails() {
    let temp = TempDir::new().unwrap();

    let output = tabrag(&["inspect", "does-not-exist.csv"], temp.path());
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Dataset not found"));
}

#[test]
fn test_config_json_reports_sources() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("tabrag.toml"), "top_k = 3\n").unwrap();

    let output = tabrag(&["config", "--json", "--provider", "ollama"], temp.path());
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let rows = parsed["data"].as_array().unwrap();
    let row = |key: &str| rows.iter().find(|r| r["key"] == key).unwrap().clone();

    assert_eq!(row("top_k")["value"], "3");
    assert_eq!(row("top_k")["source"], "file");
    assert_eq!(row("provider")["value"], "ollama");
    assert_eq!(row("provider")["source"], "cli");
    assert_eq!(row("embedding_model")["value"], "nomic-embed-text");
}

#[test]
fn test_ask_rejects_blank_question() {
    let temp = TempDir::new().unwrap();

    let output = tabrag(&["ask", "   ", "--provider", "ollama"], temp.path());
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("non-empty"));
}
