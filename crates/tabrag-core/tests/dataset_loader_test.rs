//! Integration tests for the CSV dataset loader
//!
//! These tests go through the filesystem the same way the service does at startup.

use proptest::prelude::*;
use std::fs;
use std::path::Path;
use tabrag_core::formats::{CsvLoader, DatasetLoader};
use tabrag_core::TabragError;
use tempfile::TempDir;

fn write_dataset(dir: &TempDir, name: &str, bytes: &[u8]) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, bytes).unwrap();
    path
}

#[test]
fn test_three_rows_two_columns_without_missing_data() {
    let dir = TempDir::new().unwrap();
    let path = write_dataset(&dir, "names.csv", b"name;rank\nAnna;1\nLukas;2\nMia;3\n");

    let documents = CsvLoader::default().load(&path).unwrap();
    assert_eq!(documents.len(), 1);

    let content = &documents[0].content;
    assert!(content.contains("3 rows"));
    assert!(content.contains("name"));
    assert!(content.contains("rank"));
    assert!(!content.contains("Missing data"));
    assert!(content.contains("Numerical columns include: rank."));
    assert!(content.contains("Categorical columns include: name."));
    assert!(content.contains("Lukas"));
}

#[test]
fn test_summary_document_metadata() {
    let dir = TempDir::new().unwrap();
    let path = write_dataset(&dir, "names.csv", b"name;rank\nAnna;1\n");

    let documents = CsvLoader::default().load(&path).unwrap();
    let metadata = &documents[0].metadata;

    assert_eq!(metadata["source"], "csv_summary");
    assert_eq!(metadata["encoding"], "UTF-8");
    assert_eq!(metadata["rows"], "1");
    assert_eq!(metadata["columns"], "2");
}

#[test]
fn test_missing_file_is_not_found() {
    let dir = TempDir::new().unwrap();
    let result = CsvLoader::default().load(&dir.path().join("nope.csv"));

    match result {
        Err(TabragError::DatasetNotFound { path }) => assert!(path.ends_with("nope.csv")),
        other => panic!("expected DatasetNotFound, got {:?}", other),
    }
}

#[test]
fn test_directory_is_not_found() {
    let dir = TempDir::new().unwrap();
    let result = CsvLoader::default().load(dir.path());
    assert!(matches!(result, Err(TabragError::DatasetNotFound { .. })));
}

#[test]
fn test_windows_1252_file() {
    let dir = TempDir::new().unwrap();
    let path = write_dataset(
        &dir,
        "latin.csv",
        b"\"Vorname\";\"Herkunft\"\n\"J\xfcrgen\";\"germanisch\"\n\"Zo\xeb\";\"griechisch\"\n\"Ren\xe9\";\"franz\xf6sisch\"\n",
    );

    let documents = CsvLoader::default().load(&path).unwrap();
    let content = &documents[0].content;

    assert!(content.contains("Jürgen"));
    assert!(content.contains("französisch"));
    assert!(!content.contains('"'));
}

#[test]
fn test_load_is_deterministic_across_reads() {
    let dir = TempDir::new().unwrap();
    let path = write_dataset(&dir, "names.csv", b"name;rank;origin\nAnna;1;\nBen;2;hebr.\n");

    let first = CsvLoader::default().load(&path).unwrap();
    let second = CsvLoader::default().load(&path).unwrap();
    assert_eq!(first, second);
}

proptest! {
    #[test]
    fn prop_identical_bytes_give_identical_documents(
        rows in prop::collection::vec(
            prop::collection::vec("[A-Za-z0-9 .]{0,8}", 3),
            0..12,
        )
    ) {
        let mut text = String::from("a;b;c\n");
        for row in &rows {
            text.push_str(&row.join(";"));
            text.push('\n');
        }

        let loader = CsvLoader::default();
        let first = loader.parse_bytes(text.as_bytes(), Path::new("p.csv")).unwrap().into_document();
        let second = loader.parse_bytes(text.as_bytes(), Path::new("p.csv")).unwrap().into_document();
        prop_assert_eq!(first, second);
    }
}
