//! Delimiter-separated text datasets

use std::fmt::Write as _;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::encoding::detect_and_decode;
use super::DatasetLoader;
use crate::error::{Result, TabragError};
use crate::models::Document;

/// Cell values treated as missing in addition to the empty string
const MISSING_MARKERS: &[&str] = &["NA", "N/A", "NaN", "nan", "null", "NULL"];

/// Metadata `source` value of the summary document
pub const SUMMARY_SOURCE: &str = "csv_summary";

/// Inferred column type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ColumnKind {
    Numeric,
    Categorical,
}

/// Per-column statistics used in the summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnProfile {
    pub name: String,
    pub kind: ColumnKind,
    pub missing: usize,
}

/// A parsed, normalized table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabularData {
    /// Where the data came from
    pub path: PathBuf,

    /// Encoding the bytes were decoded with
    pub encoding: &'static str,

    /// Cleaned header names
    pub headers: Vec<String>,

    /// Cleaned cells; every row has exactly `headers.len()` cells
    pub rows: Vec<Vec<String>>,
}

impl TabularData {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Classify every column and count its missing cells
    ///
    /// A column is numeric when it has at least one present value and every
    /// present value parses as a number.
    pub fn profile(&self) -> Vec<ColumnProfile> {
        self.headers
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                let mut missing = 0;
                let mut present = 0;
                let mut all_numeric = true;

                for row in &self.rows {
                    let cell = row[idx].as_str();
                    if is_missing(cell) {
                        missing += 1;
                        continue;
                    }
                    present += 1;
                    if cell.parse::<f64>().is_err() {
                        all_numeric = false;
                    }
                }

                let kind = if present > 0 && all_numeric {
                    ColumnKind::Numeric
                } else {
                    ColumnKind::Categorical
                };

                ColumnProfile { name: name.clone(), kind, missing }
            })
            .collect()
    }

    /// Compose the human-readable report that gets indexed
    pub fn summary(&self) -> String {
        let profile = self.profile();
        let numeric = column_names(&profile, |c| c.kind == ColumnKind::Numeric);
        let categorical = column_names(&profile, |c| c.kind == ColumnKind::Categorical);
        let with_missing = column_names(&profile, |c| c.missing > 0);

        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = writeln!(
            out,
            "The dataset contains {} rows and {} columns:",
            self.row_count(),
            self.column_count()
        );
        let _ = writeln!(out, "{}\n", self.headers.join(", "));

        if !numeric.is_empty() {
            let _ = writeln!(out, "Numerical columns include: {}.", numeric.join(", "));
        }
        if !categorical.is_empty() {
            let _ = writeln!(out, "Categorical columns include: {}.", categorical.join(", "));
        }
        if !with_missing.is_empty() {
            let _ = writeln!(
                out,
                "Missing data exists in the following columns: {}.",
                with_missing.join(", ")
            );
        }

        let _ = writeln!(out, "Sample Data:\n{}", self.render_table());
        out
    }

    /// Render header and rows, each column right-aligned to its widest cell
    pub fn render_table(&self) -> String {
        let widths: Vec<usize> = self
            .headers
            .iter()
            .enumerate()
            .map(|(idx, header)| {
                self.rows
                    .iter()
                    .map(|row| row[idx].chars().count())
                    .chain(std::iter::once(header.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let render_line = |cells: &[String]| -> String {
            cells
                .iter()
                .zip(&widths)
                .map(|(cell, width)| format!("{:>width$}", cell, width = *width))
                .collect::<Vec<_>>()
                .join(" ")
        };

        std::iter::once(render_line(&self.headers))
            .chain(self.rows.iter().map(|row| render_line(row)))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Turn the table into the single summary document
    pub fn into_document(self) -> Document {
        Document::new(self.summary())
            .with_metadata("source", SUMMARY_SOURCE)
            .with_metadata("path", self.path.display().to_string())
            .with_metadata("encoding", self.encoding)
            .with_metadata("rows", self.row_count().to_string())
            .with_metadata("columns", self.column_count().to_string())
    }
}

/// Loader for delimiter-separated text
#[derive(Debug, Clone)]
pub struct CsvLoader {
    delimiter: u8,
}

impl Default for CsvLoader {
    fn default() -> Self {
        Self { delimiter: b';' }
    }
}

impl CsvLoader {
    pub fn new(delimiter: u8) -> Self {
        Self { delimiter }
    }

    /// Read, decode and parse the file at `path`
    pub fn read_table(&self, path: &Path) -> Result<TabularData> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e)
                if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::PermissionDenied)
                    || path.is_dir() =>
            {
                return Err(TabragError::DatasetNotFound { path: path.to_path_buf() });
            }
            Err(e) => return Err(e.into()),
        };

        self.parse_bytes(&bytes, path)
    }

    /// Parse raw bytes as if they were read from `path`
    pub fn parse_bytes(&self, bytes: &[u8], path: &Path) -> Result<TabularData> {
        let decoded = detect_and_decode(bytes)?;
        let parse_error = |reason: String| TabragError::DatasetParse {
            path: path.to_path_buf(),
            reason,
        };

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(decoded.text.as_bytes());

        let mut headers: Vec<String> = reader
            .headers()
            .map_err(|e| parse_error(e.to_string()))?
            .iter()
            .map(clean_cell)
            .collect();

        if headers.iter().all(|h| h.is_empty()) {
            return Err(parse_error("no header row".to_string()));
        }

        let mut rows = Vec::new();
        for (line, record) in reader.records().enumerate() {
            let record = record.map_err(|e| parse_error(e.to_string()))?;
            let mut cells: Vec<String> = record.iter().map(clean_cell).collect();

            if cells.len() > headers.len() {
                if cells[headers.len()..].iter().any(|c| !c.is_empty()) {
                    return Err(parse_error(format!(
                        "row {} has {} fields, expected {}",
                        line + 1,
                        cells.len(),
                        headers.len()
                    )));
                }
                cells.truncate(headers.len());
            }
            cells.resize(headers.len(), String::new());
            rows.push(cells);
        }

        // A delimiter at the end of every line leaves an unnamed, empty column
        while headers.last().is_some_and(|h| h.is_empty())
            && rows.iter().all(|row| row.last().is_some_and(|c| c.is_empty()))
        {
            headers.pop();
            for row in &mut rows {
                row.pop();
            }
        }

        tracing::debug!(
            path = %path.display(),
            encoding = decoded.encoding,
            rows = rows.len(),
            columns = headers.len(),
            "Parsed delimited dataset"
        );

        Ok(TabularData {
            path: path.to_path_buf(),
            encoding: decoded.encoding,
            headers,
            rows,
        })
    }
}

impl DatasetLoader for CsvLoader {
    fn load(&self, path: &Path) -> Result<Vec<Document>> {
        let table = self.read_table(path)?;
        tracing::info!(
            path = %path.display(),
            rows = table.row_count(),
            columns = table.column_count(),
            encoding = table.encoding,
            "Loaded dataset"
        );
        Ok(vec![table.into_document()])
    }

    fn format_name(&self) -> &str {
        "CSV"
    }
}

fn column_names(profile: &[ColumnProfile], pred: impl Fn(&ColumnProfile) -> bool) -> Vec<&str> {
    profile.iter().filter(|c| pred(c)).map(|c| c.name.as_str()).collect()
}

fn clean_cell(raw: &str) -> String {
    raw.trim().trim_matches('"').to_string()
}

fn is_missing(cell: &str) -> bool {
    cell.is_empty() || MISSING_MARKERS.contains(&cell)
}
