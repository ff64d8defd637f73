//! Inspect command implementation

use crate::cli::InspectArgs;
use crate::output::OutputWriter;
use crate::output_types::{ColumnRow, InspectOutput};
use anyhow::{Context, Result};
use tabrag_core::formats::CsvLoader;

pub fn execute(args: &InspectArgs, output: &OutputWriter) -> Result<()> {
    let delimiter = u8::try_from(args.delimiter)
        .ok()
        .filter(u8::is_ascii)
        .context("Delimiter must be a single ASCII character")?;

    let table = CsvLoader::new(delimiter).read_table(&args.path)?;
    let profile = table.profile();

    if output.is_json() {
        return output.result(InspectOutput {
            path: table.path.display().to_string(),
            encoding: table.encoding.to_string(),
            rows: table.row_count(),
            summary: table.summary(),
            columns: profile,
        });
    }

    output.kv("Path", table.path.display());
    output.kv("Encoding", table.encoding);
    output.kv("Rows", table.row_count());
    output.kv("Columns", table.column_count());

    output.section("Columns");
    output.table(profile.iter().map(ColumnRow::from).collect());

    output.section("Summary document");
    output.text(table.summary());

    Ok(())
}
