//! Config command implementation

use crate::cli::Cli;
use crate::config_loader::load_config;
use crate::output::OutputWriter;
use crate::output_types::ConfigRow;
use anyhow::Result;
use tabrag_core::config::CliConfigOverrides;

pub fn execute(cli: &Cli, output: &OutputWriter) -> Result<()> {
    let config = load_config(
        cli.config.as_deref(),
        CliConfigOverrides { provider: cli.provider, ..Default::default() },
    )?;

    let mut rows: Vec<ConfigRow> = config
        .to_inspection_map()
        .into_iter()
        .map(|(key, (value, source))| ConfigRow {
            key,
            value,
            source: format!("{:?}", source).to_lowercase(),
        })
        .collect();
    rows.sort_by(|a, b| a.key.cmp(&b.key));

    if output.is_json() {
        return output.result(rows);
    }

    output.table(rows);

    if let Err(e) = config.validate() {
        output.error(e);
    }

    Ok(())
}
