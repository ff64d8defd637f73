//! Ask command implementation

use crate::cli::{AskArgs, Cli};
use crate::config_loader::load_config;
use crate::output::OutputWriter;
use crate::output_types::AskOutput;
use anyhow::Result;
use tabrag_core::config::CliConfigOverrides;
use tabrag_core::models::Query;
use tabrag_retrieval::prepare;

pub async fn execute(cli: &Cli, args: &AskArgs, output: &OutputWriter) -> Result<()> {
    let query = Query::parse(Some(args.question.as_str()))?;

    let config = load_config(
        cli.config.as_deref(),
        CliConfigOverrides {
            provider: cli.provider,
            dataset_path: args.dataset.clone(),
            top_k: args.top_k,
            ..Default::default()
        },
    )?;

    let prepared = prepare(&config).await?;
    tracing::debug!(hash = %prepared.build.index_hash, "Index ready");

    let answer = prepared.answerer.answer(&query).await?;

    if output.is_json() {
        return output.result(AskOutput {
            question: query.question().to_string(),
            answer: answer.text,
        });
    }

    output.text(answer.text);
    Ok(())
}
