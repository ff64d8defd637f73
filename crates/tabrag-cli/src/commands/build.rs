//! Build command implementation

use crate::cli::{BuildArgs, Cli};
use crate::config_loader::load_config;
use crate::output::OutputWriter;
use anyhow::Result;
use tabrag_core::config::CliConfigOverrides;
use tabrag_llm::from_config;
use tabrag_retrieval::{build_index, IndexPhase};

pub async fn execute(cli: &Cli, args: &BuildArgs, output: &OutputWriter) -> Result<()> {
    let config = load_config(
        cli.config.as_deref(),
        CliConfigOverrides {
            provider: cli.provider,
            dataset_path: args.dataset.clone(),
            index_dir: args.index_dir.clone(),
            ..Default::default()
        },
    )?;
    config.validate()?;

    output.info(format!("Indexing {}", config.dataset_path.value.display()));

    let providers = from_config(&config)?;
    let (_, result) = build_index(&config, providers.embedder, |progress| {
        if progress.phase == IndexPhase::Storing {
            output.info(format!("Storing {} entries", progress.total));
        }
    })
    .await?;

    if output.is_json() {
        return output.result(&result);
    }

    output.success(format!("Index written to {}", config.index_dir.value.display()));
    output.kv("Documents", result.document_count);
    output.kv("Embedded", result.embedded);
    output.kv("Reused", result.reused);
    output.kv("Removed", result.removed);
    output.kv("Embedding dimension", result.embedding_dim);
    output.kv("Index hash", &result.index_hash);

    Ok(())
}
