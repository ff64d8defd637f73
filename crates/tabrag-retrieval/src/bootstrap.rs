//! One-shot startup pipeline: load the dataset, build the index, construct
//! the answerer.

use std::sync::Arc;
use tabrag_core::config::LayeredConfig;
use tabrag_core::error::Result;
use tabrag_core::formats::{CsvLoader, DatasetLoader};
use tabrag_llm::ports::Embedder;
use tabrag_llm::providers::{self, Providers};
use tabrag_store::FileVectorStore;

use crate::answer::{PromptTemplate, RetrievalAnswerer};
use crate::index::{EmbeddingIndex, IndexBuildResult, IndexProgress};

/// Everything produced by a successful startup
pub struct Prepared {
    pub answerer: RetrievalAnswerer,
    pub build: IndexBuildResult,
}

/// Load the configured dataset and build the persisted index
pub async fn build_index<F>(
    config: &LayeredConfig,
    embedder: Arc<dyn Embedder>,
    progress: F,
) -> Result<(EmbeddingIndex, IndexBuildResult)>
where
    F: FnMut(IndexProgress),
{
    let loader = CsvLoader::new(config.delimiter_byte());
    let documents = loader.load(&config.dataset_path.value)?;

    let store = FileVectorStore::open(&config.index_dir.value)?;
    let index = EmbeddingIndex::new(Arc::new(store), embedder);
    let build = index.build_with_progress(&documents, progress).await?;

    Ok((index, build))
}

/// Run the full startup sequence from configuration
pub async fn prepare(config: &LayeredConfig) -> Result<Prepared> {
    config.validate()?;

    let template = match &config.prompt_template.value {
        Some(path) => PromptTemplate::from_file(path)?,
        None => PromptTemplate::default(),
    };

    let Providers { embedder, generator, params } = providers::from_config(config)?;
    let (index, build) = build_index(config, embedder, |_| {}).await?;

    let answerer = RetrievalAnswerer::new(index, generator, params)
        .with_top_k(config.top_k.value)
        .with_template(template);

    Ok(Prepared { answerer, build })
}
