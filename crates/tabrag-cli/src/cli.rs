use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tabrag_core::config::ProviderKind;

/// tabrag - Question answering over a CSV dataset
#[derive(Parser, Debug)]
#[command(name = "tabrag")]
#[command(about = "Retrieval-augmented question answering over a CSV dataset", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// TOML configuration file (defaults to ./tabrag.toml when present)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Model provider (gemini or ollama)
    #[arg(long, global = true)]
    pub provider: Option<ProviderKind>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the summary document produced for a CSV file
    Inspect(InspectArgs),

    /// Build or refresh the persisted index
    Build(BuildArgs),

    /// Answer a question against the dataset
    Ask(AskArgs),

    /// Show the resolved configuration and where each value came from
    Config,
}

#[derive(Parser, Debug)]
pub struct InspectArgs {
    /// Path to the CSV file
    pub path: PathBuf,

    /// Field delimiter
    #[arg(long, short = 'd', default_value = ";")]
    pub delimiter: char,
}

#[derive(Parser, Debug)]
pub struct BuildArgs {
    /// Dataset to index (overrides configuration)
    #[arg(long)]
    pub dataset: Option<PathBuf>,

    /// Index directory (overrides configuration)
    #[arg(long, value_name = "DIR")]
    pub index_dir: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct AskArgs {
    /// The question to answer
    pub question: String,

    /// Number of documents to retrieve
    #[arg(long)]
    pub top_k: Option<usize>,

    /// Dataset to index (overrides configuration)
    #[arg(long)]
    pub dataset: Option<PathBuf>,
}
