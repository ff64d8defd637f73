use crate::error::{Result, TabragError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Remote model provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Gemini,
    Ollama,
}

impl ProviderKind {
    pub fn default_base_url(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "https://generativelanguage.googleapis.com",
            ProviderKind::Ollama => "http://localhost:11434",
        }
    }

    pub fn default_embedding_model(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "text-embedding-004",
            ProviderKind::Ollama => "nomic-embed-text",
        }
    }

    pub fn default_generation_model(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "gemini-1.5-flash",
            ProviderKind::Ollama => "llama3.1",
        }
    }
}

impl FromStr for ProviderKind {
    type Err = TabragError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "gemini" | "google" => Ok(ProviderKind::Gemini),
            "ollama" => Ok(ProviderKind::Ollama),
            _ => Err(TabragError::ConfigInvalid {
                key: "provider".to_string(),
                reason: format!("Invalid provider: {}. Use gemini or ollama", s),
            }),
        }
    }
}

/// Layered configuration for tabrag
///
/// Model names and base URL are optional; when unset the provider's own
/// default is used, so switching provider does not leave a stale model name.
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    pub provider: ConfigValue<ProviderKind>,
    pub api_key: ConfigValue<Option<String>>,
    pub base_url: ConfigValue<Option<String>>,
    pub embedding_model: ConfigValue<Option<String>>,
    pub generation_model: ConfigValue<Option<String>>,
    pub dataset_path: ConfigValue<PathBuf>,
    pub delimiter: ConfigValue<char>,
    pub index_dir: ConfigValue<PathBuf>,
    pub top_k: ConfigValue<usize>,
    pub temperature: ConfigValue<f32>,
    pub top_p: ConfigValue<f32>,
    pub max_output_tokens: ConfigValue<u32>,
    pub request_timeout_secs: ConfigValue<u64>,
    pub prompt_template: ConfigValue<Option<PathBuf>>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        let d = ConfigSource::Default;
        Self {
            provider: ConfigValue::new(ProviderKind::Gemini, d),
            api_key: ConfigValue::new(None, d),
            base_url: ConfigValue::new(None, d),
            embedding_model: ConfigValue::new(None, d),
            generation_model: ConfigValue::new(None, d),
            dataset_path: ConfigValue::new(PathBuf::from("./data/dataset.csv"), d),
            delimiter: ConfigValue::new(';', d),
            index_dir: ConfigValue::new(PathBuf::from("./index_db"), d),
            top_k: ConfigValue::new(5, d),
            temperature: ConfigValue::new(0.7, d),
            top_p: ConfigValue::new(0.85, d),
            max_output_tokens: ConfigValue::new(256, d),
            request_timeout_secs: ConfigValue::new(60, d),
            prompt_template: ConfigValue::new(None, d),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| TabragError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| TabragError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        let f = ConfigSource::File;
        if let Some(provider) = file_config.provider {
            self.provider.update(provider, f);
        }
        if let Some(api_key) = file_config.api_key {
            self.api_key.update(Some(api_key), f);
        }
        if let Some(base_url) = file_config.base_url {
            self.base_url.update(Some(base_url), f);
        }
        if let Some(model) = file_config.embedding_model {
            self.embedding_model.update(Some(model), f);
        }
        if let Some(model) = file_config.generation_model {
            self.generation_model.update(Some(model), f);
        }
        if let Some(path) = file_config.dataset_path {
            self.dataset_path.update(path, f);
        }
        if let Some(delimiter) = file_config.delimiter {
            self.delimiter.update(delimiter, f);
        }
        if let Some(dir) = file_config.index_dir {
            self.index_dir.update(dir, f);
        }
        if let Some(top_k) = file_config.top_k {
            self.top_k.update(top_k, f);
        }
        if let Some(temperature) = file_config.temperature {
            self.temperature.update(temperature, f);
        }
        if let Some(top_p) = file_config.top_p {
            self.top_p.update(top_p, f);
        }
        if let Some(max) = file_config.max_output_tokens {
            self.max_output_tokens.update(max, f);
        }
        if let Some(secs) = file_config.request_timeout_secs {
            self.request_timeout_secs.update(secs, f);
        }
        if let Some(template) = file_config.prompt_template {
            self.prompt_template.update(Some(template), f);
        }

        Ok(self)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        let e = ConfigSource::Environment;

        if let Some(provider) = env_parse::<ProviderKind>("TABRAG_PROVIDER") {
            self.provider.update(provider, e);
        }

        // GEMINI_API_KEY is honoured for compatibility with existing deployments
        if let Some(key) = env_string("TABRAG_API_KEY").or_else(|| env_string("GEMINI_API_KEY")) {
            self.api_key.update(Some(key), e);
        }
        if let Some(url) = env_string("TABRAG_BASE_URL") {
            self.base_url.update(Some(url), e);
        }
        if let Some(model) = env_string("TABRAG_EMBEDDING_MODEL") {
            self.embedding_model.update(Some(model), e);
        }
        if let Some(model) = env_string("TABRAG_GENERATION_MODEL") {
            self.generation_model.update(Some(model), e);
        }
        if let Some(path) = env_string("TABRAG_DATASET_PATH") {
            self.dataset_path.update(PathBuf::from(path), e);
        }
        if let Some(delimiter) = env_delimiter("TABRAG_DELIMITER") {
            self.delimiter.update(delimiter, e);
        }
        if let Some(dir) = env_string("TABRAG_INDEX_DIR") {
            self.index_dir.update(PathBuf::from(dir), e);
        }
        if let Some(top_k) = env_parse::<usize>("TABRAG_TOP_K") {
            self.top_k.update(top_k, e);
        }
        if let Some(temperature) = env_parse::<f32>("TABRAG_TEMPERATURE") {
            self.temperature.update(temperature, e);
        }
        if let Some(top_p) = env_parse::<f32>("TABRAG_TOP_P") {
            self.top_p.update(top_p, e);
        }
        if let Some(max) = env_parse::<u32>("TABRAG_MAX_OUTPUT_TOKENS") {
            self.max_output_tokens.update(max, e);
        }
        if let Some(secs) = env_parse::<u64>("TABRAG_REQUEST_TIMEOUT_SECS") {
            self.request_timeout_secs.update(secs, e);
        }
        if let Some(template) = env_string("TABRAG_PROMPT_TEMPLATE") {
            self.prompt_template.update(Some(PathBuf::from(template)), e);
        }

        self
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) {
        let c = ConfigSource::Cli;
        if let Some(provider) = overrides.provider {
            self.provider.update(provider, c);
        }
        if let Some(path) = overrides.dataset_path {
            self.dataset_path.update(path, c);
        }
        if let Some(delimiter) = overrides.delimiter {
            self.delimiter.update(delimiter, c);
        }
        if let Some(dir) = overrides.index_dir {
            self.index_dir.update(dir, c);
        }
        if let Some(top_k) = overrides.top_k {
            self.top_k.update(top_k, c);
        }
    }

    /// Check value ranges and required keys
    pub fn validate(&self) -> Result<()> {
        if self.provider.value == ProviderKind::Gemini && self.api_key.value.is_none() {
            return Err(TabragError::ConfigMissing {
                key: "api_key (TABRAG_API_KEY or GEMINI_API_KEY)".to_string(),
            });
        }

        if self.top_k.value == 0 {
            return Err(invalid("top_k", "must be at least 1"));
        }

        if !(self.top_p.value > 0.0 && self.top_p.value <= 1.0) {
            return Err(invalid("top_p", "must be in (0, 1]"));
        }

        if !(0.0..=2.0).contains(&self.temperature.value) {
            return Err(invalid("temperature", "must be in [0, 2]"));
        }

        if !self.delimiter.value.is_ascii() {
            return Err(invalid("delimiter", "must be a single ASCII character"));
        }

        if self.request_timeout_secs.value == 0 {
            return Err(invalid("request_timeout_secs", "must be greater than 0"));
        }

        Ok(())
    }

    /// Delimiter as a byte; callers should run `validate` first
    pub fn delimiter_byte(&self) -> u8 {
        u8::try_from(self.delimiter.value).unwrap_or(b';')
    }

    /// Effective base URL (configured or the provider default)
    pub fn resolved_base_url(&self) -> String {
        self.base_url
            .value
            .clone()
            .unwrap_or_else(|| self.provider.value.default_base_url().to_string())
    }

    /// Effective embedding model name
    pub fn resolved_embedding_model(&self) -> String {
        self.embedding_model
            .value
            .clone()
            .unwrap_or_else(|| self.provider.value.default_embedding_model().to_string())
    }

    /// Effective generation model name
    pub fn resolved_generation_model(&self) -> String {
        self.generation_model
            .value
            .clone()
            .unwrap_or_else(|| self.provider.value.default_generation_model().to_string())
    }

    /// Get all configuration values as a map for inspection
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();

        map.insert(
            "provider".to_string(),
            (format!("{:?}", self.provider.value).to_lowercase(), self.provider.source),
        );
        map.insert(
            "api_key".to_string(),
            (
                self.api_key.value.as_deref().map(mask_secret).unwrap_or_else(|| "<unset>".into()),
                self.api_key.source,
            ),
        );
        map.insert("base_url".to_string(), (self.resolved_base_url(), self.base_url.source));
        map.insert(
            "embedding_model".to_string(),
            (self.resolved_embedding_model(), self.embedding_model.source),
        );
        map.insert(
            "generation_model".to_string(),
            (self.resolved_generation_model(), self.generation_model.source),
        );
        map.insert(
            "dataset_path".to_string(),
            (self.dataset_path.value.display().to_string(), self.dataset_path.source),
        );
        map.insert(
            "delimiter".to_string(),
            (self.delimiter.value.to_string(), self.delimiter.source),
        );
        map.insert(
            "index_dir".to_string(),
            (self.index_dir.value.display().to_string(), self.index_dir.source),
        );
        map.insert("top_k".to_string(), (self.top_k.value.to_string(), self.top_k.source));
        map.insert(
            "temperature".to_string(),
            (self.temperature.value.to_string(), self.temperature.source),
        );
        map.insert("top_p".to_string(), (self.top_p.value.to_string(), self.top_p.source));
        map.insert(
            "max_output_tokens".to_string(),
            (self.max_output_tokens.value.to_string(), self.max_output_tokens.source),
        );
        map.insert(
            "request_timeout_secs".to_string(),
            (self.request_timeout_secs.value.to_string(), self.request_timeout_secs.source),
        );
        map.insert(
            "prompt_template".to_string(),
            (
                self.prompt_template
                    .value
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "<built-in>".into()),
                self.prompt_template.source,
            ),
        );

        map
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Default, Deserialize, Serialize)]
struct FileConfig {
    provider: Option<ProviderKind>,
    api_key: Option<String>,
    base_url: Option<String>,
    embedding_model: Option<String>,
    generation_model: Option<String>,
    dataset_path: Option<PathBuf>,
    delimiter: Option<char>,
    index_dir: Option<PathBuf>,
    top_k: Option<usize>,
    temperature: Option<f32>,
    top_p: Option<f32>,
    max_output_tokens: Option<u32>,
    request_timeout_secs: Option<u64>,
    prompt_template: Option<PathBuf>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub provider: Option<ProviderKind>,
    pub dataset_path: Option<PathBuf>,
    pub delimiter: Option<char>,
    pub index_dir: Option<PathBuf>,
    pub top_k: Option<usize>,
}

fn invalid(key: &str, reason: &str) -> TabragError {
    TabragError::ConfigInvalid { key: key.to_string(), reason: reason.to_string() }
}

fn env_string(key: &str) -> Option<String> {
    env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Read a delimiter without trimming, so a literal tab survives; `\t` is also accepted
fn env_delimiter(key: &str) -> Option<char> {
    let raw = env::var(key).ok()?;
    if raw == "\\t" {
        return Some('\t');
    }

    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        (None, _) => None,
        _ => {
            tracing::warn!("Invalid {} value {:?}, expected a single character; ignoring", key, raw);
            None
        }
    }
}

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    let raw = env_string(key)?;
    match raw.parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Invalid {} value '{}', ignoring", key, raw);
            None
        }
    }
}

fn mask_secret(secret: &str) -> String {
    let count = secret.chars().count();
    if count <= 8 {
        return "****".to_string();
    }
    let tail: String = secret.chars().skip(count - 4).collect();
    format!("****{}", tail)
}
