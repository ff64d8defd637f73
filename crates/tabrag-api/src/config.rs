use std::env;
use std::path::{Path, PathBuf};

use tabrag_core::config::LayeredConfig;
use tabrag_core::error::Result;

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:4200";
const DEFAULT_CONFIG_FILE: &str = "tabrag.toml";

/// API server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub port: u16,
    pub cors_origins: Vec<String>,
    /// TOML file layered under the environment, if any
    pub config_file: Option<PathBuf>,
}

impl ApiConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let port = env::var("TABRAG_PORT").ok().and_then(|p| p.parse().ok()).unwrap_or(DEFAULT_PORT);

        let cors_origins = env::var("TABRAG_CORS_ORIGINS")
            .map(|raw| parse_origins(&raw))
            .unwrap_or_else(|_| vec![DEFAULT_CORS_ORIGIN.to_string()]);

        let config_file = env::var("TABRAG_CONFIG").ok().map(PathBuf::from).or_else(|| {
            let local = Path::new(DEFAULT_CONFIG_FILE);
            local.exists().then(|| local.to_path_buf())
        });

        Self { port, cors_origins, config_file }
    }

    /// Get the server bind address
    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }

    /// Resolve the service configuration: defaults, then file, then environment
    pub fn load_layered(&self) -> Result<LayeredConfig> {
        let mut config = LayeredConfig::with_defaults();
        if let Some(path) = &self.config_file {
            config = config.load_from_file(path)?;
        }
        Ok(config.load_from_env())
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty()).map(String::from).collect()
}
