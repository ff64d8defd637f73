use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tabrag_core::config::{CliConfigOverrides, LayeredConfig};

const DEFAULT_CONFIG_FILE: &str = "tabrag.toml";

/// Resolve configuration: defaults, file, environment, then CLI overrides
pub fn load_config(explicit: Option<&Path>, overrides: CliConfigOverrides) -> Result<LayeredConfig> {
    let mut config = LayeredConfig::with_defaults();

    if let Some(path) = config_file(explicit) {
        config = config
            .load_from_file(&path)
            .with_context(|| format!("Failed to load configuration file {}", path.display()))?;
    }

    let mut config = config.load_from_env();
    config.update_from_cli(overrides);
    Ok(config)
}

fn config_file(explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let local = Path::new(DEFAULT_CONFIG_FILE);
            local.exists().then(|| local.to_path_buf())
        }
    }
}
