//! CLI subcommands.

pub mod config;
pub mod extract;
pub mod nfe;
pub mod process;

use std::path::{Path, PathBuf};

use boleto_core::BoletoConfig;
use tracing::debug;

/// `<config dir>/boleto/config.json`.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("boleto")
        .join("config.json")
}

/// Config file in use: `--config` when given, else the default location.
pub fn config_path(explicit: Option<&str>) -> PathBuf {
    explicit.map(PathBuf::from).unwrap_or_else(default_config_path)
}

/// Load configuration from `--config`, the default file, or built-in defaults.
pub fn load_config(explicit: Option<&str>) -> anyhow::Result<BoletoConfig> {
    if let Some(path) = explicit {
        return Ok(BoletoConfig::from_file(Path::new(path))?);
    }

    let path = default_config_path();
    if path.exists() {
        debug!("Using configuration from {}", path.display());
        Ok(BoletoConfig::from_file(&path)?)
    } else {
        Ok(BoletoConfig::default())
    }
}
