use crate::download::DownloadOptions;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Global configuration loaded from `~/.config/urnget/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrngetConfig {
    /// Connect timeout per candidate attempt, in seconds.
    pub connect_timeout_secs: u64,
    /// Whole-transfer timeout per candidate attempt, in seconds.
    pub transfer_timeout_secs: u64,
    /// Extra raw mirror specs merged after the standard list files.
    #[serde(default)]
    pub mirrors: Vec<String>,
}

impl Default for UrngetConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 15,
            transfer_timeout_secs: 300,
            mirrors: Vec::new(),
        }
    }
}

impl UrngetConfig {
    pub fn download_options(&self) -> DownloadOptions {
        DownloadOptions {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            transfer_timeout: Duration::from_secs(self.transfer_timeout_secs),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("urnget")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<UrngetConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = UrngetConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: UrngetConfig = toml::from_str(&data)?;
    Ok(cfg)
}
