//! Configuration management for filecombine using the prefer crate.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Base URL of the combining service. The deployed front end compiles this
/// in; config or `--api-base` can point a build elsewhere.
pub const DEFAULT_API_BASE: &str = "https://file-combiner.onrender.com";

/// Default request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

/// Ceiling for multi-file page-metadata calls in seconds.
pub const PAGE_INFO_TIMEOUT_SECS: u64 = 180;

/// Application settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Base URL of the remote combining API.
    pub api_base: String,
    /// Base data directory.
    pub data_dir: PathBuf,
    /// Directory holding offline cache generations.
    pub cache_dir: PathBuf,
    /// Directory where generated documents are saved.
    pub download_dir: PathBuf,
    /// Request timeout in seconds.
    pub request_timeout: u64,
    /// Timeout in seconds for multi-file page-metadata calls.
    pub page_info_timeout: u64,
}

impl Default for Settings {
    fn default() -> Self {
        // Default to ~/Documents/filecombine/ for user data
        let data_dir = dirs::document_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("filecombine");
        let download_dir = dirs::download_dir().unwrap_or_else(|| PathBuf::from("."));

        Self {
            cache_dir: data_dir.join("cache"),
            data_dir,
            download_dir,
            api_base: DEFAULT_API_BASE.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT_SECS,
            page_info_timeout: PAGE_INFO_TIMEOUT_SECS,
        }
    }
}

impl Settings {
    /// Create settings with a custom data directory.
    pub fn with_data_dir(data_dir: PathBuf) -> Self {
        Self {
            cache_dir: data_dir.join("cache"),
            data_dir,
            ..Default::default()
        }
    }

    /// Ensure all directories exist.
    pub fn ensure_directories(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.data_dir)?;
        fs::create_dir_all(&self.cache_dir)?;
        fs::create_dir_all(&self.download_dir)?;
        Ok(())
    }
}

/// Configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the remote combining API.
    #[serde(default)]
    pub api_base: Option<String>,
    /// Target directory for data.
    #[serde(default)]
    pub target: Option<String>,
    /// Directory where generated documents are saved.
    #[serde(default)]
    pub download_dir: Option<String>,
    /// Request timeout in seconds.
    #[serde(default)]
    pub request_timeout: Option<u64>,
    /// Timeout in seconds for multi-file page-metadata calls.
    #[serde(default)]
    pub page_info_timeout: Option<u64>,
}

impl Config {
    /// Load configuration using prefer crate.
    /// Automatically discovers filecombine config files in standard locations.
    pub async fn load() -> Self {
        match prefer::load("filecombine").await {
            Ok(pref_config) => {
                let api_base: Option<String> = pref_config.get("api_base").ok();
                let target: Option<String> = pref_config.get("target").ok();
                let download_dir: Option<String> = pref_config.get("download_dir").ok();
                let request_timeout: Option<u64> = pref_config.get("request_timeout").ok();
                let page_info_timeout: Option<u64> = pref_config.get("page_info_timeout").ok();

                Config {
                    api_base,
                    target,
                    download_dir,
                    request_timeout,
                    page_info_timeout,
                }
            }
            Err(_) => {
                // No config file found, use defaults
                Self::default()
            }
        }
    }

    /// Apply configuration to settings.
    pub fn apply_to_settings(&self, settings: &mut Settings) {
        if let Some(ref api_base) = self.api_base {
            settings.api_base = api_base.trim_end_matches('/').to_string();
        }
        if let Some(ref target) = self.target {
            let path = shellexpand::tilde(target);
            settings.data_dir = PathBuf::from(path.as_ref());
            settings.cache_dir = settings.data_dir.join("cache");
        }
        if let Some(ref download_dir) = self.download_dir {
            let path = shellexpand::tilde(download_dir);
            settings.download_dir = PathBuf::from(path.as_ref());
        }
        if let Some(timeout) = self.request_timeout {
            settings.request_timeout = timeout;
        }
        if let Some(timeout) = self.page_info_timeout {
            settings.page_info_timeout = timeout;
        }
    }
}

/// Load settings from configuration (async version).
pub async fn load_settings() -> Settings {
    let config = Config::load().await;
    let mut settings = Settings::default();
    config.apply_to_settings(&mut settings);
    settings
}
