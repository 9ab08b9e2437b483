use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::llm_handler::{GeminiSettings, DEFAULT_FLASH_MODEL, DEFAULT_GEMINI_API_URL, DEFAULT_PRO_MODEL};

pub const APP_CONFIG_FILE: &str = "ai_chef_config.json";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub gemini_api_url: String,
    pub flash_model: String,
    pub pro_model: String,
    /// When set, logs are also written to a daily rolling file here.
    pub log_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            gemini_api_url: DEFAULT_GEMINI_API_URL.to_string(),
            flash_model: DEFAULT_FLASH_MODEL.to_string(),
            pro_model: DEFAULT_PRO_MODEL.to_string(),
            log_dir: None,
        }
    }
}

impl AppConfig {
    /// Reads `path`, falling back to defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(AppConfig::default());
        }

        let config_str = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&config_str).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(host) = &cli.host {
            self.host = host.clone();
        }
        if let Some(port) = cli.port {
            self.port = port;
        }
        if let Some(log_dir) = &cli.log_dir {
            self.log_dir = Some(log_dir.clone());
        }
    }

    pub fn gemini_settings(&self) -> GeminiSettings {
        GeminiSettings {
            api_url: self.gemini_api_url.clone(),
            flash_model: self.flash_model.clone(),
            pro_model: self.pro_model.clone(),
        }
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}

/// AI chef chat and recipe server
#[derive(Debug, Parser)]
#[command(name = "ai-chef", version, about)]
pub struct Cli {
    /// Path to the JSON config file
    #[arg(long, env = "AI_CHEF_CONFIG", default_value = APP_CONFIG_FILE)]
    pub config: PathBuf,

    #[arg(long, env = "AI_CHEF_HOST")]
    pub host: Option<String>,

    #[arg(long, env = "AI_CHEF_PORT")]
    pub port: Option<u16>,

    /// Directory for rolling log files
    #[arg(long, env = "AI_CHEF_LOG_DIR")]
    pub log_dir: Option<PathBuf>,
}
