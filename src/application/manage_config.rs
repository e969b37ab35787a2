//! Config management use case

use crate::error::{HatchlingError, Result};
use crate::infrastructure::http::parse_url;
use crate::infrastructure::{Config, FileSystemWorkspace, WorkspaceRepository};
use std::path::PathBuf;

/// Keys accepted by `get`
pub const CONFIG_KEYS: &[&str] = &[
    "author_id",
    "api_url",
    "classifier_url",
    "download_dir",
    "classify_timeout_secs",
    "pdf_timeout_secs",
    "data_timeout_secs",
    "created",
];

/// Service for managing workspace configuration
pub struct ConfigService {
    workspace: FileSystemWorkspace,
}

impl ConfigService {
    pub fn new(workspace: FileSystemWorkspace) -> Self {
        ConfigService { workspace }
    }

    /// Get a single config value
    pub fn get(&self, key: &str) -> Result<String> {
        let config = self.workspace.load_config()?;
        config_value(&config, key)
    }

    /// Set a config value
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut config = self.workspace.load_config()?;

        match key {
            "author_id" => config.author_id = value.trim().to_string(),
            "api_url" => {
                parse_url(value, "api_url")?;
                config.api_url = value.to_string();
            }
            "classifier_url" => {
                if value.is_empty() || value.eq_ignore_ascii_case("none") {
                    config.classifier_url = None;
                } else {
                    parse_url(value, "classifier_url")?;
                    config.classifier_url = Some(value.to_string());
                }
            }
            "download_dir" => config.download_dir = PathBuf::from(value),
            "classify_timeout_secs" => config.classify_timeout_secs = parse_secs(key, value)?,
            "pdf_timeout_secs" => config.pdf_timeout_secs = parse_secs(key, value)?,
            "data_timeout_secs" => config.data_timeout_secs = parse_secs(key, value)?,
            "created" => {
                return Err(HatchlingError::Config(
                    "Cannot modify 'created' field (read-only)".to_string(),
                ));
            }
            _ => return Err(unknown_key(key)),
        }

        self.workspace.save_config(&config)
    }

    /// List all config values as key/value pairs
    pub fn list(&self) -> Result<Vec<(&'static str, String)>> {
        let config = self.workspace.load_config()?;
        CONFIG_KEYS
            .iter()
            .map(|key| config_value(&config, key).map(|value| (*key, value)))
            .collect()
    }
}

fn config_value(config: &Config, key: &str) -> Result<String> {
    match key {
        "author_id" => Ok(config.author_id.clone()),
        "api_url" => Ok(config.api_url.clone()),
        "classifier_url" => Ok(config
            .classifier_url
            .clone()
            .unwrap_or_else(|| "none".to_string())),
        "download_dir" => Ok(config.download_dir.display().to_string()),
        "classify_timeout_secs" => Ok(config.classify_timeout_secs.to_string()),
        "pdf_timeout_secs" => Ok(config.pdf_timeout_secs.to_string()),
        "data_timeout_secs" => Ok(config.data_timeout_secs.to_string()),
        "created" => Ok(config.created.to_rfc3339()),
        _ => Err(unknown_key(key)),
    }
}

fn parse_secs(key: &str, value: &str) -> Result<u64> {
    value.parse::<u64>().map_err(|_| {
        HatchlingError::Config(format!(
            "Invalid value for {}: '{}'. Expected a whole number of seconds",
            key, value
        ))
    })
}

fn unknown_key(key: &str) -> HatchlingError {
    HatchlingError::Config(format!(
        "Unknown config key: '{}'. Valid keys are: {}",
        key,
        CONFIG_KEYS.join(", ")
    ))
}
