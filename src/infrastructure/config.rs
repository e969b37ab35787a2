//! Configuration management

use crate::domain::ExportTimeouts;
use crate::error::{HatchlingError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Workspace metadata directory name
pub const CONFIG_DIR: &str = ".hatchling";

const DEFAULT_API_URL: &str = "http://localhost:5000/api";

fn default_download_dir() -> PathBuf {
    PathBuf::from("exports")
}

fn default_classify_timeout() -> u64 {
    10
}

fn default_pdf_timeout() -> u64 {
    30
}

fn default_data_timeout() -> u64 {
    15
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Identity sent with every entry and export request
    pub author_id: String,

    /// Base URL of the entry and export service
    pub api_url: String,

    /// Tag classification endpoint; without it only the local tiers run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classifier_url: Option<String>,

    /// Where exports are saved, relative to the workspace root unless absolute
    #[serde(default = "default_download_dir")]
    pub download_dir: PathBuf,

    #[serde(default = "default_classify_timeout")]
    pub classify_timeout_secs: u64,

    #[serde(default = "default_pdf_timeout")]
    pub pdf_timeout_secs: u64,

    #[serde(default = "default_data_timeout")]
    pub data_timeout_secs: u64,

    pub created: DateTime<Utc>,
}

impl Config {
    /// Create a new config with default values
    pub fn new(author_id: impl Into<String>) -> Self {
        Config {
            author_id: author_id.into(),
            api_url: DEFAULT_API_URL.to_string(),
            classifier_url: None,
            download_dir: default_download_dir(),
            classify_timeout_secs: default_classify_timeout(),
            pdf_timeout_secs: default_pdf_timeout(),
            data_timeout_secs: default_data_timeout(),
            created: Utc::now(),
        }
    }

    /// Load config from .hatchling/config.toml in the given directory
    pub fn load_from_dir(path: &Path) -> Result<Self> {
        let config_path = path.join(CONFIG_DIR).join("config.toml");

        let contents = fs::read_to_string(&config_path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                HatchlingError::NotHatchlingDirectory(path.to_path_buf())
            } else {
                HatchlingError::Io(e)
            }
        })?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| HatchlingError::Config(format!("Failed to parse config.toml: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to .hatchling/config.toml in the given directory
    pub fn save_to_dir(&self, path: &Path) -> Result<()> {
        let config_dir = path.join(CONFIG_DIR);
        let config_path = config_dir.join("config.toml");

        if !config_dir.exists() {
            fs::create_dir(&config_dir)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| HatchlingError::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(&config_path, contents)?;

        Ok(())
    }

    /// Reject values the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.author_id.trim().is_empty() {
            return Err(HatchlingError::Config(
                "author_id must not be empty".to_string(),
            ));
        }

        for (key, value) in [
            ("classify_timeout_secs", self.classify_timeout_secs),
            ("pdf_timeout_secs", self.pdf_timeout_secs),
            ("data_timeout_secs", self.data_timeout_secs),
        ] {
            if value == 0 {
                return Err(HatchlingError::Config(format!(
                    "{} must be greater than zero",
                    key
                )));
            }
        }

        Ok(())
    }

    pub fn classify_timeout(&self) -> Duration {
        Duration::from_secs(self.classify_timeout_secs)
    }

    pub fn export_timeouts(&self) -> ExportTimeouts {
        ExportTimeouts {
            pdf: Duration::from_secs(self.pdf_timeout_secs),
            data: Duration::from_secs(self.data_timeout_secs),
        }
    }

    /// Resolve the download directory against the workspace root
    pub fn download_dir_in(&self, root: &Path) -> PathBuf {
        if self.download_dir.is_absolute() {
            self.download_dir.clone()
        } else {
            root.join(&self.download_dir)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_new_config_defaults() {
        let config = Config::new("parent-1");
        assert_eq!(config.author_id, "parent-1");
        assert_eq!(config.classifier_url, None);
        assert_eq!(config.classify_timeout(), Duration::from_secs(10));
        assert_eq!(config.export_timeouts(), ExportTimeouts::default());
    }

    #[test]
    fn test_save_and_load_config() {
        let temp = TempDir::new().unwrap();
        let mut config = Config::new("parent-1");
        config.classifier_url = Some("http://localhost:5000/api/tags".to_string());

        config.save_to_dir(temp.path()).unwrap();

        assert!(temp.path().join(".hatchling").exists());
        assert!(temp.path().join(".hatchling/config.toml").exists());

        let loaded = Config::load_from_dir(temp.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_config() {
        let temp = TempDir::new().unwrap();

        let result = Config::load_from_dir(temp.path());

        match result.unwrap_err() {
            HatchlingError::NotHatchlingDirectory(_) => {}
            other => panic!("Expected NotHatchlingDirectory error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_fills_defaults() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join(".hatchling")).unwrap();
        fs::write(
            temp.path().join(".hatchling/config.toml"),
            "author_id = \"p\"\napi_url = \"http://x\"\ncreated = \"2025-01-17T00:00:00Z\"\n",
        )
        .unwrap();

        let loaded = Config::load_from_dir(temp.path()).unwrap();
        assert_eq!(loaded.pdf_timeout_secs, 30);
        assert_eq!(loaded.data_timeout_secs, 15);
        assert_eq!(loaded.download_dir, PathBuf::from("exports"));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = Config::new("parent-1");
        config.pdf_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_download_dir_resolution() {
        let mut config = Config::new("parent-1");
        let root = Path::new("/tmp/ws");
        assert_eq!(config.download_dir_in(root), PathBuf::from("/tmp/ws/exports"));

        config.download_dir = PathBuf::from("/var/exports");
        assert_eq!(config.download_dir_in(root), PathBuf::from("/var/exports"));
    }
}
