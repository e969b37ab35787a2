//! Initialize workspace use case

use crate::error::{HatchlingError, Result};
use crate::infrastructure::http::parse_url;
use crate::infrastructure::{Config, FileSystemWorkspace, WorkspaceRepository};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct InitOptions {
    pub author_id: String,
    pub api_url: Option<String>,
    pub classifier_url: Option<String>,
}

/// Initialize a new hatchling workspace at the specified path.
pub fn init(path: &Path, options: InitOptions) -> Result<Config> {
    if options.author_id.trim().is_empty() {
        return Err(HatchlingError::InvalidArgument(
            "author id must not be empty".to_string(),
        ));
    }

    let mut config = Config::new(options.author_id.trim());
    if let Some(api_url) = options.api_url {
        parse_url(&api_url, "api_url")?;
        config.api_url = api_url;
    }
    if let Some(classifier_url) = options.classifier_url {
        parse_url(&classifier_url, "classifier_url")?;
        config.classifier_url = Some(classifier_url);
    }

    if !path.exists() {
        fs::create_dir_all(path)?;
    }

    let workspace = FileSystemWorkspace::new(path.to_path_buf());
    workspace.initialize()?;
    workspace.save_config(&config)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_writes_config() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("family");

        let config = init(
            &target,
            InitOptions {
                author_id: "parent-1".to_string(),
                api_url: Some("http://example.test/api".to_string()),
                classifier_url: None,
            },
        )
        .unwrap();

        assert_eq!(config.api_url, "http://example.test/api");
        let loaded = Config::load_from_dir(&target).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_init_rejects_bad_url_before_touching_disk() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("family");

        let result = init(
            &target,
            InitOptions {
                author_id: "parent-1".to_string(),
                api_url: Some("nope".to_string()),
                classifier_url: None,
            },
        );

        assert!(matches!(result, Err(HatchlingError::Config(_))));
        assert!(!target.exists());
    }

    #[test]
    fn test_init_requires_author() {
        let temp = TempDir::new().unwrap();
        let result = init(temp.path(), InitOptions::default());
        assert!(matches!(result, Err(HatchlingError::InvalidArgument(_))));
    }
}
