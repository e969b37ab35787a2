//! Workspace discovery and config persistence

use crate::error::{HatchlingError, Result};
use crate::infrastructure::config::{Config, CONFIG_DIR};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable pointing at a workspace root
pub const ROOT_ENV: &str = "HATCHLING_ROOT";

/// Abstract access to a hatchling workspace
pub trait WorkspaceRepository {
    /// Get the root directory of this workspace
    fn root(&self) -> &Path;

    /// Load configuration from .hatchling/config.toml
    fn load_config(&self) -> Result<Config>;

    /// Save configuration to .hatchling/config.toml
    fn save_config(&self, config: &Config) -> Result<()>;

    /// Check if .hatchling directory exists
    fn is_initialized(&self) -> bool;

    /// Create .hatchling directory structure
    fn initialize(&self) -> Result<()>;
}

/// File system implementation of WorkspaceRepository
#[derive(Debug, Clone)]
pub struct FileSystemWorkspace {
    pub root: PathBuf,
}

impl FileSystemWorkspace {
    pub fn new(root: PathBuf) -> Self {
        FileSystemWorkspace { root }
    }

    /// Discover workspace root.
    /// First checks HATCHLING_ROOT, then walks up from the current directory.
    pub fn discover() -> Result<Self> {
        if let Ok(root_path) = std::env::var(ROOT_ENV) {
            let path = PathBuf::from(root_path);
            if Self::has_config_dir(&path) {
                return Ok(FileSystemWorkspace::new(path));
            } else {
                return Err(HatchlingError::Config(format!(
                    "{} is set to '{}' but no .hatchling directory found. \
                    Run 'hatchling init' in that directory or unset {}.",
                    ROOT_ENV,
                    path.display(),
                    ROOT_ENV
                )));
            }
        }

        let current_dir = std::env::current_dir()?;
        Self::discover_from(&current_dir)
    }

    /// Discover workspace root by walking up from a specific starting directory
    pub fn discover_from(start: &Path) -> Result<Self> {
        let mut current = start.to_path_buf();

        loop {
            if Self::has_config_dir(&current) {
                return Ok(FileSystemWorkspace::new(current));
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => return Err(HatchlingError::NotHatchlingDirectory(start.to_path_buf())),
            }
        }
    }

    fn has_config_dir(path: &Path) -> bool {
        path.join(CONFIG_DIR).is_dir()
    }

    /// Directory exports are saved into
    pub fn download_dir(&self, config: &Config) -> PathBuf {
        config.download_dir_in(&self.root)
    }
}

impl WorkspaceRepository for FileSystemWorkspace {
    fn root(&self) -> &Path {
        &self.root
    }

    fn load_config(&self) -> Result<Config> {
        Config::load_from_dir(&self.root)
    }

    fn save_config(&self, config: &Config) -> Result<()> {
        config.validate()?;
        config.save_to_dir(&self.root)
    }

    fn is_initialized(&self) -> bool {
        Self::has_config_dir(&self.root)
    }

    fn initialize(&self) -> Result<()> {
        let config_dir = self.root.join(CONFIG_DIR);

        if config_dir.exists() {
            return Err(HatchlingError::Config(format!(
                "Directory already initialized: {}",
                self.root.display()
            )));
        }

        fs::create_dir(&config_dir)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_initialize_creates_config_dir() {
        let temp = TempDir::new().unwrap();
        let workspace = FileSystemWorkspace::new(temp.path().to_path_buf());

        assert!(!workspace.is_initialized());
        workspace.initialize().unwrap();
        assert!(workspace.is_initialized());
    }

    #[test]
    fn test_initialize_twice_fails() {
        let temp = TempDir::new().unwrap();
        let workspace = FileSystemWorkspace::new(temp.path().to_path_buf());

        workspace.initialize().unwrap();
        assert!(matches!(
            workspace.initialize(),
            Err(HatchlingError::Config(_))
        ));
    }

    #[test]
    fn test_discover_from_nested_directory() {
        let temp = TempDir::new().unwrap();
        let workspace = FileSystemWorkspace::new(temp.path().to_path_buf());
        workspace.initialize().unwrap();

        let nested = temp.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();

        let found = FileSystemWorkspace::discover_from(&nested).unwrap();
        assert_eq!(found.root(), temp.path());
    }

    #[test]
    fn test_discover_from_without_workspace() {
        let temp = TempDir::new().unwrap();
        let result = FileSystemWorkspace::discover_from(temp.path());
        assert!(matches!(
            result,
            Err(HatchlingError::NotHatchlingDirectory(_))
        ));
    }

    #[test]
    fn test_save_config_validates() {
        let temp = TempDir::new().unwrap();
        let workspace = FileSystemWorkspace::new(temp.path().to_path_buf());
        workspace.initialize().unwrap();

        let mut config = Config::new("parent-1");
        config.author_id = " ".to_string();
        assert!(workspace.save_config(&config).is_err());

        config.author_id = "parent-1".to_string();
        workspace.save_config(&config).unwrap();
        assert_eq!(workspace.load_config().unwrap().author_id, "parent-1");
    }

    #[test]
    fn test_download_dir_relative_to_root() {
        let temp = TempDir::new().unwrap();
        let workspace = FileSystemWorkspace::new(temp.path().to_path_buf());
        let config = Config::new("parent-1");
        assert_eq!(workspace.download_dir(&config), temp.path().join("exports"));
    }
}
