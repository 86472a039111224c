//! Configuration service.
//!
//! Loads [`AppConfig`] from `config.toml`. A missing file is not an error:
//! every field has a default.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use checkin_core::CheckInError;
use checkin_core::config::AppConfig;
use checkin_core::error::Result;

use crate::paths::CheckInPaths;

/// Reads the application configuration file.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
}

impl ConfigService {
    /// Creates a service reading `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates a service reading `config.toml` from the platform config directory.
    pub fn at_default_location() -> Result<Self> {
        Ok(Self::new(
            CheckInPaths::default_config_dir()?.join("config.toml"),
        ))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the configuration.
    ///
    /// # Returns
    ///
    /// - `Ok(config)`: Parsed file, or defaults when the file doesn't exist
    /// - `Err(CheckInError::Config)`: The file exists but is not valid
    /// - `Err(CheckInError::Io)`: The file exists but could not be read
    pub fn load(&self) -> Result<AppConfig> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(
                    "No config file at {}, using defaults",
                    self.path.display()
                );
                return Ok(AppConfig::default());
            }
            Err(e) => return Err(e.into()),
        };

        toml::from_str(&content).map_err(|e| {
            CheckInError::config(format!(
                "Invalid config file '{}': {}",
                self.path.display(),
                e
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let service = ConfigService::new(temp_dir.path().join("config.toml"));

        assert_eq!(service.load().unwrap(), AppConfig::default());
    }

    #[test]
    fn test_loads_partial_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(
            &path,
            "current_user_id = \"sam\"\n\n[couple]\nid = \"alex-and-sam\"\n",
        )
        .unwrap();

        let config = ConfigService::new(&path).load().unwrap();
        assert_eq!(config.current_user_id, "sam");
        assert_eq!(config.couple.id, "alex-and-sam");
        assert!(config.partners.is_empty());
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[couple\nid = ").unwrap();

        let err = ConfigService::new(&path).load().unwrap_err();
        assert!(err.is_config());
    }
}
