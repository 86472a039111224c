//! Path management for check-in configuration and data.
//!
//! Platform directories come from `AppPaths` in the version-migrate crate
//! (XDG on Linux, the native locations elsewhere).

use std::path::{Path, PathBuf};
use version_migrate::{AppPaths, PathStrategy};

use checkin_core::CheckInError;
use checkin_core::error::Result;

/// Resolved directories for one run of the app.
///
/// # Directory Structure
///
/// ```text
/// ~/.config/checkin/           # Config directory
/// └── config.toml              # Application configuration
///
/// ~/.local/share/checkin/      # Data directory
/// ├── state/                   # Snapshot slots
/// │   └── active-checkin-session.json
/// └── checkins/                # Completed and abandoned check-ins
///     └── {id}.json
/// ```
///
/// With a data directory override `{dir}`, the data directory becomes
/// `{dir}/data/checkin` (version-migrate's `CustomBase` layout).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckInPaths {
    config_dir: PathBuf,
    data_strategy: PathStrategy,
}

impl CheckInPaths {
    const APP_NAME: &'static str = "checkin";

    fn app_paths() -> AppPaths {
        AppPaths::new(Self::APP_NAME)
    }

    /// Returns the platform configuration directory.
    pub fn default_config_dir() -> Result<PathBuf> {
        Self::app_paths()
            .config_dir()
            .map_err(|_| CheckInError::config("Cannot resolve config directory"))
    }

    /// Resolves paths from the platform defaults.
    ///
    /// # Arguments
    ///
    /// * `data_dir_override` - Base directory replacing the platform data
    ///   location when set (from `--data-dir` or `storage.data_dir`)
    pub fn resolve(data_dir_override: Option<PathBuf>) -> Result<Self> {
        let config_dir = Self::default_config_dir()?;
        let data_strategy = match data_dir_override {
            Some(dir) => PathStrategy::CustomBase(dir),
            None => PathStrategy::System,
        };
        Ok(Self {
            config_dir,
            data_strategy,
        })
    }

    /// Uses explicit directories (tests, portable installs).
    pub fn with_dirs(config_dir: impl Into<PathBuf>, data_base: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
            data_strategy: PathStrategy::CustomBase(data_base.into()),
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    /// `AppPaths` the storages resolve their directories from.
    pub fn storage_paths(&self) -> AppPaths {
        Self::app_paths().data_strategy(self.data_strategy.clone())
    }

    /// Resolves (and creates) the data directory.
    pub fn data_dir(&self) -> Result<PathBuf> {
        self.storage_paths()
            .data_dir()
            .map_err(|_| CheckInError::config("Cannot resolve data directory"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_layout_under_explicit_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let paths = CheckInPaths::with_dirs("/cfg", temp_dir.path());

        assert_eq!(paths.config_file(), PathBuf::from("/cfg/config.toml"));
        let data_dir = paths.data_dir().unwrap();
        assert_eq!(data_dir, temp_dir.path().join("data").join("checkin"));
        assert!(data_dir.is_dir());
    }

    #[test]
    fn test_data_dir_override() {
        let temp_dir = TempDir::new().unwrap();
        let Ok(paths) = CheckInPaths::resolve(Some(temp_dir.path().join("portable"))) else {
            // No resolvable home directory in this environment.
            return;
        };

        assert!(paths.data_dir().unwrap().starts_with(temp_dir.path().join("portable")));
        assert!(paths.config_file().ends_with("config.toml"));
    }
}
