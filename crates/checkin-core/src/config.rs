//! Application configuration model.
//!
//! Loaded from `config.toml` by the infrastructure layer. Every field has a
//! default, so a missing file or a partially filled one is valid.
//!
//! ```toml
//! current_user_id = "alex"
//!
//! [couple]
//! id = "alex-and-sam"
//!
//! [[partners]]
//! id = "alex"
//! name = "Alex"
//!
//! [[partners]]
//! id = "sam"
//! name = "Sam"
//!
//! [storage]
//! data_dir = "/home/alex/.local/share/checkin"
//!
//! [logging]
//! filter = "checkin=debug"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::catalog::Partner;

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub couple: CoupleConfig,
    /// Author of notes created from this device.
    #[serde(default = "default_user_id")]
    pub current_user_id: String,
    #[serde(default)]
    pub partners: Vec<Partner>,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            couple: CoupleConfig::default(),
            current_user_id: default_user_id(),
            partners: Vec::new(),
            storage: StorageConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct CoupleConfig {
    #[serde(default = "default_couple_id")]
    pub id: String,
}

impl Default for CoupleConfig {
    fn default() -> Self {
        Self {
            id: default_couple_id(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct StorageConfig {
    /// Overrides the platform data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// `tracing` env-filter directive, used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

fn default_user_id() -> String {
    "me".to_string()
}

fn default_couple_id() -> String {
    "default".to_string()
}

fn default_log_filter() -> String {
    "warn".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.logging.filter, "warn");
        assert!(config.storage.data_dir.is_none());
    }

    #[test]
    fn test_full_document() {
        let config: AppConfig = toml::from_str(
            r#"
current_user_id = "alex"

[couple]
id = "alex-and-sam"

[[partners]]
id = "alex"
name = "Alex"

[[partners]]
id = "sam"
name = "Sam"

[storage]
data_dir = "/tmp/checkin"
"#,
        )
        .unwrap();

        assert_eq!(config.current_user_id, "alex");
        assert_eq!(config.couple.id, "alex-and-sam");
        assert_eq!(config.partners.len(), 2);
        assert_eq!(config.storage.data_dir, Some(PathBuf::from("/tmp/checkin")));
        assert_eq!(config.logging, LoggingConfig::default());
    }
}
