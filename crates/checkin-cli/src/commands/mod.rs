pub mod actions;
pub mod navigate;
pub mod notes;
pub mod session;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use checkin_core::catalog::{BuiltinCatalog, CategoryCatalog, ConfigPartnerDirectory, PartnerDirectory};
use checkin_core::checkin::{CheckInEngine, CheckInSession, EngineContext};
use checkin_core::config::AppConfig;
use checkin_infrastructure::{
    CheckInPaths, ConfigService, FileCheckInRepository, FileSessionSnapshotRepository,
};
use tracing_subscriber::EnvFilter;

/// Everything one command invocation needs.
pub struct App {
    pub engine: CheckInEngine,
    pub history: Arc<FileCheckInRepository>,
    pub catalog: BuiltinCatalog,
    pub partners: ConfigPartnerDirectory,
}

impl App {
    /// Wires the engine to the on-disk stores and resumes any active session.
    pub fn open(config: AppConfig, data_dir: Option<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.or_else(|| config.storage.data_dir.clone());
        let paths = CheckInPaths::resolve(data_dir)?;
        tracing::debug!("Using data directory {}", paths.data_dir()?.display());

        let snapshots = FileSessionSnapshotRepository::new(paths.storage_paths())
            .context("Failed to open the session snapshot store")?;
        let history = Arc::new(
            FileCheckInRepository::new(paths.storage_paths())
                .context("Failed to open the check-in history")?,
        );
        let engine = CheckInEngine::open(
            EngineContext::from_config(&config),
            Arc::new(snapshots),
            history.clone(),
        );

        Ok(Self {
            engine,
            history,
            catalog: BuiltinCatalog::new(),
            partners: ConfigPartnerDirectory::from_config(&config),
        })
    }

    /// The active session, or an error telling the user to start one.
    pub fn active_session(&self) -> Result<&CheckInSession> {
        self.engine
            .session()
            .context("No check-in in progress. Run `checkin start` first.")
    }

    /// Fails on category ids the catalog doesn't know.
    pub fn ensure_known_categories(&self, category_ids: &[String]) -> Result<()> {
        let unknown = self.catalog.unknown_ids(category_ids);
        if !unknown.is_empty() {
            bail!(
                "Unknown categories: {}. Run `checkin categories` to list them.",
                unknown.join(", ")
            );
        }
        Ok(())
    }

    /// Fails on partner ids the directory doesn't know. An empty directory
    /// accepts any id.
    pub fn ensure_known_partner(&self, partner_id: &str) -> Result<()> {
        if !self.partners.partners().is_empty() && self.partners.find(partner_id).is_none() {
            bail!("Unknown partner '{}'", partner_id);
        }
        Ok(())
    }
}

pub fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    let service = match path {
        Some(path) => ConfigService::new(path),
        None => ConfigService::at_default_location()?,
    };
    Ok(service.load()?)
}

/// Logs go to stderr. `RUST_LOG` wins over the configured filter.
pub fn init_logging(configured_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(configured_filter))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Turns an engine rejection into a non-zero exit with `reason`.
pub fn ensure_applied(applied: bool, reason: impl std::fmt::Display) -> Result<()> {
    if !applied {
        bail!("Rejected: {}", reason);
    }
    Ok(())
}

/// Resolves a full id or a unique id prefix against `ids`.
pub fn resolve_id<'a, I>(input: &str, ids: I) -> Result<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let matches: Vec<&str> = ids.into_iter().filter(|id| id.starts_with(input)).collect();
    if let Some(exact) = matches.iter().find(|id| **id == input) {
        return Ok(exact.to_string());
    }
    match matches.as_slice() {
        [] => bail!("No item matches '{}'", input),
        [only] => Ok(only.to_string()),
        _ => bail!("'{}' is ambiguous ({} matches)", input, matches.len()),
    }
}

/// First eight characters of an id, for display.
pub fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_id() {
        let ids = ["a1b2c3d4-aaaa", "a1ffffff-bbbb", "zz"];

        assert_eq!(resolve_id("a1b", ids).unwrap(), "a1b2c3d4-aaaa");
        assert_eq!(resolve_id("zz", ids).unwrap(), "zz");
        assert!(resolve_id("a1", ids).is_err());
        assert!(resolve_id("q", ids).is_err());
        assert!(resolve_id("", ids).is_err());
    }

    #[test]
    fn test_short_id() {
        assert_eq!(short_id("0123456789"), "01234567");
        assert_eq!(short_id("abc"), "abc");
    }

    #[test]
    fn test_ensure_applied() {
        assert!(ensure_applied(true, "unused").is_ok());
        let err = ensure_applied(false, "step is locked").unwrap_err();
        assert!(err.to_string().contains("step is locked"));
    }
}
