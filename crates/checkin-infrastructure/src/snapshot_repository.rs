//! DirStorage-based session snapshot slot.
//!
//! The active session is stored as a single versioned JSON document,
//! `state/{key}.json`. Snapshots written before schema versioning carry no
//! `version` field and are read as `1.0.0`.

use std::path::PathBuf;
use version_migrate::{
    AppPaths, DirStorage, DirStorageStrategy, FilenameEncoding, FormatStrategy, Migrator,
};

use checkin_core::checkin::{CheckInSession, SessionSnapshotRepository};
use checkin_core::error::Result;

use crate::dto::{
    SESSION_SNAPSHOT_ENTITY, SESSION_SNAPSHOT_VERSIONS, create_session_snapshot_migrator,
    ensure_known_version, stamp_legacy_version,
};
use crate::storage::{read_document, storage_error};

/// Snapshot slot stored as one entity of a [`DirStorage`].
///
/// Writes and deletes go through the storage. Loads read the raw document
/// so legacy payloads can be stamped before migration.
pub struct FileSessionSnapshotRepository {
    storage: DirStorage,
    migrator: Migrator,
    key: String,
}

impl FileSessionSnapshotRepository {
    /// Well-known slot name for the active session.
    pub const DEFAULT_KEY: &'static str = "active-checkin-session";

    const DOMAIN: &'static str = "state";

    pub fn new(paths: AppPaths) -> Result<Self> {
        Self::with_key(paths, Self::DEFAULT_KEY)
    }

    /// Uses a custom slot name (one slot per couple, tests).
    ///
    /// Keys may only contain ASCII letters, digits, `-` and `_`.
    pub fn with_key(paths: AppPaths, key: impl Into<String>) -> Result<Self> {
        let strategy = DirStorageStrategy::default()
            .with_format(FormatStrategy::Json)
            .with_filename_encoding(FilenameEncoding::Direct);

        let storage = DirStorage::new(
            paths,
            Self::DOMAIN,
            create_session_snapshot_migrator(),
            strategy,
        )
        .map_err(|e| storage_error("Failed to create snapshot storage", e))?;

        let repository = Self {
            storage,
            migrator: create_session_snapshot_migrator(),
            key: key.into(),
        };
        // Fails early on keys DirStorage cannot encode.
        repository
            .storage
            .exists(&repository.key)
            .map_err(|e| storage_error("Invalid snapshot key", e))?;
        Ok(repository)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Path of the slot file.
    pub fn path(&self) -> PathBuf {
        self.storage.base_path().join(format!("{}.json", self.key))
    }

    fn decode(&self, mut value: serde_json::Value) -> Result<CheckInSession> {
        if stamp_legacy_version(&mut value) {
            tracing::debug!("Reading unversioned session snapshot as 1.0.0");
        }
        ensure_known_version(&value, SESSION_SNAPSHOT_ENTITY, SESSION_SNAPSHOT_VERSIONS)?;

        self.migrator
            .load_flat_from(SESSION_SNAPSHOT_ENTITY, value)
            .map_err(|e| storage_error("Failed to migrate session snapshot", e))
    }
}

impl SessionSnapshotRepository for FileSessionSnapshotRepository {
    fn load(&self) -> Result<Option<CheckInSession>> {
        match read_document(&self.path())? {
            Some(value) => self.decode(value).map(Some),
            None => Ok(None),
        }
    }

    fn save(&self, session: &CheckInSession) -> Result<()> {
        self.storage
            .save(SESSION_SNAPSHOT_ENTITY, &self.key, session.clone())
            .map_err(|e| storage_error("Failed to save session snapshot", e))
    }

    fn clear(&self) -> Result<()> {
        self.storage
            .delete(&self.key)
            .map_err(|e| storage_error("Failed to clear session snapshot", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::fs;
    use tempfile::TempDir;
    use version_migrate::PathStrategy;

    fn app_paths(temp_dir: &TempDir) -> AppPaths {
        AppPaths::new("checkin")
            .data_strategy(PathStrategy::CustomBase(temp_dir.path().to_path_buf()))
    }

    fn repository(temp_dir: &TempDir) -> FileSessionSnapshotRepository {
        FileSessionSnapshotRepository::new(app_paths(temp_dir)).unwrap()
    }

    fn session() -> CheckInSession {
        CheckInSession::new(
            "alex-and-sam",
            vec!["alex".to_string(), "sam".to_string()],
            vec!["communication".to_string(), "household".to_string()],
            Utc::now(),
        )
    }

    #[test]
    fn test_empty_slot() {
        let temp_dir = TempDir::new().unwrap();
        let repo = repository(&temp_dir);

        assert!(repo.load().unwrap().is_none());
        repo.clear().unwrap();
    }

    #[test]
    fn test_save_load_clear() {
        let temp_dir = TempDir::new().unwrap();
        let repo = repository(&temp_dir);
        let session = session();

        repo.save(&session).unwrap();
        assert!(repo.path().ends_with("state/active-checkin-session.json"));
        let raw = fs::read_to_string(repo.path()).unwrap();
        assert!(raw.contains("\"version\": \"1.0.0\""));

        assert_eq!(repo.load().unwrap(), Some(session));

        repo.clear().unwrap();
        assert!(!repo.path().exists());
        assert!(repo.load().unwrap().is_none());
    }

    #[test]
    fn test_legacy_snapshot_without_version() {
        let temp_dir = TempDir::new().unwrap();
        let repo = repository(&temp_dir);
        let session = session();

        // Plain serde output has the legacy shape: no version field.
        let legacy = serde_json::to_string(&session).unwrap();
        assert!(!legacy.contains("\"version\""));
        fs::write(repo.path(), legacy).unwrap();

        assert_eq!(repo.load().unwrap(), Some(session));
    }

    #[test]
    fn test_future_version_is_corrupt() {
        let temp_dir = TempDir::new().unwrap();
        let repo = repository(&temp_dir);

        repo.save(&session()).unwrap();
        let raw = fs::read_to_string(repo.path()).unwrap();
        fs::write(repo.path(), raw.replace("\"1.0.0\"", "\"9.0.0\"")).unwrap();

        let err = repo.load().unwrap_err();
        assert!(err.is_corrupt_snapshot());
        assert!(err.to_string().contains("9.0.0"));
    }

    #[test]
    fn test_truncated_payload_is_corrupt() {
        let temp_dir = TempDir::new().unwrap();
        let repo = repository(&temp_dir);
        fs::write(repo.path(), "{\"id\":\"abc\",\"baseRec").unwrap();

        let err = repo.load().unwrap_err();
        assert!(err.is_serialization());
        assert!(err.is_corrupt_snapshot());
    }

    #[test]
    fn test_shape_mismatch_is_corrupt() {
        let temp_dir = TempDir::new().unwrap();
        let repo = repository(&temp_dir);
        fs::write(repo.path(), "{\"id\":42}").unwrap();

        let err = repo.load().unwrap_err();
        assert!(err.is_corrupt_snapshot());
    }

    #[test]
    fn test_custom_key_is_isolated() {
        let temp_dir = TempDir::new().unwrap();
        let first = FileSessionSnapshotRepository::with_key(app_paths(&temp_dir), "couple-a").unwrap();
        let second =
            FileSessionSnapshotRepository::with_key(app_paths(&temp_dir), "couple-b").unwrap();

        first.save(&session()).unwrap();

        assert!(first.load().unwrap().is_some());
        assert!(second.load().unwrap().is_none());
    }

    #[test]
    fn test_key_with_path_separator_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        assert!(FileSessionSnapshotRepository::with_key(app_paths(&temp_dir), "../escape").is_err());
    }
}
