//! DirStorage-based check-in record repository.
//!
//! Each completed or abandoned check-in is stored as `checkins/{id}.json`,
//! a versioned JSON document written atomically by version-migrate.

use std::path::Path;
use version_migrate::{AppPaths, DirStorage, DirStorageStrategy, FilenameEncoding, FormatStrategy};

use checkin_core::checkin::{CheckIn, CheckInRepository};
use checkin_core::error::Result;

use crate::dto::{CHECK_IN_ENTITY, CHECK_IN_VERSIONS, create_check_in_migrator, ensure_known_version};
use crate::storage::{read_document, storage_error};

/// Durable check-in history stored one file per record.
///
/// Directory structure:
/// ```text
/// {data_dir}/
/// └── checkins/
///     ├── {id-1}.json
///     └── {id-2}.json
/// ```
pub struct FileCheckInRepository {
    storage: DirStorage,
}

impl FileCheckInRepository {
    const DOMAIN: &'static str = "checkins";

    /// Creates the repository under `paths`' data directory.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the directory cannot be resolved or created.
    pub fn new(paths: AppPaths) -> Result<Self> {
        let strategy = DirStorageStrategy::default()
            .with_format(FormatStrategy::Json)
            .with_filename_encoding(FilenameEncoding::Direct);

        let storage = DirStorage::new(paths, Self::DOMAIN, create_check_in_migrator(), strategy)
            .map_err(|e| storage_error("Failed to create check-in storage", e))?;

        Ok(Self { storage })
    }

    /// Returns the directory the records are actually stored in.
    pub fn records_dir(&self) -> &Path {
        self.storage.base_path()
    }

    fn load_record(&self, check_in_id: &str) -> Result<Option<CheckIn>> {
        let path = self.records_dir().join(format!("{}.json", check_in_id));
        let Some(value) = read_document(&path)? else {
            return Ok(None);
        };
        ensure_known_version(&value, CHECK_IN_ENTITY, CHECK_IN_VERSIONS)?;

        self.storage
            .load(CHECK_IN_ENTITY, check_in_id)
            .map(Some)
            .map_err(|e| storage_error(&format!("Failed to load check-in '{}'", check_in_id), e))
    }
}

impl CheckInRepository for FileCheckInRepository {
    fn save(&self, record: &CheckIn) -> Result<()> {
        self.storage
            .save(CHECK_IN_ENTITY, &record.id, record.clone())
            .map_err(|e| storage_error(&format!("Failed to save check-in '{}'", record.id), e))?;

        tracing::debug!("Saved check-in record {}", record.id);
        Ok(())
    }

    fn find_by_id(&self, check_in_id: &str) -> Result<Option<CheckIn>> {
        let exists = self
            .storage
            .exists(check_in_id)
            .map_err(|e| storage_error("Invalid check-in id", e))?;
        if !exists {
            return Ok(None);
        }
        self.load_record(check_in_id)
    }

    fn list_all(&self) -> Result<Vec<CheckIn>> {
        let ids = self
            .storage
            .list_ids()
            .map_err(|e| storage_error("Failed to list check-ins", e))?;

        let mut records = Vec::with_capacity(ids.len());
        for id in ids {
            match self.load_record(&id) {
                Ok(Some(record)) => records.push(record),
                Ok(None) => {}
                Err(e) => tracing::warn!("Skipping unreadable check-in '{}': {}", id, e),
            }
        }

        records.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use checkin_core::checkin::CheckInStatus;
    use std::fs;
    use tempfile::TempDir;
    use version_migrate::PathStrategy;

    fn repository(temp_dir: &TempDir) -> FileCheckInRepository {
        let paths = AppPaths::new("checkin")
            .data_strategy(PathStrategy::CustomBase(temp_dir.path().to_path_buf()));
        FileCheckInRepository::new(paths).unwrap()
    }

    fn record(id: &str, minutes_ago: i64, status: CheckInStatus) -> CheckIn {
        let started_at = Utc::now() - Duration::minutes(minutes_ago);
        CheckIn {
            id: id.to_string(),
            couple_id: "alex-and-sam".to_string(),
            participants: vec!["alex".to_string(), "sam".to_string()],
            started_at,
            completed_at: (status == CheckInStatus::Completed).then_some(started_at),
            status,
            categories: vec!["gratitude".to_string()],
            committed_notes: vec![],
            action_items: vec![],
        }
    }

    /// Rewrites a stored record's `version` field in place.
    fn restamp(repo: &FileCheckInRepository, id: &str, version: &str) {
        let path = repo.records_dir().join(format!("{}.json", id));
        let mut value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        value["version"] = serde_json::json!(version);
        fs::write(&path, serde_json::to_string(&value).unwrap()).unwrap();
    }

    #[test]
    fn test_save_and_find() {
        let temp_dir = TempDir::new().unwrap();
        let repo = repository(&temp_dir);
        let saved = record("c-1", 5, CheckInStatus::Completed);

        repo.save(&saved).unwrap();

        assert!(repo.records_dir().ends_with("checkins"));
        assert!(repo.records_dir().join("c-1.json").exists());
        assert_eq!(repo.find_by_id("c-1").unwrap(), Some(saved));
        assert!(repo.find_by_id("missing").unwrap().is_none());
    }

    #[test]
    fn test_list_all_empty_for_fresh_directory() {
        let temp_dir = TempDir::new().unwrap();
        let repo = repository(&temp_dir);

        assert!(repo.list_all().unwrap().is_empty());
    }

    #[test]
    fn test_list_all_newest_first() {
        let temp_dir = TempDir::new().unwrap();
        let repo = repository(&temp_dir);

        repo.save(&record("old", 120, CheckInStatus::Abandoned)).unwrap();
        repo.save(&record("new", 1, CheckInStatus::Completed)).unwrap();
        repo.save(&record("mid", 30, CheckInStatus::Completed)).unwrap();

        let ids: Vec<String> = repo.list_all().unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["new", "mid", "old"]);
    }

    #[test]
    fn test_list_all_skips_unreadable_files() {
        let temp_dir = TempDir::new().unwrap();
        let repo = repository(&temp_dir);

        repo.save(&record("good", 1, CheckInStatus::Completed)).unwrap();
        fs::write(repo.records_dir().join("broken.json"), "{not json").unwrap();
        fs::write(repo.records_dir().join("notes.txt"), "ignored").unwrap();

        let records = repo.list_all().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "good");
    }

    #[test]
    fn test_future_version_record_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let repo = repository(&temp_dir);

        repo.save(&record("current", 1, CheckInStatus::Completed)).unwrap();
        repo.save(&record("future", 2, CheckInStatus::Completed)).unwrap();
        restamp(&repo, "future", "9.0.0");

        let err = repo.find_by_id("future").unwrap_err();
        assert!(err.to_string().contains("9.0.0"));

        let ids: Vec<String> = repo.list_all().unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["current"]);
    }

    #[test]
    fn test_unversioned_record_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let repo = repository(&temp_dir);
        let saved = record("bare", 1, CheckInStatus::Abandoned);

        fs::write(
            repo.records_dir().join("bare.json"),
            serde_json::to_string(&saved).unwrap(),
        )
        .unwrap();

        assert!(repo.find_by_id("bare").is_err());
        assert!(repo.list_all().unwrap().is_empty());
    }

    #[test]
    fn test_overwrite_same_id() {
        let temp_dir = TempDir::new().unwrap();
        let repo = repository(&temp_dir);

        repo.save(&record("c-1", 5, CheckInStatus::Abandoned)).unwrap();
        repo.save(&record("c-1", 5, CheckInStatus::Completed)).unwrap();

        let found = repo.find_by_id("c-1").unwrap().unwrap();
        assert_eq!(found.status, CheckInStatus::Completed);
        assert_eq!(repo.list_all().unwrap().len(), 1);
    }
}
