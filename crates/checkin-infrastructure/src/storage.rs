//! Glue between version-migrate's `DirStorage` and [`CheckInError`].

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use version_migrate::MigrationError;

use checkin_core::CheckInError;
use checkin_core::error::Result;

/// Maps a storage failure onto the error kinds the engine tells apart.
///
/// Unreadable files stay I/O errors. Payloads that were read but could not
/// be understood become `Serialization` or `Migration` errors.
pub(crate) fn storage_error(context: &str, err: MigrationError) -> CheckInError {
    let message = format!("{}: {}", context, err);
    match err {
        MigrationError::IoError { .. }
        | MigrationError::LockError { .. }
        | MigrationError::HomeDirNotFound
        | MigrationError::PathResolution(_) => CheckInError::io(message),
        MigrationError::DeserializationError(_)
        | MigrationError::SerializationError(_)
        | MigrationError::TomlParseError(_)
        | MigrationError::TomlSerializeError(_) => CheckInError::json(message),
        MigrationError::FilenameEncoding { .. } => CheckInError::internal(message),
        _ => CheckInError::migration(message),
    }
}

/// Reads a stored JSON document without migrating it.
///
/// `DirStorage::load` strips `version` on the way in, so anything that has to
/// look at the raw version reads the file here first. A missing file is `None`.
pub(crate) fn read_document(path: &Path) -> Result<Option<serde_json::Value>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    serde_json::from_str(&content)
        .map(Some)
        .map_err(|e| CheckInError::json(format!("Failed to parse {}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_document_missing_is_none() {
        let temp_dir = TempDir::new().unwrap();
        assert!(read_document(&temp_dir.path().join("absent.json")).unwrap().is_none());
    }

    #[test]
    fn test_read_document_truncated_is_serialization_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("half.json");
        fs::write(&path, "{\"version\":\"1.0").unwrap();

        assert!(read_document(&path).unwrap_err().is_serialization());
    }

    #[test]
    fn test_storage_error_classification() {
        let io = MigrationError::IoError {
            operation: version_migrate::IoOperationKind::Write,
            path: "/x".to_string(),
            context: None,
            error: "disk full".to_string(),
        };
        assert!(storage_error("save", io).is_io());
        assert!(
            storage_error("load", MigrationError::DeserializationError("eof".into()))
                .is_corrupt_snapshot()
        );
        assert!(
            storage_error("load", MigrationError::EntityNotFound("x".into())).is_corrupt_snapshot()
        );
    }
}
