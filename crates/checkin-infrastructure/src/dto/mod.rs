//! Data Transfer Objects (DTOs) for persistence.
//!
//! These DTOs represent the versioned schema of everything written to disk.
//! Payloads carry a flat `version` field next to the entity's own fields.
//!
//! ## Schema Versioning (Semantic Versioning)
//!
//! - **MAJOR (X.0.0)**: Breaking changes (field removal, type changes)
//! - **MINOR (1.X.0)**: Backward-compatible additions (new optional fields)
//!
//! ### Session Snapshot Version History
//! - **1.0.0**: Initial schema. Unversioned legacy snapshots load as 1.0.0.
//!
//! ### Check-in Record Version History
//! - **1.0.0**: Initial schema

mod check_in;
mod session;

use checkin_core::CheckInError;
use checkin_core::error::Result;

pub use check_in::{
    CHECK_IN_ENTITY, CHECK_IN_VERSIONS, CheckInRecordDTO, CheckInRecordV1_0_0,
    create_check_in_migrator,
};
pub use session::{
    CheckInSessionDTO, CheckInSessionV1_0_0, LEGACY_SNAPSHOT_VERSION, SESSION_SNAPSHOT_ENTITY,
    SESSION_SNAPSHOT_VERSIONS, create_session_snapshot_migrator, stamp_legacy_version,
};

/// Rejects payloads whose `version` has no registered migration path.
///
/// `Migrator::load_flat_from` strips the version key and finalizes whatever
/// remains as the latest DTO, so this must run before every load.
pub fn ensure_known_version(value: &serde_json::Value, entity: &str, known: &[&str]) -> Result<()> {
    match value.get("version").and_then(serde_json::Value::as_str) {
        Some(version) if known.contains(&version) => Ok(()),
        Some(version) => Err(CheckInError::migration(format!(
            "Unsupported {} version '{}' (known: {})",
            entity,
            version,
            known.join(", ")
        ))),
        None => Err(CheckInError::migration(format!(
            "{} payload has no version field",
            entity
        ))),
    }
}
