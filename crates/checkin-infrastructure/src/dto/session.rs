//! Session snapshot DTOs and migrations
//!
//! ## Version History
//! - **1.0.0**: Initial schema. Also the shape of legacy snapshots written
//!   without a `version` field.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use version_migrate::{FromDomain, IntoDomain, Versioned};

use checkin_core::checkin::{CategoryProgress, CheckIn, CheckInSession, Note, SessionProgress};

/// Entity name the snapshot migrator is registered under.
pub const SESSION_SNAPSHOT_ENTITY: &str = "checkin_session";

/// Version assumed for payloads that carry no `version` field.
pub const LEGACY_SNAPSHOT_VERSION: &str = "1.0.0";

/// Versions the snapshot migrator has a path for.
pub const SESSION_SNAPSHOT_VERSIONS: &[&str] = &[<CheckInSessionV1_0_0 as Versioned>::VERSION];

/// Represents V1.0.0 of the session snapshot schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Versioned)]
#[versioned(version = "1.0.0")]
#[serde(rename_all = "camelCase")]
pub struct CheckInSessionV1_0_0 {
    /// Session identifier (UUID format)
    pub id: String,
    /// The check-in record that outlives the session
    pub base_record: CheckIn,
    /// Step progress
    pub progress: SessionProgress,
    /// Topics chosen during category selection, in order
    pub selected_categories: Vec<String>,
    /// One entry per selected topic
    pub category_progress: Vec<CategoryProgress>,
    /// Uncommitted notes
    #[serde(default)]
    pub draft_notes: Vec<Note>,
    pub started_at: DateTime<Utc>,
    pub last_saved_at: DateTime<Utc>,
}

/// Type alias for the latest snapshot version.
pub type CheckInSessionDTO = CheckInSessionV1_0_0;

/// Convert DTO to domain model
impl IntoDomain<CheckInSession> for CheckInSessionV1_0_0 {
    fn into_domain(self) -> CheckInSession {
        CheckInSession {
            id: self.id,
            base_record: self.base_record,
            progress: self.progress,
            selected_categories: self.selected_categories,
            category_progress: self.category_progress,
            draft_notes: self.draft_notes,
            started_at: self.started_at,
            last_saved_at: self.last_saved_at,
        }
    }
}

/// Convert domain model to DTO for persistence
impl FromDomain<CheckInSession> for CheckInSessionV1_0_0 {
    fn from_domain(session: CheckInSession) -> Self {
        CheckInSessionV1_0_0 {
            id: session.id,
            base_record: session.base_record,
            progress: session.progress,
            selected_categories: session.selected_categories,
            category_progress: session.category_progress,
            draft_notes: session.draft_notes,
            started_at: session.started_at,
            last_saved_at: session.last_saved_at,
        }
    }
}

/// Stamps payloads that predate snapshot versioning as `1.0.0`.
///
/// Returns `true` if the payload was changed. Non-object payloads are left
/// alone so the migrator reports them.
pub fn stamp_legacy_version(value: &mut serde_json::Value) -> bool {
    match value.as_object_mut() {
        Some(object) if !object.contains_key("version") => {
            object.insert(
                "version".to_string(),
                serde_json::Value::String(LEGACY_SNAPSHOT_VERSION.to_string()),
            );
            true
        }
        _ => false,
    }
}

// ============================================================================
// Migrator factory
// ============================================================================

/// Creates and configures a Migrator instance for session snapshots.
///
/// # Migration Path
///
/// - V1.0.0 → CheckInSession: Converts DTO to domain model
///
/// # Example
///
/// ```ignore
/// let migrator = create_session_snapshot_migrator();
/// let session: CheckInSession = migrator.load_flat_from("checkin_session", json_value)?;
/// ```
pub fn create_session_snapshot_migrator() -> version_migrate::Migrator {
    let mut migrator = version_migrate::Migrator::builder().build();

    // Register migration path: V1.0.0 -> CheckInSession
    let session_path = version_migrate::Migrator::define(SESSION_SNAPSHOT_ENTITY)
        .from::<CheckInSessionV1_0_0>()
        .into_with_save::<CheckInSession>();

    migrator
        .register(session_path)
        .expect("Failed to register checkin_session migration path");

    migrator
}
