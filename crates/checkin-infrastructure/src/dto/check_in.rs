//! Check-in record DTOs and migrations
//!
//! ## Version History
//! - **1.0.0**: Initial schema

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use version_migrate::{FromDomain, IntoDomain, Versioned};

use checkin_core::checkin::{ActionItem, CheckIn, CheckInStatus, Note};

/// Entity name the record migrator is registered under.
pub const CHECK_IN_ENTITY: &str = "check_in";

/// Versions the record migrator has a path for.
pub const CHECK_IN_VERSIONS: &[&str] = &[<CheckInRecordV1_0_0 as Versioned>::VERSION];

/// Represents V1.0.0 of the persisted check-in record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Versioned)]
#[versioned(version = "1.0.0")]
#[serde(rename_all = "camelCase")]
pub struct CheckInRecordV1_0_0 {
    pub id: String,
    pub couple_id: String,
    pub participants: Vec<String>,
    pub started_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    pub status: CheckInStatus,
    #[serde(default)]
    pub categories: Vec<String>,
    /// Notes committed at completion. Empty for abandoned records.
    #[serde(default)]
    pub committed_notes: Vec<Note>,
    #[serde(default)]
    pub action_items: Vec<ActionItem>,
}

/// Type alias for the latest record version.
pub type CheckInRecordDTO = CheckInRecordV1_0_0;

impl IntoDomain<CheckIn> for CheckInRecordV1_0_0 {
    fn into_domain(self) -> CheckIn {
        CheckIn {
            id: self.id,
            couple_id: self.couple_id,
            participants: self.participants,
            started_at: self.started_at,
            completed_at: self.completed_at,
            status: self.status,
            categories: self.categories,
            committed_notes: self.committed_notes,
            action_items: self.action_items,
        }
    }
}

impl FromDomain<CheckIn> for CheckInRecordV1_0_0 {
    fn from_domain(record: CheckIn) -> Self {
        CheckInRecordV1_0_0 {
            id: record.id,
            couple_id: record.couple_id,
            participants: record.participants,
            started_at: record.started_at,
            completed_at: record.completed_at,
            status: record.status,
            categories: record.categories,
            committed_notes: record.committed_notes,
            action_items: record.action_items,
        }
    }
}

/// Creates and configures a Migrator instance for check-in records.
///
/// # Migration Path
///
/// - V1.0.0 → CheckIn
pub fn create_check_in_migrator() -> version_migrate::Migrator {
    let mut migrator = version_migrate::Migrator::builder().build();

    let check_in_path = version_migrate::Migrator::define(CHECK_IN_ENTITY)
        .from::<CheckInRecordV1_0_0>()
        .into_with_save::<CheckIn>();

    migrator
        .register(check_in_path)
        .expect("Failed to register check_in migration path");

    migrator
}
