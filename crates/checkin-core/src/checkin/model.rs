//! Check-in domain model.
//!
//! This module contains the session aggregate and the value types it owns.
//! The serialized shape of [`CheckInSession`] is the snapshot document
//! written to the persistence slot, so field names are camelCase and
//! timestamps serialize as ISO-8601 strings.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

use super::step::CheckInStep;

/// Lifecycle status of the durable check-in record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum CheckInStatus {
    /// The session is still running.
    InProgress,
    /// Finished through `complete_check_in`; draft notes were committed.
    Completed,
    /// Ended through `abandon_check_in`; draft notes were discarded.
    Abandoned,
}

/// Visibility of a note between partners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum NotePrivacy {
    Private,
    Shared,
    Draft,
}

/// Priority of an action item.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

/// A note typed during a session.
///
/// While it sits in [`CheckInSession::draft_notes`] it is not durable on its
/// own; it becomes part of the base record only when the check-in completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub content: String,
    pub privacy: NotePrivacy,
    pub author_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_in_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A follow-up task agreed on during a check-in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionItem {
    pub id: String,
    pub title: String,
    pub priority: Priority,
    /// User id of the partner responsible, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    pub check_in_id: String,
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Per-topic bookkeeping within a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryProgress {
    pub category_id: String,
    pub is_completed: bool,
    /// Free-form discussion notes for this topic.
    pub notes: String,
    /// Seconds spent discussing this topic.
    pub time_spent: u64,
    pub last_updated: DateTime<Utc>,
}

impl CategoryProgress {
    /// Creates an untouched entry for `category_id`.
    pub fn new(category_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            category_id: category_id.into(),
            is_completed: false,
            notes: String::new(),
            time_spent: 0,
            last_updated: now,
        }
    }
}

/// The durable check-in record that outlives the session.
///
/// Handed to the check-in store exactly once, when the session is completed
/// or abandoned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckIn {
    pub id: String,
    pub couple_id: String,
    /// User ids of both partners.
    pub participants: Vec<String>,
    pub started_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    pub status: CheckInStatus,
    pub categories: Vec<String>,
    #[serde(default)]
    pub committed_notes: Vec<Note>,
    #[serde(default)]
    pub action_items: Vec<ActionItem>,
}

/// Step progress of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionProgress {
    pub current_step: CheckInStep,
    /// Append-only: steps are never removed once completed.
    pub completed_steps: BTreeSet<CheckInStep>,
    pub total_steps: usize,
    /// `round(100 * |completed_steps| / total_steps)`
    pub percentage: u8,
}

impl SessionProgress {
    pub fn new() -> Self {
        Self {
            current_step: CheckInStep::Welcome,
            completed_steps: BTreeSet::new(),
            total_steps: CheckInStep::COUNT,
            percentage: 0,
        }
    }

    pub(crate) fn recompute_percentage(&mut self) {
        self.percentage = percentage_of(self.completed_steps.len(), self.total_steps);
    }
}

impl Default for SessionProgress {
    fn default() -> Self {
        Self::new()
    }
}

fn percentage_of(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let ratio = (100.0 * done as f64 / total as f64).round();
    ratio.clamp(0.0, 100.0) as u8
}

/// The in-progress aggregate tracking one guided check-in conversation.
///
/// Owned exclusively by [`CheckInEngine`](super::CheckInEngine); every
/// mutation goes through the engine so that each one is followed by a
/// snapshot write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInSession {
    pub id: String,
    pub base_record: CheckIn,
    pub progress: SessionProgress,
    pub selected_categories: Vec<String>,
    pub category_progress: Vec<CategoryProgress>,
    #[serde(default)]
    pub draft_notes: Vec<Note>,
    pub started_at: DateTime<Utc>,
    pub last_saved_at: DateTime<Utc>,
}

impl CheckInSession {
    /// Builds a fresh session positioned on `welcome`.
    ///
    /// Duplicate category ids are dropped, keeping first occurrence order.
    pub fn new(
        couple_id: impl Into<String>,
        participants: Vec<String>,
        categories: Vec<String>,
        now: DateTime<Utc>,
    ) -> Self {
        let selected = dedup_preserving_order(categories);
        let category_progress = selected
            .iter()
            .map(|id| CategoryProgress::new(id.clone(), now))
            .collect();

        let base_record = CheckIn {
            id: Uuid::new_v4().to_string(),
            couple_id: couple_id.into(),
            participants,
            started_at: now,
            completed_at: None,
            status: CheckInStatus::InProgress,
            categories: selected.clone(),
            committed_notes: Vec::new(),
            action_items: Vec::new(),
        };

        Self {
            id: Uuid::new_v4().to_string(),
            base_record,
            progress: SessionProgress::new(),
            selected_categories: selected,
            category_progress,
            draft_notes: Vec::new(),
            started_at: now,
            last_saved_at: now,
        }
    }

    /// Id of the underlying check-in record.
    pub fn check_in_id(&self) -> &str {
        &self.base_record.id
    }

    /// Current step of the conversation.
    pub fn current_step(&self) -> CheckInStep {
        self.progress.current_step
    }

    /// Whether `category_id` is one of the selected topics.
    pub fn is_selected(&self, category_id: &str) -> bool {
        self.selected_categories.iter().any(|c| c == category_id)
    }

    /// Action items recorded so far (they live on the base record).
    pub fn action_items(&self) -> &[ActionItem] {
        &self.base_record.action_items
    }

    pub(crate) fn touch(&mut self, now: DateTime<Utc>) {
        self.last_saved_at = now;
    }
}

pub(crate) fn dedup_preserving_order(ids: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    ids.into_iter()
        .filter(|id| seen.insert(id.clone()))
        .collect()
}
