//! Action item ledger.
//!
//! Unlike draft notes, action items go straight onto the base record when
//! they are created. They survive an abandoned check-in.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::model::{ActionItem, CheckInSession, Priority};

/// Partial update for an [`ActionItem`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionItemUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    /// `Some(None)` unassigns the item.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<Option<String>>,
}

impl CheckInSession {
    /// Looks up an action item by id.
    pub fn action_item(&self, item_id: &str) -> Option<&ActionItem> {
        self.base_record.action_items.iter().find(|i| i.id == item_id)
    }

    pub(crate) fn push_action_item(
        &mut self,
        title: String,
        priority: Priority,
        assigned_to: Option<String>,
        now: DateTime<Utc>,
    ) -> ActionItem {
        let item = ActionItem {
            id: Uuid::new_v4().to_string(),
            title,
            priority,
            assigned_to,
            check_in_id: self.base_record.id.clone(),
            completed: false,
            completed_at: None,
            created_at: now,
        };
        self.base_record.action_items.push(item.clone());
        item
    }

    pub(crate) fn apply_action_item_update(&mut self, item_id: &str, update: ActionItemUpdate) -> bool {
        let Some(item) = self
            .base_record
            .action_items
            .iter_mut()
            .find(|i| i.id == item_id)
        else {
            return false;
        };
        if let Some(title) = update.title {
            item.title = title;
        }
        if let Some(priority) = update.priority {
            item.priority = priority;
        }
        if let Some(assigned_to) = update.assigned_to {
            item.assigned_to = assigned_to;
        }
        true
    }

    pub(crate) fn drop_action_item(&mut self, item_id: &str) -> bool {
        let before = self.base_record.action_items.len();
        self.base_record.action_items.retain(|i| i.id != item_id);
        self.base_record.action_items.len() != before
    }

    /// Flips `completed`; stamps `completed_at` when done, clears it otherwise.
    pub(crate) fn flip_action_item(&mut self, item_id: &str, now: DateTime<Utc>) -> bool {
        let Some(item) = self
            .base_record
            .action_items
            .iter_mut()
            .find(|i| i.id == item_id)
        else {
            return false;
        };
        item.completed = !item.completed;
        item.completed_at = item.completed.then_some(now);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> CheckInSession {
        CheckInSession::new("couple", vec!["alex".into(), "sam".into()], vec![], Utc::now())
    }

    #[test]
    fn test_push_goes_onto_base_record() {
        let mut s = session();
        let item = s.push_action_item("Buy flowers".into(), Priority::High, None, Utc::now());

        assert_eq!(item.check_in_id, s.base_record.id);
        assert!(!item.completed);
        assert_eq!(s.action_items().len(), 1);
        assert_eq!(s.action_item(&item.id).unwrap().title, "Buy flowers");
    }

    #[test]
    fn test_toggle_stamps_and_clears_completed_at() {
        let mut s = session();
        let item = s.push_action_item("Plan trip".into(), Priority::Medium, None, Utc::now());
        let now = Utc::now();

        assert!(s.flip_action_item(&item.id, now));
        let done = s.action_item(&item.id).unwrap();
        assert!(done.completed);
        assert_eq!(done.completed_at, Some(now));

        assert!(s.flip_action_item(&item.id, Utc::now()));
        let undone = s.action_item(&item.id).unwrap();
        assert!(!undone.completed);
        assert_eq!(undone.completed_at, None);
    }

    #[test]
    fn test_update_and_unassign() {
        let mut s = session();
        let item = s.push_action_item(
            "Call mom".into(),
            Priority::Low,
            Some("sam".into()),
            Utc::now(),
        );

        assert!(s.apply_action_item_update(
            &item.id,
            ActionItemUpdate {
                priority: Some(Priority::High),
                assigned_to: Some(None),
                ..Default::default()
            },
        ));

        let updated = s.action_item(&item.id).unwrap();
        assert_eq!(updated.priority, Priority::High);
        assert_eq!(updated.assigned_to, None);
        assert_eq!(updated.title, "Call mom");
    }

    #[test]
    fn test_unknown_ids_are_noops() {
        let mut s = session();
        s.push_action_item("Keep".into(), Priority::Low, None, Utc::now());
        let before = s.clone();

        assert!(!s.apply_action_item_update("missing", ActionItemUpdate::default()));
        assert!(!s.flip_action_item("missing", Utc::now()));
        assert!(!s.drop_action_item("missing"));
        assert_eq!(s, before);
    }
}
