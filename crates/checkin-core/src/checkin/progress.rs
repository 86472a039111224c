//! Category progress tracker.
//!
//! Keeps exactly one [`CategoryProgress`] entry per selected category and
//! applies partial updates to them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::model::{CategoryProgress, CheckInSession, dedup_preserving_order};
use super::step::CheckInStep;

/// Partial update for a [`CategoryProgress`] entry.
///
/// `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryProgressUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_completed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_spent: Option<u64>,
}

impl CategoryProgressUpdate {
    pub fn completed() -> Self {
        Self {
            is_completed: Some(true),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.is_completed.is_none() && self.notes.is_none() && self.time_spent.is_none()
    }
}

impl CheckInSession {
    /// Looks up the progress entry for `category_id`.
    pub fn category_progress_for(&self, category_id: &str) -> Option<&CategoryProgress> {
        self.category_progress
            .iter()
            .find(|p| p.category_id == category_id)
    }

    /// First topic not yet completed, while the discussion step is active.
    ///
    /// Returns `None` outside `categoryDiscussion` or once every topic is done.
    pub fn current_category_progress(&self) -> Option<&CategoryProgress> {
        if self.progress.current_step != CheckInStep::CategoryDiscussion {
            return None;
        }
        self.category_progress.iter().find(|p| !p.is_completed)
    }

    pub(crate) fn apply_category_progress(
        &mut self,
        category_id: &str,
        update: CategoryProgressUpdate,
        now: DateTime<Utc>,
    ) -> bool {
        if !self.is_selected(category_id) {
            return false;
        }
        let Some(entry) = self
            .category_progress
            .iter_mut()
            .find(|p| p.category_id == category_id)
        else {
            return false;
        };

        if let Some(is_completed) = update.is_completed {
            entry.is_completed = is_completed;
        }
        if let Some(notes) = update.notes {
            entry.notes = notes;
        }
        if let Some(time_spent) = update.time_spent {
            entry.time_spent = time_spent;
        }
        entry.last_updated = now;
        true
    }

    pub(crate) fn add_time_spent(
        &mut self,
        category_id: &str,
        seconds: u64,
        now: DateTime<Utc>,
    ) -> bool {
        let Some(current) = self
            .category_progress_for(category_id)
            .map(|p| p.time_spent)
        else {
            return false;
        };
        self.apply_category_progress(
            category_id,
            CategoryProgressUpdate {
                time_spent: Some(current.saturating_add(seconds)),
                ..CategoryProgressUpdate::default()
            },
            now,
        )
    }

    /// Whether the selected topic list may still change.
    pub fn selection_open(&self) -> bool {
        matches!(
            self.progress.current_step,
            CheckInStep::Welcome | CheckInStep::CategorySelection
        )
    }

    pub(crate) fn replace_selection(&mut self, categories: Vec<String>, now: DateTime<Utc>) {
        let selected = dedup_preserving_order(categories);

        let mut previous = std::mem::take(&mut self.category_progress);
        self.category_progress = selected
            .iter()
            .map(|id| match previous.iter().position(|p| &p.category_id == id) {
                Some(pos) => previous.swap_remove(pos),
                None => CategoryProgress::new(id.clone(), now),
            })
            .collect();

        self.base_record.categories = selected.clone();
        self.selected_categories = selected;
    }

    pub(crate) fn toggle_selection(&mut self, category_id: &str, now: DateTime<Utc>) {
        let mut categories = self.selected_categories.clone();
        if let Some(pos) = categories.iter().position(|c| c == category_id) {
            categories.remove(pos);
        } else {
            categories.push(category_id.to_string());
        }
        self.replace_selection(categories, now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(categories: &[&str]) -> CheckInSession {
        CheckInSession::new(
            "couple",
            vec![],
            categories.iter().map(|c| c.to_string()).collect(),
            Utc::now(),
        )
    }

    #[test]
    fn test_partial_update_merges_fields() {
        let mut s = session(&["communication"]);
        let later = Utc::now() + chrono::Duration::seconds(5);

        assert!(s.apply_category_progress(
            "communication",
            CategoryProgressUpdate {
                notes: Some("talked about weekends".into()),
                ..Default::default()
            },
            later,
        ));
        assert!(s.apply_category_progress(
            "communication",
            CategoryProgressUpdate {
                time_spent: Some(120),
                ..Default::default()
            },
            later,
        ));

        let entry = s.category_progress_for("communication").unwrap();
        assert_eq!(entry.notes, "talked about weekends");
        assert_eq!(entry.time_spent, 120);
        assert!(!entry.is_completed);
        assert_eq!(entry.last_updated, later);
    }

    #[test]
    fn test_unknown_category_is_rejected() {
        let mut s = session(&["communication"]);
        let before = s.clone();
        assert!(!s.apply_category_progress("finances", CategoryProgressUpdate::completed(), Utc::now()));
        assert_eq!(s, before);
    }

    #[test]
    fn test_current_category_only_during_discussion() {
        let mut s = session(&["a", "b"]);
        assert!(s.current_category_progress().is_none());

        s.progress.current_step = CheckInStep::CategoryDiscussion;
        assert_eq!(s.current_category_progress().unwrap().category_id, "a");

        s.apply_category_progress("a", CategoryProgressUpdate::completed(), Utc::now());
        assert_eq!(s.current_category_progress().unwrap().category_id, "b");

        s.apply_category_progress("b", CategoryProgressUpdate::completed(), Utc::now());
        assert!(s.current_category_progress().is_none());
    }

    #[test]
    fn test_time_spent_accumulates() {
        let mut s = session(&["a"]);
        s.add_time_spent("a", 30, Utc::now());
        s.add_time_spent("a", 45, Utc::now());
        assert_eq!(s.category_progress_for("a").unwrap().time_spent, 75);
        assert!(!s.add_time_spent("zzz", 10, Utc::now()));
    }

    #[test]
    fn test_replace_selection_keeps_existing_entries() {
        let mut s = session(&["a", "b"]);
        s.apply_category_progress(
            "b",
            CategoryProgressUpdate {
                notes: Some("keep me".into()),
                ..Default::default()
            },
            Utc::now(),
        );

        s.replace_selection(vec!["c".into(), "b".into(), "c".into()], Utc::now());

        assert_eq!(s.selected_categories, vec!["c", "b"]);
        assert_eq!(s.base_record.categories, vec!["c", "b"]);
        let ids: Vec<_> = s.category_progress.iter().map(|p| p.category_id.as_str()).collect();
        assert_eq!(ids, vec!["c", "b"]);
        assert_eq!(s.category_progress_for("b").unwrap().notes, "keep me");
        assert!(s.category_progress_for("a").is_none());
    }

    #[test]
    fn test_toggle_selection_adds_then_removes() {
        let mut s = session(&[]);
        s.toggle_selection("gratitude", Utc::now());
        assert_eq!(s.selected_categories, vec!["gratitude"]);
        assert_eq!(s.category_progress.len(), 1);

        s.toggle_selection("gratitude", Utc::now());
        assert!(s.selected_categories.is_empty());
        assert!(s.category_progress.is_empty());
    }
}
