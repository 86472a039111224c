//! Draft note buffer.
//!
//! Notes typed during a session live only inside the session snapshot until
//! the check-in completes (committed en masse) or is abandoned (discarded en
//! masse). There is no partial-commit path.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::model::{CheckInSession, Note, NotePrivacy};

/// Partial update for a draft [`Note`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub privacy: Option<NotePrivacy>,
    /// `Some(None)` detaches the note from its category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Option<String>>,
}

impl CheckInSession {
    /// Looks up a draft note by id.
    pub fn draft_note(&self, note_id: &str) -> Option<&Note> {
        self.draft_notes.iter().find(|n| n.id == note_id)
    }

    pub(crate) fn push_draft_note(
        &mut self,
        author_id: &str,
        content: String,
        privacy: NotePrivacy,
        category_id: Option<String>,
        now: DateTime<Utc>,
    ) -> Note {
        let note = Note {
            id: Uuid::new_v4().to_string(),
            content,
            privacy,
            author_id: author_id.to_string(),
            category_id,
            check_in_id: Some(self.base_record.id.clone()),
            created_at: now,
            updated_at: now,
        };
        self.draft_notes.push(note.clone());
        note
    }

    pub(crate) fn apply_note_update(
        &mut self,
        note_id: &str,
        update: NoteUpdate,
        now: DateTime<Utc>,
    ) -> bool {
        let Some(note) = self.draft_notes.iter_mut().find(|n| n.id == note_id) else {
            return false;
        };
        if let Some(content) = update.content {
            note.content = content;
        }
        if let Some(privacy) = update.privacy {
            note.privacy = privacy;
        }
        if let Some(category_id) = update.category_id {
            note.category_id = category_id;
        }
        note.updated_at = now;
        true
    }

    pub(crate) fn drop_draft_note(&mut self, note_id: &str) -> bool {
        let before = self.draft_notes.len();
        self.draft_notes.retain(|n| n.id != note_id);
        self.draft_notes.len() != before
    }

    /// Moves every draft into the base record's committed notes.
    pub(crate) fn commit_drafts(&mut self) {
        let drafts = std::mem::take(&mut self.draft_notes);
        self.base_record.committed_notes.extend(drafts);
    }

    pub(crate) fn discard_drafts(&mut self) {
        self.draft_notes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> CheckInSession {
        CheckInSession::new("couple", vec![], vec!["a".into()], Utc::now())
    }

    #[test]
    fn test_push_stamps_ids_and_check_in() {
        let mut s = session();
        let note = s.push_draft_note("alex", "hello".into(), NotePrivacy::Shared, None, Utc::now());

        assert!(!note.id.is_empty());
        assert_eq!(note.author_id, "alex");
        assert_eq!(note.check_in_id.as_deref(), Some(s.check_in_id()));
        assert_eq!(note.created_at, note.updated_at);
        assert_eq!(s.draft_notes.len(), 1);
    }

    #[test]
    fn test_update_merges_and_bumps_updated_at() {
        let mut s = session();
        let note = s.push_draft_note(
            "alex",
            "first".into(),
            NotePrivacy::Draft,
            Some("a".into()),
            Utc::now(),
        );
        let later = note.created_at + chrono::Duration::seconds(10);

        assert!(s.apply_note_update(
            &note.id,
            NoteUpdate {
                content: Some("second".into()),
                category_id: Some(None),
                ..Default::default()
            },
            later,
        ));

        let updated = s.draft_note(&note.id).unwrap();
        assert_eq!(updated.content, "second");
        assert_eq!(updated.privacy, NotePrivacy::Draft);
        assert_eq!(updated.category_id, None);
        assert_eq!(updated.updated_at, later);
        assert_eq!(updated.created_at, note.created_at);
    }

    #[test]
    fn test_update_unknown_id_is_rejected() {
        let mut s = session();
        assert!(!s.apply_note_update("missing", NoteUpdate::default(), Utc::now()));
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut s = session();
        let note = s.push_draft_note("alex", "x".into(), NotePrivacy::Private, None, Utc::now());
        assert!(!s.drop_draft_note("missing"));
        assert_eq!(s.draft_notes.len(), 1);
        assert!(s.drop_draft_note(&note.id));
        assert!(s.draft_notes.is_empty());
    }

    #[test]
    fn test_commit_moves_all_drafts() {
        let mut s = session();
        s.push_draft_note("alex", "one".into(), NotePrivacy::Shared, None, Utc::now());
        s.push_draft_note("sam", "two".into(), NotePrivacy::Private, None, Utc::now());

        s.commit_drafts();

        assert!(s.draft_notes.is_empty());
        let contents: Vec<_> = s
            .base_record
            .committed_notes
            .iter()
            .map(|n| n.content.as_str())
            .collect();
        assert_eq!(contents, vec!["one", "two"]);
    }
}
