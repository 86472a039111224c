use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::action_items::ActionItemUpdate;
use super::model::{
    ActionItem, CategoryProgress, CheckIn, CheckInSession, CheckInStatus, Note, NotePrivacy,
    Priority, SessionProgress,
};
use super::notes::NoteUpdate;
use super::progress::CategoryProgressUpdate;
use super::repository::{CheckInRepository, SessionSnapshotRepository};
use super::step::{CheckInStep, can_advance_to, can_proceed};
use crate::config::AppConfig;

/// Who is running the engine, and for which couple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineContext {
    /// Couple the check-in belongs to.
    pub couple_id: String,
    /// Author of notes created through this engine.
    pub current_user_id: String,
    /// User ids of both partners.
    pub participants: Vec<String>,
}

impl EngineContext {
    pub fn new(
        couple_id: impl Into<String>,
        current_user_id: impl Into<String>,
        participants: Vec<String>,
    ) -> Self {
        Self {
            couple_id: couple_id.into(),
            current_user_id: current_user_id.into(),
            participants,
        }
    }

    /// Builds the context from the `[couple]` and `[[partners]]` config tables.
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            couple_id: config.couple.id.clone(),
            current_user_id: config.current_user_id.clone(),
            participants: config.partners.iter().map(|p| p.id.clone()).collect(),
        }
    }
}

/// A check-in that was just completed or abandoned.
#[derive(Debug, Clone, PartialEq)]
pub struct FinishedCheckIn {
    pub record: CheckIn,
    /// `false` when the record repository rejected the save. The session and
    /// its snapshot are gone either way, so `record` is then the only copy.
    pub stored: bool,
}

/// Drives one guided check-in from start to completion.
///
/// `CheckInEngine` is responsible for:
/// - Owning the single active [`CheckInSession`] (the only writer to it)
/// - Validating every mutation against the step graph and entity lookups
/// - Writing a snapshot after every applied mutation
/// - Rehydrating the session from the snapshot slot on startup
/// - Handing the base record to durable storage on completion or abandon
///
/// Rejected operations are silent no-ops: they return `false`/`None`, leave
/// state untouched and skip the snapshot write. Storage failures are logged
/// and never roll back in-memory state.
pub struct CheckInEngine {
    context: EngineContext,
    /// The active session, if any
    session: Option<CheckInSession>,
    /// Single-slot snapshot storage for the active session
    snapshot_repository: Arc<dyn SessionSnapshotRepository>,
    /// Durable storage for terminated check-in records
    check_in_repository: Arc<dyn CheckInRepository>,
}

impl CheckInEngine {
    /// Creates an engine with no active session. Call [`restore`](Self::restore)
    /// before showing any step UI.
    pub fn new(
        context: EngineContext,
        snapshot_repository: Arc<dyn SessionSnapshotRepository>,
        check_in_repository: Arc<dyn CheckInRepository>,
    ) -> Self {
        Self {
            context,
            session: None,
            snapshot_repository,
            check_in_repository,
        }
    }

    /// Creates an engine and immediately attempts to resume from the snapshot slot.
    pub fn open(
        context: EngineContext,
        snapshot_repository: Arc<dyn SessionSnapshotRepository>,
        check_in_repository: Arc<dyn CheckInRepository>,
    ) -> Self {
        let mut engine = Self::new(context, snapshot_repository, check_in_repository);
        engine.restore();
        engine
    }

    pub fn context(&self) -> &EngineContext {
        &self.context
    }

    /// Rehydrates the active session from the snapshot slot.
    ///
    /// - Snapshot found: the session is resumed exactly as persisted.
    /// - Slot empty: no active session.
    /// - Payload corrupt: the slot is discarded and there is no active session.
    ///   No base record is written, since it could not be reconstructed.
    /// - Slot unreadable: no active session; the slot is left alone.
    pub fn restore(&mut self) -> Option<&CheckInSession> {
        self.session = match self.snapshot_repository.load() {
            Ok(Some(session)) if session.base_record.status == CheckInStatus::InProgress => {
                tracing::info!(
                    "Resumed check-in session {} at step '{}' ({}%)",
                    session.id,
                    session.progress.current_step,
                    session.progress.percentage
                );
                Some(session)
            }
            Ok(Some(session)) => {
                tracing::warn!(
                    "Discarding snapshot of session {} with terminal status '{}'",
                    session.id,
                    session.base_record.status
                );
                self.discard_snapshot();
                None
            }
            Ok(None) => {
                tracing::debug!("No check-in snapshot found, starting fresh");
                None
            }
            Err(e) if e.is_corrupt_snapshot() => {
                tracing::warn!("Discarding unreadable check-in snapshot: {}", e);
                self.discard_snapshot();
                None
            }
            Err(e) => {
                tracing::warn!("Failed to read check-in snapshot, starting without session: {}", e);
                None
            }
        };
        self.session.as_ref()
    }

    // ============================================================================
    // Read accessors
    // ============================================================================

    /// The active session, if any.
    pub fn session(&self) -> Option<&CheckInSession> {
        self.session.as_ref()
    }

    pub fn has_active_session(&self) -> bool {
        self.session.is_some()
    }

    pub fn progress(&self) -> Option<&SessionProgress> {
        self.session.as_ref().map(|s| &s.progress)
    }

    pub fn selected_categories(&self) -> &[String] {
        self.session
            .as_ref()
            .map(|s| s.selected_categories.as_slice())
            .unwrap_or_default()
    }

    pub fn draft_notes(&self) -> &[Note] {
        self.session
            .as_ref()
            .map(|s| s.draft_notes.as_slice())
            .unwrap_or_default()
    }

    pub fn action_items(&self) -> &[ActionItem] {
        self.session
            .as_ref()
            .map(|s| s.action_items())
            .unwrap_or_default()
    }

    /// First unfinished topic while the discussion step is active.
    pub fn current_category_progress(&self) -> Option<&CategoryProgress> {
        self.session.as_ref()?.current_category_progress()
    }

    // ============================================================================
    // Lifecycle
    // ============================================================================

    /// Starts a new check-in on the `welcome` step.
    ///
    /// If a session is already active it is returned unchanged; callers are
    /// expected to check [`has_active_session`](Self::has_active_session) first.
    pub fn start_check_in(&mut self, categories: Vec<String>) -> &CheckInSession {
        let created = self.session.is_none();
        if !created {
            tracing::debug!("start_check_in ignored: a session is already active");
        }

        let context = &self.context;
        let session = self.session.get_or_insert_with(|| {
            CheckInSession::new(
                context.couple_id.clone(),
                context.participants.clone(),
                categories,
                Utc::now(),
            )
        });
        if created {
            tracing::info!(
                "Started check-in session {} (record {}) with {} categories",
                session.id,
                session.base_record.id,
                session.selected_categories.len()
            );
            save_snapshot(self.snapshot_repository.as_ref(), session);
        }
        session
    }

    /// Commits draft notes, marks the record completed and hands it to
    /// durable storage, then clears the session and its snapshot.
    ///
    /// Returns the finished record, or `None` if no session was active.
    pub fn complete_check_in(&mut self) -> Option<FinishedCheckIn> {
        let Some(mut session) = self.session.take() else {
            tracing::debug!("complete_check_in ignored: no active session");
            return None;
        };
        session.commit_drafts();
        Some(self.terminate(session, CheckInStatus::Completed))
    }

    /// Discards draft notes, marks the record abandoned and hands it to
    /// durable storage, then clears the session and its snapshot.
    ///
    /// Action items already on the record are kept.
    pub fn abandon_check_in(&mut self) -> Option<FinishedCheckIn> {
        let Some(mut session) = self.session.take() else {
            tracing::debug!("abandon_check_in ignored: no active session");
            return None;
        };
        session.discard_drafts();
        Some(self.terminate(session, CheckInStatus::Abandoned))
    }

    fn terminate(&mut self, session: CheckInSession, status: CheckInStatus) -> FinishedCheckIn {
        let mut record = session.base_record;
        record.status = status;
        record.completed_at = Some(Utc::now());

        let stored = match self.check_in_repository.save(&record) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Failed to store check-in record {}: {}", record.id, e);
                false
            }
        };
        self.discard_snapshot();

        tracing::info!(
            "Check-in session {} ended as '{}' ({} notes, {} action items)",
            session.id,
            status,
            record.committed_notes.len(),
            record.action_items.len()
        );
        FinishedCheckIn { record, stored }
    }

    // ============================================================================
    // Step navigation
    // ============================================================================

    /// Moves to `target` without completing anything.
    ///
    /// Rejected unless `target` is at most one step ahead of the current step
    /// (and, when moving forward, the current step's guard passes).
    pub fn go_to_step(&mut self, target: CheckInStep) -> bool {
        self.mutate("go_to_step", |session, _| {
            if !can_advance_to(target, session) {
                return None;
            }
            session.progress.current_step = target;
            Some(())
        })
        .is_some()
    }

    /// Marks `step` complete and, if it is the current step, advances to the
    /// next one. This is the normal "continue" action.
    ///
    /// Rejected when `step` lies ahead of the current step or its guard fails
    /// (for example `categorySelection` with no topics selected).
    pub fn complete_step(&mut self, step: CheckInStep) -> bool {
        self.mutate("complete_step", |session, _| {
            let current = session.progress.current_step;
            if step.index() > current.index() {
                return None;
            }
            if step.next().is_some() && !can_proceed(step, session) {
                return None;
            }

            let inserted = session.progress.completed_steps.insert(step);
            let mut advanced = false;
            if step == current {
                if let Some(next) = step.next() {
                    session.progress.current_step = next;
                    advanced = true;
                }
            }
            session.progress.recompute_percentage();
            (inserted || advanced).then_some(())
        })
        .is_some()
    }

    /// Completes the current step.
    pub fn next_step(&mut self) -> bool {
        match self.session.as_ref().map(|s| s.progress.current_step) {
            Some(current) => self.complete_step(current),
            None => false,
        }
    }

    /// Goes back one step.
    pub fn previous_step(&mut self) -> bool {
        match self
            .session
            .as_ref()
            .and_then(|s| s.progress.current_step.previous())
        {
            Some(previous) => self.go_to_step(previous),
            None => false,
        }
    }

    // ============================================================================
    // Category selection and progress
    // ============================================================================

    /// Replaces the selected topics. Only accepted on `welcome` or
    /// `categorySelection`.
    pub fn select_categories(&mut self, categories: Vec<String>) -> bool {
        self.mutate("select_categories", |session, now| {
            if !session.selection_open() {
                return None;
            }
            session.replace_selection(categories, now);
            Some(())
        })
        .is_some()
    }

    /// Adds or removes one topic. Only accepted on `welcome` or
    /// `categorySelection`.
    pub fn toggle_category(&mut self, category_id: &str) -> bool {
        self.mutate("toggle_category", |session, now| {
            if !session.selection_open() {
                return None;
            }
            session.toggle_selection(category_id, now);
            Some(())
        })
        .is_some()
    }

    /// Merges `update` into the progress entry of a selected category.
    pub fn set_category_progress(
        &mut self,
        category_id: &str,
        update: CategoryProgressUpdate,
    ) -> bool {
        self.mutate("set_category_progress", |session, now| {
            session
                .apply_category_progress(category_id, update, now)
                .then_some(())
        })
        .is_some()
    }

    pub fn complete_category(&mut self, category_id: &str) -> bool {
        self.set_category_progress(category_id, CategoryProgressUpdate::completed())
    }

    /// Adds `seconds` to the time spent on a selected category.
    pub fn record_time_spent(&mut self, category_id: &str, seconds: u64) -> bool {
        self.mutate("record_time_spent", |session, now| {
            session.add_time_spent(category_id, seconds, now).then_some(())
        })
        .is_some()
    }

    // ============================================================================
    // Draft notes
    // ============================================================================

    /// Appends a draft note authored by the current user.
    pub fn add_draft_note(
        &mut self,
        content: impl Into<String>,
        privacy: NotePrivacy,
        category_id: Option<String>,
    ) -> Option<Note> {
        let author_id = self.context.current_user_id.clone();
        let content = content.into();
        self.mutate("add_draft_note", |session, now| {
            Some(session.push_draft_note(&author_id, content, privacy, category_id, now))
        })
    }

    pub fn update_draft_note(&mut self, note_id: &str, update: NoteUpdate) -> bool {
        self.mutate("update_draft_note", |session, now| {
            session.apply_note_update(note_id, update, now).then_some(())
        })
        .is_some()
    }

    /// Removes a draft note. Removing an unknown id is a no-op.
    pub fn remove_draft_note(&mut self, note_id: &str) -> bool {
        self.mutate("remove_draft_note", |session, _| {
            session.drop_draft_note(note_id).then_some(())
        })
        .is_some()
    }

    // ============================================================================
    // Action items
    // ============================================================================

    /// Creates an action item on the base record. It is written with the
    /// snapshot right away and survives an abandoned check-in.
    pub fn add_action_item(
        &mut self,
        title: impl Into<String>,
        priority: Priority,
        assigned_to: Option<String>,
    ) -> Option<ActionItem> {
        let title = title.into();
        self.mutate("add_action_item", |session, now| {
            Some(session.push_action_item(title, priority, assigned_to, now))
        })
    }

    pub fn update_action_item(&mut self, item_id: &str, update: ActionItemUpdate) -> bool {
        self.mutate("update_action_item", |session, _| {
            session.apply_action_item_update(item_id, update).then_some(())
        })
        .is_some()
    }

    pub fn remove_action_item(&mut self, item_id: &str) -> bool {
        self.mutate("remove_action_item", |session, _| {
            session.drop_action_item(item_id).then_some(())
        })
        .is_some()
    }

    pub fn toggle_action_item(&mut self, item_id: &str) -> bool {
        self.mutate("toggle_action_item", |session, now| {
            session.flip_action_item(item_id, now).then_some(())
        })
        .is_some()
    }

    // ============================================================================
    // Internals
    // ============================================================================

    /// Applies `op` to the active session.
    ///
    /// `op` returns `None` to reject, and must not have touched the session
    /// in that case. An applied op bumps `last_saved_at` and writes a snapshot.
    fn mutate<R>(
        &mut self,
        name: &str,
        op: impl FnOnce(&mut CheckInSession, DateTime<Utc>) -> Option<R>,
    ) -> Option<R> {
        let Some(session) = self.session.as_mut() else {
            tracing::debug!("{} ignored: no active session", name);
            return None;
        };

        let now = Utc::now();
        let Some(result) = op(session, now) else {
            tracing::debug!(
                "{} rejected at step '{}'",
                name,
                session.progress.current_step
            );
            return None;
        };

        session.touch(now);
        self.write_snapshot();
        Some(result)
    }

    fn write_snapshot(&self) {
        if let Some(session) = self.session.as_ref() {
            save_snapshot(self.snapshot_repository.as_ref(), session);
        }
    }

    fn discard_snapshot(&self) {
        if let Err(e) = self.snapshot_repository.clear() {
            tracing::warn!("Failed to clear check-in snapshot: {}", e);
        }
    }
}

fn save_snapshot(repository: &dyn SessionSnapshotRepository, session: &CheckInSession) {
    match repository.save(session) {
        Ok(()) => tracing::debug!(
            "Saved snapshot of session {} at step '{}'",
            session.id,
            session.progress.current_step
        ),
        Err(e) => tracing::warn!(
            "Failed to save snapshot of session {}, keeping in-memory state: {}",
            session.id,
            e
        ),
    }
}
