//! Check-in session domain module.
//!
//! This module contains the session engine: the aggregate and its value
//! types, the step sequencer, and the lifecycle controller that owns and
//! persists the active session.
//!
//! # Module Structure
//!
//! - `model`: Session aggregate and value types (`CheckInSession`, `CheckIn`, `Note`, ...)
//! - `step`: Fixed step graph and transition guards (`CheckInStep`)
//! - `progress`: Per-category progress tracking (`CategoryProgressUpdate`)
//! - `notes`: Draft note buffer (`NoteUpdate`)
//! - `action_items`: Action item ledger (`ActionItemUpdate`)
//! - `repository`: Storage traits consumed by the engine
//! - `engine`: Session lifecycle controller (`CheckInEngine`)
//!
//! # Usage
//!
//! ```ignore
//! use checkin_core::checkin::{CheckInEngine, EngineContext, CheckInStep, NotePrivacy};
//!
//! let mut engine = CheckInEngine::open(context, snapshots, records);
//! if !engine.has_active_session() {
//!     engine.start_check_in(vec!["communication".into()]);
//! }
//! engine.complete_step(CheckInStep::Welcome);
//! engine.add_draft_note("We want more date nights", NotePrivacy::Shared, None);
//! engine.complete_check_in();
//! ```

mod action_items;
mod engine;
mod model;
mod notes;
mod progress;
mod repository;
mod step;


// Re-export public API
pub use action_items::ActionItemUpdate;
pub use engine::{CheckInEngine, EngineContext, FinishedCheckIn};
pub use model::{
    ActionItem, CategoryProgress, CheckIn, CheckInSession, CheckInStatus, Note, NotePrivacy,
    Priority, SessionProgress,
};
pub use notes::NoteUpdate;
pub use progress::CategoryProgressUpdate;
pub use repository::{CheckInRepository, SessionSnapshotRepository};
pub use step::{CheckInStep, can_advance_to, can_proceed};
