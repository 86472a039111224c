//! Step sequencer.
//!
//! The check-in conversation walks a fixed, linear step graph:
//!
//! ```text
//! welcome → categorySelection → categoryDiscussion → reflection → actionItems → completion
//! ```
//!
//! Backward jumps to any earlier step are always legal. Forward movement is
//! limited to the immediate next step, and leaving a step additionally
//! requires that step's guard ([`can_proceed`]) to pass.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use super::model::CheckInSession;

/// One step of the guided check-in conversation.
///
/// Declaration order is the traversal order; `Ord` follows it, so a
/// `BTreeSet<CheckInStep>` iterates in step order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum CheckInStep {
    Welcome,
    CategorySelection,
    CategoryDiscussion,
    Reflection,
    ActionItems,
    Completion,
}

impl CheckInStep {
    /// All steps in traversal order.
    pub const ALL: [CheckInStep; 6] = [
        CheckInStep::Welcome,
        CheckInStep::CategorySelection,
        CheckInStep::CategoryDiscussion,
        CheckInStep::Reflection,
        CheckInStep::ActionItems,
        CheckInStep::Completion,
    ];

    /// Number of steps in the graph.
    pub const COUNT: usize = Self::ALL.len();

    /// Zero-based position of this step in the graph.
    pub fn index(self) -> usize {
        // ALL mirrors the declaration order.
        self as usize
    }

    /// Returns the following step, or `None` for `Completion`.
    pub fn next(self) -> Option<CheckInStep> {
        Self::ALL.get(self.index() + 1).copied()
    }

    /// Returns the prior step, or `None` for `Welcome`.
    pub fn previous(self) -> Option<CheckInStep> {
        self.index().checked_sub(1).map(|i| Self::ALL[i])
    }

    /// Whether this is the terminal step.
    pub fn is_terminal(self) -> bool {
        self == CheckInStep::Completion
    }

    /// Short human-readable title for display surfaces.
    pub fn title(self) -> &'static str {
        match self {
            CheckInStep::Welcome => "Welcome",
            CheckInStep::CategorySelection => "Choose topics",
            CheckInStep::CategoryDiscussion => "Discuss",
            CheckInStep::Reflection => "Reflect",
            CheckInStep::ActionItems => "Action items",
            CheckInStep::Completion => "Done",
        }
    }
}

/// Whether the session may leave `step` in the forward direction.
///
/// Only `categorySelection` has a blocking precondition (at least one topic
/// selected). `completion` has no next step, so it can never proceed.
pub fn can_proceed(step: CheckInStep, session: &CheckInSession) -> bool {
    match step {
        CheckInStep::CategorySelection => !session.selected_categories.is_empty(),
        CheckInStep::Completion => false,
        CheckInStep::Welcome
        | CheckInStep::CategoryDiscussion
        | CheckInStep::Reflection
        | CheckInStep::ActionItems => true,
    }
}

/// Whether `target` is reachable from the session's current step.
///
/// A step is reachable when `index(target) <= index(current) + 1`. Moving
/// forward to the immediate next step also requires the current step's
/// guard to pass, so a session can never leave `categorySelection` with no
/// topics selected.
pub fn can_advance_to(target: CheckInStep, session: &CheckInSession) -> bool {
    let current = session.progress.current_step;
    if target.index() > current.index() + 1 {
        return false;
    }
    if target.index() == current.index() + 1 {
        return can_proceed(current, session);
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_next_and_previous_walk_the_graph() {
        assert_eq!(
            CheckInStep::Welcome.next(),
            Some(CheckInStep::CategorySelection)
        );
        assert_eq!(
            CheckInStep::ActionItems.next(),
            Some(CheckInStep::Completion)
        );
        assert_eq!(CheckInStep::Completion.next(), None);

        assert_eq!(CheckInStep::Welcome.previous(), None);
        assert_eq!(
            CheckInStep::Reflection.previous(),
            Some(CheckInStep::CategoryDiscussion)
        );
    }

    #[test]
    fn test_index_matches_all_order() {
        for (i, step) in CheckInStep::ALL.iter().enumerate() {
            assert_eq!(step.index(), i);
        }
        assert_eq!(CheckInStep::COUNT, 6);
    }

    #[test]
    fn test_wire_names_are_camel_case() {
        assert_eq!(
            serde_json::to_string(&CheckInStep::CategorySelection).unwrap(),
            "\"categorySelection\""
        );
        assert_eq!(CheckInStep::ActionItems.to_string(), "actionItems");
        assert_eq!(
            CheckInStep::from_str("categoryDiscussion").unwrap(),
            CheckInStep::CategoryDiscussion
        );
        assert!(CheckInStep::from_str("lobby").is_err());
    }
}
