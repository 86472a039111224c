//! Catalog domain models.

use serde::{Deserialize, Serialize};

/// A discussable topic offered during `categorySelection`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Stable identifier referenced by sessions (e.g. "communication")
    pub id: String,
    /// Display name
    pub name: String,
    /// Emoji or icon name
    pub icon: String,
    /// Conversation prompts shown while discussing this topic
    #[serde(default)]
    pub prompts: Vec<String>,
}

/// A partner who can be assigned action items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Partner {
    pub id: String,
    pub name: String,
}
