//! Built-in discussion topics.

use super::directory::CategoryCatalog;
use super::model::Category;

/// (id, name, icon, prompts)
const BUILTIN_CATEGORIES: &[(&str, &str, &str, &[&str])] = &[
    (
        "communication",
        "Communication",
        "💬",
        &[
            "When did you feel most heard this week?",
            "Is there anything you have been holding back?",
        ],
    ),
    (
        "quality-time",
        "Quality Time",
        "⏰",
        &[
            "What was your favorite moment together recently?",
            "What would you like to do together next week?",
        ],
    ),
    (
        "future-plans",
        "Future Plans",
        "🎯",
        &[
            "What are you looking forward to this year?",
            "Which goal should we focus on next?",
        ],
    ),
    (
        "finances",
        "Finances",
        "💰",
        &[
            "How do you feel about our spending lately?",
            "Is there a purchase we should plan for?",
        ],
    ),
    (
        "intimacy",
        "Intimacy",
        "❤️",
        &[
            "When did you feel closest to me recently?",
            "What would make you feel more connected?",
        ],
    ),
    (
        "household",
        "Household",
        "🏠",
        &[
            "Does the split of chores feel fair right now?",
            "What is one thing at home we could improve?",
        ],
    ),
    (
        "gratitude",
        "Gratitude",
        "🙏",
        &[
            "What is something I did that you appreciated?",
            "What are you grateful for in our relationship?",
        ],
    ),
];

/// The default topic catalog shipped with the app.
#[derive(Debug, Clone)]
pub struct BuiltinCatalog {
    categories: Vec<Category>,
}

impl BuiltinCatalog {
    pub fn new() -> Self {
        let categories = BUILTIN_CATEGORIES
            .iter()
            .map(|(id, name, icon, prompts)| Category {
                id: (*id).to_string(),
                name: (*name).to_string(),
                icon: (*icon).to_string(),
                prompts: prompts.iter().map(|p| (*p).to_string()).collect(),
            })
            .collect();
        Self { categories }
    }
}

impl Default for BuiltinCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl CategoryCatalog for BuiltinCatalog {
    fn categories(&self) -> &[Category] {
        &self.categories
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_builtin_ids_are_unique_and_prompted() {
        let catalog = BuiltinCatalog::new();
        let ids: HashSet<_> = catalog.categories().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids.len(), catalog.categories().len());
        assert!(catalog.categories().iter().all(|c| !c.prompts.is_empty()));
    }

    #[test]
    fn test_unknown_ids() {
        let catalog = BuiltinCatalog::new();
        let requested = vec!["finances".to_string(), "astrology".to_string()];
        assert_eq!(catalog.unknown_ids(&requested), vec!["astrology"]);
        assert_eq!(catalog.find("gratitude").unwrap().name, "Gratitude");
    }
}
