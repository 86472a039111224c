//! Read-only lookups the check-in flow consumes.

use super::model::{Category, Partner};
use crate::config::AppConfig;

/// Source of discussable topics.
pub trait CategoryCatalog: Send + Sync {
    /// All topics, in display order.
    fn categories(&self) -> &[Category];

    fn find(&self, category_id: &str) -> Option<&Category> {
        self.categories().iter().find(|c| c.id == category_id)
    }

    /// Ids from `category_ids` that the catalog does not know.
    fn unknown_ids<'a>(&self, category_ids: &'a [String]) -> Vec<&'a str> {
        category_ids
            .iter()
            .filter(|id| self.find(id).is_none())
            .map(String::as_str)
            .collect()
    }
}

/// Source of partner identities.
pub trait PartnerDirectory: Send + Sync {
    fn partners(&self) -> &[Partner];

    fn find(&self, partner_id: &str) -> Option<&Partner> {
        self.partners().iter().find(|p| p.id == partner_id)
    }
}

/// Partner directory backed by the `[[partners]]` config table.
#[derive(Debug, Clone, Default)]
pub struct ConfigPartnerDirectory {
    partners: Vec<Partner>,
}

impl ConfigPartnerDirectory {
    pub fn new(partners: Vec<Partner>) -> Self {
        Self { partners }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.partners.clone())
    }
}

impl PartnerDirectory for ConfigPartnerDirectory {
    fn partners(&self) -> &[Partner] {
        &self.partners
    }
}
