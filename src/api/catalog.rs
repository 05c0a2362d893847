//! Subscriptions the console knows about. The API has no endpoint listing
//! subscriptions or returning their metadata, so names and statuses come from here.

use super::models::SubscriptionStatus;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionSummary {
    pub id: String,
    pub name: String,
    pub status: SubscriptionStatus,
}

impl SubscriptionSummary {
    #[must_use]
    pub fn new(id: &str, name: &str, status: SubscriptionStatus) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            status,
        }
    }

    /// Stand-in for an id the catalog does not know.
    #[must_use]
    pub fn placeholder(id: &str) -> Self {
        Self::new(id, &format!("Subscription {id}"), SubscriptionStatus::Active)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<SubscriptionSummary>,
}

impl Catalog {
    #[must_use]
    pub fn new(entries: Vec<SubscriptionSummary>) -> Self {
        Self { entries }
    }

    /// The plans every deployment starts with.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(vec![
            SubscriptionSummary::new("sub-001", "Premium Plan", SubscriptionStatus::Active),
            SubscriptionSummary::new("sub-002", "Basic Plan", SubscriptionStatus::Active),
            SubscriptionSummary::new("sub-003", "Enterprise Plan", SubscriptionStatus::Inactive),
        ])
    }

    #[must_use]
    pub fn entries(&self) -> &[SubscriptionSummary] {
        &self.entries
    }

    #[must_use]
    pub fn find(&self, id: &str) -> Option<&SubscriptionSummary> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Known entry for `id`, or a placeholder.
    #[must_use]
    pub fn summary(&self, id: &str) -> SubscriptionSummary {
        self.find(id)
            .cloned()
            .unwrap_or_else(|| SubscriptionSummary::placeholder(id))
    }
}
