//! In-memory view of one subscription's collection. Mutations are applied only after
//! the server confirmed them, so the view never runs ahead of the API.

use crate::api::{FeatureFlag, Setting, Subscription};
use std::fmt::{self, Write};

pub const NO_FEATURE_FLAGS: &str = "No feature flags configured";
pub const NO_SETTINGS: &str = "No settings configured";

/// Entities addressed by a server-assigned id.
pub trait Identified {
    fn id(&self) -> &str;
}

impl Identified for FeatureFlag {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Identified for Setting {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection<T> {
    items: Vec<T>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Identified> Collection<T> {
    #[must_use]
    pub fn new(items: Vec<T>) -> Self {
        Self { items }
    }

    pub fn insert(&mut self, item: T) {
        self.items.push(item);
    }

    /// Swap in the entity the server returned from an update.
    /// Returns `false` when the id is not in the view.
    pub fn apply_update(&mut self, item: T) -> bool {
        match self.items.iter_mut().find(|current| current.id() == item.id()) {
            Some(current) => {
                *current = item;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<T> {
        let index = self.items.iter().position(|item| item.id() == id)?;
        Some(self.items.remove(index))
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl fmt::Display for FeatureFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.enabled { "on" } else { "off" };
        write!(f, "{:<12} {:<4} {}", self.id, state, self.name)?;
        if let Some(description) = &self.description {
            write!(f, " - {description}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Setting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<12} {}={}", self.id, self.key, self.value)?;
        if let Some(description) = &self.description {
            write!(f, " - {description}")?;
        }
        Ok(())
    }
}

/// One line per item, or `empty` when there is nothing to show.
#[must_use]
pub fn render<T: fmt::Display>(items: impl IntoIterator<Item = T>, empty: &str) -> String {
    let mut out = String::new();
    for item in items {
        // writing to a String cannot fail
        let _ = writeln!(out, "{item}");
    }
    if out.is_empty() {
        out.push_str(empty);
        out.push('\n');
    }
    out
}

#[must_use]
pub fn render_subscription(subscription: &Subscription) -> String {
    format!(
        "{} {} ({})\n\nFeature flags\n{}\nSettings\n{}",
        subscription.id,
        subscription.name,
        subscription.status,
        render(&subscription.feature_flags, NO_FEATURE_FLAGS),
        render(&subscription.settings, NO_SETTINGS),
    )
}
