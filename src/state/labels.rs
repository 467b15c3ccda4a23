//! Label store: label key → category.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{Category, LabelAction};

/// Mapping from label key to the chosen category.
///
/// Only real categories are ever stored; a discard removes the entry.
/// Keys are kept sorted so serialized output is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelStore {
    labels: BTreeMap<String, Category>,
}

impl LabelStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a label action to a key.
    ///
    /// Returns `true` if the store changed.
    pub fn set(&mut self, key: &str, action: LabelAction) -> bool {
        match action {
            LabelAction::Label(category) => {
                self.labels.insert(key.to_string(), category) != Some(category)
            }
            LabelAction::Discard => self.labels.remove(key).is_some(),
        }
    }

    /// The stored category, or `None` when unset.
    pub fn get(&self, key: &str) -> Option<Category> {
        self.labels.get(key).copied()
    }

    /// Number of keys mapped to a category.
    pub fn count(&self) -> usize {
        self.labels.len()
    }

    /// Whether no labels are stored.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Iterate over `(key, category)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Category)> + '_ {
        self.labels.iter().map(|(k, c)| (k.as_str(), *c))
    }

    /// Number of stored labels per category, in class-index order.
    pub fn tally(&self) -> [(Category, usize); 3] {
        Category::ALL.map(|category| {
            let n = self.labels.values().filter(|c| **c == category).count();
            (category, n)
        })
    }

    /// Remove every label.
    pub fn clear(&mut self) {
        self.labels.clear();
    }
}
