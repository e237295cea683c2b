//! Pantry - deduplicated ingredient inventory
//!
//! Insertion-ordered catalog with a canonical-key index alongside it.
//! Ingredients are never deleted; the catalog only grows. Insertion is a
//! single atomic compare-and-insert keyed by canonical name so racing
//! actors (planner loop, manual UI) cannot create duplicates.

use crate::normalizer::normalize;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;

/// A named, emoji-tagged item in the shared catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    /// Display name
    pub name: String,
    /// Emoji tag
    pub emoji: String,
}

impl Ingredient {
    /// Create a new ingredient
    #[must_use]
    pub fn new(name: impl Into<String>, emoji: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            emoji: emoji.into(),
        }
    }
}

#[derive(Debug, Default)]
struct PantryInner {
    items: Vec<Ingredient>,
    index: HashMap<String, usize>,
}

/// Mutable ingredient inventory
#[derive(Debug, Default)]
pub struct Pantry {
    inner: RwLock<PantryInner>,
}

impl Pantry {
    /// Create an empty pantry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a pantry pre-populated with seed ingredients
    #[must_use]
    pub fn with_seed(seed: Vec<Ingredient>) -> Self {
        let pantry = Self::new();
        for ingredient in seed {
            pantry.insert(ingredient);
        }
        pantry
    }

    /// Insert an ingredient, deduplicated by canonical name.
    ///
    /// Returns `true` if the ingredient was added, `false` if an entry with
    /// the same canonical key already exists (the first-seen entry is kept).
    pub fn insert(&self, ingredient: Ingredient) -> bool {
        let key = normalize(&ingredient.name);
        let mut inner = self.inner.write().expect("pantry lock poisoned");
        if inner.index.contains_key(&key) {
            return false;
        }
        let slot = inner.items.len();
        inner.items.push(ingredient);
        inner.index.insert(key, slot);
        true
    }

    /// Look up an ingredient by any spelling of its name
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<Ingredient> {
        let key = normalize(name);
        let inner = self.inner.read().expect("pantry lock poisoned");
        inner.index.get(&key).map(|&slot| inner.items[slot].clone())
    }

    /// Whether an ingredient with this canonical name exists
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        let key = normalize(name);
        let inner = self.inner.read().expect("pantry lock poisoned");
        inner.index.contains_key(&key)
    }

    /// Resolve a requested ingredient list against the pantry.
    ///
    /// Keeps only names that exist, deduplicates by canonical key, and
    /// preserves first-seen request order. The dispatcher's validation
    /// filter: an empty return for a nonempty request means the call must
    /// fail before any state is touched.
    #[must_use]
    pub fn resolve_all(&self, names: &[String]) -> Vec<Ingredient> {
        let inner = self.inner.read().expect("pantry lock poisoned");
        let mut seen = std::collections::HashSet::new();
        let mut resolved = Vec::new();
        for name in names {
            let key = normalize(name);
            if !seen.insert(key.clone()) {
                continue;
            }
            if let Some(&slot) = inner.index.get(&key) {
                resolved.push(inner.items[slot].clone());
            }
        }
        resolved
    }

    /// Snapshot of the catalog in insertion order
    #[must_use]
    pub fn snapshot(&self) -> Vec<Ingredient> {
        self.inner.read().expect("pantry lock poisoned").items.clone()
    }

    /// Number of distinct ingredients
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().expect("pantry lock poisoned").items.len()
    }

    /// Whether the pantry is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Starter pantry for the South Indian kitchen
#[must_use]
pub fn seed() -> Vec<Ingredient> {
    vec![
        Ingredient::new("Ponni Rice", "🍚"),
        Ingredient::new("Urad Dal", "🫘"),
        Ingredient::new("Toor Dal", "🟡"),
        Ingredient::new("Curry Leaves", "🌿"),
        Ingredient::new("Mustard Seeds", "⚫"),
        Ingredient::new("Coconut", "🥥"),
        Ingredient::new("Tamarind", "🟤"),
        Ingredient::new("Green Chilli", "🌶️"),
        Ingredient::new("Ginger", "🫚"),
        Ingredient::new("Coffee Beans", "☕"),
        Ingredient::new("Milk", "🥛"),
        Ingredient::new("Jaggery", "🧈"),
    ]
}
