//! Timeline - append-only audit log
//!
//! Every action attempt gets an entry with `result = None` *before* the
//! resolver call starts, so an observer can always distinguish "in flight"
//! from "not yet started". Entries are never mutated afterwards except to
//! fill in the result for the matching id, exactly once.

use crate::pantry::Ingredient;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::RwLock;

/// Outcome of a resolved attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AttemptResult {
    /// The combination produced an ingredient
    Produced(Ingredient),
    /// The combination failed (sentinel error marker)
    Failed,
}

/// A single timeline record: either free-text narration or an action attempt
#[derive(Debug, Clone, Serialize)]
pub struct TimelineEntry {
    /// Monotonic entry id
    pub id: u64,
    /// Creation time
    pub timestamp: DateTime<Utc>,
    /// Narration text (standalone, or attached to an attempt)
    pub text: Option<String>,
    /// Action name for attempt entries
    pub action: Option<String>,
    /// Validated ingredient names, in request order
    pub ingredients: Vec<String>,
    /// `None` while the attempt is outstanding
    pub result: Option<AttemptResult>,
}

impl TimelineEntry {
    /// Whether this entry is an unresolved attempt
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.action.is_some() && self.result.is_none()
    }
}

#[derive(Debug, Default)]
struct TimelineInner {
    entries: Vec<TimelineEntry>,
    next_id: u64,
}

/// Append-only record of every action attempt and narration
#[derive(Debug, Default)]
pub struct Timeline {
    inner: RwLock<TimelineInner>,
}

impl Timeline {
    /// Create an empty timeline
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a free-text narration entry
    pub fn narrate(&self, text: impl Into<String>) -> u64 {
        let mut inner = self.inner.write().expect("timeline lock poisoned");
        let id = inner.next_id;
        inner.next_id += 1;
        inner.entries.push(TimelineEntry {
            id,
            timestamp: Utc::now(),
            text: Some(text.into()),
            action: None,
            ingredients: Vec::new(),
            result: None,
        });
        id
    }

    /// Append a pending attempt entry (`result = None`).
    ///
    /// Must be called before the resolver is invoked.
    pub fn begin_attempt(
        &self,
        action: impl Into<String>,
        ingredients: Vec<String>,
        text: Option<String>,
    ) -> u64 {
        let mut inner = self.inner.write().expect("timeline lock poisoned");
        let id = inner.next_id;
        inner.next_id += 1;
        inner.entries.push(TimelineEntry {
            id,
            timestamp: Utc::now(),
            text,
            action: Some(action.into()),
            ingredients,
            result: None,
        });
        id
    }

    /// Fill in the result for a pending attempt.
    ///
    /// Returns `false` if the id is unknown or the entry was already
    /// resolved; an entry's result is only ever written once.
    pub fn resolve(&self, id: u64, result: AttemptResult) -> bool {
        let mut inner = self.inner.write().expect("timeline lock poisoned");
        match inner.entries.iter_mut().find(|e| e.id == id) {
            Some(entry) if entry.is_pending() => {
                entry.result = Some(result);
                true
            }
            _ => false,
        }
    }

    /// Whether any attempt is still outstanding
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.inner
            .read()
            .expect("timeline lock poisoned")
            .entries
            .iter()
            .any(TimelineEntry::is_pending)
    }

    /// Snapshot of all entries in append order
    #[must_use]
    pub fn snapshot(&self) -> Vec<TimelineEntry> {
        self.inner
            .read()
            .expect("timeline lock poisoned")
            .entries
            .clone()
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().expect("timeline lock poisoned").entries.len()
    }

    /// Whether the timeline is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
