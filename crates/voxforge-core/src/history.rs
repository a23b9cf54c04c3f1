//! Bounded, most-recent-first log of completed synthesis jobs.
//!
//! The log is fed only from controller completions ([`HistoryLog::record`])
//! and lives for the session that owns it.

use std::collections::VecDeque;

use crate::domain::{ResultId, SynthesisResult};
use crate::events::SynthesisEvent;

/// Default number of retained entries.
pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

/// Ordered record of completed jobs, newest at index 0.
#[derive(Debug, Clone)]
pub struct HistoryLog {
    entries: VecDeque<SynthesisResult>,
    capacity: usize,
}

impl HistoryLog {
    /// Create a log with the default bound.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    /// Create a log retaining at most `capacity` entries (minimum 1).
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Insert `result` at the head, evicting the oldest entries past the bound.
    pub fn append(&mut self, result: SynthesisResult) {
        self.entries.push_front(result);
        while self.entries.len() > self.capacity {
            if let Some(evicted) = self.entries.pop_back() {
                tracing::debug!(id = %evicted.id, "Evicted oldest history entry");
            }
        }
    }

    /// Append the result carried by a completion event.
    ///
    /// Returns `true` if the event was a completion and was recorded.
    pub fn record(&mut self, event: &SynthesisEvent) -> bool {
        match event {
            SynthesisEvent::Completed { result, .. } => {
                self.append(result.clone());
                true
            }
            _ => false,
        }
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Iterate over the entries, most recent first.
    ///
    /// Each call starts a fresh pass over the current contents.
    pub fn list(&self) -> impl ExactSizeIterator<Item = &SynthesisResult> + '_ {
        self.entries.iter()
    }

    /// Owned copy of the entries, most recent first.
    #[must_use]
    pub fn snapshot(&self) -> Vec<SynthesisResult> {
        self.entries.iter().cloned().collect()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&SynthesisResult> {
        self.entries.get(index)
    }

    #[must_use]
    pub fn find(&self, id: ResultId) -> Option<&SynthesisResult> {
        self.entries.iter().find(|r| r.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for HistoryLog {
    fn default() -> Self {
        Self::new()
    }
}
