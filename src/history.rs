//! ==============================================================================
//! history.rs - bounded rolling history of readings
//! ==============================================================================
//!
//! purpose:
//!     keeps the most recent reading sets for the time-series chart.
//!     strict FIFO: once full, each append evicts exactly the oldest entry.
//!
//! relationships:
//!     - used by: runtime.rs (append on every tick)
//!     - used by: view.rs (history panel)
//!
//! ==============================================================================

use crate::domain::{HistoryEntry, Metric};
use std::collections::VecDeque;

/// default number of entries kept (one minute at a 2s tick)
pub const DEFAULT_CAPACITY: usize = 30;

/// hard upper bound on entries kept
pub const MAX_CAPACITY: usize = DEFAULT_CAPACITY;

#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl HistoryBuffer {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// capacity is clamped into 1..=MAX_CAPACITY
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.clamp(1, MAX_CAPACITY);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// append an entry, evicting the oldest if over capacity
    pub fn append(&mut self, entry: HistoryEntry) {
        self.entries.push_back(entry);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    /// entries oldest-to-newest
    pub fn snapshot(&self) -> Vec<HistoryEntry> {
        self.entries.iter().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.back()
    }

    /// one metric's values oldest-to-newest
    pub fn series(&self, metric: Metric) -> Vec<f64> {
        self.entries.iter().map(|e| e.readings.get(metric)).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for HistoryBuffer {
    fn default() -> Self {
        Self::new()
    }
}
