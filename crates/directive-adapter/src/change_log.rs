//! ChangeLog - Bounded history of directive updates
//!
//! Receives one `ChangeRecord` per successful `update` and keeps the most
//! recent `capacity` of them. Older entries fall off the front.

use std::collections::{BTreeSet, VecDeque};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use directive_domain::DirectiveId;
use directive_usecase::{ChangeRecord, ChangeRecorder};

/// In-memory change log; clones share the same history
#[derive(Debug, Clone)]
pub struct InMemoryChangeLog {
    entries: Arc<RwLock<VecDeque<ChangeRecord>>>,
    capacity: usize,
}

impl InMemoryChangeLog {
    /// Create a log holding at most `capacity` entries (minimum 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: Arc::new(RwLock::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    // A poisoned lock still guards a consistent deque; keep using it
    fn read(&self) -> RwLockReadGuard<'_, VecDeque<ChangeRecord>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, VecDeque<ChangeRecord>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Most recent entries first
    pub fn get_recent(&self, limit: usize) -> Vec<ChangeRecord> {
        self.read().iter().rev().take(limit).cloned().collect()
    }

    /// Every retained change of one directive, oldest first
    pub fn history(&self, id: &DirectiveId) -> Vec<ChangeRecord> {
        self.read()
            .iter()
            .filter(|e| e.directive_id() == id)
            .cloned()
            .collect()
    }

    pub fn stats(&self) -> ChangeLogStats {
        let entries = self.read();
        ChangeLogStats {
            total_entries: entries.len(),
            directives: entries
                .iter()
                .map(|e| e.directive_id())
                .collect::<BTreeSet<_>>()
                .len(),
        }
    }

    /// Export as JSON
    pub fn export_json(&self) -> serde_json::Value {
        serde_json::to_value(&*self.read()).unwrap_or_default()
    }
}

impl Default for InMemoryChangeLog {
    fn default() -> Self {
        Self::new(1000)
    }
}

impl ChangeRecorder for InMemoryChangeLog {
    fn record(&mut self, change: ChangeRecord) {
        let mut entries = self.write();
        if entries.len() >= self.capacity {
            entries.pop_front();
        }
        entries.push_back(change);
    }
}

/// Change log statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChangeLogStats {
    pub total_entries: usize,
    /// Distinct directives among the retained entries
    pub directives: usize,
}
