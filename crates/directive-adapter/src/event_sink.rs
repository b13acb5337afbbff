//! Event sinks - where drained domain events end up

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use directive_domain::{DirectiveEvent, EventSink};
use tracing::debug;

/// Collects events in memory; clones share the same buffer
///
/// A panic in another holder of the buffer does not lose events: the
/// guard is recovered from the poisoned lock.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEventSink {
    events: Arc<RwLock<Vec<DirectiveEvent>>>,
}

impl InMemoryEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<DirectiveEvent>> {
        self.events.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<DirectiveEvent>> {
        self.events.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Everything recorded so far, oldest first
    pub fn events(&self) -> Vec<DirectiveEvent> {
        self.read().clone()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.write().clear();
    }
}

impl EventSink for InMemoryEventSink {
    fn record(&mut self, event: DirectiveEvent) {
        self.write().push(event);
    }
}

/// Writes each event as a JSON payload to the tracing subscriber
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn record(&mut self, event: DirectiveEvent) {
        let payload = serde_json::to_string(&event).unwrap_or_default();
        debug!(
            target: "directive::events",
            event = event.name(),
            directive_id = %event.directive_id(),
            payload = %payload,
            "event published"
        );
    }
}
