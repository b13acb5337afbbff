//! Ports - Everything else the core asks of its surroundings
//!
//! Time, identifier generation and event recording are injected so the
//! aggregate stays deterministic under test.

use chrono::{DateTime, Utc};

use crate::model::event::DirectiveEvent;
use crate::model::ids::{ExampleId, StepId};

/// Source of "now"
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Source of globally unique ids for child entities
pub trait IdGenerator: Send + Sync {
    fn step_id(&self) -> StepId;
    fn example_id(&self) -> ExampleId;
}

/// Where drained domain events go
pub trait EventSink: Send + Sync {
    fn record(&mut self, event: DirectiveEvent);
}
