//! Id generators for steps and examples

use std::sync::atomic::{AtomicU64, Ordering};

use directive_domain::{ExampleId, IdGenerator, StepId};
use uuid::Uuid;

/// Random v4 UUIDs - the production generator
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn step_id(&self) -> StepId {
        StepId::new(Uuid::new_v4().to_string())
    }

    fn example_id(&self) -> ExampleId {
        ExampleId::new(Uuid::new_v4().to_string())
    }
}

/// Predictable ids (`step-1`, `example-2`, ...) for tests and demos
///
/// One counter is shared by both kinds, so ids stay unique across them.
#[derive(Debug, Default)]
pub struct SequentialIdGenerator {
    next: AtomicU64,
}

impl SequentialIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    fn next(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed) + 1
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn step_id(&self) -> StepId {
        StepId::new(format!("step-{}", self.next()))
    }

    fn example_id(&self) -> ExampleId {
        ExampleId::new(format!("example-{}", self.next()))
    }
}
