//! # Directive Domain Layer
//!
//! The heart of the directive store - the aggregate that Rules, Skills and
//! Workflows share, with no I/O of its own.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Domain Layer (This Crate)                     │
//! │  ┌─────────────────────────────────────────────────────────────┐│
//! │  │  model/     - Directive aggregate & Value Objects           ││
//! │  │  repository/- Persistence port (not implementations)        ││
//! │  │  port/      - Clock, id generation, event sink              ││
//! │  └─────────────────────────────────────────────────────────────┘│
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## The Golden Rule
//!
//! **Operations either fully apply and record one event, or fail and
//! change nothing.** Concurrency is the caller's concern: the only guard
//! here is the optimistic version check.

pub mod error;
pub mod model;
pub mod port;
pub mod repository;

// Re-export commonly used types
pub use error::DirectiveError;

pub use model::{
    directive::{Directive, DirectiveBody, DirectiveChanges, DirectiveKind},
    event::DirectiveEvent,
    example::{Example, ExampleContent},
    ids::{DirectiveId, ExampleId, StepId},
    lifecycle::{DirectiveState, Lifecycle},
    snapshot::{ChangeSnapshot, ChangedField},
    step::{Step, StepCollection},
    workflow_shape::{
        ChecklistWorkflow, HybridWorkflow, SequentialWorkflow, StepType, Template,
        TemplateWorkflow, WorkflowShape, WorkflowStep,
    },
};

pub use port::{Clock, EventSink, IdGenerator};

pub use repository::directive_repository::{DirectiveFilter, DirectiveRepository, RepositoryError};
