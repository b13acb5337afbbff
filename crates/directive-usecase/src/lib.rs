//! # Directive Use Case Layer
//!
//! Application-specific business rules.
//! Each command runs the same cycle against the domain:
//!
//! ```text
//! load ──▶ mutate aggregate ──▶ conditional save ──▶ drain events
//!                 │
//!                 └── update(): snapshot ──▶ ChangeRecorder
//! ```

pub mod change;
pub mod command;
pub mod error;
pub mod service;

pub use directive_domain;

pub use change::{ChangeRecord, ChangeRecorder};
pub use command::{
    AddExample, CreateStep, DraftDirective, MoveStepAfter, UpdateDirective, UpdateExample,
    UpdateMetadata, UpdateStep,
};
pub use error::CommandError;
pub use service::DirectiveService;
