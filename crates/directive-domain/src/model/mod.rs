//! Domain Models - The vocabulary of the directive store
//!
//! These types represent the "Ubiquitous Language" of directives.
//! Every name here should match how we talk about the system.

pub mod directive;
pub mod event;
pub mod example;
pub mod ids;
pub mod lifecycle;
pub mod snapshot;
pub mod step;
pub mod workflow_shape;
