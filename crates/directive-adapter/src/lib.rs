//! # Directive Adapter Layer
//!
//! Concrete implementations of the ports declared by `directive-domain`
//! and `directive-usecase` (Hexagonal Architecture adapters).
//!
//! ## Structure
//!
//! - `repository/` - Persistence implementations (in-memory, JSON file)
//! - `clock` - System and fixed clocks
//! - `id_generator` - UUID and sequential id generators
//! - `event_sink` - In-memory and tracing event sinks
//! - `change_log` - Bounded in-memory change history

pub mod change_log;
pub mod clock;
pub mod error;
pub mod event_sink;
pub mod id_generator;
pub mod repository;

pub use change_log::{ChangeLogStats, InMemoryChangeLog};
pub use clock::{FixedClock, SystemClock};
pub use error::AdapterError;
pub use event_sink::{InMemoryEventSink, TracingEventSink};
pub use id_generator::{SequentialIdGenerator, UuidGenerator};
pub use repository::in_memory::InMemoryDirectiveRepository;
pub use repository::json_file::JsonFileDirectiveRepository;
