//! # Directives CLI
//!
//! The clap command tree and configuration behind the `directives` binary.
//! Every command runs against a `DirectiveService` and returns the JSON
//! value the binary prints, so the tree can be driven from tests with an
//! in-memory repository.

pub mod commands;
pub mod config;

pub use commands::Command;
pub use config::{AppConfig, DEFAULT_CONFIG_PATH};
