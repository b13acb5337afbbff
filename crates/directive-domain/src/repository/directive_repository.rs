//! Directive Repository - Abstract persistence for Directives
//!
//! This trait defines what operations the domain needs.
//! How they're implemented (file, memory, SQL) is not our concern here.

use thiserror::Error;

use crate::model::directive::{Directive, DirectiveKind};
use crate::model::ids::{DirectiveId, StepId};
use crate::model::lifecycle::DirectiveState;
use crate::model::step::Step;

/// Errors that can occur during repository operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// Directive not found
    #[error("Directive not found: {id}")]
    NotFound { id: String },
    /// Insert of an id that already exists
    #[error("Directive already exists: {id}")]
    Duplicate { id: String },
    /// Stored revision differs from the revision read at load time
    #[error("Concurrent modification for directive {id}: expected revision {expected}, stored revision {actual}")]
    ConcurrencyError { id: String, expected: u64, actual: u64 },
    /// Failed to read or write the store
    #[error("Persistence error: {message}")]
    PersistenceError { message: String },
}

impl RepositoryError {
    pub fn persistence(message: impl Into<String>) -> Self {
        RepositoryError::PersistenceError {
            message: message.into(),
        }
    }
}

/// Which directives `list` returns
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirectiveFilter {
    pub kind: Option<DirectiveKind>,
    pub state: Option<DirectiveState>,
}

impl DirectiveFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn matches(&self, directive: &Directive) -> bool {
        self.kind.map_or(true, |k| directive.kind() == k)
            && self.state.map_or(true, |s| directive.state() == s)
    }
}

/// Directive Repository Trait
///
/// This is a PORT in hexagonal architecture.
/// The domain defines what it needs; adapters provide implementations.
///
/// Note: No async here - the core is synchronous by nature.
pub trait DirectiveRepository {
    /// Store a freshly drafted directive; fails if the id is taken
    fn insert(&mut self, directive: &Directive) -> Result<(), RepositoryError>;

    /// Conditional write: succeeds only if the stored revision is still
    /// `expected_revision` (the revision read at load time)
    ///
    /// Keyed on the revision rather than the content version, so a stale
    /// writer also loses against a concurrent publish, archive or step edit.
    fn save(&mut self, directive: &Directive, expected_revision: u64) -> Result<(), RepositoryError>;

    /// Find a directive by ID, with all of its steps and examples
    fn find_by_id(&self, id: &DirectiveId) -> Result<Option<Directive>, RepositoryError>;

    /// Find a step by ID across every directive
    fn find_step(&self, id: &StepId) -> Result<Option<Step>, RepositoryError>;

    /// Directives matching the filter, ordered by id
    fn list(&self, filter: &DirectiveFilter) -> Result<Vec<Directive>, RepositoryError>;

    /// Delete a directive
    fn delete(&mut self, id: &DirectiveId) -> Result<(), RepositoryError>;

    /// Check if a directive exists
    fn exists(&self, id: &DirectiveId) -> Result<bool, RepositoryError> {
        Ok(self.find_by_id(id)?.is_some())
    }

    /// Count all directives
    fn count(&self) -> Result<usize, RepositoryError> {
        Ok(self.list(&DirectiveFilter::all())?.len())
    }
}
