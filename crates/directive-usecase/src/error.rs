//! Errors surfaced to callers of the use cases

use directive_domain::{DirectiveError, RepositoryError};
use thiserror::Error;

/// Error returned by every `DirectiveService` command
///
/// Domain kinds pass through untouched; repository failures are folded
/// into the same kinds where one exists. A failed conditional write is a
/// `ConcurrentModification`, which callers treat as a version conflict.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error(transparent)]
    Directive(#[from] DirectiveError),

    /// The stored directive moved on between load and save
    #[error("Directive \"{id}\" was modified concurrently; reload and retry.")]
    ConcurrentModification { id: String },

    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl CommandError {
    /// The domain error kind, if this is not a storage failure
    pub fn as_directive_error(&self) -> Option<&DirectiveError> {
        match self {
            CommandError::Directive(e) => Some(e),
            CommandError::ConcurrentModification { .. } | CommandError::Persistence(_) => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.as_directive_error().is_some_and(DirectiveError::is_not_found)
    }

    pub fn is_invalid_state(&self) -> bool {
        self.as_directive_error().is_some_and(DirectiveError::is_invalid_state)
    }

    pub fn is_version_conflict(&self) -> bool {
        matches!(self, CommandError::ConcurrentModification { .. })
            || self.as_directive_error().is_some_and(DirectiveError::is_version_conflict)
    }

    pub fn is_invalid_argument(&self) -> bool {
        self.as_directive_error().is_some_and(DirectiveError::is_invalid_argument)
    }
}

impl From<RepositoryError> for CommandError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { id } => CommandError::Directive(
                DirectiveError::not_found(format!("Directive \"{}\" not found.", id)),
            ),
            RepositoryError::Duplicate { id } => CommandError::Directive(
                DirectiveError::invalid_argument(format!("Directive \"{}\" already exists.", id)),
            ),
            RepositoryError::ConcurrencyError { id, .. } => {
                CommandError::ConcurrentModification { id }
            }
            RepositoryError::PersistenceError { message } => CommandError::Persistence(message),
        }
    }
}
