//! Domain errors
//!
//! Every aggregate operation either fully applies or fails with one of
//! these kinds, leaving the aggregate untouched.

use thiserror::Error;

/// Errors raised by the Directive aggregate and its owned values
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectiveError {
    /// Identifier does not resolve to an aggregate, step or example
    #[error("{0}")]
    NotFound(String),

    /// Operation illegal in the current lifecycle state
    #[error("{0}")]
    InvalidState(String),

    /// Supplied expected version does not match the current version
    #[error("Version conflict: expected version {expected}, but current version is {actual}.")]
    VersionConflict { expected: u32, actual: u32 },

    /// Structurally invalid input
    #[error("{0}")]
    InvalidArgument(String),
}

impl DirectiveError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState(message.into())
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    pub fn is_invalid_state(&self) -> bool {
        matches!(self, Self::InvalidState(_))
    }

    pub fn is_version_conflict(&self) -> bool {
        matches!(self, Self::VersionConflict { .. })
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }
}

/// Reject blank text for a required field
pub(crate) fn require_text(field: &str, value: &str) -> Result<(), DirectiveError> {
    if value.trim().is_empty() {
        return Err(DirectiveError::invalid_argument(format!(
            "The {} must not be empty.",
            field
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_conflict_message() {
        let err = DirectiveError::VersionConflict {
            expected: 1,
            actual: 2,
        };
        assert_eq!(
            err.to_string(),
            "Version conflict: expected version 1, but current version is 2."
        );
        assert!(err.is_version_conflict());
    }

    #[test]
    fn test_require_text() {
        assert!(require_text("name", "My rule").is_ok());

        let err = require_text("name", "   ").unwrap_err();
        assert_eq!(err.to_string(), "The name must not be empty.");
    }
}
