//! Identifiers - One opaque identifier family per entity kind
//!
//! Directive ids are author-chosen slugs (`"my-rule"`).
//! Step and example ids are generated by an `IdGenerator` port and are
//! opaque to the domain (UUIDs in production, counters in tests).

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::DirectiveError;

const SLUG_PATTERN: &str = r"^[a-z0-9]+(-[a-z0-9]+)*$";

/// Longest directive id accepted by `DirectiveId::parse`
pub const MAX_DIRECTIVE_ID_LEN: usize = 100;

fn slug_regex() -> Option<&'static Regex> {
    static SLUG: OnceLock<Option<Regex>> = OnceLock::new();
    SLUG.get_or_init(|| Regex::new(SLUG_PATTERN).ok()).as_ref()
}

/// Unique, human-readable identifier for a Directive
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DirectiveId(String);

impl DirectiveId {
    /// Wrap an id without validation (ids read back from storage)
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Parse an author-supplied id, enforcing the lowercase slug format
    pub fn parse(id: impl Into<String>) -> Result<Self, DirectiveError> {
        let id = id.into();
        if id.is_empty() {
            return Err(DirectiveError::invalid_argument(
                "The directive id must not be empty.",
            ));
        }
        if id.len() > MAX_DIRECTIVE_ID_LEN {
            return Err(DirectiveError::invalid_argument(format!(
                "The directive id must be at most {} characters.",
                MAX_DIRECTIVE_ID_LEN
            )));
        }
        let valid = slug_regex().map(|r| r.is_match(&id)).unwrap_or(false);
        if !valid {
            return Err(DirectiveError::invalid_argument(format!(
                "Invalid directive id \"{}\": use lowercase letters, digits and single hyphens.",
                id
            )));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for DirectiveId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

opaque_id!(
    /// Opaque identifier for a Step owned by a Skill or Workflow
    StepId
);

opaque_id!(
    /// Opaque identifier for an Example owned by any directive
    ExampleId
);
