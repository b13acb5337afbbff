//! Domain events recorded by the Directive aggregate
//!
//! The aggregate appends one event per successful mutating operation;
//! the caller drains them after persisting.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::directive::DirectiveKind;
use super::ids::DirectiveId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum DirectiveEvent {
    #[serde(rename_all = "camelCase")]
    DirectiveDrafted {
        directive_id: DirectiveId,
        kind: DirectiveKind,
        occurred_at: DateTime<Utc>,
    },
    #[serde(rename_all = "camelCase")]
    DirectiveUpdated {
        directive_id: DirectiveId,
        /// Version after the change
        version: u32,
        occurred_at: DateTime<Utc>,
    },
    #[serde(rename_all = "camelCase")]
    DirectivePublished {
        directive_id: DirectiveId,
        occurred_at: DateTime<Utc>,
    },
    #[serde(rename_all = "camelCase")]
    DirectiveArchived {
        directive_id: DirectiveId,
        occurred_at: DateTime<Utc>,
    },
}

impl DirectiveEvent {
    pub fn name(&self) -> &'static str {
        match self {
            DirectiveEvent::DirectiveDrafted { .. } => "DirectiveDrafted",
            DirectiveEvent::DirectiveUpdated { .. } => "DirectiveUpdated",
            DirectiveEvent::DirectivePublished { .. } => "DirectivePublished",
            DirectiveEvent::DirectiveArchived { .. } => "DirectiveArchived",
        }
    }

    pub fn directive_id(&self) -> &DirectiveId {
        match self {
            DirectiveEvent::DirectiveDrafted { directive_id, .. }
            | DirectiveEvent::DirectiveUpdated { directive_id, .. }
            | DirectiveEvent::DirectivePublished { directive_id, .. }
            | DirectiveEvent::DirectiveArchived { directive_id, .. } => directive_id,
        }
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            DirectiveEvent::DirectiveDrafted { occurred_at, .. }
            | DirectiveEvent::DirectiveUpdated { occurred_at, .. }
            | DirectiveEvent::DirectivePublished { occurred_at, .. }
            | DirectiveEvent::DirectiveArchived { occurred_at, .. } => *occurred_at,
        }
    }
}
