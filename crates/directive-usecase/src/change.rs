//! Change records - what the audit collaborator receives after an update

use chrono::{DateTime, Utc};
use directive_domain::{ChangeSnapshot, ChangedField, DirectiveId};
use serde::{Deserialize, Serialize};

/// One successful `update`, with the values it replaced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeRecord {
    pub snapshot: ChangeSnapshot,
    pub new_version: u32,
    pub changed_fields: Vec<ChangedField>,
    pub recorded_at: DateTime<Utc>,
}

impl ChangeRecord {
    pub fn directive_id(&self) -> &DirectiveId {
        self.snapshot.directive_id()
    }

    pub fn previous_version(&self) -> u32 {
        self.snapshot.version()
    }
}

/// Audit/versioning port fed by `DirectiveService::update`
pub trait ChangeRecorder: Send + Sync {
    fn record(&mut self, change: ChangeRecord);
}
