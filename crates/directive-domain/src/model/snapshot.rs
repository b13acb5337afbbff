//! Change Snapshot - Field values captured right before an update
//!
//! `Directive::update` captures the snapshot before applying anything and
//! returns it, so the audit collaborator can store the diff.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::directive::Directive;
use super::example::Example;
use super::ids::DirectiveId;
use super::workflow_shape::WorkflowShape;

/// A field an update can touch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangedField {
    Content,
    Description,
    Examples,
    Workflow,
}

/// Immutable pre-update values, tied to the version they were read at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeSnapshot {
    directive_id: DirectiveId,
    version: u32,
    captured_at: DateTime<Utc>,
    content: String,
    description: String,
    examples: Vec<Example>,
    workflow: Option<WorkflowShape>,
}

impl ChangeSnapshot {
    pub(crate) fn capture(directive: &Directive, now: DateTime<Utc>) -> Self {
        Self {
            directive_id: directive.id().clone(),
            version: directive.version(),
            captured_at: now,
            content: directive.content().to_string(),
            description: directive.description().to_string(),
            examples: directive.examples().to_vec(),
            workflow: directive.workflow().cloned(),
        }
    }

    pub fn directive_id(&self) -> &DirectiveId {
        &self.directive_id
    }

    /// Version the values belong to
    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn examples(&self) -> &[Example] {
        &self.examples
    }

    pub fn workflow(&self) -> Option<&WorkflowShape> {
        self.workflow.as_ref()
    }

    /// Fields whose current value differs from the captured one
    pub fn changed_fields(&self, current: &Directive) -> Vec<ChangedField> {
        let mut changed = Vec::new();
        if self.content != current.content() {
            changed.push(ChangedField::Content);
        }
        if self.description != current.description() {
            changed.push(ChangedField::Description);
        }
        if self.examples.as_slice() != current.examples() {
            changed.push(ChangedField::Examples);
        }
        if self.workflow.as_ref() != current.workflow() {
            changed.push(ChangedField::Workflow);
        }
        changed
    }
}
