//! Directive - The aggregate root for Rules, Skills and Workflows
//!
//! A Directive is an Entity: the same `DirectiveId` is the same directive
//! whatever its content. Shared metadata and the lifecycle live on the
//! struct; kind-specific payload lives in `DirectiveBody`.
//!
//! Every mutating operation follows the same shape:
//! 1. check the lifecycle guard and validate all input
//! 2. apply the change
//! 3. touch `updated_at` and record exactly one event
//!
//! A failing operation returns before step 2, so the aggregate is never
//! left half-updated and no event is recorded.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::event::DirectiveEvent;
use super::example::{Example, ExampleContent};
use super::ids::{DirectiveId, ExampleId, StepId};
use super::lifecycle::{DirectiveState, Lifecycle};
use super::snapshot::ChangeSnapshot;
use super::step::{Step, StepCollection};
use super::workflow_shape::WorkflowShape;
use crate::error::{require_text, DirectiveError};

/// The three kinds of directive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DirectiveKind {
    Rule,
    Skill,
    Workflow,
}

impl DirectiveKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DirectiveKind::Rule => "rule",
            DirectiveKind::Skill => "skill",
            DirectiveKind::Workflow => "workflow",
        }
    }

    /// Skills and Workflows own an ordered step list
    pub fn has_steps(&self) -> bool {
        !matches!(self, DirectiveKind::Rule)
    }

    pub fn all() -> &'static [DirectiveKind] {
        &[DirectiveKind::Rule, DirectiveKind::Skill, DirectiveKind::Workflow]
    }
}

impl core::fmt::Display for DirectiveKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl core::str::FromStr for DirectiveKind {
    type Err = DirectiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rule" => Ok(DirectiveKind::Rule),
            "skill" => Ok(DirectiveKind::Skill),
            "workflow" => Ok(DirectiveKind::Workflow),
            other => Err(DirectiveError::invalid_argument(format!(
                "Unknown directive kind: {}",
                other
            ))),
        }
    }
}

/// Kind-specific payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DirectiveBody {
    Rule {
        examples: Vec<Example>,
    },
    Skill {
        steps: StepCollection,
        examples: Vec<Example>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        workflow: Option<WorkflowShape>,
    },
    Workflow {
        steps: StepCollection,
        examples: Vec<Example>,
    },
}

impl DirectiveBody {
    fn empty(kind: DirectiveKind, owner: &DirectiveId) -> Self {
        match kind {
            DirectiveKind::Rule => DirectiveBody::Rule {
                examples: Vec::new(),
            },
            DirectiveKind::Skill => DirectiveBody::Skill {
                steps: StepCollection::new(owner.clone()),
                examples: Vec::new(),
                workflow: None,
            },
            DirectiveKind::Workflow => DirectiveBody::Workflow {
                steps: StepCollection::new(owner.clone()),
                examples: Vec::new(),
            },
        }
    }

    fn kind(&self) -> DirectiveKind {
        match self {
            DirectiveBody::Rule { .. } => DirectiveKind::Rule,
            DirectiveBody::Skill { .. } => DirectiveKind::Skill,
            DirectiveBody::Workflow { .. } => DirectiveKind::Workflow,
        }
    }

    fn examples(&self) -> &Vec<Example> {
        match self {
            DirectiveBody::Rule { examples }
            | DirectiveBody::Skill { examples, .. }
            | DirectiveBody::Workflow { examples, .. } => examples,
        }
    }

    fn examples_mut(&mut self) -> &mut Vec<Example> {
        match self {
            DirectiveBody::Rule { examples }
            | DirectiveBody::Skill { examples, .. }
            | DirectiveBody::Workflow { examples, .. } => examples,
        }
    }

    fn steps(&self) -> Option<&StepCollection> {
        match self {
            DirectiveBody::Rule { .. } => None,
            DirectiveBody::Skill { steps, .. } | DirectiveBody::Workflow { steps, .. } => {
                Some(steps)
            }
        }
    }

    fn steps_mut(&mut self) -> Option<&mut StepCollection> {
        match self {
            DirectiveBody::Rule { .. } => None,
            DirectiveBody::Skill { steps, .. } | DirectiveBody::Workflow { steps, .. } => {
                Some(steps)
            }
        }
    }
}

/// Field changes for `Directive::update`; `None` keeps the current value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectiveChanges {
    pub content: Option<String>,
    pub description: Option<String>,
    pub examples: Option<Vec<Example>>,
    /// Skills only
    pub workflow: Option<WorkflowShape>,
}

impl DirectiveChanges {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_examples(mut self, examples: Vec<Example>) -> Self {
        self.examples = Some(examples);
        self
    }

    pub fn with_workflow(mut self, workflow: WorkflowShape) -> Self {
        self.workflow = Some(workflow);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_none()
            && self.description.is_none()
            && self.examples.is_none()
            && self.workflow.is_none()
    }
}

/// Directive - The aggregate root
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Directive {
    id: DirectiveId,
    name: String,
    description: String,
    content: String,
    lifecycle: Lifecycle,
    body: DirectiveBody,
    /// Recorded but not yet drained
    #[serde(skip)]
    events: Vec<DirectiveEvent>,
}

impl Directive {
    /// Draft a new directive of the given kind
    pub fn draft(
        id: DirectiveId,
        kind: DirectiveKind,
        name: impl Into<String>,
        description: impl Into<String>,
        content: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<Self, DirectiveError> {
        let name = name.into();
        require_text("name", &name)?;

        let body = DirectiveBody::empty(kind, &id);
        let mut directive = Self {
            id,
            name,
            description: description.into(),
            content: content.into(),
            lifecycle: Lifecycle::draft(now),
            body,
            events: Vec::new(),
        };
        directive.events.push(DirectiveEvent::DirectiveDrafted {
            directive_id: directive.id.clone(),
            kind,
            occurred_at: now,
        });
        Ok(directive)
    }

    // ========== Getters ==========

    pub fn id(&self) -> &DirectiveId {
        &self.id
    }

    pub fn kind(&self) -> DirectiveKind {
        self.body.kind()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    pub fn state(&self) -> DirectiveState {
        self.lifecycle.state()
    }

    pub fn version(&self) -> u32 {
        self.lifecycle.version()
    }

    /// Storage token for the conditional write; moves on every mutation
    pub fn revision(&self) -> u64 {
        self.lifecycle.revision()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.lifecycle.created_at()
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.lifecycle.updated_at()
    }

    pub fn body(&self) -> &DirectiveBody {
        &self.body
    }

    pub fn examples(&self) -> &[Example] {
        self.body.examples()
    }

    pub fn example(&self, id: &ExampleId) -> Option<&Example> {
        self.examples().iter().find(|e| e.id() == id)
    }

    /// `None` for Rules
    pub fn steps(&self) -> Option<&StepCollection> {
        self.body.steps()
    }

    pub fn step(&self, id: &StepId) -> Option<&Step> {
        self.steps().and_then(|steps| steps.get(id))
    }

    /// The workflow shape of a Skill, if set
    pub fn workflow(&self) -> Option<&WorkflowShape> {
        match &self.body {
            DirectiveBody::Skill { workflow, .. } => workflow.as_ref(),
            _ => None,
        }
    }

    /// Events recorded since the last drain
    pub fn pending_events(&self) -> &[DirectiveEvent] {
        &self.events
    }

    /// Drain recorded events, leaving the buffer empty
    pub fn take_events(&mut self) -> Vec<DirectiveEvent> {
        std::mem::take(&mut self.events)
    }

    /// Structural check used after loading from storage
    pub fn check_integrity(&self) -> Result<(), DirectiveError> {
        self.lifecycle.check_integrity()?;
        if let Some(steps) = self.steps() {
            if steps.owner() != &self.id || !steps.is_dense() {
                return Err(DirectiveError::invalid_state(format!(
                    "Step orders of directive \"{}\" are corrupted.",
                    self.id
                )));
            }
        }
        Ok(())
    }

    // ========== State Transitions ==========

    pub fn publish(&mut self, now: DateTime<Utc>) -> Result<(), DirectiveError> {
        self.lifecycle.publish(now)?;
        self.events.push(DirectiveEvent::DirectivePublished {
            directive_id: self.id.clone(),
            occurred_at: now,
        });
        Ok(())
    }

    pub fn archive(&mut self, now: DateTime<Utc>) -> Result<(), DirectiveError> {
        self.lifecycle.archive(now)?;
        self.events.push(DirectiveEvent::DirectiveArchived {
            directive_id: self.id.clone(),
            occurred_at: now,
        });
        Ok(())
    }

    // ========== Content Mutations ==========

    /// Rename or re-describe the directive (version unchanged)
    pub fn update_metadata(
        &mut self,
        name: Option<String>,
        description: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<(), DirectiveError> {
        if name.is_none() && description.is_none() {
            return Err(DirectiveError::invalid_argument(
                "At least one field must be provided.",
            ));
        }
        self.lifecycle.assert_not_archived()?;
        if let Some(name) = &name {
            require_text("name", name)?;
        }

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(description) = description {
            self.description = description;
        }
        self.record_update(now);
        Ok(())
    }

    /// Version-guarded content update
    ///
    /// Returns the snapshot of the values as they stood before the change.
    pub fn update(
        &mut self,
        expected_version: u32,
        changes: DirectiveChanges,
        now: DateTime<Utc>,
    ) -> Result<ChangeSnapshot, DirectiveError> {
        if changes.is_empty() {
            return Err(DirectiveError::invalid_argument(
                "At least one field must be provided.",
            ));
        }
        self.lifecycle.assert_not_archived()?;
        self.lifecycle.assert_version(expected_version)?;

        if let Some(content) = &changes.content {
            require_text("content", content)?;
        }
        if let Some(examples) = &changes.examples {
            self.check_examples(examples)?;
        }
        if changes.workflow.is_some() && self.kind() != DirectiveKind::Skill {
            return Err(DirectiveError::invalid_argument(format!(
                "Only skills have a workflow; this directive is a {}.",
                self.kind()
            )));
        }
        let next_version = self.lifecycle.next_version()?;

        let snapshot = ChangeSnapshot::capture(self, now);

        if let Some(content) = changes.content {
            self.content = content;
        }
        if let Some(description) = changes.description {
            self.description = description;
        }
        if let Some(examples) = changes.examples {
            *self.body.examples_mut() = examples;
        }
        if let (Some(shape), DirectiveBody::Skill { workflow, .. }) =
            (changes.workflow, &mut self.body)
        {
            *workflow = Some(shape);
        }

        self.lifecycle.bump_version(next_version, now);
        self.record_update(now);
        Ok(snapshot)
    }

    // ========== Examples ==========

    pub fn add_example(
        &mut self,
        id: ExampleId,
        content: ExampleContent,
        now: DateTime<Utc>,
    ) -> Result<(), DirectiveError> {
        self.lifecycle.assert_not_archived()?;
        if self.example(&id).is_some() {
            return Err(DirectiveError::invalid_argument(format!(
                "Example \"{}\" already exists.",
                id
            )));
        }
        self.check_example_kind(&content)?;
        let example = Example::new(id, content)?;

        self.body.examples_mut().push(example);
        self.record_update(now);
        Ok(())
    }

    pub fn update_example(
        &mut self,
        id: &ExampleId,
        content: ExampleContent,
        now: DateTime<Utc>,
    ) -> Result<(), DirectiveError> {
        self.lifecycle.assert_not_archived()?;
        self.check_example_kind(&content)?;
        content.validate()?;
        let kind = self.kind();
        let example = self
            .body
            .examples_mut()
            .iter_mut()
            .find(|e| e.id() == id)
            .ok_or_else(|| {
                DirectiveError::not_found(format!("Example \"{}\" not found in this {}.", id, kind))
            })?;

        example.replace_content(content);
        self.record_update(now);
        Ok(())
    }

    pub fn remove_example(&mut self, id: &ExampleId, now: DateTime<Utc>) -> Result<Example, DirectiveError> {
        self.lifecycle.assert_not_archived()?;
        let kind = self.kind();
        let examples = self.body.examples_mut();
        let index = examples.iter().position(|e| e.id() == id).ok_or_else(|| {
            DirectiveError::not_found(format!("Example \"{}\" not found in this {}.", id, kind))
        })?;

        let removed = examples.remove(index);
        self.record_update(now);
        Ok(removed)
    }

    // ========== Steps ==========

    /// Insert a new step after `after` (`None` inserts first)
    ///
    /// Returns the order of the new step.
    pub fn create_step(
        &mut self,
        id: StepId,
        content: impl Into<String>,
        after: Option<&Step>,
        now: DateTime<Utc>,
    ) -> Result<u32, DirectiveError> {
        let content = content.into();
        self.ensure_has_steps()?;
        self.lifecycle.assert_not_archived()?;
        if let Some(reference) = after {
            self.ensure_owned(reference, "Reference step")?;
        }
        require_text("step content", &content)?;

        let order = self
            .steps_mut()?
            .insert_after(id, content, after.map(Step::id))?;
        self.record_update(now);
        Ok(order)
    }

    pub fn update_step(
        &mut self,
        id: &StepId,
        content: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<(), DirectiveError> {
        let content = content.into();
        self.ensure_has_steps()?;
        self.lifecycle.assert_not_archived()?;
        require_text("step content", &content)?;

        self.steps_mut()?.update(id, content)?;
        self.record_update(now);
        Ok(())
    }

    /// Move `step` right after `after` (`None` moves it first)
    ///
    /// Returns `false` for a no-op move: nothing renumbered, no event.
    pub fn move_step_after(
        &mut self,
        step: &Step,
        after: Option<&Step>,
        now: DateTime<Utc>,
    ) -> Result<bool, DirectiveError> {
        self.ensure_has_steps()?;
        self.ensure_owned(step, "Step")?;
        if let Some(reference) = after {
            self.ensure_owned(reference, "Reference step")?;
        }
        self.lifecycle.assert_not_archived()?;

        let moved = self
            .steps_mut()?
            .move_after(step.id(), after.map(Step::id))?;
        if moved {
            self.record_update(now);
        }
        Ok(moved)
    }

    pub fn remove_step(&mut self, id: &StepId, now: DateTime<Utc>) -> Result<Step, DirectiveError> {
        self.ensure_has_steps()?;
        self.lifecycle.assert_not_archived()?;

        let removed = self.steps_mut()?.remove(id)?;
        self.record_update(now);
        Ok(removed)
    }

    // ========== Internals ==========

    fn record_update(&mut self, now: DateTime<Utc>) {
        self.lifecycle.touch(now);
        self.events.push(DirectiveEvent::DirectiveUpdated {
            directive_id: self.id.clone(),
            version: self.lifecycle.version(),
            occurred_at: now,
        });
    }

    fn ensure_has_steps(&self) -> Result<(), DirectiveError> {
        if self.kind().has_steps() {
            Ok(())
        } else {
            Err(DirectiveError::invalid_argument("Rules do not have steps."))
        }
    }

    fn ensure_owned(&self, step: &Step, what: &str) -> Result<(), DirectiveError> {
        if !step.belongs_to(&self.id) {
            return Err(DirectiveError::invalid_argument(format!(
                "{} does not belong to this {}.",
                what,
                self.kind()
            )));
        }
        Ok(())
    }

    fn steps_mut(&mut self) -> Result<&mut StepCollection, DirectiveError> {
        self.body
            .steps_mut()
            .ok_or_else(|| DirectiveError::invalid_argument("Rules do not have steps."))
    }

    fn check_example_kind(&self, content: &ExampleContent) -> Result<(), DirectiveError> {
        match (self.kind(), content.is_contrast()) {
            (DirectiveKind::Rule, true) | (DirectiveKind::Skill | DirectiveKind::Workflow, false) => {
                Ok(())
            }
            (DirectiveKind::Rule, false) => Err(DirectiveError::invalid_argument(
                "Rule examples take good/bad/explanation.",
            )),
            (kind, true) => Err(DirectiveError::invalid_argument(format!(
                "A {} example takes scenario/input/output/explanation.",
                kind
            ))),
        }
    }

    fn check_examples(&self, examples: &[Example]) -> Result<(), DirectiveError> {
        for (i, example) in examples.iter().enumerate() {
            self.check_example_kind(example.content())?;
            example.content().validate()?;
            if examples[..i].iter().any(|e| e.id() == example.id()) {
                return Err(DirectiveError::invalid_argument(format!(
                    "Example \"{}\" appears more than once.",
                    example.id()
                )));
            }
        }
        Ok(())
    }
}

impl PartialEq for Directive {
    fn eq(&self, other: &Self) -> bool {
        // Entity equality: same ID = same entity
        self.id == other.id
    }
}

impl Eq for Directive {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::workflow_shape::{SequentialWorkflow, StepType, WorkflowStep};
    use chrono::{Duration, TimeZone};

    fn t(seconds: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap() + Duration::seconds(seconds)
    }

    fn rule() -> Directive {
        let mut rule = Directive::draft(
            DirectiveId::new("my-rule"),
            DirectiveKind::Rule,
            "My rule",
            "Use ? for errors",
            "Propagate errors with ?",
            t(0),
        )
        .unwrap();
        rule.take_events();
        rule
    }

    fn skill(id: &str) -> Directive {
        let mut skill = Directive::draft(
            DirectiveId::new(id),
            DirectiveKind::Skill,
            "Review",
            "Code review",
            "Review the diff",
            t(0),
        )
        .unwrap();
        skill.take_events();
        skill
    }

    fn step(directive: &Directive, id: &str) -> Step {
        directive.step(&StepId::new(id)).cloned().unwrap()
    }

    fn order(directive: &Directive, id: &str) -> u32 {
        step(directive, id).order()
    }

    fn updated_events(directive: &mut Directive) -> usize {
        directive
            .take_events()
            .iter()
            .filter(|e| matches!(e, DirectiveEvent::DirectiveUpdated { .. }))
            .count()
    }

    #[test]
    fn test_draft() {
        let mut directive = Directive::draft(
            DirectiveId::new("my-rule"),
            DirectiveKind::Rule,
            "My rule",
            "desc",
            "",
            t(0),
        )
        .unwrap();

        assert_eq!(directive.state(), DirectiveState::Draft);
        assert_eq!(directive.version(), 1);
        assert_eq!(directive.created_at(), directive.updated_at());
        assert!(directive.steps().is_none());

        let events = directive.take_events();
        assert_eq!(events.len(), 1);
        assert!(matches!(
            events[0],
            DirectiveEvent::DirectiveDrafted {
                kind: DirectiveKind::Rule,
                ..
            }
        ));
        assert!(directive.pending_events().is_empty());
    }

    #[test]
    fn test_draft_requires_name() {
        let err = Directive::draft(
            DirectiveId::new("x"),
            DirectiveKind::Skill,
            " ",
            "",
            "",
            t(0),
        )
        .unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_publish_and_archive_emit_events_without_version_change() {
        let mut directive = rule();

        directive.publish(t(1)).unwrap();
        directive.archive(t(2)).unwrap();

        assert_eq!(directive.version(), 1);
        assert_eq!(directive.updated_at(), t(2));
        let names: Vec<_> = directive.take_events().iter().map(|e| e.name()).collect();
        assert_eq!(names, vec!["DirectivePublished", "DirectiveArchived"]);

        assert!(directive.publish(t(3)).unwrap_err().is_invalid_state());
        assert!(directive.archive(t(3)).unwrap_err().is_invalid_state());
        assert!(directive.take_events().is_empty());
    }

    #[test]
    fn test_archived_directive_rejects_metadata_update() {
        let mut directive = rule();
        directive.publish(t(1)).unwrap();
        directive.archive(t(2)).unwrap();
        directive.take_events();

        let err = directive
            .update_metadata(Some("x".to_string()), None, t(3))
            .unwrap_err();

        assert_eq!(
            err,
            DirectiveError::invalid_state("Cannot perform this action on an archived directive.")
        );
        assert_eq!(directive.name(), "My rule");
        assert!(directive.take_events().is_empty());
    }

    #[test]
    fn test_update_metadata() {
        let mut directive = rule();
        directive
            .update_metadata(None, Some("New description".to_string()), t(5))
            .unwrap();

        assert_eq!(directive.name(), "My rule");
        assert_eq!(directive.description(), "New description");
        assert_eq!(directive.version(), 1);
        assert_eq!(updated_events(&mut directive), 1);

        let err = directive.update_metadata(None, None, t(6)).unwrap_err();
        assert_eq!(err.to_string(), "At least one field must be provided.");
    }

    #[test]
    fn test_update_bumps_version_and_captures_snapshot() {
        let mut directive = rule();

        let snapshot = directive
            .update(1, DirectiveChanges::new().with_content("X"), t(10))
            .unwrap();

        assert_eq!(directive.version(), 2);
        assert_eq!(directive.content(), "X");
        assert_eq!(directive.description(), "Use ? for errors");
        assert_eq!(directive.updated_at(), t(10));

        assert_eq!(snapshot.version(), 1);
        assert_eq!(snapshot.content(), "Propagate errors with ?");
        assert_eq!(
            snapshot.changed_fields(&directive),
            vec![crate::model::snapshot::ChangedField::Content]
        );

        let events = directive.take_events();
        assert_eq!(events.len(), 1);
        assert!(matches!(
            events[0],
            DirectiveEvent::DirectiveUpdated { version: 2, .. }
        ));
    }

    #[test]
    fn test_update_with_stale_version_conflicts() {
        let mut directive = rule();
        directive
            .update(1, DirectiveChanges::new().with_content("X"), t(1))
            .unwrap();
        directive.take_events();

        let err = directive
            .update(1, DirectiveChanges::new().with_content("Y"), t(2))
            .unwrap_err();

        assert_eq!(
            err,
            DirectiveError::VersionConflict {
                expected: 1,
                actual: 2
            }
        );
        assert_eq!(directive.content(), "X");
        assert_eq!(directive.version(), 2);
        assert!(directive.take_events().is_empty());
    }

    #[test]
    fn test_update_rejects_empty_changes_before_anything_else() {
        let mut directive = rule();
        let err = directive.update(99, DirectiveChanges::new(), t(1)).unwrap_err();

        assert_eq!(
            err,
            DirectiveError::invalid_argument("At least one field must be provided.")
        );
        assert_eq!(directive.version(), 1);
        assert_eq!(directive.updated_at(), t(0));
    }

    #[test]
    fn test_update_on_archived_directive() {
        let mut directive = rule();
        directive.archive(t(1)).unwrap();

        let err = directive
            .update(1, DirectiveChanges::new().with_description("d"), t(2))
            .unwrap_err();
        assert!(err.is_invalid_state());
    }

    #[test]
    fn test_update_examples_must_match_kind() {
        let mut directive = rule();
        let scenario = Example::new(
            ExampleId::new("e-1"),
            ExampleContent::scenario("s", "i", "o", None::<String>),
        )
        .unwrap();

        let err = directive
            .update(1, DirectiveChanges::new().with_examples(vec![scenario]), t(1))
            .unwrap_err();
        assert!(err.is_invalid_argument());
        assert_eq!(directive.version(), 1);
    }

    #[test]
    fn test_update_workflow_only_on_skills() {
        let shape: WorkflowShape = SequentialWorkflow::create(vec![
            WorkflowStep::new(1, "T", "C", StepType::Action).unwrap(),
        ])
        .unwrap()
        .into();

        let mut directive = rule();
        let err = directive
            .update(1, DirectiveChanges::new().with_workflow(shape.clone()), t(1))
            .unwrap_err();
        assert!(err.is_invalid_argument());

        let mut skill = skill("review");
        let snapshot = skill
            .update(1, DirectiveChanges::new().with_workflow(shape.clone()), t(1))
            .unwrap();
        assert_eq!(skill.workflow(), Some(&shape));
        assert!(snapshot.workflow().is_none());
    }

    #[test]
    fn test_examples_lifecycle() {
        let mut directive = rule();
        let id = ExampleId::new("e-1");

        directive
            .add_example(
                id.clone(),
                ExampleContent::contrast(Some("x?"), Some("x.unwrap()"), None::<String>),
                t(1),
            )
            .unwrap();
        assert_eq!(directive.examples().len(), 1);

        directive
            .update_example(
                &id,
                ExampleContent::contrast(Some("x?"), None::<String>, Some("propagate")),
                t(2),
            )
            .unwrap();
        assert_eq!(
            directive.example(&id).unwrap().content().explanation(),
            Some("propagate")
        );

        directive.remove_example(&id, t(3)).unwrap();
        assert!(directive.examples().is_empty());
        assert_eq!(updated_events(&mut directive), 3);
        assert_eq!(directive.version(), 1);

        let err = directive.remove_example(&id, t(4)).unwrap_err();
        assert_eq!(err.to_string(), "Example \"e-1\" not found in this rule.");
    }

    #[test]
    fn test_rule_rejects_scenario_example() {
        let mut directive = rule();
        let err = directive
            .add_example(
                ExampleId::new("e-1"),
                ExampleContent::scenario("s", "i", "o", None::<String>),
                t(1),
            )
            .unwrap_err();
        assert!(err.is_invalid_argument());
        assert!(directive.take_events().is_empty());
    }

    #[test]
    fn test_skill_steps_scenario() {
        let mut skill = skill("review");

        skill.create_step(StepId::new("a"), "A", None, t(1)).unwrap();
        let a = step(&skill, "a");
        skill.create_step(StepId::new("b"), "B", Some(&a), t(2)).unwrap();
        let b = step(&skill, "b");
        skill.create_step(StepId::new("c"), "C", Some(&b), t(3)).unwrap();

        assert_eq!((order(&skill, "a"), order(&skill, "b"), order(&skill, "c")), (1, 2, 3));

        let c = step(&skill, "c");
        assert!(skill.move_step_after(&a, Some(&c), t(4)).unwrap());
        assert_eq!((order(&skill, "a"), order(&skill, "b"), order(&skill, "c")), (3, 1, 2));

        // Structural edits do not touch the version
        assert_eq!(skill.version(), 1);
        assert_eq!(skill.updated_at(), t(4));
        assert_eq!(updated_events(&mut skill), 4);
    }

    #[test]
    fn test_noop_moves_emit_nothing() {
        let mut skill = skill("review");
        skill.create_step(StepId::new("a"), "A", None, t(1)).unwrap();
        let a = step(&skill, "a");
        skill.create_step(StepId::new("b"), "B", Some(&a), t(1)).unwrap();
        let b = step(&skill, "b");
        skill.take_events();
        let revision = skill.revision();

        assert!(!skill.move_step_after(&b, Some(&b), t(2)).unwrap());
        assert!(!skill.move_step_after(&b, Some(&a), t(2)).unwrap());
        assert!(!skill.move_step_after(&a, None, t(2)).unwrap());

        assert!(skill.take_events().is_empty());
        assert_eq!(skill.updated_at(), t(1));
        assert_eq!(skill.revision(), revision);
        assert_eq!((order(&skill, "a"), order(&skill, "b")), (1, 2));
    }

    #[test]
    fn test_cross_owner_steps_are_rejected_in_any_state() {
        let mut mine = skill("mine");
        let mut other = skill("other");
        mine.create_step(StepId::new("m1"), "M1", None, t(1)).unwrap();
        other.create_step(StepId::new("o1"), "O1", None, t(1)).unwrap();
        let m1 = step(&mine, "m1");
        let o1 = step(&other, "o1");

        let err = mine.move_step_after(&o1, None, t(2)).unwrap_err();
        assert_eq!(
            err,
            DirectiveError::invalid_argument("Step does not belong to this skill.")
        );

        let err = mine.move_step_after(&m1, Some(&o1), t(2)).unwrap_err();
        assert_eq!(err.to_string(), "Reference step does not belong to this skill.");

        mine.archive(t(3)).unwrap();
        assert!(mine
            .move_step_after(&o1, None, t(4))
            .unwrap_err()
            .is_invalid_argument());

        let err = other
            .create_step(StepId::new("o2"), "O2", Some(&m1), t(5))
            .unwrap_err();
        assert!(err.is_invalid_argument());
        assert_eq!(other.steps().unwrap().len(), 1);
    }

    #[test]
    fn test_remove_and_update_step() {
        let mut workflow = Directive::draft(
            DirectiveId::new("release"),
            DirectiveKind::Workflow,
            "Release",
            "",
            "",
            t(0),
        )
        .unwrap();
        workflow.create_step(StepId::new("s1"), "Tag", None, t(1)).unwrap();
        let s1 = step(&workflow, "s1");
        workflow.create_step(StepId::new("s2"), "Build", Some(&s1), t(1)).unwrap();
        let s2 = step(&workflow, "s2");
        workflow.create_step(StepId::new("s3"), "Publish", Some(&s2), t(1)).unwrap();

        workflow.update_step(&StepId::new("s2"), "Build release", t(2)).unwrap();
        assert_eq!(step(&workflow, "s2").content(), "Build release");

        workflow.remove_step(&StepId::new("s1"), t(3)).unwrap();
        assert_eq!((order(&workflow, "s2"), order(&workflow, "s3")), (1, 2));
        assert!(workflow.check_integrity().is_ok());

        assert!(workflow
            .update_step(&StepId::new("s1"), "x", t(4))
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_rules_have_no_steps() {
        let mut directive = rule();
        let err = directive
            .create_step(StepId::new("s1"), "x", None, t(1))
            .unwrap_err();
        assert_eq!(err.to_string(), "Rules do not have steps.");
    }

    #[test]
    fn test_archived_directive_rejects_step_edits() {
        let mut skill = skill("review");
        skill.create_step(StepId::new("a"), "A", None, t(1)).unwrap();
        skill.archive(t(2)).unwrap();
        skill.take_events();

        assert!(skill
            .create_step(StepId::new("b"), "B", None, t(3))
            .unwrap_err()
            .is_invalid_state());
        assert!(skill
            .remove_step(&StepId::new("a"), t(3))
            .unwrap_err()
            .is_invalid_state());
        assert!(skill.take_events().is_empty());
    }

    #[test]
    fn test_serde_round_trip_keeps_structure() {
        let mut skill = skill("review");
        skill.create_step(StepId::new("a"), "A", None, t(1)).unwrap();
        skill
            .add_example(
                ExampleId::new("e"),
                ExampleContent::scenario("s", "i", "o", Some("because")),
                t(1),
            )
            .unwrap();

        let json = serde_json::to_string(&skill).unwrap();
        let back: Directive = serde_json::from_str(&json).unwrap();

        assert_eq!(back.body(), skill.body());
        assert_eq!(back.lifecycle(), skill.lifecycle());
        assert!(back.pending_events().is_empty());
        assert!(back.check_integrity().is_ok());
    }
}
