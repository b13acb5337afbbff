//! Commands - Intent to change a directive
//!
//! Parameter shapes only; any wire format is the caller's business.

use directive_domain::{
    DirectiveId, DirectiveKind, ExampleContent, ExampleId, StepId, WorkflowShape,
};

/// Create a new directive in `Draft`
#[derive(Debug, Clone)]
pub struct DraftDirective {
    /// Author-chosen slug, validated on draft
    pub id: String,
    pub kind: DirectiveKind,
    pub name: String,
    pub description: String,
    pub content: String,
}

/// Rename or re-describe without a version check
#[derive(Debug, Clone)]
pub struct UpdateMetadata {
    pub directive_id: DirectiveId,
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Version-guarded content update; `None` fields are left alone
#[derive(Debug, Clone)]
pub struct UpdateDirective {
    pub directive_id: DirectiveId,
    pub expected_version: u32,
    pub content: Option<String>,
    pub description: Option<String>,
    /// Replaces the whole example list; ids are generated
    pub examples: Option<Vec<ExampleContent>>,
    pub workflow: Option<WorkflowShape>,
}

impl UpdateDirective {
    pub fn new(directive_id: DirectiveId, expected_version: u32) -> Self {
        Self {
            directive_id,
            expected_version,
            content: None,
            description: None,
            examples: None,
            workflow: None,
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_examples(mut self, examples: Vec<ExampleContent>) -> Self {
        self.examples = Some(examples);
        self
    }

    pub fn with_workflow(mut self, workflow: WorkflowShape) -> Self {
        self.workflow = Some(workflow);
        self
    }
}

#[derive(Debug, Clone)]
pub struct AddExample {
    pub directive_id: DirectiveId,
    pub content: ExampleContent,
}

#[derive(Debug, Clone)]
pub struct UpdateExample {
    pub directive_id: DirectiveId,
    pub example_id: ExampleId,
    pub content: ExampleContent,
}

/// Insert a step after `after_step_id` (`None` inserts first)
#[derive(Debug, Clone)]
pub struct CreateStep {
    pub directive_id: DirectiveId,
    pub content: String,
    pub after_step_id: Option<StepId>,
}

#[derive(Debug, Clone)]
pub struct UpdateStep {
    pub directive_id: DirectiveId,
    pub step_id: StepId,
    pub content: String,
}

/// Move a step after `after_step_id` (`None` moves it first)
#[derive(Debug, Clone)]
pub struct MoveStepAfter {
    pub directive_id: DirectiveId,
    pub step_id: StepId,
    pub after_step_id: Option<StepId>,
}
