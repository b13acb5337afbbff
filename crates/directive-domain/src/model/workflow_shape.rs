//! Workflow Shape - The closed set of shapes a Skill's workflow can take
//!
//! Every shape round-trips through a tagged JSON structure:
//!
//! ```text
//! { "type": "sequential", "steps": [...] }
//! { "type": "template",   "templates": [...] }
//! { "type": "checklist",  "items": [...] }
//! { "type": "hybrid",     "steps": [...], "templates": [...] }
//! ```
//!
//! `WorkflowShape::from_value(&shape.to_value()) == Ok(shape)` for every
//! valid shape. The `type` tag selects the parser; unknown tags are rejected.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{json, Map, Value};

use crate::error::{require_text, DirectiveError};

type Object = Map<String, Value>;

fn invalid(message: impl Into<String>) -> DirectiveError {
    DirectiveError::invalid_argument(message)
}

fn as_object<'a>(value: &'a Value, what: &str) -> Result<&'a Object, DirectiveError> {
    value
        .as_object()
        .ok_or_else(|| invalid(format!("The {} must be an object.", what)))
}

fn required_str<'a>(object: &'a Object, key: &str, what: &str) -> Result<&'a str, DirectiveError> {
    object
        .get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| invalid(format!("Missing required key \"{}\" for {}.", key, what)))
}

fn optional_str(object: &Object, key: &str, what: &str) -> Result<Option<String>, DirectiveError> {
    match object.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(invalid(format!("Key \"{}\" for {} must be a string.", key, what))),
    }
}

fn required_array<'a>(
    object: &'a Object,
    key: &str,
    what: &str,
) -> Result<&'a Vec<Value>, DirectiveError> {
    match object.get(key) {
        Some(Value::Array(items)) => Ok(items),
        Some(_) => Err(invalid(format!("Key \"{}\" for {} must be an array.", key, what))),
        None => Err(invalid(format!("Missing required key \"{}\" for {}.", key, what))),
    }
}

fn parse_steps(items: &[Value]) -> Result<Vec<WorkflowStep>, DirectiveError> {
    items.iter().map(WorkflowStep::from_value).collect()
}

fn parse_templates(items: &[Value]) -> Result<Vec<Template>, DirectiveError> {
    items.iter().map(Template::from_value).collect()
}

fn steps_value(steps: &[WorkflowStep]) -> Value {
    Value::Array(steps.iter().map(WorkflowStep::to_value).collect())
}

fn templates_value(templates: &[Template]) -> Value {
    Value::Array(templates.iter().map(Template::to_value).collect())
}

// ============================================================================
// Nested values
// ============================================================================

/// What a workflow step does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepType {
    Action,
    Decision,
    Template,
    Validation,
}

impl StepType {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepType::Action => "action",
            StepType::Decision => "decision",
            StepType::Template => "template",
            StepType::Validation => "validation",
        }
    }
}

impl core::str::FromStr for StepType {
    type Err = DirectiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "action" => Ok(StepType::Action),
            "decision" => Ok(StepType::Decision),
            "template" => Ok(StepType::Template),
            "validation" => Ok(StepType::Validation),
            other => Err(invalid(format!("Unknown step type \"{}\".", other))),
        }
    }
}

/// A step inside a workflow shape (a plain value, not the `Step` entity)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowStep {
    order: u32,
    title: String,
    content: String,
    step_type: StepType,
    condition: Option<String>,
}

impl WorkflowStep {
    pub fn new(
        order: u32,
        title: impl Into<String>,
        content: impl Into<String>,
        step_type: StepType,
    ) -> Result<Self, DirectiveError> {
        let title = title.into();
        let content = content.into();
        if order == 0 {
            return Err(invalid("Workflow step order must be a positive integer."));
        }
        require_text("step title", &title)?;
        require_text("step content", &content)?;
        Ok(Self {
            order,
            title,
            content,
            step_type,
            condition: None,
        })
    }

    /// Builder: guard the step with a condition
    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }

    pub fn order(&self) -> u32 {
        self.order
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn step_type(&self) -> StepType {
        self.step_type
    }

    pub fn condition(&self) -> Option<&str> {
        self.condition.as_deref()
    }

    pub fn from_value(value: &Value) -> Result<Self, DirectiveError> {
        const WHAT: &str = "workflow step";
        let object = as_object(value, WHAT)?;
        let order = object
            .get("order")
            .and_then(Value::as_u64)
            .and_then(|o| u32::try_from(o).ok())
            .ok_or_else(|| invalid("Missing required key \"order\" for workflow step."))?;
        let step_type: StepType = required_str(object, "type", WHAT)?.parse()?;
        let step = Self::new(
            order,
            required_str(object, "title", WHAT)?,
            required_str(object, "content", WHAT)?,
            step_type,
        )?;
        Ok(Self {
            condition: optional_str(object, "condition", WHAT)?,
            ..step
        })
    }

    pub fn to_value(&self) -> Value {
        json!({
            "order": self.order,
            "title": self.title,
            "content": self.content,
            "type": self.step_type.as_str(),
            "condition": self.condition,
        })
    }
}

/// A reusable template inside a workflow shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    name: String,
    content: String,
    description: Option<String>,
}

impl Template {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Result<Self, DirectiveError> {
        let name = name.into();
        let content = content.into();
        require_text("template name", &name)?;
        require_text("template content", &content)?;
        Ok(Self {
            name,
            content,
            description: None,
        })
    }

    /// Builder: add description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn from_value(value: &Value) -> Result<Self, DirectiveError> {
        const WHAT: &str = "template";
        let object = as_object(value, WHAT)?;
        let template = Self::new(
            required_str(object, "name", WHAT)?,
            required_str(object, "content", WHAT)?,
        )?;
        Ok(Self {
            description: optional_str(object, "description", WHAT)?,
            ..template
        })
    }

    pub fn to_value(&self) -> Value {
        json!({
            "name": self.name,
            "content": self.content,
            "description": self.description,
        })
    }
}

// ============================================================================
// Variants
// ============================================================================

/// Ordered steps executed one after another
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequentialWorkflow {
    steps: Vec<WorkflowStep>,
}

impl SequentialWorkflow {
    pub const TYPE: &'static str = "sequential";

    pub fn create(steps: Vec<WorkflowStep>) -> Result<Self, DirectiveError> {
        if steps.is_empty() {
            return Err(invalid("A sequential workflow requires at least one step."));
        }
        Ok(Self { steps })
    }

    pub fn steps(&self) -> &[WorkflowStep] {
        &self.steps
    }

    fn from_state(state: &Object) -> Result<Self, DirectiveError> {
        let steps = required_array(state, "steps", "sequential workflow")?;
        Self::create(parse_steps(steps)?)
    }

    fn to_value(&self) -> Value {
        json!({ "type": Self::TYPE, "steps": steps_value(&self.steps) })
    }
}

/// A set of fill-in templates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateWorkflow {
    templates: Vec<Template>,
}

impl TemplateWorkflow {
    pub const TYPE: &'static str = "template";

    pub fn create(templates: Vec<Template>) -> Result<Self, DirectiveError> {
        if templates.is_empty() {
            return Err(invalid("A template workflow requires at least one template."));
        }
        Ok(Self { templates })
    }

    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    fn from_state(state: &Object) -> Result<Self, DirectiveError> {
        let templates = required_array(state, "templates", "template workflow")?;
        Self::create(parse_templates(templates)?)
    }

    fn to_value(&self) -> Value {
        json!({ "type": Self::TYPE, "templates": templates_value(&self.templates) })
    }
}

/// Items to tick off, in any order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecklistWorkflow {
    items: Vec<WorkflowStep>,
}

impl ChecklistWorkflow {
    pub const TYPE: &'static str = "checklist";

    pub fn create(items: Vec<WorkflowStep>) -> Result<Self, DirectiveError> {
        if items.is_empty() {
            return Err(invalid("A checklist workflow requires at least one item."));
        }
        Ok(Self { items })
    }

    pub fn items(&self) -> &[WorkflowStep] {
        &self.items
    }

    fn from_state(state: &Object) -> Result<Self, DirectiveError> {
        let items = required_array(state, "items", "checklist workflow")?;
        Self::create(parse_steps(items)?)
    }

    fn to_value(&self) -> Value {
        json!({ "type": Self::TYPE, "items": steps_value(&self.items) })
    }
}

/// Steps and templates mixed; either list may be empty, not both
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HybridWorkflow {
    steps: Vec<WorkflowStep>,
    templates: Vec<Template>,
}

impl HybridWorkflow {
    pub const TYPE: &'static str = "hybrid";

    pub fn create(steps: Vec<WorkflowStep>, templates: Vec<Template>) -> Result<Self, DirectiveError> {
        if steps.is_empty() && templates.is_empty() {
            return Err(invalid(
                "A hybrid workflow requires at least one step or template.",
            ));
        }
        Ok(Self { steps, templates })
    }

    pub fn steps(&self) -> &[WorkflowStep] {
        &self.steps
    }

    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    fn from_state(state: &Object) -> Result<Self, DirectiveError> {
        let steps = required_array(state, "steps", "hybrid workflow")?;
        let templates = required_array(state, "templates", "hybrid workflow")?;
        Self::create(parse_steps(steps)?, parse_templates(templates)?)
    }

    fn to_value(&self) -> Value {
        json!({
            "type": Self::TYPE,
            "steps": steps_value(&self.steps),
            "templates": templates_value(&self.templates),
        })
    }
}

// ============================================================================
// Tagged union
// ============================================================================

/// The shape of a Skill's workflow
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowShape {
    Sequential(SequentialWorkflow),
    Template(TemplateWorkflow),
    Checklist(ChecklistWorkflow),
    Hybrid(HybridWorkflow),
}

impl WorkflowShape {
    /// The discriminant written to the `type` key
    pub fn type_name(&self) -> &'static str {
        match self {
            WorkflowShape::Sequential(_) => SequentialWorkflow::TYPE,
            WorkflowShape::Template(_) => TemplateWorkflow::TYPE,
            WorkflowShape::Checklist(_) => ChecklistWorkflow::TYPE,
            WorkflowShape::Hybrid(_) => HybridWorkflow::TYPE,
        }
    }

    /// Parse a tagged structure, dispatching on its `type`
    pub fn from_value(state: &Value) -> Result<Self, DirectiveError> {
        let object = as_object(state, "workflow")?;
        let tag = object
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| invalid("Missing required key \"type\" for workflow."))?;

        match tag {
            SequentialWorkflow::TYPE => SequentialWorkflow::from_state(object).map(Self::Sequential),
            TemplateWorkflow::TYPE => TemplateWorkflow::from_state(object).map(Self::Template),
            ChecklistWorkflow::TYPE => ChecklistWorkflow::from_state(object).map(Self::Checklist),
            HybridWorkflow::TYPE => HybridWorkflow::from_state(object).map(Self::Hybrid),
            other => Err(invalid(format!("Unknown workflow type \"{}\".", other))),
        }
    }

    /// Exact inverse of `from_value`
    pub fn to_value(&self) -> Value {
        match self {
            WorkflowShape::Sequential(w) => w.to_value(),
            WorkflowShape::Template(w) => w.to_value(),
            WorkflowShape::Checklist(w) => w.to_value(),
            WorkflowShape::Hybrid(w) => w.to_value(),
        }
    }
}

impl From<SequentialWorkflow> for WorkflowShape {
    fn from(workflow: SequentialWorkflow) -> Self {
        WorkflowShape::Sequential(workflow)
    }
}

impl From<TemplateWorkflow> for WorkflowShape {
    fn from(workflow: TemplateWorkflow) -> Self {
        WorkflowShape::Template(workflow)
    }
}

impl From<ChecklistWorkflow> for WorkflowShape {
    fn from(workflow: ChecklistWorkflow) -> Self {
        WorkflowShape::Checklist(workflow)
    }
}

impl From<HybridWorkflow> for WorkflowShape {
    fn from(workflow: HybridWorkflow) -> Self {
        WorkflowShape::Hybrid(workflow)
    }
}

impl Serialize for WorkflowShape {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for WorkflowShape {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        WorkflowShape::from_value(&value).map_err(serde::de::Error::custom)
    }
}
