//! Example - Illustration attached to a directive
//!
//! Rules carry good/bad contrasts, Skills and Workflows carry
//! scenario/input/output triples. Examples keep insertion order.

use serde::{Deserialize, Serialize};

use super::ids::ExampleId;
use crate::error::{require_text, DirectiveError};

/// The payload of an example; the variant must match the directive kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExampleContent {
    /// Rule example: at least one of `good` / `bad`
    Contrast {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        good: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        bad: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        explanation: Option<String>,
    },
    /// Skill/Workflow example: all three parts required
    Scenario {
        scenario: String,
        input: String,
        output: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        explanation: Option<String>,
    },
}

impl ExampleContent {
    pub fn contrast(
        good: Option<impl Into<String>>,
        bad: Option<impl Into<String>>,
        explanation: Option<impl Into<String>>,
    ) -> Self {
        ExampleContent::Contrast {
            good: good.map(Into::into),
            bad: bad.map(Into::into),
            explanation: explanation.map(Into::into),
        }
    }

    pub fn scenario(
        scenario: impl Into<String>,
        input: impl Into<String>,
        output: impl Into<String>,
        explanation: Option<impl Into<String>>,
    ) -> Self {
        ExampleContent::Scenario {
            scenario: scenario.into(),
            input: input.into(),
            output: output.into(),
            explanation: explanation.map(Into::into),
        }
    }

    pub fn is_contrast(&self) -> bool {
        matches!(self, ExampleContent::Contrast { .. })
    }

    pub fn explanation(&self) -> Option<&str> {
        match self {
            ExampleContent::Contrast { explanation, .. }
            | ExampleContent::Scenario { explanation, .. } => explanation.as_deref(),
        }
    }

    /// Check required fields
    pub fn validate(&self) -> Result<(), DirectiveError> {
        match self {
            ExampleContent::Contrast { good, bad, .. } => {
                let present = |v: &Option<String>| {
                    v.as_deref().map(|s| !s.trim().is_empty()).unwrap_or(false)
                };
                if !present(good) && !present(bad) {
                    return Err(DirectiveError::invalid_argument(
                        "At least one of good or bad example must be provided.",
                    ));
                }
                Ok(())
            }
            ExampleContent::Scenario {
                scenario,
                input,
                output,
                ..
            } => {
                require_text("scenario", scenario)?;
                require_text("input", input)?;
                require_text("output", output)
            }
        }
    }
}

/// An example owned by exactly one directive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Example {
    id: ExampleId,
    #[serde(flatten)]
    content: ExampleContent,
}

impl Example {
    /// Build a validated example
    pub fn new(id: ExampleId, content: ExampleContent) -> Result<Self, DirectiveError> {
        content.validate()?;
        Ok(Self { id, content })
    }

    pub fn id(&self) -> &ExampleId {
        &self.id
    }

    pub fn content(&self) -> &ExampleContent {
        &self.content
    }

    pub(crate) fn replace_content(&mut self, content: ExampleContent) {
        self.content = content;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contrast_requires_good_or_bad() {
        let only_bad = ExampleContent::contrast(None::<String>, Some("unwrap()"), None::<String>);
        assert!(only_bad.validate().is_ok());

        let neither = ExampleContent::contrast(None::<String>, Some("  "), Some("why"));
        assert_eq!(
            neither.validate().unwrap_err().to_string(),
            "At least one of good or bad example must be provided."
        );
    }

    #[test]
    fn test_scenario_requires_all_parts() {
        let ok = ExampleContent::scenario("Greeting", "hi", "hello", None::<String>);
        assert!(ok.validate().is_ok());

        let missing = ExampleContent::scenario("Greeting", "", "hello", None::<String>);
        assert_eq!(
            missing.validate().unwrap_err().to_string(),
            "The input must not be empty."
        );
    }

    #[test]
    fn test_example_serializes_flat() {
        let example = Example::new(
            ExampleId::new("e-1"),
            ExampleContent::contrast(Some("?"), None::<String>, Some("propagate")),
        )
        .unwrap();

        let json = serde_json::to_value(&example).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "e-1",
                "kind": "contrast",
                "good": "?",
                "explanation": "propagate"
            })
        );

        let back: Example = serde_json::from_value(json).unwrap();
        assert_eq!(back, example);
    }
}
