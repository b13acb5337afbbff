//! directives example add / update / remove

use anyhow::bail;
use clap::{Args, Subcommand};
use directive_domain::{DirectiveId, DirectiveRepository, ExampleContent, ExampleId};
use directive_usecase::{AddExample, DirectiveService, UpdateExample};
use serde_json::{json, Value};

use super::directive::render;

#[derive(Debug, Args)]
pub struct ExampleCommand {
    #[command(subcommand)]
    pub command: ExampleSubcommand,
}

#[derive(Debug, Subcommand)]
pub enum ExampleSubcommand {
    /// Add an example to a directive
    Add {
        /// Directive id
        directive: String,
        #[command(flatten)]
        content: ExampleArgs,
    },
    /// Replace the content of an example
    Update {
        /// Directive id
        directive: String,
        /// Example id
        example: String,
        #[command(flatten)]
        content: ExampleArgs,
    },
    /// Remove an example
    Remove {
        /// Directive id
        directive: String,
        /// Example id
        example: String,
    },
}

/// Rules take --good/--bad; skills and workflows take --scenario/--input/--output
#[derive(Debug, Args)]
pub struct ExampleArgs {
    #[arg(long)]
    pub good: Option<String>,
    #[arg(long)]
    pub bad: Option<String>,
    #[arg(long)]
    pub scenario: Option<String>,
    #[arg(long)]
    pub input: Option<String>,
    #[arg(long)]
    pub output: Option<String>,
    #[arg(long)]
    pub explanation: Option<String>,
}

impl ExampleArgs {
    pub fn into_content(self) -> anyhow::Result<ExampleContent> {
        let scenario_given =
            self.scenario.is_some() || self.input.is_some() || self.output.is_some();
        let contrast_given = self.good.is_some() || self.bad.is_some();

        match (contrast_given, scenario_given) {
            (true, true) => bail!("Use either --good/--bad or --scenario/--input/--output, not both"),
            (false, true) => Ok(ExampleContent::scenario(
                self.scenario.unwrap_or_default(),
                self.input.unwrap_or_default(),
                self.output.unwrap_or_default(),
                self.explanation,
            )),
            _ => Ok(ExampleContent::contrast(self.good, self.bad, self.explanation)),
        }
    }
}

impl ExampleCommand {
    pub fn run<R: DirectiveRepository>(
        self,
        service: &mut DirectiveService<R>,
    ) -> anyhow::Result<Value> {
        match self.command {
            ExampleSubcommand::Add { directive, content } => {
                let example_id = service.add_example(AddExample {
                    directive_id: DirectiveId::new(directive),
                    content: content.into_content()?,
                })?;
                Ok(json!({ "exampleId": example_id }))
            }
            ExampleSubcommand::Update {
                directive,
                example,
                content,
            } => {
                let directive_id = DirectiveId::new(directive);
                service.update_example(UpdateExample {
                    directive_id: directive_id.clone(),
                    example_id: ExampleId::new(example),
                    content: content.into_content()?,
                })?;
                render(&service.get(&directive_id)?)
            }
            ExampleSubcommand::Remove { directive, example } => {
                let directive_id = DirectiveId::new(directive);
                service.remove_example(&directive_id, &ExampleId::new(example))?;
                render(&service.get(&directive_id)?)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::commands::testing::fixture;
    use directive_usecase::CommandError;

    #[test]
    fn test_rule_example_lifecycle() {
        let mut f = fixture();
        f.run(&["draft", "my-rule", "-k", "rule", "-n", "Rule"]).unwrap();

        let added = f
            .run(&["example", "add", "my-rule", "--good", "a?", "--explanation", "propagate"])
            .unwrap();
        let id = added["exampleId"].as_str().unwrap().to_string();

        let updated = f
            .run(&["example", "update", "my-rule", &id, "--bad", "a.unwrap()"])
            .unwrap();
        assert_eq!(updated["body"]["examples"][0]["bad"], "a.unwrap()");
        assert_eq!(updated["lifecycle"]["version"], 1);

        let removed = f.run(&["example", "remove", "my-rule", &id]).unwrap();
        assert!(removed["body"]["examples"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_scenario_example_on_skill() {
        let mut f = fixture();
        f.run(&["draft", "review", "-k", "skill", "-n", "Review"]).unwrap();

        f.run(&[
            "example", "add", "review", "--scenario", "Small PR", "--input", "diff", "--output",
            "LGTM",
        ])
        .unwrap();

        let shown = f.run(&["show", "review"]).unwrap();
        assert_eq!(shown["body"]["examples"][0]["kind"], "scenario");
    }

    #[test]
    fn test_empty_contrast_is_invalid() {
        let mut f = fixture();
        f.run(&["draft", "my-rule", "-k", "rule", "-n", "Rule"]).unwrap();

        let err = f.run(&["example", "add", "my-rule"]).unwrap_err();

        let err = err.downcast::<CommandError>().unwrap();
        assert!(err.is_invalid_argument());
        assert_eq!(
            err.to_string(),
            "At least one of good or bad example must be provided."
        );
    }

    #[test]
    fn test_mixed_flags_are_rejected() {
        let mut f = fixture();
        f.run(&["draft", "my-rule", "-k", "rule", "-n", "Rule"]).unwrap();

        let err = f
            .run(&["example", "add", "my-rule", "--good", "a?", "--scenario", "s"])
            .unwrap_err();

        assert!(err.to_string().contains("not both"));
    }
}
