//! directives step create / update / move / remove

use clap::{Args, Subcommand};
use directive_domain::{DirectiveId, DirectiveRepository, StepId};
use directive_usecase::{CreateStep, DirectiveService, MoveStepAfter, UpdateStep};
use serde_json::{json, Value};

use super::directive::render;

#[derive(Debug, Args)]
pub struct StepCommand {
    #[command(subcommand)]
    pub command: StepSubcommand,
}

#[derive(Debug, Subcommand)]
pub enum StepSubcommand {
    /// Insert a step (first, unless --after is given)
    Create {
        /// Directive id
        directive: String,
        /// Step content
        content: String,
        /// Insert right after this step
        #[arg(long)]
        after: Option<String>,
    },
    /// Replace the content of a step
    Update {
        directive: String,
        step: String,
        content: String,
    },
    /// Move a step (to the front, unless --after is given)
    Move {
        directive: String,
        step: String,
        /// Place right after this step
        #[arg(long)]
        after: Option<String>,
    },
    /// Remove a step and close the gap
    Remove { directive: String, step: String },
}

impl StepCommand {
    pub fn run<R: DirectiveRepository>(
        self,
        service: &mut DirectiveService<R>,
    ) -> anyhow::Result<Value> {
        match self.command {
            StepSubcommand::Create {
                directive,
                content,
                after,
            } => {
                let step_id = service.create_step(CreateStep {
                    directive_id: DirectiveId::new(directive),
                    content,
                    after_step_id: after.map(StepId::new),
                })?;
                Ok(json!({ "stepId": step_id }))
            }
            StepSubcommand::Update {
                directive,
                step,
                content,
            } => {
                let directive_id = DirectiveId::new(directive);
                service.update_step(UpdateStep {
                    directive_id: directive_id.clone(),
                    step_id: StepId::new(step),
                    content,
                })?;
                render(&service.get(&directive_id)?)
            }
            StepSubcommand::Move {
                directive,
                step,
                after,
            } => {
                let moved = service.move_step_after(MoveStepAfter {
                    directive_id: DirectiveId::new(directive),
                    step_id: StepId::new(step),
                    after_step_id: after.map(StepId::new),
                })?;
                Ok(json!({ "moved": moved }))
            }
            StepSubcommand::Remove { directive, step } => {
                let directive_id = DirectiveId::new(directive);
                service.remove_step(&directive_id, &StepId::new(step))?;
                render(&service.get(&directive_id)?)
            }
        }
    }
}
