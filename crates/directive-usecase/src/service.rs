//! DirectiveService - The command surface of the directive core
//!
//! Stateless apart from its ports: every call loads the aggregate, applies
//! exactly one domain operation, drains its events, writes it back with a
//! conditional save keyed on the revision read at load, and only then
//! dispatches those events. A failed or no-op operation writes nothing and
//! emits nothing. Stored aggregates never carry pending events.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use directive_domain::{
    Clock, Directive, DirectiveChanges, DirectiveError, DirectiveEvent, DirectiveFilter,
    DirectiveId, DirectiveRepository, EventSink, Example, ExampleId, IdGenerator, Step, StepId,
};

use crate::change::{ChangeRecord, ChangeRecorder};
use crate::command::{
    AddExample, CreateStep, DraftDirective, MoveStepAfter, UpdateDirective, UpdateExample,
    UpdateMetadata, UpdateStep,
};
use crate::error::CommandError;

pub struct DirectiveService<R> {
    repository: R,
    clock: Box<dyn Clock>,
    ids: Box<dyn IdGenerator>,
    events: Box<dyn EventSink>,
    changes: Box<dyn ChangeRecorder>,
}

impl<R: DirectiveRepository> DirectiveService<R> {
    pub fn new(
        repository: R,
        clock: Box<dyn Clock>,
        ids: Box<dyn IdGenerator>,
        events: Box<dyn EventSink>,
        changes: Box<dyn ChangeRecorder>,
    ) -> Self {
        Self {
            repository,
            clock,
            ids,
            events,
            changes,
        }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    // ========== Queries ==========

    pub fn get(&self, id: &DirectiveId) -> Result<Directive, CommandError> {
        self.load(id)
    }

    pub fn list(&self, filter: &DirectiveFilter) -> Result<Vec<Directive>, CommandError> {
        Ok(self.repository.list(filter)?)
    }

    // ========== Lifecycle ==========

    pub fn draft(&mut self, command: DraftDirective) -> Result<Directive, CommandError> {
        let id = DirectiveId::parse(command.id)?;
        let mut directive = Directive::draft(
            id,
            command.kind,
            command.name,
            command.description,
            command.content,
            self.clock.now(),
        )?;

        let events = directive.take_events();
        self.repository.insert(&directive)?;
        self.dispatch_events(&directive, events);
        Ok(directive)
    }

    pub fn publish(&mut self, id: &DirectiveId) -> Result<Directive, CommandError> {
        let (directive, ()) = self.mutate(id, |d, now| d.publish(now))?;
        Ok(directive)
    }

    pub fn archive(&mut self, id: &DirectiveId) -> Result<Directive, CommandError> {
        let (directive, ()) = self.mutate(id, |d, now| d.archive(now))?;
        Ok(directive)
    }

    /// Remove a directive for good; later loads fail with `NotFound`
    pub fn delete(&mut self, id: &DirectiveId) -> Result<(), CommandError> {
        self.load(id)?;
        self.repository.delete(id)?;
        info!(directive_id = %id, "directive deleted");
        Ok(())
    }

    // ========== Content ==========

    pub fn update_metadata(&mut self, command: UpdateMetadata) -> Result<Directive, CommandError> {
        let UpdateMetadata {
            directive_id,
            name,
            description,
        } = command;
        let (directive, ()) =
            self.mutate(&directive_id, |d, now| d.update_metadata(name, description, now))?;
        Ok(directive)
    }

    /// Version-guarded update; the pre-update snapshot goes to the change recorder
    pub fn update(&mut self, command: UpdateDirective) -> Result<Directive, CommandError> {
        let examples = match command.examples {
            Some(contents) => Some(
                contents
                    .into_iter()
                    .map(|content| Example::new(self.ids.example_id(), content))
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            None => None,
        };
        let changes = DirectiveChanges {
            content: command.content,
            description: command.description,
            examples,
            workflow: command.workflow,
        };
        let expected_version = command.expected_version;

        let (directive, snapshot) = self.mutate(&command.directive_id, |d, now| {
            d.update(expected_version, changes, now)
        })?;

        let change = ChangeRecord {
            changed_fields: snapshot.changed_fields(&directive),
            new_version: directive.version(),
            recorded_at: self.clock.now(),
            snapshot,
        };
        debug!(
            directive_id = %directive.id(),
            from = change.previous_version(),
            to = change.new_version,
            fields = ?change.changed_fields,
            "change recorded"
        );
        self.changes.record(change);
        Ok(directive)
    }

    // ========== Examples ==========

    pub fn add_example(&mut self, command: AddExample) -> Result<ExampleId, CommandError> {
        let example_id = self.ids.example_id();
        let id = example_id.clone();
        self.mutate(&command.directive_id, |d, now| {
            d.add_example(id, command.content, now)
        })?;
        Ok(example_id)
    }

    pub fn update_example(&mut self, command: UpdateExample) -> Result<(), CommandError> {
        let UpdateExample {
            directive_id,
            example_id,
            content,
        } = command;
        self.mutate(&directive_id, |d, now| d.update_example(&example_id, content, now))?;
        Ok(())
    }

    pub fn remove_example(
        &mut self,
        directive_id: &DirectiveId,
        example_id: &ExampleId,
    ) -> Result<(), CommandError> {
        self.mutate(directive_id, |d, now| d.remove_example(example_id, now))?;
        Ok(())
    }

    // ========== Steps ==========

    pub fn create_step(&mut self, command: CreateStep) -> Result<StepId, CommandError> {
        let after = self.resolve_step(command.after_step_id.as_ref())?;
        let step_id = self.ids.step_id();
        let id = step_id.clone();

        let (_, order) = self.mutate(&command.directive_id, |d, now| {
            d.create_step(id, command.content, after.as_ref(), now)
        })?;
        debug!(step_id = %step_id, order, "step created");
        Ok(step_id)
    }

    pub fn update_step(&mut self, command: UpdateStep) -> Result<(), CommandError> {
        let UpdateStep {
            directive_id,
            step_id,
            content,
        } = command;
        self.mutate(&directive_id, |d, now| d.update_step(&step_id, content, now))?;
        Ok(())
    }

    /// Returns `false` when the step was already in place
    pub fn move_step_after(&mut self, command: MoveStepAfter) -> Result<bool, CommandError> {
        let step = self
            .resolve_step(Some(&command.step_id))?
            .ok_or_else(|| step_not_found(&command.step_id))?;
        let after = self.resolve_step(command.after_step_id.as_ref())?;

        let (_, moved) = self.mutate(&command.directive_id, |d, now| {
            d.move_step_after(&step, after.as_ref(), now)
        })?;
        Ok(moved)
    }

    pub fn remove_step(
        &mut self,
        directive_id: &DirectiveId,
        step_id: &StepId,
    ) -> Result<(), CommandError> {
        self.mutate(directive_id, |d, now| d.remove_step(step_id, now))?;
        Ok(())
    }

    // ========== Internals ==========

    fn load(&self, id: &DirectiveId) -> Result<Directive, CommandError> {
        debug!(directive_id = %id, "loading directive");
        self.repository.find_by_id(id)?.ok_or_else(|| {
            DirectiveError::not_found(format!("Directive \"{}\" not found.", id)).into()
        })
    }

    fn resolve_step(&self, id: Option<&StepId>) -> Result<Option<Step>, CommandError> {
        match id {
            None => Ok(None),
            Some(id) => match self.repository.find_step(id)? {
                Some(step) => Ok(Some(step)),
                None => Err(step_not_found(id)),
            },
        }
    }

    /// Load, apply, take events, conditionally save, then dispatch
    fn mutate<T>(
        &mut self,
        id: &DirectiveId,
        apply: impl FnOnce(&mut Directive, DateTime<Utc>) -> Result<T, DirectiveError>,
    ) -> Result<(Directive, T), CommandError> {
        let mut directive = self.load(id)?;
        let loaded_revision = directive.revision();

        let output = apply(&mut directive, self.clock.now()).map_err(|err| {
            if err.is_version_conflict() {
                warn!(directive_id = %id, error = %err, "stale update rejected");
            }
            err
        })?;

        let events = directive.take_events();
        if events.is_empty() {
            debug!(directive_id = %id, "nothing changed");
            return Ok((directive, output));
        }

        self.repository
            .save(&directive, loaded_revision)
            .map_err(|err| {
                warn!(directive_id = %id, error = %err, "save rejected");
                CommandError::from(err)
            })?;
        self.dispatch_events(&directive, events);
        Ok((directive, output))
    }

    fn dispatch_events(&mut self, directive: &Directive, events: Vec<DirectiveEvent>) {
        for event in events {
            info!(
                directive_id = %event.directive_id(),
                version = directive.version(),
                event = event.name(),
                "directive event"
            );
            self.events.record(event);
        }
    }
}

fn step_not_found(id: &StepId) -> CommandError {
    DirectiveError::not_found(format!("Step \"{}\" not found.", id)).into()
}
