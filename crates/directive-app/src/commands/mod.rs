//! CLI Commands

pub mod directive;
pub mod example;
pub mod step;

use clap::Subcommand;
use directive_domain::DirectiveRepository;
use directive_usecase::DirectiveService;
use serde_json::Value;

pub use directive::{DraftArgs, ListArgs, UpdateArgs, UpdateMetadataArgs};
pub use example::ExampleCommand;
pub use step::StepCommand;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Draft a new rule, skill or workflow
    Draft(DraftArgs),
    /// Show one directive
    Show {
        /// Directive id
        id: String,
    },
    /// List directives
    List(ListArgs),
    /// Version-guarded content update
    Update(UpdateArgs),
    /// Rename or re-describe a directive
    UpdateMetadata(UpdateMetadataArgs),
    /// Publish a draft
    Publish {
        /// Directive id
        id: String,
    },
    /// Archive a directive
    Archive {
        /// Directive id
        id: String,
    },
    /// Delete a directive for good
    Delete {
        /// Directive id
        id: String,
    },
    /// Manage examples
    Example(ExampleCommand),
    /// Manage ordered steps of a skill or workflow
    Step(StepCommand),
}

impl Command {
    pub fn run<R: DirectiveRepository>(
        self,
        service: &mut DirectiveService<R>,
    ) -> anyhow::Result<Value> {
        match self {
            Command::Draft(args) => args.run(service),
            Command::Show { id } => directive::show(service, &id),
            Command::List(args) => args.run(service),
            Command::Update(args) => args.run(service),
            Command::UpdateMetadata(args) => args.run(service),
            Command::Publish { id } => directive::publish(service, &id),
            Command::Archive { id } => directive::archive(service, &id),
            Command::Delete { id } => directive::delete(service, &id),
            Command::Example(cmd) => cmd.run(service),
            Command::Step(cmd) => cmd.run(service),
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::Command;
    use clap::Parser;
    use directive_adapter::{
        FixedClock, InMemoryChangeLog, InMemoryDirectiveRepository, InMemoryEventSink,
        SequentialIdGenerator,
    };
    use directive_usecase::DirectiveService;
    use serde_json::Value;

    #[derive(Debug, Parser)]
    struct TestCli {
        #[command(subcommand)]
        command: Command,
    }

    pub(crate) struct Fixture {
        pub service: DirectiveService<InMemoryDirectiveRepository>,
        pub events: InMemoryEventSink,
        pub changes: InMemoryChangeLog,
    }

    pub(crate) fn fixture() -> Fixture {
        let events = InMemoryEventSink::new();
        let changes = InMemoryChangeLog::new(10);
        let service = DirectiveService::new(
            InMemoryDirectiveRepository::new(),
            Box::new(FixedClock::new(Default::default())),
            Box::new(SequentialIdGenerator::new()),
            Box::new(events.clone()),
            Box::new(changes.clone()),
        );
        Fixture {
            service,
            events,
            changes,
        }
    }

    impl Fixture {
        /// Parse a command line (without the binary name) and run it
        pub fn run(&mut self, line: &[&str]) -> anyhow::Result<Value> {
            let args = std::iter::once("directives").chain(line.iter().copied());
            let cli = TestCli::try_parse_from(args)?;
            cli.command.run(&mut self.service)
        }
    }
}
