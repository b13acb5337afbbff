//! directives draft / show / list / update / publish / archive / delete

use anyhow::Context;
use clap::Args;
use directive_domain::{
    Directive, DirectiveFilter, DirectiveId, DirectiveKind, DirectiveRepository, DirectiveState,
    ExampleContent, WorkflowShape,
};
use directive_usecase::{DirectiveService, DraftDirective, UpdateDirective, UpdateMetadata};
use serde_json::{json, Value};

#[derive(Debug, Args)]
pub struct DraftArgs {
    /// Directive id (lowercase letters, digits and hyphens)
    pub id: String,
    /// rule, skill or workflow
    #[arg(short, long)]
    pub kind: DirectiveKind,
    /// Display name
    #[arg(short, long)]
    pub name: String,
    #[arg(short, long, default_value = "")]
    pub description: String,
    /// Body text of the directive
    #[arg(long, default_value = "")]
    pub content: String,
}

impl DraftArgs {
    pub fn run<R: DirectiveRepository>(
        self,
        service: &mut DirectiveService<R>,
    ) -> anyhow::Result<Value> {
        let directive = service.draft(DraftDirective {
            id: self.id,
            kind: self.kind,
            name: self.name,
            description: self.description,
            content: self.content,
        })?;
        render(&directive)
    }
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Only this kind
    #[arg(short, long)]
    pub kind: Option<DirectiveKind>,
    /// Only this state (draft, published, archived)
    #[arg(short, long)]
    pub state: Option<DirectiveState>,
}

impl ListArgs {
    pub fn run<R: DirectiveRepository>(
        self,
        service: &mut DirectiveService<R>,
    ) -> anyhow::Result<Value> {
        let directives = service.list(&DirectiveFilter {
            kind: self.kind,
            state: self.state,
        })?;
        Ok(serde_json::to_value(&directives)?)
    }
}

#[derive(Debug, Args)]
pub struct UpdateArgs {
    /// Directive id
    pub id: String,
    /// Version the caller last read
    #[arg(long)]
    pub expected_version: u32,
    #[arg(long)]
    pub content: Option<String>,
    #[arg(short, long)]
    pub description: Option<String>,
    /// JSON array replacing every example, e.g. '[{"kind":"contrast","good":"a?"}]'
    #[arg(long)]
    pub examples: Option<String>,
    /// JSON workflow shape (skills only), e.g. '{"type":"checklist","items":[...]}'
    #[arg(long)]
    pub workflow: Option<String>,
}

impl UpdateArgs {
    pub fn run<R: DirectiveRepository>(
        self,
        service: &mut DirectiveService<R>,
    ) -> anyhow::Result<Value> {
        let mut command = UpdateDirective::new(DirectiveId::new(self.id), self.expected_version);
        if let Some(content) = self.content {
            command = command.with_content(content);
        }
        if let Some(description) = self.description {
            command = command.with_description(description);
        }
        if let Some(examples) = self.examples {
            let examples: Vec<ExampleContent> = serde_json::from_str(&examples)
                .context("--examples must be a JSON array of examples")?;
            command = command.with_examples(examples);
        }
        if let Some(workflow) = self.workflow {
            let workflow: WorkflowShape =
                serde_json::from_str(&workflow).context("--workflow is not a valid workflow")?;
            command = command.with_workflow(workflow);
        }

        let directive = service.update(command)?;
        render(&directive)
    }
}

#[derive(Debug, Args)]
pub struct UpdateMetadataArgs {
    /// Directive id
    pub id: String,
    #[arg(short, long)]
    pub name: Option<String>,
    #[arg(short, long)]
    pub description: Option<String>,
}

impl UpdateMetadataArgs {
    pub fn run<R: DirectiveRepository>(
        self,
        service: &mut DirectiveService<R>,
    ) -> anyhow::Result<Value> {
        let directive = service.update_metadata(UpdateMetadata {
            directive_id: DirectiveId::new(self.id),
            name: self.name,
            description: self.description,
        })?;
        render(&directive)
    }
}

pub fn show<R: DirectiveRepository>(service: &DirectiveService<R>, id: &str) -> anyhow::Result<Value> {
    render(&service.get(&DirectiveId::new(id))?)
}

pub fn publish<R: DirectiveRepository>(
    service: &mut DirectiveService<R>,
    id: &str,
) -> anyhow::Result<Value> {
    render(&service.publish(&DirectiveId::new(id))?)
}

pub fn archive<R: DirectiveRepository>(
    service: &mut DirectiveService<R>,
    id: &str,
) -> anyhow::Result<Value> {
    render(&service.archive(&DirectiveId::new(id))?)
}

pub fn delete<R: DirectiveRepository>(
    service: &mut DirectiveService<R>,
    id: &str,
) -> anyhow::Result<Value> {
    service.delete(&DirectiveId::new(id))?;
    Ok(json!({ "deleted": id }))
}

pub(crate) fn render(directive: &Directive) -> anyhow::Result<Value> {
    Ok(serde_json::to_value(directive)?)
}

#[cfg(test)]
mod tests {
    use crate::commands::testing::fixture;
    use directive_usecase::CommandError;

    #[test]
    fn test_draft_publish_archive() {
        let mut f = fixture();

        let drafted = f
            .run(&["draft", "my-rule", "--kind", "rule", "--name", "Prefer ?"])
            .unwrap();
        assert_eq!(drafted["id"], "my-rule");
        assert_eq!(drafted["lifecycle"]["state"], "draft");

        f.run(&["publish", "my-rule"]).unwrap();
        let archived = f.run(&["archive", "my-rule"]).unwrap();
        assert_eq!(archived["lifecycle"]["state"], "archived");

        let names: Vec<_> = f.events.events().iter().map(|e| e.name()).collect();
        assert_eq!(
            names,
            vec!["DirectiveDrafted", "DirectivePublished", "DirectiveArchived"]
        );
    }

    #[test]
    fn test_update_with_examples_records_change() {
        let mut f = fixture();
        f.run(&["draft", "my-rule", "-k", "rule", "-n", "Rule"]).unwrap();

        let updated = f
            .run(&[
                "update",
                "my-rule",
                "--expected-version",
                "1",
                "--content",
                "Use ? to propagate",
                "--examples",
                r#"[{"kind":"contrast","good":"a?","bad":"a.unwrap()"}]"#,
            ])
            .unwrap();

        assert_eq!(updated["lifecycle"]["version"], 2);
        assert_eq!(updated["content"], "Use ? to propagate");
        assert_eq!(f.changes.stats().total_entries, 1);
    }

    #[test]
    fn test_stale_update_is_a_version_conflict() {
        let mut f = fixture();
        f.run(&["draft", "my-rule", "-k", "rule", "-n", "Rule"]).unwrap();
        f.run(&["update", "my-rule", "--expected-version", "1", "--content", "X"])
            .unwrap();

        let err = f
            .run(&["update", "my-rule", "--expected-version", "1", "--content", "Y"])
            .unwrap_err();

        let err = err.downcast::<CommandError>().unwrap();
        assert!(err.is_version_conflict());
    }

    #[test]
    fn test_workflow_only_for_skills() {
        let mut f = fixture();
        f.run(&["draft", "review", "-k", "skill", "-n", "Review"]).unwrap();
        f.run(&["draft", "deploy", "-k", "workflow", "-n", "Deploy"]).unwrap();
        let shape = r#"{"type":"checklist","items":[{"order":1,"title":"Tests","content":"cargo test","type":"validation"}]}"#;

        let skill = f
            .run(&["update", "review", "--expected-version", "1", "--workflow", shape])
            .unwrap();
        assert_eq!(skill["body"]["workflow"]["type"], "checklist");

        let err = f
            .run(&["update", "deploy", "--expected-version", "1", "--workflow", shape])
            .unwrap_err();
        assert!(err.downcast::<CommandError>().unwrap().is_invalid_argument());
    }

    #[test]
    fn test_list_filters_and_delete() {
        let mut f = fixture();
        f.run(&["draft", "a-rule", "-k", "rule", "-n", "A"]).unwrap();
        f.run(&["draft", "review", "-k", "skill", "-n", "Review"]).unwrap();
        f.run(&["publish", "review"]).unwrap();

        let skills = f.run(&["list", "--kind", "skill"]).unwrap();
        assert_eq!(skills.as_array().unwrap().len(), 1);
        let drafts = f.run(&["list", "--state", "draft"]).unwrap();
        assert_eq!(drafts[0]["id"], "a-rule");

        f.run(&["delete", "a-rule"]).unwrap();
        let err = f.run(&["show", "a-rule"]).unwrap_err();
        assert!(err.downcast::<CommandError>().unwrap().is_not_found());
    }

    #[test]
    fn test_update_metadata_on_archived_fails() {
        let mut f = fixture();
        f.run(&["draft", "my-rule", "-k", "rule", "-n", "Rule"]).unwrap();
        f.run(&["publish", "my-rule"]).unwrap();
        f.run(&["archive", "my-rule"]).unwrap();

        let err = f
            .run(&["update-metadata", "my-rule", "--name", "x"])
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Cannot perform this action on an archived directive."
        );
        let shown = f.run(&["show", "my-rule"]).unwrap();
        assert_eq!(shown["name"], "Rule");
    }

    #[test]
    fn test_unknown_kind_is_rejected_by_parser() {
        let mut f = fixture();
        assert!(f
            .run(&["draft", "x", "--kind", "policy", "--name", "X"])
            .is_err());
    }
}
