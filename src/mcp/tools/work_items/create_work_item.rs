use crate::azure::{models::WorkItem, work_items};
use crate::error::Result;
use crate::mcp::context::ToolContext;
use crate::mcp::tools::support::{deserialize_non_empty_string, deserialize_optional_trimmed};
use rmcp::{
    schemars::{self, JsonSchema},
    serde::Deserialize,
};
use serde_json::{Value, json};

#[derive(Deserialize, JsonSchema)]
pub struct CreateWorkItemArgs {
    // Required fields
    /// Type of work item (Bug, User Story, Task, Epic, Feature, etc.)
    #[serde(deserialize_with = "deserialize_non_empty_string")]
    pub work_item_type: String,

    /// Work item title
    #[serde(deserialize_with = "deserialize_non_empty_string")]
    pub title: String,

    /// Work item description (Basic HTML supported)
    #[serde(default)]
    pub description: Option<String>,

    /// User to assign the work item to (email or display name)
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    pub assigned_to: Option<String>,

    /// Area path (e.g., "MyProject\\Team1")
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    pub area_path: Option<String>,

    /// Iteration path (e.g., "MyProject\\Sprint 1")
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    pub iteration_path: Option<String>,

    /// Initial state (New, Active, etc.)
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    pub state: Option<String>,

    /// Priority (1-4, where 1 is highest)
    #[serde(default)]
    pub priority: Option<u32>,

    /// Semicolon-separated tags
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    pub tags: Option<String>,

    /// Project name (defaults to the configured project)
    #[serde(default)]
    pub project: Option<String>,
}

impl CreateWorkItemArgs {
    /// Fields to set, keyed by reference name. Only supplied values are sent.
    fn fields(&self) -> Vec<(&'static str, Value)> {
        let mut fields = vec![("System.Title", json!(self.title))];

        if let Some(description) = &self.description {
            fields.push(("System.Description", json!(description)));
        }
        if let Some(assigned_to) = &self.assigned_to {
            fields.push(("System.AssignedTo", json!(assigned_to)));
        }
        if let Some(area_path) = &self.area_path {
            fields.push(("System.AreaPath", json!(area_path)));
        }
        if let Some(iteration_path) = &self.iteration_path {
            fields.push(("System.IterationPath", json!(iteration_path)));
        }
        if let Some(state) = &self.state {
            fields.push(("System.State", json!(state)));
        }
        if let Some(priority) = self.priority {
            fields.push(("Microsoft.VSTS.Common.Priority", json!(priority)));
        }
        if let Some(tags) = &self.tags {
            fields.push(("System.Tags", json!(tags)));
        }

        fields
    }
}

pub async fn create_work_item(ctx: ToolContext, args: CreateWorkItemArgs) -> Result<WorkItem> {
    log::info!(
        "Tool invoked: create_work_item(work_item_type={}, title={}, area_path={:?}, iteration_path={:?})",
        args.work_item_type,
        args.title,
        args.area_path,
        args.iteration_path,
    );

    let project = ctx.project_or_default(args.project.as_deref());
    let fields = args.fields();
    work_items::create_item(ctx.api(), &project, &args.work_item_type, &fields).await
}
