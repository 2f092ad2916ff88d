use crate::azure::{models::WorkItem, work_items};
use crate::error::Result;
use crate::mcp::context::ToolContext;
use rmcp::{
    schemars::{self, JsonSchema},
    serde::Deserialize,
};
use serde_json::json;

#[derive(Deserialize, JsonSchema)]
pub struct UpdateWorkItemDescriptionArgs {
    /// Work item ID
    pub id: u32,
    /// New description (Basic HTML supported); an empty string clears it
    pub description: String,
    #[serde(default)]
    pub project: Option<String>,
}

pub async fn update_work_item_description(
    ctx: ToolContext,
    args: UpdateWorkItemDescriptionArgs,
) -> Result<WorkItem> {
    log::info!(
        "Tool invoked: update_work_item_description(id={}, description_length={})",
        args.id,
        args.description.len()
    );

    let project = ctx.project_or_default(args.project.as_deref());
    work_items::update_field(
        ctx.api(),
        &project,
        args.id,
        "System.Description",
        json!(args.description),
    )
    .await
}
