use crate::azure::{models::WorkItem, work_items};
use crate::error::Result;
use crate::mcp::context::ToolContext;
use crate::mcp::tools::support::deserialize_non_empty_string;
use rmcp::{
    schemars::{self, JsonSchema},
    serde::Deserialize,
};
use serde_json::json;

#[derive(Deserialize, JsonSchema)]
pub struct UpdateWorkItemTitleArgs {
    /// Work item ID
    pub id: u32,
    /// New title
    #[serde(deserialize_with = "deserialize_non_empty_string")]
    pub title: String,
    #[serde(default)]
    pub project: Option<String>,
}

pub async fn update_work_item_title(
    ctx: ToolContext,
    args: UpdateWorkItemTitleArgs,
) -> Result<WorkItem> {
    log::info!(
        "Tool invoked: update_work_item_title(id={}, title={})",
        args.id,
        args.title
    );

    let project = ctx.project_or_default(args.project.as_deref());
    work_items::update_field(ctx.api(), &project, args.id, "System.Title", json!(args.title)).await
}
