use crate::azure::{models::WorkItem, work_items};
use crate::error::Result;
use crate::mcp::context::ToolContext;
use crate::query::require_ids;
use rmcp::{
    schemars::{self, JsonSchema},
    serde::Deserialize,
};

#[derive(Deserialize, JsonSchema)]
pub struct GetWorkItemsArgs {
    /// Work item IDs, returned in this order
    pub ids: Vec<u32>,
    /// Project name (defaults to the configured project)
    #[serde(default)]
    pub project: Option<String>,
}

pub async fn get_work_items(ctx: ToolContext, args: GetWorkItemsArgs) -> Result<Vec<WorkItem>> {
    log::info!("Tool invoked: get_work_items(ids={:?})", args.ids);
    require_ids(&args.ids)?;

    let project = ctx.project_or_default(args.project.as_deref());
    work_items::fetch_items(ctx.api(), &args.ids, Some(&project)).await
}
