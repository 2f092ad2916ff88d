use crate::azure::models::WorkItem;
use crate::error::Result;
use crate::mcp::context::ToolContext;
use crate::mcp::tools::work_items::{
    GetActiveWorkItemsArgs, GetMyWorkItemsArgs, get_active_work_items, get_my_work_items,
};
use rmcp::{
    schemars::{self, JsonSchema},
    serde::Deserialize,
};

#[derive(Deserialize, JsonSchema)]
pub struct GetDefaultWorkItemsArgs {
    #[serde(default)]
    pub project: Option<String>,
    #[serde(default)]
    pub max_results: Option<usize>,
}

/// The configured user's items when a default user is set, otherwise all
/// active items.
pub async fn get_default_work_items(
    ctx: ToolContext,
    args: GetDefaultWorkItemsArgs,
) -> Result<Vec<WorkItem>> {
    log::info!(
        "Tool invoked: get_default_work_items(project={:?})",
        args.project
    );

    if ctx.settings.default_user.is_some() {
        let args = GetMyWorkItemsArgs {
            project: args.project,
            max_results: args.max_results,
            ..Default::default()
        };
        get_my_work_items(ctx, args).await
    } else {
        let args = GetActiveWorkItemsArgs {
            project: args.project,
            max_results: args.max_results,
        };
        get_active_work_items(ctx, args).await
    }
}
