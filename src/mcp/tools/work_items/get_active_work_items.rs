use crate::azure::models::WorkItem;
use crate::error::Result;
use crate::mcp::context::ToolContext;
use crate::mcp::tools::support::run_filter;
use crate::query::QueryFilter;
use rmcp::{
    schemars::{self, JsonSchema},
    serde::Deserialize,
};

#[derive(Deserialize, JsonSchema, Default)]
pub struct GetActiveWorkItemsArgs {
    #[serde(default)]
    pub project: Option<String>,
    #[serde(default)]
    pub max_results: Option<usize>,
}

/// Everything the configured defaults select: default types and paths,
/// minus the excluded states.
pub async fn get_active_work_items(
    ctx: ToolContext,
    args: GetActiveWorkItemsArgs,
) -> Result<Vec<WorkItem>> {
    log::info!(
        "Tool invoked: get_active_work_items(project={:?})",
        args.project
    );

    let filter = QueryFilter {
        project: args.project,
        max_results: args.max_results,
        allow_unfiltered: true,
        ..Default::default()
    };
    run_filter(&ctx, &filter).await
}
