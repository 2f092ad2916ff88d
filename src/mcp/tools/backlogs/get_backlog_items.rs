use crate::azure::{backlogs, models::WorkItem};
use crate::error::Result;
use crate::mcp::context::ToolContext;
use crate::mcp::tools::support::deserialize_non_empty_string;
use rmcp::{
    schemars::{self, JsonSchema},
    serde::Deserialize,
};

#[derive(Deserialize, JsonSchema)]
pub struct GetBacklogItemsArgs {
    /// Team name
    #[serde(alias = "team_name", deserialize_with = "deserialize_non_empty_string")]
    pub team: String,
    /// Project name (defaults to the configured project)
    #[serde(default)]
    pub project: Option<String>,
    #[serde(default)]
    pub max_results: Option<usize>,
}

pub async fn get_backlog_items(ctx: ToolContext, args: GetBacklogItemsArgs) -> Result<Vec<WorkItem>> {
    log::info!(
        "Tool invoked: get_backlog_items(team={}, project={:?})",
        args.team,
        args.project
    );

    let project = ctx.project_or_default(args.project.as_deref());
    backlogs::get_backlog_items(
        ctx.api(),
        &ctx.settings,
        &project,
        Some(&args.team),
        args.max_results,
    )
    .await
}
