use crate::azure::{backlogs, models::WorkItem};
use crate::error::Result;
use crate::mcp::context::ToolContext;
use rmcp::{
    schemars::{self, JsonSchema},
    serde::Deserialize,
};

#[derive(Deserialize, JsonSchema)]
pub struct GetDefaultBacklogArgs {
    #[serde(default)]
    pub project: Option<String>,
    #[serde(default)]
    pub max_results: Option<usize>,
}

/// Backlog of the configured default team, or of the project's default
/// team when none is configured.
pub async fn get_default_backlog(
    ctx: ToolContext,
    args: GetDefaultBacklogArgs,
) -> Result<Vec<WorkItem>> {
    log::info!(
        "Tool invoked: get_default_backlog(project={:?}, team={:?})",
        args.project,
        ctx.settings.default_team
    );

    let project = ctx.project_or_default(args.project.as_deref());
    backlogs::get_backlog_items(
        ctx.api(),
        &ctx.settings,
        &project,
        ctx.settings.default_team.as_deref(),
        args.max_results,
    )
    .await
}
