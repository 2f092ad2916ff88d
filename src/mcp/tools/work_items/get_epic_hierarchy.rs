use crate::azure::hierarchy::{self, HierarchyNode};
use crate::error::Result;
use crate::mcp::context::ToolContext;
use rmcp::{
    schemars::{self, JsonSchema},
    serde::Deserialize,
};

#[derive(Deserialize, JsonSchema)]
pub struct GetEpicHierarchyArgs {
    /// ID of the Epic to expand
    #[serde(alias = "id")]
    pub epic_id: u32,
    /// Project name (defaults to the configured project)
    #[serde(default)]
    pub project: Option<String>,
}

pub async fn get_epic_hierarchy(
    ctx: ToolContext,
    args: GetEpicHierarchyArgs,
) -> Result<HierarchyNode> {
    log::info!(
        "Tool invoked: get_epic_hierarchy(epic_id={}, project={:?})",
        args.epic_id,
        args.project
    );

    let project = ctx.project_or_default(args.project.as_deref());
    hierarchy::get_epic_hierarchy(ctx.api(), &ctx.settings, &project, args.epic_id).await
}
