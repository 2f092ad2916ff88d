use crate::azure::models::WorkItem;
use crate::error::{Error, Result};
use crate::mcp::context::ToolContext;
use crate::mcp::tools::support::{deserialize_optional_trimmed, run_filter};
use crate::query::QueryFilter;
use rmcp::{
    schemars::{self, JsonSchema},
    serde::Deserialize,
};

#[derive(Deserialize, JsonSchema)]
pub struct GetClosedWorkItemsArgs {
    /// Work item type (defaults to the configured types)
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    pub work_item_type: Option<String>,
    /// User the items are assigned to (email or display name)
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub project: Option<String>,
    #[serde(default)]
    pub max_results: Option<usize>,
}

pub async fn get_closed_work_items(
    ctx: ToolContext,
    args: GetClosedWorkItemsArgs,
) -> Result<Vec<WorkItem>> {
    log::info!(
        "Tool invoked: get_closed_work_items(work_item_type={:?}, assigned_to={:?})",
        args.work_item_type,
        args.assigned_to
    );

    if ctx.settings.closed_states.is_empty() {
        return Err(Error::invalid_filter("no closed states configured"));
    }

    let filter = QueryFilter {
        states: Some(ctx.settings.closed_states.clone()),
        work_item_types: args.work_item_type.map(|t| vec![t]),
        assigned_to: args.assigned_to,
        project: args.project,
        max_results: args.max_results,
        ..Default::default()
    };
    run_filter(&ctx, &filter).await
}
