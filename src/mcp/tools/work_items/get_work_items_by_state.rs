use crate::azure::models::WorkItem;
use crate::error::Result;
use crate::mcp::context::ToolContext;
use crate::mcp::tools::support::{
    deserialize_non_empty_string, deserialize_optional_trimmed, run_filter,
};
use crate::query::QueryFilter;
use rmcp::{
    schemars::{self, JsonSchema},
    serde::Deserialize,
};

#[derive(Deserialize, JsonSchema)]
pub struct GetWorkItemsByStateArgs {
    /// State to match (Active, New, Closed, etc.)
    #[serde(deserialize_with = "deserialize_non_empty_string")]
    pub state: String,
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

pub async fn get_work_items_by_state(
    ctx: ToolContext,
    args: GetWorkItemsByStateArgs,
) -> Result<Vec<WorkItem>> {
    log::info!(
        "Tool invoked: get_work_items_by_state(state={}, work_item_type={:?}, assigned_to={:?})",
        args.state,
        args.work_item_type,
        args.assigned_to
    );

    let filter = QueryFilter {
        states: Some(vec![args.state]),
        work_item_types: args.work_item_type.map(|t| vec![t]),
        assigned_to: args.assigned_to,
        project: args.project,
        max_results: args.max_results,
        ..Default::default()
    };
    run_filter(&ctx, &filter).await
}
