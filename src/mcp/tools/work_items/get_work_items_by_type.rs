use crate::azure::models::WorkItem;
use crate::error::Result;
use crate::mcp::context::ToolContext;
use crate::mcp::tools::support::{deserialize_non_empty_string, run_filter};
use crate::query::QueryFilter;
use rmcp::{
    schemars::{self, JsonSchema},
    serde::Deserialize,
};

#[derive(Deserialize, JsonSchema)]
pub struct GetWorkItemsByTypeArgs {
    /// Work item type (Bug, Task, User Story, etc.)
    #[serde(deserialize_with = "deserialize_non_empty_string")]
    pub work_item_type: String,
    /// States to match; closed and removed items are excluded when omitted
    #[serde(default)]
    pub states: Option<Vec<String>>,
    #[serde(default)]
    pub project: Option<String>,
    #[serde(default)]
    pub max_results: Option<usize>,
}

pub async fn get_work_items_by_type(
    ctx: ToolContext,
    args: GetWorkItemsByTypeArgs,
) -> Result<Vec<WorkItem>> {
    log::info!(
        "Tool invoked: get_work_items_by_type(work_item_type={}, states={:?})",
        args.work_item_type,
        args.states
    );

    let filter = QueryFilter {
        work_item_types: Some(vec![args.work_item_type]),
        states: args.states,
        project: args.project,
        max_results: args.max_results,
        ..Default::default()
    };
    run_filter(&ctx, &filter).await
}
