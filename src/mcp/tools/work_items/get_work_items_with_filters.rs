use crate::azure::models::WorkItem;
use crate::error::Result;
use crate::mcp::context::ToolContext;
use crate::mcp::tools::support::{deserialize_optional_trimmed, run_filter};
use crate::query::QueryFilter;
use rmcp::{
    schemars::{self, JsonSchema},
    serde::Deserialize,
};

#[derive(Deserialize, JsonSchema)]
pub struct GetWorkItemsWithFiltersArgs {
    /// States to match; takes precedence over state_category
    #[serde(default)]
    pub states: Option<Vec<String>>,
    /// State category: active, completed or review
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    pub state_category: Option<String>,
    /// Work item types (defaults to the configured types)
    #[serde(default)]
    pub work_item_types: Option<Vec<String>>,
    /// User the items are assigned to (email or display name)
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    pub assigned_to: Option<String>,
    /// Iteration path (e.g., "MyProject\\Sprint 1"), matched with UNDER
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    pub iteration_path: Option<String>,
    /// Area path (e.g., "MyProject\\Team1"), matched with UNDER
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    pub area_path: Option<String>,
    #[serde(default)]
    pub max_results: Option<usize>,
    #[serde(default)]
    pub project: Option<String>,
}

pub async fn get_work_items_with_filters(
    ctx: ToolContext,
    args: GetWorkItemsWithFiltersArgs,
) -> Result<Vec<WorkItem>> {
    log::info!(
        "Tool invoked: get_work_items_with_filters(states={:?}, state_category={:?}, work_item_types={:?}, assigned_to={:?})",
        args.states,
        args.state_category,
        args.work_item_types,
        args.assigned_to
    );

    let filter = QueryFilter {
        states: args.states,
        state_category: args.state_category,
        work_item_types: args.work_item_types,
        assigned_to: args.assigned_to,
        iteration_path: args.iteration_path,
        area_path: args.area_path,
        max_results: args.max_results,
        project: args.project,
        ..Default::default()
    };
    run_filter(&ctx, &filter).await
}
