use crate::azure::models::WorkItem;
use crate::error::Result;
use crate::mcp::context::ToolContext;
use crate::mcp::tools::support::{deserialize_non_empty_string, run_filter};
use crate::query::{QueryFilter, StateCategory};
use rmcp::{
    schemars::{self, JsonSchema},
    serde::Deserialize,
};

#[derive(Deserialize, JsonSchema)]
pub struct GetWorkItemsByStateCategoryArgs {
    /// State category: active, completed or review
    #[serde(deserialize_with = "deserialize_non_empty_string")]
    pub category: String,
    #[serde(default)]
    pub project: Option<String>,
    #[serde(default)]
    pub max_results: Option<usize>,
}

pub async fn get_work_items_by_state_category(
    ctx: ToolContext,
    args: GetWorkItemsByStateCategoryArgs,
) -> Result<Vec<WorkItem>> {
    log::info!(
        "Tool invoked: get_work_items_by_state_category(category={})",
        args.category
    );

    let category: StateCategory = args.category.parse()?;
    let filter = QueryFilter {
        state_category: Some(category.to_string()),
        project: args.project,
        max_results: args.max_results,
        ..Default::default()
    };
    run_filter(&ctx, &filter).await
}
