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
pub struct GetWorkItemsByQueryArgs {
    /// WIQL query string (e.g., "SELECT [System.Id] FROM WorkItems WHERE [System.State] = 'Active'")
    #[serde(deserialize_with = "deserialize_non_empty_string")]
    pub wiql: String,
    /// Project to scope the query to, used with include_project_filter
    #[serde(default)]
    pub project: Option<String>,
    /// Run the query within the project instead of across the organization
    #[serde(default)]
    pub include_project_filter: bool,
    /// Maximum number of work items to return
    #[serde(default)]
    pub max_results: Option<usize>,
}

pub async fn get_work_items_by_query(
    ctx: ToolContext,
    args: GetWorkItemsByQueryArgs,
) -> Result<Vec<WorkItem>> {
    log::info!(
        "Tool invoked: get_work_items_by_query(wiql={}, project={:?}, include_project_filter={})",
        args.wiql,
        args.project,
        args.include_project_filter
    );

    let filter = QueryFilter {
        wiql: Some(args.wiql),
        project: args.project,
        include_project_filter: args.include_project_filter,
        max_results: args.max_results,
        ..Default::default()
    };
    run_filter(&ctx, &filter).await
}
