use crate::azure::models::WorkItem;
use crate::azure::work_items;
use crate::error::Result;
use crate::mcp::context::ToolContext;
use crate::query::{self, QueryFilter};

/// Builds the filter's WIQL, runs it and fetches the capped result set.
pub async fn run_filter(ctx: &ToolContext, filter: &QueryFilter) -> Result<Vec<WorkItem>> {
    let built = query::build(filter, &ctx.settings)?;
    work_items::query_work_items(
        ctx.api(),
        &built.wiql,
        built.project.as_deref(),
        built.max_results,
    )
    .await
}
