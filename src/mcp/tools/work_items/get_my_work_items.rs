use crate::azure::models::WorkItem;
use crate::error::{Error, Result};
use crate::mcp::context::ToolContext;
use crate::mcp::tools::support::{deserialize_optional_trimmed, run_filter};
use crate::query::QueryFilter;
use rmcp::{
    schemars::{self, JsonSchema},
    serde::Deserialize,
};

#[derive(Deserialize, JsonSchema, Default)]
pub struct GetMyWorkItemsArgs {
    /// Display name or email of the user (defaults to the configured user)
    #[serde(default, alias = "assigned_to", deserialize_with = "deserialize_optional_trimmed")]
    pub user: Option<String>,
    /// States to match; closed and removed items are excluded when omitted
    #[serde(default)]
    pub states: Option<Vec<String>>,
    #[serde(default)]
    pub project: Option<String>,
    #[serde(default)]
    pub max_results: Option<usize>,
}

pub async fn get_my_work_items(
    ctx: ToolContext,
    args: GetMyWorkItemsArgs,
) -> Result<Vec<WorkItem>> {
    log::info!(
        "Tool invoked: get_my_work_items(user={:?}, states={:?})",
        args.user,
        args.states
    );

    if args.user.is_none() && ctx.settings.default_user.is_none() {
        return Err(Error::invalid_filter(
            "no user specified and no default user configured",
        ));
    }

    let filter = QueryFilter {
        assigned_to: args.user,
        use_default_user: true,
        states: args.states,
        project: args.project,
        max_results: args.max_results,
        ..Default::default()
    };
    run_filter(&ctx, &filter).await
}
