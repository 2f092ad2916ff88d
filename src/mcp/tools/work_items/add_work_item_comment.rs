use crate::azure::{models::CommentRecord, work_items};
use crate::error::Result;
use crate::mcp::context::ToolContext;
use crate::mcp::tools::support::deserialize_non_empty_string;
use rmcp::{
    schemars::{self, JsonSchema},
    serde::Deserialize,
};

#[derive(Deserialize, JsonSchema)]
pub struct AddWorkItemCommentArgs {
    /// Work item ID to add comment to
    pub id: u32,
    /// Comment text (Basic HTML supported)
    #[serde(deserialize_with = "deserialize_non_empty_string")]
    pub comment: String,
    #[serde(default)]
    pub project: Option<String>,
}

pub async fn add_work_item_comment(
    ctx: ToolContext,
    args: AddWorkItemCommentArgs,
) -> Result<CommentRecord> {
    log::info!(
        "Tool invoked: add_work_item_comment(id={}, text_length={})",
        args.id,
        args.comment.len()
    );

    let project = ctx.project_or_default(args.project.as_deref());
    work_items::add_comment(ctx.api(), &project, args.id, &args.comment).await
}
