use crate::config::SettingsSummary;
use crate::error::Result;
use crate::mcp::context::ToolContext;
use rmcp::{
    schemars::{self, JsonSchema},
    serde::Deserialize,
};

#[derive(Deserialize, JsonSchema, Default)]
pub struct GetProjectInfoArgs {}

pub async fn get_project_info(ctx: ToolContext, _args: GetProjectInfoArgs) -> Result<SettingsSummary> {
    log::info!("Tool invoked: get_project_info()");
    Ok(ctx.settings.summary())
}
