use crate::error::Result;
use crate::mcp::context::ToolContext;
use rmcp::{
    schemars::{self, JsonSchema},
    serde::Deserialize,
};

/// States commonly found across the stock process templates.
pub const COMMON_STATES: [&str; 13] = [
    "New",
    "Active",
    "In Progress",
    "Resolved",
    "Closed",
    "Removed",
    "Done",
    "To Do",
    "Doing",
    "Code Review",
    "Testing",
    "Approved",
    "Committed",
];

#[derive(Deserialize, JsonSchema, Default)]
pub struct GetAvailableStatesArgs {}

pub async fn get_available_states(
    ctx: ToolContext,
    _args: GetAvailableStatesArgs,
) -> Result<Vec<String>> {
    log::info!("Tool invoked: get_available_states()");

    let settings = &ctx.settings;
    let mut states: Vec<String> = COMMON_STATES.iter().map(|s| s.to_string()).collect();
    let configured = settings
        .default_active_states
        .iter()
        .chain(&settings.default_completed_states)
        .chain(&settings.default_review_states)
        .chain(&settings.closed_states)
        .chain(&settings.removed_states);

    for state in configured {
        if !states.iter().any(|s| s.eq_ignore_ascii_case(state)) {
            states.push(state.clone());
        }
    }

    Ok(states)
}
