pub mod backlogs;
pub mod project;
pub mod support;
pub mod work_items;

use crate::mcp::registry::ToolRegistry;

/// Every tool the server exposes.
pub fn registry() -> ToolRegistry {
    ToolRegistry::builder()
        // Reads
        .register(
            "get_work_items",
            "Get work items by ID, in the order given",
            work_items::get_work_items,
        )
        .register(
            "get_work_items_by_query",
            "Run a WIQL query and return the matching work items",
            work_items::get_work_items_by_query,
        )
        .register(
            "get_work_items_by_type",
            "Get work items of one type (Bug, Task, User Story, etc.)",
            work_items::get_work_items_by_type,
        )
        .register(
            "get_work_items_by_state",
            "Get work items in one state (Active, New, Closed, etc.)",
            work_items::get_work_items_by_state,
        )
        .register(
            "get_work_items_with_filters",
            "Get work items matching any combination of states, state category, types, assignee, iteration path and area path",
            work_items::get_work_items_with_filters,
        )
        .register(
            "get_my_work_items",
            "Get work items assigned to a user (defaults to the configured user)",
            work_items::get_my_work_items,
        )
        .register(
            "get_active_work_items",
            "Get work items selected by the configured default filters",
            work_items::get_active_work_items,
        )
        .register(
            "get_work_items_by_state_category",
            "Get work items by state category (active, completed, review)",
            work_items::get_work_items_by_state_category,
        )
        .register(
            "get_closed_work_items",
            "Get closed work items",
            work_items::get_closed_work_items,
        )
        .register(
            "get_default_work_items",
            "Get the configured user's work items, or all active work items when no default user is configured",
            work_items::get_default_work_items,
        )
        .register(
            "get_epic_hierarchy",
            "Get an Epic with its Features, User Stories, Tasks and Bugs as a nested tree",
            work_items::get_epic_hierarchy,
        )
        // Backlogs
        .register(
            "get_backlog_items",
            "Get the items on a team's backlog",
            backlogs::get_backlog_items,
        )
        .register(
            "get_default_backlog",
            "Get the items on the default team's backlog",
            backlogs::get_default_backlog,
        )
        // Project
        .register(
            "get_available_states",
            "List common work item states plus any configured states",
            project::get_available_states,
        )
        .register(
            "get_project_info",
            "Get the organization, project and default search settings",
            project::get_project_info,
        )
        // Writes
        .register(
            "update_work_item_title",
            "Update the title of a work item",
            work_items::update_work_item_title,
        )
        .register(
            "update_work_item_description",
            "Update the description of a work item",
            work_items::update_work_item_description,
        )
        .register(
            "add_work_item_comment",
            "Add a comment to a work item",
            work_items::add_work_item_comment,
        )
        .register(
            "create_work_item",
            "Create a work item",
            work_items::create_work_item,
        )
        .build()
}
