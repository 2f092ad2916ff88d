// Work Items module
pub mod add_work_item_comment;
pub mod create_work_item;
pub mod get_active_work_items;
pub mod get_closed_work_items;
pub mod get_default_work_items;
pub mod get_epic_hierarchy;
pub mod get_my_work_items;
pub mod get_work_items;
pub mod get_work_items_by_query;
pub mod get_work_items_by_state;
pub mod get_work_items_by_state_category;
pub mod get_work_items_by_type;
pub mod get_work_items_with_filters;
pub mod update_work_item_description;
pub mod update_work_item_title;

// Re-export the public items
pub use add_work_item_comment::{AddWorkItemCommentArgs, add_work_item_comment};
pub use create_work_item::{CreateWorkItemArgs, create_work_item};
pub use get_active_work_items::{GetActiveWorkItemsArgs, get_active_work_items};
pub use get_closed_work_items::{GetClosedWorkItemsArgs, get_closed_work_items};
pub use get_default_work_items::{GetDefaultWorkItemsArgs, get_default_work_items};
pub use get_epic_hierarchy::{GetEpicHierarchyArgs, get_epic_hierarchy};
pub use get_my_work_items::{GetMyWorkItemsArgs, get_my_work_items};
pub use get_work_items::{GetWorkItemsArgs, get_work_items};
pub use get_work_items_by_query::{GetWorkItemsByQueryArgs, get_work_items_by_query};
pub use get_work_items_by_state::{GetWorkItemsByStateArgs, get_work_items_by_state};
pub use get_work_items_by_state_category::{
    GetWorkItemsByStateCategoryArgs, get_work_items_by_state_category,
};
pub use get_work_items_by_type::{GetWorkItemsByTypeArgs, get_work_items_by_type};
pub use get_work_items_with_filters::{GetWorkItemsWithFiltersArgs, get_work_items_with_filters};
pub use update_work_item_description::{
    UpdateWorkItemDescriptionArgs, update_work_item_description,
};
pub use update_work_item_title::{UpdateWorkItemTitleArgs, update_work_item_title};
