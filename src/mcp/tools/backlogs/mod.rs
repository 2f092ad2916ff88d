pub mod get_backlog_items;
pub mod get_default_backlog;

pub use get_backlog_items::{GetBacklogItemsArgs, get_backlog_items};
pub use get_default_backlog::{GetDefaultBacklogArgs, get_default_backlog};
