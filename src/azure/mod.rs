pub mod api;
pub mod backlogs;
pub mod client;
pub mod hierarchy;
pub mod models;
pub mod normalize;
pub mod work_items;
