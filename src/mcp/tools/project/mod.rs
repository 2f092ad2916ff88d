pub mod get_available_states;
pub mod get_project_info;

pub use get_available_states::{GetAvailableStatesArgs, get_available_states};
pub use get_project_info::{GetProjectInfoArgs, get_project_info};
