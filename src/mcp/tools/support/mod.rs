// Support module for shared utility functions
mod deserialize_non_empty_string;
mod run_filter;

pub use deserialize_non_empty_string::{deserialize_non_empty_string, deserialize_optional_trimmed};
pub use run_filter::run_filter;
