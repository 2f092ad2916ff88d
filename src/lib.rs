pub mod azure;
pub mod config;
pub mod error;
pub mod mcp;
pub mod query;
pub mod server;
