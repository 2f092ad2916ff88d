use serde_json::{Value, json};
use std::fmt;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Ids covered by one fetch batch, in request order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdRange {
    pub first: u32,
    pub last: u32,
    pub count: usize,
}

impl IdRange {
    pub fn of(ids: &[u32]) -> Option<Self> {
        Some(Self {
            first: *ids.first()?,
            last: *ids.last()?,
            count: ids.len(),
        })
    }
}

impl fmt::Display for IdRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{} ({} ids)", self.first, self.last, self.count)
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    #[error("WIQL query failed{}: {message}", status_suffix(.status))]
    RemoteQuery {
        status: Option<u16>,
        message: String,
    },

    #[error(
        "Work item fetch failed{} for {}; fetched {}: {message}",
        status_suffix(.status),
        join_ranges(.failed),
        join_ranges(.succeeded)
    )]
    RemoteFetch {
        status: Option<u16>,
        message: String,
        succeeded: Vec<IdRange>,
        failed: Vec<IdRange>,
    },

    #[error("Updating field '{field}' of work item {id} failed{}: {message}", status_suffix(.status))]
    RemoteUpdate {
        id: u32,
        field: String,
        status: Option<u16>,
        message: String,
    },

    #[error("Adding comment to work item {id} failed{}: {message}", status_suffix(.status))]
    RemoteComment {
        id: u32,
        status: Option<u16>,
        message: String,
    },

    #[error(
        "Creating {work_item_type} failed{}{}: {message}",
        status_suffix(.status),
        rejected_field_suffix(.field)
    )]
    RemoteCreate {
        work_item_type: String,
        field: Option<String>,
        status: Option<u16>,
        message: String,
    },

    #[error("Azure DevOps did not respond in time: {0}")]
    RemoteTimeout(String),

    #[error("Failed to serialize result: {0}")]
    Serialization(#[from] serde_json::Error),
}

fn status_suffix(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!(" (HTTP {})", code),
        None => String::new(),
    }
}

fn rejected_field_suffix(field: &Option<String>) -> String {
    match field {
        Some(name) => format!(" (rejected field: {})", name),
        None => String::new(),
    }
}

fn join_ranges(ranges: &[IdRange]) -> String {
    if ranges.is_empty() {
        return "none".to_string();
    }
    ranges
        .iter()
        .map(|r| r.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl Error {
    pub fn invalid_filter<S: Into<String>>(msg: S) -> Self {
        Self::InvalidFilter(msg.into())
    }

    /// Stable kind name reported to MCP callers.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Configuration(_) => "ConfigurationError",
            Error::InvalidFilter(_) => "InvalidFilterError",
            Error::RemoteQuery { .. } => "RemoteQueryError",
            Error::RemoteFetch { .. } => "RemoteFetchError",
            Error::RemoteUpdate { .. } => "RemoteUpdateError",
            Error::RemoteComment { .. } => "RemoteCommentError",
            Error::RemoteCreate { .. } => "RemoteCreateError",
            Error::RemoteTimeout(_) => "RemoteTimeoutError",
            Error::Serialization(_) => "SerializationError",
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Error::RemoteQuery { status, .. }
            | Error::RemoteFetch { status, .. }
            | Error::RemoteUpdate { status, .. }
            | Error::RemoteComment { status, .. }
            | Error::RemoteCreate { status, .. } => *status,
            _ => None,
        }
    }

    /// Structured error object returned from the tool boundary.
    pub fn to_payload(&self) -> Value {
        let mut body = json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });

        if let Some(status) = self.status() {
            body["status"] = json!(status);
        }

        match self {
            Error::RemoteFetch {
                succeeded, failed, ..
            } => {
                body["succeeded"] = json!(succeeded.iter().map(|r| r.to_string()).collect::<Vec<_>>());
                body["failed"] = json!(failed.iter().map(|r| r.to_string()).collect::<Vec<_>>());
            }
            Error::RemoteUpdate { field, .. } => {
                body["field"] = json!(field);
            }
            Error::RemoteCreate {
                field: Some(field), ..
            } => {
                body["field"] = json!(field);
            }
            _ => {}
        }

        json!({ "error": body })
    }
}
