use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkItemListResponse {
    pub count: u32,
    pub value: Vec<WorkItemResource>,
}

/// Work item as returned by the REST API: id plus reference-named fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkItemResource {
    pub id: u32,
    #[serde(default)]
    pub fields: HashMap<String, Value>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WiqlQuery {
    pub query: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WiqlResponse {
    #[serde(rename = "workItems", default)]
    pub work_items: Vec<WorkItemReference>,
}

/// Response of a `FROM WorkItemLinks` statement.
#[derive(Debug, Serialize, Deserialize)]
pub struct WiqlLinkResponse {
    #[serde(rename = "workItemRelations", default)]
    pub work_item_relations: Vec<WorkItemLink>,
}

/// One row of a link query. Root rows carry no `source` and no `rel`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkItemLink {
    #[serde(default)]
    pub rel: Option<String>,
    #[serde(default)]
    pub source: Option<WorkItemReference>,
    #[serde(default)]
    pub target: Option<WorkItemReference>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkItemReference {
    pub id: u32,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityRef {
    #[serde(rename = "displayName", default)]
    pub display_name: Option<String>,
    #[serde(rename = "uniqueName", default)]
    pub unique_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: u64,
    #[serde(rename = "workItemId")]
    pub work_item_id: u32,
    #[serde(default)]
    pub text: String,
    #[serde(rename = "createdBy", default)]
    pub created_by: Option<IdentityRef>,
    #[serde(rename = "createdDate", default)]
    pub created_date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacklogLevel {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub rank: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BacklogLevelListResponse {
    #[serde(default)]
    pub value: Vec<BacklogLevel>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BacklogWorkItemsResponse {
    #[serde(rename = "workItems", default)]
    pub work_items: Vec<BacklogWorkItemLink>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BacklogWorkItemLink {
    pub target: WorkItemReference,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JsonPatchOperation {
    pub op: String,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
}

impl JsonPatchOperation {
    pub fn add_field(field: &str, value: Value) -> Self {
        Self {
            op: "add".to_string(),
            path: format!("/fields/{}", field),
            value: Some(value),
            from: None,
        }
    }
}

/// Normalized work item returned to tool callers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkItem {
    pub id: u32,
    pub title: String,
    #[serde(rename = "type")]
    pub work_item_type: String,
    pub state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iteration_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changed_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub story_points: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommentRecord {
    pub id: u64,
    pub work_item_id: u32,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_date: Option<String>,
}
