use crate::azure::client::AzureError;
use crate::azure::models::{
    BacklogLevel, Comment, JsonPatchOperation, WorkItemLink, WorkItemResource,
};
use async_trait::async_trait;

/// Where a request is addressed within the organization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    Organization,
    Project(String),
    Team { project: String, team: String },
}

impl Scope {
    pub fn from_project(project: Option<String>) -> Self {
        match project {
            Some(project) => Scope::Project(project),
            None => Scope::Organization,
        }
    }
}

/// One remote round-trip per method. Batching, ordering and error shaping
/// live in `azure::work_items`.
#[cfg_attr(any(test, feature = "test-support"), mockall::automock)]
#[async_trait]
pub trait WorkItemsApi: Send + Sync {
    /// Runs a WIQL statement and returns the matched ids in result order.
    async fn query_by_wiql(&self, scope: &Scope, wiql: &str) -> Result<Vec<u32>, AzureError>;

    /// Runs a `FROM WorkItemLinks` statement and returns its relation rows.
    async fn query_work_item_links(
        &self,
        scope: &Scope,
        wiql: &str,
    ) -> Result<Vec<WorkItemLink>, AzureError>;

    /// Fetches at most one batch of work items. An empty `fields` slice
    /// requests every field.
    async fn get_work_items_batch(
        &self,
        scope: &Scope,
        ids: &[u32],
        fields: &[String],
    ) -> Result<Vec<WorkItemResource>, AzureError>;

    async fn update_work_item(
        &self,
        project: &str,
        id: u32,
        operations: &[JsonPatchOperation],
    ) -> Result<WorkItemResource, AzureError>;

    async fn create_work_item(
        &self,
        project: &str,
        work_item_type: &str,
        operations: &[JsonPatchOperation],
    ) -> Result<WorkItemResource, AzureError>;

    async fn add_comment(&self, project: &str, id: u32, text: &str)
    -> Result<Comment, AzureError>;

    async fn list_backlogs(&self, scope: &Scope) -> Result<Vec<BacklogLevel>, AzureError>;

    async fn get_backlog_work_item_ids(
        &self,
        scope: &Scope,
        backlog_id: &str,
    ) -> Result<Vec<u32>, AzureError>;
}
