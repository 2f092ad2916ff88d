use crate::azure::api::{Scope, WorkItemsApi};
use crate::azure::models::{
    BacklogLevel, BacklogLevelListResponse, BacklogWorkItemsResponse, Comment, JsonPatchOperation,
    WiqlLinkResponse, WiqlQuery, WiqlResponse, WorkItemLink, WorkItemListResponse,
    WorkItemResource,
};
use crate::config::Settings;
use async_trait::async_trait;
use reqwest::{Client, Method};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AzureError {
    #[error("HTTP request failed: {0}")]
    HttpError(reqwest::Error),
    #[error("JSON parsing failed: {0}")]
    SerdeJson(#[from] serde_json::Error),
    #[error("API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
}

impl AzureError {
    pub fn status(&self) -> Option<u16> {
        match self {
            AzureError::ApiError { status, .. } => Some(*status),
            AzureError::HttpError(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Remote message without the transport prefix.
    pub fn message(&self) -> String {
        match self {
            AzureError::ApiError { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

pub struct AzureDevOpsClient {
    client: Client,
    organization: String,
    base_url: String,
    api_version: String,
    personal_access_token: String,
    timeout: Duration,
}

impl AzureDevOpsClient {
    pub fn new(settings: &Settings) -> Result<Self, AzureError> {
        let client = Client::builder()
            .timeout(settings.request_timeout)
            .build()
            .map_err(AzureError::HttpError)?;

        Ok(Self {
            client,
            organization: settings.organization.clone(),
            base_url: settings.base_url.clone(),
            api_version: settings.api_version.clone(),
            personal_access_token: settings.personal_access_token.expose().to_string(),
            timeout: settings.request_timeout,
        })
    }

    fn scope_url(&self, scope: &Scope, path: &str) -> String {
        match scope {
            Scope::Organization => {
                format!("{}/{}/_apis/{}", self.base_url, self.organization, path)
            }
            Scope::Project(project) => format!(
                "{}/{}/{}/_apis/{}",
                self.base_url,
                self.organization,
                urlencoding::encode(project),
                path
            ),
            Scope::Team { project, team } => format!(
                "{}/{}/{}/{}/_apis/{}",
                self.base_url,
                self.organization,
                urlencoding::encode(project),
                urlencoding::encode(team),
                path
            ),
        }
    }

    fn classify(&self, err: reqwest::Error) -> AzureError {
        if err.is_timeout() {
            AzureError::Timeout(self.timeout)
        } else {
            AzureError::HttpError(err)
        }
    }

    fn request_url(&self, scope: &Scope, path: &str, api_version: &str) -> String {
        let separator = if path.contains('?') { '&' } else { '?' };
        format!(
            "{}{}api-version={}",
            self.scope_url(scope, path),
            separator,
            api_version
        )
    }

    pub async fn request_with_content_type<T: DeserializeOwned>(
        &self,
        scope: &Scope,
        method: Method,
        path: &str,
        api_version: &str,
        body: Option<&(impl Serialize + ?Sized)>,
        content_type: &str,
    ) -> Result<T, AzureError> {
        let url = self.request_url(scope, path, api_version);

        log::debug!("Request: {} {}", method, url);
        if let Some(b) = &body
            && let Ok(json) = serde_json::to_string_pretty(b)
        {
            log::debug!("Request body: {}", json);
        }

        let mut request = self
            .client
            .request(method, &url)
            .basic_auth("", Some(&self.personal_access_token))
            .header("Content-Type", content_type);

        if let Some(b) = body {
            request = request.json(b);
        }

        let response = request.send().await.map_err(|e| self.classify(e))?;
        let status = response.status();

        log::debug!("Response status: {}", status);

        if !status.is_success() {
            let error_text = response.text().await.map_err(|e| self.classify(e))?;
            log::debug!("Error response: {}", error_text);
            return Err(AzureError::ApiError {
                status: status.as_u16(),
                message: extract_error_message(&error_text),
            });
        }

        let response_text = response.text().await.map_err(|e| self.classify(e))?;
        log::debug!("Response body: {}", response_text);

        let data = serde_json::from_str(&response_text)?;
        Ok(data)
    }

    pub async fn get<T: DeserializeOwned>(&self, scope: &Scope, path: &str) -> Result<T, AzureError> {
        self.request_with_content_type(
            scope,
            Method::GET,
            path,
            &self.api_version,
            None::<&String>,
            "application/json",
        )
        .await
    }

    pub async fn post<T: DeserializeOwned>(
        &self,
        scope: &Scope,
        path: &str,
        body: &(impl Serialize + ?Sized),
    ) -> Result<T, AzureError> {
        self.request_with_content_type(
            scope,
            Method::POST,
            path,
            &self.api_version,
            Some(body),
            "application/json",
        )
        .await
    }

    pub async fn post_patch<T: DeserializeOwned>(
        &self,
        scope: &Scope,
        path: &str,
        body: &(impl Serialize + ?Sized),
    ) -> Result<T, AzureError> {
        self.request_with_content_type(
            scope,
            Method::POST,
            path,
            &self.api_version,
            Some(body),
            "application/json-patch+json",
        )
        .await
    }

    pub async fn patch_patch<T: DeserializeOwned>(
        &self,
        scope: &Scope,
        path: &str,
        body: &(impl Serialize + ?Sized),
    ) -> Result<T, AzureError> {
        self.request_with_content_type(
            scope,
            Method::PATCH,
            path,
            &self.api_version,
            Some(body),
            "application/json-patch+json",
        )
        .await
    }
}

/// Azure DevOps error bodies are JSON with a `message` member; fall back to
/// the raw text otherwise.
pub fn extract_error_message(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => match map.get("message") {
            Some(Value::String(message)) => message.clone(),
            _ => body.trim().to_string(),
        },
        _ => body.trim().to_string(),
    }
}

#[async_trait]
impl WorkItemsApi for AzureDevOpsClient {
    async fn query_by_wiql(&self, scope: &Scope, wiql: &str) -> Result<Vec<u32>, AzureError> {
        let query = WiqlQuery {
            query: wiql.to_string(),
        };
        let response: WiqlResponse = self.post(scope, "wit/wiql", &query).await?;
        Ok(response.work_items.into_iter().map(|wi| wi.id).collect())
    }

    async fn query_work_item_links(
        &self,
        scope: &Scope,
        wiql: &str,
    ) -> Result<Vec<WorkItemLink>, AzureError> {
        let query = WiqlQuery {
            query: wiql.to_string(),
        };
        let response: WiqlLinkResponse = self.post(scope, "wit/wiql", &query).await?;
        Ok(response.work_item_relations)
    }

    async fn get_work_items_batch(
        &self,
        scope: &Scope,
        ids: &[u32],
        fields: &[String],
    ) -> Result<Vec<WorkItemResource>, AzureError> {
        let ids_str = ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");
        let mut path = format!("wit/workitems?ids={}", ids_str);
        if !fields.is_empty() {
            path.push_str("&fields=");
            path.push_str(&urlencoding::encode(&fields.join(",")));
        }
        let response: WorkItemListResponse = self.get(scope, &path).await?;
        Ok(response.value)
    }

    async fn update_work_item(
        &self,
        project: &str,
        id: u32,
        operations: &[JsonPatchOperation],
    ) -> Result<WorkItemResource, AzureError> {
        let path = format!("wit/workitems/{}", id);
        self.patch_patch(&Scope::Project(project.to_string()), &path, operations)
            .await
    }

    async fn create_work_item(
        &self,
        project: &str,
        work_item_type: &str,
        operations: &[JsonPatchOperation],
    ) -> Result<WorkItemResource, AzureError> {
        let path = format!("wit/workitems/${}", urlencoding::encode(work_item_type));
        self.post_patch(&Scope::Project(project.to_string()), &path, operations)
            .await
    }

    async fn add_comment(
        &self,
        project: &str,
        id: u32,
        text: &str,
    ) -> Result<Comment, AzureError> {
        let path = format!("wit/workitems/{}/comments", id);
        let body = serde_json::json!({ "text": text });
        // Comments are only served by the preview revision of the API.
        let api_version = format!("{}-preview.3", self.api_version);
        self.request_with_content_type(
            &Scope::Project(project.to_string()),
            Method::POST,
            &path,
            &api_version,
            Some(&body),
            "application/json",
        )
        .await
    }

    async fn list_backlogs(&self, scope: &Scope) -> Result<Vec<BacklogLevel>, AzureError> {
        let response: BacklogLevelListResponse = self.get(scope, "work/backlogs").await?;
        Ok(response.value)
    }

    async fn get_backlog_work_item_ids(
        &self,
        scope: &Scope,
        backlog_id: &str,
    ) -> Result<Vec<u32>, AzureError> {
        let path = format!(
            "work/backlogs/{}/workItems",
            urlencoding::encode(backlog_id)
        );
        let response: BacklogWorkItemsResponse = self.get(scope, &path).await?;
        Ok(response
            .work_items
            .into_iter()
            .map(|link| link.target.id)
            .collect())
    }
}
