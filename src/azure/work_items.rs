use crate::azure::api::{Scope, WorkItemsApi};
use crate::azure::client::AzureError;
use crate::azure::models::{CommentRecord, JsonPatchOperation, WorkItem};
use crate::azure::normalize::{normalize_comment, normalize_work_item, work_item_fields};
use crate::error::{Error, IdRange, Result};
use futures::stream::{self, StreamExt};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;

/// Upper bound the batch endpoint accepts per request.
pub const MAX_BATCH_SIZE: usize = 200;

/// Batch requests kept in flight at once by `fetch_items`.
pub const MAX_CONCURRENT_BATCHES: usize = 8;

static RE_QUOTED_FIELD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)field '([^']+)'").unwrap());
static RE_RULE_FIELD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)for field (.+?)\.(?:\s|$)").unwrap());

pub(crate) fn remote<F>(err: AzureError, make: F) -> Error
where
    F: FnOnce(Option<u16>, String) -> Error,
{
    match err {
        AzureError::Timeout(after) => {
            Error::RemoteTimeout(format!("no response within {}s", after.as_secs()))
        }
        other => make(other.status(), other.message()),
    }
}

pub async fn run_query(api: &dyn WorkItemsApi, wiql: &str, project: Option<&str>) -> Result<Vec<u32>> {
    let scope = Scope::from_project(project.map(str::to_string));
    log::debug!("Executing WIQL query ({:?}): {}", scope, wiql);

    api.query_by_wiql(&scope, wiql)
        .await
        .map_err(|e| remote(e, |status, message| Error::RemoteQuery { status, message }))
}

/// Fetches work items in batches of `MAX_BATCH_SIZE`, at most
/// `MAX_CONCURRENT_BATCHES` in flight, and returns them in the order of `ids`. Ids the service did not return
/// are skipped. A failed batch fails the whole call, reporting which id
/// ranges were and were not fetched.
pub async fn fetch_items(
    api: &dyn WorkItemsApi,
    ids: &[u32],
    project: Option<&str>,
) -> Result<Vec<WorkItem>> {
    if ids.is_empty() {
        return Ok(vec![]);
    }

    let scope = Scope::from_project(project.map(str::to_string));
    let fields = work_item_fields();
    let batches: Vec<&[u32]> = ids.chunks(MAX_BATCH_SIZE).collect();

    if batches.len() > 1 {
        log::debug!(
            "Fetching {} work items in {} batches",
            ids.len(),
            batches.len()
        );
    }

    let requests: Vec<_> = batches
        .iter()
        .map(|batch| api.get_work_items_batch(&scope, batch, &fields))
        .collect();
    let results: Vec<_> = stream::iter(requests)
    .buffered(MAX_CONCURRENT_BATCHES)
    .collect()
    .await;

    let mut by_id = HashMap::with_capacity(ids.len());
    let mut succeeded = Vec::new();
    let mut failed = Vec::new();
    let mut first_error: Option<AzureError> = None;

    for (batch, result) in batches.iter().zip(results) {
        match result {
            Ok(resources) => {
                succeeded.extend(IdRange::of(batch));
                for resource in resources {
                    by_id.insert(resource.id, resource);
                }
            }
            Err(err) => {
                // chunks() never yields an empty batch
                if let Some(range) = IdRange::of(batch) {
                    log::warn!("Work item batch {} failed: {}", range, err);
                    failed.push(range);
                }
                first_error.get_or_insert(err);
            }
        }
    }

    if let Some(err) = first_error {
        if let AzureError::Timeout(after) = err
            && succeeded.is_empty()
        {
            return Err(Error::RemoteTimeout(format!(
                "no response within {}s",
                after.as_secs()
            )));
        }
        return Err(Error::RemoteFetch {
            status: err.status(),
            message: err.message(),
            succeeded,
            failed,
        });
    }

    Ok(ids
        .iter()
        .filter_map(|id| by_id.get(id).cloned())
        .map(normalize_work_item)
        .collect())
}

/// Runs a WIQL statement and fetches at most `max_results` of its matches.
pub async fn query_work_items(
    api: &dyn WorkItemsApi,
    wiql: &str,
    project: Option<&str>,
    max_results: usize,
) -> Result<Vec<WorkItem>> {
    let mut ids = run_query(api, wiql, project).await?;
    if ids.len() > max_results {
        log::debug!(
            "Query matched {} work items, keeping the first {}",
            ids.len(),
            max_results
        );
        ids.truncate(max_results);
    }
    fetch_items(api, &ids, project).await
}

pub async fn update_field(
    api: &dyn WorkItemsApi,
    project: &str,
    id: u32,
    field: &str,
    value: Value,
) -> Result<WorkItem> {
    let operations = vec![JsonPatchOperation::add_field(field, value)];

    api.update_work_item(project, id, &operations)
        .await
        .map(normalize_work_item)
        .map_err(|e| {
            remote(e, |status, message| Error::RemoteUpdate {
                id,
                field: field.to_string(),
                status,
                message,
            })
        })
}

pub async fn add_comment(
    api: &dyn WorkItemsApi,
    project: &str,
    id: u32,
    text: &str,
) -> Result<CommentRecord> {
    api.add_comment(project, id, text)
        .await
        .map(normalize_comment)
        .map_err(|e| remote(e, |status, message| Error::RemoteComment { id, status, message }))
}

pub async fn create_item(
    api: &dyn WorkItemsApi,
    project: &str,
    work_item_type: &str,
    fields: &[(&str, Value)],
) -> Result<WorkItem> {
    let operations: Vec<JsonPatchOperation> = fields
        .iter()
        .map(|(field, value)| JsonPatchOperation::add_field(field, value.clone()))
        .collect();

    api.create_work_item(project, work_item_type, &operations)
        .await
        .map(normalize_work_item)
        .map_err(|e| {
            remote(e, |status, message| Error::RemoteCreate {
                work_item_type: work_item_type.to_string(),
                field: rejected_field(&message, fields),
                status,
                message,
            })
        })
}

/// Best-effort extraction of the field a create was rejected for. Short
/// names from rule errors are mapped back to the submitted reference name.
fn rejected_field(message: &str, submitted: &[(&str, Value)]) -> Option<String> {
    let named = RE_QUOTED_FIELD
        .captures(message)
        .or_else(|| RE_RULE_FIELD.captures(message))
        .map(|caps| caps[1].trim().to_string())?;

    let matched = submitted.iter().map(|(field, _)| *field).find(|field| {
        field.eq_ignore_ascii_case(&named)
            || field
                .rsplit('.')
                .next()
                .is_some_and(|short| short.eq_ignore_ascii_case(&named))
    });

    Some(matched.map(str::to_string).unwrap_or(named))
}
