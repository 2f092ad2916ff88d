use crate::azure::api::{Scope, WorkItemsApi};
use crate::azure::client::AzureError;
use crate::azure::models::WorkItem;
use crate::azure::work_items;
use crate::config::Settings;
use crate::error::Result;
use crate::query::{self, QueryFilter};

/// Work item types queried when the backlog API is unavailable.
pub const FALLBACK_BACKLOG_TYPES: [&str; 3] = ["Product Backlog Item", "User Story", "Feature"];

/// Items on the team's top backlog level, in backlog order. Without a team
/// the project's default team backlog is read. Falls back to a WIQL query
/// over the common backlog types when the backlog API fails.
pub async fn get_backlog_items(
    api: &dyn WorkItemsApi,
    settings: &Settings,
    project: &str,
    team: Option<&str>,
    max_results: Option<usize>,
) -> Result<Vec<WorkItem>> {
    let scope = match team {
        Some(team) => Scope::Team {
            project: project.to_string(),
            team: team.to_string(),
        },
        None => Scope::Project(project.to_string()),
    };
    let limit = max_results.unwrap_or(settings.default_max_results);

    match backlog_ids(api, &scope).await {
        Ok(mut ids) => {
            ids.truncate(limit);
            work_items::fetch_items(api, &ids, Some(project)).await
        }
        Err(err) => {
            log::warn!(
                "Backlog API unavailable for {:?} ({}), falling back to WIQL",
                scope,
                err
            );
            let filter = QueryFilter {
                work_item_types: Some(
                    FALLBACK_BACKLOG_TYPES.iter().map(|t| t.to_string()).collect(),
                ),
                project: Some(project.to_string()),
                max_results: Some(limit),
                ..Default::default()
            };
            let built = query::build(&filter, settings)?;
            work_items::query_work_items(
                api,
                &built.wiql,
                built.project.as_deref(),
                built.max_results,
            )
            .await
        }
    }
}

async fn backlog_ids(
    api: &dyn WorkItemsApi,
    scope: &Scope,
) -> std::result::Result<Vec<u32>, AzureError> {
    let levels = api.list_backlogs(scope).await?;
    let Some(level) = levels.first() else {
        log::debug!("No backlog levels configured for {:?}", scope);
        return Ok(vec![]);
    };

    log::debug!("Reading backlog level '{}' ({})", level.name, level.id);
    api.get_backlog_work_item_ids(scope, &level.id).await
}
