//! Epic trees walked level by level over hierarchy links.

use crate::azure::api::{Scope, WorkItemsApi};
use crate::azure::models::{WorkItem, WorkItemLink};
use crate::azure::work_items::{self, remote};
use crate::config::Settings;
use crate::error::{Error, Result};
use crate::query::quote;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

pub const EPIC: &str = "Epic";
pub const HIERARCHY_FORWARD: &str = "System.LinkTypes.Hierarchy-Forward";

/// Child types followed below a parent of the given type.
pub fn child_types(parent: &str) -> &'static [&'static str] {
    match parent {
        "Epic" => &["Feature"],
        "Feature" => &["User Story", "Product Backlog Item"],
        "User Story" | "Product Backlog Item" => &["Task", "Bug"],
        _ => &[],
    }
}

/// A work item with its children, nested in link order.
#[derive(Debug, Clone, Serialize)]
pub struct HierarchyNode {
    #[serde(flatten)]
    pub item: WorkItem,
    pub children: Vec<HierarchyNode>,
}

/// Reads an Epic and every Feature, User Story (or Product Backlog Item),
/// Task and Bug below it. One link query and one fetch per level.
pub async fn get_epic_hierarchy(
    api: &dyn WorkItemsApi,
    settings: &Settings,
    project: &str,
    epic_id: u32,
) -> Result<HierarchyNode> {
    let epic = work_items::fetch_items(api, &[epic_id], Some(project))
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| Error::invalid_filter(format!("work item {} not found", epic_id)))?;
    if epic.work_item_type != EPIC {
        return Err(Error::invalid_filter(format!(
            "work item {} is not an Epic (type: {})",
            epic_id, epic.work_item_type
        )));
    }

    let scope = Scope::Project(project.to_string());
    let mut items: HashMap<u32, WorkItem> = HashMap::new();
    let mut children: HashMap<u32, Vec<u32>> = HashMap::new();
    let mut seen = HashSet::from([epic_id]);
    let mut level = vec![(epic.id, epic.work_item_type.clone())];

    while !level.is_empty() {
        let mut next_ids = Vec::new();

        for (types, parents) in group_by_child_types(&level) {
            let wiql = children_wiql(&parents, types, settings, project);
            log::debug!("Reading {:?} children of {:?}", types, parents);

            let links = api
                .query_work_item_links(&scope, &wiql)
                .await
                .map_err(|e| remote(e, |status, message| Error::RemoteQuery { status, message }))?;

            for (source, target) in child_links(links) {
                if seen.insert(target) {
                    children.entry(source).or_default().push(target);
                    next_ids.push(target);
                }
            }
        }

        let fetched = work_items::fetch_items(api, &next_ids, Some(project)).await?;
        level = fetched
            .iter()
            .map(|item| (item.id, item.work_item_type.clone()))
            .collect();
        items.extend(fetched.into_iter().map(|item| (item.id, item)));
    }

    log::debug!("Epic {} has {} descendants", epic_id, items.len());
    let nested = nest(epic_id, &mut items, &children);
    Ok(HierarchyNode {
        item: epic,
        children: nested,
    })
}

/// Parents that share the same child types, in first-seen order. Leaf
/// types are dropped.
fn group_by_child_types(level: &[(u32, String)]) -> Vec<(&'static [&'static str], Vec<u32>)> {
    let mut groups: Vec<(&'static [&'static str], Vec<u32>)> = Vec::new();
    for (id, work_item_type) in level {
        let types = child_types(work_item_type);
        if types.is_empty() {
            continue;
        }
        match groups.iter_mut().find(|(t, _)| *t == types) {
            Some((_, ids)) => ids.push(*id),
            None => groups.push((types, vec![*id])),
        }
    }
    groups
}

fn children_wiql(parents: &[u32], types: &[&str], settings: &Settings, project: &str) -> String {
    let parents = parents
        .iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    let types = types
        .iter()
        .map(|t| quote(t))
        .collect::<Vec<_>>()
        .join(", ");

    let mut clauses = vec![
        format!("[Source].[System.Id] IN ({})", parents),
        format!("[Target].[System.WorkItemType] IN ({})", types),
    ];
    if settings.enable_project_filtering {
        clauses.push(format!("[Target].[System.TeamProject] = {}", quote(project)));
    }
    clauses.push(format!("[System.Links.LinkType] = {}", quote(HIERARCHY_FORWARD)));

    format!(
        "SELECT [System.Id] FROM WorkItemLinks WHERE {} MODE (MustContain)",
        clauses.join(" AND ")
    )
}

/// `(parent, child)` pairs. Root rows, which name only the parent, are skipped.
fn child_links(links: Vec<WorkItemLink>) -> impl Iterator<Item = (u32, u32)> {
    links
        .into_iter()
        .filter_map(|link| Some((link.source?.id, link.target?.id)))
}

fn nest(
    parent: u32,
    items: &mut HashMap<u32, WorkItem>,
    children: &HashMap<u32, Vec<u32>>,
) -> Vec<HierarchyNode> {
    let Some(ids) = children.get(&parent) else {
        return vec![];
    };
    ids.iter()
        .filter_map(|id| {
            // Children the fetch did not return are left out.
            let item = items.remove(id)?;
            Some(HierarchyNode {
                item,
                children: nest(*id, items, children),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::azure::api::MockWorkItemsApi;
    use crate::azure::client::AzureError;
    use crate::azure::models::{WorkItemReference, WorkItemResource};
    use serde_json::json;

    fn settings_with(pairs: &[(&str, &str)]) -> Settings {
        let mut vars: HashMap<String, String> = [
            ("ORGANIZATION", "contoso"),
            ("PROJECT", "Fabrikam"),
            ("AZURE_DEVOPS_PAT", "pat"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        for (k, v) in pairs {
            vars.insert(k.to_string(), v.to_string());
        }
        Settings::load_from(|key| vars.get(key).cloned()).unwrap()
    }

    fn work_item_type(id: u32) -> &'static str {
        match id {
            1 => "Epic",
            2 | 3 => "Feature",
            4 => "User Story",
            5 => "Task",
            6 => "Bug",
            _ => "Issue",
        }
    }

    fn resource(id: u32) -> WorkItemResource {
        serde_json::from_value(json!({
            "id": id,
            "fields": {
                "System.Title": format!("Item {}", id),
                "System.WorkItemType": work_item_type(id),
                "System.State": "Active"
            }
        }))
        .unwrap()
    }

    fn reference(id: u32) -> WorkItemReference {
        WorkItemReference { id, url: None }
    }

    fn root(id: u32) -> WorkItemLink {
        WorkItemLink {
            rel: None,
            source: None,
            target: Some(reference(id)),
        }
    }

    fn child(source: u32, target: u32) -> WorkItemLink {
        WorkItemLink {
            rel: Some(HIERARCHY_FORWARD.to_string()),
            source: Some(reference(source)),
            target: Some(reference(target)),
        }
    }

    fn fetching_everything(api: &mut MockWorkItemsApi) {
        api.expect_get_work_items_batch()
            .returning(|_, ids, _| Ok(ids.iter().map(|id| resource(*id)).collect()));
    }

    #[tokio::test]
    async fn walks_epic_features_stories_then_tasks_and_bugs() {
        let mut api = MockWorkItemsApi::new();
        fetching_everything(&mut api);
        api.expect_query_work_item_links()
            .times(3)
            .returning(|scope, wiql| {
                assert_eq!(*scope, Scope::Project("Fabrikam".to_string()));
                assert!(wiql.starts_with("SELECT [System.Id] FROM WorkItemLinks WHERE"));
                assert!(wiql.contains(
                    "[System.Links.LinkType] = 'System.LinkTypes.Hierarchy-Forward' MODE (MustContain)"
                ));
                assert!(wiql.contains("[Target].[System.TeamProject] = 'Fabrikam'"));

                if wiql.contains("[Source].[System.Id] IN (1)") {
                    assert!(wiql.contains("[Target].[System.WorkItemType] IN ('Feature')"));
                    Ok(vec![root(1), child(1, 2), child(1, 3)])
                } else if wiql.contains("[Source].[System.Id] IN (2, 3)") {
                    assert!(wiql.contains("IN ('User Story', 'Product Backlog Item')"));
                    Ok(vec![root(2), root(3), child(2, 4)])
                } else if wiql.contains("[Source].[System.Id] IN (4)") {
                    assert!(wiql.contains("IN ('Task', 'Bug')"));
                    Ok(vec![root(4), child(4, 5), child(4, 6)])
                } else {
                    panic!("unexpected link query: {}", wiql)
                }
            });

        let tree = get_epic_hierarchy(&api, &settings_with(&[]), "Fabrikam", 1)
            .await
            .unwrap();

        assert_eq!(tree.item.id, 1);
        let features: Vec<u32> = tree.children.iter().map(|n| n.item.id).collect();
        assert_eq!(features, vec![2, 3]);
        assert!(tree.children[1].children.is_empty());

        let story = &tree.children[0].children[0];
        assert_eq!(story.item.work_item_type, "User Story");
        let leaves: Vec<(u32, &str)> = story
            .children
            .iter()
            .map(|n| (n.item.id, n.item.work_item_type.as_str()))
            .collect();
        assert_eq!(leaves, vec![(5, "Task"), (6, "Bug")]);

        let rendered = serde_json::to_value(&tree).unwrap();
        assert_eq!(rendered["type"], "Epic");
        assert_eq!(rendered["children"][0]["children"][0]["children"][1]["title"], "Item 6");
    }

    #[tokio::test]
    async fn epic_without_children_stops_after_one_link_query() {
        let mut api = MockWorkItemsApi::new();
        fetching_everything(&mut api);
        api.expect_query_work_item_links()
            .times(1)
            .returning(|_, _| Ok(vec![root(1)]));

        let tree = get_epic_hierarchy(&api, &settings_with(&[]), "Fabrikam", 1)
            .await
            .unwrap();
        assert!(tree.children.is_empty());
    }

    #[tokio::test]
    async fn project_clause_follows_configuration() {
        let mut api = MockWorkItemsApi::new();
        fetching_everything(&mut api);
        api.expect_query_work_item_links()
            .withf(|_, wiql| !wiql.contains("[System.TeamProject]"))
            .times(1)
            .returning(|_, _| Ok(vec![]));

        let settings = settings_with(&[("ENABLE_PROJECT_FILTERING", "false")]);
        get_epic_hierarchy(&api, &settings, "Fabrikam", 1)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn non_epic_root_is_invalid_filter() {
        let mut api = MockWorkItemsApi::new();
        fetching_everything(&mut api);
        api.expect_query_work_item_links().never();

        let err = get_epic_hierarchy(&api, &settings_with(&[]), "Fabrikam", 2)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "InvalidFilterError");
        assert!(err.to_string().contains("Feature"));
    }

    #[tokio::test]
    async fn missing_epic_is_invalid_filter() {
        let mut api = MockWorkItemsApi::new();
        api.expect_get_work_items_batch().returning(|_, _, _| Ok(vec![]));

        let err = get_epic_hierarchy(&api, &settings_with(&[]), "Fabrikam", 99)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "InvalidFilterError");
        assert!(err.to_string().contains("99"));
    }

    #[tokio::test]
    async fn link_query_failure_is_remote_query_error() {
        let mut api = MockWorkItemsApi::new();
        fetching_everything(&mut api);
        api.expect_query_work_item_links().returning(|_, _| {
            Err(AzureError::ApiError {
                status: 400,
                message: "TF51005: The query references a field that does not exist.".to_string(),
            })
        });

        let err = get_epic_hierarchy(&api, &settings_with(&[]), "Fabrikam", 1)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "RemoteQueryError");
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn leaf_types_have_no_children() {
        assert_eq!(child_types("Task"), &[] as &[&str]);
        assert_eq!(child_types("Bug"), &[] as &[&str]);
        assert_eq!(child_types("Epic"), &["Feature"]);
    }
}
