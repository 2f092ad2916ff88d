//! WIQL construction from structured filters and configured defaults.

use crate::config::Settings;
use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Grouping of states resolved through the configured state lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateCategory {
    Active,
    Completed,
    Review,
}

impl FromStr for StateCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(StateCategory::Active),
            "completed" => Ok(StateCategory::Completed),
            "review" => Ok(StateCategory::Review),
            other => Err(Error::invalid_filter(format!(
                "unknown state category '{}', use 'active', 'completed', or 'review'",
                other
            ))),
        }
    }
}

impl fmt::Display for StateCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StateCategory::Active => "active",
            StateCategory::Completed => "completed",
            StateCategory::Review => "review",
        })
    }
}

/// Per-call filter assembled from tool arguments.
#[derive(Debug, Clone, Default)]
pub struct QueryFilter {
    pub ids: Option<Vec<u32>>,
    pub work_item_types: Option<Vec<String>>,
    pub states: Option<Vec<String>>,
    pub state_category: Option<String>,
    pub assigned_to: Option<String>,
    pub iteration_path: Option<String>,
    pub area_path: Option<String>,
    pub max_results: Option<usize>,
    pub project: Option<String>,
    pub wiql: Option<String>,
    pub include_project_filter: bool,

    /// Fall back to the configured default user when `assigned_to` is unset.
    pub use_default_user: bool,
    /// Reject the filter unless it names at least one id.
    pub require_ids: bool,
    /// Permit a query with no clause at all.
    pub allow_unfiltered: bool,
}

/// A ready-to-run statement together with where and how much to run it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltQuery {
    pub wiql: String,
    /// `None` runs the statement at organization scope.
    pub project: Option<String>,
    pub max_results: usize,
}

pub fn build(filter: &QueryFilter, settings: &Settings) -> Result<BuiltQuery> {
    let max_results = match filter.max_results {
        Some(0) => return Err(Error::invalid_filter("max_results must be positive")),
        Some(n) => n,
        None => settings.default_max_results,
    };

    if let Some(wiql) = &filter.wiql {
        if wiql.trim().is_empty() {
            return Err(Error::invalid_filter("wiql cannot be empty"));
        }
        let project = filter
            .include_project_filter
            .then(|| project_or_default(filter, settings));
        return Ok(BuiltQuery {
            wiql: wiql.clone(),
            project,
            max_results,
        });
    }

    let project = project_or_default(filter, settings);
    let mut clauses = Vec::new();

    match filter.ids.as_deref() {
        Some(ids) if !ids.is_empty() => clauses.push(format!(
            "[System.Id] IN ({})",
            ids.iter()
                .map(|id| id.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        )),
        _ if filter.require_ids => return Err(Error::invalid_filter("at least one id required")),
        _ => {}
    }

    let types = filter
        .work_item_types
        .as_deref()
        .filter(|types| !types.is_empty())
        .unwrap_or(settings.default_work_item_types.as_slice());
    if !types.is_empty() {
        clauses.push(format!("[System.WorkItemType] IN ({})", quote_list(types)));
    }

    let states = resolve_states(filter, settings)?;
    if let Some(states) = &states {
        clauses.push(format!("[System.State] IN ({})", quote_list(states)));
    }

    let assigned_to = filter.assigned_to.as_deref().or_else(|| {
        filter
            .use_default_user
            .then_some(settings.default_user.as_deref())
            .flatten()
    });
    if let Some(user) = assigned_to {
        clauses.push(format!("[System.AssignedTo] = {}", quote(user)));
    }

    if let Some(path) = filter
        .iteration_path
        .as_deref()
        .or(settings.default_iteration_path.as_deref())
    {
        clauses.push(format!("[System.IterationPath] UNDER {}", quote(path)));
    }

    if let Some(path) = filter
        .area_path
        .as_deref()
        .or(settings.default_area_path.as_deref())
    {
        clauses.push(format!("[System.AreaPath] UNDER {}", quote(path)));
    }

    if states.is_none() {
        let excluded = settings.excluded_states();
        if !excluded.is_empty() {
            clauses.push(format!("[System.State] NOT IN ({})", quote_list(&excluded)));
        }
    }

    if clauses.is_empty() && !filter.allow_unfiltered {
        return Err(Error::invalid_filter(
            "query has no filter; supply ids, types, states, assignee or paths",
        ));
    }
    // The request URL only sets the @project context; this clause restricts results.
    if settings.enable_project_filtering || clauses.is_empty() {
        clauses.insert(0, format!("[System.TeamProject] = {}", quote(&project)));
    }

    let wiql = format!(
        "SELECT [System.Id] FROM WorkItems WHERE {} ORDER BY [System.ChangedDate] DESC",
        clauses.join(" AND ")
    );
    log::debug!("Built WIQL query for project {}: {}", project, wiql);

    Ok(BuiltQuery {
        wiql,
        project: Some(project),
        max_results,
    })
}

/// Explicit states win over a state category; an empty list counts as absent.
fn resolve_states(filter: &QueryFilter, settings: &Settings) -> Result<Option<Vec<String>>> {
    if let Some(states) = filter.states.as_ref().filter(|s| !s.is_empty()) {
        return Ok(Some(states.clone()));
    }
    match &filter.state_category {
        Some(category) => {
            let category: StateCategory = category.parse()?;
            let states = settings.states_for(category);
            if states.is_empty() {
                return Err(Error::invalid_filter(format!(
                    "no states configured for category '{}'",
                    category
                )));
            }
            Ok(Some(states.to_vec()))
        }
        None => Ok(None),
    }
}

fn project_or_default(filter: &QueryFilter, settings: &Settings) -> String {
    filter
        .project
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .unwrap_or(settings.project.as_str())
        .to_string()
}

pub fn require_ids(ids: &[u32]) -> Result<()> {
    if ids.is_empty() {
        return Err(Error::invalid_filter("at least one id required"));
    }
    Ok(())
}

/// Single-quoted WIQL string literal.
pub fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

fn quote_list(values: &[String]) -> String {
    values
        .iter()
        .map(|v| quote(v))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

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

    fn settings() -> Settings {
        settings_with(&[])
    }

    #[test]
    fn ids_render_in_input_order_as_single_clause() {
        let filter = QueryFilter {
            ids: Some(vec![42, 7, 1001]),
            ..Default::default()
        };

        let built = build(&filter, &settings()).unwrap();
        assert!(built.wiql.contains("[System.Id] IN (42, 7, 1001)"));
        assert_eq!(built.wiql.matches("[System.Id] IN").count(), 1);
        assert_eq!(built.project.as_deref(), Some("Fabrikam"));
    }

    #[test]
    fn empty_ids_are_rejected_only_when_required() {
        let mut filter = QueryFilter {
            ids: Some(vec![]),
            require_ids: true,
            ..Default::default()
        };
        let err = build(&filter, &settings()).unwrap_err();
        assert_eq!(err.kind(), "InvalidFilterError");
        assert!(err.to_string().contains("at least one id required"));

        filter.require_ids = false;
        let built = build(&filter, &settings()).unwrap();
        assert!(!built.wiql.contains("[System.Id] IN"));
    }

    #[test]
    fn clauses_follow_fixed_order_and_end_with_changed_date_ordering() {
        let filter = QueryFilter {
            ids: Some(vec![1]),
            work_item_types: Some(vec!["Bug".to_string()]),
            states: Some(vec!["Active".to_string()]),
            assigned_to: Some("bob@example.com".to_string()),
            iteration_path: Some("Fabrikam\\Sprint 1".to_string()),
            area_path: Some("Fabrikam\\Web".to_string()),
            ..Default::default()
        };

        let built = build(&filter, &settings()).unwrap();
        assert_eq!(
            built.wiql,
            "SELECT [System.Id] FROM WorkItems WHERE [System.TeamProject] = 'Fabrikam' \
             AND [System.Id] IN (1) \
             AND [System.WorkItemType] IN ('Bug') \
             AND [System.State] IN ('Active') \
             AND [System.AssignedTo] = 'bob@example.com' \
             AND [System.IterationPath] UNDER 'Fabrikam\\Sprint 1' \
             AND [System.AreaPath] UNDER 'Fabrikam\\Web' \
             ORDER BY [System.ChangedDate] DESC"
        );
    }

    #[test]
    fn omitted_fields_fall_back_to_configured_defaults() {
        let settings = settings_with(&[
            ("DEFAULT_WORK_ITEM_TYPES", "Epic,Feature"),
            ("DEFAULT_ITERATION_PATH", "Fabrikam\\Sprint 9"),
            ("DEFAULT_AREA_PATH", "Fabrikam\\Api"),
        ]);

        let built = build(&QueryFilter::default(), &settings).unwrap();
        assert!(built.wiql.contains("[System.WorkItemType] IN ('Epic', 'Feature')"));
        assert!(built.wiql.contains("[System.IterationPath] UNDER 'Fabrikam\\Sprint 9'"));
        assert!(built.wiql.contains("[System.AreaPath] UNDER 'Fabrikam\\Api'"));
        assert_eq!(built.max_results, 100);
    }

    #[test]
    fn state_categories_resolve_through_settings() {
        let settings = settings();
        for (category, expected) in [
            ("active", "('Active', 'New', 'In Progress', 'To Do', 'Doing')"),
            ("Completed", "('Closed', 'Done', 'Resolved')"),
            (" review ", "('Code Review', 'Testing', 'Approved')"),
        ] {
            let filter = QueryFilter {
                state_category: Some(category.to_string()),
                ..Default::default()
            };
            let built = build(&filter, &settings).unwrap();
            assert!(
                built.wiql.contains(&format!("[System.State] IN {}", expected)),
                "{}",
                built.wiql
            );
            assert!(!built.wiql.contains("NOT IN"));
        }
    }

    #[test]
    fn unknown_state_category_is_invalid_filter() {
        let filter = QueryFilter {
            state_category: Some("blocked".to_string()),
            ..Default::default()
        };

        let err = build(&filter, &settings()).unwrap_err();
        assert_eq!(err.kind(), "InvalidFilterError");
        assert!(err.to_string().contains("blocked"));
    }

    #[test]
    fn explicit_states_take_precedence_over_category() {
        let filter = QueryFilter {
            states: Some(vec!["Resolved".to_string()]),
            state_category: Some("active".to_string()),
            ..Default::default()
        };

        let built = build(&filter, &settings()).unwrap();
        assert!(built.wiql.contains("[System.State] IN ('Resolved')"));
        assert!(!built.wiql.contains("'Doing'"));
    }

    #[test]
    fn exclusions_apply_only_without_explicit_states() {
        let settings = settings_with(&[("DEFAULT_CLOSED_STATES", "Closed,Done")]);

        let built = build(&QueryFilter::default(), &settings).unwrap();
        assert!(
            built
                .wiql
                .contains("[System.State] NOT IN ('Closed', 'Done', 'Removed')")
        );

        let filter = QueryFilter {
            states: Some(vec!["Closed".to_string()]),
            ..Default::default()
        };
        let built = build(&filter, &settings).unwrap();
        assert!(!built.wiql.contains("NOT IN"));
    }

    #[test]
    fn exclusions_can_be_disabled_in_configuration() {
        let settings = settings_with(&[("EXCLUDE_CLOSED", "false"), ("EXCLUDE_REMOVED", "false")]);

        let built = build(&QueryFilter::default(), &settings).unwrap();
        assert!(!built.wiql.contains("[System.State]"));
    }

    #[test]
    fn default_user_applies_only_to_my_work_items_style_calls() {
        let settings = settings_with(&[("DEFAULT_USER", "alice@example.com")]);

        let built = build(&QueryFilter::default(), &settings).unwrap();
        assert!(!built.wiql.contains("[System.AssignedTo]"));

        let filter = QueryFilter {
            use_default_user: true,
            ..Default::default()
        };
        let built = build(&filter, &settings).unwrap();
        assert!(
            built
                .wiql
                .contains("[System.AssignedTo] = 'alice@example.com'")
        );

        let filter = QueryFilter {
            use_default_user: true,
            assigned_to: Some("carol@example.com".to_string()),
            ..Default::default()
        };
        let built = build(&filter, &settings).unwrap();
        assert!(
            built
                .wiql
                .contains("[System.AssignedTo] = 'carol@example.com'")
        );
    }

    #[test]
    fn single_quotes_are_escaped() {
        let filter = QueryFilter {
            assigned_to: Some("Pat O'Brien".to_string()),
            area_path: Some("Fabrikam\\Ops' Team".to_string()),
            ..Default::default()
        };

        let built = build(&filter, &settings()).unwrap();
        assert!(built.wiql.contains("[System.AssignedTo] = 'Pat O''Brien'"));
        assert!(built.wiql.contains("UNDER 'Fabrikam\\Ops'' Team'"));
    }

    #[test]
    fn explicit_wiql_is_used_verbatim_and_unscoped_by_default() {
        let wiql = "SELECT [System.Id] FROM WorkItems WHERE [System.Tags] CONTAINS 'x'";
        let filter = QueryFilter {
            wiql: Some(wiql.to_string()),
            states: Some(vec!["Active".to_string()]),
            project: Some("Other".to_string()),
            ..Default::default()
        };

        let built = build(&filter, &settings()).unwrap();
        assert_eq!(built.wiql, wiql);
        assert_eq!(built.project, None);
    }

    #[test]
    fn explicit_wiql_with_project_filter_is_scoped() {
        let mut filter = QueryFilter {
            wiql: Some("SELECT [System.Id] FROM WorkItems".to_string()),
            project: Some("Other".to_string()),
            include_project_filter: true,
            ..Default::default()
        };

        let built = build(&filter, &settings()).unwrap();
        assert_eq!(built.project.as_deref(), Some("Other"));

        filter.project = None;
        let built = build(&filter, &settings()).unwrap();
        assert_eq!(built.project.as_deref(), Some("Fabrikam"));
    }

    #[test]
    fn blank_wiql_is_rejected() {
        let filter = QueryFilter {
            wiql: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            build(&filter, &settings()),
            Err(Error::InvalidFilter(_))
        ));
    }

    #[test]
    fn open_queries_require_explicit_permission() {
        let mut settings =
            settings_with(&[("EXCLUDE_CLOSED", "false"), ("EXCLUDE_REMOVED", "false")]);
        settings.default_work_item_types.clear();

        let err = build(&QueryFilter::default(), &settings).unwrap_err();
        assert_eq!(err.kind(), "InvalidFilterError");

        let filter = QueryFilter {
            allow_unfiltered: true,
            project: Some("Other".to_string()),
            ..Default::default()
        };
        let built = build(&filter, &settings).unwrap();
        assert_eq!(
            built.wiql,
            "SELECT [System.Id] FROM WorkItems WHERE [System.TeamProject] = 'Other' \
             ORDER BY [System.ChangedDate] DESC"
        );

        settings.enable_project_filtering = false;
        let built = build(&filter, &settings).unwrap();
        assert!(built.wiql.contains("WHERE [System.TeamProject] = 'Other' ORDER BY"));
    }

    #[test]
    fn project_override_restricts_results_to_that_project() {
        let filter = QueryFilter {
            work_item_types: Some(vec!["Bug".to_string()]),
            project: Some("Other".to_string()),
            ..Default::default()
        };

        let built = build(&filter, &settings()).unwrap();
        assert_eq!(
            built.wiql,
            "SELECT [System.Id] FROM WorkItems WHERE [System.TeamProject] = 'Other' \
             AND [System.WorkItemType] IN ('Bug') \
             AND [System.State] NOT IN ('Closed', 'Removed') \
             ORDER BY [System.ChangedDate] DESC"
        );
        assert_eq!(built.project.as_deref(), Some("Other"));
        assert_eq!(built.wiql.matches("[System.TeamProject]").count(), 1);
    }

    #[test]
    fn project_clause_is_omitted_when_filtering_is_disabled() {
        let settings = settings_with(&[("ENABLE_PROJECT_FILTERING", "false")]);
        let filter = QueryFilter {
            work_item_types: Some(vec!["Bug".to_string()]),
            project: Some("Other".to_string()),
            ..Default::default()
        };

        let built = build(&filter, &settings).unwrap();
        assert!(!built.wiql.contains("[System.TeamProject]"));
        assert!(
            built
                .wiql
                .starts_with("SELECT [System.Id] FROM WorkItems WHERE [System.WorkItemType]")
        );
        assert_eq!(built.project.as_deref(), Some("Other"));
    }

    #[test]
    fn max_results_override_and_zero() {
        let mut filter = QueryFilter {
            max_results: Some(5),
            ..Default::default()
        };
        assert_eq!(build(&filter, &settings()).unwrap().max_results, 5);

        filter.max_results = Some(0);
        assert!(build(&filter, &settings()).is_err());
    }

    #[test]
    fn require_ids_rejects_empty_slice() {
        assert!(require_ids(&[]).is_err());
        assert!(require_ids(&[3]).is_ok());
    }
}
