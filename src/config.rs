use crate::error::{Error, Result};
use crate::query::StateCategory;
use serde::Serialize;
use std::fmt;
use std::time::Duration;

const DEFAULT_API_VERSION: &str = "7.1";
const DEFAULT_BASE_URL: &str = "https://dev.azure.com";
const DEFAULT_WORK_ITEM_TYPES: &str = "Bug,Task,User Story,Product Backlog Item";
const DEFAULT_MAX_RESULTS: usize = 100;
const DEFAULT_ACTIVE_STATES: &str = "Active,New,In Progress,To Do,Doing";
const DEFAULT_COMPLETED_STATES: &str = "Closed,Done,Resolved";
const DEFAULT_REVIEW_STATES: &str = "Code Review,Testing,Approved";
const DEFAULT_CLOSED_STATES: &str = "Closed";
const DEFAULT_REMOVED_STATES: &str = "Removed";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Personal access token. Never printed.
#[derive(Clone)]
pub struct Secret(String);

impl Secret {
    pub fn new<S: Into<String>>(value: S) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

/// Process-wide settings, resolved once at startup and shared read-only.
#[derive(Debug, Clone)]
pub struct Settings {
    pub organization: String,
    pub project: String,
    pub personal_access_token: Secret,
    pub api_version: String,
    pub base_url: String,
    pub request_timeout: Duration,

    pub default_team: Option<String>,
    pub default_user: Option<String>,
    pub default_iteration_path: Option<String>,
    pub default_area_path: Option<String>,
    pub default_work_item_types: Vec<String>,
    pub default_max_results: usize,

    pub exclude_closed: bool,
    pub exclude_removed: bool,
    pub closed_states: Vec<String>,
    pub removed_states: Vec<String>,

    pub default_active_states: Vec<String>,
    pub default_completed_states: Vec<String>,
    pub default_review_states: Vec<String>,

    /// Restrict built queries to the target project with a `[System.TeamProject]` clause.
    pub enable_project_filtering: bool,
}

impl Settings {
    /// Reads settings from the process environment.
    pub fn load() -> Result<Self> {
        Self::load_from(|key| std::env::var(key).ok())
    }

    /// Reads settings through an arbitrary key lookup.
    pub fn load_from<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = EnvReader { lookup };

        Ok(Self {
            organization: env.required("ORGANIZATION")?,
            project: env.required("PROJECT")?,
            personal_access_token: Secret::new(env.required("AZURE_DEVOPS_PAT")?),
            api_version: env
                .optional("API_VERSION")
                .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            base_url: env
                .optional("BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            request_timeout: Duration::from_secs(
                env.positive("REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS as usize)? as u64,
            ),
            default_team: env.optional("DEFAULT_TEAM"),
            default_user: env.optional("DEFAULT_USER"),
            default_iteration_path: env.optional("DEFAULT_ITERATION_PATH"),
            default_area_path: env.optional("DEFAULT_AREA_PATH"),
            default_work_item_types: env.list("DEFAULT_WORK_ITEM_TYPES", DEFAULT_WORK_ITEM_TYPES),
            default_max_results: env.positive("DEFAULT_MAX_RESULTS", DEFAULT_MAX_RESULTS)?,
            exclude_closed: env.boolean("EXCLUDE_CLOSED", true)?,
            exclude_removed: env.boolean("EXCLUDE_REMOVED", true)?,
            closed_states: env.list("DEFAULT_CLOSED_STATES", DEFAULT_CLOSED_STATES),
            removed_states: env.list("DEFAULT_REMOVED_STATES", DEFAULT_REMOVED_STATES),
            default_active_states: env.list("DEFAULT_ACTIVE_STATES", DEFAULT_ACTIVE_STATES),
            default_completed_states: env
                .list("DEFAULT_COMPLETED_STATES", DEFAULT_COMPLETED_STATES),
            default_review_states: env.list("DEFAULT_REVIEW_STATES", DEFAULT_REVIEW_STATES),
            enable_project_filtering: env.boolean("ENABLE_PROJECT_FILTERING", true)?,
        })
    }

    pub fn states_for(&self, category: StateCategory) -> &[String] {
        match category {
            StateCategory::Active => &self.default_active_states,
            StateCategory::Completed => &self.default_completed_states,
            StateCategory::Review => &self.default_review_states,
        }
    }

    /// States excluded from queries that carry no explicit state filter.
    pub fn excluded_states(&self) -> Vec<String> {
        let mut excluded = Vec::new();
        if self.exclude_closed {
            excluded.extend(self.closed_states.iter().cloned());
        }
        if self.exclude_removed {
            excluded.extend(self.removed_states.iter().cloned());
        }
        excluded
    }

    pub fn summary(&self) -> SettingsSummary {
        SettingsSummary {
            organization: self.organization.clone(),
            project: self.project.clone(),
            api_version: self.api_version.clone(),
            base_url: self.base_url.clone(),
            default_settings: DefaultSettings {
                default_team: self.default_team.clone(),
                default_user: self.default_user.clone(),
                default_work_item_types: self.default_work_item_types.clone(),
                default_max_results: self.default_max_results,
                exclude_closed: self.exclude_closed,
                exclude_removed: self.exclude_removed,
                default_iteration_path: self.default_iteration_path.clone(),
                default_area_path: self.default_area_path.clone(),
                default_active_states: self.default_active_states.clone(),
                default_completed_states: self.default_completed_states.clone(),
                default_review_states: self.default_review_states.clone(),
                enable_project_filtering: self.enable_project_filtering,
            },
        }
    }
}

/// Settings as reported by `get_project_info`; excludes the credential.
#[derive(Debug, Serialize)]
pub struct SettingsSummary {
    pub organization: String,
    pub project: String,
    pub api_version: String,
    pub base_url: String,
    pub default_settings: DefaultSettings,
}

#[derive(Debug, Serialize)]
pub struct DefaultSettings {
    pub default_team: Option<String>,
    pub default_user: Option<String>,
    pub default_work_item_types: Vec<String>,
    pub default_max_results: usize,
    pub exclude_closed: bool,
    pub exclude_removed: bool,
    pub default_iteration_path: Option<String>,
    pub default_area_path: Option<String>,
    pub default_active_states: Vec<String>,
    pub default_completed_states: Vec<String>,
    pub default_review_states: Vec<String>,
    pub enable_project_filtering: bool,
}

struct EnvReader<F> {
    lookup: F,
}

impl<F> EnvReader<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn optional(&self, key: &str) -> Option<String> {
        (self.lookup)(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn required(&self, key: &str) -> Result<String> {
        self.optional(key)
            .ok_or_else(|| Error::Configuration(format!("{} must be set and non-empty", key)))
    }

    /// A value with no entries left after splitting counts as unset.
    fn list(&self, key: &str, fallback: &str) -> Vec<String> {
        let values = self.optional(key).map(|raw| split_list(&raw)).unwrap_or_default();
        if values.is_empty() {
            split_list(fallback)
        } else {
            values
        }
    }

    fn boolean(&self, key: &str, fallback: bool) -> Result<bool> {
        match self.optional(key) {
            None => Ok(fallback),
            Some(value) => match value.to_ascii_lowercase().as_str() {
                "true" => Ok(true),
                "false" => Ok(false),
                _ => Err(Error::Configuration(format!(
                    "{} must be 'true' or 'false', got '{}'",
                    key, value
                ))),
            },
        }
    }

    fn positive(&self, key: &str, fallback: usize) -> Result<usize> {
        match self.optional(key) {
            None => Ok(fallback),
            Some(value) => match value.parse::<usize>() {
                Ok(n) if n > 0 => Ok(n),
                _ => Err(Error::Configuration(format!(
                    "{} must be a positive integer, got '{}'",
                    key, value
                ))),
            },
        }
    }
}

/// Splits a comma-separated value, trimming entries and dropping empty ones.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<Settings> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::load_from(|key| vars.get(key).cloned())
    }

    const REQUIRED: [(&str, &str); 3] = [
        ("ORGANIZATION", "contoso"),
        ("PROJECT", "Fabrikam"),
        ("AZURE_DEVOPS_PAT", "s3cr3t"),
    ];

    #[test]
    fn fallbacks_apply_when_only_required_values_are_set() {
        let settings = load(&REQUIRED).unwrap();

        assert_eq!(settings.organization, "contoso");
        assert_eq!(settings.project, "Fabrikam");
        assert_eq!(settings.api_version, "7.1");
        assert_eq!(settings.base_url, "https://dev.azure.com");
        assert_eq!(settings.request_timeout, Duration::from_secs(30));
        assert_eq!(
            settings.default_work_item_types,
            vec!["Bug", "Task", "User Story", "Product Backlog Item"]
        );
        assert_eq!(settings.default_max_results, 100);
        assert!(settings.exclude_closed);
        assert!(settings.exclude_removed);
        assert_eq!(settings.default_user, None);
        assert_eq!(
            settings.default_active_states,
            vec!["Active", "New", "In Progress", "To Do", "Doing"]
        );
        assert_eq!(
            settings.default_completed_states,
            vec!["Closed", "Done", "Resolved"]
        );
        assert_eq!(
            settings.default_review_states,
            vec!["Code Review", "Testing", "Approved"]
        );
        assert_eq!(settings.excluded_states(), vec!["Closed", "Removed"]);
    }

    #[test]
    fn each_required_setting_fails_fast_when_missing_or_blank() {
        for missing in ["ORGANIZATION", "PROJECT", "AZURE_DEVOPS_PAT"] {
            let partial: Vec<(&str, &str)> = REQUIRED
                .iter()
                .copied()
                .filter(|(k, _)| *k != missing)
                .collect();
            let err = load(&partial).unwrap_err();
            assert_eq!(err.kind(), "ConfigurationError");
            assert!(err.to_string().contains(missing));

            let mut blank = partial.clone();
            blank.push((missing, "   "));
            assert!(matches!(load(&blank), Err(Error::Configuration(_))));
        }
    }

    #[test]
    fn lists_are_trimmed_and_empty_entries_dropped() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("DEFAULT_WORK_ITEM_TYPES", " Bug , ,Epic,, Feature "));
        let settings = load(&vars).unwrap();

        assert_eq!(settings.default_work_item_types, vec!["Bug", "Epic", "Feature"]);
    }

    #[test]
    fn blank_lists_keep_their_fallbacks() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("DEFAULT_ACTIVE_STATES", ""));
        vars.push(("DEFAULT_WORK_ITEM_TYPES", "  "));
        vars.push(("DEFAULT_CLOSED_STATES", ""));
        vars.push(("DEFAULT_REVIEW_STATES", " , ,"));
        let settings = load(&vars).unwrap();

        assert_eq!(
            settings.default_active_states,
            vec!["Active", "New", "In Progress", "To Do", "Doing"]
        );
        assert_eq!(
            settings.default_work_item_types,
            vec!["Bug", "Task", "User Story", "Product Backlog Item"]
        );
        assert_eq!(
            settings.default_review_states,
            vec!["Code Review", "Testing", "Approved"]
        );
        assert_eq!(settings.excluded_states(), vec!["Closed", "Removed"]);
    }

    #[test]
    fn project_filtering_defaults_on_and_can_be_disabled() {
        assert!(load(&REQUIRED).unwrap().enable_project_filtering);

        let mut vars = REQUIRED.to_vec();
        vars.push(("ENABLE_PROJECT_FILTERING", "false"));
        let settings = load(&vars).unwrap();
        assert!(!settings.enable_project_filtering);
        let summary = serde_json::to_value(settings.summary()).unwrap();
        assert_eq!(summary["default_settings"]["enable_project_filtering"], false);
    }

    #[test]
    fn booleans_are_case_insensitive() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("EXCLUDE_CLOSED", "FALSE"));
        vars.push(("EXCLUDE_REMOVED", "True"));
        let settings = load(&vars).unwrap();

        assert!(!settings.exclude_closed);
        assert!(settings.exclude_removed);
        assert_eq!(settings.excluded_states(), vec!["Removed"]);
    }

    #[test]
    fn malformed_values_are_configuration_errors() {
        for (key, value) in [
            ("EXCLUDE_CLOSED", "yes"),
            ("DEFAULT_MAX_RESULTS", "0"),
            ("DEFAULT_MAX_RESULTS", "many"),
            ("REQUEST_TIMEOUT_SECS", "-5"),
        ] {
            let mut vars = REQUIRED.to_vec();
            vars.push((key, value));
            let err = load(&vars).unwrap_err();
            assert!(matches!(err, Error::Configuration(_)), "{}={}", key, value);
        }
    }

    #[test]
    fn blank_optional_strings_count_as_unset() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("DEFAULT_USER", "  "));
        vars.push(("DEFAULT_AREA_PATH", "Fabrikam\\Web"));
        let settings = load(&vars).unwrap();

        assert_eq!(settings.default_user, None);
        assert_eq!(settings.default_area_path.as_deref(), Some("Fabrikam\\Web"));
    }

    #[test]
    fn state_categories_map_to_configured_lists() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("DEFAULT_ACTIVE_STATES", "Doing"));
        let settings = load(&vars).unwrap();

        assert_eq!(settings.states_for(StateCategory::Active), ["Doing"]);
        assert_eq!(
            settings.states_for(StateCategory::Completed),
            ["Closed", "Done", "Resolved"]
        );
    }

    #[test]
    fn credential_is_redacted_in_debug_and_summary() {
        let settings = load(&REQUIRED).unwrap();

        assert!(!format!("{:?}", settings).contains("s3cr3t"));
        let summary = serde_json::to_string(&settings.summary()).unwrap();
        assert!(!summary.contains("s3cr3t"));
        assert!(summary.contains("\"project\":\"Fabrikam\""));
    }
}
