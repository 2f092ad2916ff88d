use crate::azure::api::WorkItemsApi;
use crate::config::Settings;
use std::sync::Arc;

/// Shared, read-only state handed to every tool invocation.
#[derive(Clone)]
pub struct ToolContext {
    pub settings: Arc<Settings>,
    pub api: Arc<dyn WorkItemsApi>,
}

impl ToolContext {
    pub fn new(settings: Arc<Settings>, api: Arc<dyn WorkItemsApi>) -> Self {
        Self { settings, api }
    }

    pub fn api(&self) -> &dyn WorkItemsApi {
        self.api.as_ref()
    }

    /// The call's project override, or the configured project.
    pub fn project_or_default(&self, project: Option<&str>) -> String {
        project
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .unwrap_or(self.settings.project.as_str())
            .to_string()
    }
}
