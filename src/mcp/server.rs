use crate::mcp::context::ToolContext;
use crate::mcp::registry::ToolRegistry;
use rmcp::{
    ErrorData as McpError, RoleServer,
    model::{
        CallToolRequestParam, CallToolResult, Content, ErrorCode, Implementation, ListToolsResult,
        PaginatedRequestParam, ServerCapabilities, ServerInfo,
    },
    service::RequestContext,
};
use serde_json::Value;

#[derive(Clone)]
pub struct AzureMcpServer {
    context: ToolContext,
    registry: ToolRegistry,
}

impl AzureMcpServer {
    pub fn new(context: ToolContext, registry: ToolRegistry) -> Self {
        Self { context, registry }
    }

    /// Runs a tool by name. Failures inside the tool come back as an error
    /// result carrying `{"error": {...}}`; only an unknown name is a
    /// protocol error.
    pub async fn dispatch(&self, name: &str, arguments: Value) -> Result<CallToolResult, McpError> {
        let Some(result) = self
            .registry
            .call(self.context.clone(), name, arguments)
            .await
        else {
            return Err(McpError {
                code: ErrorCode::INVALID_PARAMS,
                message: format!("Unknown tool: {}", name).into(),
                data: None,
            });
        };

        match result {
            Ok(value) => {
                let text = serde_json::to_string_pretty(&value).map_err(|e| McpError {
                    code: ErrorCode(-32000),
                    message: format!("Failed to serialize result: {}", e).into(),
                    data: None,
                })?;
                Ok(CallToolResult::success(vec![Content::text(text)]))
            }
            Err(err) => {
                log::warn!("Tool {} failed: {}", name, err);
                Ok(CallToolResult::error(vec![Content::text(
                    err.to_payload().to_string(),
                )]))
            }
        }
    }
}

impl rmcp::ServerHandler for AzureMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "azure-devops-work-items-mcp-rust".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                icons: None,
                title: None,
                website_url: None,
            },
            instructions: Some(
                "Use these tools to query, read, create, update and comment on Azure DevOps work items"
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult::with_all_items(self.registry.tools()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let arguments = Value::Object(request.arguments.unwrap_or_default());
        self.dispatch(&request.name, arguments).await
    }
}
