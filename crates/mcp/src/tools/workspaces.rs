//! Workspace tools.

use crate::error::ToolError;
use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::{json_result, json_schema_object, json_schema_string, Tool, ToolRegistry};
use crate::validate::{parse_args, ValidateArgs};
use postman_mcp_client::PostmanClient;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

/// Register all workspace tools.
pub fn register_tools(registry: &mut ToolRegistry, client: &PostmanClient) {
    registry.register(Arc::new(ListWorkspacesTool::new(client.clone())));
    registry.register(Arc::new(GetWorkspaceTool::new(client.clone())));
}

/// List all workspaces accessible to the caller.
pub struct ListWorkspacesTool {
    client: PostmanClient,
}

impl ListWorkspacesTool {
    pub fn new(client: PostmanClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for ListWorkspacesTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "list_workspaces".to_string(),
            description: "List all workspaces accessible to the authenticated user".to_string(),
            input_schema: json_schema_object(json!({}), vec![]),
        }
    }

    async fn execute(
        &self,
        _arguments: serde_json::Value,
    ) -> Result<CallToolResult, ToolError> {
        let body: serde_json::Value = self.client.get("/workspaces").await?;
        json_result(&body)
    }
}

#[derive(Debug, Deserialize)]
struct GetWorkspaceArgs {
    workspace: String,
}

impl ValidateArgs for GetWorkspaceArgs {}

/// Fetch a single workspace by ID.
pub struct GetWorkspaceTool {
    client: PostmanClient,
}

impl GetWorkspaceTool {
    pub fn new(client: PostmanClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for GetWorkspaceTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_workspace".to_string(),
            description: "Get details of a specific workspace".to_string(),
            input_schema: json_schema_object(
                json!({
                    "workspace": json_schema_string("The workspace ID"),
                }),
                vec!["workspace"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult, ToolError> {
        let args: GetWorkspaceArgs = parse_args("get_workspace", arguments)?;
        let body: serde_json::Value = self
            .client
            .get(&format!("/workspaces/{}", args.workspace))
            .await?;
        json_result(&body)
    }
}
