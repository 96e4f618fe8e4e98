//! JSON-RPC server loop and tool dispatch.

use crate::error::ToolError;
use crate::protocol::{
    CallToolParams, CallToolResult, InitializeResult, JsonRpcError, JsonRpcRequest,
    JsonRpcResponse, ListToolsResult, PromptDescriptor, ResourceDescriptor,
    ResourceTemplateDescriptor, ServerCapabilities, ServerInfo,
};
use crate::tools::ToolRegistry;
use serde_json::json;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, error, info};

const PROTOCOL_VERSION: &str = "2024-11-05";

/// MCP server: owns the registry and speaks JSON-RPC over stdio.
pub struct McpServer {
    registry: ToolRegistry,
}

impl McpServer {
    pub fn new(registry: ToolRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Route a tool call by name.
    ///
    /// This is the only place upstream API failures become data: an
    /// `Api` error is downgraded to an error-flagged result here, so the
    /// caller sees a successful JSON-RPC response describing the failure.
    /// Validation and routing errors propagate as JSON-RPC errors.
    pub async fn dispatch(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<CallToolResult, ToolError> {
        let tool = self
            .registry
            .get(name)
            .ok_or_else(|| ToolError::MethodNotFound(name.to_string()))?;

        debug!(tool = name, "dispatching tool call");
        match tool.execute(arguments).await {
            Ok(result) => Ok(result),
            Err(ToolError::Api(err)) => {
                let message = err
                    .api_message()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| err.to_string());
                debug!(tool = name, error = %message, "upstream API call failed");
                Ok(CallToolResult::error(format!(
                    "Postman API error: {}",
                    message
                )))
            }
            Err(other) => Err(other),
        }
    }

    /// Read newline-delimited JSON-RPC requests from stdin until EOF.
    pub async fn run(&self) -> std::io::Result<()> {
        let stdin = BufReader::new(tokio::io::stdin());
        let mut stdout = tokio::io::stdout();
        let mut lines = stdin.lines();

        info!(tools = self.registry.len(), "server listening on stdio");

        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }

            let request: JsonRpcRequest = match serde_json::from_str(&line) {
                Ok(request) => request,
                Err(e) => {
                    let response = JsonRpcResponse::error(
                        serde_json::Value::Null,
                        JsonRpcError::parse_error(format!("Parse error: {}", e)),
                    );
                    write_response(&mut stdout, &response).await?;
                    continue;
                }
            };

            // Notifications carry no id and must not get a response.
            let id = match request.id.clone() {
                Some(id) => id,
                None => continue,
            };

            let response = self.handle_request(id, request).await;
            write_response(&mut stdout, &response).await?;
        }

        Ok(())
    }

    async fn handle_request(
        &self,
        id: serde_json::Value,
        request: JsonRpcRequest,
    ) -> JsonRpcResponse {
        match request.method.as_str() {
            "initialize" => JsonRpcResponse::success(id, self.initialize_result()),
            "tools/list" => {
                let result = ListToolsResult {
                    tools: self.registry.list_schemas(),
                };
                match serde_json::to_value(&result) {
                    Ok(value) => JsonRpcResponse::success(id, value),
                    Err(e) => {
                        JsonRpcResponse::error(id, JsonRpcError::internal_error(e.to_string()))
                    }
                }
            }
            "tools/call" => self.handle_tool_call(id, request.params).await,
            "resources/list" => JsonRpcResponse::success(id, resources_list()),
            "resources/templates/list" => JsonRpcResponse::success(id, resource_templates_list()),
            "prompts/list" => JsonRpcResponse::success(id, prompts_list()),
            method => JsonRpcResponse::error(id, JsonRpcError::method_not_found(method)),
        }
    }

    async fn handle_tool_call(
        &self,
        id: serde_json::Value,
        params: Option<serde_json::Value>,
    ) -> JsonRpcResponse {
        let params: CallToolParams = match params
            .ok_or_else(|| "missing params".to_string())
            .and_then(|p| serde_json::from_value(p).map_err(|e| e.to_string()))
        {
            Ok(params) => params,
            Err(e) => {
                return JsonRpcResponse::error(
                    id,
                    JsonRpcError::invalid_params(format!("Invalid tool call params: {}", e)),
                );
            }
        };

        // Omitted arguments mean "no arguments".
        let arguments = if params.arguments.is_null() {
            json!({})
        } else {
            params.arguments
        };

        match self.dispatch(&params.name, arguments).await {
            Ok(result) => match serde_json::to_value(&result) {
                Ok(value) => JsonRpcResponse::success(id, value),
                Err(e) => JsonRpcResponse::error(id, JsonRpcError::internal_error(e.to_string())),
            },
            Err(err) => {
                error!(tool = %params.name, error = %err, "tool call failed");
                JsonRpcResponse::error(id, err.to_rpc_error())
            }
        }
    }

    fn initialize_result(&self) -> serde_json::Value {
        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: json!({}),
                resources: json!({}),
                prompts: json!({}),
            },
            server_info: ServerInfo {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };
        serde_json::to_value(&result).unwrap_or_else(|_| json!({}))
    }
}

async fn write_response(
    stdout: &mut tokio::io::Stdout,
    response: &JsonRpcResponse,
) -> std::io::Result<()> {
    let line = serde_json::to_string(response)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    stdout.write_all(line.as_bytes()).await?;
    stdout.write_all(b"\n").await?;
    stdout.flush().await
}

fn resources_list() -> serde_json::Value {
    let resources = vec![
        ResourceDescriptor {
            uri: "postman://workspaces".to_string(),
            name: "Postman Workspaces".to_string(),
            description: "List of all available Postman workspaces".to_string(),
            mime_type: "application/json".to_string(),
        },
        ResourceDescriptor {
            uri: "postman://user".to_string(),
            name: "Current User".to_string(),
            description: "Information about the currently authenticated user".to_string(),
            mime_type: "application/json".to_string(),
        },
    ];
    json!({ "resources": resources })
}

fn resource_templates_list() -> serde_json::Value {
    let templates = vec![
        ResourceTemplateDescriptor {
            uri_template: "postman://workspaces/{workspaceId}/collections".to_string(),
            name: "Workspace Collections".to_string(),
            description: "List of collections in a specific workspace".to_string(),
            mime_type: "application/json".to_string(),
        },
        ResourceTemplateDescriptor {
            uri_template: "postman://workspaces/{workspaceId}/environments".to_string(),
            name: "Workspace Environments".to_string(),
            description: "List of environments in a specific workspace".to_string(),
            mime_type: "application/json".to_string(),
        },
    ];
    json!({ "resourceTemplates": templates })
}

fn prompts_list() -> serde_json::Value {
    let prompts = vec![
        PromptDescriptor {
            id: "create_collection".to_string(),
            name: "Create Collection".to_string(),
            description: "Create a new Postman collection with specified endpoints".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "name": {"type": "string"},
                    "description": {"type": "string"},
                    "endpoints": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "path": {"type": "string"},
                                "method": {"type": "string"},
                                "description": {"type": "string"}
                            }
                        }
                    }
                },
                "required": ["name", "endpoints"]
            }),
        },
        PromptDescriptor {
            id: "create_environment".to_string(),
            name: "Create Environment".to_string(),
            description: "Create a new Postman environment with variables".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "name": {"type": "string"},
                    "variables": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "key": {"type": "string"},
                                "value": {"type": "string"},
                                "type": {"type": "string", "enum": ["default", "secret"]}
                            }
                        }
                    }
                },
                "required": ["name", "variables"]
            }),
        },
    ];
    json!({ "prompts": prompts })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools;
    use postman_mcp_client::PostmanClient;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn test_server(mock: &MockServer) -> McpServer {
        let client = PostmanClient::builder()
            .api_key("PMAK-test")
            .base_url(mock.uri())
            .build()
            .unwrap();
        let mut registry = ToolRegistry::new();
        tools::workspaces::register_tools(&mut registry, &client);
        tools::environments::register_tools(&mut registry, &client);
        tools::collections::register_tools(&mut registry, &client);
        tools::users::register_tools(&mut registry, &client);
        tools::sdk::register_tools(&mut registry);
        McpServer::new(registry)
    }

    #[tokio::test]
    async fn test_registry_carries_full_catalog() {
        let mock = MockServer::start().await;
        let server = test_server(&mock).await;
        assert_eq!(server.registry().len(), 36);
        // Listing starts with the workspace group and ends with the
        // local validator.
        let schemas = server.registry().list_schemas();
        assert_eq!(schemas[0].name, "list_workspaces");
        assert_eq!(schemas.last().unwrap().name, "validate_collection");
    }

    #[tokio::test]
    async fn test_dispatch_unknown_tool() {
        let mock = MockServer::start().await;
        let server = test_server(&mock).await;
        let result = server.dispatch("no_such_tool", json!({})).await;
        match result {
            Err(ToolError::MethodNotFound(name)) => assert_eq!(name, "no_such_tool"),
            other => panic!("expected MethodNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_dispatch_invalid_params_never_reaches_upstream() {
        let mock = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock)
            .await;

        let server = test_server(&mock).await;
        let result = server.dispatch("get_workspace", json!({})).await;
        assert!(matches!(result, Err(ToolError::InvalidParams(_))));
    }

    #[tokio::test]
    async fn test_dispatch_downgrades_api_error_to_data() {
        let mock = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/collections/missing"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_json(json!({"error": {"message": "not found"}})),
            )
            .mount(&mock)
            .await;

        let server = test_server(&mock).await;
        let result = server
            .dispatch("get_collection", json!({"collection_id": "missing"}))
            .await
            .unwrap();

        assert_eq!(result.is_error, Some(true));
        let rendered = serde_json::to_value(&result).unwrap();
        assert_eq!(
            rendered["content"][0]["text"],
            json!("Postman API error: not found")
        );
    }

    #[tokio::test]
    async fn test_dispatch_happy_path() {
        let mock = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/me"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"user": {"id": 1}})))
            .mount(&mock)
            .await;

        let server = test_server(&mock).await;
        let result = server.dispatch("get_user_info", json!({})).await.unwrap();
        assert!(result.is_error.is_none());
    }

    #[tokio::test]
    async fn test_handle_request_routes_methods() {
        let mock = MockServer::start().await;
        let server = test_server(&mock).await;

        let request = JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            id: Some(json!(1)),
            method: "tools/list".to_string(),
            params: None,
        };
        let response = server.handle_request(json!(1), request).await;
        assert!(response.error.is_none());
        let tools = response.result.unwrap();
        assert_eq!(tools["tools"].as_array().unwrap().len(), 36);

        let request = JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            id: Some(json!(2)),
            method: "resources/list".to_string(),
            params: None,
        };
        let response = server.handle_request(json!(2), request).await;
        let resources = response.result.unwrap();
        assert_eq!(resources["resources"][0]["uri"], json!("postman://workspaces"));

        let request = JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            id: Some(json!(3)),
            method: "unknown/method".to_string(),
            params: None,
        };
        let response = server.handle_request(json!(3), request).await;
        assert_eq!(response.error.unwrap().code, -32601);
    }

    #[tokio::test]
    async fn test_handle_tool_call_normalizes_null_arguments() {
        let mock = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/me"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"user": {}})))
            .mount(&mock)
            .await;

        let server = test_server(&mock).await;
        let response = server
            .handle_tool_call(json!(4), Some(json!({"name": "get_user_info"})))
            .await;
        assert!(response.error.is_none());
    }

    #[tokio::test]
    async fn test_handle_tool_call_surfaces_invalid_params_as_rpc_error() {
        let mock = MockServer::start().await;
        let server = test_server(&mock).await;
        let response = server
            .handle_tool_call(
                json!(5),
                Some(json!({"name": "get_workspace", "arguments": {}})),
            )
            .await;
        assert_eq!(response.error.unwrap().code, -32602);
    }

    #[tokio::test]
    async fn test_initialize_result_shape() {
        let mock = MockServer::start().await;
        let server = test_server(&mock).await;
        let result = server.initialize_result();
        assert_eq!(result["protocolVersion"], json!(PROTOCOL_VERSION));
        assert!(result["capabilities"]["tools"].is_object());
        assert!(result["serverInfo"]["name"].is_string());
    }
}
