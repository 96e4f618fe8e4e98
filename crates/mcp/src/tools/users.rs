//! User tools.

use crate::error::ToolError;
use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::{json_result, json_schema_object, Tool, ToolRegistry};
use postman_mcp_client::PostmanClient;
use serde_json::json;
use std::sync::Arc;

pub fn register_tools(registry: &mut ToolRegistry, client: &PostmanClient) {
    registry.register(Arc::new(GetUserInfoTool::new(client.clone())));
}

/// Fetch the authenticated user's profile and usage limits.
pub struct GetUserInfoTool {
    client: PostmanClient,
}

impl GetUserInfoTool {
    pub fn new(client: PostmanClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for GetUserInfoTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_user_info".to_string(),
            description: "Get information about the authenticated user".to_string(),
            input_schema: json_schema_object(json!({}), vec![]),
        }
    }

    async fn execute(
        &self,
        _arguments: serde_json::Value,
    ) -> Result<CallToolResult, ToolError> {
        let body: serde_json::Value = self.client.get("/me").await?;
        json_result(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_get_user_info_hits_me_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/me"))
            .and(header("x-api-key", "PMAK-test"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"user": {"id": 12345}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = PostmanClient::builder()
            .api_key("PMAK-test")
            .base_url(server.uri())
            .build()
            .unwrap();
        let tool = GetUserInfoTool::new(client);
        let result = tool.execute(json!({})).await.unwrap();
        let rendered = serde_json::to_value(&result).unwrap();
        assert!(rendered["content"][0]["text"]
            .as_str()
            .unwrap()
            .contains("12345"));
    }
}
